use actix_web_httpauth::extractors::bearer::BearerAuth;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::utils::error::CustomError;

/// The claim set carried by every issued token.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub email: String,
    pub user_id: String,
    pub iat: i64,
    pub exp: i64,
}

/// The caller behind a valid bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: ObjectId,
    pub email: String,
}

/// Unwraps an optional identity, failing with 401 when there is none.
pub fn require_auth(identity: Option<&AuthUser>) -> Result<&AuthUser, CustomError> {
    identity.ok_or_else(CustomError::not_authenticated)
}

/// Signs and checks HS256 bearer tokens.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
    validation: Validation,
}

impl TokenService {
    pub fn new(secret: &str, ttl_minutes: i64) -> Self {
        let mut validation = Validation::default();
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::minutes(ttl_minutes),
            validation,
        }
    }

    pub fn issue_token(&self, user_id: &ObjectId, email: &str) -> Result<String, CustomError> {
        self.issue_token_at(user_id, email, Utc::now())
    }

    fn issue_token_at(
        &self,
        user_id: &ObjectId,
        email: &str,
        issued_at: DateTime<Utc>,
    ) -> Result<String, CustomError> {
        let claims = Claims {
            email: email.to_string(),
            user_id: user_id.to_hex(),
            iat: issued_at.timestamp(),
            exp: (issued_at + self.ttl).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| CustomError::InternalServerError(format!("Token generation failed: {e}")))
    }

    /// Any problem with the token yields `None` rather than an error.
    pub fn authenticate(&self, token: &str) -> Option<AuthUser> {
        let data = match decode::<Claims>(token, &self.decoding_key, &self.validation) {
            Ok(data) => data,
            Err(e) => {
                log::debug!("Rejected bearer token: {e}");
                return None;
            }
        };

        let user_id = ObjectId::parse_str(&data.claims.user_id).ok()?;
        Some(AuthUser {
            user_id,
            email: data.claims.email,
        })
    }

    pub fn identify(&self, credentials: Option<&BearerAuth>) -> Option<AuthUser> {
        credentials.and_then(|bearer| self.authenticate(bearer.token()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new("test-secret", 60)
    }

    #[test]
    fn token_identifies_its_user() {
        let tokens = service();
        let user_id = ObjectId::new();

        let token = tokens.issue_token(&user_id, "ada@example.com").unwrap();
        let identity = tokens.authenticate(&token).unwrap();

        assert_eq!(identity.user_id, user_id);
        assert_eq!(identity.email, "ada@example.com");
    }

    #[test]
    fn token_is_valid_within_the_hour() {
        let tokens = service();
        let user_id = ObjectId::new();

        let issued = Utc::now() - Duration::minutes(59);
        let token = tokens.issue_token_at(&user_id, "ada@example.com", issued).unwrap();
        assert!(tokens.authenticate(&token).is_some());
    }

    #[test]
    fn token_expires_after_an_hour() {
        let tokens = service();
        let user_id = ObjectId::new();

        let issued = Utc::now() - Duration::minutes(61);
        let token = tokens.issue_token_at(&user_id, "ada@example.com", issued).unwrap();
        assert_eq!(tokens.authenticate(&token), None);
    }

    #[test]
    fn foreign_signature_is_rejected() {
        let token = TokenService::new("other-secret", 60)
            .issue_token(&ObjectId::new(), "ada@example.com")
            .unwrap();
        assert_eq!(service().authenticate(&token), None);
    }

    #[test]
    fn garbage_is_unauthenticated() {
        assert_eq!(service().authenticate("not.a.token"), None);
        assert_eq!(service().identify(None), None);
    }

    #[test]
    fn claims_use_camel_case_names() {
        let tokens = service();
        let user_id = ObjectId::new();
        let token = tokens.issue_token(&user_id, "ada@example.com").unwrap();

        let data = decode::<serde_json::Value>(&token, &tokens.decoding_key, &tokens.validation)
            .unwrap();
        assert_eq!(data.claims["userId"], user_id.to_hex());
        assert_eq!(data.claims["email"], "ada@example.com");
    }

    #[test]
    fn require_auth_rejects_anonymous_callers() {
        let err = require_auth(None).unwrap_err();
        assert!(matches!(err, CustomError::UnauthenticatedError(_)));
    }
}
