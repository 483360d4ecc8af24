use crate::utils::error::CustomError;

pub fn hash_password(password: &str, cost: u32) -> Result<String, CustomError> {
    bcrypt::hash(password, cost)
        .map_err(|e| CustomError::InternalServerError(format!("Failed to hash password: {e}")))
}

/// A malformed stored hash counts as a mismatch.
pub fn verify_password(password: &str, hashed: &str) -> bool {
    match bcrypt::verify(password, hashed) {
        Ok(valid) => valid,
        Err(e) => {
            log::warn!("Stored password hash could not be checked: {e}");
            false
        }
    }
}
