use serde::Deserialize;
use serde_json::{Value, json};

use crate::post::post_model::{PostInput, UpdatePostInput};
use crate::user::model::UserInput;
use crate::utils::error::CustomError;

/// Body of `POST /graphql`: an operation name plus its variables.
#[derive(Debug, Deserialize)]
pub struct OperationRequest {
    pub operation: String,
    #[serde(default)]
    pub variables: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(
    tag = "operation",
    content = "variables",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum Operation {
    CreateUser { user_input: UserInput },
    Login { email: String, password: String },
    CreatePost { post_input: PostInput },
    Posts {
        #[serde(default)]
        page: Option<i64>,
    },
    Post { id: String },
    UpdatePost {
        id: String,
        post_input: UpdatePostInput,
    },
    DeletePost { id: String },
    User {},
    UpdateStatus { status: String },
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::CreateUser { .. } => "createUser",
            Operation::Login { .. } => "login",
            Operation::CreatePost { .. } => "createPost",
            Operation::Posts { .. } => "posts",
            Operation::Post { .. } => "post",
            Operation::UpdatePost { .. } => "updatePost",
            Operation::DeletePost { .. } => "deletePost",
            Operation::User {} => "user",
            Operation::UpdateStatus { .. } => "updateStatus",
        }
    }
}

impl TryFrom<OperationRequest> for Operation {
    type Error = CustomError;

    fn try_from(request: OperationRequest) -> Result<Self, Self::Error> {
        let variables = match request.variables {
            None | Some(Value::Null) => json!({}),
            Some(vars) => vars,
        };

        serde_json::from_value(json!({
            "operation": request.operation,
            "variables": variables,
        }))
        .map_err(|e| {
            CustomError::BadRequestError(format!(
                "Invalid operation {:?}: {e}",
                request.operation
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: Value) -> Result<Operation, CustomError> {
        let request: OperationRequest = serde_json::from_value(body).unwrap();
        Operation::try_from(request)
    }

    #[test]
    fn parses_nested_inputs() {
        let op = parse(json!({
            "operation": "createUser",
            "variables": {"userInput": {"email": "ada@example.com", "name": "Ada", "password": "secret"}}
        }))
        .unwrap();

        match op {
            Operation::CreateUser { user_input } => assert_eq!(user_input.email, "ada@example.com"),
            other => panic!("unexpected operation {other:?}"),
        }
    }

    #[test]
    fn variables_may_be_omitted() {
        assert!(matches!(
            parse(json!({"operation": "posts"})).unwrap(),
            Operation::Posts { page: None }
        ));
        assert!(matches!(
            parse(json!({"operation": "user", "variables": null})).unwrap(),
            Operation::User {}
        ));
    }

    #[test]
    fn update_post_reads_camel_case_fields() {
        let op = parse(json!({
            "operation": "updatePost",
            "variables": {"id": "abc", "postInput": {"title": "Hello", "content": "World"}}
        }))
        .unwrap();

        assert_eq!(op.name(), "updatePost");
        match op {
            Operation::UpdatePost { id, post_input } => {
                assert_eq!(id, "abc");
                assert_eq!(post_input.image_url, None);
            }
            other => panic!("unexpected operation {other:?}"),
        }
    }

    #[test]
    fn negative_page_is_accepted() {
        assert!(matches!(
            parse(json!({"operation": "posts", "variables": {"page": -1}})).unwrap(),
            Operation::Posts { page: Some(-1) }
        ));
    }

    #[test]
    fn unknown_operation_is_a_bad_request() {
        let err = parse(json!({"operation": "dropDatabase"})).unwrap_err();
        assert!(matches!(err, CustomError::BadRequestError(_)));
    }

    #[test]
    fn missing_variables_for_login_is_a_bad_request() {
        let err = parse(json!({"operation": "login", "variables": {"email": "a@b.co"}})).unwrap_err();
        assert!(matches!(err, CustomError::BadRequestError(_)));
    }
}
