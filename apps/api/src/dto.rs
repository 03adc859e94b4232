use serde::{Deserialize, Serialize};
use turnstile_application::{UpsertUserInput, UserInput};
use turnstile_domain::{User, UserId};

/// Health response payload.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub ready: bool,
    pub postgres: HealthDependencyStatus,
    pub redis: HealthDependencyStatus,
}

/// One runtime dependency health status.
#[derive(Debug, Serialize)]
pub struct HealthDependencyStatus {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Incoming payload for user creation and update.
#[derive(Debug, Deserialize)]
pub struct UserRequest {
    pub name: String,
    pub address: String,
}

impl From<UserRequest> for UserInput {
    fn from(value: UserRequest) -> Self {
        Self::new(value.name, value.address)
    }
}

/// Incoming payload for the create-or-update endpoint.
#[derive(Debug, Deserialize)]
pub struct UpsertUserRequest {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    pub address: String,
}

impl From<UpsertUserRequest> for UpsertUserInput {
    fn from(value: UpsertUserRequest) -> Self {
        Self {
            id: value.id.map(UserId::new),
            user: UserInput::new(value.name, value.address),
        }
    }
}

/// API representation of a user.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub name: String,
    pub address: String,
}

impl From<User> for UserResponse {
    fn from(value: User) -> Self {
        Self {
            id: value.id().as_i64(),
            name: value.name().as_str().to_owned(),
            address: value.address().as_str().to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use turnstile_application::UpsertUserInput;
    use turnstile_domain::{User, UserAddress, UserId, UserName};

    use super::{UpsertUserRequest, UserResponse};

    #[test]
    fn upsert_request_without_id_creates() {
        let request: UpsertUserRequest =
            serde_json::from_str(r#"{"name":"Jane","address":"1 Main St"}"#)
                .unwrap_or_else(|error| panic!("payload should parse: {error}"));

        let input = UpsertUserInput::from(request);

        assert_eq!(input.id, None);
        assert_eq!(input.user.name, "Jane");
    }

    #[test]
    fn upsert_request_with_id_updates() {
        let request: UpsertUserRequest =
            serde_json::from_str(r#"{"id":7,"name":"Jane","address":"1 Main St"}"#)
                .unwrap_or_else(|error| panic!("payload should parse: {error}"));

        assert_eq!(UpsertUserInput::from(request).id, Some(UserId::new(7)));
    }

    #[test]
    fn user_response_serializes_flat_fields() {
        let user = User::new(
            UserId::new(3),
            UserName::new("Jane").unwrap_or_else(|error| panic!("{error}")),
            UserAddress::new("1 Main St").unwrap_or_else(|error| panic!("{error}")),
        );

        let json = serde_json::to_value(UserResponse::from(user))
            .unwrap_or_else(|error| panic!("response should serialize: {error}"));

        assert_eq!(
            json,
            serde_json::json!({"id": 3, "name": "Jane", "address": "1 Main St"})
        );
    }
}
