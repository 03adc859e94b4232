use turnstile_core::AppResult;
use turnstile_domain::{UserAddress, UserId, UserName};

/// Unvalidated user values as received from a caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserInput {
    /// Requested unique name.
    pub name: String,
    /// Requested address.
    pub address: String,
}

impl UserInput {
    /// Creates one input value.
    #[must_use]
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
        }
    }

    pub(super) fn validate(self) -> AppResult<(UserName, UserAddress)> {
        Ok((UserName::new(self.name)?, UserAddress::new(self.address)?))
    }
}

/// Input for the create-or-update entry point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpsertUserInput {
    /// Identity of the user to update; `None` creates a new user.
    pub id: Option<UserId>,
    /// User values.
    pub user: UserInput,
}

/// Which branch an upsert took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// A new user was created under the creation lock.
    Created,
    /// An existing user was overwritten.
    Updated,
}
