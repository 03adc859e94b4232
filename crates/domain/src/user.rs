//! User domain types and validation rules.
//!
//! A user's name is its natural key: two users may never share one. The
//! numeric identity is assigned by the persistent store on first save.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use turnstile_core::{AppError, AppResult, NonEmptyString};

/// Minimum number of characters in a user name.
pub const USER_NAME_MIN_LENGTH: usize = 2;

/// Maximum number of characters in a user name.
pub const USER_NAME_MAX_LENGTH: usize = 100;

/// Maximum number of characters in a user address.
pub const USER_ADDRESS_MAX_LENGTH: usize = 255;

/// Store-assigned identifier for a user record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    /// Creates a user identifier from a raw store value.
    #[must_use]
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the raw identifier value.
    #[must_use]
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for UserId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

impl FromStr for UserId {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        value
            .trim()
            .parse::<i64>()
            .map(Self)
            .map_err(|error| AppError::Validation(format!("invalid user id '{value}': {error}")))
    }
}

/// Validated user name, the natural uniqueness key of a user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserName(String);

impl UserName {
    /// Creates a validated user name.
    ///
    /// Surrounding whitespace is trimmed; the remainder must hold between
    /// [`USER_NAME_MIN_LENGTH`] and [`USER_NAME_MAX_LENGTH`] characters.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(AppError::Validation("name is required".to_owned()));
        }

        let length = trimmed.chars().count();
        if !(USER_NAME_MIN_LENGTH..=USER_NAME_MAX_LENGTH).contains(&length) {
            return Err(AppError::Validation(format!(
                "name must be between {USER_NAME_MIN_LENGTH} and {USER_NAME_MAX_LENGTH} characters"
            )));
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the validated name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for UserName {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.0.as_str())
    }
}

impl From<UserName> for String {
    fn from(value: UserName) -> Self {
        value.0
    }
}

/// Validated postal address of a user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserAddress(NonEmptyString);

impl UserAddress {
    /// Creates a validated address of at most [`USER_ADDRESS_MAX_LENGTH`] characters.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        let address = NonEmptyString::new(value.trim())
            .map_err(|_| AppError::Validation("address is required".to_owned()))?;

        if address.as_str().chars().count() > USER_ADDRESS_MAX_LENGTH {
            return Err(AppError::Validation(format!(
                "address must not exceed {USER_ADDRESS_MAX_LENGTH} characters"
            )));
        }

        Ok(Self(address))
    }

    /// Returns the validated address.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<UserAddress> for String {
    fn from(value: UserAddress) -> Self {
        value.0.into()
    }
}

/// Persisted user record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    name: UserName,
    address: UserAddress,
}

impl User {
    /// Assembles a persisted user from already validated parts.
    #[must_use]
    pub fn new(id: UserId, name: UserName, address: UserAddress) -> Self {
        Self { id, name, address }
    }

    /// Returns the store-assigned identifier.
    #[must_use]
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Returns the unique user name.
    #[must_use]
    pub fn name(&self) -> &UserName {
        &self.name
    }

    /// Returns the user address.
    #[must_use]
    pub fn address(&self) -> &UserAddress {
        &self.address
    }

    /// Returns a draft that overwrites this user's values, keeping its identity.
    #[must_use]
    pub fn into_draft_with(self, name: UserName, address: UserAddress) -> UserDraft {
        UserDraft {
            id: Some(self.id),
            name,
            address,
        }
    }
}

/// Values handed to the repository for persistence.
///
/// Without an identity the store inserts a new row and assigns one; with an
/// identity it overwrites the existing row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDraft {
    /// Existing identity, if this draft updates a stored user.
    pub id: Option<UserId>,
    /// Unique user name.
    pub name: UserName,
    /// User address.
    pub address: UserAddress,
}

impl UserDraft {
    /// Creates a draft for a user that has not been stored yet.
    #[must_use]
    pub fn new(name: UserName, address: UserAddress) -> Self {
        Self {
            id: None,
            name,
            address,
        }
    }

    /// Materializes the draft into a stored user with the given identity.
    #[must_use]
    pub fn into_user(self, id: UserId) -> User {
        User::new(id, self.name, self.address)
    }
}
