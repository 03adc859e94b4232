//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod user;

pub use user::{
    USER_ADDRESS_MAX_LENGTH, USER_NAME_MAX_LENGTH, USER_NAME_MIN_LENGTH, User, UserAddress,
    UserDraft, UserId, UserName,
};
