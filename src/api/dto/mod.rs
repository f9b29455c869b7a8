//! Data Transfer Objects for REST request/response serialization.
//!
//! Most resources use their domain types directly: the `*Details` struct
//! as request body and the stored record as response. Users get dedicated
//! DTOs so the password hash never leaves the service.

pub mod common_dto;
pub mod user_dto;

pub use common_dto::*;
pub use user_dto::*;
