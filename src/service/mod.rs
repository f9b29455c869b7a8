//! Service layer: business logic orchestration.
//!
//! [`EntityService`] covers plain records, [`NestedService`] records owned
//! by a parent, and [`UserService`] accounts with their password rules.

pub mod entity_service;
pub mod nested_service;
pub mod password;
pub mod user_service;

pub use entity_service::EntityService;
pub use nested_service::NestedService;
pub use user_service::{NewUser, UserChanges, UserService};
