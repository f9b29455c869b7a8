//! # rebound-api
//!
//! REST API for fitness tracking: user accounts, food and exercise
//! catalogues, meals, nutrition goals, biometrics, workout plans and
//! workout sessions.
//!
//! Every resource is served by the same pagination, filtering and search
//! engine. A list request is parsed into a [`query::ListQuery`], validated
//! against the resource's field allowlist, normalised against the
//! configured [`query::PageBounds`], and executed by a
//! [`persistence::Repository`] backed either by PostgreSQL or by
//! in-process tables.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP)
//!     │
//!     ├── REST Handlers (api/)
//!     │
//!     ├── EntityService / NestedService / UserService (service/)
//!     │
//!     ├── ListQuery → Criteria + PageRequest (query/)
//!     │
//!     ├── Repository<E> (persistence/)
//!     │       ├── PgRepository (sqlx QueryBuilder)
//!     │       └── MemoryRepository
//!     │
//!     └── Entity metadata (domain/)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod openapi;
pub mod persistence;
pub mod query;
pub mod service;
