//! Generic repository abstractions for REST-exposed entities.
//!
//! An entity opts in with `#[derive(RestEntity)]`. The companion
//! `restrepo-build` crate scans for the derive at build time and generates
//! one `{Name}Repository` trait per entity, each extending
//! [`Repository<Entity, Id>`](Repository) and carrying the
//! [`rest_resource`] marker that registers it for discovery.
//!
//! ```ignore
//! #[derive(RestEntity)]
//! pub struct Employee {
//!     pub id: Option<i64>,
//!     pub name: String,
//! }
//!
//! // Generated into OUT_DIR by restrepo-build:
//! #[restrepo::rest_resource]
//! pub trait EmployeeRepository: restrepo::Repository<Employee, i64> {}
//! ```

extern crate self as restrepo;

pub mod entity;
pub mod errors;
pub mod registration;
pub mod repository;

pub use entity::{Entity, RestEntity};
pub use errors::RepositoryError;
pub use registration::{
    ResourceRegistration, is_resource_registered, registered_resources, resource_by_name,
    resource_by_rel,
};
pub use repository::{InMemoryRepository, Repository};
pub use restrepo_macros::{RestEntity, rest_resource};

// Re-export inventory so the rest_resource expansion can register resources
// without the host crate depending on it directly.
pub use inventory;
