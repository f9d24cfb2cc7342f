//! Build-time repository generator for restrepo.
//!
//! This crate scans your source tree for `#[derive(RestEntity)]` types and
//! generates one `{Name}Repository` trait per entity, each extending
//! `restrepo::Repository<Entity, Id>` and marked as a REST resource. The
//! artifacts land under `OUT_DIR`, where the host crate splices them in.
//!
//! # Example
//!
//! In your `build.rs`:
//!
//! ```ignore
//! fn main() {
//!     restrepo_build::generate_repositories()
//!         .base_module("models")
//!         .run()
//!         .expect("failed to generate repositories");
//! }
//! ```
//!
//! And in the crate root, splice the generated module in:
//!
//! ```ignore
//! pub mod repository {
//!     include!(concat!(env!("OUT_DIR"), "/models/repository/mod.rs"));
//! }
//! ```

mod error;
mod generator;
mod report;
mod resolver;
mod scanner;
mod task;

pub use error::{GenerateError, ResolveError};
pub use report::{CargoReporter, MemoryReporter, Reporter};
pub use task::{RepositoryGenerator, RunSummary};

/// Create a new repository generator with default settings.
///
/// Only the base module is required; everything else defaults to what a
/// build script wants:
///
/// ```ignore
/// restrepo_build::generate_repositories()
///     .base_module("models")
///     .run()
///     .expect("failed to generate repositories");
/// ```
pub fn generate_repositories() -> RepositoryGenerator {
    RepositoryGenerator::new()
}
