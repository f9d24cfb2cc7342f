//! REST resource auto-registration via the inventory crate.
//!
//! The `#[restrepo::rest_resource]` attribute on a generated repository
//! trait submits a [`ResourceRegistration`], so a program can enumerate
//! every exposed resource at startup without naming them one by one.

use std::any::TypeId;

/// Metadata for one discovered REST resource.
///
/// Submitted to the inventory by the `rest_resource` expansion. Fields are
/// limited to what a static initializer can hold, so the entity's `TypeId`
/// sits behind a function pointer.
pub struct ResourceRegistration {
    /// Name of the repository trait (e.g. `EmployeeRepository`).
    pub repository_name: &'static str,
    /// Simple name of the entity (e.g. `Employee`).
    pub entity_name: &'static str,
    /// Link relation the resource is exposed under (e.g. `employees`).
    pub rel: &'static str,
    /// Accessor for the entity's `TypeId`.
    pub entity_type: fn() -> TypeId,
}

impl ResourceRegistration {
    /// Path the resource is mounted at: `/{rel}`.
    pub fn path(&self) -> String {
        format!("/{}", self.rel)
    }
}

// Collect all ResourceRegistration instances via inventory
inventory::collect!(ResourceRegistration);

/// Iterate over every resource registered in the final binary.
pub fn registered_resources() -> impl Iterator<Item = &'static ResourceRegistration> {
    inventory::iter::<ResourceRegistration>()
}

/// Look up a resource by its repository trait name.
pub fn resource_by_name(repository_name: &str) -> Option<&'static ResourceRegistration> {
    registered_resources().find(|resource| resource.repository_name == repository_name)
}

/// Look up a resource by its link relation.
pub fn resource_by_rel(rel: &str) -> Option<&'static ResourceRegistration> {
    registered_resources().find(|resource| resource.rel == rel)
}

/// Check whether an entity type has a registered resource.
pub fn is_resource_registered<T: 'static>() -> bool {
    let type_id = TypeId::of::<T>();
    registered_resources().any(|resource| (resource.entity_type)() == type_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registered_resources_iterator_works() {
        // Registrations come from rest_resource expansions elsewhere in the
        // binary; in this crate's own tests the set may be empty. The
        // iterator itself must still work.
        let _count = registered_resources().count();
    }

    #[test]
    fn paths_are_rooted_at_the_rel() {
        let registration = ResourceRegistration {
            repository_name: "EmployeeRepository",
            entity_name: "Employee",
            rel: "employees",
            entity_type: || TypeId::of::<()>(),
        };
        assert_eq!(registration.path(), "/employees");
    }
}
