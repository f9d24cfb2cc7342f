//! Demo application for restrepo.
//!
//! `build.rs` scans `src/models/` for `#[derive(RestEntity)]` types and
//! generates one repository trait per entity into `OUT_DIR`; the
//! `repository` module below splices them into this crate.

use anyhow::Result;

use restrepo::InMemoryRepository;

use crate::models::department::Department;
use crate::models::employee::Employee;
use crate::repository::{DepartmentRepository, EmployeeRepository};

pub mod models;

/// Repositories generated at build time from the models.
pub mod repository {
    include!(concat!(env!("OUT_DIR"), "/models/repository/mod.rs"));
}

fn main() -> Result<()> {
    println!("registered REST resources:");
    for resource in restrepo::registered_resources() {
        println!(
            "  {:<14} {} backed by {}",
            resource.path(),
            resource.entity_name,
            resource.repository_name
        );
    }
    println!();

    let mut employees: InMemoryRepository<Employee> = InMemoryRepository::new();
    seed_employees(&mut employees)?;
    print_employees(&employees)?;

    let mut departments: InMemoryRepository<Department> = InMemoryRepository::new();
    open_department(&mut departments, "Engineering")?;
    open_department(&mut departments, "Research")?;
    print_departments(&departments)?;

    Ok(())
}

/// Everything below works against the generated traits, not the concrete
/// store backing them.
fn seed_employees(repo: &mut impl EmployeeRepository) -> Result<()> {
    repo.save(Employee::new("Jan Kowalski", "analyst"))?;
    repo.save(Employee::new("Anna Nowak", "engineer"))?;
    let intern = repo.save(Employee::new("Piotr Lis", "intern"))?;
    repo.delete_by_id(&intern.id.expect("saved employees have ids"))?;
    Ok(())
}

fn print_employees(repo: &impl EmployeeRepository) -> Result<()> {
    println!("{} employees on file:", repo.count()?);
    for employee in repo.find_all()? {
        println!(
            "  #{} {} ({})",
            employee.id.expect("saved employees have ids"),
            employee.name,
            employee.position
        );
    }
    Ok(())
}

fn open_department(repo: &mut impl DepartmentRepository, name: &str) -> Result<Department> {
    Ok(repo.save(Department::new(name))?)
}

fn print_departments(repo: &impl DepartmentRepository) -> Result<()> {
    println!("{} departments:", repo.count()?);
    for department in repo.find_all()? {
        println!("  {}", department.name);
    }
    Ok(())
}
