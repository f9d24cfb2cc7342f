//! The runtime half of the generated-repository contract, exercised end to
//! end: a derived entity, a resource trait in the exact shape the build-time
//! generator emits, discovery, and CRUD through the blanket impl.

use restrepo::{Entity, InMemoryRepository, Repository, RepositoryError, RestEntity};

#[derive(Debug, Clone, RestEntity)]
pub struct Employee {
    pub id: Option<i64>,
    pub name: String,
    pub position: String,
}

impl Employee {
    fn new(name: &str, position: &str) -> Self {
        Self {
            id: None,
            name: name.to_string(),
            position: position.to_string(),
        }
    }
}

impl Entity<i64> for Employee {
    fn id(&self) -> Option<i64> {
        self.id
    }

    fn assign_id(&mut self, id: i64) {
        self.id = Some(id);
    }
}

#[derive(Debug, Clone, RestEntity)]
pub struct Company {
    pub id: Option<i64>,
    pub name: String,
}

impl Entity<i64> for Company {
    fn id(&self) -> Option<i64> {
        self.id
    }

    fn assign_id(&mut self, id: i64) {
        self.id = Some(id);
    }
}

#[restrepo::rest_resource]
pub trait EmployeeRepository: restrepo::Repository<Employee, i64> {}

#[restrepo::rest_resource]
pub trait CompanyRepository: restrepo::Repository<Company, i64> {}

/// Generic code can require the named repository instead of the raw
/// `Repository<Employee, i64>` bound.
fn hire<R: EmployeeRepository>(
    repo: &mut R,
    name: &str,
    position: &str,
) -> Result<Employee, RepositoryError> {
    repo.save(Employee::new(name, position))
}

#[test]
fn any_matching_repository_satisfies_the_resource_trait() {
    let mut repo = InMemoryRepository::new();

    let first = hire(&mut repo, "Ada", "engineer").unwrap();
    let second = hire(&mut repo, "Grace", "admiral").unwrap();
    assert_eq!(first.id, Some(1));
    assert_eq!(second.id, Some(2));

    let all = repo.find_all().unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].name, "Ada");
    assert_eq!(all[1].position, "admiral");
}

#[test]
fn the_trait_is_usable_as_a_trait_object() {
    let mut backing: InMemoryRepository<Employee> = InMemoryRepository::new();
    let repo: &mut dyn EmployeeRepository = &mut backing;

    let saved = repo.save(Employee::new("Ada", "engineer")).unwrap();
    assert!(repo.exists_by_id(&saved.id.unwrap()).unwrap());
    assert_eq!(repo.count().unwrap(), 1);
}

#[test]
fn deleting_an_unknown_employee_is_not_found() {
    let mut repo: InMemoryRepository<Employee> = InMemoryRepository::new();
    let err = repo.delete_by_id(&7).unwrap_err();
    assert!(matches!(err, RepositoryError::NotFound { .. }));
}

#[test]
fn resources_register_themselves_for_discovery() {
    assert!(restrepo::is_resource_registered::<Employee>());
    assert!(restrepo::is_resource_registered::<Company>());
    assert!(!restrepo::is_resource_registered::<String>());

    let employees = restrepo::resource_by_rel("employees").expect("employees resource");
    assert_eq!(employees.repository_name, "EmployeeRepository");
    assert_eq!(employees.entity_name, "Employee");
    assert_eq!(employees.path(), "/employees");

    assert!(restrepo::resource_by_name("EmployeeRepository").is_some());
    assert!(restrepo::resource_by_name("PayrollRepository").is_none());
}

#[test]
fn each_resource_trait_binds_to_its_own_entity() {
    let mut backing: InMemoryRepository<Company> = InMemoryRepository::new();
    let repo: &mut dyn CompanyRepository = &mut backing;

    let saved = repo
        .save(Company {
            id: None,
            name: "Initech".to_string(),
        })
        .unwrap();
    assert_eq!(saved.id, Some(1));
    assert_eq!(saved.name, "Initech");
}

#[test]
fn rels_follow_english_pluralization() {
    // Company -> companies, not companys.
    let companies = restrepo::resource_by_rel("companies").expect("companies resource");
    assert_eq!(companies.entity_name, "Company");
    assert!(restrepo::resource_by_rel("companys").is_none());
}
