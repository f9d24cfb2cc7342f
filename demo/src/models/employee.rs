use restrepo::{Entity, RestEntity};

/// An employee record, exposed as the `employees` REST resource.
#[derive(Debug, Clone, RestEntity)]
pub struct Employee {
    pub id: Option<i64>,
    pub name: String,
    pub position: String,
}

impl Employee {
    pub fn new(name: impl Into<String>, position: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            position: position.into(),
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
