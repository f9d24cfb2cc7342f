use restrepo::{Entity, RestEntity};

/// A department, exposed as the `departments` REST resource.
#[derive(Debug, Clone, RestEntity)]
pub struct Department {
    pub id: Option<i64>,
    pub name: String,
}

impl Department {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
        }
    }
}

impl Entity<i64> for Department {
    fn id(&self) -> Option<i64> {
        self.id
    }

    fn assign_id(&mut self, id: i64) {
        self.id = Some(id);
    }
}
