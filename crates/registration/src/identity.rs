use fake::faker::name::en::{FirstName, LastName};
use fake::Fake;

/// Throwaway person used to fill the name fields of the signup form.
#[derive(Debug, Clone)]
pub struct Identity {
    pub first_name: String,
    pub last_name: String,
}

impl Identity {
    pub fn generate() -> Self {
        Self {
            first_name: FirstName().fake(),
            last_name: LastName().fake(),
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
