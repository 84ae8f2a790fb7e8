//! Person records - directors and actors

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// A person referenced by the catalog as a director or actor.
///
/// People are merged idempotently by name: the first reference creates the
/// record, later references reuse it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
    /// Unique identifier
    pub id: Option<RecordId>,

    /// Display name, as it appears in the catalog (trimmed)
    pub name: String,
}

impl Person {
    /// Create a new person
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into().trim().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_person_creation_trims_name() {
        let person = Person::new("  John Lasseter ");

        assert_eq!(person.name, "John Lasseter");
        assert!(person.id.is_none());
    }
}
