//! Relation kinds - edges between catalog entities

use serde::{Deserialize, Serialize};

/// Types of relations in the movie graph
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    /// Person directed a movie
    Directed,
    /// Person acted in a movie
    ActedIn,
    /// Movie belongs to a genre
    InGenre,
}

impl RelationKind {
    /// The relation table this kind is stored in
    pub fn table(&self) -> &'static str {
        match self {
            RelationKind::Directed => "directed",
            RelationKind::ActedIn => "acted_in",
            RelationKind::InGenre => "in_genre",
        }
    }
}

impl std::fmt::Display for RelationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.table())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relation_table_names() {
        assert_eq!(RelationKind::Directed.table(), "directed");
        assert_eq!(RelationKind::ActedIn.table(), "acted_in");
        assert_eq!(RelationKind::InGenre.table(), "in_genre");
    }

    #[test]
    fn test_relation_display() {
        assert_eq!(RelationKind::InGenre.to_string(), "in_genre");
    }
}
