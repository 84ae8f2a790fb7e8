//! Graph QA pipeline - natural language to SurrealQL, execute, synthesize

use crate::{AgentError, ChatClient, ChatMessage, Result};
use cinegraph_db::Repository;
use tracing::{debug, info, instrument};

/// Schema description handed to the model when generating queries.
///
/// Only SELECT statements are acceptable output; the guard below rejects
/// anything else before it reaches the store.
const SCHEMA_PROMPT: &str = r#"You translate questions about movies into a single SurrealQL SELECT statement.

The database schema:

Tables:
- movie: movie_id (string), title (string), released (ISO date string), imdb_rating (float, may be NONE)
- person: name (string)
- genre: name (string)

Graph relations (usable with the -> and <- arrow syntax):
- person ->directed-> movie
- person ->acted_in-> movie
- movie ->in_genre-> genre

Example queries:
- Movies directed by someone:
  SELECT title FROM movie WHERE <-directed<-(person WHERE name = 'Joe Johnston')
- How many movies a person acted in:
  SELECT name, array::len(->acted_in->movie) AS roles FROM person WHERE name = 'Tom Hanks'
- Movies in a genre, best rated first:
  SELECT title, imdb_rating FROM movie WHERE ->in_genre->(genre WHERE name = 'Comedy') ORDER BY imdb_rating DESC

Respond with exactly one SELECT statement and nothing else. No explanations, no markdown."#;

/// Answers questions by generating and executing a graph query.
pub struct GraphQa {
    repo: Repository,
    llm: ChatClient,
}

impl GraphQa {
    /// Create a new graph pipeline
    pub fn new(repo: Repository, llm: ChatClient) -> Self {
        Self { repo, llm }
    }

    /// Answer a question by querying the graph
    #[instrument(skip(self))]
    pub async fn answer(&self, question: &str) -> Result<String> {
        info!("Graph QA: {}", question);

        let statement = self.generate_query(question).await?;
        debug!("Generated query: {}", statement);

        // A malformed generated statement surfaces the store's error as-is.
        let rows = self.repo.run_select(&statement).await?;
        debug!("Query returned: {}", rows);

        let system = format!(
            "The following JSON is the result of a movie database query run for the \
             user's question. Base your answer only on it. If it is empty, just say \
             that you don't know.\n\nQuery result:\n{}",
            rows
        );

        self.llm
            .chat(&[ChatMessage::system(system), ChatMessage::user(question)])
            .await
    }

    /// Ask the model for a SELECT statement answering the question
    async fn generate_query(&self, question: &str) -> Result<String> {
        let reply = self
            .llm
            .chat(&[
                ChatMessage::system(SCHEMA_PROMPT),
                ChatMessage::user(question),
            ])
            .await?;

        let statement = extract_statement(&reply);
        ensure_select(&statement)?;
        Ok(statement)
    }
}

/// Strip code fences and surrounding whitespace from a generated statement
fn extract_statement(reply: &str) -> String {
    let trimmed = reply.trim();

    let without_fence = if trimmed.starts_with("```") {
        let mut lines = trimmed.lines();
        let _ = lines.next(); // drop ``` or ```sql / ```surql
        let mut content = lines.collect::<Vec<_>>().join("\n");
        if content.ends_with("```") {
            content.truncate(content.len().saturating_sub(3));
        }
        content.trim().to_string()
    } else {
        trimmed.to_string()
    };

    without_fence.trim_end_matches(';').trim().to_string()
}

/// Reject anything that is not a SELECT statement.
///
/// Generated writes are outside this pipeline's contract.
fn ensure_select(statement: &str) -> Result<()> {
    let head = statement
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_ascii_uppercase();

    if head != "SELECT" {
        return Err(AgentError::Processing(format!(
            "Generated statement is not a SELECT: {}",
            statement
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_bare_statement() {
        assert_eq!(
            extract_statement("SELECT title FROM movie;"),
            "SELECT title FROM movie"
        );
    }

    #[test]
    fn test_extract_fenced_statement() {
        let reply = "```sql\nSELECT title FROM movie\n```";
        assert_eq!(extract_statement(reply), "SELECT title FROM movie");
    }

    #[test]
    fn test_extract_fenced_without_language_tag() {
        let reply = "```\nSELECT name FROM person\n```";
        assert_eq!(extract_statement(reply), "SELECT name FROM person");
    }

    #[test]
    fn test_select_guard_accepts_select() {
        assert!(ensure_select("SELECT * FROM movie").is_ok());
        assert!(ensure_select("select title from movie").is_ok());
    }

    #[test]
    fn test_select_guard_rejects_writes() {
        assert!(ensure_select("DELETE movie").is_err());
        assert!(ensure_select("UPDATE movie SET title = 'x'").is_err());
    }

    #[test]
    fn test_select_guard_rejects_prose() {
        assert!(ensure_select("Here is the query you asked for").is_err());
        assert!(ensure_select("").is_err());
    }
}
