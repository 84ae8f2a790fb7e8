//! Routing agent - structured-chat loop over the two QA pipelines

use crate::{AgentError, ChatClient, ChatMessage, GraphQa, Result, RetrievalQa};
use cinegraph_db::Repository;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, instrument};

pub const TOOL_MOVIE_SEARCH: &str = "movie-search";
pub const TOOL_MOVIE_GRAPH: &str = "movie-graph";

const FINAL_ANSWER: &str = "Final Answer";
const DEFAULT_MAX_STEPS: usize = 6;

struct ToolSpec {
    name: &'static str,
    description: &'static str,
}

const TOOLS: [ToolSpec; 2] = [
    ToolSpec {
        name: TOOL_MOVIE_SEARCH,
        description: "Useful when you need to answer questions about movies and their \
                      title as well as their rating and the year they were released. \
                      Use the full question as input.",
    },
    ToolSpec {
        name: TOOL_MOVIE_GRAPH,
        description: "Useful when you need to answer questions about movies and their \
                      genres, their directors or any complex calculations such as \
                      counting the movies people appear in. Use the full question as input.",
    },
];

const SYSTEM_TEMPLATE: &str = r#"Respond to the human as helpfully and accurately as possible. You have access to the following tools:

{tools}

Use a json blob to specify a tool by providing an action key (tool name) and an action_input key (tool input).

Valid "action" values: "Final Answer" or {tool_names}

Provide only ONE action per $JSON_BLOB, as shown:

```
{
  "action": $TOOL_NAME,
  "action_input": $INPUT
}
```

Follow this format:

Question: input question to answer
Thought: consider previous and subsequent steps
Action:
```
$JSON_BLOB
```
Observation: action result
... (repeat Thought/Action/Observation N times)
Thought: I know what to respond
Action:
```
{
  "action": "Final Answer",
  "action_input": "Final response to human"
}
```

Begin! Reminder to ALWAYS respond with a valid json blob of a single action. Use tools if necessary. Respond directly if appropriate. Format is Action:```$JSON_BLOB``` then Observation.
Introduce yourself first and say Hi, I am your local movie boffin and I am here to answer all your questions about movies. Please proceed to ask me a question"#;

/// One action emitted by the model
#[derive(Debug, Deserialize)]
pub struct AgentAction {
    pub action: String,
    #[serde(default)]
    pub action_input: Value,
}

impl AgentAction {
    /// The action input as plain text
    pub fn input_text(&self) -> String {
        match &self.action_input {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

/// The routing agent: per question, the model picks one of the two QA
/// pipelines (or answers directly), observes the result, and repeats until
/// it emits a final answer or hits the step limit.
pub struct RoutingAgent {
    llm: ChatClient,
    retrieval: RetrievalQa,
    graph: GraphQa,
    repo: Repository,
    max_steps: usize,
}

impl RoutingAgent {
    /// Create a new agent over the two pipelines
    pub fn new(
        llm: ChatClient,
        retrieval: RetrievalQa,
        graph: GraphQa,
        repo: Repository,
    ) -> Self {
        Self {
            llm,
            retrieval,
            graph,
            repo,
            max_steps: DEFAULT_MAX_STEPS,
        }
    }

    /// Override the iteration limit
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Answer one question
    #[instrument(skip(self))]
    pub async fn run(&self, question: &str) -> Result<String> {
        info!("Routing question: {}", question);

        let system = system_prompt();
        let mut scratchpad = String::new();

        for step in 0..self.max_steps {
            let user = format!(
                "{}\n\n{}\n(reminder to respond in a JSON blob no matter what)",
                question, scratchpad
            );

            let reply = self
                .llm
                .chat(&[
                    ChatMessage::system(system.clone()),
                    ChatMessage::user(user),
                ])
                .await?;

            let action = parse_action(&reply)?;
            debug!("Step {}: action = {}", step, action.action);

            if action.action == FINAL_ANSWER {
                let answer = action.input_text();
                // Best effort; a logging failure must not fail the answer.
                if let Err(e) = self.repo.record_question(question, &answer).await {
                    debug!("Failed to record question (non-fatal): {}", e);
                }
                return Ok(answer);
            }

            let observation = self.dispatch(&action).await?;
            debug!("Step {}: observation = {}", step, observation);

            scratchpad.push_str(&format!(
                "Action:\n```\n{{\"action\": \"{}\", \"action_input\": {}}}\n```\nObservation: {}\nThought:\n",
                action.action,
                action.action_input,
                observation
            ));
        }

        Err(AgentError::Processing(format!(
            "Agent stopped after reaching the iteration limit ({} steps)",
            self.max_steps
        )))
    }

    /// Run the named tool and return its output as the observation
    async fn dispatch(&self, action: &AgentAction) -> Result<String> {
        let input = action.input_text();
        match action.action.as_str() {
            TOOL_MOVIE_SEARCH => self.retrieval.answer(&input).await,
            TOOL_MOVIE_GRAPH => self.graph.answer(&input).await,
            // An unknown tool name goes back to the model as an observation
            // so it can correct itself on the next step.
            other => Ok(format!(
                "{} is not a valid tool. Valid tools are: {}, {}.",
                other, TOOL_MOVIE_SEARCH, TOOL_MOVIE_GRAPH
            )),
        }
    }
}

/// Render the system prompt with the tool table filled in
fn system_prompt() -> String {
    let tools = TOOLS
        .iter()
        .map(|tool| format!("{}: {}", tool.name, tool.description))
        .collect::<Vec<_>>()
        .join("\n");
    let tool_names = TOOLS
        .iter()
        .map(|tool| tool.name)
        .collect::<Vec<_>>()
        .join(", ");

    SYSTEM_TEMPLATE
        .replace("{tools}", &tools)
        .replace("{tool_names}", &tool_names)
}

/// Parse the model's reply into an action blob.
///
/// The model is told to wrap the blob in a fenced block, but bare JSON and
/// surrounding "Thought:" prose show up in practice, so the payload is cut
/// from the first `{` to the last `}` after fence stripping.
fn parse_action(reply: &str) -> Result<AgentAction> {
    let payload = normalize_json_payload(reply);

    serde_json::from_str(&payload).map_err(|e| {
        AgentError::Processing(format!(
            "Model reply was not a valid action blob: {} ({})",
            reply, e
        ))
    })
}

fn normalize_json_payload(payload: &str) -> String {
    let trimmed = payload.trim();
    if trimmed.is_empty() {
        return trimmed.to_string();
    }

    let without_fence = if let Some(start) = trimmed.find("```") {
        let after = &trimmed[start + 3..];
        let body = match after.find("```") {
            Some(end) => &after[..end],
            None => after,
        };
        // Drop a possible language tag on the fence line
        let body = body.strip_prefix("json").unwrap_or(body);
        body.trim().to_string()
    } else {
        trimmed.to_string()
    };

    if let (Some(start), Some(end)) = (without_fence.find('{'), without_fence.rfind('}')) {
        if start < end {
            return without_fence[start..=end].to_string();
        }
    }

    without_fence
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fenced_action() {
        let reply = "Thought: I should search.\nAction:\n```\n{\"action\": \"movie-search\", \"action_input\": \"best rated movie\"}\n```";
        let action = parse_action(reply).unwrap();

        assert_eq!(action.action, "movie-search");
        assert_eq!(action.input_text(), "best rated movie");
    }

    #[test]
    fn test_parse_fenced_action_with_language_tag() {
        let reply = "```json\n{\"action\": \"movie-graph\", \"action_input\": \"how many movies\"}\n```";
        let action = parse_action(reply).unwrap();

        assert_eq!(action.action, "movie-graph");
    }

    #[test]
    fn test_parse_bare_action() {
        let reply = "{\"action\": \"Final Answer\", \"action_input\": \"Toy Story\"}";
        let action = parse_action(reply).unwrap();

        assert_eq!(action.action, "Final Answer");
        assert_eq!(action.input_text(), "Toy Story");
    }

    #[test]
    fn test_parse_prose_is_an_error() {
        let reply = "I think the answer is Toy Story.";
        assert!(parse_action(reply).is_err());
    }

    #[test]
    fn test_missing_action_input_defaults_to_null() {
        let reply = "{\"action\": \"movie-search\"}";
        let action = parse_action(reply).unwrap();

        assert_eq!(action.input_text(), "null");
    }

    #[test]
    fn test_system_prompt_lists_tools() {
        let prompt = system_prompt();

        assert!(prompt.contains("movie-search:"));
        assert!(prompt.contains("movie-graph:"));
        assert!(prompt.contains("\"Final Answer\" or movie-search, movie-graph"));
        assert!(!prompt.contains("{tools}"));
        assert!(!prompt.contains("{tool_names}"));
    }
}
