use mineai_protocol::{BoardState, Move, MoveBatch};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::*;

pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const FUNCTION_NAME: &str = "action_mine";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeminiConfig {
    pub endpoint: String,
    pub model: String,
    pub api_key: String,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.into(),
            model: DEFAULT_MODEL.into(),
            api_key: api_key.into(),
        }
    }
}

/// Move advisor backed by the Gemini `generateContent` API with a single function tool.
#[derive(Debug, Clone)]
pub struct GeminiAdvisor {
    client: Client,
    config: GeminiConfig,
}

impl GeminiAdvisor {
    pub fn new(config: GeminiConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(AgentError::CollaboratorUnavailable(
                "no API key configured".into(),
            ));
        }
        Ok(Self {
            client: Client::new(),
            config,
        })
    }

    fn url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.endpoint.trim_end_matches('/'),
            self.config.model
        )
    }
}

impl MoveAdvisor for GeminiAdvisor {
    async fn suggest_moves(&self, state: &BoardState) -> Result<Vec<Move>> {
        let request = GenerateContentRequest::for_board(state);
        log::debug!("asking {} for moves", self.config.model);

        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", &self.config.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log::error!("Gemini API error {}: {}", status, body);
            return Err(AgentError::CollaboratorUnavailable(format!(
                "HTTP {status}"
            )));
        }

        let reply: GenerateContentResponse = response.json().await?;
        let moves = reply.into_moves()?;
        log::debug!("received {} moves", moves.len());
        Ok(moves)
    }
}

pub fn build_prompt(state: &BoardState) -> String {
    format!(
        "You are playing Minesweeper. Propose the next best moves for the board below, each one \
         a decision 'F' (flag) or 'O' (open) with a row and col. The board is a 2D array indexed \
         [row][col]: 'E' is a closed cell, 'F' a flagged cell, 'O' an opened cell with no \
         adjacent mines, and a number is an opened cell with that many adjacent mines. Return one \
         or more moves that can be applied in order without human input.\n{}",
        state.to_json()
    )
}

fn action_mine_declaration() -> Value {
    json!({
        "name": FUNCTION_NAME,
        "description": "Applies the moves chosen for the current board.",
        "parameters": {
            "type": "OBJECT",
            "properties": {
                "moves": {
                    "type": "ARRAY",
                    "description": "Ordered list of moves to apply one after another.",
                    "items": {
                        "type": "OBJECT",
                        "properties": {
                            "decision": {
                                "type": "STRING",
                                "enum": ["F", "O"],
                                "description": "F flags the cell, O opens it.",
                            },
                            "row": {
                                "type": "INTEGER",
                                "description": "Row index of the cell.",
                            },
                            "col": {
                                "type": "INTEGER",
                                "description": "Column index of the cell.",
                            },
                        },
                        "required": ["decision", "row", "col"],
                    },
                },
            },
            "required": ["moves"],
        },
    })
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    tools: Vec<Tool>,
    tool_config: ToolConfig,
}

impl GenerateContentRequest {
    fn for_board(state: &BoardState) -> Self {
        Self {
            contents: vec![Content {
                role: Some("user".into()),
                parts: vec![Part {
                    text: Some(build_prompt(state)),
                    function_call: None,
                }],
            }],
            tools: vec![Tool {
                function_declarations: vec![action_mine_declaration()],
            }],
            tool_config: ToolConfig {
                function_calling_config: FunctionCallingConfig {
                    mode: "ANY".into(),
                    allowed_function_names: vec![FUNCTION_NAME.into()],
                },
            },
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Tool {
    function_declarations: Vec<Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ToolConfig {
    function_calling_config: FunctionCallingConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FunctionCallingConfig {
    mode: String,
    allowed_function_names: Vec<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    function_call: Option<FunctionCall>,
}

#[derive(Debug, Serialize, Deserialize)]
struct FunctionCall {
    name: String,
    #[serde(default)]
    args: Value,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
}

impl GenerateContentResponse {
    /// Decodes the first function call into moves.
    fn into_moves(self) -> Result<Vec<Move>> {
        let call = self
            .candidates
            .into_iter()
            .filter_map(|candidate| candidate.content)
            .flat_map(|content| content.parts)
            .find_map(|part| part.function_call)
            .ok_or_else(|| AgentError::NoAiMove("no function call in the response".into()))?;

        if call.name != FUNCTION_NAME {
            log::warn!("unexpected function call {}, decoding anyway", call.name);
        }

        let batch: MoveBatch = serde_json::from_value(call.args)
            .map_err(|err| AgentError::NoAiMove(format!("malformed moves: {err}")))?;

        if batch.moves.is_empty() {
            return Err(AgentError::NoAiMove("empty move list".into()));
        }
        Ok(batch.moves)
    }
}
