use serde::{Deserialize, Serialize};

// Yandex Foundation Models completion request
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CompletionRequest {
    pub folder_id: String,
    pub model_uri: String,
    pub completion_options: CompletionOptions,
    pub messages: Vec<CompletionMessage>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CompletionOptions {
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct CompletionMessage {
    #[serde(default)]
    pub role: String,
    pub text: String,
}

// Response shape: result.alternatives[0].message.text
#[derive(Debug, Default, Deserialize)]
pub(crate) struct CompletionResponse {
    #[serde(default)]
    pub result: CompletionResult,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct CompletionResult {
    #[serde(default)]
    pub alternatives: Vec<Alternative>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Alternative {
    pub message: Option<CompletionMessage>,
}
