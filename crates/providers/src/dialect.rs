//! Wire dialects of the Google AI prediction endpoint.
//!
//! The endpoint speaks three structurally disjoint dialects: plain
//! completion (`text-bison`), chat (`chat-bison`) and embedding
//! (`textembedding-gecko`). [`ModelVariant`] names the dialect; each variant
//! has exactly one request builder and one response mapper here.
//!
//! Field names are fixed by the provider and must stay bit-exact.

use promptwire_core::provider::char_count;
use promptwire_core::{EmbedResult, GenerateResult, GeneratedText, ProviderError, Usage, ValidationError};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::options::{GenerateModel, GoogleAiOptions};

/// Provider hard limit on stop sequences per completion/chat request.
pub const MAX_STOP_SEQUENCES: usize = 4;

/// The request/response dialect used for a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelVariant {
    Completion,
    Chat,
    Embedding,
}

impl ModelVariant {
    /// Dialect for a generation model: chat for the chat model, completion otherwise.
    pub fn for_model(model: GenerateModel) -> Self {
        match model {
            GenerateModel::ChatBison => Self::Chat,
            GenerateModel::TextBison => Self::Completion,
        }
    }

    /// Build the request payload for this dialect.
    ///
    /// Stop sequences are ignored by the embedding dialect.
    pub fn build(
        self,
        text: &str,
        options: &GoogleAiOptions,
        stop_sequences: &[String],
    ) -> Result<DialectRequest, ValidationError> {
        Ok(match self {
            Self::Completion => DialectRequest::Completion(build_completion(text, options, stop_sequences)?),
            Self::Chat => DialectRequest::Chat(build_chat(text, options, stop_sequences)?),
            Self::Embedding => DialectRequest::Embedding(build_embedding(text)),
        })
    }

    /// Decode a raw response body in this dialect.
    pub fn parse(self, body: serde_json::Value) -> Result<DialectResponse, ProviderError> {
        fn decode<T: serde::de::DeserializeOwned>(body: serde_json::Value) -> Result<T, ProviderError> {
            serde_json::from_value(body)
                .map_err(|e| ProviderError::MalformedResponse(format!("Failed to parse response: {e}")))
        }

        Ok(match self {
            Self::Completion => DialectResponse::Completion(decode(body)?),
            Self::Chat => DialectResponse::Chat(decode(body)?),
            Self::Embedding => DialectResponse::Embedding(decode(body)?),
        })
    }
}

// --- Requests ---

/// Sampling parameters shared by the completion and chat dialects.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameters {
    pub max_output_tokens: u32,
    pub temperature: f64,
    pub top_p: f64,
    pub top_k: u32,
}

impl From<&GoogleAiOptions> for Parameters {
    fn from(opt: &GoogleAiOptions) -> Self {
        Self {
            max_output_tokens: opt.max_tokens,
            temperature: opt.temperature,
            top_p: opt.top_p,
            top_k: opt.top_k,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub instances: Vec<CompletionInstance>,
    pub parameters: Parameters,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionInstance {
    pub prompt: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub instances: Vec<ChatInstance>,
    pub parameters: Parameters,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatInstance {
    pub context: String,
    pub examples: Vec<ChatExample>,
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatExample {
    pub input: ChatContent,
    pub output: ChatContent,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatContent {
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub author: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmbedRequest {
    pub instances: Vec<EmbedInstance>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmbedInstance {
    pub content: String,
}

/// A request payload in one of the three dialects.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DialectRequest {
    Completion(CompletionRequest),
    Chat(ChatRequest),
    Embedding(EmbedRequest),
}

fn check_stop_sequences(stop_sequences: &[String]) -> Result<(), ValidationError> {
    if stop_sequences.len() > MAX_STOP_SEQUENCES {
        return Err(ValidationError::TooManyStopSequences {
            count: stop_sequences.len(),
            max: MAX_STOP_SEQUENCES,
        });
    }
    Ok(())
}

/// Completion payload: the prompt verbatim plus sampling parameters.
pub fn build_completion(
    prompt: &str,
    options: &GoogleAiOptions,
    stop_sequences: &[String],
) -> Result<CompletionRequest, ValidationError> {
    check_stop_sequences(stop_sequences)?;
    Ok(CompletionRequest {
        instances: vec![CompletionInstance {
            prompt: prompt.to_string(),
        }],
        parameters: options.into(),
    })
}

/// Chat payload: the prompt as the single `context`, no examples or history.
pub fn build_chat(
    prompt: &str,
    options: &GoogleAiOptions,
    stop_sequences: &[String],
) -> Result<ChatRequest, ValidationError> {
    check_stop_sequences(stop_sequences)?;
    Ok(ChatRequest {
        instances: vec![ChatInstance {
            context: prompt.to_string(),
            examples: Vec::new(),
            messages: Vec::new(),
        }],
        parameters: options.into(),
    })
}

/// Embedding payload for exactly one string. Size limits are checked by the caller.
pub fn build_embedding(text: &str) -> EmbedRequest {
    EmbedRequest {
        instances: vec![EmbedInstance {
            content: text.to_string(),
        }],
    }
}

// --- Responses ---

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SafetyAttributes {
    #[serde(default)]
    pub blocked: bool,
    #[serde(default)]
    pub categories: Vec<serde_json::Value>,
    #[serde(default)]
    pub scores: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CompletionResponse {
    pub predictions: Vec<CompletionPrediction>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionPrediction {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub safety_attributes: Option<SafetyAttributes>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    pub predictions: Vec<ChatPrediction>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatPrediction {
    #[serde(default)]
    pub candidates: Vec<ChatCandidate>,
    #[serde(default)]
    pub citation_metadata: Vec<serde_json::Value>,
    #[serde(default)]
    pub safety_attributes: Option<SafetyAttributes>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatCandidate {
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmbedResponse {
    #[serde(default)]
    pub model: Option<String>,
    pub predictions: Vec<EmbedPrediction>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmbedPrediction {
    pub embeddings: EmbedValues,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmbedValues {
    pub values: Vec<f32>,
}

/// A decoded response in one of the three dialects.
#[derive(Debug, Clone)]
pub enum DialectResponse {
    Completion(CompletionResponse),
    Chat(ChatResponse),
    Embedding(EmbedResponse),
}

impl DialectResponse {
    /// Map a completion or chat response into the uniform generation result.
    pub fn into_generate_result(
        self,
        prompt: &str,
        session_id: Option<String>,
    ) -> Result<GenerateResult, ProviderError> {
        match self {
            Self::Completion(res) => Ok(map_completion(prompt, res, session_id)),
            Self::Chat(res) => map_chat(prompt, res, session_id),
            Self::Embedding(_) => Err(ProviderError::MalformedResponse(
                "embedding response carries no generated text".into(),
            )),
        }
    }

    /// Map an embedding response into the uniform embedding result.
    pub fn into_embed_result(
        self,
        texts: Vec<String>,
        session_id: Option<String>,
    ) -> Result<EmbedResult, ProviderError> {
        match self {
            Self::Embedding(res) => Ok(map_embedding(texts, res, session_id)),
            Self::Completion(_) | Self::Chat(_) => Err(ProviderError::MalformedResponse(
                "text generation response carries no embedding".into(),
            )),
        }
    }
}

fn warn_if_blocked(safety: Option<&SafetyAttributes>) {
    if let Some(safety) = safety.filter(|s| s.blocked) {
        warn!(categories = ?safety.categories, "Prediction blocked by provider safety filters");
    }
}

/// One result per prediction; completion tokens are the summed content lengths.
pub fn map_completion(
    prompt: &str,
    response: CompletionResponse,
    session_id: Option<String>,
) -> GenerateResult {
    let prompt_tokens = char_count(prompt);
    let completion_tokens = response
        .predictions
        .iter()
        .map(|p| char_count(&p.content))
        .fold(0u32, u32::saturating_add);

    let results = response
        .predictions
        .into_iter()
        .map(|p| {
            warn_if_blocked(p.safety_attributes.as_ref());
            GeneratedText::new(p.content)
        })
        .collect();

    GenerateResult {
        session_id,
        results,
        usage: Usage::new(prompt_tokens, completion_tokens),
    }
}

/// One result per prediction taken from its first candidate only, while
/// completion tokens count every candidate of every prediction.
pub fn map_chat(
    prompt: &str,
    response: ChatResponse,
    session_id: Option<String>,
) -> Result<GenerateResult, ProviderError> {
    let prompt_tokens = char_count(prompt);
    let completion_tokens = response
        .predictions
        .iter()
        .flat_map(|p| p.candidates.iter())
        .map(|c| char_count(&c.content))
        .fold(0u32, u32::saturating_add);

    let results = response
        .predictions
        .into_iter()
        .map(|p| {
            warn_if_blocked(p.safety_attributes.as_ref());
            p.candidates
                .into_iter()
                .next()
                .map(|c| GeneratedText::new(c.content))
                .ok_or_else(|| ProviderError::MalformedResponse("chat prediction has no candidates".into()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(GenerateResult {
        session_id,
        results,
        usage: Usage::new(prompt_tokens, completion_tokens),
    })
}

/// First prediction's vector (or empty); usage counts the input characters only.
pub fn map_embedding(texts: Vec<String>, response: EmbedResponse, session_id: Option<String>) -> EmbedResult {
    let prompt_tokens = texts.first().map_or(0, |t| char_count(t));
    let embedding = response
        .predictions
        .into_iter()
        .next()
        .map(|p| p.embeddings.values)
        .unwrap_or_default();

    EmbedResult {
        session_id,
        texts,
        embedding,
        usage: Usage::new(prompt_tokens, 0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn stops(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("STOP{i}")).collect()
    }

    #[test]
    fn variant_selection() {
        assert_eq!(ModelVariant::for_model(GenerateModel::ChatBison), ModelVariant::Chat);
        assert_eq!(ModelVariant::for_model(GenerateModel::TextBison), ModelVariant::Completion);
    }

    #[test]
    fn completion_payload_shape() {
        let req = build_completion("Say hi", &GoogleAiOptions::default(), &[]).unwrap();
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(
            json,
            json!({
                "instances": [{"prompt": "Say hi"}],
                "parameters": {"maxOutputTokens": 300, "temperature": 0.45, "topP": 1.0, "topK": 40}
            })
        );
    }

    #[test]
    fn sampling_values_reach_the_wire_unchanged() {
        let options = GoogleAiOptions {
            top_p: 0.95,
            ..GoogleAiOptions::creative()
        };
        let req = build_chat("x", &options, &[]).unwrap();

        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["parameters"]["temperature"], json!(0.9));
        assert_eq!(value["parameters"]["topP"], json!(0.95));

        let text = serde_json::to_string(&value).unwrap();
        assert!(text.contains(r#""temperature":0.9,"#), "{text}");
    }

    #[test]
    fn chat_payload_shape() {
        let req = build_chat("You are helpful", &GoogleAiOptions::default(), &[]).unwrap();
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(
            json["instances"],
            json!([{"context": "You are helpful", "examples": [], "messages": []}])
        );
        assert_eq!(json["parameters"]["maxOutputTokens"], 300);
        assert!(json["instances"][0].get("prompt").is_none());
    }

    #[test]
    fn embedding_payload_shape() {
        let json = serde_json::to_value(build_embedding("vector me")).unwrap();
        assert_eq!(json, json!({"instances": [{"content": "vector me"}]}));
    }

    #[test]
    fn untagged_request_serializes_inner_shape() {
        let req = ModelVariant::Embedding
            .build("x", &GoogleAiOptions::default(), &stops(9))
            .unwrap();
        assert_eq!(serde_json::to_value(req).unwrap(), json!({"instances": [{"content": "x"}]}));
    }

    #[test]
    fn four_stop_sequences_allowed_five_rejected() {
        let opts = GoogleAiOptions::default();
        assert!(build_completion("p", &opts, &stops(4)).is_ok());
        assert!(build_chat("p", &opts, &stops(4)).is_ok());

        let err = build_completion("p", &opts, &stops(5)).unwrap_err();
        assert_eq!(err, ValidationError::TooManyStopSequences { count: 5, max: 4 });
        let err = build_chat("p", &opts, &stops(5)).unwrap_err();
        assert_eq!(err, ValidationError::TooManyStopSequences { count: 5, max: 4 });
    }

    #[test]
    fn completion_mapping_counts_characters() {
        let res: CompletionResponse = serde_json::from_value(json!({
            "predictions": [
                {"content": "abc", "safetyAttributes": {"blocked": false, "categories": [], "scores": []}},
                {"content": "de"}
            ]
        }))
        .unwrap();
        let out = map_completion("hello", res, Some("s1".into()));
        assert_eq!(out.session_id.as_deref(), Some("s1"));
        assert_eq!(out.results, vec![GeneratedText::new("abc"), GeneratedText::new("de")]);
        assert_eq!(out.usage, Usage::new(5, 5));
        assert_eq!(out.usage.total_tokens(), 10);
    }

    #[test]
    fn chat_mapping_surfaces_first_candidate_but_counts_all() {
        let res: ChatResponse = serde_json::from_value(json!({
            "predictions": [
                {"candidates": [{"content": "first"}, {"content": "ignored"}], "citationMetadata": []},
                {"candidates": [{"content": "second"}, {"content": "xy"}]}
            ]
        }))
        .unwrap();
        let out = map_chat("q", res, None).unwrap();
        assert_eq!(out.results.len(), 2);
        assert_eq!(out.results[0].text, "first");
        assert_eq!(out.results[1].text, "second");
        // 5 + 7 + 6 + 2
        assert_eq!(out.usage.completion_tokens(), 20);
        assert_eq!(out.usage.total_tokens(), 21);
    }

    #[test]
    fn chat_prediction_without_candidates_is_malformed() {
        let res: ChatResponse = serde_json::from_value(json!({"predictions": [{"candidates": []}]})).unwrap();
        let err = map_chat("q", res, None).unwrap_err();
        assert!(matches!(err, ProviderError::MalformedResponse(_)));
    }

    #[test]
    fn embedding_mapping_takes_first_prediction() {
        let res: EmbedResponse = serde_json::from_value(json!({
            "model": "textembedding-gecko",
            "predictions": [
                {"embeddings": {"values": [0.1, 0.2]}},
                {"embeddings": {"values": [0.9]}}
            ]
        }))
        .unwrap();
        let out = map_embedding(vec!["four".into()], res, None);
        assert_eq!(out.embedding, vec![0.1, 0.2]);
        assert_eq!(out.usage, Usage::new(4, 0));
        assert_eq!(out.usage.total_tokens(), 4);
    }

    #[test]
    fn embedding_mapping_without_predictions_is_empty() {
        let res: EmbedResponse = serde_json::from_value(json!({"predictions": []})).unwrap();
        let out = map_embedding(vec!["abc".into()], res, None);
        assert!(out.embedding.is_empty());
        assert_eq!(out.usage.prompt_tokens(), 3);
    }

    #[test]
    fn parse_rejects_wrong_shape() {
        let err = ModelVariant::Completion
            .parse(json!({"unexpected": true}))
            .unwrap_err();
        assert!(matches!(err, ProviderError::MalformedResponse(_)));
    }

    #[test]
    fn embedding_response_cannot_become_generate_result() {
        let parsed = ModelVariant::Embedding
            .parse(json!({"predictions": []}))
            .unwrap();
        assert!(parsed.into_generate_result("p", None).is_err());
    }
}
