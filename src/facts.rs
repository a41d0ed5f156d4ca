//! Dino facts for the game-over screen
//!
//! A [`FactSource`] produces one short line of text asynchronously. The only
//! real source is Gemini's `generateContent` endpoint, reached with the
//! browser's `fetch`; without an API key the source is simply absent and the
//! player sees a fixed line instead.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::error::FactError;

/// Model used for facts
pub const MODEL: &str = "gemini-2.5-flash";

/// The one and only prompt
pub const PROMPT: &str = "Tell me a very short, fun, and simple fact about dinosaurs for a 4-year-old boy. Keep it under 20 words. Be enthusiastic!";

const ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Something that can come up with a dino fact
pub trait FactSource {
    fn generate(&self) -> impl Future<Output = Result<String, FactError>>;
}

/// `None` is an unconfigured source
impl<S: FactSource> FactSource for Option<S> {
    async fn generate(&self) -> Result<String, FactError> {
        match self {
            Some(source) => source.generate().await,
            None => Err(FactError::Unconfigured),
        }
    }
}

/// Always returns the same line (headless runs, tests)
#[derive(Debug, Clone)]
pub struct FixedFact(pub String);

impl FactSource for FixedFact {
    async fn generate(&self) -> Result<String, FactError> {
        Ok(self.0.clone())
    }
}

/// Text to show for a finished request
pub fn display_text(result: Result<String, FactError>) -> String {
    match result {
        Ok(text) => text,
        Err(e) => {
            log::warn!("Dino fact unavailable: {e}");
            e.fallback_text().to_string()
        }
    }
}

// === Gemini wire format ===

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub thinking_config: ThinkingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ThinkingConfig {
    pub thinking_budget: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Content,
}

impl GenerateRequest {
    /// The fact prompt with thinking disabled for a fast answer
    pub fn dino_fact() -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(PROMPT.to_string()),
                }],
            }],
            generation_config: Some(GenerationConfig {
                thinking_config: ThinkingConfig { thinking_budget: 0 },
            }),
        }
    }
}

/// Extract the fact from a response body
pub fn parse_response(body: &str) -> Result<String, FactError> {
    let response: GenerateResponse =
        serde_json::from_str(body).map_err(|e| FactError::Parse(e.to_string()))?;

    let text: String = response
        .candidates
        .first()
        .map(|c| {
            c.content
                .parts
                .iter()
                .filter_map(|p| p.text.as_deref())
                .collect()
        })
        .unwrap_or_default();

    let text = text.trim();
    if text.is_empty() {
        Err(FactError::Empty)
    } else {
        Ok(text.to_string())
    }
}

/// Gemini-backed fact source
#[derive(Debug, Clone)]
pub struct GeminiFacts {
    #[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
    api_key: String,
    model: String,
}

impl GeminiFacts {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: MODEL.to_string(),
        }
    }

    /// Source configured at build time through `DINOBUS_API_KEY`
    pub fn from_build_env() -> Option<Self> {
        Self::from_key(option_env!("DINOBUS_API_KEY"))
    }

    /// `None` for a missing or blank key
    pub fn from_key(key: Option<&str>) -> Option<Self> {
        key.map(str::trim)
            .filter(|k| !k.is_empty())
            .map(Self::new)
    }

    pub fn url(&self) -> String {
        format!("{ENDPOINT}/{}:generateContent", self.model)
    }
}

impl FactSource for GeminiFacts {
    #[cfg(target_arch = "wasm32")]
    async fn generate(&self) -> Result<String, FactError> {
        let body = serde_json::to_string(&GenerateRequest::dino_fact())
            .map_err(|e| FactError::Parse(e.to_string()))?;
        let text = web::post_json(&self.url(), &self.api_key, &body).await?;
        parse_response(&text)
    }

    #[cfg(not(target_arch = "wasm32"))]
    async fn generate(&self) -> Result<String, FactError> {
        Err(FactError::Transport(
            "no HTTP transport in native builds".to_string(),
        ))
    }
}

#[cfg(target_arch = "wasm32")]
mod web {
    use wasm_bindgen::{JsCast, JsValue};
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{Headers, RequestInit, RequestMode, Response};

    use crate::error::FactError;

    fn transport(what: &str, e: JsValue) -> FactError {
        FactError::Transport(format!("{what}: {e:?}"))
    }

    /// POST a JSON body and return the response text
    pub async fn post_json(url: &str, api_key: &str, body: &str) -> Result<String, FactError> {
        let window = web_sys::window().ok_or_else(|| FactError::Transport("no window".into()))?;

        let headers = Headers::new().map_err(|e| transport("headers", e))?;
        headers
            .append("Content-Type", "application/json")
            .map_err(|e| transport("headers", e))?;
        headers
            .append("x-goog-api-key", api_key)
            .map_err(|e| transport("headers", e))?;

        let init = RequestInit::new();
        init.set_method("POST");
        init.set_mode(RequestMode::Cors);
        init.set_headers(&headers);
        init.set_body(&JsValue::from_str(body));

        let response: Response = JsFuture::from(window.fetch_with_str_and_init(url, &init))
            .await
            .map_err(|e| transport("fetch failed", e))?
            .dyn_into()
            .map_err(|e| transport("invalid response", e))?;

        if !response.ok() {
            return Err(FactError::Status(response.status()));
        }

        let text = JsFuture::from(response.text().map_err(|e| transport("body", e))?)
            .await
            .map_err(|e| transport("body", e))?;
        text.as_string()
            .ok_or_else(|| FactError::Parse("body is not text".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_shape() {
        let json = serde_json::to_value(GenerateRequest::dino_fact()).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], PROMPT);
        assert_eq!(
            json["generationConfig"]["thinkingConfig"]["thinkingBudget"],
            0
        );
    }

    #[test]
    fn test_parse_response_joins_parts() {
        let body = r#"{
            "candidates": [
                { "content": { "parts": [ { "text": "T. rex had " }, { "text": "tiny arms! " } ], "role": "model" } }
            ]
        }"#;
        assert_eq!(parse_response(body).unwrap(), "T. rex had tiny arms!");
    }

    #[test]
    fn test_parse_response_empty_and_malformed() {
        assert_eq!(parse_response(r#"{ "candidates": [] }"#), Err(FactError::Empty));
        assert_eq!(parse_response("{}"), Err(FactError::Empty));
        assert!(matches!(parse_response("<html>"), Err(FactError::Parse(_))));
    }

    #[test]
    fn test_missing_key_means_no_source() {
        assert!(GeminiFacts::from_key(None).is_none());
        assert!(GeminiFacts::from_key(Some("  ")).is_none());
        let source = GeminiFacts::from_key(Some("abc")).unwrap();
        assert!(source.url().ends_with("gemini-2.5-flash:generateContent"));
    }

    #[test]
    fn test_unconfigured_source_yields_key_hint() {
        let source: Option<FixedFact> = None;
        let result = pollster::block_on(source.generate());
        assert_eq!(result, Err(FactError::Unconfigured));
        assert_eq!(
            display_text(result),
            "Ask your parents to set the API Key to learn cool dino facts!"
        );
    }

    #[test]
    fn test_configured_source_passes_text_through() {
        let source = Some(FixedFact("Stegosaurus had plates!".into()));
        let result = pollster::block_on(source.generate());
        assert_eq!(display_text(result), "Stegosaurus had plates!");
    }
}
