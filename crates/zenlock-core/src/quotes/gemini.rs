//! Gemini-backed quote provider.
//!
//! One `generateContent` call per quote, a second JSON-schema call for
//! tips. Every failure path resolves to a fixed fallback value; nothing
//! here ever errors out to the caller.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use url::Url;

use super::{QuoteProvider, EMPTY_RESPONSE_FALLBACK, ERROR_FALLBACK, FALLBACK_TIPS};
use crate::error::QuoteError;

pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/";
const QUOTE_TEMPERATURE: f64 = 0.8;

pub struct GeminiQuotes {
    client: Client,
    api_key: String,
    base_url: Url,
    model: String,
}

impl GeminiQuotes {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL parses"),
            model: model.into(),
        }
    }

    /// Point the provider at a different API root (tests).
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = base_url;
        self
    }

    async fn generate(&self, body: serde_json::Value) -> Result<serde_json::Value, QuoteError> {
        let url = self
            .base_url
            .join(&format!("models/{}:generateContent", self.model))
            .map_err(|e| QuoteError::MalformedResponse(e.to_string()))?;
        let resp = self
            .client
            .post(url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(QuoteError::Status {
                status: status.as_u16(),
                body: resp.text().await.unwrap_or_default(),
            });
        }
        Ok(resp.json().await?)
    }

    /// Pull `candidates[0].content.parts[0].text` out of a response.
    fn extract_text(value: &serde_json::Value) -> Option<&str> {
        value
            .get("candidates")?
            .get(0)?
            .get("content")?
            .get("parts")?
            .get(0)?
            .get("text")?
            .as_str()
    }
}

#[async_trait]
impl QuoteProvider for GeminiQuotes {
    async fn quote(&self, context: &str) -> String {
        let prompt = format!(
            "Give me a very short, powerful, and stoic motivational quote \
             for someone trying to stay focused for {context}. Max 15 words."
        );
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": { "temperature": QUOTE_TEMPERATURE },
        });
        match self.generate(body).await {
            Ok(value) => match Self::extract_text(&value) {
                Some(text) if !text.trim().is_empty() => text.trim().to_string(),
                _ => EMPTY_RESPONSE_FALLBACK.to_string(),
            },
            Err(e) => {
                tracing::warn!(error = %e, "quote fetch failed");
                ERROR_FALLBACK.to_string()
            }
        }
    }

    async fn tips(&self) -> Vec<String> {
        let body = json!({
            "contents": [{ "parts": [{
                "text": "Provide 3 short tips for deep work focus during a locked phone session."
            }] }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": { "type": "ARRAY", "items": { "type": "STRING" } },
            },
        });
        let fallback = || FALLBACK_TIPS.iter().map(|t| (*t).to_string()).collect();
        match self.generate(body).await {
            Ok(value) => {
                let parsed = Self::extract_text(&value)
                    .and_then(|text| serde_json::from_str::<Vec<String>>(text).ok());
                match parsed {
                    // Anything but exactly three tips counts as a failure.
                    Some(tips) if tips.len() == 3 => tips,
                    _ => fallback(),
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "tips fetch failed");
                fallback()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(server: &mockito::ServerGuard) -> GeminiQuotes {
        let base = Url::parse(&format!("{}/", server.url())).unwrap();
        GeminiQuotes::new("test-key", DEFAULT_MODEL).with_base_url(base)
    }

    fn candidate_body(text: &str) -> String {
        json!({
            "candidates": [{ "content": { "parts": [{ "text": text }] } }]
        })
        .to_string()
    }

    #[tokio::test]
    async fn quote_returns_candidate_text_trimmed() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/models/gemini-3-flash-preview:generateContent")
            .match_query(mockito::Matcher::UrlEncoded("key".into(), "test-key".into()))
            .with_status(200)
            .with_body(candidate_body("  Discipline is destiny.  "))
            .create_async()
            .await;

        assert_eq!(provider(&server).quote("10 minute session").await, "Discipline is destiny.");
    }

    #[tokio::test]
    async fn quote_falls_back_on_empty_text() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/models/gemini-3-flash-preview:generateContent")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(candidate_body("   "))
            .create_async()
            .await;

        assert_eq!(provider(&server).quote("x").await, EMPTY_RESPONSE_FALLBACK);
    }

    #[tokio::test]
    async fn quote_falls_back_on_http_error() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/models/gemini-3-flash-preview:generateContent")
            .match_query(mockito::Matcher::Any)
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;

        assert_eq!(provider(&server).quote("x").await, ERROR_FALLBACK);
    }

    #[tokio::test]
    async fn quote_falls_back_on_malformed_body() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/models/gemini-3-flash-preview:generateContent")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body("{\"unexpected\": true}")
            .create_async()
            .await;

        assert_eq!(provider(&server).quote("x").await, EMPTY_RESPONSE_FALLBACK);
    }

    #[tokio::test]
    async fn tips_parses_three_item_array() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/models/gemini-3-flash-preview:generateContent")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(candidate_body(r#"["Silence your phone","Single-task","Hydrate"]"#))
            .create_async()
            .await;

        let tips = provider(&server).tips().await;
        assert_eq!(tips, vec!["Silence your phone", "Single-task", "Hydrate"]);
    }

    #[tokio::test]
    async fn tips_falls_back_when_count_is_wrong() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/models/gemini-3-flash-preview:generateContent")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(candidate_body(r#"["only one"]"#))
            .create_async()
            .await;

        assert_eq!(provider(&server).tips().await, FALLBACK_TIPS.to_vec());
    }

    #[tokio::test]
    async fn tips_falls_back_on_failure() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/models/gemini-3-flash-preview:generateContent")
            .match_query(mockito::Matcher::Any)
            .with_status(429)
            .create_async()
            .await;

        let tips = provider(&server).tips().await;
        assert_eq!(tips.len(), 3);
        assert_eq!(tips, FALLBACK_TIPS.to_vec());
    }
}
