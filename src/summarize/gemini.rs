// src/summarize/gemini.rs
//! Gemini `generateContent` backend. Requires a Gemini API key.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{BackendError, SummaryBackend, SummaryRequest};

const PROMPT_TEMPLATE: &str = include_str!("prompt.txt");
const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

pub struct GeminiBackend {
    http: reqwest::Client,
    api_key: String,
    model: String,
}

impl GeminiBackend {
    pub fn new(api_key: String) -> Result<Self> {
        Self::with_model(api_key, DEFAULT_MODEL)
    }

    pub fn with_model(api_key: String, model: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent("boxwatch/0.1 (+github.com/boxwatch/boxwatch)")
            .connect_timeout(Duration::from_secs(4))
            .timeout(Duration::from_secs(20))
            .build()
            .context("building Gemini HTTP client")?;
        Ok(Self {
            http,
            api_key,
            model: model.to_string(),
        })
    }

    fn render_prompt(request: &SummaryRequest) -> String {
        PROMPT_TEMPLATE
            .replace("{source}", &request.source)
            .replace("{url}", &request.url)
            .replace("{body}", &request.body)
    }
}

#[async_trait]
impl SummaryBackend for GeminiBackend {
    async fn generate(&self, request: &SummaryRequest) -> Result<String, BackendError> {
        #[derive(Serialize)]
        struct Part<'a> {
            text: &'a str,
        }
        #[derive(Serialize)]
        struct Content<'a> {
            parts: Vec<Part<'a>>,
        }
        #[derive(Serialize)]
        struct Req<'a> {
            contents: Vec<Content<'a>>,
        }
        #[derive(Deserialize)]
        struct RespPart {
            text: Option<String>,
        }
        #[derive(Deserialize)]
        struct RespContent {
            parts: Option<Vec<RespPart>>,
        }
        #[derive(Deserialize)]
        struct Candidate {
            content: Option<RespContent>,
        }
        #[derive(Deserialize)]
        struct Resp {
            candidates: Option<Vec<Candidate>>,
        }

        let prompt = Self::render_prompt(request);
        let req = Req {
            contents: vec![Content {
                parts: vec![Part { text: &prompt }],
            }],
        };

        let url = format!("{API_BASE}/{}:generateContent", self.model);
        let resp = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&req)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    BackendError::Overloaded(format!("request timed out: {e}"))
                } else {
                    BackendError::Request(format!("sending request: {e}"))
                }
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(classify_http_failure(status.as_u16(), &body));
        }

        let body: Resp = resp
            .json()
            .await
            .map_err(|e| BackendError::Request(format!("decoding response: {e}")))?;
        let text = body
            .candidates
            .and_then(|mut c| c.drain(..).next())
            .and_then(|c| c.content)
            .and_then(|c| c.parts)
            .map(|parts| {
                parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();
        if text.is_empty() {
            return Err(BackendError::Request("response contained no text".into()));
        }
        Ok(text)
    }

    fn name(&self) -> &'static str {
        "gemini"
    }
}

/// 429/503 and explicit overload messages are transient; everything else
/// (auth, bad request, server bugs) is fatal.
fn classify_http_failure(status: u16, body: &str) -> BackendError {
    let overloaded = matches!(status, 429 | 503)
        || body.to_ascii_lowercase().contains("the model is overloaded");
    if overloaded {
        BackendError::Overloaded(format!("HTTP {status}: {}", truncate(body, 200)))
    } else {
        BackendError::Request(format!("HTTP {status}: {}", truncate(body, 200)))
    }
}

fn truncate(s: &str, max: usize) -> &str {
    let mut end = max.min(s.len());
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
