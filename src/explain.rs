//! Thin client for the external explanation service.
//!
//! This sits outside the rendering pipeline: a fire-and-forget
//! request per user action, never sharing state with rendering. Every
//! failure path collapses to a descriptive fallback string; no error
//! escapes to the caller.

use std::sync::atomic::{AtomicU64, Ordering};

use serde_json::{Value, json};
use thiserror::Error;

pub const API_KEY_ENV: &str = "GEMINI_API_KEY";
const MODEL: &str = "gemini-2.5-flash";
const ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";

pub const MISSING_KEY_FALLBACK: &str =
    "API key is missing. Please configure the environment to use the explanation feature.";
pub const REQUEST_FAILED_FALLBACK: &str =
    "Failed to retrieve explanation from the cosmos. Please try again later.";

pub const SAMPLE_QUESTIONS: [&str; 3] = [
    "What happens to time inside the horizon?",
    "Why is it called a 'flip'?",
    "Can light escape from r < 1?",
];

#[derive(Debug, Error)]
enum ExplainError {
    #[error("transport: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("response carried no explanation text")]
    EmptyResponse,
}

pub struct ExplainClient {
    api_key: Option<String>,
    http: reqwest::Client,
}

impl ExplainClient {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key: api_key.filter(|k| !k.is_empty()),
            http: reqwest::Client::new(),
        }
    }

    pub fn from_env() -> Self {
        Self::new(std::env::var(API_KEY_ENV).ok())
    }

    /// Ask for an explanation of the current simulation state.
    /// Missing credential or transport failure yields a fallback
    /// string rather than an error.
    pub async fn explain(&self, radius: f64, question: Option<&str>) -> String {
        let Some(key) = self.api_key.as_deref() else {
            return MISSING_KEY_FALLBACK.to_string();
        };
        match self.request(key, &build_prompt(radius, question)).await {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!(error = %err, "explanation request failed");
                REQUEST_FAILED_FALLBACK.to_string()
            }
        }
    }

    async fn request(&self, key: &str, prompt: &str) -> Result<String, ExplainError> {
        let url = format!("{ENDPOINT}/{MODEL}:generateContent");
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
        });
        let response: Value = self
            .http
            .post(&url)
            .query(&[("key", key)])
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let text = response["candidates"][0]["content"]["parts"]
            .as_array()
            .map(|parts| {
                parts
                    .iter()
                    .filter_map(|p| p["text"].as_str())
                    .collect::<String>()
            })
            .unwrap_or_default();

        if text.is_empty() {
            return Err(ExplainError::EmptyResponse);
        }
        Ok(text)
    }
}

fn build_prompt(radius: f64, question: Option<&str>) -> String {
    let question = question
        .filter(|q| !q.trim().is_empty())
        .unwrap_or("Explain the concept of the 'Space-Time Flip' at the horizon shown in this simulation.");
    format!(
        "You are an expert theoretical physicist and science communicator.\n\
         The user is looking at a visualization of a Black Hole's Event Horizon (Schwarzschild metric).\n\
         \n\
         Current Simulation Parameters:\n\
         - Schwarzschild Radius (r_s): {radius:.2} units.\n\
         - The visualization shows a contour plot of space-time curvature (potential well).\n\
         - Inside the radius, the plot is \"flipped\" or void, representing the region where the metric \
         signature changes (Space and Time swap roles).\n\
         \n\
         User Question: {question}\n\
         \n\
         Keep the explanation concise (under 150 words), engaging, and accessible to a general audience. \
         Use markdown for formatting."
    )
}

/// Monotonic request counter for last-write-wins display. Each request
/// captures a token at dispatch; the response is applied only while
/// its token is still the newest one issued.
#[derive(Debug, Default)]
pub struct Generation(AtomicU64);

impl Generation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new request, invalidating all earlier tokens.
    pub fn begin(&self) -> u64 {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn is_current(&self, token: u64) -> bool {
        self.0.load(Ordering::SeqCst) == token
    }
}
