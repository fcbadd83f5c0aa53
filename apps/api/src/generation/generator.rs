//! Text generation service: trait plus the LLM-backed implementation.
//!
//! `AppState` holds an `Arc<dyn TextGenerator>`; tests swap in a stub.
//! Failures are returned to the caller as-is. Transport-level retries live in
//! `LlmClient`; nothing here retries.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::generation::prompts::{
    ASSISTANT_PROMPT_TEMPLATE, ASSISTANT_ROLE, MATCH_SCORE_PROMPT_TEMPLATE, MATCH_SCORE_ROLE,
    REWRITE_PROMPT_TEMPLATE, REWRITE_ROLE,
};
use crate::llm_client::prompts::{fill, json_system};
use crate::llm_client::{LlmClient, LlmError};

/// Conversation context kept by the assistant is capped to this many characters.
const MAX_CONTEXT_CHARS: usize = 8000;

// ────────────────────────────────────────────────────────────────────────────
// Output types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MatchLabel {
    #[serde(rename = "Excellent Match")]
    Excellent,
    #[serde(rename = "Good Match")]
    Good,
    #[serde(rename = "Fair Match")]
    Fair,
    #[serde(rename = "Needs Improvement")]
    NeedsImprovement,
}

impl MatchLabel {
    pub fn for_score(score: u8) -> Self {
        match score {
            80.. => MatchLabel::Excellent,
            60..=79 => MatchLabel::Good,
            40..=59 => MatchLabel::Fair,
            _ => MatchLabel::NeedsImprovement,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchReport {
    /// Always within 0..=100.
    pub match_score: u8,
    pub recommendations: Vec<String>,
    pub label: MatchLabel,
}

impl MatchReport {
    pub fn new(raw_score: f64, recommendations: Vec<String>) -> Self {
        let match_score = if raw_score.is_finite() {
            raw_score.round().clamp(0.0, 100.0) as u8
        } else {
            0
        };
        let recommendations = recommendations
            .into_iter()
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty())
            .collect();
        MatchReport {
            match_score,
            recommendations,
            label: MatchLabel::for_score(match_score),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantTurn {
    pub response: String,
    /// Context to send with the next query.
    pub new_context: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Rewrites an experience description to read more professionally.
    async fn rewrite(&self, description: &str) -> Result<String, LlmError>;

    /// Scores a serialized profile against a job text.
    async fn match_score(&self, profile_text: &str, job_text: &str)
        -> Result<MatchReport, LlmError>;

    /// One turn of the career assistant conversation.
    async fn assist(&self, query: &str, context: Option<&str>) -> Result<AssistantTurn, LlmError>;
}

// ────────────────────────────────────────────────────────────────────────────
// LLM-backed implementation
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RewriteOutput {
    rewritten_description: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MatchOutput {
    match_score: f64,
    #[serde(default)]
    recommendations: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct AssistantOutput {
    response: String,
}

pub struct LlmTextGenerator {
    llm: LlmClient,
}

impl LlmTextGenerator {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl TextGenerator for LlmTextGenerator {
    async fn rewrite(&self, description: &str) -> Result<String, LlmError> {
        let prompt = fill(REWRITE_PROMPT_TEMPLATE, &[("description", description)]);
        let output: RewriteOutput = self
            .llm
            .call_json(&prompt, &json_system(REWRITE_ROLE))
            .await?;

        let text = output.rewritten_description.trim().to_string();
        if text.is_empty() {
            return Err(LlmError::EmptyContent);
        }
        Ok(text)
    }

    async fn match_score(
        &self,
        profile_text: &str,
        job_text: &str,
    ) -> Result<MatchReport, LlmError> {
        let prompt = fill(
            MATCH_SCORE_PROMPT_TEMPLATE,
            &[("profile_data", profile_text), ("job_description", job_text)],
        );
        let output: MatchOutput = self
            .llm
            .call_json(&prompt, &json_system(MATCH_SCORE_ROLE))
            .await?;

        let report = MatchReport::new(output.match_score, output.recommendations);
        info!(
            "Match score {} ({} recommendations)",
            report.match_score,
            report.recommendations.len()
        );
        Ok(report)
    }

    async fn assist(&self, query: &str, context: Option<&str>) -> Result<AssistantTurn, LlmError> {
        let context = context.map(str::trim).filter(|c| !c.is_empty());
        let prompt = fill(
            ASSISTANT_PROMPT_TEMPLATE,
            &[
                ("context", context.unwrap_or("(new conversation)")),
                ("query", query),
            ],
        );
        let output: AssistantOutput = self
            .llm
            .call_json(&prompt, &json_system(ASSISTANT_ROLE))
            .await?;

        let response = output.response.trim().to_string();
        Ok(AssistantTurn {
            new_context: next_context(context, query, &response),
            response,
        })
    }
}

/// Appends one exchange to the conversation context, keeping only the most
/// recent `MAX_CONTEXT_CHARS` characters.
pub fn next_context(previous: Option<&str>, query: &str, response: &str) -> String {
    let mut context = previous.unwrap_or_default().to_string();
    if !context.is_empty() {
        context.push('\n');
    }
    context.push_str(&format!("User: {query}\nAssistant: {response}"));

    let len = context.chars().count();
    if len > MAX_CONTEXT_CHARS {
        context = context.chars().skip(len - MAX_CONTEXT_CHARS).collect();
    }
    context
}

// ────────────────────────────────────────────────────────────────────────────
// Test double
// ────────────────────────────────────────────────────────────────────────────


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_is_clamped_and_rounded() {
        assert_eq!(MatchReport::new(87.6, vec![]).match_score, 88);
        assert_eq!(MatchReport::new(140.0, vec![]).match_score, 100);
        assert_eq!(MatchReport::new(-3.0, vec![]).match_score, 0);
        assert_eq!(MatchReport::new(f64::NAN, vec![]).match_score, 0);
    }

    #[test]
    fn test_labels_follow_thresholds() {
        assert_eq!(MatchLabel::for_score(100), MatchLabel::Excellent);
        assert_eq!(MatchLabel::for_score(80), MatchLabel::Excellent);
        assert_eq!(MatchLabel::for_score(79), MatchLabel::Good);
        assert_eq!(MatchLabel::for_score(60), MatchLabel::Good);
        assert_eq!(MatchLabel::for_score(40), MatchLabel::Fair);
        assert_eq!(MatchLabel::for_score(39), MatchLabel::NeedsImprovement);
    }

    #[test]
    fn test_blank_recommendations_dropped() {
        let report = MatchReport::new(50.0, vec![" Learn Rust ".to_string(), "  ".to_string()]);
        assert_eq!(report.recommendations, vec!["Learn Rust".to_string()]);
    }

    #[test]
    fn test_report_serializes_label_text() {
        let json = serde_json::to_value(MatchReport::new(85.0, vec![])).unwrap();
        assert_eq!(json["matchScore"], 85);
        assert_eq!(json["label"], "Excellent Match");
    }

    #[test]
    fn test_match_output_parses_llm_json() {
        let out: MatchOutput =
            serde_json::from_str(r#"{"matchScore": 72.5, "recommendations": ["a"]}"#).unwrap();
        assert_eq!(out.match_score, 72.5);
        assert_eq!(out.recommendations, vec!["a".to_string()]);
    }

    #[test]
    fn test_next_context_appends_exchange() {
        let first = next_context(None, "hi", "hello");
        assert_eq!(first, "User: hi\nAssistant: hello");
        let second = next_context(Some(&first), "next", "ok");
        assert!(second.starts_with("User: hi"));
        assert!(second.ends_with("User: next\nAssistant: ok"));
    }

    #[test]
    fn test_next_context_keeps_recent_tail() {
        let long = "x".repeat(MAX_CONTEXT_CHARS);
        let context = next_context(Some(&long), "q", "r");
        assert_eq!(context.chars().count(), MAX_CONTEXT_CHARS);
        assert!(context.ends_with("User: q\nAssistant: r"));
    }
}
