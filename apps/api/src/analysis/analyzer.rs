//! Letter Analyzer: runs one authenticity assessment per call.
//!
//! Flow: build prompt → model call → isolate JSON → validate → attach metadata.
//!
//! `analyze` never fails. A failed model call yields the Error outcome; a
//! reply that cannot be parsed or validated yields the Degraded outcome with
//! the raw reply attached for manual review.

use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::analysis::json_extract::{balanced_objects, greedy_object_span};
use crate::analysis::models::{
    AnalysisMetadata, AnalysisOutcome, AnalysisResult, Assessment, Flag, FlagCategory,
    LetterType, Level,
};
use crate::analysis::prompts::{build_analysis_prompt, ANALYSIS_PROMPT_VERSION};
use crate::analysis::risk::risk_level;
use crate::analysis::validation::{validate_assessment, SchemaViolation};
use crate::llm_client::TextGenerator;

/// Why a model reply could not become a Success outcome.
#[derive(Debug, Error)]
pub enum ResponseParseFailure {
    #[error("no JSON object found in model reply")]
    NoJsonObject,

    #[error("malformed JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("reply does not match the assessment schema: {0}")]
    Schema(#[from] SchemaViolation),
}

#[derive(Clone)]
pub struct LetterAnalyzer {
    generator: Arc<dyn TextGenerator>,
}

impl LetterAnalyzer {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Analyses one letter. Always returns a well-formed result.
    pub async fn analyze(&self, letter_text: &str) -> AnalysisResult {
        let prompt = build_analysis_prompt(letter_text);

        let outcome = match self.generator.generate(&prompt).await {
            Ok(reply) => match parse_reply(&reply) {
                Ok(assessment) => {
                    let derived = risk_level(assessment.authenticity_score);
                    if derived != assessment.risk_assessment {
                        debug!(
                            "Model risk '{}' disagrees with score-derived risk '{}' (score {})",
                            assessment.risk_assessment, derived, assessment.authenticity_score
                        );
                    }
                    AnalysisOutcome::Success(assessment)
                }
                Err(e) => {
                    warn!("Falling back to degraded analysis: {e}");
                    fallback_outcome(reply)
                }
            },
            Err(e) => {
                warn!("Model invocation failed: {e}");
                error_outcome(e.to_string())
            }
        };

        let result = AnalysisResult {
            metadata: AnalysisMetadata {
                model_used: self.generator.model().to_string(),
                analysis_timestamp: Utc::now(),
                text_length: letter_text.chars().count(),
                prompt_version: ANALYSIS_PROMPT_VERSION.to_string(),
            },
            outcome,
        };

        info!(
            "Analysis finished: outcome={:?} score={} risk={}",
            result.kind(),
            result.assessment().authenticity_score,
            result.assessment().risk_assessment
        );
        result
    }
}

/// Isolates and validates the assessment object in a model reply.
///
/// The greedy first-`{`-to-last-`}` span is tried first. If it does not
/// validate, each top-level balanced object is tried from last to first, so a
/// final answer wins over example JSON quoted earlier in the reply.
pub fn parse_reply(reply: &str) -> Result<Assessment, ResponseParseFailure> {
    let greedy = greedy_object_span(reply).ok_or(ResponseParseFailure::NoJsonObject)?;

    let first_failure = match parse_candidate(greedy) {
        Ok(assessment) => return Ok(assessment),
        Err(e) => e,
    };

    balanced_objects(reply)
        .into_iter()
        .rev()
        .filter(|candidate| *candidate != greedy)
        .find_map(|candidate| parse_candidate(candidate).ok())
        .ok_or(first_failure)
}

fn parse_candidate(candidate: &str) -> Result<Assessment, ResponseParseFailure> {
    let value: serde_json::Value = serde_json::from_str(candidate)?;
    Ok(validate_assessment(&value)?)
}

// ────────────────────────────────────────────────────────────────────────────
// Terminal fallback results
// ────────────────────────────────────────────────────────────────────────────

fn fallback_outcome(raw_response: String) -> AnalysisOutcome {
    AnalysisOutcome::Degraded {
        assessment: Assessment {
            authenticity_score: 50,
            confidence_level: Level::Low,
            letter_type: LetterType::Unknown,
            red_flags: vec![Flag {
                category: FlagCategory::Analysis,
                description: "Unable to parse AI response properly".to_string(),
                severity: Level::Medium,
            }],
            green_flags: vec![],
            recommendations: vec![
                "Manual review recommended".to_string(),
                "Verify all company information independently".to_string(),
            ],
            summary: "Analysis incomplete due to parsing error".to_string(),
            risk_assessment: Level::Medium,
        },
        raw_response,
    }
}

fn error_outcome(error: String) -> AnalysisOutcome {
    AnalysisOutcome::Error {
        assessment: Assessment {
            authenticity_score: 0,
            confidence_level: Level::Low,
            letter_type: LetterType::Unknown,
            red_flags: vec![Flag {
                category: FlagCategory::SystemError,
                description: format!("Analysis failed: {error}"),
                severity: Level::High,
            }],
            green_flags: vec![],
            recommendations: vec![
                "System error occurred during analysis".to_string(),
                "Please try again or contact support".to_string(),
            ],
            summary: "Analysis failed due to system error".to_string(),
            risk_assessment: Level::High,
        },
        error,
    }
}
