//! Analysis result schema.
//!
//! `AnalysisResult` serialises flat: the assessment fields at top level,
//! `raw_response` only on the degraded path, `error` only on the error path,
//! and `metadata` always.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// Enumerations
// ────────────────────────────────────────────────────────────────────────────

/// Shared low/medium/high scale for confidence, severity and risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LetterType {
    Internship,
    JobOffer,
    Other,
    /// Only produced on degraded and error paths.
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagCategory {
    CompanyInfo,
    Language,
    Content,
    Contact,
    Formatting,
    Analysis,
    SystemError,
}

/// Lowercases and maps spaces/hyphens to underscores so "Job Offer",
/// "job-offer" and "job_offer" compare equal.
fn normalize_label(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .collect()
}

impl Level {
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Low => "low",
            Level::Medium => "medium",
            Level::High => "high",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_label(s).as_str() {
            "low" => Ok(Level::Low),
            "medium" => Ok(Level::Medium),
            "high" => Ok(Level::High),
            _ => Err(format!("'{s}' is not one of low/medium/high")),
        }
    }
}

/// Parses a model-supplied label. `unknown` is reserved for degraded and
/// error results and is rejected here.
impl FromStr for LetterType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_label(s).as_str() {
            "internship" => Ok(LetterType::Internship),
            "job_offer" => Ok(LetterType::JobOffer),
            "other" => Ok(LetterType::Other),
            _ => Err(format!("'{s}' is not one of internship/job_offer/other")),
        }
    }
}

impl FromStr for FlagCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_label(s).as_str() {
            "company_info" => Ok(FlagCategory::CompanyInfo),
            "language" => Ok(FlagCategory::Language),
            "content" => Ok(FlagCategory::Content),
            "contact" => Ok(FlagCategory::Contact),
            "formatting" => Ok(FlagCategory::Formatting),
            "analysis" => Ok(FlagCategory::Analysis),
            "system_error" => Ok(FlagCategory::SystemError),
            _ => Err(format!("'{s}' is not a known flag category")),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Records
// ────────────────────────────────────────────────────────────────────────────

/// A single red or green indicator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flag {
    pub category: FlagCategory,
    pub description: String,
    pub severity: Level,
}

/// The scored body shared by all three outcomes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assessment {
    /// 0–100, higher = more likely authentic.
    pub authenticity_score: u8,
    pub confidence_level: Level,
    pub letter_type: LetterType,
    pub red_flags: Vec<Flag>,
    pub green_flags: Vec<Flag>,
    pub recommendations: Vec<String>,
    pub summary: String,
    pub risk_assessment: Level,
}

/// The three terminal outcomes of one analysis call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AnalysisOutcome {
    /// The model reply parsed and validated.
    Success(Assessment),
    /// The model answered but the reply could not be parsed or validated.
    Degraded {
        #[serde(flatten)]
        assessment: Assessment,
        raw_response: String,
    },
    /// The model call itself failed.
    Error {
        #[serde(flatten)]
        assessment: Assessment,
        error: String,
    },
}

/// Which terminal state an analysis reached. Used for logging and callers
/// that branch on the outcome without matching the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    Success,
    Degraded,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisMetadata {
    pub model_used: String,
    pub analysis_timestamp: DateTime<Utc>,
    /// Length of the analysed letter in Unicode scalar values.
    pub text_length: usize,
    pub prompt_version: String,
}

/// What the analyzer hands back. Built once per request and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisResult {
    #[serde(flatten)]
    pub outcome: AnalysisOutcome,
    pub metadata: AnalysisMetadata,
}

impl AnalysisOutcome {
    pub fn kind(&self) -> OutcomeKind {
        match self {
            AnalysisOutcome::Success(_) => OutcomeKind::Success,
            AnalysisOutcome::Degraded { .. } => OutcomeKind::Degraded,
            AnalysisOutcome::Error { .. } => OutcomeKind::Error,
        }
    }

    pub fn assessment(&self) -> &Assessment {
        match self {
            AnalysisOutcome::Success(assessment)
            | AnalysisOutcome::Degraded { assessment, .. }
            | AnalysisOutcome::Error { assessment, .. } => assessment,
        }
    }
}

impl AnalysisResult {
    pub fn kind(&self) -> OutcomeKind {
        self.outcome.kind()
    }

    pub fn assessment(&self) -> &Assessment {
        self.outcome.assessment()
    }
}

#[cfg(test)]
impl AnalysisResult {
    pub fn raw_response(&self) -> Option<&str> {
        match &self.outcome {
            AnalysisOutcome::Degraded { raw_response, .. } => Some(raw_response),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            AnalysisOutcome::Error { error, .. } => Some(error),
            _ => None,
        }
    }
}
