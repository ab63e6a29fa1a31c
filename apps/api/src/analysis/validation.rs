//! Schema validation for model-produced assessment objects.
//!
//! Required: `authenticity_score` (integer 0–100), `confidence_level`,
//! `letter_type`, `risk_assessment`. Optional, defaulting to empty:
//! `red_flags`, `green_flags`, `recommendations`, `summary`.
//! Enumerated labels are matched case-insensitively; unknown keys are ignored.

use std::str::FromStr;

use serde_json::{Map, Value};
use thiserror::Error;

use crate::analysis::models::{Assessment, Flag, FlagCategory, LetterType, Level};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaViolation {
    #[error("expected a JSON object")]
    NotAnObject,

    #[error("missing required field `{0}`")]
    MissingField(String),

    #[error("field `{field}` is invalid: {detail}")]
    InvalidField { field: String, detail: String },
}

fn invalid(field: &str, detail: impl Into<String>) -> SchemaViolation {
    SchemaViolation::InvalidField {
        field: field.to_string(),
        detail: detail.into(),
    }
}

/// Validates a parsed JSON value and builds a typed `Assessment` from it.
pub fn validate_assessment(value: &Value) -> Result<Assessment, SchemaViolation> {
    let obj = value.as_object().ok_or(SchemaViolation::NotAnObject)?;

    Ok(Assessment {
        authenticity_score: parse_score(required(obj, "authenticity_score")?)?,
        confidence_level: parse_label(required(obj, "confidence_level")?, "confidence_level")?,
        letter_type: parse_label::<LetterType>(required(obj, "letter_type")?, "letter_type")?,
        red_flags: parse_flags(obj, "red_flags")?,
        green_flags: parse_flags(obj, "green_flags")?,
        recommendations: parse_strings(obj, "recommendations")?,
        summary: match optional(obj, "summary") {
            Some(v) => expect_str(v, "summary")?.to_string(),
            None => String::new(),
        },
        risk_assessment: parse_label::<Level>(required(obj, "risk_assessment")?, "risk_assessment")?,
    })
}

/// Present and non-null.
fn optional<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    obj.get(key).filter(|v| !v.is_null())
}

fn required<'a>(obj: &'a Map<String, Value>, key: &str) -> Result<&'a Value, SchemaViolation> {
    optional(obj, key).ok_or_else(|| SchemaViolation::MissingField(key.to_string()))
}

fn expect_str<'a>(value: &'a Value, field: &str) -> Result<&'a str, SchemaViolation> {
    value
        .as_str()
        .ok_or_else(|| invalid(field, format!("expected a string, got {value}")))
}

/// Accepts integers and integral floats (`85.0`) in 0..=100.
fn parse_score(value: &Value) -> Result<u8, SchemaViolation> {
    const FIELD: &str = "authenticity_score";

    let score = match (value.as_i64(), value.as_f64()) {
        (Some(n), _) => n,
        (None, Some(f)) if f.fract() == 0.0 => f as i64,
        _ => return Err(invalid(FIELD, format!("expected an integer, got {value}"))),
    };

    if !(0..=100).contains(&score) {
        return Err(invalid(FIELD, format!("{score} is outside 0..=100")));
    }
    Ok(score as u8)
}

fn parse_label<T>(value: &Value, field: &str) -> Result<T, SchemaViolation>
where
    T: FromStr<Err = String>,
{
    expect_str(value, field)?
        .parse::<T>()
        .map_err(|detail| invalid(field, detail))
}

fn parse_flags(obj: &Map<String, Value>, key: &str) -> Result<Vec<Flag>, SchemaViolation> {
    let Some(value) = optional(obj, key) else {
        return Ok(vec![]);
    };
    let items = value
        .as_array()
        .ok_or_else(|| invalid(key, "expected an array of flag objects"))?;

    items
        .iter()
        .enumerate()
        .map(|(i, item)| -> Result<Flag, SchemaViolation> {
            let field = format!("{key}[{i}]");
            let flag = item
                .as_object()
                .ok_or_else(|| invalid(&field, "expected an object"))?;

            let category_field = format!("{field}.category");
            let description_field = format!("{field}.description");
            let severity_field = format!("{field}.severity");

            Ok(Flag {
                category: parse_label::<FlagCategory>(
                    optional(flag, "category")
                        .ok_or_else(|| SchemaViolation::MissingField(category_field.clone()))?,
                    &category_field,
                )?,
                description: expect_str(
                    optional(flag, "description")
                        .ok_or_else(|| SchemaViolation::MissingField(description_field.clone()))?,
                    &description_field,
                )?
                .to_string(),
                severity: parse_label::<Level>(
                    optional(flag, "severity")
                        .ok_or_else(|| SchemaViolation::MissingField(severity_field.clone()))?,
                    &severity_field,
                )?,
            })
        })
        .collect()
}

fn parse_strings(obj: &Map<String, Value>, key: &str) -> Result<Vec<String>, SchemaViolation> {
    let Some(value) = optional(obj, key) else {
        return Ok(vec![]);
    };
    let items = value
        .as_array()
        .ok_or_else(|| invalid(key, "expected an array of strings"))?;

    items
        .iter()
        .enumerate()
        .map(|(i, item)| expect_str(item, &format!("{key}[{i}]")).map(String::from))
        .collect()
}
