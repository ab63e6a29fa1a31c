//! Best-effort company-info scraping from raw letter text.
//!
//! These are regex heuristics used to pre-populate verification hints. They
//! play no part in scoring. First match wins for each field; no match leaves
//! the field empty.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

macro_rules! hint_pattern {
    ($name:ident, $regex_str:expr) => {
        static $name: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new($regex_str).ok());
    };
}

// ── Company name: "from/at/with <Name> <suffix>" preferred over a bare suffix match ──
hint_pattern!(
    RE_COMPANY_INTRODUCED,
    r"(?i)(?:from|at|with)\s+([A-Z][A-Za-z\s&.,]+(?:Inc|LLC|Corp|Company|Ltd))"
);
hint_pattern!(
    RE_COMPANY_BARE,
    r"(?i)([A-Z][A-Za-z\s&.,]+(?:Inc|LLC|Corp|Company|Ltd))"
);

// ── Email ──────────────────────────────────────────────────────────────────
hint_pattern!(
    RE_EMAIL,
    r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b"
);

// ── Phone (North American shape) ───────────────────────────────────────────
hint_pattern!(
    RE_PHONE,
    r"\+?1?[-.\s]?\(?[0-9]{3}\)?[-.\s]?[0-9]{3}[-.\s]?[0-9]{4}"
);

// ── Website ────────────────────────────────────────────────────────────────
hint_pattern!(
    RE_WEBSITE,
    r"(?i)\b(?:https?://|www\.)[A-Za-z0-9.-]+\.[A-Za-z]{2,}(?:/[^\s]*)?"
);

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CompanyInfo {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
}

pub fn extract_company_info(letter_text: &str) -> CompanyInfo {
    CompanyInfo {
        name: first_capture(&RE_COMPANY_INTRODUCED, letter_text)
            .or_else(|| first_capture(&RE_COMPANY_BARE, letter_text)),
        email: first_match(&RE_EMAIL, letter_text),
        phone: first_match(&RE_PHONE, letter_text),
        website: first_match(&RE_WEBSITE, letter_text)
            .map(|url| url.trim_end_matches(['.', ',', ')', ';']).to_string()),
    }
}

fn first_capture(regex: &LazyLock<Option<Regex>>, text: &str) -> Option<String> {
    let regex = regex.as_ref()?;
    regex
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}

fn first_match(regex: &LazyLock<Option<Regex>>, text: &str) -> Option<String> {
    let regex = regex.as_ref()?;
    regex
        .find(text)
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}
