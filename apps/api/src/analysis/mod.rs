// Letter authenticity analysis.
// All model calls go through llm_client's TextGenerator; no direct HTTP here.

pub mod analyzer;
pub mod company_info;
pub mod handlers;
pub mod json_extract;
pub mod models;
pub mod prompts;
pub mod risk;
pub mod validation;
