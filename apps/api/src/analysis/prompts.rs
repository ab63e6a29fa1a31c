// Letter analysis prompt templates.
// The analysis template is versioned; bump ANALYSIS_PROMPT_VERSION on any wording change.

use crate::llm_client::prompts::JSON_ONLY_INSTRUCTION;

/// Recorded in result metadata so assessments can be traced to the wording that produced them.
pub const ANALYSIS_PROMPT_VERSION: &str = "letter-authenticity-v1";

pub const ANALYSIS_PROMPT_TEMPLATE: &str = r#"You are an expert in detecting fake internship and job offer letters. Analyze the following letter and provide a comprehensive assessment.

Analyze the letter for the following indicators of authenticity:

1. Company Information Analysis:
   - Check if the company name, address, and contact information are consistent
   - Consider whether the company plausibly exists and has a legitimate presence
   - Look for suspicious or generic company names

2. Language and Writing Style:
   - Identify overly formal or generic language
   - Look for grammatical errors or inconsistencies
   - Check for unusual formatting or structure

3. Content Red Flags:
   - Suspicious salary offers (too high or too low)
   - Unusual job requirements or responsibilities
   - Requests for personal information or upfront payments
   - Urgency or pressure tactics
   - Generic job descriptions

4. Contact Information:
   - Check whether email domains match the company domain
   - Flag free email services (Gmail, Yahoo, etc.) used by company representatives
   - Look for suspicious phone numbers or addresses

5. Document Formatting:
   - Check for professional letterhead and formatting
   - Look for inconsistencies in fonts, spacing, or layout
   - Check the signature block for plausibility

Provide your analysis in the following JSON format:
{
    "authenticity_score": 0-100,
    "confidence_level": "low" | "medium" | "high",
    "letter_type": "internship" | "job_offer" | "other",
    "red_flags": [
        {
            "category": "company_info" | "language" | "content" | "contact" | "formatting",
            "description": "Description of the issue",
            "severity": "low" | "medium" | "high"
        }
    ],
    "green_flags": [
        {
            "category": "company_info" | "language" | "content" | "contact" | "formatting",
            "description": "Description of positive indicator",
            "severity": "low" | "medium" | "high"
        }
    ],
    "recommendations": [
        "Recommendation for verification"
    ],
    "summary": "Brief summary of findings",
    "risk_assessment": "low" | "medium" | "high"
}

{json_only}

Letter to analyze:
"#;

/// Composes the full prompt: fixed instructions followed by the letter body verbatim.
pub fn build_analysis_prompt(letter_text: &str) -> String {
    let mut prompt = ANALYSIS_PROMPT_TEMPLATE.replace("{json_only}", JSON_ONLY_INSTRUCTION);
    prompt.push_str(letter_text);
    prompt
}
