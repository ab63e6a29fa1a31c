//! Optional forwarding of completed analyses to an automation webhook (e.g. n8n).
//! Delivery is best-effort: failures are logged and never affect the response.

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, warn};

use crate::analysis::models::AnalysisResult;

const WEBHOOK_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Serialize)]
pub struct WebhookPayload<'a> {
    pub filename: &'a str,
    pub content: &'a str,
    pub analysis: &'a AnalysisResult,
    pub timestamp: DateTime<Utc>,
}

#[derive(Clone)]
pub struct WebhookNotifier {
    client: Client,
    url: String,
}

impl WebhookNotifier {
    pub fn new(url: String) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(WEBHOOK_TIMEOUT).build()?;
        Ok(Self { client, url })
    }

    pub async fn notify(&self, payload: &WebhookPayload<'_>) {
        let response = self.client.post(&self.url).json(payload).send().await;

        match response {
            Ok(r) if r.status().is_success() => {
                debug!("Webhook accepted analysis for {}", payload.filename)
            }
            Ok(r) => warn!(
                "Webhook returned {} for {}",
                r.status(),
                payload.filename
            ),
            Err(e) => warn!("Failed to send to webhook: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::models::{
        AnalysisMetadata, AnalysisOutcome, Assessment, LetterType, Level,
    };

    #[test]
    fn test_payload_shape() {
        let analysis = AnalysisResult {
            outcome: AnalysisOutcome::Success(Assessment {
                authenticity_score: 91,
                confidence_level: Level::High,
                letter_type: LetterType::JobOffer,
                red_flags: vec![],
                green_flags: vec![],
                recommendations: vec![],
                summary: "Looks genuine".to_string(),
                risk_assessment: Level::Low,
            }),
            metadata: AnalysisMetadata {
                model_used: "gemini-1.5-flash".to_string(),
                analysis_timestamp: Utc::now(),
                text_length: 12,
                prompt_version: "v1".to_string(),
            },
        };
        let payload = WebhookPayload {
            filename: "offer.pdf",
            content: "Offer letter",
            analysis: &analysis,
            timestamp: Utc::now(),
        };

        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["filename"], "offer.pdf");
        assert_eq!(value["content"], "Offer letter");
        assert_eq!(value["analysis"]["letter_type"], "job_offer");
        assert_eq!(value["analysis"]["metadata"]["text_length"], 12);
        assert!(value["timestamp"].is_string());
    }

    #[test]
    fn test_notifier_builds_with_timeout() {
        assert!(WebhookNotifier::new("http://localhost:5678/webhook".to_string()).is_ok());
    }
}
