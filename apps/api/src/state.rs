use crate::analysis::analyzer::LetterAnalyzer;
use crate::config::Config;
use crate::extraction::TextExtractor;
use crate::webhook::WebhookNotifier;

/// Shared application state injected into all route handlers via Axum extractors.
/// Holds no per-request data; every analysis builds its own prompt and result.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub extractor: TextExtractor,
    /// Wraps the injected `TextGenerator`. Tests swap in a stub.
    pub analyzer: LetterAnalyzer,
    /// Present only when `N8N_WEBHOOK_URL` is configured.
    pub webhook: Option<WebhookNotifier>,
}
