use std::sync::Arc;

use crate::analysis::Analyzer;
use crate::config::Config;
use crate::feedback::FeedbackGenerator;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Extractor, scorer and matcher over one shared vocabulary.
    pub analyzer: Arc<Analyzer>,
    /// Pluggable feedback provider. Default: template. Select via AI_PROVIDER.
    pub feedback: Arc<FeedbackGenerator>,
}
