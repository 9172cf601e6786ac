//! Shared application state

use std::sync::Arc;
use std::time::Duration;

use booking_agent_config::Settings;
use booking_agent_core::{
    BookingRequest, NullTelemetryClient, Recognizer, TelemetryClient, TracingTelemetryClient,
};
use booking_agent_dialog::{BookingDialog, ChronoDateResolver, DateResolver};
use booking_agent_nlu::{KeywordRecognizer, LuisConfig, LuisRecognizer};

use crate::session::SessionManager;

/// State shared across request handlers.
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub sessions: Arc<SessionManager>,
    pub recognizer: Arc<dyn Recognizer>,
    pub resolver: Arc<dyn DateResolver>,
    pub telemetry: Arc<dyn TelemetryClient>,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        let sessions = Arc::new(SessionManager::with_config(
            settings.server.max_sessions,
            Duration::from_secs(settings.server.session_timeout_seconds),
            Duration::from_secs(settings.server.cleanup_interval_seconds),
        ));

        let recognizer = build_recognizer(&settings);

        let telemetry: Arc<dyn TelemetryClient> = if settings.dialog.telemetry_enabled {
            Arc::new(TracingTelemetryClient)
        } else {
            Arc::new(NullTelemetryClient)
        };

        Self {
            settings: Arc::new(settings),
            sessions,
            recognizer,
            resolver: Arc::new(ChronoDateResolver::new()),
            telemetry,
        }
    }

    /// Build a dialog for a new conversation.
    pub fn new_dialog(&self, details: BookingRequest) -> BookingDialog {
        BookingDialog::new(
            details,
            self.recognizer.clone(),
            self.resolver.clone(),
            self.telemetry.clone(),
        )
    }
}

/// Hosted NLU when fully configured, keyword matching otherwise.
fn build_recognizer(settings: &Settings) -> Arc<dyn Recognizer> {
    if settings.nlu.is_configured() {
        let config = LuisConfig {
            app_id: settings.nlu.app_id.clone().unwrap_or_default(),
            api_key: settings.nlu.api_key.clone().unwrap_or_default(),
            host: settings.nlu.host.clone().unwrap_or_default(),
            timeout: Duration::from_secs(settings.nlu.timeout_seconds),
        };
        match LuisRecognizer::new(config) {
            Ok(recognizer) => {
                tracing::info!("Using hosted NLU recognizer");
                return Arc::new(recognizer);
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to build hosted recognizer, using keywords");
            }
        }
    } else {
        tracing::info!("NLU not configured, using keyword recognizer");
    }

    Arc::new(KeywordRecognizer::new())
}
