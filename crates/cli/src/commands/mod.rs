pub mod config;
pub mod doctor;
pub mod recommend;
pub mod similar;

use std::sync::Arc;

use recommender_core::config::{AppConfig, LoadOptions};
use recommender_core::dataset::load_catalog;
use recommender_core::errors::ApplicationError;
use recommender_core::ranking::RecommendationEngine;
use serde::Serialize;
use serde_json::Value;

pub const EXIT_CONFIG: u8 = 2;
pub const EXIT_DATASET: u8 = 3;

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    error_class: Option<String>,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
}

impl CommandResult {
    /// Successful outcome carrying a JSON `data` payload. `Null` is omitted.
    pub fn success_with(command: &str, message: impl Into<String>, data: impl Serialize) -> Self {
        let data = match serde_json::to_value(data) {
            Ok(Value::Null) => None,
            Ok(value) => Some(value),
            Err(error) => {
                return Self::failure(command, "serialization", error.to_string(), 1);
            }
        };
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "ok".to_string(),
            error_class: None,
            message: message.into(),
            data,
        };
        Self { exit_code: 0, output: serialize_payload(payload) }
    }

    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: message.into(),
            data: None,
        };
        Self { exit_code, output: serialize_payload(payload) }
    }
}

/// Failure outcome for an application error: configuration problems exit
/// with 2, dataset and catalog problems with 3.
pub fn from_application_error(command: &str, error: &ApplicationError) -> CommandResult {
    match error {
        ApplicationError::Configuration(message) => {
            CommandResult::failure(command, "config_validation", message.as_str(), EXIT_CONFIG)
        }
        ApplicationError::Dataset(message) => {
            CommandResult::failure(command, "dataset_load", message.as_str(), EXIT_DATASET)
        }
        ApplicationError::Domain(error) => {
            CommandResult::failure(command, "catalog_invalid", error.to_string(), EXIT_DATASET)
        }
    }
}

/// Load config and build an engine over the configured dataset.
pub(crate) fn load_engine() -> Result<RecommendationEngine, ApplicationError> {
    let config = AppConfig::load(LoadOptions::default())?;
    let catalog = load_catalog(&config.dataset.path)?;
    Ok(RecommendationEngine::new(Arc::new(catalog)))
}

fn serialize_payload(payload: CommandOutcome) -> String {
    serde_json::to_string(&payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}
