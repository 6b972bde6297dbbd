use thiserror::Error;

/// Failures raised by the adapters below the application layer.
#[derive(Debug, Error)]
pub enum InfraError {
    #[error("configuration problem: {message}")]
    Configuration { message: String },
    #[error("database unavailable: {message}")]
    Database { message: String },
    #[error("could not install the tracing subscriber: {0}")]
    Telemetry(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl InfraError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }

    pub fn telemetry(message: impl Into<String>) -> Self {
        Self::Telemetry(message.into())
    }
}
