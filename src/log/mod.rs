//! Sink for reported exceptions.

use crate::exception::Throwable;
use serde_json::{Map, Value};
use thiserror::Error;

/// Key/value metadata attached to a log entry.
pub type LogContext = Map<String, Value>;

#[derive(Debug, Error)]
pub enum LogError {
    #[error("Log sink unavailable: {0}")]
    Unavailable(String),

    #[error("Failed to write log entry: {0}")]
    Write(String),
}

/// Receives every error the exception handler reports.
///
/// Failures are returned, never panicked; the handler ignores them.
pub trait ExceptionLogger: Send + Sync + 'static {
    fn error(
        &self,
        message: &str,
        exception: &Throwable,
        context: &LogContext,
    ) -> Result<(), LogError>;
}

/// Writes reports through `tracing` at error level.
#[derive(Debug, Clone, Default)]
pub struct TracingLogger;

impl ExceptionLogger for TracingLogger {
    fn error(
        &self,
        message: &str,
        exception: &Throwable,
        context: &LogContext,
    ) -> Result<(), LogError> {
        let context = serde_json::to_string(context).map_err(|e| LogError::Write(e.to_string()))?;
        tracing::error!(
            target: "tenantry::exception",
            exception = exception.class_name(),
            error = ?exception,
            context = %context,
            "{message}"
        );
        Ok(())
    }
}
