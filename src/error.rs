use thiserror::Error;

/// Structured error context for diagnosing tier failures in production logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorContext {
    /// Configuration key or request field involved (e.g., "S3_BUCKET", "request.type")
    pub field_path: Option<String>,
    /// Additional context about the error (e.g., HTTP status, object key)
    pub details: Option<String>,
    /// Component that raised the error (e.g., "directory", "tts", "s3")
    pub source: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self {
            field_path: None,
            details: None,
            source: None,
        }
    }

    pub fn with_field_path(mut self, path: impl Into<String>) -> Self {
        self.field_path = Some(path.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Unified error type for the skill.
///
/// Every external collaborator maps its failure modes into one of these
/// kinds. Inside the resolution pipeline they all mean "try the next tier".
#[derive(Debug, Error)]
pub enum Error {
    #[error("Directory fetch failed: {message}{}", format_context(.context))]
    FetchFailed {
        message: String,
        context: ErrorContext,
    },

    #[error("Candidate set is empty")]
    EmptyCandidateSet,

    #[error("Synthesis timed out after {timeout_ms} ms")]
    SynthesisTimeout { timeout_ms: u64 },

    #[error("Synthesis engine returned no audio")]
    SynthesisEmptyResult,

    #[error("Synthesis failed: {message}{}", format_context(.context))]
    SynthesisFailed {
        message: String,
        context: ErrorContext,
    },

    #[error("Upload failed: {message}{}", format_context(.context))]
    UploadFailed {
        message: String,
        context: ErrorContext,
    },

    #[error("Payload of {size} bytes exceeds the {limit} byte inline limit")]
    PayloadTooLargeForInline { size: usize, limit: usize },

    #[error("No object store configured")]
    StoreNotConfigured,

    #[error("No bundled audio file found in {searched} candidate paths")]
    BundledAudioMissing { searched: usize },

    #[error("Configuration error: {message}{}", format_context(.context))]
    Configuration {
        message: String,
        context: ErrorContext,
    },

    #[error("Validation error: {message}{}", format_context(.context))]
    Validation {
        message: String,
        context: ErrorContext,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

// Helper function to format error context for display
fn format_context(ctx: &ErrorContext) -> String {
    let mut parts = Vec::new();
    if let Some(ref field) = ctx.field_path {
        parts.push(format!("field: {}", field));
    }
    if let Some(ref details) = ctx.details {
        parts.push(format!("details: {}", details));
    }
    if let Some(ref source) = ctx.source {
        parts.push(format!("source: {}", source));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

impl Error {
    pub fn fetch_failed(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::FetchFailed {
            message: msg.into(),
            context,
        }
    }

    pub fn synthesis_failed(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::SynthesisFailed {
            message: msg.into(),
            context,
        }
    }

    pub fn upload_failed(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::UploadFailed {
            message: msg.into(),
            context,
        }
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        Error::Configuration {
            message: msg.into(),
            context: ErrorContext::new(),
        }
    }

    pub fn configuration_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Configuration {
            message: msg.into(),
            context,
        }
    }

    pub fn validation_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Validation {
            message: msg.into(),
            context,
        }
    }

    /// Short machine-friendly name of the error kind, used as a log field.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::FetchFailed { .. } => "fetch_failed",
            Error::EmptyCandidateSet => "empty_candidate_set",
            Error::SynthesisTimeout { .. } => "synthesis_timeout",
            Error::SynthesisEmptyResult => "synthesis_empty_result",
            Error::SynthesisFailed { .. } => "synthesis_failed",
            Error::UploadFailed { .. } => "upload_failed",
            Error::PayloadTooLargeForInline { .. } => "payload_too_large_for_inline",
            Error::StoreNotConfigured => "store_not_configured",
            Error::BundledAudioMissing { .. } => "bundled_audio_missing",
            Error::Configuration { .. } => "configuration",
            Error::Validation { .. } => "validation",
            Error::Io(_) => "io",
            Error::Serialization(_) => "serialization",
        }
    }

    /// Extract error context if available
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Error::FetchFailed { context, .. }
            | Error::SynthesisFailed { context, .. }
            | Error::UploadFailed { context, .. }
            | Error::Configuration { context, .. }
            | Error::Validation { context, .. } => Some(context),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_is_rendered_into_message() {
        let err = Error::upload_failed(
            "access denied",
            ErrorContext::new()
                .with_source("s3")
                .with_details("key=tts/1_abcd1234.mp3"),
        );
        assert_eq!(
            err.to_string(),
            "Upload failed: access denied (details: key=tts/1_abcd1234.mp3, source: s3)"
        );
        assert_eq!(err.kind(), "upload_failed");
    }

    #[test]
    fn test_empty_context_renders_nothing() {
        let err = Error::fetch_failed("HTTP 404", ErrorContext::new());
        assert_eq!(err.to_string(), "Directory fetch failed: HTTP 404");
        assert!(err.context().is_some());
        assert!(Error::EmptyCandidateSet.context().is_none());
    }
}
