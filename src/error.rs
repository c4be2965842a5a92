use thiserror::Error;

/// Structured error context for configuration and host-side failures.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ErrorContext {
    /// Config key or argument that caused the error (e.g., "dev_mode", "path")
    pub field_path: Option<String>,
    /// Additional context about the error (e.g., expected type, actual value)
    pub details: Option<String>,
    /// Source of the error (e.g., "config_loader", "host_provider")
    pub source: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self::default()
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

/// Codes the host side attaches to rejected calls.
///
/// The string forms are what the native module has always reported, so
/// application code matching on them keeps working.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RejectCode {
    /// The native emulator binary is not bundled in this build.
    NativeMissing,
    /// The native tools library (CHD conversion) is not bundled.
    NativeToolsMissing,
    /// No UI surface is attached to present an authorization flow.
    NoActivity,
    /// The Discord SDK is not bundled.
    DiscordUnavailable,
}

impl RejectCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectCode::NativeMissing => "armsx2_native_missing",
            RejectCode::NativeToolsMissing => "armsx2_native_tools_missing",
            RejectCode::NoActivity => "armsx2_no_activity",
            RejectCode::DiscordUnavailable => "armsx2_discord_unavailable",
        }
    }
}

impl std::fmt::Display for RejectCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unified error type for the bridge and its host side.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Capability provider '{module}' is not available")]
    ProviderUnavailable { module: String },

    #[error("Provider call '{method}' failed: {message}")]
    ProviderCallFailed { method: String, message: String },

    #[error("Call rejected [{code}]: {message}")]
    Rejected { code: RejectCode, message: String },

    #[error("Configuration error: {message}{}", format_context(.context))]
    Configuration {
        message: String,
        context: ErrorContext,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

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
    pub fn rejected(code: RejectCode, message: impl Into<String>) -> Self {
        Error::Rejected {
            code,
            message: message.into(),
        }
    }

    pub fn provider_unavailable(module: impl Into<String>) -> Self {
        Error::ProviderUnavailable {
            module: module.into(),
        }
    }

    pub fn call_failed(method: impl Into<String>, message: impl Into<String>) -> Self {
        Error::ProviderCallFailed {
            method: method.into(),
            message: message.into(),
        }
    }

    pub fn configuration_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Configuration {
            message: msg.into(),
            context,
        }
    }

    /// The rejection code, when the host side refused the call.
    pub fn reject_code(&self) -> Option<RejectCode> {
        match self {
            Error::Rejected { code, .. } => Some(*code),
            _ => None,
        }
    }

    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Error::Configuration { context, .. } => Some(context),
            _ => None,
        }
    }
}
