//! Diagnostics reported back to script code.

use crate::{DiagnosticKind, DiagnosticsFormatter};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub code: Option<&'static str>,
    pub help: Option<String>,
}

impl Diagnostic {
    pub fn new(severity: Severity, kind: DiagnosticKind) -> Self {
        Self {
            severity,
            message: DiagnosticsFormatter::format(&kind),
            code: kind.code(),
            help: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
            code: None,
            help: None,
        }
    }

    pub fn error_kind(kind: DiagnosticKind) -> Self {
        Self::new(Severity::Error, kind)
    }

    pub fn warning_kind(kind: DiagnosticKind) -> Self {
        Self::new(Severity::Warning, kind)
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }
}

pub mod codes {
    pub const UNKNOWN_HANDLE: &str = "H0001";
    pub const WRONG_HANDLE_KIND: &str = "H0002";
    pub const NOT_ITERABLE: &str = "H0003";
    pub const RESOURCE_CLOSE_FAILED: &str = "H0004";
    pub const GENERATOR_CORRUPT: &str = "H0005";
}
