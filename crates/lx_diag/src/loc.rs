use crate::codes;

pub enum DiagnosticKind {
    // Handle table
    UnknownHandle(u64),
    WrongHandleKind {
        id: u64,
        expected: String,
        actual: String,
    },
    NotIterable(String),
    ResourceCloseFailed(String),
    GeneratorCorrupt(String),

    // Host database
    UnknownEntity(String),
    ResourceOpenFailed {
        what: String,
        reason: String,
    },

    // Custom
    Raw(String),
}

impl DiagnosticKind {
    pub fn code(&self) -> Option<&'static str> {
        match self {
            DiagnosticKind::UnknownHandle(_) => Some(codes::UNKNOWN_HANDLE),
            DiagnosticKind::WrongHandleKind { .. } => Some(codes::WRONG_HANDLE_KIND),
            DiagnosticKind::NotIterable(_) => Some(codes::NOT_ITERABLE),
            DiagnosticKind::ResourceCloseFailed(_) => Some(codes::RESOURCE_CLOSE_FAILED),
            DiagnosticKind::GeneratorCorrupt(_) => Some(codes::GENERATOR_CORRUPT),
            _ => None,
        }
    }
}

pub struct DiagnosticsFormatter;

impl DiagnosticsFormatter {
    fn format_en(kind: &DiagnosticKind) -> String {
        match kind {
            DiagnosticKind::UnknownHandle(id) => format!("Unknown or closed handle: {}", id),
            DiagnosticKind::WrongHandleKind {
                id,
                expected,
                actual,
            } => format!(
                "Handle {} is a {} handle, but a {} handle was expected",
                id, actual, expected
            ),
            DiagnosticKind::NotIterable(kind) => format!("{} handles cannot be iterated", kind),
            DiagnosticKind::ResourceCloseFailed(msg) => format!("Closing resource failed: {}", msg),
            DiagnosticKind::GeneratorCorrupt(msg) => {
                format!("Search was abandoned: {}", msg)
            }
            DiagnosticKind::UnknownEntity(what) => format!("No such {}", what),
            DiagnosticKind::ResourceOpenFailed { what, reason } => {
                format!("Cannot open {}: {}", what, reason)
            }

            DiagnosticKind::Raw(s) => s.clone(),
        }
    }

    pub fn format(kind: &DiagnosticKind) -> String {
        Self::format_en(kind)
    }
}
