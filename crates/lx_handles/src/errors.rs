//! Handle-table errors and their script-facing rendering.

use std::io;

use lx_core::DbError;
use lx_diag::{Diagnostic, DiagnosticKind};
use thiserror::Error;

use crate::id::HandleId;
use crate::kind::HandleKind;

#[derive(Debug, Error)]
pub enum HandleError {
    #[error("unknown or closed handle {0}")]
    NotFound(HandleId),
    #[error("handle {id} is a {actual} handle, expected {expected}")]
    WrongKind {
        id: HandleId,
        expected: HandleKind,
        actual: HandleKind,
    },
    #[error("{0} handles cannot be iterated")]
    NotIterable(HandleKind),
    #[error("closing {what} failed: {source}")]
    ResourceClose {
        what: &'static str,
        #[source]
        source: io::Error,
    },
    #[error("{what} exited unsuccessfully ({status})")]
    PipeStatus {
        what: &'static str,
        status: std::process::ExitStatus,
    },
    #[error("handle {id} holds a {actual} job of a different type")]
    JobType { id: HandleId, actual: &'static str },
    #[error("job finished with an error: {0}")]
    JobFinish(String),
    #[error("cannot open {what}: {source}")]
    Open {
        what: String,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Db(#[from] DbError),
}

impl HandleError {
    pub fn diagnostic_kind(&self) -> DiagnosticKind {
        match self {
            HandleError::NotFound(id) => DiagnosticKind::UnknownHandle(id.0),
            HandleError::WrongKind {
                id,
                expected,
                actual,
            } => DiagnosticKind::WrongHandleKind {
                id: id.0,
                expected: expected.name().to_string(),
                actual: actual.name().to_string(),
            },
            HandleError::NotIterable(kind) => DiagnosticKind::NotIterable(kind.name().to_string()),
            HandleError::ResourceClose { .. }
            | HandleError::PipeStatus { .. }
            | HandleError::JobFinish(_) => DiagnosticKind::ResourceCloseFailed(self.to_string()),
            HandleError::JobType { id, actual } => DiagnosticKind::WrongHandleKind {
                id: id.0,
                expected: "matching job".to_string(),
                actual: (*actual).to_string(),
            },
            HandleError::Open { what, source } => DiagnosticKind::ResourceOpenFailed {
                what: what.clone(),
                reason: source.to_string(),
            },
            HandleError::Db(e) => DiagnosticKind::Raw(e.to_string()),
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error_kind(self.diagnostic_kind());
        match self {
            HandleError::WrongKind { expected, .. } => {
                diag.with_help(format!("pass a handle returned by a {} producer", expected))
            }
            _ => diag,
        }
    }
}
