//! Script-facing diagnostics for handle-table failures.

mod diagnostic;
mod loc;
mod render;

pub use diagnostic::{Diagnostic, Severity, codes};
pub use loc::{DiagnosticKind, DiagnosticsFormatter};
pub use render::render_diagnostic;
