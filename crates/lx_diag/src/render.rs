use crate::Diagnostic;

pub fn render_diagnostic(diag: &Diagnostic) -> String {
    let code_str = diag.code.map(|c| format!(" [{c}]")).unwrap_or_default();
    let mut out = format!("{:?}{}: {}", diag.severity, code_str, diag.message);
    if let Some(h) = &diag.help {
        out.push('\n');
        out.push_str("  = help: ");
        out.push_str(h);
    }
    out
}
