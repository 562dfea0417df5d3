//! Opaque host contexts held on behalf of a script, such as a graphics
//! export or an incremental stream reader.

use std::any::Any;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobKind {
    GraphicsExport,
    Assembly,
    StreamReader,
}

impl JobKind {
    pub fn name(self) -> &'static str {
        match self {
            JobKind::GraphicsExport => "graphics export",
            JobKind::Assembly => "assembly",
            JobKind::StreamReader => "stream reader",
        }
    }
}

/// A context the host keeps alive until the script closes its handle.
/// Jobs are single-shot: they cannot be stepped.
pub trait HostJob: Any {
    fn kind(&self) -> JobKind;

    /// Called once when the handle is disposed.
    fn finish(&mut self) -> Result<(), String> {
        Ok(())
    }

    fn as_any_mut(&mut self) -> &mut dyn Any;
}
