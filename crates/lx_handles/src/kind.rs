//! Handle classification.

/// Payload category of a handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HandleKind {
    Text,
    Objects,
    Shapes,
    Props,
    Nodes,
    Terminals,
    Devices,
    Contacts,
    Subckts,
    Generator,
    Resource,
    Job,
}

impl HandleKind {
    pub const ALL: [HandleKind; 12] = [
        HandleKind::Text,
        HandleKind::Objects,
        HandleKind::Shapes,
        HandleKind::Props,
        HandleKind::Nodes,
        HandleKind::Terminals,
        HandleKind::Devices,
        HandleKind::Contacts,
        HandleKind::Subckts,
        HandleKind::Generator,
        HandleKind::Resource,
        HandleKind::Job,
    ];

    pub fn name(self) -> &'static str {
        match self {
            HandleKind::Text => "text",
            HandleKind::Objects => "object",
            HandleKind::Shapes => "shape",
            HandleKind::Props => "property",
            HandleKind::Nodes => "node",
            HandleKind::Terminals => "terminal",
            HandleKind::Devices => "device",
            HandleKind::Contacts => "contact",
            HandleKind::Subckts => "subcircuit",
            HandleKind::Generator => "search",
            HandleKind::Resource => "resource",
            HandleKind::Job => "job",
        }
    }

    /// Whether `step` can produce entries from this kind.
    pub fn is_iterable(self) -> bool {
        !matches!(self, HandleKind::Resource | HandleKind::Job)
    }

    /// Extraction-result kinds, anchored at a group descriptor.
    pub fn is_circuit(self) -> bool {
        matches!(
            self,
            HandleKind::Nodes
                | HandleKind::Terminals
                | HandleKind::Devices
                | HandleKind::Contacts
                | HandleKind::Subckts
        )
    }
}

impl std::fmt::Display for HandleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Whether a payload's entries point into the live database or are
/// independent values owned by the handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Borrowed,
    Owned,
}

/// Lifecycle of a handle record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleState {
    Active,
    /// Payload drained by iteration or invalidation. Only tags the disposal
    /// log line: a drained record leaves the table in the same call, so
    /// `Registry::state` reports it as `Closed`.
    Exhausted,
    /// Disposed and removed from the registry.
    Closed,
}
