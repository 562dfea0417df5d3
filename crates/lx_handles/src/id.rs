/// Integer token given to script code in place of a pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandleId(pub u64);

impl HandleId {
    /// Largest id the registry hands out: every allocated id fits a
    /// non-negative script integer.
    pub const MAX: HandleId = HandleId(i64::MAX as u64);

    /// Interpret a script integer as a handle. Negative values never name one.
    pub fn from_script(n: i64) -> Option<HandleId> {
        u64::try_from(n).ok().map(HandleId)
    }

    /// `None` only for ids above [`HandleId::MAX`], which the registry never
    /// allocates.
    pub fn as_script(self) -> Option<i64> {
        i64::try_from(self.0).ok()
    }
}

impl std::fmt::Display for HandleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
