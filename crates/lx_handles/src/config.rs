//! Registry configuration.

/// Registry configuration options.
#[derive(Clone, Copy, Debug)]
pub struct RegistryConfig {
    /// First id handed out by a fresh registry, clamped to
    /// `1..=HandleId::MAX`.
    pub first_id: u64,
    /// Live-handle count above which creation logs a warning (once per crossing).
    pub live_warn_threshold: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            first_id: 1,
            live_warn_threshold: 4096,
        }
    }
}
