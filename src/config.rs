//! Session configuration.

use crate::scratch::ScratchBuffer;

/// Sizing for a session's scratch buffer.
///
/// # Example
///
/// ```rust
/// use damlev::config::SessionConfig;
///
/// let config = SessionConfig::default()
///     .with_initial_capacity(4096)
///     .with_max_capacity(1 << 20);
/// assert_eq!(config.initial_capacity, 4096);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct SessionConfig {
    /// Cells allocated at setup.
    pub initial_capacity: usize,

    /// Largest buffer the session may grow to, in cells. Calls that need more
    /// fail with an allocation error instead of growing. `None` means the
    /// buffer grows as long as the allocator agrees.
    pub max_capacity: Option<usize>,
}

impl SessionConfig {
    /// Set the number of cells allocated at setup.
    pub fn with_initial_capacity(mut self, cells: usize) -> Self {
        self.initial_capacity = cells;
        self
    }

    /// Cap the buffer at `cells`.
    pub fn with_max_capacity(mut self, cells: usize) -> Self {
        self.max_capacity = Some(cells);
        self
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            initial_capacity: ScratchBuffer::DEFAULT_CAPACITY,
            max_capacity: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let config = SessionConfig::default();
        assert_eq!(config.initial_capacity, 1024);
        assert_eq!(config.max_capacity, None);
    }

    #[test]
    fn test_builder() {
        let config = SessionConfig::default()
            .with_initial_capacity(16)
            .with_max_capacity(64);
        assert_eq!(
            config,
            SessionConfig {
                initial_capacity: 16,
                max_capacity: Some(64),
            }
        );
    }

    #[cfg(feature = "serialization")]
    #[test]
    fn test_deserialize_with_defaults() {
        let config: SessionConfig = serde_json::from_str(r#"{"max_capacity": 2048}"#).unwrap();
        assert_eq!(config.initial_capacity, 1024);
        assert_eq!(config.max_capacity, Some(2048));
    }
}
