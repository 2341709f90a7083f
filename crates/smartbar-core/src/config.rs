//! Engine configuration.

use std::time::Duration;

use smol_str::SmolStr;

/// How long to wait for a render commit before placing the caret anyway.
pub const DEFAULT_RECOVERY_DELAY: Duration = Duration::from_millis(50);

/// Control keys the owner interprets itself.
pub const DEFAULT_SPECIAL_KEYS: &[&str] = &["Tab", "Enter", "Escape", "ArrowDown", "ArrowUp"];

/// Keys whose release can move the caret without editing.
pub const DEFAULT_NAVIGATION_KEYS: &[&str] = &[
    "ArrowLeft",
    "ArrowRight",
    "ArrowUp",
    "ArrowDown",
    "Home",
    "End",
];

/// Synchronization engine configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    /// Delay after the owner's reply before the caret is placed without a
    /// render commit.
    pub recovery_delay: Duration,
    /// Give up on an owner that never replies to an intent. Off by default:
    /// the owner is expected to answer every intent.
    pub owner_reply_timeout: Option<Duration>,
    pub special_keys: Vec<SmolStr>,
    pub navigation_keys: Vec<SmolStr>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            recovery_delay: DEFAULT_RECOVERY_DELAY,
            owner_reply_timeout: None,
            special_keys: DEFAULT_SPECIAL_KEYS
                .iter()
                .copied()
                .map(SmolStr::new)
                .collect(),
            navigation_keys: DEFAULT_NAVIGATION_KEYS
                .iter()
                .copied()
                .map(SmolStr::new)
                .collect(),
        }
    }
}

impl SyncConfig {
    pub fn with_recovery_delay(mut self, delay: Duration) -> Self {
        self.recovery_delay = delay;
        self
    }

    pub fn with_owner_reply_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.owner_reply_timeout = timeout;
        self
    }

    pub fn is_special_key(&self, key: &str) -> bool {
        self.special_keys.iter().any(|k| k == key)
    }

    pub fn is_navigation_key(&self, key: &str) -> bool {
        self.navigation_keys.iter().any(|k| k == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SyncConfig::default();
        assert_eq!(config.recovery_delay, Duration::from_millis(50));
        assert_eq!(config.owner_reply_timeout, None);
        assert!(config.is_special_key("Escape"));
        assert!(!config.is_special_key("ArrowLeft"));
        assert!(config.is_navigation_key("Home"));
        // vertical arrows are both
        assert!(config.is_special_key("ArrowUp") && config.is_navigation_key("ArrowUp"));
    }
}
