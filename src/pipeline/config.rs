/// Configuration for polling loops.
///
/// The pipeline polls in two places: origin and destination receipts after a
/// transaction is broadcast, and the Across deposit status API while waiting
/// for a relayer fill. Each uses its own [`PollingConfig`], and the fill
/// config's total timeout is the deadline after which a deposit is abandoned
/// to manual follow-up.
///
/// # Examples
///
/// ```rust
/// use offsetzap_rs::PollingConfig;
///
/// // Fill polling defaults (120 attempts, 15 second intervals)
/// let config = PollingConfig::fills();
///
/// // Customize polling behavior
/// let config = PollingConfig::fills()
///     .with_max_attempts(20)
///     .with_poll_interval_secs(30);
///
/// // Receipt polling (90 attempts, 2 second intervals)
/// let config = PollingConfig::receipts();
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollingConfig {
    /// Maximum number of polling attempts before giving up.
    pub max_attempts: u32,
    /// Seconds to wait between polling attempts.
    pub poll_interval_secs: u64,
}

impl Default for PollingConfig {
    /// Same as [`PollingConfig::fills`].
    fn default() -> Self {
        Self::fills()
    }
}

impl PollingConfig {
    /// Creates a polling configuration for relayer fills.
    ///
    /// - `max_attempts`: 120
    /// - `poll_interval_secs`: 15
    ///
    /// Across fills usually land within seconds to a few minutes. Thirty
    /// minutes without a confirmed fill is treated as abandoned, well inside
    /// the deposit's on-chain fill deadline.
    pub fn fills() -> Self {
        Self {
            max_attempts: 120,
            poll_interval_secs: 15,
        }
    }

    /// Creates a polling configuration for transaction receipts.
    ///
    /// - `max_attempts`: 90
    /// - `poll_interval_secs`: 2
    pub fn receipts() -> Self {
        Self {
            max_attempts: 90,
            poll_interval_secs: 2,
        }
    }

    /// Sets the maximum number of polling attempts.
    ///
    /// # Example
    ///
    /// ```rust
    /// use offsetzap_rs::PollingConfig;
    ///
    /// let config = PollingConfig::default().with_max_attempts(60);
    /// assert_eq!(config.max_attempts, 60);
    /// ```
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    /// Sets the interval between polling attempts in seconds.
    pub fn with_poll_interval_secs(mut self, secs: u64) -> Self {
        self.poll_interval_secs = secs;
        self
    }

    /// Returns the total maximum wait time in seconds.
    ///
    /// This is calculated as `max_attempts * poll_interval_secs`.
    pub fn total_timeout_secs(&self) -> u64 {
        self.max_attempts as u64 * self.poll_interval_secs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_config() {
        let config = PollingConfig::fills();
        assert_eq!(config, PollingConfig::default());
        assert_eq!(config.total_timeout_secs(), 1800); // 30 minutes
    }

    #[test]
    fn test_receipt_config() {
        let config = PollingConfig::receipts();
        assert_eq!(config.max_attempts, 90);
        assert_eq!(config.total_timeout_secs(), 180);
    }

    #[test]
    fn test_builder_methods() {
        let config = PollingConfig::default()
            .with_max_attempts(20)
            .with_poll_interval_secs(30);
        assert_eq!(config.max_attempts, 20);
        assert_eq!(config.poll_interval_secs, 30);
        assert_eq!(config.total_timeout_secs(), 600); // 10 minutes
    }
}
