use std::time::Duration;

#[derive(Debug, Clone, Copy)]
pub struct RetryConfig {
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(30),
        }
    }
}

impl RetryConfig {
    pub fn backoff(&self, attempt: usize) -> Duration {
        // attempt is 1-based (attempt=1 => base_delay)
        if attempt <= 1 {
            return self.base_delay.min(self.max_delay);
        }

        let exp_shift = (attempt - 1).min(30) as u32;
        let base_ms = self.base_delay.as_millis() as u64;
        let raw_ms = base_ms.saturating_mul(1u64 << exp_shift);
        Duration::from_millis(raw_ms).min(self.max_delay)
    }
}
