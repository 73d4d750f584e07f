//! Engine-wide configuration knobs.
//!
//! spec.md §4.7/§9 calls out several values as "configurable parameter"
//! without specifying how they're supplied; this collects them into a
//! single [`Config`] with the documented defaults, built the way
//! `protocol::Properties`/the teacher's `client_node_update` build up a
//! change-masked update: a plain builder over an otherwise `Default` value.

use core::time::Duration;

/// Realtime scheduling policy requested for the data loop thread.
///
/// spec.md §4.5 describes the data loop as spawned with
/// `SCHED_OTHER|RESET_ON_FORK`, or attempting to acquire elevated priority
/// through a cooperating policy service whose interface the spec leaves
/// unspecified. Both options are modeled; `Other` is the default because
/// it requires no privileged setup to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RealtimePolicy {
    /// Plain `SCHED_OTHER`, reset-on-fork.
    Other,
    /// Request `SCHED_FIFO` at the given priority (1-99). Acquiring this
    /// may fail depending on the process's capabilities; callers that ask
    /// for it should be prepared to fall back to [`RealtimePolicy::Other`].
    Fifo { priority: u8 },
}

impl Default for RealtimePolicy {
    #[inline]
    fn default() -> Self {
        RealtimePolicy::Other
    }
}

/// Ambient engine configuration.
///
/// Constructed with [`Config::builder`]; every field has the default named
/// in spec.md where one is given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// spec.md §4.7/§9: "Idle-suspend default (3 s) is repeated in code but
    /// is not a published API constant; treat as a configurable parameter."
    pub idle_suspend_timeout: Duration,
    /// Power-of-two byte size for each [`ringbuf::RingBuffer`](../ringbuf/struct.RingBuffer.html)-backed channel.
    pub ring_buffer_size: u32,
    /// Number of buffers a freshly allocated [`bufferpool::BufferPool`] holds.
    pub buffer_pool_count: u32,
    /// Plane size, in bytes, for each buffer in a freshly allocated pool.
    pub buffer_pool_size: u32,
    /// Scheduling policy requested for the realtime data loop thread.
    pub realtime_policy: RealtimePolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            idle_suspend_timeout: Duration::from_secs(3),
            ring_buffer_size: 1 << 16,
            buffer_pool_count: 8,
            buffer_pool_size: 8192,
            realtime_policy: RealtimePolicy::Other,
        }
    }
}

impl Config {
    /// Start building a [`Config`] from the documented defaults.
    #[inline]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder { config: Config::default() }
    }
}

/// Builder over [`Config`].
///
/// # Examples
///
/// ```
/// use core::time::Duration;
/// use engine::Config;
///
/// let config = Config::builder()
///     .idle_suspend_timeout(Duration::from_secs(10))
///     .buffer_pool_count(16)
///     .build();
///
/// assert_eq!(config.idle_suspend_timeout, Duration::from_secs(10));
/// assert_eq!(config.buffer_pool_count, 16);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    #[inline]
    pub fn idle_suspend_timeout(mut self, value: Duration) -> Self {
        self.config.idle_suspend_timeout = value;
        self
    }

    #[inline]
    pub fn ring_buffer_size(mut self, value: u32) -> Self {
        self.config.ring_buffer_size = value;
        self
    }

    #[inline]
    pub fn buffer_pool_count(mut self, value: u32) -> Self {
        self.config.buffer_pool_count = value;
        self
    }

    #[inline]
    pub fn buffer_pool_size(mut self, value: u32) -> Self {
        self.config.buffer_pool_size = value;
        self
    }

    #[inline]
    pub fn realtime_policy(mut self, value: RealtimePolicy) -> Self {
        self.config.realtime_policy = value;
        self
    }

    #[inline]
    pub fn build(self) -> Config {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec() {
        let config = Config::default();
        assert_eq!(config.idle_suspend_timeout, Duration::from_secs(3));
        assert_eq!(config.realtime_policy, RealtimePolicy::Other);
    }

    #[test]
    fn builder_overrides_selected_fields_only() {
        let config = Config::builder().idle_suspend_timeout(Duration::from_secs(1)).build();
        assert_eq!(config.idle_suspend_timeout, Duration::from_secs(1));
        assert_eq!(config.buffer_pool_count, Config::default().buffer_pool_count);
    }
}
