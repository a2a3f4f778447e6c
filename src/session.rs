use std::time::Duration;

use tokio::time::Instant;

use crate::merit_store::PersistedRecord;

/// Wall-clock time since process start, on top of the stored cumulative duration.
///
/// `base_duration` is the value loaded at startup and is never advanced in
/// memory: every flush writes `base + elapsed`, so repeated saves never
/// double-count the open session.
#[derive(Debug, Clone, Copy)]
pub struct SessionClock {
    started: Instant,
    base_duration: f64,
}

impl SessionClock {
    pub fn start(base_duration: f64) -> Self {
        Self {
            started: Instant::now(),
            base_duration,
        }
    }

    pub fn started_at(&self) -> Instant {
        self.started
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed().as_secs()
    }

    pub fn total_duration(&self) -> f64 {
        self.base_duration + self.elapsed().as_secs_f64()
    }
}

/// Live running total of merit. Starts at the loaded `total_hits`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HitCounter {
    total: u64,
}

impl HitCounter {
    pub fn starting_at(total: u64) -> Self {
        Self { total }
    }

    pub fn increment(&mut self) -> u64 {
        self.total = self.total.saturating_add(1);
        self.total
    }

    pub fn total(&self) -> u64 {
        self.total
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Session {
    pub clock: SessionClock,
    pub hits: HitCounter,
}

impl Session {
    pub fn resume(record: PersistedRecord) -> Self {
        Self {
            clock: SessionClock::start(record.total_duration),
            hits: HitCounter::starting_at(record.total_hits),
        }
    }

    /// The record to flush right now.
    pub fn record(&self) -> PersistedRecord {
        PersistedRecord {
            total_hits: self.hits.total(),
            total_duration: self.clock.total_duration(),
        }
    }
}
