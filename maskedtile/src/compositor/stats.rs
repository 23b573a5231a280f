//! Compositor statistics.

use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters for a compositor.
///
/// Updated from concurrent tile requests and read as a
/// [`CompositorStatsSnapshot`].
#[derive(Debug, Default)]
pub struct CompositorStats {
    /// Tiles requested by the host
    requests: AtomicU64,
    /// Tiles recomposited after a configuration change
    recompositions: AtomicU64,
    /// Source fetches issued
    fetches: AtomicU64,
    /// Recompositions that reused a retained decoded image
    fast_path: AtomicU64,
    /// Tiles finished in READY
    ready: AtomicU64,
    /// Tiles finished in BLANK
    blank: AtomicU64,
}

/// Snapshot of compositor statistics at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CompositorStatsSnapshot {
    pub requests: u64,
    pub recompositions: u64,
    pub fetches: u64,
    pub fast_path: u64,
    pub ready: u64,
    pub blank: u64,
}

impl CompositorStatsSnapshot {
    /// Fraction of finished tiles that ended blank.
    pub fn blank_ratio(&self) -> f64 {
        let finished = self.ready + self.blank;
        if finished == 0 {
            0.0
        } else {
            self.blank as f64 / finished as f64
        }
    }
}

impl CompositorStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_request(&self) {
        self.requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_recomposition(&self) {
        self.recompositions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_fetch(&self) {
        self.fetches.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_fast_path(&self) {
        self.fast_path.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_ready(&self) {
        self.ready.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_blank(&self) {
        self.blank.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> CompositorStatsSnapshot {
        CompositorStatsSnapshot {
            requests: self.requests.load(Ordering::Relaxed),
            recompositions: self.recompositions.load(Ordering::Relaxed),
            fetches: self.fetches.load(Ordering::Relaxed),
            fast_path: self.fast_path.load(Ordering::Relaxed),
            ready: self.ready.load(Ordering::Relaxed),
            blank: self.blank.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_new_stats_are_zero() {
        let snapshot = CompositorStats::new().snapshot();
        assert_eq!(snapshot, CompositorStatsSnapshot::default());
        assert_eq!(snapshot.blank_ratio(), 0.0);
    }

    #[test]
    fn test_counters() {
        let stats = CompositorStats::new();
        stats.record_request();
        stats.record_fetch();
        stats.record_ready();
        stats.record_recomposition();
        stats.record_fast_path();
        stats.record_ready();
        stats.record_request();
        stats.record_fetch();
        stats.record_blank();

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.requests, 2);
        assert_eq!(snapshot.fetches, 2);
        assert_eq!(snapshot.recompositions, 1);
        assert_eq!(snapshot.fast_path, 1);
        assert_eq!(snapshot.ready, 2);
        assert_eq!(snapshot.blank, 1);
        assert!((snapshot.blank_ratio() - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_concurrent_updates() {
        let stats = Arc::new(CompositorStats::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let stats = Arc::clone(&stats);
                thread::spawn(move || {
                    for _ in 0..100 {
                        stats.record_request();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(stats.snapshot().requests, 800);
    }
}
