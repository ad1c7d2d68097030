//! Run statistics.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters shared by every branch of a run.
#[derive(Debug, Default)]
pub struct MirrorStats {
    courses: AtomicU64,
    written: AtomicU64,
    skipped: AtomicU64,
    failed: AtomicU64,
    warnings: AtomicU64,
    unsupported: AtomicU64,
    videos: AtomicU64,
}

impl MirrorStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a course visit.
    pub fn record_course(&self) {
        self.courses.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a completed write of any kind.
    pub fn record_written(&self) {
        self.written.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a write refused by the download policy.
    pub fn record_skipped(&self) {
        self.skipped.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a failed download.
    pub fn record_failed(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a logged warning.
    pub fn record_warning(&self) {
        self.warnings.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a skipped node of unknown kind (also counted as a warning).
    pub fn record_unsupported(&self) {
        self.unsupported.fetch_add(1, Ordering::Relaxed);
        self.record_warning();
    }

    /// Record a reconstructed video.
    pub fn record_video(&self) {
        self.videos.fetch_add(1, Ordering::Relaxed);
    }

    pub fn written(&self) -> u64 {
        self.written.load(Ordering::Relaxed)
    }

    pub fn skipped(&self) -> u64 {
        self.skipped.load(Ordering::Relaxed)
    }

    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }

    pub fn warnings(&self) -> u64 {
        self.warnings.load(Ordering::Relaxed)
    }

    pub fn unsupported(&self) -> u64 {
        self.unsupported.load(Ordering::Relaxed)
    }

    pub fn videos(&self) -> u64 {
        self.videos.load(Ordering::Relaxed)
    }

    pub fn courses(&self) -> u64 {
        self.courses.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_counts_as_warning() {
        let stats = MirrorStats::new();
        stats.record_unsupported();
        stats.record_warning();

        assert_eq!(stats.unsupported(), 1);
        assert_eq!(stats.warnings(), 2);
    }
}
