//! Holder for the most recently published analysis
//!
//! Summaries are immutable once published. Publishing swaps in a new
//! `Arc<Snapshot>`; readers clone the current `Arc`, so they always see a
//! complete snapshot even while an upload replaces it.

use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::models::AnalysisSummary;

/// A published, versioned analysis summary
#[derive(Debug, Serialize)]
pub struct Snapshot {
    /// Starts at 1 and increases with every publish
    pub version: u64,
    pub created_at: DateTime<Utc>,
    pub summary: AnalysisSummary,
}

#[derive(Debug, Default)]
struct Slot {
    current: Option<Arc<Snapshot>>,
    last_version: u64,
}

/// Shared store for the latest analysis; clones share the same slot
#[derive(Debug, Clone, Default)]
pub struct AnalysisStore {
    slot: Arc<RwLock<Slot>>,
}

impl AnalysisStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current snapshot and return the new one
    pub fn publish(&self, summary: AnalysisSummary) -> Arc<Snapshot> {
        let mut slot = self.slot.write().unwrap_or_else(|e| e.into_inner());
        slot.last_version += 1;
        let snapshot = Arc::new(Snapshot {
            version: slot.last_version,
            created_at: Utc::now(),
            summary,
        });
        slot.current = Some(Arc::clone(&snapshot));
        info!(
            version = snapshot.version,
            rows = snapshot.summary.transaction_count(),
            "Published analysis snapshot"
        );
        snapshot
    }

    /// The latest snapshot, if anything has been published
    pub fn current(&self) -> Option<Arc<Snapshot>> {
        self.slot
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .current
            .clone()
    }

    /// Drop the current snapshot. Version numbering continues afterwards.
    pub fn clear(&self) {
        let mut slot = self.slot.write().unwrap_or_else(|e| e.into_inner());
        slot.current = None;
    }

    pub fn version(&self) -> Option<u64> {
        self.current().map(|s| s.version)
    }
}
