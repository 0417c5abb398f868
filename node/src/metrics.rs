//! Prometheus metrics for the node core.
//!
//! Narrower than a full node's telemetry surface (§1 ambient-stack note):
//! only what the block processor, signature checker, and account-sets
//! emit. Log/metric *formatting* choices beyond this are out of scope.

use prometheus::{
    register_int_counter_vec_with_registry, register_int_counter_with_registry,
    register_int_gauge_with_registry, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
};

/// Central collection of node-core Prometheus metrics.
pub struct NodeMetrics {
    pub registry: Registry,

    /// Total blocks that entered the processing pipeline.
    pub blocks_processed: IntCounter,
    /// Total blocks that reached `ProcessingStatus::Progress`.
    pub blocks_accepted: IntCounter,
    /// Per-status counts, labelled by the 14-value status taxonomy.
    pub status_counts: IntCounterVec,
    /// Total signature batches verified by the worker pool.
    pub signature_batches_verified: IntCounter,

    /// Current size of the unchecked (gap-previous/gap-source) cache.
    pub unchecked_count: IntGauge,
    /// Current size of the ascending-bootstrap priorities set.
    pub priorities_count: IntGauge,
    /// Current size of the ascending-bootstrap blocking set.
    pub blocking_count: IntGauge,
}

impl NodeMetrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let blocks_processed = register_int_counter_with_registry!(
            Opts::new("calyx_blocks_processed_total", "Total blocks processed by this node"),
            registry
        )
        .expect("failed to register blocks_processed counter");

        let blocks_accepted = register_int_counter_with_registry!(
            Opts::new("calyx_blocks_accepted_total", "Total blocks accepted into the ledger"),
            registry
        )
        .expect("failed to register blocks_accepted counter");

        let status_counts = register_int_counter_vec_with_registry!(
            Opts::new("calyx_block_status_total", "Block processor outcomes by status"),
            &["status"],
            registry
        )
        .expect("failed to register status_counts counter vec");

        let signature_batches_verified = register_int_counter_with_registry!(
            Opts::new("calyx_signature_batches_verified_total", "Total signature-checker batches verified"),
            registry
        )
        .expect("failed to register signature_batches_verified counter");

        let unchecked_count = register_int_gauge_with_registry!(
            Opts::new("calyx_unchecked_count", "Current number of unchecked blocks"),
            registry
        )
        .expect("failed to register unchecked_count gauge");

        let priorities_count = register_int_gauge_with_registry!(
            Opts::new("calyx_priorities_count", "Current size of the ascending-bootstrap priorities set"),
            registry
        )
        .expect("failed to register priorities_count gauge");

        let blocking_count = register_int_gauge_with_registry!(
            Opts::new("calyx_blocking_count", "Current size of the ascending-bootstrap blocking set"),
            registry
        )
        .expect("failed to register blocking_count gauge");

        Self {
            registry,
            blocks_processed,
            blocks_accepted,
            status_counts,
            signature_batches_verified,
            unchecked_count,
            priorities_count,
            blocking_count,
        }
    }

    /// Record one block-processor outcome under its status label.
    pub fn record_status(&self, status: &str) {
        self.blocks_processed.inc();
        self.status_counts.with_label_values(&[status]).inc();
        if status == "progress" {
            self.blocks_accepted.inc();
        }
    }
}

impl Default for NodeMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_status_increments_processed_and_labelled_counter() {
        let metrics = NodeMetrics::new();
        metrics.record_status("progress");
        metrics.record_status("fork");

        assert_eq!(metrics.blocks_processed.get(), 2);
        assert_eq!(metrics.blocks_accepted.get(), 1);
        assert_eq!(metrics.status_counts.with_label_values(&["progress"]).get(), 1);
        assert_eq!(metrics.status_counts.with_label_values(&["fork"]).get(), 1);
    }
}
