//! Node-side orchestration: the block processing pipeline (§4.5), the
//! signature check service (§4.3), the ascending-bootstrap account sets
//! (§4.6), and the ambient config/logging/metrics/error surface that wraps
//! them (SPEC_FULL.md §1).
//!
//! This crate deliberately stops short of wiring these pieces into a
//! running node (peer transport, RPC, wallet UX, election machinery are
//! out of scope — see SPEC_FULL.md's Non-goals); it exposes the engines a
//! node would compose, tested against `calyx-store-lmdb` directly.

pub mod account_sets;
pub mod block_processor;
pub mod config;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod online_weight;
pub mod signature_checker;
pub mod unchecked;

pub use account_sets::{AccountSets, AccountSetsConfig};
pub use block_processor::{
    process_one, BlockContext, BlockProcessor, BlockSource, ProcessOutcome, ProcessingStatus,
};
pub use config::NodeConfig;
pub use error::NodeError;
pub use logging::{init_logging, LogFormat};
pub use metrics::NodeMetrics;
pub use online_weight::OnlineWeightSampler;
pub use signature_checker::{SignatureCheck, SignatureCheckSet, SignatureChecker};
pub use unchecked::UncheckedCache;
