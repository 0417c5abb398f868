//! Block & vote model, account-chain bookkeeping, and ledger coordination
//! for the block-lattice core.
//!
//! Each account owns its own chain; blocks are asynchronous and there is
//! no global ordering. Consensus (elections, vote tallying) lives outside
//! this crate — it only needs to resolve forks, which `AccountChain`
//! detects and the block processor (`calyx-node`) rolls back.

pub mod account_chain;
pub mod block;
pub mod epoch;
pub mod error;
pub mod frontier;
pub mod genesis;
pub mod ledger;
pub mod ledger_cache;
pub mod pruning;
pub mod sideband;
pub mod uniquer;
pub mod vote;

pub use account_chain::AccountChain;
pub use block::{Block, ChangeBlock, OpenBlock, ReceiveBlock, SendBlock, StateBlock};
pub use epoch::{EpochInfo, EpochSet};
pub use error::LedgerError;
pub use frontier::DagFrontier;
pub use genesis::{create_genesis_block, genesis_creator, genesis_hash, GenesisConfig, NetworkId};
pub use ledger::{Ledger, LedgerSummary};
pub use ledger_cache::LedgerCache;
pub use pruning::{LedgerPruner, PruneCandidate, PruneResult, PruningConfig};
pub use sideband::{decode_stored, encode_stored, BlockDetails, Sideband};
pub use uniquer::{vote_uniquing_key, BlockUniquer, VoteUniquer};
pub use vote::Vote;
