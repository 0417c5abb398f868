//! Genesis block construction — supplemental to the distilled spec (not
//! present there), carried because every concrete network needs a
//! deterministic first block. Generalised from the teacher's
//! `ledger::genesis`: one canonical `open` block per network, parameterised
//! by network id rather than hard-coded per-network constants (§9's design
//! note already asks for network selection to be injected configuration).

use calyx_crypto::blake2b_256;
use calyx_types::{Account, Amount, Hash, Signature, WorkNonce};

use crate::block::{Block, OpenBlock};

/// Which network a node is configured for — read once at start-up and
/// passed down as configuration rather than a process-wide global (§9).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkId {
    Live,
    Beta,
    Test,
    Dev,
}

impl NetworkId {
    pub fn as_str(&self) -> &'static str {
        match self {
            NetworkId::Live => "live",
            NetworkId::Beta => "beta",
            NetworkId::Test => "test",
            NetworkId::Dev => "dev",
        }
    }
}

/// Everything needed to construct a network's genesis block.
pub struct GenesisConfig {
    pub network: NetworkId,
    pub creator: Account,
    /// The full initial supply, credited to the genesis account in the
    /// ledger's opening `account_info` entry. The legacy `open` block
    /// itself carries no balance field (§6), so this is not part of the
    /// block's hash preimage — only of the ledger state it seeds.
    pub initial_supply: Amount,
}

/// Construct the genesis `open` block for a network. Deterministic: the
/// same `GenesisConfig` always produces the same hash, since the block
/// carries no timestamp or nonce of its own beyond a zero work value.
pub fn create_genesis_block(config: &GenesisConfig) -> Block {
    Block::Open(OpenBlock {
        source: genesis_source(&config.network),
        representative: config.creator,
        account: config.creator,
        signature: Signature::ZERO,
        work: WorkNonce(0),
    })
}

/// The deterministic genesis hash for a network, using that network's
/// canonical creator account — useful for hardcoding known genesis hashes
/// at bootstrap without constructing the full block each time.
pub fn genesis_hash(network: NetworkId) -> Hash {
    let config = GenesisConfig { network, creator: genesis_creator(network), initial_supply: Amount::ZERO };
    create_genesis_block(&config).hash()
}

/// Canonical genesis creator account per network. Real private keys for
/// `Live` are unknown by design (generated and discarded at launch); the
/// `Test`/`Dev` keys are published for reproducible local networks.
pub fn genesis_creator(network: NetworkId) -> Account {
    let seed = blake2b_256(format!("calyx-genesis-creator-{}", network.as_str()).as_bytes());
    Account::new(seed)
}

/// A per-network marker folded into the genesis `source` field so that
/// otherwise-identical genesis configurations on different networks still
/// produce distinct blocks.
fn genesis_source(network: &NetworkId) -> Hash {
    Hash::new(blake2b_256(format!("calyx-genesis-source-{}", network.as_str()).as_bytes()))
}
