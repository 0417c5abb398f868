//! Per-epoch PoW difficulty thresholds.
//!
//! The network tightens proof-of-work requirements across epoch upgrades:
//! `epoch_1` is the base (pre-upgrade) threshold; `epoch_2` raises the bar
//! for sends; `epoch_2_receive` is an easier threshold for receives and
//! epoch blocks so legitimate low-value accounts aren't priced out.

/// Which of the three configured thresholds a block must clear.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WorkBlockKind {
    Epoch1,
    Epoch2,
    Epoch2Receive,
}

const BASE_THRESHOLD: u64 = 0xFFFFFE00_00000000;
const EPOCH_2_MULTIPLIER: f64 = 8.0;
const EPOCH_2_RECEIVE_MULTIPLIER: f64 = 2.0;

/// The three configured PoW thresholds.
///
/// Higher threshold values mean harder work is required. `multiply` scales
/// difficulty by shrinking the "inverse gap" (`u64::MAX - threshold`), which
/// raises the bar the work nonce must clear.
#[derive(Clone, Copy, Debug)]
pub struct WorkThresholds {
    pub epoch_1: u64,
    pub epoch_2: u64,
    pub epoch_2_receive: u64,
}

impl WorkThresholds {
    pub fn new() -> Self {
        let epoch_1 = BASE_THRESHOLD;
        Self {
            epoch_1,
            epoch_2: multiply(epoch_1, EPOCH_2_MULTIPLIER),
            epoch_2_receive: multiply(epoch_1, EPOCH_2_RECEIVE_MULTIPLIER),
        }
    }

    /// Construct with a custom base (useful in tests or low-difficulty devnets).
    pub fn with_base(epoch_1: u64) -> Self {
        Self {
            epoch_1,
            epoch_2: multiply(epoch_1, EPOCH_2_MULTIPLIER),
            epoch_2_receive: multiply(epoch_1, EPOCH_2_RECEIVE_MULTIPLIER),
        }
    }

    pub fn threshold_for(&self, kind: WorkBlockKind) -> u64 {
        match kind {
            WorkBlockKind::Epoch1 => self.epoch_1,
            WorkBlockKind::Epoch2 => self.epoch_2,
            WorkBlockKind::Epoch2Receive => self.epoch_2_receive,
        }
    }

    /// Select the threshold a block must clear, per the core's selection
    /// rule: `epoch_2` for sends in epoch ≥ 2, `epoch_2_receive` for
    /// receives/epoch-blocks in epoch ≥ 2, `epoch_1` otherwise.
    pub fn select(&self, epoch: u8, is_send: bool, is_receive_or_epoch: bool) -> u64 {
        if epoch >= 2 && is_send {
            self.epoch_2
        } else if epoch >= 2 && is_receive_or_epoch {
            self.epoch_2_receive
        } else {
            self.epoch_1
        }
    }
}

impl Default for WorkThresholds {
    fn default() -> Self {
        Self::new()
    }
}

/// Scale difficulty: higher threshold = harder work. `base == 0` (PoW
/// disabled) propagates as 0.
fn multiply(base: u64, multiplier: f64) -> u64 {
    if base == 0 {
        return 0;
    }
    let difficulty_inv = u64::MAX - base;
    let scaled_inv = (difficulty_inv as f64 / multiplier) as u64;
    u64::MAX - scaled_inv
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epoch_2_harder_than_epoch_1() {
        let t = WorkThresholds::new();
        assert!(t.epoch_2 > t.epoch_1);
    }

    #[test]
    fn epoch_2_receive_easier_than_epoch_2() {
        let t = WorkThresholds::new();
        assert!(t.epoch_2_receive < t.epoch_2);
    }

    #[test]
    fn select_send_in_epoch_2_uses_epoch_2() {
        let t = WorkThresholds::new();
        assert_eq!(t.select(2, true, false), t.epoch_2);
    }

    #[test]
    fn select_receive_in_epoch_2_uses_epoch_2_receive() {
        let t = WorkThresholds::new();
        assert_eq!(t.select(2, false, true), t.epoch_2_receive);
    }

    #[test]
    fn select_pre_epoch_2_uses_epoch_1() {
        let t = WorkThresholds::new();
        assert_eq!(t.select(1, true, false), t.epoch_1);
        assert_eq!(t.select(1, false, true), t.epoch_1);
    }

    #[test]
    fn zero_base_stays_zero_everywhere() {
        let t = WorkThresholds::with_base(0);
        assert_eq!(t.epoch_1, 0);
        assert_eq!(t.epoch_2, 0);
        assert_eq!(t.epoch_2_receive, 0);
    }
}
