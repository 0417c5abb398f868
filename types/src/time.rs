use std::time::{SystemTime, UNIX_EPOCH};

/// A Unix timestamp in whole seconds.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, serde::Serialize, serde::Deserialize)]
pub struct Timestamp(pub u64);

impl Timestamp {
    pub fn new(secs: u64) -> Self {
        Timestamp(secs)
    }

    pub fn now() -> Self {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system clock before unix epoch")
            .as_secs();
        Timestamp(secs)
    }

    pub fn as_secs(&self) -> u64 {
        self.0
    }
}

/// Milliseconds since the Unix epoch — used by the ascending-bootstrap
/// account sets' cooldown clock and by vote timestamps.
pub fn millis_since_epoch() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before unix epoch")
        .as_millis() as u64
}
