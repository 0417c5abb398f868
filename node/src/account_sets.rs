//! Ascending-bootstrap account selection (§4.6).
//!
//! Tracks which accounts are candidates for ascending bootstrap ("priorities")
//! and which are waiting on an unresolved dependency ("blocking"), and picks
//! the next account to walk. Generalised from the priority/blocking maps in
//! `bootstrap_ascending::account_sets`, with two deliberate departures:
//!
//! - `priority_up` is additive (`min(p + priority_increase, priority_max)`)
//!   rather than multiplicative, per the distilled spec's resolution of an
//!   Open Question in favour of the simpler, saturating rule.
//! - `next_blocking`'s round-robin cursor lives on [`AccountSets`] itself
//!   instead of a function-local static — the latter is a concurrency
//!   hazard once more than one thread can call into the same account-sets
//!   instance.

use std::collections::{BTreeSet, HashMap};

use calyx_types::{Account, Hash};

/// Tuning knobs for the two sets. Mirrors the relevant slice of
/// [`crate::NodeConfig`]; kept as its own small struct so account-sets tests
/// don't need a full node configuration.
#[derive(Clone, Copy, Debug)]
pub struct AccountSetsConfig {
    pub priorities_max: usize,
    pub blocking_max: usize,
    pub cooldown_ms: u64,
    pub priority_initial: f64,
    pub priority_increase: f64,
    pub priority_decrease: f64,
    pub priority_max: f64,
    pub priority_cutoff: f64,
}

impl Default for AccountSetsConfig {
    fn default() -> Self {
        Self {
            priorities_max: 256,
            blocking_max: 256,
            cooldown_ms: 1_000,
            priority_initial: 2.0,
            priority_increase: 2.0,
            priority_decrease: 0.5,
            priority_max: 128.0,
            priority_cutoff: 1.0,
        }
    }
}

#[derive(Clone, Debug)]
struct PriorityEntry {
    priority: f64,
    timestamp: u64,
}

#[derive(Clone, Debug)]
struct BlockingEntry {
    /// The account's prior priority entry, reinstated by `unblock` if the
    /// dependency it was blocked on turns out to resolve. `None` stands for
    /// the "zero sentinel": the account had no priority entry at `block`
    /// time and should not gain one from merely unblocking.
    original: Option<f64>,
    dependency: Hash,
    /// Monotonic sequence number, used to give `next_blocking` a stable
    /// round-robin order independent of account byte order.
    sequence: u64,
    /// Cooldown clock, stamped whenever `next_blocking` returns this entry.
    timestamp: u64,
}

/// Ascending-bootstrap candidate tracking: a priority-ordered set of accounts
/// ready to walk, and a blocked set waiting on a dependency to resolve.
pub struct AccountSets {
    config: AccountSetsConfig,
    priorities: HashMap<Account, PriorityEntry>,
    /// (priority bits, account) ordered index mirroring `priorities`, used
    /// for `next()`'s highest-priority-first scan and for `trim_overflow`'s
    /// lowest-priority eviction.
    priority_order: BTreeSet<(PriorityKey, Account)>,
    blocking: HashMap<Account, BlockingEntry>,
    /// (sequence, account) insertion-order index mirroring `blocking`, used
    /// by `next_blocking`'s round-robin cursor.
    blocking_order: BTreeSet<(u64, Account)>,
    next_sequence: u64,
    /// Cursor into `blocking_order` for round-robin `next_blocking` picks.
    /// Replaces the original's function-local static iterator — state lives
    /// on the instance so concurrent callers don't share mutable statics.
    blocking_cursor: Option<Account>,
}

/// `f64` ordered by bit pattern, descending-priority-first when read via
/// `.rev()`. Priorities here are always finite and non-negative, so bit
/// ordering agrees with numeric ordering.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
struct PriorityKey(u64);

impl PriorityKey {
    fn from_f64(v: f64) -> Self {
        PriorityKey(v.to_bits())
    }
}

impl AccountSets {
    pub fn new(config: AccountSetsConfig) -> Self {
        Self {
            config,
            priorities: HashMap::new(),
            priority_order: BTreeSet::new(),
            blocking: HashMap::new(),
            blocking_order: BTreeSet::new(),
            next_sequence: 0,
            blocking_cursor: None,
        }
    }

    /// Raise `account`'s priority by `priority_increase`, saturating at
    /// `priority_max`. Inserts at `priority_initial` if the account has no
    /// entry yet. No-op if the account is currently blocked.
    pub fn priority_up(&mut self, account: Account) {
        if self.blocking.contains_key(&account) {
            return;
        }
        let current = self.priorities.get(&account).map(|e| e.priority);
        let updated = match current {
            Some(p) => (p + self.config.priority_increase).min(self.config.priority_max),
            None => self.config.priority_initial,
        };
        self.set_priority(account, updated, 0);
        self.trim_overflow_priorities();
    }

    /// Lower `account`'s priority by `priority_decrease`; erases the entry
    /// entirely once it falls to or below `priority_cutoff`.
    pub fn priority_down(&mut self, account: Account) {
        let Some(entry) = self.priorities.get(&account) else {
            return;
        };
        let updated = entry.priority - self.config.priority_decrease;
        if updated <= self.config.priority_cutoff {
            self.erase_priority(&account);
        } else {
            let timestamp = entry.timestamp;
            self.set_priority(account, updated, timestamp);
        }
    }

    /// Move `account` from priorities to blocking, recording `dependency` as
    /// the hash it's waiting on. Preserves the prior priority value so
    /// `unblock` can restore it; an account with no priority entry is
    /// recorded as a zero sentinel (`original: None`).
    pub fn block(&mut self, account: Account, dependency: Hash) {
        let original = self.priorities.get(&account).map(|e| e.priority);
        self.erase_priority(&account);

        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.blocking_order.retain(|(_, a)| *a != account);
        self.blocking.insert(account, BlockingEntry { original, dependency, sequence, timestamp: 0 });
        self.blocking_order.insert((sequence, account));
        self.trim_overflow_blocking();
    }

    /// Resolve a blocking entry. If `hash` is given and doesn't match the
    /// recorded dependency, this is a no-op (the wrong dependency resolved).
    /// Restores the account to priorities at its original priority, or
    /// `priority_initial` if it had none.
    pub fn unblock(&mut self, account: Account, hash: Option<Hash>) {
        let Some(entry) = self.blocking.get(&account) else {
            return;
        };
        if let Some(h) = hash {
            if entry.dependency != h {
                return;
            }
        }
        let restored = entry.original.unwrap_or(self.config.priority_initial);
        self.blocking.remove(&account);
        self.blocking_order.retain(|(_, a)| *a != account);
        if self.blocking_cursor == Some(account) {
            self.blocking_cursor = None;
        }
        self.set_priority(account, restored, 0);
        self.trim_overflow_priorities();
    }

    /// Stamp `account`'s cooldown clock. `reset = true` clears it (makes the
    /// account immediately eligible again).
    pub fn timestamp(&mut self, account: Account, now: u64, reset: bool) {
        if let Some(entry) = self.priorities.get_mut(&account) {
            entry.timestamp = if reset { 0 } else { now };
        }
    }

    /// Whether `account` may be picked again: `false` while its cooldown
    /// hasn't elapsed.
    fn check_timestamp(&self, account: &Account, now: u64) -> bool {
        match self.priorities.get(account) {
            Some(entry) => now.saturating_sub(entry.timestamp) >= self.config.cooldown_ms,
            None => false,
        }
    }

    /// Highest-priority account eligible for a new bootstrap request, or
    /// `Account::ZERO` if none qualifies (every candidate is cooling down,
    /// or the set is empty).
    pub fn next(&self, now: u64) -> Account {
        for (_, account) in self.priority_order.iter().rev() {
            if self.check_timestamp(account, now) {
                return *account;
            }
        }
        Account::ZERO
    }

    /// Round-robin across blocking entries whose own cooldown has elapsed,
    /// advancing the instance's cursor each call and stamping the returned
    /// entry's cooldown clock. Returns `Account::ZERO` if nothing is blocked
    /// or every entry is still cooling down.
    pub fn next_blocking(&mut self, now: u64) -> Account {
        if self.blocking_order.is_empty() {
            self.blocking_cursor = None;
            return Account::ZERO;
        }

        let start_seq = self
            .blocking_cursor
            .and_then(|cur| self.blocking.get(&cur).map(|e| e.sequence))
            .map(|seq| seq + 1)
            .unwrap_or(0);

        let ordered: Vec<Account> = self
            .blocking_order
            .range((start_seq, Account::ZERO)..)
            .chain(self.blocking_order.range(..(start_seq, Account::ZERO)))
            .map(|(_, a)| *a)
            .collect();

        for account in ordered {
            let eligible = self
                .blocking
                .get(&account)
                .map(|e| now.saturating_sub(e.timestamp) >= self.config.cooldown_ms)
                .unwrap_or(false);
            if eligible {
                self.blocking_cursor = Some(account);
                if let Some(entry) = self.blocking.get_mut(&account) {
                    entry.timestamp = now;
                }
                return account;
            }
        }
        Account::ZERO
    }

    pub fn blocked(&self, account: &Account) -> bool {
        self.blocking.contains_key(account)
    }

    pub fn priority_size(&self) -> usize {
        self.priorities.len()
    }

    pub fn blocked_size(&self) -> usize {
        self.blocking.len()
    }

    /// Current priority value for `account`: `0.0` if blocked, the stored
    /// value if tracked, else the cutoff default for an unknown account.
    pub fn priority(&self, account: &Account) -> f64 {
        if self.blocking.contains_key(account) {
            return 0.0;
        }
        self.priorities.get(account).map(|e| e.priority).unwrap_or(self.config.priority_cutoff)
    }

    fn set_priority(&mut self, account: Account, priority: f64, timestamp: u64) {
        if let Some(old) = self.priorities.get(&account) {
            self.priority_order.remove(&(PriorityKey::from_f64(old.priority), account));
        }
        self.priority_order.insert((PriorityKey::from_f64(priority), account));
        self.priorities.insert(account, PriorityEntry { priority, timestamp });
    }

    fn erase_priority(&mut self, account: &Account) {
        if let Some(old) = self.priorities.remove(account) {
            self.priority_order.remove(&(PriorityKey::from_f64(old.priority), *account));
        }
    }

    /// Evict the lowest-priority entry while `priorities` exceeds its cap.
    fn trim_overflow_priorities(&mut self) {
        while self.priorities.len() > self.config.priorities_max {
            let Some(&(_, lowest)) = self.priority_order.iter().next() else { break };
            self.erase_priority(&lowest);
        }
    }

    /// Evict the oldest (lowest-sequence) blocking entry while `blocking`
    /// exceeds its cap.
    fn trim_overflow_blocking(&mut self) {
        while self.blocking.len() > self.config.blocking_max {
            let Some(&(_, oldest)) = self.blocking_order.iter().next() else { break };
            if self.blocking_cursor == Some(oldest) {
                self.blocking_cursor = None;
            }
            self.blocking.remove(&oldest);
            self.blocking_order.retain(|(_, a)| a != &oldest);
        }
    }
}
