//! # Storage
//!
//! Typed helpers over Soroban's two storage tiers.
//!
//! Instance storage holds the contract singletons: collaborator addresses,
//! reward parameters, and the paused flag. Persistent storage holds the
//! per-user and per-project reward records with independent TTLs:
//!
//! | Key                   | Type            | Description                        |
//! |-----------------------|-----------------|------------------------------------|
//! | `Profile(addr)`       | `UserProfile`   | Inviter link + new-user flag       |
//! | `Accrual(addr, id)`   | `RewardAccrual` | USDC/token accrual per project     |
//! | `VestingStart(id)`    | `u64`           | Per-project vesting clock          |
//! | `PendingMint(id)`     | `i128`          | Tokens awaiting activation mint    |
//! | `InviterStats(addr)`  | `InviterStats`  | Aggregate referral statistics      |

use soroban_sdk::{contracttype, Address, Env};

/// Fixed-point percentage scale: 10_000 = 1%, 1_000_000 = 100%.
pub const BASIS_POINTS: i128 = 1_000_000;

/// Lower bound for configurable rates (0.1%).
pub const MIN_RATE: i128 = 1_000;

/// Stablecoin headroom added on top of the reverse quote when executing the
/// activation buyback (5 USDC at 6 decimals).
pub const BUYBACK_SLIPPAGE: i128 = 5_000_000;

/// Seconds the buyback swap stays valid once submitted.
pub const SWAP_DEADLINE_SECS: u64 = 300;

/// Ledgers the venue allowance stays live (~5 minutes at 5s/ledger).
pub const APPROVE_LIVE_LEDGERS: u32 = 60;

// ── TTL Constants ────────────────────────────────────────────────────

/// Approximate ledgers per day (~5 seconds per ledger).
const DAY_IN_LEDGERS: u32 = 17_280;

const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
const INSTANCE_LIFETIME_THRESHOLD: u32 = DAY_IN_LEDGERS;

const PERSISTENT_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
const PERSISTENT_LIFETIME_THRESHOLD: u32 = 7 * DAY_IN_LEDGERS;

// ── Types ────────────────────────────────────────────────────────────

/// Per-user referral profile. The inviter link is written at most once,
/// ever; `is_new_user` flips to false on the first bonus-eligible
/// investment and never back.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UserProfile {
    pub inviter: Option<Address>,
    pub is_new_user: bool,
}

/// Accumulated rewards for one (beneficiary, project) pair.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardAccrual {
    /// Stablecoin bonus balance; reset to zero on claim.
    pub usdc: i128,
    /// Total platform-token entitlement under vesting.
    pub tokens: i128,
    /// Tokens already released against the entitlement.
    pub vesting_claimed: i128,
}

/// Aggregate statistics per inviter across all projects.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InviterStats {
    pub invited_count: u32,
    pub total_usdc: i128,
}

/// Tunable reward parameters. The four rates are constrained to
/// `[MIN_RATE, BASIS_POINTS]`; the remaining fields are free.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardParams {
    pub referral_rate: i128,
    pub token_rate: i128,
    pub burn_rate: i128,
    pub weekly_unlock_rate: i128,
    pub welcome_bonus: i128,
    pub min_investment_for_bonus: i128,
    pub vesting_weeks: u32,
}

impl RewardParams {
    /// Reference-deployment defaults: 2% referral commission, 1% token
    /// allocation, buyback-and-burn enabled, 2.5%/week over 40 weeks,
    /// 30 USDC welcome bonus above a 1_000 USDC threshold (6 decimals).
    pub fn default(_env: &Env) -> Self {
        RewardParams {
            referral_rate: 20_000,
            token_rate: 10_000,
            burn_rate: 10_000,
            weekly_unlock_rate: 25_000,
            welcome_bonus: 30_000_000,
            min_investment_for_bonus: 1_000_000_000,
            vesting_weeks: 40,
        }
    }
}

/// (user, project) pair for the batch send entry points.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardTarget {
    pub user: Address,
    pub project_id: u64,
}

/// Manual vesting grant for `distribute_vesting_tokens`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VestingGrant {
    pub user: Address,
    pub project_id: u64,
    pub amount: i128,
}

/// Read-model for the vesting accessor.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VestingInfo {
    pub vesting_start: u64,
    pub total_tokens: i128,
    pub vesting_claimed: i128,
    pub claimable: i128,
}

// ── Storage Keys ─────────────────────────────────────────────────────

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    Initialized,
    Registry,
    Fundraise,
    PlatformToken,
    Stablecoin,
    MarketVenue,
    Params,
    Paused,
    Profile(Address),
    Accrual(Address, u64),
    VestingStart(u64),
    PendingMint(u64),
    InviterStats(Address),
}

// ── Instance Storage Helpers ─────────────────────────────────────────

fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

pub fn is_initialized(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Initialized)
}

pub fn set_initialized(env: &Env) {
    env.storage().instance().set(&DataKey::Initialized, &true);
    bump_instance(env);
}

pub fn set_address(env: &Env, key: DataKey, addr: &Address) {
    env.storage().instance().set(&key, addr);
    bump_instance(env);
}

pub fn get_address(env: &Env, key: DataKey) -> Option<Address> {
    bump_instance(env);
    env.storage().instance().get(&key)
}

pub fn set_paused(env: &Env, paused: bool) {
    env.storage().instance().set(&DataKey::Paused, &paused);
    bump_instance(env);
}

pub fn is_paused(env: &Env) -> bool {
    env.storage()
        .instance()
        .get(&DataKey::Paused)
        .unwrap_or(false)
}

pub fn set_params(env: &Env, params: &RewardParams) {
    env.storage().instance().set(&DataKey::Params, params);
    bump_instance(env);
}

pub fn get_params(env: &Env) -> RewardParams {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::Params)
        .unwrap_or_else(|| RewardParams::default(env))
}

// ── Persistent Storage Helpers ───────────────────────────────────────

fn bump_persistent(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
}

pub fn load_profile(env: &Env, user: &Address) -> UserProfile {
    let key = DataKey::Profile(user.clone());
    match env.storage().persistent().get(&key) {
        Some(profile) => {
            bump_persistent(env, &key);
            profile
        }
        None => UserProfile {
            inviter: None,
            is_new_user: true,
        },
    }
}

pub fn save_profile(env: &Env, user: &Address, profile: &UserProfile) {
    let key = DataKey::Profile(user.clone());
    env.storage().persistent().set(&key, profile);
    bump_persistent(env, &key);
}

pub fn load_accrual(env: &Env, user: &Address, project_id: u64) -> RewardAccrual {
    let key = DataKey::Accrual(user.clone(), project_id);
    match env.storage().persistent().get(&key) {
        Some(accrual) => {
            bump_persistent(env, &key);
            accrual
        }
        None => RewardAccrual {
            usdc: 0,
            tokens: 0,
            vesting_claimed: 0,
        },
    }
}

pub fn save_accrual(env: &Env, user: &Address, project_id: u64, accrual: &RewardAccrual) {
    let key = DataKey::Accrual(user.clone(), project_id);
    env.storage().persistent().set(&key, accrual);
    bump_persistent(env, &key);
}

/// The per-project vesting clock. First write wins; callers must check
/// before setting.
pub fn get_vesting_start(env: &Env, project_id: u64) -> Option<u64> {
    let key = DataKey::VestingStart(project_id);
    let start: Option<u64> = env.storage().persistent().get(&key);
    if start.is_some() {
        bump_persistent(env, &key);
    }
    start
}

pub fn set_vesting_start(env: &Env, project_id: u64, start: u64) {
    let key = DataKey::VestingStart(project_id);
    env.storage().persistent().set(&key, &start);
    bump_persistent(env, &key);
}

pub fn get_pending_mint(env: &Env, project_id: u64) -> i128 {
    env.storage()
        .persistent()
        .get(&DataKey::PendingMint(project_id))
        .unwrap_or(0)
}

pub fn add_pending_mint(env: &Env, project_id: u64, amount: i128) {
    let key = DataKey::PendingMint(project_id);
    let current: i128 = env.storage().persistent().get(&key).unwrap_or(0);
    env.storage().persistent().set(&key, &(current + amount));
    bump_persistent(env, &key);
}

/// Reads and clears the pending-mint tally; the tally is consumed exactly
/// once, at activation.
pub fn take_pending_mint(env: &Env, project_id: u64) -> i128 {
    let key = DataKey::PendingMint(project_id);
    let current: i128 = env.storage().persistent().get(&key).unwrap_or(0);
    if current != 0 {
        env.storage().persistent().remove(&key);
    }
    current
}

pub fn load_inviter_stats(env: &Env, inviter: &Address) -> InviterStats {
    let key = DataKey::InviterStats(inviter.clone());
    match env.storage().persistent().get(&key) {
        Some(stats) => {
            bump_persistent(env, &key);
            stats
        }
        None => InviterStats {
            invited_count: 0,
            total_usdc: 0,
        },
    }
}

pub fn save_inviter_stats(env: &Env, inviter: &Address, stats: &InviterStats) {
    let key = DataKey::InviterStats(inviter.clone());
    env.storage().persistent().set(&key, stats);
    bump_persistent(env, &key);
}
