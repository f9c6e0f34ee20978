//! # Storage
//!
//! Typed helpers over Soroban's two storage tiers.
//!
//! Instance storage holds the contract singletons: collaborator addresses,
//! the trusted signer key, the global investment nonce, the project-id
//! counter, and the paused flag. Persistent storage holds per-project and
//! per-investor records with independent TTLs:
//!
//! | Key                  | Type               | Description                  |
//! |----------------------|--------------------|------------------------------|
//! | `Project(id)`        | `Project`          | Full project record          |
//! | `Position(id, addr)` | `InvestorPosition` | Per-investor accounting      |
//! | `WhitelistRoot(id)`  | `BytesN<32>`       | Allow-list Merkle root       |
//!
//! Canceled and repaid projects are never deleted; they stay queryable
//! for as long as their TTL is kept alive.

use soroban_sdk::{contracttype, Address, BytesN, Env};

/// Fixed-point percentage scale: 10_000 = 1%, 1_000_000 = 100%.
pub const BASIS_POINTS: i128 = 1_000_000;

/// Largest single extension of `open_deadline` while a project is Open.
pub const MAX_DEADLINE_EXTENSION: u64 = 30 * 86_400;

// ── TTL Constants ────────────────────────────────────────────────────

/// Approximate ledgers per day (~5 seconds per ledger).
const DAY_IN_LEDGERS: u32 = 17_280;

const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
const INSTANCE_LIFETIME_THRESHOLD: u32 = DAY_IN_LEDGERS;

const PERSISTENT_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
const PERSISTENT_LIFETIME_THRESHOLD: u32 = 7 * DAY_IN_LEDGERS;

// ── Types ────────────────────────────────────────────────────────────

/// Project lifecycle stages. Stages only move forward through the legal
/// transition graph; `Canceled` and `Repaid` are terminal.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Stage {
    /// Created, campaign not yet open.
    ComingSoon = 0,
    /// Accepting investments.
    Open = 1,
    /// Terminal: investors withdraw their positions.
    Canceled = 2,
    /// Raise complete (hard cap or deadline over soft cap); awaiting release.
    PreFunded = 3,
    /// Capital released to the borrower; repayments accepted.
    Funded = 4,
    /// Terminal: principal plus investor interest fully repaid.
    Repaid = 5,
}

/// One funding campaign.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Project {
    pub id: u64,
    pub borrower: Address,
    /// The stablecoin this project raises and repays in.
    pub loan_token: Address,
    pub hard_cap: i128,
    pub soft_cap: i128,
    pub total_invested: i128,
    pub total_repaid: i128,
    /// Campaign open time.
    pub start_at: u64,
    /// Deadline for the raise while Open.
    pub open_deadline: u64,
    /// Stamped when the project tips into PreFunded; starts the forced
    /// cancellation clock.
    pub pre_fund_clock_start: u64,
    /// Grace window after PreFunded before anyone may cancel.
    pub pre_fund_duration: u64,
    /// Investor yield, bps of total_invested.
    pub investor_interest_rate: i128,
    /// Platform fee taken at release, bps of total_invested.
    pub platform_interest_rate: i128,
    pub funded_time: u64,
    pub stage: Stage,
}

/// Manager-supplied record for project creation and admin rewrites.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProjectInput {
    pub borrower: Address,
    pub loan_token: Address,
    pub hard_cap: i128,
    pub soft_cap: i128,
    pub start_at: u64,
    pub open_deadline: u64,
    pub pre_fund_duration: u64,
    pub investor_interest_rate: i128,
    pub platform_interest_rate: i128,
    pub stage: Stage,
}

/// Per-(project, investor) accounting.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InvestorPosition {
    /// Cumulative contribution; zeroed on post-cancellation withdrawal.
    pub invested_amount: i128,
    /// Cumulative repayment share already paid out.
    pub total_claimed: i128,
}

// ── Storage Keys ─────────────────────────────────────────────────────

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    Initialized,
    Registry,
    RewardSystem,
    Treasury,
    TrustedSigner,
    Paused,
    Nonce,
    NextProjectId,
    Project(u64),
    Position(u64, Address),
    WhitelistRoot(u64),
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

pub fn set_trusted_signer(env: &Env, signer: &BytesN<32>) {
    env.storage().instance().set(&DataKey::TrustedSigner, signer);
    bump_instance(env);
}

pub fn get_trusted_signer(env: &Env) -> Option<BytesN<32>> {
    bump_instance(env);
    env.storage().instance().get(&DataKey::TrustedSigner)
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

pub fn get_nonce(env: &Env) -> u64 {
    bump_instance(env);
    env.storage().instance().get(&DataKey::Nonce).unwrap_or(0)
}

pub fn set_nonce(env: &Env, nonce: u64) {
    env.storage().instance().set(&DataKey::Nonce, &nonce);
    bump_instance(env);
}

/// Atomically reads, increments, and stores the project counter.
/// Returns the ID to use for the *current* project (pre-increment value).
pub fn get_and_increment_project_id(env: &Env) -> u64 {
    bump_instance(env);
    let current: u64 = env
        .storage()
        .instance()
        .get(&DataKey::NextProjectId)
        .unwrap_or(0);
    env.storage()
        .instance()
        .set(&DataKey::NextProjectId, &(current + 1));
    current
}

// ── Persistent Storage Helpers ───────────────────────────────────────

fn bump_persistent(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
}

pub fn load_project(env: &Env, id: u64) -> Option<Project> {
    let key = DataKey::Project(id);
    let project: Option<Project> = env.storage().persistent().get(&key);
    if project.is_some() {
        bump_persistent(env, &key);
    }
    project
}

pub fn save_project(env: &Env, project: &Project) {
    let key = DataKey::Project(project.id);
    env.storage().persistent().set(&key, project);
    bump_persistent(env, &key);
}

pub fn load_position(env: &Env, project_id: u64, investor: &Address) -> InvestorPosition {
    let key = DataKey::Position(project_id, investor.clone());
    match env.storage().persistent().get(&key) {
        Some(position) => {
            bump_persistent(env, &key);
            position
        }
        None => InvestorPosition {
            invested_amount: 0,
            total_claimed: 0,
        },
    }
}

pub fn save_position(env: &Env, project_id: u64, investor: &Address, position: &InvestorPosition) {
    let key = DataKey::Position(project_id, investor.clone());
    env.storage().persistent().set(&key, position);
    bump_persistent(env, &key);
}

pub fn get_whitelist_root(env: &Env, project_id: u64) -> Option<BytesN<32>> {
    let key = DataKey::WhitelistRoot(project_id);
    let root: Option<BytesN<32>> = env.storage().persistent().get(&key);
    if root.is_some() {
        bump_persistent(env, &key);
    }
    root
}

pub fn set_whitelist_root(env: &Env, project_id: u64, root: &BytesN<32>) {
    let key = DataKey::WhitelistRoot(project_id);
    env.storage().persistent().set(&key, root);
    bump_persistent(env, &key);
}
