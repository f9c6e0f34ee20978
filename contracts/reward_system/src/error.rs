use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    // ============================================
    // INITIALIZATION ERRORS (1-9)
    // ============================================
    /// Contract already initialized
    AlreadyInitialized = 1,
    /// Contract not initialized
    NotInitialized = 2,
    /// Platform token / stablecoin / market venue not configured yet
    ContractsNotSet = 3,

    // ============================================
    // AUTHORIZATION ERRORS (10-19)
    // ============================================
    /// Caller does not hold the manager role
    NotManager = 10,

    // ============================================
    // PARAMETER ERRORS (20-29)
    // ============================================
    /// Rate outside the [MIN_RATE, BASIS_POINTS] range
    InvalidParameter = 20,
    /// Amount must be positive
    InvalidAmount = 21,
    /// Arithmetic overflow
    Overflow = 22,

    // ============================================
    // REFERRAL ERRORS (30-39)
    // ============================================
    /// A user cannot register themselves as their own inviter
    SelfReferral = 30,

    // ============================================
    // VESTING / ACTIVATION ERRORS (40-49)
    // ============================================
    /// Project rewards not activated (vesting clock unset)
    RewardsNotActive = 40,
    /// Project rewards already activated (vesting clock set)
    AlreadyActivated = 41,

    // ============================================
    // CLAIM ERRORS (50-59)
    // ============================================
    /// Nothing accrued or unlockable for this (user, project)
    NothingToClaim = 50,
    /// Engine token balance does not cover the unlockable amount
    InsufficientRewardBalance = 51,
    /// Engine stablecoin balance does not cover the buyback cost
    InsufficientBuybackFunds = 52,

    // ============================================
    // MARKET VENUE ERRORS (60-69)
    // ============================================
    /// Venue reverted the quote (typically no liquidity)
    NoLiquidity = 60,
    /// Venue quoted zero output for a nonzero input
    ZeroQuote = 61,
    /// Venue reverted the buyback swap
    SwapFailed = 62,

    // ============================================
    // OPERATIONAL ERRORS (70-79)
    // ============================================
    /// Contract is paused
    ContractPaused = 70,
}
