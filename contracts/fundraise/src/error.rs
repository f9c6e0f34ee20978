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

    // ============================================
    // AUTHORIZATION ERRORS (10-19)
    // ============================================
    /// Caller does not hold the manager role
    NotManager = 10,
    /// Caller is neither the subject of the operation nor a manager
    NotAuthorized = 11,

    // ============================================
    // PROJECT / STAGE ERRORS (20-29)
    // ============================================
    /// Project does not exist (or both caps are zero)
    ProjectNotFound = 20,
    /// Investment only accepted while the project is open
    StageNotOpen = 21,
    /// Withdrawal only possible once the project is canceled
    ProjectNotCanceled = 22,
    /// Repayment only accepted while the project is funded
    ProjectNotFunded = 23,
    /// Claims only available once the project is funded or repaid
    ClaimNotAvailable = 24,
    /// Cancellation not allowed from the current stage
    CancelNotAllowed = 25,
    /// Project no longer editable (stage past Open)
    ProjectNotEditable = 26,
    /// A ComingSoon rewrite must itself specify ComingSoon
    InvalidStageChange = 27,

    // ============================================
    // INVESTMENT ERRORS (30-39)
    // ============================================
    /// Supplied nonce is not the next sequential value
    NonceMismatch = 30,
    /// Investment would push total_invested past the hard cap
    HardCapExceeded = 31,
    /// The borrower cannot invest in their own project
    BorrowerCannotInvest = 32,
    /// A user cannot name themselves as their inviter
    SelfReferral = 33,
    /// Funds release from Open requires the soft cap reached
    SoftCapNotReached = 34,

    // ============================================
    // PAYOUT ERRORS (40-49)
    // ============================================
    /// No recorded position to withdraw
    NothingToWithdraw = 40,

    // ============================================
    // AMOUNT / UPDATE ERRORS (50-59)
    // ============================================
    /// Amount must be positive
    InvalidAmount = 50,
    /// Arithmetic overflow
    Overflow = 51,
    /// open_deadline may only move forward, at most 30 days per call
    InvalidDeadlineChange = 52,
    /// Interest rates may only increase while Open
    RateDecreaseForbidden = 53,

    // ============================================
    // OPERATIONAL ERRORS (60-69)
    // ============================================
    /// Contract is paused
    ContractPaused = 60,
}
