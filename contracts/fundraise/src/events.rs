use soroban_sdk::{contracttype, Address, BytesN};

use crate::storage::Stage;

#[contracttype]
#[derive(Clone, Debug)]
pub struct ProjectCreatedEvent {
    pub project_id: u64,
    pub borrower: Address,
    pub loan_token: Address,
    pub soft_cap: i128,
    pub hard_cap: i128,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct ProjectUpdatedEvent {
    pub project_id: u64,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct WhitelistRootUpdatedEvent {
    pub project_id: u64,
    pub root: BytesN<32>,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct StageChangedEvent {
    pub project_id: u64,
    pub stage: Stage,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct InvestedEvent {
    pub project_id: u64,
    pub investor: Address,
    pub amount: i128,
    pub total_invested: i128,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct WithdrawnEvent {
    pub project_id: u64,
    pub investor: Address,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct FundsReleasedEvent {
    pub project_id: u64,
    pub borrower_amount: i128,
    pub platform_fee: i128,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct RepaymentEvent {
    pub project_id: u64,
    pub amount: i128,
    pub total_repaid: i128,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct ClaimedEvent {
    pub project_id: u64,
    pub investor: Address,
    pub amount: i128,
    pub destination: Address,
}
