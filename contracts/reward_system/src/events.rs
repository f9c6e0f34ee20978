use soroban_sdk::{contracttype, Address};

#[contracttype]
#[derive(Clone, Debug)]
pub struct InviterRegisteredEvent {
    pub user: Address,
    pub inviter: Address,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct ReferralAccruedEvent {
    pub inviter: Address,
    pub user: Address,
    pub project_id: u64,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct WelcomeBonusEvent {
    pub user: Address,
    pub project_id: u64,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct TokenRewardAccruedEvent {
    pub user: Address,
    pub project_id: u64,
    pub stable_in: i128,
    pub tokens: i128,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct RewardsActivatedEvent {
    pub project_id: u64,
    pub total_invested: i128,
    pub minted: i128,
    pub burned: i128,
    pub vesting_start: u64,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct UsdcClaimedEvent {
    pub user: Address,
    pub project_id: u64,
    pub amount: i128,
    pub destination: Address,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct TokensClaimedEvent {
    pub user: Address,
    pub project_id: u64,
    pub amount: i128,
    pub destination: Address,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct VestingGrantedEvent {
    pub user: Address,
    pub project_id: u64,
    pub amount: i128,
}
