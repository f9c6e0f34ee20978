//! Client interfaces for the collaborators the fundraise contract
//! consumes: the role/claim-address registry and the reward engine.

use soroban_sdk::{contractclient, Address, Env};

#[contractclient(name = "RegistryClient")]
pub trait ManagerRegistry {
    fn is_manager(env: Env, addr: Address) -> bool;
    fn get_investor_claim_address(env: Env, investor: Address) -> Address;
}

/// The reward engine's two fundraise-only mutators. Both are invoked
/// without `try_` on purpose: a reward failure must revert the enclosing
/// investment or funds release.
#[contractclient(name = "RewardEngineClient")]
pub trait RewardEngine {
    fn record_investment(
        env: Env,
        user: Address,
        amount: i128,
        inviter: Option<Address>,
        project_id: u64,
    );
    fn activate_project_rewards(env: Env, project_id: u64, total_invested: i128);
}
