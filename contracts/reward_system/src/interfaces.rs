//! Client interfaces for the external collaborators the reward engine
//! consumes. Each is injected as an address at initialization and invoked
//! through the generated typed client; the implementations live outside
//! this workspace.

use soroban_sdk::{contractclient, Address, Env, Vec};

/// Role and claim-address authority.
///
/// `set_pool_status_for_reward` is restricted by the registry itself to the
/// reward engine; this contract only ever calls it around its own token
/// payouts.
#[contractclient(name = "RegistryClient")]
pub trait ManagerRegistry {
    fn is_manager(env: Env, addr: Address) -> bool;
    fn get_investor_claim_address(env: Env, investor: Address) -> Address;
    fn set_pool_status_for_reward(env: Env, addr: Address, exempt: bool);
}

/// The platform asset: mintable by the reward engine, burnable, with a
/// transfer gate that the registry's pool/reward-system status can exempt.
#[contractclient(name = "PlatformTokenClient")]
pub trait PlatformToken {
    fn mint_reward(env: Env, to: Address, amount: i128);
    fn burn(env: Env, from: Address, amount: i128);
    fn transfer(env: Env, from: Address, to: Address, amount: i128);
    fn balance(env: Env, id: Address) -> i128;
}

/// Constant-product market venue, consumed as a black box. `quote_out`
/// answers "tokens out for stablecoin in", `quote_in` the reverse, and
/// `swap_for_exact_out` executes a fixed-output swap or reverts.
#[contractclient(name = "MarketVenueClient")]
pub trait MarketVenue {
    fn quote_out(env: Env, amount_in: i128, path: Vec<Address>) -> Vec<i128>;
    fn quote_in(env: Env, amount_out: i128, path: Vec<Address>) -> Vec<i128>;
    fn swap_for_exact_out(
        env: Env,
        amount_out: i128,
        max_in: i128,
        path: Vec<Address>,
        to: Address,
        deadline: u64,
    ) -> Vec<i128>;
}
