//! Reward engine for the crowdlending protocol.
//!
//! Tracks per-user, per-project accrual of stablecoin bonuses (referral
//! commission and welcome bonus) and vested platform-token entitlements,
//! priced against a market venue at investment time. When the fundraise
//! contract releases funds to a borrower it activates the project here,
//! which starts the vesting clock, mints the accrued tokens and executes
//! the buyback-and-burn so net token supply from the reward event is zero.

#![no_std]

mod error;
mod events;
mod interfaces;
mod storage;
mod vesting;


use error::Error;
use events::*;
use interfaces::{MarketVenueClient, PlatformTokenClient, RegistryClient};
use storage::{
    add_pending_mint, get_address, get_params, get_pending_mint, get_vesting_start, is_initialized,
    is_paused, load_accrual, load_inviter_stats, load_profile, save_accrual, save_inviter_stats,
    save_profile, set_address, set_initialized, set_params, set_paused, set_vesting_start,
    take_pending_mint, DataKey, InviterStats, RewardAccrual, RewardParams, RewardTarget,
    UserProfile, VestingGrant, VestingInfo, APPROVE_LIVE_LEDGERS, BASIS_POINTS, BUYBACK_SLIPPAGE,
    MIN_RATE, SWAP_DEADLINE_SECS,
};

use soroban_sdk::{contract, contractimpl, token, vec, Address, Env, Symbol, Vec};

#[contract]
pub struct RewardSystem;

#[contractimpl]
impl RewardSystem {
    // ============================================
    // INITIALIZATION & ADMIN
    // ============================================

    /// Initialize the reward engine with its registry and the fundraise
    /// contract allowed to drive accrual and activation.
    ///
    /// # Errors
    /// - `AlreadyInitialized`: Contract already initialized
    /// - `NotManager`: Caller is not a manager per the supplied registry
    pub fn initialize(
        env: Env,
        caller: Address,
        registry: Address,
        fundraise: Address,
    ) -> Result<(), Error> {
        if is_initialized(&env) {
            return Err(Error::AlreadyInitialized);
        }

        caller.require_auth();
        if !RegistryClient::new(&env, &registry).is_manager(&caller) {
            return Err(Error::NotManager);
        }

        set_initialized(&env);
        set_address(&env, DataKey::Registry, &registry);
        set_address(&env, DataKey::Fundraise, &fundraise);
        set_paused(&env, false);

        Ok(())
    }

    /// Configure the platform token, stablecoin, and market venue. Reward
    /// accrual rejects until all three are set.
    pub fn set_contracts(
        env: Env,
        caller: Address,
        platform_token: Address,
        stablecoin: Address,
        market_venue: Address,
    ) -> Result<(), Error> {
        Self::require_manager(&env, &caller)?;

        set_address(&env, DataKey::PlatformToken, &platform_token);
        set_address(&env, DataKey::Stablecoin, &stablecoin);
        set_address(&env, DataKey::MarketVenue, &market_venue);

        Ok(())
    }

    /// Update reward parameters.
    ///
    /// # Errors
    /// - `InvalidParameter`: Any of the four rates outside
    ///   [MIN_RATE, BASIS_POINTS]
    pub fn set_parameters(env: Env, caller: Address, params: RewardParams) -> Result<(), Error> {
        Self::require_manager(&env, &caller)?;

        for rate in [
            params.referral_rate,
            params.token_rate,
            params.burn_rate,
            params.weekly_unlock_rate,
        ] {
            if !(MIN_RATE..=BASIS_POINTS).contains(&rate) {
                return Err(Error::InvalidParameter);
            }
        }

        set_params(&env, &params);
        Ok(())
    }

    /// Pause the user-facing claim paths (emergency).
    pub fn pause(env: Env, caller: Address) -> Result<(), Error> {
        Self::require_manager(&env, &caller)?;
        set_paused(&env, true);
        Ok(())
    }

    /// Unpause the claim paths.
    pub fn unpause(env: Env, caller: Address) -> Result<(), Error> {
        Self::require_manager(&env, &caller)?;
        set_paused(&env, false);
        Ok(())
    }

    pub fn is_paused(env: Env) -> bool {
        is_paused(&env)
    }

    // ============================================
    // FUNDRAISE-DRIVEN MUTATORS
    // ============================================

    /// Register the reward consequences of one accepted investment.
    ///
    /// Callable only by the fundraise contract; a failure here reverts the
    /// enclosing investment, so the venue coupling is deliberate — no
    /// liquidity means no investment.
    ///
    /// # Errors
    /// - `InvalidAmount`: amount not positive
    /// - `SelfReferral`: inviter equals the investor
    /// - `ContractsNotSet`: token/stablecoin/venue unset
    /// - `NoLiquidity` / `ZeroQuote`: venue rejected or zeroed the quote
    pub fn record_investment(
        env: Env,
        user: Address,
        amount: i128,
        inviter: Option<Address>,
        project_id: u64,
    ) -> Result<(), Error> {
        Self::require_fundraise(&env)?;

        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }

        let params = get_params(&env);
        let mut profile = load_profile(&env, &user);

        // First nonzero inviter wins, permanently.
        if profile.inviter.is_none() {
            if let Some(inv) = inviter {
                if inv == user {
                    return Err(Error::SelfReferral);
                }
                profile.inviter = Some(inv.clone());
                let mut stats = load_inviter_stats(&env, &inv);
                stats.invited_count += 1;
                save_inviter_stats(&env, &inv, &stats);

                env.events().publish(
                    (Symbol::new(&env, "inviter_registered"), user.clone()),
                    InviterRegisteredEvent {
                        user: user.clone(),
                        inviter: inv,
                    },
                );
            }
        }

        if let Some(inv) = profile.inviter.clone() {
            let commission = amount
                .checked_mul(params.referral_rate)
                .ok_or(Error::Overflow)?
                / BASIS_POINTS;
            if commission > 0 {
                let mut inviter_accrual = load_accrual(&env, &inv, project_id);
                inviter_accrual.usdc += commission;
                save_accrual(&env, &inv, project_id, &inviter_accrual);

                let mut stats = load_inviter_stats(&env, &inv);
                stats.total_usdc += commission;
                save_inviter_stats(&env, &inv, &stats);

                env.events().publish(
                    (Symbol::new(&env, "referral_accrued"), project_id, inv.clone()),
                    ReferralAccruedEvent {
                        inviter: inv,
                        user: user.clone(),
                        project_id,
                        amount: commission,
                    },
                );
            }
        }

        // Price the token allocation through the venue. A dead venue fails
        // the whole investment.
        let (platform_token, stablecoin, venue) = Self::contracts(&env)?;
        let stable_in = amount
            .checked_mul(params.token_rate)
            .ok_or(Error::Overflow)?
            / BASIS_POINTS;

        let path = vec![&env, stablecoin, platform_token];
        let amounts = match MarketVenueClient::new(&env, &venue).try_quote_out(&stable_in, &path) {
            Ok(Ok(amounts)) => amounts,
            _ => return Err(Error::NoLiquidity),
        };
        let tokens_out = amounts.last().unwrap_or(0);
        if tokens_out == 0 {
            return Err(Error::ZeroQuote);
        }

        let mut user_accrual = load_accrual(&env, &user, project_id);
        user_accrual.tokens += tokens_out;
        add_pending_mint(&env, project_id, tokens_out);

        env.events().publish(
            (Symbol::new(&env, "token_reward"), project_id, user.clone()),
            TokenRewardAccruedEvent {
                user: user.clone(),
                project_id,
                stable_in,
                tokens: tokens_out,
            },
        );

        // Welcome bonus: once per user, ever.
        if profile.is_new_user && amount >= params.min_investment_for_bonus {
            user_accrual.usdc += params.welcome_bonus;
            profile.is_new_user = false;

            env.events().publish(
                (Symbol::new(&env, "welcome_bonus"), project_id, user.clone()),
                WelcomeBonusEvent {
                    user: user.clone(),
                    project_id,
                    amount: params.welcome_bonus,
                },
            );
        }

        save_accrual(&env, &user, project_id, &user_accrual);
        save_profile(&env, &user, &profile);

        Ok(())
    }

    /// Start vesting for a funded project, mint the pending token accrual
    /// to the engine, and buy back and burn the identical quantity from the
    /// venue. One-shot per project.
    ///
    /// # Errors
    /// - `AlreadyActivated`: vesting clock already set
    /// - `InsufficientBuybackFunds`: engine stablecoin balance below the
    ///   quoted cost plus slippage allowance
    /// - `NoLiquidity` / `SwapFailed`: venue rejected the reverse quote or
    ///   the swap — the caller must retry once liquidity is restored
    pub fn activate_project_rewards(
        env: Env,
        project_id: u64,
        total_invested: i128,
    ) -> Result<(), Error> {
        Self::require_fundraise(&env)?;

        if get_vesting_start(&env, project_id).is_some() {
            return Err(Error::AlreadyActivated);
        }

        let now = env.ledger().timestamp();
        set_vesting_start(&env, project_id, now);

        let params = get_params(&env);
        let pending = take_pending_mint(&env, project_id);
        let mut burned = 0i128;

        if pending > 0 {
            let (platform_token, stablecoin, venue) = Self::contracts(&env)?;
            let this = env.current_contract_address();
            let token_client = PlatformTokenClient::new(&env, &platform_token);
            token_client.mint_reward(&this, &pending);

            if params.burn_rate > 0 {
                let path = vec![&env, stablecoin.clone(), platform_token];
                let venue_client = MarketVenueClient::new(&env, &venue);

                let amounts = match venue_client.try_quote_in(&pending, &path) {
                    Ok(Ok(amounts)) => amounts,
                    _ => return Err(Error::NoLiquidity),
                };
                let cost = amounts.get(0).unwrap_or(0);
                let max_in = cost.checked_add(BUYBACK_SLIPPAGE).ok_or(Error::Overflow)?;

                let stable_client = token::Client::new(&env, &stablecoin);
                if stable_client.balance(&this) < max_in {
                    return Err(Error::InsufficientBuybackFunds);
                }

                let expiration = env.ledger().sequence() + APPROVE_LIVE_LEDGERS;
                stable_client.approve(&this, &venue, &max_in, &expiration);

                let deadline = now + SWAP_DEADLINE_SECS;
                if venue_client
                    .try_swap_for_exact_out(&pending, &max_in, &path, &this, &deadline)
                    .is_err()
                {
                    return Err(Error::SwapFailed);
                }

                token_client.burn(&this, &pending);
                burned = pending;
            }
        }

        env.events().publish(
            (Symbol::new(&env, "rewards_activated"), project_id),
            RewardsActivatedEvent {
                project_id,
                total_invested,
                minted: pending,
                burned,
                vesting_start: now,
            },
        );

        Ok(())
    }

    // ============================================
    // CLAIMS
    // ============================================

    /// Claim the accrued stablecoin bonus for a project. Requires the
    /// project's rewards to be activated.
    pub fn claim_usdc_for_project(env: Env, user: Address, project_id: u64) -> Result<i128, Error> {
        Self::check_not_paused(&env)?;
        user.require_auth();
        Self::do_send_usdc(&env, &user, project_id)
    }

    /// Manager-initiated equivalent of [`RewardSystem::claim_usdc_for_project`].
    pub fn send_usdc_for_project_to_user(
        env: Env,
        caller: Address,
        user: Address,
        project_id: u64,
    ) -> Result<i128, Error> {
        Self::check_not_paused(&env)?;
        Self::require_manager(&env, &caller)?;
        Self::do_send_usdc(&env, &user, project_id)
    }

    /// Claim the currently unlockable vested tokens for a project.
    pub fn claim_tokens_for_project(
        env: Env,
        user: Address,
        project_id: u64,
    ) -> Result<i128, Error> {
        Self::check_not_paused(&env)?;
        user.require_auth();
        Self::do_send_tokens(&env, &user, project_id)
    }

    /// Manager-initiated equivalent of [`RewardSystem::claim_tokens_for_project`].
    pub fn send_tokens_for_project_to_user(
        env: Env,
        caller: Address,
        user: Address,
        project_id: u64,
    ) -> Result<i128, Error> {
        Self::check_not_paused(&env)?;
        Self::require_manager(&env, &caller)?;
        Self::do_send_tokens(&env, &user, project_id)
    }

    /// Batch manager send of stablecoin bonuses. Fail-fast: an error on any
    /// element aborts the whole batch.
    pub fn send_usdc_for_project_to_user_batch(
        env: Env,
        caller: Address,
        targets: Vec<RewardTarget>,
    ) -> Result<(), Error> {
        Self::check_not_paused(&env)?;
        Self::require_manager(&env, &caller)?;
        for target in targets.iter() {
            Self::do_send_usdc(&env, &target.user, target.project_id)?;
        }
        Ok(())
    }

    /// Batch manager send of unlockable tokens. Fail-fast, no partial
    /// success.
    pub fn send_tokens_for_project_to_user_batch(
        env: Env,
        caller: Address,
        targets: Vec<RewardTarget>,
    ) -> Result<(), Error> {
        Self::check_not_paused(&env)?;
        Self::require_manager(&env, &caller)?;
        for target in targets.iter() {
            Self::do_send_tokens(&env, &target.user, target.project_id)?;
        }
        Ok(())
    }

    /// Manually grant vested token entitlements. The only path allowed to
    /// lazily start a project's vesting clock; each grant mints backing
    /// tokens to the engine so later claims stay covered.
    pub fn distribute_vesting_tokens(
        env: Env,
        caller: Address,
        grants: Vec<VestingGrant>,
    ) -> Result<(), Error> {
        Self::require_manager(&env, &caller)?;

        let (platform_token, _, _) = Self::contracts(&env)?;
        let this = env.current_contract_address();
        let token_client = PlatformTokenClient::new(&env, &platform_token);

        for grant in grants.iter() {
            if grant.amount <= 0 {
                return Err(Error::InvalidAmount);
            }

            if get_vesting_start(&env, grant.project_id).is_none() {
                set_vesting_start(&env, grant.project_id, env.ledger().timestamp());
            }

            let mut accrual = load_accrual(&env, &grant.user, grant.project_id);
            accrual.tokens += grant.amount;
            save_accrual(&env, &grant.user, grant.project_id, &accrual);

            token_client.mint_reward(&this, &grant.amount);

            env.events().publish(
                (
                    Symbol::new(&env, "vesting_granted"),
                    grant.project_id,
                    grant.user.clone(),
                ),
                VestingGrantedEvent {
                    user: grant.user.clone(),
                    project_id: grant.project_id,
                    amount: grant.amount,
                },
            );
        }

        Ok(())
    }

    // ============================================
    // VIEW FUNCTIONS
    // ============================================

    pub fn get_profile(env: Env, user: Address) -> UserProfile {
        load_profile(&env, &user)
    }

    pub fn get_accrual(env: Env, user: Address, project_id: u64) -> RewardAccrual {
        load_accrual(&env, &user, project_id)
    }

    pub fn get_inviter_stats(env: Env, inviter: Address) -> InviterStats {
        load_inviter_stats(&env, &inviter)
    }

    pub fn get_parameters(env: Env) -> RewardParams {
        get_params(&env)
    }

    pub fn get_pending_mint(env: Env, project_id: u64) -> i128 {
        get_pending_mint(&env, project_id)
    }

    /// Vesting snapshot for one (user, project): clock, totals, and the
    /// amount claimable right now (zero while rewards are inactive).
    pub fn get_vesting_info(env: Env, user: Address, project_id: u64) -> VestingInfo {
        let accrual = load_accrual(&env, &user, project_id);
        let params = get_params(&env);
        match get_vesting_start(&env, project_id) {
            Some(start) => VestingInfo {
                vesting_start: start,
                total_tokens: accrual.tokens,
                vesting_claimed: accrual.vesting_claimed,
                claimable: vesting::claimable_amount(
                    &accrual,
                    start,
                    env.ledger().timestamp(),
                    params.vesting_weeks,
                    params.weekly_unlock_rate,
                ),
            },
            None => VestingInfo {
                vesting_start: 0,
                total_tokens: accrual.tokens,
                vesting_claimed: accrual.vesting_claimed,
                claimable: 0,
            },
        }
    }

    // ============================================
    // INTERNAL HELPERS
    // ============================================

    fn check_not_paused(env: &Env) -> Result<(), Error> {
        if is_paused(env) {
            return Err(Error::ContractPaused);
        }
        Ok(())
    }

    fn require_manager(env: &Env, caller: &Address) -> Result<(), Error> {
        caller.require_auth();
        let registry = get_address(env, DataKey::Registry).ok_or(Error::NotInitialized)?;
        if !RegistryClient::new(env, &registry).is_manager(caller) {
            return Err(Error::NotManager);
        }
        Ok(())
    }

    /// The fundraise contract authorizes its own calls as the direct
    /// invoker; no other caller can satisfy this.
    fn require_fundraise(env: &Env) -> Result<(), Error> {
        let fundraise = get_address(env, DataKey::Fundraise).ok_or(Error::NotInitialized)?;
        fundraise.require_auth();
        Ok(())
    }

    fn contracts(env: &Env) -> Result<(Address, Address, Address), Error> {
        let platform_token =
            get_address(env, DataKey::PlatformToken).ok_or(Error::ContractsNotSet)?;
        let stablecoin = get_address(env, DataKey::Stablecoin).ok_or(Error::ContractsNotSet)?;
        let venue = get_address(env, DataKey::MarketVenue).ok_or(Error::ContractsNotSet)?;
        Ok((platform_token, stablecoin, venue))
    }

    fn claim_destination(env: &Env, user: &Address) -> Result<Address, Error> {
        let registry = get_address(env, DataKey::Registry).ok_or(Error::NotInitialized)?;
        Ok(RegistryClient::new(env, &registry).get_investor_claim_address(user))
    }

    fn do_send_usdc(env: &Env, user: &Address, project_id: u64) -> Result<i128, Error> {
        if get_vesting_start(env, project_id).is_none() {
            return Err(Error::RewardsNotActive);
        }

        let mut accrual = load_accrual(env, user, project_id);
        if accrual.usdc <= 0 {
            return Err(Error::NothingToClaim);
        }
        let amount = accrual.usdc;
        accrual.usdc = 0;
        save_accrual(env, user, project_id, &accrual);

        let (_, stablecoin, _) = Self::contracts(env)?;
        let destination = Self::claim_destination(env, user)?;
        token::Client::new(env, &stablecoin).transfer(
            &env.current_contract_address(),
            &destination,
            &amount,
        );

        env.events().publish(
            (Symbol::new(env, "usdc_claimed"), project_id, user.clone()),
            UsdcClaimedEvent {
                user: user.clone(),
                project_id,
                amount,
                destination,
            },
        );

        Ok(amount)
    }

    fn do_send_tokens(env: &Env, user: &Address, project_id: u64) -> Result<i128, Error> {
        let start = get_vesting_start(env, project_id).ok_or(Error::RewardsNotActive)?;

        let params = get_params(env);
        let mut accrual = load_accrual(env, user, project_id);
        let claimable = vesting::claimable_amount(
            &accrual,
            start,
            env.ledger().timestamp(),
            params.vesting_weeks,
            params.weekly_unlock_rate,
        );
        if claimable <= 0 {
            return Err(Error::NothingToClaim);
        }

        let (platform_token, _, _) = Self::contracts(env)?;
        let this = env.current_contract_address();
        let token_client = PlatformTokenClient::new(env, &platform_token);
        if token_client.balance(&this) < claimable {
            return Err(Error::InsufficientRewardBalance);
        }

        accrual.vesting_claimed += claimable;
        save_accrual(env, user, project_id, &accrual);

        // The transfer gate would block a plain recipient while buying is
        // disabled; the exemption is scoped to this single payout.
        let registry = get_address(env, DataKey::Registry).ok_or(Error::NotInitialized)?;
        let registry_client = RegistryClient::new(env, &registry);
        let destination = registry_client.get_investor_claim_address(user);

        registry_client.set_pool_status_for_reward(&destination, &true);
        token_client.transfer(&this, &destination, &claimable);
        registry_client.set_pool_status_for_reward(&destination, &false);

        env.events().publish(
            (Symbol::new(env, "tokens_claimed"), project_id, user.clone()),
            TokensClaimedEvent {
                user: user.clone(),
                project_id,
                amount: claimable,
                destination,
            },
        );

        Ok(claimable)
    }
}
