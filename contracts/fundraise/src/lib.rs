//! Fundraise contract for the crowdlending protocol.
//!
//! Owns the project lifecycle state machine and the funds accounting:
//! signed investment intake against a rotating whitelist root, lazy
//! time-based stage settlement, release of raised capital to the borrower
//! (minus the platform fee), repayment intake, and proportional investor
//! claims. Reward consequences are delegated synchronously to the reward
//! engine; a reward failure reverts the enclosing call.

#![no_std]

mod auth;
mod error;
mod events;
mod interfaces;
mod stage;
mod storage;

#[cfg(test)]
mod test_invest;
#[cfg(test)]
mod test_admin;

use auth::InvestAuthorization;
use error::Error;
use events::*;
use interfaces::{RegistryClient, RewardEngineClient};
use storage::{
    get_address, get_and_increment_project_id, get_nonce, get_trusted_signer, get_whitelist_root,
    is_initialized, is_paused, load_position, load_project, save_position, save_project,
    set_address, set_initialized, set_nonce, set_paused, set_trusted_signer, set_whitelist_root,
    DataKey, InvestorPosition, Project, ProjectInput, Stage, BASIS_POINTS, MAX_DEADLINE_EXTENSION,
};

use soroban_sdk::{contract, contractimpl, token, Address, BytesN, Env, Symbol};

#[contract]
pub struct Fundraise;

#[contractimpl]
impl Fundraise {
    // ============================================
    // INITIALIZATION & ADMIN
    // ============================================

    /// Initialize the contract with its collaborators and the trusted
    /// off-chain signer key.
    ///
    /// # Errors
    /// - `AlreadyInitialized`: Contract already initialized
    /// - `NotManager`: Caller is not a manager per the supplied registry
    pub fn initialize(
        env: Env,
        caller: Address,
        registry: Address,
        reward_system: Address,
        treasury: Address,
        trusted_signer: BytesN<32>,
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
        set_address(&env, DataKey::RewardSystem, &reward_system);
        set_address(&env, DataKey::Treasury, &treasury);
        set_trusted_signer(&env, &trusted_signer);
        set_paused(&env, false);
        set_nonce(&env, 0);

        Ok(())
    }

    /// Pause the funds-moving entry points (emergency).
    pub fn pause(env: Env, caller: Address) -> Result<(), Error> {
        Self::require_manager(&env, &caller)?;
        set_paused(&env, true);
        Ok(())
    }

    /// Unpause.
    pub fn unpause(env: Env, caller: Address) -> Result<(), Error> {
        Self::require_manager(&env, &caller)?;
        set_paused(&env, false);
        Ok(())
    }

    pub fn is_paused(env: Env) -> bool {
        is_paused(&env)
    }

    /// Rotate the trusted off-chain signer key.
    pub fn set_trusted_signer(env: Env, caller: Address, signer: BytesN<32>) -> Result<(), Error> {
        Self::require_manager(&env, &caller)?;
        set_trusted_signer(&env, &signer);
        Ok(())
    }

    // ============================================
    // PROJECT ADMINISTRATION
    // ============================================

    /// Create a new project from explicit parameters. Counters start at
    /// zero and the stage at ComingSoon; `hard_cap >= soft_cap` is
    /// deliberately not enforced here.
    ///
    /// # Errors
    /// - `NotManager`: Caller is not a manager
    /// - `InvalidStageChange`: Input stage is not ComingSoon
    pub fn add_project(env: Env, caller: Address, input: ProjectInput) -> Result<u64, Error> {
        Self::require_manager(&env, &caller)?;

        if input.stage != Stage::ComingSoon {
            return Err(Error::InvalidStageChange);
        }

        let id = get_and_increment_project_id(&env);
        let project = Project {
            id,
            borrower: input.borrower.clone(),
            loan_token: input.loan_token.clone(),
            hard_cap: input.hard_cap,
            soft_cap: input.soft_cap,
            total_invested: 0,
            total_repaid: 0,
            start_at: input.start_at,
            open_deadline: input.open_deadline,
            pre_fund_clock_start: 0,
            pre_fund_duration: input.pre_fund_duration,
            investor_interest_rate: input.investor_interest_rate,
            platform_interest_rate: input.platform_interest_rate,
            funded_time: 0,
            stage: Stage::ComingSoon,
        };
        save_project(&env, &project);

        env.events().publish(
            (Symbol::new(&env, "project_created"), id),
            ProjectCreatedEvent {
                project_id: id,
                borrower: input.borrower,
                loan_token: input.loan_token,
                soft_cap: input.soft_cap,
                hard_cap: input.hard_cap,
            },
        );

        Ok(id)
    }

    /// Admin mutation of an existing project.
    ///
    /// While ComingSoon the record may be rewritten wholesale, as long as
    /// the new record itself specifies ComingSoon. While Open only the
    /// deadline (forward, at most 30 days per call) and the two interest
    /// rates (increase-only) are applied; every other changed field is
    /// silently ignored. Later stages reject.
    pub fn set_project(
        env: Env,
        caller: Address,
        project_id: u64,
        input: ProjectInput,
    ) -> Result<(), Error> {
        Self::require_manager(&env, &caller)?;

        let mut project = load_project(&env, project_id).ok_or(Error::ProjectNotFound)?;

        match project.stage {
            Stage::ComingSoon => {
                if input.stage != Stage::ComingSoon {
                    return Err(Error::InvalidStageChange);
                }
                project = Project {
                    id: project_id,
                    borrower: input.borrower,
                    loan_token: input.loan_token,
                    hard_cap: input.hard_cap,
                    soft_cap: input.soft_cap,
                    total_invested: project.total_invested,
                    total_repaid: project.total_repaid,
                    start_at: input.start_at,
                    open_deadline: input.open_deadline,
                    pre_fund_clock_start: 0,
                    pre_fund_duration: input.pre_fund_duration,
                    investor_interest_rate: input.investor_interest_rate,
                    platform_interest_rate: input.platform_interest_rate,
                    funded_time: 0,
                    stage: Stage::ComingSoon,
                };
            }
            Stage::Open => {
                if input.open_deadline != project.open_deadline {
                    let extended = input.open_deadline > project.open_deadline
                        && input.open_deadline - project.open_deadline <= MAX_DEADLINE_EXTENSION;
                    if !extended {
                        return Err(Error::InvalidDeadlineChange);
                    }
                    project.open_deadline = input.open_deadline;
                }
                if input.platform_interest_rate < project.platform_interest_rate
                    || input.investor_interest_rate < project.investor_interest_rate
                {
                    return Err(Error::RateDecreaseForbidden);
                }
                project.platform_interest_rate = input.platform_interest_rate;
                project.investor_interest_rate = input.investor_interest_rate;
                // Caps, borrower, token, timing fields other than the
                // deadline: ignored while Open.
            }
            _ => return Err(Error::ProjectNotEditable),
        }

        save_project(&env, &project);
        env.events().publish(
            (Symbol::new(&env, "project_updated"), project_id),
            ProjectUpdatedEvent { project_id },
        );
        Ok(())
    }

    /// Replace a project's whitelist root directly (manager path; the
    /// authenticated path is `invest_update`).
    pub fn set_whitelist_root(
        env: Env,
        caller: Address,
        project_id: u64,
        root: BytesN<32>,
    ) -> Result<(), Error> {
        Self::require_manager(&env, &caller)?;
        set_whitelist_root(&env, project_id, &root);
        env.events().publish(
            (Symbol::new(&env, "whitelist_root"), project_id),
            WhitelistRootUpdatedEvent { project_id, root },
        );
        Ok(())
    }

    // ============================================
    // INVESTMENT INTAKE
    // ============================================

    /// Signed investment intake with whitelist-root rotation.
    ///
    /// The supplied nonce must be exactly the stored nonce plus one, and
    /// the (investor, project, amount, root, nonce, inviter) tuple must
    /// carry a valid signature from the trusted signer. On success the
    /// root is stored, the investment effect applied, and the nonce
    /// advanced — atomically. A project that is still ComingSoon and not
    /// yet past its start time yields a silent no-op that only rotates the
    /// root and consumes the nonce.
    ///
    /// # Errors
    /// - `NonceMismatch`: nonce is not the next sequential value
    /// - `ProjectNotFound`: no record, or both caps zero
    /// - `BorrowerCannotInvest` / `SelfReferral`
    /// - `StageNotOpen`: stage ineligible after lazy settlement
    /// - `HardCapExceeded`: the amount would breach the hard cap
    pub fn invest_update(
        env: Env,
        investor: Address,
        project_id: u64,
        amount: i128,
        whitelist_root: BytesN<32>,
        nonce: u64,
        inviter: Option<Address>,
        signature: BytesN<64>,
    ) -> Result<(), Error> {
        Self::check_not_paused(&env)?;
        if !is_initialized(&env) {
            return Err(Error::NotInitialized);
        }
        investor.require_auth();

        let current = get_nonce(&env);
        if nonce != current + 1 {
            return Err(Error::NonceMismatch);
        }

        let authorization = InvestAuthorization {
            investor: investor.clone(),
            project_id,
            amount,
            whitelist_root: whitelist_root.clone(),
            nonce,
            inviter: inviter.clone(),
        };
        let signer = get_trusted_signer(&env).ok_or(Error::NotInitialized)?;
        auth::verify(&env, &signer, &authorization, &signature);

        set_whitelist_root(&env, project_id, &whitelist_root);
        env.events().publish(
            (Symbol::new(&env, "whitelist_root"), project_id),
            WhitelistRootUpdatedEvent {
                project_id,
                root: whitelist_root,
            },
        );

        Self::apply_investment(&env, &investor, project_id, amount, inviter)?;
        set_nonce(&env, nonce);

        Ok(())
    }

    /// Permissionless lazy settlement of the time-based transitions.
    pub fn advance_stage(env: Env, project_id: u64) -> Result<Stage, Error> {
        let mut project = load_project(&env, project_id).ok_or(Error::ProjectNotFound)?;
        if stage::settle(&mut project, env.ledger().timestamp()) {
            save_project(&env, &project);
            Self::emit_stage_changed(&env, &project);
        }
        Ok(project.stage)
    }

    /// Cancel a project. Managers may cancel anything not yet funded; any
    /// caller may cancel a PreFunded project once its pre-fund window has
    /// lapsed — the permissionless escape hatch for stuck raises.
    pub fn cancel_project(env: Env, caller: Address, project_id: u64) -> Result<(), Error> {
        caller.require_auth();

        let mut project = load_project(&env, project_id).ok_or(Error::ProjectNotFound)?;
        let now = env.ledger().timestamp();
        let settled = stage::settle(&mut project, now);

        match project.stage {
            Stage::Canceled => {
                // Already resolved (possibly by this very settlement).
                if settled {
                    save_project(&env, &project);
                    Self::emit_stage_changed(&env, &project);
                }
                return Ok(());
            }
            Stage::ComingSoon | Stage::Open | Stage::PreFunded => {}
            _ => return Err(Error::CancelNotAllowed),
        }

        if !Self::is_manager(&env, &caller)? && !stage::pre_fund_timed_out(&project, now) {
            return Err(Error::NotAuthorized);
        }

        project.stage = Stage::Canceled;
        save_project(&env, &project);
        Self::emit_stage_changed(&env, &project);
        Ok(())
    }

    /// Withdraw a full recorded position after cancellation. Callable by
    /// the investor or a manager on their behalf; pays the investor's
    /// claim address.
    pub fn withdraw(
        env: Env,
        caller: Address,
        investor: Address,
        project_id: u64,
    ) -> Result<i128, Error> {
        Self::check_not_paused(&env)?;
        caller.require_auth();
        if caller != investor && !Self::is_manager(&env, &caller)? {
            return Err(Error::NotAuthorized);
        }

        let mut project = load_project(&env, project_id).ok_or(Error::ProjectNotFound)?;
        if stage::settle(&mut project, env.ledger().timestamp()) {
            Self::emit_stage_changed(&env, &project);
        }
        if project.stage != Stage::Canceled {
            return Err(Error::ProjectNotCanceled);
        }

        let mut position = load_position(&env, project_id, &investor);
        if position.invested_amount <= 0 {
            return Err(Error::NothingToWithdraw);
        }
        let amount = position.invested_amount;
        position.invested_amount = 0;
        save_position(&env, project_id, &investor, &position);

        project.total_invested -= amount;
        save_project(&env, &project);

        let destination = Self::claim_destination(&env, &investor)?;
        token::Client::new(&env, &project.loan_token).transfer(
            &env.current_contract_address(),
            &destination,
            &amount,
        );

        env.events().publish(
            (Symbol::new(&env, "withdrawn"), project_id, investor.clone()),
            WithdrawnEvent {
                project_id,
                investor,
                amount,
            },
        );
        Ok(amount)
    }

    // ============================================
    // FUNDS RELEASE & REPAYMENT
    // ============================================

    /// Release the raised capital to the borrower, minus the platform fee
    /// paid to the treasury, and activate the project's rewards. One-time:
    /// a call while the stage is past PreFunded is a silent no-op.
    ///
    /// # Errors
    /// - `NotAuthorized`: caller is neither the borrower nor a manager
    /// - `SoftCapNotReached`: release from Open below the soft cap
    pub fn transfer_funds_to_borrower(
        env: Env,
        caller: Address,
        project_id: u64,
    ) -> Result<(), Error> {
        Self::check_not_paused(&env)?;
        caller.require_auth();

        let mut project = load_project(&env, project_id).ok_or(Error::ProjectNotFound)?;
        if caller != project.borrower && !Self::is_manager(&env, &caller)? {
            return Err(Error::NotAuthorized);
        }

        let now = env.ledger().timestamp();
        let settled = stage::settle(&mut project, now);

        match project.stage {
            Stage::Open => {
                if project.total_invested < project.soft_cap {
                    return Err(Error::SoftCapNotReached);
                }
            }
            Stage::PreFunded => {}
            _ => {
                // Idempotent guard: wrong stage is not an error here.
                if settled {
                    save_project(&env, &project);
                    Self::emit_stage_changed(&env, &project);
                }
                return Ok(());
            }
        }

        let platform_fee = project
            .total_invested
            .checked_mul(project.platform_interest_rate)
            .ok_or(Error::Overflow)?
            / BASIS_POINTS;
        let borrower_amount = project.total_invested - platform_fee;

        let this = env.current_contract_address();
        let loan_token = token::Client::new(&env, &project.loan_token);
        loan_token.transfer(&this, &project.borrower, &borrower_amount);
        if platform_fee > 0 {
            let treasury = get_address(&env, DataKey::Treasury).ok_or(Error::NotInitialized)?;
            loan_token.transfer(&this, &treasury, &platform_fee);
        }

        project.stage = Stage::Funded;
        project.funded_time = now;
        save_project(&env, &project);
        Self::emit_stage_changed(&env, &project);

        let reward_system =
            get_address(&env, DataKey::RewardSystem).ok_or(Error::NotInitialized)?;
        RewardEngineClient::new(&env, &reward_system)
            .activate_project_rewards(&project_id, &project.total_invested);

        env.events().publish(
            (Symbol::new(&env, "funds_released"), project_id),
            FundsReleasedEvent {
                project_id,
                borrower_amount,
                platform_fee,
            },
        );
        Ok(())
    }

    /// Accept a repayment from the borrower (or a manager). Once
    /// cumulative repayment covers principal plus investor interest the
    /// project transitions to Repaid.
    pub fn make_repayment(
        env: Env,
        caller: Address,
        project_id: u64,
        amount: i128,
    ) -> Result<(), Error> {
        Self::check_not_paused(&env)?;
        caller.require_auth();

        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }

        let mut project = load_project(&env, project_id).ok_or(Error::ProjectNotFound)?;
        if caller != project.borrower && !Self::is_manager(&env, &caller)? {
            return Err(Error::NotAuthorized);
        }
        if project.stage != Stage::Funded {
            return Err(Error::ProjectNotFunded);
        }

        token::Client::new(&env, &project.loan_token).transfer(
            &caller,
            &env.current_contract_address(),
            &amount,
        );

        project.total_repaid = project
            .total_repaid
            .checked_add(amount)
            .ok_or(Error::Overflow)?;

        let interest = project
            .total_invested
            .checked_mul(project.investor_interest_rate)
            .ok_or(Error::Overflow)?
            / BASIS_POINTS;
        if project.total_repaid >= project.total_invested + interest {
            project.stage = Stage::Repaid;
            Self::emit_stage_changed(&env, &project);
        }
        save_project(&env, &project);

        env.events().publish(
            (Symbol::new(&env, "repayment"), project_id),
            RepaymentEvent {
                project_id,
                amount,
                total_repaid: project.total_repaid,
            },
        );
        Ok(())
    }

    /// Pay an investor their share of repayments received so far, net of
    /// what they already claimed. Integer division truncates in the
    /// ledger's favor; a zero remainder is an accepted no-op.
    pub fn claim(
        env: Env,
        caller: Address,
        investor: Address,
        project_id: u64,
    ) -> Result<i128, Error> {
        Self::check_not_paused(&env)?;
        caller.require_auth();
        if caller != investor && !Self::is_manager(&env, &caller)? {
            return Err(Error::NotAuthorized);
        }

        let project = load_project(&env, project_id).ok_or(Error::ProjectNotFound)?;
        match project.stage {
            Stage::Funded | Stage::Repaid => {}
            _ => return Err(Error::ClaimNotAvailable),
        }

        let mut position = load_position(&env, project_id, &investor);
        if position.invested_amount <= 0 || project.total_invested <= 0 {
            return Ok(0);
        }
        let share = position
            .invested_amount
            .checked_mul(BASIS_POINTS)
            .ok_or(Error::Overflow)?
            / project.total_invested;
        let entitlement = project
            .total_repaid
            .checked_mul(share)
            .ok_or(Error::Overflow)?
            / BASIS_POINTS;

        let payout = entitlement - position.total_claimed;
        if payout <= 0 {
            return Ok(0);
        }

        position.total_claimed += payout;
        save_position(&env, project_id, &investor, &position);

        let destination = Self::claim_destination(&env, &investor)?;
        token::Client::new(&env, &project.loan_token).transfer(
            &env.current_contract_address(),
            &destination,
            &payout,
        );

        env.events().publish(
            (Symbol::new(&env, "claimed"), project_id, investor.clone()),
            ClaimedEvent {
                project_id,
                investor,
                amount: payout,
                destination,
            },
        );
        Ok(payout)
    }

    // ============================================
    // VIEW FUNCTIONS
    // ============================================

    pub fn get_project(env: Env, project_id: u64) -> Result<Project, Error> {
        load_project(&env, project_id).ok_or(Error::ProjectNotFound)
    }

    pub fn get_position(env: Env, project_id: u64, investor: Address) -> InvestorPosition {
        load_position(&env, project_id, &investor)
    }

    pub fn get_whitelist_root(env: Env, project_id: u64) -> Option<BytesN<32>> {
        get_whitelist_root(&env, project_id)
    }

    pub fn get_nonce(env: Env) -> u64 {
        get_nonce(&env)
    }

    pub fn basis_points() -> i128 {
        BASIS_POINTS
    }

    // ============================================
    // INTERNAL HELPERS
    // ============================================

    fn apply_investment(
        env: &Env,
        investor: &Address,
        project_id: u64,
        amount: i128,
        inviter: Option<Address>,
    ) -> Result<(), Error> {
        if let Some(inv) = &inviter {
            if inv == investor {
                return Err(Error::SelfReferral);
            }
        }

        let mut project = load_project(env, project_id).ok_or(Error::ProjectNotFound)?;
        if project.hard_cap == 0 && project.soft_cap == 0 {
            return Err(Error::ProjectNotFound);
        }
        if *investor == project.borrower {
            return Err(Error::BorrowerCannotInvest);
        }
        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }

        let now = env.ledger().timestamp();
        let settled = stage::settle(&mut project, now);

        if project.stage == Stage::ComingSoon {
            // Not yet open: the call already rotated the root; no funds
            // move and the nonce still advances.
            return Ok(());
        }
        if project.stage != Stage::Open {
            return Err(Error::StageNotOpen);
        }
        if settled {
            Self::emit_stage_changed(env, &project);
        }

        let new_total = project
            .total_invested
            .checked_add(amount)
            .ok_or(Error::Overflow)?;
        if new_total > project.hard_cap {
            return Err(Error::HardCapExceeded);
        }

        token::Client::new(env, &project.loan_token).transfer(
            investor,
            &env.current_contract_address(),
            &amount,
        );

        // The reward registration must succeed or the investment reverts
        // with it.
        let reward_system = get_address(env, DataKey::RewardSystem).ok_or(Error::NotInitialized)?;
        RewardEngineClient::new(env, &reward_system).record_investment(
            investor,
            &amount,
            &inviter,
            &project_id,
        );

        project.total_invested = new_total;
        let mut position = load_position(env, project_id, investor);
        position.invested_amount += amount;
        save_position(env, project_id, investor, &position);

        if project.total_invested == project.hard_cap {
            project.stage = Stage::PreFunded;
            project.pre_fund_clock_start = now;
            Self::emit_stage_changed(env, &project);
        }
        save_project(env, &project);

        env.events().publish(
            (Symbol::new(env, "invested"), project_id, investor.clone()),
            InvestedEvent {
                project_id,
                investor: investor.clone(),
                amount,
                total_invested: project.total_invested,
            },
        );
        Ok(())
    }

    fn check_not_paused(env: &Env) -> Result<(), Error> {
        if is_paused(env) {
            return Err(Error::ContractPaused);
        }
        Ok(())
    }

    fn is_manager(env: &Env, caller: &Address) -> Result<bool, Error> {
        let registry = get_address(env, DataKey::Registry).ok_or(Error::NotInitialized)?;
        Ok(RegistryClient::new(env, &registry).is_manager(caller))
    }

    fn require_manager(env: &Env, caller: &Address) -> Result<(), Error> {
        caller.require_auth();
        let registry = get_address(env, DataKey::Registry).ok_or(Error::NotInitialized)?;
        if !RegistryClient::new(env, &registry).is_manager(caller) {
            return Err(Error::NotManager);
        }
        Ok(())
    }

    fn claim_destination(env: &Env, investor: &Address) -> Result<Address, Error> {
        let registry = get_address(env, DataKey::Registry).ok_or(Error::NotInitialized)?;
        Ok(RegistryClient::new(env, &registry).get_investor_claim_address(investor))
    }

    fn emit_stage_changed(env: &Env, project: &Project) {
        env.events().publish(
            (Symbol::new(env, "stage_changed"), project.id),
            StageChangedEvent {
                project_id: project.id,
                stage: project.stage,
            },
        );
    }
}
