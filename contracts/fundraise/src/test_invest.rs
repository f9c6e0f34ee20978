#![cfg(test)]

extern crate std;

use ed25519_dalek::SigningKey;
use soroban_sdk::{testutils::Address as _, Address};

use crate::error::Error;
use crate::storage::Stage;
use crate::test_utils::{setup, DAY, START_TIME, USDC, VENUE_RATE};

#[test]
fn accepted_investment_updates_everything() {
    let ctx = setup();
    let client = ctx.fundraise();
    let investor = Address::generate(&ctx.env);
    let project_id = ctx.add_default_project();

    ctx.invest(&investor, project_id, 5_000 * USDC, None);

    let project = client.get_project(&project_id);
    assert_eq!(project.total_invested, 5_000 * USDC);
    assert_eq!(project.stage, Stage::Open);

    let position = client.get_position(&project_id, &investor);
    assert_eq!(position.invested_amount, 5_000 * USDC);
    assert_eq!(position.total_claimed, 0);

    assert_eq!(ctx.stable_balance(&investor), 0);
    assert_eq!(ctx.stable_balance(&ctx.fundraise_id), 5_000 * USDC);

    assert_eq!(client.get_nonce(), 1);
    assert_eq!(client.get_whitelist_root(&project_id), Some(ctx.default_root()));
}

#[test]
fn investment_drives_reward_accrual() {
    let ctx = setup();
    let investor = Address::generate(&ctx.env);
    let inviter = Address::generate(&ctx.env);
    let project_id = ctx.add_default_project();

    ctx.invest(&investor, project_id, 2_000 * USDC, Some(inviter.clone()));

    let reward = ctx.reward();
    // Welcome bonus (30 USDC) for the first eligible investment.
    assert_eq!(reward.get_accrual(&investor, &project_id).usdc, 30 * USDC);
    // 2% referral commission.
    assert_eq!(reward.get_accrual(&inviter, &project_id).usdc, 40 * USDC);
    // 1% of the amount priced through the venue.
    assert_eq!(
        reward.get_accrual(&investor, &project_id).tokens,
        20 * USDC * VENUE_RATE
    );
}

#[test]
fn nonce_gap_rejected_without_any_mutation() {
    let ctx = setup();
    let client = ctx.fundraise();
    let investor = Address::generate(&ctx.env);
    let project_id = ctx.add_default_project();
    ctx.mint_stable(&investor, 1_000 * USDC);

    let amount = 1_000 * USDC;
    let root = ctx.default_root();
    // Sign for nonce 2 while the contract expects 1.
    let signature = ctx.sign_invest(&investor, project_id, amount, &root, 2, &None);
    let result = client.try_invest_update(
        &investor, &project_id, &amount, &root, &2u64, &None, &signature,
    );
    assert_eq!(result, Err(Ok(Error::NonceMismatch)));

    assert_eq!(client.get_nonce(), 0);
    assert_eq!(client.get_whitelist_root(&project_id), None);
    assert_eq!(client.get_project(&project_id).total_invested, 0);
    assert_eq!(ctx.stable_balance(&investor), 1_000 * USDC);
}

#[test]
fn nonce_replay_rejected() {
    let ctx = setup();
    let client = ctx.fundraise();
    let investor = Address::generate(&ctx.env);
    let project_id = ctx.add_default_project();

    ctx.invest(&investor, project_id, 1_000 * USDC, None);
    assert_eq!(client.get_nonce(), 1);

    // Re-submit the already-consumed nonce 1.
    ctx.mint_stable(&investor, 1_000 * USDC);
    let root = ctx.default_root();
    let amount = 1_000 * USDC;
    let signature = ctx.sign_invest(&investor, project_id, amount, &root, 1, &None);
    let result = client.try_invest_update(
        &investor, &project_id, &amount, &root, &1u64, &None, &signature,
    );
    assert_eq!(result, Err(Ok(Error::NonceMismatch)));
    assert_eq!(client.get_project(&project_id).total_invested, 1_000 * USDC);
}

#[test]
#[should_panic(expected = "Crypto")]
fn forged_signature_aborts_the_call() {
    let ctx = setup();
    let investor = Address::generate(&ctx.env);
    let project_id = ctx.add_default_project();
    ctx.mint_stable(&investor, 1_000 * USDC);

    // Signed by a key the contract does not trust.
    let rogue = setup_rogue_signer(&ctx, &investor, project_id, 1_000 * USDC);
    ctx.fundraise().invest_update(
        &investor,
        &project_id,
        &(1_000 * USDC),
        &ctx.default_root(),
        &1u64,
        &None,
        &rogue,
    );
}

fn setup_rogue_signer(
    ctx: &crate::test_utils::TestContext,
    investor: &Address,
    project_id: u64,
    amount: i128,
) -> soroban_sdk::BytesN<64> {
    use ed25519_dalek::Signer;
    let rogue_key = SigningKey::from_bytes(&[9u8; 32]);
    let authorization = crate::auth::InvestAuthorization {
        investor: investor.clone(),
        project_id,
        amount,
        whitelist_root: ctx.default_root(),
        nonce: 1,
        inviter: None,
    };
    let message = crate::auth::message_bytes(&ctx.env, &authorization);
    let mut raw = std::vec::Vec::new();
    for byte in message.iter() {
        raw.push(byte);
    }
    soroban_sdk::BytesN::from_array(&ctx.env, &rogue_key.sign(&raw).to_bytes())
}

#[test]
fn unstarted_project_rotates_root_but_moves_no_funds() {
    let ctx = setup();
    let client = ctx.fundraise();
    let investor = Address::generate(&ctx.env);

    let mut input = ctx.default_input();
    input.start_at = START_TIME + 5 * DAY;
    let project_id = client.add_project(&ctx.manager, &input);

    ctx.invest(&investor, project_id, 1_000 * USDC, None);

    // Root stored and nonce consumed, but no investment effect.
    assert_eq!(client.get_whitelist_root(&project_id), Some(ctx.default_root()));
    assert_eq!(client.get_nonce(), 1);
    assert_eq!(client.get_project(&project_id).total_invested, 0);
    assert_eq!(client.get_project(&project_id).stage, Stage::ComingSoon);
    assert_eq!(ctx.stable_balance(&investor), 1_000 * USDC);
    assert_eq!(
        client.get_position(&project_id, &investor).invested_amount,
        0
    );
}

#[test]
fn project_opens_lazily_on_investment() {
    let ctx = setup();
    let client = ctx.fundraise();
    let investor = Address::generate(&ctx.env);

    let mut input = ctx.default_input();
    input.start_at = START_TIME + 5 * DAY;
    let project_id = client.add_project(&ctx.manager, &input);

    ctx.set_time(START_TIME + 5 * DAY);
    ctx.invest(&investor, project_id, 1_000 * USDC, None);

    let project = client.get_project(&project_id);
    assert_eq!(project.stage, Stage::Open);
    assert_eq!(project.total_invested, 1_000 * USDC);
}

#[test]
fn borrower_cannot_invest_in_own_project() {
    let ctx = setup();
    let client = ctx.fundraise();
    let project_id = ctx.add_default_project();
    ctx.mint_stable(&ctx.borrower, 1_000 * USDC);

    let amount = 1_000 * USDC;
    let (root, nonce, signature) = ctx.signed_args(&ctx.borrower, project_id, amount, &None);
    let result = client.try_invest_update(
        &ctx.borrower, &project_id, &amount, &root, &nonce, &None, &signature,
    );
    assert_eq!(result, Err(Ok(Error::BorrowerCannotInvest)));
}

#[test]
fn self_referral_rejected() {
    let ctx = setup();
    let client = ctx.fundraise();
    let investor = Address::generate(&ctx.env);
    let project_id = ctx.add_default_project();
    ctx.mint_stable(&investor, 1_000 * USDC);

    let amount = 1_000 * USDC;
    let inviter = Some(investor.clone());
    let (root, nonce, signature) = ctx.signed_args(&investor, project_id, amount, &inviter);
    let result = client.try_invest_update(
        &investor, &project_id, &amount, &root, &nonce, &inviter, &signature,
    );
    assert_eq!(result, Err(Ok(Error::SelfReferral)));
}

#[test]
fn unknown_project_rejected() {
    let ctx = setup();
    let client = ctx.fundraise();
    let investor = Address::generate(&ctx.env);
    ctx.mint_stable(&investor, 1_000 * USDC);

    let amount = 1_000 * USDC;
    let (root, nonce, signature) = ctx.signed_args(&investor, 99, amount, &None);
    let result =
        client.try_invest_update(&investor, &99u64, &amount, &root, &nonce, &None, &signature);
    assert_eq!(result, Err(Ok(Error::ProjectNotFound)));
}

#[test]
fn hard_cap_is_a_hard_boundary() {
    let ctx = setup();
    let client = ctx.fundraise();
    let whale = Address::generate(&ctx.env);
    let straggler = Address::generate(&ctx.env);
    let project_id = ctx.add_default_project();

    ctx.invest(&whale, project_id, 39_999 * USDC, None);

    // One unit over the cap is rejected and changes nothing.
    ctx.mint_stable(&straggler, 2 * USDC);
    let amount = 2 * USDC;
    let (root, nonce, signature) = ctx.signed_args(&straggler, project_id, amount, &None);
    let result = client.try_invest_update(
        &straggler, &project_id, &amount, &root, &nonce, &None, &signature,
    );
    assert_eq!(result, Err(Ok(Error::HardCapExceeded)));
    assert_eq!(client.get_project(&project_id).total_invested, 39_999 * USDC);

    // Filling it exactly tips the project into PreFunded.
    ctx.invest(&straggler, project_id, 1 * USDC, None);
    let project = client.get_project(&project_id);
    assert_eq!(project.total_invested, 40_000 * USDC);
    assert_eq!(project.stage, Stage::PreFunded);
    assert_eq!(project.pre_fund_clock_start, START_TIME);
}

#[test]
fn investment_rejected_after_cancellation() {
    let ctx = setup();
    let client = ctx.fundraise();
    let investor = Address::generate(&ctx.env);
    let project_id = ctx.add_default_project();

    client.cancel_project(&ctx.manager, &project_id);

    ctx.mint_stable(&investor, 1_000 * USDC);
    let amount = 1_000 * USDC;
    let (root, nonce, signature) = ctx.signed_args(&investor, project_id, amount, &None);
    let result = client.try_invest_update(
        &investor, &project_id, &amount, &root, &nonce, &None, &signature,
    );
    assert_eq!(result, Err(Ok(Error::StageNotOpen)));
}

#[test]
fn dead_venue_blocks_investment_entirely() {
    let ctx = setup();
    let client = ctx.fundraise();
    let investor = Address::generate(&ctx.env);
    let project_id = ctx.add_default_project();

    ctx.venue().set_liquidity(&false);

    ctx.mint_stable(&investor, 1_000 * USDC);
    let amount = 1_000 * USDC;
    let (root, nonce, signature) = ctx.signed_args(&investor, project_id, amount, &None);
    let result = client.try_invest_update(
        &investor, &project_id, &amount, &root, &nonce, &None, &signature,
    );
    // The nested reward failure aborts the whole investment.
    assert!(result.is_err());
    assert_eq!(client.get_project(&project_id).total_invested, 0);
    assert_eq!(ctx.stable_balance(&investor), 1_000 * USDC);
    assert_eq!(client.get_nonce(), 0);

    // Liquidity restored: the same investment goes through.
    ctx.venue().set_liquidity(&true);
    ctx.invest(&investor, project_id, 1_000 * USDC, None);
    assert_eq!(client.get_project(&project_id).total_invested, 1_000 * USDC);
}

#[test]
fn zero_amount_rejected() {
    let ctx = setup();
    let client = ctx.fundraise();
    let investor = Address::generate(&ctx.env);
    let project_id = ctx.add_default_project();

    let (root, nonce, signature) = ctx.signed_args(&investor, project_id, 0, &None);
    let result =
        client.try_invest_update(&investor, &project_id, &0i128, &root, &nonce, &None, &signature);
    assert_eq!(result, Err(Ok(Error::InvalidAmount)));
}

#[test]
fn pause_blocks_investment() {
    let ctx = setup();
    let client = ctx.fundraise();
    let investor = Address::generate(&ctx.env);
    let project_id = ctx.add_default_project();

    client.pause(&ctx.manager);
    ctx.mint_stable(&investor, 1_000 * USDC);
    let amount = 1_000 * USDC;
    let (root, nonce, signature) = ctx.signed_args(&investor, project_id, amount, &None);
    let result = client.try_invest_update(
        &investor, &project_id, &amount, &root, &nonce, &None, &signature,
    );
    assert_eq!(result, Err(Ok(Error::ContractPaused)));

    client.unpause(&ctx.manager);
    ctx.invest(&investor, project_id, 1_000 * USDC, None);
    assert_eq!(client.get_project(&project_id).total_invested, 1_000 * USDC);
}
