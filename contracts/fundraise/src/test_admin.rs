#![cfg(test)]

extern crate std;

use soroban_sdk::{testutils::Address as _, Address, BytesN};

use crate::error::Error;
use crate::storage::Stage;
use crate::test_utils::{setup, DAY, START_TIME, USDC};

#[test]
fn project_ids_are_sequential() {
    let ctx = setup();
    let client = ctx.fundraise();

    assert_eq!(client.add_project(&ctx.manager, &ctx.default_input()), 0);
    assert_eq!(client.add_project(&ctx.manager, &ctx.default_input()), 1);
    assert_eq!(client.add_project(&ctx.manager, &ctx.default_input()), 2);
}

#[test]
fn only_managers_create_projects() {
    let ctx = setup();
    let client = ctx.fundraise();
    let outsider = Address::generate(&ctx.env);

    assert_eq!(
        client.try_add_project(&outsider, &ctx.default_input()),
        Err(Ok(Error::NotManager))
    );
}

#[test]
fn creation_requires_coming_soon_input() {
    let ctx = setup();
    let client = ctx.fundraise();

    let mut input = ctx.default_input();
    input.stage = Stage::Open;
    assert_eq!(
        client.try_add_project(&ctx.manager, &input),
        Err(Ok(Error::InvalidStageChange))
    );
}

#[test]
fn coming_soon_rewrite_replaces_the_record() {
    let ctx = setup();
    let client = ctx.fundraise();

    let mut input = ctx.default_input();
    input.start_at = START_TIME + 10 * DAY;
    let project_id = client.add_project(&ctx.manager, &input);

    let mut rewrite = ctx.default_input();
    rewrite.hard_cap = 90_000 * USDC;
    rewrite.soft_cap = 45_000 * USDC;
    rewrite.start_at = START_TIME + 20 * DAY;
    client.set_project(&ctx.manager, &project_id, &rewrite);

    let project = client.get_project(&project_id);
    assert_eq!(project.hard_cap, 90_000 * USDC);
    assert_eq!(project.soft_cap, 45_000 * USDC);
    assert_eq!(project.start_at, START_TIME + 20 * DAY);
    assert_eq!(project.stage, Stage::ComingSoon);
}

#[test]
fn coming_soon_rewrite_must_stay_coming_soon() {
    let ctx = setup();
    let client = ctx.fundraise();

    let mut input = ctx.default_input();
    input.start_at = START_TIME + 10 * DAY;
    let project_id = client.add_project(&ctx.manager, &input);

    let mut rewrite = ctx.default_input();
    rewrite.stage = Stage::Funded;
    assert_eq!(
        client.try_set_project(&ctx.manager, &project_id, &rewrite),
        Err(Ok(Error::InvalidStageChange))
    );
}

#[test]
fn open_project_accepts_bounded_deadline_extension() {
    let ctx = setup();
    let client = ctx.fundraise();
    let project_id = ctx.add_default_project();
    client.advance_stage(&project_id);
    assert_eq!(client.get_project(&project_id).stage, Stage::Open);

    let mut update = ctx.default_input();
    update.open_deadline = START_TIME + 60 * DAY;
    client.set_project(&ctx.manager, &project_id, &update);
    assert_eq!(
        client.get_project(&project_id).open_deadline,
        START_TIME + 60 * DAY
    );

    // More than 30 days in one step is rejected.
    update.open_deadline = START_TIME + 91 * DAY;
    assert_eq!(
        client.try_set_project(&ctx.manager, &project_id, &update),
        Err(Ok(Error::InvalidDeadlineChange))
    );

    // And the deadline never moves backwards.
    update.open_deadline = START_TIME + 30 * DAY;
    assert_eq!(
        client.try_set_project(&ctx.manager, &project_id, &update),
        Err(Ok(Error::InvalidDeadlineChange))
    );
}

#[test]
fn open_project_rates_only_increase() {
    let ctx = setup();
    let client = ctx.fundraise();
    let project_id = ctx.add_default_project();
    client.advance_stage(&project_id);

    let mut update = ctx.default_input();
    update.investor_interest_rate = 120_000;
    update.platform_interest_rate = 40_000;
    client.set_project(&ctx.manager, &project_id, &update);

    let project = client.get_project(&project_id);
    assert_eq!(project.investor_interest_rate, 120_000);
    assert_eq!(project.platform_interest_rate, 40_000);

    update.investor_interest_rate = 110_000;
    assert_eq!(
        client.try_set_project(&ctx.manager, &project_id, &update),
        Err(Ok(Error::RateDecreaseForbidden))
    );
}

#[test]
fn open_project_ignores_other_field_changes() {
    let ctx = setup();
    let client = ctx.fundraise();
    let project_id = ctx.add_default_project();
    client.advance_stage(&project_id);

    let new_borrower = Address::generate(&ctx.env);
    let mut update = ctx.default_input();
    update.hard_cap = 1 * USDC;
    update.soft_cap = 1 * USDC;
    update.borrower = new_borrower;
    update.pre_fund_duration = 1;
    client.set_project(&ctx.manager, &project_id, &update);

    // The call is accepted, but the guarded record is untouched.
    let project = client.get_project(&project_id);
    assert_eq!(project.hard_cap, 40_000 * USDC);
    assert_eq!(project.soft_cap, 20_000 * USDC);
    assert_eq!(project.borrower, ctx.borrower);
    assert_eq!(project.pre_fund_duration, 14 * DAY);
}

#[test]
fn later_stages_are_not_editable() {
    let ctx = setup();
    let client = ctx.fundraise();
    let investor = Address::generate(&ctx.env);
    let project_id = ctx.add_default_project();

    ctx.invest(&investor, project_id, 40_000 * USDC, None);
    assert_eq!(client.get_project(&project_id).stage, Stage::PreFunded);

    assert_eq!(
        client.try_set_project(&ctx.manager, &project_id, &ctx.default_input()),
        Err(Ok(Error::ProjectNotEditable))
    );
}

#[test]
fn manager_rotates_the_whitelist_root() {
    let ctx = setup();
    let client = ctx.fundraise();
    let outsider = Address::generate(&ctx.env);
    let project_id = ctx.add_default_project();

    let root = BytesN::from_array(&ctx.env, &[0xaau8; 32]);
    client.set_whitelist_root(&ctx.manager, &project_id, &root);
    assert_eq!(client.get_whitelist_root(&project_id), Some(root.clone()));

    assert_eq!(
        client.try_set_whitelist_root(&outsider, &project_id, &root),
        Err(Ok(Error::NotManager))
    );
}

#[test]
fn double_initialize_rejected() {
    let ctx = setup();
    let client = ctx.fundraise();

    assert_eq!(
        client.try_initialize(
            &ctx.manager,
            &ctx.registry_id,
            &ctx.reward_id,
            &ctx.treasury,
            &ctx.signer_public_key(),
        ),
        Err(Ok(Error::AlreadyInitialized))
    );
}

#[test]
fn basis_points_constant_exposed() {
    let ctx = setup();
    assert_eq!(ctx.fundraise().basis_points(), 1_000_000);
}

#[test]
fn pause_gates_only_funds_moving_paths() {
    let ctx = setup();
    let client = ctx.fundraise();
    let investor = Address::generate(&ctx.env);
    let project_id = ctx.add_default_project();

    ctx.invest(&investor, project_id, 1_000 * USDC, None);
    client.pause(&ctx.manager);
    assert!(client.is_paused());

    assert_eq!(
        client.try_withdraw(&investor, &investor, &project_id),
        Err(Ok(Error::ContractPaused))
    );
    assert_eq!(
        client.try_claim(&investor, &investor, &project_id),
        Err(Ok(Error::ContractPaused))
    );

    // Stage settlement stays available while paused.
    client.advance_stage(&project_id);

    client.unpause(&ctx.manager);
    assert!(!client.is_paused());
}
