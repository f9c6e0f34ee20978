use crate::storage::{RewardAccrual, BASIS_POINTS};

pub const WEEK_IN_SECONDS: u64 = 604_800;

/// Tokens unlocked at `now` for an entitlement of `total`.
///
/// The first weekly tranche unlocks at activation itself, so the unlocked
/// week count is `weeks_passed + 1`. Once the count reaches
/// `vesting_weeks` the full entitlement is unlocked regardless of the
/// weekly rate.
pub fn unlocked_amount(
    total: i128,
    vesting_start: u64,
    now: u64,
    vesting_weeks: u32,
    weekly_unlock_rate: i128,
) -> i128 {
    if total <= 0 {
        return 0;
    }

    let weeks_passed = now.saturating_sub(vesting_start) / WEEK_IN_SECONDS;
    let unlocked_weeks = weeks_passed + 1;

    if unlocked_weeks >= vesting_weeks as u64 {
        return total;
    }

    let unlocked = total
        .checked_mul(unlocked_weeks as i128)
        .and_then(|v| v.checked_mul(weekly_unlock_rate))
        .map(|v| v / BASIS_POINTS)
        .unwrap_or(total);

    if unlocked > total {
        total
    } else {
        unlocked
    }
}

/// Currently claimable tokens: unlocked minus already claimed, floored at
/// zero.
pub fn claimable_amount(
    accrual: &RewardAccrual,
    vesting_start: u64,
    now: u64,
    vesting_weeks: u32,
    weekly_unlock_rate: i128,
) -> i128 {
    let unlocked = unlocked_amount(
        accrual.tokens,
        vesting_start,
        now,
        vesting_weeks,
        weekly_unlock_rate,
    );
    let claimable = unlocked - accrual.vesting_claimed;
    if claimable < 0 {
        0
    } else {
        claimable
    }
}
