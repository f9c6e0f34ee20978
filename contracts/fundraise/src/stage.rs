//! Deferred stage settlement.
//!
//! Time-based transitions are evaluated lazily, on the next interaction
//! with the project (investment, withdrawal, release, cancel, or the
//! permissionless `advance_stage` call). The hard-cap transition is
//! immediate and handled at the investment site; the PreFunded timeout
//! cancellation is an explicit action, never a lazy one.

use crate::storage::{Project, Stage};

/// Applies the time-based transitions to `project` at `now`. Returns true
/// if the stage changed; the caller persists the record.
pub fn settle(project: &mut Project, now: u64) -> bool {
    let before = project.stage;

    if project.stage == Stage::ComingSoon && now >= project.start_at {
        project.stage = Stage::Open;
    }

    // A project can open and immediately resolve its deadline in the same
    // settlement if both instants are in the past.
    if project.stage == Stage::Open && now > project.open_deadline {
        if project.total_invested > project.soft_cap {
            project.stage = Stage::PreFunded;
            project.pre_fund_clock_start = now;
        } else {
            project.stage = Stage::Canceled;
        }
    }

    project.stage != before
}

/// True once the permissionless cancellation window for a stuck PreFunded
/// project has opened.
pub fn pre_fund_timed_out(project: &Project, now: u64) -> bool {
    project.stage == Stage::PreFunded
        && now > project.pre_fund_clock_start.saturating_add(project.pre_fund_duration)
}
