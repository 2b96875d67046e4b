//! Per-account vesting schedules.
//!
//! A schedule is an append-only list of [`VestingEntry`] values in creation
//! order. Rewards arriving within [`MERGE_WINDOW`] of the newest entry are
//! folded into it so that frequent small claims do not exhaust the
//! [`MAX_VESTING_ENTRIES`] slots. A cursor (the "next vesting index") marks the
//! first entry that has not been paid out yet.

use soroban_sdk::{contracttype, Vec};

use crate::ContractError;

const DAY: u64 = 86_400;

/// Delay between the creation of an entry and the moment it can be vested.
pub const VESTING_PERIOD: u64 = 365 * DAY;

/// Rewards appended within this window of the newest entry are merged into it.
pub const MERGE_WINDOW: u64 = 7 * DAY;

/// Hard cap on the number of entries in one account's schedule.
pub const MAX_VESTING_ENTRIES: u32 = 260;

#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct VestingEntry {
    /// Timestamp from which the entry can be vested.
    pub end_time: u64,
    pub quantity: i128,
}

impl VestingEntry {
    fn created_at(&self) -> u64 {
        self.end_time.saturating_sub(VESTING_PERIOD)
    }
}

/// Add `quantity` to the schedule and return the index of the entry that
/// holds it.
///
/// The newest entry absorbs the quantity when it is younger than
/// [`MERGE_WINDOW`] and has not been paid out (its index is at or past
/// `cursor`). Otherwise a new entry maturing at `now + VESTING_PERIOD` is
/// pushed, unless the schedule is already full.
pub fn append_or_merge(
    schedule: &mut Vec<VestingEntry>,
    cursor: u32,
    now: u64,
    quantity: i128,
) -> Result<u32, ContractError> {
    let len = schedule.len();
    if let Some(mut newest) = schedule.last() {
        let newest_index = len - 1;
        let age = now.saturating_sub(newest.created_at());
        if newest_index >= cursor && age < MERGE_WINDOW {
            newest.quantity = newest
                .quantity
                .checked_add(quantity)
                .ok_or(ContractError::ArithmeticOverflow)?;
            schedule.set(newest_index, newest);
            return Ok(newest_index);
        }
    }

    if len >= MAX_VESTING_ENTRIES {
        return Err(ContractError::ScheduleTooLong);
    }

    schedule.push_back(VestingEntry {
        end_time: now.saturating_add(VESTING_PERIOD),
        quantity,
    });
    Ok(len)
}

/// Sum the consecutive entries from `cursor` that have matured by `now`.
///
/// Returns the total and the new cursor. Entries are chronological, so the
/// walk stops at the first entry that is still locked.
pub fn collect_matured(
    schedule: &Vec<VestingEntry>,
    cursor: u32,
    now: u64,
) -> Result<(i128, u32), ContractError> {
    let mut total: i128 = 0;
    let mut next = cursor;

    for entry in schedule.iter().skip(cursor as usize) {
        if entry.end_time > now {
            break;
        }
        total = total
            .checked_add(entry.quantity)
            .ok_or(ContractError::ArithmeticOverflow)?;
        next += 1;
    }

    Ok((total, next))
}

/// Sum every entry from `cursor` to the end of the schedule, matured or not.
pub fn collect_remaining(schedule: &Vec<VestingEntry>, cursor: u32) -> Result<i128, ContractError> {
    schedule
        .iter()
        .skip(cursor as usize)
        .try_fold(0i128, |acc, entry| {
            acc.checked_add(entry.quantity)
                .ok_or(ContractError::ArithmeticOverflow)
        })
}
