//! Per-mode ranking point calculation.
//!
//! A member placing in a bracket earns that bracket's points plus every
//! broader bracket's points, and also occupies a slot in every broader
//! bracket's member cap. Running totals of members are capped per bracket
//! and differenced back into per-bracket counts so overflow flows downward
//! without double counting.
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::config::Mode;
use crate::numbers::non_negative;

/// Read-only accessor for the raw member count reported at each tier of one mode.
pub trait TierLookup {
    /// Raw count for `tier_index`; `None` when nothing was entered.
    fn raw_count(&self, tier_index: usize) -> Option<i64>;
}

impl TierLookup for [i64] {
    fn raw_count(&self, tier_index: usize) -> Option<i64> {
        self.get(tier_index).copied()
    }
}

impl TierLookup for [u32] {
    fn raw_count(&self, tier_index: usize) -> Option<i64> {
        self.get(tier_index).copied().map(i64::from)
    }
}

impl<const N: usize> TierLookup for [i64; N] {
    fn raw_count(&self, tier_index: usize) -> Option<i64> {
        self.as_slice().raw_count(tier_index)
    }
}

impl TierLookup for Vec<i64> {
    fn raw_count(&self, tier_index: usize) -> Option<i64> {
        self.as_slice().raw_count(tier_index)
    }
}

/// Adapter turning a closure into a [`TierLookup`].
pub struct TierFn<F>(pub F);

impl<F> TierLookup for TierFn<F>
where
    F: Fn(usize) -> Option<i64>,
{
    fn raw_count(&self, tier_index: usize) -> Option<i64> {
        (self.0)(tier_index)
    }
}

/// Intermediate sequences of the per-mode calculation, one entry per tier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeBreakdown {
    pub cumulative_points: SmallVec<[u64; 5]>,
    pub cumulative_members: SmallVec<[u64; 5]>,
    pub capped_members: SmallVec<[u64; 5]>,
    pub effective_members: SmallVec<[u64; 5]>,
    /// Sum before the mode's point cap is applied.
    pub uncapped_total: u64,
    pub total: u64,
}

/// Compute every intermediate step of the per-mode calculation.
#[must_use]
pub fn mode_breakdown<L>(mode: &Mode, tiers: &L) -> ModeBreakdown
where
    L: TierLookup + ?Sized,
{
    let mut cumulative_points: SmallVec<[u64; 5]> = SmallVec::with_capacity(mode.tiers.len());
    let mut stacked = 0u64;
    for tier in mode.tiers.iter().rev() {
        stacked = stacked.saturating_add(tier.points);
        cumulative_points.push(stacked);
    }
    cumulative_points.reverse();

    let mut cumulative_members = SmallVec::with_capacity(mode.tiers.len());
    let mut capped_members = SmallVec::with_capacity(mode.tiers.len());
    let mut effective_members = SmallVec::with_capacity(mode.tiers.len());
    let mut running = 0u64;
    let mut previous_capped = 0u64;
    let mut uncapped_total = 0u64;
    for (index, tier) in mode.tiers.iter().enumerate() {
        running = running.saturating_add(non_negative(tiers.raw_count(index)));
        let capped = running.min(u64::from(tier.member_cap));
        let effective = if index == 0 {
            capped
        } else {
            capped.saturating_sub(previous_capped)
        };
        uncapped_total =
            uncapped_total.saturating_add(effective.saturating_mul(cumulative_points[index]));
        cumulative_members.push(running);
        capped_members.push(capped);
        effective_members.push(effective);
        previous_capped = capped;
    }

    let total = mode
        .point_cap
        .map_or(uncapped_total, |cap| uncapped_total.min(cap));

    ModeBreakdown {
        cumulative_points,
        cumulative_members,
        capped_members,
        effective_members,
        uncapped_total,
        total,
    }
}

/// Total points a mode awards for one cadence cycle.
#[must_use]
pub fn compute_mode_points<L>(mode: &Mode, tiers: &L) -> u64
where
    L: TierLookup + ?Sized,
{
    mode_breakdown(mode, tiers).total
}

/// Points the mode awards when every bracket is filled to its cap.
#[must_use]
pub fn max_mode_points(mode: &Mode) -> u64 {
    let full: Vec<i64> = mode
        .tiers
        .iter()
        .map(|tier| i64::from(tier.member_cap))
        .collect();
    compute_mode_points(mode, &full)
}
