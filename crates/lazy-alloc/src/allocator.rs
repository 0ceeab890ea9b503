//! lazy-alloc: allocator
//!
//! Responsibilities (pure, no IO):
//! - Accept current per-asset values, target fractions and a signed contribution.
//! - Produce per-asset deltas that sum to the contribution, in input order.
//!
//! Design notes:
//! - Target fractions are fractions of the post-contribution total
//!   `T = sum(values) + C`. They are NOT normalised; a set that does not sum
//!   to 1 still allocates, it just no longer partitions `T`.
//! - Deltas are not rounded here. See [`crate::round_deltas`].
//! - Cleansing blank or non-numeric rows happens upstream (lazy-config).

use crate::types::{AllocationPlan, Asset, Direction};

// ─── Error ───────────────────────────────────────────────────────────────────

/// Errors produced during allocation.
#[derive(Clone, Debug, PartialEq)]
pub enum AllocationError {
    /// No assets were supplied.
    EmptyInput,
    /// `current_values` and `target_allocs` differ in length.
    ShapeMismatch { values: usize, targets: usize },
    /// A current value is NaN or infinite.
    NonFiniteValue { index: usize },
    /// A target fraction is NaN or infinite.
    NonFiniteTarget { index: usize },
    /// The contribution is NaN or infinite.
    NonFiniteContribution,
    /// The funded group's accumulated target weight cannot carry the
    /// remaining capital (zero weight or a non-finite final ratio).
    DegenerateTarget,
}

impl std::fmt::Display for AllocationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyInput => write!(f, "at least one asset is required"),
            Self::ShapeMismatch { values, targets } => write!(
                f,
                "shape mismatch: {values} current value(s) but {targets} target allocation(s)"
            ),
            Self::NonFiniteValue { index } => {
                write!(f, "invalid (NaN/inf) current value at index {index}")
            }
            Self::NonFiniteTarget { index } => {
                write!(f, "invalid (NaN/inf) target allocation at index {index}")
            }
            Self::NonFiniteContribution => write!(f, "invalid (NaN/inf) contribution"),
            Self::DegenerateTarget => write!(
                f,
                "degenerate target weight: funded group cannot absorb the contribution"
            ),
        }
    }
}

impl std::error::Error for AllocationError {}

// ─── Entry points ────────────────────────────────────────────────────────────

/// Deltas only. See [`plan_contribution`] for the algorithm.
pub fn lazy_alloc(
    current_values: &[f64],
    target_allocs: &[f64],
    contribution: f64,
) -> Result<Vec<f64>, AllocationError> {
    plan_contribution(current_values, target_allocs, contribution).map(|p| p.deltas)
}

/// Distribute `contribution` across assets, neediest first.
///
/// # Algorithm (water-filling on funding ratios)
///
/// 1. Validate shape and finiteness.
/// 2. `T = sum(values) + C`; per asset `target = max(T * fraction, TARGET_FLOOR)`
///    and `ratio = value / target`.
/// 3. Sort by ratio ascending for a deposit, descending for a withdrawal.
/// 4. Walk from the neediest end. The group so far has weight `r` (sum of its
///    targets). Lifting the whole group to the next asset's ratio costs
///    `r * (next - this)` on top of what earlier breakpoints cost. Stop when
///    every asset is in, or that cumulative cost reaches `|C|`.
/// 5. Spread what is left linearly over `r`:
///    `f_f = this + (C - cost_so_far) / r`.
/// 6. Each group member gets `target * (f_f - ratio)`; everyone else 0.
///
/// The group ends at a common ratio `f_f` that never passes the first
/// excluded asset's ratio, so no asset is pushed past a less-needy one.
pub fn plan_contribution(
    current_values: &[f64],
    target_allocs: &[f64],
    contribution: f64,
) -> Result<AllocationPlan, AllocationError> {
    // ── 0. Guard inputs ──────────────────────────────────────────────────────
    if current_values.len() != target_allocs.len() {
        return Err(AllocationError::ShapeMismatch {
            values: current_values.len(),
            targets: target_allocs.len(),
        });
    }
    if current_values.is_empty() {
        return Err(AllocationError::EmptyInput);
    }
    if !contribution.is_finite() {
        return Err(AllocationError::NonFiniteContribution);
    }
    if let Some(index) = current_values.iter().position(|v| !v.is_finite()) {
        return Err(AllocationError::NonFiniteValue { index });
    }
    if let Some(index) = target_allocs.iter().position(|d| !d.is_finite()) {
        return Err(AllocationError::NonFiniteTarget { index });
    }

    // ── 1. Asset records ─────────────────────────────────────────────────────
    let portfolio_total: f64 = current_values.iter().sum::<f64>() + contribution;
    let mut assets: Vec<Asset> = current_values
        .iter()
        .zip(target_allocs)
        .enumerate()
        .map(|(i, (&value, &fraction))| Asset::new(i, value, fraction, portfolio_total))
        .collect();

    // ── 2. Neediest first ────────────────────────────────────────────────────
    let direction = Direction::of(contribution);
    assets.sort_by(|a, b| {
        let ord = a
            .funding_ratio
            .partial_cmp(&b.funding_ratio)
            .unwrap_or(std::cmp::Ordering::Equal);
        match direction {
            Direction::Deposit => ord,
            Direction::Withdrawal => ord.reverse(),
        }
    });

    // ── 3. Grow the funded group ─────────────────────────────────────────────
    let mut step = 0usize;
    let mut r = 0.0f64;
    let mut prev_tc = 0.0f64;
    let mut this_f;

    loop {
        this_f = assets[step].funding_ratio;
        r += assets[step].target_value;

        if step + 1 == assets.len() {
            break;
        }

        let next_f = assets[step + 1].funding_ratio;
        let tc = prev_tc + r * (next_f - this_f);
        if tc.abs() >= contribution.abs() {
            break;
        }

        step += 1;
        prev_tc = tc;
    }

    // ── 4. Common final ratio ────────────────────────────────────────────────
    if !(r.is_finite() && r > 0.0) {
        return Err(AllocationError::DegenerateTarget);
    }
    let final_ratio = this_f + (contribution - prev_tc) / r;
    if !final_ratio.is_finite() {
        return Err(AllocationError::DegenerateTarget);
    }

    // ── 5. Deltas back in input order ────────────────────────────────────────
    let mut deltas = vec![0.0f64; assets.len()];
    for asset in assets.iter().take(step + 1) {
        deltas[asset.original_index] = asset.delta_to(final_ratio);
    }

    Ok(AllocationPlan {
        deltas,
        direction,
        funded_count: step + 1,
        final_ratio,
        portfolio_total,
    })
}

// ─── Tests ────────────────────────────────────────────────────────────────────
