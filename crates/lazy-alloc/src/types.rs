use crate::TARGET_FLOOR;

/// Which end of the funding-ratio ordering a contribution works from.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    /// `C >= 0`: fund the lowest funding ratios first.
    Deposit,
    /// `C < 0`: drain the highest funding ratios first.
    Withdrawal,
}

impl Direction {
    pub fn of(contribution: f64) -> Self {
        if contribution < 0.0 {
            Direction::Withdrawal
        } else {
            Direction::Deposit
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Deposit => "DEPOSIT",
            Direction::Withdrawal => "WITHDRAWAL",
        }
    }
}

/// One asset as seen by a single allocation call.
///
/// `original_index` is the caller's position; it survives the funding-ratio
/// sort so deltas can be written back in input order.
#[derive(Clone, Debug, PartialEq)]
pub struct Asset {
    pub original_index: usize,
    pub current_value: f64,
    pub target_fraction: f64,
    /// `max(T * target_fraction, TARGET_FLOOR)`.
    pub target_value: f64,
    /// `current_value / target_value`; below 1.0 is under-funded.
    pub funding_ratio: f64,
}

impl Asset {
    pub fn new(
        original_index: usize,
        current_value: f64,
        target_fraction: f64,
        portfolio_total: f64,
    ) -> Self {
        let target_value = (portfolio_total * target_fraction).max(TARGET_FLOOR);
        Self {
            original_index,
            current_value,
            target_fraction,
            target_value,
            funding_ratio: current_value / target_value,
        }
    }

    /// Capital needed to move this asset from its own funding ratio to `ratio`.
    pub fn delta_to(&self, ratio: f64) -> f64 {
        self.target_value * (ratio - self.funding_ratio)
    }
}

/// Result of one allocation run.
///
/// `deltas`: per-asset change, in the caller's input order.
/// `funded_count`: number of assets that took part (the rest have delta 0).
/// `final_ratio`: the common funding ratio the funded group converges to.
/// `portfolio_total`: `sum(current_values) + contribution`.
#[derive(Clone, Debug, PartialEq)]
pub struct AllocationPlan {
    pub deltas: Vec<f64>,
    pub direction: Direction,
    pub funded_count: usize,
    pub final_ratio: f64,
    pub portfolio_total: f64,
}

impl AllocationPlan {
    pub fn len(&self) -> usize {
        self.deltas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deltas.is_empty()
    }

    /// Sum of all deltas; equals the contribution up to float error.
    pub fn total(&self) -> f64 {
        self.deltas.iter().sum()
    }

    /// Indices (input order) that received a non-zero delta.
    pub fn touched(&self) -> Vec<usize> {
        self.deltas
            .iter()
            .enumerate()
            .filter(|(_, d)| **d != 0.0)
            .map(|(i, _)| i)
            .collect()
    }
}
