//! lazy-alloc
//!
//! Lazy contribution allocation:
//! - A deposit funds the most under-funded assets first
//! - A withdrawal drains the most over-funded assets first
//! - Only as many assets are touched as the contribution can move
//! - Pure deterministic logic (no IO, no time, no config)
//!
//! ```
//! let deltas = lazy_alloc::lazy_alloc(&[0.0, 100.0], &[0.5, 0.5], 10.0).unwrap();
//! assert_eq!(deltas, vec![10.0, 0.0]);
//! ```

mod rounding;
mod types;

pub mod allocator;

pub use allocator::{lazy_alloc, plan_contribution, AllocationError};
pub use rounding::{round_delta, round_deltas, CENTS, MAX_DECIMALS};
pub use types::{AllocationPlan, Asset, Direction};

/// Minimum target value (in currency units) assigned to an asset whose
/// `T * target_fraction` is zero or negative.
///
/// A zero-target asset is treated as having a negligible funding target, so
/// any value it holds makes it heavily over-funded and it never divides by zero.
pub const TARGET_FLOOR: f64 = 0.001;
