//! Optimization levels and the public `optimize` entry point

use crate::compiler::{Optimizer, OptimizerConfig};
use crate::passes::{Cancellation, Commutation, DepthLayering, QubitRemap, RotationMerge};
use qsc_core::{Circuit, Result};

/// Optimization level
///
/// - `O0`: identity
/// - `O1`: cancellation + rotation merging
/// - `O2`: O1 + commutation reordering
/// - `O3`: O2 + depth layering + qubit remapping
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum OptimizationLevel {
    O0,
    O1,
    O2,
    O3,
}

impl From<u8> for OptimizationLevel {
    fn from(level: u8) -> Self {
        match level {
            0 => Self::O0,
            1 => Self::O1,
            2 => Self::O2,
            _ => Self::O3,
        }
    }
}

/// Build the pass pipeline for a level
pub fn create_optimizer(level: OptimizationLevel) -> Optimizer {
    let mut optimizer = Optimizer::new(OptimizerConfig::default());
    if level >= OptimizationLevel::O1 {
        optimizer.add_rewrite_pass(Box::new(Cancellation::new()));
        optimizer.add_rewrite_pass(Box::new(RotationMerge::new()));
    }
    if level >= OptimizationLevel::O2 {
        optimizer.add_rewrite_pass(Box::new(Commutation::new()));
    }
    if level >= OptimizationLevel::O3 {
        optimizer.add_schedule_pass(Box::new(DepthLayering::new()));
        optimizer.add_schedule_pass(Box::new(QubitRemap::new()));
    }
    optimizer
}

/// Optimize a circuit at the given level (0..=3)
///
/// Pure: the input circuit is untouched. The result is observationally
/// equivalent to the input for every measurement-outcome distribution, up
/// to a global phase, and optimizing again at the same level is a no-op.
///
/// # Errors
/// A pass invariant violation (internal error) is reported and the input
/// circuit is left as it was.
pub fn optimize(circuit: &Circuit, level: u8) -> Result<Circuit> {
    let mut optimized = circuit.clone();
    create_optimizer(OptimizationLevel::from(level)).run(&mut optimized)?;
    Ok(optimized)
}
