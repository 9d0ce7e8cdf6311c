//! Optimization pipeline driver
//!
//! Runs the rewrite passes to a fixed point, then the scheduling passes
//! once. Because every rewrite pass reports whether it changed anything,
//! the loop terminates exactly when a full sweep is a no-op, which makes
//! the whole pipeline idempotent: optimizing an optimized circuit changes
//! nothing.

use crate::passes::{OptimizationPass, OptimizationResult, PassStatistics};
use qsc_core::{Circuit, Result};
use std::time::Instant;
use tracing::debug;

/// Configuration for the pass driver
#[derive(Debug, Clone)]
pub struct OptimizerConfig {
    /// Cap on fixed-point sweeps; a safety net, not a tuning knob
    pub max_iterations: usize,
    /// Whether to record per-pass timing
    pub enable_timing: bool,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            max_iterations: 32,
            enable_timing: true,
        }
    }
}

/// Pass driver
///
/// Rewrite passes (cancellation, merging, commutation) iterate together
/// until none reports a change; scheduling passes (layering, remapping)
/// run once afterwards.
pub struct Optimizer {
    config: OptimizerConfig,
    rewrite_passes: Vec<Box<dyn OptimizationPass>>,
    schedule_passes: Vec<Box<dyn OptimizationPass>>,
}

impl Optimizer {
    /// Create an empty driver
    pub fn new(config: OptimizerConfig) -> Self {
        Self {
            config,
            rewrite_passes: Vec::new(),
            schedule_passes: Vec::new(),
        }
    }

    /// Add a pass to the fixed-point loop
    pub fn add_rewrite_pass(&mut self, pass: Box<dyn OptimizationPass>) {
        self.rewrite_passes.push(pass);
    }

    /// Add a pass that runs once after the loop converges
    pub fn add_schedule_pass(&mut self, pass: Box<dyn OptimizationPass>) {
        self.schedule_passes.push(pass);
    }

    /// Number of registered passes
    pub fn num_passes(&self) -> usize {
        self.rewrite_passes.len() + self.schedule_passes.len()
    }

    /// Run the pipeline in place
    ///
    /// # Errors
    /// Propagates the first pass failure; the caller's circuit may be in
    /// a partially rewritten state, which is why [`crate::optimize`]
    /// works on a copy.
    pub fn run(&self, circuit: &mut Circuit) -> Result<OptimizationResult> {
        let start = Instant::now();
        let mut result = OptimizationResult::default();

        for iteration in 0..self.config.max_iterations {
            let mut changed = false;
            for pass in &self.rewrite_passes {
                changed |= self.run_pass(pass.as_ref(), circuit, iteration, &mut result)?;
            }
            if !changed {
                break;
            }
        }

        for pass in &self.schedule_passes {
            self.run_pass(pass.as_ref(), circuit, 0, &mut result)?;
        }

        result.total_time_us = start.elapsed().as_micros() as u64;
        Ok(result)
    }

    fn run_pass(
        &self,
        pass: &dyn OptimizationPass,
        circuit: &mut Circuit,
        iteration: usize,
        result: &mut OptimizationResult,
    ) -> Result<bool> {
        let pass_start = self.config.enable_timing.then(Instant::now);
        let modified = pass.apply(circuit)?;
        debug!(
            pass = pass.name(),
            iteration,
            modified,
            gates = circuit.len(),
            "optimizer pass"
        );

        if let Some(started) = pass_start {
            result.add_pass_stats(PassStatistics {
                pass_name: pass.name().to_string(),
                iteration,
                time_us: started.elapsed().as_micros() as u64,
                modified,
            });
        } else if modified {
            result.modified = true;
        }
        Ok(modified)
    }
}
