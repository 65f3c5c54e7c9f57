//! Step observer trait for monitoring the simulation.

use crate::collision::ResolveReport;

/// Trait for observing simulation steps.
///
/// Implement this trait to watch the cascade (e.g., for debugging,
/// visualization, or counting collisions). All methods have default
/// no-op implementations.
pub trait StepObserver {
    /// Called after every body has been integrated.
    fn on_integrate(&mut self) {}

    /// Called when the pair `(pair, pair + 1)` exchanges an impulse.
    fn on_collision(&mut self, _pair: usize) {}

    /// Called after each full left-to-right resolve pass.
    fn on_resolve_pass(&mut self, _pass: usize) {}

    /// Called when a step is fully integrated and resolved.
    fn on_step_complete(&mut self, _report: &ResolveReport) {}
}

/// A no-op observer that does nothing. Use as default when no observation needed.
pub struct NoOpStepObserver;

impl StepObserver for NoOpStepObserver {}
