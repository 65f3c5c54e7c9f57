//! Run-state machine that drives integration and collision resolution.

use crate::chain::Chain;
use crate::collision::{CollisionResolver, ResolveReport};
use crate::config::ParameterSet;
use crate::error::CradleError;
use crate::float::Float;
use crate::observer::{NoOpStepObserver, StepObserver};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Whether the cradle is swinging.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RunState {
    /// No chain has been built yet.
    Stopped,
    Running,
    /// A chain exists but time is frozen.
    Paused,
}

/// Owns the chain between resets and advances it one step at a time.
///
/// Stepping only happens when the caller asks for it; there is no
/// background timer.
#[derive(Clone, Debug)]
pub struct SimulationClock<F: Float> {
    state: RunState,
    chain: Option<Chain<F>>,
    resolver: CollisionResolver<F>,
    gravity: F,
    damping: F,
    fixed_step: F,
    max_steps_per_frame: usize,
    accumulator: F,
    steps: u64,
    elapsed: F,
}

impl<F: Float> SimulationClock<F> {
    /// A stopped clock with no chain, stepping at 60 Hz in fixed-step mode.
    pub fn new() -> Self {
        SimulationClock {
            state: RunState::Stopped,
            chain: None,
            resolver: CollisionResolver::new(),
            gravity: F::zero(),
            damping: F::one(),
            fixed_step: F::one() / F::from_f32(60.0),
            max_steps_per_frame: 8,
            accumulator: F::zero(),
            steps: 0,
            elapsed: F::zero(),
        }
    }

    pub fn with_resolver(mut self, resolver: CollisionResolver<F>) -> Self {
        self.resolver = resolver;
        self
    }

    /// Step size used by [`advance_fixed`](Self::advance_fixed).
    /// Non-positive values are ignored.
    pub fn with_fixed_step(mut self, step: F) -> Self {
        if step > F::zero() && step.is_finite() {
            self.fixed_step = step;
        }
        self
    }

    /// Cap on steps taken by one [`advance_fixed`](Self::advance_fixed) call.
    pub fn with_max_steps_per_frame(mut self, steps: usize) -> Self {
        self.max_steps_per_frame = steps.max(1);
        self
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn chain(&self) -> Option<&Chain<F>> {
        self.chain.as_ref()
    }

    pub fn resolver(&self) -> &CollisionResolver<F> {
        &self.resolver
    }

    /// Gravity captured at the last reset.
    pub fn gravity(&self) -> F {
        self.gravity
    }

    /// Damping captured at the last reset.
    pub fn damping(&self) -> F {
        self.damping
    }

    /// Steps taken since the last reset.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Simulated seconds since the last reset.
    pub fn elapsed(&self) -> F {
        self.elapsed
    }

    /// Start swinging. Does nothing when already running.
    ///
    /// From `Stopped` the clock runs but has nothing to move until a reset
    /// provides a chain.
    pub fn start(&mut self) {
        if self.state != RunState::Running {
            log::debug!("clock {:?} -> Running", self.state);
            self.state = RunState::Running;
        }
    }

    /// Freeze time. Only meaningful while running.
    pub fn pause(&mut self) {
        if self.state == RunState::Running {
            log::debug!("clock Running -> Paused");
            self.state = RunState::Paused;
        }
    }

    /// Start when paused or stopped, pause when running.
    pub fn toggle(&mut self) {
        match self.state {
            RunState::Running => self.pause(),
            RunState::Paused | RunState::Stopped => self.start(),
        }
    }

    /// Replace the chain with a fresh one built from `params` and pause.
    ///
    /// On error the clock keeps its previous chain and state.
    pub fn reset(&mut self, params: &ParameterSet<F>) -> Result<(), CradleError> {
        let chain = Chain::new(params)?;
        self.chain = Some(chain);
        self.gravity = params.gravity();
        self.damping = params.damping();
        self.accumulator = F::zero();
        self.steps = 0;
        self.elapsed = F::zero();
        self.state = RunState::Paused;
        log::debug!(
            "reset: {} balls, gravity {:?}, damping {:?}",
            params.ball_count(),
            params.gravity(),
            params.damping(),
        );
        Ok(())
    }

    /// Integrate every body by `dt`, then resolve contacts once.
    ///
    /// Silently does nothing unless running with a chain. Returns whether a
    /// step was taken.
    pub fn advance(&mut self, dt: F) -> bool {
        self.advance_observed(dt, &mut NoOpStepObserver).is_some()
    }

    /// [`advance`](Self::advance) reporting to `observer`; returns the
    /// resolve report of the step taken, if any.
    pub fn advance_observed<O: StepObserver>(
        &mut self,
        dt: F,
        observer: &mut O,
    ) -> Option<ResolveReport> {
        if self.state != RunState::Running || !(dt > F::zero()) || !dt.is_finite() {
            return None;
        }
        let chain = self.chain.as_mut()?;

        chain.integrate(dt, self.gravity, self.damping);
        observer.on_integrate();

        let report = self.resolver.resolve_observed(chain, self.damping, observer);
        observer.on_step_complete(&report);

        self.steps += 1;
        self.elapsed = self.elapsed + dt;
        Some(report)
    }

    /// Feed wall-clock frame time and take as many whole fixed steps as fit.
    ///
    /// Leftover time carries to the next frame. When a frame would need
    /// more than the per-frame cap, the backlog is dropped so a stalled
    /// caller does not trigger a burst of catch-up steps. Returns the number
    /// of steps taken.
    pub fn advance_fixed(&mut self, frame_dt: F) -> usize {
        if self.state != RunState::Running || !(frame_dt > F::zero()) || !frame_dt.is_finite() {
            return 0;
        }
        self.accumulator = self.accumulator + frame_dt;

        let mut taken = 0;
        while self.accumulator >= self.fixed_step && taken < self.max_steps_per_frame {
            if !self.advance(self.fixed_step) {
                break;
            }
            self.accumulator = self.accumulator - self.fixed_step;
            taken += 1;
        }

        if self.accumulator >= self.fixed_step {
            log::warn!(
                "dropping {:?}s of simulation backlog after {} steps",
                self.accumulator.to_f64(),
                taken,
            );
            self.accumulator = F::zero();
        }
        taken
    }
}

impl<F: Float> Default for SimulationClock<F> {
    fn default() -> Self {
        Self::new()
    }
}
