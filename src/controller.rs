//! Facade the presentation layer talks to.
//!
//! A frame loop typically looks like:
//!
//! ```
//! use cradle::{Parameter, SimulationController};
//!
//! let mut sim: SimulationController<f32> = SimulationController::new();
//! sim.set_parameter(Parameter::BallCount, 6.0).unwrap();
//! sim.reset().unwrap();
//! sim.start();
//! for _ in 0..10 {
//!     sim.tick(1.0 / 60.0);
//!     let frame = sim.snapshot();
//!     assert_eq!(frame.balls.len(), 6);
//! }
//! ```

use alloc::vec::Vec as AllocVec;

use crate::chain::Chain;
use crate::clock::{RunState, SimulationClock};
use crate::collision::ResolveReport;
use crate::config::{Parameter, ParameterSet};
use crate::error::CradleError;
use crate::float::Float;
use crate::observer::StepObserver;
use crate::vec::Vec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// What a renderer needs to draw one ball and its rod.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BallSnapshot<F: Float> {
    pub position: Vec2<F>,
    pub pivot: Vec2<F>,
    pub radius: F,
    pub angle: F,
}

/// Owned copy of the cradle at one instant.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Snapshot<F: Float> {
    /// Balls left to right. Empty before the first reset.
    pub balls: AllocVec<BallSnapshot<F>>,
    pub state: RunState,
}

/// Owns the parameters, the chain and the clock.
///
/// Parameter changes are staged: they take effect on the next
/// [`reset`](Self::reset), never mid-swing.
#[derive(Clone, Debug)]
pub struct SimulationController<F: Float> {
    params: ParameterSet<F>,
    clock: SimulationClock<F>,
}

impl<F: Float> SimulationController<F> {
    /// Default parameters, no chain yet (`Stopped`).
    pub fn new() -> Self {
        Self::with_parameters(ParameterSet::new())
    }

    pub fn with_parameters(params: ParameterSet<F>) -> Self {
        SimulationController {
            params,
            clock: SimulationClock::new(),
        }
    }

    /// Use a custom clock (fixed step, resolver tuning). Whatever chain the
    /// new clock holds replaces the current one; call `reset` afterwards to
    /// build from the staged parameters.
    pub fn with_clock(mut self, clock: SimulationClock<F>) -> Self {
        self.clock = clock;
        self
    }

    pub fn parameters(&self) -> &ParameterSet<F> {
        &self.params
    }

    /// Validate and stage a parameter change.
    pub fn set_parameter(&mut self, parameter: Parameter, value: F) -> Result<(), CradleError> {
        self.params.set(parameter, value)
    }

    /// [`set_parameter`](Self::set_parameter) addressed by name, e.g. `"rodLength"`.
    pub fn set_parameter_by_name(&mut self, name: &str, value: F) -> Result<(), CradleError> {
        let parameter: Parameter = name.parse()?;
        self.set_parameter(parameter, value)
    }

    /// Rebuild the chain from the staged parameters and pause.
    pub fn reset(&mut self) -> Result<(), CradleError> {
        self.clock.reset(&self.params)
    }

    pub fn start(&mut self) {
        self.clock.start();
    }

    pub fn pause(&mut self) {
        self.clock.pause();
    }

    pub fn toggle(&mut self) {
        self.clock.toggle();
    }

    /// Advance by exactly one step of `dt` seconds when running.
    pub fn tick(&mut self, dt: F) -> bool {
        self.clock.advance(dt)
    }

    /// [`tick`](Self::tick) with a step observer attached.
    pub fn tick_observed<O: StepObserver>(&mut self, dt: F, observer: &mut O) -> Option<ResolveReport> {
        self.clock.advance_observed(dt, observer)
    }

    /// Advance by measured frame time using the clock's fixed step.
    pub fn tick_frame(&mut self, frame_dt: F) -> usize {
        self.clock.advance_fixed(frame_dt)
    }

    pub fn state(&self) -> RunState {
        self.clock.state()
    }

    pub fn chain(&self) -> Option<&Chain<F>> {
        self.clock.chain()
    }

    pub fn clock(&self) -> &SimulationClock<F> {
        &self.clock
    }

    /// Total mechanical energy of the current chain under the gravity it
    /// was built with; zero before the first reset.
    pub fn energy(&self) -> F {
        self.clock
            .chain()
            .map(|c| c.total_energy(self.clock.gravity()))
            .unwrap_or_else(F::zero)
    }

    pub fn snapshot(&self) -> Snapshot<F> {
        let balls = match self.clock.chain() {
            Some(chain) => chain
                .bodies()
                .iter()
                .map(|b| BallSnapshot {
                    position: b.position(),
                    pivot: b.pivot(),
                    radius: b.radius(),
                    angle: b.angle,
                })
                .collect(),
            None => AllocVec::new(),
        };
        Snapshot {
            balls,
            state: self.clock.state(),
        }
    }
}

impl<F: Float> Default for SimulationController<F> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_snapshot_before_reset() {
        let sim: SimulationController<f64> = SimulationController::new();
        let snap = sim.snapshot();
        assert!(snap.balls.is_empty());
        assert_eq!(snap.state, RunState::Stopped);
        assert_eq!(sim.energy(), 0.0);
    }

    #[test]
    fn staged_change_waits_for_reset() {
        let mut sim: SimulationController<f64> = SimulationController::new();
        sim.reset().unwrap();
        sim.set_parameter(Parameter::BallCount, 3.0).unwrap();
        assert_eq!(sim.snapshot().balls.len(), 5);
        sim.reset().unwrap();
        assert_eq!(sim.snapshot().balls.len(), 3);
    }

    #[test]
    fn by_name_rejects_unknown() {
        let mut sim: SimulationController<f64> = SimulationController::new();
        assert_eq!(
            sim.set_parameter_by_name("spin", 1.0),
            Err(CradleError::UnknownParameter)
        );
        sim.set_parameter_by_name("gravity", 9.81).unwrap();
        assert_eq!(sim.parameters().gravity(), 9.81);
    }

    #[test]
    fn snapshot_matches_chain() {
        let mut sim: SimulationController<f64> = SimulationController::new();
        sim.reset().unwrap();
        let snap = sim.snapshot();
        let chain = sim.chain().unwrap();
        for (ball, body) in snap.balls.iter().zip(chain.bodies()) {
            assert_eq!(ball.position, body.position());
            assert_eq!(ball.pivot, body.pivot());
            assert_eq!(ball.radius, 20.0);
        }
        assert_eq!(snap.state, RunState::Paused);
    }
}
