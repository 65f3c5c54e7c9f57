//! Iterative impulse solver for neighbouring balls.
//!
//! After every body has swung freely for one step, neighbours may overlap.
//! The resolver sweeps the adjacent pairs left to right, exchanging momentum
//! between pairs that touch and are closing, and pushing overlapping pairs
//! apart. A single hit at one end therefore needs several sweeps to travel
//! through the resting balls to the far end; sweeps repeat until one finds
//! nothing to do or the iteration cap is reached.

use crate::body::PendulumBody;
use crate::chain::Chain;
use crate::float::Float;
use crate::observer::{NoOpStepObserver, StepObserver};
use crate::vec::Vec2;

/// Overlap below this fraction of the radius sum is left alone.
const PENETRATION_EPSILON: f32 = 1e-4;

/// Summary of one call to [`CollisionResolver::resolve`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ResolveReport {
    /// Sweeps over the pair list that were run.
    pub passes: usize,
    /// Impulses exchanged across all passes.
    pub collisions: usize,
    /// Positional corrections applied across all passes.
    pub corrections: usize,
    /// False when the iteration cap stopped the sweep early.
    pub converged: bool,
}

/// What happened to a single pair during one visit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PairOutcome {
    /// An impulse was exchanged.
    pub collided: bool,
    /// The pair was pushed apart.
    pub corrected: bool,
}

/// Resolves contacts between adjacent bodies of a [`Chain`].
///
/// # Builder Pattern
/// ```
/// use cradle::collision::CollisionResolver;
///
/// let resolver: CollisionResolver<f64> = CollisionResolver::new()
///     .with_max_iterations(32)
///     .with_contact_tolerance(0.01);
/// assert_eq!(resolver.max_iterations, 32);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct CollisionResolver<F: Float> {
    /// Cap on full sweeps per call. Default: 20.
    pub max_iterations: usize,
    /// Contact slop as a fraction of the radius sum: balls this close count as
    /// touching. Lets an impulse pass through resting neighbours whose gap is
    /// exactly zero. Default: 0.01.
    pub contact_tolerance: F,
}

impl<F: Float> CollisionResolver<F> {
    pub fn new() -> Self {
        CollisionResolver {
            max_iterations: 20,
            contact_tolerance: F::from_f32(0.01),
        }
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations.max(1);
        self
    }

    pub fn with_contact_tolerance(mut self, tolerance: F) -> Self {
        self.contact_tolerance = tolerance.max(F::zero());
        self
    }

    /// Resolve every adjacent contact in `chain`.
    ///
    /// `restitution` blends each exchange between the elastic result (1.0)
    /// and the pre-collision velocities (0.0).
    pub fn resolve(&self, chain: &mut Chain<F>, restitution: F) -> ResolveReport {
        self.resolve_observed(chain, restitution, &mut NoOpStepObserver)
    }

    /// [`resolve`](Self::resolve) with progress reported to `observer`.
    pub fn resolve_observed<O: StepObserver>(
        &self,
        chain: &mut Chain<F>,
        restitution: F,
        observer: &mut O,
    ) -> ResolveReport {
        let mut report = ResolveReport::default();

        for pass in 0..self.max_iterations {
            let mut active = false;
            for i in 0..chain.pair_count() {
                let (left, right) = chain.pair_mut(i);
                let outcome = self.resolve_pair(left, right, restitution);
                if outcome.collided {
                    report.collisions += 1;
                    observer.on_collision(i);
                }
                if outcome.corrected {
                    report.corrections += 1;
                }
                active |= outcome.collided || outcome.corrected;
            }
            report.passes = pass + 1;
            observer.on_resolve_pass(pass);

            if !active {
                report.converged = true;
                break;
            }
        }

        if !report.converged {
            log::debug!(
                "collision sweep stopped after {} passes without settling ({} impulses)",
                report.passes,
                report.collisions,
            );
        } else if report.collisions > 0 {
            log::trace!(
                "resolved {} impulses in {} passes",
                report.collisions,
                report.passes,
            );
        }

        report
    }

    /// Exchange momentum between `left` and `right` if they touch and close,
    /// then separate them if they overlap.
    pub fn resolve_pair(
        &self,
        left: &mut PendulumBody<F>,
        right: &mut PendulumBody<F>,
        restitution: F,
    ) -> PairOutcome {
        let mut outcome = PairOutcome::default();

        let left_pos = left.position();
        let right_pos = right.position();
        let delta = right_pos - left_pos;
        let distance = delta.length();
        let reach = left.radius() + right.radius();
        let normal = if distance.is_near_zero(F::from_f32(1e-12)) {
            Vec2::new(F::one(), F::zero())
        } else {
            delta.scale(F::one() / distance)
        };

        if distance < reach + reach * self.contact_tolerance {
            let closing = (right.velocity() - left.velocity()).dot(normal);
            if closing < F::zero() {
                let (u_left, u_right) = exchange(
                    left.mass(),
                    left.linear_velocity(),
                    right.mass(),
                    right.linear_velocity(),
                    restitution,
                );
                left.set_linear_velocity(u_left);
                right.set_linear_velocity(u_right);
                outcome.collided = true;
            }
        }

        let penetration = reach - distance;
        if penetration > reach * F::from_f32(PENETRATION_EPSILON) {
            // Whichever ball now carries momentum away from the contact backs
            // out the overlap; with neither leaving, split by inverse mass.
            let leaving_left = (-left.velocity().dot(normal)).max(F::zero());
            let leaving_right = right.velocity().dot(normal).max(F::zero());
            let (w_left, w_right) = if leaving_left + leaving_right > F::from_f32(1e-12) {
                (leaving_left, leaving_right)
            } else {
                (left.inv_mass(), right.inv_mass())
            };
            let total = w_left + w_right;
            let push_left = penetration * w_left / total;
            let push_right = penetration * w_right / total;

            left.set_position_x(left_pos.x - normal.x * push_left);
            right.set_position_x(right_pos.x + normal.x * push_right);
            outcome.corrected = true;
        }

        outcome
    }
}

impl<F: Float> Default for CollisionResolver<F> {
    fn default() -> Self {
        Self::new()
    }
}

/// One-dimensional collision of two point masses with speeds `u1`, `u2`.
///
/// The elastic result is blended with the incoming speeds by `restitution`:
/// 1.0 returns the elastic exchange, 0.0 returns the inputs unchanged.
/// Momentum is conserved for every blend.
pub fn exchange<F: Float>(m1: F, u1: F, m2: F, u2: F, restitution: F) -> (F, F) {
    let total = m1 + m2;
    let elastic1 = ((m1 - m2) * u1 + F::two() * m2 * u2) / total;
    let elastic2 = ((m2 - m1) * u2 + F::two() * m1 * u1) / total;
    let keep = F::one() - restitution;
    (
        restitution * elastic1 + keep * u1,
        restitution * elastic2 + keep * u2,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParameterSet;

    fn pair(left_omega: f64, right_omega: f64, right_angle: f64) -> Chain<f64> {
        let params = ParameterSet::new()
            .with_ball_count(2)
            .unwrap()
            .with_initial_angle(right_angle)
            .unwrap();
        let mut chain = Chain::new(&params).unwrap();
        chain.body_mut(0).angular_velocity = left_omega;
        chain.body_mut(1).angular_velocity = right_omega;
        chain
    }

    #[test]
    fn equal_masses_swap_speeds() {
        let (a, b) = exchange(2.0f64, 3.0, 2.0, -1.0, 1.0);
        assert!((a - -1.0).abs() < 1e-12);
        assert!((b - 3.0).abs() < 1e-12);
    }

    #[test]
    fn heavy_target_bounces_light_ball_back() {
        let (light, heavy) = exchange(1.0f64, 1.0, 3.0, 0.0, 1.0);
        assert!((light - -0.5).abs() < 1e-12);
        assert!((heavy - 0.5).abs() < 1e-12);
    }

    #[test]
    fn partial_restitution_conserves_momentum() {
        let (m1, m2, u1, u2) = (1.5f64, 0.5, 2.0, -0.25);
        let (a, b) = exchange(m1, u1, m2, u2, 0.7);
        assert!((m1 * a + m2 * b - (m1 * u1 + m2 * u2)).abs() < 1e-12);
        let before = 0.5 * (m1 * u1 * u1 + m2 * u2 * u2);
        let after = 0.5 * (m1 * a * a + m2 * b * b);
        assert!(after < before);
    }

    #[test]
    fn zero_restitution_changes_nothing() {
        let (a, b) = exchange(1.0f64, 0.4, 1.0, -0.2, 0.0);
        assert_eq!((a, b), (0.4, -0.2));
    }

    #[test]
    fn separating_pair_is_left_alone() {
        // Touching but moving apart.
        let mut chain = pair(-0.5, 0.5, 0.0);
        let report = CollisionResolver::new().resolve(&mut chain, 1.0);
        assert_eq!(report.collisions, 0);
        assert!(report.converged);
        assert_eq!(chain.body(0).angular_velocity, -0.5);
        assert_eq!(chain.body(1).angular_velocity, 0.5);
    }

    #[test]
    fn closing_touching_pair_swaps() {
        let mut chain = pair(0.0, -0.8, 0.0);
        let report = CollisionResolver::new().resolve(&mut chain, 1.0);
        assert_eq!(report.collisions, 1);
        assert!((chain.body(0).angular_velocity - -0.8).abs() < 1e-12);
        assert!(chain.body(1).angular_velocity.abs() < 1e-12);
    }

    #[test]
    fn distant_pair_does_not_collide() {
        let mut chain = pair(0.0, -0.8, 0.5);
        let report = CollisionResolver::new().resolve(&mut chain, 1.0);
        assert_eq!(report.collisions, 0);
        assert_eq!(report.passes, 1);
    }

    #[test]
    fn overlap_is_pushed_out() {
        // Right ball has swung past rest into its neighbour.
        let mut chain = pair(0.0, -0.8, -0.05);
        assert!(chain.max_penetration() > 1.0);
        let report = CollisionResolver::new().resolve(&mut chain, 1.0);
        assert!(report.corrections >= 1);
        assert!(report.converged);
        assert!(chain.max_penetration() < 40.0 * 1e-4 + 1e-9);
    }

    #[test]
    fn single_pass_cap_reports_unconverged() {
        let mut chain = pair(0.0, -0.8, 0.0);
        let report = CollisionResolver::new()
            .with_max_iterations(1)
            .resolve(&mut chain, 1.0);
        assert_eq!(report.passes, 1);
        assert!(!report.converged);
    }

    #[test]
    fn builder_clamps_degenerate_values() {
        let r: CollisionResolver<f32> = CollisionResolver::new()
            .with_max_iterations(0)
            .with_contact_tolerance(-1.0);
        assert_eq!(r.max_iterations, 1);
        assert_eq!(r.contact_tolerance, 0.0);
    }
}
