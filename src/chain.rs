//! The ordered row of pendulums making up the cradle.

use crate::body::PendulumBody;
use crate::config::ParameterSet;
use crate::error::CradleError;
use crate::float::Float;
use crate::vec::Vec2;
use alloc::vec::Vec as AllocVec;

/// Left-to-right sequence of bodies. Neighbours are found by index only;
/// bodies at `i` and `i + 1` are the only ones that can touch.
#[derive(Clone, Debug, PartialEq)]
pub struct Chain<F: Float> {
    bodies: AllocVec<PendulumBody<F>>,
}

impl<F: Float> Chain<F> {
    /// Build a chain at rest from `params`, raising only the rightmost ball
    /// to the initial angle.
    ///
    /// Pivots are spaced `2 * radius` apart and centred on the anchor, so the
    /// balls just touch when hanging straight down.
    pub fn new(params: &ParameterSet<F>) -> Result<Self, CradleError> {
        let count = params.ball_count();
        let spacing = params.pivot_spacing();
        let anchor = params.anchor();
        let half_span = F::from_usize(count - 1) * F::half() * spacing;
        let start_x = anchor.x - half_span;

        let mut bodies = AllocVec::with_capacity(count);
        for i in 0..count {
            let pivot = Vec2::new(start_x + F::from_usize(i) * spacing, anchor.y);
            let mut body = PendulumBody::new(
                pivot,
                params.rod_length(),
                params.radius(),
                params.mass(),
            )?;
            if i == count - 1 {
                body.angle = params.initial_angle();
            }
            bodies.push(body);
        }

        log::debug!(
            "built chain: {} balls, radius {:?}, rod {:?}, initial angle {:?}",
            count,
            params.radius(),
            params.rod_length(),
            params.initial_angle(),
        );

        Ok(Chain { bodies })
    }

    /// Wrap bodies that were assembled by hand (mixed masses, custom pivots).
    /// The caller is responsible for ordering them left to right.
    pub fn from_bodies(bodies: AllocVec<PendulumBody<F>>) -> Self {
        Chain { bodies }
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Number of adjacent pairs that may collide.
    pub fn pair_count(&self) -> usize {
        self.bodies.len().saturating_sub(1)
    }

    pub fn body(&self, index: usize) -> &PendulumBody<F> {
        &self.bodies[index]
    }

    pub fn body_mut(&mut self, index: usize) -> &mut PendulumBody<F> {
        &mut self.bodies[index]
    }

    pub fn bodies(&self) -> &[PendulumBody<F>] {
        &self.bodies
    }

    pub fn bodies_mut(&mut self) -> &mut [PendulumBody<F>] {
        &mut self.bodies
    }

    /// Mutable access to the neighbours `index` and `index + 1`.
    pub fn pair_mut(&mut self, index: usize) -> (&mut PendulumBody<F>, &mut PendulumBody<F>) {
        let (left, right) = self.bodies.split_at_mut(index + 1);
        (&mut left[index], &mut right[0])
    }

    /// Integrate every body independently for one step.
    pub fn integrate(&mut self, dt: F, gravity: F, damping: F) {
        for body in self.bodies.iter_mut() {
            body.integrate(dt, gravity, damping);
        }
    }

    pub fn positions(&self) -> AllocVec<Vec2<F>> {
        self.bodies.iter().map(|b| b.position()).collect()
    }

    pub fn pivots(&self) -> AllocVec<Vec2<F>> {
        self.bodies.iter().map(|b| b.pivot()).collect()
    }

    pub fn angles(&self) -> AllocVec<F> {
        self.bodies.iter().map(|b| b.angle).collect()
    }

    /// Kinetic plus gravitational potential energy of the whole row.
    pub fn total_energy(&self, gravity: F) -> F {
        self.bodies.iter().fold(F::zero(), |acc, b| {
            acc + b.kinetic_energy() + b.potential_energy(gravity)
        })
    }

    /// Sum of signed tangential momenta.
    pub fn total_momentum(&self) -> F {
        self.bodies.iter().fold(F::zero(), |acc, b| acc + b.momentum())
    }

    /// Deepest overlap between any adjacent pair; zero when none overlap.
    pub fn max_penetration(&self) -> F {
        let mut deepest = F::zero();
        for pair in self.bodies.windows(2) {
            let distance = pair[0].position().distance(pair[1].position());
            let overlap = pair[0].radius() + pair[1].radius() - distance;
            deepest = deepest.max(overlap);
        }
        deepest
    }
}
