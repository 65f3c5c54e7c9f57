//! A single ball hanging from a rigid, massless rod.

use crate::config::Parameter;
use crate::error::CradleError;
use crate::float::Float;
use crate::vec::Vec2;

/// One pendulum of the cradle: a ball of `radius` and `mass` on a rod of
/// `rod_length`, swinging about a fixed `pivot`.
///
/// `angle` is measured from the downward vertical; positive angles swing the
/// ball to the right (+x).
#[derive(Clone, Debug, PartialEq)]
pub struct PendulumBody<F: Float> {
    pivot: Vec2<F>,
    pub angle: F,
    pub angular_velocity: F,
    mass: F,
    inv_mass: F,
    rod_length: F,
    radius: F,
}

fn check_positive<F: Float>(value: F, parameter: Parameter) -> Result<F, CradleError> {
    if value.is_finite() && value > F::zero() {
        Ok(value)
    } else {
        Err(CradleError::invalid(parameter, "must be positive and finite"))
    }
}

impl<F: Float> PendulumBody<F> {
    /// Create a body hanging at rest.
    ///
    /// Rejects non-positive rod length, radius or mass so that `integrate`
    /// and the collision impulse never divide by zero.
    pub fn new(pivot: Vec2<F>, rod_length: F, radius: F, mass: F) -> Result<Self, CradleError> {
        let rod_length = check_positive(rod_length, Parameter::RodLength)?;
        let radius = check_positive(radius, Parameter::Radius)?;
        let mass = check_positive(mass, Parameter::Mass)?;
        Ok(PendulumBody {
            pivot,
            angle: F::zero(),
            angular_velocity: F::zero(),
            mass,
            inv_mass: F::one() / mass,
            rod_length,
            radius,
        })
    }

    /// Builder-style initial displacement.
    pub fn with_angle(mut self, angle: F) -> Self {
        self.angle = angle;
        self
    }

    /// Builder-style initial angular velocity.
    pub fn with_angular_velocity(mut self, angular_velocity: F) -> Self {
        self.angular_velocity = angular_velocity;
        self
    }

    /// Advance one step of the simple-pendulum law with semi-implicit Euler.
    ///
    /// `damping` multiplies the angular velocity once per call; 1.0 is lossless.
    pub fn integrate(&mut self, dt: F, gravity: F, damping: F) {
        let angular_acceleration = -(gravity / self.rod_length) * self.angle.sin();
        self.angular_velocity = self.angular_velocity + angular_acceleration * dt;
        self.angular_velocity = self.angular_velocity * damping;
        self.angle = self.angle + self.angular_velocity * dt;
    }

    pub fn pivot(&self) -> Vec2<F> { self.pivot }
    pub fn mass(&self) -> F { self.mass }
    pub fn inv_mass(&self) -> F { self.inv_mass }
    pub fn rod_length(&self) -> F { self.rod_length }
    pub fn radius(&self) -> F { self.radius }

    /// Centre of the ball.
    pub fn position(&self) -> Vec2<F> {
        self.pivot + Vec2::new(self.angle.sin(), self.angle.cos()).scale(self.rod_length)
    }

    /// Signed tangential speed, `rod_length * angular_velocity`.
    pub fn linear_velocity(&self) -> F {
        self.rod_length * self.angular_velocity
    }

    /// Sets the tangential speed, converting back to angular velocity.
    pub fn set_linear_velocity(&mut self, speed: F) {
        self.angular_velocity = speed / self.rod_length;
    }

    /// Velocity of the ball centre (tangent to the swing arc).
    pub fn velocity(&self) -> Vec2<F> {
        Vec2::new(self.angle.cos(), -self.angle.sin()).scale(self.linear_velocity())
    }

    /// Slide the ball along its arc so its centre sits at horizontal coordinate `x`.
    ///
    /// Targets beyond the rod's reach pin the ball at horizontal (±π/2).
    pub fn set_position_x(&mut self, x: F) {
        let s = ((x - self.pivot.x) / self.rod_length).clamp(-F::one(), F::one());
        self.angle = s.asin();
    }

    pub fn kinetic_energy(&self) -> F {
        let v = self.linear_velocity();
        F::half() * self.mass * v * v
    }

    /// Potential energy relative to the rest position.
    pub fn potential_energy(&self, gravity: F) -> F {
        self.mass * gravity * self.rod_length * (F::one() - self.angle.cos())
    }

    /// Signed tangential momentum.
    pub fn momentum(&self) -> F {
        self.mass * self.linear_velocity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body() -> PendulumBody<f64> {
        PendulumBody::new(Vec2::new(400.0, 100.0), 200.0, 20.0, 1.0).unwrap()
    }

    #[test]
    fn rest_position_hangs_below_pivot() {
        let b = body();
        let p = b.position();
        assert!((p.x - 400.0).abs() < 1e-9);
        assert!((p.y - 300.0).abs() < 1e-9);
    }

    #[test]
    fn position_at_quarter_pi() {
        let b = body().with_angle(core::f64::consts::FRAC_PI_4);
        let p = b.position();
        let offset = 200.0 * core::f64::consts::FRAC_1_SQRT_2;
        assert!((p.x - (400.0 + offset)).abs() < 1e-9);
        assert!((p.y - (100.0 + offset)).abs() < 1e-9);
    }

    #[test]
    fn rejects_zero_rod_length() {
        let err = PendulumBody::new(Vec2::zero(), 0.0f64, 1.0, 1.0).unwrap_err();
        assert!(matches!(
            err,
            CradleError::InvalidParameter { parameter: Parameter::RodLength, .. }
        ));
    }

    #[test]
    fn rejects_nan_mass() {
        assert!(PendulumBody::new(Vec2::zero(), 1.0f64, 1.0, f64::NAN).is_err());
    }

    #[test]
    fn integrate_pulls_toward_rest() {
        let mut b = body().with_angle(0.5);
        b.integrate(1.0 / 60.0, 50.0, 1.0);
        assert!(b.angular_velocity < 0.0);
        assert!(b.angle < 0.5);
    }

    #[test]
    fn integrate_matches_semi_implicit_euler() {
        let mut b = body().with_angle(0.3).with_angular_velocity(0.1);
        let dt = 0.01;
        let alpha = -(50.0 / 200.0) * libm::sin(0.3);
        let omega = (0.1 + alpha * dt) * 0.9;
        b.integrate(dt, 50.0, 0.9);
        assert!((b.angular_velocity - omega).abs() < 1e-12);
        assert!((b.angle - (0.3 + omega * dt)).abs() < 1e-12);
    }

    #[test]
    fn zero_gravity_at_rest_stays_put() {
        let mut b = body();
        for _ in 0..100 {
            b.integrate(1.0 / 60.0, 0.0, 1.0);
        }
        assert_eq!(b.angle, 0.0);
        assert_eq!(b.angular_velocity, 0.0);
    }

    #[test]
    fn set_position_x_moves_along_arc() {
        let mut b = body();
        b.set_position_x(500.0);
        assert!((b.position().x - 500.0).abs() < 1e-9);
        assert!((b.angle - libm::asin(0.5)).abs() < 1e-12);
    }

    #[test]
    fn set_position_x_clamps_to_horizontal() {
        let mut b = body();
        b.set_position_x(10_000.0);
        assert!((b.angle - core::f64::consts::FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn energy_at_release_is_all_potential() {
        let b = body().with_angle(core::f64::consts::FRAC_PI_2);
        assert_eq!(b.kinetic_energy(), 0.0);
        assert!((b.potential_energy(50.0) - 50.0 * 200.0).abs() < 1e-9);
    }
}
