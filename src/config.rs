//! Validated physical parameters for building a cradle.

use core::str::FromStr;

use crate::error::CradleError;
use crate::float::Float;
use crate::vec::Vec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Upper bound on the chain length accepted by [`ParameterSet::set_ball_count`].
pub const MAX_BALL_COUNT: usize = 4096;

/// The parameters a presentation layer may change between resets.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Parameter {
    BallCount,
    Radius,
    Gravity,
    RodLength,
    Mass,
    Damping,
    InitialAngle,
}

impl Parameter {
    pub const ALL: [Parameter; 7] = [
        Parameter::BallCount,
        Parameter::Radius,
        Parameter::Gravity,
        Parameter::RodLength,
        Parameter::Mass,
        Parameter::Damping,
        Parameter::InitialAngle,
    ];

    /// Human-readable name used in error messages.
    pub fn name(self) -> &'static str {
        match self {
            Parameter::BallCount => "ball count",
            Parameter::Radius => "radius",
            Parameter::Gravity => "gravity",
            Parameter::RodLength => "rod length",
            Parameter::Mass => "mass",
            Parameter::Damping => "damping",
            Parameter::InitialAngle => "initial angle",
        }
    }
}

impl FromStr for Parameter {
    type Err = CradleError;

    /// Accepts camelCase (`rodLength`) and snake_case (`rod_length`) names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ballCount" | "ball_count" => Ok(Parameter::BallCount),
            "radius" => Ok(Parameter::Radius),
            "gravity" => Ok(Parameter::Gravity),
            "rodLength" | "rod_length" => Ok(Parameter::RodLength),
            "mass" => Ok(Parameter::Mass),
            "damping" => Ok(Parameter::Damping),
            "initialAngle" | "initial_angle" => Ok(Parameter::InitialAngle),
            _ => Err(CradleError::UnknownParameter),
        }
    }
}

/// Physical configuration of the cradle.
///
/// Every setter validates before writing, so a rejected value leaves the
/// set unchanged.
///
/// # Builder Pattern
/// ```
/// use cradle::config::ParameterSet;
///
/// let params: ParameterSet<f32> = ParameterSet::new()
///     .with_ball_count(7).unwrap()
///     .with_gravity(9.81).unwrap()
///     .with_rod_length(1.0).unwrap()
///     .with_radius(0.05).unwrap();
/// assert_eq!(params.ball_count(), 7);
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ParameterSet<F: Float> {
    ball_count: usize,
    radius: F,
    gravity: F,
    rod_length: F,
    mass: F,
    damping: F,
    initial_angle: F,
    anchor: Vec2<F>,
}

impl<F: Float> ParameterSet<F> {
    /// Defaults: 5 balls of radius 20 and mass 1 on 200-unit rods, gravity 50,
    /// lossless, rightmost ball raised by π/4, support centred on the origin.
    pub fn new() -> Self {
        ParameterSet {
            ball_count: 5,
            radius: F::from_f32(20.0),
            gravity: F::from_f32(50.0),
            rod_length: F::from_f32(200.0),
            mass: F::one(),
            damping: F::one(),
            initial_angle: F::pi() / F::from_f32(4.0),
            anchor: Vec2::zero(),
        }
    }

    pub fn ball_count(&self) -> usize { self.ball_count }
    pub fn radius(&self) -> F { self.radius }
    pub fn gravity(&self) -> F { self.gravity }
    pub fn rod_length(&self) -> F { self.rod_length }
    pub fn mass(&self) -> F { self.mass }
    pub fn damping(&self) -> F { self.damping }
    pub fn initial_angle(&self) -> F { self.initial_angle }
    /// Midpoint of the support bar the pivots hang from.
    pub fn anchor(&self) -> Vec2<F> { self.anchor }

    /// Current value of `parameter` as a scalar.
    pub fn get(&self, parameter: Parameter) -> F {
        match parameter {
            Parameter::BallCount => F::from_usize(self.ball_count),
            Parameter::Radius => self.radius,
            Parameter::Gravity => self.gravity,
            Parameter::RodLength => self.rod_length,
            Parameter::Mass => self.mass,
            Parameter::Damping => self.damping,
            Parameter::InitialAngle => self.initial_angle,
        }
    }

    /// Validate and store `value`. On error nothing changes.
    pub fn set(&mut self, parameter: Parameter, value: F) -> Result<(), CradleError> {
        if !value.is_finite() {
            return Err(CradleError::invalid(parameter, "must be finite"));
        }
        match parameter {
            Parameter::BallCount => {
                if value.floor() != value {
                    return Err(CradleError::invalid(parameter, "must be a whole number"));
                }
                self.set_ball_count(value.to_f64() as usize)?;
            }
            Parameter::Radius => self.radius = positive(parameter, value)?,
            Parameter::RodLength => self.rod_length = positive(parameter, value)?,
            Parameter::Mass => self.mass = positive(parameter, value)?,
            Parameter::Gravity => {
                if value < F::zero() {
                    return Err(CradleError::invalid(parameter, "must not be negative"));
                }
                self.gravity = value;
            }
            Parameter::Damping => {
                if value < F::zero() || value > F::one() {
                    return Err(CradleError::invalid(parameter, "must be in [0, 1]"));
                }
                self.damping = value;
            }
            Parameter::InitialAngle => {
                // The raised ball swings out to the right, away from the row.
                if value < F::zero() || value > F::frac_pi_2() {
                    return Err(CradleError::invalid(parameter, "must be in [0, pi/2]"));
                }
                self.initial_angle = value;
            }
        }
        Ok(())
    }

    /// Set the number of balls; at least two are needed for a collision.
    pub fn set_ball_count(&mut self, count: usize) -> Result<(), CradleError> {
        if count < 2 {
            return Err(CradleError::invalid(Parameter::BallCount, "must be at least 2"));
        }
        if count > MAX_BALL_COUNT {
            return Err(CradleError::invalid(Parameter::BallCount, "too many balls"));
        }
        self.ball_count = count;
        Ok(())
    }

    /// Move the support bar. Any finite point is accepted.
    pub fn set_anchor(&mut self, anchor: Vec2<F>) -> Result<(), CradleError> {
        if !anchor.x.is_finite() || !anchor.y.is_finite() {
            return Err(CradleError::InvalidAnchor);
        }
        self.anchor = anchor;
        Ok(())
    }

    /// Builder-style [`set`](Self::set).
    pub fn with(mut self, parameter: Parameter, value: F) -> Result<Self, CradleError> {
        self.set(parameter, value)?;
        Ok(self)
    }

    pub fn with_ball_count(mut self, count: usize) -> Result<Self, CradleError> {
        self.set_ball_count(count)?;
        Ok(self)
    }

    pub fn with_radius(self, radius: F) -> Result<Self, CradleError> {
        self.with(Parameter::Radius, radius)
    }

    pub fn with_gravity(self, gravity: F) -> Result<Self, CradleError> {
        self.with(Parameter::Gravity, gravity)
    }

    pub fn with_rod_length(self, rod_length: F) -> Result<Self, CradleError> {
        self.with(Parameter::RodLength, rod_length)
    }

    pub fn with_mass(self, mass: F) -> Result<Self, CradleError> {
        self.with(Parameter::Mass, mass)
    }

    pub fn with_damping(self, damping: F) -> Result<Self, CradleError> {
        self.with(Parameter::Damping, damping)
    }

    pub fn with_initial_angle(self, angle: F) -> Result<Self, CradleError> {
        self.with(Parameter::InitialAngle, angle)
    }

    pub fn with_anchor(mut self, anchor: Vec2<F>) -> Result<Self, CradleError> {
        self.set_anchor(anchor)?;
        Ok(self)
    }

    /// Horizontal spacing between neighbouring pivots, so balls touch at rest.
    pub fn pivot_spacing(&self) -> F {
        F::two() * self.radius
    }
}

impl<F: Float> Default for ParameterSet<F> {
    fn default() -> Self {
        Self::new()
    }
}

fn positive<F: Float>(parameter: Parameter, value: F) -> Result<F, CradleError> {
    if value > F::zero() {
        Ok(value)
    } else {
        Err(CradleError::invalid(parameter, "must be positive"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_classic_cradle() {
        let p: ParameterSet<f64> = ParameterSet::default();
        assert_eq!(p.ball_count(), 5);
        assert_eq!(p.radius(), 20.0);
        assert_eq!(p.mass(), 1.0);
        assert_eq!(p.gravity(), 50.0);
        assert_eq!(p.rod_length(), 200.0);
        assert_eq!(p.damping(), 1.0);
        assert!((p.initial_angle() - core::f64::consts::FRAC_PI_4).abs() < 1e-12);
    }

    #[test]
    fn rejected_value_keeps_previous() {
        let mut p: ParameterSet<f64> = ParameterSet::new();
        p.set(Parameter::Damping, 0.95).unwrap();
        assert!(p.set(Parameter::Damping, 1.5).is_err());
        assert!(p.set(Parameter::Damping, -0.1).is_err());
        assert_eq!(p.damping(), 0.95);
    }

    #[test]
    fn ball_count_bounds() {
        let mut p: ParameterSet<f32> = ParameterSet::new();
        assert!(p.set(Parameter::BallCount, 1.0).is_err());
        assert!(p.set(Parameter::BallCount, 3.5).is_err());
        p.set(Parameter::BallCount, 7.0).unwrap();
        assert_eq!(p.ball_count(), 7);
        assert_eq!(p.get(Parameter::BallCount), 7.0);
    }

    #[test]
    fn positive_quantities_reject_zero() {
        let mut p: ParameterSet<f64> = ParameterSet::new();
        for param in [Parameter::Radius, Parameter::RodLength, Parameter::Mass] {
            let before = p.get(param);
            let err = p.set(param, 0.0).unwrap_err();
            assert_eq!(err, CradleError::invalid(param, "must be positive"));
            assert_eq!(p.get(param), before);
        }
    }

    #[test]
    fn gravity_may_be_zero_but_not_negative() {
        let mut p: ParameterSet<f64> = ParameterSet::new();
        p.set(Parameter::Gravity, 0.0).unwrap();
        assert!(p.set(Parameter::Gravity, -9.81).is_err());
        assert_eq!(p.gravity(), 0.0);
    }

    #[test]
    fn initial_angle_limited_to_half_pi() {
        let mut p: ParameterSet<f64> = ParameterSet::new();
        assert!(p.set(Parameter::InitialAngle, 2.0).is_err());
        p.set(Parameter::InitialAngle, 1.0).unwrap();
        assert_eq!(p.initial_angle(), 1.0);
        p.set(Parameter::InitialAngle, 0.0).unwrap();
        assert_eq!(p.initial_angle(), 0.0);
    }

    #[test]
    fn initial_angle_cannot_swing_into_the_row() {
        let mut p: ParameterSet<f64> = ParameterSet::new();
        p.set(Parameter::InitialAngle, 0.3).unwrap();
        let err = p.set(Parameter::InitialAngle, -0.5).unwrap_err();
        assert_eq!(err, CradleError::invalid(Parameter::InitialAngle, "must be in [0, pi/2]"));
        assert_eq!(p.initial_angle(), 0.3);
        assert!(ParameterSet::<f64>::new().with_initial_angle(-0.01).is_err());
    }

    #[test]
    fn nan_rejected_everywhere() {
        let mut p: ParameterSet<f64> = ParameterSet::new();
        for param in Parameter::ALL {
            assert!(p.set(param, f64::NAN).is_err(), "{:?} accepted NaN", param);
        }
        assert_eq!(p, ParameterSet::new());
    }

    #[test]
    fn parse_both_spellings() {
        assert_eq!("rodLength".parse::<Parameter>(), Ok(Parameter::RodLength));
        assert_eq!("initial_angle".parse::<Parameter>(), Ok(Parameter::InitialAngle));
        assert_eq!("friction".parse::<Parameter>(), Err(CradleError::UnknownParameter));
    }
}
