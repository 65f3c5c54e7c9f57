//! Newton's cradle simulation core.
//!
//! `cradle` models a row of balls hanging from rods: each ball swings as a
//! simple pendulum, and an iterative solver passes momentum between touching
//! neighbours so that a hit at one end travels through the resting balls and
//! launches the ball at the far end. Rendering and input are left to the
//! caller, which reads [`Snapshot`]s and writes parameters back through
//! [`SimulationController`].
//!
//! # Features
//!
//! - **Pendulum bodies**: semi-implicit Euler on the simple-pendulum law
//! - **Cascade solver**: repeated left-to-right sweeps over adjacent pairs
//! - **Staged parameters**: validated changes applied on reset, never mid-swing
//! - **Fixed or variable steps**: `tick(dt)` or an accumulator over frame time
//! - **Observable**: monitor steps and impulses via the `StepObserver` trait
//! - **`no_std` compatible**: Works in embedded and WASM environments
//! - **`serde`** (optional): serialize parameters and snapshots

#![no_std]

extern crate alloc;

pub mod float;
pub mod vec;
pub mod body;
pub mod chain;
pub mod collision;
pub mod clock;
pub mod config;
pub mod controller;
pub mod observer;
pub mod error;

// Re-export primary API
pub use float::Float;
pub use vec::Vec2;
pub use body::PendulumBody;
pub use chain::Chain;
pub use collision::{CollisionResolver, ResolveReport};
pub use clock::{RunState, SimulationClock};
pub use config::{Parameter, ParameterSet};
pub use controller::{BallSnapshot, SimulationController, Snapshot};
pub use observer::{StepObserver, NoOpStepObserver};
pub use error::CradleError;
