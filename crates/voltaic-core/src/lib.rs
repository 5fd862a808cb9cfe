//! Electrical network model and real-time evaluation engine for Voltaic.
//!
//! A [`Network`] owns components, the wires joining them and a tree of
//! circuit scopes. Parallel topology is represented with series scopes
//! only: splitters open child circuits and report their parallel
//! combination upward. A [`Simulation`] drives the network one tick at a
//! time.

pub mod circuit;
pub mod component;
pub mod config;
pub mod error;
pub mod event;
pub mod ids;
pub mod network;
pub mod units;
pub mod wire;

mod connect;
mod driver;
mod eval;
mod reception;
mod state;
mod trace;

pub use circuit::{BreakState, Branch, Circuit, CircuitView};
pub use component::{Component, ComponentData, Kind};
pub use config::{Environment, SimConfig};
pub use driver::{Simulation, TickReport};
pub use error::{ConnectionError, Error, Result};
pub use event::Event;
pub use ids::{CircuitId, ComponentId, WireId};
pub use network::{Network, Probe};
pub use wire::{Material, Wire, WireSpec};
