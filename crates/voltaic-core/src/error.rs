//! Error types for voltaic-core.

use thiserror::Error;

use crate::ids::{CircuitId, ComponentId, WireId};

/// Topology violations raised by the connection protocol.
///
/// These are recoverable: the network is left exactly as it was before the
/// failed call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConnectionError {
    #[error("cannot connect component {0} to itself")]
    SelfLoop(ComponentId),

    #[error("component {from} is already connected to {to}")]
    Duplicate { from: ComponentId, to: ComponentId },

    #[error("component {id} already has {limit} output(s)")]
    OutputsExhausted { id: ComponentId, limit: usize },

    #[error("component {id} already has {limit} input(s)")]
    InputsExhausted { id: ComponentId, limit: usize },

    #[error("no ancestor circuit to join {circuit} back into")]
    NoAncestor { circuit: CircuitId },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error(transparent)]
    Connection(#[from] ConnectionError),

    #[error("unknown component type: {0}")]
    UnknownComponentType(String),

    #[error("head power source {head} is in {circuit}, not the top circuit")]
    HeadOutsideTop { head: ComponentId, circuit: CircuitId },

    #[error("component not found: {0}")]
    ComponentNotFound(ComponentId),

    #[error("wire not found: {0}")]
    WireNotFound(WireId),

    #[error("circuit not found: {0}")]
    CircuitNotFound(CircuitId),
}

impl Error {
    /// Whether the error must stop the simulation loop rather than being
    /// reported and recovered at the call site.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Error::Connection(_) | Error::UnknownComponentType(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
