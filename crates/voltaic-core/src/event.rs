//! Modelled outcomes reported to the driver. None of these are errors.

use crate::ids::{CircuitId, ComponentId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// A blowable component exceeded its rating and failed for good.
    Blown(ComponentId),
    /// A rectifier saw current against its direction.
    Locked(ComponentId),
    Unlocked(ComponentId),
    Broken { circuit: CircuitId, by: ComponentId },
    Restored(CircuitId),
    /// A power source reversed polarity.
    Flipped(ComponentId),
    /// A battery delivered its full capacity.
    Depleted(ComponentId),
}
