//! The evaluation driver: one `tick` per frame.

use crate::component::Kind;
use crate::config::SimConfig;
use crate::error::{Error, Result};
use crate::event::Event;
use crate::ids::{CircuitId, ComponentId};
use crate::network::Network;

/// What happened during one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    pub tick: u64,
    /// Whether a loop through the head was found. A tick without one
    /// changes nothing.
    pub closed: bool,
    pub head: Option<ComponentId>,
    /// Top circuit current assigned this tick.
    pub current: f64,
    pub events: Vec<Event>,
}

/// A running session: the network plus the frame counter that drives it.
#[derive(Debug, Clone)]
pub struct Simulation {
    network: Network,
    config: SimConfig,
    tick: u64,
    closed: bool,
}

impl Simulation {
    pub fn new(config: SimConfig) -> Self {
        Self::from_network(Network::new(), config)
    }

    pub fn from_network(network: Network, config: SimConfig) -> Self {
        Self {
            network,
            config,
            tick: 0,
            closed: false,
        }
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn network_mut(&mut self) -> &mut Network {
        &mut self.network
    }

    pub fn into_network(self) -> Network {
        self.network
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Ticks completed so far.
    pub fn ticks(&self) -> u64 {
        self.tick
    }

    pub fn dt(&self) -> f64 {
        self.config.dt()
    }

    /// Advance one frame.
    ///
    /// Refreshes reception, alternates AC sources that are due, validates
    /// the loop through the head, assigns the top current and evaluates
    /// from the head. Errors are fatal to the tick and should stop the
    /// caller's loop.
    pub fn tick(&mut self) -> Result<TickReport> {
        self.tick += 1;
        let dt = self.dt();

        self.network.refresh_reception(&self.config.environment);
        self.alternate()?;

        let Some(head) = self.network.head() else {
            return Ok(self.idle(None));
        };
        let circuit = self.network.try_component(head)?.circuit();
        if circuit != CircuitId::TOP {
            return Err(Error::HeadOutsideTop { head, circuit });
        }

        if self.network.trace(head, head, false, false).is_none() {
            if self.closed {
                log::warn!("loop through {head} is open");
            }
            self.closed = false;
            return Ok(self.idle(Some(head)));
        }
        self.closed = true;

        let current = self.network.top().current();
        self.network.set_circuit_current(CircuitId::TOP, current)?;
        self.network.eval(head, dt)?;

        Ok(TickReport {
            tick: self.tick,
            closed: true,
            head: Some(head),
            current,
            events: self.network.take_events(),
        })
    }

    /// Run `n` ticks, stopping at the first error.
    pub fn run(&mut self, n: u64) -> Result<Vec<TickReport>> {
        (0..n).map(|_| self.tick()).collect()
    }

    fn idle(&mut self, head: Option<ComponentId>) -> TickReport {
        TickReport {
            tick: self.tick,
            closed: false,
            head,
            current: 0.0,
            events: self.network.take_events(),
        }
    }

    /// Flip every AC source whose half period ends on this tick.
    fn alternate(&mut self) -> Result<()> {
        let rate = self.config.tick_rate;
        let due: Vec<ComponentId> = self
            .network
            .components()
            .filter_map(|c| match c.kind() {
                Kind::AcSource { frequency } if *frequency > 0.0 => {
                    let half = (rate / (2.0 * frequency)).round().max(1.0) as u64;
                    (self.tick % half == 0).then_some(c.id())
                }
                _ => None,
            })
            .collect();
        for id in due {
            self.network.flip(id)?;
        }
        Ok(())
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new(SimConfig::default())
    }
}
