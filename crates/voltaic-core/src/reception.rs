//! Heat and light reception.
//!
//! Each component caches the illuminance and temperature it sees. The
//! caches are refreshed once at the start of a tick from the previous
//! tick's outputs, so a change reaches sensors one tick later.

use std::f64::consts::PI;

use crate::component::Kind;
use crate::config::Environment;
use crate::ids::ComponentId;
use crate::network::Network;

struct Emitter {
    id: ComponentId,
    at: [f64; 2],
    output: f64,
}

impl Network {
    /// Recompute every component's received light and heat.
    pub fn refresh_reception(&mut self, env: &Environment) {
        let ambient = env.ambient_temperature;
        let lights: Vec<Emitter> = self
            .components()
            .map(|c| Emitter {
                id: c.id,
                at: c.position,
                output: self.luminosity(c.id),
            })
            .filter(|e| e.output > 0.0)
            .collect();
        let heaters: Vec<Emitter> = self
            .components()
            .filter_map(|c| match c.kind {
                Kind::Heater { temperature, .. } if temperature > ambient => Some(Emitter {
                    id: c.id,
                    at: c.position,
                    output: temperature - ambient,
                }),
                _ => None,
            })
            .collect();

        for component in self.components.values_mut() {
            let at = component.position;
            let distance = |e: &Emitter| env.to_units((e.at[0] - at[0]).hypot(e.at[1] - at[1]));

            component.light = env.ambient_light
                + lights
                    .iter()
                    .filter(|e| e.id != component.id)
                    .map(|e| e.output / (4.0 * PI * distance(e).powi(2)))
                    .sum::<f64>();
            component.heat = ambient
                + heaters
                    .iter()
                    .filter(|e| e.id != component.id)
                    .map(|e| e.output / (1.0 + distance(e).powi(2)))
                    .sum::<f64>();
        }
    }
}
