//! Simulation and environment configuration.

use serde::{Deserialize, Serialize};

use crate::component::DEFAULT_AMBIENT_TEMPERATURE;

/// The space a network lives in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Environment {
    /// Canvas width (px).
    pub width: f64,
    /// Canvas height (px).
    pub height: f64,
    /// Pixels per metre, used to turn drawn distances into physical ones.
    pub pixels_per_unit: f64,
    /// Background temperature (°C).
    pub ambient_temperature: f64,
    /// Background illuminance (lux).
    pub ambient_light: f64,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
            pixels_per_unit: 50.0,
            ambient_temperature: DEFAULT_AMBIENT_TEMPERATURE,
            ambient_light: 0.0,
        }
    }
}

impl Environment {
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_pixels_per_unit(mut self, ppu: f64) -> Self {
        self.pixels_per_unit = ppu;
        self
    }

    pub fn with_ambient_temperature(mut self, celsius: f64) -> Self {
        self.ambient_temperature = celsius;
        self
    }

    pub fn with_ambient_light(mut self, lux: f64) -> Self {
        self.ambient_light = lux;
        self
    }

    /// Convert a canvas distance to metres. Never returns zero or less
    /// than a tenth of a metre, so inverse-square falloff stays finite.
    pub fn to_units(&self, pixels: f64) -> f64 {
        (pixels / self.pixels_per_unit.max(f64::EPSILON)).max(0.1)
    }
}

/// Driver settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SimConfig {
    /// Ticks per simulated second.
    pub tick_rate: f64,
    pub environment: Environment,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tick_rate: 60.0,
            environment: Environment::default(),
        }
    }
}

impl SimConfig {
    pub fn with_tick_rate(mut self, hz: f64) -> Self {
        self.tick_rate = hz;
        self
    }

    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    /// Simulated seconds per tick.
    pub fn dt(&self) -> f64 {
        1.0 / self.tick_rate.max(f64::EPSILON)
    }
}
