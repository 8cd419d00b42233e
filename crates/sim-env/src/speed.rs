//! Simulation speed.
//!
//! Speed is a multiplier of virtual ticks per wall-clock second. The
//! environment works with its inverse, the time factor: wall seconds per tick.

use serde::{Deserialize, Serialize};
use sim_draw::ValidationError;
use std::fmt;
use std::str::FromStr;

/// Named speed presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimulationSpeed {
    #[default]
    Real,
    Slow,
    Fast,
    Faster,
    Fastest,
}

impl SimulationSpeed {
    pub fn multiplier(&self) -> f64 {
        match self {
            SimulationSpeed::Real => 1.0,
            SimulationSpeed::Slow => 2.0,
            SimulationSpeed::Fast => 5.0,
            SimulationSpeed::Faster => 10.0,
            SimulationSpeed::Fastest => 100.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SimulationSpeed::Real => "real",
            SimulationSpeed::Slow => "slow",
            SimulationSpeed::Fast => "fast",
            SimulationSpeed::Faster => "faster",
            SimulationSpeed::Fastest => "fastest",
        }
    }
}

/// A preset or an arbitrary multiplier.
///
/// In TOML either `speed = "fast"` or `speed = 2.5`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Speed {
    Preset(SimulationSpeed),
    Multiplier(f64),
}

impl Default for Speed {
    fn default() -> Self {
        Speed::Preset(SimulationSpeed::Real)
    }
}

impl Speed {
    pub fn multiplier(&self) -> f64 {
        match self {
            Speed::Preset(preset) => preset.multiplier(),
            Speed::Multiplier(m) => *m,
        }
    }

    /// Wall seconds per virtual tick.
    pub fn factor(&self) -> Result<f64, ValidationError> {
        let speed = self.multiplier();
        if !speed.is_finite() || speed <= 0.0 {
            return Err(ValidationError::InvalidSpeed(speed));
        }
        Ok(1.0 / speed)
    }
}

impl From<SimulationSpeed> for Speed {
    fn from(preset: SimulationSpeed) -> Self {
        Speed::Preset(preset)
    }
}

impl fmt::Display for Speed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Speed::Preset(preset) => f.write_str(preset.as_str()),
            Speed::Multiplier(m) => write!(f, "{}x", m),
        }
    }
}

impl FromStr for Speed {
    type Err = ValidationError;

    /// Accepts a preset name or a number.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        let presets = [
            SimulationSpeed::Real,
            SimulationSpeed::Slow,
            SimulationSpeed::Fast,
            SimulationSpeed::Faster,
            SimulationSpeed::Fastest,
        ];
        if let Some(preset) = presets.into_iter().find(|p| p.as_str() == wanted) {
            return Ok(Speed::Preset(preset));
        }
        let speed = Speed::Multiplier(wanted.parse::<f64>().map_err(|_| {
            ValidationError::UnknownVariant {
                kind: "speed",
                value: s.to_string(),
            }
        })?);
        speed.factor()?;
        Ok(speed)
    }
}
