//! Configuration loading for environments and scenes.
//!
//! A scene file holds the environment settings, the state maps used by
//! simulated objects and the containers that lay them out.

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use sim_draw::{Color, StateColorMap, ValidationError};
use sim_layout::{Container, ContainerConfig};
use thiserror::Error;

use crate::speed::Speed;

/// Window size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Default for Resolution {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
        }
    }
}

/// Environment settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvConfig {
    /// Frames drawn per wall-clock second
    pub fps: f64,
    /// Virtual ticks per wall-clock second
    pub speed: Speed,
    /// Window size
    pub resolution: Resolution,
    /// Color the surface is cleared to before every frame
    pub background: Color,
    /// Pace virtual time against the wall clock in headless runs
    pub realtime: bool,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            fps: 30.0,
            speed: Speed::default(),
            resolution: Resolution::default(),
            background: Color::BLACK,
            realtime: false,
        }
    }
}

impl EnvConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.fps.is_finite() || self.fps <= 0.0 {
            return Err(ValidationError::InvalidFps(self.fps));
        }
        self.speed.factor()?;
        if self.resolution.width == 0 || self.resolution.height == 0 {
            return Err(ValidationError::InvalidResolution {
                width: self.resolution.width,
                height: self.resolution.height,
            });
        }
        Ok(())
    }

    /// Wall seconds per virtual tick.
    pub fn factor(&self) -> Result<f64, ValidationError> {
        self.speed.factor()
    }

    /// Virtual ticks between two frames.
    pub fn ticks_per_frame(&self) -> Result<f64, ValidationError> {
        self.validate()?;
        Ok(1.0 / (self.factor()? * self.fps))
    }
}

/// A complete scene declaration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneConfig {
    /// Environment settings
    #[serde(default)]
    pub environment: EnvConfig,
    /// State maps by name, each a table of state name to hex or index
    #[serde(default)]
    pub states: IndexMap<String, toml::Table>,
    /// Containers by name
    #[serde(default)]
    pub containers: IndexMap<String, ContainerConfig>,
}

impl SceneConfig {
    /// Loads a scene from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parses a scene from a TOML string and validates the environment.
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let scene: SceneConfig = toml::from_str(content)?;
        scene.environment.validate()?;
        Ok(scene)
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Builds every declared state map, in declaration order.
    pub fn state_maps(&self) -> Result<IndexMap<String, Arc<StateColorMap>>, ValidationError> {
        self.states
            .iter()
            .map(|(name, table)| Ok((name.clone(), StateColorMap::from_toml(table)?.shared())))
            .collect()
    }

    /// Builds every declared container, in declaration order.
    pub fn build_containers(
        &self,
    ) -> Result<IndexMap<String, Rc<RefCell<Container>>>, ValidationError> {
        self.containers
            .iter()
            .map(|(name, config)| {
                Ok((
                    name.clone(),
                    Rc::new(RefCell::new(Container::from_config(config)?)),
                ))
            })
            .collect()
    }
}

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Validation(#[from] ValidationError),
}

/// Generates a sample scene file.
pub fn default_scene_toml() -> String {
    r##"# Scene configuration

[environment]
fps = 30
# real, slow, fast, faster, fastest or a number
speed = "real"
resolution = { width = 800, height = 600 }
background = "#000000"
realtime = false

# State maps: hex colors are used as given, integers pick from a palette
[states.customer]
waiting = "#ffcc00"
served = 1

[states.clerk]
idle = "#3c3"
busy = "#c33"

[containers.queue]
kind = "row"
size = { width = 400, height = 30 }
position = { x = 20, y = 20 }
fill_direction = "right"
overflow = "hidden"
padding = 5

[containers.counter]
kind = "column"
size = { width = 30, height = 200 }
position = { x = -20, y = 0 }
align = "right"
padding = 5
"##
    .to_string()
}
