//! Simulation environment.
//!
//! Runs processes in virtual time on a discrete-event [`Scheduler`], keeps
//! the list of drawables and redraws them once per frame from a render task
//! scheduled like any other process.
//!
//! # Example
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! use sim_draw::{RecordingSurface, Size};
//! use sim_env::{EnvConfig, Environment, FrameLimit, RunOutcome};
//!
//! let mut env = Environment::new(EnvConfig::default()).unwrap();
//! let surface = Rc::new(RefCell::new(RecordingSurface::new(Size::new(800, 600))));
//!
//! assert_eq!(env.run(surface.clone(), FrameLimit(10)), RunOutcome::Triggered);
//! assert_eq!(surface.borrow().frames().len(), 10);
//! ```

pub mod config;
pub mod environment;
pub mod object;
pub mod scheduler;
pub mod speed;

// Re-export configuration types
pub use config::{default_scene_toml, ConfigError, EnvConfig, Resolution, SceneConfig};

// Re-export runtime types
pub use environment::{DrawList, Environment, FrameLimit, QuitSource};
pub use object::{ObjectDefaults, ObjectOptions, SimObject};
pub use scheduler::{Context, Process, RealtimePacing, RunOutcome, Scheduler, Step, Trigger};
pub use speed::{SimulationSpeed, Speed};
