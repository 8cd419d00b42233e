//! Post office simulation viewer
//!
//! Run with: cargo run -p viz
//!
//! Examples:
//!   cargo run -p viz -- --speed fast --seed 7
//!   cargo run -p viz -- --headless --frames 300 --output frames.jsonl

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use bevy::prelude::*;
use clap::Parser;
use sim_draw::{RecordingSurface, Size};
use sim_env::{default_scene_toml, FrameLimit, SceneConfig, Speed};
use viz::{build_post_office, PostOfficeSettings, SimGraphPlugin, SimRuntime};

/// Post office simulation viewer
#[derive(Parser, Debug)]
#[command(name = "viz")]
#[command(about = "Renders a discrete-event post office simulation")]
struct Args {
    /// Scene file (TOML); the built-in scene when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Random seed for arrivals and service times
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Speed preset (real, slow, fast, faster, fastest) or multiplier
    #[arg(long)]
    speed: Option<Speed>,

    /// Frames per second
    #[arg(long)]
    fps: Option<f64>,

    /// Number of clerks at the counter
    #[arg(long, default_value_t = 2)]
    clerks: usize,

    /// Run without a window
    #[arg(long)]
    headless: bool,

    /// Frames to record in headless mode
    #[arg(long, default_value_t = 300)]
    frames: u64,

    /// Where headless mode writes recorded frames as JSON lines
    #[arg(long)]
    output: Option<PathBuf>,
}

impl Args {
    fn scene(&self) -> Result<SceneConfig, Box<dyn std::error::Error>> {
        let mut scene = match &self.config {
            Some(path) => SceneConfig::from_file(path)?,
            None => SceneConfig::from_str(&default_scene_toml())?,
        };
        if let Some(speed) = self.speed {
            scene.environment.speed = speed;
        }
        if let Some(fps) = self.fps {
            scene.environment.fps = fps;
        }
        scene.environment.validate()?;
        Ok(scene)
    }

    fn settings(&self) -> PostOfficeSettings {
        PostOfficeSettings {
            clerks: self.clerks,
            ..Default::default()
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let scene = args.scene()?;

    if args.headless {
        return run_headless(&args, &scene);
    }

    let (env, _stats) = build_post_office(&scene, &args.settings(), args.seed)?;
    App::new()
        .add_plugins(SimGraphPlugin::new(scene.environment.clone()))
        .insert_non_send_resource(SimRuntime::new(env))
        .run();
    Ok(())
}

fn run_headless(args: &Args, scene: &SceneConfig) -> Result<(), Box<dyn std::error::Error>> {
    bevy::log::tracing_subscriber::fmt()
        .with_max_level(bevy::log::Level::INFO)
        .init();

    let (mut env, stats) = build_post_office(scene, &args.settings(), args.seed)?;
    let resolution = scene.environment.resolution;
    let surface = Rc::new(RefCell::new(RecordingSurface::new(Size::new(
        resolution.width as i32,
        resolution.height as i32,
    ))));

    env.run(surface.clone(), FrameLimit(args.frames));

    if let Some(path) = &args.output {
        let jsonl = surface.borrow().to_jsonl()?;
        std::fs::write(path, jsonl)?;
        tracing::info!(path = %path.display(), "wrote recorded frames");
    }

    let summary = serde_json::json!({
        "frames": env.frames(),
        "ticks": env.now(),
        "arrived": stats.arrived.get(),
        "served": stats.served.get(),
    });
    println!("{}", summary);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sim_env::SimulationSpeed;

    #[test]
    fn test_parse_args() {
        let args = Args::try_parse_from([
            "viz", "--speed", "fast", "--fps", "60", "--headless", "--frames", "10",
        ])
        .unwrap();
        assert!(args.headless);
        assert_eq!(args.frames, 10);

        let scene = args.scene().unwrap();
        assert_eq!(scene.environment.speed, Speed::Preset(SimulationSpeed::Fast));
        assert_eq!(scene.environment.fps, 60.0);
    }

    #[test]
    fn test_invalid_fps_rejected() {
        let args = Args::try_parse_from(["viz", "--fps", "0"]).unwrap();
        assert!(args.scene().is_err());
    }

    #[test]
    fn test_scene_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.toml");
        std::fs::write(&path, default_scene_toml().replace("fps = 30", "fps = 12")).unwrap();

        let args = Args::try_parse_from(["viz", "--config", path.to_str().unwrap()]).unwrap();
        assert_eq!(args.scene().unwrap().environment.fps, 12.0);
    }
}
