//! Main visualization plugin that ties all systems together.

use bevy::app::AppExit;
use bevy::prelude::*;
use bevy::window::WindowResolution;
use sim_draw::Size;
use sim_env::{EnvConfig, Environment};

use crate::surface::{bevy_color, setup_unit_circle, sync_frame_entities, SpriteSurface};

/// Main plugin for the simulation window.
///
/// Sets up the window from the environment settings, a 2D camera and the
/// per-frame systems. The [`SimRuntime`] must be inserted separately as a
/// non-send resource since the environment is single-threaded.
pub struct SimGraphPlugin {
    config: EnvConfig,
}

impl SimGraphPlugin {
    pub fn new(config: EnvConfig) -> Self {
        Self { config }
    }

    /// Primary window matching the configured resolution.
    pub fn window(&self) -> Window {
        let resolution = self.config.resolution;
        Window {
            title: "simgraph".into(),
            resolution: WindowResolution::new(resolution.width as f32, resolution.height as f32),
            resizable: false,
            ..default()
        }
    }

    fn surface_size(&self) -> Size {
        Size::new(
            self.config.resolution.width as i32,
            self.config.resolution.height as i32,
        )
    }
}

impl Plugin for SimGraphPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(self.window()),
            ..default()
        }))
        .insert_resource(ClearColor(bevy_color(self.config.background)))
        .insert_resource(SpriteSurface::new(self.surface_size()))
        .add_systems(Startup, (setup_camera, setup_unit_circle))
        .add_systems(
            Update,
            (
                exit_on_escape,
                advance_simulation,
                sync_frame_entities,
            )
                .chain(),
        );
    }
}

/// The environment driven by the Bevy frame loop.
pub struct SimRuntime {
    env: Environment,
}

impl SimRuntime {
    pub fn new(env: Environment) -> Self {
        Self { env }
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    /// Advances virtual time by one wall-clock frame and redraws.
    pub fn frame(&mut self, wall_seconds: f64, surface: &mut SpriteSurface) {
        let ticks = wall_seconds / self.env.factor();
        self.env.advance_by(ticks);
        self.env.redraw(surface);
    }
}

/// Marker component for the main camera.
#[derive(Component)]
pub struct MainCamera;

/// System to set up the camera on startup.
fn setup_camera(mut commands: Commands) {
    commands.spawn((Camera2dBundle::default(), MainCamera));
}

/// System to step the simulation and draw it into the frame surface.
fn advance_simulation(
    time: Res<Time>,
    mut runtime: NonSendMut<SimRuntime>,
    mut surface: ResMut<SpriteSurface>,
    mut exit: EventWriter<AppExit>,
) {
    runtime.frame(time.delta_seconds_f64(), &mut surface);
    if runtime.env().quit_event().is_triggered() {
        exit.send(AppExit::Success);
    }
}

/// System to quit on Escape.
fn exit_on_escape(keyboard: Res<ButtonInput<KeyCode>>, runtime: NonSend<SimRuntime>) {
    if keyboard.just_pressed(KeyCode::Escape) {
        tracing::info!(now = runtime.env().now(), "escape pressed, quitting");
        runtime.env().quit_event().succeed();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sim_draw::fixtures::shared_marker;
    use sim_env::{Context, Resolution, Step};
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_window_uses_resolution() {
        let plugin = SimGraphPlugin::new(EnvConfig {
            resolution: Resolution {
                width: 640,
                height: 480,
            },
            ..Default::default()
        });
        let window = plugin.window();
        assert_eq!(window.resolution.width(), 640.0);
        assert_eq!(window.resolution.height(), 480.0);
        assert_eq!(plugin.surface_size(), Size::new(640, 480));
    }

    #[test]
    fn test_frame_scales_by_speed() {
        let config = EnvConfig {
            speed: sim_env::SimulationSpeed::Fast.into(),
            ..Default::default()
        };
        let mut env = Environment::new(config).unwrap();
        let resumed = Rc::new(Cell::new(0));
        let count = resumed.clone();
        env.process(move |_: &mut Context| {
            count.set(count.get() + 1);
            Step::Timeout(1.0)
        });
        env.add_drawable(shared_marker(5)).unwrap();

        let mut runtime = SimRuntime::new(env);
        let mut surface = SpriteSurface::new(Size::new(100, 100));
        // half a wall second at five ticks per second
        runtime.frame(0.5, &mut surface);

        assert!((runtime.env().now() - 2.5).abs() < 1e-9);
        assert_eq!(resumed.get(), 3);
        assert!(surface.is_presented());
    }
}
