//! Simulation environment and render loop.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use sim_draw::{
    Color, Drawable, DrawableId, MembershipError, SharedDrawable, Surface, ValidationError,
};
use tracing::{debug, info};

use crate::config::EnvConfig;
use crate::scheduler::{Context, Process, RunOutcome, Scheduler, Step, Trigger};

/// Decides when a render loop should stop.
pub trait QuitSource {
    /// Polled once per frame before drawing.
    fn quit_requested(&mut self) -> bool;
}

impl<F> QuitSource for F
where
    F: FnMut() -> bool,
{
    fn quit_requested(&mut self) -> bool {
        self()
    }
}

/// Quits after a fixed number of frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameLimit(pub u64);

impl QuitSource for FrameLimit {
    fn quit_requested(&mut self) -> bool {
        if self.0 == 0 {
            return true;
        }
        self.0 -= 1;
        false
    }
}

/// Drawables registered with an environment, in registration order.
///
/// Cloning gives another handle to the same list, so processes can add and
/// remove drawables while the simulation runs.
#[derive(Clone, Default)]
pub struct DrawList(Rc<RefCell<IndexMap<DrawableId, SharedDrawable>>>);

impl DrawList {
    pub fn add(&self, drawable: SharedDrawable) -> Result<(), MembershipError> {
        let id = drawable.borrow().id();
        let mut list = self.0.borrow_mut();
        if list.contains_key(&id) {
            return Err(MembershipError::DuplicateMember(id));
        }
        list.insert(id, drawable);
        Ok(())
    }

    pub fn remove<D: Drawable + ?Sized>(
        &self,
        drawable: &Rc<RefCell<D>>,
    ) -> Result<SharedDrawable, MembershipError> {
        let id = drawable.borrow().id();
        self.0
            .borrow_mut()
            .shift_remove(&id)
            .ok_or(MembershipError::MemberNotFound(id))
    }

    pub fn contains(&self, id: DrawableId) -> bool {
        self.0.borrow().contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    /// Clears the surface, draws everything in order and presents the frame.
    pub fn redraw(&self, surface: &mut dyn Surface, background: Color) {
        // Snapshot so drawables may be added or removed by the next process
        let drawables: Vec<SharedDrawable> = self.0.borrow().values().cloned().collect();
        surface.clear(background);
        for drawable in &drawables {
            drawable.borrow().draw(surface);
        }
        surface.present();
    }
}

impl fmt::Debug for DrawList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.borrow().keys()).finish()
    }
}

/// Owns the scheduler, the quit trigger and the registered drawables.
#[derive(Debug)]
pub struct Environment {
    config: EnvConfig,
    factor: f64,
    ticks_per_frame: f64,
    scheduler: Scheduler,
    drawables: DrawList,
    quit: Trigger,
    frames: Rc<Cell<u64>>,
}

impl Environment {
    pub fn new(config: EnvConfig) -> Result<Self, ValidationError> {
        let ticks_per_frame = config.ticks_per_frame()?;
        let factor = config.factor()?;
        let scheduler = if config.realtime {
            Scheduler::realtime(factor)
        } else {
            Scheduler::new()
        };
        info!(
            fps = config.fps,
            speed = %config.speed,
            ticks_per_frame,
            "environment created"
        );
        Ok(Self {
            config,
            factor,
            ticks_per_frame,
            scheduler,
            drawables: DrawList::default(),
            quit: Trigger::new(),
            frames: Rc::new(Cell::new(0)),
        })
    }

    pub fn config(&self) -> &EnvConfig {
        &self.config
    }

    /// Current virtual time.
    pub fn now(&self) -> f64 {
        self.scheduler.now()
    }

    /// Wall seconds per virtual tick.
    pub fn factor(&self) -> f64 {
        self.factor
    }

    /// Virtual ticks between two frames.
    pub fn ticks_per_frame(&self) -> f64 {
        self.ticks_per_frame
    }

    /// Fires when the render loop sees a quit request.
    pub fn quit_event(&self) -> Trigger {
        self.quit.clone()
    }

    /// Frames drawn by [`Environment::run`] so far.
    pub fn frames(&self) -> u64 {
        self.frames.get()
    }

    /// Another handle to the drawable list.
    pub fn drawables(&self) -> DrawList {
        self.drawables.clone()
    }

    /// Starts a process at the current virtual time.
    pub fn process(&mut self, process: impl Process + 'static) {
        self.scheduler.spawn(process);
    }

    pub fn add_drawable(&self, drawable: SharedDrawable) -> Result<(), MembershipError> {
        self.drawables.add(drawable)
    }

    pub fn remove_drawable<D: Drawable + ?Sized>(
        &self,
        drawable: &Rc<RefCell<D>>,
    ) -> Result<SharedDrawable, MembershipError> {
        self.drawables.remove(drawable)
    }

    /// Draws one frame of every registered drawable.
    pub fn redraw(&self, surface: &mut dyn Surface) {
        self.drawables.redraw(surface, self.config.background);
    }

    /// Runs processes for `ticks` of virtual time.
    ///
    /// For hosts that own the frame loop and call [`Environment::redraw`]
    /// themselves.
    pub fn advance_by(&mut self, ticks: f64) -> usize {
        let until = self.now() + ticks.max(0.0);
        self.scheduler.run_until(until)
    }

    /// Runs the simulation with the built-in render task until quit.
    ///
    /// Each frame the task polls `quit`, fires the quit trigger if asked to,
    /// otherwise redraws and waits one frame of virtual time.
    pub fn run(
        &mut self,
        surface: Rc<RefCell<dyn Surface>>,
        mut quit: impl QuitSource + 'static,
    ) -> RunOutcome {
        let drawables = self.drawables.clone();
        let trigger = self.quit.clone();
        let frames = self.frames.clone();
        let background = self.config.background;
        let tick = self.ticks_per_frame;

        self.scheduler.spawn(move |ctx: &mut Context| {
            if quit.quit_requested() {
                debug!(now = ctx.now(), "quit requested");
                trigger.succeed();
                return Step::Done;
            }
            drawables.redraw(&mut *surface.borrow_mut(), background);
            frames.set(frames.get() + 1);
            Step::Timeout(tick)
        });

        info!(now = self.now(), drawables = self.drawables.len(), "simulation started");
        let outcome = self.scheduler.run(&self.quit);
        info!(now = self.now(), frames = self.frames(), ?outcome, "simulation stopped");
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sim_draw::fixtures::shared_marker;
    use sim_draw::{DrawCommand, RecordingSurface, Size};

    fn recording() -> Rc<RefCell<RecordingSurface>> {
        Rc::new(RefCell::new(RecordingSurface::new(Size::new(800, 600))))
    }

    #[test]
    fn test_new_rejects_bad_config() {
        let config = EnvConfig {
            fps: -1.0,
            ..Default::default()
        };
        assert!(Environment::new(config).is_err());
    }

    #[test]
    fn test_frame_limit_stops_run() {
        let mut env = Environment::new(EnvConfig::default()).unwrap();
        let surface = recording();

        let outcome = env.run(surface.clone(), FrameLimit(3));
        assert_eq!(outcome, RunOutcome::Triggered);
        assert_eq!(env.frames(), 3);
        assert!(env.quit_event().is_triggered());
        assert_eq!(surface.borrow().frames().len(), 3);
        // three frame ticks have passed when the fourth activation quits
        assert!((env.now() - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_redraw_order() {
        let env = Environment::new(EnvConfig::default()).unwrap();
        let a = shared_marker(4);
        let b = shared_marker(6);
        env.add_drawable(a.clone()).unwrap();
        env.add_drawable(b.clone()).unwrap();

        let mut surface = RecordingSurface::new(Size::new(100, 100));
        env.redraw(&mut surface);

        let commands = surface.commands();
        assert_eq!(commands[0], DrawCommand::Clear { color: Color::BLACK });
        assert_eq!(commands.last(), Some(&DrawCommand::Present));
        assert_eq!(surface.shape_count(), 0);
    }

    #[test]
    fn test_drawable_membership() {
        let env = Environment::new(EnvConfig::default()).unwrap();
        let a = shared_marker(4);
        env.add_drawable(a.clone()).unwrap();
        assert!(matches!(
            env.add_drawable(a.clone()),
            Err(MembershipError::DuplicateMember(_))
        ));
        env.remove_drawable(&a).unwrap();
        assert!(env.remove_drawable(&a).is_err());
        assert!(env.drawables().is_empty());
    }

    #[test]
    fn test_processes_share_virtual_time_with_render_task() {
        let mut env = Environment::new(EnvConfig::default()).unwrap();
        let ticks = Rc::new(Cell::new(0));
        let counter = ticks.clone();
        env.process(move |_: &mut Context| {
            counter.set(counter.get() + 1);
            Step::Timeout(1.0)
        });

        // 45 frames at 30 fps, real speed: one and a half virtual seconds
        env.run(recording(), FrameLimit(45));
        assert_eq!(ticks.get(), 2);
    }

    #[test]
    fn test_advance_by() {
        let mut env = Environment::new(EnvConfig::default()).unwrap();
        let seen = Rc::new(Cell::new(0.0));
        let last = seen.clone();
        env.process(move |ctx: &mut Context| {
            last.set(ctx.now());
            Step::Timeout(0.5)
        });

        env.advance_by(1.2);
        assert_eq!(seen.get(), 1.0);
        assert!((env.now() - 1.2).abs() < 1e-9);
    }

    #[test]
    fn test_closure_quit_source() {
        let mut env = Environment::new(EnvConfig::default()).unwrap();
        let mut polls = 0;
        env.run(recording(), move || {
            polls += 1;
            polls > 1
        });
        assert_eq!(env.frames(), 1);
    }
}
