//! Post office demo scene.
//!
//! Customers arrive at random intervals and wait in the `queue` row. Clerks
//! stand in the `counter` column; an idle clerk moves the customer at the
//! head of the queue to the counter, turns busy for a random service time,
//! then sends the customer away and goes back to idle. A label counts served
//! customers.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use sim_draw::{share, MembershipError, Point, Text, ValidationError};
use sim_env::{
    Context, Environment, ObjectDefaults, ObjectOptions, Process, SceneConfig, SimObject, Step,
};
use sim_layout::Container;
use thiserror::Error;
use tracing::{debug, info};

/// Tunables of the post office.
#[derive(Debug, Clone, PartialEq)]
pub struct PostOfficeSettings {
    pub clerks: usize,
    /// Ticks between arrivals, drawn uniformly from this range
    pub arrival: (f64, f64),
    /// Ticks a clerk spends on one customer
    pub service: (f64, f64),
    /// Ticks an idle clerk waits before looking at the queue again
    pub idle_poll: f64,
}

impl Default for PostOfficeSettings {
    fn default() -> Self {
        Self {
            clerks: 2,
            arrival: (0.5, 2.0),
            service: (1.0, 4.0),
            idle_poll: 0.25,
        }
    }
}

/// Errors building the demo scene.
#[derive(Debug, Error)]
pub enum DemoError {
    #[error("scene declares no {kind} named '{name}'")]
    Missing { kind: &'static str, name: &'static str },

    #[error(transparent)]
    Draw(#[from] sim_draw::Error),
}

impl From<ValidationError> for DemoError {
    fn from(err: ValidationError) -> Self {
        DemoError::Draw(err.into())
    }
}

impl From<MembershipError> for DemoError {
    fn from(err: MembershipError) -> Self {
        DemoError::Draw(err.into())
    }
}

type Person = Rc<RefCell<SimObject>>;

/// Shared counters, readable after a run.
#[derive(Debug, Clone, Default)]
pub struct PostOfficeStats {
    pub arrived: Rc<Cell<u32>>,
    pub served: Rc<Cell<u32>>,
}

/// Builds an environment running the post office described by `scene`.
///
/// The scene must declare `customer` (with `waiting` and `served` states)
/// and `clerk` (with `idle` and `busy`) state maps and the `queue` and
/// `counter` containers.
pub fn build_post_office(
    scene: &SceneConfig,
    settings: &PostOfficeSettings,
    seed: u64,
) -> Result<(Environment, PostOfficeStats), DemoError> {
    let maps = scene.state_maps()?;
    let containers = scene.build_containers()?;
    let customer_states = lookup(&maps, "state map", "customer")?;
    let clerk_states = lookup(&maps, "state map", "clerk")?;
    let queue = lookup(&containers, "container", "queue")?;
    let counter = lookup(&containers, "container", "counter")?;

    let mut env = Environment::new(scene.environment.clone())?;
    for container in containers.values() {
        env.add_drawable(container.clone())?;
    }

    let label = share(Text::new(Point::new(20, 60), Some("served 0"), Some(16), None)?);
    env.add_drawable(label.clone())?;

    let stats = PostOfficeStats::default();
    let waiting: Rc<RefCell<VecDeque<Person>>> = Rc::default();
    let mut rng = SmallRng::seed_from_u64(seed);

    let customers = ObjectDefaults::with_states(customer_states);
    let clerks = ObjectDefaults::with_states(clerk_states);

    for _ in 0..settings.clerks {
        let clerk = share(SimObject::new(&clerks, ObjectOptions::default())?);
        counter.borrow_mut().enter(clerk.clone())?;
        env.process(Clerk {
            clerk,
            queue: queue.clone(),
            counter: counter.clone(),
            waiting: waiting.clone(),
            label: label.clone(),
            stats: stats.clone(),
            settings: settings.clone(),
            rng: SmallRng::seed_from_u64(rng.gen()),
            serving: None,
        });
    }

    let arrivals = settings.arrival;
    let arrived = stats.arrived.clone();
    env.process(move |ctx: &mut Context| {
        let customer = match SimObject::new(&customers, ObjectOptions::default()) {
            Ok(customer) => share(customer),
            Err(err) => {
                tracing::error!(%err, "cannot create customer");
                return Step::Done;
            }
        };
        if queue.borrow_mut().enter(customer.clone()).is_ok() {
            waiting.borrow_mut().push_back(customer);
            arrived.set(arrived.get() + 1);
            debug!(now = ctx.now(), waiting = waiting.borrow().len(), "customer arrived");
        }
        Step::Timeout(rng.gen_range(arrivals.0..arrivals.1))
    });

    info!(seed, clerks = settings.clerks, "post office ready");
    Ok((env, stats))
}

struct Clerk {
    clerk: Person,
    queue: Rc<RefCell<Container>>,
    counter: Rc<RefCell<Container>>,
    waiting: Rc<RefCell<VecDeque<Person>>>,
    label: Rc<RefCell<Text>>,
    stats: PostOfficeStats,
    settings: PostOfficeSettings,
    rng: SmallRng,
    serving: Option<Person>,
}

impl Clerk {
    fn finish(&mut self) {
        let Some(customer) = self.serving.take() else {
            return;
        };
        if let Err(err) = self.counter.borrow_mut().leave(&customer) {
            tracing::warn!(%err, "served customer was not at the counter");
        }
        self.stats.served.set(self.stats.served.get() + 1);
        self.label
            .borrow_mut()
            .set_text(Some(&format!("served {}", self.stats.served.get())));
        set_state(&self.clerk, "idle");
    }

    fn take_next(&mut self) -> Option<Person> {
        let customer = self.waiting.borrow_mut().pop_front()?;
        if let Err(err) = self.queue.borrow_mut().leave(&customer) {
            tracing::warn!(%err, "customer already left the queue");
        }
        if let Err(err) = self.counter.borrow_mut().enter(customer.clone()) {
            tracing::warn!(%err, "customer already at the counter");
        }
        set_state(&customer, "served");
        set_state(&self.clerk, "busy");
        Some(customer)
    }
}

impl Process for Clerk {
    fn resume(&mut self, ctx: &mut Context) -> Step {
        self.finish();
        match self.take_next() {
            Some(customer) => {
                debug!(now = ctx.now(), "clerk took a customer");
                self.serving = Some(customer);
                let (low, high) = self.settings.service;
                Step::Timeout(self.rng.gen_range(low..high))
            }
            None => Step::Timeout(self.settings.idle_poll),
        }
    }
}

fn set_state(object: &Person, state: &str) {
    if let Err(err) = object.borrow_mut().set_state(state) {
        tracing::warn!(%err, "state change rejected");
    }
}

fn lookup<T: Clone>(
    map: &indexmap::IndexMap<String, T>,
    kind: &'static str,
    name: &'static str,
) -> Result<T, DemoError> {
    map.get(name).cloned().ok_or(DemoError::Missing { kind, name })
}

#[cfg(test)]
mod tests {
    use super::*;
    use sim_draw::{RecordingSurface, Size};
    use sim_env::{default_scene_toml, FrameLimit};

    fn scene() -> SceneConfig {
        SceneConfig::from_str(&default_scene_toml()).unwrap()
    }

    fn run(seed: u64, frames: u64) -> (String, PostOfficeStats) {
        let (mut env, stats) = build_post_office(&scene(), &PostOfficeSettings::default(), seed)
            .unwrap();
        let surface = Rc::new(RefCell::new(RecordingSurface::new(Size::new(800, 600))));
        env.run(surface.clone(), FrameLimit(frames));
        let jsonl = surface.borrow().to_jsonl().unwrap();
        (jsonl, stats)
    }

    #[test]
    fn test_customers_arrive_and_get_served() {
        // 600 frames at 30 fps: twenty virtual seconds
        let (_, stats) = run(42, 600);
        assert!(stats.arrived.get() >= 5);
        assert!(stats.served.get() >= 1);
        assert!(stats.served.get() <= stats.arrived.get());
    }

    #[test]
    fn test_same_seed_same_frames() {
        assert_eq!(run(9, 120).0, run(9, 120).0);
    }

    #[test]
    fn test_missing_container_is_reported() {
        let mut scene = scene();
        scene.containers.shift_remove("counter");
        let err = build_post_office(&scene, &PostOfficeSettings::default(), 1).unwrap_err();
        assert_eq!(
            err.to_string(),
            "scene declares no container named 'counter'"
        );
    }

    #[test]
    fn test_clerk_states_required() {
        let mut scene = scene();
        scene.states.shift_remove("clerk");
        assert!(matches!(
            build_post_office(&scene, &PostOfficeSettings::default(), 1),
            Err(DemoError::Missing { kind: "state map", name: "clerk" })
        ));
    }
}
