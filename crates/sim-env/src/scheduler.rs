//! Discrete-event scheduler.
//!
//! Processes are resumable tasks. Each resumption returns a [`Step`] saying
//! when the process wants to run next. Events are ordered by virtual time
//! and, among equal times, by the order they were scheduled.

use std::cell::Cell;
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::fmt;
use std::rc::Rc;
use std::time::{Duration, Instant};

use ordered_float::OrderedFloat;
use tracing::{error, trace};

/// What a process wants after being resumed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    /// Resume again after this many ticks.
    Timeout(f64),
    /// Resume again at this absolute time.
    Until(f64),
    /// The process has finished.
    Done,
}

/// A resumable simulation task.
pub trait Process {
    fn resume(&mut self, ctx: &mut Context) -> Step;
}

impl<F> Process for F
where
    F: FnMut(&mut Context) -> Step,
{
    fn resume(&mut self, ctx: &mut Context) -> Step {
        self(ctx)
    }
}

/// Handed to a process while it runs.
pub struct Context {
    now: f64,
    spawned: Vec<Box<dyn Process>>,
}

impl Context {
    fn new(now: f64) -> Self {
        Self {
            now,
            spawned: Vec::new(),
        }
    }

    /// Current virtual time.
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Starts another process at the current time, after the running one.
    pub fn spawn(&mut self, process: impl Process + 'static) {
        self.spawned.push(Box::new(process));
    }
}

/// One-shot completion flag shared between processes and the run loop.
#[derive(Debug, Clone, Default)]
pub struct Trigger(Rc<Cell<bool>>);

impl Trigger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the trigger. Returns false if it had already fired.
    pub fn succeed(&self) -> bool {
        !self.0.replace(true)
    }

    pub fn is_triggered(&self) -> bool {
        self.0.get()
    }
}

/// Why [`Scheduler::run`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The awaited trigger fired.
    Triggered,
    /// No events were left.
    Exhausted,
}

/// Ties virtual time to the wall clock.
///
/// An event at virtual time `t` is not dispatched before
/// `start + t * factor` seconds of wall time.
#[derive(Debug, Clone)]
pub struct RealtimePacing {
    factor: f64,
    origin: Option<(Instant, f64)>,
}

impl RealtimePacing {
    pub fn new(factor: f64) -> Self {
        Self {
            factor,
            origin: None,
        }
    }

    pub fn factor(&self) -> f64 {
        self.factor
    }

    fn wait_for(&mut self, time: f64) {
        let (start, base) = *self.origin.get_or_insert_with(|| (Instant::now(), time));
        let due = Duration::from_secs_f64(((time - base) * self.factor).max(0.0));
        let elapsed = start.elapsed();
        if due > elapsed {
            std::thread::sleep(due - elapsed);
        }
    }
}

struct Scheduled {
    time: OrderedFloat<f64>,
    seq: u64,
    process: Box<dyn Process>,
}

impl PartialEq for Scheduled {
    fn eq(&self, other: &Self) -> bool {
        self.time == other.time && self.seq == other.seq
    }
}

impl Eq for Scheduled {}

impl PartialOrd for Scheduled {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Scheduled {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.time, self.seq).cmp(&(other.time, other.seq))
    }
}

/// Event queue driving every process in virtual time.
#[derive(Default)]
pub struct Scheduler {
    now: f64,
    next_seq: u64,
    queue: BinaryHeap<Reverse<Scheduled>>,
    pacing: Option<RealtimePacing>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scheduler that sleeps so virtual time keeps pace with the wall clock.
    pub fn realtime(factor: f64) -> Self {
        Self {
            pacing: Some(RealtimePacing::new(factor)),
            ..Self::default()
        }
    }

    pub fn now(&self) -> f64 {
        self.now
    }

    /// Number of scheduled events.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Time of the next event, if any.
    pub fn peek(&self) -> Option<f64> {
        self.queue.peek().map(|Reverse(s)| s.time.into_inner())
    }

    /// Starts a process at the current time.
    pub fn spawn(&mut self, process: impl Process + 'static) {
        self.schedule(self.now, Box::new(process));
    }

    fn schedule(&mut self, time: f64, process: Box<dyn Process>) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(Reverse(Scheduled {
            time: OrderedFloat(time),
            seq,
            process,
        }));
    }

    /// Dispatches the next event. Returns false when the queue is empty.
    pub fn step(&mut self) -> bool {
        let Some(Reverse(Scheduled {
            time, mut process, ..
        })) = self.queue.pop()
        else {
            return false;
        };
        let time = time.into_inner();
        if let Some(pacing) = self.pacing.as_mut() {
            pacing.wait_for(time);
        }
        self.now = time;

        let mut ctx = Context::new(time);
        let step = process.resume(&mut ctx);
        for spawned in ctx.spawned {
            self.schedule(time, spawned);
        }

        match step {
            Step::Timeout(delay) if delay.is_finite() && delay >= 0.0 => {
                self.schedule(time + delay, process);
            }
            Step::Until(at) if at.is_finite() && at >= time => {
                self.schedule(at, process);
            }
            Step::Done => trace!(now = time, "process finished"),
            invalid => error!(
                now = time,
                step = ?invalid,
                "process asked for an invalid wait, stopping it"
            ),
        }
        true
    }

    /// Runs until `trigger` fires or nothing is left to do.
    pub fn run(&mut self, trigger: &Trigger) -> RunOutcome {
        loop {
            if trigger.is_triggered() {
                return RunOutcome::Triggered;
            }
            if !self.step() {
                return RunOutcome::Exhausted;
            }
        }
    }

    /// Dispatches every event up to and including `until`, then moves the
    /// clock to `until`. Returns the number of events dispatched.
    pub fn run_until(&mut self, until: f64) -> usize {
        let mut dispatched = 0;
        while self.peek().is_some_and(|t| t <= until) {
            self.step();
            dispatched += 1;
        }
        if until > self.now {
            self.now = until;
        }
        dispatched
    }
}

impl fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scheduler")
            .field("now", &self.now)
            .field("pending", &self.queue.len())
            .field("pacing", &self.pacing)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn test_timeouts_advance_time() {
        let mut scheduler = Scheduler::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = seen.clone();
        let mut remaining = 3;
        scheduler.spawn(move |ctx: &mut Context| {
            log.borrow_mut().push(ctx.now());
            remaining -= 1;
            if remaining == 0 {
                Step::Done
            } else {
                Step::Timeout(2.5)
            }
        });

        assert_eq!(scheduler.run(&Trigger::new()), RunOutcome::Exhausted);
        assert_eq!(*seen.borrow(), vec![0.0, 2.5, 5.0]);
        assert_eq!(scheduler.now(), 5.0);
    }

    #[test]
    fn test_equal_times_run_in_schedule_order() {
        let mut scheduler = Scheduler::new();
        let order = Rc::new(RefCell::new(Vec::new()));
        for name in ["a", "b", "c"] {
            let order = order.clone();
            scheduler.spawn(move |_: &mut Context| {
                order.borrow_mut().push(name);
                Step::Done
            });
        }

        scheduler.run(&Trigger::new());
        assert_eq!(*order.borrow(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_trigger_stops_run() {
        let mut scheduler = Scheduler::new();
        let trigger = Trigger::new();
        let fire = trigger.clone();
        scheduler.spawn(move |ctx: &mut Context| {
            if ctx.now() >= 3.0 {
                fire.succeed();
            }
            Step::Timeout(1.0)
        });

        assert_eq!(scheduler.run(&trigger), RunOutcome::Triggered);
        assert_eq!(scheduler.now(), 3.0);
        assert_eq!(scheduler.pending(), 1);
    }

    #[test]
    fn test_trigger_fires_once() {
        let trigger = Trigger::new();
        assert!(!trigger.is_triggered());
        assert!(trigger.succeed());
        assert!(!trigger.succeed());
        assert!(trigger.is_triggered());
    }

    #[test]
    fn test_spawned_process_runs_at_spawn_time() {
        let mut scheduler = Scheduler::new();
        let times = Rc::new(RefCell::new(Vec::new()));
        let log = times.clone();
        scheduler.spawn(move |ctx: &mut Context| {
            let log = log.clone();
            ctx.spawn(move |ctx: &mut Context| {
                log.borrow_mut().push(ctx.now());
                Step::Done
            });
            Step::Done
        });
        scheduler.run_until(0.0);
        assert_eq!(*times.borrow(), vec![0.0]);
    }

    #[test]
    fn test_until_and_invalid_waits() {
        let mut scheduler = Scheduler::new();
        let resumed = Rc::new(Cell::new(0));
        let count = resumed.clone();
        scheduler.spawn(move |ctx: &mut Context| {
            count.set(count.get() + 1);
            if ctx.now() == 0.0 {
                Step::Until(7.0)
            } else {
                Step::Timeout(-1.0)
            }
        });

        scheduler.run(&Trigger::new());
        assert_eq!(resumed.get(), 2);
        assert_eq!(scheduler.now(), 7.0);
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_run_until_moves_clock() {
        let mut scheduler = Scheduler::new();
        scheduler.spawn(|_: &mut Context| Step::Timeout(10.0));

        assert_eq!(scheduler.run_until(4.0), 1);
        assert_eq!(scheduler.now(), 4.0);
        assert_eq!(scheduler.peek(), Some(10.0));

        assert_eq!(scheduler.run_until(10.0), 1);
        assert_eq!(scheduler.now(), 10.0);
    }

    #[test]
    fn test_realtime_pacing_waits() {
        let mut scheduler = Scheduler::realtime(0.01);
        scheduler.spawn(|ctx: &mut Context| {
            if ctx.now() < 2.0 {
                Step::Timeout(1.0)
            } else {
                Step::Done
            }
        });

        let started = Instant::now();
        scheduler.run(&Trigger::new());
        assert!(started.elapsed() >= Duration::from_millis(20));
    }
}
