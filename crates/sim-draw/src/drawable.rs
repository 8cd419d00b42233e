//! The drawable capability.
//!
//! Anything rendered on a [`Surface`] exposes a shape and a draw operation.
//! Drawables carry a process-wide [`DrawableId`] so containers and the
//! environment can track membership without relying on memory addresses.

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::color::Color;
use crate::error::ValidationError;
use crate::geometry::Point;
use crate::shape::Shape;
use crate::surface::{draw_shape, Surface};

static NEXT_DRAWABLE_ID: AtomicU64 = AtomicU64::new(0);

/// Monotonic identity of a drawable, never reused within a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DrawableId(u64);

impl DrawableId {
    /// Allocates the next id.
    pub fn next() -> Self {
        Self(NEXT_DRAWABLE_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Wraps a raw value, for tests and deserialized references.
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for DrawableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A renderable entity.
///
/// Invoking a drawable means calling [`Drawable::draw`]; there is no
/// separate call entry point.
pub trait Drawable {
    fn id(&self) -> DrawableId;

    fn shape(&self) -> &Shape;

    /// Replaces the shape after validating it. On error the old shape stays.
    fn set_shape(&mut self, shape: Shape) -> Result<(), ValidationError>;

    /// Fill color currently used to render this drawable.
    fn color(&self) -> Color {
        self.shape().color
    }

    /// Draws the drawable wherever it places itself.
    fn draw(&self, surface: &mut dyn Surface);

    /// Draws the drawable with its top-left corner at `origin`.
    ///
    /// Containers call this with the position computed by their layout.
    fn draw_at(&self, surface: &mut dyn Surface, origin: Point) {
        draw_shape(surface, self.shape(), origin, self.color());
    }
}

/// Drawable shared between the environment, containers and processes.
pub type SharedDrawable = Rc<RefCell<dyn Drawable>>;

/// Wraps a drawable for sharing, keeping the concrete handle available.
pub fn share<D: Drawable + 'static>(drawable: D) -> Rc<RefCell<D>> {
    Rc::new(RefCell::new(drawable))
}
