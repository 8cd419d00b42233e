//! Sample data fixtures for testing.
//!
//! This module provides ready-made test data for other crates to use.
//! Enable the `test-fixtures` feature to access these helpers.
//!
//! # Example
//!
//! ```ignore
//! // In your Cargo.toml:
//! // [dev-dependencies]
//! // sim-draw = { path = "../sim-draw", features = ["test-fixtures"] }
//!
//! use sim_draw::fixtures;
//!
//! let states = fixtures::traffic_light();
//! let marker = fixtures::shared_marker(12);
//! ```

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use crate::color::Color;
use crate::drawable::{Drawable, DrawableId};
use crate::error::ValidationError;
use crate::shape::{Shape, ShapeKind, FILLED};
use crate::states::{StateColorMap, StateValue};
use crate::surface::Surface;

/// Three hex states: red, amber, green.
pub fn traffic_light() -> Arc<StateColorMap> {
    StateColorMap::define([
        ("red", StateValue::hex("#ff0000")),
        ("amber", StateValue::hex("#ffbf00")),
        ("green", StateValue::hex("#0f0")),
    ])
    .expect("traffic light fixture is valid")
    .shared()
}

/// One hex state followed by one palette state.
pub fn online_offline() -> Arc<StateColorMap> {
    StateColorMap::define([
        ("online", StateValue::hex("#fff")),
        ("offline", StateValue::Index(1)),
    ])
    .expect("online/offline fixture is valid")
    .shared()
}

/// Minimal drawable: a filled white square that never moves.
#[derive(Debug, Clone)]
pub struct Marker {
    id: DrawableId,
    shape: Shape,
}

impl Marker {
    pub fn new(size: i32) -> Self {
        Self {
            id: DrawableId::next(),
            shape: Shape {
                kind: ShapeKind::Square,
                size,
                border_size: FILLED,
                color: Color::WHITE,
            },
        }
    }

    pub fn circle(size: i32) -> Self {
        let mut marker = Self::new(size);
        marker.shape.kind = ShapeKind::Circle;
        marker
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.shape.color = color;
        self
    }
}

impl Drawable for Marker {
    fn id(&self) -> DrawableId {
        self.id
    }

    fn shape(&self) -> &Shape {
        &self.shape
    }

    fn set_shape(&mut self, shape: Shape) -> Result<(), ValidationError> {
        shape.validate()?;
        self.shape = shape;
        Ok(())
    }

    fn draw(&self, _surface: &mut dyn Surface) {}
}

/// A marker ready to be entered into containers.
pub fn shared_marker(size: i32) -> Rc<RefCell<Marker>> {
    Rc::new(RefCell::new(Marker::new(size)))
}
