//! Simulated objects: drawables whose color follows a named state.

use std::sync::Arc;

use sim_draw::{
    draw_shape, Color, ConflictError, Drawable, DrawableId, Point, Result, Shape, StateColorMap,
    StateSelection, Surface, ValidationError,
};

/// Defaults shared by every object of one kind.
#[derive(Debug, Clone, Default)]
pub struct ObjectDefaults {
    pub states: Option<Arc<StateColorMap>>,
    pub shape: Option<Shape>,
}

impl ObjectDefaults {
    pub fn with_states(states: Arc<StateColorMap>) -> Self {
        Self {
            states: Some(states),
            shape: None,
        }
    }

    pub fn shape(mut self, shape: Shape) -> Self {
        self.shape = Some(shape);
        self
    }
}

/// Per-object construction options.
#[derive(Debug, Clone, Default)]
pub struct ObjectOptions {
    /// State map, when the kind has no default one
    pub states: Option<Arc<StateColorMap>>,
    /// Shape, when the kind has no default one
    pub shape: Option<Shape>,
    /// Initial state; the first declared state when omitted
    pub default_state: Option<String>,
    /// Free position; objects without one are only drawn by containers
    pub position: Option<Point>,
}

/// An entity in the simulation with a current state.
#[derive(Debug, Clone)]
pub struct SimObject {
    id: DrawableId,
    state: StateSelection,
    shape: Shape,
    position: Option<Point>,
}

impl SimObject {
    /// Creates an object from its kind's defaults and its own options.
    ///
    /// Supplying the state map or the shape in both places is a conflict.
    /// A state map must come from one of them.
    pub fn new(defaults: &ObjectDefaults, options: ObjectOptions) -> Result<Self> {
        let states = pick("states", defaults.states.clone(), options.states)?
            .ok_or(ValidationError::MissingStateMap)?;
        let shape =
            pick("shape", defaults.shape, options.shape)?.unwrap_or_else(Shape::entity_default);
        shape.validate()?;

        if let Some(position) = options.position {
            checked_position(position)?;
        }

        let state = StateSelection::new(states, options.default_state.as_deref())?;
        Ok(Self {
            id: DrawableId::next(),
            state,
            shape,
            position: options.position,
        })
    }

    /// Name of the current state.
    pub fn current_state(&self) -> &str {
        self.state.name()
    }

    /// Switches state. Unknown names leave the current state unchanged.
    pub fn set_state(&mut self, name: &str) -> std::result::Result<(), ValidationError> {
        self.state.set(name)
    }

    pub fn states(&self) -> &Arc<StateColorMap> {
        self.state.map()
    }

    pub fn position(&self) -> Option<Point> {
        self.position
    }

    pub fn set_position(
        &mut self,
        position: Option<Point>,
    ) -> std::result::Result<(), ValidationError> {
        if let Some(position) = position {
            checked_position(position)?;
        }
        self.position = position;
        Ok(())
    }
}

fn pick<T>(field: &'static str, default: Option<T>, explicit: Option<T>) -> Result<Option<T>> {
    match (default, explicit) {
        (Some(_), Some(_)) => Err(ConflictError::BothSupplied { field }.into()),
        (default, explicit) => Ok(explicit.or(default)),
    }
}

fn checked_position(position: Point) -> std::result::Result<(), ValidationError> {
    if !position.is_non_negative() {
        return Err(ValidationError::NegativePosition {
            x: position.x,
            y: position.y,
        });
    }
    Ok(())
}

impl Drawable for SimObject {
    fn id(&self) -> DrawableId {
        self.id
    }

    fn shape(&self) -> &Shape {
        &self.shape
    }

    fn set_shape(&mut self, shape: Shape) -> std::result::Result<(), ValidationError> {
        shape.validate()?;
        self.shape = shape;
        Ok(())
    }

    fn color(&self) -> Color {
        self.state.color()
    }

    fn draw(&self, surface: &mut dyn Surface) {
        if let Some(position) = self.position {
            draw_shape(surface, &self.shape, position, self.color());
        }
    }
}
