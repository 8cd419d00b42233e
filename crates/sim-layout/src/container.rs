//! Layout containers.

use std::cell::{Ref, RefCell};
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use sim_draw::{
    Color, Drawable, DrawableId, MembershipError, Point, Rect, Shape, ShapeKind, SharedDrawable,
    Size, Surface, ValidationError,
};
use tracing::{debug, trace};

use crate::config::ContainerConfig;
use crate::layout::{compute_layout, LayoutParams};
use crate::options::{Align, ContainerKind, FillDirection, Overflow};

/// A drawable that positions other drawables.
///
/// Members are kept in insertion order and keyed by their [`DrawableId`], so
/// a drawable can be a member at most once. The container draws its own
/// background shape first and then every member at the slot computed for it.
/// Members must not be mutably borrowed while the container draws.
pub struct Container {
    id: DrawableId,
    kind: ContainerKind,
    members: IndexMap<DrawableId, SharedDrawable>,
    size: Size,
    position: Point,
    shape: Shape,
    align: Align,
    fill_direction: FillDirection,
    overflow: Overflow,
    padding: i32,
}

impl Container {
    /// Creates an empty container with the panel shape and no alignment.
    pub fn new(kind: ContainerKind, size: Size, position: Point) -> Result<Self, ValidationError> {
        let mut container = Self {
            id: DrawableId::next(),
            kind,
            members: IndexMap::new(),
            size: Size::new(1, 1),
            position: Point::ORIGIN,
            shape: Shape::panel_default(),
            align: Align::NoAlign,
            fill_direction: kind.normalize_fill(FillDirection::TopLeft)?,
            overflow: Overflow::Visible,
            padding: 0,
        };
        container.set_size(size)?;
        container.set_position(position)?;
        Ok(container)
    }

    pub fn row(size: Size, position: Point) -> Result<Self, ValidationError> {
        Self::new(ContainerKind::Row, size, position)
    }

    pub fn column(size: Size, position: Point) -> Result<Self, ValidationError> {
        Self::new(ContainerKind::Column, size, position)
    }

    pub fn grid(size: Size, position: Point) -> Result<Self, ValidationError> {
        Self::new(ContainerKind::Grid, size, position)
    }

    /// Builds a container from its declaration, running every setter check.
    pub fn from_config(config: &ContainerConfig) -> Result<Self, ValidationError> {
        let mut container = Self::new(config.kind, config.size, Point::ORIGIN)?;
        // Align first so a negative offset is accepted
        container.set_align(config.align)?;
        container.set_position(config.position)?;
        container.set_fill_direction(config.fill_direction)?;
        container.set_overflow(config.overflow);
        container.set_padding(config.padding)?;
        if let Some(shape) = config.shape {
            container.set_shape(shape)?;
        }
        Ok(container)
    }

    pub fn kind(&self) -> ContainerKind {
        self.kind
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn set_size(&mut self, size: Size) -> Result<(), ValidationError> {
        if !size.is_positive() {
            return Err(ValidationError::InvalidSize {
                width: size.width,
                height: size.height,
            });
        }
        self.size = size;
        Ok(())
    }

    pub fn position(&self) -> Point {
        self.position
    }

    /// Sets the position. Negative coordinates are only accepted while the
    /// container is aligned, where they act as an offset from the anchor.
    pub fn set_position(&mut self, position: Point) -> Result<(), ValidationError> {
        if self.align == Align::NoAlign && !position.is_non_negative() {
            return Err(ValidationError::NegativePosition {
                x: position.x,
                y: position.y,
            });
        }
        self.position = position;
        Ok(())
    }

    pub fn align(&self) -> Align {
        self.align
    }

    /// Changes alignment. Dropping back to [`Align::NoAlign`] fails while the
    /// stored position is negative.
    pub fn set_align(&mut self, align: Align) -> Result<(), ValidationError> {
        if align == Align::NoAlign && !self.position.is_non_negative() {
            return Err(ValidationError::NegativePosition {
                x: self.position.x,
                y: self.position.y,
            });
        }
        self.align = align;
        Ok(())
    }

    /// Fill direction after normalization for this container's kind.
    pub fn fill_direction(&self) -> FillDirection {
        self.fill_direction
    }

    pub fn set_fill_direction(&mut self, direction: FillDirection) -> Result<(), ValidationError> {
        self.fill_direction = self.kind.normalize_fill(direction)?;
        Ok(())
    }

    pub fn overflow(&self) -> Overflow {
        self.overflow
    }

    pub fn set_overflow(&mut self, overflow: Overflow) {
        self.overflow = overflow;
    }

    pub fn padding(&self) -> i32 {
        self.padding
    }

    pub fn set_padding(&mut self, padding: i32) -> Result<(), ValidationError> {
        if padding < 0 {
            return Err(ValidationError::NegativePadding(padding));
        }
        self.padding = padding;
        Ok(())
    }

    /// Adds a member at the end of the layout order.
    pub fn enter(&mut self, member: SharedDrawable) -> Result<(), MembershipError> {
        let id = member.borrow().id();
        if self.members.contains_key(&id) {
            return Err(MembershipError::DuplicateMember(id));
        }
        self.members.insert(id, member);
        debug!(container = %self.id, member = %id, count = self.members.len(), "member entered");
        Ok(())
    }

    /// Removes a member, keeping the relative order of the rest.
    pub fn leave<D: Drawable + ?Sized>(
        &mut self,
        member: &Rc<RefCell<D>>,
    ) -> Result<SharedDrawable, MembershipError> {
        let id = member.borrow().id();
        self.leave_id(id)
    }

    pub fn leave_id(&mut self, id: DrawableId) -> Result<SharedDrawable, MembershipError> {
        let removed = self
            .members
            .shift_remove(&id)
            .ok_or(MembershipError::MemberNotFound(id))?;
        debug!(container = %self.id, member = %id, count = self.members.len(), "member left");
        Ok(removed)
    }

    pub fn contains<D: Drawable + ?Sized>(&self, member: &Rc<RefCell<D>>) -> bool {
        self.contains_id(member.borrow().id())
    }

    pub fn contains_id(&self, id: DrawableId) -> bool {
        self.members.contains_key(&id)
    }

    /// Members in layout order.
    pub fn members(&self) -> impl Iterator<Item = &SharedDrawable> + '_ {
        self.members.values()
    }

    /// Member ids in layout order.
    pub fn member_ids(&self) -> impl Iterator<Item = DrawableId> + '_ {
        self.members.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Top-left corner on a surface of the given size.
    ///
    /// Aligned containers anchor to an edge or the center of the surface and
    /// add their position as an offset.
    pub fn resolved_origin(&self, surface: Size) -> Point {
        let Some((hx, hy)) = self.align.anchor_halves() else {
            return self.position;
        };
        let free_x = surface.width - self.size.width;
        let free_y = surface.height - self.size.height;
        Point::new(
            free_x * hx / 2 + self.position.x,
            free_y * hy / 2 + self.position.y,
        )
    }

    /// Slot of every member when the container's top-left corner is `origin`.
    pub fn layout(&self, origin: Point) -> Vec<(DrawableId, Option<Point>)> {
        let members = self.borrow_members();
        let slots = compute_layout(&self.params(origin), &member_sizes(&members));
        self.members.keys().copied().zip(slots).collect()
    }

    fn params(&self, origin: Point) -> LayoutParams {
        LayoutParams {
            kind: self.kind,
            origin,
            size: self.size,
            padding: self.padding,
            fill_direction: self.fill_direction,
            overflow: self.overflow,
        }
    }

    fn borrow_members(&self) -> Vec<Ref<'_, dyn Drawable>> {
        self.members.values().map(|m| m.borrow()).collect()
    }

    fn render(&self, surface: &mut dyn Surface, origin: Point) {
        let bounds = Rect::from_parts(origin, self.size);
        let panel = self.shape.clamped_border();
        match panel.kind {
            ShapeKind::Square => surface.draw_rect(bounds, panel.color, panel.stroke()),
            ShapeKind::Circle => surface.draw_ellipse(bounds, panel.color, panel.stroke()),
        }

        if self.members.is_empty() {
            return;
        }

        let members = self.borrow_members();
        let slots = compute_layout(&self.params(origin), &member_sizes(&members));
        let clip = self.overflow == Overflow::Clip;
        if clip {
            surface.set_clip(Some(bounds));
        }

        let mut drawn = 0;
        for (member, slot) in members.iter().zip(slots) {
            if let Some(at) = slot {
                member.draw_at(surface, at);
                drawn += 1;
            }
        }

        if clip {
            surface.set_clip(None);
        }
        trace!(
            container = %self.id,
            kind = %self.kind,
            drawn,
            culled = members.len() - drawn,
            "container drawn"
        );
    }
}

fn member_sizes(members: &[Ref<'_, dyn Drawable>]) -> Vec<i32> {
    members.iter().map(|m| m.shape().size).collect()
}

impl Drawable for Container {
    fn id(&self) -> DrawableId {
        self.id
    }

    fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Replaces the background shape. Borders below `-1` are raised to `-1`.
    fn set_shape(&mut self, shape: Shape) -> Result<(), ValidationError> {
        shape.validate()?;
        self.shape = shape.clamped_border();
        Ok(())
    }

    fn color(&self) -> Color {
        self.shape.color
    }

    fn draw(&self, surface: &mut dyn Surface) {
        let origin = self.resolved_origin(surface.size());
        self.render(surface, origin);
    }

    /// Nested containers ignore their own alignment and use the slot given.
    fn draw_at(&self, surface: &mut dyn Surface, origin: Point) {
        self.render(surface, origin);
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("members", &self.members.keys().collect::<Vec<_>>())
            .field("size", &self.size)
            .field("position", &self.position)
            .field("align", &self.align)
            .field("fill_direction", &self.fill_direction)
            .field("overflow", &self.overflow)
            .field("padding", &self.padding)
            .finish()
    }
}
