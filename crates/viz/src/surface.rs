//! Render surface backed by Bevy sprites and meshes.
//!
//! Drawing calls are collected into a list of [`FrameItem`]s in surface
//! pixels. Once per Bevy frame the list is turned into entities: quads
//! become sprites, ellipses become meshes and text becomes `Text2d`.

use bevy::prelude::*;
use sim_draw::{Color as DrawColor, Point, Rect, Size, Stroke, Surface};

/// One primitive of the current frame, in surface pixels.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameItem {
    /// Filled axis-aligned rectangle.
    Quad { rect: Rect, color: DrawColor },
    /// Ellipse inscribed in `rect`, outlined when `border` is set.
    Ellipse {
        rect: Rect,
        color: DrawColor,
        border: Option<u32>,
    },
    Label {
        text: String,
        at: Point,
        font_size: u32,
        color: DrawColor,
    },
}

/// Surface collecting one frame of primitives.
///
/// Rectangle outlines are split into four quads. Clipping cuts quads to the
/// clip rect; ellipses and labels outside it are dropped whole.
#[derive(Resource, Debug, Clone, Default)]
pub struct SpriteSurface {
    size: Size,
    clip: Option<Rect>,
    background: Option<DrawColor>,
    items: Vec<FrameItem>,
    presented: bool,
}

impl SpriteSurface {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            ..Default::default()
        }
    }

    pub fn items(&self) -> &[FrameItem] {
        &self.items
    }

    /// Background of the last clear, if any.
    pub fn background(&self) -> Option<DrawColor> {
        self.background
    }

    /// Whether the frame has been presented since the last clear.
    pub fn is_presented(&self) -> bool {
        self.presented
    }

    /// Converts a surface rect to a world-space center and extent.
    ///
    /// Surface pixels grow right and down from the top-left corner; the 2D
    /// camera looks at the window center with y up.
    pub fn to_world(&self, rect: Rect) -> (Vec2, Vec2) {
        let extent = Vec2::new(rect.width as f32, rect.height as f32);
        let center = Vec2::new(
            rect.x as f32 + extent.x / 2.0 - self.size.width as f32 / 2.0,
            self.size.height as f32 / 2.0 - (rect.y as f32 + extent.y / 2.0),
        );
        (center, extent)
    }

    /// World position of a surface point.
    pub fn point_to_world(&self, at: Point) -> Vec2 {
        Vec2::new(
            at.x as f32 - self.size.width as f32 / 2.0,
            self.size.height as f32 / 2.0 - at.y as f32,
        )
    }

    fn push_quad(&mut self, rect: Rect, color: DrawColor) {
        let rect = match self.clip {
            Some(clip) => match clip.intersect(&rect) {
                Some(visible) => visible,
                None => return,
            },
            None => rect,
        };
        if rect.width > 0 && rect.height > 0 {
            self.items.push(FrameItem::Quad { rect, color });
        }
    }

    fn visible(&self, rect: &Rect) -> bool {
        self.clip.map_or(true, |clip| clip.intersect(rect).is_some())
    }
}

impl Surface for SpriteSurface {
    fn size(&self) -> Size {
        self.size
    }

    fn clear(&mut self, color: DrawColor) {
        self.items.clear();
        self.clip = None;
        self.background = Some(color);
        self.presented = false;
    }

    fn draw_rect(&mut self, rect: Rect, color: DrawColor, stroke: Stroke) {
        match stroke {
            Stroke::Border(width) if (width as i32) * 2 < rect.width.min(rect.height) => {
                let b = width as i32;
                let inner_height = rect.height - 2 * b;
                self.push_quad(Rect::new(rect.x, rect.y, rect.width, b), color);
                self.push_quad(Rect::new(rect.x, rect.bottom() - b, rect.width, b), color);
                self.push_quad(Rect::new(rect.x, rect.y + b, b, inner_height), color);
                self.push_quad(Rect::new(rect.right() - b, rect.y + b, b, inner_height), color);
            }
            // Outlines at least half as wide as the rect cover it entirely
            _ => self.push_quad(rect, color),
        }
    }

    fn draw_ellipse(&mut self, rect: Rect, color: DrawColor, stroke: Stroke) {
        if !self.visible(&rect) {
            return;
        }
        let border = match stroke {
            Stroke::Border(width) if (width as i32) * 2 < rect.width.min(rect.height) => {
                Some(width)
            }
            _ => None,
        };
        self.items.push(FrameItem::Ellipse {
            rect,
            color,
            border,
        });
    }

    fn blit_text(&mut self, text: &str, at: Point, font_size: u32, color: DrawColor) {
        let footprint = Rect::new(at.x, at.y, 1, font_size as i32);
        if !self.visible(&footprint) {
            return;
        }
        self.items.push(FrameItem::Label {
            text: text.to_string(),
            at,
            font_size,
            color,
        });
    }

    fn set_clip(&mut self, clip: Option<Rect>) {
        self.clip = clip;
    }

    fn present(&mut self) {
        self.presented = true;
    }
}

/// Converts a drawing color to a Bevy color.
pub fn bevy_color(color: DrawColor) -> Color {
    Color::srgba_u8(color.r, color.g, color.b, color.a)
}

/// Marker component for entities spawned from the current frame.
#[derive(Component)]
pub struct FrameEntity;

/// Mesh shared by every ellipse; scaled per item.
#[derive(Resource)]
pub struct UnitCircle(pub Handle<Mesh>);

/// System to create the shared ellipse mesh.
pub fn setup_unit_circle(mut commands: Commands, mut meshes: ResMut<Assets<Mesh>>) {
    let mesh = meshes.add(Circle::new(0.5));
    commands.insert_resource(UnitCircle(mesh));
}

/// System to replace last frame's entities with the current frame.
pub fn sync_frame_entities(
    mut commands: Commands,
    surface: Res<SpriteSurface>,
    unit_circle: Res<UnitCircle>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    mut clear_color: ResMut<ClearColor>,
    previous: Query<Entity, With<FrameEntity>>,
) {
    if !surface.is_presented() {
        return;
    }
    for entity in previous.iter() {
        commands.entity(entity).despawn_recursive();
    }
    if let Some(background) = surface.background() {
        clear_color.0 = bevy_color(background);
    }

    // Later items are drawn on top
    for (layer, item) in surface.items().iter().enumerate() {
        let z = layer as f32 * 0.001;
        match item {
            FrameItem::Quad { rect, color } => {
                let (center, extent) = surface.to_world(*rect);
                commands.spawn((
                    SpriteBundle {
                        sprite: Sprite {
                            color: bevy_color(*color),
                            custom_size: Some(extent),
                            ..default()
                        },
                        transform: Transform::from_xyz(center.x, center.y, z),
                        ..default()
                    },
                    FrameEntity,
                ));
            }
            FrameItem::Ellipse {
                rect,
                color,
                border,
            } => {
                let (center, extent) = surface.to_world(*rect);
                let mesh = match border {
                    None => unit_circle.0.clone(),
                    Some(width) => {
                        let inner = 0.5 - *width as f32 / extent.x.min(extent.y);
                        meshes.add(Annulus::new(inner.max(0.0), 0.5))
                    }
                };
                commands.spawn((
                    ColorMesh2dBundle {
                        mesh: mesh.into(),
                        material: materials.add(ColorMaterial::from(bevy_color(*color))),
                        transform: Transform::from_xyz(center.x, center.y, z)
                            .with_scale(extent.extend(1.0)),
                        ..default()
                    },
                    FrameEntity,
                ));
            }
            FrameItem::Label {
                text,
                at,
                font_size,
                color,
            } => {
                let position = surface.point_to_world(*at);
                commands.spawn((
                    Text2dBundle {
                        text: Text::from_section(
                            text.clone(),
                            TextStyle {
                                font_size: *font_size as f32,
                                color: bevy_color(*color),
                                ..default()
                            },
                        ),
                        text_anchor: bevy::sprite::Anchor::TopLeft,
                        transform: Transform::from_xyz(position.x, position.y, z),
                        ..default()
                    },
                    FrameEntity,
                ));
            }
        }
    }
}
