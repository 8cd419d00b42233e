//! Error taxonomy shared by every crate in the workspace.
//!
//! All errors are raised synchronously at the point of configuration. None
//! are deferred to draw time.

use thiserror::Error;

use crate::drawable::DrawableId;

/// A configuration value was rejected.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("shape size must be positive, got {0}")]
    InvalidShapeSize(i32),

    #[error("unknown {kind} value '{value}'")]
    UnknownVariant { kind: &'static str, value: String },

    #[error("'{0}' is not a valid hex color")]
    InvalidColor(String),

    #[error("state '{name}': hex value '{value}' is not valid")]
    InvalidHex { name: String, value: String },

    #[error("state '{name}': negative index {value} supplied")]
    NegativeIndex { name: String, value: i64 },

    #[error("state '{name}': index {value} must be smaller than the state count {count}")]
    IndexOutOfRange { name: String, value: i64, count: usize },

    #[error("state '{name}': value has type {found}, expected a hex string or an integer")]
    WrongValueType { name: String, found: String },

    #[error("state '{0}' is declared more than once")]
    DuplicateState(String),

    #[error("a state map needs at least one state")]
    EmptyStateMap,

    #[error("state '{0}' is not part of the bound state map")]
    UnknownState(String),

    #[error("size must be positive in both dimensions, got {width}x{height}")]
    InvalidSize { width: i32, height: i32 },

    #[error("position must not be negative, got ({x}, {y})")]
    NegativePosition { x: i32, y: i32 },

    #[error("padding must not be negative, got {0}")]
    NegativePadding(i32),

    #[error("fill direction {direction} is not allowed for a {container} container")]
    IllegalFillDirection {
        container: &'static str,
        direction: &'static str,
    },

    #[error("font size must be positive, got {0}")]
    InvalidFontSize(i32),

    #[error("frames per second must be a positive number, got {0}")]
    InvalidFps(f64),

    #[error("simulation speed must be a positive number, got {0}")]
    InvalidSpeed(f64),

    #[error("resolution must be positive in both dimensions, got {width}x{height}")]
    InvalidResolution { width: u32, height: u32 },

    #[error("no state map supplied, neither as a default nor explicitly")]
    MissingStateMap,
}

/// Container or registry membership was violated.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipError {
    #[error("drawable {0} is already a member")]
    DuplicateMember(DrawableId),

    #[error("drawable {0} is not a member")]
    MemberNotFound(DrawableId),
}

/// A value was supplied both as a type-level default and explicitly.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictError {
    #[error("'{field}' supplied both as a default and as an explicit argument")]
    BothSupplied { field: &'static str },
}

/// Any error raised by the drawing layer.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Membership(#[from] MembershipError),

    #[error(transparent)]
    ConfigurationConflict(#[from] ConflictError),
}

pub type Result<T> = std::result::Result<T, Error>;
