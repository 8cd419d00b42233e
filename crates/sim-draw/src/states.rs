//! State-to-color registry.
//!
//! A [`StateColorMap`] is an immutable, ordered table from state names to
//! colors, built once by a validating constructor. Each state declares either
//! a hex color or a non-negative index smaller than the number of states.
//!
//! Hex states decode directly. Index states take their color from one
//! palette generated for the whole map, addressed by the state's position in
//! declaration order. The declared index is validated but does not pick the
//! palette slot.
//!
//! # Example
//!
//! ```
//! use sim_draw::{generate_palette, Color, StateColorMap, StateValue};
//!
//! let states = StateColorMap::define([
//!     ("idle", StateValue::Index(1)),
//!     ("busy", StateValue::Index(0)),
//! ])
//! .unwrap();
//!
//! let palette = generate_palette(2);
//! assert_eq!(states.color("idle"), Some(palette[0]));
//! assert_eq!(states.color("busy"), Some(palette[1]));
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use tracing::trace;

use crate::color::{generate_palette, hex_to_rgb, is_valid_hex, Color};
use crate::error::ValidationError;

/// Raw value declared for a state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StateValue {
    /// A `#RGB` or `#RRGGBB` color.
    Hex(String),
    /// An ordinal requesting a generated palette color.
    Index(i64),
}

impl StateValue {
    pub fn hex(value: impl Into<String>) -> Self {
        StateValue::Hex(value.into())
    }

    fn validate(&self, name: &str, count: usize) -> Result<(), ValidationError> {
        match self {
            StateValue::Hex(value) => {
                if !is_valid_hex(Some(value)) {
                    return Err(ValidationError::InvalidHex {
                        name: name.to_string(),
                        value: value.clone(),
                    });
                }
            }
            StateValue::Index(value) => {
                if *value < 0 {
                    return Err(ValidationError::NegativeIndex {
                        name: name.to_string(),
                        value: *value,
                    });
                }
                if *value as u64 >= count as u64 {
                    return Err(ValidationError::IndexOutOfRange {
                        name: name.to_string(),
                        value: *value,
                        count,
                    });
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for StateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateValue::Hex(value) => write!(f, "{}", value),
            StateValue::Index(value) => write!(f, "{}", value),
        }
    }
}

/// One declared state with its resolved color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateEntry {
    pub name: String,
    pub value: StateValue,
    pub color: Color,
}

/// Validated, ordered table from state names to colors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateColorMap {
    entries: Vec<StateEntry>,
}

impl StateColorMap {
    /// Validates every declared state and resolves its color.
    ///
    /// Fails on the first invalid entry; no map is produced in that case.
    pub fn define<I, N>(entries: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = (N, StateValue)>,
        N: Into<String>,
    {
        let declared: Vec<(String, StateValue)> = entries
            .into_iter()
            .map(|(name, value)| (name.into(), value))
            .collect();

        if declared.is_empty() {
            return Err(ValidationError::EmptyStateMap);
        }

        let mut seen = HashSet::new();
        for (name, value) in &declared {
            if !seen.insert(name.as_str()) {
                return Err(ValidationError::DuplicateState(name.clone()));
            }
            value.validate(name, declared.len())?;
        }

        let uses_palette = declared
            .iter()
            .any(|(_, value)| matches!(value, StateValue::Index(_)));
        let palette = if uses_palette {
            generate_palette(declared.len())
        } else {
            Vec::new()
        };

        let entries = declared
            .into_iter()
            .enumerate()
            .map(|(position, (name, value))| {
                let color = match &value {
                    StateValue::Hex(hex) => hex_to_rgb(hex)?,
                    StateValue::Index(_) => palette[position],
                };
                Ok(StateEntry { name, value, color })
            })
            .collect::<Result<Vec<_>, ValidationError>>()?;

        trace!(states = entries.len(), "state color map defined");
        Ok(Self { entries })
    }

    /// Builds a map from a TOML table, keeping document order.
    ///
    /// Strings are hex declarations and integers are index declarations.
    /// Any other TOML type is rejected.
    pub fn from_toml(table: &toml::Table) -> Result<Self, ValidationError> {
        let entries = table
            .iter()
            .map(|(name, value)| {
                let value = match value {
                    toml::Value::String(s) => StateValue::Hex(s.clone()),
                    toml::Value::Integer(i) => StateValue::Index(*i),
                    other => {
                        return Err(ValidationError::WrongValueType {
                            name: name.clone(),
                            found: other.type_str().to_string(),
                        })
                    }
                };
                Ok((name.clone(), value))
            })
            .collect::<Result<Vec<_>, ValidationError>>()?;
        Self::define(entries)
    }

    /// Wraps the map for sharing between entities.
    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Resolved color of a state.
    pub fn color(&self, name: &str) -> Option<Color> {
        self.get(name).map(|entry| entry.color)
    }

    /// Raw declared value of a state.
    pub fn value(&self, name: &str) -> Option<&StateValue> {
        self.get(name).map(|entry| &entry.value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Position of a state in declaration order.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry.name == name)
    }

    pub fn get(&self, name: &str) -> Option<&StateEntry> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    /// The first declared state, used when no state is selected.
    pub fn first(&self) -> &StateEntry {
        // define() refuses empty maps
        &self.entries[0]
    }

    /// State names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &StateEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn entry_at(&self, position: usize) -> &StateEntry {
        &self.entries[position]
    }
}

/// The current state of an entity, always a member of its bound map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateSelection {
    map: Arc<StateColorMap>,
    position: usize,
}

impl StateSelection {
    /// Selects `initial`, or the first declared state when `None`.
    pub fn new(map: Arc<StateColorMap>, initial: Option<&str>) -> Result<Self, ValidationError> {
        let position = match initial {
            Some(name) => map
                .position(name)
                .ok_or_else(|| ValidationError::UnknownState(name.to_string()))?,
            None => 0,
        };
        Ok(Self { map, position })
    }

    /// Switches to another state of the bound map.
    ///
    /// Unknown names are rejected and the current selection is kept.
    pub fn set(&mut self, name: &str) -> Result<(), ValidationError> {
        self.position = self
            .map
            .position(name)
            .ok_or_else(|| ValidationError::UnknownState(name.to_string()))?;
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.map.entry_at(self.position).name
    }

    pub fn color(&self) -> Color {
        self.map.entry_at(self.position).color
    }

    pub fn value(&self) -> &StateValue {
        &self.map.entry_at(self.position).value
    }

    pub fn map(&self) -> &Arc<StateColorMap> {
        &self.map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mixed() -> StateColorMap {
        StateColorMap::define([
            ("Online", StateValue::hex("#fff")),
            ("Offline", StateValue::Index(1)),
        ])
        .unwrap()
    }

    #[test]
    fn test_mixed_hex_and_index() {
        let states = mixed();
        let palette = generate_palette(2);

        assert_eq!(states.color("Online"), Some(Color::WHITE));
        assert_eq!(states.color("Offline"), Some(palette[1]));
        assert_eq!(states.len(), 2);
    }

    #[test]
    fn test_all_hex_states() {
        let states = StateColorMap::define([
            ("Online", StateValue::hex("#fff")),
            ("Offline", StateValue::hex("#000")),
        ])
        .unwrap();
        assert_eq!(states.color("Online"), Some(Color::WHITE));
        assert_eq!(states.color("Offline"), Some(Color::BLACK));
    }

    #[test]
    fn test_index_value_does_not_pick_slot() {
        // Declared indices are reversed, colors still follow declaration order
        let states = StateColorMap::define([
            ("a", StateValue::Index(2)),
            ("b", StateValue::Index(1)),
            ("c", StateValue::Index(0)),
        ])
        .unwrap();
        let palette = generate_palette(3);
        assert_eq!(states.color("a"), Some(palette[0]));
        assert_eq!(states.color("b"), Some(palette[1]));
        assert_eq!(states.color("c"), Some(palette[2]));
    }

    #[test]
    fn test_negative_index_rejected() {
        let err = StateColorMap::define([("A", StateValue::Index(-1))]).unwrap_err();
        assert_eq!(
            err,
            ValidationError::NegativeIndex {
                name: "A".into(),
                value: -1
            }
        );
    }

    #[test]
    fn test_index_out_of_range_rejected() {
        let err = StateColorMap::define([("A", StateValue::Index(2))]).unwrap_err();
        assert_eq!(
            err,
            ValidationError::IndexOutOfRange {
                name: "A".into(),
                value: 2,
                count: 1
            }
        );
        // Equal to the count is also out of range
        assert!(StateColorMap::define([("A", StateValue::Index(1))]).is_err());
    }

    #[test]
    fn test_bad_hex_rejected() {
        let err = StateColorMap::define([("A", StateValue::hex("notahex"))]).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidHex { .. }));
    }

    #[test]
    fn test_one_bad_entry_rejects_all() {
        let result = StateColorMap::define([
            ("ok", StateValue::hex("#123456")),
            ("bad", StateValue::hex("#12345")),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_and_duplicate_rejected() {
        let empty: Vec<(String, StateValue)> = Vec::new();
        assert_eq!(
            StateColorMap::define(empty).unwrap_err(),
            ValidationError::EmptyStateMap
        );
        assert_eq!(
            StateColorMap::define([
                ("a", StateValue::Index(0)),
                ("a", StateValue::Index(1)),
            ])
            .unwrap_err(),
            ValidationError::DuplicateState("a".into())
        );
    }

    #[test]
    fn test_lookups() {
        let states = mixed();
        assert!(states.contains("Online"));
        assert!(!states.contains("online"));
        assert_eq!(states.value("Offline"), Some(&StateValue::Index(1)));
        assert_eq!(states.value("Missing"), None);
        assert_eq!(states.position("Offline"), Some(1));
        assert_eq!(states.first().name, "Online");
        assert_eq!(states.names().collect::<Vec<_>>(), vec!["Online", "Offline"]);
        assert!(!states.is_empty());
    }

    #[test]
    fn test_from_toml_keeps_order() {
        let table: toml::Table = toml::from_str(
            r##"
            zulu = "#f00"
            alpha = 0
            mike = 2
            "##,
        )
        .unwrap();
        let states = StateColorMap::from_toml(&table).unwrap();
        assert_eq!(states.names().collect::<Vec<_>>(), vec!["zulu", "alpha", "mike"]);
        assert_eq!(states.color("zulu"), Some(Color::rgb(255, 0, 0)));
        assert_eq!(states.color("mike"), Some(generate_palette(3)[2]));
    }

    #[test]
    fn test_from_toml_wrong_type() {
        let table: toml::Table = toml::from_str("busy = 1.5").unwrap();
        assert_eq!(
            StateColorMap::from_toml(&table).unwrap_err(),
            ValidationError::WrongValueType {
                name: "busy".into(),
                found: "float".into()
            }
        );
    }

    #[test]
    fn test_selection_defaults_to_first() {
        let selection = StateSelection::new(mixed().shared(), None).unwrap();
        assert_eq!(selection.name(), "Online");
        assert_eq!(selection.color(), Color::WHITE);
        assert_eq!(selection.value(), &StateValue::hex("#fff"));
    }

    #[test]
    fn test_selection_set_roundtrip() {
        let mut selection = StateSelection::new(mixed().shared(), None).unwrap();
        selection.set("Offline").unwrap();
        assert_eq!(selection.name(), "Offline");

        let err = selection.set("Rebooting").unwrap_err();
        assert_eq!(err, ValidationError::UnknownState("Rebooting".into()));
        // Rejected assignment keeps the previous state
        assert_eq!(selection.name(), "Offline");
    }

    #[test]
    fn test_selection_unknown_initial() {
        assert!(StateSelection::new(mixed().shared(), Some("Nope")).is_err());
    }
}
