/// Core identifier and value types used throughout the domain layer
///
/// This module defines HabitId, OwnerId and the Swatch color palette that
/// Habit and the storage layer build on.

use std::fmt;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::DomainError;

/// Unique identifier for a habit
///
/// Assigned once when the habit is created and never reused. Wrapping the
/// UUID keeps habit IDs from being mixed up with owner IDs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HabitId(pub Uuid);

impl HabitId {
    /// Generate a new random habit ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a habit ID from its string form (tool input, database rows)
    pub fn from_string(s: &str) -> Result<Self, DomainError> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|_| DomainError::InvalidId(s.to_string()))
    }
}

impl Default for HabitId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for HabitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Opaque identity of the user who owns a set of habits
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OwnerId(String);

impl OwnerId {
    pub fn new(id: impl Into<String>) -> Result<Self, DomainError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(DomainError::InvalidId("Owner ID cannot be empty".to_string()));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Color swatch shown next to a habit
///
/// The six named swatches make up the default palette. Anything else
/// has to be a `#rrggbb` hex color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Swatch {
    Green,
    Blue,
    Purple,
    Red,
    Orange,
    Yellow,
    /// User-chosen hex color
    Custom(String),
}

/// Palette used when a habit is created without a color
pub const PALETTE: [Swatch; 6] = [
    Swatch::Green,
    Swatch::Blue,
    Swatch::Purple,
    Swatch::Red,
    Swatch::Orange,
    Swatch::Yellow,
];

impl Swatch {
    /// Get the display name for this swatch
    pub fn display_name(&self) -> &str {
        match self {
            Swatch::Green => "Green",
            Swatch::Blue => "Blue",
            Swatch::Purple => "Purple",
            Swatch::Red => "Red",
            Swatch::Orange => "Orange",
            Swatch::Yellow => "Yellow",
            Swatch::Custom(hex) => hex,
        }
    }

    /// Hex value for rendering and storage
    pub fn hex(&self) -> &str {
        match self {
            Swatch::Green => "#22c55e",
            Swatch::Blue => "#3b82f6",
            Swatch::Purple => "#a855f7",
            Swatch::Red => "#ef4444",
            Swatch::Orange => "#f97316",
            Swatch::Yellow => "#eab308",
            Swatch::Custom(hex) => hex,
        }
    }

    /// Parse a swatch from a palette name or a hex color
    ///
    /// Palette hex values map back to their named swatch so that a value
    /// read from storage compares equal to the one that was written.
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        let value = value.trim();

        if let Some(named) = PALETTE
            .iter()
            .find(|s| s.display_name().eq_ignore_ascii_case(value) || s.hex().eq_ignore_ascii_case(value))
        {
            return Ok(named.clone());
        }

        let custom = Swatch::Custom(value.to_ascii_lowercase());
        custom.validate()?;
        Ok(custom)
    }

    /// Deterministic default for the n-th habit an owner creates
    pub fn default_for(index: usize) -> Self {
        PALETTE[index % PALETTE.len()].clone()
    }

    /// Check that a custom swatch is a well-formed `#rrggbb` color
    pub fn validate(&self) -> Result<(), DomainError> {
        if let Swatch::Custom(hex) = self {
            let digits = hex.strip_prefix('#').unwrap_or("");
            if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(DomainError::InvalidColor(hex.clone()));
            }
        }
        Ok(())
    }
}
