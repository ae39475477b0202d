//! # Costing Error Types Module
//!
//! This module defines the error types raised by the costing engine.
//! Conversion errors are local and recoverable: a row that hits one is
//! reported as "N/A" and the rest of the recipe is still aggregated.

use serde::{Deserialize, Serialize};

/// Custom error types for costing operations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum CostingError {
    /// A unit name that is not present in the configured unit table
    UnsupportedUnit(String),
    /// A conversion between units of different dimension groups
    IncompatibleDimension {
        /// Unit the quantity is expressed in
        from: String,
        /// Unit the quantity was asked to be expressed in
        to: String,
    },
    /// A unit definition that cannot be placed in a unit table
    InvalidUnitDefinition(String),
    /// The same unit name defined twice in a unit table
    DuplicateUnit(String),
    /// Price text that does not hold a number
    InvalidPrice(String),
}

impl std::fmt::Display for CostingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CostingError::UnsupportedUnit(unit) => write!(f, "Unsupported unit: {unit}"),
            CostingError::IncompatibleDimension { from, to } => write!(
                f,
                "Cannot convert {from} to {to}. Units must be from the same measurement type."
            ),
            CostingError::InvalidUnitDefinition(msg) => {
                write!(f, "Invalid unit definition: {msg}")
            }
            CostingError::DuplicateUnit(unit) => write!(f, "Duplicate unit definition: {unit}"),
            CostingError::InvalidPrice(raw) => write!(f, "Invalid price: {raw:?}"),
        }
    }
}

impl std::error::Error for CostingError {}

impl CostingError {
    /// Whether this error comes from converting a quantity between units
    pub fn is_conversion_error(&self) -> bool {
        matches!(
            self,
            CostingError::UnsupportedUnit(_) | CostingError::IncompatibleDimension { .. }
        )
    }
}
