//! # Unit Table Module
//!
//! This module defines the measurement units the costing engine understands
//! and converts quantities between them.
//!
//! ## Core Concepts
//!
//! - **Dimension group**: weight, volume or count. Groups are disjoint.
//! - **Factor**: how many base units of its group one unit is worth
//!   (ounces for weight, milliliters for volume, each for count).
//!
//! ## Usage
//!
//! ```rust
//! use food_cost::units::UnitTable;
//!
//! let units = UnitTable::standard();
//! let ounces = units.convert(2.0, "pounds", "ounces")?;
//! assert_eq!(ounces, 32.0);
//! # Ok::<(), food_cost::costing_errors::CostingError>(())
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, trace};

use crate::costing_errors::CostingError;

/// Unit assumed when a row does not name one
pub const DEFAULT_UNIT: &str = "each";

/// Disjoint measurement families; conversion only happens inside one family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DimensionGroup {
    /// Base unit: ounce
    Weight,
    /// Base unit: milliliter
    Volume,
    /// Base unit: each
    Count,
}

impl DimensionGroup {
    /// All groups in display order
    pub const ALL: [DimensionGroup; 3] = [
        DimensionGroup::Weight,
        DimensionGroup::Volume,
        DimensionGroup::Count,
    ];

    /// Lowercase name of the group, also used as its localization key suffix
    pub fn as_str(&self) -> &'static str {
        match self {
            DimensionGroup::Weight => "weight",
            DimensionGroup::Volume => "volume",
            DimensionGroup::Count => "count",
        }
    }
}

impl fmt::Display for DimensionGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of a unit table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitDefinition {
    /// The unit name as entered by users (e.g., "pounds", "fluid ounces")
    pub name: String,
    /// The dimension group the unit belongs to
    pub group: DimensionGroup,
    /// Number of group base units in one of this unit
    pub factor: f64,
}

impl UnitDefinition {
    /// Create a unit definition
    pub fn new(name: &str, group: DimensionGroup, factor: f64) -> Self {
        Self {
            name: name.to_string(),
            group,
            factor,
        }
    }
}

/// Immutable lookup table of units, kept in display order
///
/// Built once and handed to the [`CostingEngine`](crate::costing::CostingEngine);
/// there is no global table.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitTable {
    definitions: Vec<UnitDefinition>,
    index: HashMap<String, usize>,
}

impl UnitTable {
    /// The table used by the kitchen forms: US weights and volumes plus "each"
    pub fn standard() -> Self {
        let definitions = vec![
            UnitDefinition::new("pounds", DimensionGroup::Weight, 16.0),
            UnitDefinition::new("fluid ounces", DimensionGroup::Volume, 29.5735),
            UnitDefinition::new("ounces", DimensionGroup::Weight, 1.0),
            UnitDefinition::new("milliliters", DimensionGroup::Volume, 1.0),
            UnitDefinition::new("liters", DimensionGroup::Volume, 1000.0),
            UnitDefinition::new("quarts", DimensionGroup::Volume, 946.353),
            UnitDefinition::new("gallons", DimensionGroup::Volume, 3785.41),
            UnitDefinition::new(DEFAULT_UNIT, DimensionGroup::Count, 1.0),
        ];
        let index = definitions
            .iter()
            .enumerate()
            .map(|(i, def)| (def.name.clone(), i))
            .collect();
        Self { definitions, index }
    }

    /// Build a table from custom definitions
    ///
    /// Names must be non-empty and unique; factors must be finite and positive.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use food_cost::units::{DimensionGroup, UnitDefinition, UnitTable};
    ///
    /// let table = UnitTable::from_definitions(vec![
    ///     UnitDefinition::new("grams", DimensionGroup::Weight, 1.0),
    ///     UnitDefinition::new("kilograms", DimensionGroup::Weight, 1000.0),
    /// ])?;
    /// assert_eq!(table.convert(1.5, "kilograms", "grams")?, 1500.0);
    /// # Ok::<(), food_cost::costing_errors::CostingError>(())
    /// ```
    pub fn from_definitions(
        definitions: impl IntoIterator<Item = UnitDefinition>,
    ) -> Result<Self, CostingError> {
        let mut table = Self {
            definitions: Vec::new(),
            index: HashMap::new(),
        };

        for def in definitions {
            let name = def.name.trim();
            if name.is_empty() {
                return Err(CostingError::InvalidUnitDefinition(
                    "unit name must not be empty".to_string(),
                ));
            }
            if !def.factor.is_finite() || def.factor <= 0.0 {
                return Err(CostingError::InvalidUnitDefinition(format!(
                    "factor for '{name}' must be a positive number, got {}",
                    def.factor
                )));
            }
            if table.index.contains_key(name) {
                return Err(CostingError::DuplicateUnit(name.to_string()));
            }

            table
                .index
                .insert(name.to_string(), table.definitions.len());
            table
                .definitions
                .push(UnitDefinition::new(name, def.group, def.factor));
        }

        if table.definitions.is_empty() {
            return Err(CostingError::InvalidUnitDefinition(
                "unit table must define at least one unit".to_string(),
            ));
        }

        debug!(units = table.definitions.len(), "Built custom unit table");
        Ok(table)
    }

    /// Parse a JSON array of unit definitions
    pub fn from_json_str(json: &str) -> anyhow::Result<Self> {
        let definitions: Vec<UnitDefinition> = serde_json::from_str(json)?;
        Ok(Self::from_definitions(definitions)?)
    }

    /// Look up a unit by its exact name
    pub fn get(&self, name: &str) -> Option<&UnitDefinition> {
        self.index.get(name).map(|&i| &self.definitions[i])
    }

    /// Check whether a unit is known
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// All definitions in display order
    pub fn definitions(&self) -> &[UnitDefinition] {
        &self.definitions
    }

    /// Unit names in display order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.definitions.iter().map(|def| def.name.as_str())
    }

    /// Units of one group, in display order
    pub fn units_in_group(&self, group: DimensionGroup) -> impl Iterator<Item = &UnitDefinition> {
        self.definitions.iter().filter(move |def| def.group == group)
    }

    /// Number of units in the table
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Whether the table is empty (never true for a constructed table)
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Convert a quantity from one unit to another of the same group
    ///
    /// The quantity is not validated: zero and negative values convert like
    /// any other number. The result is `quantity * factor(from) / factor(to)`
    /// with no rounding.
    ///
    /// # Errors
    ///
    /// - `UnsupportedUnit` when either unit is missing from the table
    /// - `IncompatibleDimension` when the units belong to different groups
    pub fn convert(&self, quantity: f64, from_unit: &str, to_unit: &str) -> Result<f64, CostingError> {
        let from = self
            .get(from_unit)
            .ok_or_else(|| CostingError::UnsupportedUnit(from_unit.to_string()))?;
        let to = self
            .get(to_unit)
            .ok_or_else(|| CostingError::UnsupportedUnit(to_unit.to_string()))?;

        if from.group != to.group {
            return Err(CostingError::IncompatibleDimension {
                from: from.name.clone(),
                to: to.name.clone(),
            });
        }

        let converted = quantity * from.factor / to.factor;
        trace!(quantity, from = %from.name, to = %to.name, converted, "Converted quantity");
        Ok(converted)
    }
}

impl Default for UnitTable {
    fn default() -> Self {
        Self::standard()
    }
}
