//! # Costing Engine Module
//!
//! This module turns ingredient rows into costs.
//!
//! ## Flow
//!
//! 1. The as-purchased (AP) quantity is converted into the edible-portion (EP) unit
//! 2. AP unit cost = AP price / converted AP quantity
//! 3. EP unit cost = AP unit cost / (yield percent / 100)
//! 4. Extended cost = EP unit cost × EP quantity
//! 5. Extended costs are summed, divided by portions and the spice factor applied
//!
//! Every call recomputes from the inputs it is given; nothing is cached.
//!
//! ## Usage
//!
//! ```rust
//! use food_cost::costing::{CostingEngine, IngredientRow, RowStatus};
//!
//! let engine = CostingEngine::default();
//! let row = IngredientRow::new(10.0, "ounces", 80.0, 1.0, "pounds", 2.0);
//! let cost = engine.calculate_row(&row);
//!
//! assert_eq!(cost.status, RowStatus::Ok);
//! assert!((cost.extended_cost - 1.5625).abs() < 1e-9);
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::costing_errors::CostingError;
use crate::units::{UnitTable, DEFAULT_UNIT};

/// Inputs of one ingredient line
///
/// Numeric fields are optional: a field the user has not filled in is `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientRow {
    /// Edible-portion quantity the recipe needs
    #[serde(default, deserialize_with = "lenient::amount")]
    pub ep_quantity: Option<f64>,
    /// Unit of the edible-portion quantity
    #[serde(default = "default_unit", deserialize_with = "lenient::unit")]
    pub ep_unit: String,
    /// Share of the purchased quantity that remains usable, in percent
    #[serde(default, deserialize_with = "lenient::amount")]
    pub yield_percent: Option<f64>,
    /// As-purchased quantity
    #[serde(default, deserialize_with = "lenient::amount")]
    pub ap_quantity: Option<f64>,
    /// Unit of the as-purchased quantity
    #[serde(default = "default_unit", deserialize_with = "lenient::unit")]
    pub ap_unit: String,
    /// Price paid for the as-purchased quantity
    #[serde(default, deserialize_with = "lenient::amount")]
    pub ap_price: Option<f64>,
}

fn default_unit() -> String {
    DEFAULT_UNIT.to_string()
}

impl Default for IngredientRow {
    fn default() -> Self {
        Self {
            ep_quantity: None,
            ep_unit: default_unit(),
            yield_percent: None,
            ap_quantity: None,
            ap_unit: default_unit(),
            ap_price: None,
        }
    }
}

impl IngredientRow {
    /// Create a fully populated row
    pub fn new(
        ep_quantity: f64,
        ep_unit: &str,
        yield_percent: f64,
        ap_quantity: f64,
        ap_unit: &str,
        ap_price: f64,
    ) -> Self {
        Self {
            ep_quantity: Some(ep_quantity),
            ep_unit: ep_unit.to_string(),
            yield_percent: Some(yield_percent),
            ap_quantity: Some(ap_quantity),
            ap_unit: ap_unit.to_string(),
            ap_price: Some(ap_price),
        }
    }

    /// Whether any value the cost depends on is missing or zero
    ///
    /// NaN counts as missing.
    pub fn is_incomplete(&self) -> bool {
        [
            self.ep_quantity,
            self.yield_percent,
            self.ap_quantity,
            self.ap_price,
        ]
        .into_iter()
        .any(|value| !value.is_some_and(is_filled))
    }
}

// Zero and NaN count as not filled in
fn is_filled(value: f64) -> bool {
    value != 0.0 && !value.is_nan()
}

/// Outcome category of a row calculation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowStatus {
    /// All inputs present and the units convert
    Ok,
    /// A required input is missing or zero; costs report as zero
    Empty,
    /// The AP unit cannot be expressed in the EP unit; shown as N/A
    Error,
}

/// Derived costs of one row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowCost {
    /// Price of one EP unit of the purchased product, before trim loss
    pub ap_unit_cost: f64,
    /// Price of one usable EP unit, after trim loss
    pub ep_unit_cost: f64,
    /// Cost of the quantity the recipe needs
    pub extended_cost: f64,
    /// Outcome category
    pub status: RowStatus,
    /// Conversion failure behind an `Error` status
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<CostingError>,
}

impl RowCost {
    /// Costs of a row missing a required input
    pub fn empty() -> Self {
        Self {
            ap_unit_cost: 0.0,
            ep_unit_cost: 0.0,
            extended_cost: 0.0,
            status: RowStatus::Empty,
            error: None,
        }
    }

    /// Costs of a row whose units do not convert
    pub fn failed(error: CostingError) -> Self {
        Self {
            ap_unit_cost: 0.0,
            ep_unit_cost: 0.0,
            extended_cost: 0.0,
            status: RowStatus::Error,
            error: Some(error),
        }
    }

    /// Whether the costs were computed from the inputs
    pub fn is_ok(&self) -> bool {
        self.status == RowStatus::Ok
    }

    /// Extended cost as counted in recipe totals
    ///
    /// Rows that are empty or in error count as zero.
    pub fn contribution(&self) -> f64 {
        match self.status {
            RowStatus::Ok => self.extended_cost,
            RowStatus::Empty | RowStatus::Error => 0.0,
        }
    }
}

/// Totals of a whole recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeTotals {
    /// Number of portions the recipe yields
    pub portions: f64,
    /// Surcharge applied to each portion, in percent
    pub spice_factor_percent: f64,
    /// Sum of the extended costs
    pub total_cost: f64,
    /// Total cost divided by portions, zero without portions
    pub cost_per_portion: f64,
    /// Cost per portion with the spice factor applied
    pub total_with_spice: f64,
}

/// Aggregate row costs into recipe totals
///
/// Rows in `Empty` or `Error` state contribute nothing. With zero (or
/// negative, or NaN) portions the cost per portion is defined as zero.
pub fn calculate_totals(rows: &[RowCost], portions: f64, spice_factor_percent: f64) -> RecipeTotals {
    let total_cost: f64 = rows.iter().map(RowCost::contribution).sum();

    let cost_per_portion = if portions > 0.0 {
        total_cost / portions
    } else {
        0.0
    };

    let total_with_spice = cost_per_portion * (1.0 + spice_factor_percent / 100.0);

    debug!(
        rows = rows.len(),
        total_cost, cost_per_portion, total_with_spice, "Calculated recipe totals"
    );

    RecipeTotals {
        portions,
        spice_factor_percent,
        total_cost,
        cost_per_portion,
        total_with_spice,
    }
}

/// Costing engine holding the unit table it converts with
///
/// The engine is immutable and can be shared between threads; callers
/// invoke it after every input change.
#[derive(Debug, Clone, Default)]
pub struct CostingEngine {
    units: UnitTable,
}

impl CostingEngine {
    /// Create an engine over the given unit table
    pub fn new(units: UnitTable) -> Self {
        Self { units }
    }

    /// The unit table in use
    pub fn units(&self) -> &UnitTable {
        &self.units
    }

    /// Convert a quantity between two units of the engine's table
    pub fn convert(&self, quantity: f64, from_unit: &str, to_unit: &str) -> Result<f64, CostingError> {
        self.units.convert(quantity, from_unit, to_unit)
    }

    /// Compute the costs of one ingredient row
    ///
    /// Never fails: missing inputs give an `Empty` result and unit problems
    /// an `Error` result carrying the conversion error.
    ///
    /// Divisions are not clamped. A tiny yield or AP quantity gives a very
    /// large EP unit cost, and a subnormal one (e.g., a yield of `1e-320`)
    /// overflows to infinity while the status stays `Ok`. JSON has no
    /// infinity, so `serde_json` writes such a cost as `null`.
    pub fn calculate_row(&self, row: &IngredientRow) -> RowCost {
        let (ep_quantity, yield_percent, ap_quantity, ap_price) = match (
            row.ep_quantity,
            row.yield_percent,
            row.ap_quantity,
            row.ap_price,
        ) {
            (Some(ep), Some(yield_pct), Some(ap), Some(price))
                if [ep, yield_pct, ap, price].into_iter().all(is_filled) =>
            {
                (ep, yield_pct, ap, price)
            }
            _ => {
                debug!("Row is missing a required value");
                return RowCost::empty();
            }
        };

        let converted_ap_quantity = match self.convert(ap_quantity, &row.ap_unit, &row.ep_unit) {
            Ok(quantity) => quantity,
            Err(e) => {
                warn!(
                    ap_unit = %row.ap_unit,
                    ep_unit = %row.ep_unit,
                    error = %e,
                    "Row cost not available"
                );
                return RowCost::failed(e);
            }
        };

        let ap_unit_cost = ap_price / converted_ap_quantity;
        let ep_unit_cost = ap_unit_cost / (yield_percent / 100.0);
        let extended_cost = ep_unit_cost * ep_quantity;

        debug!(
            converted_ap_quantity,
            ap_unit_cost, ep_unit_cost, extended_cost, "Calculated row cost"
        );

        RowCost {
            ap_unit_cost,
            ep_unit_cost,
            extended_cost,
            status: RowStatus::Ok,
            error: None,
        }
    }

    /// Compute the costs of several rows, in order
    pub fn calculate_rows<'a>(&self, rows: impl IntoIterator<Item = &'a IngredientRow>) -> Vec<RowCost> {
        rows.into_iter().map(|row| self.calculate_row(row)).collect()
    }

    /// Aggregate row costs into recipe totals
    pub fn calculate_totals(
        &self,
        rows: &[RowCost],
        portions: f64,
        spice_factor_percent: f64,
    ) -> RecipeTotals {
        calculate_totals(rows, portions, spice_factor_percent)
    }
}

/// Tolerant deserializers for values typed into a form
///
/// Amounts may arrive as numbers, numeric text or currency text ("$2.00");
/// null and blank text mean "not filled in".
pub(crate) mod lenient {
    use serde::de::{self, Deserializer, Visitor};
    use std::fmt;

    use crate::currency::parse_price;
    use crate::units::DEFAULT_UNIT;

    struct AmountVisitor;

    impl<'de> Visitor<'de> for AmountVisitor {
        type Value = Option<f64>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a number, numeric text or null")
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
            Ok(Some(v))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
            Ok(Some(v as f64))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
            Ok(Some(v as f64))
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            if v.trim().is_empty() {
                return Ok(None);
            }
            parse_price(v).map(Some).map_err(E::custom)
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
            deserializer.deserialize_any(AmountVisitor)
        }
    }

    pub fn amount<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
        deserializer.deserialize_any(AmountVisitor)
    }

    /// Like [`amount`], with a value not filled in read as zero
    pub fn number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Ok(amount(deserializer)?.unwrap_or(0.0))
    }

    struct UnitVisitor;

    impl<'de> Visitor<'de> for UnitVisitor {
        type Value = String;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a unit name or null")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            let trimmed = v.trim();
            Ok(if trimmed.is_empty() {
                DEFAULT_UNIT.to_string()
            } else {
                trimmed.to_string()
            })
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(DEFAULT_UNIT.to_string())
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(DEFAULT_UNIT.to_string())
        }

        fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
            deserializer.deserialize_any(UnitVisitor)
        }
    }

    pub fn unit<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        deserializer.deserialize_any(UnitVisitor)
    }
}
