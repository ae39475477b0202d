//! # Recipe Module
//!
//! A recipe document (name, portions, spice factor and ingredient lines) and
//! the cost sheet the engine produces for it.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

use crate::costing::lenient;
use crate::costing::{calculate_totals, CostingEngine, IngredientRow, RecipeTotals, RowCost, RowStatus};

/// One ingredient line of a recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeItem {
    /// Ingredient name as typed (e.g., "shallots")
    #[serde(default, deserialize_with = "trimmed")]
    pub ingredient: String,
    /// Quantities, units and price of the line
    #[serde(flatten)]
    pub row: IngredientRow,
}

impl RecipeItem {
    /// Create a recipe line
    pub fn new(ingredient: &str, row: IngredientRow) -> Self {
        Self {
            ingredient: ingredient.trim().to_string(),
            row,
        }
    }
}

/// A recipe as submitted by the costing form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    /// Recipe name
    #[serde(deserialize_with = "trimmed")]
    pub recipe_name: String,
    /// Number of portions the recipe yields
    #[serde(default, deserialize_with = "lenient::number")]
    pub portions: f64,
    /// Surcharge per portion for seasoning, in percent
    #[serde(default, deserialize_with = "lenient::number")]
    pub spice_factor_percent: f64,
    /// Ingredient lines, in entry order
    #[serde(default)]
    pub items: Vec<RecipeItem>,
}

fn trimmed<'de, D: serde::Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let raw = String::deserialize(deserializer)?;
    Ok(raw.trim().to_string())
}

impl Recipe {
    /// Create an empty recipe
    pub fn new(recipe_name: &str, portions: f64, spice_factor_percent: f64) -> Self {
        Self {
            recipe_name: recipe_name.trim().to_string(),
            portions,
            spice_factor_percent,
            items: Vec::new(),
        }
    }

    /// Add an ingredient line
    pub fn with_item(mut self, ingredient: &str, row: IngredientRow) -> Self {
        self.items.push(RecipeItem::new(ingredient, row));
        self
    }

    /// Remove the ingredient line at `index`, if there is one
    pub fn remove_item(&mut self, index: usize) -> Option<RecipeItem> {
        (index < self.items.len()).then(|| self.items.remove(index))
    }

    /// Parse a recipe from its JSON form
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse recipe JSON")
    }

    /// Read a recipe from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!(path = %path.display(), "Loading recipe");

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read recipe file {}", path.display()))?;
        Self::from_json_str(&content)
            .with_context(|| format!("Invalid recipe file {}", path.display()))
    }

    /// Cost every line and aggregate the recipe totals
    pub fn cost(&self, engine: &CostingEngine) -> CostSheet {
        let lines: Vec<CostSheetLine> = self
            .items
            .iter()
            .map(|item| CostSheetLine {
                ingredient: item.ingredient.clone(),
                row: item.row.clone(),
                cost: engine.calculate_row(&item.row),
            })
            .collect();

        let costs: Vec<RowCost> = lines.iter().map(|line| line.cost.clone()).collect();
        let totals = calculate_totals(&costs, self.portions, self.spice_factor_percent);

        let unavailable = lines
            .iter()
            .filter(|line| line.cost.status == RowStatus::Error)
            .count();
        if unavailable > 0 {
            warn!(
                recipe = %self.recipe_name,
                unavailable,
                "Some ingredient costs are not available"
            );
        }

        info!(
            recipe = %self.recipe_name,
            lines = lines.len(),
            total_cost = totals.total_cost,
            "Costed recipe"
        );

        CostSheet {
            recipe_name: self.recipe_name.clone(),
            lines,
            totals,
            computed_at: Utc::now(),
        }
    }
}

/// One costed ingredient line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostSheetLine {
    /// Ingredient name
    pub ingredient: String,
    /// The inputs the costs were computed from
    #[serde(flatten)]
    pub row: IngredientRow,
    /// Computed costs and status
    #[serde(flatten)]
    pub cost: RowCost,
}

/// Costs of a whole recipe at one point in time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostSheet {
    /// Recipe name
    pub recipe_name: String,
    /// Costed lines, in recipe order
    pub lines: Vec<CostSheetLine>,
    /// Aggregated totals
    pub totals: RecipeTotals,
    /// When the sheet was computed
    pub computed_at: DateTime<Utc>,
}

impl CostSheet {
    /// Lines whose cost could not be computed
    pub fn unavailable_lines(&self) -> impl Iterator<Item = &CostSheetLine> {
        self.lines
            .iter()
            .filter(|line| line.cost.status == RowStatus::Error)
    }
}
