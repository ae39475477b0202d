//! Report module for rendering cost sheets and unit tables as text

use crate::costing::{RowCost, RowStatus};
use crate::currency::format_currency;
use crate::localization::LocalizationManager;
use crate::recipe::CostSheet;
use crate::units::{DimensionGroup, UnitTable};

/// Display text for one derived cost of a row
///
/// Computed values are shown as currency, empty rows stay blank and rows in
/// error show the localized N/A label.
pub fn cost_display(cost: &RowCost, value: f64, symbol: &str, not_available: &str) -> String {
    match cost.status {
        RowStatus::Ok => format_currency(value, symbol),
        RowStatus::Empty => String::new(),
        RowStatus::Error => not_available.to_string(),
    }
}

fn amount_display(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Format a cost sheet as a numbered list followed by the totals
pub fn format_cost_sheet(
    sheet: &CostSheet,
    localization: &LocalizationManager,
    language: &str,
    symbol: &str,
) -> String {
    let t = |key: &str| localization.get_message_in_language(key, language, None);
    let not_available = t("status-not-available");

    let mut result = String::new();
    result.push_str(&localization.get_message_with_args(
        "sheet-title",
        language,
        &[("recipe_name", sheet.recipe_name.as_str())],
    ));
    result.push('\n');
    let timestamp = sheet.computed_at.format("%Y-%m-%d %H:%M UTC").to_string();
    result.push_str(&localization.get_message_with_args(
        "sheet-computed-at",
        language,
        &[("timestamp", timestamp.as_str())],
    ));
    result.push_str("\n\n");

    let unknown_ingredient = t("unknown-ingredient");
    let name_display = |name: &str| {
        if name.is_empty() {
            format!("❓ {unknown_ingredient}")
        } else {
            name.to_string()
        }
    };

    for (i, line) in sheet.lines.iter().enumerate() {
        let ingredient_display = name_display(&line.ingredient);

        let price_display = line
            .row
            .ap_price
            .map(|price| format_currency(price, symbol))
            .unwrap_or_default();

        result.push_str(&format!(
            "{}. {}: {} {} {} | {} {}% | {} {} {} @ {} | {} {} | {} {} | {} {}\n",
            i + 1,
            ingredient_display,
            t("column-ep"),
            amount_display(line.row.ep_quantity),
            line.row.ep_unit,
            t("column-yield"),
            amount_display(line.row.yield_percent),
            t("column-ap"),
            amount_display(line.row.ap_quantity),
            line.row.ap_unit,
            price_display,
            t("column-ap-unit-cost"),
            cost_display(&line.cost, line.cost.ap_unit_cost, symbol, &not_available),
            t("column-ep-unit-cost"),
            cost_display(&line.cost, line.cost.ep_unit_cost, symbol, &not_available),
            t("column-extended-cost"),
            cost_display(&line.cost, line.cost.extended_cost, symbol, &not_available),
        ));
    }

    let unavailable: Vec<String> = sheet
        .unavailable_lines()
        .map(|line| name_display(&line.ingredient))
        .collect();
    if !unavailable.is_empty() {
        let count = unavailable.len().to_string();
        let ingredients = unavailable.join(", ");
        result.push('\n');
        result.push_str(&localization.get_message_with_args(
            "unavailable-notice",
            language,
            &[("count", count.as_str()), ("ingredients", ingredients.as_str())],
        ));
        result.push('\n');
    }

    let totals = &sheet.totals;
    result.push('\n');
    result.push_str(&format!("{}: {}\n", t("portions"), totals.portions));
    result.push_str(&format!("{}: {}%\n", t("spice-factor"), totals.spice_factor_percent));
    result.push_str(&format!(
        "{}: {}\n",
        t("total-cost"),
        format_currency(totals.total_cost, symbol)
    ));
    result.push_str(&format!(
        "{}: {}\n",
        t("cost-per-portion"),
        format_currency(totals.cost_per_portion, symbol)
    ));
    result.push_str(&format!(
        "{}: {}\n",
        t("total-with-spice"),
        format_currency(totals.total_with_spice, symbol)
    ));

    result
}

/// List the units of a table, grouped by dimension
pub fn format_unit_table(table: &UnitTable, localization: &LocalizationManager, language: &str) -> String {
    let mut result = String::new();
    result.push_str(&localization.get_message_in_language("units-title", language, None));
    result.push('\n');

    for group in DimensionGroup::ALL {
        let units: Vec<&str> = table
            .units_in_group(group)
            .map(|def| def.name.as_str())
            .collect();
        if units.is_empty() {
            continue;
        }

        let label = localization.get_message_in_language(
            &format!("group-{}", group.as_str()),
            language,
            None,
        );
        result.push_str(&format!("  {}: {}\n", label, units.join(", ")));
    }

    result
}

/// One line describing a conversion result
pub fn format_conversion(
    localization: &LocalizationManager,
    language: &str,
    quantity: f64,
    from_unit: &str,
    converted: f64,
    to_unit: &str,
) -> String {
    let quantity = quantity.to_string();
    let converted = converted.to_string();
    localization.get_message_with_args(
        "convert-result",
        language,
        &[
            ("quantity", quantity.as_str()),
            ("from", from_unit),
            ("converted", converted.as_str()),
            ("to", to_unit),
        ],
    )
}
