//! Terminal rendering of a converted statement.

use super::ui;
use crate::core::dates::format_lookup_key;
use crate::core::statement::ConversionReport;
use comfy_table::Cell;

pub fn display_as_table(report: &ConversionReport) -> String {
    let mut table = ui::new_styled_table();

    table.set_header(vec![
        ui::header_cell("Date"),
        ui::header_cell("Product"),
        ui::header_cell("Description"),
        ui::header_cell("Interest Rate"),
        ui::header_cell("Money Out"),
        ui::header_cell("Money In"),
        ui::header_cell("Balance"),
        ui::header_cell("NBP Date"),
        ui::header_cell("Rate"),
        ui::header_cell("Profit (PLN)"),
    ]);

    for entry in &report.rows {
        let (nbp_date, rate, profit) = match entry.conversion {
            Some(c) => (
                format_lookup_key(c.lookup_date),
                format!("{:.4}", c.rate),
                format!("{:.2}", c.profit),
            ),
            None => (String::new(), String::new(), String::new()),
        };

        table.add_row(vec![
            Cell::new(&entry.row.completed_date),
            Cell::new(&entry.row.product),
            Cell::new(&entry.row.description),
            ui::numeric_cell(&entry.row.interest_rate),
            ui::numeric_cell(&entry.row.money_out),
            ui::numeric_cell(&entry.row.money_in),
            ui::numeric_cell(&entry.row.balance),
            ui::numeric_cell(&nbp_date),
            ui::numeric_cell(&rate),
            ui::numeric_cell(&profit),
        ]);
    }

    let mut output = table.to_string();
    output.push_str(&format!(
        "\n\n{} {}",
        ui::style_text("Total Profit (PLN):", ui::StyleType::TotalLabel),
        ui::style_text(
            &format!("{:.2}", report.total_profit),
            ui::StyleType::TotalValue
        )
    ));
    output
}
