use console::style;
use rust_decimal::{Decimal, RoundingStrategy};
use tabled::{Table, Tabled, settings::{Style, Alignment}};

use crate::models::{CartSummary, LineItem};

#[derive(Tabled)]
struct CartTableRow {
    #[tabled(rename = "ID")]
    id: u32,
    #[tabled(rename = "Product")]
    name: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Price")]
    unit_price: String,
    #[tabled(rename = "Qty")]
    quantity: u32,
    #[tabled(rename = "Total")]
    line_total: String,
    #[tabled(rename = "Stock")]
    stock: String,
}

/// Brazilian real: `R$ 1.234,56`.
pub fn format_brl(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    let plain = format!("{:.2}", rounded.abs());
    let (whole, cents) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (index, digit) in whole.chars().enumerate() {
        if index > 0 && (whole.len() - index) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    format!("{}R$ {},{}", sign, grouped, cents)
}

pub fn format_item_count(count: u64) -> String {
    if count == 1 {
        "1 item".to_string()
    } else {
        format!("{} items", count)
    }
}

/// One-line summary for narrow layouts.
pub fn format_compact_summary(summary: &CartSummary) -> String {
    format!(
        "{} · Total: {}",
        format_item_count(summary.item_count),
        format_brl(summary.total)
    )
}

pub fn format_cart_table(items: &[LineItem]) -> String {
    if items.is_empty() {
        return String::new();
    }

    let rows: Vec<CartTableRow> = items
        .iter()
        .map(|item| CartTableRow {
            id: item.id,
            name: truncate(&item.name, 30),
            category: truncate(&item.category, 24),
            unit_price: format_brl(item.unit_price),
            quantity: item.quantity,
            line_total: format_line_total(item),
            stock: item.stock_label.clone(),
        })
        .collect();

    let mut table = Table::new(rows);
    table
        .with(Style::rounded())
        .with(Alignment::left());

    table.to_string()
}

fn format_line_total(item: &LineItem) -> String {
    item.line_total()
        .map(format_brl)
        .unwrap_or_else(|| "n/a".to_string())
}

pub fn format_row(item: &LineItem) -> String {
    format!(
        "#{} {} · {} × {} = {}",
        style(item.id).dim(),
        style(&item.name).green(),
        format_brl(item.unit_price),
        style(item.quantity).yellow(),
        style(format_line_total(item)).bold()
    )
}

pub fn format_summary(summary: &CartSummary, coupon_code: Option<&str>) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "{}: {}\n",
        style("Items").bold(),
        format_item_count(summary.item_count)
    ));
    output.push_str(&format!(
        "{}: {}\n",
        style("Subtotal").bold(),
        format_brl(summary.subtotal)
    ));

    if summary.has_discount() {
        let label = match coupon_code {
            Some(code) => format!("Discount ({})", code),
            None => "Discount".to_string(),
        };
        output.push_str(&format!(
            "{}: {}\n",
            style(label).bold(),
            style(format!("- {}", format_brl(summary.discount))).green()
        ));
    }

    output.push_str(&format!(
        "{}: {}\n",
        style("Total").bold(),
        style(format_brl(summary.total)).cyan().bold()
    ));

    output
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let cut: String = text.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", cut)
    } else {
        text.to_string()
    }
}
