//! Receipt
//!
//! Plain-text rendering of order lines and checkout totals.

use std::io;

use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{
        Alignment, Style, Theme,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{orders::OrderLine, pricing::PriceSummary};

/// Errors that can occur when writing a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// IO error
    #[error("IO error")]
    IO(#[from] io::Error),
}

/// Order lines and their totals, ready to be printed.
#[derive(Debug, Clone, Copy)]
pub struct Receipt<'a> {
    lines: &'a [OrderLine],
    summary: &'a PriceSummary,
}

impl<'a> Receipt<'a> {
    /// Create a receipt for `lines` totalled by `summary`.
    pub fn new(lines: &'a [OrderLine], summary: &'a PriceSummary) -> Self {
        Self { lines, summary }
    }

    /// Write the receipt table followed by the subtotal, delivery and total lines.
    ///
    /// # Errors
    ///
    /// Returns [`ReceiptError::IO`] when writing to `out` fails.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReceiptError> {
        let mut builder = Builder::default();

        builder.push_record(["Item", "Color", "Size", "Qty", "Price", "Total"]);

        for line in self.lines {
            builder.push_record([
                line.name.clone(),
                line.color.clone().unwrap_or_else(|| "-".to_string()),
                line.size.clone().unwrap_or_else(|| "-".to_string()),
                line.quantity.to_string(),
                line.price.normalize().to_string(),
                line.total.normalize().to_string(),
            ]);
        }

        let mut table = builder.build();
        let mut theme = Theme::from(Style::modern_rounded());

        theme.remove_horizontal_lines();
        theme.insert_horizontal_line(
            1,
            HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤')),
        );

        table.with(theme);
        table.modify(Columns::new(3..6), Alignment::right());
        table.modify(Rows::first(), Alignment::center());

        writeln!(out, "\n{table}")?;

        write_summary(&mut out, self.summary)?;

        Ok(())
    }
}

fn write_summary(out: &mut impl io::Write, summary: &PriceSummary) -> Result<(), ReceiptError> {
    let rows = [
        (" Subtotal:", summary.subtotal().to_string()),
        (" Delivery:", summary.delivery().to_string()),
        (" Total:", summary.total().to_string()),
    ];

    let label_width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    let value_width = rows.iter().map(|(_, value)| value.len()).max().unwrap_or(0);

    for (label, value) in rows {
        writeln!(out, "{label:<label_width$} {value:>value_width$}")?;
    }

    writeln!(out)?;

    Ok(())
}
