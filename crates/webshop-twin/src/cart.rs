//! Shopping cart kept in the visitor's session.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, Product};

/// Largest quantity a cart line may hold
pub const MAX_QUANTITY: u32 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub id: u32,
    pub product_id: u32,
    pub quantity: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
    next_line_id: u32,
}

impl Cart {
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total number of units, as shown in the header counter.
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|line| line.quantity).sum()
    }

    /// Adds units of a product, merging into an existing line.
    ///
    /// A line never holds more than [`MAX_QUANTITY`] units.
    pub fn add(&mut self, product_id: u32, quantity: u32) {
        if quantity == 0 {
            return;
        }
        if let Some(line) = self.lines.iter_mut().find(|l| l.product_id == product_id) {
            line.quantity = line.quantity.saturating_add(quantity).min(MAX_QUANTITY);
            return;
        }
        self.next_line_id += 1;
        self.lines.push(CartLine {
            id: self.next_line_id,
            product_id,
            quantity: quantity.min(MAX_QUANTITY),
        });
    }

    /// Sets a line's quantity, capped at [`MAX_QUANTITY`]. Zero removes the line.
    pub fn set_quantity(&mut self, line_id: u32, quantity: u32) {
        if quantity == 0 {
            self.lines.retain(|l| l.id != line_id);
        } else if let Some(line) = self.lines.iter_mut().find(|l| l.id == line_id) {
            line.quantity = quantity.min(MAX_QUANTITY);
        }
    }

    pub fn remove(&mut self, line_ids: &[u32]) {
        self.lines.retain(|l| !line_ids.contains(&l.id));
    }

    /// Lines joined with their products; lines for unknown products are skipped.
    pub fn resolve<'a>(&self, catalog: &'a Catalog) -> Vec<(CartLine, &'a Product)> {
        self.lines
            .iter()
            .filter_map(|line| {
                catalog
                    .product_by_id(line.product_id)
                    .map(|product| (*line, product))
            })
            .collect()
    }

    pub fn subtotal(&self, catalog: &Catalog) -> Decimal {
        self.resolve(catalog)
            .iter()
            .map(|(line, product)| line_total(product.price, line.quantity))
            .sum()
    }
}

pub fn line_total(unit_price: Decimal, quantity: u32) -> Decimal {
    unit_price * Decimal::from(quantity)
}
