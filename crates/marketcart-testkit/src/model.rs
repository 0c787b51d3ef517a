//! A reference model of cart semantics.
//!
//! Deliberately naive: a list of `(id, price, quantity)` rows updated with
//! plain integer arithmetic. Property tests run the same operations against
//! the model and the real store and compare the results.

use marketcart_core::{CartSnapshot, ProductId};

use crate::generators::CartOp;

/// One row of the model.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelLine {
    pub id: ProductId,
    pub price: f64,
    pub quantity: i64,
}

/// Reference cart.
#[derive(Debug, Clone, Default)]
pub struct CartModel {
    lines: Vec<ModelLine>,
}

impl CartModel {
    /// An empty model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one operation.
    pub fn apply(&mut self, op: &CartOp) {
        match op {
            CartOp::Add(product) => {
                self.add(&product.id, product.price, product.quantity, product.quantity);
            }
            CartOp::Step(product, step) => {
                self.add(&product.id, product.price, step.delta(), step.delta());
            }
            CartOp::Increment(id) => self.bump(id, 1),
            CartOp::Decrement(id) => self.bump(id, -1),
            CartOp::Remove(id) => self.lines.retain(|line| &line.id != id),
            CartOp::Clear => self.lines.clear(),
        }
    }

    fn add(&mut self, id: &ProductId, price: f64, new_quantity: i64, delta: i64) {
        if id.as_str().trim().is_empty() {
            return;
        }
        if self.lines.iter().any(|line| &line.id == id) {
            self.bump(id, delta);
        } else if price >= 0.0 && new_quantity > 0 {
            self.lines.push(ModelLine {
                id: id.clone(),
                price,
                quantity: new_quantity,
            });
        }
    }

    fn bump(&mut self, id: &ProductId, delta: i64) {
        if let Some(line) = self.lines.iter_mut().find(|line| &line.id == id) {
            line.quantity += delta;
        }
        self.lines.retain(|line| line.quantity > 0);
    }

    /// Rows in insertion order.
    pub fn lines(&self) -> &[ModelLine] {
        &self.lines
    }

    /// Sum of quantities.
    pub fn total_items(&self) -> u64 {
        self.lines.iter().map(|line| line.quantity as u64).sum()
    }

    /// Sum of `price * quantity`.
    pub fn total_price(&self) -> f64 {
        self.lines
            .iter()
            .map(|line| line.price * line.quantity as f64)
            .sum()
    }

    /// Whether a snapshot holds exactly the model's rows, in order.
    pub fn matches(&self, snapshot: &CartSnapshot) -> bool {
        self.lines.len() == snapshot.len()
            && self.lines.iter().zip(snapshot.iter()).all(|(line, item)| {
                line.id == item.id
                    && line.price == item.price
                    && line.quantity == i64::from(item.quantity)
            })
    }
}
