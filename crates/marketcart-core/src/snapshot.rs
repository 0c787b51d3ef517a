//! Cart snapshots and the cart algebra.
//!
//! A [`CartSnapshot`] is immutable. Every operation here takes a snapshot and
//! returns a new one together with a [`CartChange`] describing what happened.
//! Nothing in this module performs I/O; the reactive store layers
//! publication and persistence on top of it.
//!
//! # Invariants
//!
//! Every snapshot produced by this module satisfies:
//!
//! - at most one line item per product id;
//! - every line item has `quantity > 0`;
//! - every line item has a usable id and a finite, non-negative price.

use std::collections::HashMap;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use crate::item::{is_valid_price, CartLineItem, Product, Step};

/// Aggregates derived from a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Totals {
    /// Sum of quantities over all line items.
    pub items: u64,
    /// Sum of `price * quantity` over all line items.
    pub price: f64,
}

/// Why a mutation was not applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IgnoreReason {
    /// The product id is empty or whitespace.
    InvalidId,
    /// The unit price is negative or not a finite number.
    InvalidPrice,
    /// A new line item would start at zero or fewer units.
    NonPositiveQuantity,
}

impl fmt::Display for IgnoreReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IgnoreReason::InvalidId => f.write_str("product id is blank"),
            IgnoreReason::InvalidPrice => f.write_str("unit price is negative or not finite"),
            IgnoreReason::NonPositiveQuantity => f.write_str("quantity to add is not positive"),
        }
    }
}

/// Outcome of a cart mutation.
///
/// None of these are errors: removing an unknown id is `Unchanged`, and
/// decrementing past zero is `Removed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartChange {
    /// A new line item was appended with this quantity.
    Added { quantity: u32 },
    /// An existing line item now has this quantity.
    Updated { quantity: u32 },
    /// A line item left the cart.
    Removed,
    /// The cart was emptied; `removed` line items were dropped.
    Cleared { removed: usize },
    /// Nothing to do (e.g. removing an id that isn't in the cart).
    Unchanged,
    /// The input was rejected.
    Ignored(IgnoreReason),
}

impl CartChange {
    /// Whether the snapshot contents differ after this change.
    pub fn is_modified(&self) -> bool {
        match self {
            CartChange::Added { .. } | CartChange::Updated { .. } | CartChange::Removed => true,
            CartChange::Cleared { removed } => *removed > 0,
            CartChange::Unchanged | CartChange::Ignored(_) => false,
        }
    }
}

/// Counts of records repaired while building a snapshot from stored data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Normalization {
    /// Records dropped for a blank id, zero quantity or invalid price.
    pub dropped: usize,
    /// Records folded into an earlier record with the same id.
    pub merged: usize,
}

impl Normalization {
    /// Whether any record was dropped or merged.
    pub fn is_clean(&self) -> bool {
        self.dropped == 0 && self.merged == 0
    }
}

/// The ordered line items of a cart at a point in time.
///
/// Cloning is cheap: the items live behind a shared, immutable slice.
#[derive(Clone, PartialEq)]
pub struct CartSnapshot {
    items: Arc<[CartLineItem]>,
}

impl CartSnapshot {
    /// An empty cart.
    pub fn empty() -> Self {
        Self::from_vec(Vec::new())
    }

    fn from_vec(items: Vec<CartLineItem>) -> Self {
        Self {
            items: Arc::from(items),
        }
    }

    /// Build a snapshot from untrusted records, repairing invariant
    /// violations.
    ///
    /// Records with a blank id, a zero quantity or an invalid price are
    /// dropped. Decoding floors negative stored quantities to zero, so those
    /// are dropped here too. Records repeating an earlier id are merged into the first
    /// occurrence by summing quantities (saturating).
    pub fn from_records(records: Vec<CartLineItem>) -> (Self, Normalization) {
        let mut report = Normalization::default();
        let mut items: Vec<CartLineItem> = Vec::with_capacity(records.len());
        let mut index: HashMap<String, usize> = HashMap::with_capacity(records.len());

        for record in records {
            if !record.id.is_usable() || record.quantity == 0 || !is_valid_price(record.price) {
                report.dropped += 1;
                continue;
            }

            let seen = index.get(record.id.as_str()).copied();
            match seen {
                Some(pos) => {
                    let existing = &mut items[pos];
                    existing.quantity = existing.quantity.saturating_add(record.quantity);
                    report.merged += 1;
                }
                None => {
                    index.insert(record.id.as_str().to_owned(), items.len());
                    items.push(record);
                }
            }
        }

        (Self::from_vec(items), report)
    }

    /// The line items, in insertion order.
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// Copy the line items out.
    pub fn to_vec(&self) -> Vec<CartLineItem> {
        self.items.to_vec()
    }

    /// Find a line item by product id.
    pub fn get(&self, id: &str) -> Option<&CartLineItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Whether a product is in the cart.
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Sum of quantities.
    pub fn total_items(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Sum of `price * quantity`.
    pub fn total_price(&self) -> f64 {
        self.items.iter().map(CartLineItem::subtotal).sum()
    }

    /// Both aggregates at once.
    pub fn totals(&self) -> Totals {
        Totals {
            items: self.total_items(),
            price: self.total_price(),
        }
    }

    /// Whether two snapshots share the same backing storage.
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.items, &b.items)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Algebra
    // ─────────────────────────────────────────────────────────────────────────

    /// Add a product or adjust the quantity of its existing line item.
    ///
    /// - Unknown id, no step: append with `product.quantity` units.
    /// - Unknown id, [`Step::Increment`]: append with one unit.
    /// - Unknown id, [`Step::Decrement`]: nothing to take away.
    /// - Known id: adjust by the step, or by `product.quantity` when no step
    ///   is given. The stored display fields are kept.
    ///
    /// A line item whose quantity would drop to zero or below is removed.
    pub fn add_or_update(&self, product: &Product, step: Option<Step>) -> (Self, CartChange) {
        if !product.id.is_usable() {
            return (self.clone(), CartChange::Ignored(IgnoreReason::InvalidId));
        }

        let delta = step.map_or(product.quantity, Step::delta);

        let Some(pos) = self.position(product.id.as_str()) else {
            if !product.has_valid_price() {
                return (self.clone(), CartChange::Ignored(IgnoreReason::InvalidPrice));
            }
            if delta <= 0 {
                return (
                    self.clone(),
                    CartChange::Ignored(IgnoreReason::NonPositiveQuantity),
                );
            }

            let quantity = u32::try_from(delta).unwrap_or(u32::MAX);
            let mut items = Vec::with_capacity(self.items.len() + 1);
            items.extend_from_slice(&self.items);
            items.push(CartLineItem::from_product(product, quantity));
            return (Self::from_vec(items), CartChange::Added { quantity });
        };

        self.adjust(pos, delta)
    }

    /// Step the quantity of a line item already in the cart.
    ///
    /// `Unchanged` when the id isn't in the cart.
    pub fn step(&self, id: &str, step: Step) -> (Self, CartChange) {
        match self.position(id) {
            Some(pos) => self.adjust(pos, step.delta()),
            None => (self.clone(), CartChange::Unchanged),
        }
    }

    /// Remove the line item with this id, if present.
    pub fn remove(&self, id: &str) -> (Self, CartChange) {
        if !self.contains(id) {
            return (self.clone(), CartChange::Unchanged);
        }

        let items: Vec<CartLineItem> = self
            .items
            .iter()
            .filter(|item| item.id != id)
            .cloned()
            .collect();
        (Self::from_vec(items), CartChange::Removed)
    }

    /// Empty the cart.
    pub fn cleared(&self) -> (Self, CartChange) {
        let removed = self.items.len();
        (Self::empty(), CartChange::Cleared { removed })
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    fn adjust(&self, pos: usize, delta: i64) -> (Self, CartChange) {
        let mut items = self.items.to_vec();
        match items[pos].adjusted_quantity(delta) {
            Some(quantity) => {
                items[pos].quantity = quantity;
                (Self::from_vec(items), CartChange::Updated { quantity })
            }
            None => {
                items.remove(pos);
                (Self::from_vec(items), CartChange::Removed)
            }
        }
    }
}

impl Default for CartSnapshot {
    fn default() -> Self {
        Self::empty()
    }
}

impl Deref for CartSnapshot {
    type Target = [CartLineItem];

    fn deref(&self) -> &Self::Target {
        &self.items
    }
}

impl fmt::Debug for CartSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.items.iter()).finish()
    }
}

impl<'a> IntoIterator for &'a CartSnapshot {
    type Item = &'a CartLineItem;
    type IntoIter = std::slice::Iter<'a, CartLineItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn product(id: &str, price: f64, quantity: i64) -> Product {
        Product::new(id, price, quantity)
    }

    #[test]
    fn test_add_same_product_twice_merges() {
        let cart = CartSnapshot::empty();
        let (cart, c1) = cart.add_or_update(&product("p1", 10.0, 1), None);
        let (cart, c2) = cart.add_or_update(&product("p1", 10.0, 1), None);

        assert_eq!(c1, CartChange::Added { quantity: 1 });
        assert_eq!(c2, CartChange::Updated { quantity: 2 });
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.get("p1").unwrap().quantity, 2);
        assert_eq!(cart.total_price(), 20.0);
    }

    #[test]
    fn test_step_down_removes_at_zero() {
        let p1 = product("p1", 4.0, 1);
        let (cart, _) = CartSnapshot::empty().add_or_update(&p1, None);
        let (cart, up) = cart.add_or_update(&p1, Some(Step::Increment));
        assert_eq!(up, CartChange::Updated { quantity: 2 });

        let (cart, down) = cart.add_or_update(&p1, Some(Step::Decrement));
        assert_eq!(down, CartChange::Updated { quantity: 1 });

        let (cart, gone) = cart.add_or_update(&p1, Some(Step::Decrement));
        assert_eq!(gone, CartChange::Removed);
        assert!(cart.is_empty());
        assert_eq!(cart.total_items(), 0);
    }

    #[test]
    fn test_negative_delta_past_zero_removes() {
        let (cart, _) = CartSnapshot::empty().add_or_update(&product("p1", 1.0, 3), None);
        let (cart, change) = cart.add_or_update(&product("p1", 1.0, -7), None);
        assert_eq!(change, CartChange::Removed);
        assert!(!cart.contains("p1"));
    }

    #[test]
    fn test_existing_item_keeps_display_fields() {
        let original = product("p1", 2.0, 1).name("Original");
        let renamed = product("p1", 99.0, 1).name("Renamed");

        let (cart, _) = CartSnapshot::empty().add_or_update(&original, None);
        let (cart, _) = cart.add_or_update(&renamed, None);

        let item = cart.get("p1").unwrap();
        assert_eq!(item.name, "Original");
        assert_eq!(item.price, 2.0);
        assert_eq!(item.quantity, 2);
    }

    #[test]
    fn test_step_on_unknown_product() {
        let p1 = product("p1", 1.0, 0);

        let (cart, change) = CartSnapshot::empty().add_or_update(&p1, Some(Step::Decrement));
        assert_eq!(change, CartChange::Ignored(IgnoreReason::NonPositiveQuantity));
        assert!(cart.is_empty());

        let (cart, change) = cart.add_or_update(&p1, Some(Step::Increment));
        assert_eq!(change, CartChange::Added { quantity: 1 });
        assert_eq!(cart.total_items(), 1);
    }

    #[test]
    fn test_rejected_inputs() {
        let cart = CartSnapshot::empty();

        let (_, change) = cart.add_or_update(&product("", 1.0, 1), None);
        assert_eq!(change, CartChange::Ignored(IgnoreReason::InvalidId));

        let (_, change) = cart.add_or_update(&product("  ", 1.0, 1), None);
        assert_eq!(change, CartChange::Ignored(IgnoreReason::InvalidId));

        let (_, change) = cart.add_or_update(&product("p1", -1.0, 1), None);
        assert_eq!(change, CartChange::Ignored(IgnoreReason::InvalidPrice));

        let (_, change) = cart.add_or_update(&product("p1", f64::NAN, 1), None);
        assert_eq!(change, CartChange::Ignored(IgnoreReason::InvalidPrice));

        let (after, change) = cart.add_or_update(&product("p1", 1.0, 0), None);
        assert_eq!(change, CartChange::Ignored(IgnoreReason::NonPositiveQuantity));
        assert!(after.is_empty());
    }

    #[test]
    fn test_step_by_id() {
        let (cart, _) = CartSnapshot::empty().add_or_update(&product("p1", 1.0, 1), None);

        let (cart, change) = cart.step("p1", Step::Increment);
        assert_eq!(change, CartChange::Updated { quantity: 2 });

        let (same, change) = cart.step("ghost", Step::Increment);
        assert_eq!(change, CartChange::Unchanged);
        assert!(CartSnapshot::ptr_eq(&cart, &same));

        let (cart, _) = cart.step("p1", Step::Decrement);
        let (cart, change) = cart.step("p1", Step::Decrement);
        assert_eq!(change, CartChange::Removed);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_remove_unknown_is_unchanged() {
        let (cart, _) = CartSnapshot::empty().add_or_update(&product("p1", 1.0, 1), None);
        let (after, change) = cart.remove("nope");
        assert_eq!(change, CartChange::Unchanged);
        assert!(CartSnapshot::ptr_eq(&cart, &after));
    }

    #[test]
    fn test_mutation_does_not_touch_previous_snapshot() {
        let (before, _) = CartSnapshot::empty().add_or_update(&product("p1", 1.0, 1), None);
        let (after, _) = before.add_or_update(&product("p1", 1.0, 4), None);

        assert_eq!(before.get("p1").unwrap().quantity, 1);
        assert_eq!(after.get("p1").unwrap().quantity, 5);
        assert!(!CartSnapshot::ptr_eq(&before, &after));
    }

    #[test]
    fn test_clear_and_totals() {
        let (cart, _) = CartSnapshot::empty().add_or_update(&product("p1", 5.0, 2), None);
        let (cart, _) = cart.add_or_update(&product("p2", 3.0, 1), None);
        assert_eq!(
            cart.totals(),
            Totals {
                items: 3,
                price: 13.0
            }
        );

        let (cart, change) = cart.cleared();
        assert_eq!(change, CartChange::Cleared { removed: 2 });
        assert_eq!(cart.totals(), Totals::default());
    }

    #[test]
    fn test_insertion_order_is_kept() {
        let mut cart = CartSnapshot::empty();
        for id in ["c", "a", "b"] {
            cart = cart.add_or_update(&product(id, 1.0, 1), None).0;
        }
        cart = cart.add_or_update(&product("a", 1.0, 1), None).0;

        let ids: Vec<&str> = cart.iter().map(|item| item.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_from_records_repairs_invariants() {
        let good = CartLineItem::from_product(&product("p1", 2.0, 0), 2);
        let dup = CartLineItem::from_product(&product("p1", 2.0, 0), 3);
        let zero = CartLineItem::from_product(&product("p2", 2.0, 0), 0);
        let blank = CartLineItem::from_product(&product("", 2.0, 0), 1);
        let negative = CartLineItem::from_product(&product("p3", -2.0, 0), 1);

        let (cart, report) = CartSnapshot::from_records(vec![good, zero, dup, blank, negative]);
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.get("p1").unwrap().quantity, 5);
        assert_eq!(
            report,
            Normalization {
                dropped: 3,
                merged: 1
            }
        );
        assert!(!report.is_clean());
    }

    #[test]
    fn test_is_modified_tracks_content_changes() {
        let (one, added) = CartSnapshot::empty().add_or_update(&product("p1", 1.0, 1), None);
        assert!(added.is_modified());

        let (two, updated) = one.step("p1", Step::Increment);
        assert!(updated.is_modified());

        let (_, unchanged) = two.remove("missing");
        assert!(!unchanged.is_modified());

        let (_, ignored) = two.add_or_update(&product(" ", 1.0, 1), None);
        assert!(!ignored.is_modified());

        let (empty, cleared) = two.cleared();
        assert!(cleared.is_modified());
        let (_, cleared_empty) = empty.cleared();
        assert_eq!(cleared_empty, CartChange::Cleared { removed: 0 });
        assert!(!cleared_empty.is_modified());

        let (_, removed) = two.remove("p1");
        assert!(removed.is_modified());
    }

    proptest! {
        #[test]
        fn test_distinct_adds_yield_one_line_each(
            ids in prop::collection::hash_set("[a-z]{1,6}", 0..20),
        ) {
            let mut cart = CartSnapshot::empty();
            for id in &ids {
                cart = cart.add_or_update(&product(id, 1.0, 1), None).0;
            }
            prop_assert_eq!(cart.len(), ids.len());
        }

        #[test]
        fn test_quantities_stay_positive(
            deltas in prop::collection::vec(-5i64..=5, 0..40),
        ) {
            let mut cart = CartSnapshot::empty();
            for delta in deltas {
                cart = cart.add_or_update(&product("p", 1.0, delta), None).0;
                prop_assert!(cart.iter().all(|item| item.quantity > 0));
                prop_assert!(cart.len() <= 1);
            }
        }
    }
}
