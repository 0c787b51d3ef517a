//! Proptest generators for property-based testing.

use proptest::prelude::*;

use marketcart::CartStore;
use marketcart_core::{CartChange, CartSnapshot, Product, ProductId, Step};

/// Generate an id from a small pool so operations collide often.
pub fn product_id() -> impl Strategy<Value = ProductId> {
    "p[0-7]".prop_map(ProductId::new)
}

/// Generate an id that is never usable as a cart key.
pub fn blank_product_id() -> impl Strategy<Value = ProductId> {
    "[ \t]{0,3}".prop_map(ProductId::new)
}

/// Generate a whole-unit price, so sums stay exact.
pub fn price() -> impl Strategy<Value = f64> {
    (0u32..=500).prop_map(f64::from)
}

/// Generate a signed quantity delta.
pub fn quantity_delta() -> impl Strategy<Value = i64> {
    -3i64..=5
}

/// Generate a display name.
pub fn display_name() -> impl Strategy<Value = String> {
    "[A-Z][a-z]{2,10}".prop_map(String::from)
}

/// Generate a product with a usable id.
pub fn product() -> impl Strategy<Value = Product> {
    (product_id(), price(), quantity_delta(), display_name()).prop_map(
        |(id, price, quantity, name)| Product::new(id, price, quantity).name(name),
    )
}

/// Generate a stepper direction.
pub fn step() -> impl Strategy<Value = Step> {
    any::<bool>().prop_map(Step::from)
}

/// One operation against a cart.
#[derive(Debug, Clone)]
pub enum CartOp {
    /// `add_or_update(product, None)`
    Add(Product),
    /// `add_or_update(product, Some(step))`
    Step(Product, Step),
    /// `increment(id)`
    Increment(ProductId),
    /// `decrement(id)`
    Decrement(ProductId),
    /// `remove(id)`
    Remove(ProductId),
    /// `clear()`
    Clear,
}

impl CartOp {
    /// Apply to a live store.
    pub fn apply(&self, store: &CartStore) -> CartChange {
        match self {
            CartOp::Add(product) => store.add_or_update(product, None),
            CartOp::Step(product, step) => store.add_or_update(product, Some(*step)),
            CartOp::Increment(id) => store.increment(id.as_str()),
            CartOp::Decrement(id) => store.decrement(id.as_str()),
            CartOp::Remove(id) => store.remove(id.as_str()),
            CartOp::Clear => store.clear(),
        }
    }

    /// Apply to a bare snapshot.
    pub fn apply_to_snapshot(&self, snapshot: &CartSnapshot) -> (CartSnapshot, CartChange) {
        match self {
            CartOp::Add(product) => snapshot.add_or_update(product, None),
            CartOp::Step(product, step) => snapshot.add_or_update(product, Some(*step)),
            CartOp::Increment(id) => snapshot.step(id.as_str(), Step::Increment),
            CartOp::Decrement(id) => snapshot.step(id.as_str(), Step::Decrement),
            CartOp::Remove(id) => snapshot.remove(id.as_str()),
            CartOp::Clear => snapshot.cleared(),
        }
    }
}

impl Arbitrary for CartOp {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        prop_oneof![
            6 => product().prop_map(CartOp::Add),
            4 => (product(), step()).prop_map(|(p, s)| CartOp::Step(p, s)),
            1 => (blank_product_id(), price(), quantity_delta())
                .prop_map(|(id, price, qty)| CartOp::Add(Product::new(id, price, qty))),
            3 => product_id().prop_map(CartOp::Increment),
            3 => product_id().prop_map(CartOp::Decrement),
            2 => product_id().prop_map(CartOp::Remove),
            1 => Just(CartOp::Clear),
        ]
        .boxed()
    }
}

/// Generate a sequence of operations.
pub fn cart_ops(max_len: usize) -> impl Strategy<Value = Vec<CartOp>> {
    prop::collection::vec(any::<CartOp>(), 0..=max_len)
}
