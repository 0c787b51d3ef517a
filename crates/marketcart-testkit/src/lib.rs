//! # marketcart testkit
//!
//! Testing utilities for marketcart.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Generators**: Proptest strategies for products and cart operations
//! - **Model**: A naive reference cart to check the store against
//! - **Fixtures**: Recording and failing storages, a sample catalog
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use marketcart_testkit::{cart_ops, CartModel};
//! use marketcart_core::CartSnapshot;
//!
//! proptest! {
//!     #[test]
//!     fn cart_follows_model(ops in cart_ops(50)) {
//!         let mut model = CartModel::new();
//!         let mut cart = CartSnapshot::empty();
//!         for op in &ops {
//!             model.apply(op);
//!             cart = op.apply_to_snapshot(&cart).0;
//!             prop_assert!(model.matches(&cart));
//!         }
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use marketcart_testkit::TestFixture;
//!
//! let fixture = TestFixture::new();
//! let cart = fixture.open();
//! assert!(cart.is_empty());
//! ```

pub mod fixtures;
pub mod generators;
pub mod model;

pub use fixtures::{sample_catalog, FailingStorage, RecordingStorage, TestFixture};
pub use generators::{cart_ops, product, product_id, CartOp};
pub use model::{CartModel, ModelLine};
