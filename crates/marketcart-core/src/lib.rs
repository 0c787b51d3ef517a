//! # marketcart core
//!
//! Pure primitives for the marketcart shopping-cart store: line items,
//! snapshots, the cart algebra and the storage blob codec.
//!
//! This crate contains no I/O and no async. Every cart operation is a
//! function from one immutable [`CartSnapshot`] to the next.
//!
//! ## Key Types
//!
//! - [`Product`] - What the catalog hands to the cart
//! - [`CartLineItem`] - One distinct product held in the cart
//! - [`CartSnapshot`] - The ordered line items at a point in time
//! - [`CartChange`] - What a mutation did
//! - [`Totals`] - Item count and price, derived from a snapshot
//!
//! ## Storage Blob
//!
//! Snapshots are persisted as a JSON array of records. See [`codec`].

pub mod codec;
pub mod error;
pub mod item;
pub mod snapshot;
pub mod types;

pub use codec::{decode_snapshot, encode_snapshot, Decoded};
pub use error::CodecError;
pub use item::{is_valid_price, CartLineItem, Product, Step};
pub use snapshot::{CartChange, CartSnapshot, IgnoreReason, Normalization, Totals};
pub use types::ProductId;
