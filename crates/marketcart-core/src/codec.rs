//! The persisted cart blob.
//!
//! A cart is stored as a JSON array of line-item records:
//!
//! ```json
//! [{"id":"p1","name":"Mug","description":"","price":7.5,"quantity":2,
//!   "userId":"u1","imageMediaIds":["m1"],"imageUrl":"https://..."}]
//! ```
//!
//! There is no version field. Decoding tolerates missing or `null` display
//! fields and rejects the whole blob only when it is not an array of records
//! carrying `id`, `price` and an integer `quantity`. Individual records that
//! parse but are unusable (non-positive quantity, blank id, bad price) are
//! dropped without losing the rest of the cart.

use crate::error::{CodecError, Result};
use crate::item::CartLineItem;
use crate::snapshot::{CartSnapshot, Normalization};

/// A snapshot decoded from storage, with what was repaired on the way.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    pub snapshot: CartSnapshot,
    pub normalization: Normalization,
}

/// Serialize a snapshot to its storage blob.
pub fn encode_snapshot(snapshot: &CartSnapshot) -> Result<String> {
    serde_json::to_string(snapshot.items()).map_err(CodecError::Encode)
}

/// Parse a storage blob into a snapshot.
///
/// Records that parse but break cart invariants are repaired, see
/// [`CartSnapshot::from_records`].
pub fn decode_snapshot(blob: &str) -> Result<Decoded> {
    let records: Vec<CartLineItem> = serde_json::from_str(blob).map_err(CodecError::Decode)?;
    let (snapshot, normalization) = CartSnapshot::from_records(records);
    Ok(Decoded {
        snapshot,
        normalization,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::Product;

    #[test]
    fn test_encode_uses_camel_case_fields() {
        let product = Product::new("p1", 7.5, 2)
            .name("Mug")
            .seller("u1")
            .image_media_id("m1")
            .image_url("https://cdn.example/mug.png");
        let (cart, _) = CartSnapshot::empty().add_or_update(&product, None);

        let blob = encode_snapshot(&cart).unwrap();
        let value: serde_json::Value = serde_json::from_str(&blob).unwrap();
        let record = &value[0];
        assert_eq!(record["id"], "p1");
        assert_eq!(record["quantity"], 2);
        assert_eq!(record["userId"], "u1");
        assert_eq!(record["imageMediaIds"][0], "m1");
        assert_eq!(record["imageUrl"], "https://cdn.example/mug.png");
    }

    #[test]
    fn test_image_url_omitted_when_absent() {
        let (cart, _) = CartSnapshot::empty().add_or_update(&Product::new("p1", 1.0, 1), None);
        let blob = encode_snapshot(&cart).unwrap();
        assert!(!blob.contains("imageUrl"));
    }

    #[test]
    fn test_decode_defaults_missing_display_fields() {
        let decoded = decode_snapshot(r#"[{"id":"p1","price":3,"quantity":4}]"#).unwrap();
        let item = decoded.snapshot.get("p1").unwrap();
        assert_eq!(item.quantity, 4);
        assert_eq!(item.price, 3.0);
        assert!(item.name.is_empty());
        assert!(item.image_media_ids.is_empty());
        assert_eq!(item.image_url, None);
        assert!(decoded.normalization.is_clean());
    }

    #[test]
    fn test_decode_empty_array() {
        let decoded = decode_snapshot("[]").unwrap();
        assert!(decoded.snapshot.is_empty());
    }

    #[test]
    fn test_decode_rejects_wrong_shapes() {
        for blob in [
            "",
            "not json",
            "{}",
            r#"{"id":"p1"}"#,
            "[1, 2, 3]",
            r#"[{"id":"p1","price":1}]"#,
            r#"[{"id":"p1","price":"cheap","quantity":1}]"#,
            r#"[{"id":"p1","price":1,"quantity":1.5}]"#,
        ] {
            assert!(
                matches!(decode_snapshot(blob), Err(CodecError::Decode(_))),
                "blob should be rejected: {blob:?}"
            );
        }
    }

    #[test]
    fn test_decode_accepts_null_display_fields() {
        let blob = r#"[
            {"id":"p1","name":"Lamp","description":null,"price":39,"quantity":1,
             "sellerName":null,"imageMediaIds":null},
            {"id":"p2","name":"Mug","description":"350 ml","price":7.5,"quantity":2,
             "userId":"u1","imageMediaIds":["m1"]}
        ]"#;
        let decoded = decode_snapshot(blob).unwrap();

        assert_eq!(decoded.snapshot.len(), 2);
        let lamp = decoded.snapshot.get("p1").unwrap();
        assert_eq!(lamp.name, "Lamp");
        assert!(lamp.description.is_empty());
        assert!(lamp.image_media_ids.is_empty());
        assert_eq!(decoded.snapshot.total_price(), 54.0);
        assert!(decoded.normalization.is_clean());
    }

    #[test]
    fn test_decode_drops_non_positive_quantities() {
        let blob = r#"[
            {"id":"p1","price":1,"quantity":3},
            {"id":"p2","price":1,"quantity":-1},
            {"id":"p3","price":1,"quantity":0}
        ]"#;
        let decoded = decode_snapshot(blob).unwrap();

        assert_eq!(decoded.snapshot.len(), 1);
        assert_eq!(decoded.snapshot.get("p1").unwrap().quantity, 3);
        assert_eq!(decoded.normalization.dropped, 2);
        assert_eq!(decoded.normalization.merged, 0);
    }

    #[test]
    fn test_roundtrip_preserves_order_and_values() {
        let mut cart = CartSnapshot::empty();
        for (id, price, qty) in [("b", 2.25, 3), ("a", 10.0, 1), ("c", 0.0, 7)] {
            cart = cart.add_or_update(&Product::new(id, price, qty), None).0;
        }

        let blob = encode_snapshot(&cart).unwrap();
        let decoded = decode_snapshot(&blob).unwrap();
        assert_eq!(decoded.snapshot, cart);
    }
}
