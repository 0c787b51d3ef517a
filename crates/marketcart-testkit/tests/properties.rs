//! Property tests: the live store against the reference model.

use proptest::prelude::*;

use marketcart::{CartStore, MemoryStorage, Product};
use marketcart_core::CartSnapshot;
use marketcart_testkit::{cart_ops, product_id, CartModel, TestFixture};

fn detached_store() -> CartStore {
    // Opened outside a runtime: no background writer, mutations only.
    CartStore::with_storage(MemoryStorage::new())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn store_follows_model(ops in cart_ops(80)) {
        let store = detached_store();
        let mut model = CartModel::new();

        for op in &ops {
            op.apply(&store);
            model.apply(op);

            let snapshot = store.snapshot();
            prop_assert!(model.matches(&snapshot), "diverged after {:?}: {:?}", op, snapshot);
            prop_assert!(snapshot.iter().all(|item| item.quantity > 0));
        }
    }

    #[test]
    fn derived_totals_track_latest_snapshot(ops in cart_ops(60)) {
        let store = detached_store();
        let items = store.watch_total_items();
        let price = store.watch_total_price();

        for op in &ops {
            op.apply(&store);
            let snapshot = store.snapshot();

            let expected_items: u64 = snapshot.iter().map(|i| u64::from(i.quantity)).sum();
            let expected_price: f64 = snapshot.iter().map(|i| i.price * f64::from(i.quantity)).sum();
            prop_assert_eq!(items.get(), expected_items);
            prop_assert_eq!(price.get(), expected_price);
        }
    }

    #[test]
    fn distinct_ids_give_one_line_each(
        ids in prop::collection::hash_set("[a-z0-9]{1,8}", 0..24),
        reverse in any::<bool>(),
    ) {
        let store = detached_store();
        let mut ids: Vec<String> = ids.into_iter().collect();
        if reverse {
            ids.reverse();
        }

        for id in &ids {
            store.add_or_update(&Product::new(id.as_str(), 1.0, 1), None);
        }
        prop_assert_eq!(store.len(), ids.len());
    }

    #[test]
    fn remove_twice_equals_remove_once(ops in cart_ops(30), id in product_id()) {
        let store = detached_store();
        for op in &ops {
            op.apply(&store);
        }

        store.remove(id.as_str());
        let once = store.snapshot();
        store.remove(id.as_str());
        prop_assert_eq!(store.snapshot(), once);
    }

    #[test]
    fn flush_then_reload_round_trips(ops in cart_ops(40)) {
        let fixture = TestFixture::new();
        let store = fixture.open();
        for op in &ops {
            op.apply(&store);
        }
        store.flush().unwrap();

        let reloaded = fixture.open().snapshot();
        let original = store.snapshot();
        prop_assert_eq!(reloaded.len(), original.len());
        for (a, b) in reloaded.iter().zip(original.iter()) {
            prop_assert_eq!(&a.id, &b.id);
            prop_assert_eq!(a.quantity, b.quantity);
            prop_assert_eq!(a.price, b.price);
        }
    }

    #[test]
    fn arbitrary_blobs_never_panic_on_load(blob in ".{0,64}") {
        let store = CartStore::with_storage(MemoryStorage::with_entry("cart", blob));
        let snapshot: CartSnapshot = store.snapshot();
        prop_assert!(snapshot.iter().all(|item| item.quantity > 0));
    }
}
