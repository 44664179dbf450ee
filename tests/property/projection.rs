//! Name projection keeps every element, in upstream order.

use proptest::prelude::*;
use reservation_client::{Reservation, Resources};
use serde_json::json;

fn names() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[A-Za-z][A-Za-z ]{0,15}", 0..20)
}

proptest! {
    #[test]
    fn content_projection_preserves_order(names in names()) {
        let body = json!({
            "content": names.iter().map(|n| json!({ "name": n })).collect::<Vec<_>>()
        });
        let resources: Resources<Reservation> = serde_json::from_value(body).unwrap();

        prop_assert_eq!(resources.names(), names);
    }

    #[test]
    fn hal_projection_matches_content_projection(names in names()) {
        let items: Vec<_> = names.iter().map(|n| json!({ "name": n })).collect();
        let plain: Resources<Reservation> =
            serde_json::from_value(json!({ "content": items.clone() })).unwrap();
        let hal: Resources<Reservation> =
            serde_json::from_value(json!({ "_embedded": { "reservations": items } })).unwrap();

        prop_assert_eq!(plain.names(), hal.names());
    }

    #[test]
    fn projection_is_repeatable(names in names()) {
        let resources: Resources<Reservation> =
            names.iter().map(|n| Reservation::new(n.clone())).collect();

        prop_assert_eq!(resources.names(), resources.names());
        prop_assert_eq!(resources.content().len(), names.len());
    }
}
