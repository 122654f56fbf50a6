use litecrud_core::{
    DocumentStore, Entity, EntityId, Filter, Product, SortOrder, StoreError,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Supplier {
    id: EntityId,
    name: String,
    address: Address,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    rating: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Address {
    city: String,
}

impl Entity for Supplier {
    const COLLECTION: &'static str = "suppliers";

    fn id(&self) -> EntityId {
        self.id
    }

    fn set_id(&mut self, id: EntityId) {
        self.id = id;
    }
}

/// Tuple map keys cannot be encoded as JSON object keys.
#[derive(Debug, Serialize, Deserialize)]
struct GridSnapshot {
    id: EntityId,
    cells: BTreeMap<(i32, i32), i32>,
}

impl Entity for GridSnapshot {
    const COLLECTION: &'static str = "grids";

    fn id(&self) -> EntityId {
        self.id
    }

    fn set_id(&mut self, id: EntityId) {
        self.id = id;
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Orphan {
    id: EntityId,
}

impl Entity for Orphan {
    const COLLECTION: &'static str = "";

    fn id(&self) -> EntityId {
        self.id
    }

    fn set_id(&mut self, id: EntityId) {
        self.id = id;
    }
}

fn seed_products(store: &DocumentStore, prices: &[f64]) {
    let products = store.collection::<Product>().unwrap();
    for (index, price) in prices.iter().enumerate() {
        let mut product = Product::new(format!("product-{index}"), *price);
        products.insert(&mut product).unwrap();
    }
}

#[test]
fn insert_assigns_sequential_ids_per_collection() {
    let store = DocumentStore::open_in_memory().unwrap();
    let products = store.collection::<Product>().unwrap();

    let mut first = Product::new("Keyboard", 299.9);
    let mut second = Product::new("Mouse", 89.0);
    assert_eq!(products.insert(&mut first).unwrap(), 1);
    assert_eq!(products.insert(&mut second).unwrap(), 2);
    assert_eq!(first.id, 1);
    assert_eq!(second.id, 2);

    let suppliers = store.collection::<Supplier>().unwrap();
    let mut supplier = Supplier {
        id: 0,
        name: "Acme".to_string(),
        address: Address {
            city: "Lisbon".to_string(),
        },
        rating: None,
    };
    assert_eq!(suppliers.insert(&mut supplier).unwrap(), 1);
}

#[test]
fn insert_keeps_explicit_id_and_rejects_duplicates() {
    let store = DocumentStore::open_in_memory().unwrap();
    let products = store.collection::<Product>().unwrap();

    let mut explicit = Product {
        id: 40,
        name: "Monitor".to_string(),
        price: 1200.0,
    };
    assert_eq!(products.insert(&mut explicit).unwrap(), 40);

    let mut next = Product::new("Cable", 10.0);
    assert_eq!(products.insert(&mut next).unwrap(), 41);

    let mut duplicate = explicit.clone();
    let err = products.insert(&mut duplicate).unwrap_err();
    assert!(matches!(err, StoreError::Db(_)));
    assert_eq!(duplicate.id, 40);
}

#[test]
fn failed_insert_leaves_assigned_id_unset() {
    let store = DocumentStore::open_in_memory().unwrap();
    let grids = store.collection::<GridSnapshot>().unwrap();

    let mut snapshot = GridSnapshot {
        id: 0,
        cells: BTreeMap::from([((0, 0), 1)]),
    };
    let err = grids.insert(&mut snapshot).unwrap_err();
    assert!(matches!(err, StoreError::Serialization(_)));
    assert_eq!(snapshot.id, 0);
    assert_eq!(grids.query().count().unwrap(), 0);

    let mut empty = GridSnapshot {
        id: 0,
        cells: BTreeMap::new(),
    };
    assert_eq!(grids.insert(&mut empty).unwrap(), 1);
}

#[test]
fn find_update_delete_by_primary_key() {
    let store = DocumentStore::open_in_memory().unwrap();
    let products = store.collection::<Product>().unwrap();

    let mut product = Product::new("Headset", 150.0);
    let id = products.insert(&mut product).unwrap();

    product.price = 120.0;
    assert!(products.update(&product).unwrap());
    assert_eq!(products.find_by_id(id).unwrap(), Some(product.clone()));

    assert!(products.delete(id).unwrap());
    assert!(!products.delete(id).unwrap());
    assert_eq!(products.find_by_id(id).unwrap(), None);
    assert!(!products.update(&product).unwrap());
}

#[test]
fn query_filters_orders_and_slices() {
    let store = DocumentStore::open_in_memory().unwrap();
    seed_products(&store, &[50.0, 300.0, 120.0, 80.0, 999.0]);
    let products = store.collection::<Product>().unwrap();

    let expensive = products
        .query()
        .filter(Filter::gt("price", 100))
        .order_by("price", SortOrder::Descending);
    assert_eq!(expensive.count().unwrap(), 3);

    let prices: Vec<f64> = expensive
        .skip(1)
        .limit(5)
        .to_list()
        .unwrap()
        .into_iter()
        .map(|product| product.price)
        .collect();
    assert_eq!(prices, vec![300.0, 120.0]);
}

#[test]
fn skip_without_limit_returns_the_tail() {
    let store = DocumentStore::open_in_memory().unwrap();
    seed_products(&store, &[1.0, 2.0, 3.0, 4.0]);
    let products = store.collection::<Product>().unwrap();

    let ids: Vec<EntityId> = products
        .query()
        .skip(2)
        .to_list()
        .unwrap()
        .iter()
        .map(|product| product.id)
        .collect();
    assert_eq!(ids, vec![3, 4]);
}

#[test]
fn repeated_filters_are_combined() {
    let store = DocumentStore::open_in_memory().unwrap();
    seed_products(&store, &[10.0, 20.0, 30.0, 40.0]);
    let products = store.collection::<Product>().unwrap();

    let count = products
        .query()
        .filter(Filter::gte("price", 20))
        .filter(Filter::lt("price", 40))
        .count()
        .unwrap();
    assert_eq!(count, 2);
}

#[test]
fn nested_field_paths_and_text_filters() {
    let store = DocumentStore::open_in_memory().unwrap();
    let suppliers = store.collection::<Supplier>().unwrap();
    let rows = [
        ("Acme", "Lisbon", Some(5)),
        ("Globex", "Porto", None),
        ("Initech", "Lisbon", Some(2)),
    ];
    for (name, city, rating) in rows {
        let mut supplier = Supplier {
            id: 0,
            name: name.to_string(),
            address: Address {
                city: city.to_string(),
            },
            rating,
        };
        suppliers.insert(&mut supplier).unwrap();
    }

    let in_lisbon = suppliers
        .query()
        .filter(Filter::eq("address.city", "Lisbon"))
        .order_by("name", SortOrder::Descending)
        .to_list()
        .unwrap();
    let names: Vec<&str> = in_lisbon.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Initech", "Acme"]);

    let with_ex = suppliers
        .query()
        .filter(Filter::contains("name", "ex").or(Filter::eq("id", 1)))
        .count()
        .unwrap();
    assert_eq!(with_ex, 2);

    let unrated = suppliers
        .query()
        .filter(Filter::is_null("rating"))
        .to_list()
        .unwrap();
    assert_eq!(unrated.len(), 1);
    assert_eq!(unrated[0].name, "Globex");

    let rated = suppliers
        .query()
        .filter(Filter::is_null("rating").negate())
        .count()
        .unwrap();
    assert_eq!(rated, 2);

    // NOT over a comparison with a missing field stays NULL, so Globex is dropped.
    let not_top_rated: Vec<String> = suppliers
        .query()
        .filter(Filter::gt("rating", 3).negate())
        .to_list()
        .unwrap()
        .into_iter()
        .map(|supplier| supplier.name)
        .collect();
    assert_eq!(not_top_rated, vec!["Initech".to_string()]);
}

#[test]
fn invalid_ordering_key_surfaces_as_store_failure() {
    let store = DocumentStore::open_in_memory().unwrap();
    seed_products(&store, &[1.0]);
    let products = store.collection::<Product>().unwrap();

    let err = products
        .query()
        .order_by("price desc", SortOrder::Ascending)
        .to_list()
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidExpression(_)));
}

#[test]
fn unbound_entity_type_is_a_configuration_error() {
    let store = DocumentStore::open_in_memory().unwrap();

    match store.collection::<Orphan>() {
        Err(StoreError::Config(err)) => assert!(err.to_string().contains("Orphan")),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected configuration error"),
    }
}

#[test]
fn close_releases_the_handle() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("close.db");

    let store = DocumentStore::open(&path).unwrap();
    seed_products(&store, &[5.0]);
    store.close().unwrap();

    let reopened = DocumentStore::open(&path).unwrap();
    let products = reopened.collection::<Product>().unwrap();
    assert_eq!(products.find_all().unwrap().len(), 1);
}
