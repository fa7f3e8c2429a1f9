use futures::future::join_all;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use travelblog_core::prelude::*;
use travelblog_memory::InMemoryStore;

#[derive(Debug, Clone, Serialize, Deserialize, Document)]
#[document(collection = "trips", unique = "name", validate = Trip::check)]
struct Trip {
    id: RecordId,
    name: String,
    #[serde(default)]
    stops: Vec<String>,
}

impl Trip {
    fn check(&self) -> DocumentStoreResult<()> {
        let mut seen = std::collections::HashSet::new();

        if self.stops.iter().all(|s| seen.insert(s)) {
            Ok(())
        } else {
            Err(DocumentStoreError::InvalidDocument("duplicate stop".into()))
        }
    }
}

fn fields(value: Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap()
}

async fn store_with(trips: Vec<Value>) -> (InMemoryStore, DocumentStore<InMemoryStore>) {
    let backend = InMemoryStore::builder()
        .with_json("trips", trips)
        .build()
        .await
        .unwrap();

    (backend.clone(), DocumentStore::new(backend))
}

#[tokio::test]
async fn insert_appends_with_assigned_id() {
    let (backend, store) = store_with(vec![json!({ "id": 1, "name": "Alps" })]).await;

    let created = store
        .collection("trips")
        .insert(fields(json!({ "id": "chosen-by-caller", "name": "Andes" })))
        .await
        .unwrap();

    let id = created.id().unwrap();
    assert_ne!(id.as_str(), "chosen-by-caller");

    let stored = backend.snapshot("trips").await.unwrap();
    assert_eq!(stored.len(), 2);
    assert_eq!(stored[0].get("name"), Some(&json!("Alps")));
    assert!(stored[1].has_id(&id));
}

#[tokio::test]
async fn concurrent_inserts_are_never_lost() {
    let (backend, store) = store_with(vec![]).await;
    let trips = store.collection("trips");

    let results = join_all(
        (0..100).map(|n| trips.insert(fields(json!({ "name": format!("trip-{n}") })))),
    )
    .await;

    assert!(results.iter().all(Result::is_ok));

    let stored = backend.snapshot("trips").await.unwrap();
    let ids: std::collections::HashSet<_> = stored.iter().filter_map(Record::id).collect();
    assert_eq!(stored.len(), 100);
    assert_eq!(ids.len(), 100);
}

#[tokio::test]
async fn concurrent_modifications_all_land() {
    let (_, store) = store_with(vec![json!({ "id": "1", "name": "Alps", "stops": [] })]).await;
    let trips = store.typed_collection::<Trip>();
    let id = RecordId::from("1");

    let results = join_all((0..25).map(|n| {
        trips.modify(&id, move |trip| {
            trip.stops.push(format!("stop-{n}"));
            Ok::<_, DocumentStoreError>(())
        })
    }))
    .await;

    assert!(results.iter().all(Result::is_ok));
    assert_eq!(trips.get(&id).await.unwrap().unwrap().stops.len(), 25);
}

#[tokio::test]
async fn update_merges_and_reports_missing_ids() {
    let (_, store) = store_with(vec![json!({ "id": 2, "name": "Alps", "season": "winter" })]).await;
    let trips = store.collection("trips");

    let merged = trips
        .update(&RecordId::from("2"), fields(json!({ "season": "summer", "days": 9 })))
        .await
        .unwrap();
    assert_eq!(
        Value::from(merged),
        json!({ "id": 2, "name": "Alps", "season": "summer", "days": 9 })
    );

    let err = trips
        .update(&RecordId::from("404"), fields(json!({ "season": "spring" })))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn typed_writes_enforce_unique_fields() {
    let (backend, store) = store_with(vec![json!({ "id": "1", "name": "Alps" })]).await;
    let trips = store.typed_collection::<Trip>();

    let err = trips.insert(fields(json!({ "name": "Alps" }))).await.unwrap_err();
    assert!(matches!(err, DocumentStoreError::Conflict(_)));

    let other = trips.insert(fields(json!({ "name": "Andes" }))).await.unwrap();
    let err = trips
        .update(&other.id().unwrap(), fields(json!({ "name": "Alps" })))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);

    let names: Vec<_> = backend
        .snapshot("trips")
        .await
        .unwrap()
        .iter()
        .map(|r| r.get("name").cloned())
        .collect();
    assert_eq!(names, vec![Some(json!("Alps")), Some(json!("Andes"))]);
}

#[tokio::test]
async fn existing_duplicates_do_not_block_other_writes() {
    let (backend, store) = store_with(vec![
        json!({ "id": 1, "name": "Alps", "stops": [] }),
        json!({ "id": 2, "name": "Alps" }),
    ])
    .await;
    let trips = store.typed_collection::<Trip>();
    let one = RecordId::from("1");

    trips
        .modify(&one, |trip| {
            trip.stops.push("Zermatt".into());
            Ok::<_, DocumentStoreError>(())
        })
        .await
        .unwrap();

    let updated = trips
        .update(&one, fields(json!({ "season": "winter" })))
        .await
        .unwrap();
    assert_eq!(updated.get("name"), Some(&json!("Alps")));

    trips
        .update(&RecordId::from("2"), fields(json!({ "name": "Andes" })))
        .await
        .unwrap();

    let err = trips
        .update(&one, fields(json!({ "name": "Andes" })))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);

    let stored = backend.snapshot("trips").await.unwrap();
    assert_eq!(stored[0].get("name"), Some(&json!("Alps")));
    assert_eq!(stored[0].get("stops"), Some(&json!(["Zermatt"])));
    assert_eq!(stored[0].get("season"), Some(&json!("winter")));
    assert_eq!(stored[1].get("name"), Some(&json!("Andes")));
}

#[tokio::test]
async fn typed_writes_reject_invalid_shapes() {
    let (backend, store) = store_with(vec![json!({ "id": "1", "name": "Alps" })]).await;
    let trips = store.typed_collection::<Trip>();

    let err = trips
        .update(&RecordId::from("1"), fields(json!({ "stops": "not a list" })))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ValidationFailure);

    let err = trips
        .update(&RecordId::from("1"), fields(json!({ "stops": ["a", "a"] })))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ValidationFailure);

    let stored = backend.snapshot("trips").await.unwrap();
    assert_eq!(Value::from(stored[0].clone()), json!({ "id": "1", "name": "Alps" }));
}

#[tokio::test]
async fn failed_mutation_saves_nothing() {
    let (backend, store) =
        store_with(vec![json!({ "id": "1", "name": "Alps", "stops": ["Zermatt"] })]).await;
    let trips = store.typed_collection::<Trip>();

    let result: Result<(), DocumentStoreError> = trips
        .modify(&RecordId::from("1"), |trip| {
            trip.stops.clear();
            Err(DocumentStoreError::Conflict("stop already planned".into()))
        })
        .await;
    assert!(result.is_err());

    let stored = backend.snapshot("trips").await.unwrap();
    assert_eq!(stored[0].get("stops"), Some(&json!(["Zermatt"])));
}

#[tokio::test]
async fn modify_keeps_field_order_and_stored_id() {
    let (backend, store) = store_with(vec![json!({
        "id": 7,
        "stops": [],
        "name": "Alps",
        "notes": { "gear": "crampons" }
    })])
    .await;

    store
        .typed_collection::<Trip>()
        .modify(&RecordId::from("7"), |trip| {
            trip.stops.push("Chamonix".into());
            Ok::<_, DocumentStoreError>(())
        })
        .await
        .unwrap();

    let stored = backend.snapshot("trips").await.unwrap();
    assert_eq!(
        serde_json::to_string(&stored[0]).unwrap(),
        r#"{"id":7,"stops":["Chamonix"],"name":"Alps","notes":{"gear":"crampons"}}"#
    );
}

#[tokio::test]
async fn modify_of_missing_document_is_not_found() {
    let (_, store) = store_with(vec![]).await;

    let err = store
        .typed_collection::<Trip>()
        .modify(&RecordId::from("1"), |_| Ok::<_, DocumentStoreError>(()))
        .await
        .unwrap_err();

    assert!(matches!(err, DocumentStoreError::DocumentNotFound(id, c) if id == "1" && c == "trips"));
}

#[tokio::test]
async fn get_finds_the_first_record_by_canonical_id() {
    let (_, store) = store_with(vec![
        json!({ "id": 3, "name": "Alps" }),
        json!({ "id": "3", "name": "Shadow" }),
    ])
    .await;
    let trips = store.collection("trips");

    let found = trips.get(&RecordId::from("3")).await.unwrap().unwrap();
    assert_eq!(found.get("name"), Some(&json!("Alps")));
    assert!(trips.get(&RecordId::from("4")).await.unwrap().is_none());
}

#[tokio::test]
async fn delete_is_idempotent_at_the_store_level() {
    let (backend, store) = store_with(vec![json!({ "id": 1, "name": "Alps" })]).await;
    let trips = store.collection("trips");

    assert!(trips.delete(&RecordId::from("1")).await.unwrap());
    assert!(!trips.delete(&RecordId::from("1")).await.unwrap());
    assert!(backend.snapshot("trips").await.unwrap().is_empty());
}

#[tokio::test]
async fn missing_collections_are_unavailable() {
    let store = DocumentStore::new(InMemoryStore::new());

    let err = store.collection("posts").all().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StorageUnavailable);

    store.create_collection("posts").await.unwrap();
    assert!(store.collection("posts").all().await.unwrap().is_empty());
    assert_eq!(store.list_collections().await.unwrap(), vec!["posts".to_string()]);
}

#[tokio::test]
async fn dyn_store_shares_the_same_contract() {
    let (backend, store) = store_with(vec![]).await;
    let store = store.into_dyn();

    let trip = store
        .typed_collection::<Trip>()
        .insert(fields(json!({ "name": "Fjords" })))
        .await
        .unwrap();

    assert_eq!(backend.snapshot("trips").await.unwrap().len(), 1);
    assert_eq!(trip.get("name"), Some(&json!("Fjords")));
    store.shutdown().await.unwrap();
}
