//! Property tests for positional identity in embedded collections.
//!
//! Random operation sequences are applied both to a bound collection and to
//! a plain `Vec` model; after every step the stored sequence must equal the
//! model.

use nonrel_resources::resource::{
    EmbeddedCollectionResource, RequestContext, ResourceDefinition, UpdateOutcome,
};
use nonrel_resources::routing::RouteParams;
use nonrel_resources::schema::{
    FieldDescriptor, FieldType, NestedSchema, ResourceSchema, SchemaHydrator,
};
use nonrel_resources::storage::InMemoryDocumentStore;
use nonrel_resources::{ApiConfig, ResourceError};
use proptest::prelude::*;
use serde_json::json;

#[derive(Debug, Clone)]
enum Op {
    Create(String),
    Delete(usize),
    Update { index: usize, target: Option<usize>, text: String },
    Upsert { index: usize, text: String },
    DeleteAll,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => "[a-z]{1,6}".prop_map(Op::Create),
        2 => (0usize..8).prop_map(Op::Delete),
        3 => (0usize..8, proptest::option::of(0usize..10), "[a-z]{1,6}")
            .prop_map(|(index, target, text)| Op::Update { index, target, text }),
        2 => (0usize..10, "[a-z]{1,6}").prop_map(|(index, text)| Op::Upsert { index, text }),
        1 => Just(Op::DeleteAll),
    ]
}

fn note_definition() -> ResourceDefinition {
    let item = ResourceSchema::new().with_field(FieldDescriptor::new("text", FieldType::String));
    ResourceDefinition::builder("board")
        .schema(ResourceSchema::new().with_field(
            FieldDescriptor::new("notes", FieldType::EmbeddedList)
                .with_nested(NestedSchema::Of(item)),
        ))
        .embedded_collection("notes")
        .build()
        .unwrap()
}

fn route_params() -> RouteParams {
    RouteParams::from([
        ("resource_name".to_string(), "board".to_string()),
        ("pk".to_string(), "1".to_string()),
        ("subresource_name".to_string(), "notes".to_string()),
    ])
}

async fn stored(store: &InMemoryDocumentStore) -> Vec<String> {
    store.get("board", "1").await.unwrap()["notes"]
        .as_array()
        .cloned()
        .unwrap_or_default()
        .iter()
        .map(|item| item["text"].as_str().unwrap().to_string())
        .collect()
}

/// Apply one operation to a freshly bound collection and to the model.
async fn apply(
    definition: &ResourceDefinition,
    config: &ApiConfig,
    store: &InMemoryDocumentStore,
    model: &mut Vec<String>,
    op: &Op,
) {
    let mut collection = EmbeddedCollectionResource::for_field(
        definition,
        "notes",
        store,
        &SchemaHydrator,
        config,
        RequestContext::default(),
    )
    .unwrap()
    .bind(&route_params())
    .await
    .unwrap();

    match op {
        Op::Create(text) => {
            let item = collection.create(&json!({ "text": text })).await.unwrap();
            model.push(text.clone());
            assert_eq!(item.index, model.len() - 1);
            assert_eq!(collection.get(item.index).unwrap().data, json!({ "text": text }));
        }
        Op::Delete(index) => {
            let result = collection.delete(*index).await;
            if *index < model.len() {
                result.unwrap();
                model.remove(*index);
                match collection.get(*index) {
                    Ok(item) => assert_eq!(item.data["text"], model[*index].as_str()),
                    Err(e) => {
                        assert!(matches!(e, ResourceError::Gone { .. }));
                        assert_eq!(*index, model.len());
                    }
                }
            } else {
                assert!(matches!(result, Err(ResourceError::Gone { .. })));
            }
        }
        Op::Update { index, target, text } => {
            let payload = match target {
                Some(target) => json!({ "text": text, "id": target }),
                None => json!({ "text": text }),
            };
            let outcome = collection.update(*index, &payload).await.unwrap();
            if *index < model.len() {
                model.remove(*index);
                let position = target.unwrap_or(*index).min(model.len());
                model.insert(position, text.clone());
                assert!(matches!(outcome, UpdateOutcome::Updated(ref item) if item.index == position));
            } else {
                assert_eq!(outcome, UpdateOutcome::IndexMissing);
            }
        }
        Op::Upsert { index, text } => {
            let outcome = collection
                .upsert(Some(*index), &json!({ "text": text }))
                .await
                .unwrap();
            if *index < model.len() {
                model[*index] = text.clone();
                assert!(!outcome.is_created());
            } else {
                model.push(text.clone());
                assert!(outcome.is_created());
                assert_eq!(outcome.item().index, model.len() - 1);
            }
        }
        Op::DeleteAll => {
            collection.delete_all().await.unwrap();
            model.clear();
            assert!(collection.list().unwrap().is_empty());
        }
    }
}

proptest! {
    #[test]
    fn test_operations_match_vec_model(
        initial in proptest::collection::vec("[a-z]{1,6}", 0..6),
        ops in proptest::collection::vec(op_strategy(), 1..20),
    ) {
        tokio_test::block_on(async {
            let definition = note_definition();
            let config = ApiConfig::default();
            let store = InMemoryDocumentStore::new();
            let items: Vec<_> = initial.iter().map(|text| json!({ "text": text })).collect();
            store.insert("board", "1", json!({ "notes": items })).await;

            let mut model = initial.clone();
            for op in &ops {
                apply(&definition, &config, &store, &mut model, op).await;
                assert_eq!(stored(&store).await, model);
            }
        });
    }

    #[test]
    fn test_list_indices_are_positions(texts in proptest::collection::vec("[a-z]{1,6}", 0..10)) {
        tokio_test::block_on(async {
            let definition = note_definition();
            let config = ApiConfig::default();
            let store = InMemoryDocumentStore::new();
            let items: Vec<_> = texts.iter().map(|text| json!({ "text": text })).collect();
            store.insert("board", "1", json!({ "notes": items })).await;

            let collection = EmbeddedCollectionResource::for_field(
                &definition,
                "notes",
                &store,
                &SchemaHydrator,
                &config,
                RequestContext::default(),
            )
            .unwrap()
            .bind(&route_params())
            .await
            .unwrap();

            let listed = collection.list().unwrap();
            assert_eq!(listed.len(), texts.len());
            for (position, item) in listed.iter().enumerate() {
                assert_eq!(item.index, position);
                assert_eq!(item.resource_uri, format!("/board/1/notes/{}/", position));
                assert_eq!(collection.get(position).unwrap(), *item);
            }
            assert!(collection.get(texts.len()).is_err());
        });
    }
}
