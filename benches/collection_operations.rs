//! Collection Operation Benchmarks
//!
//! Measures hydration, listing and the full load -> mutate -> save cycle of
//! embedded collections at different collection sizes.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use nonrel_resources::dispatcher::{ApiRequest, DispatcherBuilder};
use nonrel_resources::resource::ResourceDefinition;
use nonrel_resources::schema::{
    FieldKind, Hydrator, ModelDefinition, ModelField, ResourceSchemaBuilder, SchemaHydrator,
};
use nonrel_resources::storage::InMemoryDocumentStore;
use serde_json::{Value, json};
use tokio::runtime::Runtime;

fn post_model() -> ModelDefinition {
    let comment = ModelDefinition::new("Comment")
        .field(ModelField::new("author", FieldKind::Char))
        .field(ModelField::new("text", FieldKind::Text))
        .field(ModelField::new("posted", FieldKind::DateTime).null())
        .field(ModelField::new("likes", FieldKind::PositiveInteger).default_value(json!(0)));

    ModelDefinition::new("Post")
        .field(ModelField::new("title", FieldKind::Char))
        .field(ModelField::new("comments", FieldKind::List).items(
            ModelField::new("comment", FieldKind::EmbeddedModel).embedded(comment),
        ))
}

fn comment_payload(id: usize) -> Value {
    json!({
        "author": format!("user{}", id),
        "text": "Lorem ipsum dolor sit amet",
        "posted": "2024-05-01T10:00:00Z",
        "likes": id % 7
    })
}

fn seeded_store(runtime: &Runtime, size: usize) -> InMemoryDocumentStore {
    let store = InMemoryDocumentStore::new();
    let comments: Vec<Value> = (0..size).map(comment_payload).collect();
    runtime.block_on(store.insert("blog", "1", json!({"title": "Bench", "comments": comments})));
    store
}

/// Benchmark payload hydration against a derived item schema
fn bench_hydration(c: &mut Criterion) {
    let model = post_model();
    let schema = ResourceSchemaBuilder::new(&model).build();
    let item_schema = schema
        .get("comments")
        .and_then(|descriptor| descriptor.item_schema())
        .cloned()
        .unwrap();

    let mut group = c.benchmark_group("hydration");
    group.bench_function("valid_payload", |b| {
        let payload = comment_payload(1);
        b.iter(|| black_box(SchemaHydrator.hydrate(black_box(&payload), &item_schema, None)));
    });
    group.bench_function("missing_required_field", |b| {
        let payload = json!({"text": "no author"});
        b.iter(|| black_box(SchemaHydrator.hydrate(black_box(&payload), &item_schema, None)));
    });
    group.finish();
}

/// Benchmark requests through the dispatcher at different collection sizes
fn bench_dispatch(c: &mut Criterion) {
    let runtime = Runtime::new().unwrap();
    let model = post_model();
    let mut group = c.benchmark_group("dispatch");

    for size in [10, 100, 1000].iter() {
        group.throughput(Throughput::Elements(*size as u64));

        let definition = ResourceDefinition::builder("blog")
            .schema(ResourceSchemaBuilder::new(&model).build())
            .embedded_collection("comments")
            .build()
            .unwrap();
        let dispatcher = DispatcherBuilder::new(seeded_store(&runtime, *size))
            .register(definition)
            .build()
            .unwrap();

        group.bench_with_input(BenchmarkId::new("list", size), size, |b, _| {
            b.iter(|| {
                runtime.block_on(dispatcher.handle(ApiRequest::get("/blog/1/comments/")))
            });
        });

        group.bench_with_input(BenchmarkId::new("get_last", size), size, |b, &size| {
            let path = format!("/blog/1/comments/{}/", size - 1);
            b.iter(|| runtime.block_on(dispatcher.handle(ApiRequest::get(path.as_str()))));
        });

        // Update in place keeps the collection size stable across iterations
        group.bench_with_input(BenchmarkId::new("update_first", size), size, |b, _| {
            b.iter(|| {
                runtime.block_on(dispatcher.handle(ApiRequest::put(
                    "/blog/1/comments/0/",
                    json!({"text": "edited"}),
                )))
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_hydration, bench_dispatch);
criterion_main!(benches);
