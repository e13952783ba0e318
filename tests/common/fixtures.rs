//! Model definitions and seeded stores.

use nonrel_resources::resource::ResourceDefinition;
use nonrel_resources::schema::{
    FieldKind, ModelDefinition, ModelField, ResourceSchemaBuilder,
};
use nonrel_resources::storage::InMemoryDocumentStore;
use serde_json::{Value, json};

/// A blog post with embedded comments and revisions.
pub fn post_model() -> ModelDefinition {
    let comment = ModelDefinition::new("Comment")
        .field(ModelField::new("author", FieldKind::Char))
        .field(ModelField::new("text", FieldKind::Text))
        .field(ModelField::new("posted", FieldKind::DateTime).null())
        .field(ModelField::new("likes", FieldKind::PositiveInteger).default_value(json!(0)));
    let revision = ModelDefinition::new("Revision")
        .field(ModelField::new("summary", FieldKind::Char).blank());

    ModelDefinition::new("Post")
        .field(ModelField::new("title", FieldKind::Char))
        .field(ModelField::new("site", FieldKind::ForeignKey))
        .field(ModelField::new("comments", FieldKind::List).items(
            ModelField::new("comment", FieldKind::EmbeddedModel).embedded(comment),
        ))
        .field(ModelField::new("revisions", FieldKind::List).items(
            ModelField::new("revision", FieldKind::EmbeddedModel).embedded(revision),
        ))
        .field(ModelField::new("tags", FieldKind::List).items(ModelField::new("tag", FieldKind::Char)))
}

/// The `blog` resource with every embedded list exposed.
pub fn blog_definition() -> ResourceDefinition {
    ResourceDefinition::builder("blog")
        .schema(ResourceSchemaBuilder::new(&post_model()).build())
        .embedded_collections_from_schema()
        .build()
        .expect("blog definition is valid")
}

pub fn comment(author: &str, text: &str) -> Value {
    json!({"author": author, "text": text, "posted": null, "likes": 0})
}

/// A store holding blog `1` with the given comments and an empty blog `2`.
pub async fn seeded_store(comments: Vec<Value>) -> InMemoryDocumentStore {
    let store = InMemoryDocumentStore::new();
    store
        .insert(
            "blog",
            "1",
            json!({"title": "First", "slug": "first", "comments": comments, "tags": ["rust"]}),
        )
        .await;
    store
        .insert("blog", "2", json!({"title": "Second", "slug": "second"}))
        .await;
    store
}

/// Comment texts stored on a blog, in order.
pub async fn stored_texts(store: &InMemoryDocumentStore, pk: &str) -> Vec<String> {
    store
        .get("blog", pk)
        .await
        .and_then(|data| data.get("comments").cloned())
        .and_then(|comments| comments.as_array().cloned())
        .unwrap_or_default()
        .iter()
        .filter_map(|item| item["text"].as_str().map(str::to_string))
        .collect()
}
