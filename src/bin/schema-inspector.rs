//! # Schema Inspector
//!
//! Reads a model definition file, derives the resource's field descriptors
//! and prints them together with the embedded collection routes the resource
//! would expose.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --bin schema-inspector models/post.json
//! cargo run --bin schema-inspector models/post.json blog
//! ```
//!
//! The optional second argument is the resource name; it defaults to the
//! lowercased model name.
//!
//! ## Output Example
//!
//! ```text
//! Model: Post (resource 'post')
//!
//! Fields:
//!   comments     embedded_list  (of: author, text)
//!   title        string         unique
//!   views        integer        default=0
//!
//! Routes:
//!   post/{pk}/comments/          api_dispatch_subresource_list
//!   post/{pk}/comments/{index}/  api_dispatch_subresource_detail
//!   post/                        api_dispatch_list
//!   post/{pk}/                   api_dispatch_detail
//! ```
//!
//! ## Exit Codes
//!
//! - `0`: The model was loaded and inspected
//! - `1`: The file could not be read or is not a valid model definition

use nonrel_resources::resource::ResourceDefinition;
use nonrel_resources::routing::RouteTable;
use nonrel_resources::schema::{
    DefaultValue, FieldDescriptor, ModelDefinition, NestedSchema, ResourceSchemaBuilder,
};
use std::env;
use std::fs;
use std::process;

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <model-file> [resource-name]", args[0]);
        process::exit(1);
    }

    if let Err(e) = inspect(&args[1], args.get(2).map(String::as_str)) {
        eprintln!("❌ {}", e);
        process::exit(1);
    }
}

fn inspect(path: &str, resource_name: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let content = fs::read_to_string(path)?;
    let model = ModelDefinition::from_json_str(&content)?;
    let resource_name = resource_name
        .map(str::to_string)
        .unwrap_or_else(|| model.name.to_lowercase());

    let schema = ResourceSchemaBuilder::new(&model).build();
    let definition = ResourceDefinition::builder(&resource_name)
        .schema(schema)
        .embedded_collections_from_schema()
        .build()?;

    println!("Model: {} (resource '{}')", model.name, resource_name);
    println!();
    println!("Fields:");
    for descriptor in definition.schema().iter() {
        println!(
            "  {:<12} {:<14} {}",
            descriptor.name,
            descriptor.field_type.as_str(),
            describe_flags(descriptor)
        );
    }

    println!();
    println!("Routes:");
    for route in RouteTable::for_resource(&definition).routes() {
        println!("  {:<28} {}", route.to_string(), route.name());
    }

    Ok(())
}

fn describe_flags(descriptor: &FieldDescriptor) -> String {
    let mut flags = Vec::new();
    if descriptor.nullable {
        flags.push("nullable".to_string());
    }
    if descriptor.unique {
        flags.push("unique".to_string());
    }
    match &descriptor.default {
        DefaultValue::None => {}
        DefaultValue::EmptyString => flags.push("default=\"\"".to_string()),
        DefaultValue::Value(value) => flags.push(format!("default={}", value)),
    }
    match &descriptor.nested {
        Some(NestedSchema::To(schema)) => {
            flags.push(format!("(to: {})", schema.names().collect::<Vec<_>>().join(", ")))
        }
        Some(NestedSchema::Of(schema)) => {
            flags.push(format!("(of: {})", schema.names().collect::<Vec<_>>().join(", ")))
        }
        None => {}
    }
    flags.join(" ")
}
