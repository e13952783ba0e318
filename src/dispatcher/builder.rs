//! Builder for [`Dispatcher`].

use super::core::{Dispatcher, RegisteredResource};
use crate::config::ApiConfig;
use crate::error::{BuildError, BuildResult};
use crate::resource::ResourceDefinition;
use crate::routing::RouteTable;
use crate::schema::{Hydrator, SchemaHydrator};
use crate::storage::DocumentStore;
use log::debug;

/// Assembles a [`Dispatcher`] from a store, configuration and resources.
///
/// Routes are fixed once `build` succeeds.
///
/// ```rust
/// use nonrel_resources::dispatcher::DispatcherBuilder;
/// use nonrel_resources::resource::ResourceDefinition;
/// use nonrel_resources::storage::InMemoryDocumentStore;
/// use nonrel_resources::ApiConfig;
///
/// let dispatcher = DispatcherBuilder::new(InMemoryDocumentStore::new())
///     .with_config(ApiConfig::new().with_api_name("v1"))
///     .register(ResourceDefinition::builder("blog").build().unwrap())
///     .build()
///     .unwrap();
/// assert_eq!(dispatcher.resources().count(), 1);
/// ```
pub struct DispatcherBuilder<S> {
    store: S,
    config: ApiConfig,
    hydrator: Box<dyn Hydrator>,
    definitions: Vec<ResourceDefinition>,
}

impl<S: DocumentStore> DispatcherBuilder<S> {
    /// Start with the default configuration and [`SchemaHydrator`].
    pub fn new(store: S) -> Self {
        Self {
            store,
            config: ApiConfig::default(),
            hydrator: Box::new(SchemaHydrator),
            definitions: Vec::new(),
        }
    }

    pub fn with_config(mut self, config: ApiConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the hydration collaborator.
    pub fn with_hydrator(mut self, hydrator: impl Hydrator + 'static) -> Self {
        self.hydrator = Box::new(hydrator);
        self
    }

    pub fn register(mut self, definition: ResourceDefinition) -> Self {
        self.definitions.push(definition);
        self
    }

    /// Validate the configuration, reject duplicate resource names and build
    /// every resource's route table.
    pub fn build(self) -> BuildResult<Dispatcher<S>> {
        self.config.validate()?;

        let mut resources: Vec<RegisteredResource> = Vec::with_capacity(self.definitions.len());
        for definition in self.definitions {
            if resources
                .iter()
                .any(|r| r.definition.name() == definition.name())
            {
                return Err(BuildError::DuplicateResource {
                    name: definition.name().to_string(),
                });
            }

            let routes = RouteTable::for_resource(&definition);
            for route in routes.routes() {
                debug!("Registered route {} ({})", route, route.name());
            }
            resources.push(RegisteredResource { definition, routes });
        }

        Ok(Dispatcher {
            resources,
            store: self.store,
            hydrator: self.hydrator,
            config: self.config,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryDocumentStore;

    #[test]
    fn test_duplicate_resources_rejected() {
        let result = DispatcherBuilder::new(InMemoryDocumentStore::new())
            .register(ResourceDefinition::builder("blog").build().unwrap())
            .register(ResourceDefinition::builder("blog").build().unwrap())
            .build();
        assert!(matches!(result, Err(BuildError::DuplicateResource { .. })));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = DispatcherBuilder::new(InMemoryDocumentStore::new())
            .with_config(ApiConfig::new().with_api_name("a b"))
            .build();
        assert!(matches!(
            result,
            Err(BuildError::InvalidConfiguration { .. })
        ));
    }
}
