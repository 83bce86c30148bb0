use crate::di::{Container, Injectable};
use std::sync::Arc;

/// Builder for configuring a dependency injection container.
///
/// # Example
/// ```ignore
/// let container = ContainerBuilder::new()
///     .register_instance(PoolConfig::from_env())
///     .register::<UserRepositoryImpl>()
///     .bind::<dyn UserRepository, UserRepositoryImpl, _>(|i| i as Arc<dyn UserRepository>)
///     .build();
/// ```
pub struct ContainerBuilder {
    container: Container,
}

impl ContainerBuilder {
    pub fn new() -> Self {
        Self {
            container: Container::new(),
        }
    }

    /// Register a provider; construction is deferred to first `get`.
    pub fn register<T: Injectable>(self) -> Self {
        self.container.register::<T>();
        self
    }

    /// Seed the container with a ready-made singleton.
    pub fn register_instance<T: 'static + Send + Sync>(self, instance: T) -> Self {
        self.container.register_instance(instance);
        self
    }

    /// Bind a trait to a concrete implementation so `Arc<dyn Trait>` fields
    /// resolve to the registered implementation.
    pub fn bind<Trait, Impl, F>(self, caster: F) -> Self
    where
        Trait: ?Sized + 'static + Send + Sync,
        Impl: 'static + Send + Sync,
        F: Fn(Arc<Impl>) -> Arc<Trait> + 'static + Send + Sync,
    {
        self.container.bind::<Trait, Impl, F>(caster);
        self
    }

    pub fn build(self) -> Container {
        self.container
    }
}

impl Default for ContainerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
