use crate::di::Injectable;
use crate::error::{ArmatureError, Result};
use dashmap::DashMap;
use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::sync::Arc;

type AnyInstance = Arc<dyn Any + Send + Sync>;

/// A construction recipe for a registered provider. Invoked at most once per
/// token on the first `get`; the recipe calls back into the container for
/// each dependency, which is what makes resolution depth-first.
type ProviderFn = Arc<dyn Fn(&Container) -> Result<AnyInstance> + Send + Sync>;

/// Type alias for a function that can cast an `Arc<dyn Any>` to another
/// `Arc<dyn Any>`. The inner value is usually an `Arc<dyn Trait>`.
type CasterFn = Arc<dyn Fn(AnyInstance) -> AnyInstance + Send + Sync>;

struct ProviderEntry {
    type_name: &'static str,
    construct: ProviderFn,
}

/// Thread-safe dependency injection container.
///
/// Providers are registered eagerly but constructed lazily: the dependency
/// graph for a token is walked depth-first on the first `get`, and every
/// node is cached as a process-wide singleton. Cloning the container yields
/// a handle to the same provider and instance maps.
pub struct Container {
    inner: Arc<ContainerInner>,
}

struct ContainerInner {
    providers: DashMap<TypeId, ProviderEntry>,
    instances: DashMap<TypeId, AnyInstance>,
    trait_mappings: DashMap<TypeId, TypeId>,
    casters: DashMap<TypeId, CasterFn>,
}

impl Clone for Container {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

thread_local! {
    // In-flight resolution stack. Depth-first resolution is synchronous per
    // thread, so a thread-local stack never sees another thread's frames.
    static RESOLVING: RefCell<Vec<(TypeId, &'static str)>> = const { RefCell::new(Vec::new()) };
}

/// RAII frame for the in-flight stack; popping on drop keeps the stack
/// consistent when a provider errors mid-resolution.
struct ResolutionFrame;

impl ResolutionFrame {
    fn enter(token: TypeId, type_name: &'static str) -> Result<Self> {
        RESOLVING.with(|stack| {
            let mut stack = stack.borrow_mut();
            if stack.iter().any(|(id, _)| *id == token) {
                let mut names: Vec<&str> = stack.iter().map(|(_, name)| *name).collect();
                names.push(type_name);
                return Err(ArmatureError::CircularDependency {
                    cycle: names.join(" -> "),
                });
            }
            stack.push((token, type_name));
            Ok(ResolutionFrame)
        })
    }
}

impl Drop for ResolutionFrame {
    fn drop(&mut self) {
        RESOLVING.with(|stack| {
            stack.borrow_mut().pop();
        });
    }
}

impl Container {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(ContainerInner {
                providers: DashMap::new(),
                instances: DashMap::new(),
                trait_mappings: DashMap::new(),
                casters: DashMap::new(),
            }),
        }
    }

    /// Register `T`'s construction recipe. Chainable; registering the same
    /// type again overwrites the previous recipe. Nothing is constructed
    /// until the first `get`.
    pub fn register<T: Injectable>(&self) -> &Self {
        self.inner.providers.insert(
            TypeId::of::<T>(),
            ProviderEntry {
                type_name: std::any::type_name::<T>(),
                construct: Arc::new(|container| {
                    let instance: AnyInstance = Arc::new(T::inject(container)?);
                    Ok(instance)
                }),
            },
        );
        self
    }

    /// Seed the singleton cache with a value constructed outside the graph,
    /// e.g. a database handle built in `main`.
    pub fn register_instance<T: Send + Sync + 'static>(&self, instance: T) -> &Self {
        self.inner
            .instances
            .insert(TypeId::of::<T>(), Arc::new(instance));
        self
    }

    /// Map a trait-object token to a concrete implementation so that
    /// `get_trait::<dyn Trait>()` resolves through the implementation's
    /// provider.
    pub fn bind<Trait, Impl, F>(&self, caster_fn: F) -> &Self
    where
        Trait: ?Sized + 'static + Send + Sync,
        Impl: 'static + Send + Sync,
        F: Fn(Arc<Impl>) -> Arc<Trait> + 'static + Send + Sync,
    {
        let trait_id = TypeId::of::<Trait>();
        self.inner.trait_mappings.insert(trait_id, TypeId::of::<Impl>());

        let caster: CasterFn = Arc::new(move |instance: AnyInstance| {
            let concrete = instance
                .downcast::<Impl>()
                .expect("trait binding downcast mismatch; this is a bug in Armature");
            let trait_obj: Arc<Trait> = caster_fn(concrete);
            // Wrap the Arc<dyn Trait> in an Arc<dyn Any>
            Arc::new(trait_obj)
        });
        self.inner.casters.insert(trait_id, caster);
        self
    }

    /// Get the singleton instance of `T`, constructing it (and its whole
    /// dependency subtree) on first use. Identity-stable: every call returns
    /// the same `Arc`.
    pub fn get<T: Send + Sync + 'static>(&self) -> Result<Arc<T>> {
        let instance = self.get_any(TypeId::of::<T>(), std::any::type_name::<T>())?;
        instance
            .downcast::<T>()
            .map_err(|_| ArmatureError::DowncastFailed {
                type_name: std::any::type_name::<T>().to_string(),
            })
    }

    /// Get the singleton behind a trait-object token registered via `bind`.
    pub fn get_trait<T: ?Sized + Send + Sync + 'static>(&self) -> Result<Arc<T>> {
        let trait_id = TypeId::of::<T>();
        let type_name = std::any::type_name::<T>();

        let caster = self
            .inner
            .casters
            .get(&trait_id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| ArmatureError::NotRegistered {
                type_name: type_name.to_string(),
            })?;
        let impl_id = self
            .inner
            .trait_mappings
            .get(&trait_id)
            .map(|entry| *entry.value())
            .ok_or_else(|| ArmatureError::NotRegistered {
                type_name: type_name.to_string(),
            })?;

        let instance = self.get_any(impl_id, type_name)?;
        let cast_result = (caster)(instance);

        // The caster returns an Arc<dyn Any> holding an Arc<T>; downcast to
        // the sized wrapper and clone the inner Arc out of it.
        let wrapper =
            cast_result
                .downcast::<Arc<T>>()
                .map_err(|_| ArmatureError::DowncastFailed {
                    type_name: type_name.to_string(),
                })?;
        Ok(wrapper.as_ref().clone())
    }

    /// Cache-first resolution shared by `get` and `get_trait`.
    fn get_any(&self, token: TypeId, requested_name: &'static str) -> Result<AnyInstance> {
        if let Some(hit) = self.inner.instances.get(&token) {
            return Ok(hit.value().clone());
        }

        let (type_name, construct) = match self.inner.providers.get(&token) {
            Some(entry) => (entry.type_name, entry.construct.clone()),
            None => {
                return Err(ArmatureError::NotRegistered {
                    type_name: requested_name.to_string(),
                });
            }
        };

        let _frame = ResolutionFrame::enter(token, type_name)?;
        let built = (construct)(self)?;

        // First write wins: a concurrent resolution of the same token may
        // have finished while we were constructing, and callers must all see
        // one identity.
        let cached = self
            .inner
            .instances
            .entry(token)
            .or_insert(built)
            .value()
            .clone();
        Ok(cached)
    }

    pub fn contains<T: ?Sized + 'static>(&self) -> bool {
        let type_id = TypeId::of::<T>();
        self.inner.providers.contains_key(&type_id)
            || self.inner.instances.contains_key(&type_id)
            || self.inner.trait_mappings.contains_key(&type_id)
    }

    /// Number of registered providers (cached instances not included).
    pub fn len(&self) -> usize {
        self.inner.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.providers.is_empty()
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn get_returns_the_same_instance_every_time() {
        struct Clock {
            #[allow(dead_code)]
            epoch: i64,
        }
        impl Injectable for Clock {
            fn inject(_: &Container) -> Result<Self> {
                Ok(Self { epoch: 0 })
            }
        }

        let container = Container::new();
        container.register::<Clock>();
        let first = container.get::<Clock>().unwrap();
        let second = container.get::<Clock>().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn get_on_unregistered_token_fails() {
        #[derive(Debug)]
        struct Ghost;

        let container = Container::new();
        let err = container.get::<Ghost>().unwrap_err();
        assert!(matches!(err, ArmatureError::NotRegistered { .. }));
        assert!(err.to_string().contains("Ghost"));
    }

    #[test]
    fn chain_constructs_each_node_exactly_once() {
        static BUILT_A: AtomicUsize = AtomicUsize::new(0);
        static BUILT_B: AtomicUsize = AtomicUsize::new(0);
        static BUILT_C: AtomicUsize = AtomicUsize::new(0);

        struct C;
        impl Injectable for C {
            fn inject(_: &Container) -> Result<Self> {
                BUILT_C.fetch_add(1, Ordering::SeqCst);
                Ok(C)
            }
        }
        struct B {
            #[allow(dead_code)]
            c: Arc<C>,
        }
        impl Injectable for B {
            fn inject(container: &Container) -> Result<Self> {
                BUILT_B.fetch_add(1, Ordering::SeqCst);
                Ok(B {
                    c: container.get()?,
                })
            }
        }
        struct A {
            #[allow(dead_code)]
            b: Arc<B>,
        }
        impl Injectable for A {
            fn inject(container: &Container) -> Result<Self> {
                BUILT_A.fetch_add(1, Ordering::SeqCst);
                Ok(A {
                    b: container.get()?,
                })
            }
        }

        let container = Container::new();
        container.register::<A>().register::<B>().register::<C>();

        let a = container.get::<A>().unwrap();
        // C was resolved transitively; requesting it again is a cache hit.
        let c = container.get::<C>().unwrap();
        assert!(Arc::ptr_eq(&a.b.c, &c));

        assert_eq!(BUILT_A.load(Ordering::SeqCst), 1);
        assert_eq!(BUILT_B.load(Ordering::SeqCst), 1);
        assert_eq!(BUILT_C.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn missing_dependency_surfaces_not_registered() {
        #[derive(Debug)]
        struct Missing;
        #[derive(Debug)]
        struct Needy {
            #[allow(dead_code)]
            missing: Arc<Missing>,
        }
        impl Injectable for Needy {
            fn inject(container: &Container) -> Result<Self> {
                Ok(Needy {
                    missing: container.get()?,
                })
            }
        }

        let container = Container::new();
        container.register::<Needy>();
        let err = container.get::<Needy>().unwrap_err();
        assert!(matches!(err, ArmatureError::NotRegistered { .. }));
        assert!(err.to_string().contains("Missing"));
    }

    #[test]
    fn circular_graph_is_rejected_instead_of_overflowing() {
        #[derive(Debug)]
        struct Egg {
            #[allow(dead_code)]
            chicken: Arc<Chicken>,
        }
        #[derive(Debug)]
        struct Chicken {
            #[allow(dead_code)]
            egg: Arc<Egg>,
        }
        impl Injectable for Egg {
            fn inject(container: &Container) -> Result<Self> {
                Ok(Egg {
                    chicken: container.get()?,
                })
            }
        }
        impl Injectable for Chicken {
            fn inject(container: &Container) -> Result<Self> {
                Ok(Chicken {
                    egg: container.get()?,
                })
            }
        }

        let container = Container::new();
        container.register::<Egg>().register::<Chicken>();
        let err = container.get::<Egg>().unwrap_err();
        match err {
            ArmatureError::CircularDependency { cycle } => {
                assert!(cycle.contains("Egg"));
                assert!(cycle.contains("Chicken"));
            }
            other => panic!("expected CircularDependency, got {other}"),
        }
    }

    #[test]
    fn reregistration_does_not_invalidate_cached_singleton() {
        struct Counter {
            value: usize,
        }
        impl Injectable for Counter {
            fn inject(_: &Container) -> Result<Self> {
                Ok(Counter { value: 1 })
            }
        }

        let container = Container::new();
        container.register::<Counter>();
        let first = container.get::<Counter>().unwrap();
        // Overwrites the recipe, but the cache is consulted first.
        container.register::<Counter>();
        let second = container.get::<Counter>().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.value, 1);
    }

    #[test]
    fn register_instance_seeds_the_cache() {
        struct Config {
            url: &'static str,
        }

        let container = Container::new();
        container.register_instance(Config { url: "sqlite://" });
        let config = container.get::<Config>().unwrap();
        assert_eq!(config.url, "sqlite://");
    }

    #[test]
    fn trait_binding_resolves_lazily_through_the_impl_provider() {
        trait Greeter: Send + Sync {
            fn greet(&self) -> String;
        }
        struct EnglishGreeter;
        impl Injectable for EnglishGreeter {
            fn inject(_: &Container) -> Result<Self> {
                Ok(EnglishGreeter)
            }
        }
        impl Greeter for EnglishGreeter {
            fn greet(&self) -> String {
                "hello".to_string()
            }
        }

        let container = Container::new();
        container.register::<EnglishGreeter>();
        container.bind::<dyn Greeter, EnglishGreeter, _>(|i| i as Arc<dyn Greeter>);

        let greeter = container.get_trait::<dyn Greeter>().unwrap();
        assert_eq!(greeter.greet(), "hello");

        // The trait view and the concrete view share one instance.
        let concrete = container.get::<EnglishGreeter>().unwrap();
        assert!(std::ptr::eq(
            Arc::as_ptr(&greeter) as *const (),
            Arc::as_ptr(&concrete) as *const ()
        ));
    }

    #[test]
    fn unbound_trait_fails_with_not_registered() {
        trait Storage: Send + Sync + std::fmt::Debug {}

        let container = Container::new();
        let err = container.get_trait::<dyn Storage>().unwrap_err();
        assert!(matches!(err, ArmatureError::NotRegistered { .. }));
    }
}
