use crate::di::Container;
use std::ops::Deref;
use std::sync::{Arc, Mutex, Once, PoisonError};

/// A deferred-resolution handle for breaking intentional dependency cycles.
///
/// The container rejects cycles during eager resolution; when two services
/// genuinely need each other, one side holds a `Lazy<T>` and the actual
/// lookup happens on first access, after both singletons exist.
///
/// # Panics
///
/// Panics on first dereference if `T` was never registered.
pub struct Lazy<T: 'static + Send + Sync> {
    container: Container,
    instance: Mutex<Option<Arc<T>>>,
    once: Once,
}

impl<T: 'static + Send + Sync> Lazy<T> {
    /// Typically called by `#[derive(Injectable)]` for `Lazy<T>` fields.
    pub fn new(container: &Container) -> Self {
        Self {
            container: container.clone(),
            instance: Mutex::new(None),
            once: Once::new(),
        }
    }

    fn init(&self) {
        self.once.call_once(|| {
            let resolved = self.container.get::<T>().unwrap_or_else(|e| {
                panic!(
                    "failed to lazily resolve dependency '{}': {}",
                    std::any::type_name::<T>(),
                    e
                )
            });
            *self
                .instance
                .lock()
                .unwrap_or_else(PoisonError::into_inner) = Some(resolved);
        });
    }
}

impl<T: 'static + Send + Sync> Deref for Lazy<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        self.init();

        let guard = self.instance.lock().unwrap_or_else(PoisonError::into_inner);

        // SAFETY: after init() the slot is Some and is never written again
        // for this Lazy (the Once gates the only write). The Arc it holds
        // lives as long as `self`, so the reference cannot outlive it.
        unsafe { &*Arc::as_ptr(guard.as_ref().unwrap()) }
    }
}

impl<T: 'static + Send + Sync> Clone for Lazy<T> {
    fn clone(&self) -> Self {
        Self {
            container: self.container.clone(),
            instance: Mutex::new(
                self.instance
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .clone(),
            ),
            // Each clone re-runs init locally; the container cache makes it
            // land on the same singleton.
            once: Once::new(),
        }
    }
}
