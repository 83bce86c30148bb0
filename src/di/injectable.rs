use crate::di::Container;
use crate::error::Result;

/// Trait for types that can be constructed out of the DI container.
///
/// `inject` is the explicit dependency declaration: the implementation names
/// each dependency by requesting it from the container, and the container
/// resolves the whole subtree depth-first. Typically generated by
/// `#[derive(Injectable)]`.
///
/// # Example
/// ```
/// use armature::di::{Container, Injectable};
/// use std::sync::Arc;
///
/// struct Mailer;
/// impl Injectable for Mailer {
///     fn inject(_: &Container) -> armature::Result<Self> {
///         Ok(Mailer)
///     }
/// }
///
/// struct SignupService {
///     mailer: Arc<Mailer>,
/// }
/// impl Injectable for SignupService {
///     fn inject(container: &Container) -> armature::Result<Self> {
///         Ok(Self {
///             mailer: container.get()?,
///         })
///     }
/// }
/// ```
pub trait Injectable: Sized + Send + Sync + 'static {
    /// Create an instance by resolving dependencies from the container.
    ///
    /// # Errors
    /// Returns an error if any required dependency is not registered.
    fn inject(container: &Container) -> Result<Self>;
}
