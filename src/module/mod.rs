use crate::di::Container;
use crate::error::Result;

/// Trait for application modules.
///
/// Typically implemented via the `#[module]` macro, which generates the
/// registration of bindings, imported modules, providers and controllers.
///
/// # Example
/// ```ignore
/// #[module(
///     providers = [NoteService, InMemoryNoteRepository],
///     bindings = [(dyn NoteRepository => InMemoryNoteRepository)],
/// )]
/// pub struct NoteModule;
/// ```
pub trait Module {
    /// Register this module's providers and controllers into the container.
    /// Registration is cheap; nothing is constructed until first use.
    fn register(container: &Container) -> Result<()>;
}
