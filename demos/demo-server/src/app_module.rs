use crate::modules::note::{InMemoryNoteRepository, NoteRepository, NoteService};
use armature::prelude::*;

/// Root application module: wires repositories to their traits and lists
/// every provider the controllers depend on.
#[module(
    providers = [InMemoryNoteRepository, NoteService],
    bindings = [(dyn NoteRepository => InMemoryNoteRepository)],
)]
pub struct AppModule;
