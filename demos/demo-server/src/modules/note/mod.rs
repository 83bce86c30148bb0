mod controller;
mod model;
mod repository;
mod service;

pub use controller::NoteController;
pub use model::{CreateNoteRequest, Note, UpdateNoteRequest};
pub use repository::{InMemoryNoteRepository, NoteRepository};
pub use service::NoteService;
