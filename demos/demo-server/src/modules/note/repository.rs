use super::model::Note;
use armature::prelude::*;
use dashmap::DashMap;
use uuid::Uuid;

#[async_trait]
pub trait NoteRepository: Send + Sync {
    async fn insert(&self, note: Note) -> Note;
    async fn find(&self, id: Uuid) -> Option<Note>;
    async fn list(&self) -> Vec<Note>;
    async fn remove(&self, id: Uuid) -> Option<Note>;
}

#[derive(Default)]
pub struct InMemoryNoteRepository {
    notes: DashMap<Uuid, Note>,
}

// Hand-written recipe: the store has no injected dependencies.
impl armature::Injectable for InMemoryNoteRepository {
    fn inject(_: &Container) -> armature::Result<Self> {
        Ok(Self::default())
    }
}

#[async_trait]
impl NoteRepository for InMemoryNoteRepository {
    async fn insert(&self, note: Note) -> Note {
        self.notes.insert(note.id, note.clone());
        note
    }

    async fn find(&self, id: Uuid) -> Option<Note> {
        self.notes.get(&id).map(|entry| entry.clone())
    }

    async fn list(&self) -> Vec<Note> {
        self.notes.iter().map(|entry| entry.clone()).collect()
    }

    async fn remove(&self, id: Uuid) -> Option<Note> {
        self.notes.remove(&id).map(|(_, note)| note)
    }
}
