use super::model::{CreateNoteRequest, Note, UpdateNoteRequest};
use super::repository::NoteRepository;
use armature::prelude::*;
use uuid::Uuid;

#[derive(Injectable)]
pub struct NoteService {
    repository: Arc<dyn NoteRepository>,
}

impl NoteService {
    pub async fn create(&self, request: CreateNoteRequest) -> Note {
        let note = Note {
            id: Uuid::new_v4(),
            title: request.title,
            content: request.content,
        };
        tracing::debug!(id = %note.id, "creating note");
        self.repository.insert(note).await
    }

    pub async fn find(&self, id: Uuid) -> Option<Note> {
        self.repository.find(id).await
    }

    pub async fn list(&self, title_filter: Option<&str>) -> Vec<Note> {
        let notes = self.repository.list().await;
        match title_filter {
            Some(filter) => notes
                .into_iter()
                .filter(|note| note.title.contains(filter))
                .collect(),
            None => notes,
        }
    }

    pub async fn update(&self, id: Uuid, request: UpdateNoteRequest) -> Option<Note> {
        let mut note = self.repository.find(id).await?;
        if let Some(title) = request.title {
            note.title = title;
        }
        if let Some(content) = request.content {
            note.content = content;
        }
        Some(self.repository.insert(note).await)
    }

    pub async fn remove(&self, id: Uuid) -> Option<Note> {
        self.repository.remove(id).await
    }
}
