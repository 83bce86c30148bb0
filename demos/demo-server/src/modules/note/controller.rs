use super::model::{CreateNoteRequest, Note, UpdateNoteRequest};
use super::service::NoteService;
use armature::prelude::*;
use std::collections::HashMap;
use uuid::Uuid;

#[controller(path = "/notes")]
pub struct NoteController {
    service: Arc<NoteService>,
}

#[routes(NoteController)]
impl NoteController {
    #[post("/")]
    pub async fn create(&self, #[body] request: CreateNoteRequest) -> ApiResponse<Note> {
        ApiResponse::created(self.service.create(request).await)
    }

    #[get("/")]
    pub async fn list(&self, #[query] query: HashMap<String, String>) -> ApiResponse<Vec<Note>> {
        let notes = self
            .service
            .list(query.get("title").map(String::as_str))
            .await;
        ApiResponse::success(notes)
    }

    #[get("/{id}")]
    pub async fn find(&self, #[param] id: Uuid) -> ApiResponse<Note> {
        match self.service.find(id).await {
            Some(note) => ApiResponse::success(note),
            None => ApiResponse::error(StatusCode::NotFound, "note not found"),
        }
    }

    #[put("/{id}")]
    pub async fn update(
        &self,
        #[param] id: Uuid,
        #[body] request: UpdateNoteRequest,
    ) -> ApiResponse<Note> {
        match self.service.update(id, request).await {
            Some(note) => ApiResponse::success(note),
            None => ApiResponse::error(StatusCode::NotFound, "note not found"),
        }
    }

    #[delete("/{id}")]
    pub async fn remove(&self, #[param] id: Uuid) -> ApiResponse<Note> {
        match self.service.remove(id).await {
            Some(note) => ApiResponse::success(note),
            None => ApiResponse::error(StatusCode::NotFound, "note not found"),
        }
    }
}
