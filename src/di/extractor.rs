use crate::di::Container;
use axum::{
    extract::FromRequestParts,
    http::{StatusCode as HttpStatusCode, request::Parts},
};
use std::sync::Arc;

/// Axum extractor for dependency injection in plain handlers.
///
/// Resolution is lazy, so the first request to use a service constructs it
/// and every later use shares the same singleton.
///
/// # Example
/// ```ignore
/// async fn get_user(
///     Inject(service): Inject<UserService>,
///     Path(id): Path<String>,
/// ) -> Result<Json<User>, ApiError> {
///     let user = service.find_one(id).await?;
///     Ok(Json(user))
/// }
/// ```
pub struct Inject<T>(pub Arc<T>);

/// Trait the router state must implement to expose the DI container.
pub trait HasContainer {
    fn get_container(&self) -> &Container;
}

impl<S, T> FromRequestParts<S> for Inject<T>
where
    S: Send + Sync + HasContainer,
    T: 'static + Send + Sync,
{
    type Rejection = (HttpStatusCode, String);

    async fn from_request_parts(_parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let container = state.get_container();

        container.get::<T>().map(Inject).map_err(|e| {
            (
                HttpStatusCode::INTERNAL_SERVER_ERROR,
                format!("dependency injection failed: {e}"),
            )
        })
    }
}

impl<T> std::ops::Deref for Inject<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> Clone for Inject<T> {
    fn clone(&self) -> Self {
        Inject(Arc::clone(&self.0))
    }
}
