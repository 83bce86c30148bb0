use crate::di::Injectable;
use crate::routing::RouteDefinition;
use std::sync::Arc;

/// A class grouping related route handlers under a shared base path.
///
/// Implemented by the `#[controller(path = "...")]` and `#[routes]` macros:
/// `#[controller]` supplies the base path and the DI construction recipe,
/// `#[routes]` turns the annotated methods into [`RouteDefinition`]s.
pub trait Controller: Injectable {
    /// Base path all of this controller's routes are nested under.
    fn base_path() -> &'static str;

    /// The controller's route definitions; handlers capture `this`.
    fn routes(this: Arc<Self>) -> Vec<RouteDefinition>;
}
