use std::sync::Arc;

use crate::auth::AuthSettings;
use crate::repository::{BoardRepository, InMemoryStore, TaskRepository, UserRepository};

/// Shared application state, registered once as `web::Data<AppState>`.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub boards: Arc<dyn BoardRepository>,
    pub tasks: Arc<dyn TaskRepository>,
    pub auth: AuthSettings,
}

impl AppState {
    /// State backed by a single `InMemoryStore` serving all three repositories.
    pub fn in_memory(auth: AuthSettings) -> Self {
        let store = Arc::new(InMemoryStore::new());
        Self {
            users: store.clone(),
            boards: store.clone(),
            tasks: store,
            auth,
        }
    }
}
