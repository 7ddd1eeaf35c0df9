use crate::gateway::CoordinatorHandle;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Front door to the session coordinator task
    pub coordinator: CoordinatorHandle,
}

impl AppState {
    pub fn new(coordinator: CoordinatorHandle) -> Self {
        Self { coordinator }
    }
}
