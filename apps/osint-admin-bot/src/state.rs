use osint_admin_core::AdminBackend;
use std::sync::Arc;

#[derive(Clone)]
pub struct BotState {
    pub backend: Arc<dyn AdminBackend>,
}

impl BotState {
    pub fn new(backend: Arc<dyn AdminBackend>) -> Self {
        Self { backend }
    }
}
