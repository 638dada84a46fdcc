use osint_admin_core::{AdminService, EntitlementStore};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub service: AdminService<dyn EntitlementStore>,
    pub api_key: Arc<str>,
}

impl AppState {
    pub fn new(service: AdminService<dyn EntitlementStore>, api_key: impl Into<Arc<str>>) -> Self {
        Self { service, api_key: api_key.into() }
    }
}
