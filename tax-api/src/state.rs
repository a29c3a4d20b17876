use std::sync::Arc;

use tax_core::TaxService;

use crate::auth::AdminCredentials;

/// Shared by every handler. Cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub service: TaxService,
    pub credentials: Arc<AdminCredentials>,
}

impl AppState {
    pub fn new(
        service: TaxService,
        credentials: AdminCredentials,
    ) -> Self {
        Self {
            service,
            credentials: Arc::new(credentials),
        }
    }
}
