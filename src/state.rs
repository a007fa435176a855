use crate::service::FastingLog;
use secrecy::SecretString;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub log: FastingLog,
    pub api_key: Option<Arc<SecretString>>,
}

impl AppState {
    pub fn new(log: FastingLog, api_key: Option<SecretString>) -> Self {
        Self {
            log,
            api_key: api_key.map(Arc::new),
        }
    }
}
