use crate::{
    config::Config,
    domain::upload::clock::UploadClock,
    infrastructure::storage::traits::StorageService,
};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub storage: Arc<dyn StorageService>,
    pub clock: Arc<UploadClock>,
}

impl AppState {
    pub fn new(config: Config, storage: Arc<dyn StorageService>) -> Self {
        Self {
            config,
            storage,
            clock: Arc::new(UploadClock::new()),
        }
    }
}
