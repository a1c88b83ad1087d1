pub mod catalog;
pub mod proxy;
pub mod upload;

use std::sync::Arc;

use crate::{catalog::Refresher, config::Config, store::MediaStore, upload::UploadGate};

#[derive(Clone)]
pub struct AppState {
    pub store: MediaStore,
    pub refresher: Refresher,
    pub uploads: UploadGate,
    pub config: Arc<Config>,
}
