use crate::store::GoalStore;
use std::{path::PathBuf, sync::Arc};
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub screenshot_dir: PathBuf,
    pub store: Arc<Mutex<GoalStore>>,
}

impl AppState {
    pub fn new(store: GoalStore, screenshot_dir: PathBuf) -> Self {
        Self {
            screenshot_dir,
            store: Arc::new(Mutex::new(store)),
        }
    }
}
