#![allow(dead_code)]

use std::{path::PathBuf, sync::Arc, sync::Mutex};

use converter_core::{
    config::ConfigManager,
    core::services::{FavoritesService, UserService},
    domain::default_catalog,
    storage::JsonStorage,
};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates a unique base directory that outlives the calling test.
pub fn temp_base() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

/// JSON storage seeded with the built-in catalog, plus the services on top of it.
pub struct TestEnv {
    pub base: PathBuf,
    pub storage: Arc<JsonStorage>,
    pub users: UserService,
    pub favorites: FavoritesService,
}

pub fn setup_test_env() -> TestEnv {
    let base = temp_base();
    let storage =
        Arc::new(JsonStorage::new(base.join("data")).expect("create json storage backend"));
    storage
        .seed_formulas(default_catalog())
        .expect("seed formula catalog");
    TestEnv {
        users: UserService::new(storage.clone()),
        favorites: FavoritesService::new(storage.clone(), storage.clone()),
        storage,
        base,
    }
}

pub fn config_manager() -> ConfigManager {
    ConfigManager::with_base_dir(temp_base()).expect("create config manager for temp dir")
}
