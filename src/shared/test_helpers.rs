#[cfg(test)]
use crate::features::{bots, files};
#[cfg(test)]
use crate::modules::persistence::Repositories;
#[cfg(test)]
use crate::modules::storage::LocalDiskStore;
#[cfg(test)]
use axum_test::TestServer;
#[cfg(test)]
use std::sync::Arc;
#[cfg(test)]
use tempfile::TempDir;

#[cfg(test)]
pub fn memory_bot_service() -> Arc<bots::BotService> {
    Arc::new(bots::BotService::new(Repositories::in_memory().bots))
}

/// File service writing into a fresh temporary directory
#[cfg(test)]
pub fn local_file_service() -> (Arc<files::FileService>, TempDir) {
    let dir = TempDir::new().unwrap();
    let service = files::FileService::new(
        Repositories::in_memory().files,
        Arc::new(LocalDiskStore::new(dir.path())),
    );
    (Arc::new(service), dir)
}

#[cfg(test)]
pub fn bot_test_server() -> TestServer {
    TestServer::new(bots::routes(memory_bot_service())).unwrap()
}

#[cfg(test)]
pub fn file_test_server() -> (TestServer, TempDir) {
    let (service, dir) = local_file_service();
    (TestServer::new(files::routes(service)).unwrap(), dir)
}
