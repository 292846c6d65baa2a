pub mod acronym;
pub mod backend;
pub mod directory_client;
pub mod http_backend;
#[cfg(test)]
pub mod memory_backend;
pub mod migration_runner;
pub mod reconciler;
