pub mod config;
pub mod error;
pub mod firebase;
pub mod importer;
pub mod parser;
pub mod server;
pub mod store;
