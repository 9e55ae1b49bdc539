//! smctl - command-line client for the Service Manager
//!
//! Logs a user in against a remote Service Manager, keeps the session in a
//! small local file and manages brokers and platforms through the remote
//! API. Commands are built on the lifecycle framework in [`cli`].

pub mod client;
pub mod cli;
pub mod domain;
pub mod logging;
pub mod storage;

pub use domain::{Broker, Platform, SessionConfig};
pub use storage::{Configuration, FileConfiguration};
