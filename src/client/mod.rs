//! # Service Manager Client
//!
//! Boundary to the remote Service Manager API. Commands only see the
//! [`ServiceManager`] trait; the [`Connector`] held by the command context
//! decides how a session turns into a client.
//!
//! | Resource | Endpoint |
//! |----------|----------|
//! | Brokers | `/v1/service_brokers` |
//! | Platforms | `/v1/platforms` |

mod error;
mod http;

pub use error::{ClientError, Result};
pub use http::{HttpClient, HttpConnector};

use crate::domain::{Broker, BrokerUpdate, Platform, PlatformUpdate, SessionConfig};

/// Broker and platform operations exposed by the Service Manager
pub trait ServiceManager {
    fn list_brokers(&self) -> Result<Vec<Broker>>;

    fn register_broker(&self, broker: &Broker) -> Result<Broker>;

    fn update_broker(&self, id: &str, update: &BrokerUpdate) -> Result<Broker>;

    fn delete_broker(&self, id: &str) -> Result<()>;

    fn list_platforms(&self) -> Result<Vec<Platform>>;

    fn register_platform(&self, platform: &Platform) -> Result<Platform>;

    fn update_platform(&self, id: &str, update: &PlatformUpdate) -> Result<Platform>;

    fn delete_platform(&self, id: &str) -> Result<()>;
}

/// Builds a [`ServiceManager`] for a session
pub trait Connector {
    fn connect(&self, session: &SessionConfig) -> Result<Box<dyn ServiceManager>>;
}
