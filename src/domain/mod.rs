//! Domain models for smctl
//!
//! Plain data with no I/O: the persisted session and the remote resources.

mod resource;
mod session;

pub use resource::{BasicCredentials, Broker, BrokerUpdate, Credentials, Platform, PlatformUpdate};
pub use session::{basic_token, SessionConfig};
