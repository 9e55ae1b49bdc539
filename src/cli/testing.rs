//! Test doubles for command tests

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use anyhow::{anyhow, Result};

use super::context::Context;
use super::output::Output;
use crate::client::{self, ClientError, Connector, ServiceManager};
use crate::domain::{Broker, BrokerUpdate, Platform, PlatformUpdate, SessionConfig};
use crate::storage::Configuration;

/// Writer whose contents stay readable after being boxed into an [`Output`]
#[derive(Clone, Default)]
pub struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// In-memory session store
#[derive(Clone, Default)]
pub struct MemoryConfiguration(Rc<RefCell<Option<SessionConfig>>>);

impl MemoryConfiguration {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_session(session: SessionConfig) -> Self {
        Self(Rc::new(RefCell::new(Some(session))))
    }

    pub fn stored(&self) -> Option<SessionConfig> {
        self.0.borrow().clone()
    }
}

impl Configuration for MemoryConfiguration {
    fn load(&self) -> Result<SessionConfig> {
        self.0
            .borrow()
            .clone()
            .ok_or_else(|| anyhow!("no session stored"))
    }

    fn save(&self, session: &SessionConfig) -> Result<()> {
        *self.0.borrow_mut() = Some(session.clone());
        Ok(())
    }
}

/// Store whose writes always fail with the given message
pub struct FailingConfiguration(pub &'static str);

impl Configuration for FailingConfiguration {
    fn load(&self) -> Result<SessionConfig> {
        Err(anyhow!("no session stored"))
    }

    fn save(&self, _session: &SessionConfig) -> Result<()> {
        Err(anyhow!(self.0))
    }
}

#[derive(Default)]
struct RemoteState {
    brokers: Vec<Broker>,
    platforms: Vec<Platform>,
    next_id: usize,
    connected: Vec<SessionConfig>,
}

impl RemoteState {
    fn allocate_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{}-{}", prefix, self.next_id)
    }
}

/// In-memory Service Manager
#[derive(Clone, Default)]
pub struct FakeRemote(Rc<RefCell<RemoteState>>);

impl FakeRemote {
    pub fn brokers(&self) -> Vec<Broker> {
        self.0.borrow().brokers.clone()
    }

    pub fn platforms(&self) -> Vec<Platform> {
        self.0.borrow().platforms.clone()
    }

    /// Sessions passed to `connect`, oldest first
    pub fn connected(&self) -> Vec<SessionConfig> {
        self.0.borrow().connected.clone()
    }

    pub fn add_broker(&self, name: &str, url: &str) -> String {
        let mut state = self.0.borrow_mut();
        let id = state.allocate_id("b");
        state.brokers.push(Broker {
            id: Some(id.clone()),
            name: name.to_string(),
            broker_url: url.to_string(),
            ..Default::default()
        });
        id
    }

    pub fn add_platform(&self, name: &str, platform_type: &str) -> String {
        let mut state = self.0.borrow_mut();
        let id = state.allocate_id("p");
        state.platforms.push(Platform {
            id: Some(id.clone()),
            name: name.to_string(),
            platform_type: platform_type.to_string(),
            ..Default::default()
        });
        id
    }
}

fn missing(id: &str) -> ClientError {
    ClientError::Api {
        status: 404,
        message: format!("{} not found", id),
    }
}

impl ServiceManager for FakeRemote {
    fn list_brokers(&self) -> client::Result<Vec<Broker>> {
        Ok(self.brokers())
    }

    fn register_broker(&self, broker: &Broker) -> client::Result<Broker> {
        let mut state = self.0.borrow_mut();
        if state.brokers.iter().any(|b| b.name == broker.name) {
            return Err(ClientError::Api {
                status: 409,
                message: "broker already exists".to_string(),
            });
        }
        let mut created = broker.clone();
        created.id = Some(state.allocate_id("b"));
        created.credentials = None;
        state.brokers.push(created.clone());
        Ok(created)
    }

    fn update_broker(&self, id: &str, update: &BrokerUpdate) -> client::Result<Broker> {
        let mut state = self.0.borrow_mut();
        let broker = state
            .brokers
            .iter_mut()
            .find(|b| b.id.as_deref() == Some(id))
            .ok_or_else(|| missing(id))?;
        if let Some(name) = &update.name {
            broker.name = name.clone();
        }
        if let Some(url) = &update.broker_url {
            broker.broker_url = url.clone();
        }
        if let Some(description) = &update.description {
            broker.description = Some(description.clone());
        }
        Ok(broker.clone())
    }

    fn delete_broker(&self, id: &str) -> client::Result<()> {
        let mut state = self.0.borrow_mut();
        let before = state.brokers.len();
        state.brokers.retain(|b| b.id.as_deref() != Some(id));
        if state.brokers.len() == before {
            return Err(missing(id));
        }
        Ok(())
    }

    fn list_platforms(&self) -> client::Result<Vec<Platform>> {
        Ok(self.platforms())
    }

    fn register_platform(&self, platform: &Platform) -> client::Result<Platform> {
        let mut state = self.0.borrow_mut();
        let mut created = platform.clone();
        created.id = Some(state.allocate_id("p"));
        state.platforms.push(created.clone());
        created.credentials = Some(crate::domain::Credentials {
            basic: crate::domain::BasicCredentials {
                username: "generated-user".to_string(),
                password: "generated-pass".to_string(),
            },
        });
        Ok(created)
    }

    fn update_platform(&self, id: &str, update: &PlatformUpdate) -> client::Result<Platform> {
        let mut state = self.0.borrow_mut();
        let platform = state
            .platforms
            .iter_mut()
            .find(|p| p.id.as_deref() == Some(id))
            .ok_or_else(|| missing(id))?;
        if let Some(name) = &update.name {
            platform.name = name.clone();
        }
        if let Some(platform_type) = &update.platform_type {
            platform.platform_type = platform_type.clone();
        }
        if let Some(description) = &update.description {
            platform.description = Some(description.clone());
        }
        Ok(platform.clone())
    }

    fn delete_platform(&self, id: &str) -> client::Result<()> {
        let mut state = self.0.borrow_mut();
        let before = state.platforms.len();
        state.platforms.retain(|p| p.id.as_deref() != Some(id));
        if state.platforms.len() == before {
            return Err(missing(id));
        }
        Ok(())
    }
}

impl Connector for FakeRemote {
    fn connect(&self, session: &SessionConfig) -> client::Result<Box<dyn ServiceManager>> {
        self.0.borrow_mut().connected.push(session.clone());
        Ok(Box::new(self.clone()))
    }
}

/// Context writing into a buffer and talking to an in-memory remote
pub fn test_context(
    config: impl Configuration + 'static,
) -> (Rc<Context>, SharedBuffer, FakeRemote) {
    let buffer = SharedBuffer::default();
    let remote = FakeRemote::default();
    let ctx = Context::new(
        Output::new(Box::new(buffer.clone())),
        Box::new(config),
        Box::new(remote.clone()),
    );
    (Rc::new(ctx), buffer, remote)
}

/// A logged-in context
pub fn logged_in_context() -> (Rc<Context>, SharedBuffer, FakeRemote) {
    test_context(MemoryConfiguration::with_session(
        SessionConfig::with_basic_auth("http://sm.example.com", "admin", "admin"),
    ))
}
