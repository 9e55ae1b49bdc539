//! Blocking HTTP implementation of the Service Manager API

use std::time::Duration;

use reqwest::blocking::{Client, Response};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use super::error::{ClientError, ErrorResponse, Result};
use super::{Connector, ServiceManager};
use crate::domain::{Broker, BrokerUpdate, Platform, PlatformUpdate, SessionConfig};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const BROKERS_PATH: &str = "v1/service_brokers";
const PLATFORMS_PATH: &str = "v1/platforms";

#[derive(Deserialize)]
struct BrokerList {
    #[serde(default)]
    service_brokers: Vec<Broker>,
}

#[derive(Deserialize)]
struct PlatformList {
    #[serde(default)]
    platforms: Vec<Platform>,
}

/// Service Manager client authenticated with the session token
pub struct HttpClient {
    http: Client,
    base_url: Url,
}

impl HttpClient {
    pub fn new(session: &SessionConfig) -> Result<Self> {
        let mut base_url = Url::parse(&session.url)?;
        // Url::join drops the last path segment unless it ends with '/'
        if !base_url.path().ends_with('/') {
            base_url.set_path(&format!("{}/", base_url.path()));
        }

        let mut auth = HeaderValue::from_str(&format!("Basic {}", session.token))
            .map_err(|_| ClientError::InvalidToken)?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        let http = Client::builder()
            .default_headers(headers)
            .timeout(DEFAULT_TIMEOUT)
            .user_agent(concat!("smctl/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub(crate) fn url(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path)?;
        debug!(%url, "GET");
        let response = self.http.get(url).send()?;
        handle_response(response)
    }

    fn post<T: DeserializeOwned, B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<T> {
        let url = self.url(path)?;
        debug!(%url, "POST");
        let response = self.http.post(url).json(body).send()?;
        handle_response(response)
    }

    fn patch<T: DeserializeOwned, B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<T> {
        let url = self.url(path)?;
        debug!(%url, "PATCH");
        let response = self.http.patch(url).json(body).send()?;
        handle_response(response)
    }

    fn delete(&self, path: &str) -> Result<()> {
        let url = self.url(path)?;
        debug!(%url, "DELETE");
        let response = self.http.delete(url).send()?;

        if !response.status().is_success() {
            return Err(extract_error(response));
        }

        Ok(())
    }
}

impl ServiceManager for HttpClient {
    fn list_brokers(&self) -> Result<Vec<Broker>> {
        let list: BrokerList = self.get(BROKERS_PATH)?;
        Ok(list.service_brokers)
    }

    fn register_broker(&self, broker: &Broker) -> Result<Broker> {
        self.post(BROKERS_PATH, broker)
    }

    fn update_broker(&self, id: &str, update: &BrokerUpdate) -> Result<Broker> {
        self.patch(&format!("{}/{}", BROKERS_PATH, id), update)
    }

    fn delete_broker(&self, id: &str) -> Result<()> {
        self.delete(&format!("{}/{}", BROKERS_PATH, id))
    }

    fn list_platforms(&self) -> Result<Vec<Platform>> {
        let list: PlatformList = self.get(PLATFORMS_PATH)?;
        Ok(list.platforms)
    }

    fn register_platform(&self, platform: &Platform) -> Result<Platform> {
        self.post(PLATFORMS_PATH, platform)
    }

    fn update_platform(&self, id: &str, update: &PlatformUpdate) -> Result<Platform> {
        self.patch(&format!("{}/{}", PLATFORMS_PATH, id), update)
    }

    fn delete_platform(&self, id: &str) -> Result<()> {
        self.delete(&format!("{}/{}", PLATFORMS_PATH, id))
    }
}

fn handle_response<T: DeserializeOwned>(response: Response) -> Result<T> {
    if response.status().is_success() {
        Ok(response.json()?)
    } else {
        Err(extract_error(response))
    }
}

fn extract_error(response: Response) -> ClientError {
    let status = response.status().as_u16();

    let message = match response.json::<ErrorResponse>() {
        Ok(body) => body.message(),
        Err(_) => format!("HTTP {}", status),
    };

    ClientError::Api { status, message }
}

/// Connects to the Service Manager over HTTP
#[derive(Debug, Default, Clone, Copy)]
pub struct HttpConnector;

impl Connector for HttpConnector {
    fn connect(&self, session: &SessionConfig) -> Result<Box<dyn ServiceManager>> {
        Ok(Box::new(HttpClient::new(session)?))
    }
}
