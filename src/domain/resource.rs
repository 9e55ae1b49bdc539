//! Service Manager resources
//!
//! Brokers and platforms as the remote API exposes them. Fields the CLI
//! never sets are optional so that partial server responses still decode.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Basic credentials attached to a broker or returned for a platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicCredentials {
    pub username: String,
    pub password: String,
}

impl BasicCredentials {
    /// Parses `user:password`
    pub fn parse(value: &str) -> Option<Self> {
        let (username, password) = value.split_once(':')?;
        if username.is_empty() || password.is_empty() {
            return None;
        }
        Some(Self {
            username: username.to_string(),
            password: password.to_string(),
        })
    }
}

/// Credentials wrapper used by the remote API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub basic: BasicCredentials,
}

/// A service broker registered in the Service Manager
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Broker {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub name: String,

    #[serde(default)]
    pub broker_url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials: Option<Credentials>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A platform (Cloud Foundry, Kubernetes, ...) registered in the Service Manager
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Platform {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub name: String,

    #[serde(rename = "type", default)]
    pub platform_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Only present in the response to a registration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials: Option<Credentials>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Partial update for a broker; unset fields are left untouched
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct BrokerUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub broker_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl BrokerUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.broker_url.is_none() && self.description.is_none()
    }
}

/// Partial update for a platform; unset fields are left untouched
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct PlatformUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub platform_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl PlatformUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.platform_type.is_none() && self.description.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_basic_credentials() {
        let creds = BasicCredentials::parse("admin:secret").unwrap();
        assert_eq!(creds.username, "admin");
        assert_eq!(creds.password, "secret");

        // Only the first colon separates user from password
        let creds = BasicCredentials::parse("admin:se:cret").unwrap();
        assert_eq!(creds.password, "se:cret");
    }

    #[test]
    fn parse_basic_credentials_rejects_malformed() {
        assert!(BasicCredentials::parse("admin").is_none());
        assert!(BasicCredentials::parse(":secret").is_none());
        assert!(BasicCredentials::parse("admin:").is_none());
    }

    #[test]
    fn platform_type_uses_wire_name() {
        let json = r#"{"id":"p-1","name":"cf-eu","type":"cloudfoundry"}"#;
        let platform: Platform = serde_json::from_str(json).unwrap();

        assert_eq!(platform.platform_type, "cloudfoundry");
        assert!(platform.credentials.is_none());
    }

    #[test]
    fn broker_decodes_timestamps() {
        let json = r#"{
            "id": "b-1",
            "name": "mysql",
            "broker_url": "https://mysql.example.com",
            "created_at": "2024-03-01T10:00:00Z"
        }"#;
        let broker: Broker = serde_json::from_str(json).unwrap();

        assert_eq!(broker.id.as_deref(), Some("b-1"));
        assert!(broker.created_at.is_some());
        assert!(broker.updated_at.is_none());
    }

    #[test]
    fn update_skips_unset_fields() {
        let update = BrokerUpdate {
            description: Some("new".to_string()),
            ..Default::default()
        };

        assert!(!update.is_empty());
        assert_eq!(serde_json::to_string(&update).unwrap(), r#"{"description":"new"}"#);
        assert!(PlatformUpdate::default().is_empty());
    }
}
