//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the router.
//! All types derive Serde traits for deserialization from config files.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::routing::prepare::RawRoute;
use crate::routing::registry::QueueDescriptor;
use crate::routing::route::DestinationSpec;

/// Root configuration for the task router.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Queue definitions: queue name → broker descriptor.
    pub queues: HashMap<String, QueueDescriptor>,

    /// Route entries, walked in order at dispatch. A single entry may be
    /// given without wrapping it in a list.
    pub routes: RoutesConfig,

    /// Auto-provision a destination when a queue name is unregistered.
    pub create_missing: bool,

    /// Exchange type for auto-provisioned destinations.
    pub default_exchange_type: String,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl RouterConfig {
    /// Convert the configured route entries into raw entries for preparation.
    pub fn raw_routes(&self) -> Vec<RawRoute> {
        self.routes.iter().map(RouteEntryConfig::to_raw).collect()
    }
}

/// Route entries: a single entry or an ordered list.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum RoutesConfig {
    Single(RouteEntryConfig),
    Many(Vec<RouteEntryConfig>),
}

impl Default for RoutesConfig {
    fn default() -> Self {
        RoutesConfig::Many(Vec::new())
    }
}

impl RoutesConfig {
    pub fn iter(&self) -> impl Iterator<Item = &RouteEntryConfig> {
        match self {
            RoutesConfig::Single(entry) => std::slice::from_ref(entry).iter(),
            RoutesConfig::Many(entries) => entries.iter(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            RoutesConfig::Single(_) => 1,
            RoutesConfig::Many(entries) => entries.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One route entry: a task→destination table, or the name of a policy
/// registered in code.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum RouteEntryConfig {
    Reference(String),
    Map(HashMap<String, DestinationConfig>),
}

impl RouteEntryConfig {
    fn to_raw(&self) -> RawRoute {
        match self {
            RouteEntryConfig::Reference(name) => RawRoute::Reference(name.clone()),
            RouteEntryConfig::Map(table) => RawRoute::Table(
                table
                    .iter()
                    .map(|(task, dest)| (task.clone(), dest.to_spec()))
                    .collect(),
            ),
        }
    }
}

/// A destination in a route table: either the full parameter table or a bare
/// queue name as shorthand for `{ queue = <name> }`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum DestinationConfig {
    Queue(String),
    Fields(Map<String, Value>),
}

impl DestinationConfig {
    /// Normalize to a destination spec.
    pub fn to_spec(&self) -> DestinationSpec {
        match self {
            DestinationConfig::Queue(name) => {
                let mut spec = Map::new();
                spec.insert("queue".to_string(), Value::String(name.clone()));
                spec
            }
            DestinationConfig::Fields(fields) => fields.clone(),
        }
    }

    /// The queue name this destination references, if any.
    pub fn queue(&self) -> Option<&str> {
        match self {
            DestinationConfig::Queue(name) => Some(name),
            DestinationConfig::Fields(fields) => fields.get("queue").and_then(Value::as_str),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            queues: HashMap::new(),
            routes: RoutesConfig::default(),
            create_missing: false,
            default_exchange_type: "direct".to_string(),
            observability: ObservabilityConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_minimal_config() {
        let config: RouterConfig = toml::from_str("").unwrap();
        assert!(config.queues.is_empty());
        assert!(config.routes.is_empty());
        assert!(!config.create_missing);
        assert_eq!(config.default_exchange_type, "direct");
        assert_eq!(config.observability.log_level, "info");
    }

    #[test]
    fn test_queues_with_extra_parameters() {
        let toml = r#"
[queues.video]
exchange = "media"
exchange_type = "topic"
binding_key = "media.video"
delivery_mode = 2
"#;
        let config: RouterConfig = toml::from_str(toml).unwrap();
        let queue = &config.queues["video"];
        assert_eq!(queue.exchange.as_deref(), Some("media"));
        assert_eq!(queue.exchange_type.as_deref(), Some("topic"));
        assert_eq!(queue.extra["delivery_mode"], json!(2));
    }

    #[test]
    fn test_route_table_entries() {
        let toml = r#"
[[routes]]
"tasks.video.encode" = { queue = "video" }
"tasks.video.thumbs" = "video"

[[routes]]
"tasks.mail.send" = { queue = "mail", priority = 9 }
"#;
        let config: RouterConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.routes.len(), 2);

        let raw = config.raw_routes();
        match &raw[0] {
            RawRoute::Table(table) => {
                assert_eq!(table["tasks.video.encode"]["queue"], json!("video"));
                // Bare string shorthand normalizes to a queue reference.
                assert_eq!(table["tasks.video.thumbs"]["queue"], json!("video"));
            }
            other => panic!("expected table, got {:?}", other),
        }
        match &raw[1] {
            RawRoute::Table(table) => {
                assert_eq!(table["tasks.mail.send"]["priority"], json!(9));
            }
            other => panic!("expected table, got {:?}", other),
        }
    }

    #[test]
    fn test_reference_entries_mixed_with_tables() {
        let toml = r#"
routes = ["policies.broadcast", { "tasks.add" = "math" }]

[queues.math]
exchange = "math"
binding_key = "math"
"#;
        let config: RouterConfig = toml::from_str(toml).unwrap();
        let raw = config.raw_routes();
        assert_eq!(raw.len(), 2);
        assert!(matches!(&raw[0], RawRoute::Reference(name) if name == "policies.broadcast"));
        assert!(matches!(&raw[1], RawRoute::Table(_)));
    }

    #[test]
    fn test_single_route_entry_without_list() {
        let toml = r#"
routes = "policies.broadcast"
"#;
        let config: RouterConfig = toml::from_str(toml).unwrap();
        let raw = config.raw_routes();
        assert_eq!(raw.len(), 1);
        assert!(matches!(&raw[0], RawRoute::Reference(name) if name == "policies.broadcast"));
    }

    #[test]
    fn test_destination_queue_accessor() {
        let dest = DestinationConfig::Queue("video".to_string());
        assert_eq!(dest.queue(), Some("video"));

        let mut fields = Map::new();
        fields.insert("queue".to_string(), json!("mail"));
        let dest = DestinationConfig::Fields(fields);
        assert_eq!(dest.queue(), Some("mail"));

        let dest = DestinationConfig::Fields(Map::new());
        assert_eq!(dest.queue(), None);
    }

    #[test]
    fn test_toggles() {
        let toml = r#"
create_missing = true
default_exchange_type = "topic"

[observability]
log_level = "debug"
"#;
        let config: RouterConfig = toml::from_str(toml).unwrap();
        assert!(config.create_missing);
        assert_eq!(config.default_exchange_type, "topic");
        assert_eq!(config.observability.log_level, "debug");
    }
}
