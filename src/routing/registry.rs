//! Queue registry: the broker parameters registered under each queue name.
//!
//! # Responsibilities
//! - Map queue names to their broker descriptors
//! - Exact-match, case-sensitive lookup
//! - Normalize an absent queue map to an empty registry
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - Reload replaces the whole registry via a new Router, never edits in place

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Broker parameters registered under a queue name.
///
/// The queue name itself is the registry key. All fields are optional so a
/// queue can be declared with only the parameters it cares about; anything
/// beyond the well-known fields is kept in `extra` and passed through to the
/// resolved destination untouched.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct QueueDescriptor {
    /// Exchange to publish to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exchange: Option<String>,

    /// Exchange type (e.g. "direct", "topic", "fanout").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exchange_type: Option<String>,

    /// Key the queue is bound with.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub binding_key: Option<String>,

    /// Key messages are published with. Defaults to `binding_key` when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub routing_key: Option<String>,

    /// Additional broker parameters, passed through verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl QueueDescriptor {
    /// Project the descriptor into destination fields.
    ///
    /// `routing_key` falls back to `binding_key`, so a queue declared only
    /// with its binding side still yields a publishable destination.
    pub fn fields(&self) -> Map<String, Value> {
        let mut fields = Map::new();
        if let Some(exchange) = &self.exchange {
            fields.insert("exchange".to_string(), Value::String(exchange.clone()));
        }
        if let Some(exchange_type) = &self.exchange_type {
            fields.insert(
                "exchange_type".to_string(),
                Value::String(exchange_type.clone()),
            );
        }
        if let Some(binding_key) = &self.binding_key {
            fields.insert(
                "binding_key".to_string(),
                Value::String(binding_key.clone()),
            );
        }
        let routing_key = self.routing_key.as_ref().or(self.binding_key.as_ref());
        if let Some(routing_key) = routing_key {
            fields.insert(
                "routing_key".to_string(),
                Value::String(routing_key.clone()),
            );
        }
        for (key, value) in &self.extra {
            fields.insert(key.clone(), value.clone());
        }
        fields
    }

    /// Synthesize a descriptor for an unregistered queue name.
    ///
    /// Used by the auto-provisioning path: the queue name doubles as the
    /// exchange and both keys, with the caller-configured exchange type.
    pub fn synthesized(name: &str, exchange_type: &str) -> Self {
        Self {
            exchange: Some(name.to_string()),
            exchange_type: Some(exchange_type.to_string()),
            binding_key: Some(name.to_string()),
            routing_key: Some(name.to_string()),
            extra: Map::new(),
        }
    }
}

/// Immutable snapshot of queue name → descriptor.
#[derive(Debug, Clone, Default)]
pub struct QueueRegistry {
    queues: HashMap<String, QueueDescriptor>,
}

impl QueueRegistry {
    /// Create a registry from a queue map. `None` is an empty registry.
    pub fn new(queues: Option<HashMap<String, QueueDescriptor>>) -> Self {
        Self {
            queues: queues.unwrap_or_default(),
        }
    }

    /// Look up the descriptor registered under `name`. Exact match.
    pub fn lookup(&self, name: &str) -> Option<&QueueDescriptor> {
        self.queues.get(name)
    }

    /// Number of registered queues.
    pub fn len(&self) -> usize {
        self.queues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queues.is_empty()
    }

    /// Iterate over registered queue names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.queues.keys().map(|name| name.as_str())
    }

    /// Iterate over registered queues.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &QueueDescriptor)> {
        self.queues.iter().map(|(name, desc)| (name.as_str(), desc))
    }
}

impl From<HashMap<String, QueueDescriptor>> for QueueRegistry {
    fn from(queues: HashMap<String, QueueDescriptor>) -> Self {
        Self::new(Some(queues))
    }
}

impl From<Option<HashMap<String, QueueDescriptor>>> for QueueRegistry {
    fn from(queues: Option<HashMap<String, QueueDescriptor>>) -> Self {
        Self::new(queues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn media_queue() -> QueueDescriptor {
        QueueDescriptor {
            exchange: Some("media".to_string()),
            exchange_type: Some("topic".to_string()),
            binding_key: Some("media.video".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_absent_map_is_empty_registry() {
        let registry = QueueRegistry::new(None);
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
        assert!(registry.lookup("anything").is_none());
    }

    #[test]
    fn test_lookup_is_exact_and_case_sensitive() {
        let mut queues = HashMap::new();
        queues.insert("video".to_string(), media_queue());
        let registry = QueueRegistry::from(queues);

        assert!(registry.lookup("video").is_some());
        assert!(registry.lookup("Video").is_none());
        assert!(registry.lookup("vide").is_none());
    }

    #[test]
    fn test_fields_defaults_routing_key_from_binding_key() {
        let fields = media_queue().fields();
        assert_eq!(fields["exchange"], json!("media"));
        assert_eq!(fields["exchange_type"], json!("topic"));
        assert_eq!(fields["binding_key"], json!("media.video"));
        assert_eq!(fields["routing_key"], json!("media.video"));
    }

    #[test]
    fn test_fields_explicit_routing_key_wins() {
        let mut desc = media_queue();
        desc.routing_key = Some("media.#".to_string());
        assert_eq!(desc.fields()["routing_key"], json!("media.#"));
    }

    #[test]
    fn test_fields_carries_extra_parameters() {
        let mut desc = media_queue();
        desc.extra
            .insert("delivery_mode".to_string(), json!(2));
        assert_eq!(desc.fields()["delivery_mode"], json!(2));
    }

    #[test]
    fn test_synthesized_descriptor() {
        let fields = QueueDescriptor::synthesized("jobs", "direct").fields();
        assert_eq!(fields["exchange"], json!("jobs"));
        assert_eq!(fields["exchange_type"], json!("direct"));
        assert_eq!(fields["routing_key"], json!("jobs"));
        assert_eq!(fields["binding_key"], json!("jobs"));
    }

    #[test]
    fn test_descriptor_deserializes_extra_fields() {
        let desc: QueueDescriptor = serde_json::from_value(json!({
            "exchange": "media",
            "binding_key": "media.video",
            "delivery_mode": 2,
            "auto_delete": false,
        }))
        .unwrap();
        assert_eq!(desc.exchange.as_deref(), Some("media"));
        assert_eq!(desc.extra["delivery_mode"], json!(2));
        assert_eq!(desc.extra["auto_delete"], json!(false));
    }
}
