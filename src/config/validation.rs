//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check referential integrity (static destinations reference known queues)
//! - Reject empty identifiers
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RouterConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use thiserror::Error;

use crate::config::schema::{RouteEntryConfig, RouterConfig};

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("queue name must not be empty")]
    EmptyQueueName,

    #[error("route entry {entry}: task name must not be empty")]
    EmptyTaskName { entry: usize },

    #[error("route entry {entry}: policy reference must not be empty")]
    EmptyReference { entry: usize },

    #[error("task {task:?} routes to unknown queue {queue:?}")]
    UnknownQueue { task: String, queue: String },
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &RouterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.queues.keys().any(|name| name.is_empty()) {
        errors.push(ValidationError::EmptyQueueName);
    }

    for (entry, route) in config.routes.iter().enumerate() {
        match route {
            RouteEntryConfig::Reference(name) => {
                if name.is_empty() {
                    errors.push(ValidationError::EmptyReference { entry });
                }
            }
            RouteEntryConfig::Map(table) => {
                for (task, dest) in table {
                    if task.is_empty() {
                        errors.push(ValidationError::EmptyTaskName { entry });
                    }
                    // With auto-provisioning off, a static destination naming
                    // an unregistered queue can never resolve.
                    if !config.create_missing {
                        if let Some(queue) = dest.queue() {
                            if !queue.is_empty() && !config.queues.contains_key(queue) {
                                errors.push(ValidationError::UnknownQueue {
                                    task: task.clone(),
                                    queue: queue.to_string(),
                                });
                            }
                        }
                    }
                }
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(toml: &str) -> RouterConfig {
        toml::from_str(toml).unwrap()
    }

    #[test]
    fn test_empty_config_is_valid() {
        assert!(validate_config(&RouterConfig::default()).is_ok());
    }

    #[test]
    fn test_valid_config() {
        let config = parse(
            r#"
[queues.video]
exchange = "media"
binding_key = "media.video"

[[routes]]
"tasks.video.encode" = { queue = "video" }
"#,
        );
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_unknown_queue_reference() {
        let config = parse(
            r#"
[[routes]]
"tasks.video.encode" = { queue = "video" }
"#,
        );
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::UnknownQueue {
                task: "tasks.video.encode".to_string(),
                queue: "video".to_string(),
            }]
        );
    }

    #[test]
    fn test_create_missing_permits_unknown_queues() {
        let config = parse(
            r#"
create_missing = true

[[routes]]
"tasks.video.encode" = { queue = "video" }
"#,
        );
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let config = parse(
            r#"
[queues.""]
exchange = "x"

[[routes]]
"" = { queue = "nowhere" }
"#,
        );
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.contains(&ValidationError::EmptyQueueName));
        assert!(errors.contains(&ValidationError::EmptyTaskName { entry: 0 }));
        assert!(errors.contains(&ValidationError::UnknownQueue {
            task: "".to_string(),
            queue: "nowhere".to_string(),
        }));
    }

    #[test]
    fn test_empty_reference() {
        let config = parse(r#"routes = """#);
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors, vec![ValidationError::EmptyReference { entry: 0 }]);
    }

    #[test]
    fn test_destination_without_queue_is_fine() {
        let config = parse(
            r#"
[[routes]]
"tasks.log" = { exchange = "logs", routing_key = "app" }
"#,
        );
        assert!(validate_config(&config).is_ok());
    }
}
