//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, bind address parses)
//! - Compile every route so bad patterns and rewrite references fail startup
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::config::schema::AppConfig;
use crate::routing::{RouteError, RouteRule};

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address `{0}` is not a valid socket address")]
    BindAddress(String),

    #[error("app.default_controller must not be empty")]
    EmptyDefaultController,

    #[error("app.default_action must not be empty")]
    EmptyDefaultAction,

    #[error("app.urls.{0} must not be empty")]
    EmptyNamedUrl(String),

    #[error("timeouts.request_secs must be greater than zero")]
    RequestTimeout,

    #[error("observability.log_level `{0}` is not a valid filter")]
    LogLevel(String),

    #[error("routes[{index}] `{pattern}`: {source}")]
    Route {
        index: usize,
        pattern: String,
        source: RouteError,
    },
}

/// Validate `config`, collecting every error.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if config.app.default_controller.is_empty() {
        errors.push(ValidationError::EmptyDefaultController);
    }
    if config.app.default_action.is_empty() {
        errors.push(ValidationError::EmptyDefaultAction);
    }

    for (name, url) in &config.app.urls {
        if url.trim().is_empty() {
            errors.push(ValidationError::EmptyNamedUrl(name.clone()));
        }
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::RequestTimeout);
    }

    if EnvFilter::try_new(&config.observability.log_level).is_err() {
        errors.push(ValidationError::LogLevel(
            config.observability.log_level.clone(),
        ));
    }

    for (index, route) in config.routes.iter().enumerate() {
        if let Err(source) = RouteRule::compile(&route.pattern, &route.rewrite) {
            errors.push(ValidationError::Route {
                index,
                pattern: route.pattern.clone(),
                source,
            });
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
    use crate::config::RouteConfig;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(validate_config(&AppConfig::default()), Ok(()));
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = AppConfig::default();
        config.listener.bind_address = "nowhere".into();
        config.app.default_controller.clear();
        config.timeouts.request_secs = 0;
        config.routes.push(RouteConfig {
            name: None,
            pattern: "home/[*]".into(),
            rewrite: "ok/[*0]".into(),
        });
        config.routes.push(RouteConfig {
            name: None,
            pattern: "/".into(),
            rewrite: "x".into(),
        });
        config.routes.push(RouteConfig {
            name: None,
            pattern: "blog/[*]".into(),
            rewrite: "posts/[*3]".into(),
        });

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 5);
        assert_eq!(errors[0], ValidationError::BindAddress("nowhere".into()));
        assert_eq!(errors[1], ValidationError::EmptyDefaultController);
        assert_eq!(errors[2], ValidationError::RequestTimeout);
        assert!(matches!(
            errors[3],
            ValidationError::Route {
                index: 1,
                source: RouteError::EmptyPattern,
                ..
            }
        ));
        assert!(matches!(
            errors[4],
            ValidationError::Route {
                index: 2,
                source: RouteError::UnknownGroup { group: 3, .. },
                ..
            }
        ));
    }

    #[test]
    fn test_empty_named_url() {
        let mut config = AppConfig::default();
        config.app.urls.insert("docs".into(), "https://docs.example.com".into());
        config.app.urls.insert("blank".into(), " ".into());
        assert_eq!(
            validate_config(&config),
            Err(vec![ValidationError::EmptyNamedUrl("blank".into())])
        );
    }

    #[test]
    fn test_route_error_message_names_route() {
        let mut config = AppConfig::default();
        config.routes.push(RouteConfig {
            name: None,
            pattern: "shop/[*x]".into(),
            rewrite: "x".into(),
        });
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors[0].to_string(),
            "routes[0] `shop/[*x]`: invalid placeholder `[*x]` in pattern `shop/[*x]`"
        );
    }
}
