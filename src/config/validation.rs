//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Compile every path template so bad routes fail before serving
//! - Check that each node uses at most one path strategy
//! - Check handler references against a registry
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Routes are identified by their chain of names, e.g. `api/song`

use axum::http::StatusCode;
use thiserror::Error;

use crate::config::registry::HandlerRegistry;
use crate::config::schema::{RouteConfig, RouterConfig};
use crate::routing::pattern::PathPattern;

/// A semantic problem in a route table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid fallback status {0}")]
    InvalidFallbackStatus(u16),

    #[error("route #{index} under `{parent}` has no name")]
    MissingName { parent: String, index: usize },

    #[error("route `{0}` sets both path and path_prefix")]
    ConflictingPathFilters(String),

    #[error("route `{route}` has an empty {field} list")]
    EmptyList { route: String, field: &'static str },

    #[error("route `{0}` has an empty path_prefix")]
    EmptyPrefix(String),

    #[error("route `{route}`: {reason}")]
    InvalidPath { route: String, reason: String },

    #[error("route `{route}` references unknown handler `{handler}`")]
    UnknownHandler { route: String, handler: String },

    #[error("route `{route}` uses asynchronous handler `{handler}` as middleware")]
    AsyncMiddleware { route: String, handler: String },
}

/// Check everything that does not depend on which handlers exist.
pub fn validate_config(config: &RouterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let status = config.fallback.status;
    if StatusCode::from_u16(status).is_err() {
        errors.push(ValidationError::InvalidFallbackStatus(status));
    }

    for (index, route) in config.routes.iter().enumerate() {
        validate_route(route, "", index, &mut errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Check that every handler, fallback and middleware name resolves, and
/// that middleware names resolve to synchronous handlers.
pub fn validate_handlers(
    config: &RouterConfig,
    registry: &HandlerRegistry,
) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    for name in &config.handler {
        check_handler(registry, "", name, &mut errors);
    }
    for name in &config.middleware {
        check_middleware(registry, "", name, &mut errors);
    }
    for route in &config.routes {
        check_route_handlers(registry, route, "", &mut errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

pub(crate) fn route_id(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", parent, name)
    }
}

fn validate_route(
    route: &RouteConfig,
    parent: &str,
    index: usize,
    errors: &mut Vec<ValidationError>,
) {
    if route.name.is_empty() {
        errors.push(ValidationError::MissingName {
            parent: parent.to_string(),
            index,
        });
    }
    let id = route_id(parent, &route.name);

    if route.path.is_some() && route.path_prefix.is_some() {
        errors.push(ValidationError::ConflictingPathFilters(id.clone()));
    }

    if route.methods.as_ref().is_some_and(Vec::is_empty) {
        errors.push(ValidationError::EmptyList {
            route: id.clone(),
            field: "methods",
        });
    }
    if route.schemes.as_ref().is_some_and(Vec::is_empty) {
        errors.push(ValidationError::EmptyList {
            route: id.clone(),
            field: "schemes",
        });
    }

    if route.path_prefix.as_deref() == Some("") {
        errors.push(ValidationError::EmptyPrefix(id.clone()));
    }

    if let Some(template) = &route.path {
        if let Err(e) = PathPattern::compile(template) {
            errors.push(ValidationError::InvalidPath {
                route: id.clone(),
                reason: e.to_string(),
            });
        }
    }

    for (index, child) in route.routes.iter().enumerate() {
        validate_route(child, &id, index, errors);
    }
}

fn check_route_handlers(
    registry: &HandlerRegistry,
    route: &RouteConfig,
    parent: &str,
    errors: &mut Vec<ValidationError>,
) {
    let id = route_id(parent, &route.name);
    for name in route.handler.iter().chain(&route.fail) {
        check_handler(registry, &id, name, errors);
    }
    for name in &route.middleware {
        check_middleware(registry, &id, name, errors);
    }
    for child in &route.routes {
        check_route_handlers(registry, child, &id, errors);
    }
}

fn check_handler(
    registry: &HandlerRegistry,
    route: &str,
    name: &str,
    errors: &mut Vec<ValidationError>,
) {
    if !registry.contains(name) {
        errors.push(ValidationError::UnknownHandler {
            route: route.to_string(),
            handler: name.to_string(),
        });
    }
}

fn check_middleware(
    registry: &HandlerRegistry,
    route: &str,
    name: &str,
    errors: &mut Vec<ValidationError>,
) {
    if !registry.contains(name) {
        check_handler(registry, route, name, errors);
    } else if !registry.is_sync(name) {
        errors.push(ValidationError::AsyncMiddleware {
            route: route.to_string(),
            handler: name.to_string(),
        });
    }
}
