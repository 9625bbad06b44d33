//! Turning a route table into a routing tree.

use axum::http::StatusCode;

use crate::config::loader::ConfigError;
use crate::config::registry::HandlerRegistry;
use crate::config::schema::{RouteConfig, RouterConfig};
use crate::config::validation::{route_id, validate_handlers, ValidationError};
use crate::observability::metrics;
use crate::routing::handler::{DynHandler, Endpoint, Fail};
use crate::routing::router::Router;

/// Build the tree described by `config`, resolving handler names in
/// `registry`. Fails on the first route that cannot be registered.
pub fn build_router(config: &RouterConfig, registry: &HandlerRegistry) -> Result<Router, ConfigError> {
    let result = build(config, registry);
    if let Err(e) = &result {
        metrics::record_route_build_error();
        tracing::error!(error = %e, "Failed to build routing tree");
    }
    result
}

fn build(config: &RouterConfig, registry: &HandlerRegistry) -> Result<Router, ConfigError> {
    validate_handlers(config, registry).map_err(ConfigError::Validation)?;

    let status = StatusCode::from_u16(config.fallback.status).map_err(|_| {
        ConfigError::Validation(vec![ValidationError::InvalidFallbackStatus(config.fallback.status)])
    })?;

    let mut root = Router::new();
    root.fail(Fail::new(status, config.fallback.message.clone()));
    if let Some(name) = &config.handler {
        root.handle_shared(resolve(registry, "", name)?);
    }
    for name in &config.middleware {
        root.use_shared(resolve_middleware(registry, "", name)?);
    }

    for route in &config.routes {
        configure(root.subrouter(), route, "", registry)?;
    }

    tracing::debug!(routes = config.routes.len(), "Routing tree built");
    Ok(root)
}

fn configure(
    node: &mut Router,
    route: &RouteConfig,
    parent: &str,
    registry: &HandlerRegistry,
) -> Result<(), ConfigError> {
    let id = route_id(parent, &route.name);

    if let Some(methods) = &route.methods {
        node.methods(methods.iter().cloned());
    }
    if let Some(schemes) = &route.schemes {
        node.schemes(schemes.iter().cloned());
    }
    if let Some(template) = &route.path {
        node.path(template).map_err(|source| ConfigError::Route {
            route: id.clone(),
            source,
        })?;
    }
    if let Some(prefix) = &route.path_prefix {
        node.path_prefix(prefix.clone());
    }

    if let Some(name) = &route.handler {
        node.handle_shared(resolve(registry, &id, name)?);
    }
    if let Some(name) = &route.fail {
        node.fail_shared(resolve(registry, &id, name)?);
    }
    for name in &route.middleware {
        node.use_shared(resolve_middleware(registry, &id, name)?);
    }

    for child in &route.routes {
        configure(node.subrouter(), child, &id, registry)?;
    }
    Ok(())
}

fn resolve(registry: &HandlerRegistry, route: &str, name: &str) -> Result<Endpoint, ConfigError> {
    registry.get(name).ok_or_else(|| {
        ConfigError::Validation(vec![ValidationError::UnknownHandler {
            route: route.to_string(),
            handler: name.to_string(),
        }])
    })
}

fn resolve_middleware(
    registry: &HandlerRegistry,
    route: &str,
    name: &str,
) -> Result<DynHandler, ConfigError> {
    match resolve(registry, route, name)? {
        Endpoint::Sync(handler) => Ok(handler),
        Endpoint::Async(_) => Err(ConfigError::Validation(vec![ValidationError::AsyncMiddleware {
            route: route.to_string(),
            handler: name.to_string(),
        }])),
    }
}
