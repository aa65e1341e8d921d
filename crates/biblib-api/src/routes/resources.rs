//! `GET /resources`: endpoint introspection for the gateway.

use std::collections::BTreeMap;

use axum::Json;
use serde::Serialize;

use crate::routes::{ROUTES, RouteDef};

/// What the gateway needs to know about one route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceInfo {
    /// Required scopes.
    pub scopes: Vec<&'static str>,
    /// Answered methods.
    pub methods: Vec<&'static str>,
    /// Summary.
    pub description: &'static str,
    /// `[requests, period_seconds]`.
    pub rate_limit: [u32; 2],
}

impl From<&RouteDef> for ResourceInfo {
    fn from(route: &RouteDef) -> Self {
        Self {
            scopes: route.scopes.to_vec(),
            methods: route.methods.to_vec(),
            description: route.description,
            rate_limit: [route.rate_limit.0, route.rate_limit.1],
        }
    }
}

/// Builds the rule -> info table.
pub fn resource_table() -> BTreeMap<&'static str, ResourceInfo> {
    ROUTES.iter().map(|r| (r.rule, ResourceInfo::from(r))).collect()
}

/// `GET /resources`.
pub async fn list_resources() -> Json<BTreeMap<&'static str, ResourceInfo>> {
    Json(resource_table())
}
