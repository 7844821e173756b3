//! Static per-route role requirements.
//!
//! Role requirements are declared in an explicit lookup table keyed by
//! route identifier and checked by the `RoleEnforcer` middleware; there
//! is no route metadata discovery. Two levels exist:
//!
//! - resource-level entries, keyed by a path prefix (`/users` covers
//!   every route below it);
//! - method-level entries, keyed by method plus a path pattern where
//!   `{param}` segments match any single segment.
//!
//! A method-level entry, when present, fully replaces the resource-level
//! one (no union). No entry, or an entry with an empty role list, means
//! no restriction: any authenticated principal passes.

use actix_web::http::Method;

use super::role::Role;

#[derive(Debug, Clone)]
pub struct RoutePolicy {
    resource: Vec<(&'static str, &'static [Role])>,
    method: Vec<(Method, &'static str, &'static [Role])>,
}

impl RoutePolicy {
    pub fn new() -> Self {
        Self {
            resource: Vec::new(),
            method: Vec::new(),
        }
    }

    /// Declare required roles for everything under a path prefix.
    pub fn resource(mut self, prefix: &'static str, roles: &'static [Role]) -> Self {
        self.resource.push((prefix, roles));
        self
    }

    /// Declare required roles for one method + path pattern, replacing
    /// any resource-level declaration for requests it matches.
    pub fn route(mut self, method: Method, pattern: &'static str, roles: &'static [Role]) -> Self {
        self.method.push((method, pattern, roles));
        self
    }

    /// Resolve the required role set for a request. `None` means no
    /// restriction.
    pub fn required_roles(&self, method: &Method, path: &str) -> Option<&'static [Role]> {
        for (m, pattern, roles) in &self.method {
            if m == method && pattern_matches(pattern, path) {
                // Empty declaration is normalized to "no restriction".
                return if roles.is_empty() { None } else { Some(roles) };
            }
        }

        self.resource
            .iter()
            .filter(|(prefix, _)| path == *prefix || path.starts_with(&format!("{prefix}/")))
            .max_by_key(|(prefix, _)| prefix.len())
            .and_then(|(_, roles)| if roles.is_empty() { None } else { Some(*roles) })
    }
}

impl Default for RoutePolicy {
    fn default() -> Self {
        Self::new()
    }
}

/// Match a path against a pattern where `{param}` segments match any
/// single segment.
fn pattern_matches(pattern: &str, path: &str) -> bool {
    let mut pat_segments = pattern.trim_matches('/').split('/');
    let mut path_segments = path.trim_matches('/').split('/');

    loop {
        match (pat_segments.next(), path_segments.next()) {
            (None, None) => return true,
            (Some(p), Some(s)) => {
                if !(p.starts_with('{') && p.ends_with('}')) && p != s {
                    return false;
                }
            }
            _ => return false,
        }
    }
}

/// The shipped policy: the staff resource is admin-only, students are
/// open to any authenticated principal.
pub fn default_policy() -> RoutePolicy {
    RoutePolicy::new().resource("/users", &[Role::Admin])
}
