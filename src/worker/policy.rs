//! Interception decision
//!
//! Pure classification of a request into "the worker owns this" or "leave
//! it to default handling". Requests are expected to carry absolute URLs;
//! callers resolve relative paths against the worker origin first.

use crate::config::schema::InterceptConfig;
use crate::http::{FetchRequest, Method};
use std::fmt;
use url::Url;

/// Why a request was left to default handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BypassReason {
    /// Only GET is cacheable
    Method,
    /// Different origin than the worker controls (or unparseable URL)
    CrossOrigin,
    /// Live API traffic
    ApiRoute,
    /// Dev-server module plumbing
    DevInternal,
    /// Cache-busting timestamp query param
    BustParam,
}

impl BypassReason {
    pub fn as_label(&self) -> &'static str {
        match self {
            Self::Method => "method",
            Self::CrossOrigin => "cross-origin",
            Self::ApiRoute => "api-route",
            Self::DevInternal => "dev-internal",
            Self::BustParam => "bust-param",
        }
    }
}

impl fmt::Display for BypassReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_label())
    }
}

/// Outcome of the interception decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Handle,
    Bypass(BypassReason),
}

impl Decision {
    pub fn is_bypass(&self) -> bool {
        matches!(self, Self::Bypass(_))
    }
}

/// Decide whether the worker owns this request
///
/// Method and origin are structural checks; the rest are route denylists
/// from configuration.
pub fn decide(req: &FetchRequest, origin: &str, rules: &InterceptConfig) -> Decision {
    if req.method != Method::Get {
        return Decision::Bypass(BypassReason::Method);
    }

    let Ok(url) = Url::parse(&req.url) else {
        // Cannot be proven same-origin
        return Decision::Bypass(BypassReason::CrossOrigin);
    };
    if !same_origin(&url, origin) {
        return Decision::Bypass(BypassReason::CrossOrigin);
    }

    let path = url.path();
    if rules.api_prefixes.iter().any(|p| path.starts_with(p.as_str())) {
        return Decision::Bypass(BypassReason::ApiRoute);
    }
    if rules.internal_markers.iter().any(|m| path.contains(m.as_str())) {
        return Decision::Bypass(BypassReason::DevInternal);
    }
    if has_bust_param(&url, &rules.bust_params) {
        return Decision::Bypass(BypassReason::BustParam);
    }

    Decision::Handle
}

fn same_origin(url: &Url, origin: &str) -> bool {
    let Ok(own) = Url::parse(origin) else {
        return false;
    };
    url.scheme() == own.scheme()
        && url.host_str() == own.host_str()
        && url.port_or_known_default() == own.port_or_known_default()
}

/// A numeric value under a bust param (`?t=1699999999`) marks a deliberate
/// cache bust; anything else under the same name is ordinary query data.
fn has_bust_param(url: &Url, params: &[String]) -> bool {
    url.query_pairs().any(|(k, v)| {
        params.iter().any(|p| p.as_str() == k.as_ref())
            && !v.is_empty()
            && v.chars().all(|c| c.is_ascii_digit())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::FetchRequest;

    const ORIGIN: &str = "https://shop.koun.app";

    fn rules() -> InterceptConfig {
        InterceptConfig::default()
    }

    fn decide_url(url: &str) -> Decision {
        decide(&FetchRequest::get(url), ORIGIN, &rules())
    }

    // ---- structural checks ----

    #[test]
    fn same_origin_get_is_handled() {
        assert_eq!(decide_url("https://shop.koun.app/products"), Decision::Handle);
        assert_eq!(decide_url("https://shop.koun.app/"), Decision::Handle);
    }

    #[test]
    fn non_get_is_bypassed() {
        for method in [Method::Post, Method::Options] {
            let req = FetchRequest::new(
                method,
                "https://shop.koun.app/products",
                crate::http::RequestMode::Resource,
            );
            assert_eq!(
                decide(&req, ORIGIN, &rules()),
                Decision::Bypass(BypassReason::Method)
            );
        }
    }

    #[test]
    fn cross_origin_is_bypassed() {
        assert_eq!(
            decide_url("https://cdn.koun.app/logo.png"),
            Decision::Bypass(BypassReason::CrossOrigin)
        );
    }

    #[test]
    fn scheme_mismatch_is_cross_origin() {
        assert_eq!(
            decide_url("http://shop.koun.app/products"),
            Decision::Bypass(BypassReason::CrossOrigin)
        );
    }

    #[test]
    fn malformed_url_is_bypassed() {
        assert_eq!(
            decide_url("/products"),
            Decision::Bypass(BypassReason::CrossOrigin)
        );
        assert_eq!(
            decide_url("not a url"),
            Decision::Bypass(BypassReason::CrossOrigin)
        );
    }

    #[test]
    fn default_port_matches() {
        assert_eq!(decide_url("https://shop.koun.app:443/products"), Decision::Handle);
        assert_eq!(
            decide_url("https://shop.koun.app:8443/products"),
            Decision::Bypass(BypassReason::CrossOrigin)
        );
    }

    // ---- route denylists ----

    #[test]
    fn api_route_is_bypassed() {
        assert_eq!(
            decide_url("https://shop.koun.app/api/cart"),
            Decision::Bypass(BypassReason::ApiRoute)
        );
    }

    #[test]
    fn dev_internal_paths_are_bypassed() {
        assert_eq!(
            decide_url("https://shop.koun.app/@vite/client"),
            Decision::Bypass(BypassReason::DevInternal)
        );
        assert_eq!(
            decide_url("https://shop.koun.app/node_modules/.vite/deps/chunk.js"),
            Decision::Bypass(BypassReason::DevInternal)
        );
    }

    #[test]
    fn bust_param_is_bypassed() {
        assert_eq!(
            decide_url("https://shop.koun.app/app.js?t=1699999999"),
            Decision::Bypass(BypassReason::BustParam)
        );
        assert_eq!(
            decide_url("https://shop.koun.app/app.js?page=2&t=17"),
            Decision::Bypass(BypassReason::BustParam)
        );
    }

    #[test]
    fn bust_param_requires_digits() {
        assert_eq!(decide_url("https://shop.koun.app/list?t=shoes"), Decision::Handle);
        assert_eq!(decide_url("https://shop.koun.app/list?t="), Decision::Handle);
    }

    #[test]
    fn ordinary_query_is_handled() {
        assert_eq!(
            decide_url("https://shop.koun.app/products?page=2&sort=price"),
            Decision::Handle
        );
    }

    #[test]
    fn bypass_reason_labels() {
        assert_eq!(BypassReason::CrossOrigin.to_string(), "cross-origin");
        assert!(Decision::Bypass(BypassReason::Method).is_bypass());
        assert!(!Decision::Handle.is_bypass());
    }
}
