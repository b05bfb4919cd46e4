//! Caller network context for audit entries.

use std::convert::Infallible;
use std::net::{IpAddr, SocketAddr};

use assetdesk_core::audit::RequestMeta;
use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::request::Parts;
use axum::http::HeaderMap;

/// IP address and user agent of the caller.
///
/// The address is taken from `X-Forwarded-For` (first hop) or `X-Real-IP`
/// when a reverse proxy sets them, otherwise from the socket peer. Never
/// rejects.
#[derive(Debug, Clone, Default)]
pub struct ClientInfo(pub RequestMeta);

impl<S: Send + Sync> FromRequestParts<S> for ClientInfo {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip());
        Ok(ClientInfo(request_meta(&parts.headers, peer)))
    }
}

/// Build a [`RequestMeta`] from request headers, falling back to `peer`.
pub fn request_meta(headers: &HeaderMap, peer: Option<IpAddr>) -> RequestMeta {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    };

    let ip_address = header("x-forwarded-for")
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .or_else(|| header("x-real-ip"))
        .map(str::to_string)
        .or_else(|| peer.map(|ip| ip.to_string()));

    RequestMeta {
        ip_address,
        user_agent: header("user-agent").map(str::to_string),
    }
}
