use std::net::SocketAddr;

use axum::extract::ConnectInfo;
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use axum::{Extension, Json};
use tracing::debug;

use crate::info::info_response;
use crate::ip::{resolve, ForwardingInfo, ValidationError};
use crate::structs::{AppError, Settings, R};

pub async fn handle_ip(
    Extension(settings): Extension<Settings>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
) -> Result<R, AppError> {
    let info = forwarding_info(&headers, peer, settings.trust_forwarded)?;
    Ok(R::ok(serde_json::to_value(info)?))
}

pub async fn handle_ip_text(
    Extension(settings): Extension<Settings>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
) -> Result<String, AppError> {
    let info = forwarding_info(&headers, peer, settings.trust_forwarded)?;
    Ok(info.first)
}

pub async fn handle_info(Extension(settings): Extension<Settings>) -> impl IntoResponse {
    Json(info_response(settings.trust_forwarded))
}

fn forwarding_info(
    headers: &HeaderMap,
    peer: SocketAddr,
    trust_forwarded: bool,
) -> Result<ForwardingInfo, ValidationError> {
    let peer = peer.to_string();
    let info = if trust_forwarded {
        resolve(headers, &peer)?
    } else {
        resolve(&HeaderMap::new(), &peer)?
    };
    debug!(
        "<= peer: {}, source: {:?}, count: {}, first: {}",
        &peer, info.source, info.count, &info.first
    );
    Ok(info)
}
