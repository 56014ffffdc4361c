//! warp adapter over `api::dispatch`.
//!
//! # Invariants
//! - Every request is answered with the JSON envelope; warp rejections are
//!   not used for API errors.
//! - Store I/O runs on the blocking pool, never on the async workers.

use crate::api::{dispatch, ApiContext, ApiRequest};
use crate::envelope::ApiResponse;
use log::{error, info};
use std::convert::Infallible;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::net::{SocketAddr, ToSocketAddrs};
use std::sync::Arc;
use warp::http::{Method, StatusCode};
use warp::hyper::body::Bytes;
use warp::path::FullPath;
use warp::Filter;

#[derive(Debug)]
pub enum ServerError {
    InvalidAddress(String),
    Bind(warp::Error),
}

impl Display for ServerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidAddress(addr) => write!(f, "cannot resolve listen address `{addr}`"),
            Self::Bind(err) => write!(f, "failed to bind server: {err}"),
        }
    }
}

impl Error for ServerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidAddress(_) => None,
            Self::Bind(err) => Some(err),
        }
    }
}

/// Catch-all filter handing every request to `dispatch`.
pub fn routes(
    context: Arc<ApiContext>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    warp::method()
        .and(warp::path::full())
        .and(warp::query::<Vec<(String, String)>>())
        .and(warp::body::bytes())
        .and(warp::any().map(move || Arc::clone(&context)))
        .and_then(handle)
}

/// Serves until Ctrl-C.
pub async fn serve(context: ApiContext, host: &str, port: u16) -> Result<(), ServerError> {
    let addr = resolve(host, port)?;
    let (bound, server) = warp::serve(routes(Arc::new(context)))
        .try_bind_with_graceful_shutdown(addr, async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                error!("event=server_signal module=server status=error error={}", err);
            }
        })
        .map_err(ServerError::Bind)?;

    info!("event=server_start module=server status=ok addr={}", bound);
    server.await;
    info!("event=server_stop module=server status=ok addr={}", bound);
    Ok(())
}

fn resolve(host: &str, port: u16) -> Result<SocketAddr, ServerError> {
    let invalid = || ServerError::InvalidAddress(format!("{host}:{port}"));
    (host, port)
        .to_socket_addrs()
        .map_err(|_| invalid())?
        .next()
        .ok_or_else(invalid)
}

async fn handle(
    method: Method,
    path: FullPath,
    query: Vec<(String, String)>,
    body: Bytes,
    context: Arc<ApiContext>,
) -> Result<impl warp::Reply, Infallible> {
    let request = ApiRequest {
        method: method.as_str().to_string(),
        path: path.as_str().to_string(),
        query,
        body: body.to_vec(),
    };

    let response = match tokio::task::spawn_blocking(move || dispatch(&context, &request)).await {
        Ok(response) => response,
        Err(err) => {
            error!("event=api_dispatch module=server status=error error={}", err);
            ApiResponse::error(500, "Internal Server Error")
        }
    };

    let status =
        StatusCode::from_u16(response.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    Ok(warp::reply::with_status(warp::reply::json(&response), status))
}
