//! Plain HTTP/1.1 listener for running outside Lambda. Each request is
//! converted to a Lambda-style request and sent through the same router.

use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::{body::Incoming, server::conn::http1, service::service_fn};
use hyper_util::rt::TokioIo;
use lambda_http::{Body, Error, Request, Response};
use rollcall_atoms::response::ApiError;
use rollcall_shared::AppState;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::watch;
use tokio::task::JoinSet;

use crate::http_handler::{error_response, function_handler, internal_error};

/// Largest request body accepted, the same as the Lambda payload limit.
pub const MAX_BODY_BYTES: usize = 6 * 1024 * 1024;

/// How long open connections get to finish once shutdown starts.
pub const DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// Source of incoming connections.
pub trait Listener: Send {
    type Io: AsyncRead + AsyncWrite + Unpin + Send + 'static;

    fn accept(&mut self) -> impl Future<Output = io::Result<(Self::Io, SocketAddr)>> + Send;
}

impl Listener for TcpListener {
    type Io = TcpStream;

    fn accept(&mut self) -> impl Future<Output = io::Result<(Self::Io, SocketAddr)>> + Send {
        TcpListener::accept(self)
    }
}

// Errors about a single connection that died before we got to it.
fn is_connection_error(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::ConnectionRefused
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::ConnectionReset
    )
}

/// Accepts connections until `shutdown` resolves, one task per connection.
///
/// A failed accept never stops the loop. After shutdown, open connections
/// finish their current request, bounded by [`DRAIN_TIMEOUT`].
pub async fn serve<L, F>(mut listener: L, state: Arc<AppState>, shutdown: F)
where
    L: Listener,
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);
    let (closing_tx, closing_rx) = watch::channel(false);
    let mut connections = JoinSet::new();

    loop {
        let (stream, peer) = tokio::select! {
            accepted = listener.accept() => match accepted {
                Ok(conn) => conn,
                Err(e) if is_connection_error(&e) => {
                    tracing::debug!("Connection failed before accept: {}", e);
                    continue;
                }
                Err(e) => {
                    // e.g. out of file descriptors; give in-flight requests room to finish
                    tracing::warn!("Failed to accept connection: {}", e);
                    tokio::time::sleep(ACCEPT_BACKOFF).await;
                    continue;
                }
            },
            Some(_) = connections.join_next(), if !connections.is_empty() => continue,
            _ = &mut shutdown => break,
        };

        let state = Arc::clone(&state);
        let mut closing = closing_rx.clone();
        connections.spawn(async move {
            let service = service_fn(move |req| handle(req, Arc::clone(&state)));
            let conn = http1::Builder::new().serve_connection(TokioIo::new(stream), service);
            tokio::pin!(conn);

            let result = tokio::select! {
                res = conn.as_mut() => res,
                _ = closing.changed() => {
                    conn.as_mut().graceful_shutdown();
                    conn.await
                }
            };
            if let Err(e) = result {
                tracing::debug!(%peer, "Connection closed with error: {}", e);
            }
        });
    }

    drop(listener);
    tracing::info!(
        "Shutting down listener, draining {} connections",
        connections.len()
    );
    let _ = closing_tx.send(true);

    let drain = async { while connections.join_next().await.is_some() {} };
    if tokio::time::timeout(DRAIN_TIMEOUT, drain).await.is_err() {
        tracing::warn!(
            "{} connections still open after {:?}, aborting",
            connections.len(),
            DRAIN_TIMEOUT
        );
        connections.shutdown().await;
    }
}

async fn handle(
    req: hyper::Request<Incoming>,
    state: Arc<AppState>,
) -> Result<hyper::Response<Full<Bytes>>, Error> {
    let (parts, incoming) = req.into_parts();
    let body = match read_body(incoming, MAX_BODY_BYTES).await {
        Ok(body) => body,
        Err(e) if e.is::<LengthLimitError>() => {
            let err = ApiError::BodyTooLarge {
                limit: MAX_BODY_BYTES,
            };
            return Ok(into_hyper_response(error_response(err)));
        }
        Err(e) => return Err(e),
    };

    let resp = match function_handler(Request::from_parts(parts, body), state).await {
        Ok(resp) => resp,
        Err(e) => {
            tracing::error!("Request failed: {}", e);
            internal_error()
        }
    };

    Ok(into_hyper_response(resp))
}

async fn read_body<B>(body: B, limit: usize) -> Result<Body, Error>
where
    B: hyper::body::Body,
    B::Error: Into<Error>,
{
    let bytes = Limited::new(body, limit).collect().await?.to_bytes();
    Ok(if bytes.is_empty() {
        Body::Empty
    } else {
        Body::Binary(bytes.to_vec())
    })
}

fn into_hyper_response(resp: Response<Body>) -> hyper::Response<Full<Bytes>> {
    let (parts, body) = resp.into_parts();
    let bytes = match body {
        Body::Empty => Bytes::new(),
        Body::Text(text) => Bytes::from(text),
        Body::Binary(data) => Bytes::from(data),
    };
    hyper::Response::from_parts(parts, Full::new(bytes))
}
