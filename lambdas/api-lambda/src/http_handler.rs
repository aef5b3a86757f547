use std::sync::Arc;

use lambda_http::{
    http::{header::HeaderValue, Method, StatusCode},
    Body, Error, Request, Response,
};
use rollcall_atoms::{
    assets, health,
    response::{json_response, ApiError, ApiResponse},
    users,
};
use rollcall_shared::AppState;

fn with_cors_headers(mut resp: Response<Body>) -> Response<Body> {
    let headers = resp.headers_mut();
    headers.insert("Access-Control-Allow-Origin", HeaderValue::from_static("*"));
    headers.insert(
        "Access-Control-Allow-Methods",
        HeaderValue::from_static("GET, POST, PUT, DELETE, OPTIONS"),
    );
    headers.insert(
        "Access-Control-Allow-Headers",
        HeaderValue::from_static("Content-Type, Authorization"),
    );
    resp
}

/// Main handler - routes a request to the health check or the user endpoints
pub async fn function_handler(
    event: Request,
    state: Arc<AppState>,
) -> Result<Response<Body>, Error> {
    let method = event.method();
    let path = event.uri().path();
    let body = event.body();
    tracing::info!("{} {}", method, path);

    // Handle CORS preflight
    if method == Method::OPTIONS {
        let resp = Response::builder()
            .status(StatusCode::NO_CONTENT)
            .body(Body::Empty)
            .map_err(Box::new)?;
        return Ok(with_cors_headers(resp));
    }

    let parts: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    let resp = match (method, parts.as_slice()) {
        // GET /health
        (&Method::GET, ["health"]) => health::health_check(state.started_at).await,
        (_, ["health"]) => ApiError::MethodNotAllowed.into_response(),

        // --- USERS ---
        // GET /api/v1/users - list all users
        (&Method::GET, ["api", "v1", "users"]) => users::list_users(&state.store).await,
        // POST /api/v1/users - create user
        (&Method::POST, ["api", "v1", "users"]) => {
            users::create_user(&state.store, &state.mirror, body).await
        }
        (_, ["api", "v1", "users"]) => ApiError::MethodNotAllowed.into_response(),
        // GET /api/v1/users/{id}
        (&Method::GET, ["api", "v1", "users", user_id]) => {
            users::get_user(&state.store, user_id).await
        }
        // PUT /api/v1/users/{id}
        (&Method::PUT, ["api", "v1", "users", user_id]) => {
            users::update_user(&state.store, &state.mirror, user_id, body).await
        }
        // DELETE /api/v1/users/{id}
        (&Method::DELETE, ["api", "v1", "users", user_id]) => {
            users::delete_user(&state.store, user_id).await
        }
        (_, ["api", "v1", "users", _]) => ApiError::MethodNotAllowed.into_response(),

        // GET /static/{path} - files under the static directory
        (&Method::GET, ["static", rest @ ..]) if !rest.is_empty() => {
            assets::serve_file(&state.static_dir, &rest.join("/")).await
        }
        (_, ["static", _, ..]) => ApiError::MethodNotAllowed.into_response(),

        _ => ApiError::RouteNotFound.into_response(),
    };

    resp.map(with_cors_headers)
}

/// Error envelope with CORS headers, for failures detected before routing.
pub fn error_response(err: ApiError) -> Response<Body> {
    match err.into_response() {
        Ok(resp) => with_cors_headers(resp),
        Err(_) => internal_error(),
    }
}

/// Envelope for failures that escape a handler, such as a response that
/// could not be built.
pub fn internal_error() -> Response<Body> {
    let resp = json_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        &ApiResponse::error("Internal server error"),
    )
    .unwrap_or_else(|_| {
        let mut resp = Response::new(Body::Empty);
        *resp.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
        resp
    });
    with_cors_headers(resp)
}
