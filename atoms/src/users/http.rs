use lambda_http::{http::StatusCode, Body, Error, Response};

use super::mirror::UserMirror;
use super::model::{CreateUserPayload, UpdateUserPayload};
use super::store::UserStore;
use crate::response::{json_response, ApiError, ApiResponse};

/// GET /api/v1/users
pub async fn list_users(store: &UserStore) -> Result<Response<Body>, Error> {
    let users = store.list();
    tracing::debug!("Listing {} users", users.len());
    json_response(
        StatusCode::OK,
        &ApiResponse::success("Users retrieved successfully", Some(users)),
    )
}

/// POST /api/v1/users
///
/// Id and creation time are assigned here; the stored record is then
/// mirrored to disk before responding.
pub async fn create_user(
    store: &UserStore,
    mirror: &UserMirror,
    body: &[u8],
) -> Result<Response<Body>, Error> {
    let req: CreateUserPayload = match serde_json::from_slice(body) {
        Ok(req) => req,
        Err(e) => return ApiError::InvalidBody(e).into_response(),
    };

    let user = store.create(req.name, req.email);
    tracing::info!(user_id = %user.id, "Created user");

    mirror.record(&user).await;

    json_response(
        StatusCode::CREATED,
        &ApiResponse::success("User created successfully", Some(user)),
    )
}

/// GET /api/v1/users/{id}
pub async fn get_user(store: &UserStore, user_id: &str) -> Result<Response<Body>, Error> {
    match store.get(user_id) {
        Ok(user) => json_response(
            StatusCode::OK,
            &ApiResponse::success("User retrieved successfully", Some(user)),
        ),
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// PUT /api/v1/users/{id}
///
/// An unknown id is reported before the body is looked at.
pub async fn update_user(
    store: &UserStore,
    mirror: &UserMirror,
    user_id: &str,
    body: &[u8],
) -> Result<Response<Body>, Error> {
    if let Err(e) = store.get(user_id) {
        return ApiError::from(e).into_response();
    }

    let req: UpdateUserPayload = match serde_json::from_slice(body) {
        Ok(req) => req,
        Err(e) => return ApiError::InvalidBody(e).into_response(),
    };

    // The record may have been deleted since the lookup above.
    let user = match store.update(user_id, &req) {
        Ok(user) => user,
        Err(e) => return ApiError::from(e).into_response(),
    };
    tracing::info!(user_id = %user.id, "Updated user");

    mirror.record(&user).await;

    json_response(
        StatusCode::OK,
        &ApiResponse::success("User updated successfully", Some(user)),
    )
}

/// DELETE /api/v1/users/{id}
pub async fn delete_user(store: &UserStore, user_id: &str) -> Result<Response<Body>, Error> {
    match store.delete(user_id) {
        Ok(()) => {
            tracing::info!(user_id, "Deleted user");
            json_response(
                StatusCode::OK,
                &ApiResponse::<()>::success("User deleted successfully", None),
            )
        }
        Err(e) => ApiError::from(e).into_response(),
    }
}
