use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use turnstile_application::UpsertOutcome;
use turnstile_domain::UserId;

use crate::dto::{UpsertUserRequest, UserRequest, UserResponse};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn create_user_handler(
    State(state): State<AppState>,
    Json(payload): Json<UserRequest>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    let user = state.user_service.create_unique(payload.into()).await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

pub async fn upsert_user_handler(
    State(state): State<AppState>,
    Json(payload): Json<UpsertUserRequest>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    let (user, outcome) = state.user_service.upsert(payload.into()).await?;
    let status = match outcome {
        UpsertOutcome::Created => StatusCode::CREATED,
        UpsertOutcome::Updated => StatusCode::OK,
    };

    Ok((status, Json(UserResponse::from(user))))
}

pub async fn update_user_handler(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(payload): Json<UserRequest>,
) -> ApiResult<Json<UserResponse>> {
    let user = state
        .user_service
        .update_existing(user_id.parse::<UserId>()?, payload.into())
        .await?;

    Ok(Json(UserResponse::from(user)))
}

pub async fn get_user_handler(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<UserResponse>> {
    let user = state
        .user_service
        .get_by_id(user_id.parse::<UserId>()?)
        .await?;

    Ok(Json(UserResponse::from(user)))
}

pub async fn list_users_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<UserResponse>>> {
    let users = state
        .user_service
        .list_all()
        .await?
        .into_iter()
        .map(UserResponse::from)
        .collect();

    Ok(Json(users))
}

pub async fn delete_user_handler(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<StatusCode> {
    state
        .user_service
        .delete(user_id.parse::<UserId>()?)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
