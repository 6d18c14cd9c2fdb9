use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use axum_helpers::{
    ValidatedJson,
    errors::responses::{
        BadRequestValidationResponse, ConflictResponse, InternalServerErrorResponse,
        NotFoundResponse,
    },
};
use serde_json::Value;
use std::sync::Arc;
use utoipa::OpenApi;
use validator::Validate;

use crate::columns::key_column;
use crate::error::{UserError, UserResult};
use crate::models::{User, UserPatch, WriteOutcome};
use crate::repository::UserRepository;
use crate::service::UserService;

pub const TAG: &str = "users";

/// OpenAPI documentation for the Users API
#[derive(OpenApi)]
#[openapi(
    paths(list_users, get_user, create_user, update_user, patch_user, delete_user),
    components(
        schemas(User),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            ConflictResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = TAG, description = "User management endpoints")
    )
)]
pub struct ApiDoc;

/// Users router; mount it under `/users`.
pub fn router<R: UserRepository + 'static>(service: UserService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_users::<R>).post(create_user::<R>))
        .route(
            "/{id}",
            get(get_user::<R>)
                .put(update_user::<R>)
                .patch(patch_user::<R>)
                .delete(delete_user::<R>),
        )
        .with_state(shared_service)
}

/// Rows-affected for an applied write, or the error its outcome stands for.
fn rows_affected(outcome: WriteOutcome, id: &str) -> UserResult<u64> {
    match outcome {
        WriteOutcome::Applied(rows) => Ok(rows),
        WriteOutcome::NotFound => Err(UserError::NotFound(id.to_string())),
        WriteOutcome::Conflict => Err(UserError::Conflict(id.to_string())),
    }
}

/// List all users
#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    responses(
        (status = 200, description = "All users", body = Vec<User>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_users<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
) -> UserResult<Json<Vec<User>>> {
    let users = service.list_users().await?;
    Ok(Json(users))
}

/// Get a user by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = String, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User found", body = User),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    Path(id): Path<String>,
) -> UserResult<Json<User>> {
    let user = service
        .get_user(&id)
        .await?
        .ok_or(UserError::NotFound(id))?;
    Ok(Json(user))
}

/// Create a user with a client-assigned ID
#[utoipa::path(
    post,
    path = "",
    tag = TAG,
    request_body = User,
    responses(
        (status = 201, description = "User created", body = User),
        (status = 400, response = BadRequestValidationResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    ValidatedJson(user): ValidatedJson<User>,
) -> UserResult<impl IntoResponse> {
    let outcome = service.create_user(user.clone()).await?;
    rows_affected(outcome, &user.id)?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Replace every field of a user
///
/// The body may omit `id`; when present it must match the path.
#[utoipa::path(
    put,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = String, Path, description = "User ID")
    ),
    request_body = User,
    responses(
        (status = 200, description = "Rows affected", body = u64),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    Path(id): Path<String>,
    payload: Result<Json<User>, JsonRejection>,
) -> UserResult<Json<u64>> {
    let Json(mut user) = payload?;

    if user.id.is_empty() {
        user.id = id.clone();
    } else if user.id != id {
        return Err(UserError::Validation(format!(
            "body id '{}' does not match path id '{}'",
            user.id, id
        )));
    }
    user.validate()?;

    let outcome = service.update_user(user).await?;
    Ok(Json(rows_affected(outcome, &id)?))
}

/// Update only the supplied fields of a user
///
/// Keys use the JSON field names of `User`; unknown keys are ignored.
/// Values are checked by the repository when it builds the statement.
#[utoipa::path(
    patch,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = String, Path, description = "User ID")
    ),
    request_body(
        content = Object,
        description = "Subset of User fields, e.g. {\"email\": \"ann@example.com\"}"
    ),
    responses(
        (status = 200, description = "Rows affected", body = u64),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn patch_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    Path(id): Path<String>,
    payload: Result<Json<UserPatch>, JsonRejection>,
) -> UserResult<Json<u64>> {
    let Json(mut fields) = payload?;

    let key = key_column().field;
    match fields.get(key) {
        None => {
            fields.insert(key.to_string(), Value::String(id.clone()));
        }
        Some(Value::String(body_id)) if *body_id == id => {}
        Some(other) => {
            return Err(UserError::Validation(format!(
                "body id {} does not match path id '{}'",
                other, id
            )));
        }
    }

    let outcome = service.patch_user(fields).await?;
    Ok(Json(rows_affected(outcome, &id)?))
}

/// Delete a user
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = String, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "Rows affected", body = u64),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    Path(id): Path<String>,
) -> UserResult<Json<u64>> {
    let outcome = service.delete_user(&id).await?;
    Ok(Json(rows_affected(outcome, &id)?))
}
