use axum::{Router, routing::get};

pub mod health;
pub mod users;

/// Domain routes plus `/health`, ready for `create_router`.
///
/// Every sub-router has its state applied, so the result is stateless.
pub fn routes(state: &crate::state::AppState) -> Router {
    Router::new()
        .nest("/users", users::router(state))
        .merge(health_router(state.clone()))
}

fn health_router(state: crate::state::AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, Environment};
    use crate::openapi::ApiDoc;
    use crate::state::AppState;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use core_config::{LogFormat, app_info, server::ServerConfig};
    use database::postgres::PostgresConfig;
    use http_body_util::BodyExt;
    use sea_orm::{
        DatabaseBackend, DatabaseConnection, DbErr, MockDatabase, MockExecResult, Value,
    };
    use serde_json::json;
    use std::collections::BTreeMap;
    use tower::ServiceExt;

    fn state(db: DatabaseConnection) -> AppState {
        AppState {
            config: Config {
                app: app_info!(),
                database: PostgresConfig::new("postgres://localhost/users"),
                server: ServerConfig::default(),
                environment: Environment::Development,
                log_format: LogFormat::Pretty,
                run_migrations: false,
            },
            db,
        }
    }

    fn app(db: DatabaseConnection) -> Router {
        axum_helpers::create_router::<ApiDoc>(routes(&state(db)))
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn post(app: Router, uri: &str, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn user_row(id: &str, username: &str) -> BTreeMap<&'static str, Value> {
        BTreeMap::from([
            ("id", Value::from(id)),
            ("username", Value::from(username)),
            ("email", Value::from(format!("{}@x.com", username))),
            ("phone", Value::from("555")),
            ("date_of_birth", Value::ChronoDate(None)),
        ])
    }

    #[tokio::test]
    async fn test_health_up_when_database_answers() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![BTreeMap::from([("?column?", Value::from(1i32))])]])
            .into_connection();

        let (status, body) = get(app(db), "/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "UP", "details": {"database": {"status": "UP"}}}));
    }

    #[tokio::test]
    async fn test_health_down_when_database_errors() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([DbErr::Custom("connection refused".to_string())])
            .into_connection();

        let (status, body) = get(app(db), "/health").await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["status"], "DOWN");
        assert_eq!(body["details"]["database"]["status"], "DOWN");
    }

    #[tokio::test]
    async fn test_users_are_mounted_under_users_prefix() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![user_row("u1", "ann")]])
            .into_connection();

        let (status, body) = get(app(db), "/users/u1").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["username"], "ann");
        assert_eq!(body["dateOfBirth"], serde_json::Value::Null);
    }

    #[tokio::test]
    async fn test_list_users_at_collection_root() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![user_row("u1", "ann"), user_row("u2", "bob")]])
            .into_connection();

        let (status, body) = get(app(db), "/users").await;

        assert_eq!(status, StatusCode::OK);
        let users = body.as_array().unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[0]["id"], "u1");
        assert_eq!(users[1]["email"], "bob@x.com");
    }

    #[tokio::test]
    async fn test_create_user_at_collection_root() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();
        let user = json!({
            "id": "u1",
            "username": "ann",
            "email": "ann@x.com",
            "phone": "(555) 123-4567",
            "dateOfBirth": "1990-01-01"
        });

        let (status, body) = post(app(db), "/users", user.clone()).await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body, user);
    }

    #[tokio::test]
    async fn test_create_existing_user_at_collection_root_is_409() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_errors([DbErr::Custom(
                "duplicate key value violates unique constraint \"users_pkey\"".to_string(),
            )])
            .into_connection();

        let (status, body) = post(
            app(db),
            "/users",
            json!({"id": "u1", "username": "ann", "email": "ann@x.com", "phone": "555"}),
        )
        .await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "CONFLICT");
    }

    #[tokio::test]
    async fn test_unknown_route_uses_error_body() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let (status, body) = get(app(db), "/nope").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_openapi_document_lists_user_paths() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let (status, body) = get(app(db), "/api-docs/openapi.json").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body["paths"]["/users"].is_object());
        assert!(body["paths"]["/users/{id}"]["patch"].is_object());
        assert!(body["paths"]["/health"]["get"].is_object());
    }
}
