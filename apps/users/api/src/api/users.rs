use axum::Router;
use domain_users::{PostgresUserRepository, UserService, handlers};

/// Repository → service → router, all over the shared pool.
pub fn router(state: &crate::state::AppState) -> Router {
    let repository = PostgresUserRepository::new(state.db.clone());
    let service = UserService::new(repository);
    handlers::router(service)
}
