use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(crate::api::health::health_handler),
    components(
        schemas(axum_helpers::ErrorResponse)
    ),
    info(
        title = "Users API",
        version = "0.1.0",
        description = "CRUD over user records keyed by client-assigned ids"
    ),
    nest(
        (path = "/users", api = domain_users::ApiDoc)
    )
)]
pub struct ApiDoc;
