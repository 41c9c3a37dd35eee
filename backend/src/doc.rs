//! OpenAPI documentation configuration.
//!
//! Defines the [`ApiDoc`] struct generating the OpenAPI specification for
//! the REST API: all HTTP endpoints from the inbound layer, the error
//! schema wrappers, and the session cookie security scheme. The generated
//! specification backs Swagger UI in debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/auth/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Events backend API",
        description = "HTTP interface for event management and capacity-bounded RSVPs."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::users::signup,
        crate::inbound::http::users::login,
        crate::inbound::http::events::create_event,
        crate::inbound::http::events::list_events,
        crate::inbound::http::events::get_event,
        crate::inbound::http::events::update_event,
        crate::inbound::http::events::delete_event,
        crate::inbound::http::events::rsvp_event,
        crate::inbound::http::events::leave_event,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(ErrorSchema, ErrorCodeSchema)),
    tags(
        (name = "auth", description = "Registration and login"),
        (name = "events", description = "Event management and RSVPs"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying OpenAPI document structure.

    use utoipa::OpenApi;

    use super::*;

    #[test]
    fn registers_all_event_paths() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/v1/auth/signup",
            "/api/v1/auth/login",
            "/api/v1/events",
            "/api/v1/events/{id}",
            "/api/v1/events/{id}/rsvp",
            "/api/v1/events/{id}/leave",
            "/health/ready",
            "/health/live",
        ] {
            assert!(
                doc.paths.paths.contains_key(path),
                "missing path {path} in OpenAPI document"
            );
        }
    }

    #[test]
    fn registers_error_schema() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        // utoipa replaces :: with . in schema names
        assert!(schemas.contains_key("crate.domain.Error"));
        assert!(schemas.contains_key("crate.domain.ErrorCode"));
    }
}
