//! OpenAPI / Swagger UI documentation.
//!
//! - Swagger UI: `http://localhost:8080/docs`
//! - OpenAPI JSON: `http://localhost:8080/api-docs/openapi.json`

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::gateway::handlers::{BatchOutcome, HealthResponse, IdBatch, RegisterBody};
use crate::gateway::types::IpnResponse;
use crate::registry::PublicInfo;

/// Admin routes authenticate with credential headers.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "admin_auth",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                    "x-username",
                    "Admin credential headers: x-username and x-password, \
                     checked against the seeded admin account.",
                ))),
            );
        }
    }
}

/// Main API documentation struct
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Resident Registry API",
        version = "1.0.0",
        description = "Registration queue, bulk admissions and fee payment settlement.",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Development"),
    ),
    paths(
        crate::gateway::handlers::health_check,
        crate::gateway::handlers::register,
        crate::gateway::handlers::list_requests,
        crate::gateway::handlers::count_requests,
        crate::gateway::handlers::accept_requests,
        crate::gateway::handlers::reject_requests,
        crate::gateway::handlers::ipn,
    ),
    components(schemas(
        RegisterBody,
        PublicInfo,
        IdBatch,
        BatchOutcome,
        HealthResponse,
        IpnResponse,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "Resident", description = "Registration intake"),
        (name = "Admin", description = "Queue management (credential headers required)"),
        (name = "Payment", description = "Payment gateway notifications"),
        (name = "System", description = "Health and diagnostics"),
    )
)]
pub struct ApiDoc;
