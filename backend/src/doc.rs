//! OpenAPI documentation configuration.
//!
//! Defines the [`ApiDoc`] struct generating the OpenAPI specification for
//! the REST API: paper endpoints, account endpoints, health probes, the
//! error envelope schemas, and the bearer security scheme. The generated
//! specification backs Swagger UI in debug builds.

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::account::{AccountResponse, PlanChangeRequest};
use crate::inbound::http::papers::{GenerateRequest, HumanizeRequest, PaperResponse};

/// Enrich the generated document with the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "bearerAuth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Paper service API",
        description = "Credit-gated paper generation and humanization over bearer-authenticated HTTP."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("bearerAuth" = [])),
    paths(
        crate::inbound::http::papers::generate,
        crate::inbound::http::papers::humanize,
        crate::inbound::http::account::get_account,
        crate::inbound::http::account::change_plan,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        GenerateRequest,
        HumanizeRequest,
        PaperResponse,
        AccountResponse,
        PlanChangeRequest,
    )),
    tags(
        (name = "papers", description = "Credit-gated generation and humanization"),
        (name = "account", description = "Account projection and plan changes"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
