//! Server construction and middleware wiring.

mod config;

pub use config::{CompletionConfig, ServerConfig};

use std::sync::Arc;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use tracing::warn;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::domain::ports::{
    CompletionSource, FixtureCompletionSource, FixtureTokenVerifier, TokenVerifier,
};
use crate::inbound::http::account::{change_plan, get_account};
use crate::inbound::http::health::{HealthState, live, ready};
use crate::inbound::http::papers::{generate, humanize};
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::middleware::trace::Trace;
use crate::outbound::{HttpTokenVerifier, InMemoryAccountStore, OpenAiHttpSource, OpenAiIdentity};

fn build_completion_source(config: &ServerConfig) -> std::io::Result<Arc<dyn CompletionSource>> {
    match &config.completions {
        Some(completions) => {
            let source = OpenAiHttpSource::new(
                completions.endpoint.clone(),
                OpenAiIdentity {
                    api_key: completions.api_key.clone(),
                    model: completions.model.clone(),
                },
            )
            .map_err(|e| std::io::Error::other(format!("completion client build failed: {e}")))?;
            Ok(Arc::new(source))
        }
        None => {
            warn!("no completion endpoint configured; using the echo fixture (dev only)");
            Ok(Arc::new(FixtureCompletionSource))
        }
    }
}

fn build_token_verifier(config: &ServerConfig) -> std::io::Result<Arc<dyn TokenVerifier>> {
    match &config.identity_endpoint {
        Some(endpoint) => {
            let verifier = HttpTokenVerifier::new(endpoint.clone())
                .map_err(|e| std::io::Error::other(format!("identity client build failed: {e}")))?;
            Ok(Arc::new(verifier))
        }
        None => {
            warn!("no identity endpoint configured; accepting raw tokens as ids (dev only)");
            Ok(Arc::new(FixtureTokenVerifier))
        }
    }
}

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
    } = deps;

    let api = web::scope("/api/v1")
        .service(generate)
        .service(humanize)
        .service(get_account)
        .service(change_plan);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
    #[cfg(not(debug_assertions))]
    let app = app;

    app
}

/// Construct an Actix HTTP server using the provided health state and
/// configuration.
///
/// # Errors
///
/// Propagates [`std::io::Error`] when a collaborator client cannot be built
/// or the socket cannot be bound.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let completions = build_completion_source(&config)?;
    let verifier = build_token_verifier(&config)?;
    let http_state = web::Data::new(HttpState::new(HttpStatePorts {
        verifier,
        accounts: Arc::new(InMemoryAccountStore::default()),
        completions,
    }));

    let server_health_state = health_state.clone();
    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
        })
    })
    .bind(config.bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
