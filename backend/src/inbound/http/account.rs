//! Account handlers.
//!
//! ```text
//! GET /api/v1/account       Current account projection
//! PUT /api/v1/account/plan  Move the account onto a new plan
//! ```
//!
//! Both endpoints only need identification, not entitlement: an exhausted
//! account must still be able to read its balance and upgrade its plan.

use actix_web::{HttpResponse, get, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::domain::{Account, Error, Plan};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::BearerToken;
use crate::inbound::http::state::HttpState;

/// Account projection returned to clients.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    /// Stable account identifier.
    pub id: String,
    /// Email attached to the account.
    pub email: String,
    /// Current subscription plan identifier.
    pub plan: String,
    /// Credits remaining this cycle.
    pub credits: u32,
    /// Maximum characters per generated artifact.
    pub max_characters: usize,
    /// When the account was first provisioned.
    pub created_at: DateTime<Utc>,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            id: account.id.into(),
            email: account.email,
            plan: account.plan.identifier().to_owned(),
            credits: account.credits,
            max_characters: account.max_characters,
            created_at: account.created_at,
        }
    }
}

/// Plan change request body.
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlanChangeRequest {
    /// Target plan identifier: `FREE`, `STUDENT`, or `PROFESSIONAL`.
    pub plan: String,
}

/// Fetch the caller's account projection.
///
/// # Errors
///
/// - `401 Unauthorized`: Missing or rejected bearer credential.
#[utoipa::path(
    get,
    path = "/api/v1/account",
    responses(
        (status = 200, description = "Current account", body = AccountResponse),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    security(("bearerAuth" = [])),
    tags = ["account"],
    operation_id = "getAccount"
)]
#[get("/account")]
pub async fn get_account(
    state: web::Data<HttpState>,
    token: BearerToken,
) -> ApiResult<HttpResponse> {
    let account = state.gate.identify(token.as_str()).await?;
    Ok(HttpResponse::Ok().json(AccountResponse::from(account)))
}

/// Move the caller onto a new plan.
///
/// The balance and character limit reset to the target plan's allotment;
/// unused credits from the previous plan are discarded.
///
/// # Errors
///
/// - `400 Bad Request`: Unknown plan identifier or malformed body.
/// - `401 Unauthorized`: Missing or rejected bearer credential.
#[utoipa::path(
    put,
    path = "/api/v1/account/plan",
    request_body = PlanChangeRequest,
    responses(
        (status = 200, description = "Plan changed", body = AccountResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    security(("bearerAuth" = [])),
    tags = ["account"],
    operation_id = "changePlan"
)]
#[put("/account/plan")]
pub async fn change_plan(
    state: web::Data<HttpState>,
    token: BearerToken,
    body: web::Bytes,
) -> ApiResult<HttpResponse> {
    let account = state.gate.identify(token.as_str()).await?;
    let request: PlanChangeRequest = serde_json::from_slice(&body).map_err(|err| {
        Error::invalid_request(format!("request body must be valid JSON: {err}"))
    })?;
    let plan = request.plan.parse::<Plan>().map_err(|err| {
        Error::invalid_request(err.to_string())
            .with_details(json!({ "field": "plan", "code": "unknown_plan" }))
    })?;

    let account = state.ledger.change_plan(account, plan).await?;
    info!(account_id = %account.id, plan = %account.plan, "plan changed");
    Ok(HttpResponse::Ok().json(AccountResponse::from(account)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::account::AccountId;
    use crate::domain::ports::{AccountStore, FixtureTokenVerifier, MockCompletionSource};
    use crate::inbound::http::state::HttpStatePorts;
    use crate::outbound::InMemoryAccountStore;
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test, web};
    use serde_json::Value;
    use std::sync::Arc;

    fn test_app(
        accounts: Arc<InMemoryAccountStore>,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        let state = HttpState::new(HttpStatePorts {
            verifier: Arc::new(FixtureTokenVerifier),
            accounts,
            completions: Arc::new(MockCompletionSource::new()),
        });
        App::new().app_data(web::Data::new(state)).service(
            web::scope("/api/v1")
                .service(get_account)
                .service(change_plan),
        )
    }

    async fn seeded_store(uid: &str) -> Arc<InMemoryAccountStore> {
        let store = Arc::new(InMemoryAccountStore::default());
        let account = Account::register(AccountId::new(uid).expect("id"), "user@example.com");
        store.create(&account).await.expect("seed account");
        store
    }

    #[actix_web::test]
    async fn get_account_returns_the_projection() {
        let store = seeded_store("uid-1").await;
        let app = actix_test::init_service(test_app(store)).await;

        let req = actix_test::TestRequest::get()
            .uri("/api/v1/account")
            .insert_header(("Authorization", "Bearer uid-1"))
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);

        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["id"], "uid-1");
        assert_eq!(body["plan"], "FREE");
        assert_eq!(body["credits"], 5);
        assert_eq!(body["maxCharacters"], 2_000);
    }

    #[actix_web::test]
    async fn get_account_without_a_credential_is_unauthorized() {
        let store = seeded_store("uid-1").await;
        let app = actix_test::init_service(test_app(store)).await;

        let req = actix_test::TestRequest::get()
            .uri("/api/v1/account")
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn plan_change_resets_balance_and_limit() {
        let store = seeded_store("uid-1").await;
        let app = actix_test::init_service(test_app(Arc::clone(&store))).await;

        let req = actix_test::TestRequest::put()
            .uri("/api/v1/account/plan")
            .insert_header(("Authorization", "Bearer uid-1"))
            .set_json(serde_json::json!({ "plan": "STUDENT" }))
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);

        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["plan"], "STUDENT");
        assert_eq!(body["credits"], 30);
        assert_eq!(body["maxCharacters"], 20_000);

        let stored = store
            .fetch(&AccountId::new("uid-1").expect("id"))
            .await
            .expect("account");
        assert_eq!(stored.plan, Plan::Student);
        assert_eq!(stored.credits, 30);
    }

    #[actix_web::test]
    async fn unknown_plan_identifiers_are_invalid() {
        let store = seeded_store("uid-1").await;
        let app = actix_test::init_service(test_app(store)).await;

        let req = actix_test::TestRequest::put()
            .uri("/api/v1/account/plan")
            .insert_header(("Authorization", "Bearer uid-1"))
            .set_json(serde_json::json!({ "plan": "ENTERPRISE" }))
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["details"]["code"], "unknown_plan");
    }

    #[actix_web::test]
    async fn plan_change_works_with_an_exhausted_balance() {
        let store = Arc::new(InMemoryAccountStore::default());
        let mut account =
            Account::register(AccountId::new("uid-1").expect("id"), "user@example.com");
        account.credits = 0;
        store.create(&account).await.expect("seed account");
        let app = actix_test::init_service(test_app(store)).await;

        let req = actix_test::TestRequest::put()
            .uri("/api/v1/account/plan")
            .insert_header(("Authorization", "Bearer uid-1"))
            .set_json(serde_json::json!({ "plan": "PROFESSIONAL" }))
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);

        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["credits"], 100);
    }
}
