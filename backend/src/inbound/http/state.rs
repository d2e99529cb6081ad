//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain services and ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{AccountStore, CompletionSource, TokenVerifier};
use crate::domain::{CreditLedger, EntitlementGate, PaperService};

/// Parameter object bundling the port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub verifier: Arc<dyn TokenVerifier>,
    pub accounts: Arc<dyn AccountStore>,
    pub completions: Arc<dyn CompletionSource>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub gate: EntitlementGate,
    pub ledger: CreditLedger,
    pub papers: PaperService,
}

impl HttpState {
    /// Wire the domain services over the supplied ports.
    pub fn new(ports: HttpStatePorts) -> Self {
        Self {
            gate: EntitlementGate::new(ports.verifier, Arc::clone(&ports.accounts)),
            ledger: CreditLedger::new(ports.accounts),
            papers: PaperService::new(ports.completions),
        }
    }
}
