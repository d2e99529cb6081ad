//! Domain types, services, and ports.
//!
//! Everything here is transport agnostic: inbound adapters map these types
//! to HTTP, outbound adapters implement the ports in [`ports`]. Invariants
//! and serialisation contracts are documented on each type.

pub mod account;
pub mod artifact;
pub mod error;
pub mod gate;
pub mod ledger;
pub mod paper;
pub mod plan;
pub mod ports;
pub mod workbench;

pub use self::account::{Account, AccountId, AccountIdError, CreditsExhausted};
pub use self::artifact::{Artifact, TRUNCATION_NOTICE};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::gate::{EntitlementGate, NO_CREDITS_MESSAGE};
pub use self::ledger::CreditLedger;
pub use self::paper::{
    CitationFormat, InvalidCitationFormat, InvalidTopic, PaperRequest, PaperService, Topic,
    TOPIC_MAX_CHARS,
};
pub use self::plan::{Plan, PlanLimits, UnknownPlan};
pub use self::workbench::{ActionBlocked, Notice, Phase, Workbench};
