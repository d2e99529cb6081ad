//! Client-session state machine driving the generate/humanize loop.
//!
//! The browser front end is presentation-only; the behaviour it renders is
//! modelled here so it can be tested without a UI. At most one request is in
//! flight per session: the matching action is disabled while a call runs,
//! and humanize is additionally disabled without an artifact or credits.
//! Failures surface as transient notices and never discard the last
//! successful artifact. Account snapshots arrive out of band on the store's
//! watch stream and are applied via [`Workbench::apply_account_update`].

use super::account::Account;
use super::artifact::{Artifact, TRUNCATION_NOTICE};
use super::error::Error;

/// Which request, if any, is currently in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No request in flight.
    Idle,
    /// A generation call is running.
    Generating,
    /// A humanization call is running.
    Humanizing,
}

/// Transient user-visible notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// A request completed successfully.
    Success(String),
    /// A request failed; the session stays usable.
    Failure(String),
}

/// Reasons an action control is disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ActionBlocked {
    /// Another request is already in flight.
    #[error("a request is already in flight")]
    Busy,
    /// The account has no credits left.
    #[error("no credits left")]
    NoCredits,
    /// Humanize needs a generated artifact to rewrite.
    #[error("nothing to humanize yet")]
    NoArtifact,
}

/// Per-session orchestration state.
#[derive(Debug, Clone, PartialEq)]
pub struct Workbench {
    phase: Phase,
    credits: u32,
    artifact: Option<Artifact>,
    notice: Option<Notice>,
}

impl Workbench {
    /// Start a session from the account's current snapshot.
    pub fn new(account: &Account) -> Self {
        Self {
            phase: Phase::Idle,
            credits: account.credits,
            artifact: None,
            notice: None,
        }
    }

    /// Current phase.
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Last successful artifact, if any.
    pub fn artifact(&self) -> Option<&Artifact> {
        self.artifact.as_ref()
    }

    /// Take the pending notice, clearing it.
    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    /// Whether the generate control is enabled.
    pub const fn can_generate(&self) -> bool {
        matches!(self.phase, Phase::Idle) && self.credits > 0
    }

    /// Whether the humanize control is enabled.
    pub const fn can_humanize(&self) -> bool {
        matches!(self.phase, Phase::Idle) && self.credits > 0 && self.artifact.is_some()
    }

    /// Begin a generation request.
    pub fn begin_generate(&mut self) -> Result<(), ActionBlocked> {
        if !matches!(self.phase, Phase::Idle) {
            return Err(ActionBlocked::Busy);
        }
        if self.credits == 0 {
            return Err(ActionBlocked::NoCredits);
        }
        self.phase = Phase::Generating;
        Ok(())
    }

    /// Begin a humanization request against the current artifact.
    pub fn begin_humanize(&mut self) -> Result<(), ActionBlocked> {
        if !matches!(self.phase, Phase::Idle) {
            return Err(ActionBlocked::Busy);
        }
        if self.artifact.is_none() {
            return Err(ActionBlocked::NoArtifact);
        }
        if self.credits == 0 {
            return Err(ActionBlocked::NoCredits);
        }
        self.phase = Phase::Humanizing;
        Ok(())
    }

    /// Settle the in-flight request with its outcome.
    ///
    /// Success replaces the artifact; failure keeps the previous artifact
    /// and raises a transient failure notice. Either way the session
    /// returns to idle.
    pub fn finish(&mut self, outcome: Result<Artifact, Error>) {
        let success_notice = match self.phase {
            Phase::Generating => "Paper generated successfully!",
            Phase::Humanizing => "Text humanized successfully!",
            Phase::Idle => {
                // Out-of-band completion with nothing in flight; ignore.
                return;
            }
        };
        self.phase = Phase::Idle;
        match outcome {
            Ok(artifact) => {
                self.notice = Some(if artifact.truncated {
                    Notice::Success(TRUNCATION_NOTICE.to_owned())
                } else {
                    Notice::Success(success_notice.to_owned())
                });
                self.artifact = Some(artifact);
            }
            Err(error) => {
                self.notice = Some(Notice::Failure(error.message().to_owned()));
            }
        }
    }

    /// Apply an out-of-band account snapshot from the watch stream.
    pub fn apply_account_update(&mut self, account: &Account) {
        self.credits = account.credits;
    }
}
