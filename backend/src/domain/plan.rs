//! Subscription plan catalog.
//!
//! Plans form a closed set so an unknown tier is unrepresentable past the
//! parsing boundary. The catalog is pure: no I/O, no interior state.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Subscription tier fixing the monthly credit allotment and the maximum
/// artifact length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Plan {
    /// Entry tier seeded on registration.
    Free,
    /// Paid tier aimed at students.
    Student,
    /// Top paid tier.
    Professional,
}

/// Numeric limits attached to a [`Plan`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanLimits {
    /// Monthly credit allotment.
    pub credits: u32,
    /// Maximum characters per generated artifact.
    pub max_characters: usize,
}

/// Error raised when parsing a plan identifier outside the catalog.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown plan identifier: {identifier}")]
pub struct UnknownPlan {
    /// The identifier that failed to parse.
    pub identifier: String,
}

impl Plan {
    /// Look up the credit allotment and character limit for this plan.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::Plan;
    ///
    /// assert_eq!(Plan::Free.limits().credits, 5);
    /// assert_eq!(Plan::Student.limits().max_characters, 20_000);
    /// ```
    pub const fn limits(self) -> PlanLimits {
        match self {
            Self::Free => PlanLimits {
                credits: 5,
                max_characters: 2_000,
            },
            Self::Student => PlanLimits {
                credits: 30,
                max_characters: 20_000,
            },
            Self::Professional => PlanLimits {
                credits: 100,
                max_characters: 20_000,
            },
        }
    }

    /// Stable identifier used in storage documents and API payloads.
    pub const fn identifier(self) -> &'static str {
        match self {
            Self::Free => "FREE",
            Self::Student => "STUDENT",
            Self::Professional => "PROFESSIONAL",
        }
    }

    /// Human-readable display name.
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Free => "Free",
            Self::Student => "Student",
            Self::Professional => "Professional",
        }
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

impl FromStr for Plan {
    type Err = UnknownPlan;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "FREE" => Ok(Self::Free),
            "STUDENT" => Ok(Self::Student),
            "PROFESSIONAL" => Ok(Self::Professional),
            other => Err(UnknownPlan {
                identifier: other.to_owned(),
            }),
        }
    }
}
