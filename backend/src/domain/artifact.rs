//! Generated text artifacts and the truncation-to-limit policy.

use serde::{Deserialize, Serialize};

/// Advisory shown to the caller when an artifact was shortened to fit the
/// account's character limit.
pub const TRUNCATION_NOTICE: &str =
    "Text was truncated due to character limit. Upgrade your plan for longer papers.";

/// Text produced by a generation or humanization call.
///
/// Artifacts are ephemeral: they live in the client session and are never
/// persisted by this service. Overflow past the account's character limit is
/// truncated, never rejected, and the truncation is reported to the caller.
/// Lengths count Unicode scalar values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    /// The artifact body, at most the owning account's character limit.
    pub text: String,
    /// Whether the collaborator's output was shortened to fit the limit.
    pub truncated: bool,
}

impl Artifact {
    /// Fit collaborator output to the account's character limit.
    ///
    /// Output within the limit is returned untouched with
    /// `truncated = false`; longer output is cut to exactly `limit`
    /// characters with `truncated = true`.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::Artifact;
    ///
    /// let artifact = Artifact::clamp("abcdef".to_owned(), 4);
    /// assert_eq!(artifact.text, "abcd");
    /// assert!(artifact.truncated);
    /// ```
    pub fn clamp(text: String, limit: usize) -> Self {
        if text.chars().count() <= limit {
            return Self {
                text,
                truncated: false,
            };
        }
        Self {
            text: text.chars().take(limit).collect(),
            truncated: true,
        }
    }

    /// Character length of the artifact body.
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    /// Whether the artifact body is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}
