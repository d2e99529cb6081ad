//! Paper generation and humanization flows.
//!
//! [`PaperService`] validates requests, builds the prompt templates, calls
//! the completion collaborator once, and fits the output to the account's
//! character limit. It never touches the credit ledger: settlement happens
//! in the inbound adapter only after a successful call, so a failed
//! generation never costs a credit.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde_json::json;
use tracing::error;

use super::account::Account;
use super::artifact::Artifact;
use super::error::Error;
use super::ports::{CompletionRequest, CompletionSource, CompletionSourceError, SamplingParams};

/// Maximum topic length accepted by [`Topic::new`].
pub const TOPIC_MAX_CHARS: usize = 500;

const GENERATE_SYSTEM_PROMPT: &str = "You are an academic writing assistant that can browse the \
     internet to find relevant, recent, and credible sources for academic papers.";

const HUMANIZE_SYSTEM_PROMPT: &str = "You are an expert in making academic writing sound more \
     natural and personal, while maintaining its academic quality and keeping all citations and \
     references intact.";

/// Citation style applied to the generated paper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CitationFormat {
    /// American Psychological Association style.
    Apa,
    /// Modern Language Association style.
    Mla,
    /// Chicago Manual of Style.
    Chicago,
}

/// Error raised when parsing a citation format outside the recognised set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("citation format must be APA, MLA, or Chicago")]
pub struct InvalidCitationFormat;

impl CitationFormat {
    /// Label used in prompts and API payloads.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Apa => "APA",
            Self::Mla => "MLA",
            Self::Chicago => "Chicago",
        }
    }
}

impl fmt::Display for CitationFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for CitationFormat {
    type Err = InvalidCitationFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "APA" => Ok(Self::Apa),
            "MLA" => Ok(Self::Mla),
            "Chicago" => Ok(Self::Chicago),
            _ => Err(InvalidCitationFormat),
        }
    }
}

/// Validation errors returned by [`Topic::new`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidTopic {
    /// The topic was empty or whitespace-only.
    #[error("please enter a topic")]
    Empty,
    /// The topic exceeded [`TOPIC_MAX_CHARS`].
    #[error("topic is too long; please limit to {TOPIC_MAX_CHARS} characters")]
    TooLong,
}

/// A validated paper topic: trimmed non-empty, at most 500 characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topic(String);

impl Topic {
    /// Validate and construct a [`Topic`].
    ///
    /// # Examples
    /// ```
    /// use backend::domain::Topic;
    ///
    /// let topic = Topic::new("Impact of climate change on coastal ecosystems")
    ///     .expect("valid topic");
    /// assert!(Topic::new("   ").is_err());
    /// # let _ = topic;
    /// ```
    pub fn new(raw: impl Into<String>) -> Result<Self, InvalidTopic> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(InvalidTopic::Empty);
        }
        if raw.chars().count() > TOPIC_MAX_CHARS {
            return Err(InvalidTopic::TooLong);
        }
        Ok(Self(raw))
    }
}

impl AsRef<str> for Topic {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// A validated generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaperRequest {
    /// What the paper should be about.
    pub topic: Topic,
    /// Citation style for in-text citations and the bibliography.
    pub citation_format: CitationFormat,
}

/// Orchestrates completion calls for paper generation and humanization.
#[derive(Clone)]
pub struct PaperService {
    completions: Arc<dyn CompletionSource>,
}

impl PaperService {
    /// Create a service over a completion collaborator.
    pub fn new(completions: Arc<dyn CompletionSource>) -> Self {
        Self { completions }
    }

    /// Generate an academic paper, fitted to the account's character limit.
    ///
    /// # Errors
    ///
    /// Returns an upstream failure when the collaborator call fails; the
    /// underlying cause is logged, the caller sees a retry prompt.
    pub async fn generate(
        &self,
        account: &Account,
        request: &PaperRequest,
    ) -> Result<Artifact, Error> {
        let completion = CompletionRequest {
            system_prompt: GENERATE_SYSTEM_PROMPT.to_owned(),
            user_prompt: generate_prompt(&request.topic, request.citation_format),
            params: SamplingParams {
                temperature: 0.7,
                max_tokens: 4_000,
                top_p: 1.0,
                frequency_penalty: 0.0,
                presence_penalty: 0.0,
            },
        };
        let text = self
            .completions
            .complete(&completion)
            .await
            .map_err(|err| {
                map_completion_error(
                    &err,
                    "paper generation",
                    "Failed to generate paper. Please try again later.",
                )
            })?;
        Ok(Artifact::clamp(text, account.max_characters))
    }

    /// Rewrite text to sound more natural, preserving citations.
    ///
    /// The input must already fit the account's character limit; the handler
    /// rejects oversized input outright rather than truncating it on the way
    /// in. Output is fitted to the limit like generation output.
    pub async fn humanize(&self, account: &Account, text: &str) -> Result<Artifact, Error> {
        let completion = CompletionRequest {
            system_prompt: HUMANIZE_SYSTEM_PROMPT.to_owned(),
            user_prompt: humanize_prompt(text),
            params: SamplingParams {
                temperature: 0.8,
                max_tokens: 4_000,
                top_p: 1.0,
                frequency_penalty: 0.5,
                presence_penalty: 0.3,
            },
        };
        let rewritten = self
            .completions
            .complete(&completion)
            .await
            .map_err(|err| {
                map_completion_error(
                    &err,
                    "humanization",
                    "Failed to humanize text. Please try again later.",
                )
            })?;
        Ok(Artifact::clamp(rewritten, account.max_characters))
    }
}

fn map_completion_error(err: &CompletionSourceError, action: &str, message: &str) -> Error {
    error!(error = %err, action, "completion collaborator call failed");
    Error::upstream(message)
}

/// Map an [`InvalidTopic`] onto the domain error envelope.
pub fn invalid_topic_error(err: &InvalidTopic) -> Error {
    Error::invalid_request(err.to_string()).with_details(json!({
        "field": "topic",
        "code": "invalid_topic",
    }))
}

/// Map an [`InvalidCitationFormat`] onto the domain error envelope.
pub fn invalid_citation_format_error(err: &InvalidCitationFormat) -> Error {
    Error::invalid_request(err.to_string()).with_details(json!({
        "field": "citationFormat",
        "code": "invalid_citation_format",
    }))
}

fn generate_prompt(topic: &Topic, citation_format: CitationFormat) -> String {
    let topic = topic.as_ref();
    format!(
        "Act as a professional academic writer. Browse the internet to find reliable, recent, \
         and academic sources about the topic: \"{topic}\".\n\n\
         Write a comprehensive academic paper with:\n\
         1. A clear introduction that presents the topic and thesis\n\
         2. A well-structured body divided into relevant sections and subsections\n\
         3. A conclusion that summarizes the findings\n\
         4. In-text citations using {citation_format} format\n\
         5. A bibliography/references section at the end with all sources used, formatted in \
         {citation_format} style\n\n\
         Requirements:\n\
         - Use at least 5-7 credible and recent academic sources found online\n\
         - Include proper in-text citations for all claims and information from sources\n\
         - Structure the paper logically with clear section headings\n\
         - Use formal academic language but maintain readability\n\
         - Create a complete bibliography with all sources properly formatted in \
         {citation_format} style\n\
         - For online sources, include access dates and URLs when required by the citation \
         format\n\n\
         Important: All sources must be real and academically credible. Prioritize \
         peer-reviewed journals, academic publications, and reputable institutional websites."
    )
}

fn humanize_prompt(text: &str) -> String {
    format!(
        "Please rewrite the following academic text to sound more natural and human-written, \
         while preserving all citations, references, and academic quality:\n\n{text}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::account::AccountId;
    use crate::domain::ports::MockCompletionSource;
    use rstest::rstest;

    fn account() -> Account {
        Account::register(AccountId::new("uid-1").expect("id"), "user@example.com")
    }

    fn request() -> PaperRequest {
        PaperRequest {
            topic: Topic::new("Impact of climate change on coastal ecosystems").expect("topic"),
            citation_format: CitationFormat::Apa,
        }
    }

    #[rstest]
    #[case::empty("", InvalidTopic::Empty)]
    #[case::whitespace("   \t", InvalidTopic::Empty)]
    fn blank_topics_are_rejected(#[case] raw: &str, #[case] expected: InvalidTopic) {
        assert_eq!(Topic::new(raw).expect_err("invalid"), expected);
    }

    #[test]
    fn over_length_topics_are_rejected() {
        let raw = "t".repeat(TOPIC_MAX_CHARS + 1);
        assert_eq!(Topic::new(raw).expect_err("too long"), InvalidTopic::TooLong);
    }

    #[test]
    fn topic_at_the_boundary_is_accepted() {
        let raw = "t".repeat(TOPIC_MAX_CHARS);
        assert!(Topic::new(raw).is_ok());
    }

    #[rstest]
    #[case::apa("APA", CitationFormat::Apa)]
    #[case::mla("MLA", CitationFormat::Mla)]
    #[case::chicago("Chicago", CitationFormat::Chicago)]
    fn recognised_citation_formats_parse(#[case] raw: &str, #[case] expected: CitationFormat) {
        assert_eq!(raw.parse::<CitationFormat>().expect("known"), expected);
    }

    #[rstest]
    #[case("apa")]
    #[case("Harvard")]
    #[case("")]
    fn unrecognised_citation_formats_fail(#[case] raw: &str) {
        assert!(raw.parse::<CitationFormat>().is_err());
    }

    #[test]
    fn generate_prompt_carries_topic_and_format() {
        let prompt = generate_prompt(&Topic::new("quantum computing").expect("topic"), CitationFormat::Mla);
        assert!(prompt.contains("\"quantum computing\""));
        assert!(prompt.contains("In-text citations using MLA format"));
    }

    #[tokio::test]
    async fn generation_fits_output_to_the_account_limit() {
        let mut completions = MockCompletionSource::new();
        completions
            .expect_complete()
            .times(1)
            .returning(|_| Ok("z".repeat(2_500)));
        let service = PaperService::new(Arc::new(completions));

        let artifact = service
            .generate(&account(), &request())
            .await
            .expect("generation succeeds");
        assert_eq!(artifact.len(), 2_000, "Free plan limit");
        assert!(artifact.truncated);
    }

    #[tokio::test]
    async fn generation_within_limit_is_untouched() {
        let mut completions = MockCompletionSource::new();
        completions
            .expect_complete()
            .times(1)
            .returning(|_| Ok("w".repeat(1_800)));
        let service = PaperService::new(Arc::new(completions));

        let artifact = service
            .generate(&account(), &request())
            .await
            .expect("generation succeeds");
        assert_eq!(artifact.len(), 1_800);
        assert!(!artifact.truncated);
    }

    #[tokio::test]
    async fn collaborator_failure_surfaces_a_retry_prompt() {
        let mut completions = MockCompletionSource::new();
        completions
            .expect_complete()
            .times(1)
            .returning(|_| Err(crate::domain::ports::CompletionSourceError::transport("reset")));
        let service = PaperService::new(Arc::new(completions));

        let err = service
            .generate(&account(), &request())
            .await
            .expect_err("upstream failure");
        assert_eq!(err.code(), crate::domain::ErrorCode::UpstreamFailure);
        assert_eq!(err.message(), "Failed to generate paper. Please try again later.");
    }

    #[tokio::test]
    async fn humanize_uses_the_rewrite_template() {
        let mut completions = MockCompletionSource::new();
        completions
            .expect_complete()
            .withf(|req| {
                req.user_prompt.contains("rewrite the following academic text")
                    && req.user_prompt.ends_with("original body (Smith, 2021)")
                    && (req.params.temperature - 0.8).abs() < f32::EPSILON
            })
            .times(1)
            .returning(|_| Ok("rewritten body (Smith, 2021)".to_owned()));
        let service = PaperService::new(Arc::new(completions));

        let artifact = service
            .humanize(&account(), "original body (Smith, 2021)")
            .await
            .expect("humanize succeeds");
        assert_eq!(artifact.text, "rewritten body (Smith, 2021)");
        assert!(!artifact.truncated);
    }
}
