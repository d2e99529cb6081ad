//! DTOs for the chat-completions wire format.
//!
//! The adapter serialises domain requests into these transport DTOs and
//! decodes responses back into plain completion text in one pass.

use serde::{Deserialize, Serialize};

use crate::domain::ports::CompletionRequest;

#[derive(Debug, Serialize)]
pub(super) struct ChatCompletionRequestDto<'a> {
    pub(super) model: &'a str,
    pub(super) messages: Vec<ChatMessageDto<'a>>,
    pub(super) temperature: f32,
    pub(super) max_tokens: u32,
    pub(super) top_p: f32,
    pub(super) frequency_penalty: f32,
    pub(super) presence_penalty: f32,
}

#[derive(Debug, Serialize)]
pub(super) struct ChatMessageDto<'a> {
    pub(super) role: &'a str,
    pub(super) content: &'a str,
}

#[derive(Debug, Deserialize)]
pub(super) struct ChatCompletionResponseDto {
    #[serde(default)]
    pub(super) choices: Vec<ChatChoiceDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ChatChoiceDto {
    pub(super) message: ChatReplyDto,
}

#[derive(Debug, Deserialize)]
pub(super) struct ChatReplyDto {
    pub(super) content: String,
}

impl<'a> ChatCompletionRequestDto<'a> {
    pub(super) fn from_domain(model: &'a str, request: &'a CompletionRequest) -> Self {
        Self {
            model,
            messages: vec![
                ChatMessageDto {
                    role: "system",
                    content: &request.system_prompt,
                },
                ChatMessageDto {
                    role: "user",
                    content: &request.user_prompt,
                },
            ],
            temperature: request.params.temperature,
            max_tokens: request.params.max_tokens,
            top_p: request.params.top_p,
            frequency_penalty: request.params.frequency_penalty,
            presence_penalty: request.params.presence_penalty,
        }
    }
}

impl ChatCompletionResponseDto {
    pub(super) fn into_text(self) -> Result<String, String> {
        let choice = self
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| "completion response carried no choices".to_owned())?;
        Ok(choice.message.content)
    }
}
