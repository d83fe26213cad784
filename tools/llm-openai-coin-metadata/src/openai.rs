//! Thin wrapper around the `async-openai` client shared by both tools.

use {
    crate::error::MetadataError,
    async_openai::{
        config::{OpenAIConfig, OPENAI_API_BASE},
        types::{
            ChatCompletionRequestMessage,
            ChatCompletionRequestSystemMessageArgs,
            ChatCompletionRequestUserMessageArgs,
            CreateChatCompletionRequestArgs,
            CreateImageRequestArgs,
            Image,
            ImageModel,
            ImageResponseFormat,
            ImageSize,
        },
        Client,
    },
    blogcoin_toolkit::{optional_env, required_env},
    blogcoin_types::Secret,
    std::time::Duration,
};

/// Environment variable holding the OpenAI API key.
pub(crate) const API_KEY_ENV: &str = "OPENAI_API_KEY";
/// Environment variable overriding the OpenAI API base URL.
pub(crate) const API_BASE_ENV: &str = "OPENAI_API_BASE";

/// Parameters of a single chat completion.
pub(crate) struct Completion<'a> {
    pub model: &'a str,
    pub temperature: f32,
    pub max_completion_tokens: u32,
    pub system: &'a str,
    pub user: String,
}

pub(crate) struct OpenAi {
    api_key: Secret<String>,
    api_base: String,
}

impl OpenAi {
    pub(crate) fn new(api_key: impl Into<String>, api_base: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            api_base: api_base.into(),
        }
    }

    pub(crate) fn from_env() -> Self {
        Self::new(
            required_env(API_KEY_ENV),
            optional_env(API_BASE_ENV).unwrap_or_else(|| OPENAI_API_BASE.to_string()),
        )
    }

    fn client(&self) -> Client<OpenAIConfig> {
        let cfg = OpenAIConfig::new()
            .with_api_key(&*self.api_key)
            .with_api_base(&self.api_base);

        // Every failure is reported to the caller right away.
        let no_retries = backoff::ExponentialBackoffBuilder::new()
            .with_max_elapsed_time(Some(Duration::ZERO))
            .build();

        Client::with_config(cfg).with_backoff(no_retries)
    }

    /// Runs a chat completion with one system and one user message and
    /// returns the trimmed content of the first choice, if any.
    pub(crate) async fn complete(
        &self,
        completion: Completion<'_>,
    ) -> Result<Option<String>, MetadataError> {
        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(completion.system)
                .build()?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(completion.user)
                .build()?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .max_completion_tokens(completion.max_completion_tokens)
            .model(completion.model)
            .temperature(completion.temperature)
            .messages(messages)
            .build()?;

        let response = self.client().chat().create(request).await?;

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty());

        Ok(content)
    }

    /// Generates a single 1024x1024 image and returns its URL.
    pub(crate) async fn create_image(
        &self,
        model: ImageModel,
        prompt: &str,
    ) -> Result<String, MetadataError> {
        let request = CreateImageRequestArgs::default()
            .prompt(prompt)
            .model(model)
            .n(1)
            .size(ImageSize::S1024x1024)
            .response_format(ImageResponseFormat::Url)
            .build()?;

        let response = self.client().images().create(request).await?;

        match response.data.first().map(|image| image.as_ref()) {
            Some(Image::Url { url, .. }) => Ok(url.clone()),
            Some(Image::B64Json { .. }) => Err(MetadataError::UnexpectedImageFormat),
            None => Err(MetadataError::NoImage),
        }
    }
}
