//! # `generate-image`
//!
//! Tool that asks OpenAI for a coin icon. A chat completion first turns the
//! blog post into an image prompt which is then fed to DALL-E. Any OpenAI
//! failure falls back to a fixed placeholder image.

use {
    crate::{
        error::{MetadataError, MetadataErrorKind},
        openai::{Completion, OpenAi},
        status,
    },
    async_openai::types::ImageModel,
    blogcoin_toolkit::*,
    blogcoin_types::Sourced,
    rand::Rng,
    schemars::JsonSchema,
    serde::{Deserialize, Serialize},
};

/// Image returned whenever OpenAI could not produce one.
pub(crate) const FALLBACK_IMAGE_URI: &str =
    "https://placehold.co/1024x1024/14b8a6/ffffff?text=BlogCoin";
/// Excerpt used when no blog content is given.
const DEFAULT_EXCERPT: &str = "A blog post about cryptocurrency";
/// How many characters of the blog post end up in the prompt request.
const EXCERPT_CHARS: usize = 500;

const PROMPT_MODEL: &str = "gpt-3.5-turbo";
const PROMPT_TEMPERATURE: f32 = 0.7;
const PROMPT_MAX_COMPLETION_TOKENS: u32 = 150;
const PROMPT_SYSTEM: &str = "You are a specialized AI that creates descriptive image prompts. \
Create a detailed prompt for a 512x512 image representing the essence of a cryptocurrency coin \
for a blog post. The prompt should describe a professional, minimalist design that would work \
well for a coin logo or icon. Be creative but focused. ONLY return the prompt itself without any \
explanations or additional text.";

/// Name used when the caller did not pick one, e.g. `BlogCoin_42`.
pub(crate) fn random_coin_name() -> String {
    format!("BlogCoin_{}", rand::thread_rng().gen_range(0..1000))
}

fn excerpt(content: Option<&str>) -> String {
    match content.map(str::trim).filter(|c| !c.is_empty()) {
        Some(content) => format!(
            "{}...",
            content.chars().take(EXCERPT_CHARS).collect::<String>()
        ),
        None => DEFAULT_EXCERPT.to_string(),
    }
}

fn default_prompt(coin_name: &str) -> String {
    format!(
        "A minimalist, professional cryptocurrency coin logo for \"{coin_name}\", with subtle \
         gradient, modern design elements, on a dark background"
    )
}

/// An icon for a coin together with the prompt it was generated from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub(crate) struct CoinImage {
    pub image_uri: Sourced<String>,
    /// The DALL-E prompt. Missing when the prompt step itself failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
}

/// Generates an icon for the given coin. Never fails: OpenAI errors yield
/// [`FALLBACK_IMAGE_URI`].
pub(crate) async fn coin_image(openai: &OpenAi, content: Option<&str>, coin_name: &str) -> CoinImage {
    let completion = Completion {
        model: PROMPT_MODEL,
        temperature: PROMPT_TEMPERATURE,
        max_completion_tokens: PROMPT_MAX_COMPLETION_TOKENS,
        system: PROMPT_SYSTEM,
        user: format!(
            "Create an image prompt for a cryptocurrency coin named \"{coin_name}\" based on this blog post content: {}",
            excerpt(content)
        ),
    };

    let prompt = match openai.complete(completion).await {
        Ok(prompt) => prompt.unwrap_or_else(|| default_prompt(coin_name)),
        Err(e) => return fallback_image(None, e),
    };

    match openai.create_image(ImageModel::DallE3, &prompt).await {
        Ok(url) => CoinImage {
            image_uri: Sourced::live(url),
            prompt: Some(prompt),
        },
        Err(e) => fallback_image(Some(prompt), e),
    }
}

fn fallback_image(prompt: Option<String>, e: MetadataError) -> CoinImage {
    log::warn!("Using the placeholder coin image: {e}");

    CoinImage {
        image_uri: Sourced::fallback(FALLBACK_IMAGE_URI.to_string(), e.to_string()),
        prompt,
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub(crate) struct Input {
    /// The blog post the coin represents.
    #[serde(default)]
    content: Option<String>,
    /// Name of the coin. A random `BlogCoin_<n>` name is used when missing.
    #[serde(default)]
    coin_name: Option<String>,
}

#[derive(Debug, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub(crate) enum Output {
    Ok {
        #[serde(flatten)]
        image: CoinImage,
    },
    Err {
        /// Detailed error message.
        reason: String,
        /// Type of error.
        kind: MetadataErrorKind,
    },
}

pub(crate) struct GenerateImage {
    openai: OpenAi,
    status_url: String,
}

impl BlogcoinTool for GenerateImage {
    type Input = Input;
    type Output = Output;

    async fn new() -> Self {
        Self {
            openai: OpenAi::from_env(),
            status_url: status::HEALTH_URL.to_string(),
        }
    }

    fn name() -> &'static str {
        "generate-image"
    }

    fn path() -> &'static str {
        "/generate-image"
    }

    fn status_of(output: &Self::Output) -> StatusCode {
        match output {
            Output::Ok { .. } => StatusCode::OK,
            Output::Err { kind, .. } => kind.status(),
        }
    }

    async fn health(&self) -> AnyResult<StatusCode> {
        status::check_api_health(&self.status_url).await
    }

    async fn invoke(&self, Self::Input { content, coin_name }: Self::Input) -> Self::Output {
        let content = content.filter(|c| !c.trim().is_empty());
        let coin_name = coin_name.filter(|n| !n.trim().is_empty());

        if content.is_none() && coin_name.is_none() {
            let e = MetadataError::Validation("Content or coin name is required");

            return Output::Err {
                reason: e.to_string(),
                kind: e.kind(),
            };
        }

        let coin_name = coin_name.unwrap_or_else(random_coin_name);

        Output::Ok {
            image: coin_image(&self.openai, content.as_deref(), &coin_name).await,
        }
    }
}
