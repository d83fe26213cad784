//! # `generate-coin`
//!
//! Tool that proposes a coin name and description for a blog post and then
//! generates its icon, see [`crate::generate_image`].

use {
    crate::{
        error::{MetadataError, MetadataErrorKind},
        generate_image::{coin_image, random_coin_name, CoinImage},
        openai::{Completion, OpenAi},
        status,
    },
    blogcoin_toolkit::*,
    blogcoin_types::{CoinText, Sourced},
    lazy_regex::regex_find,
    schemars::JsonSchema,
    serde::{Deserialize, Serialize},
};

/// Description used when the completion cannot be parsed.
pub(crate) const FALLBACK_DESCRIPTION: &str =
    "A coin representing a unique blog post on the blockchain.";

const TEXT_MODEL: &str = "gpt-4o";
const TEXT_TEMPERATURE: f32 = 0.7;
const TEXT_MAX_COMPLETION_TOKENS: u32 = 250;
const TEXT_SYSTEM: &str = "You are a specialized AI that analyzes blog posts and generates \
creative cryptocurrency names and descriptions. Make the name unique and related to the content. \
The description should be concise (50-100 words) and summarize the blog post. Return ONLY valid \
JSON with 'name' and 'description' fields in this format: \
{\"name\": \"CoinName\", \"description\": \"Description here\"}";

/// Pulls the coin text out of a completion. The model sometimes wraps the
/// JSON in prose or code fences so the outermost `{...}` span is parsed.
fn parse_coin_text(completion: Option<&str>) -> Result<CoinText, String> {
    let completion = completion.ok_or("OpenAI returned an empty completion")?;
    let json = regex_find!(r"(?s)\{.*\}", completion)
        .ok_or("No valid JSON found in the completion")?;

    let text = serde_json::from_str::<CoinText>(json).map_err(|e| e.to_string())?;

    if text.name.trim().is_empty() {
        return Err("The completion contains an empty coin name".to_string());
    }

    Ok(text)
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub(crate) struct Input {
    /// The blog post to generate coin metadata for.
    content: String,
}

#[derive(Debug, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub(crate) enum Output {
    Ok {
        /// Coin name and description.
        text: Sourced<CoinText>,
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

pub(crate) struct GenerateCoin {
    openai: OpenAi,
    status_url: String,
}

impl BlogcoinTool for GenerateCoin {
    type Input = Input;
    type Output = Output;

    async fn new() -> Self {
        Self {
            openai: OpenAi::from_env(),
            status_url: status::HEALTH_URL.to_string(),
        }
    }

    fn name() -> &'static str {
        "generate-coin"
    }

    fn path() -> &'static str {
        "/generate-coin"
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

    async fn invoke(&self, Self::Input { content }: Self::Input) -> Self::Output {
        match self.generate(&content).await {
            Ok((text, image)) => Output::Ok { text, image },
            Err(e) => {
                log::error!("Failed to generate coin metadata: {e}");

                Output::Err {
                    reason: format!("Failed to generate coin data: {e}"),
                    kind: e.kind(),
                }
            }
        }
    }
}

impl GenerateCoin {
    async fn generate(
        &self,
        content: &str,
    ) -> Result<(Sourced<CoinText>, CoinImage), MetadataError> {
        if content.trim().is_empty() {
            return Err(MetadataError::Validation("Content is required"));
        }

        let completion = self
            .openai
            .complete(Completion {
                model: TEXT_MODEL,
                temperature: TEXT_TEMPERATURE,
                max_completion_tokens: TEXT_MAX_COMPLETION_TOKENS,
                system: TEXT_SYSTEM,
                user: format!(
                    "Generate a unique coin name and description for this blog post: {content}"
                ),
            })
            .await?;

        let text = match parse_coin_text(completion.as_deref()) {
            Ok(text) => Sourced::live(text),
            Err(reason) => {
                log::warn!("Using a fallback coin name: {reason}");

                Sourced::fallback(
                    CoinText {
                        name: random_coin_name(),
                        description: FALLBACK_DESCRIPTION.to_string(),
                    },
                    reason,
                )
            }
        };

        let image = coin_image(&self.openai, Some(content), &text.value().name).await;

        Ok((text, image))
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::generate_image::FALLBACK_IMAGE_URI,
        assert_matches::assert_matches,
        mockito::{Matcher, Server},
        serde_json::json,
    };

    impl GenerateCoin {
        fn with_api_base(api_base: &str) -> Self {
            Self {
                openai: OpenAi::new("your_api_key", api_base),
                status_url: format!("{api_base}/status.json"),
            }
        }
    }

    async fn create_server_and_tool() -> (mockito::ServerGuard, GenerateCoin) {
        let server = Server::new_async().await;

        let tool = GenerateCoin::with_api_base(&format!("http://{}/v1", server.host_with_port()));

        (server, tool)
    }

    fn chat_body(completion: &str) -> String {
        json!({
            "id": "completion_id",
            "created": 1234567890,
            "model": TEXT_MODEL,
            "object": "chat.completion",
            "choices": [
                {
                    "index": 0,
                    "message": {
                        "role": "assistant",
                        "content": completion,
                    }
                }
            ],
        })
        .to_string()
    }

    /// Mocks the prompt and image steps.
    async fn mock_image(server: &mut mockito::ServerGuard) -> (mockito::Mock, mockito::Mock) {
        let prompt = server
            .mock("POST", "/v1/chat/completions")
            .match_body(Matcher::PartialJson(json!({ "model": "gpt-3.5-turbo" })))
            .with_body(chat_body("A whale shaped coin"))
            .create_async()
            .await;

        let image = server
            .mock("POST", "/v1/images/generations")
            .with_body(
                json!({
                    "created": 1234567890,
                    "data": [{ "url": "https://images.example/whale.png" }]
                })
                .to_string(),
            )
            .create_async()
            .await;

        (prompt, image)
    }

    #[test]
    fn test_parse_coin_text() {
        let text = parse_coin_text(Some(
            "Sure! ```json\n{\"name\": \"WhaleCoin\",\n \"description\": \"Songs.\"}\n```",
        ))
        .unwrap();

        assert_eq!(
            text,
            CoinText {
                name: "WhaleCoin".to_string(),
                description: "Songs.".to_string(),
            }
        );

        assert!(parse_coin_text(None).is_err());
        assert!(parse_coin_text(Some("WhaleCoin is a great name")).is_err());
        assert!(parse_coin_text(Some("{\"name\": \"WhaleCoin\"}")).is_err());
        assert!(parse_coin_text(Some("{\"name\": \" \", \"description\": \"x\"}")).is_err());
    }

    #[tokio::test]
    async fn test_coin_generated() {
        let (mut server, tool) = create_server_and_tool().await;

        let text_mock = server
            .mock("POST", "/v1/chat/completions")
            .match_header("authorization", "Bearer your_api_key")
            .match_body(Matcher::PartialJson(json!({
                "model": TEXT_MODEL,
                "max_completion_tokens": TEXT_MAX_COMPLETION_TOKENS,
                // Wire value of the `f32` constant, `json!` would widen it.
                "temperature": 0.7,
                "messages": [
                    { "role": "system", "content": TEXT_SYSTEM },
                    {
                        "role": "user",
                        "content": "Generate a unique coin name and description for this blog post: Whales sing."
                    }
                ]
            })))
            .with_body(chat_body(
                r#"{"name": "WhaleCoin", "description": "A coin about whale songs."}"#,
            ))
            .create_async()
            .await;

        let (_prompt, image_mock) = mock_image(&mut server).await;

        let input = serde_json::from_value(json!({ "content": "Whales sing." })).unwrap();

        let output = tool.invoke(input).await;

        assert_eq!(
            output,
            Output::Ok {
                text: Sourced::live(CoinText {
                    name: "WhaleCoin".to_string(),
                    description: "A coin about whale songs.".to_string(),
                }),
                image: CoinImage {
                    image_uri: Sourced::live("https://images.example/whale.png".to_string()),
                    prompt: Some("A whale shaped coin".to_string()),
                },
            }
        );

        text_mock.assert_async().await;
        image_mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_unparseable_completion_falls_back() {
        let (mut server, tool) = create_server_and_tool().await;

        let _mock = server
            .mock("POST", "/v1/chat/completions")
            .match_body(Matcher::PartialJson(json!({ "model": TEXT_MODEL })))
            .with_body(chat_body("I would call it WhaleCoin."))
            .create_async()
            .await;

        let _image = mock_image(&mut server).await;

        let input = serde_json::from_value(json!({ "content": "Whales sing." })).unwrap();

        let Output::Ok { text, image } = tool.invoke(input).await else {
            panic!("Expected fallback coin text");
        };

        assert!(text.is_fallback());
        assert!(text.value().name.starts_with("BlogCoin_"));
        assert_eq!(text.value().description, FALLBACK_DESCRIPTION);
        assert!(!image.image_uri.is_fallback());
    }

    #[tokio::test]
    async fn test_image_failure_is_not_an_error() {
        let (mut server, tool) = create_server_and_tool().await;

        let _mock = server
            .mock("POST", "/v1/chat/completions")
            .match_body(Matcher::PartialJson(json!({ "model": TEXT_MODEL })))
            .with_body(chat_body(
                r#"{"name": "WhaleCoin", "description": "A coin about whale songs."}"#,
            ))
            .create_async()
            .await;

        let _mock = server
            .mock("POST", "/v1/chat/completions")
            .match_body(Matcher::PartialJson(json!({ "model": "gpt-3.5-turbo" })))
            .with_status(401)
            .with_body(
                json!({
                    "error": {
                        "message": "Incorrect API key provided.",
                        "type": "invalid_request_error",
                        "param": null,
                        "code": "invalid_api_key"
                    }
                })
                .to_string(),
            )
            .create_async()
            .await;

        let input = serde_json::from_value(json!({ "content": "Whales sing." })).unwrap();

        let Output::Ok { text, image } = tool.invoke(input).await else {
            panic!("Expected a coin with a placeholder image");
        };

        assert!(!text.is_fallback());
        assert_eq!(image.image_uri.value(), FALLBACK_IMAGE_URI);
        assert_eq!(image.prompt, None);
    }

    #[tokio::test]
    async fn test_openai_failure() {
        let (mut server, tool) = create_server_and_tool().await;

        let _mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(401)
            .with_body(
                json!({
                    "error": {
                        "message": "Incorrect API key provided.",
                        "type": "invalid_request_error",
                        "param": null,
                        "code": "invalid_api_key"
                    }
                })
                .to_string(),
            )
            .create_async()
            .await;

        let input = serde_json::from_value(json!({ "content": "Whales sing." })).unwrap();

        let output = tool.invoke(input).await;

        assert_matches!(
            &output,
            Output::Err { reason, kind: MetadataErrorKind::Upstream }
                if reason.contains("Incorrect API key provided.")
        );
        assert_eq!(GenerateCoin::status_of(&output), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_empty_content() {
        let (_server, tool) = create_server_and_tool().await;

        let input = serde_json::from_value(json!({ "content": "" })).unwrap();

        let output = tool.invoke(input).await;

        assert_eq!(
            output,
            Output::Err {
                reason: "Failed to generate coin data: Content is required".to_string(),
                kind: MetadataErrorKind::Validation,
            }
        );
        assert_eq!(GenerateCoin::status_of(&output), StatusCode::BAD_REQUEST);
    }
}
