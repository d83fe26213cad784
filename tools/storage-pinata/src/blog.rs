//! # `blog`
//!
//! Tool that pins a blog post and then the NFT-style metadata document that
//! points at it.

use {
    crate::{
        error::{PinningError, PinningErrorKind},
        pinata::{PinMetadata, PinataClient},
    },
    blogcoin_toolkit::*,
    blogcoin_types::{ipfs_uri, BlogPost, EvmAddress},
    chrono::Utc,
    schemars::JsonSchema,
    serde::{Deserialize, Serialize},
};

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub(crate) struct Input {
    /// Title of the post.
    title: String,
    /// Content of the post.
    content: String,
    /// Address of the author, `0x` followed by 40 hex digits.
    author_address: String,
}

#[derive(Debug, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub(crate) enum Output {
    Ok {
        /// Hash of the pinned post.
        content_hash: String,
        /// Hash of the pinned metadata document.
        metadata_hash: String,
        /// `ipfs://` URI of the metadata document.
        metadata_uri: String,
    },
    Err {
        /// Detailed error message.
        reason: String,
        /// Type of error.
        kind: PinningErrorKind,
        /// HTTP status code returned by Pinata, if any.
        #[serde(skip_serializing_if = "Option::is_none")]
        status_code: Option<u16>,
    },
}

pub(crate) struct Blog {
    pinata: PinataClient,
}

impl BlogcoinTool for Blog {
    type Input = Input;
    type Output = Output;

    async fn new() -> Self {
        Self {
            pinata: PinataClient::from_env(),
        }
    }

    fn name() -> &'static str {
        "blog"
    }

    fn path() -> &'static str {
        "/blog"
    }

    fn status_of(output: &Self::Output) -> StatusCode {
        match output {
            Output::Ok { .. } => StatusCode::OK,
            Output::Err { kind, .. } => kind.status(),
        }
    }

    async fn health(&self) -> AnyResult<StatusCode> {
        self.pinata.health().await
    }

    async fn invoke(&self, input: Self::Input) -> Self::Output {
        match self.publish(input).await {
            Ok((content_hash, metadata_hash)) => Output::Ok {
                metadata_uri: ipfs_uri(&metadata_hash),
                content_hash,
                metadata_hash,
            },
            Err(e) => {
                log::error!("Failed to process blog post: {e}");

                Output::Err {
                    reason: e.to_string(),
                    kind: e.kind(),
                    status_code: e.status_code(),
                }
            }
        }
    }
}

impl Blog {
    /// Returns the content hash and the metadata hash.
    async fn publish(
        &self,
        Input {
            title,
            content,
            author_address,
        }: Input,
    ) -> Result<(String, String), PinningError> {
        if [&title, &content, &author_address]
            .iter()
            .any(|field| field.trim().is_empty())
        {
            return Err(PinningError::Validation(
                "Missing required fields: title, content, or author_address".to_string(),
            ));
        }

        let author = author_address.parse::<EvmAddress>()?;
        let post = BlogPost::new(title, content, author);

        let response = self
            .pinata
            .pin_json(
                &post,
                &PinMetadata::named(format!(
                    "{}-{}",
                    post.title,
                    Utc::now().timestamp_millis()
                )),
            )
            .await?;

        let post = post.pinned(response.ipfs_hash);

        let metadata = post
            .to_ipfs_metadata()
            .ok_or(PinningError::Internal("Pinned post has no content hash"))?;

        let metadata_response = self
            .pinata
            .pin_json(
                &metadata,
                &PinMetadata::named(format!(
                    "{}-metadata-{}",
                    post.title,
                    Utc::now().timestamp_millis()
                )),
            )
            .await?;

        let content_hash = post.ipfs_hash().unwrap_or_default().to_string();

        log::info!(
            "Pinned blog post '{}' as {content_hash} with metadata {}",
            post.title,
            metadata_response.ipfs_hash
        );

        Ok((content_hash, metadata_response.ipfs_hash))
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        assert_matches::assert_matches,
        mockito::{Matcher, Server},
        serde_json::json,
    };

    const AUTHOR: &str = "0x1234567890abcdef1234567890abcdef12345678";

    impl Blog {
        fn with_api_base(api_base: &str) -> Self {
            Self {
                pinata: PinataClient::new(api_base, "key", "secret"),
            }
        }
    }

    async fn create_server_and_tool() -> (mockito::ServerGuard, Blog) {
        let server = Server::new_async().await;
        let tool = Blog::with_api_base(&server.url());

        (server, tool)
    }

    fn pin_body(hash: &str) -> String {
        json!({
            "IpfsHash": hash,
            "PinSize": 256,
            "Timestamp": "2025-01-01T00:00:00Z"
        })
        .to_string()
    }

    #[tokio::test]
    async fn test_post_and_metadata_pinned() {
        let (mut server, tool) = create_server_and_tool().await;

        let post_mock = server
            .mock("POST", "/pinning/pinJSONToIPFS")
            .match_body(Matcher::PartialJson(json!({
                "pinataContent": {
                    "title": "Whales",
                    "content": "Whales sing.",
                    "author": AUTHOR,
                    "ipfsHash": ""
                }
            })))
            .with_body(pin_body("QmPost"))
            .create_async()
            .await;

        let metadata_mock = server
            .mock("POST", "/pinning/pinJSONToIPFS")
            .match_body(Matcher::PartialJson(json!({
                "pinataContent": {
                    "name": "Whales",
                    "description": "Whales sing....",
                    "external_url": "ipfs://QmPost",
                    "content": "Whales sing."
                }
            })))
            .with_body(pin_body("QmMetadata"))
            .create_async()
            .await;

        let input = serde_json::from_value(json!({
            "title": "Whales",
            "content": "Whales sing.",
            "author_address": AUTHOR
        }))
        .unwrap();

        let output = tool.invoke(input).await;

        assert_eq!(
            output,
            Output::Ok {
                content_hash: "QmPost".to_string(),
                metadata_hash: "QmMetadata".to_string(),
                metadata_uri: "ipfs://QmMetadata".to_string(),
            }
        );

        post_mock.assert_async().await;
        metadata_mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_missing_fields() {
        let (_server, tool) = create_server_and_tool().await;

        let input = serde_json::from_value(json!({
            "title": "",
            "content": "Whales sing.",
            "author_address": AUTHOR
        }))
        .unwrap();

        let output = tool.invoke(input).await;

        assert_matches!(
            &output,
            Output::Err { kind: PinningErrorKind::Validation, reason, .. }
                if reason.starts_with("Missing required fields")
        );
        assert_eq!(Blog::status_of(&output), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_invalid_author() {
        let (_server, tool) = create_server_and_tool().await;

        let input = serde_json::from_value(json!({
            "title": "Whales",
            "content": "Whales sing.",
            "author_address": "0x1234"
        }))
        .unwrap();

        let output = tool.invoke(input).await;

        assert_matches!(
            output,
            Output::Err {
                kind: PinningErrorKind::Validation,
                ..
            }
        );
    }

    #[tokio::test]
    async fn test_pin_failure() {
        let (mut server, tool) = create_server_and_tool().await;

        let _mock = server
            .mock("POST", "/pinning/pinJSONToIPFS")
            .with_status(403)
            .with_body(json!({ "error": "Pinning limit reached" }).to_string())
            .create_async()
            .await;

        let input = serde_json::from_value(json!({
            "title": "Whales",
            "content": "Whales sing.",
            "author_address": AUTHOR
        }))
        .unwrap();

        let output = tool.invoke(input).await;

        assert_eq!(
            output,
            Output::Err {
                reason: "Failed to upload to IPFS: Pinata API error (403): Pinning limit reached"
                    .to_string(),
                kind: PinningErrorKind::Upstream,
                status_code: Some(403),
            }
        );
    }
}
