//! # `upload-to-ipfs`
//!
//! Tool that pins a blog post and, optionally, the coin image to IPFS. A failed
//! image pin does not fail the call: the original image URI is returned as a
//! fallback next to the pinned content.

use {
    crate::{
        error::{PinataError, PinningError, PinningErrorKind},
        pinata::{PinMetadata, PinResponse, PinataClient},
    },
    blogcoin_toolkit::*,
    blogcoin_types::{ipfs_uri, Sourced},
    chrono::{SecondsFormat, Utc},
    schemars::JsonSchema,
    serde::{Deserialize, Serialize},
    uuid::Uuid,
};

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub(crate) struct Input {
    /// The blog post content to pin.
    content: String,
    /// URL of the coin image to pin next to the content.
    #[serde(default)]
    image_uri: Option<String>,
}

#[derive(Serialize)]
struct PinnedContent<'a> {
    content: &'a str,
    timestamp: String,
}

#[derive(Debug, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub(crate) enum Output {
    Ok {
        /// `ipfs://` URI of the pinned content.
        content_uri: String,
        /// `ipfs://` URI of the pinned image, or the original image URI as a
        /// fallback when pinning it failed. Absent when no image was given.
        #[serde(skip_serializing_if = "Option::is_none")]
        image_uri: Option<Sourced<String>>,
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

pub(crate) struct UploadToIpfs {
    pinata: PinataClient,
}

impl BlogcoinTool for UploadToIpfs {
    type Input = Input;
    type Output = Output;

    async fn new() -> Self {
        Self {
            pinata: PinataClient::from_env(),
        }
    }

    fn name() -> &'static str {
        "upload-to-ipfs"
    }

    fn path() -> &'static str {
        "/upload-to-ipfs"
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
        match self.upload(input).await {
            Ok((content_uri, image_uri)) => Output::Ok {
                content_uri,
                image_uri,
            },
            Err(e) => {
                log::error!("Failed to upload to IPFS: {e}");

                Output::Err {
                    reason: e.to_string(),
                    kind: e.kind(),
                    status_code: e.status_code(),
                }
            }
        }
    }
}

impl UploadToIpfs {
    async fn upload(
        &self,
        Input { content, image_uri }: Input,
    ) -> Result<(String, Option<Sourced<String>>), PinningError> {
        if content.trim().is_empty() {
            return Err(PinningError::Validation("Content is required".to_string()));
        }

        let id = Uuid::new_v4();

        let pinned = PinnedContent {
            content: &content,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        };

        let metadata = PinMetadata::named(format!("BlogPost_{id}"))
            .with("type", "blog-post")
            .with("timestamp", Utc::now().timestamp_millis().to_string());

        let response = self.pinata.pin_json(&pinned, &metadata).await?;
        let content_uri = ipfs_uri(&response.ipfs_hash);

        log::info!("Pinned blog post as {content_uri}");

        let Some(image_uri) = image_uri.filter(|uri| !uri.trim().is_empty()) else {
            return Ok((content_uri, None));
        };

        Ok((content_uri, Some(self.pin_image(id, image_uri).await)))
    }

    /// Downloads and pins the image. Falls back to the original URI.
    async fn pin_image(&self, id: Uuid, image_uri: String) -> Sourced<String> {
        let metadata = PinMetadata::named(format!("BlogCoinImage_{id}"))
            .with("type", "blog-coin-image")
            .with("timestamp", Utc::now().timestamp_millis().to_string());

        match self.fetch_and_pin(&image_uri, &metadata).await {
            Ok(response) => Sourced::live(ipfs_uri(&response.ipfs_hash)),
            Err(e) => {
                log::warn!("Image upload to IPFS failed, keeping {image_uri}: {e}");

                Sourced::fallback(image_uri, format!("Image upload to IPFS failed: {e}"))
            }
        }
    }

    async fn fetch_and_pin(
        &self,
        image_uri: &str,
        metadata: &PinMetadata,
    ) -> Result<PinResponse, PinataError> {
        let bytes = self.pinata.fetch(image_uri).await?;

        self.pinata.pin_file(bytes, metadata).await
    }
}
