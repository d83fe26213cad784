//! Pinata API client
//!
//! Covers the three endpoints the tools need: pinning JSON, pinning a file and
//! checking the credentials.

use {
    crate::error::PinataError,
    blogcoin_toolkit::{optional_env, required_env, AnyResult, StatusCode},
    blogcoin_types::Secret,
    reqwest::{
        multipart::{Form, Part},
        Client,
        RequestBuilder,
        Response,
    },
    serde::{Deserialize, Serialize},
    std::collections::BTreeMap,
};

pub(crate) const PINATA_API_BASE: &str = "https://api.pinata.cloud";

pub(crate) const API_KEY_ENV: &str = "PINATA_API_KEY";
pub(crate) const API_SECRET_ENV: &str = "PINATA_API_SECRET";
pub(crate) const API_BASE_ENV: &str = "PINATA_API_BASE";

/// `pinataMetadata` sent with every pin.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub(crate) struct PinMetadata {
    pub name: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub keyvalues: BTreeMap<String, String>,
}

impl PinMetadata {
    pub(crate) fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            keyvalues: BTreeMap::new(),
        }
    }

    pub(crate) fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.keyvalues.insert(key.to_string(), value.into());
        self
    }
}

/// Upper bound on the size of an image downloaded for pinning.
pub(crate) const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// Pinata answer to a successful pin.
#[derive(Clone, Debug, Deserialize)]
pub(crate) struct PinResponse {
    #[serde(rename = "IpfsHash")]
    pub ipfs_hash: String,
    #[serde(rename = "PinSize")]
    pub pin_size: u64,
    #[serde(rename = "isDuplicate", default)]
    pub is_duplicate: Option<bool>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PinJsonRequest<'a, T> {
    pinata_content: &'a T,
    pinata_metadata: &'a PinMetadata,
}

pub(crate) struct PinataClient {
    client: Client,
    api_base: String,
    api_key: Secret<String>,
    api_secret: Secret<String>,
    max_image_bytes: usize,
}

impl PinataClient {
    pub(crate) fn new(
        api_base: impl Into<String>,
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
            api_key: Secret::new(api_key.into()),
            api_secret: Secret::new(api_secret.into()),
            max_image_bytes: MAX_IMAGE_BYTES,
        }
    }

    pub(crate) fn from_env() -> Self {
        Self::new(
            optional_env(API_BASE_ENV).unwrap_or_else(|| PINATA_API_BASE.to_string()),
            required_env(API_KEY_ENV),
            required_env(API_SECRET_ENV),
        )
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("pinata_api_key", &*self.api_key)
            .header("pinata_secret_api_key", &*self.api_secret)
    }

    /// Pins a JSON document.
    pub(crate) async fn pin_json<T: Serialize>(
        &self,
        content: &T,
        metadata: &PinMetadata,
    ) -> Result<PinResponse, PinataError> {
        let body = PinJsonRequest {
            pinata_content: content,
            pinata_metadata: metadata,
        };

        let response = self
            .authorized(
                self.client
                    .post(format!("{}/pinning/pinJSONToIPFS", self.api_base)),
            )
            .json(&body)
            .send()
            .await?;

        pinned(response, &metadata.name).await
    }

    /// Pins raw bytes as a file.
    pub(crate) async fn pin_file(
        &self,
        bytes: Vec<u8>,
        metadata: &PinMetadata,
    ) -> Result<PinResponse, PinataError> {
        let form = Form::new()
            .part("file", Part::bytes(bytes).file_name(metadata.name.clone()))
            .text("pinataMetadata", serde_json::to_string(metadata)?);

        let response = self
            .authorized(
                self.client
                    .post(format!("{}/pinning/pinFileToIPFS", self.api_base)),
            )
            .multipart(form)
            .send()
            .await?;

        pinned(response, &metadata.name).await
    }

    /// Succeeds when Pinata accepts the configured credentials.
    pub(crate) async fn test_authentication(&self) -> Result<(), PinataError> {
        let response = self
            .authorized(
                self.client
                    .get(format!("{}/data/testAuthentication", self.api_base)),
            )
            .send()
            .await?;

        checked(response).await.map(|_| ())
    }

    /// `200` when the credentials are accepted, `503` otherwise.
    pub(crate) async fn health(&self) -> AnyResult<StatusCode> {
        match self.test_authentication().await {
            Ok(()) => Ok(StatusCode::OK),
            Err(e) => {
                log::warn!("Pinata health check failed: {e}");

                Ok(StatusCode::SERVICE_UNAVAILABLE)
            }
        }
    }

    /// Downloads the image behind a URL. The body is read chunk by chunk and
    /// the download stops once it exceeds the image size limit.
    pub(crate) async fn fetch(&self, url: &str) -> Result<Vec<u8>, PinataError> {
        let mut response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(PinataError::ImageFetch {
                status: response.status().as_u16(),
                url: url.to_string(),
            });
        }

        let too_large = || PinataError::ImageTooLarge {
            url: url.to_string(),
            limit: self.max_image_bytes,
        };

        if response
            .content_length()
            .is_some_and(|len| len > self.max_image_bytes as u64)
        {
            return Err(too_large());
        }

        let mut bytes = Vec::new();

        while let Some(chunk) = response.chunk().await? {
            if bytes.len() + chunk.len() > self.max_image_bytes {
                return Err(too_large());
            }

            bytes.extend_from_slice(&chunk);
        }

        Ok(bytes)
    }
}

async fn pinned(response: Response, name: &str) -> Result<PinResponse, PinataError> {
    let pin: PinResponse = checked(response).await?.json().await?;

    log::info!(
        "Pinned '{name}' as {} ({} bytes{})",
        pin.ipfs_hash,
        pin.pin_size,
        if pin.is_duplicate == Some(true) {
            ", already pinned"
        } else {
            ""
        }
    );

    Ok(pin)
}

/// Turns non-2xx answers into [`PinataError::Api`] carrying the body.
async fn checked(response: Response) -> Result<Response, PinataError> {
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|json| match &json["error"] {
            serde_json::Value::String(message) => Some(message.clone()),
            serde_json::Value::Object(error) => error
                .get("details")
                .or_else(|| error.get("reason"))
                .and_then(|m| m.as_str())
                .map(str::to_string),
            _ => None,
        })
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown").to_string());

    Err(PinataError::Api {
        status: status.as_u16(),
        message,
    })
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        assert_matches::assert_matches,
        mockito::{Matcher, Server},
        serde_json::json,
        std::io::Write,
    };

    #[tokio::test]
    async fn test_pin_json() {
        let mut server = Server::new_async().await;
        let client = PinataClient::new(server.url(), "key", "secret");

        let mock = server
            .mock("POST", "/pinning/pinJSONToIPFS")
            .match_header("pinata_api_key", "key")
            .match_header("pinata_secret_api_key", "secret")
            .match_body(Matcher::Json(json!({
                "pinataContent": { "hello": "world" },
                "pinataMetadata": {
                    "name": "greeting",
                    "keyvalues": { "type": "blog-post" }
                }
            })))
            .with_body(
                json!({
                    "IpfsHash": "QmHash",
                    "PinSize": 42,
                    "Timestamp": "2025-01-01T00:00:00Z"
                })
                .to_string(),
            )
            .create_async()
            .await;

        let response = client
            .pin_json(
                &json!({ "hello": "world" }),
                &PinMetadata::named("greeting").with("type", "blog-post"),
            )
            .await
            .unwrap();

        assert_eq!(response.ipfs_hash, "QmHash");
        assert_eq!(response.pin_size, 42);
        assert_eq!(response.is_duplicate, None);

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_pin_file() {
        let mut server = Server::new_async().await;
        let client = PinataClient::new(server.url(), "key", "secret");

        let mock = server
            .mock("POST", "/pinning/pinFileToIPFS")
            .match_header(
                "content-type",
                Matcher::Regex("^multipart/form-data".to_string()),
            )
            .match_body(Matcher::Regex("BlogCoinImage_1".to_string()))
            .with_body(
                json!({
                    "IpfsHash": "QmImage",
                    "PinSize": 3,
                    "Timestamp": "2025-01-01T00:00:00Z",
                    "isDuplicate": true
                })
                .to_string(),
            )
            .create_async()
            .await;

        let response = client
            .pin_file(vec![1, 2, 3], &PinMetadata::named("BlogCoinImage_1"))
            .await
            .unwrap();

        assert_eq!(response.ipfs_hash, "QmImage");
        assert_eq!(response.is_duplicate, Some(true));

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_is_capped() {
        let mut server = Server::new_async().await;
        let mut client = PinataClient::new(server.url(), "key", "secret");

        client.max_image_bytes = 4;

        let _small = server
            .mock("GET", "/small.png")
            .with_body(vec![1, 2, 3, 4])
            .create_async()
            .await;

        let _large = server
            .mock("GET", "/large.png")
            .with_body(vec![0; 5])
            .create_async()
            .await;

        let _chunked = server
            .mock("GET", "/chunked.png")
            .with_chunked_body(|w| w.write_all(&[0; 64]))
            .create_async()
            .await;

        assert_eq!(
            client.fetch(&format!("{}/small.png", server.url())).await.unwrap(),
            vec![1, 2, 3, 4]
        );
        assert_matches!(
            client.fetch(&format!("{}/large.png", server.url())).await,
            Err(PinataError::ImageTooLarge { limit: 4, .. })
        );
        assert_matches!(
            client.fetch(&format!("{}/chunked.png", server.url())).await,
            Err(PinataError::ImageTooLarge { limit: 4, .. })
        );
    }

    #[tokio::test]
    async fn test_api_error() {
        let mut server = Server::new_async().await;
        let client = PinataClient::new(server.url(), "key", "wrong");

        let _mock = server
            .mock("GET", "/data/testAuthentication")
            .with_status(401)
            .with_body(
                json!({
                    "error": {
                        "reason": "INVALID_CREDENTIALS",
                        "details": "Invalid API key provided"
                    }
                })
                .to_string(),
            )
            .create_async()
            .await;

        assert_matches!(
            client.test_authentication().await,
            Err(PinataError::Api { status: 401, message }) if message == "Invalid API key provided"
        );
    }
}
