use {
    crate::EvmAddress,
    chrono::{DateTime, SecondsFormat, Utc},
    schemars::JsonSchema,
    serde::{Deserialize, Serialize},
};

/// Scheme prefix of content-addressed references.
pub const IPFS_SCHEME: &str = "ipfs://";
/// Public gateway serving pinned content over HTTP.
pub const IPFS_GATEWAY_URL: &str = "https://gateway.pinata.cloud/ipfs";
/// Number of content characters kept in a pinned post description.
const DESCRIPTION_EXCERPT_LEN: usize = 200;

/// `ipfs://<hash>`.
pub fn ipfs_uri(hash: &str) -> String {
    format!("{IPFS_SCHEME}{hash}")
}

/// HTTP gateway URL for a pinned hash or `ipfs://` URI.
pub fn gateway_url(hash_or_uri: &str) -> String {
    let hash = hash_or_uri
        .strip_prefix(IPFS_SCHEME)
        .unwrap_or(hash_or_uri);

    format!("{IPFS_GATEWAY_URL}/{hash}")
}

/// A blog post as written by its author.
///
/// The content hash is only set through [`BlogPost::pinned`], which consumes
/// the unpinned post.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    pub title: String,
    pub content: String,
    pub author: EvmAddress,
    #[serde(rename = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    ipfs_hash: String,
}

impl BlogPost {
    pub fn new(title: impl Into<String>, content: impl Into<String>, author: EvmAddress) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            author,
            created_at: Utc::now(),
            ipfs_hash: String::new(),
        }
    }

    /// Returns the post with its content hash set.
    pub fn pinned(self, ipfs_hash: impl Into<String>) -> Self {
        Self {
            ipfs_hash: ipfs_hash.into(),
            ..self
        }
    }

    pub fn ipfs_hash(&self) -> Option<&str> {
        if self.ipfs_hash.is_empty() {
            None
        } else {
            Some(&self.ipfs_hash)
        }
    }

    /// The metadata document pinned next to the post. Only available once
    /// the post itself has been pinned.
    pub fn to_ipfs_metadata(&self) -> Option<BlogPostIpfsMetadata> {
        let hash = self.ipfs_hash()?;
        let excerpt = self
            .content
            .chars()
            .take(DESCRIPTION_EXCERPT_LEN)
            .collect::<String>();

        Some(BlogPostIpfsMetadata {
            name: self.title.clone(),
            description: format!("{excerpt}..."),
            external_url: ipfs_uri(hash),
            attributes: vec![
                Attribute {
                    trait_type: "Author".to_string(),
                    value: self.author.to_string(),
                },
                Attribute {
                    trait_type: "Created".to_string(),
                    value: self.created_at.to_rfc3339_opts(SecondsFormat::Millis, true),
                },
            ],
            content: self.content.clone(),
        })
    }
}

/// NFT-style metadata document describing a pinned blog post.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct BlogPostIpfsMetadata {
    pub name: String,
    pub description: String,
    pub external_url: String,
    pub attributes: Vec<Attribute>,
    pub content: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Attribute {
    pub trait_type: String,
    pub value: String,
}

#[cfg(test)]
mod tests {
    use {super::*, chrono::TimeZone};

    fn post(content: &str) -> BlogPost {
        let mut post = BlogPost::new(
            "Whales",
            content,
            "0x1234567890abcdef1234567890abcdef12345678"
                .parse()
                .unwrap(),
        );
        post.created_at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
        post
    }

    #[test]
    fn test_metadata_requires_pin() {
        let post = post("Whales sing.");

        assert_eq!(post.ipfs_hash(), None);
        assert_eq!(post.to_ipfs_metadata(), None);
    }

    #[test]
    fn test_metadata_from_pinned_post() {
        let post = post("Whales sing.").pinned("QmHash");
        let metadata = post.to_ipfs_metadata().unwrap();

        assert_eq!(metadata.name, "Whales");
        assert_eq!(metadata.description, "Whales sing....");
        assert_eq!(metadata.external_url, "ipfs://QmHash");
        assert_eq!(metadata.content, "Whales sing.");
        assert_eq!(
            metadata.attributes,
            vec![
                Attribute {
                    trait_type: "Author".to_string(),
                    value: "0x1234567890abcdef1234567890abcdef12345678".to_string(),
                },
                Attribute {
                    trait_type: "Created".to_string(),
                    value: "2024-05-01T12:30:00.000Z".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_metadata_description_is_truncated_by_chars() {
        let content = "é".repeat(300);
        let metadata = post(&content).pinned("QmHash").to_ipfs_metadata().unwrap();

        assert_eq!(metadata.description.chars().count(), 203);
        assert!(metadata.description.ends_with("..."));
    }

    #[test]
    fn test_post_serialization() {
        let json = serde_json::to_value(post("Whales sing.")).unwrap();

        assert_eq!(json["title"], "Whales");
        assert_eq!(json["author"], "0x1234567890abcdef1234567890abcdef12345678");
        assert_eq!(json["timestamp"], "2024-05-01T12:30:00Z");
        assert_eq!(json["ipfsHash"], "");
    }

    #[test]
    fn test_ipfs_helpers() {
        assert_eq!(ipfs_uri("QmHash"), "ipfs://QmHash");
        assert_eq!(
            gateway_url("ipfs://QmHash"),
            "https://gateway.pinata.cloud/ipfs/QmHash"
        );
        assert_eq!(
            gateway_url("QmHash"),
            "https://gateway.pinata.cloud/ipfs/QmHash"
        );
    }
}
