use {
    crate::InvalidValue,
    lazy_regex::regex_is_match,
    schemars::{JsonSchema, Schema, SchemaGenerator},
    serde::{Deserialize, Deserializer, Serialize, Serializer},
    std::{borrow::Cow, str::FromStr},
};

/// A 20-byte EVM address in its `0x`-prefixed hex form.
///
/// The original casing is kept; no checksum validation is performed.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EvmAddress(String);

impl EvmAddress {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for EvmAddress {
    type Err = InvalidValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        if !regex_is_match!(r"^0x[0-9a-fA-F]{40}$", s) {
            return Err(InvalidValue::Address(s.to_string()));
        }

        Ok(Self(s.to_string()))
    }
}

impl std::fmt::Display for EvmAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for EvmAddress {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for EvmAddress {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;

        value.parse().map_err(serde::de::Error::custom)
    }
}

impl JsonSchema for EvmAddress {
    fn schema_name() -> Cow<'static, str> {
        String::schema_name()
    }

    fn json_schema(gen: &mut SchemaGenerator) -> Schema {
        String::json_schema(gen)
    }
}
