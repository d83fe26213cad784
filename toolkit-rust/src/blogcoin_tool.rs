use {
    anyhow::Result as AnyResult,
    reqwest::Url,
    schemars::JsonSchema,
    serde::{de::DeserializeOwned, Serialize},
    serde_json::{json, Value},
    std::future::Future,
    warp::http::StatusCode,
};

/// This trait defines the interface for a BlogCoin tool. It forces
/// implementation of the following methods:
///
/// - `new`: Creates the tool, usually reading its configuration from the
///   environment. Called once per request.
/// - `name`: Returns the tool name.
/// - `invoke`: Invokes the tool with the given input.
/// - `health`: Returns the health status of the tool.
///
/// And the following associated types:
///
/// - `Input`: The input type of the tool.
/// - `Output`: The output type of the tool.
///
/// Based on the provided methods and associated types, the trait automatically
/// generates the following endpoints:
///
/// - `GET /health`: Returns the health status of the tool.
/// - `GET /meta`: Returns the metadata of the tool.
/// - `POST /invoke`: Invokes the tool with the given input.
///
/// The metadata of the tool includes the name, URL, input schema and output
/// schema.
pub trait BlogcoinTool: Send + Sync + Sized + 'static {
    /// The input type of the tool. It must implement `JsonSchema` and
    /// `DeserializeOwned`. It is used to generate the input schema of the tool.
    /// It is also used to deserialize the input payload.
    type Input: JsonSchema + DeserializeOwned + Send;
    /// The output type of the tool. It must implement `JsonSchema` and
    /// `Serialize`. It is used to generate the output schema of the tool. It is
    /// also used to serialize the output payload.
    ///
    /// **Important:** The output type must be a Rust `enum` so that a top-level
    /// `oneOf` is generated. Callers match on the variant name to tell success
    /// from failure.
    type Output: JsonSchema + Serialize + Send;

    /// Creates the tool.
    fn new() -> impl Future<Output = Self> + Send;
    /// Returns the name of the tool, e.g. `upload-to-ipfs`.
    fn name() -> &'static str;
    /// Invokes the tool with the given input.
    ///
    /// It is used to generate the `/invoke` endpoint.
    fn invoke(&self, input: Self::Input) -> impl Future<Output = Self::Output> + Send;
    /// Returns the health status of the tool. For now, this only returns an
    /// HTTP status code.
    ///
    /// It is used to generate the `/health` endpoint.
    fn health(&self) -> impl Future<Output = AnyResult<StatusCode>> + Send;
    /// Returns the relative path on a webserver that the tool resides on. This
    /// defaults to an empty path (root URL). But can be overriden by the
    /// implementor.
    fn path() -> &'static str {
        ""
    }
    /// Returns the HTTP status code the `/invoke` endpoint replies with for
    /// the given output. Defaults to `200 OK` for every output.
    fn status_of(_output: &Self::Output) -> StatusCode {
        StatusCode::OK
    }
    /// Returns the metadata of the tool. It includes the name, URL, input
    /// schema and output schema.
    ///
    /// It is used to generate the `/meta` endpoint.
    fn meta(url: Url) -> Value {
        let input_schema = schemars::schema_for!(Self::Input);
        let output_schema = schemars::schema_for!(Self::Output);

        json!(
            {
                "name": Self::name(),
                "url": url.to_string(),
                "input_schema": input_schema,
                "output_schema": output_schema,
            }
        )
    }
}
