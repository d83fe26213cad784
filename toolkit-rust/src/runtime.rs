use {
    crate::BlogcoinTool,
    reqwest::Url,
    serde_json::json,
    warp::{
        filters::{host::Authority, path::FullPath},
        http::StatusCode,
        Filter,
        Rejection,
        Reply,
    },
};

/// Serves one or more [`BlogcoinTool`]s from a single warp server.
///
/// Logging is set up first. Each tool then gets its `health`, `meta` and
/// `invoke` routes below [`BlogcoinTool::path`], and `GET /health` answers
/// `200` for the server as a whole. Without an address the server listens on
/// `127.0.0.1:8080`.
///
/// # Examples
///
/// ### A single tool
///
/// ```ignore
/// use blogcoin_toolkit::bootstrap;
///
/// #[tokio::main]
/// async fn main() {
///     bootstrap!(YourTool);
/// }
/// ```
///
/// ### Several tools on the address from `BLOGCOIN_BIND_ADDR`
///
/// ```ignore
/// use blogcoin_toolkit::{bind_addr, bootstrap};
///
/// #[tokio::main]
/// async fn main() {
///     bootstrap!(bind_addr(8081), [YourTool, AnotherTool]);
/// }
/// ```
#[macro_export]
macro_rules! bootstrap {
    ($addr:expr, [$tool:ty $(, $next_tool:ty)* $(,)?]) => {{
        use {
            $crate::warp::{http::StatusCode, Filter},
        };

        $crate::init_logging();

        let routes = $crate::routes_for_::<$tool>();
        $(let routes = routes.or($crate::routes_for_::<$next_tool>());)*

        // Liveness of the server itself, tools mounted at the root shadow it.
        let default_health_route = $crate::warp::get()
            .and($crate::warp::path("health"))
            .map(|| $crate::warp::reply::with_status("", StatusCode::OK));

        let routes = routes.or(default_health_route);
        let addr: ::std::net::SocketAddr = $addr.into();

        $crate::log::info!(
            "Serving {} on http://{addr}",
            [<$tool as $crate::BlogcoinTool>::name() $(, <$next_tool as $crate::BlogcoinTool>::name())*].join(", ")
        );

        $crate::warp::serve(routes).run(addr).await
    }};
    ([$($tool:ty),+ $(,)?]) => {
        $crate::bootstrap!(([127, 0, 0, 1], 8080), [$($tool, )*]);
    };
    ($addr:expr, $tool:ty) => {
        $crate::bootstrap!($addr, [$tool]);
    };
    ($tool:ty) => {
        $crate::bootstrap!(([127, 0, 0, 1], 8080), [$tool]);
    };
}

/// Routes of a single tool. Called by [`bootstrap!`].
///
/// Panics if `T::Output` is not an enum, since callers tell success from
/// failure by the variant name.
#[doc(hidden)]
pub fn routes_for_<T: BlogcoinTool>(
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    let output_schema = json!(schemars::schema_for!(T::Output));

    if output_schema["oneOf"].is_null() {
        panic!("Output of '{}' must be an enum", T::name());
    }

    let base_path = T::path()
        .split("/")
        .filter(|s| !s.is_empty())
        .fold(warp::any().boxed(), |filter, segment| {
            filter.and(warp::path(segment.to_string())).boxed()
        });

    let health_route = warp::get()
        .and(base_path.clone())
        .and(warp::path("health"))
        .and(warp::path::end())
        .and_then(health_handler::<T>);

    let meta_route = warp::get()
        .and(base_path.clone())
        .and(warp::path("meta"))
        .and(warp::path::end())
        .and(warp::filters::host::optional())
        .and(warp::path::full())
        .and_then(meta_handler::<T>);

    let invoke_route = warp::post()
        .and(base_path)
        .and(warp::path("invoke"))
        .and(warp::path::end())
        .and(warp::body::json())
        .and_then(invoke_handler::<T>);

    health_route.or(meta_route).or(invoke_route)
}

async fn health_handler<T: BlogcoinTool>() -> Result<impl Reply, Rejection> {
    let tool = T::new().await;

    let status = tool.health().await.unwrap_or_else(|e| {
        log::error!("Health check of '{}' failed: {e}", T::name());

        StatusCode::INTERNAL_SERVER_ERROR
    });

    Ok(warp::reply::with_status("", status))
}

/// JSON error body the runtime itself replies with.
fn error_reply(
    error: &str,
    details: impl std::fmt::Display,
    status: StatusCode,
) -> warp::reply::WithStatus<warp::reply::Json> {
    let body = json!({ "error": error, "details": details.to_string() });

    warp::reply::with_status(warp::reply::json(&body), status)
}

async fn meta_handler<T: BlogcoinTool>(
    host: Option<Authority>,
    path: FullPath,
) -> Result<impl Reply, Rejection> {
    let Some(host) = host else {
        return Ok(error_reply(
            "host_header_required",
            "Host header is required.",
            StatusCode::BAD_REQUEST,
        ));
    };

    // The route guarantees the suffix.
    let Some(base_path) = path.as_str().strip_suffix("meta") else {
        return Ok(error_reply(
            "invalid_path",
            "Meta path must end with '/meta'.",
            StatusCode::BAD_REQUEST,
        ));
    };

    let scheme = match host.host() {
        "localhost" | "127.0.0.1" | "[::1]" => "http",
        _ => "https",
    };

    match Url::parse(&format!("{scheme}://{host}{base_path}")) {
        Ok(url) => Ok(warp::reply::with_status(
            warp::reply::json(&T::meta(url)),
            StatusCode::OK,
        )),
        Err(e) => Ok(error_reply("url_parsing_error", e, StatusCode::BAD_REQUEST)),
    }
}

async fn invoke_handler<T: BlogcoinTool>(
    input: serde_json::Value,
) -> Result<impl Reply, Rejection> {
    // `serde_path_to_error` names the offending field, e.g. `wallet.account`.
    let input = match serde_path_to_error::deserialize(input) {
        Ok(input) => input,
        Err(e) => {
            log::warn!("Rejecting malformed input for '{}': {e}", T::name());

            return Ok(error_reply(
                "input_deserialization_error",
                e,
                StatusCode::UNPROCESSABLE_ENTITY,
            ));
        }
    };

    log::info!("Invoking '{}'", T::name());

    let output = T::new().await.invoke(input).await;
    let status = T::status_of(&output);

    if !status.is_success() {
        log::warn!("'{}' finished with {status}", T::name());
    }

    Ok(warp::reply::with_status(warp::reply::json(&output), status))
}
