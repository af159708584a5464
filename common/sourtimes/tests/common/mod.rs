//! Mock site helpers for driving the blocking client against `wiremock`.
//!
//! The client owns its own runtime, so it has to be built, used and dropped on
//! a blocking thread rather than inside the test's async context.

use sourtimes::{SourClient, SourConfig, SourResult};
pub use wiremock::matchers::{header, method, path, query_param};
pub use wiremock::{Mock, MockServer, ResponseTemplate};

pub fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.to_string(), "text/html; charset=utf-8")
}

pub async fn mount_get(server: &MockServer, route: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(response)
        .mount(server)
        .await;
}

pub async fn with_client<T, F>(config: SourConfig, f: F) -> SourResult<T>
where
    T: Send + 'static,
    F: FnOnce(&SourClient) -> SourResult<T> + Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let client = SourClient::with_config(config)?;
        f(&client)
    })
    .await
    .expect("blocking client task panicked")
}

pub async fn run<T, F>(server: &MockServer, f: F) -> SourResult<T>
where
    T: Send + 'static,
    F: FnOnce(&SourClient) -> SourResult<T> + Send + 'static,
{
    with_client(SourConfig::default().with_origin(server.uri()), f).await
}

/// Query pairs of every request the server has seen, in arrival order.
pub async fn received_queries(server: &MockServer) -> Vec<Vec<(String, String)>> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|request| {
            request
                .url
                .query_pairs()
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect()
        })
        .collect()
}
