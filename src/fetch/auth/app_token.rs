use crate::fetch::client::HttpClient;
use async_trait::async_trait;
use reqwest::header::HeaderName;

/// An [`HttpClient`] wrapper that injects a Socrata application token as
/// the `X-App-Token` header.
///
/// Public datasets answer without a token, but tokenless requests share
/// a throttled pool; registering a token lifts the rate limit.
pub struct AppToken<C> {
    pub inner: C,
    pub token: String,
}

impl<C> AppToken<C> {
    pub fn new(inner: C, token: String) -> Self {
        Self { inner, token }
    }
}

#[async_trait]
impl<C: HttpClient> HttpClient for AppToken<C> {
    async fn execute(&self, mut req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        let header_name = HeaderName::from_static("x-app-token");
        req.headers_mut()
            .insert(header_name, self.token.parse().expect("AppToken: invalid token value"));
        self.inner.execute(req).await
    }
}
