mod client;
mod basic;
pub mod auth;

pub use client::HttpClient;
pub use basic::BasicClient;

use anyhow::{Result, ensure};

pub async fn fetch_bytes<C: HttpClient>(client: &C, url: &str) -> Result<Vec<u8>> {
    let req = reqwest::Request::new(reqwest::Method::GET, url.parse()?);

    let resp = client.execute(req).await?;
    ensure!(
        resp.status().is_success(),
        "request to {url} failed with status {}",
        resp.status()
    );
    Ok(resp.bytes().await?.to_vec())
}
