use anyhow::{anyhow, Result};
use cine_app::rest_api::movie::MovieEnvelope;
use cine_dal::movie::MovieView;
use reqwest::Url;
use serde_json::json;
use tracing::info;

pub fn movies_url(base_url: &Url) -> Url {
    base_url.join("v1/movies").unwrap()
}

pub async fn create_movie(
    client: &reqwest::Client,
    base_url: &Url,
    title: &str,
    year: i32,
    runtime: i32,
    genres: &[&str],
) -> Result<MovieView> {
    let payload = json!({"title": title, "year": year, "runtime": runtime, "genres": genres});

    let response = client
        .post(movies_url(base_url))
        .json(&payload)
        .send()
        .await?;
    info!("Response: {:#?}", response);
    if response.status().as_u16() != 201 {
        return Err(anyhow!("Unexpected status {}", response.status()));
    }

    let envelope: MovieEnvelope = response.json().await?;
    Ok(envelope.movie)
}
