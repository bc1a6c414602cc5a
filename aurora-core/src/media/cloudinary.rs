//! Cloudinary upload API, `destroy` endpoint.

use std::time::Duration;

use kanau::processor::Processor;
use serde::Deserialize;
use tracing::warn;
use url::Url;

use super::{DestroyImage, DestroyOutcome, MediaError};

#[derive(Debug, Clone)]
pub struct MediaClient {
    http: reqwest::Client,
    cloud_name: String,
    api_key: String,
    api_secret: String,
    api_base: Url,
}

impl MediaClient {
    pub fn new(
        cloud_name: impl Into<String>,
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
        api_base: Url,
    ) -> Self {
        Self {
            http: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
            cloud_name: cloud_name.into(),
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            api_base,
        }
    }
}

/// Request signature: SHA-1 over the alphabetically sorted parameters joined
/// as a query string, followed by the API secret. Hex encoded.
pub(crate) fn sign(params: &[(&str, &str)], api_secret: &str) -> String {
    let mut sorted = params.to_vec();
    sorted.sort_by(|a, b| a.0.cmp(b.0));
    let to_sign = sorted
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&");
    let digest = ring::digest::digest(
        &ring::digest::SHA1_FOR_LEGACY_USE_ONLY,
        format!("{to_sign}{api_secret}").as_bytes(),
    );
    digest
        .as_ref()
        .iter()
        .map(|byte| format!("{byte:02x}"))
        .collect()
}

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl Processor<DestroyImage> for MediaClient {
    type Output = DestroyOutcome;
    type Error = MediaError;
    #[tracing::instrument(skip_all, err, name = "Cloudinary:DestroyImage")]
    async fn process(&self, request: DestroyImage) -> Result<DestroyOutcome, MediaError> {
        let timestamp = time::OffsetDateTime::now_utc().unix_timestamp().to_string();
        let public_id = request.public_id.trim();
        let signature = sign(
            &[("public_id", public_id), ("timestamp", &timestamp)],
            &self.api_secret,
        );

        let path = format!("/v1_1/{}/image/destroy", urlencoding::encode(&self.cloud_name));
        let endpoint = self
            .api_base
            .join(&path)
            .map_err(|e| MediaError::InvalidResponse(format!("invalid endpoint {path}: {e}")))?;
        let form = [
            ("public_id", public_id),
            ("timestamp", timestamp.as_str()),
            ("api_key", self.api_key.as_str()),
            ("signature", signature.as_str()),
        ];

        let response = self.http.post(endpoint).form(&form).send().await?;
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            let message = serde_json::from_str::<ErrorEnvelope>(&text)
                .map(|envelope| envelope.error.message)
                .unwrap_or_else(|_| text.chars().take(200).collect());
            warn!(status = status.as_u16(), %message, "Cloudinary destroy failed");
            return Err(MediaError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: DestroyResponse =
            serde_json::from_str(&text).map_err(|e| MediaError::InvalidResponse(e.to_string()))?;
        match parsed.result.as_str() {
            "ok" => Ok(DestroyOutcome::Deleted),
            "not found" => Ok(DestroyOutcome::NotFound),
            other => Err(MediaError::InvalidResponse(format!(
                "unexpected destroy result: {other}"
            ))),
        }
    }
}
