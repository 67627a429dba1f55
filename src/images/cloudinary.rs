use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use sha2::{Digest, Sha256};
use time::OffsetDateTime;
use tracing::debug;

use crate::config::CloudinaryConfig;

use super::{HostedImage, ImageError, ImageHost};

const API_BASE: &str = "https://api.cloudinary.com/v1_1";

/// Signed uploads against the Cloudinary REST API.
#[derive(Clone)]
pub struct Cloudinary {
    http_client: reqwest::Client,
    api_base: String,
    config: CloudinaryConfig,
}

impl Cloudinary {
    pub fn new(config: CloudinaryConfig) -> Self {
        Self::with_api_base(config, API_BASE)
    }

    pub fn with_api_base(config: CloudinaryConfig, api_base: impl Into<String>) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            api_base: api_base.into(),
            config,
        }
    }

    fn endpoint(&self, action: &str) -> String {
        format!("{}/{}/image/{action}", self.api_base, self.config.cloud_name)
    }

    fn sign(&self, params: &[(&str, &str)]) -> String {
        sign(params, &self.config.api_secret)
    }
}

#[async_trait]
impl ImageHost for Cloudinary {
    async fn upload(&self, filename: &str, bytes: Vec<u8>) -> Result<HostedImage, ImageError> {
        let timestamp = OffsetDateTime::now_utc().unix_timestamp().to_string();
        let signature = self.sign(&[("timestamp", timestamp.as_str())]);

        let form = Form::new()
            .part("file", Part::bytes(bytes).file_name(filename.to_owned()))
            .text("api_key", self.config.api_key.clone())
            .text("timestamp", timestamp)
            .text("signature_algorithm", "sha256")
            .text("signature", signature);

        let body: Value = self.http_client.post(self.endpoint("upload"))
            .multipart(form)
            .send()
            .await?
            .json()
            .await?;
        api_error(&body)?;

        let hosted = HostedImage {
            url: str_field(&body, "secure_url")?,
            public_id: str_field(&body, "public_id")?,
        };
        debug!("uploaded {filename} as {}", hosted.public_id);
        Ok(hosted)
    }

    async fn destroy(&self, public_id: &str) -> Result<(), ImageError> {
        let timestamp = OffsetDateTime::now_utc().unix_timestamp().to_string();
        let signature = self.sign(&[("public_id", public_id), ("timestamp", timestamp.as_str())]);

        let body: Value = self.http_client.post(self.endpoint("destroy"))
            .form(&[
                ("public_id", public_id),
                ("api_key", self.config.api_key.as_str()),
                ("timestamp", timestamp.as_str()),
                ("signature_algorithm", "sha256"),
                ("signature", signature.as_str()),
            ])
            .send()
            .await?
            .json()
            .await?;
        api_error(&body)?;

        match str_field(&body, "result")?.as_str() {
            "ok" => Ok(()),
            other => Err(ImageError::Api(format!("could not delete image {public_id}: {other}"))),
        }
    }
}

/// Parameters sorted by name and joined as `k=v&k=v`.
fn string_to_sign(params: &[(&str, &str)]) -> String {
    let mut sorted = params.to_vec();
    sorted.sort_by(|a, b| a.0.cmp(b.0));
    sorted
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&")
}

fn sign(params: &[(&str, &str)], api_secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(string_to_sign(params).as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}

fn api_error(body: &Value) -> Result<(), ImageError> {
    match body.get("error") {
        Some(error) => Err(ImageError::Api(
            error.get("message")
                .and_then(Value::as_str)
                .unwrap_or("image host rejected the request")
                .to_owned(),
        )),
        None => Ok(()),
    }
}

fn str_field(body: &Value, field: &str) -> Result<String, ImageError> {
    Ok(
        body.get(field)
            .ok_or_else(|| ImageError::Malformed(format!("expected {field} in {body}")))?
            .as_str()
            .ok_or_else(|| ImageError::Malformed(format!("expected {field} in {body} to be string")))?
            .to_owned()
    )
}
