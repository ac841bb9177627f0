//! HTTP client for the mirad API.

use anyhow::{bail, Context, Result};
use mira_common::api::{HealthResponse, StatusResponse, UsedQuestionsResponse};
use mira_common::Decision;
use owo_colors::OwoColorize;
use std::path::Path;

pub struct DaemonClient {
    base_url: String,
    http: reqwest::Client,
}

impl DaemonClient {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn status(&self) -> Result<()> {
        let health: HealthResponse = self
            .http
            .get(self.url("/api/test"))
            .send()
            .await
            .context("Daemon not reachable")?
            .json()
            .await
            .context("Unexpected health response")?;

        println!("{} {} ({})", "●".green(), health.message, health.time);
        Ok(())
    }

    pub async fn analyze(&self, image: &Path) -> Result<()> {
        let bytes = tokio::fs::read(image)
            .await
            .with_context(|| format!("Failed to read {}", image.display()))?;
        let file_name = image
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("image")
            .to_string();

        let part = reqwest::multipart::Part::bytes(bytes).file_name(file_name);
        let form = reqwest::multipart::Form::new().part("image", part);

        let response = self
            .http
            .post(self.url("/api/analyze"))
            .multipart(form)
            .send()
            .await
            .context("Daemon not reachable")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            bail!("Analysis failed (HTTP {status}): {body}");
        }

        let decision: Decision = response
            .json()
            .await
            .context("Unexpected analysis response")?;

        println!(
            "{} {} ({}, confidence {:.1}%)",
            "Emotion:".bold(),
            decision.classified_emotion,
            decision.category,
            decision.confidence * 100.0
        );
        println!("{} {}", "Next question:".bold(), decision.suggested_question);
        Ok(())
    }

    pub async fn reset(&self) -> Result<()> {
        let ack: StatusResponse = self
            .http
            .post(self.url("/api/reset-interview"))
            .send()
            .await
            .context("Daemon not reachable")?
            .json()
            .await
            .context("Unexpected reset response")?;

        println!("{} {}", "✓".green(), ack.message);
        Ok(())
    }

    pub async fn questions(&self) -> Result<()> {
        let used: UsedQuestionsResponse = self
            .http
            .get(self.url("/api/used-questions"))
            .send()
            .await
            .context("Daemon not reachable")?
            .json()
            .await
            .context("Unexpected used-questions response")?;

        println!("{} questions asked this session", used.count);
        for question in used.questions {
            println!("  - {question}");
        }
        Ok(())
    }
}
