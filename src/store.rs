use crate::http::build_client;
use crate::models::{GenerationRequest, Provenance};
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use urlencoding::encode;
use uuid::Uuid;

const TABLE: &str = "generated_descriptions";

/// REST client for the description history table. The schema lives with the
/// hosting project; this client only inserts, pages, and deletes rows.
#[derive(Debug, Clone)]
pub struct DescriptionStore {
    base_url: String,
    service_key: String,
    http: Client,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("request failed: {0}")]
    Request(String),
    #[error("invalid response: {0}")]
    Deserialize(String),
    #[error("record not found")]
    NotFound,
}

/// Row to insert: the finished description plus the request fields it was
/// generated from, echoed so the history view can show them back.
#[derive(Debug, Clone, Serialize)]
pub struct NewDescription {
    pub user_id: String,
    pub product_name: String,
    pub product_type: Option<String>,
    pub target_audience: Option<String>,
    pub features: Option<String>,
    pub tone: Option<String>,
    pub description: String,
    pub source: String,
}

impl NewDescription {
    pub fn from_result(
        user_id: &str,
        request: &GenerationRequest,
        description: &str,
        source: &Provenance,
    ) -> Self {
        Self {
            user_id: user_id.to_string(),
            product_name: request.product_name.clone(),
            product_type: request.product_type.clone(),
            target_audience: request.target_audience.clone(),
            features: request.features.clone(),
            tone: request.tone.clone(),
            description: description.to_string(),
            source: source.as_str().to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredDescription {
    pub id: Uuid,
    pub user_id: String,
    pub product_name: String,
    pub product_type: Option<String>,
    pub target_audience: Option<String>,
    pub features: Option<String>,
    pub tone: Option<String>,
    pub description: String,
    pub source: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DescriptionPage {
    pub descriptions: Vec<StoredDescription>,
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u64,
}

impl DescriptionStore {
    pub fn from_env() -> Option<Self> {
        let base_url = std::env::var("SUPABASE_URL").ok()?;
        let service_key = std::env::var("SUPABASE_SERVICE_ROLE_KEY")
            .or_else(|_| std::env::var("SUPABASE_SERVICE_KEY"))
            .or_else(|_| std::env::var("SUPABASE_KEY"))
            .ok()?;
        Some(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            service_key,
            http: build_client(),
        })
    }

    pub async fn insert(&self, record: &NewDescription) -> Result<StoredDescription, StoreError> {
        let url = format!("{}/rest/v1/{TABLE}", self.base_url);
        let response = self
            .http
            .post(url)
            .header("apikey", &self.service_key)
            .header("Authorization", format!("Bearer {}", self.service_key))
            .header("Prefer", "return=representation")
            .json(record)
            .send()
            .await
            .map_err(|err| StoreError::Request(err.to_string()))?;

        if !response.status().is_success() {
            return Err(StoreError::Request(format!("HTTP {}", response.status())));
        }

        let mut rows: Vec<StoredDescription> = response
            .json()
            .await
            .map_err(|err| StoreError::Deserialize(err.to_string()))?;
        rows.pop()
            .ok_or_else(|| StoreError::Deserialize("empty insert response".into()))
    }

    /// Page through one user's history, newest first. `page` is 1-based.
    pub async fn list(
        &self,
        user_id: &str,
        page: u32,
        limit: u32,
    ) -> Result<DescriptionPage, StoreError> {
        let page = page.max(1);
        let limit = limit.clamp(1, 100);
        let offset = u64::from(page - 1) * u64::from(limit);
        let url = format!(
            "{}/rest/v1/{TABLE}?user_id=eq.{}&select=*&order=created_at.desc&limit={}&offset={}",
            self.base_url,
            encode(user_id),
            limit,
            offset
        );
        let response = self
            .http
            .get(url)
            .header("apikey", &self.service_key)
            .header("Authorization", format!("Bearer {}", self.service_key))
            .header("Prefer", "count=exact")
            .send()
            .await
            .map_err(|err| StoreError::Request(err.to_string()))?;

        if !response.status().is_success() {
            return Err(StoreError::Request(format!("HTTP {}", response.status())));
        }

        let total_header = response
            .headers()
            .get("content-range")
            .and_then(|value| value.to_str().ok())
            .and_then(parse_content_range_total);

        let rows: Vec<StoredDescription> = response
            .json()
            .await
            .map_err(|err| StoreError::Deserialize(err.to_string()))?;

        let total = total_header.unwrap_or(rows.len() as u64);
        Ok(DescriptionPage {
            descriptions: rows,
            page,
            limit,
            total,
            total_pages: total.div_ceil(u64::from(limit)),
        })
    }

    /// Delete one record, scoped to its owner. `NotFound` covers both a
    /// missing id and an id owned by someone else.
    pub async fn delete(&self, user_id: &str, id: Uuid) -> Result<(), StoreError> {
        let url = format!(
            "{}/rest/v1/{TABLE}?id=eq.{}&user_id=eq.{}",
            self.base_url,
            id,
            encode(user_id)
        );
        let response = self
            .http
            .delete(url)
            .header("apikey", &self.service_key)
            .header("Authorization", format!("Bearer {}", self.service_key))
            .header("Prefer", "return=representation")
            .send()
            .await
            .map_err(|err| StoreError::Request(err.to_string()))?;

        if !response.status().is_success() {
            return Err(StoreError::Request(format!("HTTP {}", response.status())));
        }

        let rows: Vec<StoredDescription> = response
            .json()
            .await
            .map_err(|err| StoreError::Deserialize(err.to_string()))?;
        if rows.is_empty() {
            Err(StoreError::NotFound)
        } else {
            Ok(())
        }
    }
}

/// Total row count from a PostgREST `Content-Range` header, e.g. `0-9/57`.
fn parse_content_range_total(value: &str) -> Option<u64> {
    value.rsplit('/').next()?.trim().parse().ok()
}
