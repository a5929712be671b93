//! HTTP implementation of the record service.

use async_trait::async_trait;
use chrono::NaiveDate;
use glow_data::{DayField, FieldValue, FlatEntry};
use reqwest::Client;
use serde::Serialize;

use crate::config::SyncConfig;
use crate::service::{RecordService, ServiceError};

/// [`RecordService`] over the Glow HTTP API.
///
/// Routes are per-user: `GET /moods/{user}/year/{year}` returns the
/// year feed, `POST /moods/{user}/update` accepts a single-field edit.
pub struct HttpRecordService {
    client: Client,
    base_url: String,
}

impl HttpRecordService {
    /// Build a client with the configured timeout. The base URL is
    /// stored without a trailing slash.
    pub fn new(config: &SyncConfig) -> Result<Self, ServiceError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn year_url(&self, user: &str, year: i32) -> String {
        format!("{}/moods/{}/year/{}", self.base_url, encode_segment(user), year)
    }

    fn update_url(&self, user: &str) -> String {
        format!("{}/moods/{}/update", self.base_url, encode_segment(user))
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, ServiceError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let code = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            Err(ServiceError::Status { code, body })
        }
    }
}

#[async_trait]
impl RecordService for HttpRecordService {
    async fn fetch_year(&self, user: &str, year: i32) -> Result<Vec<FlatEntry>, ServiceError> {
        let response = self.client.get(self.year_url(user, year)).send().await?;
        let response = Self::check(response).await?;
        response
            .json()
            .await
            .map_err(|err| ServiceError::Decode(err.to_string()))
    }

    async fn push_field_update(
        &self,
        user: &str,
        date: NaiveDate,
        field: DayField,
        value: &FieldValue,
    ) -> Result<(), ServiceError> {
        #[derive(Serialize)]
        struct UpdateRequest<'a> {
            date: NaiveDate,
            field: &'a str,
            value: &'a FieldValue,
        }

        let request = UpdateRequest {
            date,
            field: field.as_str(),
            value,
        };

        let response = self
            .client
            .post(self.update_url(user))
            .json(&request)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }
}

/// Percent-encode one path segment, so user names with reserved
/// characters stay a single segment.
fn encode_segment(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '-' | '_' | '.' | '~' => out.push(c),
            _ => {
                for byte in c.to_string().as_bytes() {
                    out.push_str(&format!("%{byte:02X}"));
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(base_url: &str) -> HttpRecordService {
        HttpRecordService::new(&SyncConfig {
            base_url: base_url.to_string(),
            ..SyncConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_encode_segment() {
        assert_eq!(encode_segment("ada"), "ada");
        assert_eq!(encode_segment("ada lovelace"), "ada%20lovelace");
        assert_eq!(encode_segment("a/b"), "a%2Fb");
    }

    #[test]
    fn test_route_construction() {
        let service = service("https://glow.example.com/");
        assert_eq!(
            service.year_url("ada", 2025),
            "https://glow.example.com/moods/ada/year/2025"
        );
        assert_eq!(
            service.update_url("ada lovelace"),
            "https://glow.example.com/moods/ada%20lovelace/update"
        );
    }

    #[test]
    fn test_update_body_shape() {
        let request = serde_json::json!({
            "date": NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
            "field": DayField::SleepHours.as_str(),
            "value": FieldValue::Hours(7.5),
        });
        assert_eq!(
            request.to_string(),
            r#"{"date":"2025-03-14","field":"sleep","value":7.5}"#
        );
    }
}
