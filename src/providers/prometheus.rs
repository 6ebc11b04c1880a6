use super::{AlertProvider, ProviderConfig, ProviderError};
use crate::types::{AlertDto, AlertSeverity, AlertStatus};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client as HttpClient, RequestBuilder, StatusCode};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, error, instrument, warn};

/// Source tag stamped on every normalized record.
pub const SOURCE_TYPE: &str = "prometheus";

pub const WEBHOOK_DESCRIPTION: &str = "This provider takes advantage of configurable webhooks \
available with Prometheus Alertmanager. Use the following template to configure AlertManager:";

pub const WEBHOOK_TEMPLATE: &str = r#"route:
  receiver: "alerthub"
  group_by: ['alertname']
  group_wait:      15s
  group_interval:  15s
  repeat_interval: 1m

receivers:
- name: "alerthub"
  webhook_configs:
  - url: '{webhook_api_url}'
    send_resolved: true
    http_config:
      basic_auth:
        username: api_key
        password: {api_key}"#;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Read-only adapter for a Prometheus-compatible monitoring API.
///
/// Covers the two pull paths (`/api/v1/query`, `/api/v1/alerts`) and the
/// normalization of alert events into [`AlertDto`]. Webhook payloads are
/// normalized through [`PrometheusProvider::format_alert`] without a provider
/// instance.
pub struct PrometheusProvider {
    config: ProviderConfig,
    http_client: HttpClient,
}

impl PrometheusProvider {
    pub fn new(config: ProviderConfig) -> Result<Self, ProviderError> {
        Self::with_timeout(config, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(config: ProviderConfig, timeout: Duration) -> Result<Self, ProviderError> {
        if config.url.trim().is_empty() {
            return Err(ProviderError::Config(
                "Prometheus server URL is required".to_string(),
            ));
        }

        let http_client = HttpClient::builder()
            .timeout(timeout)
            .user_agent("AlertHub/1.0")
            .build()?;

        Ok(Self {
            config,
            http_client,
        })
    }

    fn with_auth(&self, request: RequestBuilder) -> RequestBuilder {
        match self.config.basic_auth() {
            Some((user, pass)) => request.basic_auth(user, Some(pass)),
            None => request,
        }
    }

    /// Executes a PromQL expression against `/api/v1/query`.
    #[instrument(skip(self))]
    pub async fn query(&self, expr: &str) -> Result<Value, ProviderError> {
        if expr.is_empty() {
            return Err(ProviderError::InvalidInput(
                "query expression is required".to_string(),
            ));
        }

        let url = format!("{}/api/v1/query", self.config.url);
        let request = self.http_client.get(&url).query(&[("query", expr)]);
        let response = self.with_auth(request).send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            error!("Prometheus query failed with {}: {}", status, body);
            return Err(ProviderError::QueryFailed {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(format!("Failed to decode query response: {}", e)))
    }

    /// Pulls the currently active alerts from `/api/v1/alerts` and normalizes
    /// them. A non-success status degrades to an empty list so a source
    /// outage never takes the polling caller down with it.
    #[instrument(skip(self))]
    pub async fn get_alerts(&self) -> Result<Vec<AlertDto>, ProviderError> {
        let url = format!("{}/api/v1/alerts", self.config.url);
        let response = self.with_auth(self.http_client.get(&url)).send().await?;

        if !response.status().is_success() {
            warn!("Prometheus alert pull returned {}, treating as no alerts", response.status());
            return Ok(Vec::new());
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(format!("Failed to decode alerts response: {}", e)))?;

        let data = body
            .get("data")
            .cloned()
            .unwrap_or_else(|| Value::Object(Map::new()));

        let alerts = Self::format_alert(&data);
        debug!("Normalized {} active alerts", alerts.len());
        Ok(alerts)
    }

    /// Normalizes a raw alert event into zero or more [`AlertDto`] records.
    ///
    /// An event carrying an `alerts` array is a batch and expands to one
    /// record per entry, in order; anything else is treated as a
    /// single-element batch. Missing optional fields fall back to defaults,
    /// so this never fails for object input.
    pub fn format_alert(event: &Value) -> Vec<AlertDto> {
        let batch: Vec<&Value> = match event.get("alerts").and_then(Value::as_array) {
            Some(entries) => entries.iter().collect(),
            None => vec![event],
        };

        let mut alerts = Vec::with_capacity(batch.len());
        for entry in batch {
            match entry.as_object() {
                Some(alert) => alerts.push(Self::format_single(alert)),
                None => warn!("Skipping non-object alert entry: {}", entry),
            }
        }
        alerts
    }

    fn format_single(alert: &Map<String, Value>) -> AlertDto {
        // Snapshot before any key consumption; the caller gets the original
        // sub-event back verbatim.
        let payload = Value::Object(alert.clone());

        let mut labels = lowercase_keys(alert.get("labels"));
        let mut annotations = lowercase_keys(alert.get("annotations"));

        let id = alert
            .get("id")
            .and_then(Value::as_str)
            .map(str::to_owned)
            .or_else(|| {
                labels
                    .get("alertname")
                    .and_then(Value::as_str)
                    .map(str::to_owned)
            });

        // description is consumed; summary stays in the retained annotations.
        let description = annotations
            .remove("description")
            .map(|v| value_to_string(&v))
            .or_else(|| annotations.get("summary").map(value_to_string))
            .or_else(|| id.clone());

        let status = match alert
            .get("state")
            .or_else(|| alert.get("status"))
            .and_then(Value::as_str)
        {
            Some(raw) => AlertStatus::from_source(raw).unwrap_or_else(|| {
                warn!("Unmapped alert status {:?}, defaulting to firing", raw);
                AlertStatus::Firing
            }),
            None => AlertStatus::Firing,
        };

        // severity stays in labels after the lookup
        let severity = match labels.get("severity").and_then(Value::as_str) {
            Some(raw) => AlertSeverity::from_source(raw).unwrap_or_else(|| {
                warn!("Unmapped alert severity {:?}, defaulting to info", raw);
                AlertSeverity::Info
            }),
            None => AlertSeverity::Info,
        };

        let environment = labels
            .remove("environment")
            .map(|v| value_to_string(&v))
            .unwrap_or_else(|| "unknown".to_string());

        let fingerprint = alert
            .get("fingerprint")
            .and_then(Value::as_str)
            .map(str::to_owned);

        let mut service = None;
        let mut message = None;
        let mut url = None;
        {
            let mut promote = |key: &str, value: &Value| {
                let slot = match key {
                    "service" => &mut service,
                    "message" => &mut message,
                    "url" => &mut url,
                    _ => return,
                };
                if slot.is_none() {
                    *slot = Some(value_to_string(value));
                }
            };

            // Leftover top-level keys first, then labels back-fill whatever
            // is still unset. Keys with no matching field only survive
            // inside the payload.
            for (key, value) in alert {
                if matches!(
                    key.as_str(),
                    "id" | "labels" | "annotations" | "status" | "state" | "fingerprint"
                ) {
                    continue;
                }
                promote(key.as_str(), value);
            }
            for (key, value) in &labels {
                promote(key.as_str(), value);
            }
        }

        AlertDto {
            name: id.clone(),
            id,
            description,
            status,
            severity,
            last_received: Utc::now(),
            environment,
            source: vec![SOURCE_TYPE.to_string()],
            labels,
            annotations,
            fingerprint,
            payload,
            service,
            message,
            url,
        }
    }
}

#[async_trait]
impl AlertProvider for PrometheusProvider {
    async fn query(&self, expr: &str) -> Result<Value, ProviderError> {
        PrometheusProvider::query(self, expr).await
    }

    async fn get_alerts(&self) -> Result<Vec<AlertDto>, ProviderError> {
        PrometheusProvider::get_alerts(self).await
    }

    fn name(&self) -> &'static str {
        SOURCE_TYPE
    }
}

fn lowercase_keys(value: Option<&Value>) -> HashMap<String, Value> {
    value
        .and_then(Value::as_object)
        .map(|map| {
            map.iter()
                .map(|(k, v)| (k.to_lowercase(), v.clone()))
                .collect()
        })
        .unwrap_or_default()
}

fn value_to_string(value: &Value) -> String {
    match value.as_str() {
        Some(s) => s.to_owned(),
        None => value.to_string(),
    }
}
