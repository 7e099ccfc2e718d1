/// LightX text-to-image provider
///
/// Image generation is an asynchronous job on LightX's side:
/// 1. Submit: /v1/text2image → returns an order ID, retry budget and average render time
/// 2. Poll: /v1/order-status → `init` while rendering, then `active` with an output URL or `failed`
/// 3. Download the output URL
use crate::{
    config::Config,
    error::{AppError, AppResult},
    services::providers::{ImageProvider, ProviderError},
};
use reqwest::Client as HttpClient;
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::json;
use std::time::Duration;

#[derive(Clone)]
pub struct LightxClient {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    /// Overrides the provider's suggested wait between status polls
    poll_interval: Option<Duration>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Envelope<T> {
    #[serde(default)]
    message: Option<String>,
    body: Option<T>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Order {
    order_id: String,
    max_retries_allowed: u32,
    #[serde(default)]
    avg_response_time_in_sec: u64,
}

#[derive(Debug, Deserialize)]
struct OrderStatus {
    status: String,
    #[serde(default)]
    output: Option<String>,
}

impl LightxClient {
    pub fn new(api_key: String, api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            poll_interval: None,
        }
    }

    /// Creates a client from configuration, failing if no API key is set
    pub fn from_config(config: &Config) -> AppResult<Self> {
        let api_key = config
            .lightx_api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or(AppError::MissingCredential("LIGHTX_API_KEY"))?;

        Ok(Self::new(api_key, config.lightx_api_url.clone()))
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = Some(interval);
        self
    }

    async fn post<T: DeserializeOwned>(&self, path: &str, body: serde_json::Value) -> AppResult<T> {
        let url = format!("{}{}", self.api_url, path);

        let response = self
            .http_client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body,
            }
            .into());
        }

        let envelope: Envelope<T> = response.json().await?;
        envelope.body.ok_or_else(|| {
            let message = envelope.message.unwrap_or_else(|| "missing body".to_string());
            ProviderError::InvalidResponse(format!("LightX {}: {}", path, message)).into()
        })
    }

    async fn submit(&self, prompt: &str) -> AppResult<Order> {
        let order: Order = self
            .post("/v1/text2image", json!({ "textPrompt": prompt }))
            .await?;

        tracing::info!(
            order_id = %order.order_id,
            max_retries = order.max_retries_allowed,
            avg_response_secs = order.avg_response_time_in_sec,
            provider = "lightx",
            "Image order submitted"
        );

        Ok(order)
    }

    async fn order_status(&self, order_id: &str) -> AppResult<OrderStatus> {
        self.post("/v1/order-status", json!({ "orderId": order_id }))
            .await
    }

    async fn download(&self, url: &str) -> AppResult<Vec<u8>> {
        let response = self.http_client.get(url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body,
            }
            .into());
        }

        Ok(response.bytes().await?.to_vec())
    }
}

#[async_trait::async_trait]
impl ImageProvider for LightxClient {
    async fn generate(&self, prompt: &str) -> AppResult<Vec<u8>> {
        let order = self.submit(prompt).await?;
        let interval = self
            .poll_interval
            .unwrap_or_else(|| Duration::from_secs(order.avg_response_time_in_sec));

        for attempt in 1..=order.max_retries_allowed {
            tokio::time::sleep(interval).await;

            let status = self.order_status(&order.order_id).await?;
            match status.status.as_str() {
                "active" => {
                    let output = status.output.ok_or_else(|| {
                        ProviderError::InvalidResponse("active order without output".to_string())
                    })?;
                    let bytes = self.download(&output).await?;

                    tracing::info!(
                        order_id = %order.order_id,
                        attempt,
                        bytes = bytes.len(),
                        "Image downloaded"
                    );

                    return Ok(bytes);
                }
                "failed" => {
                    tracing::warn!(order_id = %order.order_id, attempt, "Image order failed");
                    return Err(AppError::GenerationFailed(order.order_id));
                }
                other => {
                    tracing::debug!(
                        order_id = %order.order_id,
                        attempt,
                        status = %other,
                        "Image still rendering"
                    );
                }
            }
        }

        Err(AppError::GenerationTimeout {
            order_id: order.order_id,
            attempts: order.max_retries_allowed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn mock_submit(server: &mut mockito::ServerGuard, max_retries: u32) -> mockito::Mock {
        server
            .mock("POST", "/v1/text2image")
            .match_header("x-api-key", "test_key")
            .match_body(mockito::Matcher::PartialJson(json!({
                "textPrompt": "a poster"
            })))
            .with_status(200)
            .with_body(
                json!({
                    "statusCode": 2000,
                    "message": "SUCCESS",
                    "body": {
                        "orderId": "order-42",
                        "maxRetriesAllowed": max_retries,
                        "avgResponseTimeInSec": 15,
                        "status": "init"
                    }
                })
                .to_string(),
            )
            .create_async()
            .await
    }

    fn mock_status(
        server: &mut mockito::ServerGuard,
        status: &str,
        output: Option<String>,
    ) -> mockito::Mock {
        server
            .mock("POST", "/v1/order-status")
            .match_body(mockito::Matcher::PartialJson(json!({ "orderId": "order-42" })))
            .with_status(200)
            .with_body(
                json!({
                    "statusCode": 2000,
                    "message": "SUCCESS",
                    "body": { "orderId": "order-42", "status": status, "output": output }
                })
                .to_string(),
            )
    }

    fn create_test_client(server: &mockito::ServerGuard) -> LightxClient {
        LightxClient::new("test_key".to_string(), server.url()).with_poll_interval(Duration::ZERO)
    }

    #[test]
    fn test_from_config_requires_api_key() {
        let config = Config::from_pairs(Vec::new()).unwrap();
        assert!(matches!(
            LightxClient::from_config(&config),
            Err(AppError::MissingCredential("LIGHTX_API_KEY"))
        ));
    }

    #[tokio::test]
    async fn test_generate_downloads_output_when_active() {
        let mut server = mockito::Server::new_async().await;
        let _submit = mock_submit(&mut server, 3).await;
        let output = format!("{}/images/order-42.jpg", server.url());
        let _status = mock_status(&mut server, "active", Some(output))
            .create_async()
            .await;
        let _download = server
            .mock("GET", "/images/order-42.jpg")
            .with_status(200)
            .with_body(vec![0xff, 0xd8, 0xff])
            .create_async()
            .await;

        let client = create_test_client(&server);
        let bytes = client.generate("a poster").await.unwrap();

        assert_eq!(bytes, vec![0xff, 0xd8, 0xff]);
    }

    #[tokio::test]
    async fn test_generate_reports_failed_order() {
        let mut server = mockito::Server::new_async().await;
        let _submit = mock_submit(&mut server, 3).await;
        let _status = mock_status(&mut server, "failed", None)
            .create_async()
            .await;

        let client = create_test_client(&server);
        let result = client.generate("a poster").await;

        assert!(matches!(result, Err(AppError::GenerationFailed(id)) if id == "order-42"));
    }

    #[tokio::test]
    async fn test_generate_times_out_after_retry_budget() {
        let mut server = mockito::Server::new_async().await;
        let _submit = mock_submit(&mut server, 2).await;
        let status = mock_status(&mut server, "init", None)
            .expect(2)
            .create_async()
            .await;

        let client = create_test_client(&server);
        let result = client.generate("a poster").await;

        match result {
            Err(AppError::GenerationTimeout { order_id, attempts }) => {
                assert_eq!(order_id, "order-42");
                assert_eq!(attempts, 2);
            }
            other => panic!("expected timeout, got {:?}", other),
        }
        status.assert_async().await;
    }

    #[tokio::test]
    async fn test_submit_without_body_is_invalid() {
        let mut server = mockito::Server::new_async().await;
        let _submit = server
            .mock("POST", "/v1/text2image")
            .with_status(200)
            .with_body(r#"{"statusCode": 5041, "message": "API_KEY_INVALID", "body": null}"#)
            .create_async()
            .await;

        let client = create_test_client(&server);
        let result = client.generate("a poster").await;

        assert!(matches!(
            result,
            Err(AppError::Provider(ProviderError::InvalidResponse(msg))) if msg.contains("API_KEY_INVALID")
        ));
    }
}
