use crate::config::ServiceConfig;
use crate::error::EvalError;
use crate::models::{EvaluationReport, EvaluationRequest};
use log::debug;
use serde_json::Value;

/// Client for the remote evaluation endpoint.
///
/// One attempt per invocation, no retries; a retry policy, if wanted, is the
/// caller's responsibility. The only bound on the call is the configured
/// timeout, which is long enough for the backend's full generation plus
/// judgment cycle.
pub struct EvaluationClient {
    http: reqwest::Client,
    endpoint: String,
    openai_key: Option<String>,
    google_key: Option<String>,
}

impl EvaluationClient {
    /// Build a client from service settings.
    pub fn new(config: &ServiceConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
            openai_key: config.openai_api_key.clone(),
            google_key: config.google_api_key.clone(),
        })
    }

    /// Send one evaluation request and decode the verdict.
    /// Returns the typed report together with the unmodified response body.
    pub async fn evaluate(
        &self,
        request: &EvaluationRequest,
    ) -> Result<(EvaluationReport, Value), EvalError> {
        let raw = self.fetch(request).await?;
        let report = EvaluationReport::from_value(&raw)?;
        Ok((report, raw))
    }

    /// Issue the POST and decode the body as JSON, without typed mapping.
    async fn fetch(&self, request: &EvaluationRequest) -> Result<Value, EvalError> {
        debug!("POST {} (model {})", self.endpoint, request.model_name);

        let mut call = self.http.post(&self.endpoint).json(request);
        if let Some(key) = &self.openai_key {
            call = call.header("X-OpenAI-Key", key);
        }
        if let Some(key) = &self.google_key {
            call = call.header("X-Google-Key", key);
        }

        let response = call
            .send()
            .await
            .map_err(|e| EvalError::TransportError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            // The failure body is opaque; pass it through verbatim.
            let body = response.text().await.unwrap_or_default();
            return Err(EvalError::ApiError {
                status: status.as_u16(),
                body,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| EvalError::TransportError(e.to_string()))?;

        serde_json::from_str(&body)
            .map_err(|e| EvalError::MalformedResponse(format!("response body is not JSON: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EvaluationConfig, Provider};
    use serde_json::json;

    fn test_request() -> EvaluationRequest {
        let config = EvaluationConfig::new(Provider::OpenAI, "gpt-4o-mini".to_string()).unwrap();
        EvaluationRequest::build(json!({"messages": []}), json!({"items": []}), &config)
    }

    fn test_client(endpoint: String) -> EvaluationClient {
        EvaluationClient::new(&ServiceConfig {
            endpoint,
            timeout_secs: 5,
            openai_api_key: None,
            google_api_key: None,
        })
        .unwrap()
    }

    fn success_body() -> String {
        json!({
            "relevance_score": 8,
            "completeness_score": 7,
            "accuracy_score": 9,
            "generated_response": "The answer is 42.",
            "prompt_used": "Answer using the context.",
            "latency_ms": 1500.25,
            "cost_usd": 0.0042,
            "hallucinations": ["claim x"],
            "retrieved_context": [
                {"text": "passage", "source_url": "https://example.com", "similarity_score": 0.97}
            ],
            "explanations": {"context_relevance": "well grounded"}
        })
        .to_string()
    }

    #[tokio::test]
    async fn test_evaluate_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/evaluate")
            .match_header("content-type", "application/json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(success_body())
            .create_async()
            .await;

        let client = test_client(format!("{}/evaluate", server.url()));
        let (report, raw) = client.evaluate(&test_request()).await.unwrap();

        assert_eq!(report.relevance_score, 8.0);
        assert_eq!(report.hallucinations, vec!["claim x".to_string()]);
        assert_eq!(report.retrieved_context[0].similarity_score, 0.97);
        assert_eq!(raw["generated_response"], "The answer is 42.");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_request_body_matches_contract() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/evaluate")
            .match_body(mockito::Matcher::Json(json!({
                "conversation": {"messages": []},
                "context_vectors": {"items": []},
                "model_type": "openai",
                "model_name": "gpt-4o-mini"
            })))
            .with_status(200)
            .with_body(success_body())
            .create_async()
            .await;

        let client = test_client(format!("{}/evaluate", server.url()));
        client.evaluate(&test_request()).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_key_overrides_forwarded_as_headers() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/evaluate")
            .match_header("x-openai-key", "sk-override")
            .match_header("x-google-key", "g-override")
            .with_status(200)
            .with_body(success_body())
            .create_async()
            .await;

        let client = EvaluationClient::new(&ServiceConfig {
            endpoint: format!("{}/evaluate", server.url()),
            timeout_secs: 5,
            openai_api_key: Some("sk-override".to_string()),
            google_api_key: Some("g-override".to_string()),
        })
        .unwrap();

        client.evaluate(&test_request()).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_non_success_status_is_api_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/evaluate")
            .with_status(500)
            .with_body("internal error")
            .create_async()
            .await;

        let client = test_client(format!("{}/evaluate", server.url()));
        let err = client.evaluate(&test_request()).await.unwrap_err();

        match err {
            EvalError::ApiError { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "internal error");
            }
            other => panic!("expected ApiError, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unparseable_error_body_passed_verbatim() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/evaluate")
            .with_status(422)
            .with_body("<html>not json</html>")
            .create_async()
            .await;

        let client = test_client(format!("{}/evaluate", server.url()));
        let err = client.evaluate(&test_request()).await.unwrap_err();
        assert!(err.to_string().contains("<html>not json</html>"));
    }

    #[tokio::test]
    async fn test_missing_field_is_malformed_response() {
        let mut server = mockito::Server::new_async().await;
        let mut body: Value = serde_json::from_str(&success_body()).unwrap();
        body.as_object_mut().unwrap().remove("latency_ms");

        server
            .mock("POST", "/evaluate")
            .with_status(200)
            .with_body(body.to_string())
            .create_async()
            .await;

        let client = test_client(format!("{}/evaluate", server.url()));
        let err = client.evaluate(&test_request()).await.unwrap_err();

        match err {
            EvalError::MalformedResponse(detail) => {
                assert_eq!(detail, "missing field `latency_ms`");
            }
            other => panic!("expected MalformedResponse, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_non_json_success_body_is_malformed_response() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/evaluate")
            .with_status(200)
            .with_body("plain text")
            .create_async()
            .await;

        let client = test_client(format!("{}/evaluate", server.url()));
        let err = client.evaluate(&test_request()).await.unwrap_err();
        assert!(matches!(err, EvalError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        // Nothing listens on port 1.
        let client = test_client("http://127.0.0.1:1/evaluate".to_string());
        let err = client.evaluate(&test_request()).await.unwrap_err();
        assert!(matches!(err, EvalError::TransportError(_)));
    }

    #[tokio::test]
    async fn test_timeout_is_transport_error() {
        // A socket that accepts the connection but never answers the
        // request, so the client's own timeout has to fire.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let endpoint = format!("http://{}/evaluate", listener.local_addr().unwrap());

        let client = EvaluationClient::new(&ServiceConfig {
            endpoint,
            timeout_secs: 1,
            openai_api_key: None,
            google_api_key: None,
        })
        .unwrap();

        let err = client.evaluate(&test_request()).await.unwrap_err();
        assert!(matches!(err, EvalError::TransportError(_)));
        drop(listener);
    }
}
