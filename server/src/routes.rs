//! Exchange routes.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use exchange_common::{CurrencyInfo, ExchangeError};
use exchange_fx::{ConversionRequest, ConversionResult};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info, warn};

use crate::AppState;

/// Creates the exchange routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/rate", get(get_rate))
        .route("/convert", post(convert))
        .route("/currencies", get(list_currencies))
        .route("/health", get(health))
}

/// Query parameters for a rate lookup.
#[derive(Debug, Deserialize)]
pub struct RateQuery {
    /// Base currency code.
    #[serde(default = "default_base")]
    pub base: String,
    /// Single target; every quoted currency when absent.
    pub target: Option<String>,
}

fn default_base() -> String {
    "USD".to_string()
}

/// Maps engine errors onto HTTP responses.
pub struct ApiError(ExchangeError);

impl From<ExchangeError> for ApiError {
    fn from(err: ExchangeError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = if self.0.is_client_error() {
            warn!(error = %self.0, "Rejected request");
            StatusCode::BAD_REQUEST
        } else {
            error!(error = %self.0, "Request failed");
            StatusCode::INTERNAL_SERVER_ERROR
        };

        let body = json!({
            "error": self.0.error_code(),
            "message": self.0.to_string(),
        });
        (status, Json(body)).into_response()
    }
}

/// GET `/rate` - Rate of one or every currency against a base.
async fn get_rate(
    State(state): State<AppState>,
    Query(query): Query<RateQuery>,
) -> Result<Json<ConversionResult>, ApiError> {
    info!(base = %query.base, target = ?query.target, "Received rate request");

    let result = state
        .engine
        .rate_lookup(&query.base, query.target.as_deref())
        .await?;
    Ok(Json(result))
}

/// POST `/convert` - Convert an amount into several currencies.
async fn convert(
    State(state): State<AppState>,
    Json(request): Json<ConversionRequest>,
) -> Result<Json<ConversionResult>, ApiError> {
    info!(
        base = %request.base,
        amount = %request.amount,
        targets = ?request.targets,
        "Received conversion request"
    );

    let result = state.engine.convert(&request).await?;
    Ok(Json(result))
}

/// GET `/currencies` - Supported currencies.
async fn list_currencies(State(state): State<AppState>) -> Json<Vec<CurrencyInfo>> {
    Json(state.engine.currencies())
}

/// GET `/health` - Liveness and cache state.
async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "provider": state.engine.cache().provider_name(),
        "cache": state.engine.stats(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header::CONTENT_TYPE, Request};
    use exchange_fx::{ExchangeEngine, ExchangeEngineConfig, MockQuoteProvider, RawQuotes};
    use http_body_util::BodyExt;
    use rust_decimal_macros::dec;
    use serde_json::Value;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn sample_quotes() -> RawQuotes {
        RawQuotes::new(
            "USD",
            [
                ("USDAUD", dec!(1.569095)),
                ("USDINR", dec!(83.979299)),
                ("USDBMD", dec!(1)),
                ("USDAZN", dec!(1.702996)),
            ],
        )
    }

    fn create_app(provider: Arc<MockQuoteProvider>) -> Router {
        let engine = ExchangeEngine::new(provider, ExchangeEngineConfig::default());
        crate::create_router(AppState::new(engine))
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_get_rate_single_target() {
        let app = create_app(Arc::new(MockQuoteProvider::new(sample_quotes())));

        let (status, body) = send(app, get("/rate?base=USD&target=AUD")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["sourceCurrency"], "USD");
        assert_eq!(body["amount"], "1");
        assert_eq!(body["lines"][0]["targetCode"], "AUD");
        assert_eq!(body["lines"][0]["convertedAmount"], "1.569095");
    }

    #[tokio::test]
    async fn test_get_rate_defaults_to_usd() {
        let app = create_app(Arc::new(MockQuoteProvider::new(sample_quotes())));

        let (status, body) = send(app, get("/rate")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["sourceCurrency"], "USD");
        let codes: Vec<&str> = body["lines"]
            .as_array()
            .unwrap()
            .iter()
            .map(|line| line["targetCode"].as_str().unwrap())
            .collect();
        assert_eq!(codes, vec!["AUD", "AZN", "BMD", "INR"]);
    }

    #[tokio::test]
    async fn test_get_rate_unknown_currency_is_bad_request() {
        let provider = Arc::new(MockQuoteProvider::new(sample_quotes()));
        let app = create_app(provider.clone());

        let (status, body) = send(app, get("/rate?base=USD&target=LKS")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "UNKNOWN_CURRENCY");
        assert_eq!(body["message"], "Invalid Currency : LKS");
        assert_eq!(provider.fetch_count(), 0);
    }

    #[tokio::test]
    async fn test_provider_failure_is_server_error() {
        let provider = Arc::new(MockQuoteProvider::with_response(Err(
            ExchangeError::ProviderUnavailable("connection refused".to_string()),
        )));
        let app = create_app(provider);

        let (status, body) = send(app, get("/rate?base=INR")).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "PROVIDER_UNAVAILABLE");
    }

    #[tokio::test]
    async fn test_convert_with_partial_invalid_targets() {
        let app = create_app(Arc::new(MockQuoteProvider::new(sample_quotes())));

        let (status, body) = send(
            app,
            post_json(
                "/convert",
                r#"{"base":"INR","amount":100,"targets":["USD","XLM","AUD"]}"#,
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["amount"], "100");
        assert_eq!(body["lines"][0]["convertedAmount"], "1.190800");
        assert_eq!(body["lines"][1]["targetCode"], "XLM");
        assert_eq!(body["lines"][1]["targetDisplayName"], "Invalid Currency");
        assert!(body["lines"][1].get("convertedAmount").is_none());
        assert_eq!(body["lines"][2]["convertedAmount"], "1.868400");
    }

    #[tokio::test]
    async fn test_convert_all_invalid_targets_is_bad_request() {
        let app = create_app(Arc::new(MockQuoteProvider::new(sample_quotes())));

        let (status, body) = send(
            app,
            post_json(
                "/convert",
                r#"{"base":"USD","amount":"100","targets":["XLM","SSD","MND"]}"#,
            ),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["message"],
            "Invalid Currency : [XLM, SSD, MND]. Please enter at least one valid currency"
        );
    }

    #[tokio::test]
    async fn test_convert_malformed_body_rejected() {
        let app = create_app(Arc::new(MockQuoteProvider::new(sample_quotes())));

        let (status, _) = send(app, post_json("/convert", r#"{"base":"USD"}"#)).await;

        assert!(status.is_client_error());
    }

    #[tokio::test]
    async fn test_list_currencies() {
        let app = create_app(Arc::new(MockQuoteProvider::new(sample_quotes())));

        let (status, body) = send(app, get("/currencies")).await;

        assert_eq!(status, StatusCode::OK);
        let currencies = body.as_array().unwrap();
        assert_eq!(currencies.len(), exchange_common::Currency::SUPPORTED.len());
        assert_eq!(currencies[0]["code"], "AED");
        assert_eq!(currencies[0]["displayName"], "United Arab Emirates Dirham");
    }

    #[tokio::test]
    async fn test_health_reports_cache() {
        let provider = Arc::new(MockQuoteProvider::new(sample_quotes()));
        let engine = ExchangeEngine::new(provider, ExchangeEngineConfig::default());
        engine.rate_lookup("USD", None).await.unwrap();
        let app = crate::create_router(AppState::new(engine));

        let (status, body) = send(app, get("/health")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["provider"], "MOCK");
        assert_eq!(body["cache"]["fetches"], 1);
        assert!(body["cache"]["fetchedAt"].is_string());
    }
}
