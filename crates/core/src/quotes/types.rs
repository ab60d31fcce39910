use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteEnvelope {
    pub quote_response: QuoteResponse,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuoteResponse {
    #[serde(default)]
    pub result: Vec<QuoteResult>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResult {
    /// Kept as raw JSON: a non-numeric value means "no price", not a parse failure.
    #[serde(default)]
    pub regular_market_price: Option<Value>,
}

impl QuoteResult {
    pub fn price(&self) -> Option<f64> {
        self.regular_market_price.as_ref().and_then(Value::as_f64)
    }
}

impl QuoteEnvelope {
    pub fn first_result(&self) -> Option<&QuoteResult> {
        self.quote_response.result.first()
    }
}
