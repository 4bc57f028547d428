use crate::asset::Asset;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use zpl_util::PriceConfig;

const PRICE_REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Deserialize)]
pub struct TickerPrice {
    pub symbol: String,
    pub price: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticker24h {
    pub symbol: String,
    pub price_change_percent: String,
}

// Ticker values are decimal strings.
pub fn parse_ticker_decimal(value: &str) -> Result<f64, String> {
    let parsed = value
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("Invalid ticker value '{}': {}", value, e))?;

    if !parsed.is_finite() {
        return Err(format!("Invalid ticker value '{}'", value));
    }
    Ok(parsed)
}

pub struct PriceClient {
    api_url: String,
    client: Client,
}

impl PriceClient {
    pub fn new(config: &PriceConfig) -> Result<Self, String> {
        let client = Client::builder()
            .timeout(Duration::from_secs(PRICE_REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| {
                let msg = format!("Failed to build HTTP client: {}", e);
                error!("{}", msg);
                msg
            })?;

        Ok(Self {
            api_url: config.api_url().to_string(),
            client,
        })
    }

    pub async fn get_price(&self, asset: Asset) -> Result<f64, String> {
        let ticker: TickerPrice = self.get("v3/ticker/price", asset).await?;
        parse_ticker_decimal(&ticker.price)
    }

    pub async fn get_price_change_percent(&self, asset: Asset) -> Result<f64, String> {
        let ticker: Ticker24h = self.get("v3/ticker/24hr", asset).await?;
        parse_ticker_decimal(&ticker.price_change_percent)
    }

    async fn get<T: for<'de> Deserialize<'de>>(&self, path: &str, asset: Asset) -> Result<T, String> {
        let url = format!("{}/{}", self.api_url, path);
        let symbol = asset.ticker_symbol();

        let resp = self
            .client
            .get(&url)
            .query(&[("symbol", symbol.as_str())])
            .send()
            .await
            .map_err(|e| {
                let msg = format!("Failed to send price request to {}: {}", url, e);
                error!("{}", msg);
                msg
            })?;

        if !resp.status().is_success() {
            let msg = format!(
                "Price request {} for {} failed with status {}",
                url,
                symbol,
                resp.status()
            );
            error!("{}", msg);
            return Err(msg);
        }

        resp.json::<T>().await.map_err(|e| {
            let msg = format!("Failed to parse price response for {}: {}", symbol, e);
            error!("{}", msg);
            msg
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    // Answers each request with the body for the first route found in its request line.
    async fn serve_ticker(routes: Vec<(&'static str, &'static str, &'static str)>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            loop {
                let (mut stream, _) = match listener.accept().await {
                    Ok(conn) => conn,
                    Err(_) => return,
                };

                let mut buf = vec![0u8; 4096];
                let mut len = 0;
                while !buf[..len].windows(4).any(|w| w == b"\r\n\r\n") {
                    match stream.read(&mut buf[len..]).await {
                        Ok(0) | Err(_) => break,
                        Ok(n) => len += n,
                    }
                }

                let request = String::from_utf8_lossy(&buf[..len]);
                let request_line = request.lines().next().unwrap_or_default();
                let (status, body) = routes
                    .iter()
                    .find(|(path, _, _)| request_line.contains(path))
                    .map(|(_, status, body)| (*status, *body))
                    .unwrap_or(("404 Not Found", "{}"));

                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = stream.write_all(response.as_bytes()).await;
                let _ = stream.shutdown().await;
            }
        });

        format!("http://{}", addr)
    }

    #[test]
    fn test_parse_ticker_responses() {
        let ticker: TickerPrice =
            serde_json::from_str(r#"{"symbol":"BTCUSDT","price":"67123.45000000"}"#).unwrap();
        assert_eq!(ticker.symbol, "BTCUSDT");
        assert_eq!(parse_ticker_decimal(&ticker.price).unwrap(), 67123.45);

        let ticker: Ticker24h = serde_json::from_str(
            r#"{"symbol":"LTCUSDT","priceChange":"-1.2","priceChangePercent":"-1.530","lastPrice":"77.1"}"#,
        )
        .unwrap();
        assert_eq!(parse_ticker_decimal(&ticker.price_change_percent).unwrap(), -1.53);
    }

    #[test]
    fn test_parse_ticker_decimal_rejects() {
        assert!(parse_ticker_decimal("").is_err());
        assert!(parse_ticker_decimal("abc").is_err());
        assert!(parse_ticker_decimal("inf").is_err());
        assert!(parse_ticker_decimal("NaN").is_err());
    }

    #[tokio::test]
    async fn test_unreachable_price_api() {
        let config = PriceConfig {
            api_url: "http://127.0.0.1:9".to_string(),
        };
        let client = PriceClient::new(&config).unwrap();
        assert!(client.get_price(Asset::Btc).await.is_err());
    }

    #[tokio::test]
    async fn test_get_price_and_change() {
        let api_url = serve_ticker(vec![
            (
                "/v3/ticker/price?symbol=BTCUSDT",
                "200 OK",
                r#"{"symbol":"BTCUSDT","price":"67123.45000000"}"#,
            ),
            (
                "/v3/ticker/24hr?symbol=BTCUSDT",
                "200 OK",
                r#"{"symbol":"BTCUSDT","priceChange":"-1021.1","priceChangePercent":"-1.498"}"#,
            ),
        ])
        .await;

        let client = PriceClient::new(&PriceConfig { api_url }).unwrap();
        assert_eq!(client.get_price(Asset::Btc).await.unwrap(), 67123.45);
        assert_eq!(
            client.get_price_change_percent(Asset::Btc).await.unwrap(),
            -1.498
        );

        // No route for DOGEUSDT
        assert!(client.get_price(Asset::Doge).await.is_err());
    }

    #[tokio::test]
    async fn test_price_api_error_responses() {
        let api_url = serve_ticker(vec![
            (
                "/v3/ticker/price?symbol=BTCUSDT",
                "429 Too Many Requests",
                r#"{"code":-1003,"msg":"Too many requests"}"#,
            ),
            (
                "/v3/ticker/price?symbol=LTCUSDT",
                "200 OK",
                r#"{"symbol":"LTCUSDT","price":"not a number"}"#,
            ),
            ("/v3/ticker/24hr?symbol=LTCUSDT", "200 OK", r#"{"symbol":"LTCUSDT"}"#),
        ])
        .await;

        let client = PriceClient::new(&PriceConfig { api_url }).unwrap();
        let err = client.get_price(Asset::Btc).await.unwrap_err();
        assert!(err.contains("429"));
        assert!(client.get_price(Asset::Ltc).await.is_err());
        assert!(client.get_price_change_percent(Asset::Ltc).await.is_err());
    }
}
