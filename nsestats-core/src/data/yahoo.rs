//! Yahoo Finance data provider.
//!
//! Fetches OHLCV bars from Yahoo's v8 chart API, one request per symbol, and
//! aligns the per-symbol results into a single [`PriceTable`]. There are no
//! retries: any transport failure, timeout or unexpected status aborts the
//! batch. A symbol Yahoo does not know is left out of the table.
//!
//! Yahoo Finance has no official API and is subject to unannounced format changes.

use super::align::{align_series, SymbolSeries};
use super::provider::{DataError, FetchRequest, MarketDataProvider};
use super::table::PriceTable;
use crate::domain::PriceField;
use chrono::DateTime;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

const CHART_BASE_URL: &str = "https://query2.finance.yahoo.com/v8/finance/chart";

/// Yahoo Finance v8 chart API response.
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    meta: Option<ChartMeta>,
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct ChartMeta {
    gmtoffset: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
    adjclose: Option<Vec<AdjCloseData>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct QuoteData {
    open: Vec<Option<f64>>,
    high: Vec<Option<f64>>,
    low: Vec<Option<f64>>,
    close: Vec<Option<f64>>,
    volume: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct AdjCloseData {
    adjclose: Vec<Option<f64>>,
}

/// Yahoo Finance data provider.
pub struct YahooProvider {
    client: reqwest::blocking::Client,
    base_url: String,
    timeout: Duration,
}

impl YahooProvider {
    /// Build a provider whose requests are each bounded by `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, DataError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()
            .map_err(|e| DataError::Client(e.to_string()))?;

        Ok(Self {
            client,
            base_url: CHART_BASE_URL.to_string(),
            timeout,
        })
    }

    /// Point the provider at a different chart endpoint.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn chart_url(&self, symbol: &str) -> String {
        format!("{}/{symbol}", self.base_url.trim_end_matches('/'))
    }

    /// Parse the chart API response. `Ok(None)` means Yahoo has no bars for the symbol.
    fn parse_response(
        symbol: &str,
        request: FetchRequest,
        resp: ChartResponse,
    ) -> Result<Option<SymbolSeries>, DataError> {
        let Some(result) = resp.chart.result else {
            return match resp.chart.error {
                Some(err) if err.code == "Not Found" => Ok(None),
                Some(err) => Err(DataError::ResponseFormatChanged(format!(
                    "{}: {}",
                    err.code, err.description
                ))),
                None => Err(DataError::ResponseFormatChanged(
                    "empty result with no error".into(),
                )),
            };
        };

        let Some(data) = result.into_iter().next() else {
            return Ok(None);
        };

        // No timestamps means no bars in the requested range.
        let Some(timestamps) = data.timestamp else {
            return Ok(None);
        };

        let quote = data
            .indicators
            .quote
            .into_iter()
            .next()
            .ok_or_else(|| DataError::ResponseFormatChanged("no quote data".into()))?;

        let adj_closes = data
            .indicators
            .adjclose
            .and_then(|v| v.into_iter().next())
            .map(|a| a.adjclose);

        let gmt_offset = data.meta.and_then(|m| m.gmtoffset).unwrap_or(0);
        let by_date = request.interval.is_daily_or_longer();

        let mut series = SymbolSeries::new(symbol);
        let mut open = Vec::with_capacity(timestamps.len());
        let mut high = Vec::with_capacity(timestamps.len());
        let mut low = Vec::with_capacity(timestamps.len());
        let mut close = Vec::with_capacity(timestamps.len());
        let mut volume = Vec::with_capacity(timestamps.len());
        let mut adj_close = Vec::with_capacity(timestamps.len());

        for (i, &ts) in timestamps.iter().enumerate() {
            let o = quote.open.get(i).copied().flatten();
            let h = quote.high.get(i).copied().flatten();
            let l = quote.low.get(i).copied().flatten();
            let c = quote.close.get(i).copied().flatten();
            let v = quote.volume.get(i).copied().flatten();

            // Skip bars where all OHLCV are None (halts, non-trading minutes)
            if o.is_none() && h.is_none() && l.is_none() && c.is_none() && v.is_none() {
                continue;
            }

            let stamp = if by_date {
                // Key daily bars by exchange-local trading date at midnight UTC.
                let local = ts + gmt_offset;
                local - local.rem_euclid(86_400)
            } else {
                ts
            };
            let stamp = DateTime::from_timestamp(stamp, 0).ok_or_else(|| {
                DataError::ResponseFormatChanged(format!("invalid timestamp: {ts}"))
            })?;

            series.timestamps.push(stamp);
            open.push(o);
            high.push(h);
            low.push(l);
            close.push(c);
            volume.push(v);
            if let Some(adj) = &adj_closes {
                adj_close.push(adj.get(i).copied().flatten());
            }
        }

        if series.timestamps.is_empty() {
            return Ok(None);
        }

        series.fields.insert(PriceField::Open, open);
        series.fields.insert(PriceField::High, high);
        series.fields.insert(PriceField::Low, low);
        series.fields.insert(PriceField::Close, close);
        series.fields.insert(PriceField::Volume, volume);
        if adj_closes.is_some() {
            series.fields.insert(PriceField::AdjClose, adj_close);
        }

        Ok(Some(series))
    }

    /// Execute the chart request for one symbol.
    fn fetch_symbol(
        &self,
        symbol: &str,
        request: FetchRequest,
    ) -> Result<Option<SymbolSeries>, DataError> {
        let url = self.chart_url(symbol);
        debug!(%url, %request, "requesting chart");

        let resp = self
            .client
            .get(&url)
            .query(&[
                ("range", request.period.as_str()),
                ("interval", request.interval.as_str()),
                ("includeAdjustedClose", "true"),
            ])
            .send()
            .map_err(|e| self.transport_error(symbol, e))?;

        let status = resp.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            // Unknown symbols come back as 404 with a "Not Found" chart error body.
            return match resp.json::<ChartResponse>() {
                Ok(chart) => Self::parse_response(symbol, request, chart),
                Err(_) => Ok(None),
            };
        }

        if !status.is_success() {
            return Err(DataError::HttpStatus {
                symbol: symbol.to_string(),
                status: status.as_u16(),
            });
        }

        let chart: ChartResponse = resp.json().map_err(|e| {
            if e.is_timeout() {
                self.transport_error(symbol, e)
            } else {
                DataError::ResponseFormatChanged(format!(
                    "failed to parse response for {symbol}: {e}"
                ))
            }
        })?;

        Self::parse_response(symbol, request, chart)
    }

    fn transport_error(&self, symbol: &str, e: reqwest::Error) -> DataError {
        if e.is_timeout() {
            DataError::Timeout {
                symbol: symbol.to_string(),
                timeout_secs: self.timeout.as_secs(),
            }
        } else {
            DataError::NetworkUnreachable(e.to_string())
        }
    }
}

impl MarketDataProvider for YahooProvider {
    fn name(&self) -> &str {
        "yahoo_finance"
    }

    fn fetch(&self, symbols: &[String], request: FetchRequest) -> Result<PriceTable, DataError> {
        let mut found = Vec::with_capacity(symbols.len());
        for symbol in symbols {
            match self.fetch_symbol(symbol, request)? {
                Some(series) => found.push(series),
                None => warn!(%symbol, %request, "no data returned for symbol"),
            }
        }
        Ok(align_series(found)?)
    }
}
