// HTTP-backed series provider
use crate::application::series_provider::{FetchError, SeriesProvider};
use crate::domain::series::{Series, SeriesId};
use crate::infrastructure::config::ProvidersConfig;
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;

/// The quote endpoint nests its data under a key like
/// "Time Series (5min)"; the exact suffix depends on the interval.
const QUOTE_SERIES_KEY_PREFIX: &str = "Time Series";
const QUOTE_VALUE_FIELD: &str = "4. close";

pub struct HttpSeriesProvider {
    http: reqwest::Client,
    config: ProvidersConfig,
}

impl HttpSeriesProvider {
    pub fn new(config: ProvidersConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    async fn fetch_stock(&self) -> Result<Series, FetchError> {
        let stock = &self.config.stock;
        let mut request = self.http.get(&stock.base_url);
        // Unset parameters are left off the request entirely.
        for (key, value) in [
            ("symbol", &stock.symbol),
            ("interval", &stock.interval),
            ("apikey", &stock.apikey),
        ] {
            if !value.is_empty() {
                request = request.query(&[(key, value.as_str())]);
            }
        }

        let json = send_json(request).await?;
        parse_quote_series(&json)
    }

    async fn fetch_population(&self) -> Result<Series, FetchError> {
        let population = &self.config.population;
        let url = format!(
            "{}/{}/{}/",
            population.base_url.trim_end_matches('/'),
            urlencoding::encode(&population.country),
            population.age
        );

        let json = send_json(self.http.get(&url)).await?;
        parse_population_records(&json, &population.label_field, &population.value_field)
    }
}

#[async_trait]
impl SeriesProvider for HttpSeriesProvider {
    async fn fetch(&self, id: SeriesId) -> Result<Series, FetchError> {
        tracing::debug!("requesting {} series from remote", id);
        match id {
            SeriesId::Stock => self.fetch_stock().await,
            SeriesId::Population => self.fetch_population().await,
        }
    }
}

async fn send_json(request: reqwest::RequestBuilder) -> Result<Value, FetchError> {
    let response = request
        .send()
        .await
        .map_err(|e| FetchError::Transport(e.to_string()))?;

    if !response.status().is_success() {
        return Err(FetchError::Transport(format!(
            "server returned {}",
            response.status()
        )));
    }

    response
        .json::<Value>()
        .await
        .map_err(|e| FetchError::Parse(e.to_string()))
}

/// Normalize the nested time-keyed quote payload: timestamps become labels
/// in chronological order, the close field the values.
fn parse_quote_series(json: &Value) -> Result<Series, FetchError> {
    let series_key = json
        .as_object()
        .and_then(|obj| {
            obj.keys()
                .find(|k| k.starts_with(QUOTE_SERIES_KEY_PREFIX))
                .cloned()
        })
        .ok_or_else(|| FetchError::Parse("missing time series key in quote response".to_string()))?;

    let entries = json
        .get(&series_key)
        .and_then(Value::as_object)
        .ok_or_else(|| FetchError::Parse(format!("'{series_key}' is not an object")))?;

    let mut points = Vec::with_capacity(entries.len());
    for (timestamp, bar) in entries {
        let ts = parse_timestamp(timestamp)
            .ok_or_else(|| FetchError::Parse(format!("invalid timestamp '{timestamp}'")))?;
        let close = bar
            .get(QUOTE_VALUE_FIELD)
            .and_then(numeric_field)
            .ok_or_else(|| {
                FetchError::Parse(format!(
                    "missing numeric '{QUOTE_VALUE_FIELD}' at {timestamp}"
                ))
            })?;
        points.push((ts, timestamp.clone(), close));
    }
    points.sort_by_key(|(ts, _, _)| *ts);

    Ok(Series::from_points(
        points
            .into_iter()
            .map(|(_, label, value)| (label, value))
            .collect(),
    ))
}

/// Normalize the demographic payload: an ordered list of records, one
/// label and one value extracted per record.
fn parse_population_records(
    json: &Value,
    label_field: &str,
    value_field: &str,
) -> Result<Series, FetchError> {
    let records = json
        .as_array()
        .ok_or_else(|| FetchError::Parse("population response is not an array".to_string()))?;

    let mut points = Vec::with_capacity(records.len());
    for record in records {
        let label = record
            .get(label_field)
            .map(label_text)
            .ok_or_else(|| FetchError::Parse(format!("missing label field '{label_field}'")))?;
        let value = record
            .get(value_field)
            .and_then(numeric_field)
            .ok_or_else(|| FetchError::Parse(format!("missing numeric field '{value_field}'")))?;
        points.push((label, value));
    }

    Ok(Series::from_points(points))
}

/// The quote endpoint serves numbers as strings; the demographic one as
/// plain JSON numbers. Accept both.
fn numeric_field(value: &Value) -> Option<f64> {
    if let Some(n) = value.as_f64() {
        return Some(n);
    }
    value.as_str().and_then(|s| s.parse().ok())
}

fn label_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn parse_timestamp(raw: &str) -> Option<i64> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.and_utc().timestamp_millis());
    }
    if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(d.and_hms_opt(0, 0, 0)?.and_utc().timestamp_millis());
    }
    None
}
