use crate::domain::series::SeriesId;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct ProvidersConfig {
    pub stock: StockProviderSettings,
    pub population: PopulationProviderSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StockProviderSettings {
    pub base_url: String,
    pub symbol: String,
    pub interval: String,
    pub apikey: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PopulationProviderSettings {
    pub base_url: String,
    pub country: String,
    pub age: u32,
    /// Record field holding the x-axis label.
    pub label_field: String,
    /// Record field holding the numeric value.
    pub value_field: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChartConfig {
    pub defaults: ChartDefaults,
    pub timing: TimingSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChartDefaults {
    pub series: SeriesId,
    pub threshold: f64,
    pub max_points: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TimingSettings {
    /// Quiet period before a threshold or point-count edit takes effect.
    pub debounce_ms: u64,
    /// How long an error banner stays visible.
    pub notice_ms: u64,
}

pub fn load_providers_config() -> anyhow::Result<ProvidersConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/providers"))
        .build()?;

    Ok(settings.try_deserialize()?)
}

pub fn load_chart_config() -> anyhow::Result<ChartConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/chart"))
        .build()?;

    Ok(settings.try_deserialize()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chart_config_deserializes() {
        let sample = r#"
            [defaults]
            series = "population"
            threshold = 108.0
            max_points = 10

            [timing]
            debounce_ms = 300
            notice_ms = 2500
        "#;

        let config: ChartConfig = config::Config::builder()
            .add_source(config::File::from_str(sample, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.defaults.series, SeriesId::Population);
        assert_eq!(config.defaults.threshold, 108.0);
        assert_eq!(config.defaults.max_points, 10);
        assert_eq!(config.timing.debounce_ms, 300);
        assert_eq!(config.timing.notice_ms, 2500);
    }

    #[test]
    fn providers_config_deserializes() {
        let sample = r#"
            [stock]
            base_url = "https://quotes.example/query?function=TIME_SERIES_INTRADAY"
            symbol = "MSFT"
            interval = "5min"
            apikey = "demo"

            [population]
            base_url = "https://population.example/1.0/population"
            country = "Brazil"
            age = 18
            label_field = "year"
            value_field = "total"
        "#;

        let config: ProvidersConfig = config::Config::builder()
            .add_source(config::File::from_str(sample, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.stock.symbol, "MSFT");
        assert_eq!(config.population.age, 18);
        assert_eq!(config.population.label_field, "year");
    }
}
