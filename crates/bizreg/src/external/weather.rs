use serde::{Deserialize, Serialize};
use tracing::warn;

const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";

/// Sentinel temperature for degraded reports.
pub const TEMPERATURE_UNAVAILABLE: &str = "N/A";

/// Weather snapshot for the dashboard card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub city: String,
    pub temperature: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_description: Option<String>,
}

impl WeatherReport {
    pub fn is_unavailable(&self) -> bool {
        self.temperature == TEMPERATURE_UNAVAILABLE
    }
}

/// OpenWeather client. Missing configuration and request failures degrade
/// to a sentinel report instead of failing the caller.
#[derive(Debug, Clone)]
pub struct WeatherClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl WeatherClient {
    pub fn new(api_key: Option<String>) -> Self {
        let http = reqwest::Client::builder()
            .user_agent("bizreg-api")
            .build()
            .expect("reqwest client");
        Self {
            http,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub async fn current(&self, location: &str) -> WeatherReport {
        let fallback_city = location.split(',').next().unwrap_or(location).to_string();

        let Some(api_key) = self.api_key.as_deref() else {
            warn!("OpenWeather API key is missing");
            return WeatherReport {
                city: fallback_city,
                temperature: TEMPERATURE_UNAVAILABLE.to_string(),
                description: "Weather data unavailable".to_string(),
                full_description: Some("Please check your API configuration.".to_string()),
            };
        };

        match self.request(api_key, location).await {
            Ok(data) => {
                let temperature = format!("{}°C", data.main.temp.round() as i64);
                let description = data
                    .weather
                    .first()
                    .map(|condition| condition.description.clone())
                    .unwrap_or_else(|| "unknown conditions".to_string());
                let full_description = format!(
                    "The current weather in {} is {} with a temperature of {}.",
                    data.name, description, temperature
                );

                WeatherReport {
                    city: data.name,
                    temperature,
                    description,
                    full_description: Some(full_description),
                }
            }
            Err(error) => {
                warn!(%error, "weather request failed");
                WeatherReport {
                    city: fallback_city,
                    temperature: TEMPERATURE_UNAVAILABLE.to_string(),
                    description: "Failed to load weather data".to_string(),
                    full_description: None,
                }
            }
        }
    }

    async fn request(&self, api_key: &str, location: &str) -> Result<OwmResponse, reqwest::Error> {
        let url = format!(
            "{}/data/2.5/weather",
            self.base_url.trim_end_matches('/')
        );
        let response = self
            .http
            .get(url)
            .query(&[("q", location), ("appid", api_key), ("units", "metric")])
            .send()
            .await?
            .error_for_status()?;
        response.json::<OwmResponse>().await
    }
}

#[derive(Debug, Deserialize)]
struct OwmResponse {
    name: String,
    main: OwmMain,
    #[serde(default)]
    weather: Vec<OwmCondition>,
}

#[derive(Debug, Deserialize)]
struct OwmMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwmCondition {
    description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_key_degrades_without_a_request() {
        let client = WeatherClient::new(None).with_base_url("http://127.0.0.1:9");
        let report = client.current("Leganes,PH").await;

        assert!(report.is_unavailable());
        assert_eq!(report.city, "Leganes");
        assert_eq!(
            report.full_description.as_deref(),
            Some("Please check your API configuration.")
        );
    }
}
