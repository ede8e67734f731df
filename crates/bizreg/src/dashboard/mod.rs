//! Dashboard summary assembly: greeting, timestamp, weather, headlines, and
//! directory-derived system notices, gathered behind one endpoint.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use chrono::{DateTime, Local, Timelike};
use serde::Serialize;
use serde_json::json;

use crate::config::ExternalConfig;
use crate::directory::{
    BusinessDirectory, DirectoryError, DirectoryService, DirectoryStats, PENDING_WINDOW_DAYS,
};
use crate::external::{CompletionClient, NewsClient, NewsItem, WeatherClient, WeatherReport};

const GREETING_PROMPT: &str =
    "Generate a short friendly greeting like 'Good Morning! Here's your daily update.'";

/// Payload for the dashboard landing page.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    pub greeting: String,
    pub timestamp: String,
    pub weather: WeatherReport,
    pub weather_greeting: String,
    pub news: Vec<NewsItem>,
    pub system_info: Vec<String>,
    pub stats: DirectoryStats,
}

/// Gathers the dashboard payload from the directory and the external
/// lookups. Degraded lookups are replaced by local fallbacks; only a
/// directory failure surfaces as an error.
pub struct SummaryService<D> {
    directory: DirectoryService<D>,
    weather: WeatherClient,
    news: NewsClient,
    completion: CompletionClient,
    location: String,
    news_query: String,
}

impl<D> SummaryService<D>
where
    D: BusinessDirectory + 'static,
{
    pub fn new(
        directory: DirectoryService<D>,
        weather: WeatherClient,
        news: NewsClient,
        completion: CompletionClient,
        location: String,
        news_query: String,
    ) -> Self {
        Self {
            directory,
            weather,
            news,
            completion,
            location,
            news_query,
        }
    }

    pub fn from_config(directory: DirectoryService<D>, config: &ExternalConfig) -> Self {
        let completion = CompletionClient::new(config.openai_api_key.clone());
        Self::new(
            directory,
            WeatherClient::new(config.openweather_api_key.clone()),
            NewsClient::new(completion.clone()),
            completion,
            config.location.clone(),
            config.news_query.clone(),
        )
    }

    pub async fn build(&self, now: DateTime<Local>) -> Result<DashboardSummary, DirectoryError> {
        let today = now.date_naive();
        let stats = self.directory.stats(today)?;
        let expiring_dti = self
            .directory
            .expiring_dti_within(PENDING_WINDOW_DAYS, today)?
            .len();

        let greeting_response = self.completion.complete(GREETING_PROMPT, 40).await;
        let greeting = if CompletionClient::is_degraded(&greeting_response) {
            fallback_greeting(now.hour())
        } else {
            greeting_response
        };

        let weather = self.weather.current(&self.location).await;
        let weather_greeting = self.weather_greeting(&weather).await;
        let news = self.news.headlines(&self.news_query).await;

        Ok(DashboardSummary {
            greeting,
            timestamp: format_timestamp(now),
            weather,
            weather_greeting,
            news,
            system_info: system_info_lines(&stats, expiring_dti),
            stats,
        })
    }

    async fn weather_greeting(&self, weather: &WeatherReport) -> String {
        if weather.is_unavailable() {
            return "Weather info unavailable.".to_string();
        }

        let prompt = format!(
            "Create a friendly, concise weather greeting (1-2 sentences) for {}:\n\
             - Temperature: {}\n- Conditions: {}\n- Make it warm and natural\n\
             - Don't mention you're an AI",
            weather.city, weather.temperature, weather.description
        );

        let response = self.completion.complete(&prompt, 80).await;
        if CompletionClient::is_degraded(&response) {
            format!(
                "Current weather in {}: {} and {}.",
                weather.city, weather.temperature, weather.description
            )
        } else {
            response
        }
    }
}

/// Hour-of-day greeting used whenever the AI greeting degrades.
pub fn fallback_greeting(hour: u32) -> String {
    if hour < 12 {
        "Good Morning! Here's your daily update.".to_string()
    } else if hour < 18 {
        "Good Afternoon! Here's your daily update.".to_string()
    } else {
        "Good Evening! Here's your daily update.".to_string()
    }
}

/// `Weekday, Month D, YYYY - h:mm am/pm` rendering for the header card.
pub fn format_timestamp(now: DateTime<Local>) -> String {
    now.format("%A, %B %-d, %Y - %-I:%M %P").to_string()
}

fn system_info_lines(stats: &DirectoryStats, expiring_dti: usize) -> Vec<String> {
    let mut lines = Vec::new();
    if expiring_dti > 0 {
        lines.push(format!(
            "{expiring_dti} businesses have expiring DTI permits."
        ));
    }
    if stats.noncompliant > 0 {
        lines.push(format!(
            "{} businesses have lapsed permit registrations.",
            stats.noncompliant
        ));
    }
    if lines.is_empty() {
        lines.push("All permit registrations are in good standing.".to_string());
    }
    lines
}

/// Router builder exposing the dashboard summary endpoint.
pub fn dashboard_router<D>(service: Arc<SummaryService<D>>) -> Router
where
    D: BusinessDirectory + 'static,
{
    Router::new()
        .route("/api/v1/dashboard/summary", get(summary_handler::<D>))
        .with_state(service)
}

pub(crate) async fn summary_handler<D>(
    State(service): State<Arc<SummaryService<D>>>,
) -> Response
where
    D: BusinessDirectory + 'static,
{
    match service.build(Local::now()).await {
        Ok(summary) => (StatusCode::OK, axum::Json(summary)).into_response(),
        Err(error) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            axum::Json(json!({ "error": error.to_string() })),
        )
            .into_response(),
    }
}
