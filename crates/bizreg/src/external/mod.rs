//! Outbound lookups consumed by the dashboard. Every client degrades to a
//! documented placeholder on missing configuration or request failure; none
//! of them surface errors to callers.

pub mod ai;
pub mod news;
pub mod weather;

pub use ai::CompletionClient;
pub use news::{hardcoded_headlines, NewsClient, NewsItem};
pub use weather::{WeatherClient, WeatherReport, TEMPERATURE_UNAVAILABLE};
