//! Degradation contracts for the outbound lookups: every failure path must
//! resolve to the documented placeholder values, never an error.

use bizreg::external::{
    hardcoded_headlines, CompletionClient, NewsClient, WeatherClient, TEMPERATURE_UNAVAILABLE,
};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod weather {
    use super::*;

    #[tokio::test]
    async fn successful_lookup_formats_the_report() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .and(query_param("q", "Leganes,PH"))
            .and(query_param("units", "metric"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "Leganes",
                "main": { "temp": 30.4 },
                "weather": [{ "description": "scattered clouds" }],
            })))
            .mount(&server)
            .await;

        let client = WeatherClient::new(Some("test-key".to_string())).with_base_url(server.uri());
        let report = client.current("Leganes,PH").await;

        assert_eq!(report.city, "Leganes");
        assert_eq!(report.temperature, "30°C");
        assert_eq!(report.description, "scattered clouds");
        assert_eq!(
            report.full_description.as_deref(),
            Some("The current weather in Leganes is scattered clouds with a temperature of 30°C.")
        );
    }

    #[tokio::test]
    async fn server_errors_degrade_to_the_sentinel_report() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = WeatherClient::new(Some("test-key".to_string())).with_base_url(server.uri());
        let report = client.current("Leganes,PH").await;

        assert_eq!(report.temperature, TEMPERATURE_UNAVAILABLE);
        assert_eq!(report.city, "Leganes");
        assert_eq!(report.description, "Failed to load weather data");
        assert!(report.full_description.is_none());
    }
}

mod completion {
    use super::*;
    use bizreg::external::ai::{GENERATION_ERROR, MISSING_API_KEY};

    #[tokio::test]
    async fn successful_completion_returns_trimmed_content() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{ "message": { "content": "  Good Morning!  " } }],
            })))
            .mount(&server)
            .await;

        let client =
            CompletionClient::new(Some("sk-test".to_string())).with_base_url(server.uri());
        assert_eq!(client.complete("greet me", 40).await, "Good Morning!");
    }

    #[tokio::test]
    async fn missing_key_returns_the_documented_placeholder() {
        let client = CompletionClient::new(None);
        assert_eq!(client.complete("greet me", 40).await, MISSING_API_KEY);
    }

    #[tokio::test]
    async fn server_errors_return_the_documented_placeholder() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client =
            CompletionClient::new(Some("sk-test".to_string())).with_base_url(server.uri());
        assert_eq!(client.complete("greet me", 40).await, GENERATION_ERROR);
    }
}

mod news {
    use super::*;

    #[tokio::test]
    async fn feed_items_are_parsed_capped_and_suffix_stripped() {
        let server = MockServer::start().await;
        let feed = r#"<rss><channel>
            <item><title>Leganes Opens New Public Market - Google News</title><link>https://example.com/market</link></item>
            <item><title>Permit Renewals Extended</title><link>https://example.com/permits</link></item>
        </channel></rss>"#;
        Mock::given(method("GET"))
            .and(path("/rss/search"))
            .and(query_param("q", "Leganes Iloilo"))
            .respond_with(ResponseTemplate::new(200).set_body_string(feed))
            .mount(&server)
            .await;

        let client = NewsClient::new(CompletionClient::new(None)).with_base_url(server.uri());
        let items = client.headlines("Leganes Iloilo").await;

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "Leganes Opens New Public Market");
        assert_eq!(items[0].link, "https://example.com/market");
    }

    #[tokio::test]
    async fn failed_feed_falls_back_to_generated_headlines() {
        let news_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rss/search"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&news_server)
            .await;

        let ai_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{ "message": { "content":
                    "Here you go: [{\"title\": \"Generated Headline\", \"link\": \"https://example.com/generated\"}]"
                } }],
            })))
            .mount(&ai_server)
            .await;

        let completion =
            CompletionClient::new(Some("sk-test".to_string())).with_base_url(ai_server.uri());
        let client = NewsClient::new(completion).with_base_url(news_server.uri());
        let items = client.headlines("Leganes Iloilo").await;

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Generated Headline");
    }

    #[tokio::test]
    async fn fallback_chain_ends_at_the_hardcoded_list() {
        let news_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rss/search"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&news_server)
            .await;

        // No AI key, so the generated fallback degrades too.
        let client =
            NewsClient::new(CompletionClient::new(None)).with_base_url(news_server.uri());
        let items = client.headlines("Leganes Iloilo").await;

        assert_eq!(items, hardcoded_headlines());
        assert!(!items.is_empty());
    }

    #[tokio::test]
    async fn empty_feed_also_falls_back() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rss/search"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string("<rss><channel></channel></rss>"),
            )
            .mount(&server)
            .await;

        let client = NewsClient::new(CompletionClient::new(None)).with_base_url(server.uri());
        let items = client.headlines("Leganes Iloilo").await;
        assert_eq!(items, hardcoded_headlines());
    }
}
