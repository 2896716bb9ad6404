//! Weather Integration
//!
//! Trait seam for the weather service. Location context is passed in
//! explicitly per call; there is no process-wide location cache, so sessions
//! stay isolated and testable.

use async_trait::async_trait;

use crate::error::{ConciergeError, Result};
use crate::model::Forecast;

/// Weather client trait
#[async_trait]
pub trait WeatherClient: Send + Sync {
    /// Current conditions for a city
    async fn current(&self, city: &str) -> Result<Forecast>;

    /// Client name
    fn name(&self) -> &str;
}

/// Mock weather client with static conditions
pub struct MockWeatherClient;

#[async_trait]
impl WeatherClient for MockWeatherClient {
    async fn current(&self, city: &str) -> Result<Forecast> {
        if city.trim().is_empty() {
            return Err(ConciergeError::Weather("city must not be empty".into()));
        }

        // Condition keyed off the city name so tests are deterministic
        let (temp_c, condition, humidity) = match city.to_lowercase().as_str() {
            "london" => (11.0, "Light rain", 85),
            "seattle" => (9.5, "Drizzle", 90),
            "phoenix" => (34.0, "Sunny", 15),
            _ => (18.0, "Partly cloudy", 55),
        };

        Ok(Forecast {
            city: city.to_string(),
            temp_c,
            condition: condition.into(),
            humidity_percent: humidity,
        })
    }

    fn name(&self) -> &str {
        "MockWeather"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_weather() {
        let client = MockWeatherClient;
        let forecast = client.current("London").await.unwrap();
        assert_eq!(forecast.city, "London");
        assert!(forecast.summary().contains("rain"));
    }

    #[tokio::test]
    async fn test_empty_city_rejected() {
        let client = MockWeatherClient;
        assert!(client.current("  ").await.is_err());
    }
}
