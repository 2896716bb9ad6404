//! Weather Tool

use std::sync::Arc;

use async_trait::async_trait;

use agent_core::{
    tool::ParameterSchema, Result as CoreResult, Tool, ToolCall, ToolResult, ToolSchema,
};

use crate::weather::WeatherClient;

/// Tool for current weather lookups
pub struct WeatherTool {
    client: Arc<dyn WeatherClient>,
}

impl WeatherTool {
    pub fn new(client: Arc<dyn WeatherClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for WeatherTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "getWeather".into(),
            description: "Get current weather conditions for a city.".into(),
            parameters: vec![ParameterSchema {
                name: "city".into(),
                param_type: "string".into(),
                description: "City name".into(),
                required: true,
                default: None,
                enum_values: None,
            }],
            category: Some("weather".into()),
            has_side_effects: false,
        }
    }

    async fn execute(&self, call: &ToolCall) -> CoreResult<ToolResult> {
        let city = call
            .arguments
            .get("city")
            .and_then(|v| v.as_str())
            .unwrap_or_default();

        match self.client.current(city).await {
            Ok(forecast) => {
                let data = serde_json::to_value(&forecast)?;
                Ok(ToolResult::success("getWeather", forecast.summary()).with_data(data))
            }
            Err(e) => Ok(ToolResult::failure("getWeather", e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weather::MockWeatherClient;
    use serde_json::json;

    #[tokio::test]
    async fn test_weather_tool() {
        let tool = WeatherTool::new(Arc::new(MockWeatherClient));
        let call = ToolCall {
            name: "getWeather".into(),
            arguments: serde_json::from_value(json!({"city": "Seattle"})).unwrap(),
            id: None,
        };

        let result = tool.execute(&call).await.unwrap();
        assert!(result.success);
        assert!(result.output.contains("Seattle"));
    }
}
