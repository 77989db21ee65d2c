//! Weather lookup tool.

use anyhow::Result;
use llm::Tool;
use reqwest::Client;
use schemars::JsonSchema;
use serde::Deserialize;

/// The wire name of this tool.
pub const NAME: &str = "getWeather";

/// Arguments for [`run`].
#[derive(Debug, Deserialize, JsonSchema)]
pub struct Args {
    /// Latitude of the location.
    pub latitude: f64,
    /// Longitude of the location.
    pub longitude: f64,
}

/// Tool declaration.
pub fn spec() -> Tool {
    Tool {
        name: NAME.into(),
        description: "Get the current weather at a location".into(),
        parameters: schemars::schema_for!(Args),
        strict: false,
    }
}

/// Fetch the current forecast for the given coordinates.
pub async fn run(client: &Client, arguments: &str) -> Result<String> {
    let args: Args = serde_json::from_str(arguments)?;
    let url = format!(
        "https://api.open-meteo.com/v1/forecast?latitude={}&longitude={}\
         &current=temperature_2m&hourly=temperature_2m&daily=sunrise,sunset&timezone=auto",
        args.latitude, args.longitude
    );
    let body = client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn args_parse_from_model_output() {
        let args: Args = serde_json::from_str("{\"latitude\":48.85,\"longitude\":2.35}").unwrap();
        assert_eq!(args.latitude, 48.85);
        assert_eq!(args.longitude, 2.35);
    }

    #[test]
    fn args_reject_missing_fields() {
        assert!(serde_json::from_str::<Args>("{\"latitude\":1.0}").is_err());
    }

    #[test]
    fn spec_declares_both_coordinates() {
        let spec = spec();
        assert_eq!(spec.name, NAME);
        let schema = serde_json::to_value(&spec.parameters).unwrap();
        let properties = schema["properties"].as_object().unwrap();
        assert!(properties.contains_key("latitude"));
        assert!(properties.contains_key("longitude"));
    }
}
