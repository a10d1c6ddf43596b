//! Helpers over the pass-through JSON returned by the weather API.
//!
//! Responses are never validated or normalized; these functions only build
//! the fallback mappings and read fields for display.

use serde_json::{Value, json};

/// Placeholder shown for fields the API did not return.
pub const NOT_AVAILABLE: &str = "N/A";

/// Key under which a fallback mapping carries the failure message.
pub const ERROR_KEY: &str = "error";

/// Mapping returned by `get_current_weather` when the request fails.
pub fn current_fallback(city: &str, error: impl ToString) -> Value {
    json!({
        "error": error.to_string(),
        "city": city,
    })
}

/// Mapping returned by `get_forecast` when the request fails.
pub fn forecast_fallback(city: &str, days: u32, error: impl ToString) -> Value {
    json!({
        "error": error.to_string(),
        "city": city,
        "days": days,
    })
}

pub fn is_error_response(value: &Value) -> bool {
    value.get(ERROR_KEY).is_some()
}

/// Render `value[key]` for display, or `N/A` when the field is absent.
pub fn field_or_na(value: &Value, key: &str) -> String {
    value.get(key).map(display_value).unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => NOT_AVAILABLE.to_string(),
        other => other.to_string(),
    }
}

/// One entry of a forecast's `"forecast"` array, read leniently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastDay {
    pub date: String,
    pub condition: String,
    pub temp: String,
}

impl ForecastDay {
    pub fn from_value(value: &Value) -> Self {
        Self {
            date: field_or_na(value, "date"),
            condition: field_or_na(value, "condition"),
            temp: field_or_na(value, "temp"),
        }
    }

    /// Entries of `forecast["forecast"]`, or `None` when the key is missing.
    pub fn list(forecast: &Value) -> Option<Vec<ForecastDay>> {
        let days = forecast.get("forecast")?;
        Some(
            days.as_array()
                .map(|entries| entries.iter().map(ForecastDay::from_value).collect())
                .unwrap_or_default(),
        )
    }
}
