//! Lenient decoding of planner form posts.
//!
//! The planner page submits every field as a string, API clients send JSON
//! numbers; both are accepted.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::{
    input::PlanningInput,
    scenario::{default_population, default_roads, default_temperature, default_weather},
};

pub const LAYOUT_FIELDS: [&str; 4] = ["population", "temperature", "weather", "roads"];
pub const CONTACT_FIELDS: [&str; 4] = ["name", "email", "subject", "message"];

#[derive(Debug, Error, PartialEq)]
pub enum RequestError {
    #[error("Missing required fields")]
    MissingFields,
    #[error("Request body must be a JSON object")]
    NotAnObject,
    #[error("Invalid value for '{field}': {value}")]
    InvalidValue { field: &'static str, value: String },
}

fn object(body: &Value) -> Result<&Map<String, Value>, RequestError> {
    body.as_object().ok_or(RequestError::NotAnObject)
}

fn invalid(field: &'static str, value: &Value) -> RequestError {
    RequestError::InvalidValue {
        field,
        value: value.to_string(),
    }
}

fn integer(field: &'static str, value: &Value) -> Result<i64, RequestError> {
    match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
            .ok_or_else(|| invalid(field, value)),
        Value::String(text) => text.trim().parse().map_err(|_| invalid(field, value)),
        _ => Err(invalid(field, value)),
    }
}

fn real(field: &'static str, value: &Value) -> Result<f64, RequestError> {
    let parsed = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed
        .filter(|f| f.is_finite())
        .ok_or_else(|| invalid(field, value))
}

fn text(field: &'static str, value: &Value) -> Result<String, RequestError> {
    match value {
        Value::String(text) => Ok(text.clone()),
        Value::Number(_) | Value::Bool(_) => Ok(value.to_string()),
        _ => Err(invalid(field, value)),
    }
}

/// All four fields are required.
pub fn layout_input(body: &Value) -> Result<PlanningInput, RequestError> {
    let map = object(body)?;
    if !LAYOUT_FIELDS.iter().all(|field| map.contains_key(*field)) {
        return Err(RequestError::MissingFields);
    }
    Ok(PlanningInput::new(
        integer("population", &map["population"])?,
        real("temperature", &map["temperature"])?,
        text("weather", &map["weather"])?,
        text("roads", &map["roads"])?,
    ))
}

/// Every field is optional and falls back to a moderate mid-sized town.
pub fn recommendation_input(body: &Value) -> Result<PlanningInput, RequestError> {
    let map = object(body)?;
    let population = match map.get("population") {
        Some(value) => integer("population", value)?,
        None => default_population(),
    };
    let temperature = match map.get("temperature") {
        Some(value) => real("temperature", value)?,
        None => default_temperature(),
    };
    let weather = match map.get("weather") {
        Some(value) => text("weather", value)?,
        None => default_weather(),
    };
    let roads = match map.get("roads") {
        Some(value) => text("roads", value)?,
        None => default_roads(),
    };
    Ok(PlanningInput::new(population, temperature, weather, roads))
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

pub fn contact_message(body: &Value) -> Result<ContactMessage, RequestError> {
    let map = object(body)?;
    if !CONTACT_FIELDS.iter().all(|field| map.contains_key(*field)) {
        return Err(RequestError::MissingFields);
    }
    Ok(ContactMessage {
        name: text("name", &map["name"])?,
        email: text("email", &map["email"])?,
        subject: text("subject", &map["subject"])?,
        message: text("message", &map["message"])?,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn form_strings_are_parsed() {
        let input = layout_input(&json!({
            "population": "5000",
            "temperature": " 15.5 ",
            "weather": "Clear",
            "roads": "Normal"
        }))
        .unwrap();
        assert_eq!(input, PlanningInput::new(5_000, 15.5, "Clear", "Normal"));
    }

    #[test]
    fn json_numbers_are_parsed() {
        let input = layout_input(&json!({
            "population": 300000,
            "temperature": 35,
            "weather": "Rainy",
            "roads": "Heavy"
        }))
        .unwrap();
        assert_eq!(input.population(), 300_000);
        assert_eq!(input.temperature(), 35.0);
        let fractional = layout_input(&json!({
            "population": 1234.9,
            "temperature": 1,
            "weather": "Clear",
            "roads": 3
        }))
        .unwrap();
        assert_eq!(fractional.population(), 1_234);
        assert_eq!(fractional.roads_descriptor(), "3");
    }

    #[test]
    fn missing_field_is_reported() {
        let err = layout_input(&json!({"population": 1, "temperature": 2, "weather": "x"}))
            .unwrap_err();
        assert_eq!(err, RequestError::MissingFields);
        assert_eq!(err.to_string(), "Missing required fields");
    }

    #[test]
    fn bad_numbers_are_reported() {
        let err = layout_input(&json!({
            "population": "lots",
            "temperature": 2,
            "weather": "x",
            "roads": "y"
        }))
        .unwrap_err();
        assert!(matches!(err, RequestError::InvalidValue { field: "population", .. }));
        assert_eq!(
            layout_input(&json!([1, 2])).unwrap_err(),
            RequestError::NotAnObject
        );
    }

    #[test]
    fn recommendations_fall_back_to_defaults() {
        let input = recommendation_input(&json!({"population": "60000"})).unwrap();
        assert_eq!(input.population(), 60_000);
        assert_eq!(input.temperature(), 20.0);
        assert_eq!(input.weather(), "Moderate");
        assert_eq!(input.roads_descriptor(), "Normal");
        let empty = recommendation_input(&json!({})).unwrap();
        assert_eq!(empty.population(), 10_000);
    }

    #[test]
    fn contact_requires_every_field() {
        let ok = contact_message(&json!({
            "name": "Ada",
            "email": "ada@example.com",
            "subject": "Zoning",
            "message": "Hello"
        }))
        .unwrap();
        assert_eq!(ok.subject, "Zoning");
        assert_eq!(
            contact_message(&json!({"name": "Ada"})).unwrap_err(),
            RequestError::MissingFields
        );
    }
}
