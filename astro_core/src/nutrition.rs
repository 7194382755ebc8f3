//! Nutrition facts lookup for free-text food descriptions.
//!
//! The HTTP implementation talks to the Nutritionix natural-language
//! nutrients endpoint. Every failure maps to a non-fatal error: callers fall
//! back to manual entry. There is no retry.

use crate::calc::round2;
use crate::config::NutritionConfig;
use crate::error::{LookupFailure, ValidationError};
use crate::{Error, Result};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

/// Nutrition facts for the first food matched by a query
#[derive(Clone, Debug, PartialEq)]
pub struct NutritionFacts {
    pub food_name: Option<String>,
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
}

/// Something that can resolve a food description into nutrition facts
pub trait NutritionLookup {
    fn lookup(&self, query: &str) -> Result<NutritionFacts>;
}

#[derive(Debug, Serialize)]
struct NutrientsRequest<'a> {
    query: &'a str,
}

#[derive(Debug, Deserialize)]
struct NutrientsResponse {
    foods: Vec<FoodItem>,
}

#[derive(Debug, Deserialize)]
struct FoodItem {
    #[serde(default)]
    food_name: Option<String>,
    nf_calories: f64,
    nf_protein: f64,
    nf_total_carbohydrate: f64,
}

/// Blocking client for the Nutritionix API
pub struct NutritionixClient {
    http: reqwest::blocking::Client,
    endpoint: String,
    app_id: String,
    app_key: String,
}

impl NutritionixClient {
    pub fn new(config: &NutritionConfig) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
            app_id: config.app_id.clone(),
            app_key: config.app_key.clone(),
        })
    }

    pub fn has_credentials(&self) -> bool {
        !self.app_id.is_empty() && !self.app_key.is_empty()
    }
}

impl NutritionLookup for NutritionixClient {
    fn lookup(&self, query: &str) -> Result<NutritionFacts> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ValidationError::Empty { field: "Meal name" }.into());
        }
        if !self.has_credentials() {
            return Err(LookupFailure::MissingCredentials.into());
        }

        tracing::info!("Looking up nutrition facts for {:?}", query);

        let response = self
            .http
            .post(&self.endpoint)
            .header("x-app-id", &self.app_id)
            .header("x-app-key", &self.app_key)
            .json(&NutrientsRequest { query })
            .send()
            .map_err(|e| {
                tracing::warn!("Nutrition request failed: {}", e);
                LookupFailure::Network(e.to_string())
            })?;

        if let Some(failure) = classify_status(response.status()) {
            tracing::warn!("Nutrition service refused request: {}", failure);
            return Err(failure.into());
        }

        let body = response
            .text()
            .map_err(|e| LookupFailure::Network(e.to_string()))?;

        parse_response(&body)
    }
}

/// Map an HTTP status to a lookup failure; `None` means success
pub fn classify_status(status: StatusCode) -> Option<LookupFailure> {
    if status == StatusCode::TOO_MANY_REQUESTS {
        Some(LookupFailure::RateLimited)
    } else if !status.is_success() {
        Some(LookupFailure::Status(status.as_u16()))
    } else {
        None
    }
}

/// Extract the first food's facts from a response body
///
/// An empty `foods` list is a missing match; anything else that does not fit
/// the expected shape is a parse error.
pub fn parse_response(body: &str) -> Result<NutritionFacts> {
    let response: NutrientsResponse =
        serde_json::from_str(body).map_err(|e| Error::LookupParse(e.to_string()))?;

    let item = response
        .foods
        .into_iter()
        .next()
        .ok_or(LookupFailure::NoMatch)?;

    for (field, value) in [
        ("nf_calories", item.nf_calories),
        ("nf_protein", item.nf_protein),
        ("nf_total_carbohydrate", item.nf_total_carbohydrate),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(Error::LookupParse(format!("{} has invalid value {}", field, value)));
        }
    }

    Ok(NutritionFacts {
        food_name: item.food_name,
        calories: round2(item.nf_calories),
        protein_g: round2(item.nf_protein),
        carbs_g: round2(item.nf_total_carbohydrate),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_first_food() {
        let body = r#"{"foods": [
            {"food_name": "egg", "serving_qty": 2, "nf_calories": 143.04,
             "nf_protein": 12.564, "nf_total_carbohydrate": 0.72},
            {"food_name": "toast", "nf_calories": 75.0, "nf_protein": 2.6,
             "nf_total_carbohydrate": 13.8}
        ]}"#;

        let facts = parse_response(body).unwrap();
        assert_eq!(facts.food_name.as_deref(), Some("egg"));
        assert_eq!(facts.calories, 143.04);
        assert_eq!(facts.protein_g, 12.56);
        assert_eq!(facts.carbs_g, 0.72);
    }

    #[test]
    fn test_empty_foods_is_no_match() {
        let err = parse_response(r#"{"foods": []}"#).unwrap_err();
        assert!(matches!(
            err,
            Error::LookupUnavailable(LookupFailure::NoMatch)
        ));
    }

    #[test]
    fn test_malformed_bodies_are_parse_errors() {
        for body in [
            "not json",
            r#"{"message": "usage limits exceeded"}"#,
            r#"{"foods": [{"food_name": "egg", "nf_calories": 70}]}"#,
            r#"{"foods": [{"nf_calories": null, "nf_protein": 1, "nf_total_carbohydrate": 1}]}"#,
            r#"{"foods": [{"nf_calories": -5, "nf_protein": 1, "nf_total_carbohydrate": 1}]}"#,
        ] {
            let err = parse_response(body).unwrap_err();
            assert!(
                matches!(err, Error::LookupParse(_)),
                "body {:?} gave {:?}",
                body,
                err
            );
        }
    }

    #[test]
    fn test_classify_status() {
        assert_eq!(classify_status(StatusCode::OK), None);
        assert_eq!(
            classify_status(StatusCode::TOO_MANY_REQUESTS),
            Some(LookupFailure::RateLimited)
        );
        assert_eq!(
            classify_status(StatusCode::UNAUTHORIZED),
            Some(LookupFailure::Status(401))
        );
        assert_eq!(
            classify_status(StatusCode::INTERNAL_SERVER_ERROR),
            Some(LookupFailure::Status(500))
        );
    }

    #[test]
    fn test_missing_credentials_short_circuits() {
        let client = NutritionixClient::new(&NutritionConfig::default()).unwrap();
        assert!(!client.has_credentials());

        let err = client.lookup("1 cup rice").unwrap_err();
        assert!(matches!(
            err,
            Error::LookupUnavailable(LookupFailure::MissingCredentials)
        ));
    }

    #[test]
    fn test_unreachable_endpoint_is_network_failure() {
        let config = NutritionConfig {
            app_id: "id".into(),
            app_key: "key".into(),
            endpoint: "http://127.0.0.1:9/v2/natural/nutrients".into(),
            timeout_secs: 2,
        };
        let client = NutritionixClient::new(&config).unwrap();

        let err = client.lookup("1 cup rice").unwrap_err();
        assert!(matches!(
            err,
            Error::LookupUnavailable(LookupFailure::Network(_))
        ));
    }
}
