#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, Response, header},
};
use http_body_util::BodyExt;
use macroplan::config::{Config, ObservabilityConfig, ProviderConfig, ServerConfig};
use macroplan::{AppState, router};
use macroplan_mealplan::provider::FakeGenerator;
use serde_json::{Value, json};

pub const NEVER_SET_ENV: &str = "MACROPLAN_TEST_KEY_THAT_IS_NEVER_SET";

/// Config whose provider key comes only from `api_key`.
pub fn config(api_key: Option<&str>) -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 3000,
        },
        provider: ProviderConfig {
            api_key_env: NEVER_SET_ENV.to_string(),
            api_key: api_key.map(str::to_string),
            ..ProviderConfig::default()
        },
        observability: ObservabilityConfig::default(),
    }
}

pub fn app(fake: Arc<FakeGenerator>) -> Router {
    router(AppState::new(config(Some("test-key")), fake))
}

pub fn app_without_key(fake: Arc<FakeGenerator>) -> Router {
    router(AppState::new(config(None), fake))
}

pub fn four_meal_plan() -> Value {
    json!({
        "plan_name": "High protein day",
        "days": [{
            "day_name": "Monday",
            "total_macros": { "protein_g": 160, "fat_g": 70, "carbs_g": 220 },
            "meals": [
                {
                    "meal_type": "breakfast",
                    "recipe_name": "m1",
                    "short_description": "Oats with whey",
                    "macros": { "protein_g": 40, "fat_g": 10, "carbs_g": 60 },
                    "ingredients": [{ "name": "oats", "quantity_grams": 80 }],
                    "steps": ["Cook oats", "Stir in whey", "Top with berries"]
                },
                { "meal_type": "lunch", "recipe_name": "m2", "steps": ["Grill chicken"] },
                { "meal_type": "snack", "recipe_name": "m3" },
                { "meal_type": "dinner", "recipe_name": "m4", "steps": [] }
            ]
        }],
        "shopping_list": ["oats", "whey", "chicken breast"],
        "general_tips": ["Drink water"]
    })
}

pub fn post_json(uri: &str, body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.into())
        .unwrap()
}

pub fn post_form(uri: &str, fields: &[(&str, &str)]) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(serde_urlencoded::to_string(fields).unwrap()))
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}
