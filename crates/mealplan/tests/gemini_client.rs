use macroplan_mealplan::provider::{
    GeminiClient, GenerateContentRequest, ProviderError, TextGenerator,
};
use macroplan_mealplan::{Generator, Preferences};
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MODEL_PATH: &str = "/models/gemini-test:generateContent";

fn client(server: &MockServer) -> GeminiClient {
    GeminiClient::new(server.uri(), "gemini-test")
}

#[tokio::test]
async fn test_sends_key_header_and_generation_config() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .and(header("x-goog-api-key", "secret"))
        .and(body_partial_json(json!({
            "systemInstruction": { "parts": [{ "text": "be brief" }] },
            "generationConfig": {
                "responseMimeType": "application/json",
                "maxOutputTokens": 700
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{ "content": { "parts": [{ "text": "{\"ok\":true}" }] } }],
            "usageMetadata": { "totalTokenCount": 9 }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let request = GenerateContentRequest::new("be brief", "plan");
    let response = client(&server)
        .generate_content("secret", &request)
        .await
        .unwrap();

    assert_eq!(response.first_candidate_text(), "{\"ok\":true}");
    assert_eq!(response.usage_metadata, Some(json!({ "totalTokenCount": 9 })));
}

#[tokio::test]
async fn test_rate_limit_message_is_forwarded() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": {
                "code": 429,
                "message": "Resource has been exhausted (e.g. check quota).",
                "status": "RESOURCE_EXHAUSTED"
            }
        })))
        .mount(&server)
        .await;

    let err = client(&server)
        .generate_content("secret", &GenerateContentRequest::new("s", "p"))
        .await
        .unwrap_err();

    match err {
        ProviderError::Status { status, message } => {
            assert_eq!(status, 429);
            assert_eq!(message, "Resource has been exhausted (e.g. check quota).");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_unreachable_provider_is_a_transport_error() {
    // nothing listens on port 1
    let err = GeminiClient::new("http://127.0.0.1:1", "gemini-test")
        .generate_content("secret", &GenerateContentRequest::new("s", "p"))
        .await
        .unwrap_err();

    assert!(matches!(err, ProviderError::Transport(_)));
}

#[tokio::test]
async fn test_generator_over_http_trims_meals() {
    let server = MockServer::start().await;
    let plan = json!({
        "plan_name": "Lean",
        "days": [{ "meals": [
            { "recipe_name": "m1", "steps": ["1", "2", "3"] },
            { "recipe_name": "m2" },
            { "recipe_name": "m3" }
        ] }]
    });

    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{ "content": { "parts": [
                { "text": "Here is your plan:\n" },
                { "text": plan.to_string() }
            ] } }]
        })))
        .mount(&server)
        .await;

    let generator = Generator::new(Arc::new(client(&server)));
    let prefs = Preferences::from_raw(&json!({ "numMeals": 2 }));
    let generated = generator.generate("secret", &prefs).await.unwrap();

    let meals = generated.plan["days"][0]["meals"].as_array().unwrap();
    assert_eq!(meals.len(), 2);
    assert_eq!(meals[0]["steps"], json!(["1", "2"]));
    assert_eq!(meals[1]["steps"], json!([]));
    assert_eq!(generated.usage, None);
}
