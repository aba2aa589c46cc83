mod common;

use actix_web::{http::header, test};
use serde_json::json;

use common::TestApp;
use tripolingo_api::models::user::UserRole;

fn scores(body: &[serde_json::Value]) -> Vec<(String, u64)> {
    body.iter()
        .map(|r| {
            (
                r["name"].as_str().unwrap().to_string(),
                r["match"].as_u64().unwrap(),
            )
        })
        .collect()
}

#[actix_rt::test]
async fn test_public_destinations_hide_inactive() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;
    test_app.seed_destination("Kyoto", "Cultural", "Moderate", true).await;
    test_app.seed_destination("Atlantis", "Adventure", "Luxury", false).await;

    let req = test::TestRequest::get().uri("/destinations").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let body: Vec<serde_json::Value> = test::read_body_json(resp).await;
    assert_eq!(body.len(), 1);
    assert_eq!(body[0]["name"], "Kyoto");
}

#[actix_rt::test]
async fn test_recommendations_without_preferences_are_neutral() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;
    let (user, token) = test_app.seed_user("fresh", UserRole::User).await;
    test_app.seed_destination("Kyoto", "Cultural", "Moderate", true).await;
    test_app.seed_destination("Reykjavik", "Adventure", "Luxury", true).await;

    let req = test::TestRequest::get()
        .uri(&format!("/recommendations/{}", user.id))
        .insert_header((header::AUTHORIZATION, token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let body: Vec<serde_json::Value> = test::read_body_json(resp).await;
    assert_eq!(
        scores(&body),
        vec![("Kyoto".to_string(), 50), ("Reykjavik".to_string(), 50)]
    );
}

#[actix_rt::test]
async fn test_recommendations_rank_by_saved_preferences() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;
    let (user, token) = test_app.seed_user("picky", UserRole::User).await;
    test_app.seed_destination("Kyoto", "Cultural", "Moderate", true).await;
    test_app.seed_destination("Bali", "Adventure", "Budget", true).await;
    test_app.seed_destination("Reykjavik", "Adventure", "Luxury", true).await;
    test_app.seed_destination("Atlantis", "Adventure", "Luxury", false).await;

    let req = test::TestRequest::post()
        .uri(&format!("/user/preferences/{}", user.id))
        .insert_header((header::AUTHORIZATION, token.clone()))
        .set_json(json!({ "travel_style": "Adventure", "budget": "Luxury" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let req = test::TestRequest::get()
        .uri(&format!("/recommendations/{}", user.id))
        .insert_header((header::AUTHORIZATION, token))
        .to_request();
    let body: Vec<serde_json::Value> = test::call_and_read_body_json(&app, req).await;

    assert_eq!(
        scores(&body),
        vec![
            ("Reykjavik".to_string(), 100),
            ("Kyoto".to_string(), 50),
            ("Bali".to_string(), 50),
        ]
    );
}

#[actix_rt::test]
async fn test_preferences_round_trip_and_legacy_styles() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;
    let (user, token) = test_app.seed_user("legacy", UserRole::User).await;
    let uri = format!("/user/preferences/{}", user.id);

    let req = test::TestRequest::get()
        .uri(&uri)
        .insert_header((header::AUTHORIZATION, token.clone()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["detail"], "Preferences not found");

    let req = test::TestRequest::post()
        .uri(&uri)
        .insert_header((header::AUTHORIZATION, token.clone()))
        .set_json(json!({
            "travel_styles": ["Relaxation", "Cultural"],
            "budget": "Moderate",
            "interests": ["Food"]
        }))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["message"], "Preferences saved successfully");

    let req = test::TestRequest::get()
        .uri(&uri)
        .insert_header((header::AUTHORIZATION, token))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["user_id"], user.id.as_str());
    assert_eq!(body["travel_style"], "Relaxation");
    assert_eq!(body["budget"], "Moderate");
    assert_eq!(body["interests"][0], "Food");
}

#[actix_rt::test]
async fn test_preferences_are_owner_only() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;
    let (owner, _) = test_app.seed_user("private", UserRole::User).await;
    let (_, token) = test_app.seed_user("curious", UserRole::User).await;

    let req = test::TestRequest::post()
        .uri(&format!("/user/preferences/{}", owner.id))
        .insert_header((header::AUTHORIZATION, token.clone()))
        .set_json(json!({ "travel_style": "Adventure" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 403);

    let req = test::TestRequest::get()
        .uri(&format!("/recommendations/{}", owner.id))
        .insert_header((header::AUTHORIZATION, token))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 403);
}
