mod common;

use actix_web::test;

use common::TestApp;

#[actix_rt::test]
async fn test_root_reports_online() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::get().uri("/").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "online");
    assert_eq!(body["message"], "Travel Agent API is running");
}

#[actix_rt::test]
async fn test_health_check() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["services"]["datastore"]["status"], "ok");
    // The test config carries no Groq key.
    assert_eq!(body["services"]["ai_chat"]["status"], "unconfigured");
}
