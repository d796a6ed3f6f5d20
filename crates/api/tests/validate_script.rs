mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, post_json, RenderOutcome, SCENE};
use serde_json::json;

#[tokio::test]
async fn valid_scene_passes() {
    let app = build_test_app(RenderOutcome::Video);

    let response = post_json(app.router.clone(), "/validate-script", json!({ "script": SCENE })).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json, json!({ "valid": true, "message": "Script is valid" }));
}

#[tokio::test]
async fn removing_any_marker_fails_validation() {
    let app = build_test_app(RenderOutcome::Video);

    let variants = [
        SCENE.replace("class", "struct"),
        SCENE.replace("Scene", "Thing"),
        SCENE.replace("def construct", "def build"),
    ];

    for script in variants {
        let response =
            post_json(app.router.clone(), "/validate-script", json!({ "script": script })).await;
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["valid"], false, "script should be invalid: {script}");
        assert_eq!(
            json["message"],
            "Script missing required components (Scene class, construct method)"
        );
    }
}

#[tokio::test]
async fn empty_script_is_400() {
    let app = build_test_app(RenderOutcome::Video);

    for body in [json!({ "script": "" }), json!({})] {
        let response = post_json(app.router.clone(), "/validate-script", body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        assert_eq!(json["error"], "Script is required");
    }
}
