//! HTTP-level integration tests for the `/template-fields` resource.

mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, create_template, delete, get, post_json, put_json};
use serde_json::json;

#[tokio::test]
async fn create_select_field_with_string_options() {
    let app = build_test_app();
    let template_id = create_template(&app, "AUD-01", None).await;

    let response = post_json(
        app,
        "/api/v1/template-fields",
        json!({
            "template_id": template_id,
            "technical_name": "resultado",
            "label": "Resultado",
            "field_type": "select",
            "required": true,
            "options": "[\"Sí\", {\"label\": \"No aplica\", \"value\": \"na\"}]",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["data"]["field_type"], "select");
    assert_eq!(json["data"]["iso_section"], "general");
    assert_eq!(json["data"]["active"], true);
    let options = json["data"]["options"].as_array().unwrap();
    assert_eq!(options.len(), 2);
    assert_eq!(options[0]["label"], "Sí");
    assert_eq!(options[0]["value"], "Sí");
    assert_eq!(options[1]["value"], "na");
}

#[tokio::test]
async fn unknown_field_type_is_rejected() {
    let app = build_test_app();
    let template_id = create_template(&app, "AUD-01", None).await;

    let response = post_json(
        app,
        "/api/v1/template-fields",
        json!({
            "template_id": template_id,
            "technical_name": "x",
            "label": "X",
            "field_type": "slider",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(json["error"].as_str().unwrap().starts_with("Invalid field_type 'slider'"));
}

#[tokio::test]
async fn field_for_missing_template_returns_404() {
    let app = build_test_app();

    let response = post_json(
        app,
        "/api/v1/template-fields",
        json!({
            "template_id": 404,
            "technical_name": "x",
            "label": "X",
            "field_type": "text",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_update_and_delete_fields() {
    let app = build_test_app();
    let template_id = create_template(&app, "AUD-01", None).await;

    for name in ["uno", "dos"] {
        let response = post_json(
            app.clone(),
            "/api/v1/template-fields",
            json!({
                "template_id": template_id,
                "technical_name": name,
                "label": name,
                "field_type": "text",
            }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let listed = body_json(
        get(app.clone(), &format!("/api/v1/template-fields?template_id={template_id}")).await,
    )
    .await;
    let fields = listed["data"].as_array().unwrap();
    assert_eq!(fields.len(), 2);
    let first_id = fields[0]["id"].as_i64().unwrap();

    let response = put_json(
        app.clone(),
        &format!("/api/v1/template-fields/{first_id}"),
        json!({ "active": false, "label": "Uno" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["label"], "Uno");

    let active = body_json(
        get(
            app.clone(),
            &format!("/api/v1/template-fields?template_id={template_id}&active=true"),
        )
        .await,
    )
    .await;
    assert_eq!(active["data"].as_array().unwrap().len(), 1);

    let response = delete(app.clone(), &format!("/api/v1/template-fields/{first_id}")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get(app, &format!("/api/v1/template-fields/{first_id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
