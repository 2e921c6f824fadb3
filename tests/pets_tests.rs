// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Pet profiles, ownership scoping and the vaccine checklist.

use axum::body::Body;
use axum::http::{Response, StatusCode};
use serde_json::{json, Value};

mod common;
use common::{body_json, create_test_app, empty_request, json_request, send, token_for};

fn vaccines() -> Value {
    json!([
        {
            "id": "v8",
            "name": "V8",
            "description": "Polyvalent",
            "ageRecommendation": "6 weeks",
            "frequency": "yearly",
            "priority": "essential"
        },
        {
            "id": "rabies",
            "name": "Rabies",
            "description": "Required by law",
            "ageRecommendation": "12 weeks",
            "frequency": "yearly",
            "priority": "essential",
            "applied": true
        }
    ])
}

async fn create_pet(app: &axum::Router, token: &str, name: &str) -> Value {
    let response = send(
        app,
        json_request(
            "POST",
            "/api/pets",
            Some(token),
            json!({ "name": name, "species": "dog", "age": 3, "weight": 11.2 }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await
}

async fn put_vaccines(app: &axum::Router, token: &str, pet_id: &str) -> Response<Body> {
    let uri = format!("/api/pets/{pet_id}/vaccines");
    send(app, json_request("PUT", &uri, Some(token), vaccines())).await
}

#[tokio::test]
async fn test_create_and_list_own_pets() {
    let (app, state) = create_test_app();
    let alice = token_for(&state, "alice");
    let bob = token_for(&state, "bob");

    let pet = create_pet(&app, &alice, "Rex").await;
    assert_eq!(pet["owner_id"], "alice");
    assert_eq!(pet["vaccines"], json!([]));
    create_pet(&app, &bob, "Mia").await;

    let response = send(&app, empty_request("GET", "/api/pets", Some(&alice))).await;
    let pets = body_json(response).await;
    let names: Vec<&str> = pets
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Rex"]);
}

#[tokio::test]
async fn test_create_pet_validates() {
    let (app, state) = create_test_app();
    let token = token_for(&state, "alice");

    let response = send(
        &app,
        json_request(
            "POST",
            "/api/pets",
            Some(&token),
            json!({ "name": "", "species": "dog" }),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_replace_vaccines_is_idempotent() {
    let (app, state) = create_test_app();
    let token = token_for(&state, "alice");
    let pet = create_pet(&app, &token, "Rex").await;
    let pet_id = pet["id"].as_str().unwrap();

    let first = body_json(put_vaccines(&app, &token, pet_id).await).await;
    let second = body_json(put_vaccines(&app, &token, pet_id).await).await;

    assert_eq!(first["vaccines"], second["vaccines"]);
    assert_eq!(first["vaccines"][0]["applied"], false);
    assert_eq!(first["vaccines"][1]["applied"], true);
    assert_eq!(first["vaccines"][1]["ageRecommendation"], "12 weeks");
}

#[tokio::test]
async fn test_other_owner_gets_404_and_list_is_unchanged() {
    let (app, state) = create_test_app();
    let alice = token_for(&state, "alice");
    let bob = token_for(&state, "bob");
    let pet = create_pet(&app, &alice, "Rex").await;
    let pet_id = pet["id"].as_str().unwrap();

    let response = put_vaccines(&app, &bob, pet_id).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(
        &app,
        empty_request(
            "PATCH",
            &format!("/api/pets/{pet_id}/vaccines/v8?applied=true"),
            Some(&bob),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let stored = state.db.get_pet(pet_id).await.unwrap().unwrap();
    assert!(stored.vaccines.is_empty());
}

#[tokio::test]
async fn test_unknown_pet_is_404() {
    let (app, state) = create_test_app();
    let token = token_for(&state, "alice");

    let response = put_vaccines(&app, &token, "does-not-exist").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["details"], "Pet not found");
}

#[tokio::test]
async fn test_toggle_vaccine() {
    let (app, state) = create_test_app();
    let token = token_for(&state, "alice");
    let pet = create_pet(&app, &token, "Rex").await;
    let pet_id = pet["id"].as_str().unwrap();
    put_vaccines(&app, &token, pet_id).await;

    let response = send(
        &app,
        empty_request(
            "PATCH",
            &format!("/api/pets/{pet_id}/vaccines/v8?applied=true"),
            Some(&token),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated["vaccines"][0]["applied"], true);
    assert_eq!(updated["vaccines"][1]["applied"], true);

    let response = send(
        &app,
        empty_request(
            "PATCH",
            &format!("/api/pets/{pet_id}/vaccines/rabies?applied=false"),
            Some(&token),
        ),
    )
    .await;
    assert_eq!(body_json(response).await["vaccines"][1]["applied"], false);
}

#[tokio::test]
async fn test_toggle_accepts_numeric_and_word_flags() {
    let (app, state) = create_test_app();
    let token = token_for(&state, "alice");
    let pet = create_pet(&app, &token, "Rex").await;
    let pet_id = pet["id"].as_str().unwrap();
    put_vaccines(&app, &token, pet_id).await;

    for (flag, expected) in [("1", true), ("off", false), ("yes", true), ("0", false)] {
        let response = send(
            &app,
            empty_request(
                "PATCH",
                &format!("/api/pets/{pet_id}/vaccines/v8?applied={flag}"),
                Some(&token),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK, "applied={flag}");
        let updated = body_json(response).await;
        assert_eq!(updated["vaccines"][0]["applied"], expected);
    }
}

#[tokio::test]
async fn test_toggle_unknown_vaccine_is_silent_noop() {
    let (app, state) = create_test_app();
    let token = token_for(&state, "alice");
    let pet = create_pet(&app, &token, "Rex").await;
    let pet_id = pet["id"].as_str().unwrap();
    let before = body_json(put_vaccines(&app, &token, pet_id).await).await;

    let response = send(
        &app,
        empty_request(
            "PATCH",
            &format!("/api/pets/{pet_id}/vaccines/missing?applied=true"),
            Some(&token),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["vaccines"], before["vaccines"]);
}

#[tokio::test]
async fn test_toggle_requires_applied_flag() {
    let (app, state) = create_test_app();
    let token = token_for(&state, "alice");
    let pet = create_pet(&app, &token, "Rex").await;

    let response = send(
        &app,
        empty_request(
            "PATCH",
            &format!("/api/pets/{}/vaccines/v8", pet["id"].as_str().unwrap()),
            Some(&token),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
