//! HTTP-level integration tests for the `/api/images` endpoints.

mod common;

use axum::http::StatusCode;
use captionary_db::GalleryStore;
use common::{body_json, get, post_json, post_raw_json, register_and_login};
use serde_json::json;

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

#[tokio::test]
async fn list_returns_seeded_images_with_empty_captions() {
    let test = common::build_test_app().await;

    let response = get(test.app(), "/api/images").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let images = json.as_array().expect("listing should be a JSON array");
    assert_eq!(images.len(), 5);
    for (index, image) in images.iter().enumerate() {
        assert_eq!(image["id"], index as i64 + 1);
        assert!(image["url"].as_str().unwrap().starts_with("https://"));
        assert_eq!(image["captions"], json!([]));
    }
}

#[tokio::test]
async fn get_missing_or_non_numeric_image_is_404() {
    let test = common::build_test_app().await;

    let response = get(test.app(), "/api/images/99").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
    assert!(json["error"].is_string());

    let response = get(test.app(), "/api/images/abc").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Caption creation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn caption_is_created_and_visible_in_later_reads() {
    let test = common::build_test_app().await;
    let cookie = register_and_login(&test, "alice").await;
    let alice = test
        .store
        .find_user_by_user_name("alice")
        .await
        .unwrap()
        .unwrap();

    // Prime both cache entries so the write has something to invalidate.
    get(test.app(), "/api/images").await;
    get(test.app(), "/api/images/3").await;

    let response = post_json(
        test.app(),
        "/api/images/3/captions",
        json!({ "text": "lol" }),
        Some(&cookie),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert!(created["id"].is_number());
    assert_eq!(created["text"], "lol");
    assert_eq!(created["imageId"], 3);
    assert_eq!(created["user"]["id"], alice.id);
    assert_eq!(created["user"]["userName"], "alice");
    assert!(created["user"].get("email").is_none());
    assert!(created["user"].get("passwordHash").is_none());

    let image = body_json(get(test.app(), "/api/images/3").await).await;
    let captions = image["captions"].as_array().unwrap();
    assert_eq!(captions.len(), 1);
    assert_eq!(captions[0]["text"], "lol");
    assert_eq!(captions[0]["user"]["id"], alice.id);

    let listing = body_json(get(test.app(), "/api/images").await).await;
    assert_eq!(listing[2]["captions"].as_array().unwrap().len(), 1);
    assert_eq!(listing[0]["captions"], json!([]));
}

#[tokio::test]
async fn caption_without_session_is_401_and_creates_nothing() {
    let test = common::build_test_app().await;
    register_and_login(&test, "alice").await;

    let response = post_json(
        test.app(),
        "/api/images/3/captions",
        json!({ "text": "lol", "userId": 1 }),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], "UNAUTHORIZED");

    let response = post_json(
        test.app(),
        "/api/images/3/captions",
        json!({ "text": "lol" }),
        Some("captionary_sid=forged.00ff"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    assert!(test.store.list_captions(3).await.unwrap().is_empty());
}

#[tokio::test]
async fn client_supplied_user_id_is_ignored() {
    let test = common::build_test_app().await;
    let alice_cookie = register_and_login(&test, "alice").await;
    register_and_login(&test, "bob").await;
    let alice = test.store.find_user_by_user_name("alice").await.unwrap().unwrap();
    let bob = test.store.find_user_by_user_name("bob").await.unwrap().unwrap();

    let response = post_json(
        test.app(),
        "/api/images/1/captions",
        json!({ "text": "mine", "userId": bob.id }),
        Some(&alice_cookie),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body_json(response).await["user"]["id"], alice.id);

    let captions = test.store.list_captions(1).await.unwrap();
    assert_eq!(captions.len(), 1);
    assert_eq!(captions[0].user.id, alice.id);
}

#[tokio::test]
async fn caption_on_missing_image_is_404() {
    let test = common::build_test_app().await;
    let cookie = register_and_login(&test, "alice").await;

    let response = post_json(
        test.app(),
        "/api/images/99/captions",
        json!({ "text": "lol" }),
        Some(&cookie),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = post_json(
        test.app(),
        "/api/images/abc/captions",
        json!({ "text": "lol" }),
        Some(&cookie),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn blank_missing_or_malformed_text_is_400() {
    let test = common::build_test_app().await;
    let cookie = register_and_login(&test, "alice").await;

    for body in [json!({ "text": "   " }), json!({}), json!({ "text": "" })] {
        let response =
            post_json(test.app(), "/api/images/2/captions", body, Some(&cookie)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
    }

    let response =
        post_raw_json(test.app(), "/api/images/2/captions", "{not json", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");

    let response = post_json(
        test.app(),
        "/api/images/2/captions",
        json!({ "text": "x".repeat(1001) }),
        Some(&cookie),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    assert!(test.store.list_captions(2).await.unwrap().is_empty());
}
