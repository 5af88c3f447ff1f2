//! Comment flows under a recommendation

mod common;

use axum::http::StatusCode;
use common::*;
use serde_json::json;

async fn setup() -> (axum::Router, String, i64) {
    let app = test_app().await;
    let token = register_and_login(&app, "test_user", "test_user@gmail.com").await;
    let rec = create_recommendation(&app, &token, "Commented upon").await;
    (app, token, rec)
}

#[tokio::test]
async fn comment_lifecycle() {
    let (app, token, rec) = setup().await;

    let (status, created) = send(
        &app,
        json_request(
            "POST",
            &format!("/recommendations/{rec}/comments"),
            Some(&token),
            &json!({ "content": "Loved it" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["content"], "Loved it");
    assert_eq!(created["recommendation_id"], rec);
    assert!(created["updated"].is_null());
    let comment_id = created["id"].as_i64().unwrap();

    let (status, fetched) = send(
        &app,
        empty_request(
            "GET",
            &format!("/recommendations/{rec}/comments/{comment_id}"),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["content"], "Loved it");

    let (status, updated) = send(
        &app,
        json_request(
            "PUT",
            &format!("/recommendations/{rec}/comments/{comment_id}"),
            Some(&token),
            &json!({ "content": "Loved it even more" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["content"], "Loved it even more");
    assert!(updated["updated"].is_string());

    let (status, _) = send(
        &app,
        empty_request(
            "DELETE",
            &format!("/recommendations/{rec}/comments/{comment_id}"),
            Some(&token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(
        &app,
        empty_request(
            "GET",
            &format!("/recommendations/{rec}/comments/{comment_id}"),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn parent_recommendation_is_checked_first() {
    let (app, token, _) = setup().await;

    let (status, body) = send(
        &app,
        empty_request("GET", "/recommendations/777/comments", None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Recommendation with id 777 was not found");

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/recommendations/777/comments",
            Some(&token),
            &json!({ "content": "Into the void" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Recommendation with id 777 was not found");
}

#[tokio::test]
async fn unknown_comment_names_both_ids() {
    let (app, _, rec) = setup().await;

    let (status, body) = send(
        &app,
        empty_request("GET", &format!("/recommendations/{rec}/comments/55"), None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body["detail"],
        format!("Comment with id 55 for recommendation with id {rec} was not found")
    );
}

#[tokio::test]
async fn comment_ordering_options() {
    let (app, token, rec) = setup().await;

    for content in ["first", "second", "third"] {
        let (status, _) = send(
            &app,
            json_request(
                "POST",
                &format!("/recommendations/{rec}/comments"),
                Some(&token),
                &json!({ "content": content }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let contents = |body: &serde_json::Value| -> Vec<String> {
        body.as_array()
            .unwrap()
            .iter()
            .map(|c| c["content"].as_str().unwrap().to_string())
            .collect()
    };

    let (_, by_id) = send(
        &app,
        empty_request("GET", &format!("/recommendations/{rec}/comments"), None),
    )
    .await;
    assert_eq!(contents(&by_id), vec!["first", "second", "third"]);

    let (_, newest_first) = send(
        &app,
        empty_request(
            "GET",
            &format!("/recommendations/{rec}/comments?by_published_date_descending=true"),
            None,
        ),
    )
    .await;
    let newest = contents(&newest_first);
    assert_eq!(newest.first().map(String::as_str), Some("third"));
    assert_eq!(newest.last().map(String::as_str), Some("first"));

    let (_, limited) = send(
        &app,
        empty_request(
            "GET",
            &format!("/recommendations/{rec}/comments?limit=2"),
            None,
        ),
    )
    .await;
    assert_eq!(limited.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn pagination_bounds_are_validated() {
    let (app, _, rec) = setup().await;

    let (status, _) = send(
        &app,
        empty_request(
            "GET",
            &format!("/recommendations/{rec}/comments?limit=0"),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn only_the_author_may_edit_or_delete() {
    let (app, author, rec) = setup().await;
    let other = register_and_login(&app, "other_user", "other_user@gmail.com").await;

    let (_, created) = send(
        &app,
        json_request(
            "POST",
            &format!("/recommendations/{rec}/comments"),
            Some(&author),
            &json!({ "content": "My comment" }),
        ),
    )
    .await;
    let comment_id = created["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        json_request(
            "PUT",
            &format!("/recommendations/{rec}/comments/{comment_id}"),
            Some(&other),
            &json!({ "content": "Hijacked" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(
        body["detail"],
        format!("User has no permission to update comment with id {comment_id}")
    );

    let (status, _) = send(
        &app,
        empty_request(
            "DELETE",
            &format!("/recommendations/{rec}/comments/{comment_id}"),
            Some(&other),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Still intact.
    let (_, fetched) = send(
        &app,
        empty_request(
            "GET",
            &format!("/recommendations/{rec}/comments/{comment_id}"),
            None,
        ),
    )
    .await;
    assert_eq!(fetched["content"], "My comment");
}

#[tokio::test]
async fn commenting_requires_authentication() {
    let (app, _, rec) = setup().await;

    let (status, _) = send(
        &app,
        json_request(
            "POST",
            &format!("/recommendations/{rec}/comments"),
            None,
            &json!({ "content": "Anonymous" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
