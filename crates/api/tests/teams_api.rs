//! HTTP-level tests for teams and their blog posts.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete, get, location, post_json, put_json, Actor};
use sqlx::PgPool;

async fn create_team(pool: &PgPool, actor: &Actor, body: serde_json::Value) -> serde_json::Value {
    let response = post_json(common::build_test_app(pool.clone()), "/api/v1/teams", actor, body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

// ---------------------------------------------------------------------------
// Slugs
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn same_name_three_times_gets_qualified_slugs(pool: PgPool) {
    let mut slugs = Vec::new();
    for _ in 0..3 {
        let team = create_team(
            &pool,
            &Actor::user(),
            serde_json::json!({"name": "Annoyed QA Team"}),
        )
        .await;
        slugs.push(team["canonical_slug_name"].as_str().unwrap().to_string());
    }
    assert_eq!(
        slugs,
        vec!["annoyed-qa-team", "annoyed-qa-team-2", "annoyed-qa-team-3"]
    );

    let response = get(
        common::build_test_app(pool),
        "/api/v1/teams/annoyed-qa-team-3",
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn reserved_name_is_qualified(pool: PgPool) {
    let team = create_team(&pool, &Actor::user(), serde_json::json!({"name": "Register"})).await;
    assert_eq!(team["canonical_slug_name"], "register-2");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn rename_redirects_old_slug(pool: PgPool) {
    let founder = Actor::user();
    let team = create_team(&pool, &founder, serde_json::json!({"name": "Bug Hunters"})).await;
    let id = team["id"].as_str().unwrap();

    let response = put_json(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/teams/{id}"),
        &founder,
        serde_json::json!({"name": "Bug Squashers", "motto": "No bug left behind"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let edited = body_json(response).await["data"].clone();
    assert_eq!(edited["canonical_slug_name"], "bug-squashers");
    assert_eq!(edited["motto"]["en"], "No bug left behind");

    let response = get(common::build_test_app(pool), "/api/v1/teams/bug-hunters").await;
    assert_eq!(response.status(), StatusCode::PERMANENT_REDIRECT);
    assert_eq!(location(&response), "/api/v1/teams/bug-squashers");
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn deleted_team_is_gone_by_slug_and_id(pool: PgPool) {
    let founder = Actor::user();
    let team = create_team(&pool, &founder, serde_json::json!({"name": "Short Lived"})).await;
    let id = team["id"].as_str().unwrap();

    let response = delete(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/teams/{id}"),
        &Actor::user(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = delete(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/teams/{id}"),
        &founder,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    for uri in [
        "/api/v1/teams/short-lived".to_string(),
        format!("/api/v1/teams/{id}"),
    ] {
        let response = get(common::build_test_app(pool.clone()), &uri).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{uri}");
    }
}

// ---------------------------------------------------------------------------
// Blog posts
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn only_moderators_can_blog_when_restricted(pool: PgPool) {
    let founder = Actor::user();
    let team = create_team(
        &pool,
        &founder,
        serde_json::json!({"name": "Closed Shop", "only_mods_can_blog": true}),
    )
    .await;
    let posts_uri = format!("/api/v1/teams/{}/posts", team["id"].as_str().unwrap());
    let post = serde_json::json!({"title": "Hello", "post": "First post"});

    let response = post_json(
        common::build_test_app(pool.clone()),
        &posts_uri,
        &Actor::user(),
        post.clone(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = post_json(common::build_test_app(pool.clone()), &posts_uri, &founder, post).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await["data"].clone();
    assert_eq!(created["post"]["team_id"], team["id"]);
    assert_eq!(created["team"]["id"], team["id"]);

    let response = get(common::build_test_app(pool), &posts_uri).await;
    assert_eq!(body_json(response).await["data"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn moderator_can_delete_members_post(pool: PgPool) {
    let founder = Actor::user();
    let member = Actor::user();
    let team = create_team(&pool, &founder, serde_json::json!({"name": "Open Blog"})).await;
    let posts_uri = format!("/api/v1/teams/{}/posts", team["id"].as_str().unwrap());

    let response = post_json(
        common::build_test_app(pool.clone()),
        &posts_uri,
        &member,
        serde_json::json!({"title": "Hi", "post": "From a member"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let post_id = body_json(response).await["data"]["post"]["id"]
        .as_str()
        .unwrap()
        .to_string();
    let post_uri = format!("/api/v1/posts/{post_id}");

    let response = get(common::build_test_app(pool.clone()), &post_uri).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["team"]["id"], team["id"]);

    let response = delete(common::build_test_app(pool.clone()), &post_uri, &Actor::user()).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = delete(common::build_test_app(pool.clone()), &post_uri, &founder).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get(common::build_test_app(pool), &post_uri).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn post_of_deleted_team_is_not_found(pool: PgPool) {
    let founder = Actor::user();
    let team = create_team(&pool, &founder, serde_json::json!({"name": "Vanishing"})).await;
    let team_id = team["id"].as_str().unwrap();

    let response = post_json(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/teams/{team_id}/posts"),
        &founder,
        serde_json::json!({"title": "Bye", "post": "Last words"}),
    )
    .await;
    let post_id = body_json(response).await["data"]["post"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let response = delete(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/teams/{team_id}"),
        &founder,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get(common::build_test_app(pool), &format!("/api/v1/posts/{post_id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
