mod common;

use common::spawn_app;
use serde_json::Value;

#[tokio::test]
async fn self_follow_is_rejected_without_mutation() {
    let app = spawn_app().await;
    let alice = app.signup("alice").await;

    let response = app.follow(&alice, &alice.id).await;
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Cannot follow yourself");

    let profile: Value = app.profile(&alice.id).await.json().await.unwrap();
    assert_eq!(profile["user"]["followersCount"], 0);
    assert_eq!(profile["user"]["followingCount"], 0);
}

#[tokio::test]
async fn follow_shows_up_in_profile_counts() {
    let app = spawn_app().await;
    let alice = app.signup("alice").await;
    let bob = app.signup("bob").await;

    let response = app.follow(&bob, &alice.id).await;
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["isFollowing"], true);
    assert_eq!(body["followersCount"], 1);

    let alice_profile: Value = app.profile(&alice.id).await.json().await.unwrap();
    assert_eq!(alice_profile["user"]["followersCount"], 1);
    assert_eq!(alice_profile["user"]["followingCount"], 0);

    let bob_profile: Value = app.profile(&bob.id).await.json().await.unwrap();
    assert_eq!(bob_profile["user"]["followingCount"], 1);
}

#[tokio::test]
async fn follow_toggle_reverts_and_is_following_tracks_it() {
    let app = spawn_app().await;
    let alice = app.signup("alice").await;
    let bob = app.signup("bob").await;
    let check = |token: String| {
        let http = app.http.clone();
        let url = app.url(&format!("/users/{}/is-following", alice.id));
        async move {
            let body: Value = http
                .get(url)
                .bearer_auth(token)
                .send()
                .await
                .unwrap()
                .json()
                .await
                .unwrap();
            body["isFollowing"].as_bool().unwrap()
        }
    };

    assert!(!check(bob.token.clone()).await);
    app.follow(&bob, &alice.id).await;
    assert!(check(bob.token.clone()).await);

    let body: Value = app.follow(&bob, &alice.id).await.json().await.unwrap();
    assert_eq!(body["isFollowing"], false);
    assert_eq!(body["followersCount"], 0);
    assert!(!check(bob.token.clone()).await);
}

#[tokio::test]
async fn following_unknown_user_is_not_found() {
    let app = spawn_app().await;
    let bob = app.signup("bob").await;
    let response = app.follow(&bob, "missing").await;
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn profile_lists_own_posts_newest_first_without_credentials() {
    let app = spawn_app().await;
    let alice = app.signup("alice").await;
    let bob = app.signup("bob").await;
    app.create_text_post(&alice, "one").await;
    app.create_text_post(&bob, "not mine").await;
    app.create_text_post(&alice, "two").await;

    let response = app.profile(&alice.id).await;
    assert_eq!(response.status(), 200);
    let profile: Value = response.json().await.unwrap();
    assert_eq!(profile["user"]["username"], "alice");
    assert!(profile["user"].get("password").is_none());
    let posts = profile["posts"].as_array().unwrap();
    assert_eq!(posts.len(), 2);
    assert_eq!(posts[0]["content"], "two");
    assert_eq!(posts[1]["content"], "one");
}

#[tokio::test]
async fn unknown_profile_is_not_found() {
    let app = spawn_app().await;
    let response = app.profile("missing").await;
    assert_eq!(response.status(), 404);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "User not found");
}
