#![allow(dead_code)]

use std::{
    net::TcpListener,
    sync::{Arc, Mutex},
};

use chirp::{
    build_app, init_db, make_router,
    media::{ImageUpload, MediaError, MediaStore},
    serve, Services, TokenKeys,
};
use serde_json::{json, Value};

/// Keeps uploads in memory and hands back a fake https URL for each.
#[derive(Default)]
pub struct FakeMediaStore {
    pub uploads: Mutex<Vec<(String, ImageUpload)>>,
}

#[axum::async_trait]
impl MediaStore for FakeMediaStore {
    async fn upload(&self, image: ImageUpload, folder: &str) -> Result<String, MediaError> {
        let mut uploads = self.uploads.lock().unwrap();
        let url = format!("https://media.test/{}/{}", folder, uploads.len());
        uploads.push((folder.to_string(), image));
        Ok(url)
    }
}

pub struct TestApp {
    pub address: String,
    pub http: reqwest::Client,
    pub media: Arc<FakeMediaStore>,
}

pub struct TestUser {
    pub id: String,
    pub username: String,
    pub token: String,
}

pub async fn spawn_app() -> TestApp {
    let db_path = std::env::temp_dir().join(format!("chirp-test-{}.db", uuid::Uuid::new_v4()));
    let db_url = format!("sqlite://{}", db_path.display());
    let db = init_db(&db_url).await.expect("failed to init test database");

    let media = Arc::new(FakeMediaStore::default());
    let services = Services {
        db: Arc::new(db),
        keys: Arc::new(TokenKeys::new("test-secret", 1)),
        media: media.clone(),
        max_upload_bytes: 1024 * 1024,
    };
    let app = build_app(make_router(), services);

    let listener = TcpListener::bind("127.0.0.1:0").expect("failed to bind");
    let address = format!("http://{}", listener.local_addr().unwrap());
    tokio::spawn(async move {
        serve(listener, app).await.expect("server crashed");
    });

    TestApp {
        address,
        http: reqwest::Client::new(),
        media,
    }
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub async fn signup(&self, username: &str) -> TestUser {
        let response = self
            .http
            .post(self.url("/auth/signup"))
            .json(&json!({
                "username": username,
                "email": format!("{username}@example.com"),
                "password": "password123",
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 201);
        let body: Value = response.json().await.unwrap();
        TestUser {
            id: body["user"]["id"].as_str().unwrap().to_string(),
            username: username.to_string(),
            token: body["token"].as_str().unwrap().to_string(),
        }
    }

    pub async fn create_text_post(&self, user: &TestUser, content: &str) -> reqwest::Response {
        let form = reqwest::multipart::Form::new().text("content", content.to_string());
        self.http
            .post(self.url("/posts"))
            .bearer_auth(&user.token)
            .multipart(form)
            .send()
            .await
            .unwrap()
    }

    pub async fn like(&self, user: &TestUser, post_id: &str) -> reqwest::Response {
        self.http
            .post(self.url(&format!("/posts/{post_id}/like")))
            .bearer_auth(&user.token)
            .send()
            .await
            .unwrap()
    }

    pub async fn follow(&self, user: &TestUser, target_id: &str) -> reqwest::Response {
        self.http
            .post(self.url(&format!("/users/{target_id}/follow")))
            .bearer_auth(&user.token)
            .send()
            .await
            .unwrap()
    }

    pub async fn profile(&self, user_id: &str) -> reqwest::Response {
        self.http
            .get(self.url(&format!("/users/{user_id}")))
            .send()
            .await
            .unwrap()
    }
}
