//! Typed client for the HTTP API.
//!
//! Holds the same state the browser client keeps: the session (token and
//! signed-in account) and the last fetched feed. Mutating calls re-fetch the
//! feed afterwards so the cached list reflects the server.

use reqwest::{multipart, Method, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::json;

use crate::{
    data_formats::{
        AccountResponse, AuthWrapper, FollowResponse, IsFollowingResponse, LoginRequest,
        PostResponse, ProfileWrapper, SignupRequest,
    },
    errors::RequestErrorJson,
    media::ImageUpload,
};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("not logged in")]
    NotLoggedIn,
    #[error("Please add content or image")]
    EmptyPost,
    #[error("comment text is blank")]
    EmptyComment,
    #[error("{message} (status {status})")]
    Api { status: u16, message: String },
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub user: AccountResponse,
}

/// A profile page: the profile document, its posts and the caller's follow
/// state towards it.
#[derive(Debug, Clone)]
pub struct ProfileView {
    pub profile: ProfileWrapper,
    pub is_following: bool,
    pub is_own_profile: bool,
}

impl ProfileView {
    pub fn shows_follow_button(&self) -> bool {
        !self.is_own_profile
    }
}

pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
    session: Option<Session>,
    feed: Vec<PostResponse>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        ApiClient {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
            session: None,
            feed: Vec::new(),
        }
    }

    pub fn with_session(mut self, session: Session) -> Self {
        self.session = Some(session);
        self
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn current_user(&self) -> Option<&AccountResponse> {
        self.session.as_ref().map(|s| &s.user)
    }

    pub fn feed(&self) -> &[PostResponse] {
        &self.feed
    }

    // ----------------- Session -----------------

    pub async fn signup(&mut self, username: &str, email: &str, password: &str) -> ClientResult<&Session> {
        let body = SignupRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        let auth: AuthWrapper = self.send_json(Method::POST, "/auth/signup", &body, false).await?;
        Ok(self.start_session(auth))
    }

    pub async fn login(&mut self, email: &str, password: &str) -> ClientResult<&Session> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let auth: AuthWrapper = self.send_json(Method::POST, "/auth/login", &body, false).await?;
        Ok(self.start_session(auth))
    }

    pub fn logout(&mut self) {
        self.session = None;
        self.feed.clear();
    }

    fn start_session(&mut self, AuthWrapper { token, user }: AuthWrapper) -> &Session {
        tracing::debug!(user_id = %user.id, "session started");
        self.session.insert(Session { token, user })
    }

    // ----------------- Feed -----------------

    pub async fn refresh_feed(&mut self) -> ClientResult<&[PostResponse]> {
        let posts: Vec<PostResponse> = self.send_empty(Method::GET, "/posts", false).await?;
        self.feed = posts;
        Ok(&self.feed)
    }

    pub async fn create_post(&mut self, content: &str, image: Option<ImageUpload>) -> ClientResult<PostResponse> {
        if content.is_empty() && image.is_none() {
            return Err(ClientError::EmptyPost);
        }
        let mut form = multipart::Form::new().text("content", content.to_string());
        if let Some(image) = image {
            let part = multipart::Part::bytes(image.bytes)
                .file_name(image.file_name)
                .mime_str(&image.content_type)?;
            form = form.part("image", part);
        }
        let request = self.request(Method::POST, "/posts", true)?.multipart(form);
        let post: PostResponse = Self::decode(request.send().await?).await?;
        self.refresh_feed().await?;
        Ok(post)
    }

    pub async fn toggle_like(&mut self, post_id: &str) -> ClientResult<PostResponse> {
        let path = format!("/posts/{post_id}/like");
        let post: PostResponse = self.send_empty(Method::POST, &path, true).await?;
        self.refresh_feed().await?;
        Ok(post)
    }

    /// Blank comments are refused without a request; anything else is sent
    /// exactly as typed.
    pub async fn comment(&mut self, post_id: &str, text: &str) -> ClientResult<PostResponse> {
        if text.trim().is_empty() {
            return Err(ClientError::EmptyComment);
        }
        let path = format!("/posts/{post_id}/comment");
        let post: PostResponse = self
            .send_json(Method::POST, &path, &json!({ "text": text }), true)
            .await?;
        self.refresh_feed().await?;
        Ok(post)
    }

    // ----------------- Profiles -----------------

    pub async fn profile(&self, user_id: &str) -> ClientResult<ProfileView> {
        let profile: ProfileWrapper = self
            .send_empty(Method::GET, &format!("/users/{user_id}"), false)
            .await?;
        let is_own_profile = self.current_user().map(|u| u.id == user_id).unwrap_or(false);
        let is_following = if is_own_profile || !self.is_authenticated() {
            false
        } else {
            self.is_following(user_id).await?
        };
        Ok(ProfileView {
            profile,
            is_following,
            is_own_profile,
        })
    }

    pub async fn is_following(&self, user_id: &str) -> ClientResult<bool> {
        let path = format!("/users/{user_id}/is-following");
        let response: IsFollowingResponse = self.send_empty(Method::GET, &path, true).await?;
        Ok(response.is_following)
    }

    pub async fn toggle_follow(&self, user_id: &str) -> ClientResult<FollowResponse> {
        self.send_empty(Method::POST, &format!("/users/{user_id}/follow"), true)
            .await
    }

    /// Toggles the follow edge from a profile page and folds the new state
    /// and follower count into the view.
    pub async fn toggle_follow_from_profile(&self, view: &mut ProfileView) -> ClientResult<()> {
        let response = self.toggle_follow(&view.profile.user.id).await?;
        view.is_following = response.is_following;
        view.profile.user.followers_count = response.followers_count;
        Ok(())
    }

    // ----------------- Transport -----------------

    fn request(&self, method: Method, path: &str, authenticated: bool) -> ClientResult<RequestBuilder> {
        let builder = self.http.request(method, format!("{}{}", self.base_url, path));
        if !authenticated {
            return Ok(builder);
        }
        match &self.session {
            Some(session) => Ok(builder.bearer_auth(&session.token)),
            None => Err(ClientError::NotLoggedIn),
        }
    }

    async fn send_empty<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        authenticated: bool,
    ) -> ClientResult<T> {
        let response = self.request(method, path, authenticated)?.send().await?;
        Self::decode(response).await
    }

    async fn send_json<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
        authenticated: bool,
    ) -> ClientResult<T> {
        let response = self
            .request(method, path, authenticated)?
            .json(body)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }
        let message = match response.json::<RequestErrorJson>().await {
            Ok(body) => body.message,
            Err(_) => status.canonical_reason().unwrap_or("request failed").to_string(),
        };
        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }
}
