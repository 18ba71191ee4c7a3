use std::sync::Arc;

use axum::{
    extract::{Multipart, Path},
    http::{StatusCode, Uri},
    Extension, Json,
};
use sqlx::SqlitePool;
use tracing::info;

use crate::{
    authentication::{hash_password_argon2, verify_password_argon2, AuthUser, TokenKeys},
    data_formats::{
        AccountResponse, AuthWrapper, CommentRequest, FollowResponse, IsFollowingResponse,
        LoginRequest, NewPostForm, PostResponse, ProfileResponse, ProfileWrapper, SignupRequest,
    },
    db_helpers::{
        get_post_by_id, get_user_by_email, get_user_by_id, insert_post, insert_user,
        is_unique_violation, list_latest_posts, list_posts_by_author, save_post_engagement,
        save_user_relationships, FEED_LIMIT,
    },
    errors::{RequestError, RequestErrorJson},
    media::{MediaStore, POST_IMAGE_FOLDER},
    models::{new_id, toggle_follow, Post, User},
    JsonResponse,
};

type JsonResult<T> = Result<Json<T>, RequestError>;
type CreatedResult<T> = Result<JsonResponse<T>, RequestError>;

// ----------------- Helper Handlers -----------------
pub async fn alive() -> &'static str {
    "alive"
}

pub async fn not_found(uri: Uri) -> JsonResponse<RequestErrorJson> {
    (
        StatusCode::NOT_FOUND,
        Json(RequestErrorJson {
            message: format!("URL {} provided was not found", uri),
            error: None,
        }),
    )
}

// ----------------- Auth Handlers -----------------
pub async fn signup(
    Extension(pool): Extension<Arc<SqlitePool>>,
    Extension(keys): Extension<Arc<TokenKeys>>,
    Json(request): Json<SignupRequest>,
) -> CreatedResult<AuthWrapper> {
    let SignupRequest {
        username,
        email,
        password,
    } = request;
    if username.trim().is_empty() || email.trim().is_empty() || password.is_empty() {
        return Err(RequestError::BadRequest(
            "Username, email and password are required",
        ));
    }

    let user = User {
        id: new_id(),
        username: username.trim().to_string(),
        email: email.trim().to_lowercase(),
        password: hash_password_argon2(password).await?,
        followers: Vec::new(),
        following: Vec::new(),
        created_at: chrono::Utc::now(),
    };

    insert_user(&pool, &user).await.map_err(|e| match e {
        RequestError::DatabaseError(ref db) if is_unique_violation(db) => {
            RequestError::BadRequest("User already exists")
        }
        e => e,
    })?;
    info!(user_id = %user.id, username = %user.username, "user signed up");

    let token = keys.issue(&user.id, &user.username)?;
    Ok((
        StatusCode::CREATED,
        Json(AuthWrapper {
            token,
            user: AccountResponse::new(user),
        }),
    ))
}

pub async fn login(
    Extension(pool): Extension<Arc<SqlitePool>>,
    Extension(keys): Extension<Arc<TokenKeys>>,
    Json(request): Json<LoginRequest>,
) -> JsonResult<AuthWrapper> {
    let email = request.email.trim().to_lowercase();
    let user = match get_user_by_email(&pool, &email).await? {
        Some(user) => user,
        None => return Err(RequestError::BadRequest("Invalid credentials")),
    };

    if !verify_password_argon2(request.password, &user.password).await? {
        return Err(RequestError::BadRequest("Invalid credentials"));
    }

    let token = keys.issue(&user.id, &user.username)?;
    Ok(Json(AuthWrapper {
        token,
        user: AccountResponse::new(user),
    }))
}

pub async fn get_current_user(
    Extension(pool): Extension<Arc<SqlitePool>>,
    caller: AuthUser,
) -> JsonResult<AccountResponse> {
    match get_user_by_id(&pool, &caller.id).await? {
        Some(user) => Ok(Json(AccountResponse::new(user))),
        None => Err(RequestError::NotFound("User not found")),
    }
}

// ----------------- Post Handlers -----------------
pub async fn list_posts(
    Extension(pool): Extension<Arc<SqlitePool>>,
) -> JsonResult<Vec<PostResponse>> {
    let posts = list_latest_posts(&pool, FEED_LIMIT).await?;
    Ok(Json(posts.into_iter().map(PostResponse::from).collect()))
}

pub async fn create_post(
    Extension(pool): Extension<Arc<SqlitePool>>,
    Extension(media): Extension<Arc<dyn MediaStore>>,
    caller: AuthUser,
    multipart: Multipart,
) -> CreatedResult<PostResponse> {
    let NewPostForm { content, image } = NewPostForm::from_multipart(multipart).await?;
    if content.is_empty() && image.is_none() {
        return Err(RequestError::BadRequest("Post must have content or image"));
    }

    // An image uploaded here stays on the media host even if the insert
    // below fails.
    let image_url = match image {
        Some(image) => media.upload(image, POST_IMAGE_FOLDER).await?,
        None => String::new(),
    };
    if content.is_empty() && image_url.is_empty() {
        return Err(RequestError::BadRequest("Post must have content or image"));
    }

    let post = Post::new(&caller.id, &caller.username, content, image_url);
    insert_post(&pool, &post).await?;
    info!(post_id = %post.id, user_id = %caller.id, "post created");

    Ok((StatusCode::CREATED, Json(PostResponse::from(post))))
}

pub async fn like_post(
    Extension(pool): Extension<Arc<SqlitePool>>,
    caller: AuthUser,
    Path(post_id): Path<String>,
) -> JsonResult<PostResponse> {
    let mut post = match get_post_by_id(&pool, &post_id).await? {
        Some(post) => post,
        None => return Err(RequestError::NotFound("Post not found")),
    };

    let liked = post.toggle_like(&caller.id, &caller.username);
    save_post_engagement(&pool, &post).await?;
    info!(post_id = %post.id, user_id = %caller.id, liked, "like toggled");

    Ok(Json(PostResponse::from(post)))
}

pub async fn comment_on_post(
    Extension(pool): Extension<Arc<SqlitePool>>,
    caller: AuthUser,
    Path(post_id): Path<String>,
    Json(CommentRequest { text }): Json<CommentRequest>,
) -> JsonResult<PostResponse> {
    let text = text.ok_or(RequestError::BadRequest("Comment text is required"))?;
    let mut post = match get_post_by_id(&pool, &post_id).await? {
        Some(post) => post,
        None => return Err(RequestError::NotFound("Post not found")),
    };

    let comment_id = post.add_comment(&caller.id, &caller.username, text).id.clone();
    save_post_engagement(&pool, &post).await?;
    info!(post_id = %post.id, %comment_id, user_id = %caller.id, "comment added");

    Ok(Json(PostResponse::from(post)))
}

// ----------------- Profile Handlers -----------------
pub async fn get_profile(
    Extension(pool): Extension<Arc<SqlitePool>>,
    Path(user_id): Path<String>,
) -> JsonResult<ProfileWrapper> {
    let user = match get_user_by_id(&pool, &user_id).await? {
        Some(user) => user,
        None => return Err(RequestError::NotFound("User not found")),
    };
    let posts = list_posts_by_author(&pool, &user.id).await?;

    Ok(Json(ProfileWrapper {
        user: ProfileResponse::new(user),
        posts: posts.into_iter().map(PostResponse::from).collect(),
    }))
}

pub async fn follow_user(
    Extension(pool): Extension<Arc<SqlitePool>>,
    caller: AuthUser,
    Path(user_id): Path<String>,
) -> JsonResult<FollowResponse> {
    if user_id == caller.id {
        return Err(RequestError::BadRequest("Cannot follow yourself"));
    }

    let mut target = match get_user_by_id(&pool, &user_id).await? {
        Some(user) => user,
        None => return Err(RequestError::NotFound("User not found")),
    };
    let mut current = match get_user_by_id(&pool, &caller.id).await? {
        Some(user) => user,
        None => return Err(RequestError::NotFound("User not found")),
    };

    let is_following = toggle_follow(&mut current, &mut target);

    // Two separate saves: if the second one fails the edge is left one-sided.
    save_user_relationships(&pool, &current).await?;
    save_user_relationships(&pool, &target).await?;
    info!(follower = %current.id, followed = %target.id, is_following, "follow toggled");

    Ok(Json(FollowResponse {
        is_following,
        followers_count: target.followers.len(),
    }))
}

pub async fn is_following(
    Extension(pool): Extension<Arc<SqlitePool>>,
    caller: AuthUser,
    Path(user_id): Path<String>,
) -> JsonResult<IsFollowingResponse> {
    let current = match get_user_by_id(&pool, &caller.id).await? {
        Some(user) => user,
        None => return Err(RequestError::NotFound("User not found")),
    };
    Ok(Json(IsFollowingResponse {
        is_following: current.is_following(&user_id),
    }))
}
