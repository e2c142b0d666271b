/// Post API handlers
use actix_web::{delete, get, patch, post, web, HttpResponse};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ActionResponse, AppState};
use crate::error::Result;
use crate::middleware::Viewer;
use crate::models::{PostChanges, Share};

#[derive(Debug, Deserialize)]
pub struct ListPostsQuery {
    pub author_id: Option<Uuid>,
    pub limit: Option<u32>,
    #[serde(default)]
    pub offset: u32,
}

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub title: Option<String>,
    pub content: String,
    pub media_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub media_type: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SharePostRequest {
    pub caption: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ShareResponse {
    pub share: Share,
    pub created: bool,
}

#[get("/posts")]
pub async fn list_posts(
    state: web::Data<AppState>,
    viewer: Viewer,
    query: web::Query<ListPostsQuery>,
) -> Result<HttpResponse> {
    let limit = state.page_limit(query.limit);
    let posts = state
        .posts
        .list_posts(query.author_id, limit, query.offset as usize)
        .await?;
    let views = state.engagement.post_views(posts, viewer.id()).await?;
    Ok(HttpResponse::Ok().json(views))
}

#[post("/posts")]
pub async fn create_post(
    state: web::Data<AppState>,
    viewer: Viewer,
    body: web::Json<CreatePostRequest>,
) -> Result<HttpResponse> {
    let body = body.into_inner();
    let post = state
        .posts
        .create_post(viewer.id(), body.title, body.content, body.media_type)
        .await?;
    let view = state.engagement.post_view(post, viewer.id()).await?;
    Ok(HttpResponse::Created().json(view))
}

#[get("/posts/{post_id}")]
pub async fn get_post(
    state: web::Data<AppState>,
    viewer: Viewer,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let post = state.posts.get_post(path.into_inner()).await?;
    let view = state.engagement.post_view(post, viewer.id()).await?;
    Ok(HttpResponse::Ok().json(view))
}

#[patch("/posts/{post_id}")]
pub async fn update_post(
    state: web::Data<AppState>,
    viewer: Viewer,
    path: web::Path<Uuid>,
    body: web::Json<UpdatePostRequest>,
) -> Result<HttpResponse> {
    let body = body.into_inner();
    let changes = PostChanges {
        title: body.title,
        content: body.content,
        media_type: body.media_type,
    };
    let post = state
        .posts
        .update_post(viewer.id(), path.into_inner(), changes)
        .await?;
    let view = state.engagement.post_view(post, viewer.id()).await?;
    Ok(HttpResponse::Ok().json(view))
}

#[delete("/posts/{post_id}")]
pub async fn delete_post(
    state: web::Data<AppState>,
    viewer: Viewer,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    state.posts.delete_post(viewer.id(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ActionResponse::new("Post deleted successfully", true)))
}

#[post("/posts/{post_id}/like")]
pub async fn like_post(
    state: web::Data<AppState>,
    viewer: Viewer,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let created = state.social.like_post(viewer.id(), path.into_inner()).await?;
    let message = if created {
        "Post liked successfully"
    } else {
        "Post already liked"
    };
    Ok(HttpResponse::Ok().json(ActionResponse::new(message, created)))
}

#[delete("/posts/{post_id}/like")]
pub async fn unlike_post(
    state: web::Data<AppState>,
    viewer: Viewer,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let removed = state
        .social
        .unlike_post(viewer.id(), path.into_inner())
        .await?;
    let message = if removed {
        "Post unliked successfully"
    } else {
        "Post was not liked"
    };
    Ok(HttpResponse::Ok().json(ActionResponse::new(message, removed)))
}

#[post("/posts/{post_id}/share")]
pub async fn share_post(
    state: web::Data<AppState>,
    viewer: Viewer,
    path: web::Path<Uuid>,
    body: Option<web::Json<SharePostRequest>>,
) -> Result<HttpResponse> {
    let caption = body.and_then(|b| b.into_inner().caption);
    let (share, created) = state
        .social
        .share_post(viewer.id(), path.into_inner(), caption)
        .await?;
    Ok(HttpResponse::Ok().json(ShareResponse { share, created }))
}
