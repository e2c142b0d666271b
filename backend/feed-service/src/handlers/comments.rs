use actix_web::{delete, get, post, web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use super::{ActionResponse, AppState};
use crate::error::Result;
use crate::middleware::Viewer;

#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    pub content: String,
    pub parent_comment_id: Option<Uuid>,
}

#[get("/posts/{post_id}/comments")]
pub async fn list_post_comments(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let comments = state.posts.post_comments(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(comments))
}

#[post("/posts/{post_id}/comments")]
pub async fn create_comment(
    state: web::Data<AppState>,
    viewer: Viewer,
    path: web::Path<Uuid>,
    body: web::Json<CreateCommentRequest>,
) -> Result<HttpResponse> {
    let body = body.into_inner();
    let comment = state
        .posts
        .create_comment(
            viewer.id(),
            path.into_inner(),
            body.content,
            body.parent_comment_id,
        )
        .await?;
    Ok(HttpResponse::Created().json(comment))
}

#[delete("/comments/{comment_id}")]
pub async fn delete_comment(
    state: web::Data<AppState>,
    viewer: Viewer,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    state
        .posts
        .delete_comment(viewer.id(), path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ActionResponse::new("Comment deleted successfully", true)))
}

#[get("/comments/{comment_id}/replies")]
pub async fn list_replies(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let replies = state.posts.comment_replies(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(replies))
}
