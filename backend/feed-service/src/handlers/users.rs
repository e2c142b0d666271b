use actix_web::{delete, get, post, web, HttpResponse};
use uuid::Uuid;

use super::{ActionResponse, AppState};
use crate::error::Result;
use crate::middleware::Viewer;

#[get("/users/{user_id}/stats")]
pub async fn get_user_stats(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let stats = state.engagement.user_stats(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(stats))
}

#[post("/users/{user_id}/follow")]
pub async fn follow_user(
    state: web::Data<AppState>,
    viewer: Viewer,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let created = state
        .social
        .follow_user(viewer.id(), path.into_inner())
        .await?;
    let message = if created {
        "Now following user"
    } else {
        "Already following user"
    };
    Ok(HttpResponse::Ok().json(ActionResponse::new(message, created)))
}

#[delete("/users/{user_id}/follow")]
pub async fn unfollow_user(
    state: web::Data<AppState>,
    viewer: Viewer,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let removed = state
        .social
        .unfollow_user(viewer.id(), path.into_inner())
        .await?;
    let message = if removed {
        "Unfollowed user"
    } else {
        "Was not following user"
    };
    Ok(HttpResponse::Ok().json(ActionResponse::new(message, removed)))
}
