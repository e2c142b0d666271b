/// Feed Assembler
///
/// Builds a viewer's home feed from their own posts and the posts of the
/// users they follow, newest first.
use std::sync::Arc;
use std::time::Instant;

use tracing::debug;
use uuid::Uuid;

use crate::db::{ContentStore, SocialGraph};
use crate::error::Result;
use crate::metrics::feed::observe_request;
use crate::models::Post;

#[derive(Clone)]
pub struct FeedAssembler {
    graph: Arc<dyn SocialGraph>,
    content: Arc<dyn ContentStore>,
}

impl FeedAssembler {
    pub fn new(graph: Arc<dyn SocialGraph>, content: Arc<dyn ContentStore>) -> Self {
        Self { graph, content }
    }

    /// Page `[offset, offset + limit)` of non-deleted posts by the viewer and
    /// their followees. An anonymous viewer gets an empty feed.
    pub async fn get_feed(
        &self,
        viewer: Option<Uuid>,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Post>> {
        let started = Instant::now();
        let result = self.assemble(viewer, limit, offset).await;
        observe_request("feed", result.is_ok(), started.elapsed());
        result
    }

    async fn assemble(
        &self,
        viewer: Option<Uuid>,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Post>> {
        let Some(viewer_id) = viewer else {
            debug!("anonymous feed request, returning empty feed");
            return Ok(Vec::new());
        };
        if limit == 0 {
            return Ok(Vec::new());
        }

        let mut authors = self.graph.followees_of(viewer_id).await?;
        authors.insert(viewer_id);

        let posts = self.content.posts_by_page(&authors, limit, offset).await?;

        debug!(
            viewer_id = %viewer_id,
            authors = authors.len(),
            limit,
            offset,
            returned = posts.len(),
            "assembled feed"
        );
        Ok(posts)
    }
}
