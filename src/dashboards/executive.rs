use async_trait::async_trait;
use serde_json::json;

use super::{Dashboard, DashboardContext, init_stats};
use crate::api;
use crate::auth::validate;
use crate::errors::{ClientError, Result};
use crate::render::shapes::{MY_POSTS_VIEW, MY_RESOURCES_VIEW, MY_TUTORIALS_VIEW};
use crate::stats::Role;

pub struct ExecutiveDashboard {
    ctx: DashboardContext,
}

impl ExecutiveDashboard {
    pub fn new(ctx: DashboardContext) -> Self {
        Self { ctx }
    }

    pub async fn load_my_posts(&self) -> bool {
        self.ctx.refresh_list(api::EXECUTIVE_POSTS, &MY_POSTS_VIEW).await
    }

    pub async fn load_my_resources(&self) -> bool {
        self.ctx.refresh_list(api::EXECUTIVE_RESOURCES, &MY_RESOURCES_VIEW).await
    }

    pub async fn load_my_tutorials(&self) -> bool {
        self.ctx.refresh_list(api::EXECUTIVE_TUTORIALS, &MY_TUTORIALS_VIEW).await
    }

    pub async fn create_post(&self, title: &str, content: &str) -> Result<()> {
        if let Some(msg) = validate::validate_all_present(&[title, content]) {
            self.ctx.notifier.error(&msg);
            return Err(ClientError::Validation(msg));
        }

        let body = json!({ "title": title, "content": content });
        match self.ctx.api.post(api::EXECUTIVE_POSTS, body).await {
            Ok(_) => {
                self.ctx.notifier.success("Post created successfully!");
                self.after_change().await;
                Ok(())
            }
            Err(e) => {
                log::error!("Error creating post: {e}");
                self.ctx.notifier.error("Failed to create post");
                Err(e)
            }
        }
    }

    /// Delete a post. Confirmation is the view's job.
    pub async fn delete_post(&self, post_id: &str) -> Result<()> {
        let endpoint = format!("{}{post_id}/", api::EXECUTIVE_POSTS);
        match self.ctx.api.delete(&endpoint).await {
            Ok(_) => {
                self.ctx.notifier.success("Post deleted successfully!");
                self.after_change().await;
                Ok(())
            }
            Err(e) => {
                log::error!("Error deleting post {post_id}: {e}");
                self.ctx.notifier.error("Failed to delete post");
                Err(e)
            }
        }
    }

    async fn after_change(&self) {
        self.load_my_posts().await;
        self.ctx.refresh_stats(Role::Executive).await;
    }
}

#[async_trait]
impl Dashboard for ExecutiveDashboard {
    fn role(&self) -> Role {
        Role::Executive
    }

    async fn init(&self) {
        init_stats(&self.ctx, Role::Executive).await;
        self.load_my_posts().await;
        self.load_my_resources().await;
        self.load_my_tutorials().await;
    }
}
