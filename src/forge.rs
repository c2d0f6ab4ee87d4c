use async_trait::async_trait;

use crate::error::Result;
use crate::types::Repository;

/// Where repositories come from.
#[async_trait]
pub trait Forge: Send + Sync + std::fmt::Debug {
    fn name(&self) -> &str;

    /// Browser URL for a repository
    fn web_url(&self, owner: &str, repo: &str) -> String;

    /// Every repository owned by `username`, in the order the forge returns them.
    async fn list_user_repos(&self, username: &str) -> Result<Vec<Repository>>;
}
