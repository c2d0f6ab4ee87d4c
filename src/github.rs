use async_trait::async_trait;
use octocrab::Octocrab;

use crate::config::GitHubConfig;
use crate::error::{Result, StargridError};
use crate::forge::Forge;
use crate::types::{RawRepository, Repository};

const PER_PAGE: usize = 100;

pub struct GitHub {
    client: Octocrab,
    web_base: String,
}

impl std::fmt::Debug for GitHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHub")
            .field("web_base", &self.web_base)
            .finish_non_exhaustive()
    }
}

impl From<octocrab::Error> for StargridError {
    fn from(err: octocrab::Error) -> Self {
        match err {
            octocrab::Error::GitHub { source, .. } => StargridError::Api(source.message),
            other => StargridError::Api(other.to_string()),
        }
    }
}

impl GitHub {
    /// Anonymous access when `token` is None (lower rate limit).
    pub fn new(config: &GitHubConfig, token: Option<String>) -> Result<Self> {
        let mut builder = Octocrab::builder();
        if let Some(token) = token {
            builder = builder.personal_token(token);
        }
        if let Some(api_url) = &config.api_url {
            builder = builder
                .base_uri(api_url.clone())
                .map_err(|e| StargridError::Config(format!("invalid api_url: {}", e)))?;
        }
        let client = builder
            .build()
            .map_err(|e| StargridError::Auth(e.to_string()))?;

        Ok(Self {
            client,
            web_base: config.web_url.trim_end_matches('/').to_string(),
        })
    }
}

fn user_repos_route(username: &str, page: u32) -> String {
    format!(
        "/users/{}/repos?per_page={}&page={}",
        urlencoding::encode(username),
        PER_PAGE,
        page
    )
}

#[async_trait]
impl Forge for GitHub {
    fn name(&self) -> &str {
        "GitHub"
    }

    fn web_url(&self, owner: &str, repo: &str) -> String {
        format!("{}/{}/{}", self.web_base, owner, repo)
    }

    async fn list_user_repos(&self, username: &str) -> Result<Vec<Repository>> {
        let mut repos = Vec::new();
        let mut page = 1;

        loop {
            let route = user_repos_route(username, page);
            let batch: Vec<RawRepository> = self.client.get(&route, None::<&()>).await?;
            let last_page = batch.len() < PER_PAGE;
            repos.extend(batch.into_iter().map(Repository::from));

            if last_page {
                break;
            }
            page += 1;
        }

        tracing::debug!(username, pages = page, count = repos.len(), "listed repositories");
        Ok(repos)
    }
}
