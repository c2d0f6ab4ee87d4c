//! One-shot, non-interactive rendering: fetch once, sort, paginate, print.

use serde::Serialize;

use crate::error::{Result, StargridError};
use crate::forge::Forge;
use crate::listing::{paginate, repo_route, sort_repos, star_label, stars_text, COLUMN_SIZE};
use crate::types::{Repository, SortOrder};

#[derive(Debug, Serialize)]
struct Entry<'a> {
    id: u64,
    name: &'a str,
    stars: u64,
    label: &'static str,
    route: String,
}

#[derive(Debug, Serialize)]
struct Listing<'a> {
    username: &'a str,
    order: &'static str,
    columns: Vec<Vec<Entry<'a>>>,
}

/// Fetch and lay out `username`'s repositories.
pub async fn run(forge: &dyn Forge, username: &str, order: SortOrder, json: bool) -> Result<String> {
    let repos = forge.list_user_repos(username).await?;
    let sorted = sort_repos(&repos, order);

    if json {
        render_json(username, order, &sorted)
    } else {
        Ok(render_text(username, order, &sorted))
    }
}

fn render_text(username: &str, order: SortOrder, sorted: &[Repository]) -> String {
    let mut out = format!("Repositórios de {} ({}, {})\n", username, sorted.len(), order);
    for column in paginate(sorted, COLUMN_SIZE) {
        out.push_str(&format!("\nColuna {}\n", column.index + 1));
        for repo in column.repos {
            out.push_str(&format!(
                "  {} - {} - {}\n",
                repo.name,
                stars_text(repo.stars),
                repo_route(username, &repo.name)
            ));
        }
    }
    out
}

fn render_json(username: &str, order: SortOrder, sorted: &[Repository]) -> Result<String> {
    let columns: Vec<Vec<Entry<'_>>> = paginate(sorted, COLUMN_SIZE)
        .into_iter()
        .map(|column| {
            column
                .repos
                .iter()
                .map(|repo| Entry {
                    id: repo.id,
                    name: &repo.name,
                    stars: repo.stars,
                    label: star_label(repo.stars),
                    route: repo_route(username, &repo.name),
                })
                .collect()
        })
        .collect();

    let listing = Listing {
        username,
        order: order.as_api_str(),
        columns,
    };
    serde_json::to_string_pretty(&listing).map_err(|e| StargridError::Api(e.to_string()))
}
