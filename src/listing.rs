use crate::types::{Repository, SortOrder};

/// Repositories per column
pub const COLUMN_SIZE: usize = 10;

/// A run of consecutive repositories from the sorted list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column<'a> {
    pub index: usize,
    pub repos: &'a [Repository],
}

/// Order repositories by star count. Stable: equal counts keep their input order.
pub fn sort_repos(repos: &[Repository], order: SortOrder) -> Vec<Repository> {
    let mut sorted = repos.to_vec();
    match order {
        SortOrder::Descending => sorted.sort_by(|a, b| b.stars.cmp(&a.stars)),
        SortOrder::Ascending => sorted.sort_by_key(|r| r.stars),
    }
    sorted
}

/// Split into consecutive columns of `page_size`; only the last may be shorter.
pub fn paginate(repos: &[Repository], page_size: usize) -> Vec<Column<'_>> {
    repos
        .chunks(page_size.max(1))
        .enumerate()
        .map(|(index, repos)| Column { index, repos })
        .collect()
}

pub fn star_label(count: u64) -> &'static str {
    if count <= 1 {
        "estrela"
    } else {
        "estrelas"
    }
}

pub fn stars_text(count: u64) -> String {
    format!("{} {}", count, star_label(count))
}

/// In-app route for a repository: `/repo/{username}/{name}`
pub fn repo_route(username: &str, name: &str) -> String {
    format!("/repo/{}/{}", username, name)
}
