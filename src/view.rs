use crate::listing::{paginate, sort_repos, Column, COLUMN_SIZE};
use crate::types::{Repository, SortOrder};

/// What the repository list shows. Exactly one is active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    Loading,
    Error(String),
    /// Sorted by the view's current order
    Ready(Vec<Repository>),
}

/// Identifies one fetch. Only the ticket with the latest token may update the view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub token: u64,
    pub username: String,
}

/// Username + sort order in, view state out.
///
/// Fetching is keyed by username only; changing the order re-sorts the data
/// already held in `Ready` without going back to the forge.
#[derive(Debug, Clone)]
pub struct RepoListView {
    username: String,
    sort_order: SortOrder,
    state: ViewState,
    latest_token: u64,
}

impl RepoListView {
    pub fn new(username: impl Into<String>, sort_order: SortOrder) -> Self {
        Self {
            username: username.into(),
            sort_order,
            state: ViewState::Loading,
            latest_token: 0,
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn sort_order(&self) -> SortOrder {
        self.sort_order
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    #[cfg(test)]
    pub fn latest_token(&self) -> u64 {
        self.latest_token
    }

    /// Start a new fetch for the current username. Any earlier ticket becomes stale.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.latest_token += 1;
        self.state = ViewState::Loading;
        tracing::debug!(
            username = %self.username,
            token = self.latest_token,
            "fetch started"
        );
        FetchTicket {
            token: self.latest_token,
            username: self.username.clone(),
        }
    }

    pub fn set_username(&mut self, username: impl Into<String>) -> FetchTicket {
        self.username = username.into();
        self.begin_fetch()
    }

    /// Returns true when the order changed.
    pub fn set_sort_order(&mut self, order: SortOrder) -> bool {
        if order == self.sort_order {
            return false;
        }
        self.sort_order = order;
        if let ViewState::Ready(repos) = &self.state {
            self.state = ViewState::Ready(sort_repos(repos, order));
        }
        true
    }

    /// Apply a fetch outcome. Returns false (and leaves the view untouched)
    /// when `token` belongs to a superseded request.
    pub fn complete(
        &mut self,
        token: u64,
        outcome: std::result::Result<Vec<Repository>, String>,
    ) -> bool {
        if token != self.latest_token {
            tracing::debug!(token, latest = self.latest_token, "discarding stale fetch result");
            return false;
        }

        self.state = match outcome {
            Ok(repos) => {
                tracing::debug!(token, count = repos.len(), "fetch finished");
                ViewState::Ready(sort_repos(&repos, self.sort_order))
            }
            Err(message) => {
                tracing::debug!(token, %message, "fetch failed");
                ViewState::Error(message)
            }
        };
        true
    }

    /// Sorted repositories, empty unless ready
    pub fn repos(&self) -> &[Repository] {
        match &self.state {
            ViewState::Ready(repos) => repos.as_slice(),
            _ => &[],
        }
    }

    /// Columns derived from the ready list; empty while loading or on error.
    pub fn columns(&self) -> Vec<Column<'_>> {
        paginate(self.repos(), COLUMN_SIZE)
    }

    #[cfg(test)]
    pub fn is_loading(&self) -> bool {
        matches!(self.state, ViewState::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            ViewState::Error(message) => Some(message.as_str()),
            _ => None,
        }
    }
}
