use crate::error::{error_message, StargridError};
use crate::types::{Repository, SortOrder};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Quit,
    ScrollUp,
    ScrollDown,
    ColumnLeft,
    ColumnRight,
    GoToTop,
    GoToBottom,

    // Fetching; the u64 is the request token
    LoadRepos,
    Refresh,
    ReposLoaded(Vec<Repository>, u64),
    ReposFailed(String, u64),

    // Sorting
    ShowSortSelect,
    ToggleSortOrder,
    SetSortOrder(SortOrder),

    // Popup navigation
    PopupUp,
    PopupDown,
    PopupSelect,
    PopupCancel,

    // Username input
    EnterUserInput,
    ExitUserInput,
    UserInput(char),
    UserBackspace,
    UserConfirm,

    // Selected repository
    OpenInBrowser,
    YankRoute,

    None,
}

impl Action {
    pub fn fetch_failed(err: &StargridError, token: u64) -> Self {
        Action::ReposFailed(error_message(err), token)
    }
}
