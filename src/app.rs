use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc;

use crate::action::Action;
use crate::event::Event;
use crate::forge::Forge;
use crate::listing::repo_route;
use crate::types::{Repository, SortOrder};
use crate::view::{FetchTicket, RepoListView};

/// Ticks a notice stays visible (tick rate is 250ms)
const NOTICE_TICKS: u8 = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Normal,
    SortSelect { selected: usize },
    UserInput,
}

pub struct App {
    pub view: RepoListView,
    pub mode: Mode,
    pub input: String,
    pub column_index: usize,
    pub row_index: usize,
    pub notice: Option<String>,
    notice_ticks: u8,
    pub should_quit: bool,
    forge: Arc<dyn Forge>,
    action_tx: mpsc::UnboundedSender<Action>,
}

impl App {
    pub fn new(
        username: String,
        sort_order: SortOrder,
        forge: Arc<dyn Forge>,
        action_tx: mpsc::UnboundedSender<Action>,
    ) -> Self {
        Self {
            view: RepoListView::new(username, sort_order),
            mode: Mode::Normal,
            input: String::new(),
            column_index: 0,
            row_index: 0,
            notice: None,
            notice_ticks: 0,
            should_quit: false,
            forge,
            action_tx,
        }
    }

    pub fn forge_name(&self) -> &str {
        self.forge.name()
    }

    pub fn handle_event(&self, event: Event) -> Action {
        match event {
            Event::Init => Action::LoadRepos,
            Event::Key(key) => self.handle_key(key),
            _ => Action::None,
        }
    }

    fn handle_key(&self, key: KeyEvent) -> Action {
        match self.mode {
            Mode::UserInput => match key.code {
                KeyCode::Esc => Action::ExitUserInput,
                KeyCode::Enter => Action::UserConfirm,
                KeyCode::Backspace => Action::UserBackspace,
                KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                    Action::UserInput(c)
                }
                _ => Action::None,
            },
            Mode::SortSelect { .. } => match key.code {
                KeyCode::Char('j') | KeyCode::Down => Action::PopupDown,
                KeyCode::Char('k') | KeyCode::Up => Action::PopupUp,
                KeyCode::Enter => Action::PopupSelect,
                KeyCode::Esc | KeyCode::Char('q') => Action::PopupCancel,
                _ => Action::None,
            },
            Mode::Normal => self.handle_normal_key(key),
        }
    }

    fn handle_normal_key(&self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
            KeyCode::Char('j') | KeyCode::Down => Action::ScrollDown,
            KeyCode::Char('k') | KeyCode::Up => Action::ScrollUp,
            KeyCode::Char('h') | KeyCode::Left => Action::ColumnLeft,
            KeyCode::Char('l') | KeyCode::Right => Action::ColumnRight,
            KeyCode::Char('g') => Action::GoToTop,
            KeyCode::Char('G') => Action::GoToBottom,
            // The sort control is hidden while an error is shown
            KeyCode::Char('s') if self.view.error().is_none() => Action::ShowSortSelect,
            KeyCode::Char('o') if self.view.error().is_none() => Action::ToggleSortOrder,
            KeyCode::Char('u') => Action::EnterUserInput,
            KeyCode::Char('r') => Action::Refresh,
            KeyCode::Enter => Action::OpenInBrowser,
            KeyCode::Char('y') => Action::YankRoute,
            _ => Action::None,
        }
    }

    /// Age the status-bar notice
    pub fn tick(&mut self) {
        if self.notice_ticks > 0 {
            self.notice_ticks -= 1;
            if self.notice_ticks == 0 {
                self.notice = None;
            }
        }
    }

    pub fn update(&mut self, action: Action) {
        match action {
            Action::Quit => {
                self.should_quit = true;
            }
            Action::ScrollUp => {
                self.row_index = self.row_index.saturating_sub(1);
            }
            Action::ScrollDown => {
                let len = self.current_column_len();
                if len > 0 && self.row_index < len - 1 {
                    self.row_index += 1;
                }
            }
            Action::ColumnLeft => {
                if self.column_index > 0 {
                    self.column_index -= 1;
                    self.clamp_row();
                }
            }
            Action::ColumnRight => {
                let count = self.view.columns().len();
                if count > 0 && self.column_index < count - 1 {
                    self.column_index += 1;
                    self.clamp_row();
                }
            }
            Action::GoToTop => self.reset_selection(),
            Action::GoToBottom => {
                let count = self.view.columns().len();
                self.column_index = count.saturating_sub(1);
                self.row_index = self.current_column_len().saturating_sub(1);
            }

            Action::LoadRepos | Action::Refresh => {
                let ticket = self.view.begin_fetch();
                self.reset_selection();
                self.spawn_fetch(ticket);
            }
            Action::ReposLoaded(repos, token) => {
                if self.view.complete(token, Ok(repos)) {
                    self.reset_selection();
                }
            }
            Action::ReposFailed(message, token) => {
                if self.view.complete(token, Err(message)) {
                    self.reset_selection();
                    // A popup opened while loading goes away with the sort control
                    if matches!(self.mode, Mode::SortSelect { .. }) {
                        self.mode = Mode::Normal;
                    }
                }
            }

            Action::ShowSortSelect => {
                self.mode = Mode::SortSelect {
                    selected: self.view.sort_order().index(),
                };
            }
            Action::ToggleSortOrder => {
                self.apply_sort_order(self.view.sort_order().toggle());
            }
            Action::SetSortOrder(order) => self.apply_sort_order(order),

            Action::PopupUp => {
                if let Mode::SortSelect { selected } = &mut self.mode {
                    *selected = selected.saturating_sub(1);
                }
            }
            Action::PopupDown => {
                if let Mode::SortSelect { selected } = &mut self.mode {
                    if *selected < SortOrder::ALL.len() - 1 {
                        *selected += 1;
                    }
                }
            }
            Action::PopupSelect => {
                if let Mode::SortSelect { selected } = self.mode {
                    self.mode = Mode::Normal;
                    if let Some(order) = SortOrder::ALL.get(selected) {
                        self.update(Action::SetSortOrder(*order));
                    }
                }
            }
            Action::PopupCancel => {
                self.mode = Mode::Normal;
            }

            Action::EnterUserInput => {
                self.input = self.view.username().to_string();
                self.mode = Mode::UserInput;
            }
            Action::ExitUserInput => {
                self.input.clear();
                self.mode = Mode::Normal;
            }
            Action::UserInput(c) => {
                self.input.push(c);
            }
            Action::UserBackspace => {
                self.input.pop();
            }
            Action::UserConfirm => {
                self.mode = Mode::Normal;
                let username = std::mem::take(&mut self.input).trim().to_string();
                let ticket = self.view.set_username(username);
                self.reset_selection();
                self.spawn_fetch(ticket);
            }

            Action::OpenInBrowser => {
                if let Some(repo) = self.selected_repo() {
                    let url = self.forge.web_url(self.view.username(), &repo.name);
                    if let Err(e) = open::that(&url) {
                        self.set_notice(format!("Falha ao abrir {}: {}", url, e));
                    }
                }
            }
            Action::YankRoute => {
                if let Some(repo) = self.selected_repo() {
                    let route = repo_route(self.view.username(), &repo.name);
                    let copied = arboard::Clipboard::new()
                        .and_then(|mut clipboard| clipboard.set_text(route.clone()));
                    match copied {
                        Ok(()) => self.set_notice(format!("Copiado: {}", route)),
                        Err(e) => self.set_notice(format!("Falha ao copiar: {}", e)),
                    }
                }
            }

            Action::None => {}
        }
    }

    pub fn selected_repo(&self) -> Option<Repository> {
        self.view
            .columns()
            .get(self.column_index)
            .and_then(|column| column.repos.get(self.row_index))
            .cloned()
    }

    fn apply_sort_order(&mut self, order: SortOrder) {
        if self.view.error().is_some() {
            return;
        }
        if self.view.set_sort_order(order) {
            self.reset_selection();
        }
    }

    /// Transient status-bar message; never touches the view state
    fn set_notice(&mut self, message: String) {
        self.notice = Some(message);
        self.notice_ticks = NOTICE_TICKS;
    }

    fn current_column_len(&self) -> usize {
        self.view
            .columns()
            .get(self.column_index)
            .map(|c| c.repos.len())
            .unwrap_or(0)
    }

    fn clamp_row(&mut self) {
        self.row_index = self
            .row_index
            .min(self.current_column_len().saturating_sub(1));
    }

    fn reset_selection(&mut self) {
        self.column_index = 0;
        self.row_index = 0;
    }

    fn spawn_fetch(&self, ticket: FetchTicket) {
        let tx = self.action_tx.clone();
        let forge = Arc::clone(&self.forge);
        tokio::spawn(async move {
            let action = match forge.list_user_repos(&ticket.username).await {
                Ok(repos) => Action::ReposLoaded(repos, ticket.token),
                Err(e) => {
                    tracing::debug!(username = %ticket.username, "fetch error: {}", e);
                    Action::fetch_failed(&e, ticket.token)
                }
            };
            tx.send(action).ok();
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use tokio::sync::Notify;

    use crate::error::{Result, StargridError};
    use crate::view::ViewState;

    #[derive(Debug, Default)]
    struct FakeForge {
        responses: HashMap<String, std::result::Result<Vec<Repository>, String>>,
        /// Requests for this user wait until the gate is notified
        gated: Option<(String, Arc<Notify>)>,
        calls: AtomicUsize,
    }

    impl FakeForge {
        fn with(mut self, user: &str, response: std::result::Result<Vec<Repository>, String>) -> Self {
            self.responses.insert(user.to_string(), response);
            self
        }
    }

    #[async_trait]
    impl Forge for FakeForge {
        fn name(&self) -> &str {
            "Fake"
        }

        fn web_url(&self, owner: &str, repo: &str) -> String {
            format!("https://fake.test/{}/{}", owner, repo)
        }

        async fn list_user_repos(&self, username: &str) -> Result<Vec<Repository>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some((user, gate)) = &self.gated {
                if user == username {
                    gate.notified().await;
                }
            }
            match self.responses.get(username) {
                Some(Ok(repos)) => Ok(repos.clone()),
                Some(Err(message)) => Err(StargridError::Api(message.clone())),
                None => Err(StargridError::Api("Not Found".to_string())),
            }
        }
    }

    fn repo(id: u64, name: &str, stars: u64) -> Repository {
        Repository {
            id,
            name: name.to_string(),
            stars,
        }
    }

    fn numbered(n: u64) -> Vec<Repository> {
        (0..n).map(|i| repo(i, &format!("r{}", i), i)).collect()
    }

    fn key(c: char) -> Event {
        Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
    }

    fn new_app(
        username: &str,
        forge: Arc<FakeForge>,
    ) -> (App, mpsc::UnboundedReceiver<Action>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let app = App::new(username.to_string(), SortOrder::Descending, forge, tx);
        (app, rx)
    }

    async fn load(app: &mut App, rx: &mut mpsc::UnboundedReceiver<Action>) {
        app.update(Action::LoadRepos);
        let action = rx.recv().await.unwrap();
        app.update(action);
    }

    fn type_username(app: &mut App, name: &str) {
        app.update(Action::EnterUserInput);
        while !app.input.is_empty() {
            app.update(Action::UserBackspace);
        }
        for c in name.chars() {
            app.update(Action::UserInput(c));
        }
        app.update(Action::UserConfirm);
    }

    #[tokio::test]
    async fn init_loads_and_sorts() {
        let forge = Arc::new(FakeForge::default().with(
            "octocat",
            Ok(vec![repo(1, "a", 5), repo(2, "b", 20), repo(3, "c", 1)]),
        ));
        let (mut app, mut rx) = new_app("octocat", forge);

        let action = app.handle_event(Event::Init);
        assert_eq!(action, Action::LoadRepos);
        app.update(action);
        assert!(app.view.is_loading());

        let loaded = rx.recv().await.unwrap();
        app.update(loaded);
        let names: Vec<&str> = app.view.repos().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a", "c"]);
    }

    #[tokio::test]
    async fn fetch_failure_becomes_error_state() {
        let forge = Arc::new(FakeForge::default().with("octocat", Err("Network Error".to_string())));
        let (mut app, mut rx) = new_app("octocat", forge);
        load(&mut app, &mut rx).await;

        assert_eq!(
            app.view.state(),
            &ViewState::Error("API error: Network Error".to_string())
        );
        assert!(app.view.columns().is_empty());
    }

    #[tokio::test]
    async fn latest_username_wins_over_slow_response() {
        let gate = Arc::new(Notify::new());
        let forge = Arc::new(FakeForge {
            gated: Some(("slow".to_string(), Arc::clone(&gate))),
            ..FakeForge::default()
                .with("slow", Ok(vec![repo(1, "old", 100)]))
                .with("fast", Ok(vec![repo(2, "new", 1)]))
        });
        let (mut app, mut rx) = new_app("slow", forge);

        app.update(Action::LoadRepos);
        type_username(&mut app, "fast");
        assert_eq!(app.view.username(), "fast");

        let fast = rx.recv().await.unwrap();
        app.update(fast);
        gate.notify_one();
        let slow = rx.recv().await.unwrap();
        app.update(slow);

        let names: Vec<&str> = app.view.repos().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["new"]);
    }

    #[tokio::test]
    async fn sort_change_does_not_refetch() {
        let forge = Arc::new(FakeForge::default().with("octocat", Ok(numbered(5))));
        let (mut app, mut rx) = new_app("octocat", Arc::clone(&forge));
        load(&mut app, &mut rx).await;
        assert_eq!(forge.calls.load(Ordering::SeqCst), 1);

        app.update(Action::ToggleSortOrder);
        assert_eq!(app.view.sort_order(), SortOrder::Ascending);
        assert_eq!(app.view.repos()[0].name, "r0");
        assert_eq!(forge.calls.load(Ordering::SeqCst), 1);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn refresh_refetches() {
        let forge = Arc::new(FakeForge::default().with("octocat", Ok(numbered(2))));
        let (mut app, mut rx) = new_app("octocat", Arc::clone(&forge));
        load(&mut app, &mut rx).await;

        app.update(app.handle_event(key('r')));
        assert!(app.view.is_loading());
        let action = rx.recv().await.unwrap();
        app.update(action);
        assert_eq!(forge.calls.load(Ordering::SeqCst), 2);
        assert_eq!(app.view.repos().len(), 2);
    }

    #[tokio::test]
    async fn sort_popup_selects_order() {
        let forge = Arc::new(FakeForge::default().with("octocat", Ok(numbered(3))));
        let (mut app, mut rx) = new_app("octocat", forge);
        load(&mut app, &mut rx).await;

        app.update(app.handle_event(key('s')));
        assert_eq!(app.mode, Mode::SortSelect { selected: 0 });
        app.update(app.handle_event(key('j')));
        app.update(app.handle_event(key('j')));
        assert_eq!(app.mode, Mode::SortSelect { selected: 1 });
        app.update(Action::PopupSelect);

        assert_eq!(app.mode, Mode::Normal);
        assert_eq!(app.view.sort_order(), SortOrder::Ascending);
    }

    #[tokio::test]
    async fn sort_keys_ignored_on_error() {
        let forge = Arc::new(FakeForge::default());
        let (mut app, mut rx) = new_app("ghost", forge);
        load(&mut app, &mut rx).await;
        assert!(app.view.error().is_some());

        assert_eq!(app.handle_event(key('s')), Action::None);
        assert_eq!(app.handle_event(key('o')), Action::None);
        app.update(Action::SetSortOrder(SortOrder::Ascending));
        assert_eq!(app.view.sort_order(), SortOrder::Descending);
    }

    #[tokio::test]
    async fn sort_popup_closes_when_fetch_fails() {
        let forge = Arc::new(FakeForge::default().with("octocat", Err("Network Error".to_string())));
        let (mut app, mut rx) = new_app("octocat", forge);

        app.update(Action::LoadRepos);
        app.update(app.handle_event(key('s')));
        assert_eq!(app.mode, Mode::SortSelect { selected: 0 });

        let failed = rx.recv().await.unwrap();
        app.update(failed);
        assert!(app.view.error().is_some());
        assert_eq!(app.mode, Mode::Normal);
    }

    #[tokio::test]
    async fn sort_popup_survives_successful_load() {
        let forge = Arc::new(FakeForge::default().with("octocat", Ok(numbered(3))));
        let (mut app, mut rx) = new_app("octocat", forge);

        app.update(Action::LoadRepos);
        app.update(app.handle_event(key('s')));
        let loaded = rx.recv().await.unwrap();
        app.update(loaded);
        assert_eq!(app.mode, Mode::SortSelect { selected: 0 });
    }

    #[tokio::test]
    async fn empty_username_is_fetched_and_fails() {
        let forge = Arc::new(FakeForge::default());
        let (mut app, mut rx) = new_app("octocat", Arc::clone(&forge));

        type_username(&mut app, "  ");
        assert_eq!(app.view.username(), "");
        let action = rx.recv().await.unwrap();
        app.update(action);
        assert_eq!(app.view.error(), Some("API error: Not Found"));
    }

    #[tokio::test]
    async fn navigation_moves_across_columns() {
        let forge = Arc::new(FakeForge::default().with("octocat", Ok(numbered(25))));
        let (mut app, mut rx) = new_app("octocat", forge);
        load(&mut app, &mut rx).await;

        // descending: r24..r15 | r14..r5 | r4..r0
        assert_eq!(app.selected_repo().unwrap().name, "r24");
        for _ in 0..20 {
            app.update(Action::ScrollDown);
        }
        assert_eq!(app.row_index, 9);

        app.update(Action::ColumnRight);
        app.update(Action::ColumnRight);
        assert_eq!(app.column_index, 2);
        // last column has 5 entries
        assert_eq!(app.row_index, 4);
        assert_eq!(app.selected_repo().unwrap().name, "r0");

        app.update(Action::ColumnRight);
        assert_eq!(app.column_index, 2);

        app.update(Action::GoToTop);
        assert_eq!((app.column_index, app.row_index), (0, 0));
        app.update(Action::GoToBottom);
        assert_eq!((app.column_index, app.row_index), (2, 4));
    }

    #[tokio::test]
    async fn no_selection_while_loading() {
        let forge = Arc::new(FakeForge::default());
        let (mut app, _rx) = new_app("octocat", forge);
        app.update(Action::LoadRepos);

        assert_eq!(app.selected_repo(), None);
        app.update(Action::ScrollDown);
        app.update(Action::ColumnRight);
        assert_eq!((app.column_index, app.row_index), (0, 0));
    }

    #[test]
    fn user_input_mode_captures_keys() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut app = App::new(
            "octocat".to_string(),
            SortOrder::Descending,
            Arc::new(FakeForge::default()),
            tx,
        );
        app.update(Action::EnterUserInput);
        assert_eq!(app.input, "octocat");

        assert_eq!(app.handle_event(key('q')), Action::UserInput('q'));
        let esc = Event::Key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE));
        assert_eq!(app.handle_event(esc), Action::ExitUserInput);

        app.update(Action::ExitUserInput);
        assert_eq!(app.mode, Mode::Normal);
        assert_eq!(app.view.username(), "octocat");
    }

    #[test]
    fn notice_expires_after_ticks() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut app = App::new(
            "octocat".to_string(),
            SortOrder::Descending,
            Arc::new(FakeForge::default()),
            tx,
        );
        app.set_notice("hello".to_string());
        for _ in 0..NOTICE_TICKS - 1 {
            app.tick();
        }
        assert_eq!(app.notice.as_deref(), Some("hello"));
        app.tick();
        assert_eq!(app.notice, None);
    }
}
