//! App — component-based event loop.
//!
//! Architecture:
//! - `App` owns all components and `AppState` (shared read-only data for components).
//! - A `tokio::mpsc` channel carries `AppMessage` events in from background tasks.
//! - The event loop draws each frame, then awaits the next message.
//! - Components return `Vec<Action>`; App dispatches each Action.
//! - API calls flow out through `req_tx` to the request worker, tagged with a
//!   ticket; answers come back as `AppMessage::Response` and are applied only
//!   if their ticket is still current.

use std::io;
use std::time::Duration;

use ratatui::crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    Terminal,
};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use blog_proto::{ApiError, BlogClient, Config, ListQuery, NewPost};

use crate::{
    action::{Action, ComponentId, PostFields, Screen},
    app_state::{AppState, ViewStatus},
    component::Component,
    components::{
        help_overlay::HelpOverlay, pagination_bar::PaginationBar, post_detail::PostDetail,
        post_form::PostForm, post_list::PostList, search_bar::SearchBar,
    },
    focus::FocusRing,
    request::{self, ApiRequest, ApiResponse, RequestTracker, Ticket},
    widgets::{
        notification::NotificationCenter,
        status_bar::{self, InputMode},
    },
};

// ── Internal event bus ────────────────────────────────────────────────────────

pub enum AppMessage {
    Event(Event),
    Response(Ticket, ApiResponse),
}

pub type RequestSender = mpsc::Sender<(Ticket, ApiRequest)>;
pub type RequestReceiver = mpsc::Receiver<(Ticket, ApiRequest)>;

/// Screen-space rectangles from the last draw, used for mouse hit-testing.
#[derive(Debug, Clone, Default)]
struct PaneAreas {
    search_bar: Rect,
    post_list: Rect,
    pagination: Rect,
    post_detail: Rect,
    post_form: Rect,
}

pub struct App {
    pub state: AppState,

    search_bar: SearchBar,
    post_list: PostList,
    pagination: PaginationBar,
    post_detail: PostDetail,
    post_form: PostForm,
    help_overlay: HelpOverlay,

    focus: FocusRing,
    notifications: NotificationCenter,
    tracker: RequestTracker,
    req_tx: RequestSender,
    pane_areas: PaneAreas,
    should_quit: bool,
}

impl App {
    pub fn new(config: &Config, req_tx: RequestSender) -> Self {
        Self {
            state: AppState::new(config, Screen::List),
            search_bar: SearchBar::new(),
            post_list: PostList::new(),
            pagination: PaginationBar::new(),
            post_detail: PostDetail::new(),
            post_form: PostForm::new(),
            help_overlay: HelpOverlay::new(),
            focus: FocusRing::default(),
            notifications: NotificationCenter::new(),
            tracker: RequestTracker::new(),
            req_tx,
            pane_areas: PaneAreas::default(),
            should_quit: false,
        }
    }

    /// Enter the first screen and fire its initial request.
    pub async fn start(&mut self, screen: Screen) {
        self.dispatch(Action::Navigate(screen)).await;
    }

    pub async fn run(
        mut self,
        client: BlogClient,
        req_rx: RequestReceiver,
        initial: Screen,
    ) -> anyhow::Result<()> {
        debug!("run(): enabling raw mode");
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        debug!("run(): terminal created, size={:?}", terminal.size());

        let (tx, mut rx) = mpsc::channel::<AppMessage>(1024);

        // ── Background task: keyboard/mouse events ────────────────────────────
        let event_tx = tx.clone();
        tokio::task::spawn_blocking(move || loop {
            match event::read() {
                Ok(ev) => {
                    if event_tx.blocking_send(AppMessage::Event(ev)).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            }
        });

        // ── Background task: request worker ───────────────────────────────────
        spawn_request_worker(client, req_rx, tx.clone());

        // Toast expiry check + spinner animation
        let mut ui_tick = tokio::time::interval(Duration::from_millis(100));
        ui_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        self.start(initial).await;

        // ── Main loop ─────────────────────────────────────────────────────────
        let result = async {
            let mut needs_redraw = true;
            loop {
                if needs_redraw {
                    terminal.draw(|f| self.draw(f))?;
                }
                if self.should_quit {
                    break;
                }

                tokio::select! {
                    Some(msg) = rx.recv() => {
                        needs_redraw = self.handle_message(msg).await;
                        // Drain whatever else queued up before the next frame.
                        while let Ok(next) = rx.try_recv() {
                            needs_redraw |= self.handle_message(next).await;
                        }
                    }

                    _ = ui_tick.tick() => {
                        let tick_actions: Vec<Action> = {
                            let s = &self.state;
                            let mut all = Vec::new();
                            all.extend(self.search_bar.tick(s));
                            all.extend(self.post_list.tick(s));
                            all.extend(self.pagination.tick(s));
                            all.extend(self.post_detail.tick(s));
                            all.extend(self.post_form.tick(s));
                            all
                        };
                        for action in tick_actions {
                            self.dispatch(action).await;
                        }
                        self.notifications.tick();
                        needs_redraw = true;
                    }
                }
            }
            Ok::<(), anyhow::Error>(())
        }
        .await;

        // ── Teardown ──────────────────────────────────────────────────────────
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
        info!("blogdeck exiting");

        result
    }

    /// Returns whether a redraw is needed.
    async fn handle_message(&mut self, msg: AppMessage) -> bool {
        match msg {
            AppMessage::Event(ev) => {
                self.handle_event(ev).await;
                true
            }
            AppMessage::Response(ticket, response) => {
                self.handle_response(ticket, response).await;
                true
            }
        }
    }

    async fn handle_event(&mut self, ev: Event) {
        let actions = match ev {
            Event::Key(key) if key.kind != KeyEventKind::Release => self.handle_key(key),
            Event::Mouse(m) => self.handle_mouse(m),
            Event::Resize(w, h) => vec![Action::Resize(w, h)],
            _ => vec![],
        };
        for action in actions {
            self.dispatch(action).await;
        }
    }

    // ── Keyboard handling ─────────────────────────────────────────────────────

    fn handle_key(&mut self, key: KeyEvent) -> Vec<Action> {
        if key.code == KeyCode::Char('c') && key.modifiers == KeyModifiers::CONTROL {
            return vec![Action::Quit];
        }

        // The help overlay captures all keys while it is open.
        let target = if self.help_overlay.visible {
            Some(self.help_overlay.id())
        } else {
            self.focus.current()
        };

        if target != Some(ComponentId::HelpOverlay) {
            if let Some(action) = self.global_key(key) {
                return vec![action];
            }
        }

        let s = &self.state;
        match target {
            Some(ComponentId::SearchBar) => self.search_bar.handle_key(key, s),
            Some(ComponentId::PostList) => self.post_list.handle_key(key, s),
            Some(ComponentId::Pagination) => self.pagination.handle_key(key, s),
            Some(ComponentId::PostDetail) => self.post_detail.handle_key(key, s),
            Some(ComponentId::PostForm) => self.post_form.handle_key(key, s),
            Some(ComponentId::HelpOverlay) => self.help_overlay.handle_key(key, s),
            None => vec![],
        }
    }

    /// Keys the App handles before the focused component sees them.
    fn global_key(&self, key: KeyEvent) -> Option<Action> {
        if key.code == KeyCode::Char('x') && key.modifiers == KeyModifiers::CONTROL {
            return Some(Action::DismissNotification);
        }

        match self.state.input_mode {
            InputMode::Normal => match key.code {
                KeyCode::Char('q') if key.modifiers == KeyModifiers::NONE => {
                    return Some(Action::Quit)
                }
                KeyCode::Char('?') => return Some(Action::ToggleHelp),
                KeyCode::Char('x') => return Some(Action::DismissNotification),
                _ => {}
            },
            // Esc on a form closes the error banner before it cancels.
            InputMode::Form
                if key.code == KeyCode::Esc && self.notifications.banner().is_some() =>
            {
                return Some(Action::DismissNotification)
            }
            _ => {}
        }

        // Tab cycles panes, except inside the form where it moves between fields.
        if self.focus.current() != Some(ComponentId::PostForm) {
            match key.code {
                KeyCode::Tab => return Some(Action::FocusNext),
                KeyCode::BackTab => return Some(Action::FocusPrev),
                _ => {}
            }
        }
        None
    }

    // ── Mouse handling ────────────────────────────────────────────────────────

    fn handle_mouse(&mut self, event: MouseEvent) -> Vec<Action> {
        let is_click = matches!(
            event.kind,
            MouseEventKind::Down(_) | MouseEventKind::ScrollUp | MouseEventKind::ScrollDown
        );
        if !is_click || self.help_overlay.visible {
            return vec![];
        }

        fn hit(r: Rect, col: u16, row: u16) -> bool {
            r.width > 0
                && r.height > 0
                && col >= r.x
                && col < r.x + r.width
                && row >= r.y
                && row < r.y + r.height
        }

        let areas = self.pane_areas.clone();
        let s = &self.state;

        // Focus follows the click.
        macro_rules! click_pane {
            ($id:expr, $component:expr, $area:expr) => {{
                let mut actions = $component.handle_mouse(event, $area, s);
                if self.focus.current() != Some($id) {
                    actions.insert(0, Action::FocusPane($id));
                }
                return actions;
            }};
        }

        let (col, row) = (event.column, event.row);
        match self.state.screen {
            Screen::List => {
                if hit(areas.search_bar, col, row) {
                    click_pane!(ComponentId::SearchBar, self.search_bar, areas.search_bar);
                }
                if hit(areas.pagination, col, row) {
                    click_pane!(ComponentId::Pagination, self.pagination, areas.pagination);
                }
                if hit(areas.post_list, col, row) {
                    click_pane!(ComponentId::PostList, self.post_list, areas.post_list);
                }
            }
            Screen::Detail(_) => {
                if hit(areas.post_detail, col, row) {
                    click_pane!(ComponentId::PostDetail, self.post_detail, areas.post_detail);
                }
            }
            Screen::Create | Screen::Edit(_) => {
                if hit(areas.post_form, col, row) {
                    click_pane!(ComponentId::PostForm, self.post_form, areas.post_form);
                }
            }
        }
        vec![]
    }

    // ── Action dispatcher ─────────────────────────────────────────────────────

    async fn dispatch(&mut self, action: Action) {
        // Back is just navigation to the parent screen.
        let action = match action {
            Action::Back => match self.state.screen.parent() {
                Some(parent) => Action::Navigate(parent),
                None => return,
            },
            other => other,
        };

        // Broadcast to all components first so they can reset on navigation etc.
        let secondary: Vec<Action> = {
            let s = &self.state;
            let mut out = Vec::new();
            out.extend(self.search_bar.on_action(&action, s));
            out.extend(self.post_list.on_action(&action, s));
            out.extend(self.pagination.on_action(&action, s));
            out.extend(self.post_detail.on_action(&action, s));
            out.extend(self.post_form.on_action(&action, s));
            out.extend(self.help_overlay.on_action(&action, s));
            out
        };

        self.apply_action(action).await;

        // Dispatch any secondary actions (depth-limited to 1 level)
        for a in secondary {
            self.apply_action(a).await;
        }
    }

    async fn apply_action(&mut self, action: Action) {
        match &action {
            Action::Noop | Action::Resize(..) => {}
            _ => debug!("apply_action: {:?}", action),
        }
        match action {
            // ── Navigation ────────────────────────────────────────────────────
            Action::Navigate(screen) => self.enter_screen(screen).await,
            Action::Back => {}
            Action::FocusNext => {
                self.focus.next();
                self.sync_input_mode();
            }
            Action::FocusPrev => {
                self.focus.prev();
                self.sync_input_mode();
            }
            Action::FocusPane(id) => {
                self.focus.set(id);
                self.sync_input_mode();
            }

            // ── Listing ───────────────────────────────────────────────────────
            Action::GoToPage(page) => {
                let query = self.state.listing.query.clone().page(page);
                self.load_listing(query).await;
            }
            Action::SearchChanged(text) => {
                let query = ListQuery::first_page(&self.state.listing_config).search(Some(&text));
                self.load_listing(query).await;
            }
            Action::Refresh => match self.state.screen.clone() {
                Screen::List => {
                    let query = self.state.listing.query.clone();
                    self.load_listing(query).await;
                }
                Screen::Detail(id) | Screen::Edit(id) => {
                    self.state.status = ViewStatus::Loading;
                    self.request(ApiRequest::Get(id)).await;
                }
                Screen::Create => {}
            },

            // ── Mutations ─────────────────────────────────────────────────────
            Action::SubmitPost(fields) => self.submit_post(fields).await,
            Action::DeletePost(id) => {
                self.state.mutating = true;
                self.notifications.spinner("Deleting post");
                self.request(ApiRequest::Delete(id)).await;
            }

            // ── UI toggles ────────────────────────────────────────────────────
            Action::DismissNotification => self.notifications.dismiss(),
            Action::ToggleHelp => {}

            // ── System ────────────────────────────────────────────────────────
            Action::Quit => self.should_quit = true,
            Action::Resize(..) | Action::Noop => {}
        }
    }

    async fn enter_screen(&mut self, screen: Screen) {
        // Anything still in flight belongs to the screen being left.
        self.tracker.invalidate_all();
        self.notifications.dismiss_spinner();
        self.state.mutating = false;
        self.state.screen = screen.clone();
        self.focus = FocusRing::for_screen(&screen);
        self.sync_input_mode();

        match screen {
            Screen::List => {
                let query = ListQuery::first_page(&self.state.listing_config);
                self.load_listing(query).await;
            }
            Screen::Detail(id) | Screen::Edit(id) => {
                self.state.post = None;
                self.state.status = ViewStatus::Loading;
                self.notifications.spinner("Loading post");
                self.request(ApiRequest::Get(id)).await;
            }
            Screen::Create => {
                self.state.post = None;
                self.state.status = ViewStatus::Loaded;
            }
        }
    }

    async fn load_listing(&mut self, query: ListQuery) {
        self.state.listing.query = query.clone();
        self.state.status = ViewStatus::Loading;
        self.notifications.spinner("Loading posts");
        self.request(ApiRequest::List(query)).await;
    }

    async fn submit_post(&mut self, fields: PostFields) {
        let body = match &self.state.screen {
            Screen::Create => NewPost::compose(
                fields.title,
                fields.author,
                fields.content,
                self.state.default_profile.clone(),
            ),
            Screen::Edit(_) => match &self.state.post {
                Some(original) => NewPost::edited(original, fields.title, fields.content),
                None => return,
            },
            _ => return,
        };
        let request = match self.state.screen.clone() {
            Screen::Edit(id) => ApiRequest::Update(id, body),
            _ => ApiRequest::Create(body),
        };
        self.state.mutating = true;
        self.notifications.spinner("Saving post");
        self.request(request).await;
    }

    async fn request(&mut self, request: ApiRequest) {
        let ticket = self.tracker.issue(request.slot());
        debug!(?ticket, ?request, "issuing request");
        if self.req_tx.send((ticket, request)).await.is_err() {
            error!("request worker is gone");
            self.notifications.dismiss_spinner();
            self.notifications.show_error("Request worker stopped; restart blogdeck");
        }
    }

    // ── Responses ─────────────────────────────────────────────────────────────

    async fn handle_response(&mut self, ticket: Ticket, response: ApiResponse) {
        if !self.tracker.settle(&ticket) {
            debug!(?ticket, "dropping stale response");
            return;
        }
        if !self.tracker.any_pending() {
            self.notifications.dismiss_spinner();
        }

        match response {
            ApiResponse::Listed(query, Ok(page)) => {
                debug!(?ticket, count = page.posts.len(), total = page.total_count, "listing loaded");
                if page.total_count == 0 {
                    if let Some(q) = &query.query {
                        self.notifications.info(format!("No posts match \"{}\"", q));
                    }
                }
                let max_len = self.state.listing_config.max_content_length;
                self.state.listing.apply(query, &page, max_len);
                self.post_list.reset();
                self.pagination.sync(&self.state.listing.selector);
                self.view_loaded();
            }
            ApiResponse::Fetched(id, Ok(post)) => {
                debug!(?ticket, %id, "post loaded");
                if matches!(self.state.screen, Screen::Edit(_)) {
                    self.post_form.populate(&post);
                }
                self.state.post = Some(post);
                self.view_loaded();
            }
            ApiResponse::Listed(_, Err(e)) | ApiResponse::Fetched(_, Err(e)) => {
                self.view_failed(e);
            }
            ApiResponse::Created(Ok(post)) => {
                info!(id = %post.id, "post created");
                self.mutation_done("Post created");
                self.dispatch(Action::Navigate(Screen::Detail(post.id))).await;
            }
            ApiResponse::Updated(id, Ok(_)) => {
                info!(%id, "post updated");
                self.mutation_done("Post updated");
                self.dispatch(Action::Navigate(Screen::Detail(id))).await;
            }
            ApiResponse::Deleted(id, Ok(())) => {
                info!(%id, "post deleted");
                self.mutation_done("Post deleted");
                self.dispatch(Action::Navigate(Screen::List)).await;
            }
            ApiResponse::Created(Err(e))
            | ApiResponse::Updated(_, Err(e))
            | ApiResponse::Deleted(_, Err(e)) => {
                // The view stays as it was; only the banner changes.
                warn!("mutation failed: {}", e);
                self.state.mutating = false;
                self.notifications.show_error(e.to_string());
            }
        }
    }

    fn view_loaded(&mut self) {
        self.state.status = ViewStatus::Loaded;
        self.notifications.dismiss();
    }

    fn view_failed(&mut self, err: ApiError) {
        warn!("load failed: {}", err);
        self.state.status = ViewStatus::Failed;
        self.notifications.show_error(err.to_string());
    }

    fn mutation_done(&mut self, message: &str) {
        self.state.mutating = false;
        self.notifications.dismiss();
        self.notifications.success(message);
    }

    fn sync_input_mode(&mut self) {
        self.state.input_mode = match self.focus.current() {
            Some(ComponentId::SearchBar) => InputMode::Search,
            Some(ComponentId::PostForm) => InputMode::Form,
            _ => InputMode::Normal,
        };
    }

    // ── Drawing ───────────────────────────────────────────────────────────────

    fn draw(&mut self, frame: &mut ratatui::Frame) {
        use crate::theme::C_BG;
        use ratatui::widgets::Block;
        let area = frame.area();

        frame.render_widget(
            Block::default().style(ratatui::style::Style::default().bg(C_BG)),
            area,
        );

        // ── Outer layout: title | banner | body | keys ───────────────────────
        let banner_h = if self.notifications.banner().is_some() { 1 } else { 0 };
        let outer = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(banner_h),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(area);

        status_bar::draw_title_bar(
            frame,
            outer[0],
            &self.state.screen,
            self.state.status,
            &self.state.api_url,
        );
        self.notifications.draw_banner(frame, outer[1]);
        status_bar::draw_keys_bar(frame, outer[3], self.state.input_mode, &self.state.screen);

        let body = outer[2];
        self.pane_areas = PaneAreas::default();
        match self.state.screen {
            Screen::List => {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([
                        Constraint::Length(1),
                        Constraint::Min(0),
                        Constraint::Length(1),
                    ])
                    .split(body);
                self.pane_areas.search_bar = chunks[0];
                self.pane_areas.post_list = chunks[1];
                self.pane_areas.pagination = chunks[2];
                let s = &self.state;
                self.search_bar.draw(
                    frame,
                    chunks[0],
                    self.focus.is_focused(ComponentId::SearchBar),
                    s,
                );
                self.post_list.draw(
                    frame,
                    chunks[1],
                    self.focus.is_focused(ComponentId::PostList),
                    s,
                );
                self.pagination.draw(
                    frame,
                    chunks[2],
                    self.focus.is_focused(ComponentId::Pagination),
                    s,
                );
            }
            Screen::Detail(_) => {
                self.pane_areas.post_detail = body;
                self.post_detail.draw(frame, body, true, &self.state);
            }
            Screen::Create | Screen::Edit(_) => {
                self.pane_areas.post_form = body;
                self.post_form.draw(frame, body, true, &self.state);
            }
        }

        self.help_overlay.draw(frame, area, false, &self.state);
        self.notifications.draw_toasts(frame, area);
    }
}

/// Runs each request on its own task so a slow fetch never blocks a newer one.
fn spawn_request_worker(client: BlogClient, mut req_rx: RequestReceiver, tx: mpsc::Sender<AppMessage>) {
    tokio::spawn(async move {
        while let Some((ticket, request)) = req_rx.recv().await {
            let client = client.clone();
            let tx = tx.clone();
            tokio::spawn(async move {
                let response = request::execute(&client, request).await;
                if tx.send(AppMessage::Response(ticket, response)).await.is_err() {
                    debug!(?ticket, "app gone before response arrived");
                }
            });
        }
    });
}
