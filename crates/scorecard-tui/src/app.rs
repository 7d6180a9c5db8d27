//! Application model and event loop for the scorecard dashboard.
//!
//! Elm-ish shape: one [`App`] owns all state, a message enum carries
//! everything that can happen (keys, ticks, settled fetches), `update`
//! mutates and spawns background work, `view` renders. Detail fetches run
//! as tokio tasks and come back through the message channel carrying their
//! [`DetailRequest`] token, so stale results are detected by the grid, not
//! by the task.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::{cursor, execute, queue, terminal};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use scorecard_core::{
    DetailRequest, DetailResponse, GridConfig, Metric, MetricsFilter, MetricsGrid,
    MetricsProvider, MockProvider, MonthWindow, ProviderError, SubEntityRecord, Toggle,
};

use crate::theme::{Theme, ThemePreset};
use crate::view;

/// Window sizes cycled by the `w` key.
const WINDOW_PRESETS: [usize; 3] = [6, 12, 24];

/// Spinner/refresh cadence.
const TICK_INTERVAL_MS: u64 = 120;

/// Application configuration, assembled from the CLI.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub preset: ThemePreset,
    pub seed: u64,
    pub grid: GridConfig,
    pub filter: MetricsFilter,
    /// Simulated provider latency.
    pub fetch_latency: Duration,
    /// Ceiling on a detail fetch before it is treated as failed.
    pub fetch_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            preset: ThemePreset::default(),
            seed: 42,
            grid: GridConfig::default(),
            filter: MetricsFilter::default(),
            fetch_latency: Duration::from_millis(300),
            fetch_timeout: Duration::from_secs(2),
        }
    }
}

/// Everything that can happen to the app.
#[derive(Debug)]
pub enum Msg {
    Key(KeyEvent),
    Resize,
    Tick,
    MetricsLoaded {
        load_id: u64,
        result: Result<Vec<Metric>, ProviderError>,
    },
    DetailsLoaded {
        request: DetailRequest,
        result: Result<Vec<SubEntityRecord>, ProviderError>,
    },
}

/// Main application state.
pub struct App {
    theme: Theme,
    grid: MetricsGrid,
    provider: Arc<MockProvider>,
    /// Leader (id, name) pairs for the `l` filter cycle.
    leaders: Vec<(String, String)>,
    /// Metric type categories for the `y` filter cycle.
    metric_types: Vec<String>,
    /// All months in the unfiltered dataset, for the `m` filter cycle.
    all_months: Vec<String>,
    cursor: usize,
    spinner: usize,
    loading_metrics: bool,
    /// Discriminates concurrent metric loads; only the latest lands.
    load_id: u64,
    should_quit: bool,
    dirty: bool,
    tx: mpsc::UnboundedSender<Msg>,
    fetch_latency: Duration,
    fetch_timeout: Duration,
}

impl App {
    /// Create the app and kick off the initial metrics load.
    #[must_use]
    pub fn new(config: AppConfig, tx: mpsc::UnboundedSender<Msg>) -> Self {
        let provider = Arc::new(MockProvider::seeded(config.seed));
        let mut grid = MetricsGrid::new(config.grid);
        grid.set_filter(config.filter);

        let mut app = Self {
            theme: Theme::from_preset(config.preset),
            leaders: provider.leaders(),
            metric_types: provider.metric_types(),
            grid,
            provider,
            all_months: Vec::new(),
            cursor: 0,
            spinner: 0,
            loading_metrics: false,
            load_id: 0,
            should_quit: false,
            dirty: true,
            tx,
            fetch_latency: config.fetch_latency,
            fetch_timeout: config.fetch_timeout,
        };
        app.reload_metrics();
        app
    }

    #[must_use]
    pub const fn should_quit(&self) -> bool {
        self.should_quit
    }

    #[must_use]
    pub const fn grid(&self) -> &MetricsGrid {
        &self.grid
    }

    /// Render the current frame.
    #[must_use]
    pub fn view(&self) -> String {
        view::render(
            &self.grid,
            &self.theme,
            self.cursor,
            self.spinner,
            self.loading_metrics,
        )
    }

    /// Take the dirty flag, returning whether a redraw is due.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    // ========================================================================
    // Update
    // ========================================================================

    pub fn update(&mut self, msg: Msg) {
        match msg {
            Msg::Key(key) => {
                if key.kind == KeyEventKind::Press {
                    self.handle_key(&key);
                    self.dirty = true;
                }
            }
            Msg::Resize => self.dirty = true,
            Msg::Tick => {
                self.spinner = self.spinner.wrapping_add(1);
                // Only animate when something is actually loading.
                if self.loading_metrics || self.grid.expansion().pending().is_some() {
                    self.dirty = true;
                }
            }
            Msg::MetricsLoaded { load_id, result } => {
                if load_id != self.load_id {
                    debug!(load_id, current = self.load_id, "stale metrics load dropped");
                    return;
                }
                self.loading_metrics = false;
                match result {
                    Ok(metrics) => {
                        self.all_months = MonthWindow::resolve(
                            &metrics,
                            scorecard_core::MAX_WINDOW,
                            None,
                        )
                        .months()
                        .to_vec();
                        self.grid.set_metrics(metrics);
                        self.clamp_cursor();
                    }
                    Err(err) => warn!(%err, "metrics load failed"),
                }
                self.dirty = true;
            }
            Msg::DetailsLoaded { request, result } => {
                match result {
                    Ok(records) => {
                        let applied = self.grid.apply_details(&DetailResponse {
                            metric_id: request.metric_id,
                            generation: request.generation,
                            records,
                        });
                        debug!(metric_id = request.metric_id, applied, "detail fetch settled");
                    }
                    Err(err) => {
                        warn!(metric_id = request.metric_id, %err, "detail fetch failed");
                        self.grid.fail_details(&request);
                    }
                }
                self.dirty = true;
            }
        }
    }

    fn handle_key(&mut self, key: &KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Char('j') | KeyCode::Down => self.move_cursor(1),
            KeyCode::Char('k') | KeyCode::Up => self.move_cursor(-1),
            KeyCode::Enter | KeyCode::Char(' ') => self.toggle_at_cursor(),
            KeyCode::Char('m') => self.cycle_month(),
            KeyCode::Char('l') => self.cycle_leader(),
            KeyCode::Char('y') => self.cycle_metric_type(),
            KeyCode::Char('w') => self.cycle_window(),
            KeyCode::Char('r') => self.reload_metrics(),
            _ => {}
        }
    }

    fn move_cursor(&mut self, delta: i64) {
        let len = self.grid.rows().len();
        if len == 0 {
            self.cursor = 0;
            return;
        }
        let cursor = i64::try_from(self.cursor).unwrap_or(0) + delta;
        self.cursor = usize::try_from(cursor.clamp(0, i64::try_from(len).unwrap_or(1) - 1))
            .unwrap_or(0);
    }

    fn clamp_cursor(&mut self) {
        let len = self.grid.rows().len();
        self.cursor = if len == 0 { 0 } else { self.cursor.min(len - 1) };
    }

    fn toggle_at_cursor(&mut self) {
        let Some(row) = self.grid.rows().get(self.cursor) else {
            return;
        };
        let metric_id = row.metric_id();
        match self.grid.toggle(metric_id) {
            Toggle::BeginExpand(request) => self.spawn_detail_fetch(request),
            Toggle::BeginCollapse(_) => self.clamp_cursor(),
            Toggle::Ignored => {}
        }
    }

    // ========================================================================
    // Filter cycling
    // ========================================================================

    /// Advance an optional selection through a list: all -> each -> all.
    fn cycle<T: Clone + PartialEq>(current: Option<&T>, options: &[T]) -> Option<T> {
        match current {
            None => options.first().cloned(),
            Some(value) => {
                let next = options.iter().position(|o| o == value).map(|i| i + 1)?;
                options.get(next).cloned()
            }
        }
    }

    fn cycle_month(&mut self) {
        let mut filter = self.grid.filter().clone();
        filter.month = Self::cycle(filter.month.as_ref(), &self.all_months);
        self.apply_filter(filter);
    }

    fn cycle_leader(&mut self) {
        let ids: Vec<String> = self.leaders.iter().map(|(id, _)| id.clone()).collect();
        let mut filter = self.grid.filter().clone();
        filter.leader_id = Self::cycle(filter.leader_id.as_ref(), &ids);
        self.apply_filter(filter);
    }

    fn cycle_metric_type(&mut self) {
        let mut filter = self.grid.filter().clone();
        filter.metric_type = Self::cycle(filter.metric_type.as_ref(), &self.metric_types);
        self.apply_filter(filter);
    }

    fn cycle_window(&mut self) {
        let current = self.grid.config().window_size;
        let next = WINDOW_PRESETS
            .iter()
            .position(|w| *w == current)
            .map_or(WINDOW_PRESETS[0], |i| {
                WINDOW_PRESETS[(i + 1) % WINDOW_PRESETS.len()]
            });
        self.grid.set_window_size(next);
        self.clamp_cursor();
    }

    /// Apply a new filter: reset expansion immediately, then refetch.
    fn apply_filter(&mut self, filter: MetricsFilter) {
        self.grid.set_filter(filter);
        self.cursor = 0;
        self.reload_metrics();
    }

    // ========================================================================
    // Background fetches
    // ========================================================================

    fn reload_metrics(&mut self) {
        self.load_id = self.load_id.wrapping_add(1);
        self.loading_metrics = true;
        self.dirty = true;

        let load_id = self.load_id;
        let provider = Arc::clone(&self.provider);
        let filter = self.grid.filter().clone();
        let latency = self.fetch_latency;
        let tx = self.tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(latency).await;
            let result = provider.fetch_metrics(&filter);
            let _ = tx.send(Msg::MetricsLoaded { load_id, result });
        });
    }

    fn spawn_detail_fetch(&self, request: DetailRequest) {
        let provider = Arc::clone(&self.provider);
        let filter = self.grid.filter().clone();
        let latency = self.fetch_latency;
        let timeout_after = self.fetch_timeout;
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let work = async {
                tokio::time::sleep(latency).await;
                provider.fetch_details(request.metric_id, &filter)
            };
            let result = (tokio::time::timeout(timeout_after, work).await)
                .unwrap_or(Err(ProviderError::Timeout));
            let _ = tx.send(Msg::DetailsLoaded { request, result });
        });
    }
}

// ============================================================================
// Terminal lifecycle and event loop
// ============================================================================

/// Raw-mode/alternate-screen guard; restores the terminal on drop.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> Result<Self> {
        terminal::enable_raw_mode()?;
        execute!(
            std::io::stdout(),
            terminal::EnterAlternateScreen,
            cursor::Hide
        )?;
        Ok(Self)
    }

    fn draw(frame: &str) -> Result<()> {
        let mut stdout = std::io::stdout();
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            terminal::Clear(terminal::ClearType::All)
        )?;
        stdout.write_all(frame.as_bytes())?;
        stdout.flush()?;
        Ok(())
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(
            std::io::stdout(),
            cursor::Show,
            terminal::LeaveAlternateScreen
        );
        let _ = terminal::disable_raw_mode();
    }
}

/// Run the interactive dashboard until the user quits.
///
/// # Errors
///
/// Returns an error when the terminal cannot be configured or drawn to.
pub async fn run(config: AppConfig) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut app = App::new(config, tx.clone());

    // Blocking input reader on its own thread; the loop below stays async.
    let input_tx = tx;
    std::thread::spawn(move || {
        loop {
            match crossterm::event::read() {
                Ok(Event::Key(key)) => {
                    if input_tx.send(Msg::Key(key)).is_err() {
                        break;
                    }
                }
                Ok(Event::Resize(_, _)) => {
                    if input_tx.send(Msg::Resize).is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(_) => break,
            }
        }
    });

    let guard = TerminalGuard::enter()?;
    let mut ticker = tokio::time::interval(Duration::from_millis(TICK_INTERVAL_MS));

    loop {
        tokio::select! {
            maybe = rx.recv() => match maybe {
                Some(msg) => app.update(msg),
                None => break,
            },
            _ = ticker.tick() => app.update(Msg::Tick),
        }

        if app.should_quit() {
            break;
        }
        if app.take_dirty() {
            TerminalGuard::draw(&app.view())?;
        }
    }

    drop(guard);
    Ok(())
}
