//! Display window state and input handling.
//!
//! `view` is only what is on screen. Writes never start from it: a click reloads the
//! store, flips the cell, and saves.

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::{Constraint, Layout, Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};
use ratatui::Frame;

use super::render::{grid_rect, GridWidget, TILE_WIDTH};
use super::watcher::DisplayEvent;
use crate::grid::Grid;
use crate::store::SharedGridStore;

pub const WINDOW_TITLE: &str = " Drawing Grid ";
const CLEAR_LABEL: &str = "[ Clear ]";

pub struct DisplayApp {
    store: SharedGridStore,
    view: Grid,
    grid_area: Rect,
    clear_area: Rect,
    status: String,
    should_quit: bool,
}

impl DisplayApp {
    /// Window showing the current stored grid.
    pub fn new(store: SharedGridStore) -> Self {
        let view = store.load();
        Self {
            store,
            view,
            grid_area: Rect::default(),
            clear_area: Rect::default(),
            status: String::new(),
            should_quit: false,
        }
    }

    pub fn view(&self) -> &Grid {
        &self.view
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Full redraw from a fresh load.
    pub fn repaint(&mut self) {
        self.view = self.store.load();
        tracing::debug!(marked = self.view.marked_count(), "Repainted grid from state");
    }

    pub fn on_display_event(&mut self, event: DisplayEvent) {
        match event {
            DisplayEvent::StateChanged => self.repaint(),
        }
    }

    /// Flip one cell in the store, starting from the stored grid.
    pub fn toggle_cell(&mut self, row: usize, col: usize) {
        let mut grid = self.store.load();
        match grid.toggle(row as i64, col as i64) {
            Ok(cell) => {
                self.store.save(&grid);
                tracing::debug!(row, col, state = cell.symbol(), "Toggled cell from display");
                self.status = format!("({}, {}) -> {}", row, col, cell.symbol());
                self.view = grid;
            }
            Err(e) => tracing::error!(row, col, "Error toggling cell: {}", e),
        }
    }

    /// Blank the tiles on screen only; the stored grid keeps its marks and shows
    /// again on the next repaint.
    pub fn clear_view(&mut self) {
        self.view = Grid::blank(self.view.size());
        self.status = "view cleared".to_string();
    }

    /// Grid coordinates of the tile under a terminal position, if any.
    pub fn cell_at(&self, column: u16, row: u16) -> Option<(usize, usize)> {
        if !self.grid_area.contains(Position::new(column, row)) {
            return None;
        }
        let col = ((column - self.grid_area.x) / TILE_WIDTH) as usize;
        let row = (row - self.grid_area.y) as usize;
        (row < self.view.size() && col < self.view.size()).then_some((row, col))
    }

    /// Apply one terminal event.
    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            _ => {}
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true
            }
            KeyCode::Char('c') => self.clear_view(),
            KeyCode::Char('r') => self.repaint(),
            _ => {}
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return;
        }
        if self
            .clear_area
            .contains(Position::new(mouse.column, mouse.row))
        {
            self.clear_view();
        } else if let Some((row, col)) = self.cell_at(mouse.column, mouse.row) {
            self.toggle_cell(row, col);
        }
    }

    pub fn draw(&mut self, frame: &mut Frame) {
        let [main, footer] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(frame.area());

        let block = Block::bordered().title(WINDOW_TITLE);
        let inner = block.inner(main);
        frame.render_widget(block, main);

        self.grid_area = grid_rect(inner, self.view.size());
        frame.render_widget(GridWidget::new(&self.view), self.grid_area);

        self.clear_area = Rect::new(
            footer.x,
            footer.y,
            (CLEAR_LABEL.len() as u16).min(footer.width),
            footer.height,
        );
        let footer_line = Line::from(vec![
            Span::styled(CLEAR_LABEL, Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("  click: toggle  c: clear view  r: reload  q: quit  "),
            Span::raw(self.status.as_str()),
        ]);
        frame.render_widget(Paragraph::new(footer_line), footer);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crossterm::event::KeyEventState;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    use super::*;
    use crate::display::render::{BLANK_COLOR, MARKED_COLOR};
    use crate::grid::Cell;
    use crate::store::FileGridStore;

    const N: usize = 4;

    struct Fixture {
        _dir: tempfile::TempDir,
        store: SharedGridStore,
        app: DisplayApp,
        terminal: Terminal<TestBackend>,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = tempfile::tempdir().unwrap();
            let store: SharedGridStore =
                Arc::new(FileGridStore::new(dir.path().join("board_state.json"), N));
            let app = DisplayApp::new(store.clone());
            let terminal = Terminal::new(TestBackend::new(60, 10)).unwrap();
            let mut fixture = Self {
                _dir: dir,
                store,
                app,
                terminal,
            };
            fixture.draw();
            fixture
        }

        fn draw(&mut self) {
            let app = &mut self.app;
            self.terminal.draw(|frame| app.draw(frame)).unwrap();
        }

        fn bg(&self, x: u16, y: u16) -> Option<ratatui::style::Color> {
            self.terminal.backend().buffer().cell((x, y)).map(|c| c.bg)
        }
    }

    fn click(column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        })
    }

    // Grid starts inside the border at (1, 1); each tile is two columns wide.
    fn tile(row: u16, col: u16) -> (u16, u16) {
        (1 + col * TILE_WIDTH, 1 + row)
    }

    #[test]
    fn hit_test_maps_tiles() {
        let f = Fixture::new();
        assert_eq!(f.app.cell_at(1, 1), Some((0, 0)));
        assert_eq!(f.app.cell_at(2, 1), Some((0, 0)));
        assert_eq!(f.app.cell_at(3, 2), Some((1, 1)));
        assert_eq!(f.app.cell_at(8, 4), Some((3, 3)));
        assert_eq!(f.app.cell_at(0, 0), None);
        assert_eq!(f.app.cell_at(9, 1), None);
        assert_eq!(f.app.cell_at(1, 5), None);
    }

    #[test]
    fn click_toggles_stored_cell() {
        let mut f = Fixture::new();
        let (x, y) = tile(2, 1);
        f.app.handle_event(click(x, y));

        assert_eq!(f.store.load().get(2, 1), Some(Cell::Marked));
        assert_eq!(f.app.view().get(2, 1), Some(Cell::Marked));

        f.draw();
        assert_eq!(f.bg(x, y), Some(MARKED_COLOR));
        assert_eq!(f.bg(x + 1, y), Some(MARKED_COLOR));

        f.app.handle_event(click(x, y));
        assert_eq!(f.store.load(), Grid::blank(N));
    }

    #[test]
    fn click_starts_from_stored_grid_not_view() {
        let mut f = Fixture::new();

        // Another process marks (0, 0) after our last repaint.
        let mut external = f.store.load();
        external.toggle(0, 0).unwrap();
        f.store.save(&external);
        assert_eq!(f.app.view().get(0, 0), Some(Cell::Blank));

        let (x, y) = tile(3, 3);
        f.app.handle_event(click(x, y));

        let stored = f.store.load();
        assert_eq!(stored.get(0, 0), Some(Cell::Marked));
        assert_eq!(stored.get(3, 3), Some(Cell::Marked));
    }

    #[test]
    fn state_change_event_repaints() {
        let mut f = Fixture::new();
        let mut external = f.store.load();
        external.toggle(1, 2).unwrap();
        f.store.save(&external);

        f.app.on_display_event(DisplayEvent::StateChanged);
        f.draw();

        let (x, y) = tile(1, 2);
        assert_eq!(f.bg(x, y), Some(MARKED_COLOR));
    }

    #[test]
    fn clear_only_affects_view() {
        let mut f = Fixture::new();
        let (x, y) = tile(0, 0);
        f.app.handle_event(click(x, y));

        f.app.handle_event(key(KeyCode::Char('c')));
        f.draw();

        assert_eq!(f.bg(x, y), Some(BLANK_COLOR));
        assert_eq!(f.store.load().get(0, 0), Some(Cell::Marked));

        f.app.repaint();
        assert_eq!(f.app.view().get(0, 0), Some(Cell::Marked));
    }

    #[test]
    fn clear_button_click_clears_view() {
        let mut f = Fixture::new();
        let (x, y) = tile(1, 1);
        f.app.handle_event(click(x, y));

        // Footer is the last terminal row; the button starts at column 0.
        f.app.handle_event(click(0, 9));

        assert_eq!(f.app.view(), &Grid::blank(N));
        assert_eq!(f.store.load().get(1, 1), Some(Cell::Marked));
    }

    #[test]
    fn quit_keys() {
        let mut f = Fixture::new();
        f.app.handle_event(key(KeyCode::Char('x')));
        assert!(!f.app.should_quit());
        f.app.handle_event(key(KeyCode::Esc));
        assert!(f.app.should_quit());

        let mut f = Fixture::new();
        f.app.handle_event(Event::Key(KeyEvent {
            code: KeyCode::Char('c'),
            modifiers: KeyModifiers::CONTROL,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }));
        assert!(f.app.should_quit());
    }

    #[test]
    fn initial_view_shows_stored_grid() {
        let dir = tempfile::tempdir().unwrap();
        let store: SharedGridStore =
            Arc::new(FileGridStore::new(dir.path().join("board_state.json"), N));
        let mut grid = Grid::blank(N);
        grid.toggle(2, 2).unwrap();
        store.save(&grid);

        let app = DisplayApp::new(store);
        assert_eq!(app.view(), &grid);
    }
}
