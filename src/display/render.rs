//! Grid widget: one two-column tile per cell.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::Widget;

use crate::grid::{Cell, Grid};

/// Terminal columns per tile; two keeps tiles roughly square.
pub const TILE_WIDTH: u16 = 2;

pub const MARKED_COLOR: Color = Color::Black;
pub const BLANK_COLOR: Color = Color::White;

pub fn tile_color(cell: Cell) -> Color {
    if cell.is_marked() {
        MARKED_COLOR
    } else {
        BLANK_COLOR
    }
}

/// Area the grid occupies inside `available`, clipped to whole tiles.
pub fn grid_rect(available: Rect, grid_size: usize) -> Rect {
    let size = u16::try_from(grid_size).unwrap_or(u16::MAX);
    let cols = (available.width / TILE_WIDTH).min(size);
    let rows = available.height.min(size);
    Rect::new(available.x, available.y, cols * TILE_WIDTH, rows)
}

/// Paints every visible tile from scratch.
pub struct GridWidget<'a> {
    grid: &'a Grid,
}

impl<'a> GridWidget<'a> {
    pub fn new(grid: &'a Grid) -> Self {
        Self { grid }
    }
}

impl Widget for GridWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let rect = grid_rect(area, self.grid.size());
        for (row_idx, row) in self.grid.rows().enumerate().take(rect.height as usize) {
            let y = rect.y + row_idx as u16;
            let visible = (rect.width / TILE_WIDTH) as usize;
            for (col_idx, cell) in row.iter().enumerate().take(visible) {
                let x = rect.x + col_idx as u16 * TILE_WIDTH;
                buf.set_style(
                    Rect::new(x, y, TILE_WIDTH, 1),
                    Style::default().bg(tile_color(*cell)),
                );
            }
        }
    }
}
