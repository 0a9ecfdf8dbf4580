//! Placement of same-sized cells in a fixed number of columns.
//!
//! Rows are reserved one at a time through the [FlowCursor], so a grid that
//! does not fit continues on the next page. The column of an entry is always
//! `index % columns`: numbering carries on across a page break rather than
//! restarting the grid.

use crate::composition::Composition;
use crate::config::{CellSize, LayoutConfig};
use crate::cursor::FlowCursor;
use crate::units::Pt;

/// Geometry of a grid
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GridSpec {
    pub columns: usize,
    pub cell: CellSize,
    pub column_gap: Pt,
    pub row_gap: Pt,
    /// Strip below each cell for its label, counted in the row height
    pub label_height: Pt,
    /// x of the first column
    pub left: Pt,
}

impl GridSpec {
    /// The swatch grid geometry from a layout configuration
    pub fn swatches(config: &LayoutConfig, columns: usize) -> GridSpec {
        GridSpec {
            columns,
            cell: config.swatch,
            column_gap: config.swatch_column_gap,
            row_gap: config.swatch_row_gap,
            label_height: config.swatch_label_height,
            left: config.margin,
        }
    }

    pub fn row_height(&self) -> Pt {
        self.cell.height + self.label_height
    }
}

/// Where one entry of the grid ends up. `y` is the top of the cell, measured
/// from the top of the page.
#[derive(Debug, Clone, PartialEq)]
pub struct GridCell<'a, T> {
    pub entry: &'a T,
    pub index: usize,
    pub row: usize,
    pub column: usize,
    pub x: Pt,
    pub y: Pt,
    pub page_index: usize,
}

/// Where one row of the grid ends up
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GridRow {
    pub page_index: usize,
    pub top: Pt,
    pub bottom: Pt,
    /// The row is taller than a page and was placed anyway
    pub overflowed: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridLayout<'a, T> {
    pub cells: Vec<GridCell<'a, T>>,
    pub rows: Vec<GridRow>,
}

/// Lay out `entries` row by row from the cursor's current position
pub fn layout_grid<'a, T>(
    cursor: &mut FlowCursor,
    pages: &mut Composition,
    entries: &'a [T],
    spec: &GridSpec,
) -> GridLayout<'a, T> {
    let mut layout = GridLayout {
        cells: Vec::with_capacity(entries.len()),
        rows: Vec::new(),
    };
    if spec.columns == 0 {
        return layout;
    }

    let row_height = spec.row_height();
    let mut row_top = Pt::ZERO;
    let mut page_index = 0;

    for (index, entry) in entries.iter().enumerate() {
        let row = index / spec.columns;
        let column = index % spec.columns;

        if column == 0 {
            if index != 0 {
                cursor.skip(spec.row_gap);
            }
            let position = cursor.reserve(pages, row_height);
            if index != 0 && position.opened.is_some() {
                log::debug!("grid row {} continues on page {}", row, position.page_index);
            }
            row_top = position.y;
            page_index = position.page_index;
            layout.rows.push(GridRow {
                page_index,
                top: row_top,
                bottom: row_top + row_height,
                overflowed: position.overflowed,
            });
        }

        layout.cells.push(GridCell {
            entry,
            index,
            row,
            column,
            x: spec.left + (spec.cell.width + spec.column_gap) * column as f32,
            y: row_top,
            page_index,
        });
    }

    layout
}
