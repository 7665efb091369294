//! Plain-text map of the grid.

use hexonia_world::{query, World};

const INACTIVE: char = ' ';
const BARE: char = '.';
const SOIL: char = 'o';
const BUILT: char = '#';

/// Renders the grid top row first, indenting odd rows by half a hex.
pub(crate) fn render(world: &World) -> String {
    let view = query::cell_view(world);
    let (columns, _) = view.dimensions();
    let width = usize::try_from(columns).unwrap_or(0);

    let mut rows: Vec<String> = Vec::new();
    for (coord, cell) in view.iter() {
        if coord.column() == 0 {
            let indent = if coord.is_odd_row() { " " } else { "" };
            rows.push(String::with_capacity(width * 2 + 1) + indent);
        }
        let symbol = match cell {
            None => INACTIVE,
            Some(cell) if cell.has_building() => BUILT,
            Some(cell) if cell.has_soil() => SOIL,
            Some(_) => BARE,
        };
        if let Some(line) = rows.last_mut() {
            if coord.column() > 0 {
                line.push(' ');
            }
            line.push(symbol);
        }
    }

    let mut map = String::new();
    for line in rows.iter().rev() {
        map.push_str(line.trim_end());
        map.push('\n');
    }
    map
}
