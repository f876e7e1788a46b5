//! Walk through the grid controller: edit, sort, filter, clipboard, export.
//!
//! Run with: cargo run --example grid_demo -p datagrid-sheet

use datagrid_primitives::{CellAddress, CellRange};
use datagrid_sheet::{
    ColumnFilter, ExportFormat, Grid, GridOptions, MatchType, MemoryClipboard, SortType,
};
use std::env;

fn print_view(title: &str, grid: &Grid) {
    println!("--- {title} ---");
    for row in grid.view().page_rows() {
        println!("  {}", row.cells().join(" | "));
    }
    println!();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Data Grid Demo ===\n");

    let mut grid = Grid::new(
        &[
            vec!["Fruit", "Price", "Picked"],
            vec!["pear", "1.20", "2024-05-02"],
            vec!["apple", "0.80", "2024-04-28"],
            vec!["plum", "2.05", "2024-05-10"],
            vec!["fig", "", "2024-05-01"],
        ],
        GridOptions::default().with_rows(0).with_columns(0),
    );
    grid.on_change(|store| println!("  (store changed: {} rows)", store.row_count()));
    print_view("Initial", &grid);

    grid.update_cell(CellAddress::new(4, 1), "3.10");
    grid.set_sort_type(SortType::Number);
    grid.toggle_sort(1);
    print_view("Sorted by price", &grid);

    grid.set_filter(0, ColumnFilter::new(MatchType::StartsWith, "p"));
    print_view("Fruit starting with p", &grid);
    grid.clear_filters();

    let mut clipboard = MemoryClipboard::new();
    grid.select_range(CellRange::new(CellAddress::new(1, 0), CellAddress::new(2, 1)));
    println!("Copied:\n{}\n", grid.copy(&mut clipboard));

    grid.undo();
    print_view("After undo", &grid);

    let file = grid.export(ExportFormat::Csv, "fruit")?;
    let path = env::temp_dir().join(&file.file_name);
    std::fs::write(&path, &file.bytes)?;
    println!("Saved {} ({} bytes) to {}", file.mime_type, file.bytes.len(), path.display());

    Ok(())
}
