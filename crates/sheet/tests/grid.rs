use datagrid_primitives::{CellAddress, CellRange};
use datagrid_sheet::{
    ColumnFilter, ContextAction, Grid, GridOptions, InputEvent, InputOutcome, Key, MatchType,
    MemoryClipboard, Modifiers, NoSystemClipboard, SortType, Store,
};
use std::cell::RefCell;
use std::rc::Rc;

fn people() -> Grid {
    Grid::new(
        &[
            vec!["Name", "Age", "City"],
            vec!["Carol", "41", "Oslo"],
            vec!["alice", "30", "Lima"],
            vec!["Bob", "9", "Oslo"],
        ],
        GridOptions::default().with_rows(0).with_columns(0),
    )
}

fn press(grid: &mut Grid, key: &str, modifiers: Modifiers, system: &mut MemoryClipboard) -> InputOutcome {
    grid.handle_event(
        InputEvent::KeyDown {
            key: Key::from_dom(key),
            modifiers,
        },
        system,
    )
}

fn column(grid: &Grid, col: usize) -> Vec<String> {
    grid.view().rows().iter().map(|row| row.cell(col).to_string()).collect()
}

// ===== Change notification =====

#[test]
fn test_listeners_see_each_committed_store() {
    let mut grid = people();
    let seen: Rc<RefCell<Vec<usize>>> = Rc::default();
    let sink = Rc::clone(&seen);
    grid.on_change(move |store: &Store| sink.borrow_mut().push(store.row_count()));

    grid.add_row();
    grid.update_cell(CellAddress::new(0, 0), "Name"); // unchanged
    grid.delete_row(0);
    grid.undo();

    assert_eq!(*seen.borrow(), vec![5, 4, 5]);
}

// ===== Editing through views =====

#[test]
fn test_edit_in_sorted_view_targets_the_right_row() {
    let mut grid = people();
    grid.set_sort_type(SortType::Number);
    grid.toggle_sort(1);
    assert_eq!(column(&grid, 0), vec!["Name", "Bob", "alice", "Carol"]);
    let bob = 1;
    grid.update_cell(CellAddress::new(bob, 1), "10");

    let canonical = grid.store().to_array();
    assert_eq!(canonical[3], vec!["Bob", "10", "Oslo"]);
}

#[test]
fn test_filtered_view_delete_row_removes_visible_row() {
    let mut grid = people();
    grid.set_filter(2, ColumnFilter::new(MatchType::Equals, "oslo"));
    assert_eq!(column(&grid, 0), vec!["Carol", "Bob"]);

    assert!(grid.delete_row(1));
    assert_eq!(column(&grid, 0), vec!["Carol"]);
    assert_eq!(grid.store().row_count(), 3);
    assert!(grid.store().to_array().iter().all(|row| row[0] != "Bob"));
}

#[test]
fn test_insert_column_keeps_filter_on_same_data() {
    let mut grid = people();
    grid.set_filter(2, ColumnFilter::new(MatchType::Equals, "lima"));
    grid.insert_column_left(0);
    assert!(grid.filters().get(3).is_some());
    assert_eq!(column(&grid, 1), vec!["alice"]);
}

// ===== Keyboard flows =====

#[test]
fn test_type_over_then_enter_commits_once() {
    let mut grid = people();
    let mut system = MemoryClipboard::new();
    grid.focus_cell(CellAddress::new(1, 0));

    press(&mut grid, "Z", Modifiers::NONE, &mut system);
    grid.handle_event(InputEvent::EditInput { text: "Zed".into() }, &mut system);
    let before = grid.history().len();
    press(&mut grid, "Enter", Modifiers::NONE, &mut system);

    assert_eq!(grid.store().cell(1, 0), Some("Zed"));
    assert_eq!(grid.history().len(), before + 1);
    assert_eq!(grid.focus(), CellAddress::new(2, 0));
    assert!(!grid.is_editing());
}

#[test]
fn test_escape_discards_edit() {
    let mut grid = people();
    let mut system = MemoryClipboard::new();
    grid.double_click(CellAddress::new(2, 2));
    grid.edit_input("Quito");
    assert_eq!(press(&mut grid, "Escape", Modifiers::NONE, &mut system), InputOutcome::Handled);
    assert_eq!(grid.store().cell(2, 2), Some("Lima"));
    assert!(!grid.can_undo());
}

#[test]
fn test_shortcuts_pass_through_while_editing() {
    let mut grid = people();
    let mut system = MemoryClipboard::new();
    grid.begin_edit();
    assert_eq!(press(&mut grid, "c", Modifiers::ctrl(), &mut system), InputOutcome::Ignored);
    assert_eq!(press(&mut grid, "ArrowLeft", Modifiers::NONE, &mut system), InputOutcome::Ignored);
    assert_eq!(
        grid.handle_event(InputEvent::NativeCopy, &mut system),
        InputOutcome::Ignored
    );
    assert_eq!(system.text(), None);
}

#[test]
fn test_keyboard_undo_redo() {
    let mut grid = people();
    let mut system = MemoryClipboard::new();
    grid.focus_cell(CellAddress::new(1, 1));
    press(&mut grid, "Delete", Modifiers::NONE, &mut system);
    assert_eq!(grid.store().cell(1, 1), Some(""));

    press(&mut grid, "z", Modifiers::ctrl(), &mut system);
    assert_eq!(grid.store().cell(1, 1), Some("41"));
    press(&mut grid, "y", Modifiers::ctrl(), &mut system);
    assert_eq!(grid.store().cell(1, 1), Some(""));
}

#[test]
fn test_overlay_swallows_keys() {
    let mut grid = people();
    let mut system = MemoryClipboard::new();
    grid.set_overlay_open(true);
    assert_eq!(press(&mut grid, "ArrowDown", Modifiers::NONE, &mut system), InputOutcome::Ignored);
    assert_eq!(grid.focus(), CellAddress::new(0, 0));
}

// ===== Mouse selection =====

#[test]
fn test_drag_selects_rectangle_and_cut_clears_it() {
    let mut grid = people();
    let mut system = MemoryClipboard::new();
    grid.handle_event(
        InputEvent::MouseDown {
            cell: CellAddress::new(1, 0),
            modifiers: Modifiers::NONE,
        },
        &mut system,
    );
    grid.handle_event(InputEvent::MouseEnter { cell: CellAddress::new(2, 1) }, &mut system);
    grid.handle_event(InputEvent::MouseUp, &mut system);
    // moving after release does nothing
    grid.handle_event(InputEvent::MouseEnter { cell: CellAddress::new(3, 2) }, &mut system);

    assert_eq!(
        grid.selection().rectangle(),
        Some(CellRange::new(CellAddress::new(1, 0), CellAddress::new(2, 1)))
    );

    let outcome = grid.handle_event(InputEvent::NativeCut, &mut system);
    assert_eq!(outcome, InputOutcome::Clipboard("Carol\t41\nalice\t30".to_string()));
    assert_eq!(grid.store().to_array()[1], vec!["", "", "Oslo"]);
}

#[test]
fn test_native_paste_at_focus() {
    let mut grid = people();
    grid.focus_cell(CellAddress::new(3, 1));
    let outcome = grid.handle_event(
        InputEvent::NativePaste {
            text: "12\tBergen\r\n".to_string(),
        },
        &mut NoSystemClipboard,
    );
    assert!(outcome.is_handled());
    assert_eq!(grid.store().to_array()[3], vec!["Bob", "12", "Bergen"]);
}

#[test]
fn test_paste_falls_back_to_internal_payload() {
    let mut grid = people();
    grid.focus_cell(CellAddress::new(1, 2));
    grid.copy(&mut NoSystemClipboard);
    grid.focus_cell(CellAddress::new(2, 2));
    assert!(grid.paste(&mut NoSystemClipboard));
    assert_eq!(grid.store().cell(2, 2), Some("Oslo"));
}

// ===== Menu, import, pagination =====

#[test]
fn test_context_menu_clear_cell() {
    let mut grid = people();
    grid.focus_cell(CellAddress::new(1, 0));
    assert!(grid.apply_context_action(ContextAction::ClearCell, &mut NoSystemClipboard));
    assert_eq!(grid.store().cell(1, 0), Some(""));
}

#[test]
fn test_stale_import_is_dropped() {
    let mut grid = people();
    let first = grid.begin_import();
    let second = grid.begin_import();

    assert!(!grid.finish_import(first, r#"[["old"]]"#).unwrap());
    assert!(grid.finish_import(second, r#"[["new"]]"#).unwrap());
    assert_eq!(grid.store().cell(0, 0), Some("new"));
}

#[test]
fn test_bad_import_leaves_grid_untouched() {
    let mut grid = people();
    let before = grid.store().clone();
    assert!(grid.import_json("42").is_err());
    assert!(grid.store().is_same_snapshot(&before));
}

#[test]
fn test_pages_window_the_view() {
    let data: Vec<Vec<String>> = (0..12).map(|i| vec![i.to_string()]).collect();
    let mut grid = Grid::new(&data, GridOptions::default().with_rows(0).with_columns(0).with_page_size(5));
    assert_eq!(grid.page().total_pages, 3);

    grid.set_page(3);
    let page = grid.page();
    assert_eq!((page.start, page.end), (10, 12));

    grid.set_filter(0, ColumnFilter::new(MatchType::LessThan, "3"));
    assert_eq!(grid.page().number, 1);
    assert_eq!(grid.page().total_pages, 1);
}
