//! # datagrid-cli
//!
//! Command-line host for the datagrid core: inspect views of a JSON grid,
//! convert it to other formats, and manage the persisted theme flag.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use datagrid_primitives::{column_index_to_letters, column_letters_to_index};
use datagrid_sheet::{
    dark_mode, parse_import_json, set_dark_mode, toggle_dark_mode, ColumnFilter, ExportFormat,
    Grid, GridOptions, JsonFilePreferences, MatchType, SortDirection, SortSpec, SortType,
    DEFAULT_PAGE_SIZE,
};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// grid - inspect and convert spreadsheet grids
#[derive(Parser)]
#[command(name = "grid")]
#[command(author, version, about = "Spreadsheet grid inspector and converter", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Print a filtered, sorted page of a JSON grid
    Show {
        /// JSON grid file (array of rows, array of objects, or a saved grid)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Sort column (letter, or 1-based number)
        #[arg(short, long, value_name = "COL")]
        sort: Option<String>,

        /// Sort descending
        #[arg(long, requires = "sort")]
        desc: bool,

        /// How sort keys are compared
        #[arg(long = "sort-type", default_value = "text")]
        sort_type: SortKind,

        /// Column filter, COL:TYPE[:VALUE] (e.g. B:greaterThan:10, C:notEmpty)
        #[arg(short, long = "filter", value_name = "FILTER")]
        filters: Vec<String>,

        /// 1-based page number
        #[arg(short, long, default_value_t = 1)]
        page: usize,

        /// Rows per page
        #[arg(long = "page-size", default_value_t = DEFAULT_PAGE_SIZE)]
        page_size: usize,
    },

    /// Convert a JSON grid to json, csv, xls or xlsx
    Convert {
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Output format; inferred from the output extension when omitted
        #[arg(short, long)]
        format: Option<String>,
    },

    /// Print each column's detected type and distinct values
    Columns {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Distinct values listed per column
        #[arg(short, long, default_value_t = 5)]
        limit: usize,
    },

    /// Show or change the persisted dark-mode flag
    Theme {
        #[arg(value_enum, default_value = "show")]
        action: ThemeAction,

        /// Preferences file (defaults to the user config directory)
        #[arg(long, value_name = "PATH")]
        prefs: Option<PathBuf>,
    },
}

/// Sort comparison, as accepted on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum SortKind {
    Text,
    Number,
    Date,
}

impl From<SortKind> for SortType {
    fn from(kind: SortKind) -> Self {
        match kind {
            SortKind::Text => SortType::Text,
            SortKind::Number => SortType::Number,
            SortKind::Date => SortType::Date,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ThemeAction {
    Show,
    Toggle,
    Dark,
    Light,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .init();
    }

    match cli.command {
        Command::Show {
            file,
            sort,
            desc,
            sort_type,
            filters,
            page,
            page_size,
        } => {
            let mut grid = load_grid(&file, page_size)?;
            for spec in &filters {
                let (col, filter) = parse_filter(spec)?;
                grid.set_filter(col, filter);
            }
            if let Some(col) = sort {
                let direction = if desc {
                    SortDirection::Desc
                } else {
                    SortDirection::Asc
                };
                grid.set_sort(SortSpec::by(parse_column(&col)?, direction).with_type(sort_type.into()));
            }
            grid.set_page(page);
            print_view(&grid);
            Ok(())
        }
        Command::Convert {
            input,
            output,
            format,
        } => convert(&input, &output, format.as_deref()),
        Command::Columns { file, limit } => {
            let grid = load_grid(&file, DEFAULT_PAGE_SIZE)?;
            for line in describe_columns(&grid, limit) {
                println!("{line}");
            }
            Ok(())
        }
        Command::Theme { action, prefs } => {
            let path = match prefs {
                Some(path) => path,
                None => prefs_path().context("No user config directory on this platform")?,
            };
            let enabled = run_theme(&path, action)?;
            let label = if enabled { "dark" } else { "light" };
            println!("{} {}", "Theme:".bold(), label.cyan());
            Ok(())
        }
    }
}

/// Load a JSON grid file into a controller sized exactly to its data.
fn load_grid(path: &Path, page_size: usize) -> Result<Grid> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    let rows = parse_import_json(&content)
        .with_context(|| format!("Not a grid: {}", path.display()))?;
    let options = GridOptions::default()
        .with_rows(0)
        .with_columns(0)
        .with_page_size(page_size);
    Ok(Grid::new(&rows, options))
}

/// Parse a column given as letters (`B`, `aa`) or a 1-based number (`2`).
fn parse_column(s: &str) -> Result<usize> {
    let s = s.trim();
    if let Ok(n) = s.parse::<usize>() {
        if n == 0 {
            bail!("Column numbers start at 1");
        }
        return Ok(n - 1);
    }
    column_letters_to_index(s)
        .map_err(|e| anyhow::anyhow!("Invalid column '{s}': {e}"))
}

/// Parse `COL:TYPE[:VALUE]`. The value may itself contain colons.
fn parse_filter(s: &str) -> Result<(usize, ColumnFilter)> {
    let mut parts = s.splitn(3, ':');
    let (Some(col), Some(kind)) = (parts.next(), parts.next()) else {
        bail!("Invalid filter '{s}'. Expected COL:TYPE[:VALUE]");
    };
    let match_type: MatchType = kind
        .parse()
        .with_context(|| format!("Invalid filter '{s}'"))?;
    let value = parts.next().unwrap_or_default();
    if match_type.uses_value() && value.is_empty() {
        bail!("Filter '{s}' needs a value");
    }
    Ok((parse_column(col)?, ColumnFilter::new(match_type, value)))
}

/// Render the current page as aligned text lines. The first line is the
/// column header.
fn render_page(grid: &Grid) -> Vec<String> {
    let page = grid.page();
    let headers = grid.column_headers();
    let rows = grid.view().page_rows();

    let gutter = page.end.max(1).to_string().len();
    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(col, header)| {
            rows.iter()
                .map(|row| row.cell(col).chars().count())
                .chain(std::iter::once(header.len()))
                .max()
                .unwrap_or_default()
        })
        .collect();

    let mut lines = Vec::with_capacity(rows.len() + 1);
    let header: Vec<String> = headers
        .iter()
        .zip(&widths)
        .map(|(h, w)| format!("{h:<w$}"))
        .collect();
    lines.push(format!("{:>gutter$} | {}", "", header.join(" | ")).trim_end().to_string());
    for (offset, row) in rows.iter().enumerate() {
        let cells: Vec<String> = widths
            .iter()
            .enumerate()
            .map(|(col, w)| format!("{:<w$}", row.cell(col)))
            .collect();
        lines.push(
            format!("{:>gutter$} | {}", page.start + offset + 1, cells.join(" | "))
                .trim_end()
                .to_string(),
        );
    }
    lines
}

fn print_view(grid: &Grid) {
    let lines = render_page(grid);
    if let Some((header, body)) = lines.split_first() {
        println!("{}", header.bold().cyan());
        for line in body {
            println!("{line}");
        }
    }
    let page = grid.page();
    let status = grid.status();
    println!(
        "{}",
        format!(
            "Page {} of {} | {} of {} rows shown",
            page.number,
            page.total_pages,
            status.visible_rows,
            status.rows
        )
        .dimmed()
    );
}

/// Write `input` to `output` in the requested or inferred format.
fn convert(input: &Path, output: &Path, format: Option<&str>) -> Result<()> {
    let format = match format {
        Some(name) => name.parse::<ExportFormat>()?,
        None => output
            .to_str()
            .and_then(ExportFormat::from_path)
            .with_context(|| {
                format!(
                    "Cannot infer a format from '{}'; pass --format",
                    output.display()
                )
            })?,
    };
    let grid = load_grid(input, DEFAULT_PAGE_SIZE)?;
    let base = output
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("data");
    let file = grid.export(format, base)?;
    std::fs::write(output, &file.bytes)
        .with_context(|| format!("Failed to write file: {}", output.display()))?;
    tracing::info!(%format, bytes = file.bytes.len(), output = %output.display(), "converted");
    println!(
        "{} {} ({}, {} bytes)",
        "Wrote".green().bold(),
        output.display(),
        file.mime_type,
        file.bytes.len()
    );
    Ok(())
}

fn sort_type_name(sort_type: SortType) -> &'static str {
    match sort_type {
        SortType::Text => "text",
        SortType::Number => "number",
        SortType::Date => "date",
    }
}

/// One summary line per column
fn describe_columns(grid: &Grid, limit: usize) -> Vec<String> {
    (0..grid.store().column_count())
        .map(|col| {
            let values = grid.unique_values(col);
            let shown: Vec<&str> = values.iter().take(limit).map(String::as_str).collect();
            let more = if values.len() > limit { ", ..." } else { "" };
            format!(
                "{:<3} {:<6} {:>4} distinct  [{}{}]",
                column_index_to_letters(col),
                sort_type_name(grid.detect_column_type(col)),
                values.len(),
                shown.join(", "),
                more
            )
        })
        .collect()
}

/// Default preferences file under the user config directory.
fn prefs_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("datagrid").join("prefs.json"))
}

/// Apply `action` to the preferences at `path` and return the flag's value.
fn run_theme(path: &Path, action: ThemeAction) -> Result<bool> {
    let mut prefs = JsonFilePreferences::load(path);
    let enabled = match action {
        ThemeAction::Show => dark_mode(&prefs),
        ThemeAction::Toggle => toggle_dark_mode(&mut prefs)?,
        ThemeAction::Dark => {
            set_dark_mode(&mut prefs, true)?;
            true
        }
        ThemeAction::Light => {
            set_dark_mode(&mut prefs, false)?;
            false
        }
    };
    Ok(enabled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn grid(data: &[Vec<&str>]) -> Grid {
        Grid::new(data, GridOptions::default().with_rows(0).with_columns(0))
    }

    // ========================================================================
    // Argument helpers
    // ========================================================================

    #[test]
    fn test_parse_column() {
        assert_eq!(parse_column("A").unwrap(), 0);
        assert_eq!(parse_column("ab").unwrap(), 27);
        assert_eq!(parse_column("3").unwrap(), 2);
        assert!(parse_column("0").is_err());
        assert!(parse_column("A1").is_err());
    }

    #[test]
    fn test_parse_filter() {
        let (col, filter) = parse_filter("B:greaterThan:10").unwrap();
        assert_eq!(col, 1);
        assert_eq!(filter, ColumnFilter::new(MatchType::GreaterThan, "10"));

        let (_, filter) = parse_filter("C:contains:12:30").unwrap();
        assert_eq!(filter.match_value, "12:30");

        let (_, filter) = parse_filter("A:notEmpty").unwrap();
        assert_eq!(filter.match_type, MatchType::NotEmpty);

        assert!(parse_filter("A").is_err());
        assert!(parse_filter("A:equals").is_err());
        assert!(parse_filter("A:like:x").is_err());
    }

    // ========================================================================
    // CLI argument parsing tests
    // ========================================================================

    #[test]
    fn test_cli_parse_show() {
        let cli = Cli::parse_from([
            "grid", "show", "data.json", "-s", "B", "--desc", "-f", "A:equals:x", "-p", "2",
        ]);
        let Command::Show {
            file,
            sort,
            desc,
            sort_type,
            filters,
            page,
            page_size,
        } = cli.command
        else {
            panic!("expected show");
        };
        assert_eq!(file, PathBuf::from("data.json"));
        assert_eq!(sort.as_deref(), Some("B"));
        assert!(desc);
        assert_eq!(sort_type, SortKind::Text);
        assert_eq!(filters, vec!["A:equals:x"]);
        assert_eq!(page, 2);
        assert_eq!(page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_cli_parse_theme_defaults_to_show() {
        let cli = Cli::parse_from(["grid", "theme"]);
        assert!(matches!(
            cli.command,
            Command::Theme {
                action: ThemeAction::Show,
                prefs: None
            }
        ));
    }

    #[test]
    fn test_cli_parse_verbose_is_global() {
        let cli = Cli::parse_from(["grid", "columns", "data.json", "-v"]);
        assert!(cli.verbose);
    }

    // ========================================================================
    // Output tests
    // ========================================================================

    #[test]
    fn test_render_page_aligns_columns() {
        let g = grid(&[vec!["Name", "Qty"], vec!["Widget", "3"]]);
        let lines = render_page(&g);
        assert_eq!(lines[0], "  | A      | B");
        assert_eq!(lines[1], "1 | Name   | Qty");
        assert_eq!(lines[2], "2 | Widget | 3");
    }

    #[test]
    fn test_render_page_numbers_follow_page() {
        let data: Vec<Vec<String>> = (0..12).map(|i| vec![i.to_string()]).collect();
        let mut g = Grid::new(&data, GridOptions::default().with_rows(0).with_columns(0).with_page_size(5));
        g.set_page(3);
        let lines = render_page(&g);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "11 | 10");
    }

    #[test]
    fn test_describe_columns() {
        let g = grid(&[vec!["1", "b"], vec!["2", "a"], vec!["2", "c"]]);
        let lines = describe_columns(&g, 2);
        assert!(lines[0].starts_with("A   number"));
        assert!(lines[0].ends_with("[1, 2]"));
        assert!(lines[1].ends_with("[a, b, ...]"));
    }

    // ========================================================================
    // File tests
    // ========================================================================

    #[test]
    fn test_convert_infers_format() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("in.json");
        let output = dir.path().join("out.csv");
        std::fs::write(&input, r#"[{"a": 1, "b": "x"}]"#).unwrap();

        convert(&input, &output, None).unwrap();
        let csv = std::fs::read_to_string(&output).unwrap();
        assert_eq!(csv, "\"a\",\"b\"\n\"1\",\"x\"");

        assert!(convert(&input, &dir.path().join("out.txt"), None).is_err());
        assert!(convert(&input, &dir.path().join("out.txt"), Some("xls")).is_ok());
    }

    #[test]
    fn test_load_grid_rejects_bad_json() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("bad.json");
        std::fs::write(&input, "42").unwrap();
        let err = load_grid(&input, 10).unwrap_err();
        assert!(err.to_string().contains("Not a grid"));
    }

    #[test]
    fn test_run_theme_persists() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("prefs.json");
        assert!(!run_theme(&path, ThemeAction::Show).unwrap());
        assert!(run_theme(&path, ThemeAction::Toggle).unwrap());
        assert!(run_theme(&path, ThemeAction::Show).unwrap());
        assert!(!run_theme(&path, ThemeAction::Light).unwrap());
    }

    #[test]
    fn test_prefs_path() {
        if let Some(path) = prefs_path() {
            assert!(path.ends_with("datagrid/prefs.json"));
        }
    }
}
