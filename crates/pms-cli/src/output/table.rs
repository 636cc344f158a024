//! Fixed-column tables for terminal output.

use pms_core::enums::ChangeRequestStatus;

const GAP: &str = "  ";
const MIN_FLEX_WIDTH: usize = 8;

/// Color hint for a cell; ignored when color output is off.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Tone {
    #[default]
    Plain,
    Good,
    Pending,
    Bad,
}

impl Tone {
    #[must_use]
    pub const fn of_status(status: ChangeRequestStatus) -> Self {
        match status {
            ChangeRequestStatus::Approved => Self::Good,
            ChangeRequestStatus::Draft
            | ChangeRequestStatus::Submitted
            | ChangeRequestStatus::Returned => Self::Pending,
            ChangeRequestStatus::Rejected => Self::Bad,
        }
    }

    const fn ansi(self) -> Option<&'static str> {
        match self {
            Self::Plain => None,
            Self::Good => Some("32"),
            Self::Pending => Some("33"),
            Self::Bad => Some("31"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cell {
    pub text: String,
    pub tone: Tone,
}

impl Cell {
    pub fn toned(text: impl Into<String>, tone: Tone) -> Self {
        Self {
            text: text.into(),
            tone,
        }
    }

    #[must_use]
    pub fn status(status: ChangeRequestStatus) -> Self {
        Self::toned(status.as_str(), Tone::of_status(status))
    }
}

impl From<String> for Cell {
    fn from(text: String) -> Self {
        Self::toned(text, Tone::Plain)
    }
}

impl From<&str> for Cell {
    fn from(text: &str) -> Self {
        Self::toned(text, Tone::Plain)
    }
}

/// A column header. Flex columns give up width when the terminal is narrow.
#[derive(Clone, Copy, Debug)]
pub struct Column {
    pub name: &'static str,
    pub flex: bool,
}

#[must_use]
pub const fn col(name: &'static str) -> Column {
    Column { name, flex: false }
}

#[must_use]
pub const fn flex(name: &'static str) -> Column {
    Column { name, flex: true }
}

#[derive(Clone, Copy, Debug)]
pub struct TableOptions {
    pub max_width: Option<usize>,
    pub color: bool,
}

#[derive(Clone, Debug)]
pub struct Table {
    title: Option<&'static str>,
    columns: &'static [Column],
    rows: Vec<Vec<Cell>>,
}

impl Table {
    #[must_use]
    pub const fn new(columns: &'static [Column]) -> Self {
        Self {
            title: None,
            columns,
            rows: Vec::new(),
        }
    }

    #[must_use]
    pub const fn titled(title: &'static str, columns: &'static [Column]) -> Self {
        Self {
            title: Some(title),
            columns,
            rows: Vec::new(),
        }
    }

    /// Append rows. Missing trailing cells render as `-`.
    #[must_use]
    pub fn with_rows(mut self, rows: impl IntoIterator<Item = Vec<Cell>>) -> Self {
        self.rows.extend(rows);
        self
    }

    #[must_use]
    pub fn render(&self, options: TableOptions) -> String {
        let mut widths: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(index, column)| {
                self.rows
                    .iter()
                    .filter_map(|row| row.get(index))
                    .map(|cell| cell.text.chars().count())
                    .max()
                    .unwrap_or(0)
                    .max(column.name.len())
            })
            .collect();
        if let Some(max_width) = options.max_width {
            shrink_flex(&mut widths, self.columns, max_width);
        }

        let header = self
            .columns
            .iter()
            .zip(&widths)
            .map(|(column, width)| pad(column.name, *width))
            .collect::<Vec<_>>()
            .join(GAP);

        let mut lines = Vec::with_capacity(self.rows.len() + 3);
        if let Some(title) = self.title {
            lines.push(format!("{title}:"));
        }
        lines.push(header.trim_end().to_string());
        lines.push("-".repeat(header.chars().count()));
        if self.rows.is_empty() {
            lines.push(String::from("(none)"));
        }
        for row in &self.rows {
            let line = widths
                .iter()
                .enumerate()
                .map(|(index, width)| {
                    let placeholder = Cell::from("-");
                    let cell = row.get(index).unwrap_or(&placeholder);
                    let text = pad(&truncate(&cell.text, *width), *width);
                    match cell.tone.ansi() {
                        Some(code) if options.color => format!("\u{1b}[{code}m{text}\u{1b}[0m"),
                        _ => text,
                    }
                })
                .collect::<Vec<_>>()
                .join(GAP);
            lines.push(line.trim_end().to_string());
        }
        lines.join("\n")
    }
}

/// Take the overflow out of flex columns, left to right.
fn shrink_flex(widths: &mut [usize], columns: &[Column], max_width: usize) {
    let total = widths.iter().sum::<usize>() + GAP.len() * widths.len().saturating_sub(1);
    let mut excess = total.saturating_sub(max_width);
    for (width, column) in widths.iter_mut().zip(columns) {
        if excess == 0 {
            break;
        }
        if !column.flex {
            continue;
        }
        let floor = column.name.len().max(MIN_FLEX_WIDTH);
        let cut = excess.min(width.saturating_sub(floor));
        *width -= cut;
        excess -= cut;
    }
}

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    let mut out: String = value.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}

fn pad(value: &str, width: usize) -> String {
    let fill = width.saturating_sub(value.chars().count());
    format!("{value}{}", " ".repeat(fill))
}

#[cfg(test)]
mod tests {
    use pms_core::enums::ChangeRequestStatus;

    use super::{Cell, Column, Table, TableOptions, Tone, col, flex, truncate};

    const COLUMNS: &[Column] = &[col("id"), col("status"), flex("title")];

    fn sample() -> Table {
        Table::new(COLUMNS).with_rows([
            vec![
                "cr-1".into(),
                Cell::status(ChangeRequestStatus::Draft),
                "Update maker on main engine".into(),
            ],
            vec!["cr-2".into(), Cell::status(ChangeRequestStatus::Rejected)],
        ])
    }

    const PLAIN: TableOptions = TableOptions {
        max_width: None,
        color: false,
    };

    #[test]
    fn renders_header_divider_and_rows() {
        let out = sample().render(PLAIN);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "id    status    title");
        assert!(lines[1].chars().all(|c| c == '-'));
        assert_eq!(lines[2], "cr-1  draft     Update maker on main engine");
        assert_eq!(lines[3], "cr-2  rejected  -");
    }

    #[test]
    fn narrow_terminal_shrinks_only_flex_columns() {
        let out = sample().render(TableOptions {
            max_width: Some(30),
            color: false,
        });
        let row = out.lines().nth(2).unwrap();
        assert!(row.starts_with("cr-1  draft     "));
        assert!(row.ends_with('…'));
        assert_eq!(row.chars().count(), 30);
    }

    #[test]
    fn status_cells_are_colored_by_outcome() {
        let out = sample().render(TableOptions {
            max_width: None,
            color: true,
        });
        assert!(out.contains("\u{1b}[33mdraft"));
        assert!(out.contains("\u{1b}[31mrejected"));
        assert!(!out.contains("\u{1b}[32m"));
        assert_eq!(Tone::of_status(ChangeRequestStatus::Approved), Tone::Good);
    }

    #[test]
    fn empty_table_says_none() {
        let out = Table::titled("Comments", COLUMNS).render(PLAIN);
        assert!(out.starts_with("Comments:\n"));
        assert!(out.ends_with("(none)"));
    }

    #[test]
    fn truncates_long_cells_with_ellipsis() {
        assert_eq!(truncate("Propulsion > Main Engine", 10), "Propulsio…");
        assert_eq!(truncate("short", 10), "short");
    }
}
