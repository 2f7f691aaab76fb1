//! Human and machine readable reports of a verdict.

use journal_core::{Table, Verdict};
use serde::Serialize;

/// Widest a grid column gets before text is cut.
const MAX_GRID_WIDTH: usize = 30;

/// Spreadsheet-style name of a cell: `(1, 3)` → `D2`.
pub fn cell_name(row: usize, col: usize) -> String {
    let mut letters = Vec::new();
    let mut n = col + 1;
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push((b'A' + rem as u8) as char);
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect::<String>() + &(row + 1).to_string()
}

/// Plain-text report for terminals.
pub fn text_report(file: &str, table: &Table, verdict: &Verdict) -> String {
    let lessons = table.len().saturating_sub(1);
    let mut out = String::new();

    if verdict.is_valid {
        out.push_str(&format!(
            "✅ {}: no problems found ({} lessons checked)\n",
            file, lessons
        ));
        return out;
    }

    out.push_str(&format!(
        "❌ {}: {} flagged cells, {} rules violated ({} lessons checked)\n",
        file,
        verdict.flagged_cells.len(),
        verdict.messages.len(),
        lessons
    ));

    out.push('\n');
    for message in &verdict.messages {
        out.push_str(&format!("  - {}\n", message));
    }

    out.push_str("\nFlagged cells:\n");
    for cell in &verdict.flagged_cells {
        out.push_str(&format!(
            "  {:<6} {}\n",
            cell_name(cell.row, cell.col),
            cell.rule
        ));
    }

    out
}

#[derive(Serialize)]
struct JsonReport<'a> {
    file: &'a str,
    rows: usize,
    #[serde(flatten)]
    verdict: &'a Verdict,
}

/// JSON report: the verdict plus the file name and row count.
pub fn json_report(file: &str, table: &Table, verdict: &Verdict) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&JsonReport {
        file,
        rows: table.len(),
        verdict,
    })
}

/// The table as a text grid, flagged cells suffixed with `*`.
pub fn grid(table: &Table, verdict: &Verdict) -> String {
    let flagged = verdict.flagged_coordinates();
    let columns = table.rows().iter().map(Vec::len).max().unwrap_or(0);

    let rendered: Vec<Vec<String>> = table
        .rows()
        .iter()
        .enumerate()
        .map(|(r, row)| {
            (0..columns)
                .map(|c| {
                    let text = clip(row.get(c).map(String::as_str).unwrap_or(""));
                    if flagged.contains(&journal_core::CellRef::new(r, c)) {
                        format!("{}*", text)
                    } else {
                        text
                    }
                })
                .collect()
        })
        .collect();

    let widths: Vec<usize> = (0..columns)
        .map(|c| {
            rendered
                .iter()
                .map(|row| row[c].chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    for (r, row) in rendered.iter().enumerate() {
        out.push_str(&format!("{:>4} |", r + 1));
        for (c, text) in row.iter().enumerate() {
            let pad = widths[c] - text.chars().count();
            out.push(' ');
            out.push_str(text);
            out.push_str(&" ".repeat(pad));
            out.push_str(" |");
        }
        out.push('\n');
    }
    out
}

fn clip(text: &str) -> String {
    let text = text.trim();
    if text.chars().count() <= MAX_GRID_WIDTH {
        return text.to_string();
    }
    let mut clipped: String = text.chars().take(MAX_GRID_WIDTH - 1).collect();
    clipped.push('…');
    clipped
}
