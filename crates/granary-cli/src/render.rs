//! Markdown rendering for the leaderboard report.

/// Render parallel columns as one markdown table. Columns may have unequal
/// lengths; short columns pad with empty cells.
#[must_use]
pub fn render_markdown(headers: &[&str], columns: &[Vec<String>]) -> String {
    let rows = columns.iter().map(Vec::len).max().unwrap_or(0);

    let mut lines = Vec::with_capacity(rows + 2);
    lines.push(format!("| {} |", headers.join(" | ")));
    lines.push(format!("|{}|", vec!["---"; headers.len()].join("|")));

    for row in 0..rows {
        let cells: Vec<String> = columns
            .iter()
            .map(|column| {
                column
                    .get(row)
                    .map(|cell| cell.replace('|', "\\|"))
                    .unwrap_or_default()
            })
            .collect();
        lines.push(format!("| {} |", cells.join(" | ")));
    }

    lines.join("\n")
}
