use serde::Serialize;

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

/// Display width in characters; names are mostly Cyrillic, so byte length
/// would over-pad.
fn width(s: &str) -> usize {
    s.chars().count()
}

fn pad(cell: &str, w: usize) -> String {
    let mut out = cell.to_string();
    out.push_str(&" ".repeat(w.saturating_sub(width(cell))));
    out
}

pub fn format_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    // Calculate column widths
    let mut widths: Vec<usize> = headers.iter().map(|h| width(h)).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(width(cell));
            }
        }
    }

    let mut out = String::new();

    let header_row: Vec<String> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| pad(h, widths[i]))
        .collect();
    out.push_str(header_row.join("  ").trim_end());
    out.push('\n');

    let sep: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
    out.push_str(&sep.join("  "));
    out.push('\n');

    for row in rows {
        let cells: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(i, cell)| pad(cell, widths.get(i).copied().unwrap_or(0)))
            .collect();
        out.push_str(cells.join("  ").trim_end());
        out.push('\n');
    }
    out
}

pub fn print_table(headers: &[&str], rows: &[Vec<String>]) {
    print!("{}", format_table(headers, rows));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_align_on_characters_not_bytes() {
        let table = format_table(
            &["ID", "NAME"],
            &[
                vec!["1".into(), "Анна".into()],
                vec!["10".into(), "Li".into()],
            ],
        );
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "ID  NAME");
        assert_eq!(lines[1], "--  ----");
        assert_eq!(lines[2], "1   Анна");
        assert_eq!(lines[3], "10  Li");
    }
}
