//! Aligned-column table rendering for the interactive listings.

/// Render `rows` under `headers` as aligned columns separated by two spaces,
/// with a dash rule under the header. Rows wider than the header list are
/// truncated to it.
pub fn render(headers: &[&str], rows: &[Vec<String>]) -> String {
    let cols = headers.len();
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (i, cell) in row.iter().take(cols).enumerate() {
            widths[i] = widths[i].max(cell.len());
        }
    }

    let mut out = String::new();
    let header_line = headers
        .iter()
        .enumerate()
        .map(|(i, h)| format!("{:<w$}", h, w = widths[i]))
        .collect::<Vec<_>>()
        .join("  ");
    out.push_str(header_line.trim_end());
    out.push('\n');

    let rule_width = widths.iter().sum::<usize>() + 2 * cols.saturating_sub(1);
    out.push_str(&"-".repeat(rule_width));
    out.push('\n');

    for row in rows {
        let line = row
            .iter()
            .take(cols)
            .enumerate()
            .map(|(i, cell)| format!("{:<w$}", cell, w = widths[i]))
            .collect::<Vec<_>>()
            .join("  ");
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

pub fn print(headers: &[&str], rows: &[Vec<String>]) {
    print!("{}", render(headers, rows));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_align_to_the_widest_cell() {
        let rows = vec![
            vec!["127.0.0.1".to_string(), "localhost".to_string()],
            vec!["10.0.0.5".to_string(), "db".to_string()],
        ];
        let out = render(&["IP", "DOMAIN"], &rows);
        assert_eq!(
            out,
            concat!(
                "IP         DOMAIN\n",
                "--------------------\n",
                "127.0.0.1  localhost\n",
                "10.0.0.5   db\n",
            )
        );
    }

    #[test]
    fn header_wins_when_wider_than_cells() {
        let rows = vec![vec!["1".to_string()]];
        let out = render(&["NUMBER"], &rows);
        assert!(out.starts_with("NUMBER\n------\n1\n"));
    }

    #[test]
    fn empty_rows_still_render_header_and_rule() {
        let out = render(&["A", "B"], &[]);
        assert_eq!(out, "A  B\n----\n");
    }
}
