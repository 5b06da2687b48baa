//! Table formatting utilities for CLI output.

use std::fmt::Write as _;

use vent_core::ProbeFailure;

/// Truncates a string to a maximum number of characters, adding "..." if
/// needed.
///
/// # Examples
///
/// ```rust
/// use vent_cli::presentation::truncate_string;
///
/// assert_eq!(truncate_string("Hello", 10), "Hello");
/// assert_eq!(truncate_string("Hello World", 8), "Hello...");
/// ```
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

/// Format an optional value for table display, returning a default if None.
pub fn format_optional<T: std::fmt::Display>(value: Option<&T>, default: &str) -> String {
    value.map_or_else(|| default.to_string(), ToString::to_string)
}

/// Comma-joined list, or `default` when empty.
pub fn format_list<S: AsRef<str>>(items: &[S], default: &str) -> String {
    if items.is_empty() {
        default.to_string()
    } else {
        items
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Render rows under a header, each column padded to its widest cell.
///
/// The last column is never padded.
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(i) {
                *width = (*width).max(cell.chars().count());
            }
        }
    }

    let mut out = String::new();
    let header: Vec<String> = headers.iter().map(ToString::to_string).collect();
    write_row(&mut out, &header, &widths);
    let total: usize = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);
    out.push_str(&"-".repeat(total));
    out.push('\n');
    for row in rows {
        write_row(&mut out, row, &widths);
    }
    out
}

fn write_row(out: &mut String, cells: &[String], widths: &[usize]) {
    let last = cells.len().saturating_sub(1);
    for (i, cell) in cells.iter().enumerate() {
        if i == last {
            out.push_str(cell);
        } else {
            let width = widths.get(i).copied().unwrap_or(0);
            let _ = write!(out, "{cell:<width$}  ");
        }
    }
    out.push('\n');
}

/// Report degraded probes on stderr.
pub fn print_failures(failures: &[ProbeFailure]) {
    for failure in failures {
        eprintln!("warning: {failure}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_string_no_truncation_needed() {
        assert_eq!(truncate_string("short", 10), "short");
    }

    #[test]
    fn test_truncate_string_multibyte() {
        assert_eq!(truncate_string("ääääääääää", 6), "äää...");
    }

    #[test]
    fn test_format_helpers() {
        assert_eq!(format_optional::<String>(None, "--"), "--");
        assert_eq!(format_optional(Some(&3), "--"), "3");
        assert_eq!(format_list::<&str>(&[], "none"), "none");
        assert_eq!(format_list(&["a", "b"], "none"), "a, b");
    }

    #[test]
    fn test_render_table_pads_columns() {
        let table = render_table(
            &["NAME", "STATUS"],
            &[
                vec!["rabbitmq".to_string(), "running".to_string()],
                vec!["rq".to_string(), "exited".to_string()],
            ],
        );
        let lines: Vec<_> = table.lines().collect();
        assert_eq!(lines[0], format!("{:<8}  STATUS", "NAME"));
        assert_eq!(lines[1], "-".repeat(17));
        assert_eq!(lines[2], "rabbitmq  running");
        assert_eq!(lines[3], format!("{:<8}  exited", "rq"));
    }
}
