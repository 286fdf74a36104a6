//! Plain-text rendering of the table view.

use client_core::{LoadState, TableView};
use shared::domain::Post;

const WIDTHS: [usize; 4] = [5, 30, 6, 40];

fn fit(text: &str, width: usize) -> String {
    let single_line = text.replace('\n', " ");
    let count = single_line.chars().count();
    if count <= width {
        return format!("{single_line:<width$}");
    }
    let mut cut: String = single_line.chars().take(width.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

fn cells(post: &Post) -> [String; 4] {
    [
        post.id.map(|id| id.to_string()).unwrap_or_default(),
        post.title.clone(),
        post.user_id.to_string(),
        post.body.clone(),
    ]
}

fn row(values: &[String]) -> String {
    values
        .iter()
        .zip(WIDTHS)
        .map(|(value, width)| fit(value, width))
        .collect::<Vec<_>>()
        .join(" | ")
        .trim_end()
        .to_string()
}

pub fn render_table(view: &TableView<'_>) -> String {
    let mut out = String::new();
    if view.is_loading && view.rows.is_empty() {
        out.push_str("Loading posts…\n");
        return out;
    }

    let header: Vec<String> = view.columns.iter().map(|name| name.to_string()).collect();
    out.push_str(&row(&header));
    out.push('\n');
    out.push_str(
        &WIDTHS
            .iter()
            .map(|width| "-".repeat(*width))
            .collect::<Vec<_>>()
            .join("-+-"),
    );
    out.push('\n');

    if view.rows.is_empty() {
        out.push_str("(no posts)\n");
    }
    for post in view.rows {
        out.push_str(&row(&cells(post)));
        out.push('\n');
    }

    let page_count = view.page.page_count.max(1);
    out.push_str(&format!(
        "{}   page {}/{}   {} per page",
        view.range_label,
        view.page.page_index + 1,
        page_count,
        view.page.page_size
    ));
    match view.load_state {
        LoadState::Loading => out.push_str("   (refreshing…)"),
        LoadState::LoadFailed => out.push_str("   (last refresh failed)"),
        LoadState::Idle | LoadState::Loaded => {}
    }
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use client_core::{PageInfo, COLUMNS};
    use shared::domain::{PostId, UserId};

    use super::*;

    fn view(rows: &[Post], load_state: LoadState) -> TableView<'_> {
        TableView {
            columns: &COLUMNS,
            rows,
            is_loading: load_state == LoadState::Loading,
            load_state,
            page: PageInfo {
                page_index: 0,
                page_size: 5,
                page_count: 1,
                total: rows.len(),
            },
            range_label: format!("1 – {} of {}", rows.len(), rows.len()),
        }
    }

    #[test]
    fn long_values_are_truncated() {
        assert_eq!(fit("abcdef", 4), "abc…");
        assert_eq!(fit("ab", 4), "ab  ");
        assert_eq!(fit("a\nb", 4), "a b ");
    }

    #[test]
    fn renders_header_rows_and_footer() {
        let rows = vec![Post {
            id: Some(PostId(7)),
            user_id: UserId(3),
            title: "hello".to_string(),
            body: "world".to_string(),
        }];

        let text = render_table(&view(&rows, LoadState::Loaded));
        let lines: Vec<&str> = text.lines().collect();

        assert!(lines[0].starts_with("id"));
        assert!(lines[0].contains("userId"));
        assert!(lines[2].starts_with("7 "));
        assert!(lines[2].contains("hello"));
        assert_eq!(lines[3], "1 – 1 of 1   page 1/1   5 per page");
    }

    #[test]
    fn initial_load_shows_placeholder() {
        let text = render_table(&view(&[], LoadState::Loading));
        assert_eq!(text, "Loading posts…\n");
    }

    #[test]
    fn failed_refresh_is_flagged() {
        let text = render_table(&view(&[], LoadState::LoadFailed));
        assert!(text.contains("(no posts)"));
        assert!(text.contains("(last refresh failed)"));
    }
}
