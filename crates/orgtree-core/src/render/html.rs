use crate::types::{SortOrder, TreeRow};

/// Flat `<ul>` with one `<li>` per employee. Depth is shown by a left margin
/// of `2 * level` em; subordinates get a circle bullet.
pub fn render(rows: &[TreeRow], order: SortOrder) -> String {
    let mut out = String::from("<meta charset=\"UTF-8\">\n<ul>\n");
    for row in order.sorted(rows) {
        let bullet = if row.level > 0 {
            ";list-style-type:circle"
        } else {
            ""
        };
        out.push_str(&format!(
            "<li style=\"margin-left:{}em{}\">{}</li>\n",
            2 * row.level,
            bullet,
            html_escape::encode_text(&row.caption()),
        ));
    }
    out.push_str("</ul>\n");
    out
}
