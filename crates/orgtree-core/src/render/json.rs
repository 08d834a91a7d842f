use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::error::{OrgTreeError, Result};
use crate::types::{SortOrder, TreeRow};

/// Key holding an employee's direct reports.
pub const SUBORDINATE_KEY: &str = "subordinate";

/// Nest rows by id:
/// `{"<id>": {"name", "position", "subordinate": {"<id>": {...}}}}`.
///
/// Rows are sorted first so every boss exists before its reports are
/// inserted. A row whose ancestor is absent (for example because the
/// ancestor's position was unknown) fails with [`OrgTreeError::OrphanRow`].
pub fn build(rows: &[TreeRow], order: SortOrder) -> Result<Value> {
    let mut root = Map::new();
    for row in order.sorted(rows) {
        let ids = row.order_sequence.ids();
        let (ancestors, leaf) = ids.split_at(ids.len() - 1);

        let mut map = &mut root;
        for id in ancestors {
            map = map
                .get_mut(&id.to_string())
                .and_then(|entry| entry.get_mut(SUBORDINATE_KEY))
                .and_then(Value::as_object_mut)
                .ok_or_else(|| OrgTreeError::OrphanRow {
                    id: row.id,
                    sequence: row.order_sequence.to_string(),
                })?;
        }

        map.insert(
            leaf[0].to_string(),
            json!({
                "name": row.name,
                "position": row.position.to_lowercase(),
                SUBORDINATE_KEY: {},
            }),
        );
    }
    Ok(Value::Object(root))
}

/// Pretty-print with 4-space indentation; non-ASCII text stays literal.
pub fn render(rows: &[TreeRow], order: SortOrder) -> Result<String> {
    let tree = build(rows, order)?;
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    tree.serialize(&mut ser)?;
    String::from_utf8(buf)
        .map_err(|e| OrgTreeError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::seed;

    fn row(id: i64, name: &str, position: &str, seq: &str) -> TreeRow {
        let level = seq.matches('-').count() as i64;
        TreeRow::from_columns(id, name.into(), position.into(), level, seq).unwrap()
    }

    #[test]
    fn two_level_example() {
        let rows = vec![row(1, "A", "P1", "1"), row(2, "B", "P2", "1-2")];
        let tree = build(&rows, SortOrder::Numeric).unwrap();
        assert_eq!(
            tree,
            json!({"1": {"name": "A", "position": "p1", "subordinate": {
                "2": {"name": "B", "position": "p2", "subordinate": {}}
            }}})
        );
    }

    #[test]
    fn unsorted_input_still_nests() {
        let rows = vec![
            row(4, "D", "P", "1-2-4"),
            row(2, "B", "P", "1-2"),
            row(1, "A", "P", "1"),
        ];
        let tree = build(&rows, SortOrder::Lexicographic).unwrap();
        assert_eq!(tree["1"]["subordinate"]["2"]["subordinate"]["4"]["name"], "D");
    }

    #[test]
    fn every_row_reachable_by_its_path() {
        let rows = crate::resolver::resolve(&seed::employees(), &seed::positions(), 64).unwrap();
        let tree = build(&rows, SortOrder::Numeric).unwrap();
        for r in &rows {
            let mut node = &tree;
            let ids = r.order_sequence.ids();
            for (i, id) in ids.iter().enumerate() {
                node = &node[id.to_string()];
                if i + 1 < ids.len() {
                    node = &node[SUBORDINATE_KEY];
                }
            }
            assert_eq!(node["name"], r.name.as_str());
            assert_eq!(node["position"], r.position.to_lowercase().as_str());
        }
    }

    #[test]
    fn missing_ancestor_is_orphan_error() {
        let rows = vec![row(1, "A", "P", "1"), row(3, "C", "P", "1-2-3")];
        let err = build(&rows, SortOrder::Numeric).unwrap_err();
        assert!(matches!(err, OrgTreeError::OrphanRow { id: 3, .. }), "{err}");
    }

    #[test]
    fn keys_follow_traversal_order() {
        let rows = vec![
            row(10, "K", "P", "10"),
            row(1, "A", "P", "1"),
            row(2, "B", "P", "1-2"),
        ];
        let text = render(&rows, SortOrder::Numeric).unwrap();
        assert!(text.find("\"1\"").unwrap() < text.find("\"10\"").unwrap());
    }

    #[test]
    fn render_uses_four_space_indent_and_literal_unicode() {
        let rows = vec![row(1, "Дмитрий Иванов", "Региональный директор", "1")];
        let text = render(&rows, SortOrder::Numeric).unwrap();
        let expected = "{\n    \"1\": {\n        \"name\": \"Дмитрий Иванов\",\n        \"position\": \"региональный директор\",\n        \"subordinate\": {}\n    }\n}";
        assert_eq!(text, expected);
    }

    #[test]
    fn empty_rows_render_empty_object() {
        assert_eq!(render(&[], SortOrder::Numeric).unwrap(), "{}");
    }
}
