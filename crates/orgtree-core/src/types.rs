use crate::error::{OrgTreeError, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;

// ---------------------------------------------------------------------------
// Employee / Position
// ---------------------------------------------------------------------------

/// Boss id marking a root of the hierarchy.
pub const ROOT_BOSS_ID: i64 = 0;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: i64,
    pub name: String,
    pub position: i64,
    pub boss_id: i64,
}

impl Employee {
    pub fn new(id: i64, name: impl Into<String>, position: i64, boss_id: i64) -> Self {
        Self {
            id,
            name: name.into(),
            position,
            boss_id,
        }
    }

    pub fn is_root(&self) -> bool {
        self.boss_id == ROOT_BOSS_ID
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub id: i64,
    pub label: String,
}

impl Position {
    pub fn new(id: i64, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// OrderSequence
// ---------------------------------------------------------------------------

/// Root-to-node path of employee ids, written `1-4-7`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OrderSequence {
    ids: Vec<i64>,
}

impl OrderSequence {
    pub fn root(id: i64) -> Self {
        Self { ids: vec![id] }
    }

    pub fn child(&self, id: i64) -> Self {
        let mut ids = self.ids.clone();
        ids.push(id);
        Self { ids }
    }

    pub fn ids(&self) -> &[i64] {
        &self.ids
    }

    /// Number of separators, which is the depth below the root.
    pub fn depth(&self) -> u32 {
        (self.ids.len() - 1) as u32
    }

    pub fn leaf(&self) -> i64 {
        self.ids[self.ids.len() - 1]
    }

    /// Path of the immediate boss, `None` for a root.
    pub fn parent(&self) -> Option<OrderSequence> {
        if self.ids.len() < 2 {
            return None;
        }
        Some(Self {
            ids: self.ids[..self.ids.len() - 1].to_vec(),
        })
    }
}

impl fmt::Display for OrderSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, id) in self.ids.iter().enumerate() {
            if i > 0 {
                f.write_str("-")?;
            }
            write!(f, "{id}")?;
        }
        Ok(())
    }
}

impl std::str::FromStr for OrderSequence {
    type Err = OrgTreeError;

    fn from_str(s: &str) -> Result<Self> {
        let ids = s
            .split('-')
            .map(|part| part.trim().parse::<i64>())
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|_| OrgTreeError::InvalidOrderSequence(s.to_string()))?;
        Ok(Self { ids })
    }
}

impl Serialize for OrderSequence {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for OrderSequence {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// TreeRow
// ---------------------------------------------------------------------------

/// One resolved employee: position label substituted, depth and path attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeRow {
    pub id: i64,
    pub name: String,
    pub position: String,
    pub level: u32,
    pub order_sequence: OrderSequence,
}

impl TreeRow {
    /// Build a row from raw store columns, checking that the path ends at
    /// `id` and that `level` matches the path depth.
    pub fn from_columns(
        id: i64,
        name: String,
        position: String,
        level: i64,
        order_sequence: &str,
    ) -> Result<Self> {
        let seq: OrderSequence = order_sequence.parse()?;
        let level_ok = u32::try_from(level).is_ok_and(|l| l == seq.depth());
        if seq.leaf() != id || !level_ok {
            return Err(OrgTreeError::RowMismatch {
                id,
                level: level.max(0) as u32,
                sequence: order_sequence.to_string(),
            });
        }
        Ok(Self {
            id,
            name,
            position,
            level: seq.depth(),
            order_sequence: seq,
        })
    }

    /// `"<name>, <position lowercased>"`, shared by the console and HTML views.
    pub fn caption(&self) -> String {
        format!("{}, {}", self.name, self.position.to_lowercase())
    }
}

// ---------------------------------------------------------------------------
// SortOrder
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Compare the parsed id paths: `1-2` before `1-10`.
    #[default]
    Numeric,
    /// Compare the joined strings: `1-10` before `1-2`.
    Lexicographic,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Numeric => "numeric",
            SortOrder::Lexicographic => "lexicographic",
        }
    }

    pub fn compare(self, a: &OrderSequence, b: &OrderSequence) -> Ordering {
        match self {
            SortOrder::Numeric => a.ids().cmp(b.ids()),
            SortOrder::Lexicographic => a.to_string().cmp(&b.to_string()),
        }
    }

    /// Sort rows into pre-order; every boss lands before its subordinates.
    pub fn sort(self, rows: &mut [TreeRow]) {
        rows.sort_by(|a, b| self.compare(&a.order_sequence, &b.order_sequence));
    }

    pub fn sorted(self, rows: &[TreeRow]) -> Vec<TreeRow> {
        let mut out = rows.to_vec();
        self.sort(&mut out);
        out
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SortOrder {
    type Err = OrgTreeError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "numeric" => Ok(SortOrder::Numeric),
            "lexicographic" | "lexical" => Ok(SortOrder::Lexicographic),
            _ => Err(OrgTreeError::UnknownVariant {
                kind: "sort order",
                value: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: i64, seq: &str) -> TreeRow {
        let level = seq.matches('-').count() as i64;
        TreeRow::from_columns(id, format!("E{id}"), "Pos".into(), level, seq).unwrap()
    }

    #[test]
    fn order_sequence_parse_and_display() {
        let seq: OrderSequence = "1-4-7".parse().unwrap();
        assert_eq!(seq.ids(), &[1, 4, 7]);
        assert_eq!(seq.depth(), 2);
        assert_eq!(seq.leaf(), 7);
        assert_eq!(seq.to_string(), "1-4-7");
        assert_eq!(seq.parent().unwrap().to_string(), "1-4");
        assert!(OrderSequence::root(1).parent().is_none());
    }

    #[test]
    fn order_sequence_rejects_garbage() {
        assert!("1--2".parse::<OrderSequence>().is_err());
        assert!("".parse::<OrderSequence>().is_err());
        assert!("a-b".parse::<OrderSequence>().is_err());
    }

    #[test]
    fn order_sequence_serializes_as_string() {
        let seq = OrderSequence::root(10).child(3);
        assert_eq!(serde_json::to_string(&seq).unwrap(), "\"10-3\"");
        let back: OrderSequence = serde_json::from_str("\"10-3\"").unwrap();
        assert_eq!(back, seq);
    }

    #[test]
    fn from_columns_checks_level() {
        let err = TreeRow::from_columns(2, "B".into(), "P".into(), 0, "1-2").unwrap_err();
        assert!(matches!(err, OrgTreeError::RowMismatch { id: 2, .. }));
    }

    #[test]
    fn from_columns_checks_leaf() {
        let err = TreeRow::from_columns(3, "B".into(), "P".into(), 1, "1-2").unwrap_err();
        assert!(matches!(err, OrgTreeError::RowMismatch { id: 3, .. }));
    }

    #[test]
    fn caption_lowercases_position() {
        let r = TreeRow::from_columns(1, "Анна".into(), "Супервайзер".into(), 0, "1").unwrap();
        assert_eq!(r.caption(), "Анна, супервайзер");
    }

    #[test]
    fn numeric_sort_orders_ten_after_two() {
        let mut rows = vec![row(10, "1-10"), row(2, "1-2"), row(1, "1")];
        SortOrder::Numeric.sort(&mut rows);
        let seqs: Vec<String> = rows.iter().map(|r| r.order_sequence.to_string()).collect();
        assert_eq!(seqs, vec!["1", "1-2", "1-10"]);
    }

    #[test]
    fn lexicographic_sort_orders_ten_before_two() {
        let mut rows = vec![row(2, "1-2"), row(10, "1-10"), row(1, "1")];
        SortOrder::Lexicographic.sort(&mut rows);
        let seqs: Vec<String> = rows.iter().map(|r| r.order_sequence.to_string()).collect();
        assert_eq!(seqs, vec!["1", "1-10", "1-2"]);
    }

    #[test]
    fn compare_decides_the_two_orders_apart() {
        let two: OrderSequence = "1-2".parse().unwrap();
        let ten: OrderSequence = "1-10".parse().unwrap();
        assert_eq!(SortOrder::Numeric.compare(&two, &ten), Ordering::Less);
        assert_eq!(SortOrder::Lexicographic.compare(&two, &ten), Ordering::Greater);
        assert_eq!(SortOrder::Numeric.compare(&ten, &ten), Ordering::Equal);
    }

    #[test]
    fn both_orders_put_parents_first() {
        let rows = vec![
            row(7, "10-9-7"),
            row(9, "10-9"),
            row(10, "10"),
            row(2, "1-2"),
            row(1, "1"),
            row(4, "1-2-4"),
        ];
        for order in [SortOrder::Numeric, SortOrder::Lexicographic] {
            let sorted = order.sorted(&rows);
            for (i, r) in sorted.iter().enumerate() {
                if let Some(parent) = r.order_sequence.parent() {
                    let pos = sorted
                        .iter()
                        .position(|p| p.order_sequence == parent)
                        .unwrap();
                    assert!(pos < i, "{order}: parent of {} came later", r.id);
                }
            }
        }
    }

    #[test]
    fn sort_order_from_str() {
        assert_eq!("numeric".parse::<SortOrder>().unwrap(), SortOrder::Numeric);
        assert_eq!(
            "lexicographic".parse::<SortOrder>().unwrap(),
            SortOrder::Lexicographic
        );
        assert!("random".parse::<SortOrder>().is_err());
    }
}
