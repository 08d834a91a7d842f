use std::io::Write;
use std::time::Duration;

use crate::error::Result;
use crate::types::{SortOrder, TreeRow};

/// Write one line per employee: `level` tabs, then `"<name>, <position>"`.
///
/// `pace` sleeps between lines for a typewriter effect; pass
/// `Duration::ZERO` to write everything at once.
pub fn render<W: Write>(
    rows: &[TreeRow],
    order: SortOrder,
    pace: Duration,
    out: &mut W,
) -> Result<()> {
    let sorted = order.sorted(rows);
    for (i, row) in sorted.iter().enumerate() {
        if i > 0 && !pace.is_zero() {
            std::thread::sleep(pace);
        }
        writeln!(out, "{}", line(row))?;
        out.flush()?;
    }
    Ok(())
}

pub fn line(row: &TreeRow) -> String {
    format!("{}{}", "\t".repeat(row.level as usize), row.caption())
}
