use rusqlite::{params, Connection};

use freightbook_core::BranchMapping;

use crate::error::StoreError;

/// All hierarchy edges, ordered by child branch.
pub fn fetch_mappings(conn: &Connection) -> Result<Vec<BranchMapping>, StoreError> {
    let mut stmt = conn
        .prepare("SELECT child_branch, parent_branch FROM branch_mappings ORDER BY child_branch")?;
    let mut rows = stmt.query([])?;
    let mut out = Vec::new();
    while let Some(row) = rows.next()? {
        out.push(BranchMapping {
            child: row.get(0)?,
            parent: row.get(1)?,
        });
    }
    Ok(out)
}

/// Create or repoint one hierarchy edge. Names are trimmed and
/// upper-cased before storage; blanks and self-edges are rejected.
pub fn upsert_mapping(conn: &Connection, child: &str, parent: &str) -> Result<(), StoreError> {
    let child = child.trim().to_uppercase();
    let parent = parent.trim().to_uppercase();
    if child.is_empty() || parent.is_empty() {
        return Err(StoreError::InvalidMapping(
            "child and parent must both be non-empty".into(),
        ));
    }
    if child == parent {
        return Err(StoreError::InvalidMapping(format!(
            "'{child}' cannot report to itself"
        )));
    }
    conn.execute(
        "INSERT INTO branch_mappings (child_branch, parent_branch) VALUES (?1, ?2) \
         ON CONFLICT (child_branch) DO UPDATE SET parent_branch = excluded.parent_branch",
        params![child, parent],
    )?;
    Ok(())
}

/// Remove one edge. Returns false when the child has no mapping.
pub fn delete_mapping(conn: &Connection, child: &str) -> Result<bool, StoreError> {
    let changed = conn.execute(
        "DELETE FROM branch_mappings WHERE child_branch = ?1",
        params![child.trim().to_uppercase()],
    )?;
    Ok(changed > 0)
}
