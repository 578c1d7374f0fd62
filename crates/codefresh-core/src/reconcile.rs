//! set reconciliation between desired and existing identifier lists.

/// additions and removals needed to converge existing onto desired.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diff {
    /// ids present in desired but missing from existing.
    pub to_add: Vec<String>,
    /// ids present in existing but missing from desired.
    pub to_remove: Vec<String>,
}

impl Diff {
    /// return true when nothing needs to change.
    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }
}

/// compute the add/remove lists for `desired` against `existing`.
///
/// ids are compared by exact string equality and input order is preserved.
/// duplicates are passed through untouched. an empty `desired` yields a
/// removal of every existing id.
pub fn diff<D, E>(desired: &[D], existing: &[E]) -> Diff
where
    D: AsRef<str>,
    E: AsRef<str>,
{
    let to_remove = existing
        .iter()
        .filter(|id| !desired.iter().any(|d| d.as_ref() == id.as_ref()))
        .map(|id| id.as_ref().to_string())
        .collect();
    let to_add = desired
        .iter()
        .filter(|id| !existing.iter().any(|e| e.as_ref() == id.as_ref()))
        .map(|id| id.as_ref().to_string())
        .collect();

    Diff { to_add, to_remove }
}
