//! Column identifier resolver (spec §4.3).
//!
//! Translates a comma-separated expression of indices, names, ranges and
//! exclusions into an ordered list of zero-based column positions against
//! a given header.

use crate::errors::*;

/// A comma-separated column-selection expression, not yet resolved
/// against a header.
#[derive(Debug, Clone, Default)]
pub struct ColumnSelection {
    expr: String,
}

impl ColumnSelection {
    pub fn new(expr: impl Into<String>) -> Self {
        ColumnSelection { expr: expr.into() }
    }

    pub fn empty() -> Self {
        ColumnSelection::default()
    }

    /// Resolve this expression's include list against `header`, with the
    /// given column offset (subtracted from 1-based indices after
    /// validation; spec §4.3's "Offset" paragraph).
    pub fn resolve(&self, header: &[String], offset: usize) -> Result<Vec<usize>> {
        if self.expr.trim().is_empty() {
            return Ok((0..header.len()).collect());
        }
        resolve_expr(&self.expr, header, offset)
    }

    /// Resolve this expression as an *excludes* list; an empty expression
    /// means "exclude nothing".
    pub fn resolve_excludes(&self, header: &[String], offset: usize) -> Result<Vec<usize>> {
        if self.expr.trim().is_empty() {
            return Ok(Vec::new());
        }
        resolve_expr(&self.expr, header, offset)
    }
}

/// Resolve `includes` against `header`, then remove `excludes`, preserving
/// the include expression's order of first appearance.
pub fn select_columns(
    includes: &ColumnSelection,
    excludes: &ColumnSelection,
    header: &[String],
    offset: usize,
) -> Result<Vec<usize>> {
    let included = includes.resolve(header, offset)?;
    let excluded = excludes.resolve_excludes(header, offset)?;
    Ok(included
        .into_iter()
        .filter(|i| !excluded.contains(i))
        .collect())
}

fn resolve_expr(expr: &str, header: &[String], offset: usize) -> Result<Vec<usize>> {
    let mut out = Vec::new();
    for atom in expr.split(',') {
        let atom = atom.trim();
        if atom.is_empty() {
            continue;
        }
        if let Some((a, b)) = split_range(atom) {
            let start = resolve_atom(a, header)?;
            let end = resolve_atom(b, header)?;
            let (lo, hi) = if start <= end { (start, end) } else { (end, start) };
            for i in lo..=hi {
                out.push(apply_offset(i, offset, atom)?);
            }
        } else {
            let idx = resolve_atom(atom, header)?;
            out.push(apply_offset(idx, offset, atom)?);
        }
    }
    Ok(out)
}

/// Split `A-B` into its two sides. A bare `-N` (negative number) is not a
/// range; ranges only apply to a hyphen strictly between two non-empty
/// sides.
fn split_range(atom: &str) -> Option<(&str, &str)> {
    let idx = atom.find('-')?;
    if idx == 0 {
        return None;
    }
    let (a, b) = (&atom[..idx], &atom[idx + 1..]);
    if a.is_empty() || b.is_empty() {
        return None;
    }
    Some((a, b))
}

/// Resolve one atom (index or name) to a *zero-based* column index,
/// header-relative (before the offset is applied).
fn resolve_atom(atom: &str, header: &[String]) -> Result<usize> {
    let atom = atom.trim();
    if let Ok(n) = atom.parse::<i64>() {
        if n <= 0 {
            return Err(ErrorKind::ColumnIdentifierError(
                atom.to_string(),
                "column index must be a positive integer".to_string(),
            )
            .into());
        }
        if n as usize > header.len() {
            return Err(ErrorKind::ColumnIdentifierError(
                atom.to_string(),
                format!("column index exceeds header length ({})", header.len()),
            )
            .into());
        }
        return Ok(n as usize - 1);
    }
    header
        .iter()
        .position(|h| h == atom)
        .ok_or_else(|| {
            ErrorKind::ColumnIdentifierError(atom.to_string(), "no such column name".to_string())
                .into()
        })
}

fn apply_offset(idx: usize, offset: usize, atom: &str) -> Result<usize> {
    idx.checked_sub(offset).ok_or_else(|| {
        ErrorKind::ColumnIdentifierError(
            atom.to_string(),
            format!("column offset {} exceeds resolved index", offset),
        )
        .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header() -> Vec<String> {
        vec!["a", "b", "c", "d"].into_iter().map(String::from).collect()
    }

    #[test]
    fn empty_expression_selects_all_columns_in_order() {
        let sel = ColumnSelection::empty();
        assert_eq!(sel.resolve(&header(), 0).unwrap(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn indices_are_one_based() {
        let sel = ColumnSelection::new("1,3");
        assert_eq!(sel.resolve(&header(), 0).unwrap(), vec![0, 2]);
    }

    #[test]
    fn names_resolve_by_exact_match() {
        let sel = ColumnSelection::new("b,d");
        assert_eq!(sel.resolve(&header(), 0).unwrap(), vec![1, 3]);
    }

    #[test]
    fn ranges_are_inclusive_and_swapped_if_reversed() {
        let sel = ColumnSelection::new("2-4");
        assert_eq!(sel.resolve(&header(), 0).unwrap(), vec![1, 2, 3]);
        let sel = ColumnSelection::new("4-2");
        assert_eq!(sel.resolve(&header(), 0).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn mixed_name_and_index_ranges() {
        let sel = ColumnSelection::new("a-c");
        assert_eq!(sel.resolve(&header(), 0).unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn preserves_order_of_first_appearance_and_allows_duplicates() {
        let sel = ColumnSelection::new("3,1,3");
        assert_eq!(sel.resolve(&header(), 0).unwrap(), vec![2, 0, 2]);
    }

    #[test]
    fn excludes_remove_from_include_set_preserving_order() {
        let includes = ColumnSelection::empty();
        let excludes = ColumnSelection::new("2");
        let result = select_columns(&includes, &excludes, &header(), 0).unwrap();
        assert_eq!(result, vec![0, 2, 3]);
    }

    #[test]
    fn zero_index_is_an_error() {
        let sel = ColumnSelection::new("0");
        assert!(sel.resolve(&header(), 0).is_err());
    }

    #[test]
    fn out_of_range_index_is_an_error() {
        let sel = ColumnSelection::new("5");
        assert!(sel.resolve(&header(), 0).is_err());
    }

    #[test]
    fn unknown_name_is_an_error() {
        let sel = ColumnSelection::new("zzz");
        assert!(sel.resolve(&header(), 0).is_err());
    }

    #[test]
    fn resolution_is_idempotent() {
        let sel = ColumnSelection::new("c,a-b");
        let first = sel.resolve(&header(), 0).unwrap();
        let second = sel.resolve(&header(), 0).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn offset_is_subtracted_after_validation() {
        // the synthetic line_number column occupies position 0, so
        // header-relative positions are shifted by 1.
        let sel = ColumnSelection::new("2");
        assert_eq!(sel.resolve(&header(), 1).unwrap(), vec![0]);
    }
}
