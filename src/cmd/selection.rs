/*!
Selection parsing for `show --system [TABLES]`.

`parse_selection(None)` selects every table; `parse_selection(Some("nfit,pmtt"))`
selects exactly the named tables. The first unknown token rejects the whole
filter, including empty tokens produced by `""` or a trailing comma.
*/

use std::collections::BTreeSet;

use serde::Serialize;
use thiserror::Error;

use crate::cmd::category::Category;

/// Token delimiter for the `--system` filter value.
pub const FILTER_DELIMITER: char = ',';

/// A filter token that does not name a known ACPI table.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("The provided system ACPI table: {token} is not valid")]
pub struct InvalidFilterError {
    /// Offending token, verbatim
    pub token: String,
}

/// Validated set of categories to query for one invocation.
///
/// Never empty: either the universal set or the tables explicitly named.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Selection(BTreeSet<Category>);

impl Selection {
    /// Every known table.
    pub fn all() -> Self {
        Selection(Category::all().iter().copied().collect())
    }

    pub fn contains(&self, category: Category) -> bool {
        self.0.contains(&category)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_all(&self) -> bool {
        self.0.len() == Category::all().len()
    }
}

/// Parse an optional `--system` value into a [`Selection`].
pub fn parse_selection(filter: Option<&str>) -> Result<Selection, InvalidFilterError> {
    let Some(raw) = filter else {
        // No value: print everything.
        return Ok(Selection::all());
    };

    let mut chosen = BTreeSet::new();
    for token in raw.split(FILTER_DELIMITER) {
        let Some(category) = Category::from_str_ci(token) else {
            return Err(InvalidFilterError {
                token: token.to_string(),
            });
        };
        chosen.insert(category);
    }
    Ok(Selection(chosen))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[Category]) -> Selection {
        Selection(items.iter().copied().collect())
    }

    #[test]
    fn absent_filter_selects_everything() {
        let sel = parse_selection(None).unwrap();
        assert!(sel.is_all());
        assert_eq!(sel, Selection::all());
        assert!(Category::all().iter().all(|c| sel.contains(*c)));
    }

    #[test]
    fn single_table() {
        assert_eq!(
            parse_selection(Some("pcat")).unwrap(),
            set(&[Category::Pcat])
        );
    }

    #[test]
    fn order_and_case_do_not_matter() {
        let a = parse_selection(Some("nfit,PMTT")).unwrap();
        let b = parse_selection(Some("pmtt,Nfit")).unwrap();
        assert_eq!(a, b);
        assert_eq!(a, set(&[Category::Nfit, Category::Pmtt]));
    }

    #[test]
    fn duplicates_collapse() {
        let sel = parse_selection(Some("nfit,NFIT,nfit")).unwrap();
        assert_eq!(sel.len(), 1);
        assert!(sel.contains(Category::Nfit));
    }

    #[test]
    fn explicit_full_list_equals_default() {
        assert_eq!(
            parse_selection(Some("pmtt,pcat,nfit")).unwrap(),
            parse_selection(None).unwrap()
        );
    }

    #[test]
    fn unknown_token_rejects_whole_filter() {
        let err = parse_selection(Some("nfit,bogus")).unwrap_err();
        assert_eq!(err.token, "bogus");
    }

    #[test]
    fn first_unknown_token_is_reported() {
        let err = parse_selection(Some("srat,nfit,hmat")).unwrap_err();
        assert_eq!(err.token, "srat");
    }

    #[test]
    fn empty_string_is_not_absent() {
        let err = parse_selection(Some("")).unwrap_err();
        assert_eq!(err.token, "");
    }

    #[test]
    fn whitespace_around_tokens_is_ignored() {
        assert_eq!(
            parse_selection(Some("nfit, pcat ")).unwrap(),
            set(&[Category::Nfit, Category::Pcat])
        );
        let err = parse_selection(Some("nfit, ")).unwrap_err();
        assert_eq!(err.token, " ");
    }

    #[test]
    fn trailing_comma_is_rejected() {
        let err = parse_selection(Some("nfit,")).unwrap_err();
        assert_eq!(err.token, "");
    }
}
