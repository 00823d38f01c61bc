/*!
Category enum for the ACPI tables this tool knows how to show.

Variants (fixed dispatch order):
  nfit (NVDIMM Firmware Interface Table)
  pcat (Platform Configuration Attributes Table)
  pmtt (Platform Memory Topology Table)

Helpers:
  - all()
  - from_str_ci()
  - signature()
  - title()
*/

use std::fmt;

use serde::Serialize;

/// One of the ACPI table kinds queried by `show --system`.
///
/// The declaration order is the dispatch order; `Ord` follows it so a
/// `BTreeSet<Category>` iterates the same way the dispatcher does.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// NVDIMM Firmware Interface Table
    Nfit,
    /// Platform Configuration Attributes Table
    Pcat,
    /// Platform Memory Topology Table
    Pmtt,
}

impl Category {
    /// All categories, in dispatch order.
    pub const fn all() -> &'static [Category] {
        &[Category::Nfit, Category::Pcat, Category::Pmtt]
    }

    /// Case-insensitive name match (surrounding whitespace ignored).
    pub fn from_str_ci(s: &str) -> Option<Self> {
        let norm = s.trim();
        Category::all()
            .iter()
            .copied()
            .find(|c| c.name().eq_ignore_ascii_case(norm))
    }

    /// Lowercase token accepted on the command line.
    pub const fn name(self) -> &'static str {
        match self {
            Category::Nfit => "nfit",
            Category::Pcat => "pcat",
            Category::Pmtt => "pmtt",
        }
    }

    /// Four byte ACPI signature of the table.
    pub const fn signature(self) -> [u8; 4] {
        match self {
            Category::Nfit => *b"NFIT",
            Category::Pcat => *b"PCAT",
            Category::Pmtt => *b"PMTT",
        }
    }

    /// Long human-readable table name.
    pub const fn title(self) -> &'static str {
        match self {
            Category::Nfit => "NVDIMM Firmware Interface Table",
            Category::Pcat => "Platform Configurations Attributes Table",
            Category::Pmtt => "Platform Memory Topology Table",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/* --------------------------------- Tests ---------------------------------- */
