//! Directory-backed [`ConfigService`]: one file per table, named by signature.
//!
//! On Linux the kernel exports the firmware tables under
//! `/sys/firmware/acpi/tables` (root only). Any directory laid out the same
//! way (e.g. a dump taken with `acpidump -b` and renamed) works too.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use tracing::{debug, trace};

use super::{AcpiTable, ConfigService, QueryError};
use crate::cmd::category::Category;
use crate::error::ShowError;

/// Default firmware table directory.
pub const DEFAULT_TABLES_DIR: &str = "/sys/firmware/acpi/tables";

/// Tables read from a directory of raw table files.
#[derive(Debug, Clone)]
pub struct FirmwareTables {
    root: PathBuf,
}

impl FirmwareTables {
    /// Open `root`, failing if it is not a readable directory.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, ShowError> {
        let root = root.into();
        let unavailable = |source: io::Error| ShowError::CollaboratorUnavailable {
            path: root.clone(),
            source,
        };

        let meta = fs::metadata(&root).map_err(unavailable)?;
        if !meta.is_dir() {
            return Err(unavailable(io::Error::new(
                io::ErrorKind::InvalidInput,
                "not a directory",
            )));
        }
        debug!(root = %root.display(), "opened firmware table directory");
        Ok(FirmwareTables { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, category: Category) -> PathBuf {
        self.root.join(category.name().to_ascii_uppercase())
    }

    fn read(&self, category: Category) -> Result<AcpiTable, QueryError> {
        let path = self.path_for(category);
        trace!(path = %path.display(), "reading table");
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(QueryError::NotFound),
            Err(source) => return Err(QueryError::Io { path, source }),
        };
        AcpiTable::from_bytes(category.signature(), bytes)
    }
}

impl ConfigService for FirmwareTables {
    fn primary_interface_table(&self) -> Result<AcpiTable, QueryError> {
        self.read(Category::Nfit)
    }

    fn platform_attributes_table(&self) -> Result<AcpiTable, QueryError> {
        self.read(Category::Pcat)
    }

    fn topology_table(&self) -> Result<AcpiTable, QueryError> {
        self.read(Category::Pmtt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::table_bytes;

    #[test]
    fn open_missing_directory_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let err = FirmwareTables::open(dir.path().join("absent")).unwrap_err();
        assert!(matches!(err, ShowError::CollaboratorUnavailable { .. }));
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn open_file_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("NFIT");
        fs::write(&file, b"x").unwrap();
        let err = FirmwareTables::open(&file).unwrap_err();
        match &err {
            ShowError::CollaboratorUnavailable { source, .. } => {
                assert_eq!(source.to_string(), "not a directory")
            }
            other => panic!("expected unavailable, got {other:?}"),
        }
    }

    #[test]
    fn reads_tables_by_signature() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("NFIT"), table_bytes(*b"NFIT", &[0xde, 0xad])).unwrap();
        fs::write(dir.path().join("PMTT"), table_bytes(*b"PMTT", &[])).unwrap();

        let svc = FirmwareTables::open(dir.path()).unwrap();
        assert_eq!(svc.root(), dir.path());

        let nfit = svc.primary_interface_table().unwrap();
        assert_eq!(nfit.header().signature, "NFIT");
        assert_eq!(nfit.body(), &[0xde, 0xad]);

        assert!(svc.platform_attributes_table().unwrap_err().is_not_found());
        assert_eq!(svc.topology_table().unwrap().header().signature, "PMTT");
    }

    #[test]
    fn corrupt_table_is_query_error_not_absence() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("PCAT"), b"PCAT garbage").unwrap();
        let svc = FirmwareTables::open(dir.path()).unwrap();
        let err = svc.platform_attributes_table().unwrap_err();
        assert!(matches!(err, QueryError::Malformed { .. }));
    }

    #[test]
    fn unreadable_entry_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where a table file is expected cannot be read as bytes.
        fs::create_dir(dir.path().join("NFIT")).unwrap();
        let svc = FirmwareTables::open(dir.path()).unwrap();
        let err = svc.primary_interface_table().unwrap_err();
        assert!(matches!(err, QueryError::Io { .. }));
    }
}
