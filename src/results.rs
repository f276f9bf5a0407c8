use serde::{Serialize, Serializer};
use std::path::PathBuf;

/// Value written for a field that could not be extracted
pub const UNKNOWN: &str = "unknown";

/// One business entry extracted from a result page
///
/// `None` marks an unknown field. Serialised with the directory's own field
/// names (`nombre`, `direccion`, `telefono`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListingRecord {
    #[serde(rename = "nombre", serialize_with = "known_or_unknown")]
    pub name: Option<String>,

    #[serde(rename = "direccion", serialize_with = "known_or_unknown")]
    pub address: Option<String>,

    #[serde(rename = "telefono", serialize_with = "known_or_unknown")]
    pub phone: Option<String>,
}

impl ListingRecord {
    /// Create a record from extracted field values
    pub fn new(name: Option<String>, address: Option<String>, phone: Option<String>) -> Self {
        Self {
            name,
            address,
            phone,
        }
    }

    /// Whether the record identifies a business: a phone number alone does not
    pub fn is_identifiable(&self) -> bool {
        self.name.is_some() || self.address.is_some()
    }
}

fn known_or_unknown<S: Serializer>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(value.as_deref().unwrap_or(UNKNOWN))
}

/// Records extracted from a single loaded page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageResult {
    /// Container selector that matched this page
    pub selector: String,
    /// Number of containers the selector matched
    pub containers: usize,
    /// Kept records, in document order
    pub records: Vec<ListingRecord>,
}

/// Summary of a finished run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunResult {
    pub total_records: usize,
    pub pages_visited: u32,
    pub output_path: PathBuf,
}
