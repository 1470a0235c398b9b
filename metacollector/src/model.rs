//! In-memory registry of annotated classes, built by extraction and
//! consumed read-only by validation and emission.

use crate::errors::ScanError;

/// A single annotated property inside a class body.
///
/// `type_name` is the whitespace-joined run of every argument token before
/// the final name token. Immutable once appended to its class record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    pub name: String,
    pub type_name: String,
    pub read: Option<String>,
    pub write: Option<String>,
}

impl Property {
    /// A trivial property names no accessors and is stored as a plain field.
    pub fn is_trivial(&self) -> bool {
        self.read.is_none() && self.write.is_none()
    }

    /// Only assignments need forwarding, so storage goes through the
    /// wrapper exactly when a write accessor is named.
    pub fn needs_wrapper(&self) -> bool {
        self.write.is_some()
    }
}

/// One annotated class discovered in an input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassRecord {
    pub name: String,
    pub properties: Vec<Property>,
    pub has_class_data: bool,
}

impl ClassRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: Vec::new(),
            has_class_data: false,
        }
    }
}

/// Every committed class across all processed inputs, in discovery order,
/// plus the inputs that contributed at least one of them.
///
/// Ordering is load-bearing: emission walks these lists as-is, which is what
/// makes regeneration byte-identical for an unchanged input set.
#[derive(Debug, Default)]
pub struct Registry {
    pub classes: Vec<ClassRecord>,
    pub includes: Vec<String>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails on the first committed class that never saw its CLASSDATA
    /// marker. Runs after all inputs are scanned and before any output file
    /// is opened.
    pub fn validate(&self) -> Result<(), ScanError> {
        for class in &self.classes {
            if !class.has_class_data {
                return Err(ScanError::MissingClassData {
                    class: class.name.clone(),
                });
            }
        }
        Ok(())
    }
}
