use thiserror::Error;

/// Fatal conditions raised while scanning annotated sources.
///
/// Every variant aborts the whole run. This is a build-time tool: malformed
/// input stops the build, there is no per-file or per-class recovery.
#[derive(Debug, Error)]
pub enum ScanError {
    /// A marker keyword appeared with no class context open, or at the
    /// wrong brace depth.
    #[error("{file}:{line}: {marker} used outside a class body")]
    MarkerOutsideClass {
        file: String,
        line: usize,
        marker: &'static str,
    },

    /// The property argument list held fewer than a type and a name.
    #[error("{file}:{line}: not enough type/name tokens for PROPERTY")]
    MissingPropertyTokens { file: String, line: usize },

    /// The same accessor kind was specified twice on one property.
    #[error("{class}::{property} has a duplicate {accessor} accessor")]
    DuplicateAccessor {
        class: String,
        property: String,
        accessor: &'static str,
    },

    /// The class-data marker named something other than the enclosing class.
    #[error("CLASSDATA needs the enclosing class name as its argument. Use CLASSDATA ({expected})")]
    ClassDataMismatch { expected: String },

    /// The class-data marker appeared twice on one class.
    #[error("{class} already has CLASSDATA")]
    DuplicateClassData { class: String },

    /// A committed class never saw its class-data marker. Detected only
    /// after every input has been scanned, before any output is opened.
    #[error("{class} does not have the CLASSDATA macro")]
    MissingClassData { class: String },

    /// A required token kind did not match what the stream produced.
    #[error("{file}:{line}: expected {expected}, found '{found}'")]
    UnexpectedToken {
        file: String,
        line: usize,
        expected: &'static str,
        found: String,
    },

    /// The stream ran out where a specific token kind was required.
    #[error("{file}: unexpected end of input, expected {expected}")]
    UnexpectedEnd { file: String, expected: &'static str },
}
