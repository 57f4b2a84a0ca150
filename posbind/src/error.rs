use crate::ScalarKind;
use posbind_convention::ConventionError;
use thiserror::Error;

/// Why a single field could not be read or written.
///
/// Returned by field accessors. The binder wraps it in [`Error::FieldAccess`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccessError {
    #[error("field has no setter")]
    NotWritable,
    #[error("field holds `{expected}`, got a `{found}` value")]
    KindMismatch {
        expected: ScalarKind,
        found: ScalarKind,
    },
}

/// Errors of index building and binding.
///
/// None of these are transient: they point at a malformed record type or at a caller that
/// disagrees with the record type about its shape.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("malformed record type `{record}`")]
    MalformedType {
        record: &'static str,
        #[source]
        source: ConventionError,
    },
    #[error("record type `{record}` has {expected} positional fields, but {found} values were given")]
    LengthMismatch {
        record: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("cannot access field `{field}` of `{record}`")]
    FieldAccess {
        record: &'static str,
        field: &'static str,
        #[source]
        source: AccessError,
    },
    #[error("field `{field}` of `{record}` holds no value")]
    NullValue {
        record: &'static str,
        field: &'static str,
    },
    #[error("record type `{record}` was not registered")]
    Unregistered { record: &'static str },
}
