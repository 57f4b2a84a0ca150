use std::fmt::{Display, Formatter};

/// The declared type of a positional field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    /// An `i32` field. Always holds a value.
    Raw,
    /// An `Option<i32>` field.
    Nullable,
}

impl ScalarKind {
    /// Converts a value from a value sequence into this kind's representation.
    pub fn wrap(self, value: i32) -> Scalar {
        match self {
            ScalarKind::Raw => Scalar::Raw(value),
            ScalarKind::Nullable => Scalar::Nullable(Some(value)),
        }
    }

    /// Like [`wrap`](ScalarKind::wrap), but for possibly absent values.
    ///
    /// Returns `None` if `value` is absent and this kind can't represent that.
    pub fn wrap_optional(self, value: Option<i32>) -> Option<Scalar> {
        match (self, value) {
            (kind, Some(value)) => Some(kind.wrap(value)),
            (ScalarKind::Nullable, None) => Some(Scalar::Nullable(None)),
            (ScalarKind::Raw, None) => None,
        }
    }
}

impl Display for ScalarKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ScalarKind::Raw => write!(f, "i32"),
            ScalarKind::Nullable => write!(f, "Option<i32>"),
        }
    }
}

/// A value moving in or out of a positional field, tagged with the field's [`ScalarKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scalar {
    Raw(i32),
    Nullable(Option<i32>),
}

impl Scalar {
    pub fn kind(&self) -> ScalarKind {
        match self {
            Scalar::Raw(_) => ScalarKind::Raw,
            Scalar::Nullable(_) => ScalarKind::Nullable,
        }
    }

    /// The integer held, with the nullable wrapping removed.
    pub fn value(&self) -> Option<i32> {
        match *self {
            Scalar::Raw(value) => Some(value),
            Scalar::Nullable(value) => value,
        }
    }
}

impl From<i32> for Scalar {
    fn from(value: i32) -> Self {
        Scalar::Raw(value)
    }
}

impl From<Option<i32>> for Scalar {
    fn from(value: Option<i32>) -> Self {
        Scalar::Nullable(value)
    }
}
