use crate::{AccessError, Binder, Error, FieldIndex, Scalar, ScalarKind};

/// Reads a field out of a record.
pub type Getter<R> = fn(&R) -> Scalar;

/// Writes a field of a record. Fails if the value's kind isn't the field's kind.
pub type Setter<R> = fn(&mut R, Scalar) -> Result<(), AccessError>;

/// One field of a record type, as declared.
///
/// A record type lists these in a static table, see [`Record::declared_fields`].
pub struct FieldDecl<R> {
    pub name: &'static str,
    pub kind: ScalarKind,
    pub get: Getter<R>,
    /// `None` for fields that can't be written.
    pub set: Option<Setter<R>>,
}

impl<R> FieldDecl<R> {
    /// A readable and writable field.
    pub const fn new(
        name: &'static str,
        kind: ScalarKind,
        get: Getter<R>,
        set: Setter<R>,
    ) -> Self {
        Self {
            name,
            kind,
            get,
            set: Some(set),
        }
    }

    /// A field that can be read but not written.
    pub const fn read_only(name: &'static str, kind: ScalarKind, get: Getter<R>) -> Self {
        Self {
            name,
            kind,
            get,
            set: None,
        }
    }
}

/// A type whose scalar fields can be enumerated, read and written by name.
///
/// Should be derived using [`Positional`](macro@crate::Positional), which also implements
/// [`Positional`](trait@crate::Positional). Implementing it by hand works too: list the fields
/// in a `static` table.
///
/// ```rust
/// use posbind::{AccessError, FieldDecl, FieldIndex, Record, Scalar, ScalarKind};
///
/// #[derive(Default)]
/// struct Pair {
///     a2: i32,
///     a1: i32,
/// }
///
/// fn get_a1(p: &Pair) -> Scalar { Scalar::Raw(p.a1) }
/// fn get_a2(p: &Pair) -> Scalar { Scalar::Raw(p.a2) }
/// fn set_a1(p: &mut Pair, v: Scalar) -> Result<(), AccessError> {
///     match v {
///         Scalar::Raw(v) => {
///             p.a1 = v;
///             Ok(())
///         }
///         other => Err(AccessError::KindMismatch { expected: ScalarKind::Raw, found: other.kind() }),
///     }
/// }
/// fn set_a2(p: &mut Pair, v: Scalar) -> Result<(), AccessError> {
///     match v {
///         Scalar::Raw(v) => {
///             p.a2 = v;
///             Ok(())
///         }
///         other => Err(AccessError::KindMismatch { expected: ScalarKind::Raw, found: other.kind() }),
///     }
/// }
///
/// impl Record for Pair {
///     const NAME: &'static str = "Pair";
///
///     fn declared_fields() -> &'static [FieldDecl<Self>] {
///         static FIELDS: [FieldDecl<Pair>; 2] = [
///             FieldDecl::new("a2", ScalarKind::Raw, get_a2, set_a2),
///             FieldDecl::new("a1", ScalarKind::Raw, get_a1, set_a1),
///         ];
///         &FIELDS
///     }
/// }
///
/// let index = FieldIndex::<Pair>::build().unwrap();
/// assert_eq!(index.names().collect::<Vec<_>>(), ["a1", "a2"]);
/// ```
pub trait Record: Default + 'static {
    /// Used in error messages.
    const NAME: &'static str;

    /// Fields named `PREFIX` followed by a number take part in positional binding.
    const PREFIX: &'static str = posbind_convention::DEFAULT_PREFIX;

    /// Every field of the type that has an accessor, in declaration order.
    ///
    /// May include fields that don't follow the naming convention; the index skips those.
    fn declared_fields() -> &'static [FieldDecl<Self>];
}

/// Record types with a lazily built, process-wide [`FieldIndex`].
///
/// Implemented by [`Positional`](macro@crate::Positional), or with [`impl_positional!`](crate::impl_positional) for
/// hand-written [`Record`] implementations.
pub trait Positional: Record {
    /// The field index of this type. Built on first use and kept for the rest of the process.
    /// A malformed type fails here, every time, before anything is bound.
    fn field_index() -> Result<&'static FieldIndex<Self>, Error>;

    /// Creates a record whose positional fields hold `values`, in order-key order.
    fn from_values(values: &[i32]) -> Result<Self, Error> {
        Binder::new(Self::field_index()?).bind(values)
    }

    /// The positional fields of this record, in order-key order.
    fn values(&self) -> Result<Vec<i32>, Error> {
        Binder::new(Self::field_index()?).read(self)
    }
}

/// Implements [`Positional`] for a type that implements [`Record`].
///
/// The index is cached in a `static` inside the generated function, so this only works for
/// types without generic parameters.
#[macro_export]
macro_rules! impl_positional {
    ($record:ty) => {
        impl $crate::Positional for $record {
            fn field_index() -> ::std::result::Result<
                &'static $crate::FieldIndex<Self>,
                $crate::Error,
            > {
                static INDEX: ::std::sync::OnceLock<
                    ::std::result::Result<$crate::FieldIndex<$record>, $crate::Error>,
                > = ::std::sync::OnceLock::new();

                INDEX
                    .get_or_init($crate::FieldIndex::build)
                    .as_ref()
                    .map_err(::std::clone::Clone::clone)
            }
        }
    };
}
