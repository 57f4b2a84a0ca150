//! Positional binding between ordered integer sequences and records.
//!
//! A record type takes part by naming some of its fields `<prefix><order>`, like `a1`, `a2`,
//! ..., `a484`. Those fields, ordered by the number after the prefix, form the record's
//! [`FieldIndex`]. A [`Binder`] stores value `i` of a sequence into the field at position `i`
//! of the index, and reads the fields back in the same order.
//!
//! Fields are `i32` ([`ScalarKind::Raw`]) or `Option<i32>` ([`ScalarKind::Nullable`]).
//! Binding a value into a nullable field stores `Some(value)`.
//!
//! ```rust
//! use posbind::Positional;
//!
//! #[derive(Positional, Default, Debug, PartialEq)]
//! struct Sample {
//!     a3: i32,
//!     a1: i32,
//!     a2: Option<i32>,
//!     label: String,
//! }
//!
//! let sample = Sample::from_values(&[10, 20, 30])?;
//! assert_eq!(sample.a1, 10);
//! assert_eq!(sample.a2, Some(20));
//! assert_eq!(sample.a3, 30);
//! assert_eq!(sample.values()?, [10, 20, 30]);
//! # Ok::<(), posbind::Error>(())
//! ```
//!
//! Derived indices are built on first use and cached for the rest of the process.
//! To control when indices are built, and to configure how absent values are treated,
//! use a [`Registry`] instead.

mod binder;
pub use binder::{BindConfig, Binder, NullPolicy};

mod error;
pub use error::{AccessError, Error};

mod index;
pub use index::{FieldDescriptor, FieldIndex};

#[macro_use]
mod record;
pub use record::{FieldDecl, Getter, Positional, Record, Setter};

mod registry;
pub use registry::{Registry, RegistryBuilder};

mod scalar;
pub use scalar::{Scalar, ScalarKind};

pub use posbind_convention::{ConventionError, OrderKey, DEFAULT_PREFIX};

/// Derive [`Record`] and [`Positional`](trait@Positional).
///
/// Every named field of type `i32` or `Option<i32>` is declared to the index, and fields named
/// `<prefix><order>` become positional. The prefix is `a` unless set with
/// `#[positional(prefix = "...")]`.
///
/// Malformed types are rejected at compile time: a field that starts with the prefix must have
/// a positive numeric order key, no two fields may share a key, and positional fields must be
/// `i32` or `Option<i32>`.
///
/// ```rust
/// use posbind::Positional;
///
/// #[derive(Positional, Default)]
/// #[positional(prefix = "col")]
/// struct Row {
///     col2: i32,
///     col1: i32,
///     id: i32,
/// }
///
/// let row = Row::from_values(&[1, 2])?;
/// assert_eq!((row.col1, row.col2, row.id), (1, 2, 0));
/// # Ok::<(), posbind::Error>(())
/// ```
pub use posbind_macros::Positional;

/// Generate a large positional record for use as a test fixture.
///
/// Syntax:
/// ```grammar
/// $attrs $vis struct $name { $( $option: $value ),* }
/// ```
/// with options
/// * `fields: $n`: the struct gets fields `<prefix>1` up to `<prefix>$n`. Required.
/// * `prefix: "$prefix"`: defaults to `a`.
/// * `nullable: [$residue, ...] mod $modulus`: fields whose order key is congruent to one of the
///   residues are `Option<i32>`. All other fields are `i32`.
///
/// Fields get the visibility of the struct. `Default` and [`Positional`](macro@Positional) are
/// derived.
///
/// ```rust
/// use posbind::{fixture_record, Positional};
///
/// fixture_record! {
///     #[derive(Debug)]
///     pub struct Bean12 {
///         fields: 12,
///         nullable: [3, 6, 9] mod 10,
///     }
/// }
///
/// let values: Vec<i32> = (1..=12).collect();
/// let bean = Bean12::from_values(&values)?;
/// assert_eq!(bean.a1, 1);
/// assert_eq!(bean.a3, Some(3));
/// assert_eq!(bean.a10, 10);
/// assert_eq!(bean.values()?, values);
/// # Ok::<(), posbind::Error>(())
/// ```
pub use posbind_macros::fixture_record;
