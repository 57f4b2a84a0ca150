//! Moves value sequences into records and back, one [`FieldIndex`] position at a time.
use crate::{Error, FieldDescriptor, FieldIndex, Record, Scalar};

/// What to do with absent values in nullable fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NullPolicy {
    /// Absent values are errors, both when binding and when reading.
    ///
    /// With this policy every positional field holds a value after a bind.
    #[default]
    Reject,
    /// `None` may be bound into, and read out of, nullable fields.
    /// Raw fields still need a value.
    Allow,
}

/// Configures a [`Binder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BindConfig {
    pub null_policy: NullPolicy,
}

impl BindConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_null_policy(mut self, null_policy: NullPolicy) -> Self {
        self.null_policy = null_policy;
        self
    }
}

/// Binds value sequences to records of type `R`, and reads them back.
///
/// Value `i` of a sequence belongs to the field at position `i` of the index.
/// For every sequence `values` of the right length, `read(&bind(values)?)? == values`.
pub struct Binder<'i, R: Record> {
    index: &'i FieldIndex<R>,
    config: BindConfig,
}

impl<'i, R: Record> Clone for Binder<'i, R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'i, R: Record> Copy for Binder<'i, R> {}

impl<'i, R: Record> Binder<'i, R> {
    pub fn new(index: &'i FieldIndex<R>) -> Self {
        Self::with_config(index, BindConfig::default())
    }

    pub fn with_config(index: &'i FieldIndex<R>, config: BindConfig) -> Self {
        Self { index, config }
    }

    pub fn index(&self) -> &'i FieldIndex<R> {
        self.index
    }

    pub fn config(&self) -> BindConfig {
        self.config
    }

    /// Creates a new `R` and stores `values[i]` in the field at position `i`.
    ///
    /// Nullable fields receive `Some(values[i])`.
    /// Fails if `values` doesn't have exactly one value per positional field.
    pub fn bind(&self, values: &[i32]) -> Result<R, Error> {
        self.check_len(values.len())?;

        let mut record = R::default();
        for (field, &value) in self.index.iter().zip(values) {
            self.store(field, &mut record, field.kind().wrap(value))?;
        }
        Ok(record)
    }

    /// Like [`bind`](Binder::bind), but values may be absent.
    ///
    /// `None` is only accepted for nullable fields, and only with [`NullPolicy::Allow`].
    pub fn bind_nullable(&self, values: &[Option<i32>]) -> Result<R, Error> {
        self.check_len(values.len())?;

        let mut record = R::default();
        for (field, &value) in self.index.iter().zip(values) {
            let scalar = match (value, self.config.null_policy) {
                (None, NullPolicy::Reject) => None,
                (value, _) => field.kind().wrap_optional(value),
            }
            .ok_or_else(|| null_value(field))?;

            self.store(field, &mut record, scalar)?;
        }
        Ok(record)
    }

    /// The values of the positional fields of `record`, in index order.
    ///
    /// Fails if a nullable field is absent, whatever the policy: a sequence of `i32` has no
    /// way to represent it. Use [`read_nullable`](Binder::read_nullable) for that.
    pub fn read(&self, record: &R) -> Result<Vec<i32>, Error> {
        self.index
            .iter()
            .map(|field| field.load(record)?.value().ok_or_else(|| null_value(field)))
            .collect()
    }

    /// Like [`read`](Binder::read), but absent nullable fields are read as `None` when the
    /// policy is [`NullPolicy::Allow`].
    pub fn read_nullable(&self, record: &R) -> Result<Vec<Option<i32>>, Error> {
        self.index
            .iter()
            .map(|field| {
                let value = field.load(record)?.value();
                match (value, self.config.null_policy) {
                    (None, NullPolicy::Reject) => Err(null_value(field)),
                    (value, _) => Ok(value),
                }
            })
            .collect()
    }

    fn check_len(&self, found: usize) -> Result<(), Error> {
        if found != self.index.len() {
            return Err(Error::LengthMismatch {
                record: R::NAME,
                expected: self.index.len(),
                found,
            });
        }
        Ok(())
    }

    fn store(&self, field: &FieldDescriptor<R>, record: &mut R, value: Scalar) -> Result<(), Error> {
        log::trace!("{}.{} <- {:?}", R::NAME, field.name(), value);
        field.store(record, value)
    }
}

fn null_value<R: Record>(field: &FieldDescriptor<R>) -> Error {
    Error::NullValue {
        record: R::NAME,
        field: field.name(),
    }
}

#[cfg(test)]
mod tests {
    use crate::index::tests::{accessors, Shuffled};
    use crate::{
        AccessError, BindConfig, Binder, Error, FieldDecl, FieldIndex, NullPolicy, Record, Scalar,
        ScalarKind,
    };

    #[ctor::ctor]
    fn init() {
        env_logger::init();
    }

    #[derive(Default, Debug, PartialEq)]
    struct Mixed {
        a1: i32,
        a2: Option<i32>,
    }

    accessors!(mixed: Mixed { a1: Raw, a2: Nullable });

    impl Record for Mixed {
        const NAME: &'static str = "Mixed";

        fn declared_fields() -> &'static [FieldDecl<Self>] {
            static FIELDS: [FieldDecl<Mixed>; 2] = [
                FieldDecl::new("a1", ScalarKind::Raw, mixed::a1::get, mixed::a1::set),
                FieldDecl::new("a2", ScalarKind::Nullable, mixed::a2::get, mixed::a2::set),
            ];
            &FIELDS
        }
    }

    #[derive(Default, Debug)]
    struct ReadOnly {
        a1: i32,
        a2: i32,
    }

    accessors!(read_only: ReadOnly { a1: Raw, a2: Raw });

    impl Record for ReadOnly {
        const NAME: &'static str = "ReadOnly";

        fn declared_fields() -> &'static [FieldDecl<Self>] {
            static FIELDS: [FieldDecl<ReadOnly>; 2] = [
                FieldDecl::new("a1", ScalarKind::Raw, read_only::a1::get, read_only::a1::set),
                FieldDecl::read_only("a2", ScalarKind::Raw, read_only::a2::get),
            ];
            &FIELDS
        }
    }

    /// Declares `a1` nullable, but its accessors handle a raw `i32`.
    #[derive(Default, Debug)]
    struct Inconsistent {
        a1: i32,
    }

    accessors!(inconsistent: Inconsistent { a1: Raw });

    impl Record for Inconsistent {
        const NAME: &'static str = "Inconsistent";

        fn declared_fields() -> &'static [FieldDecl<Self>] {
            static FIELDS: [FieldDecl<Inconsistent>; 1] = [FieldDecl::new(
                "a1",
                ScalarKind::Nullable,
                inconsistent::a1::get,
                inconsistent::a1::set,
            )];
            &FIELDS
        }
    }

    #[test]
    fn test_bind_three_fields() {
        let index = FieldIndex::<Shuffled>::build().unwrap();
        let binder = Binder::new(&index);

        let record = binder.bind(&[10, 20, 30]).unwrap();
        assert_eq!((record.a1, record.a2, record.a3), (10, 20, 30));
        assert_eq!(binder.read(&record).unwrap(), [10, 20, 30]);
    }

    #[test]
    fn test_bind_mixed() {
        let index = FieldIndex::<Mixed>::build().unwrap();
        let binder = Binder::new(&index);

        let record = binder.bind(&[5, 7]).unwrap();
        assert_eq!(
            record,
            Mixed {
                a1: 5,
                a2: Some(7)
            }
        );
        assert_eq!(binder.read(&record).unwrap(), [5, 7]);
    }

    #[test]
    fn test_round_trip_extremes() {
        let index = FieldIndex::<Mixed>::build().unwrap();
        let binder = Binder::new(&index);

        for values in [[0, 0], [i32::MIN, i32::MAX], [-1, 1], [i32::MAX, i32::MIN]] {
            let record = binder.bind(&values).unwrap();
            assert_eq!(binder.read(&record).unwrap(), values);
        }
    }

    #[test]
    fn test_bind_too_short() {
        let index = FieldIndex::<Shuffled>::build().unwrap();
        assert_eq!(
            Binder::new(&index).bind(&[1, 2]).unwrap_err(),
            Error::LengthMismatch {
                record: "Shuffled",
                expected: 3,
                found: 2,
            }
        );
    }

    #[test]
    fn test_bind_too_long() {
        let index = FieldIndex::<Shuffled>::build().unwrap();
        let binder = Binder::new(&index);
        assert!(matches!(
            binder.bind(&[1, 2, 3, 4]),
            Err(Error::LengthMismatch {
                expected: 3,
                found: 4,
                ..
            })
        ));
        assert!(matches!(
            binder.bind(&[]),
            Err(Error::LengthMismatch { found: 0, .. })
        ));
        assert!(matches!(
            binder.bind_nullable(&[Some(1)]),
            Err(Error::LengthMismatch { found: 1, .. })
        ));
    }

    #[test]
    fn test_bind_not_writable() {
        let index = FieldIndex::<ReadOnly>::build().unwrap();
        let err = Binder::new(&index).bind(&[1, 2]).unwrap_err();
        assert_eq!(
            err,
            Error::FieldAccess {
                record: "ReadOnly",
                field: "a2",
                source: AccessError::NotWritable,
            }
        );
        assert_eq!(
            std::error::Error::source(&err).map(ToString::to_string),
            Some("field has no setter".to_owned())
        );
    }

    #[test]
    fn test_inconsistent_table() {
        let index = FieldIndex::<Inconsistent>::build().unwrap();
        let binder = Binder::new(&index);

        assert!(matches!(
            binder.bind(&[1]),
            Err(Error::FieldAccess {
                source: AccessError::KindMismatch {
                    expected: ScalarKind::Raw,
                    found: ScalarKind::Nullable,
                },
                ..
            })
        ));
        assert!(matches!(
            binder.read(&Inconsistent { a1: 1 }),
            Err(Error::FieldAccess {
                source: AccessError::KindMismatch {
                    expected: ScalarKind::Nullable,
                    found: ScalarKind::Raw,
                },
                ..
            })
        ));
    }

    #[test]
    fn test_read_absent_rejected() {
        let index = FieldIndex::<Mixed>::build().unwrap();
        let record = Mixed { a1: 1, a2: None };

        for policy in [NullPolicy::Reject, NullPolicy::Allow] {
            let binder =
                Binder::with_config(&index, BindConfig::new().with_null_policy(policy));
            assert_eq!(
                binder.read(&record),
                Err(Error::NullValue {
                    record: "Mixed",
                    field: "a2",
                })
            );
        }
        assert!(matches!(
            Binder::new(&index).read_nullable(&record),
            Err(Error::NullValue { field: "a2", .. })
        ));
    }

    #[test]
    fn test_nullable_allowed() {
        let index = FieldIndex::<Mixed>::build().unwrap();
        let binder = Binder::with_config(
            &index,
            BindConfig::new().with_null_policy(NullPolicy::Allow),
        );

        let record = binder.bind_nullable(&[Some(3), None]).unwrap();
        assert_eq!(record, Mixed { a1: 3, a2: None });
        assert_eq!(binder.read_nullable(&record).unwrap(), [Some(3), None]);

        let record = binder.bind_nullable(&[Some(3), Some(4)]).unwrap();
        assert_eq!(binder.read_nullable(&record).unwrap(), [Some(3), Some(4)]);
    }

    #[test]
    fn test_nullable_rejected() {
        let index = FieldIndex::<Mixed>::build().unwrap();
        let binder = Binder::new(&index);

        assert_eq!(
            binder.bind_nullable(&[Some(3), None]),
            Err(Error::NullValue {
                record: "Mixed",
                field: "a2",
            })
        );
        assert_eq!(
            binder.bind_nullable(&[Some(3), Some(4)]),
            Ok(Mixed {
                a1: 3,
                a2: Some(4)
            })
        );
    }

    #[test]
    fn test_raw_never_null() {
        let index = FieldIndex::<Mixed>::build().unwrap();
        let binder = Binder::with_config(
            &index,
            BindConfig::new().with_null_policy(NullPolicy::Allow),
        );

        assert_eq!(
            binder.bind_nullable(&[None, Some(1)]),
            Err(Error::NullValue {
                record: "Mixed",
                field: "a1",
            })
        );
    }

    #[test]
    fn test_scalar_of_bound_field() {
        let index = FieldIndex::<Mixed>::build().unwrap();
        let record = Binder::new(&index).bind(&[5, 7]).unwrap();
        assert_eq!(index.get(0).unwrap().load(&record), Ok(Scalar::Raw(5)));
        assert_eq!(
            index.get(1).unwrap().load(&record),
            Ok(Scalar::Nullable(Some(7)))
        );
    }
}
