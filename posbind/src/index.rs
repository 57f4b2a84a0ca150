use crate::{AccessError, Error, FieldDecl, Record, Scalar, ScalarKind};
use posbind_convention::{order_fields, OrderKey};
use std::fmt::{Debug, Formatter};

/// A positional field of record type `R`: its declaration, and the order key parsed from its name.
pub struct FieldDescriptor<R: 'static> {
    order: OrderKey,
    decl: &'static FieldDecl<R>,
}

impl<R: 'static> Clone for FieldDescriptor<R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R: 'static> Copy for FieldDescriptor<R> {}

impl<R: 'static> Debug for FieldDescriptor<R> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.decl.name)
            .field("order", &self.order)
            .field("kind", &self.decl.kind)
            .field("writable", &self.decl.set.is_some())
            .finish()
    }
}

impl<R: Record> FieldDescriptor<R> {
    pub fn name(&self) -> &'static str {
        self.decl.name
    }

    pub fn order(&self) -> OrderKey {
        self.order
    }

    pub fn kind(&self) -> ScalarKind {
        self.decl.kind
    }

    pub fn is_writable(&self) -> bool {
        self.decl.set.is_some()
    }

    /// Reads the field. The value is checked against the declared kind.
    pub fn load(&self, record: &R) -> Result<Scalar, Error> {
        let value = (self.decl.get)(record);
        if value.kind() != self.kind() {
            return Err(self.access_error(AccessError::KindMismatch {
                expected: self.kind(),
                found: value.kind(),
            }));
        }
        Ok(value)
    }

    /// Writes the field.
    pub fn store(&self, record: &mut R, value: Scalar) -> Result<(), Error> {
        let set = self
            .decl
            .set
            .ok_or_else(|| self.access_error(AccessError::NotWritable))?;
        set(record, value).map_err(|e| self.access_error(e))
    }

    pub(crate) fn access_error(&self, source: AccessError) -> Error {
        Error::FieldAccess {
            record: R::NAME,
            field: self.name(),
            source,
        }
    }
}

/// The positional fields of a record type, ordered by order key.
///
/// Position `i` of a value sequence belongs to `index.get(i)`. When the order keys of a type
/// are `1..=n` that is the field with key `i + 1`, but gaps are allowed.
pub struct FieldIndex<R: 'static> {
    fields: Vec<FieldDescriptor<R>>,
}

impl<R: 'static> Clone for FieldIndex<R> {
    fn clone(&self) -> Self {
        Self {
            fields: self.fields.clone(),
        }
    }
}

impl<R: 'static> Debug for FieldIndex<R> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.fields.iter()).finish()
    }
}

impl<R: Record> FieldIndex<R> {
    /// Selects the convention fields of `R` and orders them.
    ///
    /// Fails with [`Error::MalformedType`] if a field that starts with the prefix has no valid
    /// order key, or if two fields have the same key.
    pub fn build() -> Result<Self, Error> {
        let ordered = order_fields(R::PREFIX, R::declared_fields(), |decl| decl.name).map_err(
            |source| Error::MalformedType {
                record: R::NAME,
                source,
            },
        )?;

        let fields: Vec<_> = ordered
            .into_iter()
            .map(|(order, decl)| FieldDescriptor { order, decl })
            .collect();

        log::debug!(
            "Built field index of {} with {} positional fields (prefix {:?})",
            R::NAME,
            fields.len(),
            R::PREFIX
        );

        Ok(Self { fields })
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The field at position `position` of a value sequence.
    pub fn get(&self, position: usize) -> Option<&FieldDescriptor<R>> {
        self.fields.get(position)
    }

    /// The position of the field called `name`, if it is positional.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|field| field.name() == name)
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &FieldDescriptor<R>> {
        self.fields.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(FieldDescriptor::name)
    }

    pub fn order_keys(&self) -> impl Iterator<Item = OrderKey> + '_ {
        self.fields.iter().map(FieldDescriptor::order)
    }
}

impl<'a, R: Record> IntoIterator for &'a FieldIndex<R> {
    type Item = &'a FieldDescriptor<R>;
    type IntoIter = std::slice::Iter<'a, FieldDescriptor<R>>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}
