use crate::{BindConfig, Binder, Error, FieldIndex, Record};
use std::any::{Any, TypeId};
use std::collections::HashMap;

/// Field indices for a fixed set of record types.
///
/// Built once with a [`RegistryBuilder`], which checks every registered type, and immutable
/// afterwards. Unlike [`Positional::field_index`](crate::Positional::field_index), which caches
/// indices for the whole process, a registry is an ordinary value: pass it by reference to
/// whatever binds records, and drop it when done.
///
/// ```rust
/// use posbind::{Positional, Registry};
///
/// #[derive(Positional, Default, Debug, PartialEq)]
/// struct Point {
///     a2: i32,
///     a1: Option<i32>,
/// }
///
/// let registry = Registry::builder().register::<Point>()?.build();
///
/// let point: Point = registry.bind(&[3, 4])?;
/// assert_eq!(point, Point { a1: Some(3), a2: 4 });
/// assert_eq!(registry.values(&point)?, [3, 4]);
/// # Ok::<(), posbind::Error>(())
/// ```
#[derive(Default)]
pub struct Registry {
    indices: HashMap<TypeId, Entry>,
    config: BindConfig,
}

struct Entry {
    name: &'static str,
    index: Box<dyn Any + Send + Sync>,
}

impl Registry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// The field index of `R`.
    pub fn index<R: Record>(&self) -> Result<&FieldIndex<R>, Error> {
        self.indices
            .get(&TypeId::of::<R>())
            .and_then(|entry| entry.index.downcast_ref::<FieldIndex<R>>())
            .ok_or(Error::Unregistered { record: R::NAME })
    }

    /// A binder for `R`, using the registry's [`BindConfig`].
    pub fn binder<R: Record>(&self) -> Result<Binder<'_, R>, Error> {
        Ok(Binder::with_config(self.index()?, self.config))
    }

    /// See [`Binder::bind`].
    pub fn bind<R: Record>(&self, values: &[i32]) -> Result<R, Error> {
        self.binder()?.bind(values)
    }

    /// See [`Binder::read`].
    pub fn values<R: Record>(&self, record: &R) -> Result<Vec<i32>, Error> {
        self.binder()?.read(record)
    }

    pub fn contains<R: Record>(&self) -> bool {
        self.indices.contains_key(&TypeId::of::<R>())
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Names of the registered record types, in no particular order.
    pub fn record_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.indices.values().map(|entry| entry.name)
    }

    pub fn config(&self) -> BindConfig {
        self.config
    }
}

/// Collects the record types of a [`Registry`].
#[derive(Default)]
pub struct RegistryBuilder {
    registry: Registry,
}

impl RegistryBuilder {
    /// Builds the field index of `R`. Registering the same type twice does nothing.
    ///
    /// Fails if `R` is malformed, so a registry never holds a broken index.
    pub fn register<R: Record>(mut self) -> Result<Self, Error> {
        if self.registry.contains::<R>() {
            return Ok(self);
        }

        let index = FieldIndex::<R>::build()?;
        self.registry.indices.insert(
            TypeId::of::<R>(),
            Entry {
                name: R::NAME,
                index: Box::new(index),
            },
        );
        Ok(self)
    }

    /// Sets the [`BindConfig`] of the binders handed out by the registry.
    pub fn config(mut self, config: BindConfig) -> Self {
        self.registry.config = config;
        self
    }

    pub fn build(self) -> Registry {
        log::debug!("Registry built with {} record types", self.registry.len());
        self.registry
    }
}
