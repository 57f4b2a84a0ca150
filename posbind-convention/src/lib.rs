//! The positional naming convention: a field named `<prefix><order>` takes part in positional
//! binding at the position given by `<order>`.
//!
//! This crate is shared between the `posbind` runtime, which orders hand-written and derived field
//! tables, and `posbind-macros`, which rejects malformed record types at compile time.
//! Both go through [`order_fields`], so they can never disagree on an ordering.
use std::num::IntErrorKind;
use thiserror::Error;

/// The prefix used when a record type doesn't pick its own.
pub const DEFAULT_PREFIX: &str = "a";

/// The parsed numeric suffix of a convention field. Keys start at 1.
pub type OrderKey = u32;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConventionError {
    #[error("`{prefix}` is not a valid field prefix: {reason}")]
    InvalidPrefix {
        prefix: String,
        reason: &'static str,
    },
    #[error("field `{field}` starts with the prefix `{prefix}` but has no order key")]
    MissingKey { field: String, prefix: String },
    #[error("field `{field}` has order key `{suffix}`, which is not a number")]
    NonNumericKey { field: String, suffix: String },
    #[error("field `{field}` has order key 0, but order keys start at 1")]
    ZeroKey { field: String },
    #[error("order key of field `{field}` does not fit in 32 bits")]
    KeyOverflow { field: String },
    #[error("fields `{first}` and `{second}` both have order key {key}")]
    DuplicateKey {
        key: OrderKey,
        first: String,
        second: String,
    },
}

impl ConventionError {
    /// The field the error is about. For duplicates, that's the second field with the key.
    pub fn field(&self) -> Option<&str> {
        match self {
            ConventionError::InvalidPrefix { .. } => None,
            ConventionError::MissingKey { field, .. }
            | ConventionError::NonNumericKey { field, .. }
            | ConventionError::ZeroKey { field }
            | ConventionError::KeyOverflow { field } => Some(field),
            ConventionError::DuplicateKey { second, .. } => Some(second),
        }
    }
}

/// Checks that `prefix` can be told apart from the order key that follows it.
pub fn validate_prefix(prefix: &str) -> Result<(), ConventionError> {
    let reason = if prefix.is_empty() {
        "prefix is empty"
    } else if prefix.ends_with(|c: char| c.is_ascii_digit()) {
        "prefix ends in a digit"
    } else {
        return Ok(());
    };

    Err(ConventionError::InvalidPrefix {
        prefix: prefix.to_owned(),
        reason,
    })
}

/// Parses the order key of the field `name`.
///
/// Returns `Ok(None)` when `name` doesn't start with `prefix`: such fields are not part of the
/// positional contract. A name that does start with the prefix must be followed by a positive
/// decimal number, so `a7` and `a007` are both key 7, but `alpha`, `a` and `a0` are errors.
pub fn parse_order_key(prefix: &str, name: &str) -> Result<Option<OrderKey>, ConventionError> {
    let Some(suffix) = name.strip_prefix(prefix) else {
        return Ok(None);
    };

    if suffix.is_empty() {
        return Err(ConventionError::MissingKey {
            field: name.to_owned(),
            prefix: prefix.to_owned(),
        });
    }

    // `u32::from_str` also accepts a leading `+`
    if !suffix.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ConventionError::NonNumericKey {
            field: name.to_owned(),
            suffix: suffix.to_owned(),
        });
    }

    match suffix.parse::<OrderKey>() {
        Ok(0) => Err(ConventionError::ZeroKey {
            field: name.to_owned(),
        }),
        Ok(key) => Ok(Some(key)),
        Err(e) if *e.kind() == IntErrorKind::PosOverflow => Err(ConventionError::KeyOverflow {
            field: name.to_owned(),
        }),
        Err(_) => Err(ConventionError::NonNumericKey {
            field: name.to_owned(),
            suffix: suffix.to_owned(),
        }),
    }
}

/// Selects the convention fields out of `items` and sorts them by order key.
///
/// `name` projects each item to its field name. Items whose name doesn't start with `prefix` are
/// dropped. The result is strictly ascending by key; gaps between keys are fine, duplicates are
/// not. Stops at the first malformed name.
pub fn order_fields<T>(
    prefix: &str,
    items: impl IntoIterator<Item = T>,
    name: impl Fn(&T) -> &str,
) -> Result<Vec<(OrderKey, T)>, ConventionError> {
    validate_prefix(prefix)?;

    let mut ordered = Vec::new();
    for item in items {
        if let Some(key) = parse_order_key(prefix, name(&item))? {
            ordered.push((key, item));
        }
    }

    // stable, so for duplicates `first` is the one declared first
    ordered.sort_by_key(|(key, _)| *key);

    for pair in ordered.windows(2) {
        let [(lower_key, lower), (upper_key, upper)] = pair else {
            unreachable!("windows(2) yields pairs")
        };
        if lower_key == upper_key {
            return Err(ConventionError::DuplicateKey {
                key: *upper_key,
                first: name(lower).to_owned(),
                second: name(upper).to_owned(),
            });
        }
    }

    Ok(ordered)
}
