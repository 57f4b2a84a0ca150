//! Fixture records with many positional fields.
//!
//! Large records are the hardest realistic input for code that maps configuration onto
//! structs: they stress field-count scaling, mixed `i32`/`Option<i32>` typing and ordering
//! stability. Build them from a value sequence with [`Positional::from_values`] and check them
//! with [`Positional::values`].
use posbind::{fixture_record, Positional};

/// The number of positional fields of [`Bean484`] and [`MixedBean484`].
pub const BEAN484_FIELDS: usize = 484;

fixture_record! {
    /// 484 `i32` fields, `a1` to `a484`.
    #[derive(Debug, Clone, PartialEq, Eq, Hash)]
    pub struct Bean484 {
        fields: 484,
    }
}

fixture_record! {
    /// 484 fields, `a1` to `a484`. Fields whose order key ends in 3, 6 or 9 are `Option<i32>`,
    /// the others are `i32`.
    #[derive(Debug, Clone, PartialEq, Eq, Hash)]
    pub struct MixedBean484 {
        fields: 484,
        nullable: [3, 6, 9] mod 10,
    }
}

/// `1, 2, ..., n`.
pub fn sequence(n: usize) -> Vec<i32> {
    sequence_from(1, n)
}

/// `n` consecutive values starting at `start`, wrapping around at `i32::MAX`.
pub fn sequence_from(start: i32, n: usize) -> Vec<i32> {
    std::iter::successors(Some(start), |v| Some(v.wrapping_add(1)))
        .take(n)
        .collect()
}

/// A record of type `R` whose fields hold `1, 2, ..., n`.
pub fn numbered<R: Positional>() -> Result<R, posbind::Error> {
    R::from_values(&sequence(R::field_index()?.len()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence() {
        assert_eq!(sequence(3), [1, 2, 3]);
        assert!(sequence(0).is_empty());
        assert_eq!(sequence_from(-1, 3), [-1, 0, 1]);
        assert_eq!(sequence_from(i32::MAX, 2), [i32::MAX, i32::MIN]);
    }

    #[test]
    fn test_numbered() {
        let bean: Bean484 = numbered().unwrap();
        assert_eq!(bean.a1, 1);
        assert_eq!(bean.a484, 484);
    }
}
