//! Column data types and the numeric type ladders used for downcasting

use half::f16;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Declared storage type of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DType {
    Int8,
    Int16,
    Int32,
    Int64,
    Float16,
    Float32,
    Float64,
    Boolean,
    Utf8,
}

impl DType {
    /// Numeric kind of this type, `None` for non-numeric types
    pub fn kind(&self) -> Option<NumericKind> {
        match self {
            DType::Int8 | DType::Int16 | DType::Int32 | DType::Int64 => Some(NumericKind::Integer),
            DType::Float16 | DType::Float32 | DType::Float64 => Some(NumericKind::Float),
            DType::Boolean | DType::Utf8 => None,
        }
    }

    /// Whether columns of this type are considered by the downcaster.
    ///
    /// `Int8` is already the narrowest integer and is left alone.
    pub fn is_downcast_candidate(&self) -> bool {
        matches!(
            self,
            DType::Int16 | DType::Int32 | DType::Int64 | DType::Float16 | DType::Float32 | DType::Float64
        )
    }

    /// Bytes occupied by one row slot. `Utf8` counts its offset only.
    pub fn byte_width(&self) -> usize {
        match self {
            DType::Int8 | DType::Boolean => 1,
            DType::Int16 | DType::Float16 => 2,
            DType::Int32 | DType::Float32 => 4,
            DType::Int64 | DType::Float64 | DType::Utf8 => 8,
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Numeric kinds; a column never crosses from one to the other
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NumericKind {
    Integer,
    Float,
}

impl NumericKind {
    /// Candidate types of this kind, narrowest first
    pub fn ladder(&self) -> &'static [TypeDescriptor] {
        match self {
            NumericKind::Integer => &INTEGER_LADDER,
            NumericKind::Float => &FLOAT_LADDER,
        }
    }
}

/// How a value sitting exactly on a type's bound is treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BoundPolicy {
    /// `min > T::MIN && max < T::MAX`; a value equal to a bound promotes
    #[default]
    Exclusive,
    /// `min >= T::MIN && max <= T::MAX`
    Inclusive,
}

/// Representable range of a numeric type
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Range {
    Int { min: i64, max: i64 },
    Float { min: f64, max: f64 },
}

/// One rung of a type ladder
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TypeDescriptor {
    pub dtype: DType,
    pub bits: u32,
    pub range: Range,
}

/// Largest finite `f16`
const F16_MAX: f64 = 65504.0;

pub static INTEGER_LADDER: [TypeDescriptor; 4] = [
    TypeDescriptor {
        dtype: DType::Int8,
        bits: 8,
        range: Range::Int { min: i8::MIN as i64, max: i8::MAX as i64 },
    },
    TypeDescriptor {
        dtype: DType::Int16,
        bits: 16,
        range: Range::Int { min: i16::MIN as i64, max: i16::MAX as i64 },
    },
    TypeDescriptor {
        dtype: DType::Int32,
        bits: 32,
        range: Range::Int { min: i32::MIN as i64, max: i32::MAX as i64 },
    },
    TypeDescriptor {
        dtype: DType::Int64,
        bits: 64,
        range: Range::Int { min: i64::MIN, max: i64::MAX },
    },
];

pub static FLOAT_LADDER: [TypeDescriptor; 3] = [
    TypeDescriptor {
        dtype: DType::Float16,
        bits: 16,
        range: Range::Float { min: -F16_MAX, max: F16_MAX },
    },
    TypeDescriptor {
        dtype: DType::Float32,
        bits: 32,
        range: Range::Float { min: f32::MIN as f64, max: f32::MAX as f64 },
    },
    TypeDescriptor {
        dtype: DType::Float64,
        bits: 64,
        range: Range::Float { min: f64::MIN, max: f64::MAX },
    },
];

impl TypeDescriptor {
    pub fn kind(&self) -> NumericKind {
        match self.range {
            Range::Int { .. } => NumericKind::Integer,
            Range::Float { .. } => NumericKind::Float,
        }
    }

    /// Whether `[lo, hi]` fits an integer rung. Always false for float rungs.
    pub fn contains_int(&self, lo: i64, hi: i64, bounds: BoundPolicy) -> bool {
        match self.range {
            Range::Int { min, max } => match bounds {
                BoundPolicy::Exclusive => lo > min && hi < max,
                BoundPolicy::Inclusive => lo >= min && hi <= max,
            },
            Range::Float { .. } => false,
        }
    }

    /// Whether `[lo, hi]` fits a float rung. Always false for integer rungs.
    pub fn contains_float(&self, lo: f64, hi: f64, bounds: BoundPolicy) -> bool {
        match self.range {
            Range::Float { min, max } => match bounds {
                BoundPolicy::Exclusive => lo > min && hi < max,
                BoundPolicy::Inclusive => lo >= min && hi <= max,
            },
            Range::Int { .. } => false,
        }
    }

    /// Value as it would read back after being stored in this float type
    pub fn quantize(&self, value: f64) -> f64 {
        match self.dtype {
            DType::Float16 => f16::from_f64(value).to_f64(),
            DType::Float32 => value as f32 as f64,
            _ => value,
        }
    }

    /// Whether `value` survives storage in this float type unchanged
    pub fn represents_exactly(&self, value: f64) -> bool {
        value.is_nan() || self.quantize(value) == value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ladders_are_ordered() {
        for ladder in [&INTEGER_LADDER[..], &FLOAT_LADDER[..]] {
            for pair in ladder.windows(2) {
                assert!(pair[0].bits < pair[1].bits);
            }
        }
    }

    #[test]
    fn test_int8_bounds_are_exclusive_by_default() {
        let int8 = &INTEGER_LADDER[0];
        assert!(int8.contains_int(-127, 126, BoundPolicy::Exclusive));
        assert!(!int8.contains_int(0, 127, BoundPolicy::Exclusive));
        assert!(!int8.contains_int(-128, 0, BoundPolicy::Exclusive));
        assert!(int8.contains_int(-128, 127, BoundPolicy::Inclusive));
    }

    #[test]
    fn test_kind_mismatch_never_fits() {
        assert!(!FLOAT_LADDER[2].contains_int(0, 1, BoundPolicy::Inclusive));
        assert!(!INTEGER_LADDER[3].contains_float(0.0, 1.0, BoundPolicy::Inclusive));
    }

    #[test]
    fn test_f16_range_matches_half() {
        assert_eq!(f16::MAX.to_f64(), F16_MAX);
        assert_eq!(f16::MIN.to_f64(), -F16_MAX);
    }

    #[test]
    fn test_rungs_match_their_ladder_kind() {
        for kind in [NumericKind::Integer, NumericKind::Float] {
            for rung in kind.ladder() {
                assert_eq!(rung.kind(), kind);
                assert_eq!(rung.dtype.kind(), Some(kind));
            }
        }
    }

    #[test]
    fn test_candidates() {
        assert!(!DType::Int8.is_downcast_candidate());
        assert!(DType::Float16.is_downcast_candidate());
        assert!(!DType::Boolean.is_downcast_candidate());
    }

    #[test]
    fn test_represents_exactly() {
        let f16_rung = &FLOAT_LADDER[0];
        assert!(f16_rung.represents_exactly(0.5));
        assert!(!f16_rung.represents_exactly(0.1));
        assert!(FLOAT_LADDER[2].represents_exactly(0.1));
    }

    #[test]
    fn test_dtype_serialize() {
        let json = serde_json::to_string(&DType::Float16).unwrap();
        assert_eq!(json, "\"Float16\"");
    }
}
