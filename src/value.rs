// Copyright 2023-2024 The Regents of the University of California
// Copyright 2024-2025 Cornell University
// released under BSD 3-Clause License

use std::fmt::{self, Display, Formatter};

/// A single four-state logic bit.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[cfg_attr(feature = "serde1", derive(serde::Serialize, serde::Deserialize))]
pub enum BitValue {
    Zero,
    One,
    X,
    Z,
}

impl BitValue {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '0' => Some(BitValue::Zero),
            '1' => Some(BitValue::One),
            'x' | 'X' => Some(BitValue::X),
            'z' | 'Z' => Some(BitValue::Z),
            _ => None,
        }
    }

    pub fn to_char(&self) -> char {
        match self {
            BitValue::Zero => '0',
            BitValue::One => '1',
            BitValue::X => 'x',
            BitValue::Z => 'z',
        }
    }
}

impl From<bool> for BitValue {
    fn from(value: bool) -> Self {
        if value {
            BitValue::One
        } else {
            BitValue::Zero
        }
    }
}

impl Display for BitValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// The value carried by a single change on a timeline.
///
/// Scalar signals record one four-state bit, vector signals a fixed number of
/// bits (msb first, as they appear in the wave file), and real signals an
/// `f64`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde1", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    Scalar(BitValue),
    Vector(Vec<BitValue>),
    Real(f64),
}

impl Value {
    /// The conventional value of a signal before its first recorded change:
    /// `x` for a 1-bit signal, an all-`x` vector otherwise.
    pub fn unknown(width: u32) -> Self {
        if width <= 1 {
            Value::Scalar(BitValue::X)
        } else {
            Value::Vector(vec![BitValue::X; width as usize])
        }
    }

    /// Parses a bit string like `"1010"` or `"10xz"` into a scalar or vector value.
    pub fn from_bit_str(s: &str) -> Option<Self> {
        let mut bits = Vec::with_capacity(s.len());
        for c in s.chars() {
            bits.push(BitValue::from_char(c)?);
        }
        match bits.len() {
            0 => None,
            1 => Some(Value::Scalar(bits[0])),
            _ => Some(Value::Vector(bits)),
        }
    }

    /// Number of bits, or `None` for real values.
    pub fn bits(&self) -> Option<u32> {
        match self {
            Value::Scalar(_) => Some(1),
            Value::Vector(bits) => Some(bits.len() as u32),
            Value::Real(_) => None,
        }
    }

    pub fn is_real(&self) -> bool {
        matches!(self, Value::Real(_))
    }
}

impl From<BitValue> for Value {
    fn from(bit: BitValue) -> Self {
        Value::Scalar(bit)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Real(value)
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Value::Scalar(bit) => write!(f, "{bit}"),
            Value::Vector(bits) => {
                for bit in bits {
                    write!(f, "{bit}")?;
                }
                Ok(())
            }
            Value::Real(value) => write!(f, "{value}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_value_chars() {
        for c in ['0', '1', 'x', 'z'] {
            assert_eq!(BitValue::from_char(c).unwrap().to_char(), c);
        }
        assert_eq!(BitValue::from_char('X'), Some(BitValue::X));
        assert_eq!(BitValue::from_char('Z'), Some(BitValue::Z));
        assert_eq!(BitValue::from_char('w'), None);
    }

    #[test]
    fn test_unknown_value() {
        assert_eq!(Value::unknown(1), Value::Scalar(BitValue::X));
        assert_eq!(Value::unknown(0), Value::Scalar(BitValue::X));
        assert_eq!(Value::unknown(3).to_string(), "xxx");
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::from_bit_str("10xz").unwrap().to_string(), "10xz");
        assert_eq!(Value::Scalar(BitValue::One).to_string(), "1");
        assert_eq!(Value::Real(1.25).to_string(), "1.25");
    }

    #[test]
    fn test_from_bit_str() {
        assert_eq!(
            Value::from_bit_str("0"),
            Some(Value::Scalar(BitValue::Zero))
        );
        assert_eq!(
            Value::from_bit_str("1z"),
            Some(Value::Vector(vec![BitValue::One, BitValue::Z]))
        );
        assert_eq!(Value::from_bit_str(""), None);
        assert_eq!(Value::from_bit_str("10b"), None);
    }
}
