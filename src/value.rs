use std::fmt::{self, Display, Formatter};

use crate::{heap::Heap, object::ObjRef};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TypeError {
    Number,
    Numbers,
    AddMismatch,
}

/// A Lox value.
///
/// The derived `PartialEq` is the language's `==`: numbers compare as IEEE
/// doubles (so `NaN != NaN`), and objects compare by handle, which is only
/// content equality because every string is interned.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Nil,
    Boolean(bool),
    Number(f64),
    Obj(ObjRef),
}

impl Default for Value {
    fn default() -> Value {
        Value::Nil
    }
}

impl Value {
    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    pub fn is_falsey(&self) -> bool {
        self.is_nil() || matches!(self, Value::Boolean(false))
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Value::Number(_))
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_obj(&self) -> bool {
        matches!(self, Value::Obj(_))
    }

    pub fn as_obj(&self) -> Option<ObjRef> {
        match self {
            Value::Obj(o) => Some(*o),
            _ => None,
        }
    }

    /// Applies `op` to two numbers, wrapping the result back into a value.
    /// Used for every arithmetic and comparison operator except `+`.
    pub fn numeric<T: Into<Value>>(
        self,
        rhs: Value,
        op: impl FnOnce(f64, f64) -> T,
    ) -> Result<Value, TypeError> {
        match (self, rhs) {
            (Value::Number(l), Value::Number(r)) => Ok(op(l, r).into()),
            _ => Err(TypeError::Numbers),
        }
    }

    /// `+` is the only operator that works on strings as well as numbers.
    pub fn add(self, rhs: Value, heap: &mut Heap) -> Result<Value, TypeError> {
        match (self, rhs) {
            (Value::Number(l), Value::Number(r)) => Ok(Value::Number(l + r)),
            (Value::Obj(l), Value::Obj(r)) => heap
                .concatenate(l, r)
                .map(Value::from)
                .ok_or(TypeError::AddMismatch),
            _ => Err(TypeError::AddMismatch),
        }
    }

    pub fn negate(self) -> Result<Value, TypeError> {
        match self {
            Value::Number(n) => Ok(Value::Number(-n)),
            _ => Err(TypeError::Number),
        }
    }

    /// Pairs the value with the heap its objects live in, for printing.
    pub fn display(self, heap: &Heap) -> Displayed<'_> {
        Displayed { value: self, heap }
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Nil
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Number(f)
    }
}

impl From<ObjRef> for Value {
    fn from(obj: ObjRef) -> Self {
        Value::Obj(obj)
    }
}

pub struct Displayed<'h> {
    value: Value,
    heap: &'h Heap,
}

impl Display for Displayed<'_> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self.value {
            Value::Nil => write!(f, "nil"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", format_number(n)),
            Value::Obj(o) => match self.heap.get(o) {
                Some(obj) => write!(f, "{}", obj),
                None => write!(f, "<invalid object>"),
            },
        }
    }
}

/// Shortest round-trip rendering, in the spirit of `%g`: no trailing `.0` on
/// integral values, and exponent notation only for very large or very small
/// magnitudes.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "nan".to_owned();
    }

    if n.is_infinite() {
        let inf = if n > 0.0 { "inf" } else { "-inf" };
        return inf.to_owned();
    }

    let magnitude = n.abs();
    if magnitude == 0.0 || (1e-6..1e21).contains(&magnitude) {
        return format!("{}", n);
    }

    // `%g` writes a signed exponent of at least two digits.
    let scientific = format!("{:e}", n);
    match scientific.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{}e{}{:0>2}", mantissa, sign, digits)
        }
        None => scientific,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn numbers_print_without_trailing_zeroes() {
        assert_eq!(format_number(10.0), "10");
        assert_eq!(format_number(-3.0), "-3");
        assert_eq!(format_number(2.5), "2.5");
        assert_eq!(format_number(0.1 + 0.2), "0.30000000000000004");
        assert_eq!(format_number(0.0), "0");
    }

    #[test]
    fn extreme_numbers_use_exponents() {
        assert_eq!(format_number(1e21), "1e+21");
        assert_eq!(format_number(1.5e-7), "1.5e-07");
        assert_eq!(format_number(-2.5e100), "-2.5e+100");
        assert_eq!(format_number(123e-300), "1.23e-298");
        assert_eq!(format_number(f64::NAN), "nan");
        assert_eq!(format_number(f64::INFINITY), "inf");
        assert_eq!(format_number(f64::NEG_INFINITY), "-inf");
    }

    #[test]
    fn truthiness() {
        assert!(Value::Nil.is_falsey());
        assert!(Value::Boolean(false).is_falsey());
        assert!(!Value::Boolean(true).is_falsey());
        assert!(!Value::Number(0.0).is_falsey());
    }

    #[test]
    fn equality_follows_ieee_and_identity() {
        assert_eq!(Value::Nil, Value::Nil);
        assert_ne!(Value::Number(f64::NAN), Value::Number(f64::NAN));
        assert_ne!(Value::Nil, Value::Boolean(false));
        assert_ne!(Value::Number(0.0), Value::Boolean(false));

        let mut heap = Heap::new();
        let a = Value::from(heap.copy_string("same"));
        let b = Value::from(heap.take_string("same".to_owned()));
        assert_eq!(a, b);
    }

    #[test]
    fn arithmetic_type_errors() {
        let mut heap = Heap::new();
        let s = Value::from(heap.copy_string("s"));

        assert_eq!(
            Value::Number(1.0).numeric(Value::Boolean(true), |a, b| a - b),
            Err(TypeError::Numbers)
        );
        assert_eq!(
            Value::Number(1.0).add(s, &mut heap),
            Err(TypeError::AddMismatch)
        );
        assert_eq!(Value::Nil.negate(), Err(TypeError::Number));
        assert_eq!(
            Value::Number(2.0).numeric(Value::Number(3.0), |a, b| a < b),
            Ok(Value::Boolean(true))
        );
    }

    #[test]
    fn strings_display_raw() {
        let mut heap = Heap::new();
        let s = Value::from(heap.copy_string("hi there"));
        assert_eq!(s.display(&heap).to_string(), "hi there");
        assert_eq!(Value::Boolean(true).display(&heap).to_string(), "true");
        assert_eq!(Value::Nil.display(&heap).to_string(), "nil");
    }
}
