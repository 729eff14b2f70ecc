//! Scalar values and the numeric-promotion rules.
//!
//! Arithmetic promotion: if both operands are integer-valued the result
//! is an integer; otherwise both widen to floating point. Strings are
//! coerced on demand wherever a number is required; a non-numeric
//! string (or any other value in a numeric position) is a runtime type
//! error.

use crate::error::{EvalError, EvalResult};

/// A SmartScript scalar: integer, double or string.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Double(f64),
    Str(String),
}

impl Value {
    /// The textual form written to the sink.
    ///
    /// Doubles keep a decimal point even when integral, so `4.0` stays
    /// distinguishable from the integer `4` in rendered output.
    pub fn as_text(&self) -> String {
        match self {
            Value::Int(v) => v.to_string(),
            Value::Double(v) => {
                let text = format!("{v}");
                if text.contains('.') || !v.is_finite() {
                    text
                } else {
                    format!("{text}.0")
                }
            }
            Value::Str(s) => s.clone(),
        }
    }

    /// Value kind name for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "integer",
            Value::Double(_) => "double",
            Value::Str(_) => "string",
        }
    }
}

/// A value narrowed to one of the two numeric representations.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Num {
    Int(i64),
    Double(f64),
}

impl Num {
    fn as_f64(self) -> f64 {
        match self {
            Num::Int(v) => v as f64,
            Num::Double(v) => v,
        }
    }
}

/// Coerce a value to a number.
///
/// An absent operand counts as integer zero here — and only here; it is
/// never an addressable value anywhere else in the engine. Strings
/// parse as an integer first, then as a double.
pub(crate) fn numeric(value: Option<&Value>) -> EvalResult<Num> {
    match value {
        None => Ok(Num::Int(0)),
        Some(Value::Int(v)) => Ok(Num::Int(*v)),
        Some(Value::Double(v)) => Ok(Num::Double(*v)),
        Some(Value::Str(s)) => {
            if let Ok(v) = s.trim().parse::<i64>() {
                Ok(Num::Int(v))
            } else if let Ok(v) = s.trim().parse::<f64>() {
                Ok(Num::Double(v))
            } else {
                Err(EvalError::TypeMismatch(format!(
                    "'{s}' does not parse as a number"
                )))
            }
        }
    }
}

/// Coerce a value to a double, via the same rules as [`numeric`].
pub(crate) fn coerce_f64(value: &Value) -> EvalResult<f64> {
    Ok(numeric(Some(value))?.as_f64())
}

/// Apply one of the `+ - * / ^` operators under the promotion rule.
pub(crate) fn apply_operator(symbol: char, left: &Value, right: &Value) -> EvalResult<Value> {
    let l = numeric(Some(left))?;
    let r = numeric(Some(right))?;
    match (l, r) {
        (Num::Int(a), Num::Int(b)) => int_op(symbol, a, b),
        _ => float_op(symbol, l.as_f64(), r.as_f64()),
    }
}

fn int_op(symbol: char, a: i64, b: i64) -> EvalResult<Value> {
    let result = match symbol {
        '+' => a.checked_add(b),
        '-' => a.checked_sub(b),
        '*' => a.checked_mul(b),
        '/' => {
            if b == 0 {
                return Err(EvalError::Arithmetic("division by zero".into()));
            }
            a.checked_div(b)
        }
        '^' => {
            // Integer exponentiation while the result fits; otherwise
            // fall through to the floating-point form.
            if let Some(v) = u32::try_from(b).ok().and_then(|e| a.checked_pow(e)) {
                return Ok(Value::Int(v));
            }
            return float_op(symbol, a as f64, b as f64);
        }
        _ => return Err(EvalError::UnknownOperator(symbol)),
    };
    match result {
        Some(v) => Ok(Value::Int(v)),
        None => Err(EvalError::Arithmetic(format!(
            "integer overflow in '{symbol}'"
        ))),
    }
}

fn float_op(symbol: char, a: f64, b: f64) -> EvalResult<Value> {
    let result = match symbol {
        '+' => a + b,
        '-' => a - b,
        '*' => a * b,
        '/' => a / b,
        '^' => a.powf(b),
        _ => return Err(EvalError::UnknownOperator(symbol)),
    };
    Ok(Value::Double(result))
}

/// The loop-continuation comparison: `left ≤ right`.
///
/// Widens to float only when either side is a float; two integer-valued
/// operands compare as integers.
pub(crate) fn less_or_equal(left: &Value, right: &Value) -> EvalResult<bool> {
    let l = numeric(Some(left))?;
    let r = numeric(Some(right))?;
    Ok(match (l, r) {
        (Num::Int(a), Num::Int(b)) => a <= b,
        _ => l.as_f64() <= r.as_f64(),
    })
}
