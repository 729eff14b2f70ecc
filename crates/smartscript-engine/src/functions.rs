//! The builtin function catalog.
//!
//! Every builtin has a fixed arity and operates directly on the echo
//! operand stack; the `*param*` family reads and writes the sink's
//! three parameter stores. Dispatch is a static match — the catalog is
//! closed and an unrecognized name is a runtime error.

use crate::error::{EvalError, EvalResult};
use crate::sink::Sink;
use crate::value::{self, Value};

/// Invoke a builtin by name against the operand stack and sink.
pub(crate) fn call(name: &str, stack: &mut Vec<Value>, sink: &mut dyn Sink) -> EvalResult<()> {
    match name {
        // sin: one argument in degrees, pushes the sine as a double.
        "sin" => {
            let arg = pop(stack, name)?;
            let degrees = value::coerce_f64(&arg)?;
            stack.push(Value::Double(degrees.to_radians().sin()));
        }

        // decfmt: pops the format pattern, then the number to format.
        "decfmt" => {
            let pattern = pop(stack, name)?;
            let number = pop(stack, name)?;
            let formatted = format_decimal(&pattern.as_text(), value::coerce_f64(&number)?)?;
            stack.push(Value::Str(formatted));
        }

        "dup" => {
            let top = pop(stack, name)?;
            stack.push(top.clone());
            stack.push(top);
        }

        "swap" => {
            let a = pop(stack, name)?;
            let b = pop(stack, name)?;
            stack.push(a);
            stack.push(b);
        }

        // Side-effects the sink; pushes nothing.
        "setMimeType" => {
            let mime = pop(stack, name)?;
            sink.set_mime_type(&mime.as_text());
        }

        // Pops the default, then the parameter name; pushes the store
        // value or the default.
        "paramGet" | "pparamGet" | "tparamGet" => {
            let default = pop(stack, name)?;
            let key = pop(stack, name)?.as_text();
            let found = match name {
                "paramGet" => sink.request_param(&key),
                "pparamGet" => sink.persistent_param(&key),
                _ => sink.temporary_param(&key),
            };
            stack.push(found.map(Value::Str).unwrap_or(default));
        }

        // Pops the parameter name, then the value to store.
        "pparamSet" | "tparamSet" => {
            let key = pop(stack, name)?.as_text();
            let stored = pop(stack, name)?.as_text();
            if name == "pparamSet" {
                sink.set_persistent_param(&key, &stored);
            } else {
                sink.set_temporary_param(&key, &stored);
            }
        }

        "pparamDel" | "tparamDel" => {
            let key = pop(stack, name)?.as_text();
            if name == "pparamDel" {
                sink.delete_persistent_param(&key);
            } else {
                sink.delete_temporary_param(&key);
            }
        }

        _ => return Err(EvalError::UnknownFunction(name.to_string())),
    }
    Ok(())
}

fn pop(stack: &mut Vec<Value>, function: &str) -> EvalResult<Value> {
    stack
        .pop()
        .ok_or_else(|| EvalError::StackUnderflow(format!("@{function}")))
}

/// Format a number with a DecimalFormat-style pattern.
///
/// Supported subset: `0` (mandatory digit) and `#` (optional digit) on
/// either side of a single optional decimal point, e.g. `0.000` or
/// `#.##`. The fraction width caps the digits printed; `0`s force
/// padding on both sides.
fn format_decimal(pattern: &str, number: f64) -> EvalResult<String> {
    let (int_pattern, frac_pattern) = match pattern.split_once('.') {
        Some((i, f)) => (i, f),
        None => (pattern, ""),
    };
    let supported = |p: &str| p.chars().all(|c| c == '0' || c == '#');
    if !supported(int_pattern) || !supported(frac_pattern) {
        return Err(EvalError::TypeMismatch(format!(
            "unsupported decfmt pattern '{pattern}'"
        )));
    }

    let max_frac = frac_pattern.len();
    let min_frac = frac_pattern.chars().filter(|&c| c == '0').count();
    let min_int = int_pattern.chars().filter(|&c| c == '0').count();

    let text = format!("{number:.max_frac$}");
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i.to_string(), f.to_string()),
        None => (text, String::new()),
    };

    let mut frac_part = frac_part;
    while frac_part.len() > min_frac && frac_part.ends_with('0') {
        frac_part.pop();
    }

    let negative = int_part.starts_with('-');
    let mut digits = int_part.trim_start_matches('-').to_string();
    while digits.len() < min_int {
        digits.insert(0, '0');
    }

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&digits);
    if !frac_part.is_empty() {
        out.push('.');
        out.push_str(&frac_part);
    }
    Ok(out)
}
