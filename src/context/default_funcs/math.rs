use num_traits::ToPrimitive;

use crate::{EvalError, EvalResult, Value};

/// Shifting past this many places already overflows or underflows any `f64`.
const MAX_SHIFT: i32 = 400;

pub fn round_impl(args: Vec<Value>) -> EvalResult<Value> {
    round_with("round", args, f64::round)
}

pub fn ceil_impl(args: Vec<Value>) -> EvalResult<Value> {
    round_with("ceil", args, f64::ceil)
}

pub fn floor_impl(args: Vec<Value>) -> EvalResult<Value> {
    round_with("floor", args, f64::floor)
}

pub fn min_impl(args: Vec<Value>) -> EvalResult<Value> {
    pick("min", args, f64::min)
}

pub fn max_impl(args: Vec<Value>) -> EvalResult<Value> {
    pick("max", args, f64::max)
}

fn round_with(name: &str, args: Vec<Value>, mode: fn(f64) -> f64) -> EvalResult<Value> {
    let mut args = args.into_iter();

    let n = match args.next() {
        Some(Value::Number(n)) => n,
        Some(other) => return Err(EvalError::unary_mismatch(name, &other)),
        None => return Err(EvalError::invalid_call("missing argument")),
    };

    let digits = match args.next() {
        None => 0,
        Some(Value::Number(d)) if d.fract() == 0.0 => d.to_i32().ok_or_else(|| {
            EvalError::InvalidCall(format!("{}() digits out of range: {}", name, d))
        })?,
        Some(other) => {
            return Err(EvalError::InvalidCall(format!(
                "{}() digits must be an integer, got {}",
                name, other
            )))
        }
    };

    let digits = digits.clamp(-MAX_SHIFT, MAX_SHIFT);
    let Some(scaled) = shift_decimal(n, digits) else {
        return Value::from_number(n);
    };

    match shift_decimal(mode(scaled), -digits) {
        Some(res) => Value::from_number(res),
        None => Err(EvalError::NumericOverflow),
    }
}

/// Move the decimal point of `n` by `places` on its shortest decimal text,
/// so `12.345` shifted by 2 is exactly `1234.5` rather than `1234.4999...`.
fn shift_decimal(n: f64, places: i32) -> Option<f64> {
    format!("{}e{}", n, places)
        .parse::<f64>()
        .ok()
        .filter(|res| res.is_finite())
}

fn pick(name: &str, args: Vec<Value>, select: fn(f64, f64) -> f64) -> EvalResult<Value> {
    let mut res: Option<f64> = None;

    for arg in args.iter() {
        let Value::Number(n) = arg else {
            return Err(EvalError::unary_mismatch(name, arg));
        };

        res = Some(res.map_or(*n, |cur| select(cur, *n)));
    }

    res.map(Value::Number)
        .ok_or_else(|| EvalError::invalid_call("expected at least one argument"))
}
