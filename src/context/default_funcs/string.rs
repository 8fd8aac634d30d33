use crate::{EvalResult, Value};

pub fn concat_impl(args: Vec<Value>) -> EvalResult<Value> {
    let mut res = String::new();

    for arg in args.iter() {
        res.push_str(&arg.to_text()?);
    }

    Ok(Value::String(res))
}
