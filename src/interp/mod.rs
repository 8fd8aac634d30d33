use crate::{
    compiler::grammar::{BinaryOp, Expr, UnaryOp},
    context::default_funcs,
    EvalError, EvalResult, EventContext, Value,
};

/// Tree-walking evaluator over a parsed expression.
///
/// Holds nothing but a borrowed event, so one parsed tree can be run by many
/// interpreters at once.
pub struct Interpreter<'a> {
    event: &'a EventContext,
}

impl<'a> Interpreter<'a> {
    pub fn new(event: &'a EventContext) -> Interpreter<'a> {
        Interpreter { event }
    }

    pub fn run(&self, expr: &Expr) -> EvalResult<Value> {
        match expr {
            Expr::Literal(val) => Ok(val.clone()),
            Expr::PropertyPath(segments) => self.event.resolve(segments),
            Expr::Unary { op, operand } => {
                let val = self.run(operand)?;

                match op {
                    UnaryOp::Neg => -val,
                    UnaryOp::Not => !val,
                }
            }
            Expr::Binary { op, lhs, rhs } => self.run_binary(*op, lhs, rhs),
            Expr::FunctionCall { name, args } => self.run_call(name, args),
        }
    }

    fn run_binary(&self, op: BinaryOp, lhs: &Expr, rhs: &Expr) -> EvalResult<Value> {
        // right side only runs when the left side leaves the answer open
        match op {
            BinaryOp::And => {
                return match self.run(lhs)?.as_bool(op)? {
                    false => Ok(Value::Bool(false)),
                    true => Ok(Value::Bool(self.run(rhs)?.as_bool(op)?)),
                };
            }
            BinaryOp::Or => {
                return match self.run(lhs)?.as_bool(op)? {
                    true => Ok(Value::Bool(true)),
                    false => Ok(Value::Bool(self.run(rhs)?.as_bool(op)?)),
                };
            }
            _ => {}
        }

        let lhs = self.run(lhs)?;
        let rhs = self.run(rhs)?;

        match op {
            BinaryOp::Add => lhs + rhs,
            BinaryOp::Sub => lhs - rhs,
            BinaryOp::Mul => lhs * rhs,
            BinaryOp::Div => lhs / rhs,
            BinaryOp::Eq => Ok(Value::Bool(lhs == rhs)),
            BinaryOp::Ne => Ok(Value::Bool(lhs != rhs)),
            BinaryOp::Lt => Ok(Value::Bool(lhs.compare(op, &rhs)?.is_lt())),
            BinaryOp::Le => Ok(Value::Bool(lhs.compare(op, &rhs)?.is_le())),
            BinaryOp::Gt => Ok(Value::Bool(lhs.compare(op, &rhs)?.is_gt())),
            BinaryOp::Ge => Ok(Value::Bool(lhs.compare(op, &rhs)?.is_ge())),
            BinaryOp::And | BinaryOp::Or => Err(EvalError::binary_mismatch(op, &lhs, &rhs)),
        }
    }

    fn run_call(&self, name: &str, args: &[Expr]) -> EvalResult<Value> {
        let Some(func) = default_funcs::lookup(name) else {
            return Err(EvalError::InvalidCall(format!("unknown function '{}'", name)));
        };

        let mut arg_values = Vec::with_capacity(args.len());
        for arg in args.iter() {
            arg_values.push(self.run(arg)?);
        }

        func.call(arg_values)
    }
}

#[cfg(test)]
mod test {
    use super::Interpreter;
    use crate::{
        compiler::{
            grammar::{BinaryOp, Expr, UnaryOp},
            parser::parse_str,
        },
        EvalError, EventContext, Value,
    };

    fn run(src: &str) -> Result<Value, EvalError> {
        let event = EventContext::default()
            .with_property("a", Value::from(123.12))
            .with_property("flag", Value::from(true))
            .with_property("name", Value::from("gold"));

        Interpreter::new(&event).run(&parse_str(src).unwrap())
    }

    #[test]
    fn literals_and_paths() {
        assert_eq!(run("1").unwrap(), Value::from(1.0));
        assert_eq!(run("'x'").unwrap(), Value::from("x"));
        assert_eq!(run("null").unwrap(), Value::Null);
        assert_eq!(run("event.properties.a").unwrap(), Value::from(123.12));
    }

    #[test]
    fn arithmetic() {
        assert_eq!(run("1 + 2 * 3").unwrap(), Value::from(7.0));
        assert_eq!(run("(1 + 2) * 3").unwrap(), Value::from(9.0));
        assert_eq!(run("10 - 4 - 3").unwrap(), Value::from(3.0));
        assert_eq!(run("-event.properties.a").unwrap(), Value::from(-123.12));
        assert_eq!(run("1 / 0").unwrap_err(), EvalError::DivisionByZero);
    }

    #[test]
    fn plus_falls_back_to_concat() {
        assert_eq!(
            run("event.properties.a + 'test'").unwrap(),
            Value::from("123.12test")
        );
        assert_eq!(run("'1' + 2").unwrap(), Value::from("12"));
    }

    #[test]
    fn comparisons() {
        assert_eq!(run("1 < 2").unwrap(), Value::from(true));
        assert_eq!(run("2 <= 2").unwrap(), Value::from(true));
        assert_eq!(run("'b' > 'a'").unwrap(), Value::from(true));
        assert_eq!(run("1 >= 2").unwrap(), Value::from(false));
        assert_eq!(run("1 == '1'").unwrap(), Value::from(false));
        assert_eq!(run("null == null").unwrap(), Value::from(true));
        assert_eq!(run("event.properties.name != 'gold'").unwrap(), Value::from(false));
        assert!(matches!(run("1 < 'a'"), Err(EvalError::TypeMismatch { .. })));
    }

    #[test]
    fn logic_short_circuits() {
        assert_eq!(
            run("false && event.properties.missing").unwrap(),
            Value::from(false)
        );
        assert_eq!(
            run("event.properties.flag || 1 / 0").unwrap(),
            Value::from(true)
        );
        assert_eq!(run("!event.properties.flag").unwrap(), Value::from(false));
        assert!(matches!(run("true && 1"), Err(EvalError::TypeMismatch { .. })));
        assert!(matches!(
            run("true && event.properties.missing"),
            Err(EvalError::PropertyNotFound(_))
        ));
    }

    #[test]
    fn calls() {
        assert_eq!(
            run("concat(event.properties.a, 'test')").unwrap(),
            Value::from("123.12test")
        );
        assert_eq!(run("ROUND(event.properties.a, 1)").unwrap(), Value::from(123.1));
        assert_eq!(
            run("concat('a', round(2.5))").unwrap(),
            Value::from("a3")
        );
        assert!(matches!(run("nope(1)"), Err(EvalError::InvalidCall(_))));
        assert!(matches!(run("concat()"), Err(EvalError::InvalidCall(_))));
    }

    #[test]
    fn arguments_fail_left_to_right() {
        assert_eq!(
            run("concat(event.properties.missing, 1 / 0)").unwrap_err(),
            EvalError::PropertyNotFound("event.properties.missing".to_owned())
        );
        assert_eq!(
            run("concat(1 / 0, event.properties.missing)").unwrap_err(),
            EvalError::DivisionByZero
        );
    }

    #[test]
    fn hand_built_trees() {
        let event = EventContext::default();
        let expr = Expr::unary(
            UnaryOp::Neg,
            Expr::binary(
                BinaryOp::Mul,
                Expr::Literal(Value::from(2.0)),
                Expr::Literal(Value::from(4.0)),
            ),
        );

        assert_eq!(
            Interpreter::new(&event).run(&expr).unwrap(),
            Value::from(-8.0)
        );
        assert!(Interpreter::new(&event)
            .run(&Expr::path(&["properties", "x"]))
            .is_err());
    }
}
