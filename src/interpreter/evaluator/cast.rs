use crate::{
    ast::Expr,
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        lexer::Token,
        value::Value,
    },
};

/// The boolean a value stands for when a condition or a `(bln)` cast asks.
///
/// Integers are true when odd. That rule is inherited from the language
/// this interpreter re-implements and is part of its observable behavior;
/// `if (2)` takes the else branch. Note that `%` keeps the sign of the
/// dividend, so negative odd numbers are false as well.
#[must_use]
pub fn truthiness(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Int(n) => n % 2 == 1,
        Value::Dbl(v) => *v > 0.0,
        Value::Str(s) => !s.is_empty(),
        Value::List(items) => !items.borrow().is_empty(),
        Value::Null => false,
    }
}

/// The integer a value coerces to: booleans become 1 or 0, doubles
/// truncate toward zero, strings parse in base ten.
///
/// Lists and `null` have no integer form; `at` locates the diagnostic.
pub fn to_integer(value: &Value, at: &Token) -> EvalResult<i64> {
    match value {
        Value::Bool(b) => Ok(i64::from(*b)),
        Value::Int(n) => Ok(*n),
        #[allow(clippy::cast_possible_truncation)]
        Value::Dbl(v) => Ok(*v as i64),
        Value::Str(s) => {
            s.parse().map_err(|_| RuntimeError::ParseNumber { lexeme: s.clone(),
                                                              target: "int",
                                                              line:   at.line,
                                                              file:   at.file.to_string(), })
        },
        Value::List(_) | Value::Null => {
            Err(RuntimeError::TypeMismatch { details: format!("cannot convert {} to int",
                                                              value.type_name()),
                                             line:    at.line,
                                             file:    at.file.to_string(), })
        },
    }
}

/// The double a value coerces to.
pub fn to_double(value: &Value, at: &Token) -> EvalResult<f64> {
    match value {
        Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
        #[allow(clippy::cast_precision_loss)]
        Value::Int(n) => Ok(*n as f64),
        Value::Dbl(v) => Ok(*v),
        Value::Str(s) => {
            s.parse().map_err(|_| RuntimeError::ParseNumber { lexeme: s.clone(),
                                                              target: "flt",
                                                              line:   at.line,
                                                              file:   at.file.to_string(), })
        },
        Value::List(_) | Value::Null => {
            Err(RuntimeError::TypeMismatch { details: format!("cannot convert {} to flt",
                                                              value.type_name()),
                                             line:    at.line,
                                             file:    at.file.to_string(), })
        },
    }
}

impl Context {
    /// A named cast: `(bln)`, `(int)`, `(flt)` or `(str)` applied to the
    /// operand's value. `str` accepts everything via the default text
    /// form.
    pub(crate) fn eval_type_cast(&mut self, ty: &Token, expr: &Expr) -> EvalResult<Value> {
        let value = self.eval(expr)?;

        match ty.identifier() {
            "bln" => Ok(Value::Bool(truthiness(&value))),
            "int" => Ok(Value::Int(to_integer(&value, ty)?)),
            "flt" => Ok(Value::Dbl(to_double(&value, ty)?)),
            "str" => Ok(Value::Str(value.to_string())),
            _ => unreachable!("the parser only builds casts for the four type names"),
        }
    }

    /// Prefix operators. `+` and `-` want numbers, `!` takes anything via
    /// truthiness, `~` integer-casts its operand first.
    pub(crate) fn eval_unary(&mut self, op: &Token, expr: &Expr) -> EvalResult<Value> {
        let value = self.eval(expr)?;

        match op.operator() {
            "-" => match value {
                Value::Int(n) => {
                    n.checked_neg()
                     .map(Value::Int)
                     .ok_or_else(|| RuntimeError::Overflow { line: op.line,
                                                             file: op.file.to_string(), })
                },
                Value::Dbl(v) => Ok(Value::Dbl(-v)),
                _ => Err(RuntimeError::TypeMismatch { details: format!("cannot negate {}",
                                                                       value.type_name()),
                                                      line:    op.line,
                                                      file:    op.file.to_string(), }),
            },

            "+" => match value {
                Value::Int(_) | Value::Dbl(_) => Ok(value),
                _ => Err(RuntimeError::TypeMismatch { details: format!("cannot apply unary '+' to {}",
                                                                       value.type_name()),
                                                      line:    op.line,
                                                      file:    op.file.to_string(), }),
            },

            "!" => Ok(Value::Bool(!truthiness(&value))),

            "~" => Ok(Value::Int(!to_integer(&value, op)?)),

            _ => unreachable!("the parser only builds unary nodes for + - ! ~"),
        }
    }
}
