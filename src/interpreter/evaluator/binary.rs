use crate::{
    ast::Expr,
    error::RuntimeError,
    interpreter::{
        evaluator::{
            cast,
            cast::truthiness,
            core::{Context, EvalResult},
        },
        lexer::Token,
        value::Value,
    },
};

impl Context {
    /// Evaluates a binary operation.
    ///
    /// Equality and the short-circuit operators control their own operand
    /// evaluation; everything else evaluates both sides first and walks
    /// the numeric tower:
    ///
    /// 1. `list + x` appends `x` to the list and yields the same handle.
    /// 2. A string on either side concatenates under `+`; no other
    ///    operator accepts a string operand.
    /// 3. A double on either side promotes `+ - * /` and the comparisons
    ///    to double arithmetic.
    /// 4. Everything else is 64-bit integer arithmetic, bitwise logic and
    ///    shifts, with overflow and division by zero reported.
    pub(crate) fn eval_binary(&mut self,
                              left: &Expr,
                              op: &Token,
                              right: &Expr)
                              -> EvalResult<Value> {
        match op.operator() {
            "==" => Ok(Value::Bool(self.eval(left)? == self.eval(right)?)),
            "!=" => Ok(Value::Bool(self.eval(left)? != self.eval(right)?)),

            "||" => {
                if truthiness(&self.eval(left)?) {
                    return Ok(Value::Bool(true));
                }
                Ok(Value::Bool(truthiness(&self.eval(right)?)))
            },

            "&&" => {
                if !truthiness(&self.eval(left)?) {
                    return Ok(Value::Bool(false));
                }
                Ok(Value::Bool(truthiness(&self.eval(right)?)))
            },

            operator => {
                let l = self.eval(left)?;
                let r = self.eval(right)?;
                Self::eval_binary_values(operator, &l, r, op)
            },
        }
    }

    fn eval_binary_values(operator: &str,
                          l: &Value,
                          r: Value,
                          op: &Token)
                          -> EvalResult<Value> {
        if let Value::List(items) = l
            && operator == "+"
        {
            items.borrow_mut().push(r);
            return Ok(l.clone());
        }

        if matches!(l, Value::Str(_)) || matches!(r, Value::Str(_)) {
            if operator == "+" {
                return Ok(Value::Str(format!("{l}{r}")));
            }
            return Err(RuntimeError::TypeMismatch { details: format!("cannot apply '{operator}' to a string"),
                                                    line:    op.line,
                                                    file:    op.file.to_string(), });
        }

        if matches!(l, Value::Dbl(_)) || matches!(r, Value::Dbl(_)) {
            let a = cast::to_double(l, op)?;
            let b = cast::to_double(&r, op)?;

            match operator {
                "+" => return Ok(Value::Dbl(a + b)),
                "-" => return Ok(Value::Dbl(a - b)),
                "*" => return Ok(Value::Dbl(a * b)),
                "/" => return Ok(Value::Dbl(a / b)),
                "<" => return Ok(Value::Bool(a < b)),
                ">" => return Ok(Value::Bool(a > b)),
                "<=" => return Ok(Value::Bool(a <= b)),
                ">=" => return Ok(Value::Bool(a >= b)),
                // Modulo, bitwise logic and shifts have no double form;
                // they drop to the integer path, truncating toward zero.
                _ => {},
            }
        }

        let a = cast::to_integer(l, op)?;
        let b = cast::to_integer(&r, op)?;
        let overflow = || RuntimeError::Overflow { line: op.line,
                                                   file: op.file.to_string(), };

        match operator {
            "+" => a.checked_add(b).map(Value::Int).ok_or_else(overflow),
            "-" => a.checked_sub(b).map(Value::Int).ok_or_else(overflow),
            "*" => a.checked_mul(b).map(Value::Int).ok_or_else(overflow),

            "/" => {
                if b == 0 {
                    return Err(RuntimeError::DivisionByZero { line: op.line,
                                                              file: op.file.to_string(), });
                }
                a.checked_div(b).map(Value::Int).ok_or_else(overflow)
            },

            "%" => {
                if b == 0 {
                    return Err(RuntimeError::DivisionByZero { line: op.line,
                                                              file: op.file.to_string(), });
                }
                a.checked_rem(b).map(Value::Int).ok_or_else(overflow)
            },

            "|" => Ok(Value::Int(a | b)),
            "^" => Ok(Value::Int(a ^ b)),
            "&" => Ok(Value::Int(a & b)),

            // Shift counts use the low six bits of the right operand.
            "<<" => Ok(Value::Int(a << (b & 63))),
            ">>" => Ok(Value::Int(a >> (b & 63))),
            #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
            ">>>" => Ok(Value::Int(((a as u64) >> (b & 63)) as i64)),

            "<" => Ok(Value::Bool(a < b)),
            ">" => Ok(Value::Bool(a > b)),
            "<=" => Ok(Value::Bool(a <= b)),
            ">=" => Ok(Value::Bool(a >= b)),

            _ => Err(RuntimeError::TypeMismatch { details: format!("unknown operator '{operator}'"),
                                                  line:    op.line,
                                                  file:    op.file.to_string(), }),
        }
    }
}
