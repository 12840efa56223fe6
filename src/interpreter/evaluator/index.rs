use crate::{
    ast::{Expr, NodeId},
    error::RuntimeError,
    interpreter::{
        evaluator::{
            cast,
            core::{Context, EvalResult},
        },
        lexer::Token,
        value::Value,
    },
};

impl Context {
    /// Reads through an index or slice suffix.
    ///
    /// Strings index by character and produce one-character substrings;
    /// lists produce the element. Slices follow the usual half-open
    /// rules with both bounds optional: `x[:e]`, `x[b:]`, `x[b:e]` and
    /// `x[:]`. A list slice is a fresh list, not a view.
    pub(crate) fn eval_index(&mut self,
                             array: &Expr,
                             bracket: &Token,
                             start: Option<&Expr>,
                             sliced: bool,
                             end: Option<&Expr>)
                             -> EvalResult<Value> {
        let target = self.eval(array)?;

        let start_pos = match start {
            Some(expr) => Some(cast::to_integer(&self.eval(expr)?, bracket)?),
            None => None,
        };
        let end_pos = match end {
            Some(expr) => Some(cast::to_integer(&self.eval(expr)?, bracket)?),
            None => None,
        };

        match &target {
            Value::Str(text) => {
                let chars: Vec<char> = text.chars().collect();

                if sliced {
                    let (begin, finish) =
                        Self::slice_bounds(start_pos, end_pos, chars.len(), bracket)?;
                    Ok(Value::Str(chars[begin..finish].iter().collect()))
                } else {
                    let index = Self::position(start_pos, chars.len(), bracket)?;
                    Ok(Value::Str(chars[index].to_string()))
                }
            },

            Value::List(items) => {
                let items = items.borrow();

                if sliced {
                    let (begin, finish) =
                        Self::slice_bounds(start_pos, end_pos, items.len(), bracket)?;
                    Ok(Value::list(items[begin..finish].to_vec()))
                } else {
                    let index = Self::position(start_pos, items.len(), bracket)?;
                    Ok(items[index].clone())
                }
            },

            _ => Err(RuntimeError::NotIndexable { line: bracket.line,
                                                  file: bracket.file.to_string(), }),
        }
    }

    /// Writes through an index: `a[i] = v` replaces, `a[i] += v` inserts.
    ///
    /// List targets mutate in place and yield the list handle. String
    /// targets splice a new string (the written value must itself be a
    /// string) and re-assign it through the resolved binding, then yield
    /// the new string.
    pub(crate) fn eval_assign_at(&mut self,
                                 id: NodeId,
                                 name: &Token,
                                 array: &Expr,
                                 op: &str,
                                 index: &Expr,
                                 value: &Expr)
                                 -> EvalResult<Value> {
        let target = self.eval(array)?;
        let value = self.eval(value)?;
        let position = cast::to_integer(&self.eval(index)?, name)?;

        let out_of_range = || RuntimeError::IndexOutOfRange { line: name.line,
                                                              file: name.file.to_string(), };

        if let Value::List(items) = &target {
            {
                let mut elements = items.borrow_mut();
                let index = usize::try_from(position).map_err(|_| out_of_range())?;

                if op == "+=" {
                    if index > elements.len() {
                        return Err(out_of_range());
                    }
                    elements.insert(index, value);
                } else {
                    if index >= elements.len() {
                        return Err(out_of_range());
                    }
                    elements[index] = value;
                }
            }
            return Ok(target.clone());
        }

        if let Value::Str(text) = &target {
            let Value::Str(insert) = &value else {
                return Err(RuntimeError::SubstringExpected { line: name.line,
                                                             file: name.file.to_string(), });
            };

            let chars: Vec<char> = text.chars().collect();
            let index = usize::try_from(position).map_err(|_| out_of_range())?;

            let mut rebuilt: String;
            if op == "+=" {
                if index > chars.len() {
                    return Err(out_of_range());
                }
                rebuilt = chars[..index].iter().collect();
                rebuilt.push_str(insert);
                rebuilt.extend(chars[index..].iter());
            } else {
                if index >= chars.len() {
                    return Err(out_of_range());
                }
                rebuilt = chars[..index].iter().collect();
                rebuilt.push_str(insert);
                rebuilt.extend(chars[index + 1..].iter());
            }

            self.assign_variable(id, name, Value::Str(rebuilt.clone()))?;
            return Ok(Value::Str(rebuilt));
        }

        Err(RuntimeError::NotIndexable { line: name.line,
                                         file: name.file.to_string(), })
    }

    /// Checks a single index position against a length.
    fn position(pos: Option<i64>, len: usize, at: &Token) -> EvalResult<usize> {
        let out_of_range = || RuntimeError::IndexOutOfRange { line: at.line,
                                                              file: at.file.to_string(), };

        let index = usize::try_from(pos.ok_or_else(out_of_range)?).map_err(|_| out_of_range())?;
        if index >= len {
            return Err(out_of_range());
        }
        Ok(index)
    }

    /// Normalises optional slice bounds against a length; the start
    /// defaults to 0 and the end to the length.
    fn slice_bounds(start: Option<i64>,
                    end: Option<i64>,
                    len: usize,
                    at: &Token)
                    -> EvalResult<(usize, usize)> {
        let out_of_range = || RuntimeError::IndexOutOfRange { line: at.line,
                                                              file: at.file.to_string(), };

        let begin = match start {
            Some(pos) => usize::try_from(pos).map_err(|_| out_of_range())?,
            None => 0,
        };
        let finish = match end {
            Some(pos) => usize::try_from(pos).map_err(|_| out_of_range())?,
            None => len,
        };

        if begin > finish || finish > len {
            return Err(out_of_range());
        }
        Ok((begin, finish))
    }
}
