use std::{cell::RefCell, rc::Rc};

use crate::ast::LiteralValue;

/// A runtime value.
///
/// Numbers, booleans and strings behave like values: assignment copies
/// them. Lists are a shared handle, so every binding that reaches a list
/// observes mutations made through any alias of it.
#[derive(Debug, Clone)]
pub enum Value {
    /// A 64-bit signed integer.
    Int(i64),
    /// A 64-bit floating-point number.
    Dbl(f64),
    /// A boolean, produced by comparisons, logic and the `bln` cast.
    Bool(bool),
    /// An immutable string.
    Str(String),
    /// A mutable list of values, mutated in place through its handle.
    List(Rc<RefCell<Vec<Value>>>),
    /// The absent value; also what a bodyless `return` produces.
    Null,
}

impl Value {
    /// Builds a fresh list value from its elements.
    #[must_use]
    pub fn list(elements: Vec<Self>) -> Self {
        Self::List(Rc::new(RefCell::new(elements)))
    }

    /// The language-level name of this value's type, as used in
    /// diagnostics.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Int(_) => "int",
            Self::Dbl(_) => "flt",
            Self::Bool(_) => "bln",
            Self::Str(_) => "str",
            Self::List(_) => "arr",
            Self::Null => "null",
        }
    }
}

/// Structural equality: numbers, booleans and strings compare by content
/// with no cross-type promotion (`1 == 1.0` is false), lists compare by
/// handle identity, and `null` equals only `null`.
///
/// # Example
/// ```
/// use cflat::interpreter::value::Value;
///
/// assert_eq!(Value::Int(1), Value::Int(1));
/// assert_ne!(Value::Int(1), Value::Dbl(1.0));
///
/// let a = Value::list(vec![Value::Int(1)]);
/// let alias = a.clone();
/// assert_eq!(a, alias);
/// assert_ne!(a, Value::list(vec![Value::Int(1)]));
/// ```
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Dbl(a), Self::Dbl(b)) => a == b,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::List(a), Self::List(b)) => Rc::ptr_eq(a, b),
            (Self::Null, Self::Null) => true,
            _ => false,
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Dbl(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<&LiteralValue> for Value {
    fn from(literal: &LiteralValue) -> Self {
        match literal {
            LiteralValue::Int(v) => Self::Int(*v),
            LiteralValue::Dbl(v) => Self::Dbl(*v),
            LiteralValue::Str(v) => Self::Str(v.clone()),
            LiteralValue::Bool(v) => Self::Bool(*v),
            LiteralValue::Null => Self::Null,
        }
    }
}

/// The default text form, used by `print` and the `str` cast.
impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Dbl(v) => write!(f, "{v}"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Str(v) => write!(f, "{v}"),
            Self::Null => write!(f, "null"),
            Self::List(items) => {
                write!(f, "[")?;

                for (index, value) in items.borrow().iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }

                    write!(f, "{value}")?;
                }

                write!(f, "]")
            },
        }
    }
}
