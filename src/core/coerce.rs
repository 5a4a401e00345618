//! Argument coercion.
//!
//! Commands declare an ordered parameter schema; raw tokens are converted
//! against it once, before the handler runs. Coercion is all-or-nothing: the
//! first bad token aborts and no partial list escapes.

use crate::core::error::DispatchError;
use crate::core::output::compact_line;
use serde::Serialize;
use std::fmt;

/// Longest raw token echoed back in an argument error.
const MAX_RAW_ECHO: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ParamType {
    Int,
    Float,
    String,
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ParamType::Int => "Int",
            ParamType::Float => "Float",
            ParamType::String => "String",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Param {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: ParamType,
}

impl Param {
    pub fn new(name: impl Into<String>, ty: ParamType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }

    pub fn int(name: impl Into<String>) -> Self {
        Self::new(name, ParamType::Int)
    }

    pub fn float(name: impl Into<String>) -> Self {
        Self::new(name, ParamType::Float)
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, ParamType::String)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    Int(i32),
    Float(f32),
    String(String),
}

impl ArgValue {
    pub fn param_type(&self) -> ParamType {
        match self {
            ArgValue::Int(_) => ParamType::Int,
            ArgValue::Float(_) => ParamType::Float,
            ArgValue::String(_) => ParamType::String,
        }
    }
}

/// Typed argument list handed to a handler.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Args(Vec<ArgValue>);

impl Args {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ArgValue> {
        self.0.get(index)
    }

    pub fn values(&self) -> &[ArgValue] {
        &self.0
    }

    /// Destructure into a typed tuple, e.g. `let (x, y): (i32, i32) = args.unpack()?`.
    pub fn unpack<T: FromArgs>(&self) -> Result<T, DispatchError> {
        T::from_args(self)
    }
}

pub trait FromArg: Sized {
    const TYPE: ParamType;
    fn from_arg(value: &ArgValue) -> Option<Self>;
}

impl FromArg for i32 {
    const TYPE: ParamType = ParamType::Int;
    fn from_arg(value: &ArgValue) -> Option<Self> {
        match value {
            ArgValue::Int(v) => Some(*v),
            _ => None,
        }
    }
}

impl FromArg for f32 {
    const TYPE: ParamType = ParamType::Float;
    fn from_arg(value: &ArgValue) -> Option<Self> {
        match value {
            ArgValue::Float(v) => Some(*v),
            _ => None,
        }
    }
}

impl FromArg for String {
    const TYPE: ParamType = ParamType::String;
    fn from_arg(value: &ArgValue) -> Option<Self> {
        match value {
            ArgValue::String(v) => Some(v.clone()),
            _ => None,
        }
    }
}

pub trait FromArgs: Sized {
    fn from_args(args: &Args) -> Result<Self, DispatchError>;
}

fn typed_at<T: FromArg>(args: &Args, index: usize) -> Result<T, DispatchError> {
    let value = args.get(index).ok_or_else(|| {
        DispatchError::Handler(format!("handler expects argument {index}, none supplied"))
    })?;
    T::from_arg(value).ok_or_else(|| {
        DispatchError::Handler(format!(
            "handler expects {} at argument {index}, schema supplied {}",
            T::TYPE,
            value.param_type()
        ))
    })
}

macro_rules! impl_from_args {
    ($len:expr; $($ty:ident => $idx:tt),+) => {
        impl<$($ty: FromArg),+> FromArgs for ($($ty,)+) {
            fn from_args(args: &Args) -> Result<Self, DispatchError> {
                if args.len() != $len {
                    return Err(DispatchError::Handler(format!(
                        "handler expects {} argument(s), schema supplied {}",
                        $len,
                        args.len()
                    )));
                }
                Ok(($(typed_at::<$ty>(args, $idx)?,)+))
            }
        }
    };
}

impl_from_args!(1; A => 0);
impl_from_args!(2; A => 0, B => 1);
impl_from_args!(3; A => 0, B => 1, C => 2);
impl_from_args!(4; A => 0, B => 1, C => 2, D => 3);

fn parse_token(index: usize, param: &Param, token: &str) -> Result<ArgValue, DispatchError> {
    let mismatch = || DispatchError::ArgumentType {
        index,
        name: param.name.clone(),
        expected: param.ty,
        raw: compact_line(token, MAX_RAW_ECHO),
    };

    match param.ty {
        ParamType::Int => token.parse::<i32>().map(ArgValue::Int).map_err(|_| mismatch()),
        ParamType::Float => match token.parse::<f32>() {
            Ok(v) if v.is_finite() => Ok(ArgValue::Float(v)),
            _ => Err(mismatch()),
        },
        ParamType::String => Ok(ArgValue::String(token.to_string())),
    }
}

/// Convert raw tokens into typed values per `schema`.
pub fn coerce<S: AsRef<str>>(raw: &[S], schema: &[Param]) -> Result<Args, DispatchError> {
    if raw.len() != schema.len() {
        return Err(DispatchError::Arity {
            expected: schema.len(),
            actual: raw.len(),
        });
    }

    raw.iter()
        .zip(schema)
        .enumerate()
        .map(|(index, (token, param))| parse_token(index, param, token.as_ref()))
        .collect::<Result<Vec<_>, _>>()
        .map(Args)
}
