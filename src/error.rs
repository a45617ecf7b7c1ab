use serde::{de, ser};

use std::fmt::Display;

/// Errors raised by the serde bridges.
///
/// The core [`encode`](crate::encode) and [`decode`](crate::decode) functions
/// never fail; only converting typed Rust values to and from a
/// [`Value`](crate::Value) can.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A message raised by a `Serialize` or `Deserialize` implementation.
    #[error("{0}")]
    Custom(String),

    /// The type cannot be represented in the querystring data model.
    #[error("unsupported: {0}")]
    Unsupported(&'static str),

    /// The type cannot be used at the top level of a querystring.
    #[error("cannot encode {0} at the top level, try a struct or a map")]
    TopLevel(&'static str),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    /// Generate error to show top-level type cannot be serialized.
    pub fn top_level(object: &'static str) -> Self {
        Error::TopLevel(object)
    }
}

impl de::Error for Error {
    fn custom<T>(msg: T) -> Self
    where
        T: Display,
    {
        Error::Custom(msg.to_string())
    }
}

impl ser::Error for Error {
    fn custom<T>(msg: T) -> Self
    where
        T: Display,
    {
        Error::Custom(msg.to_string())
    }
}
