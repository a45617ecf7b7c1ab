//! Nested values to and from bracketed querystrings.
//!
//! Querystrings are flat lists of `key=value` pairs. Nested data travels in
//! them by spelling the path to each leaf in the key: `a[b][0]=1` says
//! "under `a`, under `b`, at index 0, the value 1". This crate converts
//! between that flat form and a nested [`Value`].
//!
//! ## Encoding
//!
//! [`encode`] walks a value and writes one pair per leaf, in the order the
//! value holds them. Empty sequences and mappings have no leaves and write
//! nothing.
//!
//! ```
//! use qs_nested::{encode, Value};
//!
//! let value: Value = [
//!     ("a", Value::from(vec![10, 20])),
//!     ("b", [("c", "x y")].into_iter().collect()),
//! ]
//! .into_iter()
//! .collect();
//!
//! assert_eq!(encode(&value, ""), "a%5B0%5D=10&a%5B1%5D=20&b%5Bc%5D=x+y");
//! ```
//!
//! ## Decoding
//!
//! [`decode`] reverses this without any schema, so it infers what it can
//! from the text alone:
//!
//! * a leaf that reads as a number becomes a [`Number`], everything else a
//!   string. There is no way to keep `007` a string.
//! * a key segment opens a sequence when the segment after it is numeric,
//!   and a mapping otherwise.
//!
//! ```
//! use qs_nested::{decode, Value};
//!
//! let map = decode("x=5&y=hello&a[b][0]=1&a[b][1]=2");
//! assert_eq!(map["x"], Value::from(5));
//! assert_eq!(map["y"], Value::from("hello"));
//! assert_eq!(map["a"]["b"], Value::from(vec![1, 2]));
//! ```
//!
//! When keys disagree about the shape at one path, the last writer wins;
//! see [`decode`] for the details.
//!
//! ## Typed usage
//!
//! With serde, structs go straight to and from querystrings. The target
//! type then decides how each leaf is read.
//!
//! ```
//! # use serde::{Deserialize, Serialize};
//! #[derive(Debug, PartialEq, Deserialize, Serialize)]
//! struct Address {
//!     city: String,
//!     postcode: String,
//! }
//! #[derive(Debug, PartialEq, Deserialize, Serialize)]
//! struct QueryParams {
//!     id: u8,
//!     name: String,
//!     address: Address,
//!     user_ids: Vec<u8>,
//! }
//!
//! let params = QueryParams {
//!     id: 42,
//!     name: "Acme".to_string(),
//!     address: Address {
//!         city: "Carrot City".to_string(),
//!         postcode: "01234".to_string(),
//!     },
//!     user_ids: vec![1, 2, 3, 4],
//! };
//! let rec_params: QueryParams = qs_nested::from_str("\
//!     name=Acme&id=42&address[postcode]=01234&\
//!     address[city]=Carrot+City&user_ids[0]=1&user_ids[1]=2&\
//!     user_ids[2]=3&user_ids[3]=4")
//!     .unwrap();
//! assert_eq!(rec_params, params);
//! assert_eq!(
//!     qs_nested::from_str::<QueryParams>(&qs_nested::to_string(&params).unwrap()).unwrap(),
//!     params);
//! ```

mod config;
mod de;
mod error;
mod ser;
mod value;

pub use config::Config;
#[doc(inline)]
pub use de::{decode, from_str, from_value};
pub use error::{Error, Result};
#[doc(inline)]
pub use ser::{encode, to_string, to_value, ValueSerializer};
pub use value::{Map, Number, Value};
