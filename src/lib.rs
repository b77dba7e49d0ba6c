//! Lazy document model for high-performance JSON handling.
//!
//! A [`RawJson`] holds the unparsed text of exactly one JSON value and
//! materializes structured views only on demand:
//! - object/array views re-scan the text to find child boundaries, handing
//!   out independently owned child values;
//! - scalar views are narrow local conversions (literal compare, quote
//!   stripping, numeric text parse);
//! - the kind tag comes from a single first-byte table lookup.
//!
//! No eager parse tree is ever built and nothing is cached between
//! conversions. All backing buffers live on SIMD-aligned storage (see
//! [`alloc`]) so vectorized scanners can load from buffer starts directly.
//!
//! This crate does not validate JSON grammar: scanning delimits values in
//! well-formed text and reports boundaries it cannot compute, nothing more.
//!
//! ```
//! use rawjson::RawJson;
//!
//! let value = RawJson::from(r#"{"a":1,"b":[2,3]}"#);
//! let object = value.to_object()?;
//! assert_eq!(object["a"].as_i64(), 1);
//!
//! let b = object["b"].to_array()?;
//! assert_eq!(b[1].raw_json(), b"3");
//! # Ok::<(), rawjson::Error>(())
//! ```

pub mod alloc;
mod error;
mod kind;
pub mod number;
pub mod scan;
mod value;

pub use alloc::{AlignedAlloc, AlignedBytes, ALIGNMENT};
pub use error::{Error, Result};
pub use kind::{kind_of, JsonKind};
pub use value::{ArrayVec, ObjectMap, RawJson};
