//! # dtxt-core
//!
//! Pure-Rust codec for **DTXT**, a compact human-readable JSON superset.
//!
//! DTXT adds typed constructors for values JSON cannot carry natively:
//! `D(2026-01-15)` dates and date-times, `BN(9007199254740993)` big integers
//! and `B(A7B2319E)` binary blobs. Strings are backtick-delimited, `T` / `F` /
//! `N` stand for true / false / null, keys are bare identifiers, trailing
//! commas are allowed and `//` starts a line comment. A document's root is
//! always an object.
//!
//! ## Quick start
//!
//! ```rust
//! use dtxt_core::{decode, encode, encode_pretty};
//!
//! let doc = decode("{name: `Sample`, created: D(2026-01-15), items: [1, 2, 3,]}").unwrap();
//! assert_eq!(
//!     encode(&doc).unwrap(),
//!     "{created: D(2026-01-15), items: [1, 2, 3], name: `Sample`}"
//! );
//!
//! let pretty = encode_pretty(&doc, "  ").unwrap();
//! assert_eq!(decode(&pretty).unwrap(), doc);
//! ```
//!
//! ## Modules
//!
//! - [`lexer`]: text → token sequence
//! - [`parser`]: tokens → [`Value`] tree (`decode`, `decode_with`)
//! - [`encoder`]: [`Value`] → canonical text (`encode`, `encode_pretty`)
//! - [`value`]: the value tree
//! - [`options`]: per-call decode limits and encode layout
//! - [`conformance`]: JSON fixture runner and normalization
//! - [`error`]: the `FormatError` type

mod constructor;
pub mod conformance;
pub mod encoder;
pub mod error;
pub mod lexer;
pub mod options;
pub mod parser;
pub mod value;

pub use encoder::{encode, encode_pretty, encode_with};
pub use error::FormatError;
pub use lexer::{tokenize, Token, TokenKind};
pub use options::{DecodeOptions, EncodeOptions};
pub use parser::{decode, decode_with, parse};
pub use value::{Map, Number, Timestamp, Value};
