//! `numconv` is a pure Rust, no-std library for converting
//! binary floats and integers to and from decimal text.
//!
//! # Features
//!
//! - Correctly rounded parsing of `f16`, `f32`, and `f64`
//!   ([`parse_float`]) and range checked parsing of every
//!   primitive integer ([`parse_integer`]). The accepted
//!   grammar is controlled by [`NumberStyles`].
//! - Shortest round trip and fixed precision float to decimal
//!   conversion ([`format_float`]).
//! - Standard (`C`, `D`, `E`, `F`, `G`, `N`, `P`, `R`, `X`,
//!   `B`) and custom (`#,##0.00;(#,##0.00)`) format strings
//!   ([`write_float`], [`write_integer`]).
//! - Locale data as plain values ([`NumberFormatInfo`]). No
//!   locale database is included.
//!
//! ```
//! use numconv::{float_to_string, parse_float, NumberFormatInfo, NumberStyles};
//!
//! let info = NumberFormatInfo::INVARIANT;
//! let v: f64 = parse_float("1,234.5", NumberStyles::NUMBER, &info).unwrap();
//! assert_eq!(float_to_string(v, "N2", &info).unwrap(), "1,234.50");
//! assert_eq!(float_to_string(0.1f32, "R", &info).unwrap(), "0.1");
//! ```
//!
//! # Cargo Features
//!
//! - `alloc`: Include [`alloc`] support. Enables the
//!   functions that return a `String`.
//!
//! - `rand`: Enable [`rand`] support for [`f16`].
//!
//! - `std`: Include [`std`] support. Implies the `alloc`
//!   feature and implements `std::error::Error` for the error
//!   types.
//!
//! [`alloc`]: https://doc.rust-lang.org/alloc/
//! [`rand`]: https://crates.io/crates/rand
//! [`std`]: https://doc.rust-lang.org/std/

#![cfg_attr(docsrs, feature(doc_cfg))]
#![cfg_attr(not(any(feature = "std", test)), deny(clippy::std_instead_of_core))]
#![cfg_attr(not(any(feature = "std", test)), no_std)]
#![deny(clippy::alloc_instead_of_core)]
#![deny(clippy::expect_used)]
#![deny(clippy::implicit_saturating_sub)]
#![deny(clippy::missing_panics_doc)]
#![deny(clippy::ptr_as_ptr)]
#![deny(clippy::string_slice)]
#![deny(clippy::undocumented_unsafe_blocks)]
#![deny(clippy::unimplemented)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::wildcard_imports)]
#![deny(missing_docs)]
#![deny(rust_2018_idioms)]
#![deny(unused_lifetimes)]
#![deny(unused_qualifications)]

#[cfg(feature = "alloc")]
extern crate alloc;

mod bignum;
mod buffer;
mod conv;
mod ctx;
mod dec2flt;
mod diyfp;
mod float;
mod flt2dec;
mod integer;
mod itoa;
mod number;
mod numtest;
mod render;
mod util;

pub use buffer::{DigitBuffer, Kind};
pub use conv::*;
pub use ctx::*;
pub use dec2flt::number_to_float;
pub use float::{f16, Category, RawFloat};
pub use flt2dec::{format_float, format_float_mode, Mode};
pub use integer::Integer;

/// Simplifies importing common items.
pub mod prelude {
    pub use super::{
        f16,
        parse_float,
        parse_integer,
        write_float,
        write_integer,
        NumberFormatInfo,
        NumberStyles,
    };
}
