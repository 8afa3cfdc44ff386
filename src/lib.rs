//! This crate implements the two building blocks beneath a soft-decision decoder for
//! convolutional codes. The [`Encoder`] is a shift-register encoder with `k` inputs and `n`
//! outputs under arbitrary generator polynomials, whose register state can be saved and restored
//! so that a decoder can explore alternative paths. The [`ReliabilityMatrix`] holds soft-decision
//! reliability values for each symbol value at each message position, and supports their
//! normalization, the search for maxima, and bit-reversal deinterleaving.
//!
//! # Examples
//!
//! ```
//! use convcode::{Encoder, ReliabilityMatrix, Widths};
//!
//! // Rate-1/2 code of constraint length 3
//! let mut encoder = Encoder::new(1, &[3], &[vec![0b111, 0b101]], Widths::default())?;
//! let out_symbols = encoder.encode_sequence(&[1, 0, 1, 1]);
//!
//! // Hard-decision reliability values for the received symbols
//! let mut relmat = ReliabilityMatrix::new(2, out_symbols.len());
//! for &out_symbol in &out_symbols {
//!     let mut symbol_data = [0.0; 4];
//!     symbol_data[usize::try_from(out_symbol)?] = 1.0;
//!     relmat.enter_symbol_data(&symbol_data);
//! }
//! relmat.normalize();
//! assert_eq!(relmat.find_max_in_col(0, f32::INFINITY), (1.0, 3));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(
    clippy::complexity,
    clippy::pedantic,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    trivial_casts,
    trivial_numeric_casts,
    unused_allocation,
    unused_import_braces,
    unused_qualifications
)]

pub mod batch;
mod code;
mod common;
mod encoder;
mod reliability;
pub mod utils;

pub use code::CodeDefinition;
pub use common::{ConfigurationError, Error};
pub use encoder::{Encoder, Registers, Widths};
pub use reliability::ReliabilityMatrix;
