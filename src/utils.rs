//! # Some useful functions for exercising encoders
//!
//! The [`random_symbols`] function returns a given number of random symbols of a given width.
//!
//! # Examples
//!
//! ```
//! use convcode::{utils, Encoder, Widths};
//!
//! let mut encoder = Encoder::new(1, &[3], &[vec![0b111, 0b101]], Widths::default())?;
//! let in_symbols = utils::random_symbols(40, encoder.k());
//! let out_symbols = encoder.encode_sequence(&in_symbols);
//! assert_eq!(out_symbols.len(), 40);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use rand::Rng;

/// Returns given number of random symbols.
///
/// # Parameters
///
/// - `num_symbols`: Number of random symbols to be generated.
///
/// - `num_bits`: Number of bits per symbol (values above `64` are taken as `64`).
///
/// # Returns
///
/// - `symbols`: Random symbols, each uniformly distributed in `[0, 2^num_bits)`.
#[must_use]
pub fn random_symbols(num_symbols: usize, num_bits: usize) -> Vec<u64> {
    let mut rng = rand::rng();
    let mask = match u32::try_from(num_bits) {
        Ok(bits) if bits < u64::BITS => (1 << bits) - 1,
        _ => u64::MAX,
    };
    (0 .. num_symbols)
        .map(|_| rng.random::<u64>() & mask)
        .collect()
}
