//! Shift-register convolutional encoder with `k` inputs and `n` outputs

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::{ConfigurationError, Error};

/// Largest symbol or register width supported
const MAX_WIDTH: u32 = u64::BITS;

/// Bit widths of I/O symbols and of the internal registers
#[derive(Clone, Eq, PartialEq, Debug, Copy, Deserialize, Serialize)]
pub struct Widths {
    /// Width (bits) of input and output symbols
    pub symbol_bits: u32,
    /// Width (bits) of each internal shift register
    pub register_bits: u32,
}

impl Default for Widths {
    /// Returns widths of 8-bit symbols and 32-bit registers.
    fn default() -> Self {
        Self {
            symbol_bits: 8,
            register_bits: 32,
        }
    }
}

impl Widths {
    /// Checks that both widths are in the range `[1, 64]`.
    fn check(self) -> Result<(), ConfigurationError> {
        for (name, bits) in [
            ("symbol", self.symbol_bits),
            ("register", self.register_bits),
        ] {
            if bits == 0 || bits > MAX_WIDTH {
                return Err(ConfigurationError::InvalidWidth { name, bits });
            }
        }
        Ok(())
    }

    /// Returns mask of the bits a register can hold.
    fn register_mask(self) -> u64 {
        low_bits_mask(self.register_bits)
    }
}

/// Snapshot of the internal registers of an encoder (one register per input)
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Registers(Box<[u64]>);

impl Registers {
    /// Returns `k` zeroed registers.
    fn zeroed(k: usize) -> Self {
        Self(vec![0; k].into_boxed_slice())
    }

    /// Returns register contents, one element per input.
    #[must_use]
    pub fn as_slice(&self) -> &[u64] {
        &self.0
    }
}

/// Convolutional encoder mapping `k`-bit input symbols to `n`-bit output symbols
///
/// The input bits of a symbol are clocked simultaneously into the least significant position of
/// the registers, bit `i` of the symbol going into register `i`. Output bit `j` is the XOR, over
/// all inputs `i`, of the parity of register `i` masked by generator polynomial `j` of input `i`.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Encoder {
    /// Number of inputs
    k: usize,
    /// Number of outputs
    n: usize,
    /// Maximum constraint length
    m: u32,
    /// Constraint length of each input
    constraint_lengths: Vec<u32>,
    /// Generator polynomials of each input, `n` per input
    generator_polynomials: Vec<Vec<u64>>,
    /// Symbol and register widths
    widths: Widths,
    /// Registers, one per input
    registers: Registers,
}

impl Encoder {
    /// Returns encoder for given code definition.
    ///
    /// # Parameters
    ///
    /// - `k`: Number of input bits per symbol.
    ///
    /// - `constraint_lengths`: Register length for each input. Must have `k` elements.
    ///
    /// - `generator_polynomials`: Generator polynomial representations for each input. Must have
    ///   `k` elements, each being a vector with one tap mask per output bit. The number of outputs
    ///   `n` is the length of the shortest of these vectors; extra taps are ignored.
    ///
    /// - `widths`: Widths of I/O symbols and registers.
    ///
    /// # Errors
    ///
    /// Returns an error if a width is outside `[1, 64]`, if `k` is `0` or exceeds the symbol
    /// width, if the number of constraint lengths or of generator polynomial vectors is not `k`,
    /// if a constraint length exceeds the register width, or if `n` is either not larger than `k`
    /// or larger than the symbol width.
    ///
    /// # Examples
    ///
    /// ```
    /// use convcode::{Encoder, Widths};
    ///
    /// let encoder = Encoder::new(1, &[3], &[vec![0b111, 0b101]], Widths::default())?;
    /// assert_eq!((encoder.k(), encoder.n(), encoder.m()), (1, 2, 3));
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn new(
        k: usize,
        constraint_lengths: &[u32],
        generator_polynomials: &[Vec<u64>],
        widths: Widths,
    ) -> Result<Self, Error> {
        widths.check()?;
        if k == 0 {
            return Err(ConfigurationError::NoInputs.into());
        }
        if constraint_lengths.len() != k {
            return Err(ConfigurationError::InputCountMismatch {
                expected: k,
                found: constraint_lengths.len(),
            }
            .into());
        }
        if k > bits_to_usize(widths.symbol_bits) {
            return Err(ConfigurationError::TooManyInputs {
                k,
                symbol_bits: widths.symbol_bits,
            }
            .into());
        }
        if generator_polynomials.len() != k {
            return Err(ConfigurationError::GeneratorCountMismatch {
                expected: k,
                found: generator_polynomials.len(),
            }
            .into());
        }
        if let Some((input, &length)) = constraint_lengths
            .iter()
            .find_position(|&&len| len > widths.register_bits)
        {
            return Err(ConfigurationError::ConstraintTooLong {
                input,
                length,
                register_bits: widths.register_bits,
            }
            .into());
        }
        let n = generator_polynomials.iter().map(Vec::len).min().unwrap_or(0);
        if n <= k {
            return Err(ConfigurationError::TooFewOutputs { n, k }.into());
        }
        if n > bits_to_usize(widths.symbol_bits) {
            return Err(ConfigurationError::TooManyOutputs {
                n,
                symbol_bits: widths.symbol_bits,
            }
            .into());
        }
        Ok(Self {
            k,
            n,
            m: constraint_lengths.iter().copied().max().unwrap_or(0),
            constraint_lengths: constraint_lengths.to_vec(),
            generator_polynomials: generator_polynomials
                .iter()
                .map(|polys| polys[.. n].to_vec())
                .collect(),
            widths,
            registers: Registers::zeroed(k),
        })
    }

    /// Returns number of inputs.
    #[must_use]
    pub fn k(&self) -> usize {
        self.k
    }

    /// Returns number of outputs.
    #[must_use]
    pub fn n(&self) -> usize {
        self.n
    }

    /// Returns maximum constraint length.
    #[must_use]
    pub fn m(&self) -> u32 {
        self.m
    }

    /// Returns constraint length of each input.
    #[must_use]
    pub fn constraint_lengths(&self) -> &[u32] {
        &self.constraint_lengths
    }

    /// Returns the `n` generator polynomials of each input.
    #[must_use]
    pub fn generator_polynomials(&self) -> &[Vec<u64>] {
        &self.generator_polynomials
    }

    /// Returns symbol and register widths.
    #[must_use]
    pub fn widths(&self) -> Widths {
        self.widths
    }

    /// Clears all registers. Used before encoding a new sequence.
    pub fn clear(&mut self) {
        self.registers.0.iter_mut().for_each(|reg| *reg = 0);
    }

    /// Encodes a `k`-bit input symbol into an `n`-bit output symbol.
    ///
    /// # Parameters
    ///
    /// - `in_symbol`: Input symbol, of which only the `k` least significant bits are used (the
    ///   least significant bit goes into register `0`).
    ///
    /// - `no_step`: If `true`, each register is first shifted right by one, discarding the bit
    ///   inserted by the previous call. Encoding the same symbol again with `no_step` set thus
    ///   reproduces the previous output, and encoding another symbol replaces the previous
    ///   hypothesis without advancing the state.
    ///
    /// # Returns
    ///
    /// - `out_symbol`: Output symbol, bit `j` being output bit `j`.
    ///
    /// # Examples
    ///
    /// ```
    /// use convcode::{Encoder, Widths};
    ///
    /// let mut encoder = Encoder::new(1, &[3], &[vec![0b111, 0b101]], Widths::default())?;
    /// assert_eq!(encoder.encode(1, false), 0b11);
    /// assert_eq!(encoder.encode(0, false), 0b01);
    /// assert_eq!(encoder.encode(0, true), 0b01);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn encode(&mut self, in_symbol: u64, no_step: bool) -> u64 {
        let mask = self.widths.register_mask();
        let mut w_in = in_symbol;
        for reg in self.registers.0.iter_mut() {
            if no_step {
                *reg >>= 1;
            }
            *reg = ((*reg << 1) | (w_in & 1)) & mask;
            w_in >>= 1;
        }
        (0 .. self.n).fold(0, |out_symbol, out_index| {
            let out_bit = self
                .registers
                .0
                .iter()
                .zip(&self.generator_polynomials)
                .fold(0, |acc, (&reg, polys)| acc ^ bitxor(reg & polys[out_index]));
            out_symbol | (out_bit << out_index)
        })
    }

    /// Clears the registers and returns the output symbols for given input symbols.
    ///
    /// # Examples
    ///
    /// ```
    /// use convcode::{Encoder, Widths};
    ///
    /// let mut encoder = Encoder::new(1, &[3], &[vec![0b111, 0b101]], Widths::default())?;
    /// assert_eq!(encoder.encode_sequence(&[1, 0, 1, 1]), [0b11, 0b01, 0b00, 0b10]);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn encode_sequence(&mut self, in_symbols: &[u64]) -> Vec<u64> {
        self.clear();
        in_symbols
            .iter()
            .map(|&in_symbol| self.encode(in_symbol, false))
            .collect()
    }

    /// Returns snapshot of the registers.
    #[must_use]
    pub fn registers(&self) -> &Registers {
        &self.registers
    }

    /// Replaces the registers with given snapshot.
    ///
    /// # Panics
    ///
    /// Panics if the snapshot was taken from an encoder with a different number of inputs.
    pub fn set_registers(&mut self, registers: &Registers) {
        assert_eq!(
            registers.0.len(),
            self.k,
            "Register snapshot has wrong number of registers"
        );
        self.registers.0.copy_from_slice(&registers.0);
    }
}

impl std::fmt::Display for Encoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "k={}, n={}, m={}", self.k, self.n, self.m)?;
        for (input, (len, polys)) in self
            .constraint_lengths
            .iter()
            .zip(&self.generator_polynomials)
            .enumerate()
        {
            writeln!(
                f,
                "{input} ({len}) : {}",
                polys.iter().map(|poly| format!("{poly:x}")).join(" ")
            )?;
        }
        Ok(())
    }
}

/// Returns XOR of bits in the binary representation of given integer.
fn bitxor(num: u64) -> u64 {
    u64::from(num.count_ones() % 2)
}

/// Returns integer with the given number of least significant bits set.
fn low_bits_mask(num_bits: u32) -> u64 {
    if num_bits >= MAX_WIDTH {
        u64::MAX
    } else {
        (1 << num_bits) - 1
    }
}

/// Converts a bit width to `usize`.
fn bits_to_usize(bits: u32) -> usize {
    // OK to cast `u32` to `usize`: Widths are at most 64.
    bits as usize
}

#[cfg(test)]
mod tests_of_encoder {
    use super::*;

    fn rate_half_encoder() -> Encoder {
        Encoder::new(1, &[3], &[vec![0b111, 0b101]], Widths::default()).unwrap()
    }

    fn rate_two_thirds_encoder() -> Encoder {
        Encoder::new(
            2,
            &[3, 2],
            &[vec![0b101, 0b011, 0b110], vec![0b11, 0b10, 0b01, 0b11]],
            Widths::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_new() {
        let encoder = rate_two_thirds_encoder();
        assert_eq!(encoder.k(), 2);
        assert_eq!(encoder.n(), 3);
        assert_eq!(encoder.m(), 3);
        assert_eq!(encoder.constraint_lengths(), [3, 2]);
        assert_eq!(
            encoder.generator_polynomials(),
            [vec![0b101, 0b011, 0b110], vec![0b11, 0b10, 0b01]]
        );
        assert_eq!(encoder.widths(), Widths::default());
        assert_eq!(encoder.registers().as_slice(), [0, 0]);
    }

    #[test]
    fn test_new_errors() {
        let polys = [vec![0b111, 0b101]];
        let widths = Widths::default();
        let err = |result: Result<Encoder, Error>| match result {
            Err(Error::Configuration(err)) => err,
            _ => panic!("Expected configuration error"),
        };
        assert_eq!(
            err(Encoder::new(0, &[], &[], widths)),
            ConfigurationError::NoInputs
        );
        assert_eq!(
            err(Encoder::new(1, &[3, 3], &polys, widths)),
            ConfigurationError::InputCountMismatch {
                expected: 1,
                found: 2
            }
        );
        assert_eq!(
            err(Encoder::new(9, &[3; 9], &vec![vec![1; 10]; 9], widths)),
            ConfigurationError::TooManyInputs {
                k: 9,
                symbol_bits: 8
            }
        );
        assert_eq!(
            err(Encoder::new(1, &[3], &[], widths)),
            ConfigurationError::GeneratorCountMismatch {
                expected: 1,
                found: 0
            }
        );
        assert_eq!(
            err(Encoder::new(1, &[33], &polys, widths)),
            ConfigurationError::ConstraintTooLong {
                input: 0,
                length: 33,
                register_bits: 32
            }
        );
        assert_eq!(
            err(Encoder::new(1, &[3], &[vec![0b111]], widths)),
            ConfigurationError::TooFewOutputs { n: 1, k: 1 }
        );
        assert_eq!(
            err(Encoder::new(
                2,
                &[3, 3],
                &[vec![0b111, 0b101, 0b011], vec![0b1, 0b10]],
                widths
            )),
            ConfigurationError::TooFewOutputs { n: 2, k: 2 }
        );
        assert_eq!(
            err(Encoder::new(1, &[3], &[vec![1; 9]], widths)),
            ConfigurationError::TooManyOutputs {
                n: 9,
                symbol_bits: 8
            }
        );
        assert_eq!(
            err(Encoder::new(
                1,
                &[3],
                &polys,
                Widths {
                    symbol_bits: 65,
                    register_bits: 32
                }
            )),
            ConfigurationError::InvalidWidth {
                name: "symbol",
                bits: 65
            }
        );
        assert_eq!(
            err(Encoder::new(
                1,
                &[3],
                &polys,
                Widths {
                    symbol_bits: 8,
                    register_bits: 0
                }
            )),
            ConfigurationError::InvalidWidth {
                name: "register",
                bits: 0
            }
        );
    }

    #[test]
    fn test_new_wide_symbols_and_registers() {
        let widths = Widths {
            symbol_bits: 64,
            register_bits: 64,
        };
        let encoder = Encoder::new(1, &[64], &[vec![u64::MAX; 64]], widths).unwrap();
        assert_eq!(encoder.n(), 64);
        assert_eq!(encoder.m(), 64);
    }

    #[test]
    fn test_clear() {
        let mut encoder = rate_two_thirds_encoder();
        encoder.encode(0b11, false);
        assert_eq!(encoder.registers().as_slice(), [1, 1]);
        encoder.clear();
        assert_eq!(encoder.registers().as_slice(), [0, 0]);
    }

    #[test]
    fn test_encode_golden_vector() {
        let mut encoder = rate_half_encoder();
        encoder.clear();
        let out_symbols: Vec<u64> = [1, 0, 1, 1]
            .iter()
            .map(|&bit| encoder.encode(bit, false))
            .collect();
        // Pairs (g0, g1) are 11, 10, 00, 01
        assert_eq!(out_symbols, [0b11, 0b01, 0b00, 0b10]);
    }

    #[test]
    fn test_encode_zero_from_cleared_state() {
        let mut encoder = rate_two_thirds_encoder();
        encoder.clear();
        for _ in 0 .. 5 {
            assert_eq!(encoder.encode(0, false), 0);
        }
        let mut encoder = rate_half_encoder();
        assert_eq!(encoder.encode_sequence(&[0; 8]), [0; 8]);
    }

    #[test]
    fn test_encode_two_inputs() {
        let mut encoder = rate_two_thirds_encoder();
        // Registers [1, 0]: outputs parity(1 & [101, 011, 110]) = [1, 1, 0]
        assert_eq!(encoder.encode(0b01, false), 0b011);
        // Registers [2, 1]: outputs [0, 1, 1] ^ [1, 0, 1] = [1, 1, 0]
        assert_eq!(encoder.encode(0b10, false), 0b011);
        assert_eq!(encoder.registers().as_slice(), [0b10, 0b01]);
        // Bits above `k` are ignored
        let mut other = rate_two_thirds_encoder();
        assert_eq!(other.encode_sequence(&[0b101, 0b110]), [0b011, 0b011]);
    }

    #[test]
    fn test_encode_no_step_replay() {
        let mut encoder = rate_two_thirds_encoder();
        for &in_symbol in &[0b01, 0b11, 0b10, 0b00, 0b11] {
            let first = encoder.encode(in_symbol, false);
            let registers = encoder.registers().clone();
            assert_eq!(encoder.encode(in_symbol, true), first);
            assert_eq!(encoder.registers(), &registers);
        }
    }

    #[test]
    fn test_encode_no_step_alternate_hypothesis() {
        let mut encoder = rate_half_encoder();
        encoder.encode(1, false);
        encoder.encode(0, false);
        // Replace the last input `0` by `1`: same as encoding 1, 1
        let replaced = encoder.encode(1, true);
        let mut reference = rate_half_encoder();
        assert_eq!(reference.encode_sequence(&[1, 1]).last(), Some(&replaced));
        assert_eq!(encoder.registers(), reference.registers());
    }

    #[test]
    fn test_encode_register_width_overflow() {
        let widths = Widths {
            symbol_bits: 8,
            register_bits: 4,
        };
        let mut encoder = Encoder::new(1, &[4], &[vec![0b1111, 0b1000]], widths).unwrap();
        let out_symbols = encoder.encode_sequence(&[1, 1, 1, 1, 1, 0]);
        assert_eq!(encoder.registers().as_slice(), [0b1110]);
        assert_eq!(out_symbols, [0b01, 0b00, 0b01, 0b10, 0b10, 0b11]);
    }

    #[test]
    fn test_encode_sequence() {
        let mut encoder = rate_half_encoder();
        assert!(encoder.encode_sequence(&[]).is_empty());
        assert_eq!(encoder.encode_sequence(&[1, 0, 1, 1]), [3, 1, 0, 2]);
        // Registers are cleared before each sequence
        assert_eq!(encoder.encode_sequence(&[1, 0, 1, 1]), [3, 1, 0, 2]);
    }

    #[test]
    fn test_registers_fork_and_restore() {
        let mut encoder = rate_two_thirds_encoder();
        let prefix = [0b01, 0b11, 0b10];
        let suffix = [0b11, 0b00, 0b01, 0b10];
        encoder.encode_sequence(&prefix);
        let snapshot = encoder.registers().clone();
        let first_run: Vec<u64> = suffix.iter().map(|&s| encoder.encode(s, false)).collect();
        // Diverge, then rewind
        encoder.encode(0b11, false);
        encoder.encode(0b11, false);
        encoder.set_registers(&snapshot);
        assert_eq!(encoder.registers(), &snapshot);
        let second_run: Vec<u64> = suffix.iter().map(|&s| encoder.encode(s, false)).collect();
        assert_eq!(first_run, second_run);
    }

    #[test]
    #[should_panic(expected = "wrong number of registers")]
    fn test_set_registers_wrong_size() {
        let snapshot = rate_half_encoder().registers().clone();
        rate_two_thirds_encoder().set_registers(&snapshot);
    }

    #[test]
    fn test_display() {
        let encoder = rate_two_thirds_encoder();
        assert_eq!(
            encoder.to_string(),
            "k=2, n=3, m=3\n0 (3) : 5 3 6\n1 (2) : 3 2 1\n"
        );
    }
}
