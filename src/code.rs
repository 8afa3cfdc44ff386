//! Serializable definition of a convolutional code

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use crate::{Encoder, Error, Widths};

/// Definition of a convolutional code, from which an encoder can be built
#[derive(Clone, Eq, PartialEq, Debug, Deserialize, Serialize)]
pub struct CodeDefinition {
    /// Register length for each input (the number of elements is the number of inputs `k`)
    pub constraint_lengths: Vec<u32>,
    /// Generator polynomials for each input, one per output bit
    pub generator_polynomials: Vec<Vec<u64>>,
    /// Widths of I/O symbols and registers
    #[serde(default)]
    pub widths: Widths,
}

impl Default for CodeDefinition {
    /// Returns definition of the rate-1/2 code of constraint length 3 with generator polynomials
    /// `0b111` and `0b101`.
    fn default() -> Self {
        Self {
            constraint_lengths: vec![3],
            generator_polynomials: vec![vec![0b111, 0b101]],
            widths: Widths::default(),
        }
    }
}

impl CodeDefinition {
    /// Returns number of inputs.
    #[must_use]
    pub fn k(&self) -> usize {
        self.constraint_lengths.len()
    }

    /// Returns encoder for this code, with cleared registers.
    ///
    /// # Errors
    ///
    /// Returns an error if the definition is not a valid encoder configuration (see
    /// [`Encoder::new`]).
    ///
    /// # Examples
    ///
    /// ```
    /// use convcode::CodeDefinition;
    ///
    /// let mut encoder = CodeDefinition::default().encoder()?;
    /// assert_eq!(encoder.encode_sequence(&[1, 0, 1, 1]), [3, 1, 0, 2]);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn encoder(&self) -> Result<Encoder, Error> {
        Encoder::new(
            self.k(),
            &self.constraint_lengths,
            &self.generator_polynomials,
            self.widths,
        )
    }

    /// Reads code definition from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or does not hold a code definition.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let reader = BufReader::new(File::open(path.as_ref())?);
        let code: Self = serde_json::from_reader(reader)?;
        tracing::debug!(path = %path.as_ref().display(), k = code.k(), "Read code definition");
        Ok(code)
    }

    /// Writes code definition to a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or written.
    pub fn to_json_file<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }
}

impl From<&Encoder> for CodeDefinition {
    fn from(encoder: &Encoder) -> Self {
        Self {
            constraint_lengths: encoder.constraint_lengths().to_vec(),
            generator_polynomials: encoder.generator_polynomials().to_vec(),
            widths: encoder.widths(),
        }
    }
}
