//! Batch encoding of random blocks of input symbols

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::{utils, CodeDefinition, Error};

/// Parameters for a batch of encoded blocks
#[derive(Clone, Eq, PartialEq, Debug, Copy, Deserialize, Serialize)]
pub struct BatchParams {
    /// Number of input symbols per block
    pub num_symbols_per_block: u32,
    /// Number of blocks to be encoded
    pub num_blocks: u32,
}

/// Input and output symbols of one block, encoded from cleared registers
#[derive(Clone, Eq, PartialEq, Debug, Deserialize, Serialize)]
pub struct BlockResult {
    /// Input symbols (`k` bits each)
    pub in_symbols: Vec<u64>,
    /// Output symbols (`n` bits each)
    pub out_symbols: Vec<u64>,
}

/// Results of a batch
#[derive(Clone, Eq, PartialEq, Debug, Deserialize, Serialize)]
pub struct BatchResults {
    /// Code used
    pub code: CodeDefinition,
    /// Batch parameters
    pub params: BatchParams,
    /// Block results, in block order
    pub blocks: Vec<BlockResult>,
}

impl BatchResults {
    /// Saves results to a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or written.
    pub fn save<P: AsRef<Path>>(&self, json_filename: P) -> Result<(), Error> {
        let writer = BufWriter::new(File::create(json_filename.as_ref())?);
        serde_json::to_writer_pretty(writer, self)?;
        tracing::info!(
            file = %json_filename.as_ref().display(),
            num_blocks = self.blocks.len(),
            "Saved batch results"
        );
        Ok(())
    }
}

/// Encodes random blocks of input symbols.
///
/// Each block is encoded from cleared registers on its own copy of the encoder, so blocks are
/// processed in parallel.
///
/// # Parameters
///
/// - `code`: Definition of the code to use.
///
/// - `params`: Batch parameters.
///
/// # Errors
///
/// Returns an error if `params` is invalid (see [`check_batch_params`]) or if `code` is not a
/// valid encoder configuration.
///
/// # Examples
///
/// ```
/// use convcode::{batch, CodeDefinition};
///
/// let params = batch::BatchParams {
///     num_symbols_per_block: 16,
///     num_blocks: 4,
/// };
/// let results = batch::run_encoding_batch(&CodeDefinition::default(), &params)?;
/// assert_eq!(results.blocks.len(), 4);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn run_encoding_batch(
    code: &CodeDefinition,
    params: &BatchParams,
) -> Result<BatchResults, Error> {
    check_batch_params(params)?;
    let encoder = code.encoder()?;
    tracing::info!(
        k = encoder.k(),
        n = encoder.n(),
        m = encoder.m(),
        num_blocks = params.num_blocks,
        num_symbols_per_block = params.num_symbols_per_block,
        "Starting batch"
    );
    let num_symbols = usize::try_from(params.num_symbols_per_block)
        .map_err(|e| Error::InvalidInput(e.to_string()))?;
    let blocks: Vec<BlockResult> = (0 .. params.num_blocks)
        .into_par_iter()
        .map_with(encoder, |encoder, block_index| {
            let in_symbols = utils::random_symbols(num_symbols, encoder.k());
            let out_symbols = encoder.encode_sequence(&in_symbols);
            tracing::debug!(block_index, "Encoded block");
            BlockResult {
                in_symbols,
                out_symbols,
            }
        })
        .collect();
    tracing::info!(num_blocks = blocks.len(), "Finished batch");
    Ok(BatchResults {
        code: code.clone(),
        params: *params,
        blocks,
    })
}

/// Checks validity of batch parameters.
///
/// # Errors
///
/// Returns an error if the number of symbols per block or the number of blocks is zero.
pub fn check_batch_params(params: &BatchParams) -> Result<(), Error> {
    if params.num_symbols_per_block == 0 {
        return Err(Error::InvalidInput(
            "Number of symbols per block cannot be zero".to_string(),
        ));
    }
    if params.num_blocks == 0 {
        return Err(Error::InvalidInput(
            "Number of blocks cannot be zero".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests_of_functions {
    use super::*;
    use crate::Widths;

    fn params() -> BatchParams {
        BatchParams {
            num_symbols_per_block: 20,
            num_blocks: 8,
        }
    }

    #[test]
    fn test_check_batch_params() {
        assert!(check_batch_params(&params()).is_ok());
        let mut bad = params();
        bad.num_symbols_per_block = 0;
        assert!(check_batch_params(&bad).is_err());
        let mut bad = params();
        bad.num_blocks = 0;
        assert!(check_batch_params(&bad).is_err());
    }

    #[test]
    fn test_run_encoding_batch() {
        let code = CodeDefinition {
            constraint_lengths: vec![3, 2],
            generator_polynomials: vec![vec![0b101, 0b011, 0b110], vec![0b11, 0b10, 0b01]],
            widths: Widths::default(),
        };
        let results = run_encoding_batch(&code, &params()).unwrap();
        assert_eq!(results.code, code);
        assert_eq!(results.params, params());
        assert_eq!(results.blocks.len(), 8);
        let mut encoder = code.encoder().unwrap();
        for block in &results.blocks {
            assert_eq!(block.in_symbols.len(), 20);
            assert!(block.in_symbols.iter().all(|&s| s < 4));
            assert!(block.out_symbols.iter().all(|&s| s < 8));
            assert_eq!(encoder.encode_sequence(&block.in_symbols), block.out_symbols);
        }
    }

    #[test]
    fn test_run_encoding_batch_errors() {
        let mut bad = params();
        bad.num_blocks = 0;
        assert!(matches!(
            run_encoding_batch(&CodeDefinition::default(), &bad),
            Err(Error::InvalidInput(_))
        ));
        let code = CodeDefinition {
            constraint_lengths: vec![3],
            generator_polynomials: vec![vec![0b111]],
            widths: Widths::default(),
        };
        assert!(matches!(
            run_encoding_batch(&code, &params()),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn test_save() {
        let path = std::env::temp_dir().join(format!("convcode_batch_{}.json", std::process::id()));
        let results = run_encoding_batch(&CodeDefinition::default(), &params()).unwrap();
        results.save(&path).unwrap();
        let file = File::open(&path).unwrap();
        let read_back: BatchResults = serde_json::from_reader(file).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(read_back, results);
    }
}
