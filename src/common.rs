//! Types needed in multiple modules

/// Reason why an encoder could not be constructed
#[derive(thiserror::Error, Clone, Eq, PartialEq, Debug)]
pub enum ConfigurationError {
    /// Zero inputs requested
    #[error("Number of inputs must be at least 1")]
    NoInputs,
    /// Number of constraint lengths differs from number of inputs
    #[error("Expected {expected} constraint lengths (one per input), found {found}")]
    InputCountMismatch {
        /// Number of inputs
        expected: usize,
        /// Number of constraint lengths supplied
        found: usize,
    },
    /// Number of inputs does not fit in an I/O symbol
    #[error("Number of inputs {k} not supported by {symbol_bits}-bit symbols")]
    TooManyInputs {
        /// Number of inputs
        k: usize,
        /// Symbol width in bits
        symbol_bits: u32,
    },
    /// Number of generator polynomial vectors differs from number of inputs
    #[error("Expected {expected} generator polynomial vectors (one per input), found {found}")]
    GeneratorCountMismatch {
        /// Number of inputs
        expected: usize,
        /// Number of generator polynomial vectors supplied
        found: usize,
    },
    /// A constraint length exceeds the register width
    #[error("Constraint length {length} of input {input} exceeds register width of {register_bits} bits")]
    ConstraintTooLong {
        /// Index of offending input
        input: usize,
        /// Its constraint length
        length: u32,
        /// Register width in bits
        register_bits: u32,
    },
    /// Number of outputs not larger than number of inputs
    #[error("Number of outputs ({n}) must be larger than number of inputs ({k})")]
    TooFewOutputs {
        /// Number of outputs
        n: usize,
        /// Number of inputs
        k: usize,
    },
    /// Number of outputs does not fit in an I/O symbol
    #[error("Number of outputs {n} not supported by {symbol_bits}-bit symbols")]
    TooManyOutputs {
        /// Number of outputs
        n: usize,
        /// Symbol width in bits
        symbol_bits: u32,
    },
    /// Symbol or register width outside `[1, 64]`
    #[error("Invalid {name} width of {bits} bits (expected 1 to 64)")]
    InvalidWidth {
        /// Which width
        name: &'static str,
        /// Width supplied
        bits: u32,
    },
}

/// Custom error type
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Encoder configuration error
    #[error("{0}")]
    Configuration(#[from] ConfigurationError),
    /// Invalid input error
    #[error("{0}")]
    InvalidInput(String),
    /// File read/write error
    #[error("{0}")]
    FileReadWriteError(#[from] std::io::Error),
    /// Serde read/write error
    #[error("{0}")]
    SerdeReadWriteError(#[from] serde_json::Error),
}
