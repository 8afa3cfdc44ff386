//! Matrix of soft-decision reliability values for each symbol value at each message position
//!
//! Rows correspond to symbol values and columns to message positions. Values are stored
//! column-major (`col * nb_symbols + row`), so that each message position occupies a contiguous
//! slice.

use std::ops::Index;

/// Reliability matrix of `2^nb_symbols_log2` rows and `message_length` columns
#[derive(PartialEq, Debug)]
pub struct ReliabilityMatrix {
    /// Base-2 logarithm of the number of rows
    nb_symbols_log2: u32,
    /// Number of rows (symbol values)
    nb_symbols: usize,
    /// Number of columns (message positions)
    message_length: usize,
    /// Column that the next unindexed write goes to
    message_symbol_count: usize,
    /// Values, column-major
    matrix: Vec<f32>,
}

impl ReliabilityMatrix {
    /// Returns all-zero reliability matrix of given dimensions.
    ///
    /// # Parameters
    ///
    /// - `nb_symbols_log2`: Number of bits per symbol; the matrix has `2^nb_symbols_log2` rows.
    ///
    /// - `message_length`: Number of symbols in the message (number of columns).
    ///
    /// # Panics
    ///
    /// Panics if `2^nb_symbols_log2` or the total number of values does not fit in a `usize`.
    ///
    /// # Examples
    ///
    /// ```
    /// use convcode::ReliabilityMatrix;
    ///
    /// let relmat = ReliabilityMatrix::new(2, 10);
    /// assert_eq!(relmat.nb_symbols(), 4);
    /// assert_eq!(relmat.message_length(), 10);
    /// ```
    #[must_use]
    pub fn new(nb_symbols_log2: u32, message_length: usize) -> Self {
        let nb_symbols = 1usize
            .checked_shl(nb_symbols_log2)
            .unwrap_or_else(|| panic!("Number of rows 2^{nb_symbols_log2} overflows usize"));
        let size = nb_symbols
            .checked_mul(message_length)
            .unwrap_or_else(|| panic!("Matrix of {nb_symbols} x {message_length} overflows usize"));
        Self {
            nb_symbols_log2,
            nb_symbols,
            message_length,
            message_symbol_count: 0,
            matrix: vec![0.0; size],
        }
    }

    /// Returns base-2 logarithm of the number of rows.
    #[must_use]
    pub fn nb_symbols_log2(&self) -> u32 {
        self.nb_symbols_log2
    }

    /// Returns number of rows.
    #[must_use]
    pub fn nb_symbols(&self) -> usize {
        self.nb_symbols
    }

    /// Returns number of columns.
    #[must_use]
    pub fn message_length(&self) -> usize {
        self.message_length
    }

    /// Returns number of columns entered so far without an explicit index.
    #[must_use]
    pub fn message_symbol_count(&self) -> usize {
        self.message_symbol_count
    }

    /// Returns value at given row and column.
    ///
    /// # Panics
    ///
    /// Panics if `row` or `col` is out of range.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self[(row, col)]
    }

    /// Returns all values of given column.
    ///
    /// # Panics
    ///
    /// Panics if `col` is out of range.
    #[must_use]
    pub fn column(&self, col: usize) -> &[f32] {
        &self.matrix[col * self.nb_symbols .. (col + 1) * self.nb_symbols]
    }

    /// Returns underlying column-major buffer.
    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.matrix
    }

    /// Enters reliability values for the next message position, if any is left.
    ///
    /// # Parameters
    ///
    /// - `symbol_data`: One value per symbol value. Missing values are taken as `0.0`, and extra
    ///   values are ignored.
    pub fn enter_symbol_data(&mut self, symbol_data: &[f32]) {
        if self.message_symbol_count < self.message_length {
            self.write_column(self.message_symbol_count, symbol_data);
            self.message_symbol_count += 1;
        }
    }

    /// Enters reliability values for given message position, if it is in range. The position of
    /// the next unindexed write is not affected.
    pub fn enter_symbol_data_at(&mut self, message_symbol_index: usize, symbol_data: &[f32]) {
        if message_symbol_index < self.message_length {
            self.write_column(message_symbol_index, symbol_data);
        }
    }

    /// Enters an erasure (all zeros) for the next message position, if any is left.
    pub fn enter_erasure(&mut self) {
        if self.message_symbol_count < self.message_length {
            self.write_column(self.message_symbol_count, &[]);
            self.message_symbol_count += 1;
        }
    }

    /// Enters an erasure (all zeros) for given message position, if it is in range. The position
    /// of the next unindexed write is not affected.
    pub fn enter_erasure_at(&mut self, message_symbol_index: usize) {
        if message_symbol_index < self.message_length {
            self.write_column(message_symbol_index, &[]);
        }
    }

    /// Normalizes each column so that its values sum to one. Columns summing to zero are left
    /// unchanged.
    ///
    /// Each column is divided by its sum one step after that sum has been computed, the last
    /// column being divided in an extra step.
    ///
    /// # Examples
    ///
    /// ```
    /// use convcode::ReliabilityMatrix;
    ///
    /// let mut relmat = ReliabilityMatrix::new(1, 2);
    /// relmat.enter_symbol_data(&[1.0, 3.0]);
    /// relmat.enter_erasure();
    /// relmat.normalize();
    /// assert_eq!(relmat.column(0), [0.25, 0.75]);
    /// assert_eq!(relmat.column(1), [0.0, 0.0]);
    /// ```
    pub fn normalize(&mut self) {
        let mut col_sum = 0f32;
        for ic in 0 ..= self.message_length {
            let last_col_sum = col_sum;
            col_sum = 0.0;
            for ir in 0 .. self.nb_symbols {
                if ic < self.message_length {
                    col_sum += self.matrix[ic * self.nb_symbols + ir];
                }
                if ic > 0 && last_col_sum != 0.0 {
                    self.matrix[(ic - 1) * self.nb_symbols + ir] /= last_col_sum;
                }
            }
        }
    }

    /// Returns largest value in the matrix, along with its row and column.
    ///
    /// Columns are scanned in increasing order, and rows in increasing order within a column.
    /// Among equal maxima, the last one scanned is returned. If no value is positive (for
    /// instance, an all-zero or empty matrix), then `(0.0, 0, 0)` is returned.
    ///
    /// # Returns
    ///
    /// - `(max, row, col)`: Largest value, its row, and its column.
    ///
    /// # Examples
    ///
    /// ```
    /// use convcode::ReliabilityMatrix;
    ///
    /// let mut relmat = ReliabilityMatrix::new(1, 3);
    /// relmat.enter_symbol_data(&[0.1, 0.9]);
    /// relmat.enter_symbol_data(&[0.7, 0.3]);
    /// relmat.enter_symbol_data(&[0.9, 0.1]);
    /// assert_eq!(relmat.find_max(), (0.9, 0, 2));
    /// ```
    #[must_use]
    pub fn find_max(&self) -> (f32, usize, usize) {
        let mut max = 0f32;
        let mut i_row = 0;
        let mut i_col = 0;
        for (ic, column) in self.columns().enumerate() {
            for (ir, &value) in column.iter().enumerate() {
                if value >= max {
                    max = value;
                    i_row = ir;
                    i_col = ic;
                }
            }
        }
        if max > 0.0 {
            (max, i_row, i_col)
        } else {
            (0.0, 0, 0)
        }
    }

    /// Returns largest value in a column that is strictly less than a given bound, along with its
    /// row.
    ///
    /// Among equal maxima, the one in the highest row is returned, zeros included. If no
    /// nonnegative value is below the bound, or if `col` is out of range, then `(0.0, 0)` is
    /// returned. Calling again with the value just returned as bound enumerates the column in
    /// decreasing order.
    ///
    /// # Parameters
    ///
    /// - `col`: Column to search.
    ///
    /// - `prev_max`: Exclusive upper bound on the value to be found.
    ///
    /// # Examples
    ///
    /// ```
    /// use convcode::ReliabilityMatrix;
    ///
    /// let mut relmat = ReliabilityMatrix::new(2, 1);
    /// relmat.enter_symbol_data(&[0.2, 0.5, 0.1, 0.2]);
    /// assert_eq!(relmat.find_max_in_col(0, f32::INFINITY), (0.5, 1));
    /// assert_eq!(relmat.find_max_in_col(0, 0.5), (0.2, 3));
    /// assert_eq!(relmat.find_max_in_col(0, 0.2), (0.1, 2));
    /// ```
    #[must_use]
    pub fn find_max_in_col(&self, col: usize, prev_max: f32) -> (f32, usize) {
        let mut max = 0f32;
        let mut i_row = 0;
        if col < self.message_length {
            for (ir, &value) in self.column(col).iter().enumerate() {
                if value >= max && value < prev_max {
                    max = value;
                    i_row = ir;
                }
            }
        }
        (max, i_row)
    }

    /// Reorders columns to undo a bit-reversal interleaving of message positions.
    ///
    /// With `w` the number of bits needed to index all columns, column `r(i)` is moved to the
    /// next free position for `i = 0, 1, ..., 2^w - 1`, where `r(i)` is `i` with its `w` bits
    /// reversed, skipping any `r(i)` that is not a valid column.
    ///
    /// # Examples
    ///
    /// ```
    /// use convcode::ReliabilityMatrix;
    ///
    /// let mut relmat = ReliabilityMatrix::new(0, 4);
    /// for value in [0.0, 2.0, 1.0, 3.0] {
    ///     relmat.enter_symbol_data(&[value]);
    /// }
    /// relmat.deinterleave();
    /// assert_eq!(relmat.as_slice(), [0.0, 1.0, 2.0, 3.0]);
    /// ```
    pub fn deinterleave(&mut self) {
        let index_size = index_width(self.message_length);
        let mut deinterleaved = Vec::with_capacity(self.matrix.len());
        for new_index in (0 .. 1usize << index_size)
            .map(|i| bit_reversal(i, index_size))
            .filter(|&new_index| new_index < self.message_length)
        {
            deinterleaved.extend_from_slice(self.column(new_index));
        }
        self.matrix = deinterleaved;
    }

    /// Returns iterator over the columns.
    fn columns(&self) -> impl Iterator<Item = &[f32]> {
        self.matrix.chunks_exact(self.nb_symbols)
    }

    /// Overwrites a column with given values, padded with zeros.
    fn write_column(&mut self, col: usize, symbol_data: &[f32]) {
        let nb_symbols = self.nb_symbols;
        let column = &mut self.matrix[col * nb_symbols .. (col + 1) * nb_symbols];
        column.fill(0.0);
        let len = symbol_data.len().min(nb_symbols);
        column[.. len].copy_from_slice(&symbol_data[.. len]);
    }
}

impl Clone for ReliabilityMatrix {
    /// Returns a deep copy of the values, with the position of the next unindexed write reset to
    /// the first column.
    fn clone(&self) -> Self {
        Self {
            nb_symbols_log2: self.nb_symbols_log2,
            nb_symbols: self.nb_symbols,
            message_length: self.message_length,
            message_symbol_count: 0,
            matrix: self.matrix.clone(),
        }
    }
}

impl Index<(usize, usize)> for ReliabilityMatrix {
    type Output = f32;

    fn index(&self, (row, col): (usize, usize)) -> &f32 {
        assert!(
            row < self.nb_symbols && col < self.message_length,
            "Index ({row}, {col}) out of range"
        );
        &self.matrix[col * self.nb_symbols + row]
    }
}

impl std::fmt::Display for ReliabilityMatrix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for ir in 0 .. self.nb_symbols {
            for ic in 0 .. self.message_length {
                if ic > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{:8.6}", self[(ir, ic)])?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Returns number of bits needed to represent all indices less than given length.
fn index_width(length: usize) -> u32 {
    match length {
        0 | 1 => 0,
        _ => usize::BITS - (length - 1).leading_zeros(),
    }
}

/// Returns given index with its lowest `width` bits reversed.
fn bit_reversal(index: usize, width: u32) -> usize {
    if width == 0 {
        0
    } else {
        index.reverse_bits() >> (usize::BITS - width)
    }
}
