/// Configuration options for report conversion.
///
/// The defaults describe the MetaTrader optimization report layout and the
/// spreadsheet look downstream consumers expect; most callers never change
/// them.
///
/// # Examples
///
/// ```rust
/// use optreport::ConvertOptions;
///
/// // Create with defaults
/// let options = ConvertOptions::default();
/// assert_eq!(options.table_index, 1);
///
/// // Or customize
/// let options = ConvertOptions::new()
///     .with_table_index(2)
///     .with_parallel(true);
/// assert!(options.parallel);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertOptions {
    /// Zero-based position, in document order, of the table holding results
    pub table_index: usize,
    /// Minimum number of `td` cells a result row must have
    pub min_cells: usize,
    /// Name of the single worksheet
    pub sheet_name: String,
    /// Header fill color as ARGB hex
    pub header_fill: String,
    /// Header font color as ARGB hex
    pub header_font_color: String,
    /// Width cap for every column except Detail
    pub max_width: usize,
    /// Width cap for the Detail column
    pub max_detail_width: usize,
    /// Characters added to the widest value of a column
    pub width_margin: usize,
    /// File extensions (without dot, lowercase) picked up in batch mode
    pub extensions: Vec<String>,
    /// Convert documents of a batch concurrently
    pub parallel: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            table_index: 1,
            min_cells: 7,
            sheet_name: "Optimization Results".to_string(),
            header_fill: "FF366092".to_string(),
            header_font_color: "FFFFFFFF".to_string(),
            max_width: 30,
            max_detail_width: 80,
            width_margin: 2,
            extensions: vec!["htm".to_string(), "html".to_string()],
            parallel: false,
        }
    }
}

impl ConvertOptions {
    /// Create a new `ConvertOptions` with default values.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set which table (zero-based, document order) holds the results.
    #[inline]
    pub fn with_table_index(mut self, index: usize) -> Self {
        self.table_index = index;
        self
    }

    /// Set the minimum number of cells a result row must have.
    ///
    /// Values below 7 are raised to 7 during extraction, since the first
    /// seven cells are always read.
    #[inline]
    pub fn with_min_cells(mut self, min_cells: usize) -> Self {
        self.min_cells = min_cells;
        self
    }

    /// Set the worksheet name.
    ///
    /// Excel limits sheet names to 31 characters and forbids `[]:*?/\`; the
    /// writer sanitizes the name accordingly.
    #[inline]
    pub fn with_sheet_name(mut self, name: impl Into<String>) -> Self {
        self.sheet_name = name.into();
        self
    }

    /// Set the header fill color (ARGB hex, e.g. `"FF366092"`).
    #[inline]
    pub fn with_header_fill(mut self, argb: impl Into<String>) -> Self {
        self.header_fill = argb.into();
        self
    }

    /// Set the width caps for regular columns and for the Detail column.
    #[inline]
    pub fn with_width_caps(mut self, max_width: usize, max_detail_width: usize) -> Self {
        self.max_width = max_width;
        self.max_detail_width = max_detail_width;
        self
    }

    /// Set the file extensions picked up when converting a folder.
    #[inline]
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions
            .into_iter()
            .map(|ext| {
                let ext: String = ext.into();
                ext.trim_start_matches('.').to_ascii_lowercase()
            })
            .collect();
        self
    }

    /// Convert documents of a batch concurrently on the rayon pool.
    #[inline]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}
