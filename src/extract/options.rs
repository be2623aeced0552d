//! Reconstruction options and configuration.

/// Options for rebuilding a document from its blocks.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Reconstruct tables and form fields on the rayon pool
    pub parallel: bool,

    /// Run the amount/date/vendor heuristics over the full text
    pub extract_heuristics: bool,

    /// Normalize extracted text to Unicode NFC
    pub normalize_unicode: bool,
}

impl ExtractOptions {
    /// Create new extract options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable parallel reconstruction.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel reconstruction.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Enable or disable heuristic field extraction.
    pub fn with_heuristics(mut self, extract: bool) -> Self {
        self.extract_heuristics = extract;
        self
    }

    /// Skip heuristic field extraction.
    pub fn without_heuristics(mut self) -> Self {
        self.extract_heuristics = false;
        self
    }

    /// Enable or disable NFC normalization of extracted text.
    pub fn with_unicode_normalization(mut self, normalize: bool) -> Self {
        self.normalize_unicode = normalize;
        self
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            parallel: true,
            extract_heuristics: true,
            normalize_unicode: false,
        }
    }
}
