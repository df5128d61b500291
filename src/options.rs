//! Pipeline configuration.
//!
//! Thresholds that used to live as implicit constants are exposed here as an
//! explicit options object passed into each invocation; there is no shared
//! process-wide state.

/// Options for one extraction invocation.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Fraction of the page height treated as the header zone (PDF only).
    pub header_zone: f32,

    /// Fraction of the page height treated as the footer zone (PDF only).
    pub footer_zone: f32,

    /// Minimum number of distinct pages/sections a normalized line must
    /// recur on to count as boilerplate.
    pub repeat_threshold: usize,

    /// PDF table detection tuning.
    pub table_detect: TableDetectConfig,
}

impl ExtractOptions {
    /// Create options with the documented defaults (8% zones, 3 repeats).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the header zone fraction.
    pub fn with_header_zone(mut self, fraction: f32) -> Self {
        self.header_zone = fraction;
        self
    }

    /// Set the footer zone fraction.
    pub fn with_footer_zone(mut self, fraction: f32) -> Self {
        self.footer_zone = fraction;
        self
    }

    /// Set both boundary zones to the same fraction.
    pub fn with_boundary_zones(mut self, fraction: f32) -> Self {
        self.header_zone = fraction;
        self.footer_zone = fraction;
        self
    }

    /// Set the boilerplate repetition threshold.
    pub fn with_repeat_threshold(mut self, count: usize) -> Self {
        self.repeat_threshold = count;
        self
    }

    /// Set PDF table detection tuning.
    pub fn with_table_detect(mut self, config: TableDetectConfig) -> Self {
        self.table_detect = config;
        self
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            header_zone: 0.08,
            footer_zone: 0.08,
            repeat_threshold: 3,
            table_detect: TableDetectConfig::default(),
        }
    }
}

/// PDF table detection configuration.
///
/// Tables are found by column-alignment analysis over text positions, so
/// these knobs trade recall against false positives on columnar prose.
#[derive(Debug, Clone)]
pub struct TableDetectConfig {
    /// Minimum consecutive aligned rows to call a region a table.
    pub min_rows: usize,

    /// Minimum columns a row must split into to be a table candidate.
    pub min_columns: usize,

    /// Above this column count the split is likely word-level noise.
    pub max_columns: usize,

    /// Minimum horizontal gap (points) separating two cells on a line.
    pub min_column_gap: f32,

    /// Tolerance (points) when matching column starts across rows.
    pub column_tolerance: f32,
}

impl Default for TableDetectConfig {
    fn default() -> Self {
        Self {
            min_rows: 2,
            min_columns: 2,
            max_columns: 8,
            min_column_gap: 15.0,
            column_tolerance: 5.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_documented_defaults() {
        let options = ExtractOptions::default();
        assert_eq!(options.header_zone, 0.08);
        assert_eq!(options.footer_zone, 0.08);
        assert_eq!(options.repeat_threshold, 3);
    }

    #[test]
    fn test_builder() {
        let options = ExtractOptions::new()
            .with_boundary_zones(0.12)
            .with_repeat_threshold(2);
        assert_eq!(options.header_zone, 0.12);
        assert_eq!(options.footer_zone, 0.12);
        assert_eq!(options.repeat_threshold, 2);
    }
}
