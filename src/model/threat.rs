//! Pitch-threat (xT) lookup grid.
//!
//! A static table valuing ball possession in each zone of the pitch. The
//! value of a movement action (pass, carry, dribble) is the threat of the
//! zone it ends in minus the threat of the zone it started in. Moving
//! the ball toward the box gains threat, recycling it backward loses
//! some.
//!
//! The table is literal constant data: built once at startup, never
//! mutated, never learned. Out-of-range zone lookups are an error
//! surfaced to the caller; a silent default here would mask a
//! coordinate-mapping bug upstream.

use serde::Serialize;
use thiserror::Error;

use crate::data::models::PitchZone;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ThreatGridError {
    #[error("zone ({row}, {col}) is outside the {rows}x{cols} threat grid")]
    OutOfRange {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },
    #[error("invalid threat table: {0}")]
    InvalidTable(String),
}

/// Reference threat surface, 8 lateral bands x 12 longitudinal bands.
/// Rows run flank to flank (row 0 nearest y = 0), columns from own goal
/// (col 0) to the attacking goal (col 11). Values rise toward the
/// attacking end and the central corridor; the two halves mirror.
const DEFAULT_THREAT_TABLE: [[f64; 12]; 8] = [
    [0.002, 0.003, 0.004, 0.006, 0.008, 0.011, 0.015, 0.020, 0.027, 0.034, 0.040, 0.048],
    [0.003, 0.004, 0.006, 0.008, 0.011, 0.015, 0.020, 0.027, 0.036, 0.048, 0.062, 0.076],
    [0.004, 0.006, 0.008, 0.011, 0.015, 0.020, 0.028, 0.038, 0.052, 0.072, 0.102, 0.138],
    [0.005, 0.007, 0.009, 0.012, 0.017, 0.023, 0.032, 0.044, 0.062, 0.090, 0.140, 0.250],
    [0.005, 0.007, 0.009, 0.012, 0.017, 0.023, 0.032, 0.044, 0.062, 0.090, 0.140, 0.250],
    [0.004, 0.006, 0.008, 0.011, 0.015, 0.020, 0.028, 0.038, 0.052, 0.072, 0.102, 0.138],
    [0.003, 0.004, 0.006, 0.008, 0.011, 0.015, 0.020, 0.027, 0.036, 0.048, 0.062, 0.076],
    [0.002, 0.003, 0.004, 0.006, 0.008, 0.011, 0.015, 0.020, 0.027, 0.034, 0.040, 0.048],
];

/// Immutable 2D threat table. Row-major storage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThreatGrid {
    values: Vec<f64>,
    rows: usize,
    cols: usize,
}

impl Default for ThreatGrid {
    fn default() -> Self {
        ThreatGrid::from_rows(DEFAULT_THREAT_TABLE.iter().map(|r| r.to_vec()).collect())
            .expect("reference threat table is well-formed")
    }
}

impl ThreatGrid {
    /// Build a grid from row-major table data. Rejects empty, ragged, or
    /// negative tables; grid values are threat mass, not deltas.
    pub fn from_rows(table: Vec<Vec<f64>>) -> Result<Self, ThreatGridError> {
        let rows = table.len();
        if rows == 0 {
            return Err(ThreatGridError::InvalidTable("table has no rows".into()));
        }
        let cols = table[0].len();
        if cols == 0 {
            return Err(ThreatGridError::InvalidTable("table has no columns".into()));
        }
        let mut values = Vec::with_capacity(rows * cols);
        for (i, row) in table.iter().enumerate() {
            if row.len() != cols {
                return Err(ThreatGridError::InvalidTable(format!(
                    "row {} has {} columns, expected {}",
                    i,
                    row.len(),
                    cols
                )));
            }
            for (j, &v) in row.iter().enumerate() {
                if !v.is_finite() || v < 0.0 {
                    return Err(ThreatGridError::InvalidTable(format!(
                        "value at ({}, {}) is {}; threat values must be finite and non-negative",
                        i, j, v
                    )));
                }
                values.push(v);
            }
        }
        Ok(ThreatGrid { values, rows, cols })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Threat value of a single zone. Errors on out-of-range indices.
    pub fn threat_at(&self, row: usize, col: usize) -> Result<f64, ThreatGridError> {
        if row >= self.rows || col >= self.cols {
            return Err(ThreatGridError::OutOfRange {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(self.values[row * self.cols + col])
    }

    /// Threat gained (or lost) by moving the ball from `start` to `end`.
    pub fn threat_delta(&self, start: PitchZone, end: PitchZone) -> Result<f64, ThreatGridError> {
        let from = self.threat_at(start.row, start.col)?;
        let to = self.threat_at(end.row, end.col)?;
        Ok(to - from)
    }

    /// The full table, row-major, for the dashboard heatmap.
    pub fn table(&self) -> Vec<Vec<f64>> {
        self.values.chunks(self.cols).map(|c| c.to_vec()).collect()
    }
}
