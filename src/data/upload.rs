//! Uploaded match-data ingestion.
//!
//! The upload contract is a CSV with columns `x`, `y`, `event_type`
//! (`shot` or `pass`) and either `xg` or `xT` depending on the event
//! type. Rows that carry a score keep it; rows that don't get one from
//! the model (estimator for shots, grid lookup for passes). Malformed or
//! unrecognized rows are skipped and counted; one bad row never fails
//! the upload.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::data::models::{AssistType, EventKind, ScoredEvent, Shot, ShotType};
use crate::model::{ShotModel, ThreatGrid};
use crate::pitch::Pitch;

/// Raw CSV row. The score columns are optional; non-finite values are
/// treated as missing.
#[derive(Debug, Deserialize)]
struct EventRow {
    x: f64,
    y: f64,
    event_type: String,
    #[serde(default)]
    xg: Option<f64>,
    #[serde(default, rename = "xT", alias = "xt")]
    xt: Option<f64>,
}

/// Result of parsing one uploaded file.
#[derive(Debug, Clone, Serialize)]
pub struct ParsedUpload {
    pub events: Vec<ScoredEvent>,
    /// Total data rows seen, including skipped ones
    pub rows: usize,
    /// Rows dropped as malformed or unrecognized
    pub skipped: usize,
}

/// Parse an uploaded CSV and resolve a score for every usable row.
pub fn parse_match_csv(
    data: &[u8],
    pitch: &Pitch,
    model: &ShotModel,
    grid: &ThreatGrid,
) -> ParsedUpload {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(data);

    let mut events = Vec::new();
    let mut rows = 0usize;
    let mut skipped = 0usize;

    for (i, result) in reader.deserialize::<EventRow>().enumerate() {
        rows += 1;
        match result {
            Ok(row) => match score_row(&row, pitch, model, grid) {
                Some(ev) => events.push(ev),
                None => {
                    skipped += 1;
                    warn!(
                        "Skipping row {}: unrecognized event_type '{}'",
                        i + 1,
                        row.event_type
                    );
                }
            },
            Err(e) => {
                skipped += 1;
                warn!("Skipping malformed row {}: {}", i + 1, e);
            }
        }
    }

    ParsedUpload {
        events,
        rows,
        skipped,
    }
}

fn score_row(
    row: &EventRow,
    pitch: &Pitch,
    model: &ShotModel,
    grid: &ThreatGrid,
) -> Option<ScoredEvent> {
    match row.event_type.to_lowercase().as_str() {
        "shot" => {
            let (score, derived) = match row.xg {
                Some(v) if v.is_finite() => (v, false),
                _ => {
                    // No shot type in the file; score as an unassisted
                    // foot shot (both multipliers neutral)
                    let (distance, angle) = pitch.shot_geometry(row.x, row.y);
                    let xg = model.estimate(Shot {
                        distance,
                        angle,
                        shot_type: ShotType::Foot,
                        assist_type: AssistType::None,
                    });
                    (xg, true)
                }
            };
            Some(ScoredEvent {
                event_type: EventKind::Shot,
                x: row.x,
                y: row.y,
                score,
                derived,
            })
        }
        "pass" => {
            let (score, derived) = match row.xt {
                Some(v) if v.is_finite() => (v, false),
                _ => {
                    let zone = pitch.zone_for(grid, row.x, row.y);
                    // zone_for clamps into bounds, so the lookup holds
                    (grid.threat_at(zone.row, zone.col).ok()?, true)
                }
            };
            Some(ScoredEvent {
                event_type: EventKind::Pass,
                x: row.x,
                y: row.y,
                score,
                derived,
            })
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn fixtures() -> (Pitch, ShotModel, ThreatGrid) {
        (Pitch::default(), ShotModel::default(), ThreatGrid::default())
    }

    fn parse(data: &str) -> ParsedUpload {
        let (pitch, model, grid) = fixtures();
        parse_match_csv(data.as_bytes(), &pitch, &model, &grid)
    }

    #[test]
    fn test_provided_scores_pass_through() {
        let up = parse("x,y,event_type,xg,xT\n102,34,shot,0.85,\n60,40,pass,,0.04\n");
        assert_eq!(up.rows, 2);
        assert_eq!(up.skipped, 0);
        assert_eq!(up.events.len(), 2);

        assert_eq!(up.events[0].event_type, EventKind::Shot);
        assert_relative_eq!(up.events[0].score, 0.85, epsilon = 1e-12);
        assert!(!up.events[0].derived);

        assert_eq!(up.events[1].event_type, EventKind::Pass);
        assert_relative_eq!(up.events[1].score, 0.04, epsilon = 1e-12);
        assert!(!up.events[1].derived);
    }

    #[test]
    fn test_missing_shot_score_is_derived() {
        let up = parse("x,y,event_type\n108,40,shot\n");
        assert_eq!(up.events.len(), 1);
        assert!(up.events[0].derived);
        // 12 yards straight on, foot, unassisted
        let expected = ShotModel::default().estimate(Shot {
            distance: 12.0,
            angle: 0.0,
            shot_type: ShotType::Foot,
            assist_type: AssistType::None,
        });
        assert_relative_eq!(up.events[0].score, expected, epsilon = 1e-9);
    }

    #[test]
    fn test_missing_pass_score_is_grid_lookup() {
        let (pitch, model, grid) = fixtures();
        let up = parse_match_csv(b"x,y,event_type\n115,40,pass\n", &pitch, &model, &grid);
        assert_eq!(up.events.len(), 1);
        assert!(up.events[0].derived);
        let zone = pitch.zone_for(&grid, 115.0, 40.0);
        let expected = grid.threat_at(zone.row, zone.col).unwrap();
        assert_relative_eq!(up.events[0].score, expected, epsilon = 1e-12);
    }

    #[test]
    fn test_lowercase_xt_header_accepted() {
        let up = parse("x,y,event_type,xt\n60,40,pass,0.07\n");
        assert_eq!(up.events.len(), 1);
        assert!(!up.events[0].derived);
        assert_relative_eq!(up.events[0].score, 0.07, epsilon = 1e-12);
    }

    #[test]
    fn test_unknown_event_type_is_skipped() {
        let up = parse("x,y,event_type,xg\n50,40,tackle,0.1\n102,34,shot,0.5\n");
        assert_eq!(up.rows, 2);
        assert_eq!(up.skipped, 1);
        assert_eq!(up.events.len(), 1);
    }

    #[test]
    fn test_malformed_row_is_skipped_not_fatal() {
        let up = parse("x,y,event_type,xg\nnot_a_number,34,shot,0.5\n94,20,shot,0.35\n");
        assert_eq!(up.rows, 2);
        assert_eq!(up.skipped, 1);
        assert_eq!(up.events.len(), 1);
        assert_relative_eq!(up.events[0].score, 0.35, epsilon = 1e-12);
    }

    #[test]
    fn test_non_finite_provided_score_treated_as_missing() {
        let up = parse("x,y,event_type,xg\n108,40,shot,NaN\n");
        assert_eq!(up.events.len(), 1);
        assert!(up.events[0].derived);
        assert!(up.events[0].score.is_finite());
    }

    #[test]
    fn test_empty_file() {
        let up = parse("x,y,event_type,xg,xT\n");
        assert_eq!(up.rows, 0);
        assert_eq!(up.skipped, 0);
        assert!(up.events.is_empty());
    }

    #[test]
    fn test_event_type_case_insensitive() {
        let up = parse("x,y,event_type,xg\n102,34,Shot,0.5\n");
        assert_eq!(up.events.len(), 1);
    }
}
