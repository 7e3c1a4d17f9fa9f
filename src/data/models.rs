use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How a shot was struck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShotType {
    Foot,
    Header,
    Volley,
    Penalty,
}

impl ShotType {
    /// Parse a free-form label from CSV cells or query parameters.
    /// Unknown labels fall back to `Foot`, whose multiplier is the
    /// neutral 1.0. Bad labels degrade, they never error.
    pub fn from_label(label: &str) -> ShotType {
        match label.trim().to_lowercase().as_str() {
            "header" | "head" => ShotType::Header,
            "volley" => ShotType::Volley,
            "penalty" | "pen" => ShotType::Penalty,
            _ => ShotType::Foot,
        }
    }
}

/// How the shot was set up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssistType {
    None,
    Cross,
    ThroughBall,
    Corner,
    FreeKick,
}

impl AssistType {
    /// Parse a free-form label. Unknown labels fall back to `None`
    /// (neutral multiplier 1.0).
    pub fn from_label(label: &str) -> AssistType {
        match label.trim().to_lowercase().as_str() {
            "cross" => AssistType::Cross,
            "through_ball" | "through ball" | "throughball" => AssistType::ThroughBall,
            "corner" => AssistType::Corner,
            "free_kick" | "free kick" | "freekick" => AssistType::FreeKick,
            _ => AssistType::None,
        }
    }
}

/// A shot described by the attributes the estimator cares about.
/// Transient: built per evaluation, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Shot {
    /// Distance to the goal centre in yards
    pub distance: f64,
    /// Signed angle off the goal-centre line in degrees
    pub angle: f64,
    pub shot_type: ShotType,
    pub assist_type: AssistType,
}

/// A discrete (row, col) cell of the threat grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PitchZone {
    pub row: usize,
    pub col: usize,
}

/// A synthetic demo shot as served to the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemoShot {
    /// Pitch coordinates in yards (x toward the attacking goal)
    pub x: f64,
    pub y: f64,
    pub distance: f64,
    pub angle: f64,
    pub shot_type: ShotType,
    pub assist_type: AssistType,
    pub xg: f64,
}

/// A synthetic demo movement action as served to the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemoAction {
    pub x_start: f64,
    pub y_start: f64,
    pub x_end: f64,
    pub y_end: f64,
    pub start_zone: PitchZone,
    pub end_zone: PitchZone,
    /// End-zone threat minus start-zone threat; negative for backward play
    pub threat_delta: f64,
}

/// The generated demo dataset held in dashboard state.
#[derive(Debug, Clone, Serialize)]
pub struct DemoDataset {
    pub shots: Vec<DemoShot>,
    pub actions: Vec<DemoAction>,
    pub seed: u64,
    pub generated_at: DateTime<Utc>,
}

/// Kind of an uploaded match event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Shot,
    Pass,
}

/// An uploaded match event with its score resolved, either carried in
/// the file or derived from the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredEvent {
    pub event_type: EventKind,
    pub x: f64,
    pub y: f64,
    /// xG for shots, xT lookup value for passes
    pub score: f64,
    /// Whether the score came from the uploaded file or was derived here
    pub derived: bool,
}
