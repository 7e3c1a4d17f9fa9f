use axum::{
    extract::{Multipart, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::data::models::{AssistType, DemoDataset, Shot, ShotType};
use crate::data::upload::parse_match_csv;
use crate::model::{ShotModel, ThreatGrid};
use crate::pitch::Pitch;

#[derive(Clone)]
pub struct AppState {
    pub pitch: Pitch,
    pub model: ShotModel,
    pub grid: ThreatGrid,
    pub demo: DemoDataset,
}

/// Build the Axum router for the demo dashboard.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/api/config", get(config_handler))
        .route("/api/shots", get(shots_handler))
        .route("/api/actions", get(actions_handler))
        .route("/api/threat-grid", get(threat_grid_handler))
        .route("/api/estimate", get(estimate_handler))
        .route("/api/upload", post(upload_handler))
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(state))
}

/// Serve the demo HTML page.
async fn index_handler() -> impl IntoResponse {
    Html(DEMO_HTML)
}

#[derive(Serialize)]
struct ConfigView {
    pitch: Pitch,
    grid_rows: usize,
    grid_cols: usize,
    model: ShotModel,
}

/// GET /api/config: pitch dimensions, grid shape and model constants
async fn config_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(ConfigView {
        pitch: state.pitch,
        grid_rows: state.grid.rows(),
        grid_cols: state.grid.cols(),
        model: state.model,
    })
}

/// GET /api/shots: the synthetic demo shots
async fn shots_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.demo.shots.clone())
}

/// GET /api/actions: the synthetic demo actions
async fn actions_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.demo.actions.clone())
}

#[derive(Serialize)]
struct ThreatGridView {
    rows: usize,
    cols: usize,
    values: Vec<Vec<f64>>,
}

/// GET /api/threat-grid: the full table for the heatmap
async fn threat_grid_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(ThreatGridView {
        rows: state.grid.rows(),
        cols: state.grid.cols(),
        values: state.grid.table(),
    })
}

#[derive(Debug, Deserialize)]
struct EstimateParams {
    distance: Option<f64>,
    angle: Option<f64>,
    x: Option<f64>,
    y: Option<f64>,
    shot_type: Option<String>,
    assist_type: Option<String>,
}

#[derive(Debug, Serialize)]
struct EstimateResponse {
    distance: f64,
    angle: f64,
    shot_type: ShotType,
    assist_type: AssistType,
    base_probability: f64,
    angle_modifier: f64,
    shot_type_multiplier: f64,
    assist_type_multiplier: f64,
    xg: f64,
}

/// GET /api/estimate: live estimator call for the parameter controls.
/// Accepts either `distance` (+ optional `angle`) or pitch coordinates
/// `x`/`y`, from which geometry is derived.
async fn estimate_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<EstimateParams>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let (distance, angle) = match (params.distance, params.x, params.y) {
        (Some(d), _, _) => (d, params.angle.unwrap_or(0.0)),
        (None, Some(x), Some(y)) => state.pitch.shot_geometry(x, y),
        _ => {
            return Err((
                StatusCode::BAD_REQUEST,
                "provide distance (and optionally angle), or x and y".into(),
            ))
        }
    };
    if !distance.is_finite() || !angle.is_finite() {
        return Err((StatusCode::BAD_REQUEST, "parameters must be finite".into()));
    }

    // Unknown labels degrade to the neutral variants, matching the
    // estimator's no-error contract
    let shot_type = params
        .shot_type
        .as_deref()
        .map(ShotType::from_label)
        .unwrap_or(ShotType::Foot);
    let assist_type = params
        .assist_type
        .as_deref()
        .map(AssistType::from_label)
        .unwrap_or(AssistType::None);

    let m = &state.model;
    Ok(Json(EstimateResponse {
        distance,
        angle,
        shot_type,
        assist_type,
        base_probability: m.base_probability(distance),
        angle_modifier: m.angle_modifier(angle),
        shot_type_multiplier: m.shot_type_multiplier(shot_type),
        assist_type_multiplier: m.assist_type_multiplier(assist_type),
        xg: m.estimate(Shot {
            distance,
            angle,
            shot_type,
            assist_type,
        }),
    }))
}

/// POST /api/upload: multipart CSV upload, returns the scored events
/// plus skipped-row accounting.
async fn upload_handler(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?
    {
        let is_file = field.file_name().is_some() || field.name() == Some("file");
        if !is_file {
            continue;
        }
        let data = field
            .bytes()
            .await
            .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;
        let parsed = parse_match_csv(&data, &state.pitch, &state.model, &state.grid);
        info!(
            "Upload parsed: {} events ({} skipped of {} rows)",
            parsed.events.len(),
            parsed.skipped,
            parsed.rows
        );
        return Ok(Json(parsed));
    }
    Err((StatusCode::BAD_REQUEST, "no file field in upload".into()))
}

/// Embedded single-file demo page (HTML + CSS + JS)
const DEMO_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>xG &amp; xT Explained</title>
<style>
  :root {
    --bg: #0f1117;
    --card: #1a1d27;
    --border: #2a2d3a;
    --accent: #6c63ff;
    --green: #00c896;
    --red: #ff4f6a;
    --text: #e0e0e0;
    --muted: #8888aa;
    --pitch: #12331f;
    --line: #3f7a53;
  }
  * { box-sizing: border-box; margin: 0; padding: 0; }
  body { background: var(--bg); color: var(--text); font-family: 'Segoe UI', system-ui, sans-serif; }
  header { display: flex; align-items: center; gap: 1rem; padding: 1rem 2rem; border-bottom: 1px solid var(--border); }
  header h1 { font-size: 1.4rem; font-weight: 700; }
  .badge { padding: .2rem .6rem; border-radius: 4px; font-size: .75rem; font-weight: 700; text-transform: uppercase; background: var(--accent); color: #fff; }
  main { padding: 1.5rem 2rem; display: grid; gap: 1.5rem; max-width: 1200px; margin: 0 auto; }
  .panel { background: var(--card); border: 1px solid var(--border); border-radius: 10px; overflow: hidden; }
  .panel-header { padding: .9rem 1.2rem; border-bottom: 1px solid var(--border); font-weight: 600; display: flex; justify-content: space-between; align-items: center; }
  .panel-body { padding: 1.2rem; }
  .panel-body p { color: var(--muted); font-size: .9rem; margin-bottom: .8rem; line-height: 1.5; }
  canvas.pitch { width: 100%; border-radius: 6px; background: var(--pitch); display: block; }
  .two-col { display: grid; grid-template-columns: 1fr 1fr; gap: 1.5rem; }
  @media (max-width: 860px) { .two-col { grid-template-columns: 1fr; } }
  .controls { display: grid; gap: .9rem; }
  .control label { display: flex; justify-content: space-between; font-size: .85rem; color: var(--muted); margin-bottom: .3rem; }
  .control label b { color: var(--text); }
  input[type=range] { width: 100%; accent-color: var(--accent); }
  select { width: 100%; background: var(--bg); border: 1px solid var(--border); color: var(--text); padding: .45rem .6rem; border-radius: 6px; }
  .xg-readout { text-align: center; padding: 1rem 0 .4rem; }
  .xg-readout .big { font-size: 3rem; font-weight: 700; color: var(--green); }
  .xg-readout .sub { color: var(--muted); font-size: .8rem; text-transform: uppercase; letter-spacing: .06em; }
  .factor { display: grid; grid-template-columns: 110px 1fr 56px; align-items: center; gap: .6rem; font-size: .8rem; color: var(--muted); margin-bottom: .45rem; }
  .factor .bar { height: 8px; border-radius: 4px; background: var(--border); overflow: hidden; }
  .factor .bar i { display: block; height: 100%; background: var(--accent); }
  .factor .val { text-align: right; color: var(--text); }
  .hint { font-size: .78rem; color: var(--muted); margin-top: .6rem; }
  .upload-row { display: flex; gap: .8rem; align-items: center; flex-wrap: wrap; }
  input[type=file] { color: var(--muted); font-size: .85rem; }
  button { background: var(--accent); border: none; color: #fff; padding: .5rem 1.1rem; border-radius: 6px; cursor: pointer; font-weight: 600; }
  button:disabled { opacity: .5; cursor: default; }
  .summary { font-size: .85rem; color: var(--muted); }
  table { width: 100%; border-collapse: collapse; margin-top: .8rem; }
  th { padding: .55rem .8rem; text-align: left; font-size: .72rem; text-transform: uppercase; color: var(--muted); border-bottom: 1px solid var(--border); }
  td { padding: .5rem .8rem; font-size: .85rem; border-bottom: 1px solid #1e2130; }
  tr:last-child td { border-bottom: none; }
  .links a { color: var(--accent); text-decoration: none; }
  .legend { display: flex; gap: 1.2rem; font-size: .78rem; color: var(--muted); margin-top: .6rem; }
  .dot { display: inline-block; width: 10px; height: 10px; border-radius: 50%; margin-right: .35rem; }
</style>
</head>
<body>
<header>
  <h1>&#9917; Expected Goals &amp; Expected Threat</h1>
  <span class="badge" id="grid-badge">&hellip;</span>
  <span style="margin-left:auto;color:var(--muted);font-size:.8rem;">an interactive explainer</span>
</header>

<main>
  <div class="panel">
    <div class="panel-header">What is Expected Goals (xG)?</div>
    <div class="panel-body">
      <p><b style="color:var(--text)">xG</b> measures the probability that a shot results in a goal,
      from factors like distance to goal, shot angle and shot type. Bubbles below are synthetic
      shots sized by their xG. Click anywhere on the pitch to evaluate a shot from there.</p>
      <canvas id="shots-pitch" class="pitch" height="380"></canvas>
      <div class="legend"><span><span class="dot" style="background:var(--red)"></span>shot (area &prop; xG)</span>
      <span><span class="dot" style="background:var(--accent)"></span>your shot</span></div>
    </div>
  </div>

  <div class="two-col">
    <div class="panel">
      <div class="panel-header">Try it: shape a shot</div>
      <div class="panel-body controls">
        <div class="control">
          <label><span>Distance</span><b><span id="distance-val">12</span> yd</b></label>
          <input type="range" id="distance" min="0" max="60" step="0.5" value="12">
        </div>
        <div class="control">
          <label><span>Angle off centre</span><b><span id="angle-val">0</span>&deg;</b></label>
          <input type="range" id="angle" min="-90" max="90" step="1" value="0">
        </div>
        <div class="control">
          <label><span>Shot type</span></label>
          <select id="shot-type">
            <option value="foot">Foot</option>
            <option value="header">Header</option>
            <option value="volley">Volley</option>
            <option value="penalty">Penalty</option>
          </select>
        </div>
        <div class="control">
          <label><span>Assist type</span></label>
          <select id="assist-type">
            <option value="none">None</option>
            <option value="cross">Cross</option>
            <option value="through_ball">Through ball</option>
            <option value="corner">Corner</option>
            <option value="free_kick">Free kick</option>
          </select>
        </div>
      </div>
    </div>
    <div class="panel">
      <div class="panel-header">Model response</div>
      <div class="panel-body">
        <div class="xg-readout">
          <div class="big" id="xg-value">&ndash;</div>
          <div class="sub">expected goals</div>
        </div>
        <div class="factor"><span>Base (distance)</span><div class="bar"><i id="f-base"></i></div><span class="val" id="v-base">&ndash;</span></div>
        <div class="factor"><span>Angle</span><div class="bar"><i id="f-angle"></i></div><span class="val" id="v-angle">&ndash;</span></div>
        <div class="factor"><span>Shot type</span><div class="bar"><i id="f-type"></i></div><span class="val" id="v-type">&ndash;</span></div>
        <div class="factor"><span>Assist</span><div class="bar"><i id="f-assist"></i></div><span class="val" id="v-assist">&ndash;</span></div>
        <div class="hint">score = min(base &times; angle &times; type &times; assist, cap)</div>
      </div>
    </div>
  </div>

  <div class="panel">
    <div class="panel-header">What is Expected Threat (xT)?</div>
    <div class="panel-body">
      <p><b style="color:var(--text)">xT</b> values having the ball in each zone of the pitch, so passes and
      carries can be scored too: an action is worth the threat of where it ends minus the threat of
      where it started. The heatmap is the zone table; arrows are synthetic actions
      (<span style="color:var(--green)">green</span> gained threat,
      <span style="color:var(--red)">red</span> lost it).</p>
      <canvas id="threat-pitch" class="pitch" height="380"></canvas>
    </div>
  </div>

  <div class="panel">
    <div class="panel-header">Upload match data</div>
    <div class="panel-body">
      <p>CSV with columns <code>x, y, event_type, xg/xT</code> (event_type <code>shot</code> or
      <code>pass</code>). Rows without a score get one from the model.</p>
      <div class="upload-row">
        <input type="file" id="csv-file" accept=".csv">
        <button id="upload-btn">Upload</button>
        <span class="summary" id="upload-summary"></span>
      </div>
      <canvas id="upload-pitch" class="pitch" height="380" style="margin-top:1rem;display:none"></canvas>
      <div id="upload-table"></div>
    </div>
  </div>

  <div class="panel">
    <div class="panel-header">Learn more</div>
    <div class="panel-body links">
      <p><a href="https://statsbomb.com/articles/soccer/statsbomb-xg-model/" target="_blank" rel="noopener">StatsBomb xG model guide</a>
      &middot; <a href="https://karun.in/blog/expected-threat.html" target="_blank" rel="noopener">Karun Singh on expected threat</a></p>
    </div>
  </div>
</main>

<script>
let cfg = null;

// ── Pitch drawing ────────────────────────────────────────────────────────────

function fitCanvas(canvas) {
  const W = canvas.parentElement.clientWidth - 2;
  canvas.width = W;
  canvas.height = Math.round(W * cfg.pitch.width / cfg.pitch.length);
  return canvas.getContext('2d');
}

function px(x, canvas) { return x / cfg.pitch.length * canvas.width; }
function py(y, canvas) { return y / cfg.pitch.width * canvas.height; }

function drawPitch(ctx, canvas) {
  const L = cfg.pitch.length, W = cfg.pitch.width;
  ctx.clearRect(0, 0, canvas.width, canvas.height);
  ctx.strokeStyle = getComputedStyle(document.body).getPropertyValue('--line');
  ctx.lineWidth = 1.5;
  const rect = (x0, y0, x1, y1) => ctx.strokeRect(px(x0, canvas), py(y0, canvas), px(x1 - x0, canvas), py(y1 - y0, canvas));
  rect(0, 0, L, W);
  // Halfway line + centre circle
  ctx.beginPath();
  ctx.moveTo(px(L / 2, canvas), 0); ctx.lineTo(px(L / 2, canvas), canvas.height); ctx.stroke();
  ctx.beginPath();
  ctx.arc(px(L / 2, canvas), py(W / 2, canvas), px(10, canvas), 0, 2 * Math.PI); ctx.stroke();
  // Penalty and goal areas, both ends (18yd and 6yd boxes)
  rect(L - 18, W / 2 - 22, L, W / 2 + 22);
  rect(L - 6, W / 2 - 10, L, W / 2 + 10);
  rect(0, W / 2 - 22, 18, W / 2 + 22);
  rect(0, W / 2 - 10, 6, W / 2 + 10);
  // Goals
  ctx.strokeStyle = '#ffffff';
  rect(L, W / 2 - 4, L + 0.1, W / 2 + 4);
  rect(-0.1, W / 2 - 4, 0, W / 2 + 4);
}

// ── xG shots panel ───────────────────────────────────────────────────────────

let demoShots = [];
let userShot = null;

function drawShots() {
  const canvas = document.getElementById('shots-pitch');
  const ctx = fitCanvas(canvas);
  drawPitch(ctx, canvas);
  const labelled = demoShots.slice().sort((a, b) => b.xg - a.xg).slice(0, 3);
  for (const s of demoShots) {
    const r = 3 + 16 * Math.sqrt(s.xg);
    ctx.beginPath();
    ctx.arc(px(s.x, canvas), py(s.y, canvas), r, 0, 2 * Math.PI);
    ctx.fillStyle = 'rgba(255,79,106,0.45)';
    ctx.fill();
  }
  ctx.fillStyle = '#e0e0e0';
  ctx.font = '12px system-ui';
  ctx.textAlign = 'center';
  for (const s of labelled) {
    ctx.fillText('xG ' + s.xg.toFixed(2), px(s.x, canvas), py(s.y, canvas) - 12);
  }
  if (userShot) {
    ctx.beginPath();
    ctx.arc(px(userShot.x, canvas), py(userShot.y, canvas), 7, 0, 2 * Math.PI);
    ctx.fillStyle = 'rgba(108,99,255,0.9)';
    ctx.fill();
  }
}

document.getElementById('shots-pitch').addEventListener('click', async ev => {
  const canvas = ev.currentTarget;
  const box = canvas.getBoundingClientRect();
  const x = (ev.clientX - box.left) / box.width * cfg.pitch.length;
  const y = (ev.clientY - box.top) / box.height * cfg.pitch.width;
  userShot = { x, y };
  const st = document.getElementById('shot-type').value;
  const at = document.getElementById('assist-type').value;
  const r = await fetch(`/api/estimate?x=${x.toFixed(2)}&y=${y.toFixed(2)}&shot_type=${st}&assist_type=${at}`);
  if (!r.ok) return;
  const e = await r.json();
  document.getElementById('distance').value = Math.min(e.distance, 60);
  document.getElementById('angle').value = Math.max(-90, Math.min(90, e.angle));
  renderEstimate(e);
  drawShots();
});

// ── Estimate controls ────────────────────────────────────────────────────────

function renderEstimate(e) {
  document.getElementById('distance-val').textContent = e.distance.toFixed(1);
  document.getElementById('angle-val').textContent = e.angle.toFixed(0);
  document.getElementById('xg-value').textContent = e.xg.toFixed(3);
  const set = (bar, val, max) => {
    document.getElementById('f-' + bar).style.width = Math.min(100, val / max * 100) + '%';
    document.getElementById('v-' + bar).textContent = val.toFixed(2);
  };
  set('base', e.base_probability, 1);
  set('angle', e.angle_modifier, 1);
  set('type', e.shot_type_multiplier, 3);
  set('assist', e.assist_type_multiplier, 1.5);
}

async function refreshEstimate() {
  const d = document.getElementById('distance').value;
  const a = document.getElementById('angle').value;
  const st = document.getElementById('shot-type').value;
  const at = document.getElementById('assist-type').value;
  const r = await fetch(`/api/estimate?distance=${d}&angle=${a}&shot_type=${st}&assist_type=${at}`);
  if (!r.ok) return;
  renderEstimate(await r.json());
}

for (const id of ['distance', 'angle', 'shot-type', 'assist-type']) {
  document.getElementById(id).addEventListener('input', () => { userShot = null; refreshEstimate(); drawShots(); });
}

// ── xT panel ─────────────────────────────────────────────────────────────────

async function drawThreat() {
  const [gridRes, actionsRes] = await Promise.all([fetch('/api/threat-grid'), fetch('/api/actions')]);
  if (!gridRes.ok || !actionsRes.ok) return;
  const grid = await gridRes.json();
  const actions = await actionsRes.json();
  const canvas = document.getElementById('threat-pitch');
  const ctx = fitCanvas(canvas);
  const cw = canvas.width / grid.cols, ch = canvas.height / grid.rows;
  const max = Math.max(...grid.values.flat()) || 1;
  for (let r = 0; r < grid.rows; r++) {
    for (let c = 0; c < grid.cols; c++) {
      ctx.fillStyle = `rgba(255,79,106,${(grid.values[r][c] / max * 0.8).toFixed(3)})`;
      ctx.fillRect(c * cw, r * ch, cw + 0.5, ch + 0.5);
    }
  }
  drawPitch(ctx, canvas);
  for (const a of actions) {
    drawArrow(ctx, canvas, a.x_start, a.y_start, a.x_end, a.y_end,
      a.threat_delta >= 0 ? 'rgba(0,200,150,0.5)' : 'rgba(255,79,106,0.35)');
  }
}

function drawArrow(ctx, canvas, x0, y0, x1, y1, color) {
  const ax = px(x0, canvas), ay = py(y0, canvas), bx = px(x1, canvas), by = py(y1, canvas);
  ctx.strokeStyle = color;
  ctx.fillStyle = color;
  ctx.lineWidth = 1.2;
  ctx.beginPath(); ctx.moveTo(ax, ay); ctx.lineTo(bx, by); ctx.stroke();
  const ang = Math.atan2(by - ay, bx - ax);
  ctx.beginPath();
  ctx.moveTo(bx, by);
  ctx.lineTo(bx - 6 * Math.cos(ang - 0.4), by - 6 * Math.sin(ang - 0.4));
  ctx.lineTo(bx - 6 * Math.cos(ang + 0.4), by - 6 * Math.sin(ang + 0.4));
  ctx.closePath(); ctx.fill();
}

// ── Upload panel ─────────────────────────────────────────────────────────────

document.getElementById('upload-btn').addEventListener('click', async () => {
  const input = document.getElementById('csv-file');
  const summary = document.getElementById('upload-summary');
  if (!input.files.length) { summary.textContent = 'Pick a CSV file first.'; return; }
  const form = new FormData();
  form.append('file', input.files[0]);
  const r = await fetch('/api/upload', { method: 'POST', body: form });
  if (!r.ok) { summary.textContent = 'Upload failed: ' + await r.text(); return; }
  const parsed = await r.json();
  summary.textContent = `${parsed.events.length} events plotted, ${parsed.skipped} of ${parsed.rows} rows skipped`;

  const canvas = document.getElementById('upload-pitch');
  canvas.style.display = 'block';
  const ctx = fitCanvas(canvas);
  drawPitch(ctx, canvas);
  for (const e of parsed.events) {
    const r2 = 3 + 16 * Math.sqrt(Math.max(0, e.score));
    ctx.beginPath();
    ctx.arc(px(e.x, canvas), py(e.y, canvas), r2, 0, 2 * Math.PI);
    ctx.fillStyle = e.event_type === 'shot' ? 'rgba(108,99,255,0.55)' : 'rgba(0,200,150,0.55)';
    ctx.fill();
  }

  const head = parsed.events.slice(0, 5).map(e => `<tr>
    <td>${e.event_type}</td><td>${e.x.toFixed(1)}</td><td>${e.y.toFixed(1)}</td>
    <td>${e.score.toFixed(3)}</td><td>${e.derived ? 'model' : 'file'}</td>
  </tr>`).join('');
  document.getElementById('upload-table').innerHTML = parsed.events.length
    ? `<table><thead><tr><th>Type</th><th>x</th><th>y</th><th>Score</th><th>Source</th></tr></thead><tbody>${head}</tbody></table>`
    : '';
});

// ── Boot ─────────────────────────────────────────────────────────────────────

async function boot() {
  const r = await fetch('/api/config');
  cfg = await r.json();
  document.getElementById('grid-badge').textContent = `${cfg.grid_rows}x${cfg.grid_cols} grid`;
  const shotsRes = await fetch('/api/shots');
  demoShots = shotsRes.ok ? await shotsRes.json() : [];
  drawShots();
  await drawThreat();
  await refreshEstimate();
}

boot();
window.addEventListener('resize', () => { drawShots(); drawThreat(); });
</script>
</body>
</html>"#;
