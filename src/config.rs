use clap::Parser;

/// Interactive xG / expected-threat football demo
#[derive(Parser, Debug, Clone)]
#[command(name = "xgxt-demo", version, about)]
pub struct Config {
    /// Dashboard listen address
    #[arg(long, env = "DASHBOARD_ADDR", default_value = "0.0.0.0:8080")]
    pub dashboard_addr: String,

    /// Pitch length in yards (goal line to goal line)
    #[arg(long, env = "PITCH_LENGTH", default_value = "120.0")]
    pub pitch_length: f64,

    /// Pitch width in yards (touchline to touchline)
    #[arg(long, env = "PITCH_WIDTH", default_value = "80.0")]
    pub pitch_width: f64,

    /// Hard cap on estimator scores (the source material uses 0.9;
    /// set 1.0 for an uncapped-style variant)
    #[arg(long, env = "SCORE_CAP", default_value = "0.9")]
    pub score_cap: f64,

    /// Number of random synthetic demo shots
    #[arg(long, env = "DEMO_SHOTS", default_value = "100")]
    pub demo_shots: usize,

    /// Number of random synthetic demo actions
    #[arg(long, env = "DEMO_ACTIONS", default_value = "200")]
    pub demo_actions: usize,

    /// RNG seed for the synthetic dataset
    #[arg(long, env = "DEMO_SEED", default_value = "42")]
    pub demo_seed: u64,
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.pitch_length <= 0.0 || self.pitch_width <= 0.0 {
            anyhow::bail!("pitch dimensions must be positive");
        }
        if !(0.0..=1.0).contains(&self.score_cap) || self.score_cap == 0.0 {
            anyhow::bail!("score_cap must be in (0.0, 1.0]");
        }
        if self.demo_shots > 10_000 || self.demo_actions > 10_000 {
            anyhow::bail!("demo dataset sizes are limited to 10000 events");
        }
        Ok(())
    }
}
