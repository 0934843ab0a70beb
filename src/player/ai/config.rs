use crate::core::{CELLS, SIZE};
use crate::error::ConfigError;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::path::Path;

const DEFAULT_CONFIG_PATH: &str = "ai_config.json";

static CONFIG: OnceCell<AIConfig> = OnceCell::new();

/// Positional sums are multiplied by this before the depth adjustment.
pub const HEURISTIC_SCALE: i32 = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AIConfig {
    pub version: String,
    pub evaluation: EvaluationConfig,
    pub search: SearchConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationConfig {
    /// 位置評価テーブル (行優先)
    pub weights: [[i32; SIZE]; SIZE],
    pub win_score: i32,
    /// Subtracted from a win per ply of distance from the root.
    pub win_depth_penalty: i32,
    /// Pulls heuristic scores toward zero per ply.
    pub heuristic_depth_adjust: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    pub max_depth_light: usize,
    pub max_depth_strong: usize,
    /// Delay between replayed node highlights; 0 disables pacing.
    pub step_delay_ms: u64,
    /// Only nodes at or above this ply are paced during replay.
    pub paced_plies: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
pub enum AIStrength {
    Strong,
    Light,
}

impl AIConfig {
    /// Process-wide config: whatever `install` set, else `ai_config.json`, else defaults.
    pub fn get() -> &'static AIConfig {
        CONFIG.get_or_init(Self::load_or_default)
    }

    /// Fixes the process-wide config. Fails if `get` already ran.
    pub fn install(config: AIConfig) -> Result<(), ConfigError> {
        config.validate()?;
        CONFIG
            .set(config)
            .map_err(|_| ConfigError::Invalid("config already initialised".to_string()))
    }

    pub fn load() -> Result<Self, ConfigError> {
        Self::from_path(DEFAULT_CONFIG_PATH)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config_str = std::fs::read_to_string(path)?;
        let config: AIConfig = serde_json::from_str(&config_str)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_or_default() -> Self {
        match Self::load() {
            Ok(config) => config,
            Err(ConfigError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(e) => {
                tracing::warn!(error = %e, path = DEFAULT_CONFIG_PATH, "falling back to default AI config");
                Self::default()
            }
        }
    }

    pub fn max_depth(&self, strength: AIStrength) -> usize {
        match strength {
            AIStrength::Strong => self.search.max_depth_strong,
            AIStrength::Light => self.search.max_depth_light,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.evaluation.validate()?;
        self.search.validate()
    }
}

impl EvaluationConfig {
    fn is_edge(row: usize, col: usize) -> bool {
        let on_rim_row = row == 0 || row == SIZE - 1;
        let on_rim_col = col == 0 || col == SIZE - 1;
        on_rim_row != on_rim_col
    }

    pub fn weight(&self, index: usize) -> i32 {
        self.weights[index / SIZE][index % SIZE]
    }

    /// Largest magnitude a heuristic cutoff can reach; `None` if it does not fit in `i32`.
    pub fn max_heuristic(&self) -> Option<i32> {
        self.weights
            .iter()
            .flatten()
            .try_fold(0i32, |acc, w| acc.checked_add(w.checked_abs()?))?
            .checked_mul(HEURISTIC_SCALE)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut max_edge = i32::MIN;
        let mut min_other = i32::MAX;
        for row in 0..SIZE {
            for col in 0..SIZE {
                let w = self.weights[row][col];
                if Self::is_edge(row, col) {
                    max_edge = max_edge.max(w);
                } else {
                    min_other = min_other.min(w);
                }
            }
        }
        if min_other < max_edge {
            return Err(ConfigError::Invalid(format!(
                "corner/center weights ({}) must be >= edge weights ({})",
                min_other, max_edge
            )));
        }
        if self.win_depth_penalty <= 0 {
            return Err(ConfigError::Invalid(
                "win_depth_penalty must be positive".to_string(),
            ));
        }
        let max_adjust = self.heuristic_depth_adjust.checked_mul(CELLS as i32);
        if self.heuristic_depth_adjust < 0 || max_adjust.map_or(true, |a| a >= HEURISTIC_SCALE) {
            return Err(ConfigError::Invalid(format!(
                "heuristic_depth_adjust must be in 0..{}",
                (HEURISTIC_SCALE + CELLS as i32 - 1) / CELLS as i32
            )));
        }
        let Some(bound) = self.max_heuristic() else {
            return Err(ConfigError::Invalid(
                "weights too large: heuristic bound overflows".to_string(),
            ));
        };
        let slowest_win = self
            .win_depth_penalty
            .checked_mul(CELLS as i32)
            .and_then(|p| self.win_score.checked_sub(p));
        match slowest_win {
            Some(w) if w > bound => Ok(()),
            _ => Err(ConfigError::Invalid(format!(
                "win_score {} minus {} plies of penalty must exceed heuristic bound {}",
                self.win_score, CELLS, bound
            ))),
        }
    }
}

impl SearchConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, depth) in [
            ("max_depth_light", self.max_depth_light),
            ("max_depth_strong", self.max_depth_strong),
        ] {
            if depth == 0 || depth > CELLS {
                return Err(ConfigError::Invalid(format!(
                    "{} must be in 1..={}, got {}",
                    name, CELLS, depth
                )));
            }
        }
        Ok(())
    }
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        EvaluationConfig {
            weights: [[2, 1, 2], [1, 3, 1], [2, 1, 2]],
            win_score: 1000,
            win_depth_penalty: 10,
            heuristic_depth_adjust: 1,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            max_depth_light: 4,
            max_depth_strong: CELLS,
            step_delay_ms: 0,
            paced_plies: 2,
        }
    }
}

impl Default for AIConfig {
    fn default() -> Self {
        AIConfig {
            version: "1.0".to_string(),
            evaluation: EvaluationConfig::default(),
            search: SearchConfig::default(),
        }
    }
}
