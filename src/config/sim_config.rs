use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use skill_execution::DEFAULT_HOMING_SPEED;
use std::fs;
use std::path::Path;
use std::time::Duration;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct SimSetting {
    /// 每秒 tick 數
    pub tps: u64,
    /// 技能設定檔路徑，yaml 或 json
    pub skill_config: String,
    pub homing_speed: f32,
    /// 設定後跑滿秒數自動結束，並自動輪流施放所有技能
    pub run_seconds: Option<f64>,
}

impl Default for SimSetting {
    fn default() -> Self {
        Self {
            tps: 10,
            skill_config: "skill-configs/skills.yaml".to_string(),
            homing_speed: DEFAULT_HOMING_SPEED,
            run_seconds: None,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
struct Setting {
    #[serde(default)]
    sim: SimSetting,
}

impl SimSetting {
    pub fn from_toml(content: &str) -> Result<Self> {
        let setting: Setting = toml::from_str(content).context("game.toml 格式錯誤")?;
        Ok(setting.sim)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("無法讀取設定檔 {}", path.display()))?;
        Self::from_toml(&content)
    }

    /// 讀不到或解析失敗時使用預設值
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path) {
            Ok(setting) => setting,
            Err(err) => {
                log::warn!("{:#}，使用預設設定", err);
                Self::default()
            }
        }
    }

    pub fn tick_duration(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.tps.max(1) as f64)
    }
}
