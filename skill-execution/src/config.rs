use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::ability::SkillAbility;
use crate::effect::AbilityEffect;
use crate::emitter::EmitterConfig;
use crate::error::{Result, SkillError};

/// 技能設定
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillConfig {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// 技能執行總時長（秒）
    pub execute_time: f32,
    #[serde(default)]
    pub execution_asset: Option<String>,
    #[serde(default)]
    pub emitters: Vec<EmitterConfig>,
    #[serde(default)]
    pub effects: Vec<AbilityEffect>,
}

impl SkillConfig {
    /// 建立技能能力，設定有誤的發射器會被略過
    pub fn to_ability(&self) -> SkillAbility {
        let mut ability = SkillAbility::new(self.id.clone(), self.execute_time).with_name(self.name.clone());
        ability.execution_asset = self.execution_asset.clone();
        ability.effects = self.effects.clone();

        for raw in &self.emitters {
            match raw.to_descriptor() {
                Ok(descriptor) if descriptor.trigger_time > self.execute_time => {
                    warn!(
                        "技能 {} 的 {} 觸發時間 {}s 超過執行時長 {}s，不會觸發",
                        self.id, descriptor.item_name, descriptor.trigger_time, self.execute_time
                    );
                }
                Ok(descriptor) => ability.emitters.push(descriptor),
                Err(err) => warn!("技能 {} 發射器設定錯誤，略過: {}", self.id, err),
            }
        }
        ability
    }
}

/// 技能設定管理器
#[derive(Debug, Default)]
pub struct SkillConfigManager {
    configs: HashMap<String, SkillConfig>,
}

impl SkillConfigManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// 從文件載入設定，依副檔名選擇格式
    pub fn load_from_file(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => self.load_from_yaml(&content),
            Some("json") => self.load_from_json(&content),
            _ => Err(SkillError::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// 從YAML載入
    pub fn load_from_yaml(&mut self, content: &str) -> Result<usize> {
        let configs: HashMap<String, SkillConfig> = serde_yaml::from_str(content)?;
        Ok(self.insert_all(configs))
    }

    /// 從JSON載入
    pub fn load_from_json(&mut self, content: &str) -> Result<usize> {
        let configs: HashMap<String, SkillConfig> = serde_json::from_str(content)?;
        Ok(self.insert_all(configs))
    }

    fn insert_all(&mut self, configs: HashMap<String, SkillConfig>) -> usize {
        let count = configs.len();
        for (id, mut config) in configs {
            config.id = id.clone();
            self.configs.insert(id, config);
        }
        count
    }

    pub fn get_config(&self, skill_id: &str) -> Option<&SkillConfig> {
        self.configs.get(skill_id)
    }

    pub fn register_config(&mut self, config: SkillConfig) {
        self.configs.insert(config.id.clone(), config);
    }

    pub fn build_ability(&self, skill_id: &str) -> Option<SkillAbility> {
        self.get_config(skill_id).map(SkillConfig::to_ability)
    }

    /// 所有技能 id，已排序
    pub fn skill_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.configs.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.configs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emitter::SpawnPattern;

    const SKILLS: &str = r#"
meteor:
  name: 隕石術
  execute_time: 2.0
  execution_asset: Skills/meteor_cast
  effects:
    - type: damage
      amount: 120.0
      damage_type: magical
    - type: status_modifier
      modifier_type: burn
      value: 5.0
      duration: 3.0
  emitters:
    - collider_type: FixedPosition
      collider_name: meteor_zone
      exist_time: 1.0
      trigger_time: 0.5
    - collider_type: Spiral
      collider_name: meteor_swirl
      trigger_time: 0.1
    - collider_type: ForwardFly
      collider_name: meteor_tail
      trigger_time: 3.5
"#;

    #[test]
    fn test_load_yaml_and_build_ability() {
        let mut manager = SkillConfigManager::new();
        assert_eq!(manager.load_from_yaml(SKILLS).unwrap(), 1);

        let config = manager.get_config("meteor").unwrap();
        assert_eq!(config.id, "meteor");
        assert_eq!(config.emitters.len(), 3);

        let ability = manager.build_ability("meteor").unwrap();
        assert_eq!(ability.name, "隕石術");
        assert_eq!(ability.execute_time, 2.0);
        assert_eq!(ability.execution_asset.as_deref(), Some("Skills/meteor_cast"));
        assert_eq!(ability.effects.len(), 2);
        // 未知類型與超過時長的發射器被略過
        assert_eq!(ability.emitters.len(), 1);
        assert_eq!(ability.emitters[0].pattern, SpawnPattern::FixedPosition { lifetime: 1.0 });
        assert!(!ability.spelling);
    }

    #[test]
    fn test_load_json() {
        let json = r#"{
            "slash": {
                "name": "斬擊",
                "execute_time": 0.5,
                "effects": [{ "type": "damage", "amount": 30.0 }],
                "emitters": [
                    { "collider_type": "fixed_direction", "collider_name": "slash_arc", "exist_time": 0.25 }
                ]
            }
        }"#;
        let mut manager = SkillConfigManager::new();
        manager.load_from_json(json).unwrap();
        let ability = manager.build_ability("slash").unwrap();
        assert_eq!(ability.emitters.len(), 1);
        assert_eq!(ability.emitters[0].trigger_time, 0.0);
        assert_eq!(ability.effects, vec![AbilityEffect::damage(30.0)]);
        assert_eq!(manager.skill_ids(), vec!["slash"]);
    }

    #[test]
    fn test_register_config_overrides_loaded() {
        let mut manager = SkillConfigManager::new();
        manager.load_from_yaml(SKILLS).unwrap();
        manager.register_config(SkillConfig {
            id: "meteor".to_string(),
            name: "小隕石".to_string(),
            description: String::new(),
            execute_time: 1.0,
            execution_asset: None,
            emitters: Vec::new(),
            effects: vec![AbilityEffect::damage(10.0)],
        });
        assert_eq!(manager.len(), 1);

        let ability = manager.build_ability("meteor").unwrap();
        assert_eq!(ability.name, "小隕石");
        assert!(ability.emitters.is_empty());
        assert_eq!(ability.execution_asset, None);
    }

    #[test]
    fn test_unsupported_extension() {
        let mut manager = SkillConfigManager::new();
        let err = manager.load_from_file("Cargo.toml").unwrap_err();
        assert!(matches!(err, SkillError::UnsupportedFormat(_)));
    }
}
