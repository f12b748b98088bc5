use serde::{Deserialize, Serialize};

/// 傷害類型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DamageType {
    Physical,
    Magical,
    Pure,
}

/// 技能效果
///
/// 只描述碰撞時要套用的內容，實際數值計算由效果管線負責
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AbilityEffect {
    /// 傷害效果
    Damage {
        amount: f32,
        #[serde(default = "default_damage_type")]
        damage_type: DamageType,
    },
    /// 治療效果
    Heal { amount: f32 },
    /// 狀態修改
    StatusModifier {
        modifier_type: String,
        value: f32,
        #[serde(default)]
        duration: Option<f32>,
    },
}

fn default_damage_type() -> DamageType {
    DamageType::Magical
}

impl AbilityEffect {
    pub fn damage(amount: f32) -> Self {
        AbilityEffect::Damage {
            amount,
            damage_type: default_damage_type(),
        }
    }

    pub fn heal(amount: f32) -> Self {
        AbilityEffect::Heal { amount }
    }
}
