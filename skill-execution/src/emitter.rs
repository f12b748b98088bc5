/// 技能碰撞體發射器
///
/// 每個發射器代表技能時間軸上的一次生成事件：在第幾秒、以哪種方式、
/// 生成哪個碰撞體模板

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Result, SkillError};

/// 碰撞體類型（不帶參數，用於設定解析與日誌）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PatternKind {
    TargetFly,      // 目標飛行
    ForwardFly,     // 前向飛行
    FixedPosition,  // 固定位置
    FixedDirection, // 固定方向
}

impl PatternKind {
    /// 解析設定中的類型名稱，同時接受 `TargetFly` 與 `target_fly` 兩種寫法
    pub fn parse(name: &str) -> Result<Self> {
        let normalized: String = name
            .chars()
            .filter(|c| *c != '_' && *c != '-' && !c.is_whitespace())
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "targetfly" => Ok(PatternKind::TargetFly),
            "forwardfly" => Ok(PatternKind::ForwardFly),
            "fixedposition" => Ok(PatternKind::FixedPosition),
            "fixeddirection" => Ok(PatternKind::FixedDirection),
            _ => Err(SkillError::UnknownPattern(name.to_string())),
        }
    }
}

impl fmt::Display for PatternKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PatternKind::TargetFly => "TargetFly",
            PatternKind::ForwardFly => "ForwardFly",
            PatternKind::FixedPosition => "FixedPosition",
            PatternKind::FixedDirection => "FixedDirection",
        };
        f.write_str(name)
    }
}

/// 生成方式，固定類型才帶有存在時間
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpawnPattern {
    TargetFly,
    ForwardFly,
    FixedPosition { lifetime: f32 },
    FixedDirection { lifetime: f32 },
}

impl SpawnPattern {
    pub fn kind(&self) -> PatternKind {
        match self {
            SpawnPattern::TargetFly => PatternKind::TargetFly,
            SpawnPattern::ForwardFly => PatternKind::ForwardFly,
            SpawnPattern::FixedPosition { .. } => PatternKind::FixedPosition,
            SpawnPattern::FixedDirection { .. } => PatternKind::FixedDirection,
        }
    }

    pub fn lifetime(&self) -> Option<f32> {
        match self {
            SpawnPattern::FixedPosition { lifetime } | SpawnPattern::FixedDirection { lifetime } => {
                Some(*lifetime)
            }
            SpawnPattern::TargetFly | SpawnPattern::ForwardFly => None,
        }
    }
}

/// 技能碰撞體生成事件，執行期間唯讀
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnEmitterDescriptor {
    pub item_name: String,
    /// 距離施法開始的秒數
    pub trigger_time: f32,
    pub pattern: SpawnPattern,
}

impl SpawnEmitterDescriptor {
    pub fn new(item_name: impl Into<String>, trigger_time: f32, pattern: SpawnPattern) -> Self {
        Self {
            item_name: item_name.into(),
            trigger_time,
            pattern,
        }
    }

    pub fn kind(&self) -> PatternKind {
        self.pattern.kind()
    }
}

/// 設定檔中的發射器原始資料
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmitterConfig {
    pub collider_type: String,
    pub collider_name: String,
    /// 固定類型碰撞體的存在時間（秒）
    #[serde(default)]
    pub exist_time: f32,
    #[serde(default)]
    pub trigger_time: f32,
}

impl EmitterConfig {
    /// 轉換成執行期使用的發射器描述
    pub fn to_descriptor(&self) -> Result<SpawnEmitterDescriptor> {
        let kind = PatternKind::parse(&self.collider_type)?;

        if self.collider_name.trim().is_empty() {
            return Err(SkillError::MissingTemplate(format!(
                "{} 發射器未指定碰撞體名稱",
                kind
            )));
        }
        if !self.trigger_time.is_finite() || self.trigger_time < 0.0 {
            return Err(self.invalid(format!("觸發時間不合法: {}", self.trigger_time)));
        }

        let pattern = match kind {
            PatternKind::TargetFly => SpawnPattern::TargetFly,
            PatternKind::ForwardFly => SpawnPattern::ForwardFly,
            PatternKind::FixedPosition | PatternKind::FixedDirection => {
                if !self.exist_time.is_finite() || self.exist_time <= 0.0 {
                    return Err(self.invalid(format!("存在時間必須大於 0: {}", self.exist_time)));
                }
                if kind == PatternKind::FixedPosition {
                    SpawnPattern::FixedPosition { lifetime: self.exist_time }
                } else {
                    SpawnPattern::FixedDirection { lifetime: self.exist_time }
                }
            }
        };

        Ok(SpawnEmitterDescriptor::new(
            self.collider_name.clone(),
            self.trigger_time,
            pattern,
        ))
    }

    fn invalid(&self, reason: String) -> SkillError {
        SkillError::InvalidEmitter {
            item: self.collider_name.clone(),
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(collider_type: &str, exist_time: f32) -> EmitterConfig {
        EmitterConfig {
            collider_type: collider_type.to_string(),
            collider_name: "fireball".to_string(),
            exist_time,
            trigger_time: 0.5,
        }
    }

    #[test]
    fn test_parse_pattern_names() {
        assert_eq!(PatternKind::parse("TargetFly").unwrap(), PatternKind::TargetFly);
        assert_eq!(PatternKind::parse("forward_fly").unwrap(), PatternKind::ForwardFly);
        assert_eq!(PatternKind::parse("Fixed-Position").unwrap(), PatternKind::FixedPosition);
        assert_eq!(PatternKind::parse("FIXEDDIRECTION").unwrap(), PatternKind::FixedDirection);
    }

    #[test]
    fn test_unknown_pattern_is_configuration_error() {
        let err = config("Boomerang", 1.0).to_descriptor().unwrap_err();
        assert!(matches!(err, SkillError::UnknownPattern(ref name) if name == "Boomerang"));
        assert!(err.is_configuration());
    }

    #[test]
    fn test_fixed_kinds_carry_lifetime() {
        let descriptor = config("FixedPosition", 1.5).to_descriptor().unwrap();
        assert_eq!(descriptor.pattern, SpawnPattern::FixedPosition { lifetime: 1.5 });
        assert_eq!(descriptor.pattern.lifetime(), Some(1.5));
        assert_eq!(descriptor.trigger_time, 0.5);

        // 飛行類型忽略存在時間
        let descriptor = config("ForwardFly", 3.0).to_descriptor().unwrap();
        assert_eq!(descriptor.pattern, SpawnPattern::ForwardFly);
        assert_eq!(descriptor.pattern.lifetime(), None);
    }

    #[test]
    fn test_fixed_kind_without_lifetime_rejected() {
        let err = config("FixedDirection", 0.0).to_descriptor().unwrap_err();
        assert!(matches!(err, SkillError::InvalidEmitter { .. }));
    }

    #[test]
    fn test_missing_collider_name_rejected() {
        let mut raw = config("TargetFly", 0.0);
        raw.collider_name = "  ".to_string();
        let err = raw.to_descriptor().unwrap_err();
        assert!(matches!(err, SkillError::MissingTemplate(_)));
    }
}
