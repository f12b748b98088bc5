use specs::Entity;
use vek::Vec3;

use crate::effect::AbilityEffect;
use crate::emitter::SpawnEmitterDescriptor;

/// 施法輸入 - 施法開始時就已決定的目標、地點與方向
#[derive(Debug, Clone, PartialEq)]
pub struct CastInput {
    pub target: Option<Entity>,
    pub point: Vec3<f32>,
    /// 角度制，0 度朝向 +Z
    pub direction: f32,
}

impl CastInput {
    pub fn new() -> Self {
        Self {
            target: None,
            point: Vec3::zero(),
            direction: 0.0,
        }
    }

    pub fn with_target(mut self, target: Entity) -> Self {
        self.target = Some(target);
        self
    }

    pub fn with_point(mut self, point: Vec3<f32>) -> Self {
        self.point = point;
        self
    }

    pub fn with_direction(mut self, direction: f32) -> Self {
        self.direction = direction;
        self
    }
}

impl Default for CastInput {
    fn default() -> Self {
        Self::new()
    }
}

/// 技能能力 - 施法者擁有的技能定義與施法中狀態
#[derive(Debug, Clone)]
pub struct SkillAbility {
    pub id: String,
    pub name: String,
    /// 技能執行總時長（秒）
    pub execute_time: f32,
    /// 是否正在施法
    pub spelling: bool,
    pub emitters: Vec<SpawnEmitterDescriptor>,
    pub effects: Vec<AbilityEffect>,
    /// 整個施法期間播放的表現資源
    pub execution_asset: Option<String>,
}

impl SkillAbility {
    pub fn new(id: impl Into<String>, execute_time: f32) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            execute_time,
            spelling: false,
            emitters: Vec::new(),
            effects: Vec::new(),
            execution_asset: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_emitter(mut self, emitter: SpawnEmitterDescriptor) -> Self {
        self.emitters.push(emitter);
        self
    }

    pub fn with_effect(mut self, effect: AbilityEffect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_execution_asset(mut self, asset: impl Into<String>) -> Self {
        self.execution_asset = Some(asset.into());
        self
    }
}
