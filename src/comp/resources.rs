use serde::{Deserialize, Serialize};
use skill_execution::{AbilityEffect, CastInput, EffectApplier, ExecutionId, SkillExecution, DEFAULT_HOMING_SPEED};
use specs::Entity;
use std::collections::BTreeMap;
use vek::Vec3;

/// A resource that stores the tick (i.e: physics) time.
#[derive(Copy, Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Time(pub f64);

/// 技能調校參數
#[derive(Copy, Clone, Debug)]
pub struct SkillTuning {
    pub homing_speed: f32,
}

impl Default for SkillTuning {
    fn default() -> Self {
        Self {
            homing_speed: DEFAULT_HOMING_SPEED,
        }
    }
}

/// 施法請求
#[derive(Clone, Debug)]
pub struct SkillCast {
    pub caster: Entity,
    pub skill_id: String,
    pub target: Option<Entity>,
    pub point: Option<Vec3<f32>>,
    /// 未指定時使用施法者朝向
    pub direction: Option<f32>,
}

impl SkillCast {
    pub fn new(caster: Entity, skill_id: impl Into<String>) -> Self {
        Self {
            caster,
            skill_id: skill_id.into(),
            target: None,
            point: None,
            direction: None,
        }
    }

    pub fn with_target(mut self, target: Entity) -> Self {
        self.target = Some(target);
        self
    }

    pub fn with_point(mut self, point: Vec3<f32>) -> Self {
        self.point = Some(point);
        self
    }

    pub fn with_direction(mut self, direction: f32) -> Self {
        self.direction = Some(direction);
        self
    }

    /// 補齊施法輸入：地點預設目標位置或施法者位置，方向預設施法者朝向
    pub fn resolve_input(&self, caster_pos: Vec3<f32>, facing: f32, target_pos: Option<Vec3<f32>>) -> CastInput {
        let mut input = CastInput::new()
            .with_point(self.point.or(target_pos).unwrap_or(caster_pos))
            .with_direction(self.direction.unwrap_or(facing));
        if let Some(target) = self.target {
            input = input.with_target(target);
        }
        input
    }
}

/// 執行中的技能執行體
#[derive(Debug, Default)]
pub struct SkillExecutions {
    pub active: BTreeMap<ExecutionId, SkillExecution>,
}

impl SkillExecutions {
    pub fn insert(&mut self, execution: SkillExecution) {
        self.active.insert(execution.id(), execution);
    }

    pub fn get(&self, id: ExecutionId) -> Option<&SkillExecution> {
        self.active.get(&id)
    }

    pub fn get_mut(&mut self, id: ExecutionId) -> Option<&mut SkillExecution> {
        self.active.get_mut(&id)
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}

/// 已套用的效果紀錄
#[derive(Clone, Debug, PartialEq)]
pub struct AppliedEffects {
    pub target: Entity,
    pub effects: Vec<AbilityEffect>,
}

/// 效果管線替身，只記錄每次要套用的效果
#[derive(Debug, Default)]
pub struct EffectLog {
    pub applied: Vec<AppliedEffects>,
}

impl EffectLog {
    pub fn drain(&mut self) -> Vec<AppliedEffects> {
        std::mem::take(&mut self.applied)
    }
}

impl EffectApplier for EffectLog {
    fn apply_effects(&mut self, effects: &[AbilityEffect], target: Entity) {
        self.applied.push(AppliedEffects {
            target,
            effects: effects.to_vec(),
        });
    }
}
