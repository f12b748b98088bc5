/// 技能執行核心
///
/// 不依賴 ECS 的純邏輯：技能時間軸推進、生成事件觸發、
/// 四種技能碰撞體的生成與銷毀，以及碰撞解析。
/// 渲染、物理、效果套用都透過 `host` 內的 trait 委派給宿主

pub mod ability;
pub mod collision;
pub mod config;
pub mod effect;
pub mod emitter;
pub mod error;
pub mod execution;
pub mod host;
pub mod item;
pub mod motion;

pub use crate::ability::{CastInput, SkillAbility};
pub use crate::collision::{BodyHandle, BodyRegistry, CollisionEvent, CollisionResolver};
pub use crate::config::{SkillConfig, SkillConfigManager};
pub use crate::effect::{AbilityEffect, DamageType};
pub use crate::emitter::{EmitterConfig, PatternKind, SpawnEmitterDescriptor, SpawnPattern};
pub use crate::error::{Result, SkillError};
pub use crate::execution::{item_template_path, ExecutionId, ExecutionState, SkillExecution, TIME_EPSILON};
pub use crate::host::{
    CombatEntity, EffectApplier, ExecutionContext, VisualBackend, VisualHandle, WorldQuery,
};
pub use crate::item::{AbilityItem, CollisionOutcome, ItemId, Teardown};
pub use crate::motion::{
    direction_vector, forward_displacement, MotionStatus, MotionStrategy, DEFAULT_HOMING_SPEED,
    FORWARD_FLY_DISTANCE, FORWARD_FLY_DURATION,
};
