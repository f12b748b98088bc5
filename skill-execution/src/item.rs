use specs::Entity;
use std::fmt;
use vek::Vec3;

use crate::effect::AbilityEffect;
use crate::emitter::{PatternKind, SpawnEmitterDescriptor, SpawnPattern};
use crate::execution::{ExecutionId, TIME_EPSILON};
use crate::host::{EffectApplier, VisualHandle, WorldQuery};
use crate::motion::{MotionStatus, MotionStrategy};

/// 技能碰撞體 id，同一執行體內依生成順序遞增
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId {
    pub execution: ExecutionId,
    pub seq: u32,
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.execution, self.seq)
    }
}

/// 碰撞處理結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionOutcome {
    /// 碰撞體已銷毀或不存在，什麼都沒做
    Ignored,
    /// 已套用效果，碰撞體保留
    Applied,
    /// 已套用效果並銷毀碰撞體
    Consumed,
}

/// 碰撞體銷毀原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Teardown {
    LifetimeElapsed,
    MotionFinished,
    TargetLost,
    Collision,
}

/// 技能碰撞體 - 技能生成的投射物或範圍物件
#[derive(Debug, Clone)]
pub struct AbilityItem {
    pub id: ItemId,
    pub name: String,
    pub position: Vec3<f32>,
    pub direction: f32,
    pub pattern: SpawnPattern,
    /// 只有追蹤飛行才有目標
    pub target: Option<Entity>,
    /// 生成時複製的效果，之後技能變動不影響
    pub effects: Vec<AbilityEffect>,
    pub motion: MotionStrategy,
    pub visual: Option<VisualHandle>,
    pub collider_enabled: bool,
    pub spawned_at: f64,
    last_update: f64,
    destroyed: bool,
}

impl AbilityItem {
    pub fn new(
        id: ItemId,
        descriptor: &SpawnEmitterDescriptor,
        position: Vec3<f32>,
        direction: f32,
        effects: Vec<AbilityEffect>,
        motion: MotionStrategy,
        spawned_at: f64,
    ) -> Self {
        let target = match &motion {
            MotionStrategy::Homing { target, .. } => Some(*target),
            _ => None,
        };
        Self {
            id,
            name: descriptor.item_name.clone(),
            position,
            direction,
            pattern: descriptor.pattern,
            target,
            effects,
            motion,
            visual: None,
            collider_enabled: false,
            spawned_at,
            last_update: spawned_at,
            destroyed: false,
        }
    }

    pub fn kind(&self) -> PatternKind {
        self.pattern.kind()
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// 標記銷毀，回傳這次呼叫前是否仍存活
    pub fn destroy(&mut self) -> bool {
        let was_alive = !self.destroyed;
        self.destroyed = true;
        self.collider_enabled = false;
        was_alive
    }

    /// 碰到其他戰鬥單位
    pub fn on_collision(&mut self, other: Entity, effects: &mut dyn EffectApplier) -> CollisionOutcome {
        if self.destroyed {
            return CollisionOutcome::Ignored;
        }
        effects.apply_effects(&self.effects, other);
        if self.kind() == PatternKind::TargetFly {
            self.destroy();
            CollisionOutcome::Consumed
        } else {
            CollisionOutcome::Applied
        }
    }

    /// 存在時間是否已到，非固定類型永遠回傳 false
    pub fn lifetime_elapsed(&self, now: f64) -> bool {
        match self.pattern.lifetime() {
            Some(lifetime) => now - self.spawned_at + TIME_EPSILON >= f64::from(lifetime),
            None => false,
        }
    }

    /// 更新到 `now`，回傳需要銷毀的原因
    pub fn advance(&mut self, now: f64, world: &dyn WorldQuery) -> Option<Teardown> {
        if self.destroyed {
            return None;
        }
        let dt = (now - self.last_update).max(0.0) as f32;
        self.last_update = now;

        if self.lifetime_elapsed(now) {
            return Some(Teardown::LifetimeElapsed);
        }
        let age = now - self.spawned_at;
        match self.motion.step(&mut self.position, dt, age, world) {
            MotionStatus::Finished => Some(Teardown::MotionFinished),
            MotionStatus::Lost => Some(Teardown::TargetLost),
            MotionStatus::Moving | MotionStatus::Holding => None,
        }
    }
}
