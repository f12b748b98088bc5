/// 技能執行體
///
/// 管理一次施法從開始、逐 tick 觸發生成事件到結束的整個流程，
/// 並持有這次施法生成的所有技能碰撞體直到它們銷毀

use log::{debug, info, trace, warn};
use specs::Entity;
use std::fmt;
use uuid::Uuid;

use crate::ability::CastInput;
use crate::effect::AbilityEffect;
use crate::emitter::{SpawnEmitterDescriptor, SpawnPattern};
use crate::host::{EffectApplier, ExecutionContext, VisualBackend, VisualHandle};
use crate::item::{AbilityItem, CollisionOutcome, ItemId, Teardown};
use crate::motion::{MotionStrategy, DEFAULT_HOMING_SPEED};

/// 時間比較容許誤差（秒）
pub const TIME_EPSILON: f64 = 1e-6;

/// 技能碰撞體模板路徑
pub fn item_template_path(name: &str) -> String {
    format!("AbilityItems/{}", name)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExecutionId(Uuid);

impl ExecutionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ExecutionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ExecutionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionState {
    Idle,
    Executing,
}

#[derive(Debug)]
pub struct SkillExecution {
    id: ExecutionId,
    caster: Entity,
    ability_id: String,
    input: CastInput,
    state: ExecutionState,
    origin_time: f64,
    execute_time: f64,
    /// 依觸發時間排序的生成事件快照
    emitters: Vec<SpawnEmitterDescriptor>,
    /// 下一個待觸發的事件索引，之前的都已觸發過
    next_emitter: usize,
    skill_targets: Vec<Entity>,
    items: Vec<AbilityItem>,
    next_item_seq: u32,
    homing_speed: f32,
    execution_visual: Option<VisualHandle>,
}

impl SkillExecution {
    pub fn new(caster: Entity, input: CastInput) -> Self {
        Self {
            id: ExecutionId::new(),
            caster,
            ability_id: String::new(),
            input,
            state: ExecutionState::Idle,
            origin_time: 0.0,
            execute_time: 0.0,
            emitters: Vec::new(),
            next_emitter: 0,
            skill_targets: Vec::new(),
            items: Vec::new(),
            next_item_seq: 0,
            homing_speed: DEFAULT_HOMING_SPEED,
            execution_visual: None,
        }
    }

    pub fn with_homing_speed(mut self, speed: f32) -> Self {
        self.homing_speed = speed;
        self
    }

    pub fn id(&self) -> ExecutionId {
        self.id
    }

    pub fn caster(&self) -> Entity {
        self.caster
    }

    pub fn ability_id(&self) -> &str {
        &self.ability_id
    }

    pub fn state(&self) -> ExecutionState {
        self.state
    }

    pub fn is_executing(&self) -> bool {
        self.state == ExecutionState::Executing
    }

    /// 距離施法開始的秒數
    pub fn elapsed(&self, now: f64) -> f64 {
        now - self.origin_time
    }

    /// 已觸發的生成事件數
    pub fn fired_count(&self) -> usize {
        self.next_emitter
    }

    pub fn items(&self) -> &[AbilityItem] {
        &self.items
    }

    pub fn item(&self, id: ItemId) -> Option<&AbilityItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// 這次施法命中過的單位
    pub fn skill_targets(&self) -> &[Entity] {
        &self.skill_targets
    }

    /// 施法已結束且所有碰撞體都已銷毀
    pub fn is_finished(&self) -> bool {
        self.state == ExecutionState::Idle && self.items.is_empty()
    }

    /// 開始執行技能
    ///
    /// 呼叫前施法者不應有正在執行的技能，這裡不再檢查
    pub fn begin_execute(&mut self, now: f64, ctx: &mut ExecutionContext<'_>) {
        if self.state == ExecutionState::Executing {
            debug!("技能執行體 {} 重複開始執行，覆蓋原狀態", self.id);
        }
        ctx.caster.current_skill_execution = Some(self.id);
        ctx.ability.spelling = true;

        self.ability_id = ctx.ability.id.clone();
        self.origin_time = now;
        self.execute_time = f64::from(ctx.ability.execute_time);
        self.emitters = ctx.ability.emitters.clone();
        self.emitters
            .sort_by(|a, b| a.trigger_time.total_cmp(&b.trigger_time));
        self.next_emitter = 0;
        self.state = ExecutionState::Executing;

        info!(
            "技能 {} 開始執行 (施法者 {:?}, 時長 {}s, 生成事件 {} 個)",
            self.ability_id,
            self.caster,
            self.execute_time,
            self.emitters.len()
        );

        if let Some(asset) = ctx.ability.execution_asset.as_deref() {
            match ctx
                .visuals
                .instantiate_visual(asset, ctx.caster.position, ctx.caster.direction)
            {
                Ok(handle) => {
                    ctx.visuals.destroy_visual_after(handle, ctx.ability.execute_time);
                    self.execution_visual = Some(handle);
                }
                Err(err) => warn!("技能 {} 表現資源載入失敗: {}", self.ability_id, err),
            }
        }
    }

    /// 每幀更新
    pub fn tick(&mut self, now: f64, ctx: &mut ExecutionContext<'_>) {
        if self.state == ExecutionState::Executing {
            let elapsed = self.elapsed(now);
            // 超過總時長的事件永遠不觸發，粗細 tick 結果一致
            let horizon = elapsed.min(self.execute_time) + TIME_EPSILON;
            while let Some(descriptor) = self.emitters.get(self.next_emitter) {
                if f64::from(descriptor.trigger_time) > horizon {
                    break;
                }
                let descriptor = descriptor.clone();
                self.next_emitter += 1;
                self.spawn_collision_item(&descriptor, now, ctx);
            }

            if elapsed + TIME_EPSILON >= self.execute_time {
                self.end_execute(ctx);
            }
        }
        self.update_items(now, ctx);
    }

    /// 結束執行，可重複呼叫
    pub fn end_execute(&mut self, ctx: &mut ExecutionContext<'_>) {
        if self.state == ExecutionState::Idle {
            return;
        }
        if ctx.caster.current_skill_execution == Some(self.id) {
            ctx.caster.current_skill_execution = None;
        }
        ctx.ability.spelling = false;
        self.skill_targets.clear();
        self.state = ExecutionState::Idle;
        info!(
            "技能 {} 執行結束 (已觸發 {}/{})",
            self.ability_id,
            self.next_emitter,
            self.emitters.len()
        );
    }

    /// 技能碰撞體生成事件
    pub fn spawn_collision_item(
        &mut self,
        descriptor: &SpawnEmitterDescriptor,
        now: f64,
        ctx: &mut ExecutionContext<'_>,
    ) -> Option<ItemId> {
        match descriptor.pattern {
            SpawnPattern::TargetFly => self.target_fly_process(descriptor, now, ctx),
            SpawnPattern::ForwardFly => self.forward_fly_process(descriptor, now, ctx),
            SpawnPattern::FixedPosition { .. } => self.fixed_position_process(descriptor, now, ctx),
            SpawnPattern::FixedDirection { .. } => self.fixed_direction_process(descriptor, now, ctx),
        }
    }

    /// 目標飛行碰撞體
    fn target_fly_process(
        &mut self,
        descriptor: &SpawnEmitterDescriptor,
        now: f64,
        ctx: &mut ExecutionContext<'_>,
    ) -> Option<ItemId> {
        let target = match self.input.target {
            Some(target) => target,
            None => {
                warn!("技能 {} 的 {} 需要目標，略過生成", self.ability_id, descriptor.item_name);
                return None;
            }
        };
        let motion = MotionStrategy::homing(target, self.homing_speed);
        let position = ctx.caster.position;
        self.create_ability_item(descriptor, position, 0.0, motion, now, ctx)
    }

    /// 前向飛行碰撞體
    fn forward_fly_process(
        &mut self,
        descriptor: &SpawnEmitterDescriptor,
        now: f64,
        ctx: &mut ExecutionContext<'_>,
    ) -> Option<ItemId> {
        let position = ctx.caster.position;
        let direction = self.input.direction;
        let motion = MotionStrategy::forward(position, direction);
        self.create_ability_item(descriptor, position, direction, motion, now, ctx)
    }

    /// 固定位置碰撞體
    fn fixed_position_process(
        &mut self,
        descriptor: &SpawnEmitterDescriptor,
        now: f64,
        ctx: &mut ExecutionContext<'_>,
    ) -> Option<ItemId> {
        let position = self.input.point;
        self.create_ability_item(descriptor, position, 0.0, MotionStrategy::Stationary, now, ctx)
    }

    /// 固定方向碰撞體
    fn fixed_direction_process(
        &mut self,
        descriptor: &SpawnEmitterDescriptor,
        now: f64,
        ctx: &mut ExecutionContext<'_>,
    ) -> Option<ItemId> {
        let position = ctx.caster.position;
        let direction = ctx.caster.direction;
        self.create_ability_item(descriptor, position, direction, MotionStrategy::Stationary, now, ctx)
    }

    /// 建立技能碰撞體與其表現物件
    fn create_ability_item(
        &mut self,
        descriptor: &SpawnEmitterDescriptor,
        position: vek::Vec3<f32>,
        direction: f32,
        motion: MotionStrategy,
        now: f64,
        ctx: &mut ExecutionContext<'_>,
    ) -> Option<ItemId> {
        let template = item_template_path(&descriptor.item_name);
        let handle = match ctx.visuals.instantiate_visual(&template, position, direction) {
            Ok(handle) => handle,
            Err(err) => {
                warn!("技能 {} 生成 {} 失敗，略過: {}", self.ability_id, descriptor.item_name, err);
                return None;
            }
        };

        let id = ItemId {
            execution: self.id,
            seq: self.next_item_seq,
        };
        self.next_item_seq += 1;

        let effects: Vec<AbilityEffect> = ctx.ability.effects.clone();
        let mut item = AbilityItem::new(id, descriptor, position, direction, effects, motion, now);

        // 綁定完成前關閉碰撞體，避免生成當幀誤觸
        ctx.visuals.set_collider_enabled(handle, false);
        ctx.visuals.bind_item(handle, id);
        item.visual = Some(handle);
        ctx.visuals.set_collider_enabled(handle, true);
        item.collider_enabled = true;

        debug!(
            "生成技能碰撞體 {} ({}) 於 {:?}",
            descriptor.item_name,
            descriptor.kind(),
            position
        );
        self.items.push(item);
        Some(id)
    }

    /// 碰撞體碰到戰鬥單位
    pub fn handle_collision(
        &mut self,
        other: Entity,
        item_id: ItemId,
        effects: &mut dyn EffectApplier,
        visuals: &mut dyn VisualBackend,
    ) -> CollisionOutcome {
        let index = match self.items.iter().position(|item| item.id == item_id) {
            Some(index) => index,
            None => {
                trace!("碰撞體 {} 已不存在，忽略碰撞", item_id);
                return CollisionOutcome::Ignored;
            }
        };

        let outcome = self.items[index].on_collision(other, effects);
        if outcome != CollisionOutcome::Ignored && !self.skill_targets.contains(&other) {
            self.skill_targets.push(other);
        }
        if outcome == CollisionOutcome::Consumed {
            let item = self.items.remove(index);
            debug!("技能碰撞體 {} 命中 {:?} 後銷毀", item.name, other);
            if let Some(handle) = item.visual {
                visuals.destroy_visual(handle);
            }
        }
        outcome
    }

    /// 推進碰撞體移動與存在時間，移除已銷毀的碰撞體
    fn update_items(&mut self, now: f64, ctx: &mut ExecutionContext<'_>) {
        for item in self.items.iter_mut() {
            match item.advance(now, ctx.world) {
                Some(reason) => {
                    item.destroy();
                    log_teardown(item, reason);
                }
                None => {
                    if let Some(handle) = item.visual {
                        ctx.visuals.move_visual(handle, item.position);
                    }
                }
            }
        }

        let visuals = &mut *ctx.visuals;
        self.items.retain(|item| {
            if !item.is_destroyed() {
                return true;
            }
            if let Some(handle) = item.visual {
                visuals.destroy_visual(handle);
            }
            false
        });
    }
}

fn log_teardown(item: &AbilityItem, reason: Teardown) {
    match reason {
        Teardown::LifetimeElapsed => debug!("技能碰撞體 {} 存在時間結束", item.name),
        Teardown::MotionFinished => debug!("技能碰撞體 {} 飛行結束", item.name),
        Teardown::TargetLost => debug!("技能碰撞體 {} 追蹤目標消失", item.name),
        Teardown::Collision => debug!("技能碰撞體 {} 碰撞後銷毀", item.name),
    }
}
