/// 模擬狀態核心結構

use std::time::Duration;
use anyhow::Result;
use specs::{Builder, Entity, World, WorldExt};
use skill_execution::{BodyHandle, BodyRegistry, SkillAbility};
use vek::Vec3;

use crate::comp::*;
use crate::config::SimSetting;

use super::{StateInitializer, SystemDispatcher, TimeManager};

/// 單位預設碰撞半徑
pub const DEFAULT_BODY_RADIUS: f32 = 0.5;

/// 模擬核心狀態
pub struct State {
    /// ECS 世界
    ecs: World,
    /// 時間管理器
    time_manager: TimeManager,
    /// 系統分派器
    system_dispatcher: SystemDispatcher,
    next_body: u64,
}

impl State {
    pub fn new(setting: &SimSetting) -> Self {
        Self {
            ecs: StateInitializer::setup_ecs_world(setting),
            time_manager: TimeManager::new(),
            system_dispatcher: SystemDispatcher::new(),
            next_body: 0,
        }
    }

    /// 模擬主循環 tick，回傳這一幀產生的事件
    pub fn tick(&mut self, dt: Duration) -> Result<Vec<Outcome>> {
        self.time_manager.update(&mut self.ecs, dt);
        self.system_dispatcher.run_systems(&self.ecs);
        self.ecs.maintain();
        Ok(self.process_outcomes())
    }

    /// 生成一個戰鬥單位並註冊其物理身體
    pub fn spawn_unit(
        &mut self,
        name: &str,
        pos: Vec3<f32>,
        facing: f32,
        abilities: Vec<SkillAbility>,
    ) -> Entity {
        self.next_body += 1;
        let handle = BodyHandle(self.next_body);

        let mut book = SkillBook::new();
        for ability in abilities {
            book.learn(ability);
        }
        let entity = self
            .ecs
            .create_entity()
            .with(Pos(pos))
            .with(Facing(facing))
            .with(Body {
                handle,
                radius: DEFAULT_BODY_RADIUS,
            })
            .with(CombatUnit::new(name))
            .with(book)
            .build();

        self.ecs.write_resource::<BodyRegistry>().register(handle, entity);
        log::info!("生成單位 {} 於 {:?}", name, pos);
        entity
    }

    /// 移除單位，回傳單位原本是否存在
    pub fn despawn_unit(&mut self, entity: Entity) -> bool {
        self.ecs.write_resource::<BodyRegistry>().unregister_entity(entity);
        self.ecs.delete_entity(entity).is_ok()
    }

    /// 送出施法請求，下一個 tick 處理
    pub fn cast(&mut self, cast: SkillCast) {
        self.ecs.write_resource::<Vec<SkillCast>>().push(cast);
    }

    pub fn is_casting(&self, entity: Entity) -> bool {
        self.ecs
            .read_storage::<CombatUnit>()
            .get(entity)
            .map_or(false, |unit| unit.current_skill_execution.is_some())
    }

    pub fn set_position(&mut self, entity: Entity, pos: Vec3<f32>) {
        if let Some(p) = self.ecs.write_storage::<Pos>().get_mut(entity) {
            p.0 = pos;
        }
    }

    /// 取出這段時間累積的效果紀錄
    pub fn take_applied_effects(&mut self) -> Vec<AppliedEffects> {
        self.ecs.write_resource::<EffectLog>().drain()
    }

    pub fn active_executions(&self) -> usize {
        self.ecs.read_resource::<SkillExecutions>().len()
    }

    /// 獲取模擬時間
    pub fn get_time(&self) -> f64 {
        self.ecs.read_resource::<Time>().0
    }

    /// 獲取 ECS 世界引用
    pub fn ecs(&self) -> &World {
        &self.ecs
    }

    fn process_outcomes(&mut self) -> Vec<Outcome> {
        let outcomes = std::mem::take(&mut *self.ecs.write_resource::<Vec<Outcome>>());
        for outcome in outcomes.iter() {
            match outcome {
                Outcome::SkillBegan { caster, skill_id } => {
                    log::info!("{:?} 開始施放 {}", caster, skill_id);
                }
                Outcome::SkillRejected { caster, skill_id, reason } => {
                    log::info!("{:?} 施放 {} 被拒絕: {:?}", caster, skill_id, reason);
                }
                Outcome::SkillEnded { caster, skill_id, hits } => {
                    log::info!("{:?} 的 {} 施放結束，命中 {} 個單位", caster, skill_id, hits);
                }
                Outcome::ItemHit { item, target, outcome } => {
                    log::debug!("碰撞體 {} 命中 {:?}: {:?}", item, target, outcome);
                }
            }
        }
        outcomes
    }
}
