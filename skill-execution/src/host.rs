/// 外部協作者介面
///
/// 核心邏輯不直接碰觸渲染、物理或效果管線，透過這裡的 trait 委派。
/// 所有呼叫都是發出即返回，不等待結果

use specs::Entity;
use vek::Vec3;

use crate::ability::SkillAbility;
use crate::effect::AbilityEffect;
use crate::error::Result;
use crate::execution::ExecutionId;
use crate::item::ItemId;

/// 表現物件控制代碼
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VisualHandle(pub u64);

/// 渲染 / 資源協作者
pub trait VisualBackend {
    /// 建立表現物件，模板不存在時回傳 `SkillError::MissingTemplate`
    fn instantiate_visual(&mut self, template: &str, position: Vec3<f32>, yaw: f32) -> Result<VisualHandle>;

    fn destroy_visual(&mut self, handle: VisualHandle);

    fn destroy_visual_after(&mut self, handle: VisualHandle, seconds: f32);

    fn move_visual(&mut self, handle: VisualHandle, position: Vec3<f32>);

    /// 開關表現物件上的觸發碰撞體
    fn set_collider_enabled(&mut self, handle: VisualHandle, enabled: bool);

    /// 讓表現物件的碰撞回報能對應回技能碰撞體
    fn bind_item(&mut self, handle: VisualHandle, item: ItemId);
}

/// 世界查詢
pub trait WorldQuery {
    fn position_of(&self, entity: Entity) -> Option<Vec3<f32>>;
}

/// 效果協作者
pub trait EffectApplier {
    fn apply_effects(&mut self, effects: &[AbilityEffect], target: Entity);
}

/// 施法者在技能流程中需要的資料
#[derive(Debug, Clone, PartialEq)]
pub struct CombatEntity {
    pub entity: Entity,
    pub position: Vec3<f32>,
    pub direction: f32,
    /// 目前正在執行的技能，只存 id，不持有執行體
    pub current_skill_execution: Option<ExecutionId>,
}

impl CombatEntity {
    pub fn new(entity: Entity, position: Vec3<f32>, direction: f32) -> Self {
        Self {
            entity,
            position,
            direction,
            current_skill_execution: None,
        }
    }

    pub fn is_casting(&self) -> bool {
        self.current_skill_execution.is_some()
    }
}

/// 一次 tick 所需的外部狀態
pub struct ExecutionContext<'a> {
    pub caster: &'a mut CombatEntity,
    pub ability: &'a mut SkillAbility,
    pub visuals: &'a mut dyn VisualBackend,
    pub world: &'a dyn WorldQuery,
}

impl<'a> ExecutionContext<'a> {
    pub fn new(
        caster: &'a mut CombatEntity,
        ability: &'a mut SkillAbility,
        visuals: &'a mut dyn VisualBackend,
        world: &'a dyn WorldQuery,
    ) -> Self {
        Self {
            caster,
            ability,
            visuals,
            world,
        }
    }
}
