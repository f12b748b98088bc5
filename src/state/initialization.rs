/// 狀態初始化器 - 負責設置 ECS 世界

use specs::{World, WorldExt};
use skill_execution::BodyRegistry;

use crate::comp::*;
use crate::config::SimSetting;

/// 狀態初始化器
pub struct StateInitializer;

impl StateInitializer {
    /// 設置模擬用 ECS 世界
    pub fn setup_ecs_world(setting: &SimSetting) -> World {
        let mut ecs = World::new();
        Self::register_components(&mut ecs);
        Self::initialize_resources(&mut ecs, setting);
        ecs
    }

    fn register_components(ecs: &mut World) {
        ecs.register::<Pos>();
        ecs.register::<Facing>();
        ecs.register::<Body>();
        ecs.register::<CombatUnit>();
        ecs.register::<SkillBook>();
    }

    fn initialize_resources(ecs: &mut World, setting: &SimSetting) {
        ecs.insert(Time(0.0));
        ecs.insert(SkillTuning {
            homing_speed: setting.homing_speed,
        });
        ecs.insert(BodyRegistry::new());
        ecs.insert(ProxyScene::default());
        ecs.insert(EffectLog::default());
        ecs.insert(SkillExecutions::default());
        ecs.insert(Vec::<SkillCast>::new());
        ecs.insert(Vec::<Outcome>::new());
    }
}
