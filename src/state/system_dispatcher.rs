/// 系統分派器 - 負責協調和運行所有模擬系統

use specs::{Dispatcher, DispatcherBuilder, World};

use crate::comp::*;
use crate::tick::*;

/// 系統分派器
pub struct SystemDispatcher {
    dispatcher: Dispatcher<'static, 'static>,
}

impl SystemDispatcher {
    pub fn new() -> Self {
        let mut dispatch_builder = DispatcherBuilder::new();
        Self::build_system_dependencies(&mut dispatch_builder);
        Self {
            dispatcher: dispatch_builder.build(),
        }
    }

    /// 運行所有模擬系統
    pub fn run_systems(&mut self, world: &World) {
        self.dispatcher.dispatch(world);
    }

    fn build_system_dependencies(dispatch_builder: &mut DispatcherBuilder<'static, 'static>) {
        // 先推進技能時間軸，再處理這一幀的碰撞
        dispatch::<skill_execution_tick::Sys>(dispatch_builder, &[]);
        dispatch::<collision_tick::Sys>(dispatch_builder, &["skill_execution_sys"]);
    }
}

impl Default for SystemDispatcher {
    fn default() -> Self {
        Self::new()
    }
}
