/// 碰撞解析
///
/// 物理層回報「某個碰撞體碰到某個物理身體」，這裡把物理身體對應回戰鬥單位，
/// 再轉交給擁有該碰撞體的技能執行體

use hashbrown::HashMap;
use log::trace;
use serde::{Deserialize, Serialize};
use specs::Entity;

use crate::execution::SkillExecution;
use crate::host::{EffectApplier, VisualBackend};
use crate::item::{CollisionOutcome, ItemId};

/// 物理身體控制代碼
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyHandle(pub u64);

/// 物理層產生的碰撞事件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionEvent {
    /// 被碰到的物理身體
    pub body: BodyHandle,
    /// 發起碰撞的技能碰撞體
    pub item: ItemId,
}

/// 物理身體 -> 戰鬥單位 對照表
#[derive(Debug, Clone, Default)]
pub struct BodyRegistry {
    bodies: HashMap<BodyHandle, Entity>,
}

impl BodyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, body: BodyHandle, entity: Entity) -> Option<Entity> {
        self.bodies.insert(body, entity)
    }

    pub fn unregister(&mut self, body: BodyHandle) -> Option<Entity> {
        self.bodies.remove(&body)
    }

    /// 移除某個單位的所有物理身體
    pub fn unregister_entity(&mut self, entity: Entity) -> usize {
        let before = self.bodies.len();
        self.bodies.retain(|_, e| *e != entity);
        before - self.bodies.len()
    }

    pub fn lookup(&self, body: BodyHandle) -> Option<Entity> {
        self.bodies.get(&body).copied()
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }
}

pub struct CollisionResolver;

impl CollisionResolver {
    /// 找出被碰到的戰鬥單位，未註冊的物理身體直接忽略
    pub fn resolve(registry: &BodyRegistry, event: &CollisionEvent) -> Option<(Entity, ItemId)> {
        match registry.lookup(event.body) {
            Some(entity) => Some((entity, event.item)),
            None => {
                trace!("物理身體 {:?} 未對應任何戰鬥單位，忽略碰撞", event.body);
                None
            }
        }
    }

    /// 解析並轉交給擁有碰撞體的執行體
    pub fn dispatch(
        registry: &BodyRegistry,
        event: &CollisionEvent,
        execution: &mut SkillExecution,
        effects: &mut dyn EffectApplier,
        visuals: &mut dyn VisualBackend,
    ) -> CollisionOutcome {
        match Self::resolve(registry, event) {
            Some((entity, item)) if item.execution == execution.id() => {
                execution.handle_collision(entity, item, effects, visuals)
            }
            _ => CollisionOutcome::Ignored,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::execution::ExecutionId;
    use specs::{Builder, World, WorldExt};

    #[test]
    fn test_registry_lookup() {
        let mut world = World::new();
        let hero = world.create_entity().build();
        let creep = world.create_entity().build();

        let mut registry = BodyRegistry::new();
        registry.register(BodyHandle(1), hero);
        registry.register(BodyHandle(2), hero);
        registry.register(BodyHandle(3), creep);
        assert_eq!(registry.lookup(BodyHandle(3)), Some(creep));
        assert_eq!(registry.lookup(BodyHandle(9)), None);

        assert_eq!(registry.unregister_entity(hero), 2);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.unregister(BodyHandle(3)), Some(creep));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_resolve_unknown_body() {
        let registry = BodyRegistry::new();
        let event = CollisionEvent {
            body: BodyHandle(42),
            item: ItemId {
                execution: ExecutionId::new(),
                seq: 0,
            },
        };
        assert_eq!(CollisionResolver::resolve(&registry, &event), None);
    }
}
