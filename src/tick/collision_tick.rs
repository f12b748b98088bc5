use specs::{
    shred::{ResourceId, World}, Entities, Join, Read, ReadStorage, SystemData, Write,
};
use skill_execution::{BodyRegistry, CollisionOutcome, CollisionResolver};

use crate::comp::*;

#[derive(SystemData)]
pub struct CollisionRead<'a> {
    entities: Entities<'a>,
    registry: Read<'a, BodyRegistry>,
    bodies: ReadStorage<'a, Body>,
    pos: ReadStorage<'a, Pos>,
}

#[derive(SystemData)]
pub struct CollisionWrite<'a> {
    executions: Write<'a, SkillExecutions>,
    scene: Write<'a, ProxyScene>,
    effects: Write<'a, EffectLog>,
    outcomes: Write<'a, Vec<Outcome>>,
}

#[derive(Default)]
pub struct Sys;

impl<'a> System<'a> for Sys {
    type SystemData = (
        CollisionRead<'a>,
        CollisionWrite<'a>,
    );

    const NAME: &'static str = "collision";

    fn run(_job: &mut Job<Self>, (tr, mut tw): Self::SystemData) {
        let bodies: Vec<_> = (&tr.entities, &tr.bodies, &tr.pos)
            .join()
            .map(|(_, body, pos)| (body.handle, pos.0, body.radius))
            .collect();

        for event in tw.scene.detect_triggers(&bodies) {
            let (target, item) = match CollisionResolver::resolve(&tr.registry, &event) {
                Some(hit) => hit,
                None => continue,
            };
            let execution = match tw.executions.get_mut(item.execution) {
                Some(execution) => execution,
                None => {
                    log::trace!("碰撞體 {} 的執行體已結束", item);
                    continue;
                }
            };
            // 不打到自己，除非是追蹤自己的碰撞體
            let homing_on_target = execution.item(item).and_then(|i| i.target) == Some(target);
            if target == execution.caster() && !homing_on_target {
                continue;
            }
            let outcome = execution.handle_collision(target, item, &mut *tw.effects, &mut *tw.scene);
            if outcome != CollisionOutcome::Ignored {
                tw.outcomes.push(Outcome::ItemHit { item, target, outcome });
            }
        }
    }
}
