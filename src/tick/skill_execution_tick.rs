use specs::{
    shred::{ResourceId, World}, Entities, Entity, Read, ReadStorage, SystemData, Write, WriteStorage,
};
use skill_execution::{
    CombatEntity, ExecutionContext, ExecutionId, SkillExecution, VisualBackend, WorldQuery,
};
use vek::Vec3;

use crate::comp::*;

#[derive(SystemData)]
pub struct SkillExecRead<'a> {
    entities: Entities<'a>,
    time: Read<'a, Time>,
    tuning: Read<'a, SkillTuning>,
    pos: ReadStorage<'a, Pos>,
    facing: ReadStorage<'a, Facing>,
}

#[derive(SystemData)]
pub struct SkillExecWrite<'a> {
    units: WriteStorage<'a, CombatUnit>,
    books: WriteStorage<'a, SkillBook>,
    casts: Write<'a, Vec<SkillCast>>,
    executions: Write<'a, SkillExecutions>,
    scene: Write<'a, ProxyScene>,
    outcomes: Write<'a, Vec<Outcome>>,
}

/// 以位置組件回答世界查詢，已刪除的實體查不到
pub struct PosLookup<'s, 'a>(pub &'s ReadStorage<'a, Pos>);

impl WorldQuery for PosLookup<'_, '_> {
    fn position_of(&self, entity: Entity) -> Option<Vec3<f32>> {
        self.0.get(entity).map(|pos| pos.0)
    }
}

#[derive(Default)]
pub struct Sys;

impl<'a> System<'a> for Sys {
    type SystemData = (
        SkillExecRead<'a>,
        SkillExecWrite<'a>,
    );

    const NAME: &'static str = "skill_execution";

    fn run(_job: &mut Job<Self>, (tr, mut tw): Self::SystemData) {
        let now = tr.time.0;
        tw.scene.advance(now);
        let world = PosLookup(&tr.pos);

        // 處理新的施法請求
        for cast in std::mem::take(&mut *tw.casts) {
            let caster = cast.caster;
            let unit = match tw.units.get_mut(caster) {
                Some(unit) if tr.entities.is_alive(caster) => unit,
                _ => {
                    log::warn!("施法者 {:?} 不是有效的戰鬥單位，拒絕施放 {}", caster, cast.skill_id);
                    tw.outcomes.push(Outcome::SkillRejected {
                        caster,
                        skill_id: cast.skill_id,
                        reason: RejectReason::InvalidCaster,
                    });
                    continue;
                }
            };
            if unit.current_skill_execution.is_some() {
                log::info!("{} 正在施法中，拒絕施放 {}", unit.name, cast.skill_id);
                tw.outcomes.push(Outcome::SkillRejected {
                    caster,
                    skill_id: cast.skill_id,
                    reason: RejectReason::AlreadyCasting,
                });
                continue;
            }
            let ability = match tw.books.get_mut(caster).and_then(|book| book.get_mut(&cast.skill_id)) {
                Some(ability) => ability,
                None => {
                    log::warn!("{} 沒有學會技能 {}", unit.name, cast.skill_id);
                    tw.outcomes.push(Outcome::SkillRejected {
                        caster,
                        skill_id: cast.skill_id,
                        reason: RejectReason::UnknownSkill,
                    });
                    continue;
                }
            };

            let caster_pos = tr.pos.get(caster).map(|p| p.0).unwrap_or_default();
            let facing = tr.facing.get(caster).map(|f| f.0).unwrap_or_default();
            let target_pos = cast.target.and_then(|t| world.position_of(t));
            let input = cast.resolve_input(caster_pos, facing, target_pos);

            let mut combat = CombatEntity::new(caster, caster_pos, facing);
            let mut execution = SkillExecution::new(caster, input)
                .with_homing_speed(tr.tuning.homing_speed);
            {
                let mut ctx = ExecutionContext::new(&mut combat, ability, &mut *tw.scene, &world);
                execution.begin_execute(now, &mut ctx);
            }
            unit.current_skill_execution = combat.current_skill_execution;
            tw.outcomes.push(Outcome::SkillBegan {
                caster,
                skill_id: cast.skill_id,
            });
            tw.executions.insert(execution);
        }

        // 推進所有執行體
        let mut finished: Vec<ExecutionId> = Vec::new();
        for (id, execution) in tw.executions.active.iter_mut() {
            let caster = execution.caster();
            let alive = tr.entities.is_alive(caster);
            let unit = tw.units.get_mut(caster).filter(|_| alive);
            let ability = tw
                .books
                .get_mut(caster)
                .filter(|_| alive)
                .and_then(|book| book.get_mut(execution.ability_id()));
            let (unit, ability) = match (unit, ability) {
                (Some(unit), Some(ability)) => (unit, ability),
                _ => {
                    log::info!("技能 {} 的施法者已不存在，捨棄執行體", execution.ability_id());
                    for handle in execution.items().iter().filter_map(|item| item.visual) {
                        tw.scene.destroy_visual(handle);
                    }
                    finished.push(*id);
                    continue;
                }
            };

            let caster_pos = tr.pos.get(caster).map(|p| p.0).unwrap_or_default();
            let facing = tr.facing.get(caster).map(|f| f.0).unwrap_or_default();
            let mut combat = CombatEntity::new(caster, caster_pos, facing);
            combat.current_skill_execution = unit.current_skill_execution;

            let was_executing = execution.is_executing();
            let hits = execution.skill_targets().len();
            {
                let mut ctx = ExecutionContext::new(&mut combat, ability, &mut *tw.scene, &world);
                execution.tick(now, &mut ctx);
            }
            unit.current_skill_execution = combat.current_skill_execution;

            if was_executing && !execution.is_executing() {
                tw.outcomes.push(Outcome::SkillEnded {
                    caster,
                    skill_id: execution.ability_id().to_string(),
                    hits,
                });
            }
            if execution.is_finished() {
                finished.push(*id);
            }
        }

        for id in finished {
            tw.executions.active.remove(&id);
        }
    }
}
