use skill_execution::{CollisionOutcome, ItemId};
use specs::Entity as EcsEntity;

/// 技能流程中需要對外回報的事件
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    SkillBegan {
        caster: EcsEntity,
        skill_id: String,
    },
    SkillRejected {
        caster: EcsEntity,
        skill_id: String,
        reason: RejectReason,
    },
    SkillEnded {
        caster: EcsEntity,
        skill_id: String,
        hits: usize,
    },
    ItemHit {
        item: ItemId,
        target: EcsEntity,
        outcome: CollisionOutcome,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RejectReason {
    /// 施法者已有技能在執行
    AlreadyCasting,
    UnknownSkill,
    /// 施法者不存在或不是戰鬥單位
    InvalidCaster,
}
