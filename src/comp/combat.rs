use skill_execution::{ExecutionId, SkillAbility};
use specs::storage::VecStorage;
use specs::Component;
use std::collections::BTreeMap;

/// 戰鬥單位組件
#[derive(Clone, Debug)]
pub struct CombatUnit {
    pub name: String,
    /// 目前正在執行的技能
    pub current_skill_execution: Option<ExecutionId>,
}

impl CombatUnit {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            current_skill_execution: None,
        }
    }
}

impl Component for CombatUnit {
    type Storage = VecStorage<Self>;
}

/// 技能書 - 單位已學會的技能
#[derive(Clone, Debug, Default)]
pub struct SkillBook {
    pub abilities: BTreeMap<String, SkillAbility>,
}

impl SkillBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn learn(&mut self, ability: SkillAbility) {
        self.abilities.insert(ability.id.clone(), ability);
    }

    pub fn get(&self, skill_id: &str) -> Option<&SkillAbility> {
        self.abilities.get(skill_id)
    }

    pub fn get_mut(&mut self, skill_id: &str) -> Option<&mut SkillAbility> {
        self.abilities.get_mut(skill_id)
    }

    pub fn skill_ids(&self) -> impl Iterator<Item = &str> {
        self.abilities.keys().map(String::as_str)
    }
}

impl Component for SkillBook {
    type Storage = VecStorage<Self>;
}
