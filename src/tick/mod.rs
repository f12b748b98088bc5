pub mod skill_execution_tick;
pub mod collision_tick;

pub use self::skill_execution_tick::PosLookup;
