/// Skill Simulation Library
///
/// 以 specs ECS 承載技能執行核心的模擬宿主

pub mod comp;
pub mod config;
pub mod tick;
pub mod state;

// Re-export commonly used types
pub use crate::comp::*;
pub use crate::config::SimSetting;
pub use crate::state::State;
