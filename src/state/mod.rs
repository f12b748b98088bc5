/// 模擬狀態管理模塊
///
/// 負責 ECS 世界、系統分派與時間循環

pub mod core;
pub mod initialization;
pub mod time_management;
pub mod system_dispatcher;

pub use self::core::State;
pub use self::initialization::StateInitializer;
pub use self::time_management::{Clock, TimeManager};
pub use self::system_dispatcher::SystemDispatcher;
