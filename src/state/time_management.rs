/// 時間管理器 - 負責模擬時間與固定頻率循環

use std::time::{Duration, Instant};
use specs::{World, WorldExt};

use crate::comp::Time;

/// 時間管理器
pub struct TimeManager {
    /// 最大增量時間
    max_delta_time: f32,
}

impl TimeManager {
    pub fn new() -> Self {
        Self { max_delta_time: 1.0 }
    }

    /// 更新時間資源
    pub fn update(&self, world: &mut World, dt: Duration) {
        let dt = dt.as_secs_f64().min(f64::from(self.max_delta_time));
        world.write_resource::<Time>().0 += dt;
    }
}

impl Default for TimeManager {
    fn default() -> Self {
        Self::new()
    }
}

/// 固定頻率時鐘
pub struct Clock {
    target_dt: Duration,
    last_tick: Instant,
    last_dt: Duration,
}

impl Clock {
    pub fn new(target_dt: Duration) -> Self {
        Self {
            target_dt,
            last_tick: Instant::now(),
            last_dt: target_dt,
        }
    }

    /// 上一幀實際經過的時間
    pub fn dt(&self) -> Duration {
        self.last_dt
    }

    /// 睡到下一幀
    pub fn tick(&mut self) {
        let busy = self.last_tick.elapsed();
        if busy < self.target_dt {
            spin_sleep::sleep(self.target_dt - busy);
        } else {
            log::debug!("模擬落後 {:?}", busy - self.target_dt);
        }
        let now = Instant::now();
        self.last_dt = now.duration_since(self.last_tick);
        self.last_tick = now;
    }
}
