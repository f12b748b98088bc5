/// 技能碰撞體移動策略
///
/// 策略只負責算位置並回報狀態，碰撞體何時銷毀由執行體決定

use specs::Entity;
use vek::Vec3;

use crate::execution::TIME_EPSILON;
use crate::host::WorldQuery;

/// 前向飛行距離
pub const FORWARD_FLY_DISTANCE: f32 = 30.0;
/// 前向飛行時間（秒）
pub const FORWARD_FLY_DURATION: f32 = 1.0;
/// 追蹤飛行預設速度（單位/秒）
pub const DEFAULT_HOMING_SPEED: f32 = 20.0;

/// 角度轉水平面方向向量，0 度為 +Z，90 度為 +X
pub fn direction_vector(direction_deg: f32) -> Vec3<f32> {
    let rad = direction_deg.to_radians();
    Vec3::new(rad.sin(), 0.0, rad.cos())
}

/// 前向飛行的總位移
pub fn forward_displacement(direction_deg: f32) -> Vec3<f32> {
    direction_vector(direction_deg) * FORWARD_FLY_DISTANCE
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionStatus {
    /// 還在移動
    Moving,
    /// 停在原地或已貼住目標
    Holding,
    /// 移動完成
    Finished,
    /// 追蹤目標已不存在
    Lost,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MotionStrategy {
    /// 持續追蹤目標
    Homing { target: Entity, speed: f32 },
    /// 在固定時間內直線移動到終點，進度以碰撞體存在時間計算
    Linear {
        origin: Vec3<f32>,
        destination: Vec3<f32>,
        duration: f32,
    },
    Stationary,
}

impl MotionStrategy {
    pub fn homing(target: Entity, speed: f32) -> Self {
        MotionStrategy::Homing { target, speed }
    }

    pub fn forward(origin: Vec3<f32>, direction_deg: f32) -> Self {
        MotionStrategy::Linear {
            origin,
            destination: origin + forward_displacement(direction_deg),
            duration: FORWARD_FLY_DURATION,
        }
    }

    /// 前進 `dt` 秒並更新位置，`age` 為生成至今的秒數
    pub fn step(&mut self, position: &mut Vec3<f32>, dt: f32, age: f64, world: &dyn WorldQuery) -> MotionStatus {
        match self {
            MotionStrategy::Homing { target, speed } => {
                let tpos = match world.position_of(*target) {
                    Some(p) => p,
                    None => return MotionStatus::Lost,
                };
                let offset = tpos - *position;
                let dis = offset.magnitude();
                let travel = *speed * dt;
                if travel >= dis {
                    *position = tpos;
                    MotionStatus::Holding
                } else {
                    *position += offset / dis * travel;
                    MotionStatus::Moving
                }
            }
            MotionStrategy::Linear {
                origin,
                destination,
                duration,
            } => {
                let duration = f64::from(*duration);
                if age + TIME_EPSILON >= duration {
                    *position = *destination;
                    return MotionStatus::Finished;
                }
                let t = (age.max(0.0) / duration) as f32;
                *position = *origin + (*destination - *origin) * t;
                MotionStatus::Moving
            }
            MotionStrategy::Stationary => MotionStatus::Holding,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use specs::{Builder, World, WorldExt};
    use std::collections::HashMap;

    struct Positions(HashMap<Entity, Vec3<f32>>);

    impl WorldQuery for Positions {
        fn position_of(&self, entity: Entity) -> Option<Vec3<f32>> {
            self.0.get(&entity).copied()
        }
    }

    fn close(a: Vec3<f32>, b: Vec3<f32>) -> bool {
        (a - b).magnitude() < 1e-4
    }

    #[test]
    fn test_forward_displacement_axes() {
        assert!(close(forward_displacement(0.0), Vec3::new(0.0, 0.0, 30.0)));
        assert!(close(forward_displacement(90.0), Vec3::new(30.0, 0.0, 0.0)));
        assert!(close(forward_displacement(180.0), Vec3::new(0.0, 0.0, -30.0)));
    }

    #[test]
    fn test_linear_motion_finishes_after_duration() {
        let empty = Positions(HashMap::new());
        let origin = Vec3::new(1.0, 2.0, 3.0);
        let mut motion = MotionStrategy::forward(origin, 90.0);
        let mut pos = origin;

        assert_eq!(motion.step(&mut pos, 0.5, 0.5, &empty), MotionStatus::Moving);
        assert!(close(pos, Vec3::new(16.0, 2.0, 3.0)));

        assert_eq!(motion.step(&mut pos, 0.75, 1.25, &empty), MotionStatus::Finished);
        // 不會超過終點，Y 不變
        assert!(close(pos, Vec3::new(31.0, 2.0, 3.0)));
    }

    #[test]
    fn test_linear_motion_uses_age_not_accumulated_steps() {
        let empty = Positions(HashMap::new());
        let mut motion = MotionStrategy::forward(Vec3::zero(), 0.0);
        let mut pos = Vec3::zero();

        // 30 TPS 累加的 f32 dt 會有誤差，進度只看存在時間
        let mut status = MotionStatus::Moving;
        let mut ticks = 0;
        while status == MotionStatus::Moving {
            ticks += 1;
            status = motion.step(&mut pos, 1.0 / 30.0, ticks as f64 / 30.0, &empty);
        }
        assert_eq!(ticks, 30);
        assert_eq!(status, MotionStatus::Finished);
        assert!(close(pos, Vec3::new(0.0, 0.0, 30.0)));
    }

    #[test]
    fn test_homing_follows_and_snaps_to_target() {
        let mut world = World::new();
        let target = world.create_entity().build();
        let mut positions = HashMap::new();
        positions.insert(target, Vec3::new(10.0, 0.0, 0.0));
        let positions = Positions(positions);

        let mut motion = MotionStrategy::homing(target, 4.0);
        let mut pos = Vec3::zero();
        assert_eq!(motion.step(&mut pos, 1.0, 1.0, &positions), MotionStatus::Moving);
        assert!(close(pos, Vec3::new(4.0, 0.0, 0.0)));

        assert_eq!(motion.step(&mut pos, 2.0, 3.0, &positions), MotionStatus::Holding);
        assert!(close(pos, Vec3::new(10.0, 0.0, 0.0)));
    }

    #[test]
    fn test_homing_reports_lost_target() {
        let mut world = World::new();
        let target = world.create_entity().build();
        let empty = Positions(HashMap::new());

        let mut motion = MotionStrategy::homing(target, 4.0);
        let mut pos = Vec3::zero();
        assert_eq!(motion.step(&mut pos, 1.0, 1.0, &empty), MotionStatus::Lost);
        assert_eq!(pos, Vec3::zero());
    }
}
