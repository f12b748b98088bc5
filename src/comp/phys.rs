use serde::{Deserialize, Serialize};
use skill_execution::BodyHandle;
use specs::{Component, VecStorage};
use vek::*;

/// Position
#[derive(Copy, Clone, Default, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pos(pub Vec3<f32>);

impl Component for Pos {
    type Storage = VecStorage<Self>;
}

/// 朝向，角度制，0 度朝向 +Z
#[derive(Copy, Clone, Default, Debug, PartialEq, Serialize, Deserialize)]
pub struct Facing(pub f32);

impl Component for Facing {
    type Storage = VecStorage<Self>;
}

/// 物理身體，碰撞判定用的圓柱半徑
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub handle: BodyHandle,
    pub radius: f32,
}

impl Component for Body {
    type Storage = VecStorage<Self>;
}
