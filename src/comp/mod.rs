pub mod phys;
pub mod combat;
pub mod resources;
pub mod outcome;
pub mod scene;
pub mod ecs;

pub use self::{
    phys::*,
    combat::*,
    resources::*,
    outcome::*,
    scene::*,
    ecs::*,
};
