/// ECS 系統包裝
///
/// 每個 tick 系統實作這裡的 `System`，以 `Job` 包起來交給 specs 分派，
/// 註冊名稱固定為 `{NAME}_sys`

use specs::{DispatcherBuilder, SystemData};

pub trait System<'a>: Sized {
    const NAME: &'static str;
    type SystemData: SystemData<'a>;

    fn run(job: &mut Job<Self>, data: Self::SystemData);
}

#[derive(Default)]
pub struct Job<S> {
    pub own: S,
}

impl<'a, S: System<'a>> specs::System<'a> for Job<S> {
    type SystemData = S::SystemData;

    fn run(&mut self, data: Self::SystemData) {
        S::run(self, data);
    }
}

pub fn sys_name<'a, S: System<'a>>() -> String {
    format!("{}_sys", S::NAME)
}

pub fn dispatch<'b, S>(builder: &mut DispatcherBuilder<'static, 'b>, deps: &[&str])
where
    S: for<'a> System<'a> + Default + Send + 'static,
{
    let name = sys_name::<S>();
    builder.add(Job::<S>::default(), &name, deps);
}
