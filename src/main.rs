use anyhow::{Context, Result};
use crossbeam_channel::{unbounded, Receiver};
use log::{info, warn, LevelFilter};
use log4rs::append::console::ConsoleAppender;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;
use skill_execution::SkillConfigManager;
use specs::Entity;
use std::io::{self, BufRead};
use std::thread;
use vek::Vec3;

use skill_sim::state::Clock;
use skill_sim::{SimSetting, SkillCast, State};

#[derive(Debug, Clone, PartialEq)]
enum Command {
    Cast(String),
    Quit,
}

fn parse_command(line: &str) -> Option<Command> {
    let mut words = line.split_whitespace();
    match words.next()? {
        "cast" => words.next().map(|id| Command::Cast(id.to_string())),
        "quit" | "exit" => Some(Command::Quit),
        _ => None,
    }
}

fn init_logging() -> Result<()> {
    if let Err(err) = log4rs::init_file("log4rs.yml", Default::default()) {
        let stdout = ConsoleAppender::builder()
            .encoder(Box::new(PatternEncoder::new("{d(%H:%M:%S%.3f)} {h({l})} {t} - {m}{n}")))
            .build();
        let config = Config::builder()
            .appender(Appender::builder().build("stdout", Box::new(stdout)))
            .build(Root::builder().appender("stdout").build(LevelFilter::Info))?;
        log4rs::init_config(config)?;
        warn!("無法載入 log4rs.yml ({})，改用主控台輸出", err);
    }
    Ok(())
}

fn spawn_stdin_reader() -> Receiver<String> {
    let (tx, rx) = unbounded();
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(_) => break,
            };
            if tx.send(line.trim().to_string()).is_err() {
                break;
            }
        }
    });
    rx
}

/// 施法者、目標與地點都固定的示範場景
struct Arena {
    caster: Entity,
    target: Entity,
    point: Vec3<f32>,
}

impl Arena {
    fn cast(&self, skill_id: &str) -> SkillCast {
        SkillCast::new(self.caster, skill_id)
            .with_target(self.target)
            .with_point(self.point)
    }
}

fn main() -> Result<()> {
    init_logging()?;

    let setting = SimSetting::load_or_default("game.toml");
    let mut skills = SkillConfigManager::new();
    let count = skills
        .load_from_file(&setting.skill_config)
        .with_context(|| format!("載入技能設定 {} 失敗", setting.skill_config))?;
    info!("載入 {} 個技能: {:?}", count, skills.skill_ids());

    let mut state = State::new(&setting);
    let abilities = skills
        .skill_ids()
        .into_iter()
        .filter_map(|id| skills.build_ability(id))
        .collect();
    let caster = state.spawn_unit("mage", Vec3::zero(), 0.0, abilities);
    let target = state.spawn_unit("dummy_front", Vec3::new(0.0, 0.0, 12.0), 180.0, Vec::new());
    let point = Vec3::new(6.0, 0.0, 6.0);
    state.spawn_unit("dummy_side", point, 225.0, Vec::new());
    let arena = Arena { caster, target, point };

    let rx = spawn_stdin_reader();
    let rotation: Vec<String> = skills.skill_ids().into_iter().map(String::from).collect();
    let mut next_auto = 0;
    let mut clock = Clock::new(setting.tick_duration());
    info!("輸入 `cast <技能>` 施法，`quit` 離開");

    'running: loop {
        for line in rx.try_iter() {
            match parse_command(&line) {
                Some(Command::Cast(skill_id)) => state.cast(arena.cast(&skill_id)),
                Some(Command::Quit) => break 'running,
                None => warn!("無法辨識的指令: {}", line),
            }
        }

        if let Some(limit) = setting.run_seconds {
            if state.get_time() >= limit {
                info!("模擬時間到，結束");
                break;
            }
            if !rotation.is_empty() && !state.is_casting(arena.caster) && state.active_executions() == 0 {
                state.cast(arena.cast(&rotation[next_auto % rotation.len()]));
                next_auto += 1;
            }
        }

        state.tick(clock.dt())?;
        for applied in state.take_applied_effects() {
            info!("{:?} 受到效果 {:?}", applied.target, applied.effects);
        }

        clock.tick();
    }

    Ok(())
}
