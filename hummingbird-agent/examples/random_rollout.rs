//! Flies a random policy through a ring of flowers in the testbed world.
//!
//! ```text
//! cargo run --example random_rollout -- --episodes 3 --csv rollout.csv
//! ```
use anyhow::Result;
use clap::Parser;
use glam::Vec3;
use hummingbird_agent::{
    testbed::{
        FlowerSpec, KinematicWorld, KinematicWorldConfig, SphereCollider, StaticFlowerArea,
        StaticFlowerAreaConfig,
    },
    AgentConfig, FlowerEnv, FlowerEnvConfig, RandomPolicy, RandomPolicyConfig,
};
use hummingbird_core::{
    record::{BufferedRecorder, Record},
    util, Configurable, Env as _,
};
use log::info;
use serde::Serialize;
use std::{convert::TryFrom, fs::File, path::PathBuf};

type Env = FlowerEnv<KinematicWorld, StaticFlowerArea>;

#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Number of episodes.
    #[arg(long, default_value_t = 3)]
    episodes: usize,

    /// Episode length.
    #[arg(long, default_value_t = 300)]
    max_steps: usize,

    /// Seed of the policy.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Agent configuration in YAML. Overrides `--max-steps`.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Writes per-step records to this CSV file.
    #[arg(long)]
    csv: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct RolloutRecord {
    episode: usize,
    step: usize,
    reward: f32,
    nectar_obtained: f32,
    distance_to_target: Option<f32>,
}

impl TryFrom<&Record> for RolloutRecord {
    type Error = anyhow::Error;

    fn try_from(record: &Record) -> Result<Self> {
        Ok(Self {
            episode: record.get_scalar("episode")? as _,
            step: record.get_scalar("step")? as _,
            reward: record.get_scalar("reward")?,
            nectar_obtained: record.get_scalar("nectar_obtained")?,
            distance_to_target: record.get_scalar("distance_to_target").ok(),
        })
    }
}

/// Eight flowers on a circle, opening outwards and slightly up, each on a stem.
fn flower_ring() -> (Vec<FlowerSpec>, Vec<SphereCollider>) {
    (0..8)
        .map(|i| {
            let a = i as f32 * std::f32::consts::TAU / 8.0;
            let outwards = Vec3::new(a.cos(), 0.0, a.sin());
            let position = outwards * 4.0 + Vec3::Y * 1.5;
            let flower = FlowerSpec {
                position,
                up: outwards + Vec3::Y * 0.5,
            };
            let stem = SphereCollider {
                center: position - Vec3::Y * 0.3,
                radius: 0.2,
            };
            (flower, stem)
        })
        .unzip()
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let agent = match &args.config {
        Some(path) => AgentConfig::load(path)?,
        None => AgentConfig::default()
            .training_mode(true)
            .max_steps(args.max_steps),
    };
    if !agent.training_mode {
        anyhow::bail!("Episodes only end by the step cap, which requires training mode");
    }
    let (flowers, obstacles) = flower_ring();
    let env_config = FlowerEnvConfig {
        agent,
        world: KinematicWorldConfig {
            obstacles,
            ..KinematicWorldConfig::default()
        },
        area: StaticFlowerAreaConfig {
            flowers,
            ..StaticFlowerAreaConfig::default()
        },
    };

    let mut env = Env::build(&env_config, args.seed)?;
    let mut policy =
        <RandomPolicy as Configurable<Env>>::build(RandomPolicyConfig { seed: args.seed });
    let mut recorder = BufferedRecorder::new();

    let returns = util::eval_with_recorder(&mut env, &mut policy, args.episodes, &mut recorder)?;
    info!("Returns = {:?}", returns);

    if let Some(path) = &args.csv {
        let mut wtr = csv::Writer::from_writer(File::create(path)?);
        for record in recorder.iter() {
            wtr.serialize(RolloutRecord::try_from(record)?)?;
        }
        wtr.flush()?;
        info!("Wrote {} records to {:?}", recorder.len(), path);
    }

    Ok(())
}

#[test]
fn test_flower_ring_is_spawnable() -> Result<()> {
    let (flowers, obstacles) = flower_ring();
    let env_config = FlowerEnvConfig {
        agent: AgentConfig::default().training_mode(true).max_steps(10),
        world: KinematicWorldConfig {
            obstacles,
            ..KinematicWorldConfig::default()
        },
        area: StaticFlowerAreaConfig {
            flowers,
            ..StaticFlowerAreaConfig::default()
        },
    };
    let mut env = Env::build(&env_config, 0)?;
    for ix in 0..10 {
        env.reset_with_index(ix)?;
    }
    Ok(())
}
