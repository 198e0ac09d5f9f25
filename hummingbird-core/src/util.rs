//! Utilities for interaction of agents and environments.
use crate::{
    record::{RecordValue, Recorder},
    Env, Policy,
};
use anyhow::Result;
use log::info;

/// Run episodes with a policy and recorder, returning the return of each episode.
///
/// Every step is written to `recorder` together with its reward, episode and
/// step index. An episode ends when the environment reports termination or
/// truncation, so environments without a step cap must terminate by themselves.
pub fn eval_with_recorder<E, P, R>(
    env: &mut E,
    policy: &mut P,
    n_episodes: usize,
    recorder: &mut R,
) -> Result<Vec<f32>>
where
    E: Env,
    P: Policy<E>,
    R: Recorder,
{
    let mut rs = Vec::new();

    for episode in 0..n_episodes {
        let mut prev_obs = env.reset_with_index(episode)?;
        let mut count_step = 0;
        let mut r_total = 0.0;

        loop {
            let act = policy.sample(&prev_obs);
            let (step, mut record) = env.step(&act);
            r_total += step.reward;

            record.insert("reward", RecordValue::Scalar(step.reward));
            record.insert("episode", RecordValue::Scalar(episode as _));
            record.insert("step", RecordValue::Scalar(count_step as _));
            recorder.write(record);

            if step.is_done() {
                break;
            }
            prev_obs = step.obs;
            count_step += 1;
        }
        info!(
            "Episode {:?}, {:?} steps, return = {:?}",
            episode, count_step, r_total
        );
        rs.push(r_total);
    }

    Ok(rs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        record::{BufferedRecorder, NullRecorder, Record},
        Act, Configurable, Obs, Step,
    };
    use serde::Deserialize;
    use tempdir::TempDir;

    #[derive(Clone, Debug)]
    struct CountObs(usize);

    impl Obs for CountObs {
        fn dummy() -> Self {
            CountObs(0)
        }

        fn len(&self) -> usize {
            1
        }
    }

    #[derive(Clone, Debug)]
    struct UnitAct;

    impl Act for UnitAct {
        fn len(&self) -> usize {
            1
        }
    }

    /// Episodes last `horizon` steps and pay 1.0 per step.
    struct CountdownEnv {
        horizon: usize,
        t: usize,
    }

    impl Env for CountdownEnv {
        type Config = usize;
        type Obs = CountObs;
        type Act = UnitAct;
        type Info = ();

        fn build(config: &Self::Config, _seed: u64) -> Result<Self> {
            Ok(Self {
                horizon: *config,
                t: 0,
            })
        }

        fn step(&mut self, a: &Self::Act) -> (Step<Self>, Record) {
            self.t += 1;
            let done = self.t >= self.horizon;
            let step = Step::new(CountObs(self.t), a.clone(), 1.0, false, done, ());
            (step, Record::empty())
        }

        fn reset(&mut self) -> Result<Self::Obs> {
            self.t = 0;
            Ok(CountObs(0))
        }

        fn reset_with_index(&mut self, _ix: usize) -> Result<Self::Obs> {
            self.reset()
        }
    }

    struct ConstPolicy;

    impl Policy<CountdownEnv> for ConstPolicy {
        fn sample(&mut self, _obs: &CountObs) -> UnitAct {
            UnitAct
        }
    }

    #[derive(Clone, Debug, Deserialize)]
    struct ConstPolicyConfig {
        label: String,
    }

    impl Configurable<CountdownEnv> for ConstPolicy {
        type Config = ConstPolicyConfig;

        fn build(config: Self::Config) -> Self {
            assert_eq!(config.label, "const");
            ConstPolicy
        }
    }

    #[test]
    fn test_build_from_path() -> Result<()> {
        let dir = TempDir::new("hummingbird_core")?;
        let path = dir.path().join("policy.yaml");
        std::fs::write(&path, "label: const\n")?;
        let mut policy =
            <ConstPolicy as Configurable<CountdownEnv>>::build_from_path(&path)?;
        let mut env = CountdownEnv::build(&2, 0)?;
        let returns =
            eval_with_recorder(&mut env, &mut policy, 1, &mut NullRecorder {})?;
        assert_eq!(returns, vec![2.0]);

        let missing = dir.path().join("missing.yaml");
        assert!(<ConstPolicy as Configurable<CountdownEnv>>::build_from_path(&missing).is_err());
        Ok(())
    }

    #[test]
    fn test_eval_with_recorder() -> Result<()> {
        let mut env = CountdownEnv::build(&3, 0)?;
        let mut recorder = BufferedRecorder::new();
        let returns = eval_with_recorder(&mut env, &mut ConstPolicy, 2, &mut recorder)?;

        assert_eq!(returns, vec![3.0, 3.0]);
        assert_eq!(recorder.len(), 6);
        let last = recorder.iter().last().unwrap();
        assert_eq!(last.get_scalar("episode")?, 1.0);
        assert_eq!(last.get_scalar("step")?, 2.0);
        Ok(())
    }

    #[test]
    fn test_step_with_reset_fills_init_obs() -> Result<()> {
        let mut env = CountdownEnv::build(&1, 0)?;
        env.reset()?;
        let (step, _) = env.step_with_reset(&UnitAct)?;
        assert!(step.is_done());
        assert_eq!(step.init_obs.0, 0);
        assert_eq!(env.t, 0);
        Ok(())
    }
}
