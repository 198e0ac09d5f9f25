use anyhow::Result;
use glam::Vec3;
use hummingbird_agent::{
    controller::EpisodePhase,
    pose::quat_to_pitch_yaw,
    testbed::{
        FlowerSpec, KinematicWorld, KinematicWorldConfig, SphereCollider, StaticFlowerArea,
        StaticFlowerAreaConfig,
    },
    AgentConfig, AgentController, AgentError, FlowerAct, FlowerArea, FlowerId, OverlapQuery,
    PhysicsWorld, PlacementConfig, PlacementMode, RigidBody,
};

type Controller = AgentController<KinematicWorld, StaticFlowerArea>;

fn area_config(flowers: &[(Vec3, Vec3)]) -> StaticFlowerAreaConfig {
    StaticFlowerAreaConfig {
        flowers: flowers
            .iter()
            .map(|&(position, up)| FlowerSpec { position, up })
            .collect(),
        ..StaticFlowerAreaConfig::default()
    }
}

fn controller(config: AgentConfig, flowers: &[(Vec3, Vec3)]) -> Result<Controller> {
    let world = KinematicWorld::build(&KinematicWorldConfig::default())?;
    let area = StaticFlowerArea::build(&area_config(flowers), 0)?;
    Ok(AgentController::initialize(config, world, area, 42))
}

/// One flower facing +Z; the agent spawns `distance` in front of it.
fn facing_flower(config: AgentConfig, distance: f32) -> Result<Controller> {
    let config = config.placement(PlacementConfig {
        in_front_distance: [distance, distance],
        ..PlacementConfig::default()
    });
    let mut c = controller(config, &[(Vec3::new(0.0, 1.0, 0.0), Vec3::Z)])?;
    c.reset_episode()?;
    Ok(c)
}

#[test]
fn test_feeding_the_only_flower_empty_clears_target() -> Result<()> {
    let mut c = facing_flower(AgentConfig::default(), 5.0)?;
    assert_eq!(c.phase(), EpisodePhase::Active);
    assert_eq!(c.target(), Some(FlowerId(0)));
    let d = c.distance_to_target().unwrap();
    assert!((d - (5.0 - 0.02 - 0.1)).abs() < 1e-4);

    let obs = c.collect_observation();
    assert!((obs.0[7] - 1.0).abs() < 1e-5);
    assert!((obs.0[8] - 1.0).abs() < 1e-5);

    for _ in 0..10 {
        c.step(&FlowerAct::default());
        let _ = c.advance_physics();
        c.fixed_update();
        assert_eq!(c.target(), Some(FlowerId(0)));
    }

    let mut contacts = 0;
    while c.target().is_some() && contacts < 200 {
        let beak_tip = c.beak_tip();
        c.on_nectar_contact(FlowerId(0), beak_tip);
        contacts += 1;
    }
    assert!(contacts >= 100 && contacts < 200);
    assert_eq!(c.target(), None);
    assert!((c.nectar_obtained() - 1.0).abs() < 1e-3);
    assert!(c.collect_observation().is_zero());
    Ok(())
}

#[test]
fn test_contact_away_from_beak_tip_is_ignored() -> Result<()> {
    let mut c = facing_flower(AgentConfig::default().training_mode(true), 5.0)?;
    let off = c.beak_tip() + Vec3::Y * 0.01;
    assert_eq!(c.on_nectar_contact(FlowerId(0), off), None);
    assert_eq!(c.nectar_obtained(), 0.0);
    assert_eq!(c.take_reward(), 0.0);
    Ok(())
}

#[test]
fn test_nectar_reward_in_training_only() -> Result<()> {
    let mut c = facing_flower(
        AgentConfig::default()
            .training_mode(true)
            .in_front_probability(1.0),
        5.0,
    )?;
    let tip = c.beak_tip();
    let r = c.on_nectar_contact(FlowerId(0), tip).unwrap();
    assert!((r - 0.07).abs() < 1e-5);
    assert!((c.take_reward() - 0.07).abs() < 1e-5);
    assert_eq!(c.take_reward(), 0.0);
    assert_eq!(c.on_boundary_contact(), Some(-0.5));

    let mut c = facing_flower(AgentConfig::default(), 5.0)?;
    let tip = c.beak_tip();
    assert_eq!(c.on_nectar_contact(FlowerId(0), tip), None);
    assert!((c.nectar_obtained() - 0.01).abs() < 1e-6);
    assert_eq!(c.on_boundary_contact(), None);
    assert_eq!(c.take_reward(), 0.0);
    Ok(())
}

#[test]
fn test_no_reward_from_empty_flower() -> Result<()> {
    let mut c = facing_flower(AgentConfig::default().training_mode(true), 5.0)?;
    c.area_mut().set_nectar(FlowerId(0), 0.0);
    let tip = c.beak_tip();
    assert_eq!(c.on_nectar_contact(FlowerId(0), tip), None);
    assert_eq!(c.target(), None);
    Ok(())
}

#[test]
fn test_depleted_target_is_replaced_by_fixed_update() -> Result<()> {
    let config = AgentConfig::default().placement(PlacementConfig {
        in_front_distance: [1.0, 1.0],
        ..PlacementConfig::default()
    });
    // Spawning 1.0 in front of either flower makes that flower the target.
    let mut c = controller(
        config,
        &[
            (Vec3::new(0.0, 1.0, 0.0), Vec3::Z),
            (Vec3::new(3.0, 1.0, 0.0), Vec3::Z),
        ],
    )?;
    c.reset_episode()?;
    let first = c.target().unwrap();
    let other = if first == FlowerId(0) { FlowerId(1) } else { FlowerId(0) };

    // Depletion by someone else is noticed on the next physics step.
    c.area_mut().set_nectar(first, 0.0);
    assert_eq!(c.target(), Some(first));
    c.fixed_update();
    assert_eq!(c.target(), Some(other));
    Ok(())
}

#[test]
fn test_yaw_is_smoothed_and_pitch_is_clamped() -> Result<()> {
    let mut c = facing_flower(AgentConfig::default(), 5.0)?;
    let (_, yaw0) = quat_to_pitch_yaw(c.world().orientation());

    // The smoothed intent ramps by 0.04 per step: 0.04 + 0.08 + ... + 0.4 = 2.2,
    // times yaw speed 100 and dt 0.02 gives 4.4 degrees.
    let act = FlowerAct::new(Vec3::ZERO, 0.0, 1.0);
    for _ in 0..10 {
        c.step(&act);
    }
    let (pitch, yaw) = quat_to_pitch_yaw(c.world().orientation());
    assert!((yaw - yaw0 - 4.4).abs() < 1e-2);
    assert!(pitch.abs() < 1e-3);
    assert!((c.state().smooth_yaw.value() - 0.4).abs() < 1e-5);

    let act = FlowerAct::new(Vec3::ZERO, 1.0, 0.0);
    for _ in 0..200 {
        c.step(&act);
        let (pitch, _) = quat_to_pitch_yaw(c.world().orientation());
        assert!(pitch <= 80.0 + 1e-3);
    }
    let (pitch, _) = quat_to_pitch_yaw(c.world().orientation());
    assert!((pitch - 80.0).abs() < 1e-2);
    Ok(())
}

#[test]
fn test_move_applies_force() -> Result<()> {
    let mut c = facing_flower(AgentConfig::default(), 5.0)?;
    let p0 = c.world().position();
    c.step(&FlowerAct::new(Vec3::new(0.0, 1.0, 0.0), 0.0, 0.0));
    let _ = c.advance_physics();
    assert!(c.world().position().y > p0.y);
    assert!(c.world().velocity().y > 0.0);
    Ok(())
}

#[test]
fn test_frozen_agent_ignores_actions() -> Result<()> {
    let mut c = facing_flower(AgentConfig::default(), 5.0)?;
    let pose = c.world().pose();
    c.freeze();
    assert!(c.is_frozen());
    assert!(c.world().is_asleep());

    for _ in 0..5 {
        c.step(&FlowerAct([1.0, 1.0, 1.0, 1.0, 1.0]));
        let _ = c.advance_physics();
    }
    assert_eq!(c.world().pose(), pose);
    assert_eq!(c.state().step_count, 0);

    c.unfreeze();
    assert!(!c.is_frozen());
    assert!(!c.world().is_asleep());
    c.step(&FlowerAct([1.0, 1.0, 1.0, 1.0, 1.0]));
    assert_ne!(c.world().pose(), pose);
    Ok(())
}

#[test]
#[should_panic(expected = "Freeze/Unfreeze not supported in training")]
fn test_freeze_in_training_panics() {
    let mut c = facing_flower(AgentConfig::default().training_mode(true), 5.0).unwrap();
    c.freeze();
}

#[test]
#[should_panic(expected = "Freeze/Unfreeze not supported in training")]
fn test_unfreeze_in_training_panics() {
    let mut c = facing_flower(AgentConfig::default().training_mode(true), 5.0).unwrap();
    c.unfreeze();
}

#[test]
fn test_reset_without_safe_spawn_fails() -> Result<()> {
    let world_config = KinematicWorldConfig {
        obstacles: vec![SphereCollider {
            center: Vec3::ZERO,
            radius: 100.0,
        }],
        ..KinematicWorldConfig::default()
    };
    let world = KinematicWorld::build(&world_config)?;
    let area = StaticFlowerArea::build(&area_config(&[(Vec3::new(0.0, 1.0, 0.0), Vec3::Z)]), 0)?;
    let mut c = AgentController::initialize(AgentConfig::default(), world, area, 0);
    let p0 = c.world().position();

    assert_eq!(
        c.reset_episode(),
        Err(AgentError::NoSafePosition { attempts: 100 })
    );
    assert_eq!(c.world().position(), p0);
    assert_eq!(c.phase(), EpisodePhase::Uninitialized);

    // Actions are not applied without an episode.
    c.step(&FlowerAct([1.0; 5]));
    assert_eq!(c.state().step_count, 0);
    assert_eq!(c.spawn_mode(), None);
    Ok(())
}

#[test]
fn test_contacts_before_reset_are_ignored() -> Result<()> {
    let mut c = controller(
        AgentConfig::default().training_mode(true),
        &[(Vec3::new(0.0, 1.0, 0.0), Vec3::Z)],
    )?;
    assert_eq!(c.phase(), EpisodePhase::Uninitialized);

    let tip = c.beak_tip();
    assert_eq!(c.on_nectar_contact(FlowerId(0), tip), None);
    assert_eq!(c.on_boundary_contact(), None);
    assert_eq!(c.nectar_obtained(), 0.0);
    assert_eq!(c.area().flower(FlowerId(0)).unwrap().nectar, 1.0);
    assert_eq!(c.take_reward(), 0.0);
    Ok(())
}

#[test]
fn test_spawn_mode_share() -> Result<()> {
    let flowers = [(Vec3::new(0.0, 1.0, 0.0), Vec3::Z)];

    let mut c = controller(AgentConfig::default().training_mode(true), &flowers)?;
    let n = 1000;
    let mut in_front = 0;
    for _ in 0..n {
        c.reset_episode()?;
        match c.spawn_mode() {
            Some(PlacementMode::InFrontOfFlower) => in_front += 1,
            Some(PlacementMode::FreeFloating) => {}
            None => panic!("no spawn mode after a successful reset"),
        }
    }
    let share = in_front as f32 / n as f32;
    assert!(share > 0.85 && share < 0.95, "in-front share {}", share);

    let mut c = controller(AgentConfig::default(), &flowers)?;
    for _ in 0..300 {
        c.reset_episode()?;
        assert_eq!(c.spawn_mode(), Some(PlacementMode::InFrontOfFlower));
        let d = c.world().position().distance(Vec3::new(0.0, 1.0, 0.0));
        assert!(d <= c.config().placement.in_front_distance[1] + 1e-5);
    }
    Ok(())
}

#[test]
fn test_reset_twice_is_equivalent() -> Result<()> {
    let flowers = [
        (Vec3::new(-2.0, 1.0, 0.0), Vec3::Z),
        (Vec3::new(2.0, 1.0, 0.0), Vec3::X),
        (Vec3::new(0.0, 1.0, 3.0), Vec3::new(0.0, 1.0, -1.0)),
    ];
    let mut c = controller(AgentConfig::default().training_mode(true), &flowers)?;
    c.reset_episode()?;
    let first = c.state().clone();
    c.reset_episode()?;
    let second = c.state().clone();

    assert_eq!(first.nectar_obtained, second.nectar_obtained);
    assert_eq!(first.step_count, second.step_count);
    assert_eq!(first.frozen, second.frozen);
    assert_eq!(first.smooth_pitch, second.smooth_pitch);
    assert_eq!(first.smooth_yaw, second.smooth_yaw);
    assert!(second.target.is_some());
    assert_eq!(
        c.world().overlap_count(c.world().position(), c.config().placement.probe_radius),
        0
    );
    Ok(())
}

#[test]
fn test_training_step_cap_terminates() -> Result<()> {
    let mut c = facing_flower(AgentConfig::default().training_mode(true).max_steps(3), 5.0)?;
    for _ in 0..3 {
        assert!(!c.is_terminated());
        c.step(&FlowerAct::default());
    }
    assert!(c.is_terminated());
    c.reset_episode()?;
    assert_eq!(c.phase(), EpisodePhase::Active);
    assert_eq!(c.state().step_count, 0);
    Ok(())
}

#[test]
fn test_training_reset_refills_flowers() -> Result<()> {
    let mut c = facing_flower(AgentConfig::default().training_mode(true), 5.0)?;
    c.area_mut().set_nectar(FlowerId(0), 0.0);
    c.reset_episode()?;
    assert_eq!(c.area().flower(FlowerId(0)).unwrap().nectar, 1.0);
    assert_eq!(c.target(), Some(FlowerId(0)));

    let mut c = facing_flower(AgentConfig::default(), 5.0)?;
    c.area_mut().set_nectar(FlowerId(0), 0.0);
    c.reset_episode()?;
    assert_eq!(c.area().flower(FlowerId(0)).unwrap().nectar, 0.0);
    assert_eq!(c.target(), None);
    assert!(c.collect_observation().is_zero());
    Ok(())
}
