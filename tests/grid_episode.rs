use rdw::config::SimConfig;
use rdw::env::{Env, EnvError, EpisodeEnd, GridEnvironment};
use rdw::learner::RandomPolicy;
use rdw::strategy::{PlanningRedirector, TurnResetter};
use rdw::train::{TrainConfig, train};
use std::time::Duration;

fn seeded(seed: u64) -> SimConfig {
    SimConfig::from_json(&format!(r#"{{ "grid": {{ "seed": {seed}, "max_steps": 200 }} }}"#))
        .unwrap()
}

#[tokio::test]
async fn random_policy_sees_only_configured_rewards() {
    let mut env = GridEnvironment::new(seeded(7)).unwrap();
    let mut policy = RandomPolicy::new(env.parameters(), Some(7));
    let cfg = TrainConfig {
        max_episodes: 5,
        ..TrainConfig::default()
    };
    let mut trajectory = Vec::new();
    let stats = train(&mut env, &mut policy, &cfg, Some(&mut trajectory))
        .await
        .unwrap();

    assert_eq!(stats.total_episodes, 5);
    assert_eq!(stats.truncated, 5);
    assert_eq!(stats.total_steps, 1000);
    for step in &trajectory {
        assert!(step.obs < 16);
        let in_reset = step.info["in_reset"].as_bool().unwrap();
        if in_reset {
            assert_eq!(step.rew, -100.0);
        } else {
            assert!([0.0, -0.5, -1.0].contains(&step.rew));
        }
    }
    let total: f32 = stats.episodes.iter().map(|e| e.reward).sum();
    let recorded: f32 = trajectory.iter().map(|s| s.rew).sum();
    assert!((total - recorded).abs() < 1e-2);
}

#[test]
fn user_stays_near_the_room_under_resets() {
    let mut env = GridEnvironment::new(seeded(11)).unwrap();
    let limit = env.manager().geometry().half_extents();
    for _ in 0..200 {
        let (obs, _, _, _) = env.step(0).unwrap();
        assert!(obs < 16);
        let p = env.manager().current().real_pose.position;
        // a reset turns the user around before they can walk far past the walls
        assert!(p.x.abs() < limit.x + 1.0 && p.y.abs() < limit.y + 1.0);
    }
}

#[test]
fn terminate_on_reset_reports_out_of_bounds() {
    let mut config = seeded(3);
    config.grid.terminate_on_reset = true;
    config.grid.max_steps = 100_000;
    let mut env = GridEnvironment::new(config).unwrap();
    let end = loop {
        let (_, _, done, info) = env.step(0).unwrap();
        if done {
            break info.end;
        }
    };
    assert_eq!(end, Some(EpisodeEnd::OutOfBounds));
    assert!(matches!(env.step(0), Err(EnvError::NeedsReset)));
    env.reset().unwrap();
    assert!(!env.manager().in_reset());
}

#[test]
fn resize_rebinds_strategies() {
    let mut env = GridEnvironment::new(seeded(5)).unwrap();
    env.manager_mut().resize_room(20.0, 16.0).unwrap();
    let corners = env.manager().geometry().corners();
    assert!(corners.iter().all(|c| c.x.abs() == 10.0 && c.y.abs() == 8.0));
    assert!(env.manager_mut().resize_room(0.0, 5.0).is_err());
    assert_eq!(env.manager().geometry().width(), 20.0);
    env.step(0).unwrap();
}

#[tokio::test]
async fn planning_redirector_drives_the_environment() {
    let config = seeded(9);
    let redirector = PlanningRedirector::spawn(
        config.redirector.curvature_radius,
        Duration::from_millis(5),
    )
    .unwrap();
    let resetter = TurnResetter::new(config.resetter.boundary_buffer, config.resetter.turn_angle);
    let mut env =
        GridEnvironment::with_strategies(config, Box::new(redirector), Box::new(resetter)).unwrap();
    for _ in 0..50 {
        env.step(0).unwrap();
        tokio::task::yield_now().await;
    }
    assert_eq!(env.manager().redirector().name(), "planning");
    env.close().unwrap();
    assert_eq!(env.manager().redirector().name(), "null");
}
