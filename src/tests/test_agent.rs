use ndarray::array;
use crate::agent::{Agent, EpisodeState, ExperienceStore};
use crate::builders::AgentBuilder;
use crate::config::{AgentConfig, CountBonusConfig, UncertaintyBonus};
use crate::error::CurioError;
use crate::metrics::MetricsTracker;
use crate::replay_memory::ReplayMemory;
use crate::shaping::uncertainty_bonus;
use crate::types::{ActionMode, Observation, UncertaintySource};
use super::mocks::{frame, frame_value, BrokenSummary, MockOracle, ScriptedEnv};

type TestAgent = Agent<ScriptedEnv, MockOracle, ReplayMemory, MetricsTracker>;

fn base_config() -> AgentConfig {
    AgentConfig {
        initial_exploration: 1.0,
        final_exploration: 0.1,
        final_exploration_frame: 100,
        reward_clipping: None,
        replay_start_size: 10,
        ..AgentConfig::default()
    }
}

fn build(config: AgentConfig, env: ScriptedEnv) -> TestAgent {
    AgentBuilder::new(env, MockOracle::new(), ReplayMemory::new(1000))
        .config(config)
        .summary(MetricsTracker::default())
        .seed(11)
        .build()
        .unwrap()
}

#[test]
fn test_new_game_registers_episode() {
    let mut agent = build(base_config(), ScriptedEnv::new(3, 5, 1.0));
    assert_eq!(agent.state(), EpisodeState::NoEpisode);

    let outcome = agent.new_game().unwrap();
    assert_eq!(outcome.observation, frame(0));
    assert!(!outcome.done);

    assert_eq!(agent.state(), EpisodeState::Active);
    assert_eq!(agent.oracle().heads_sampled, 1);
    assert_eq!(agent.environment().resets, 1);
    assert_eq!(agent.memory().episodes(), 1);
    assert_eq!(agent.memory().len(), 0);
    assert_eq!(agent.observation(), Some(&frame(0)));
}

#[test]
fn test_take_action_requires_episode() {
    let mut agent = build(base_config(), ScriptedEnv::new(3, 5, 1.0));
    let err = agent.take_action(0).unwrap_err();
    assert!(matches!(err, CurioError::EpisodeState(_)));
    assert_eq!(agent.environment().total_steps, 0);
}

#[test]
fn test_one_transition_per_step() {
    let mut agent = build(base_config(), ScriptedEnv::new(3, 5, 1.0));
    agent.new_game().unwrap();

    for expected in 1..=5 {
        let outcome = agent.take_action(2).unwrap();
        assert_eq!(outcome.observation, frame(expected));
        assert_eq!(agent.memory().len(), expected);
        assert_eq!(agent.frame(), expected);
    }

    let last = agent.memory().iter().last().unwrap();
    assert!(last.done);
    assert_eq!(last.state, frame(4));
    assert_eq!(last.next_state, frame(5));
    assert_eq!(last.action, 2);
}

#[test]
fn test_done_requires_new_game() {
    let mut agent = build(base_config(), ScriptedEnv::new(3, 2, 1.0));
    agent.new_game().unwrap();
    agent.take_action(0).unwrap();
    assert!(agent.take_action(0).unwrap().done);
    assert_eq!(agent.state(), EpisodeState::Done);

    let err = agent.take_action(0).unwrap_err();
    assert!(matches!(err, CurioError::EpisodeState(_)));
    assert_eq!(agent.memory().len(), 2);

    agent.new_game().unwrap();
    assert_eq!(agent.state(), EpisodeState::Active);
    assert_eq!(agent.frame(), 0);
}

#[test]
fn test_raw_reward_returned_clipped_reward_stored() {
    let config = AgentConfig {
        reward_clipping: Some(1.0),
        ..base_config()
    };
    let mut agent = build(config, ScriptedEnv::new(3, 5, 5.0));
    agent.new_game().unwrap();

    let outcome = agent.take_action(0).unwrap();
    assert_eq!(outcome.reward, 5.0);
    assert_eq!(agent.memory().iter().last().unwrap().reward, 1.0);
}

#[test]
fn test_negative_reward_clipped() {
    let config = AgentConfig {
        reward_clipping: Some(1.0),
        ..base_config()
    };
    let mut agent = build(config, ScriptedEnv::new(3, 5, -5.0));
    agent.new_game().unwrap();
    agent.take_action(0).unwrap();
    assert_eq!(agent.memory().iter().last().unwrap().reward, -1.0);
}

#[test]
fn test_populate_finishes_last_episode() {
    // 10 transitions requested, episodes of 4: the third episode runs to 12
    let mut agent = build(base_config(), ScriptedEnv::new(3, 4, 0.0));
    let count = agent.populate_replay_memory().unwrap();

    assert_eq!(count, 12);
    assert_eq!(agent.memory().len(), 12);
    assert_eq!(agent.memory().episodes(), 3);
    assert!(agent.memory().iter().last().unwrap().done);
    assert_eq!(agent.state(), EpisodeState::Done);
    assert_eq!(agent.environment().episode, 0);
    assert_eq!(agent.oracle().inference_calls, 0);
    assert_eq!(agent.oracle().heads_sampled, 3);
}

#[test]
fn test_populate_exact_boundary() {
    let mut agent = build(base_config(), ScriptedEnv::new(3, 5, 0.0));
    assert_eq!(agent.populate_replay_memory().unwrap(), 10);
    assert_eq!(agent.memory().episodes(), 2);
}

#[test]
fn test_populate_uses_placeholder_uncertainty() {
    let config = AgentConfig {
        uncertainty_bonus: UncertaintyBonus::ActionValue,
        exploration_beta: 1.0,
        ..base_config()
    };
    let mut agent = build(config, ScriptedEnv::new(3, 5, 0.0));
    agent.populate_replay_memory().unwrap();

    let expected = uncertainty_bonus(1.0, 0.5);
    for experience in agent.memory().iter() {
        assert!((experience.reward - expected).abs() < 1e-6);
    }
    assert_eq!(agent.oracle().inference_calls, 0);
}

#[test]
fn test_action_value_bonus_queries_previous_observation() {
    let config = AgentConfig {
        uncertainty_bonus: UncertaintyBonus::ActionValue,
        exploration_beta: 1.0,
        ..base_config()
    };
    let mut agent = build(config, ScriptedEnv::new(3, 5, 0.0));
    agent.oracle_mut().action_uncertainty = 1.0;
    agent.new_game().unwrap();
    agent.take_action(2).unwrap();
    agent.take_action(1).unwrap();

    let queries = &agent.oracle().action_queries;
    assert_eq!(queries.len(), 2);
    assert_eq!(queries[0], (frame_value(0), 2));
    assert_eq!(queries[1], (frame_value(1), 1));

    // -ln(1) = 0 hits the 0.01 floor
    let reward = agent.memory().iter().last().unwrap().reward;
    assert!((reward - 10.0).abs() < 1e-4);
}

#[test]
fn test_state_value_bonus_negates_estimate() {
    let config = AgentConfig {
        uncertainty_bonus: UncertaintyBonus::StateValue,
        exploration_beta: 1.0,
        ..base_config()
    };
    let mut agent = build(config, ScriptedEnv::new(3, 5, 0.0));
    agent.oracle_mut().state_uncertainty = -0.5;
    agent.new_game().unwrap();
    agent.take_action(0).unwrap();

    // Queried on the resulting observation
    assert_eq!(agent.oracle().state_queries, vec![frame_value(1)]);
    let reward = agent.memory().iter().last().unwrap().reward;
    assert!((reward - uncertainty_bonus(1.0, 0.5)).abs() < 1e-6);
}

#[test]
fn test_state_value_sign_error_aborts_episode() {
    let config = AgentConfig {
        uncertainty_bonus: UncertaintyBonus::StateValue,
        exploration_beta: 1.0,
        ..base_config()
    };
    let mut agent = build(config, ScriptedEnv::new(3, 5, 0.0));
    agent.oracle_mut().state_uncertainty = 0.5;
    agent.new_game().unwrap();

    let err = agent.take_action(0).unwrap_err();
    assert!(matches!(err, CurioError::Step { episode: 1, frame: 1, .. }));
    assert!(matches!(err.root(), CurioError::NumericDomain { .. }));
    assert_eq!(agent.state(), EpisodeState::NoEpisode);
    assert_eq!(agent.memory().len(), 0);
}

#[test]
fn test_environment_error_is_wrapped() {
    let mut env = ScriptedEnv::new(3, 5, 0.0);
    env.fail_at_step = Some(3);
    let mut agent = build(base_config(), env);
    agent.new_game().unwrap();
    agent.take_action(0).unwrap();
    agent.take_action(0).unwrap();

    let err = agent.take_action(0).unwrap_err();
    assert!(matches!(err, CurioError::Step { episode: 1, frame: 3, .. }));
    match err.root() {
        CurioError::Collaborator { collaborator, .. } => assert_eq!(collaborator, "environment"),
        other => panic!("unexpected error {:?}", other),
    }
    assert_eq!(agent.memory().len(), 2);
    assert_eq!(agent.state(), EpisodeState::NoEpisode);
}

#[test]
fn test_count_bonus_with_injected_key() {
    let config = AgentConfig {
        count_bonus: Some(CountBonusConfig { beta: 1.0 }),
        ..base_config()
    };
    let mut agent = AgentBuilder::new(ScriptedEnv::new(3, 10, 0.0), MockOracle::new(), ReplayMemory::new(100))
        .config(config)
        .observation_key(|_: &Observation| 0u64)
        .build()
        .unwrap();

    agent.new_game().unwrap();
    for _ in 0..4 {
        agent.take_action(0).unwrap();
    }

    let rewards: Vec<f32> = agent.memory().iter().map(|e| e.reward).collect();
    assert!((rewards[0] - 1.0).abs() < 1e-6);
    assert!(rewards.windows(2).all(|w| w[0] > w[1]));
    assert!((rewards[3] - 0.5).abs() < 1e-6);
}

#[test]
fn test_observation_key_requires_count_bonus() {
    let result = AgentBuilder::new(ScriptedEnv::new(3, 10, 0.0), MockOracle::new(), ReplayMemory::new(100))
        .config(base_config())
        .observation_key(|_: &Observation| 0u64)
        .build();
    assert!(matches!(result, Err(CurioError::Configuration { .. })));
}

#[test]
fn test_invalid_config_rejected() {
    let config = AgentConfig {
        final_exploration_frame: 0,
        ..base_config()
    };
    let result = Agent::new(config, ScriptedEnv::new(3, 5, 0.0), MockOracle::new(), ReplayMemory::new(10), ());
    assert!(matches!(result, Err(CurioError::Configuration { .. })));
}

#[test]
fn test_greedy_when_epsilon_zero() {
    let config = AgentConfig {
        initial_exploration: 0.0,
        final_exploration: 0.0,
        ..base_config()
    };
    let mut agent = build(config, ScriptedEnv::new(3, 5, 0.0));
    agent.new_game().unwrap();

    for step in 0..20 {
        assert_eq!(agent.action(step).unwrap(), 1);
    }
    assert_eq!(agent.oracle().inference_calls, 20);
    assert_eq!(agent.summary().total_epsilon_reports(), 20);
    assert_eq!(agent.summary().last_epsilon(), Some(0.0));
}

#[test]
fn test_random_when_epsilon_one() {
    let config = AgentConfig {
        initial_exploration: 1.0,
        final_exploration: 1.0,
        ..base_config()
    };
    let mut agent = build(config, ScriptedEnv::new(3, 5, 0.0));
    agent.new_game().unwrap();

    for step in 0..50 {
        assert!(agent.action(step).unwrap() < 3);
    }
    assert_eq!(agent.oracle().inference_calls, 0);
}

#[test]
fn test_greedy_action_out_of_range() {
    let config = AgentConfig {
        initial_exploration: 0.0,
        final_exploration: 0.0,
        ..base_config()
    };
    let mut agent = build(config, ScriptedEnv::new(3, 5, 0.0));
    agent.oracle_mut().greedy = 7;
    agent.new_game().unwrap();

    let err = agent.action(4).unwrap_err();
    assert!(matches!(err, CurioError::Selection { step: 4, .. }));
    assert!(matches!(err.root(), CurioError::Shape { .. }));
    assert_eq!(agent.state(), EpisodeState::NoEpisode);
}

#[test]
fn test_uncertainty_mode_single_inference() {
    let config = AgentConfig {
        action_mode: ActionMode::Uncertainty,
        ..base_config()
    };
    let mut agent = build(config, ScriptedEnv::new(3, 5, 0.0));
    agent.new_game().unwrap();

    // Equal uncertainties: the value ranking decides
    assert_eq!(agent.action(0).unwrap(), 1);
    assert_eq!(agent.oracle().inference_calls, 1);
    assert_eq!(agent.summary().last_epsilon(), Some(1.0));
}

#[test]
fn test_uncertainty_mode_rejects_degenerate_estimate() {
    let config = AgentConfig {
        action_mode: ActionMode::Uncertainty,
        ..base_config()
    };
    let mut agent = build(config, ScriptedEnv::new(3, 5, 0.0));
    agent.oracle_mut().uncertainties = array![0.5, 1.0, 0.5];
    agent.new_game().unwrap();

    let err = agent.action(0).unwrap_err();
    assert!(matches!(err.root(), CurioError::NumericDomain { .. }));
}

#[test]
fn test_action_needs_observation() {
    let mut agent = build(base_config(), ScriptedEnv::new(3, 5, 0.0));
    assert!(matches!(agent.action(0), Err(CurioError::EpisodeState(_))));
}

#[test]
fn test_select_action_random_skips_oracle() {
    let mut agent = build(base_config(), ScriptedEnv::new(3, 5, 0.0));
    for step in 0..10 {
        let action = agent.select_action(step, &frame(step), ActionMode::Random).unwrap();
        assert!(action < 3);
    }
    assert_eq!(agent.oracle().inference_calls, 0);
    assert_eq!(agent.summary().total_epsilon_reports(), 0);
}

#[test]
fn test_broken_summary_does_not_abort() {
    let config = AgentConfig {
        initial_exploration: 0.0,
        final_exploration: 0.0,
        ..base_config()
    };
    let mut agent = AgentBuilder::new(ScriptedEnv::new(3, 5, 0.0), MockOracle::new(), ReplayMemory::new(100))
        .config(config)
        .summary(BrokenSummary)
        .build()
        .unwrap();
    agent.new_game().unwrap();

    assert_eq!(agent.action(0).unwrap(), 1);
    agent.log_episode(0);
    assert_eq!(agent.state(), EpisodeState::Active);
}

#[test]
fn test_log_episode_reports_counter() {
    let mut agent = build(base_config(), ScriptedEnv::new(3, 2, 0.0));
    agent.new_game().unwrap();
    agent.take_action(0).unwrap();
    agent.take_action(0).unwrap();
    agent.log_episode(2);

    assert_eq!(agent.summary().metrics().episodes.back(), Some(&(2, 1)));
}

#[test]
fn test_placeholder_source_skips_oracle() {
    let config = AgentConfig {
        uncertainty_bonus: UncertaintyBonus::ActionValue,
        exploration_beta: 1.0,
        ..base_config()
    };
    let mut agent = build(config, ScriptedEnv::new(3, 5, 0.0));
    agent.new_game().unwrap();
    agent.take_action_with(0, UncertaintySource::Unavailable).unwrap();
    assert_eq!(agent.oracle().inference_calls, 0);
}
