//! Tests for the training pipeline, its observers and its reports

mod common;

use std::sync::{Arc, Mutex};

use aqtion::{
    Result, SimulatorConfig,
    app::LearningRule,
    pipeline::{
        EpisodePhase, EpisodeReport, JsonlObserver, MetricsObserver, Observation, StepRecord,
        TrainingConfig, TrainingPipeline, TrainingReport,
    },
    ports::Observer,
};

/// Forwards every event to a shared inner observer so tests can inspect it.
struct Shared<O>(Arc<Mutex<O>>);

impl<O: Observer> Observer for Shared<O> {
    fn on_training_start(&mut self, total_episodes: usize) -> Result<()> {
        self.0.lock().unwrap().on_training_start(total_episodes)
    }

    fn on_episode_start(&mut self, episode: usize, phase: EpisodePhase) -> Result<()> {
        self.0.lock().unwrap().on_episode_start(episode, phase)
    }

    fn on_step(&mut self, episode: usize, record: &StepRecord) -> Result<()> {
        self.0.lock().unwrap().on_step(episode, record)
    }

    fn on_episode_end(&mut self, episode: usize, report: &EpisodeReport) -> Result<()> {
        self.0.lock().unwrap().on_episode_end(episode, report)
    }

    fn on_training_end(&mut self) -> Result<()> {
        self.0.lock().unwrap().on_training_end()
    }
}

/// Records the order of lifecycle events.
#[derive(Default)]
struct EventLog {
    events: Vec<String>,
}

impl Observer for EventLog {
    fn on_training_start(&mut self, total_episodes: usize) -> Result<()> {
        self.events.push(format!("start {total_episodes}"));
        Ok(())
    }

    fn on_episode_start(&mut self, episode: usize, phase: EpisodePhase) -> Result<()> {
        self.events.push(format!("episode {episode} {phase}"));
        Ok(())
    }

    fn on_episode_end(&mut self, episode: usize, _report: &EpisodeReport) -> Result<()> {
        self.events.push(format!("end {episode}"));
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        self.events.push("finish".to_string());
        Ok(())
    }
}

fn small_config() -> TrainingConfig {
    TrainingConfig::default()
        .with_train_episodes(3)
        .with_eval_episodes(2)
        .with_seed(42)
        .with_simulator(SimulatorConfig::default().with_max_turns(40))
}

#[test]
fn test_phase_counts_add_up() {
    let mut learner = common::learner(LearningRule::OneStep, 0.1, 0.3, 0.1);
    let levels = vec![("rough".to_string(), common::rough_level())];

    let report = TrainingPipeline::new(small_config().with_train_episodes(30))
        .run_curriculum(&levels, learner.as_mut())
        .unwrap();

    let level = &report.levels[0];
    assert_eq!(level.level, "rough");
    for phase in [&level.training, &level.evaluation] {
        assert_eq!(phase.goals + phase.deaths + phase.timeouts, phase.episodes);
        assert!((0.0..=1.0).contains(&phase.goal_rate));
        assert!(phase.mean_turns >= 1.0 && phase.mean_turns <= 40.0);
    }
    assert_eq!(level.training.episodes, 30);
    assert_eq!(level.evaluation.episodes, 2);
    assert_eq!(report.learner, "Q-Learning");
    assert_eq!(report.table_size, learner.table().len());
}

#[test]
fn test_observer_event_order() {
    let log = Arc::new(Mutex::new(EventLog::default()));
    let mut learner = common::learner(LearningRule::EpisodeBackward, 0.1, 0.9, 0.1);
    let levels = vec![("corridor".to_string(), common::corridor())];

    TrainingPipeline::new(small_config())
        .with_observer(Box::new(Shared(Arc::clone(&log))))
        .run_curriculum(&levels, learner.as_mut())
        .unwrap();

    let events = &log.lock().unwrap().events;
    assert_eq!(events.first().map(String::as_str), Some("start 5"));
    assert_eq!(events.last().map(String::as_str), Some("finish"));
    assert!(events.contains(&"episode 2 training".to_string()));
    assert!(events.contains(&"episode 3 evaluation".to_string()));
    assert!(!events.contains(&"episode 5 evaluation".to_string()));
    assert_eq!(events.iter().filter(|e| e.starts_with("end ")).count(), 5);
}

#[test]
fn test_metrics_observer_tracks_evaluation_only() {
    let metrics = Arc::new(Mutex::new(MetricsObserver::for_phase(EpisodePhase::Evaluation)));
    let mut learner = common::learner(LearningRule::OneStep, 0.1, 0.3, 0.1);
    let levels = vec![
        ("corridor".to_string(), common::corridor()),
        ("gap".to_string(), common::gap_level()),
    ];

    let report = TrainingPipeline::new(small_config())
        .with_observer(Box::new(Shared(Arc::clone(&metrics))))
        .run_curriculum(&levels, learner.as_mut())
        .unwrap();

    let summary = metrics.lock().unwrap().summary();
    assert_eq!(summary.total_episodes, 4);
    let expected_goals: usize = report.levels.iter().map(|l| l.evaluation.goals).sum();
    assert_eq!(summary.goals, expected_goals);
    assert_eq!(report.evaluation_goals(), expected_goals);
}

#[test]
fn test_curriculum_keeps_one_value_table() {
    let mut learner = common::learner(LearningRule::OneStep, 0.5, 0.3, 0.1);
    let mut pipeline = TrainingPipeline::new(small_config().with_train_episodes(10));

    let first = pipeline
        .run_curriculum(&[("corridor".to_string(), common::corridor())], learner.as_mut())
        .unwrap();
    let after_first = learner.table().len();
    assert!(after_first > 0);

    let second = pipeline
        .run_curriculum(&[("gap".to_string(), common::gap_level())], learner.as_mut())
        .unwrap();

    assert!(second.table_size >= after_first);
    assert_eq!(first.table_size, after_first);
}

#[test]
fn test_jsonl_observations_cover_every_episode() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("observations.jsonl");
    let mut learner = common::learner(LearningRule::OneStep, 0.1, 0.3, 0.1);
    let levels = vec![("corridor".to_string(), common::corridor())];

    TrainingPipeline::new(small_config())
        .with_observer(Box::new(JsonlObserver::new(&path).unwrap()))
        .run_curriculum(&levels, learner.as_mut())
        .unwrap();

    let contents = std::fs::read_to_string(&path).unwrap();
    let observations: Vec<Observation> = contents
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();

    assert_eq!(observations.len(), 5);
    for (episode, observation) in observations.iter().enumerate() {
        assert_eq!(observation.episode, episode);
        assert_eq!(observation.steps.len() as u32, observation.turns);
        assert_eq!(observation.steps.first().map(|s| s.turn), Some(1));
    }
    assert_eq!(observations[4].phase, EpisodePhase::Evaluation);
}

#[test]
fn test_report_round_trips_through_json_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.json");
    let mut learner = common::learner(LearningRule::OneStep, 0.1, 0.3, 0.1);
    let levels = vec![("corridor".to_string(), common::corridor())];

    let report = TrainingPipeline::new(small_config())
        .run_curriculum(&levels, learner.as_mut())
        .unwrap();
    report.save(&path).unwrap();

    assert_eq!(TrainingReport::load(&path).unwrap(), report);
}

#[test]
fn test_invalid_evaluation_epsilon_is_rejected() {
    let mut learner = common::learner(LearningRule::OneStep, 0.1, 0.3, 0.1);
    let levels = vec![("corridor".to_string(), common::corridor())];

    let result = TrainingPipeline::new(small_config().with_eval_epsilon(-0.5))
        .run_curriculum(&levels, learner.as_mut());

    assert!(matches!(result, Err(aqtion::Error::InvalidConfiguration { .. })));
}
