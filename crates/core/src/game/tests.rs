use chrono::NaiveDate;
use rand::SeedableRng;
use rand::rngs::StdRng;

use super::*;
use crate::bank::{CategoryRegistry, QuestionBank};
use crate::daily::{DailyKey, daily_question};
use crate::model::{
    CategoryDraft, CategoryId, Difficulty, ProgressionState, Question, QuestionDraft, QuestionId,
};
use crate::rules::{GameRules, WrongAnswerPolicy};

fn question(id: u32, category: &str, correct: usize, points: u32) -> Question {
    QuestionDraft {
        id: QuestionId::new(id),
        category: cat(category),
        text: format!("Question {id}"),
        options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
        correct_index: correct,
        points,
        difficulty: Difficulty::Easy,
        hint: None,
        fun_fact: None,
    }
    .validate()
    .unwrap()
}

fn cat(id: &str) -> CategoryId {
    CategoryId::new(id).unwrap()
}

fn registry(entries: &[(&str, u32)]) -> CategoryRegistry {
    CategoryRegistry::new(
        entries
            .iter()
            .map(|(id, threshold)| {
                CategoryDraft {
                    id: cat(id),
                    display_name: (*id).to_string(),
                    unlock_threshold: *threshold,
                }
                .validate()
                .unwrap()
            })
            .collect(),
    )
    .unwrap()
}

struct Harness {
    bank: QuestionBank,
    categories: CategoryRegistry,
    rules: GameRules,
    state: GameState,
    progression: ProgressionState,
    rng: StdRng,
}

impl Harness {
    fn new(questions: Vec<Question>, categories: CategoryRegistry) -> Self {
        Self {
            bank: QuestionBank::new(questions).unwrap(),
            categories,
            rules: GameRules::default(),
            state: GameState::Hub,
            progression: ProgressionState::new(),
            rng: StdRng::seed_from_u64(42),
        }
    }

    fn with_policy(mut self, policy: WrongAnswerPolicy) -> Self {
        self.rules = self.rules.with_wrong_answer(policy);
        self
    }

    fn send(&mut self, event: GameEvent) -> Result<Vec<Effect>, GameError> {
        let game = Game::new(&self.bank, &self.categories, &self.rules);
        let step = game.apply(&self.state, &self.progression, event, &mut self.rng)?;
        self.state = step.state;
        self.progression = step.progression;
        Ok(step.effects)
    }

    fn current_question(&self) -> Question {
        let id = self.state.slot().expect("question on screen").question_id();
        self.bank.get(id).cloned().unwrap()
    }

    fn answer_correctly(&mut self) {
        let q = self.current_question();
        self.send(GameEvent::Answer(q.correct_index())).unwrap();
    }

    fn answer_wrong(&mut self) {
        let q = self.current_question();
        self.send(GameEvent::Answer((q.correct_index() + 1) % 4)).unwrap();
    }

    fn spin(&mut self) {
        self.send(GameEvent::Spin).unwrap();
        self.send(GameEvent::SettleSpin).unwrap();
    }

    fn snapshot(&self) -> GameSnapshot {
        GameSnapshot::build(&self.state, &self.progression, &self.bank, &self.categories)
    }
}

fn two_resume_questions() -> Harness {
    Harness::new(
        vec![question(1, "resume", 1, 10), question(2, "resume", 0, 10)],
        registry(&[("resume", 0)]),
    )
}

fn at_question(h: &mut Harness, id: u32) {
    h.state = GameState::Spin(SpinPhase::Question {
        rotation: 0.0,
        category: cat("resume"),
        slot: QuestionSlot::new(QuestionId::new(id)),
    });
}

//
// ─── SPIN MODE ────────────────────────────────────────────────────────────────
//

#[test]
fn spin_scenario_with_retry_policy() {
    let mut h = two_resume_questions();
    h.send(GameEvent::EnterSpin).unwrap();
    at_question(&mut h, 1);

    h.send(GameEvent::Answer(1)).unwrap();
    assert_eq!(h.progression.cumulative_points(), 10);
    assert_eq!(h.progression.current_streak(), 1);
    assert!(h.progression.is_answered(QuestionId::new(1)));

    h.send(GameEvent::Continue).unwrap();
    assert_eq!(h.current_question().id(), QuestionId::new(2));

    h.send(GameEvent::Answer(1)).unwrap();
    assert_eq!(h.progression.current_streak(), 0);
    assert_eq!(h.progression.cumulative_points(), 10);
    assert!(!h.progression.is_answered(QuestionId::new(2)));

    // Wrong answer goes back to category selection without ending the round.
    h.send(GameEvent::Continue).unwrap();
    assert_eq!(h.state.ui_state(), UiState::Menu);
    assert_eq!(h.state.mode(), GameMode::Spin);

    // Q2 is still in the pool.
    h.spin();
    assert_eq!(h.current_question().id(), QuestionId::new(2));
    h.answer_correctly();
    h.send(GameEvent::Continue).unwrap();
    assert!(matches!(h.state, GameState::Spin(SpinPhase::Result { .. })));
    assert_eq!(h.progression.answered_question_ids().len(), 2);
}

#[test]
fn spin_scenario_with_exhaust_policy() {
    let mut h = two_resume_questions().with_policy(WrongAnswerPolicy::Exhaust);
    h.send(GameEvent::EnterSpin).unwrap();
    at_question(&mut h, 1);
    h.send(GameEvent::Answer(1)).unwrap();
    h.send(GameEvent::Continue).unwrap();
    h.send(GameEvent::Answer(1)).unwrap();
    assert!(h.progression.is_answered(QuestionId::new(2)));

    h.send(GameEvent::Continue).unwrap();
    h.spin();
    assert!(matches!(h.state, GameState::Spin(SpinPhase::Result { .. })));
    assert_eq!(h.progression.cumulative_points(), 10);
}

#[test]
fn exhausted_category_routes_to_result() {
    let mut h = two_resume_questions();
    h.send(GameEvent::EnterSpin).unwrap();
    h.spin();
    h.answer_correctly();
    h.send(GameEvent::Continue).unwrap();
    // Continue after a correct answer stays in the category.
    assert_eq!(h.state.ui_state(), UiState::Question);
    h.answer_correctly();
    h.send(GameEvent::Continue).unwrap();
    assert!(matches!(h.state, GameState::Spin(SpinPhase::Result { .. })));

    let snapshot = h.snapshot();
    assert_eq!(snapshot.session.ui_state, UiState::Result);
    assert_eq!(snapshot.spin_category, Some(cat("resume")));
}

#[test]
fn category_without_questions_goes_straight_to_result() {
    let mut h = Harness::new(vec![question(1, "resume", 0, 10)], registry(&[("salary", 0)]));
    h.send(GameEvent::EnterSpin).unwrap();
    h.spin();
    assert_eq!(
        h.state,
        GameState::Spin(SpinPhase::Result {
            rotation: h.state.wheel_rotation().unwrap(),
            category: cat("salary"),
        })
    );
}

#[test]
fn overlapping_spins_are_rejected() {
    let mut h = two_resume_questions();
    h.send(GameEvent::EnterSpin).unwrap();
    assert_eq!(h.send(GameEvent::SettleSpin), Err(GameError::NoSpinPending));

    h.send(GameEvent::Spin).unwrap();
    assert!(h.state.is_spinning());
    let before = h.state.clone();
    assert_eq!(h.send(GameEvent::Spin), Err(GameError::SpinInProgress));
    assert_eq!(h.send(GameEvent::ReturnToHub), Err(GameError::SpinInProgress));
    assert_eq!(h.state, before);

    h.send(GameEvent::SettleSpin).unwrap();
    assert!(!h.state.is_spinning());
}

#[test]
fn spin_rotation_accumulates_within_turn_bounds() {
    let mut h = two_resume_questions();
    h.send(GameEvent::EnterSpin).unwrap();
    h.send(GameEvent::Spin).unwrap();
    let first = h.state.wheel_rotation().unwrap();
    assert!((1800.0..3960.0).contains(&first));
    h.send(GameEvent::SettleSpin).unwrap();
    h.answer_wrong();
    h.send(GameEvent::Continue).unwrap();
    h.send(GameEvent::Spin).unwrap();
    let second = h.state.wheel_rotation().unwrap();
    assert!(second - first >= 1800.0);
}

#[test]
fn locked_categories_are_never_spun() {
    let questions = vec![
        question(1, "resume", 0, 10),
        question(2, "interview", 0, 10),
        question(3, "networking", 0, 10),
    ];
    let mut h = Harness::new(
        questions,
        registry(&[("resume", 0), ("networking", 100), ("interview", 0)]),
    );
    for seed in 0..200 {
        h.rng = StdRng::seed_from_u64(seed);
        h.send(GameEvent::ReturnToHub).unwrap();
        h.send(GameEvent::EnterSpin).unwrap();
        h.spin();
        assert_ne!(h.snapshot().spin_category, Some(cat("networking")));
    }
}

#[test]
fn unlocked_category_becomes_spin_eligible() {
    let questions = vec![question(1, "networking", 0, 10)];
    let mut h = Harness::new(questions, registry(&[("networking", 100)]));
    h.send(GameEvent::EnterSpin).unwrap();
    assert_eq!(h.send(GameEvent::Spin), Err(GameError::NoEligibleCategories));

    h.progression.record_correct_answer(100).unwrap();
    h.spin();
    assert_eq!(h.snapshot().spin_category, Some(cat("networking")));
}

#[test]
fn spin_again_starts_a_fresh_round() {
    let mut h = two_resume_questions();
    h.send(GameEvent::EnterSpin).unwrap();
    h.progression.mark_answered(QuestionId::new(1));
    h.progression.mark_answered(QuestionId::new(2));
    h.spin();
    assert_eq!(h.state.ui_state(), UiState::Result);

    h.send(GameEvent::PlayAgain).unwrap();
    assert!(h.progression.answered_question_ids().is_empty());
    assert_eq!(h.state.ui_state(), UiState::Menu);
    h.spin();
    assert_eq!(h.state.ui_state(), UiState::Question);
}

//
// ─── ANSWERING ────────────────────────────────────────────────────────────────
//

#[test]
fn second_answer_is_a_noop() {
    let mut h = two_resume_questions();
    h.send(GameEvent::EnterSpin).unwrap();
    at_question(&mut h, 1);

    h.send(GameEvent::Answer(1)).unwrap();
    let state = h.state.clone();
    let progression = h.progression.clone();

    h.send(GameEvent::Answer(1)).unwrap();
    h.send(GameEvent::Answer(0)).unwrap();
    assert_eq!(h.state, state);
    assert_eq!(h.progression, progression);
    assert_eq!(h.state.slot().unwrap().selected(), Some(1));
}

#[test]
fn out_of_range_answer_is_rejected() {
    let mut h = two_resume_questions();
    h.send(GameEvent::EnterSpin).unwrap();
    at_question(&mut h, 1);
    let before = (h.state.clone(), h.progression.clone());

    assert_eq!(
        h.send(GameEvent::Answer(4)),
        Err(GameError::InvalidAnswerIndex { index: 4, len: 4 })
    );
    assert_eq!((h.state.clone(), h.progression.clone()), before);
    assert!(!h.state.slot().unwrap().is_revealed());
}

#[test]
fn continue_requires_an_answer() {
    let mut h = two_resume_questions();
    h.send(GameEvent::EnterSpin).unwrap();
    at_question(&mut h, 1);
    assert_eq!(h.send(GameEvent::Continue), Err(GameError::AnswerPending));
}

#[test]
fn invalid_transitions_name_state_and_event() {
    let mut h = two_resume_questions();
    assert_eq!(
        h.send(GameEvent::Answer(0)),
        Err(GameError::InvalidTransition {
            state: "hub",
            event: "answer",
        })
    );
    h.send(GameEvent::EnterStreak).unwrap();
    assert_eq!(
        h.send(GameEvent::Spin),
        Err(GameError::InvalidTransition {
            state: "streak/menu",
            event: "spin",
        })
    );
    assert!(matches!(
        h.send(GameEvent::EnterSpin),
        Err(GameError::InvalidTransition { .. })
    ));
}

//
// ─── DAILY MODE ───────────────────────────────────────────────────────────────
//

fn daily_harness() -> Harness {
    Harness::new(
        vec![
            question(1, "resume", 0, 10),
            question(2, "interview", 1, 20),
            question(3, "resume", 2, 30),
        ],
        registry(&[("resume", 0), ("interview", 0)]),
    )
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn daily_wrong_answer_still_completes_the_day() {
    let mut h = daily_harness();
    let date = day(2024, 3, 1);
    h.send(GameEvent::EnterDaily {
        date,
        completed_today: false,
    })
    .unwrap();
    h.send(GameEvent::Start).unwrap();
    assert_eq!(
        h.current_question().id(),
        daily_question(&h.bank, date).unwrap().id()
    );

    h.answer_wrong();
    assert_eq!(h.progression.cumulative_points(), 0);
    let again = h.send(GameEvent::Answer(0)).unwrap();
    assert!(again.is_empty(), "completion is emitted once");

    h.send(GameEvent::Continue).unwrap();
    assert_eq!(h.state, GameState::Hub);
}

#[test]
fn daily_answer_emits_completion_effect() {
    let mut h = daily_harness();
    let date = day(2024, 3, 1);
    h.send(GameEvent::EnterDaily {
        date,
        completed_today: false,
    })
    .unwrap();
    h.send(GameEvent::Start).unwrap();
    let q = h.current_question();
    let effects = h.send(GameEvent::Answer(q.correct_index())).unwrap();
    assert_eq!(
        effects,
        vec![Effect::DailyCompleted(DailyKey::for_date(date))]
    );
    assert_eq!(h.progression.cumulative_points(), q.points());
}

#[test]
fn completed_daily_cannot_start_again() {
    let mut h = daily_harness();
    h.send(GameEvent::EnterDaily {
        date: day(2024, 3, 1),
        completed_today: true,
    })
    .unwrap();
    assert_eq!(h.snapshot().daily_completed, Some(true));
    assert_eq!(h.send(GameEvent::Start), Err(GameError::DailyAlreadyCompleted));

    h.send(GameEvent::ReturnToHub).unwrap();
    h.send(GameEvent::EnterDaily {
        date: day(2024, 3, 2),
        completed_today: false,
    })
    .unwrap();
    h.send(GameEvent::Start).unwrap();
    assert_eq!(h.state.ui_state(), UiState::Question);
}

#[test]
fn daily_with_empty_bank_returns_to_hub() {
    let mut h = Harness::new(Vec::new(), registry(&[("resume", 0)]));
    h.send(GameEvent::EnterDaily {
        date: day(2024, 3, 1),
        completed_today: false,
    })
    .unwrap();
    h.send(GameEvent::Start).unwrap();
    assert_eq!(h.state, GameState::Hub);
}

//
// ─── STREAK MODE ──────────────────────────────────────────────────────────────
//

#[test]
fn streak_runs_until_first_wrong_answer() {
    let mut h = daily_harness();
    h.send(GameEvent::EnterStreak).unwrap();
    h.send(GameEvent::Start).unwrap();

    for expected in 1..=3 {
        let previous = h.current_question().id();
        h.answer_correctly();
        assert_eq!(h.progression.current_streak(), expected);
        h.send(GameEvent::Continue).unwrap();
        assert_ne!(h.current_question().id(), previous);
    }

    h.answer_wrong();
    // Still on the question until the player continues.
    assert_eq!(h.state.ui_state(), UiState::Question);
    h.send(GameEvent::Continue).unwrap();
    assert_eq!(h.state, GameState::Streak(StreakPhase::Result { run: 3 }));
    assert_eq!(h.progression.best_streak(), 3);
    assert_eq!(h.snapshot().streak_run, Some(3));

    h.send(GameEvent::PlayAgain).unwrap();
    assert_eq!(h.state, GameState::Streak(StreakPhase::Menu));
    assert_eq!(h.progression.current_streak(), 0);
    assert_eq!(h.progression.best_streak(), 3);
}

#[test]
fn streak_ignores_category_locks() {
    let mut h = Harness::new(
        vec![question(1, "networking", 0, 10)],
        registry(&[("networking", 1_000)]),
    );
    h.send(GameEvent::EnterStreak).unwrap();
    h.send(GameEvent::Start).unwrap();
    assert_eq!(h.current_question().id(), QuestionId::new(1));
    h.answer_correctly();
    h.send(GameEvent::Continue).unwrap();
    // A single-question bank repeats.
    assert_eq!(h.current_question().id(), QuestionId::new(1));
}

#[test]
fn streak_with_empty_bank_ends_immediately() {
    let mut h = Harness::new(Vec::new(), CategoryRegistry::default());
    h.send(GameEvent::EnterStreak).unwrap();
    h.send(GameEvent::Start).unwrap();
    assert_eq!(h.state, GameState::Streak(StreakPhase::Result { run: 0 }));
}

//
// ─── ROUNDS ───────────────────────────────────────────────────────────────────
//

#[test]
fn returning_to_hub_resets_round_but_keeps_totals() {
    let mut h = daily_harness();
    h.send(GameEvent::EnterSpin).unwrap();
    h.spin();
    h.answer_correctly();

    let points = h.progression.cumulative_points();
    let best = h.progression.best_streak();
    assert!(points > 0 && best > 0);

    h.send(GameEvent::ReturnToHub).unwrap();
    h.send(GameEvent::EnterSpin).unwrap();
    assert_eq!(h.progression.current_streak(), 0);
    assert!(h.progression.answered_question_ids().is_empty());
    assert_eq!(h.progression.cumulative_points(), points);
    assert_eq!(h.progression.best_streak(), best);
}

#[test]
fn best_streak_is_monotonic_across_modes() {
    let mut h = daily_harness();
    let mut best = 0;
    h.send(GameEvent::EnterStreak).unwrap();
    h.send(GameEvent::Start).unwrap();
    for i in 0..30 {
        if i % 4 == 3 {
            h.answer_wrong();
        } else {
            h.answer_correctly();
        }
        assert!(h.progression.best_streak() >= best);
        assert!(h.progression.best_streak() >= h.progression.current_streak());
        best = h.progression.best_streak();
        h.send(GameEvent::Continue).unwrap();
        if h.state.ui_state() == UiState::Result {
            h.send(GameEvent::PlayAgain).unwrap();
            h.send(GameEvent::Start).unwrap();
        }
    }
    assert_eq!(best, 3);
}

#[test]
fn snapshot_reflects_question_and_levels() {
    let mut h = daily_harness();
    h.send(GameEvent::EnterStreak).unwrap();
    h.send(GameEvent::Start).unwrap();
    let snapshot = h.snapshot();
    assert_eq!(snapshot.session.mode, GameMode::Streak);
    assert_eq!(snapshot.session.ui_state, UiState::Question);
    assert!(snapshot.session.current_question.is_some());
    assert!(!snapshot.session.answer_revealed);
    assert_eq!(snapshot.level, 1);
    assert_eq!(snapshot.categories.len(), 2);
    assert!(snapshot.categories.iter().all(|c| c.unlocked));

    h.answer_correctly();
    let snapshot = h.snapshot();
    assert!(snapshot.session.answer_revealed);
    assert!(snapshot.session.selected_answer_index.is_some());
}
