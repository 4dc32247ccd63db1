//! Score arithmetic for the three rounds. Everything here is pure so the
//! services can apply it inside a single optimistic update.

use crate::models::catalog::{ComponentType, QuizQuestion};
use crate::models::team::SchematicSlot;

pub const POINTS_PER_CORRECT_PLACEMENT: i64 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizOutcome {
    pub correct: u32,
    pub earned_amount: i64,
    pub bonus_amount: i64,
    pub total_balance: i64,
}

/// An unanswered question (`None` or a negative index) never matches.
pub fn answer_matches(question: &QuizQuestion, selected: Option<i32>) -> bool {
    matches!(selected, Some(index) if index >= 0 && index == question.correct_answer)
}

/// Answers are zipped positionally with the ordered question set; surplus
/// answers are ignored.
pub fn score_quiz(
    questions: &[QuizQuestion],
    answers: &[Option<i32>],
    reward_per_correct: i64,
    bonus_amount: i64,
) -> QuizOutcome {
    let correct = questions
        .iter()
        .zip(answers.iter())
        .filter(|(question, selected)| answer_matches(question, **selected))
        .count() as u32;

    let earned_amount = i64::from(correct) * reward_per_correct;

    QuizOutcome {
        correct,
        earned_amount,
        bonus_amount,
        total_balance: earned_amount + bonus_amount,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementOutcome {
    pub correct_placements: u32,
    pub filled_slots: u32,
    pub placement_score: i64,
    pub time_bonus: i64,
    pub final_score: i64,
    pub is_all_correct: bool,
}

/// Bonus tiers by minutes taken, only when something was placed correctly
pub fn schematic_time_bonus(correct_placements: u32, time_taken: u32) -> i64 {
    if correct_placements == 0 {
        return 0;
    }
    match time_taken {
        0..=4 => 10,
        5..=9 => 8,
        10..=14 => 5,
        15..=19 => 3,
        _ => 0,
    }
}

pub fn score_schematic(
    slots: &[SchematicSlot],
    correct_flow: &[ComponentType],
    time_taken: u32,
) -> PlacementOutcome {
    let filled_slots = slots.iter().filter(|slot| slot.is_filled()).count() as u32;
    let correct_placements = slots
        .iter()
        .zip(correct_flow.iter())
        .filter(|(slot, expected)| slot.component_type == Some(**expected))
        .count() as u32;

    let placement_score = i64::from(correct_placements) * POINTS_PER_CORRECT_PLACEMENT;
    let time_bonus = schematic_time_bonus(correct_placements, time_taken);

    PlacementOutcome {
        correct_placements,
        filled_slots,
        placement_score,
        time_bonus,
        final_score: placement_score + time_bonus,
        is_all_correct: correct_placements as usize == correct_flow.len(),
    }
}

pub fn round3_time_bonus(time_taken: u32, time_cap: u32) -> i64 {
    (i64::from(time_cap) - i64::from(time_taken)).max(0)
}

pub fn round3_final_score(test_cases_passed: u32, time_taken: u32, time_cap: u32) -> i64 {
    i64::from(test_cases_passed) + round3_time_bonus(time_taken, time_cap)
}
