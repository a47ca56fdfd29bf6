//! Daily challenge selection.
//!
//! Day-of-year is chrono's 1-based ordinal (January 1st is day 1), which is
//! the number of days elapsed since December 31st of the previous year.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::bank::QuestionBank;
use crate::model::Question;

/// Persistence key for a calendar day, formatted `YYYY-MM-DD`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct DailyKey(String);

impl DailyKey {
    #[must_use]
    pub fn for_date(date: NaiveDate) -> Self {
        Self(date.format("%Y-%m-%d").to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DailyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[must_use]
pub fn day_of_year(date: NaiveDate) -> u32 {
    date.ordinal()
}

/// Bank index of the question for `date`, or `None` for an empty bank.
#[must_use]
pub fn daily_index(date: NaiveDate, bank_len: usize) -> Option<usize> {
    if bank_len == 0 {
        return None;
    }
    let day = usize::try_from(day_of_year(date)).unwrap_or(usize::MAX);
    Some(day % bank_len)
}

/// The question of the day. Depends only on the calendar date.
#[must_use]
pub fn daily_question(bank: &QuestionBank, date: NaiveDate) -> Option<&Question> {
    daily_index(date, bank.len()).and_then(|index| bank.all().get(index))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CategoryId, Difficulty, QuestionDraft, QuestionId};
    use chrono::{NaiveTime, TimeZone, Utc};

    fn bank(n: u32) -> QuestionBank {
        let questions = (0..n)
            .map(|id| {
                QuestionDraft {
                    id: QuestionId::new(id + 1),
                    category: CategoryId::new("resume").unwrap(),
                    text: format!("Q{id}"),
                    options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
                    correct_index: 1,
                    points: 10,
                    difficulty: Difficulty::Easy,
                    hint: None,
                    fun_fact: None,
                }
                .validate()
                .unwrap()
            })
            .collect();
        QuestionBank::new(questions).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn key_is_iso_date() {
        assert_eq!(DailyKey::for_date(date(2024, 3, 1)).as_str(), "2024-03-01");
    }

    #[test]
    fn day_of_year_is_one_based() {
        assert_eq!(day_of_year(date(2024, 1, 1)), 1);
        assert_eq!(day_of_year(date(2024, 12, 31)), 366);
        assert_eq!(day_of_year(date(2023, 12, 31)), 365);
    }

    #[test]
    fn index_wraps_by_bank_size() {
        assert_eq!(daily_index(date(2024, 1, 1), 7), Some(1));
        assert_eq!(daily_index(date(2024, 1, 7), 7), Some(0));
        assert_eq!(daily_index(date(2024, 1, 1), 0), None);
    }

    #[test]
    fn same_date_same_question_regardless_of_time() {
        let bank = bank(5);
        let day = date(2024, 3, 1);
        let expected = daily_question(&bank, day).unwrap().id();
        for (h, m) in [(0, 0), (6, 30), (12, 0), (23, 59)] {
            let at = Utc.from_utc_datetime(&day.and_time(NaiveTime::from_hms_opt(h, m, 0).unwrap()));
            assert_eq!(daily_question(&bank, at.date_naive()).unwrap().id(), expected);
        }
    }

    #[test]
    fn consecutive_days_rotate_through_bank() {
        let bank = bank(5);
        let a = daily_question(&bank, date(2024, 3, 1)).unwrap().id();
        let b = daily_question(&bank, date(2024, 3, 2)).unwrap().id();
        assert_ne!(a, b);
    }

    #[test]
    fn empty_bank_has_no_daily_question() {
        assert!(daily_question(&QuestionBank::default(), date(2024, 3, 1)).is_none());
    }
}
