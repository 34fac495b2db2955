//! End-to-end review cycles through the public API.

use chrono::{DateTime, Duration, TimeZone, Utc};
use pretty_assertions::assert_eq;
use vocab_core::{
    calculate_next_state, check_answer, due_words, select_review, NewWordPair, RecallJudgment,
    RngSource, WordPair,
};

fn at(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, day, hour, 0, 0).unwrap()
}

fn collection() -> Vec<WordPair> {
    let mut words = vec![
        WordPair::new(NewWordPair::new("English", "house", "Spanish", "casa"), at(1, 8)),
        WordPair::new(NewWordPair::new("German", "Hund", "French", "chien"), at(1, 9)),
        WordPair::new(NewWordPair::new("Italian", "gatto", "Japanese", "猫"), at(1, 10)),
    ];
    words[2].next_review_date = at(20, 0);
    words
}

/// Filter, select, grade and schedule once.
fn review_once(
    words: &[WordPair],
    answer: impl Fn(&str) -> String,
    now: DateTime<Utc>,
    rng: &mut RngSource<rand::rngs::StdRng>,
) -> (WordPair, WordPair, RecallJudgment) {
    let due = due_words(words, now);
    let session = select_review(&due, rng).unwrap();
    let judgment = check_answer(&answer(&session.correct_answer), &session.correct_answer);
    let next = calculate_next_state(&session.word, judgment, now);
    (session.word, next, judgment)
}

#[test]
fn correct_answers_push_review_date_forward() {
    let words = collection();
    let now = at(2, 12);
    let mut rng = RngSource::seeded(3);

    for _ in 0..20 {
        let (before, after, judgment) = review_once(&words, |c| c.to_uppercase(), now, &mut rng);
        assert_eq!(judgment, RecallJudgment::Instant);
        assert!(after.next_review_date > before.next_review_date);
        assert!(after.next_review_date > now);
        assert_ne!(before.word_a, "gatto");
    }
}

#[test]
fn typo_answers_are_hesitant_and_still_advance() {
    let words = collection();
    let now = at(2, 12);
    let mut rng = RngSource::seeded(5);

    for _ in 0..20 {
        let (before, after, judgment) =
            review_once(&words, |c| format!("{c}x"), now, &mut rng);
        assert_eq!(judgment, RecallJudgment::Hesitant);
        assert!(after.next_review_date > before.next_review_date);
        assert_eq!(after.correct_count, before.correct_count + 1);
    }
}

#[test]
fn wrong_answers_come_back_tomorrow() {
    let words = collection();
    let now = at(2, 12);
    let mut rng = RngSource::seeded(8);

    for _ in 0..20 {
        let (_, after, judgment) = review_once(&words, |_| "qwertyuiop".to_string(), now, &mut rng);
        assert_eq!(judgment, RecallJudgment::Incorrect);
        assert_eq!(after.next_review_date, now + Duration::days(1));
        assert_eq!(after.interval_days, 1);
        assert_eq!(after.correct_count, 0);
        assert_eq!(after.mastery_level, 0.0);
    }
}

#[test]
fn nothing_due_before_first_word_exists() {
    let words = collection();
    assert!(due_words(&words, at(1, 7)).is_empty());
    assert_eq!(due_words(&words, at(1, 9)).len(), 2);
}
