//! Command handlers for the terminal front end.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use chrono::{DateTime, Local, Utc};
use uuid::Uuid;
use vocab_core::{
    next_due_date, MasteryTier, NewWordPair, RandomSource, RecallJudgment, ReviewController,
    WordPair, WordStore,
};

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

fn local(time: DateTime<Utc>) -> String {
    time.with_timezone(&Local).format(TIME_FORMAT).to_string()
}

pub fn add<S: WordStore, R: RandomSource>(
    controller: &mut ReviewController<S, R>,
    pair: NewWordPair,
    out: &mut impl Write,
) -> Result<()> {
    let word = controller
        .add_word(pair, Utc::now())
        .context("failed to add word")?;
    writeln!(out, "Added {} ↔ {} ({})", word.word_a, word.word_b, word.id)?;
    Ok(())
}

pub fn list<S: WordStore, R: RandomSource>(
    controller: &ReviewController<S, R>,
    json: bool,
    out: &mut impl Write,
) -> Result<()> {
    let words = controller.words();
    if json {
        serde_json::to_writer_pretty(&mut *out, words)?;
        writeln!(out)?;
        return Ok(());
    }

    if words.is_empty() {
        writeln!(out, "No words added yet. Add your first word pair with `vocab add`.")?;
        return Ok(());
    }

    for word in words {
        write_word(word, out)?;
    }
    Ok(())
}

fn write_word(word: &WordPair, out: &mut impl Write) -> Result<()> {
    writeln!(
        out,
        "{}  {} ↔ {}  [{} / {}]  {}  next {}",
        word.id,
        word.word_a,
        word.word_b,
        word.language_a,
        word.language_b,
        word.tier().label(),
        local(word.next_review_date),
    )?;
    Ok(())
}

pub fn delete<S: WordStore, R: RandomSource>(
    controller: &mut ReviewController<S, R>,
    id: Uuid,
    out: &mut impl Write,
) -> Result<()> {
    let removed = controller
        .delete_word(id)
        .with_context(|| format!("failed to delete word {id}"))?;
    writeln!(out, "Deleted {} ↔ {}", removed.word_a, removed.word_b)?;
    Ok(())
}

pub fn due<S: WordStore, R: RandomSource>(
    controller: &ReviewController<S, R>,
    now: DateTime<Utc>,
    out: &mut impl Write,
) -> Result<()> {
    let due = controller.due_words(now);
    if due.is_empty() {
        return write_nothing_due(controller.words(), now, out);
    }

    writeln!(out, "{} word(s) due:", due.len())?;
    for word in &due {
        write_word(word, out)?;
    }
    Ok(())
}

fn write_nothing_due(words: &[WordPair], now: DateTime<Utc>, out: &mut impl Write) -> Result<()> {
    writeln!(out, "No reviews due.")?;
    match next_due_date(words, now) {
        Some(next) => writeln!(out, "Next review: {}", local(next))?,
        None => writeln!(out, "Add more words to keep learning.")?,
    }
    Ok(())
}

pub fn stats<S: WordStore, R: RandomSource>(
    controller: &ReviewController<S, R>,
    now: DateTime<Utc>,
    json: bool,
    out: &mut impl Write,
) -> Result<()> {
    let summary = controller.stats(now);
    if json {
        serde_json::to_writer_pretty(&mut *out, &summary)?;
        writeln!(out)?;
        return Ok(());
    }

    writeln!(out, "Words: {}  Due: {}", summary.total, summary.due)?;
    for tier in [
        MasteryTier::Recognition,
        MasteryTier::Comprehension,
        MasteryTier::Active,
    ] {
        writeln!(out, "  {:<14}{}", tier.label(), summary.tiers.get(tier))?;
    }
    if let Some(next) = summary.next_due {
        writeln!(out, "Next review: {}", local(next))?;
    }
    Ok(())
}

/// Interactive review loop. Returns the number of reviews saved.
///
/// Stops when nothing is due, after `limit` reviews, or at end of input.
pub fn review<S, R, C>(
    controller: &mut ReviewController<S, R>,
    limit: Option<usize>,
    clock: C,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<usize>
where
    S: WordStore,
    R: RandomSource,
    C: Fn() -> DateTime<Utc>,
{
    let mut reviewed = 0;

    while limit.map_or(true, |limit| reviewed < limit) {
        let now = clock();
        let Some(session) = controller.begin_review(now)?.cloned() else {
            write_nothing_due(controller.words(), now, out)?;
            break;
        };

        writeln!(out)?;
        writeln!(
            out,
            "Translate from {}: {}",
            session.prompt_lang, session.prompt_word
        )?;
        write!(out, "{} > ", session.answer_lang())?;
        out.flush()?;

        let Some(answer) = read_line(input)? else {
            controller.abandon_review();
            break;
        };
        let auto = controller.reveal_answer(&answer)?;

        let verdict = match auto {
            RecallJudgment::Instant => "✓ Correct! Perfect match.",
            RecallJudgment::Hesitant => "~ Close! Minor differences detected.",
            RecallJudgment::Incorrect => "✗ Incorrect. Review the correct answer.",
        };
        writeln!(out, "{verdict}")?;
        let shown = if answer.trim().is_empty() {
            "(no answer)"
        } else {
            answer.trim()
        };
        writeln!(out, "  Your answer:    {shown}")?;
        writeln!(out, "  Correct answer: {}", session.correct_answer)?;

        let Some(judgment) = ask_judgment(auto, input, out)? else {
            controller.abandon_review();
            break;
        };

        let word = controller
            .submit_feedback(judgment, clock())
            .context("failed to save feedback")?;
        writeln!(
            out,
            "Saved as {judgment}. Next review in {} day(s).",
            word.interval_days
        )?;
        reviewed += 1;
    }

    Ok(reviewed)
}

/// Let the user confirm or override the automatic judgment.
fn ask_judgment(
    auto: RecallJudgment,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<Option<RecallJudgment>> {
    loop {
        write!(
            out,
            "Rate your recall: [1] incorrect  [2] hesitant  [3] instant  (Enter = {auto}) > "
        )?;
        out.flush()?;

        let Some(line) = read_line(input)? else {
            return Ok(None);
        };
        match parse_judgment(line.trim()) {
            Some(judgment) => return Ok(Some(judgment.unwrap_or(auto))),
            None => writeln!(out, "Please enter 1, 2, 3 or press Enter.")?,
        }
    }
}

/// `Some(None)` accepts the suggestion.
fn parse_judgment(choice: &str) -> Option<Option<RecallJudgment>> {
    match choice {
        "" => Some(None),
        "1" => Some(Some(RecallJudgment::Incorrect)),
        "2" => Some(Some(RecallJudgment::Hesitant)),
        "3" => Some(Some(RecallJudgment::Instant)),
        other => other.to_lowercase().parse().ok().map(Some),
    }
}

fn read_line(input: &mut impl BufRead) -> Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}
