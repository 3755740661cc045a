//! The fixed answer set and uniform random selection over it.

use rand::Rng;

/// The reference answers, in display order.
pub const DEFAULT_ANSWERS: &[&str] = &[
    "Однозначно да",
    "Определённо да",
    "Можешь быть уверен в этом",
    "Да",
    "Вероятнее всего",
    "Хорошие перспективы",
    "Спроси позже",
    "Пока не ясно",
    "Лучше не рассказывать",
    "Даже не думай",
    "Мой ответ — нет",
    "Определённо нет",
];

/// An immutable, non-empty list of answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerSet {
    answers: &'static [&'static str],
}

impl Default for AnswerSet {
    fn default() -> Self {
        Self {
            answers: DEFAULT_ANSWERS,
        }
    }
}

impl AnswerSet {
    /// Wrap a static answer list. Returns `None` if it is empty.
    pub fn new(answers: &'static [&'static str]) -> Option<Self> {
        if answers.is_empty() {
            return None;
        }
        Some(Self { answers })
    }

    /// Number of answers in the set.
    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    /// Check if `answer` is one of the set's answers.
    pub fn contains(&self, answer: &str) -> bool {
        self.answers.contains(&answer)
    }

    pub fn as_slice(&self) -> &'static [&'static str] {
        self.answers
    }

    /// Pick one answer uniformly at random.
    pub fn select(&self) -> &'static str {
        self.select_with(&mut rand::thread_rng())
    }

    /// Pick one answer uniformly using the given RNG.
    pub fn select_with<R: Rng + ?Sized>(&self, rng: &mut R) -> &'static str {
        self.answers[rng.gen_range(0..self.answers.len())]
    }
}

/// Pick one of the default answers uniformly at random.
pub fn select_answer() -> &'static str {
    AnswerSet::default().select()
}
