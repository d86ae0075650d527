//! Multiple-choice quiz sessions.
//!
//! A session walks through a subtopic's questions one at a time:
//! choose an option, submit to reveal the answer, advance. After the last
//! question the session is finished and can be scored or reset.

use std::collections::HashMap;

use crate::catalog::{McqOption, McqQuestion};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizPhase {
    /// Choosing an option for the current question.
    Answering,
    /// Answer submitted; correctness and explanation are visible.
    Reviewing,
    Finished,
}

/// How an option should be drawn given the session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionMark {
    Plain,
    Selected,
    Correct,
    Wrong,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Excellent,
    Good,
    KeepStudying,
}

impl Verdict {
    pub fn message(self) -> &'static str {
        match self {
            Verdict::Excellent => "Excellent! You have a strong understanding of this topic.",
            Verdict::Good => "Good job! Review the explanations to strengthen your knowledge.",
            Verdict::KeepStudying => "Keep studying! Review the material and try again.",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizScore {
    pub correct: usize,
    pub total: usize,
}

impl QuizScore {
    /// Rounded percentage; 0 for an empty quiz.
    pub fn percentage(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        ((self.correct as f64 / self.total as f64) * 100.0).round() as u8
    }

    pub fn verdict(&self) -> Verdict {
        let pct = self.percentage();
        if pct >= 80 {
            Verdict::Excellent
        } else if pct >= 60 {
            Verdict::Good
        } else {
            Verdict::KeepStudying
        }
    }
}

#[derive(Debug, Clone)]
pub struct QuizSession {
    questions: Vec<McqQuestion>,
    current: usize,
    answers: HashMap<String, String>,
    reviewing: bool,
    finished: bool,
}

impl QuizSession {
    pub fn new(questions: Vec<McqQuestion>) -> Self {
        let finished = questions.is_empty();
        Self {
            questions,
            current: 0,
            answers: HashMap::new(),
            reviewing: false,
            finished,
        }
    }

    pub fn phase(&self) -> QuizPhase {
        if self.finished {
            QuizPhase::Finished
        } else if self.reviewing {
            QuizPhase::Reviewing
        } else {
            QuizPhase::Answering
        }
    }

    pub fn current_question(&self) -> Option<&McqQuestion> {
        if self.finished {
            return None;
        }
        self.questions.get(self.current)
    }

    /// 1-based position of the current question and the question count.
    pub fn position(&self) -> (usize, usize) {
        (self.current + 1, self.questions.len())
    }

    pub fn is_last(&self) -> bool {
        self.current + 1 >= self.questions.len()
    }

    pub fn selected(&self) -> Option<&str> {
        let question = self.current_question()?;
        self.answers.get(&question.id).map(String::as_str)
    }

    /// Choose an option on the current question. Returns false (and changes
    /// nothing) once the answer is submitted or for an unknown option id.
    pub fn select(&mut self, option_id: &str) -> bool {
        if self.reviewing {
            return false;
        }
        let Some(question) = self.current_question() else {
            return false;
        };
        if !question.options.iter().any(|o| o.id == option_id) {
            return false;
        }
        let question_id = question.id.clone();
        self.answers.insert(question_id, option_id.to_string());
        true
    }

    /// Lock in the selected answer. Needs a selection.
    pub fn submit(&mut self) -> bool {
        if self.phase() != QuizPhase::Answering || self.selected().is_none() {
            return false;
        }
        self.reviewing = true;
        true
    }

    /// Move past a reviewed question, finishing after the last one.
    pub fn advance(&mut self) -> bool {
        if self.phase() != QuizPhase::Reviewing {
            return false;
        }
        self.reviewing = false;
        if self.is_last() {
            self.finished = true;
        } else {
            self.current += 1;
        }
        true
    }

    /// Start over with no answers.
    pub fn reset(&mut self) {
        self.current = 0;
        self.answers.clear();
        self.reviewing = false;
        self.finished = self.questions.is_empty();
    }

    pub fn is_correct(&self, question: &McqQuestion) -> bool {
        match (self.answers.get(&question.id), question.correct_option()) {
            (Some(chosen), Some(correct)) => *chosen == correct.id,
            _ => false,
        }
    }

    pub fn score(&self) -> QuizScore {
        QuizScore {
            correct: self.questions.iter().filter(|q| self.is_correct(q)).count(),
            total: self.questions.len(),
        }
    }

    /// Marking for `option` within the current question.
    pub fn option_mark(&self, option: &McqOption) -> OptionMark {
        let chosen = self.selected() == Some(option.id.as_str());
        match (self.reviewing, chosen, option.is_correct) {
            (false, true, _) => OptionMark::Selected,
            (false, false, _) => OptionMark::Plain,
            (true, _, true) => OptionMark::Correct,
            (true, true, false) => OptionMark::Wrong,
            (true, false, false) => OptionMark::Plain,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn question(id: &str, correct: &str) -> McqQuestion {
        McqQuestion {
            id: id.into(),
            question: format!("Question {id}?"),
            options: ["a", "b", "c"]
                .iter()
                .map(|o| McqOption {
                    id: (*o).into(),
                    text: format!("Option {o}"),
                    is_correct: *o == correct,
                })
                .collect(),
            explanation: Some("Because.".into()),
        }
    }

    fn session() -> QuizSession {
        QuizSession::new(vec![question("q1", "a"), question("q2", "b")])
    }

    #[test]
    fn test_full_walkthrough() {
        let mut quiz = session();
        assert_eq!(quiz.phase(), QuizPhase::Answering);
        assert_eq!(quiz.position(), (1, 2));

        assert!(!quiz.submit(), "submit needs a selection");
        assert!(quiz.select("a"));
        assert!(quiz.submit());
        assert_eq!(quiz.phase(), QuizPhase::Reviewing);

        assert!(quiz.advance());
        assert_eq!(quiz.position(), (2, 2));
        assert!(quiz.select("c"));
        assert!(quiz.submit());
        assert!(quiz.advance());

        assert_eq!(quiz.phase(), QuizPhase::Finished);
        assert!(quiz.current_question().is_none());
        assert_eq!(quiz.score(), QuizScore { correct: 1, total: 2 });
        assert_eq!(quiz.score().percentage(), 50);
        assert_eq!(quiz.score().verdict(), Verdict::KeepStudying);
    }

    #[test]
    fn test_answer_locked_after_submit() {
        let mut quiz = session();
        quiz.select("b");
        quiz.submit();
        assert!(!quiz.select("a"));
        assert_eq!(quiz.selected(), Some("b"));
    }

    #[test]
    fn test_reselect_before_submit() {
        let mut quiz = session();
        quiz.select("b");
        quiz.select("a");
        assert_eq!(quiz.selected(), Some("a"));
    }

    #[test]
    fn test_unknown_option_ignored() {
        let mut quiz = session();
        assert!(!quiz.select("z"));
        assert_eq!(quiz.selected(), None);
    }

    #[test]
    fn test_advance_requires_review() {
        let mut quiz = session();
        assert!(!quiz.advance());
        assert_eq!(quiz.position(), (1, 2));
    }

    #[test]
    fn test_option_marks() {
        let mut quiz = session();
        let q = quiz.current_question().unwrap().clone();
        quiz.select("b");
        assert_eq!(quiz.option_mark(&q.options[1]), OptionMark::Selected);
        assert_eq!(quiz.option_mark(&q.options[0]), OptionMark::Plain);

        quiz.submit();
        assert_eq!(quiz.option_mark(&q.options[0]), OptionMark::Correct);
        assert_eq!(quiz.option_mark(&q.options[1]), OptionMark::Wrong);
        assert_eq!(quiz.option_mark(&q.options[2]), OptionMark::Plain);
    }

    #[test]
    fn test_reset_clears_answers() {
        let mut quiz = session();
        quiz.select("a");
        quiz.submit();
        quiz.advance();
        quiz.reset();
        assert_eq!(quiz.position(), (1, 2));
        assert_eq!(quiz.phase(), QuizPhase::Answering);
        assert_eq!(quiz.selected(), None);
        assert_eq!(quiz.score().correct, 0);
    }

    #[test]
    fn test_empty_quiz_is_finished() {
        let quiz = QuizSession::new(Vec::new());
        assert_eq!(quiz.phase(), QuizPhase::Finished);
        assert_eq!(quiz.score().percentage(), 0);
    }

    #[test]
    fn test_verdict_thresholds() {
        let score = |correct| QuizScore { correct, total: 10 };
        assert_eq!(score(8).verdict(), Verdict::Excellent);
        assert_eq!(score(7).verdict(), Verdict::Good);
        assert_eq!(score(6).verdict(), Verdict::Good);
        assert_eq!(score(5).verdict(), Verdict::KeepStudying);
    }
}
