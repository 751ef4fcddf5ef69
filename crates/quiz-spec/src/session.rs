use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::SessionError;
use crate::review::{QuestionReview, review_question};
use crate::selection::Selection;
use crate::spec::{Question, QuizSpec};

/// Exact-match tally over all questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub correct: usize,
    pub total: usize,
}

/// Answered/total counters for progress displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub answered: usize,
    pub total: usize,
}

/// Where the session is in its one-way walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Active(usize),
    Terminal,
}

/// Outcome of a successful [`QuizSession::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// The session moved on to the question at this index.
    Next(usize),
    /// The last question was committed.
    Complete,
}

/// Forward-only walker over a fixed list of questions.
///
/// The session owns the only copy of the committed answers; they change only
/// through [`advance`](Self::advance). Every failing call leaves the session
/// untouched.
#[derive(Debug, Clone)]
pub struct QuizSession {
    questions: Vec<Question>,
    current_index: usize,
    pending: Selection,
    committed: Vec<Selection>,
}

impl QuizSession {
    pub fn new(questions: Vec<Question>) -> Self {
        let committed = questions
            .iter()
            .map(|question| Selection::empty_for(question.kind()))
            .collect();
        let pending = pending_for(&questions, 0);
        Self {
            questions,
            current_index: 0,
            pending,
            committed,
        }
    }

    pub fn from_spec(spec: &QuizSpec) -> Self {
        Self::new(spec.questions.clone())
    }

    /// Rebuilds a session from raw parts after checking them against the
    /// question list.
    pub(crate) fn from_parts(
        questions: Vec<Question>,
        current_index: usize,
        pending: Selection,
        committed: Vec<Selection>,
    ) -> Self {
        Self {
            questions,
            current_index,
            pending,
            committed,
        }
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn state(&self) -> SessionState {
        if self.is_complete() {
            SessionState::Terminal
        } else {
            SessionState::Active(self.current_index)
        }
    }

    pub fn is_complete(&self) -> bool {
        self.current_index >= self.questions.len()
    }

    pub fn current_question(&self) -> Result<&Question, SessionError> {
        self.questions
            .get(self.current_index)
            .ok_or(SessionError::NoCurrentQuestion)
    }

    pub fn pending_selection(&self) -> &Selection {
        &self.pending
    }

    /// Committed answers, one slot per question; unreached slots hold the
    /// empty selection for their question type.
    pub fn committed_answers(&self) -> &[Selection] {
        &self.committed
    }

    pub fn progress(&self) -> Progress {
        Progress {
            answered: self.current_index.min(self.questions.len()),
            total: self.questions.len(),
        }
    }

    /// Selects (single/boolean) or toggles (multi) a choice of the current
    /// question.
    pub fn toggle_selection(&mut self, choice_index: usize) -> Result<(), SessionError> {
        let question = self
            .questions
            .get(self.current_index)
            .ok_or(SessionError::SessionComplete)?;
        let choices = question.choices().len();
        if choice_index >= choices {
            return Err(SessionError::InvalidChoiceIndex {
                index: choice_index,
                choices,
            });
        }
        self.pending.pick(choice_index);
        debug!(
            question = self.current_index,
            choice = choice_index,
            selection = ?self.pending,
            "selection changed"
        );
        Ok(())
    }

    pub fn can_advance(&self) -> bool {
        !self.is_complete() && !self.pending.is_empty()
    }

    /// Commits the pending selection and moves to the next question.
    pub fn advance(&mut self) -> Result<Advance, SessionError> {
        if self.is_complete() {
            return Err(SessionError::SessionComplete);
        }
        if self.pending.is_empty() {
            return Err(SessionError::IncompleteSelection {
                question: self.current_index,
            });
        }

        let next_pending = pending_for(&self.questions, self.current_index + 1);
        let committed = std::mem::replace(&mut self.pending, next_pending);
        debug!(question = self.current_index, answer = ?committed, "answer committed");
        self.committed[self.current_index] = committed;
        self.current_index += 1;

        if self.is_complete() {
            let score = self.score();
            info!(
                correct = score.correct,
                total = score.total,
                "quiz complete"
            );
            Ok(Advance::Complete)
        } else {
            Ok(Advance::Next(self.current_index))
        }
    }

    /// Counts committed answers that exactly match. Before completion the
    /// unreached questions count as wrong.
    pub fn score(&self) -> Score {
        let correct = self
            .questions
            .iter()
            .zip(&self.committed)
            .filter(|(question, answer)| question.is_correct_set(answer))
            .count();
        Score {
            correct,
            total: self.questions.len(),
        }
    }

    /// Per-choice classification of the committed answers.
    pub fn review(&self) -> Vec<QuestionReview> {
        self.questions
            .iter()
            .zip(&self.committed)
            .map(|(question, answer)| review_question(question, answer))
            .collect()
    }
}

fn pending_for(questions: &[Question], index: usize) -> Selection {
    questions
        .get(index)
        .map(|question| Selection::empty_for(question.kind()))
        .unwrap_or(Selection::Single(None))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn questions() -> Vec<Question> {
        vec![
            Question::single_choice("planet", ["Earth", "Jupiter", "Mars", "Venus"], 1).unwrap(),
            Question::multi_choice("primes", ["2", "4", "5", "6"], [0, 2]).unwrap(),
            Question::boolean("sky", true),
        ]
    }

    #[test]
    fn starts_active_with_empty_pending() {
        let session = QuizSession::new(questions());
        assert_eq!(session.state(), SessionState::Active(0));
        assert_eq!(session.pending_selection(), &Selection::Single(None));
        assert!(!session.can_advance());
        assert_eq!(
            session.committed_answers(),
            &[
                Selection::Single(None),
                Selection::Multi(vec![]),
                Selection::Single(None)
            ]
        );
    }

    #[test]
    fn empty_quiz_is_terminal() {
        let mut session = QuizSession::new(vec![]);
        assert_eq!(session.state(), SessionState::Terminal);
        assert_eq!(
            session.current_question().unwrap_err(),
            SessionError::NoCurrentQuestion
        );
        assert_eq!(session.advance(), Err(SessionError::SessionComplete));
        assert_eq!(session.score(), Score { correct: 0, total: 0 });
    }

    #[test]
    fn out_of_range_toggle_leaves_state() {
        let mut session = QuizSession::new(questions());
        session.toggle_selection(2).unwrap();
        assert_eq!(
            session.toggle_selection(4),
            Err(SessionError::InvalidChoiceIndex {
                index: 4,
                choices: 4
            })
        );
        assert_eq!(session.pending_selection(), &Selection::Single(Some(2)));
    }

    #[test]
    fn advance_resets_pending_for_next_type() {
        let mut session = QuizSession::new(questions());
        session.toggle_selection(1).unwrap();
        assert_eq!(session.advance(), Ok(Advance::Next(1)));
        assert_eq!(session.pending_selection(), &Selection::Multi(vec![]));
        assert_eq!(session.committed_answers()[0], Selection::Single(Some(1)));
        assert_eq!(session.progress(), Progress { answered: 1, total: 3 });
    }

    #[test]
    fn incomplete_selection_is_rejected_without_mutation() {
        let mut session = QuizSession::new(questions());
        session.toggle_selection(1).unwrap();
        session.advance().unwrap();
        session.toggle_selection(0).unwrap();
        session.toggle_selection(0).unwrap();
        assert!(!session.can_advance());
        assert_eq!(
            session.advance(),
            Err(SessionError::IncompleteSelection { question: 1 })
        );
        assert_eq!(session.state(), SessionState::Active(1));
        assert_eq!(session.committed_answers()[1], Selection::Multi(vec![]));
    }
}
