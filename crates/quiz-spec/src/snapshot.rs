use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::SessionError;
use crate::selection::Selection;
use crate::session::QuizSession;
use crate::spec::Question;

/// Serializable session state, detached from the question list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub current_index: usize,
    pub pending: Selection,
    pub committed: Vec<Selection>,
}

impl SessionSnapshot {
    pub fn to_cbor(&self) -> Result<Vec<u8>, serde_cbor::Error> {
        serde_cbor::to_vec(self)
    }

    pub fn from_cbor(bytes: &[u8]) -> Result<Self, serde_cbor::Error> {
        serde_cbor::from_slice(bytes)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl QuizSession {
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            current_index: self.current_index(),
            pending: self.pending_selection().clone(),
            committed: self.committed_answers().to_vec(),
        }
    }

    /// Restores a session, rejecting snapshots that could not have been
    /// produced by walking `questions`.
    pub fn resume(
        questions: Vec<Question>,
        snapshot: SessionSnapshot,
    ) -> Result<Self, SessionError> {
        if let Err(reason) = check_snapshot(&questions, &snapshot) {
            warn!(%reason, "rejected session snapshot");
            return Err(SessionError::InvalidSnapshot(reason));
        }
        let SessionSnapshot {
            current_index,
            pending,
            committed,
        } = snapshot;
        Ok(QuizSession::from_parts(
            questions,
            current_index,
            pending,
            committed,
        ))
    }
}

fn check_snapshot(questions: &[Question], snapshot: &SessionSnapshot) -> Result<(), String> {
    if snapshot.committed.len() != questions.len() {
        return Err(format!(
            "expected {} answer slots, found {}",
            questions.len(),
            snapshot.committed.len()
        ));
    }
    if snapshot.current_index > questions.len() {
        return Err(format!(
            "current index {} is past the last question",
            snapshot.current_index
        ));
    }

    for (index, (question, answer)) in questions.iter().zip(&snapshot.committed).enumerate() {
        check_selection(question, answer).map_err(|reason| format!("answer {index}: {reason}"))?;
        let reached = index < snapshot.current_index;
        if reached == answer.is_empty() {
            return Err(if reached {
                format!("answer {index} was committed empty")
            } else {
                format!("answer {index} is set before the question was reached")
            });
        }
    }

    match questions.get(snapshot.current_index) {
        Some(question) => check_selection(question, &snapshot.pending)
            .map_err(|reason| format!("pending selection: {reason}")),
        None if snapshot.pending.is_empty() => Ok(()),
        None => Err("pending selection on a completed quiz".into()),
    }
}

fn check_selection(question: &Question, selection: &Selection) -> Result<(), String> {
    if !selection.fits(question.kind()) {
        return Err(format!(
            "selection shape does not fit a {} question",
            question.kind().as_str()
        ));
    }
    let indices = selection.indices();
    for (position, index) in indices.iter().enumerate() {
        if *index >= question.choices().len() {
            return Err(format!("choice {index} is out of range"));
        }
        if indices[..position].contains(index) {
            return Err(format!("choice {index} is selected twice"));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn questions() -> Vec<Question> {
        vec![
            Question::single_choice("planet", ["Earth", "Jupiter", "Mars", "Venus"], 1).unwrap(),
            Question::multi_choice("primes", ["2", "4", "5", "6"], [0, 2]).unwrap(),
        ]
    }

    #[test]
    fn resume_continues_where_snapshot_left_off() {
        let mut session = QuizSession::new(questions());
        session.toggle_selection(1).unwrap();
        session.advance().unwrap();
        session.toggle_selection(2).unwrap();

        let bytes = session.snapshot().to_cbor().expect("cbor");
        let snapshot = SessionSnapshot::from_cbor(&bytes).expect("decode");
        let mut resumed = QuizSession::resume(questions(), snapshot).expect("resume");

        assert_eq!(resumed.pending_selection(), &Selection::Multi(vec![2]));
        resumed.toggle_selection(0).unwrap();
        resumed.advance().unwrap();
        assert_eq!(resumed.score().correct, 2);
    }

    #[test]
    fn resume_rejects_inconsistent_snapshots() {
        let bad_slots = SessionSnapshot {
            current_index: 0,
            pending: Selection::Single(None),
            committed: vec![Selection::Single(None)],
        };
        let err = QuizSession::resume(questions(), bad_slots).unwrap_err();
        assert_eq!(err.code(), "invalid_snapshot");

        let wrong_shape = SessionSnapshot {
            current_index: 1,
            pending: Selection::Single(Some(0)),
            committed: vec![Selection::Single(Some(1)), Selection::Multi(vec![])],
        };
        assert!(QuizSession::resume(questions(), wrong_shape).is_err());

        let skipped = SessionSnapshot {
            current_index: 1,
            pending: Selection::Multi(vec![]),
            committed: vec![Selection::Single(None), Selection::Multi(vec![])],
        };
        assert!(QuizSession::resume(questions(), skipped).is_err());

        let duplicate = SessionSnapshot {
            current_index: 1,
            pending: Selection::Multi(vec![2, 2]),
            committed: vec![Selection::Single(Some(0)), Selection::Multi(vec![])],
        };
        assert!(QuizSession::resume(questions(), duplicate).is_err());
    }
}
