use serde::{Deserialize, Serialize};

use crate::spec::question::QuestionType;

/// Answer state for one question, shaped by its question type.
///
/// `Single(None)` and an empty `Multi` are the "nothing selected" values and
/// double as the unanswered sentinel for committed slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Selection {
    Single(Option<usize>),
    /// Chosen indices in the order they were picked.
    Multi(Vec<usize>),
}

impl Selection {
    /// The empty selection for a question of the given type.
    pub fn empty_for(kind: QuestionType) -> Self {
        if kind.is_multi() {
            Selection::Multi(Vec::new())
        } else {
            Selection::Single(None)
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Selection::Single(choice) => choice.is_none(),
            Selection::Multi(choices) => choices.is_empty(),
        }
    }

    pub fn is_multi(&self) -> bool {
        matches!(self, Selection::Multi(_))
    }

    /// True when this selection has the shape a question of `kind` expects.
    pub fn fits(&self, kind: QuestionType) -> bool {
        self.is_multi() == kind.is_multi()
    }

    pub fn contains(&self, index: usize) -> bool {
        match self {
            Selection::Single(choice) => *choice == Some(index),
            Selection::Multi(choices) => choices.contains(&index),
        }
    }

    /// Chosen indices, in pick order for multi selections.
    pub fn indices(&self) -> Vec<usize> {
        match self {
            Selection::Single(choice) => choice.iter().copied().collect(),
            Selection::Multi(choices) => choices.clone(),
        }
    }

    /// Applies a pick: single selections take the last write, multi
    /// selections toggle membership and keep the order of the rest.
    pub(crate) fn pick(&mut self, index: usize) {
        match self {
            Selection::Single(choice) => *choice = Some(index),
            Selection::Multi(choices) => {
                if let Some(position) = choices.iter().position(|existing| *existing == index) {
                    choices.remove(position);
                } else {
                    choices.push(index);
                }
            }
        }
    }
}
