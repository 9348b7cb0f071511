//! Playback planning for a selection of macros
//!
//! Selected macros run in order. Between two macros of a run the configured
//! intermediate actions move the form back to a fresh entry; between whole
//! repetitions the browser tab can be switched.

use crate::action::{Action, CTRL_TAB};
use crate::config::PlaybackConfig;
use crate::library::{LibraryError, MacroLibrary};
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum PlanStep {
    Macro {
        name: String,
        /// 1-based repetition this macro belongs to
        repetition: u32,
        actions: Vec<Action>,
    },
    Intermediate {
        actions: Vec<Action>,
    },
    SwitchTab,
}

impl PlanStep {
    fn push_actions(&self, out: &mut Vec<Action>) {
        match self {
            PlanStep::Macro { actions, .. } | PlanStep::Intermediate { actions } => {
                out.extend(actions.iter().cloned())
            }
            PlanStep::SwitchTab => out.push(Action::key(CTRL_TAB)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct PlaybackPlan {
    pub steps: Vec<PlanStep>,
}

impl PlaybackPlan {
    /// Lay out the selected macros for playback
    ///
    /// `repeat` below 1 is treated as 1. Every selected name must exist.
    pub fn build<S: AsRef<str>>(
        names: &[S],
        library: &MacroLibrary,
        config: &PlaybackConfig,
    ) -> Result<Self, LibraryError> {
        if names.is_empty() {
            return Err(LibraryError::NothingSelected);
        }
        let selected = names
            .iter()
            .map(|name| {
                let name = name.as_ref();
                library.get(name).map(|entry| (name, entry))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let repeat = config.repeat.max(1);
        let mut steps = Vec::new();

        for repetition in 1..=repeat {
            for (j, (name, entry)) in selected.iter().enumerate() {
                if j > 0 && (!config.skip_intermediate_after_first || j > 1) {
                    steps.push(PlanStep::Intermediate {
                        actions: config.intermediate_actions.clone(),
                    });
                }
                steps.push(PlanStep::Macro {
                    name: name.to_string(),
                    repetition,
                    actions: entry.actions.clone(),
                });
            }
            if repetition < repeat && config.switch_tab_between_repeats {
                steps.push(PlanStep::SwitchTab);
            }
        }

        debug!(
            "Planned {} steps for {} macros x {} repetitions",
            steps.len(),
            selected.len(),
            repeat
        );
        Ok(Self { steps })
    }

    /// All actions in playback order
    pub fn actions(&self) -> Vec<Action> {
        let mut out = Vec::new();
        for step in &self.steps {
            step.push_actions(&mut out);
        }
        out
    }

    pub fn macro_count(&self) -> usize {
        self.steps
            .iter()
            .filter(|step| matches!(step, PlanStep::Macro { .. }))
            .count()
    }
}
