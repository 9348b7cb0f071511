use crate::action::{Action, ENTER, RIGHT, SHIFT_TAB, TAB};
use serde::Deserialize;

// How selected macros are chained into one playback run
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct PlaybackConfig {
    #[serde(default = "default_repeat")]
    pub repeat: u32,
    #[serde(default)]
    pub switch_tab_between_repeats: bool,
    #[serde(default)]
    pub skip_intermediate_after_first: bool,
    #[serde(default = "default_intermediate_actions")]
    pub intermediate_actions: Vec<Action>,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            repeat: default_repeat(),
            switch_tab_between_repeats: false,
            skip_intermediate_after_first: false,
            intermediate_actions: default_intermediate_actions(),
        }
    }
}

fn default_repeat() -> u32 {
    1
}

/// Moves the form from one finished macro to the start of the next one
pub fn default_intermediate_actions() -> Vec<Action> {
    let mut actions = Vec::new();
    actions.extend(std::iter::repeat_with(|| Action::key(TAB)).take(6));
    actions.push(Action::key(ENTER));
    actions.extend(std::iter::repeat_with(|| Action::key(SHIFT_TAB)).take(4));
    actions.push(Action::key(ENTER));
    actions.extend(std::iter::repeat_with(|| Action::key(TAB)).take(4));
    actions.push(Action::key(RIGHT));
    actions
}
