pub mod args;
pub mod helpers;

pub use args::{
    AddArgs, AddStructuredArgs, Cli, Commands, EditArgs, EditOp, HotkeyArgs, NameArgs, PlanArgs,
    RenameArgs,
};
pub use helpers::{
    action_index, describe_action, load_form, open_library, print_actions, print_structured,
    save_library,
};
