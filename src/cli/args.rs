use clap::{Args, Parser, Subcommand};
use macro_manager::action::Action;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to config YAML file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Macro file to use instead of the configured one
    #[arg(long, global = true)]
    pub library: Option<PathBuf>,

    /// Enable debug logging for internal details
    #[arg(short, long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List stored macros with their hotkeys
    List,
    /// Show a macro as form fields, or as raw actions when it is freeform
    Show(NameArgs),
    /// Print a structured macro as YAML, ready to edit and add back
    Export(NameArgs),
    /// Create a freeform macro from a list of actions
    Add(AddArgs),
    /// Encode a structured macro from a YAML form and store it
    AddStructured(AddStructuredArgs),
    /// Edit the actions or form fields of a stored macro
    Edit(EditArgs),
    /// Set or clear the hotkey of a macro ("Brak" clears it)
    Hotkey(HotkeyArgs),
    /// Copy a macro under a free "Kopia" name
    Copy(NameArgs),
    /// Rename a macro
    Rename(RenameArgs),
    /// Delete a macro
    Delete(NameArgs),
    /// Print the playback plan for the selected macros as JSON
    Plan(PlanArgs),
}

#[derive(Args, Debug)]
pub struct NameArgs {
    /// Macro name
    pub name: String,
}

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Macro name
    pub name: String,

    /// Action as kind:value, e.g. key:tab, text:EUR or click_image:ok.png@0.9
    #[arg(long = "action", value_name = "KIND:VALUE")]
    pub actions: Vec<Action>,

    /// Hotkey such as "Ctrl+F5"
    #[arg(long)]
    pub hotkey: Option<String>,

    /// Replace an existing macro with the same name
    #[arg(long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct EditArgs {
    /// Macro name
    pub name: String,

    #[command(subcommand)]
    pub op: EditOp,
}

/// Positions are 1-based, as printed by `show`
#[derive(Subcommand, Debug)]
pub enum EditOp {
    /// Insert an action before the given position
    Insert {
        position: usize,
        #[arg(value_name = "KIND:VALUE")]
        action: Action,
        /// Insert after the position instead
        #[arg(long)]
        after: bool,
    },
    /// Add an action at the end
    Append {
        #[arg(value_name = "KIND:VALUE")]
        action: Action,
    },
    /// Replace the action at the given position
    Replace {
        position: usize,
        #[arg(value_name = "KIND:VALUE")]
        action: Action,
    },
    /// Delete the action at the given position
    Remove { position: usize },
    /// Set a form field of a structured macro, e.g. currency_pair or 0.multiplier
    Set { field: String, value: String },
}

#[derive(Args, Debug)]
pub struct HotkeyArgs {
    /// Macro name
    pub name: String,

    /// Hotkey such as "Ctrl+Alt+F5", or "Brak" for none
    pub hotkey: String,
}

#[derive(Args, Debug)]
pub struct AddStructuredArgs {
    /// Macro name
    pub name: String,

    /// YAML file with the form fields and price modifier rows
    #[arg(long)]
    pub form: PathBuf,

    /// Hotkey such as "Ctrl+F5"; keeps the existing one when omitted
    #[arg(long)]
    pub hotkey: Option<String>,

    /// Replace an existing macro with the same name
    #[arg(long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct RenameArgs {
    pub old: String,
    pub new: String,

    /// Replace an existing macro with the new name
    #[arg(long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Macro names in playback order
    #[arg(required = true)]
    pub names: Vec<String>,

    /// Number of repetitions; overrides the config file
    #[arg(long)]
    pub repeat: Option<u32>,

    /// Switch browser tab between repetitions
    #[arg(long)]
    pub switch_tab: bool,

    /// Skip the intermediate actions after the first macro
    #[arg(long)]
    pub skip_intermediate: bool,
}
