mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{
    action_index, describe_action, load_form, open_library, print_actions, print_structured,
    save_library, AddArgs, AddStructuredArgs, Cli, Commands, EditArgs, EditOp, HotkeyArgs,
    NameArgs, PlanArgs, RenameArgs,
};
use macro_manager::config::Config;
use macro_manager::library::{Hotkey, MacroEntry, MacroLibrary};
use macro_manager::sequence::PlaybackPlan;
use macro_manager::structured::MacroView;
use std::path::PathBuf;

fn main() -> Result<()> {
    // Parse command line arguments first to get debug flag
    let cli = Cli::parse();

    let level = if cli.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    let config = Config::load_or_default(cli.config.as_deref())?;
    let library_path = cli.library.unwrap_or_else(|| config.library_path());
    tracing::debug!("Using macro file: {}", library_path.display());

    let mut session = Session {
        library: open_library(&library_path)?,
        path: library_path,
        config,
    };

    match cli.command {
        Commands::List => session.list(),
        Commands::Show(args) => session.show(&args)?,
        Commands::Export(args) => session.export(&args)?,
        Commands::Add(args) => session.add(args)?,
        Commands::AddStructured(args) => session.add_structured(&args)?,
        Commands::Edit(args) => session.edit(args)?,
        Commands::Hotkey(args) => session.hotkey(&args)?,
        Commands::Copy(args) => session.copy(&args)?,
        Commands::Rename(args) => session.rename(&args)?,
        Commands::Delete(args) => session.delete(&args)?,
        Commands::Plan(args) => session.plan(&args)?,
    }

    Ok(())
}

struct Session {
    library: MacroLibrary,
    path: PathBuf,
    config: Config,
}

impl Session {
    fn list(&self) {
        if self.library.is_empty() {
            println!("📭 No macros in {}", self.path.display());
            return;
        }
        println!("📂 {} ({} macros)", self.path.display(), self.library.len());
        for (name, entry) in self.library.iter() {
            let kind = if entry.view().is_structured() {
                "structured"
            } else {
                "freeform"
            };
            println!(
                "  {:<32} {:<16} {:<10} {} actions",
                name,
                Hotkey::to_stored(entry.hotkey.as_ref()),
                kind,
                entry.actions.len()
            );
        }
    }

    fn show(&self, args: &NameArgs) -> Result<()> {
        let entry = self.library.get(&args.name)?;
        println!(
            "🎯 {} (hotkey: {})",
            args.name,
            Hotkey::to_stored(entry.hotkey.as_ref())
        );
        match entry.view() {
            MacroView::Structured(structured) => {
                println!("📋 Structured macro");
                print_structured(&structured);
            }
            MacroView::Freeform(actions) => {
                println!("📜 Freeform macro ({} actions)", actions.len());
                print_actions(&actions);
            }
        }
        Ok(())
    }

    fn export(&self, args: &NameArgs) -> Result<()> {
        let entry = self.library.get(&args.name)?;
        match entry.view() {
            MacroView::Structured(structured) => {
                let yaml = serde_yaml::to_string(&structured)
                    .context("Failed to serialize structured macro")?;
                print!("{}", yaml);
                Ok(())
            }
            MacroView::Freeform(_) => {
                anyhow::bail!("Macro '{}' is not a structured macro", args.name)
            }
        }
    }

    fn add(&mut self, args: AddArgs) -> Result<()> {
        let hotkey = match &args.hotkey {
            Some(raw) => Hotkey::parse_stored(raw)?,
            None => None,
        };
        let count = args.actions.len();
        let entry = MacroEntry::new(args.actions).with_hotkey(hotkey);
        self.library.insert(&args.name, entry, args.force)?;

        save_library(&self.path, &self.library)?;
        println!("✅ Saved macro '{}' ({} actions)", args.name.trim(), count);
        Ok(())
    }

    fn edit(&mut self, args: EditArgs) -> Result<()> {
        let name = args.name.as_str();
        match args.op {
            EditOp::Insert {
                position,
                action,
                after,
            } => {
                let index = action_index(position)? + usize::from(after);
                let added = describe_action(&action);
                self.library.insert_action(name, index, action)?;
                println!("➕ {} at {}", added, index + 1);
            }
            EditOp::Append { action } => {
                let index = self.library.get(name)?.actions.len();
                let added = describe_action(&action);
                self.library.insert_action(name, index, action)?;
                println!("➕ {} at {}", added, index + 1);
            }
            EditOp::Replace { position, action } => {
                let index = action_index(position)?;
                let new = describe_action(&action);
                let old = self.library.replace_action(name, index, action)?;
                println!("✏️  {}: {} -> {}", position, describe_action(&old), new);
            }
            EditOp::Remove { position } => {
                let removed = self.library.remove_action(name, action_index(position)?)?;
                println!("➖ {}: {}", position, describe_action(&removed));
            }
            EditOp::Set { field, value } => {
                self.library.set_structured_field(name, &field, &value)?;
                println!("✏️  {} = {}", field, value.trim());
            }
        }

        save_library(&self.path, &self.library)?;
        println!("✅ Updated macro '{}'", name);
        Ok(())
    }

    fn hotkey(&mut self, args: &HotkeyArgs) -> Result<()> {
        let hotkey = Hotkey::parse_stored(&args.hotkey)?;
        self.library.set_hotkey(&args.name, hotkey)?;
        save_library(&self.path, &self.library)?;
        println!(
            "✅ Hotkey of '{}' is now {}",
            args.name,
            Hotkey::to_stored(hotkey.as_ref())
        );
        Ok(())
    }

    fn add_structured(&mut self, args: &AddStructuredArgs) -> Result<()> {
        let form = load_form(&args.form)?;
        self.library
            .save_structured(&args.name, &form, args.force)?;

        if let Some(raw) = &args.hotkey {
            self.library
                .set_hotkey(args.name.trim(), Hotkey::parse_stored(raw)?)?;
        }

        save_library(&self.path, &self.library)?;
        println!(
            "✅ Saved structured macro '{}' ({} price modifier rows)",
            args.name.trim(),
            form.price_modifiers.len()
        );
        Ok(())
    }

    fn copy(&mut self, args: &NameArgs) -> Result<()> {
        let copy_name = self.library.duplicate(&args.name)?;
        save_library(&self.path, &self.library)?;
        println!("✅ Copied '{}' to '{}'", args.name, copy_name);
        Ok(())
    }

    fn rename(&mut self, args: &RenameArgs) -> Result<()> {
        self.library.rename(&args.old, &args.new, args.force)?;
        save_library(&self.path, &self.library)?;
        println!("✅ Renamed '{}' to '{}'", args.old, args.new.trim());
        Ok(())
    }

    fn delete(&mut self, args: &NameArgs) -> Result<()> {
        self.library.remove(&args.name)?;
        save_library(&self.path, &self.library)?;
        println!("🗑️  Deleted '{}'", args.name);
        Ok(())
    }

    fn plan(&self, args: &PlanArgs) -> Result<()> {
        let mut playback = self.config.playback.clone();
        if let Some(repeat) = args.repeat {
            playback.repeat = repeat;
        }
        playback.switch_tab_between_repeats |= args.switch_tab;
        playback.skip_intermediate_after_first |= args.skip_intermediate;

        let plan = PlaybackPlan::build(&args.names, &self.library, &playback)?;
        let json =
            serde_json::to_string_pretty(&plan).context("Failed to serialize playback plan")?;
        println!("{}", json);
        Ok(())
    }
}
