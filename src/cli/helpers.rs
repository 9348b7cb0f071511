use anyhow::{Context, Result};
use macro_manager::action::Action;
use macro_manager::library::{storage, MacroLibrary};
use macro_manager::structured::{MacroField, StructuredMacro};
use std::path::Path;

/// Load the macro file, noting when it was created or needs an upgrade
pub fn open_library(path: &Path) -> Result<MacroLibrary> {
    let (library, report) = storage::load(path)
        .with_context(|| format!("Failed to load macro file: {}", path.display()))?;
    if report.created {
        eprintln!("📄 Created empty macro file: {}", path.display());
    }
    if report.needs_upgrade() {
        eprintln!(
            "🔄 Macro file uses an older format ({:?}); it will be rewritten on the next save",
            report.format
        );
    }
    for name in &report.skipped {
        eprintln!(
            "⚠️ Macro '{}' could not be read and will be dropped on the next save",
            name
        );
    }
    Ok(library)
}

pub fn save_library(path: &Path, library: &MacroLibrary) -> Result<()> {
    storage::save(path, library)
        .with_context(|| format!("Failed to save macro file: {}", path.display()))
}

/// Read a structured macro form from YAML
pub fn load_form(path: &Path) -> Result<StructuredMacro> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read form file: {}", path.display()))?;
    let mut form: StructuredMacro = serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse form file: {}", path.display()))?;
    if form.price_modifiers.is_empty() {
        anyhow::bail!("Form {} has no price modifier rows", path.display());
    }
    form.trim_fields();
    form.clear_top_interval();
    Ok(form)
}

/// Convert a 1-based position as shown by `show` into an index
pub fn action_index(position: usize) -> Result<usize> {
    position
        .checked_sub(1)
        .ok_or_else(|| anyhow::anyhow!("Positions start at 1"))
}

/// One-line description of an action for listings
pub fn describe_action(action: &Action) -> String {
    match action {
        Action::Key { value } => format!("⌨️  {}", value),
        Action::Text { value } => format!("📝 {:?}", value),
        Action::ClickImage { value, confidence } | Action::ScrollClick { value, confidence } => {
            format!("🖱️  {} {} ({:.2})", action.kind(), value, confidence)
        }
    }
}

pub fn print_structured(structured: &StructuredMacro) {
    for field in MacroField::ALL {
        println!("  {:<16} {}", field.name(), structured.field(field));
    }
    println!("  price modifiers:");
    let last = structured.price_modifiers.len().saturating_sub(1);
    for (i, row) in structured.price_modifiers.iter().enumerate() {
        let interval = if i == last { "above" } else { row.interval.as_str() };
        println!(
            "    {}. interval={} multiplier={} added={} ship={}",
            i + 1,
            interval,
            row.multiplier,
            row.added,
            row.ship
        );
    }
}

pub fn print_actions(actions: &[Action]) {
    for (i, action) in actions.iter().enumerate() {
        println!("  {:>3}  {}", i + 1, describe_action(action));
    }
}
