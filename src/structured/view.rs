use super::{decode, encode, StructuredMacro};
use crate::action::Action;

/// How an editor should present a stored action list
#[derive(Debug, Clone, PartialEq)]
pub enum MacroView {
    /// The list matches the structured template; edit it as a form
    Structured(StructuredMacro),
    /// Anything else; edit the raw actions
    Freeform(Vec<Action>),
}

impl MacroView {
    pub fn from_actions(actions: &[Action]) -> Self {
        match decode(actions) {
            Some(structured) => MacroView::Structured(structured),
            None => MacroView::Freeform(actions.to_vec()),
        }
    }

    pub fn is_structured(&self) -> bool {
        matches!(self, MacroView::Structured(_))
    }

    /// Commit the edited view back to a flat action list
    pub fn into_actions(self) -> Vec<Action> {
        match self {
            MacroView::Structured(structured) => encode(&structured),
            MacroView::Freeform(actions) => actions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structured::MacroField;

    #[test]
    fn test_structured_view_edit_and_commit() {
        let original = encode(&StructuredMacro::reference_layout());
        let view = MacroView::from_actions(&original);
        assert!(view.is_structured());

        let MacroView::Structured(mut structured) = view else {
            panic!("Expected structured view");
        };
        structured.set_field(MacroField::CurrencyPair, "PLN");
        let committed = MacroView::Structured(structured).into_actions();
        assert_eq!(committed.len(), original.len() + 1);
        assert_eq!(committed[0], Action::key("tab"));
        assert_eq!(committed[1], Action::text("PLN"));
    }

    #[test]
    fn test_freeform_view_keeps_actions() {
        let actions = vec![Action::text("hello"), Action::key("enter")];
        let view = MacroView::from_actions(&actions);
        assert_eq!(view, MacroView::Freeform(actions.clone()));
        assert_eq!(view.into_actions(), actions);
    }
}
