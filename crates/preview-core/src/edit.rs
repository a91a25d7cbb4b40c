//! Edit state for one in-place text field.

use crate::content::ContentField;

/// Display/edit toggle for a text node bound to a [`ContentField`].
///
/// Changes are committed on focus loss only. The displayed value follows the
/// content model whenever it changes out of band.
#[derive(Clone, Debug)]
pub struct EditableText {
    field: ContentField,
    value: String,
    editing: bool,
}

impl EditableText {
    pub fn new(field: ContentField, value: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
            editing: false,
        }
    }

    pub fn field(&self) -> ContentField {
        self.field
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    /// Adopt the external value. Returns whether the display must be redrawn.
    pub fn sync(&mut self, external: &str) -> bool {
        if self.value == external {
            return false;
        }
        self.value.clear();
        self.value.push_str(external);
        true
    }

    pub fn begin_edit(&mut self) {
        self.editing = true;
    }

    pub fn end_edit(&mut self) {
        self.editing = false;
    }

    /// Called on focus loss. Compares the node's rendered text against the
    /// last committed value and returns the new value if it differs.
    pub fn commit(&mut self, rendered: &str) -> Option<String> {
        if rendered == self.value {
            return None;
        }
        self.value = rendered.to_string();
        Some(self.value.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unchanged_text_commits_nothing() {
        let mut e = EditableText::new(ContentField::HeroHeadline, "Hello");
        e.begin_edit();
        assert_eq!(e.commit("Hello"), None);
        assert!(e.is_editing());
        e.end_edit();
        assert!(!e.is_editing());
    }

    #[test]
    fn sync_replaces_display_value() {
        let mut e = EditableText::new(ContentField::CompanyName, "Old");
        assert!(e.sync("New"));
        assert!(!e.sync("New"));
        assert_eq!(e.value(), "New");
        // a commit of the synced value is not an edit
        assert_eq!(e.commit("New"), None);
    }
}
