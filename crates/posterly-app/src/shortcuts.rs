//! Keyboard shortcut registry and documentation.

use posterly_core::KeyPress;

/// What a shortcut does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Undo,
    Redo,
    DeleteSelected,
    DuplicateSelected,
    Deselect,
}

/// A keyboard shortcut definition.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: &'static str,
    pub ctrl: bool,
    pub shift: bool,
    pub command: Command,
    pub description: &'static str,
}

impl Shortcut {
    pub const fn new(
        key: &'static str,
        ctrl: bool,
        shift: bool,
        command: Command,
        description: &'static str,
    ) -> Self {
        Self {
            key,
            ctrl,
            shift,
            command,
            description,
        }
    }

    /// Format the shortcut for display (e.g., "Ctrl+Z").
    pub fn format(&self) -> String {
        let mut parts = Vec::new();
        if self.ctrl {
            parts.push("Ctrl");
        }
        if self.shift {
            parts.push("Shift");
        }
        parts.push(self.key);
        parts.join("+")
    }

    /// Whether a key press triggers this shortcut. Cmd counts as Ctrl.
    pub fn matches(&self, press: &KeyPress) -> bool {
        press.is(self.key)
            && press.modifiers.command() == self.ctrl
            && press.modifiers.shift == self.shift
    }
}

/// Registry of all keyboard shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    /// Get all registered shortcuts.
    pub fn all() -> Vec<Shortcut> {
        vec![
            Shortcut::new("Z", true, false, Command::Undo, "Undo"),
            Shortcut::new("Z", true, true, Command::Redo, "Redo"),
            Shortcut::new("Y", true, false, Command::Redo, "Redo"),
            Shortcut::new("D", true, false, Command::DuplicateSelected, "Duplicate selected element"),
            Shortcut::new("Delete", false, false, Command::DeleteSelected, "Delete selected element"),
            Shortcut::new("Backspace", false, false, Command::DeleteSelected, "Delete selected element"),
            Shortcut::new("Escape", false, false, Command::Deselect, "Clear selection"),
        ]
    }

    /// Find the command bound to a key press.
    pub fn lookup(press: &KeyPress) -> Option<Command> {
        Self::all()
            .into_iter()
            .find(|shortcut| shortcut.matches(press))
            .map(|shortcut| shortcut.command)
    }

    /// Help text, one shortcut per line.
    pub fn help_text() -> String {
        Self::all()
            .iter()
            .map(|shortcut| format!("{:14} {}", shortcut.format(), shortcut.description))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use posterly_core::Modifiers;

    fn ctrl() -> Modifiers {
        Modifiers {
            ctrl: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_undo_redo_bindings() {
        assert_eq!(ShortcutRegistry::lookup(&KeyPress::new("z", ctrl())), Some(Command::Undo));
        assert_eq!(ShortcutRegistry::lookup(&KeyPress::new("y", ctrl())), Some(Command::Redo));
        let ctrl_shift = Modifiers { shift: true, ..ctrl() };
        assert_eq!(ShortcutRegistry::lookup(&KeyPress::new("Z", ctrl_shift)), Some(Command::Redo));
    }

    #[test]
    fn test_meta_counts_as_ctrl() {
        let meta = Modifiers {
            meta: true,
            ..Default::default()
        };
        assert_eq!(ShortcutRegistry::lookup(&KeyPress::new("d", meta)), Some(Command::DuplicateSelected));
    }

    #[test]
    fn test_plain_keys() {
        let none = Modifiers::default();
        assert_eq!(ShortcutRegistry::lookup(&KeyPress::new("Backspace", none)), Some(Command::DeleteSelected));
        assert_eq!(ShortcutRegistry::lookup(&KeyPress::new("Escape", none)), Some(Command::Deselect));
        assert_eq!(ShortcutRegistry::lookup(&KeyPress::new("z", none)), None);
    }

    #[test]
    fn test_format() {
        let shortcut = Shortcut::new("Z", true, true, Command::Redo, "Redo");
        assert_eq!(shortcut.format(), "Ctrl+Shift+Z");
        assert!(ShortcutRegistry::help_text().contains("Ctrl+D"));
    }
}
