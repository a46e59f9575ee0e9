//! Named command templates run against the current clipboard text.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::ports::{ExitOutcome, ProcessRunner};

/// Token replaced by the clipboard text.
pub const PLACEHOLDER: &str = "%s";

#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    #[error("duplicate action name `{0}`")]
    Duplicate(String),
    #[error("action `{0}` has an empty command")]
    EmptyCommand(String),
    #[error("action `{0}` needs clipboard text but the clipboard is empty")]
    NoClipboardText(String),
    #[error("failed to start action `{name}`: {source}")]
    Spawn {
        name: String,
        #[source]
        source: std::io::Error,
    },
    #[error("action `{name}` exited with status {code:?}")]
    Failed { name: String, code: Option<i32> },
}

/// `[[actions]]` entry as written in the settings file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionSpec {
    pub name: String,
    pub command: String,
}

/// Whitespace-split argv with `%s` substitution points.
///
/// The clipboard text is substituted inside tokens after splitting, so it
/// always stays within a single argument and no shell ever sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTemplate {
    tokens: Vec<String>,
}

impl CommandTemplate {
    /// Returns `None` for a blank command.
    pub fn parse(command: &str) -> Option<Self> {
        let tokens: Vec<String> = command.split_whitespace().map(str::to_string).collect();
        if tokens.is_empty() {
            None
        } else {
            Some(Self { tokens })
        }
    }

    pub fn has_placeholder(&self) -> bool {
        self.tokens.iter().any(|t| t.contains(PLACEHOLDER))
    }

    pub fn expand(&self, clip: &str) -> Vec<String> {
        self.tokens
            .iter()
            .map(|t| t.replace(PLACEHOLDER, clip))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    pub name: String,
    pub template: CommandTemplate,
}

impl Action {
    /// Runs the action with `clip` substituted and waits for it to exit.
    pub fn execute(&self, clip: &str, runner: &mut dyn ProcessRunner) -> Result<(), ActionError> {
        let argv = self.template.expand(clip);
        match runner.run(&argv) {
            Ok(ExitOutcome::Success) => Ok(()),
            Ok(ExitOutcome::Failed(code)) => Err(ActionError::Failed {
                name: self.name.clone(),
                code,
            }),
            Err(source) => Err(ActionError::Spawn {
                name: self.name.clone(),
                source,
            }),
        }
    }
}

/// Actions in display order with a name index.
#[derive(Debug, Clone, Default)]
pub struct ActionTable {
    actions: Vec<Action>,
    by_name: HashMap<String, usize>,
}

impl ActionTable {
    pub fn from_specs<I>(specs: I) -> Result<Self, ActionError>
    where
        I: IntoIterator<Item = ActionSpec>,
    {
        let mut table = Self::default();
        for spec in specs {
            if table.by_name.contains_key(&spec.name) {
                return Err(ActionError::Duplicate(spec.name));
            }
            let template = CommandTemplate::parse(&spec.command)
                .ok_or_else(|| ActionError::EmptyCommand(spec.name.clone()))?;
            table.by_name.insert(spec.name.clone(), table.actions.len());
            table.actions.push(Action {
                name: spec.name,
                template,
            });
        }
        Ok(table)
    }

    pub fn get(&self, name: &str) -> Option<&Action> {
        self.by_name.get(name).and_then(|&i| self.actions.get(i))
    }

    pub fn get_index(&self, index: usize) -> Option<&Action> {
        self.actions.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Action> {
        self.actions.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.actions.iter().map(|a| a.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clip_with_spaces_stays_one_argument() {
        let t = CommandTemplate::parse("xdg-open  %s").expect("template");
        assert_eq!(t.expand("a b; rm -rf ~"), vec!["xdg-open", "a b; rm -rf ~"]);
    }

    #[test]
    fn placeholder_inside_token() {
        let t = CommandTemplate::parse("curl --data=%s https://paste.example").expect("template");
        assert!(t.has_placeholder());
        assert_eq!(
            t.expand("x"),
            vec!["curl", "--data=x", "https://paste.example"]
        );
    }

    #[test]
    fn table_rejects_duplicates_and_blank_commands() {
        let dup = ActionTable::from_specs([
            ActionSpec { name: "a".into(), command: "true".into() },
            ActionSpec { name: "a".into(), command: "false".into() },
        ]);
        assert!(matches!(dup, Err(ActionError::Duplicate(name)) if name == "a"));

        let blank = ActionTable::from_specs([ActionSpec { name: "b".into(), command: "  ".into() }]);
        assert!(matches!(blank, Err(ActionError::EmptyCommand(name)) if name == "b"));
    }

    #[test]
    fn table_keeps_display_order() {
        let table = ActionTable::from_specs([
            ActionSpec { name: "zeta".into(), command: "true".into() },
            ActionSpec { name: "alpha".into(), command: "true".into() },
        ])
        .expect("table");
        assert_eq!(table.names(), vec!["zeta", "alpha"]);
        assert_eq!(table.get("alpha").map(|a| a.name.as_str()), Some("alpha"));
        assert_eq!(table.get_index(0).map(|a| a.name.as_str()), Some("zeta"));
    }
}
