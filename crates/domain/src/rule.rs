//! Rule — substring pattern → shell command.
//!
//! A [`RuleSet`] is the whole automation configuration: an ordered list of
//! [`Rule`]s evaluated against every incoming message body. Rules are
//! independent, so several may match the same message and each fires its
//! own command.

use serde::Deserialize;

use crate::error::{SmsRelayError, ValidationError};

/// A single automation rule.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Rule {
    /// Case-insensitive substring looked for in the message body.
    ///
    /// An empty pattern matches every message.
    pub must_contain: String,
    /// Shell command line run verbatim when the pattern is found.
    ///
    /// May be omitted; an empty command is handed to the shell as-is and
    /// does nothing.
    #[serde(default)]
    pub run_command: String,
}

impl Rule {
    #[must_use]
    pub fn new(must_contain: impl Into<String>, run_command: impl Into<String>) -> Self {
        Self {
            must_contain: must_contain.into(),
            run_command: run_command.into(),
        }
    }

    /// Whether running this rule has no effect.
    #[must_use]
    pub fn has_empty_command(&self) -> bool {
        self.run_command.trim().is_empty()
    }

    /// Whether this rule's pattern occurs in `text`, ignoring case.
    #[must_use]
    pub fn matches(&self, text: &str) -> bool {
        self.matches_lowercase(&text.to_lowercase())
    }

    fn matches_lowercase(&self, lowered_text: &str) -> bool {
        lowered_text.contains(&self.must_contain.to_lowercase())
    }
}

/// Ordered, immutable collection of rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Build a rule set.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NoRules`] when `rules` is empty.
    pub fn new(rules: Vec<Rule>) -> Result<Self, SmsRelayError> {
        if rules.is_empty() {
            return Err(ValidationError::NoRules.into());
        }
        Ok(Self { rules })
    }

    /// All rules, in evaluation order.
    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rules whose pattern occurs in `text`, in evaluation order.
    pub fn matching<'a>(&'a self, text: &str) -> impl Iterator<Item = &'a Rule> + use<'a> {
        let lowered = text.to_lowercase();
        self.rules
            .iter()
            .filter(move |rule| rule.matches_lowercase(&lowered))
    }
}
