//! Matching rules deciding whether a token invokes a command

use regex_lite::Regex;
use std::fmt;
use std::sync::Arc;

use super::Message;
use crate::application::errors::CommandError;

/// Predicate comparator; must return whether the message invokes the command
pub type Predicate = Arc<dyn Fn(&Message) -> bool + Send + Sync>;

#[derive(Clone)]
pub enum Comparator {
    /// Exact name
    Text(String),
    /// Regular expression tested against the token
    Pattern(Regex),
    /// Arbitrary check over the whole message
    Predicate(Predicate),
    /// Any of several names
    List(Vec<String>),
    /// Any of several comparators, used once aliases are added to a
    /// pattern or predicate comparator
    Any(Vec<Comparator>),
}

impl Comparator {
    pub fn pattern(pattern: &str) -> Result<Self, CommandError> {
        Regex::new(pattern)
            .map(Comparator::Pattern)
            .map_err(|e| CommandError::InvalidArgument(format!("invalid comparator pattern: {}", e)))
    }

    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&Message) -> bool + Send + Sync + 'static,
    {
        Comparator::Predicate(Arc::new(f))
    }

    /// Fold names (and patterns) to lower case for case-insensitive commands
    pub(crate) fn folded(self, case_sensitive: bool) -> Self {
        if case_sensitive {
            return self;
        }
        match self {
            Comparator::Text(name) => Comparator::Text(name.to_lowercase()),
            Comparator::List(names) => Comparator::List(names.iter().map(|n| n.to_lowercase()).collect()),
            Comparator::Pattern(re) => match Regex::new(&format!("(?i){}", re.as_str())) {
                Ok(folded) => Comparator::Pattern(folded),
                Err(_) => Comparator::Pattern(re),
            },
            Comparator::Any(inner) => Comparator::Any(inner.into_iter().map(|c| c.folded(false)).collect()),
            predicate @ Comparator::Predicate(_) => predicate,
        }
    }

    /// Append an alias, promoting a single name to a list first
    pub(crate) fn push_alias(&mut self, alias: String) {
        match self {
            Comparator::List(names) => names.push(alias),
            Comparator::Any(inner) => inner.push(Comparator::Text(alias)),
            Comparator::Text(name) => {
                let first = std::mem::take(name);
                *self = Comparator::List(vec![first, alias]);
            }
            Comparator::Pattern(_) | Comparator::Predicate(_) => {
                let original = self.clone();
                *self = Comparator::Any(vec![original, Comparator::Text(alias)]);
            }
        }
    }

    pub fn matches(&self, token: &str, message: &Message, case_sensitive: bool) -> bool {
        let folded;
        let token = if case_sensitive {
            token
        } else {
            folded = token.to_lowercase();
            folded.as_str()
        };

        match self {
            Comparator::Text(name) => name == token,
            Comparator::Pattern(re) => re.is_match(token),
            Comparator::Predicate(check) => check(message),
            Comparator::List(names) => names.iter().any(|n| n == token),
            Comparator::Any(inner) => inner.iter().any(|c| c.matches(token, message, case_sensitive)),
        }
    }
}

impl fmt::Debug for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Comparator::Text(name) => f.debug_tuple("Text").field(name).finish(),
            Comparator::Pattern(re) => f.debug_tuple("Pattern").field(&re.as_str()).finish(),
            Comparator::Predicate(_) => f.write_str("Predicate(..)"),
            Comparator::List(names) => f.debug_tuple("List").field(names).finish(),
            Comparator::Any(inner) => f.debug_tuple("Any").field(inner).finish(),
        }
    }
}

impl From<&str> for Comparator {
    fn from(name: &str) -> Self {
        Comparator::Text(name.to_string())
    }
}

impl From<String> for Comparator {
    fn from(name: String) -> Self {
        Comparator::Text(name)
    }
}

impl From<Vec<String>> for Comparator {
    fn from(names: Vec<String>) -> Self {
        Comparator::List(names)
    }
}

impl From<Regex> for Comparator {
    fn from(re: Regex) -> Self {
        Comparator::Pattern(re)
    }
}
