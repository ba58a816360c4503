//! Message parser - Splits prefixed message text into a command invocation

/// A command token and its arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    pub name: String,
    pub args: Vec<String>,
}

/// Recognises the command prefix, or a mention of the bot, at the start of
/// a message
pub struct MessageParser {
    command_prefix: String,
    bot_user_id: Option<String>,
}

impl MessageParser {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            command_prefix: prefix.into(),
            bot_user_id: None,
        }
    }

    /// Also accept `<@id>` and `<@!id>` mentions as a prefix
    pub fn with_bot_user(mut self, id: impl Into<String>) -> Self {
        self.bot_user_id = Some(id.into());
        self
    }

    pub fn prefix(&self) -> &str {
        &self.command_prefix
    }

    /// Parse message text. Returns `None` for plain chat.
    pub fn parse(&self, text: &str) -> Option<ParsedCommand> {
        let text = text.trim_start();
        let rest = self.strip_prefix(text)?;

        let mut parts = rest.split_whitespace();
        let name = parts.next()?.to_string();
        let args = parts.map(str::to_string).collect();

        Some(ParsedCommand { name, args })
    }

    fn strip_prefix<'a>(&self, text: &'a str) -> Option<&'a str> {
        if let Some(id) = &self.bot_user_id {
            for mention in [format!("<@{}>", id), format!("<@!{}>", id)] {
                if let Some(rest) = text.strip_prefix(mention.as_str()) {
                    return Some(rest);
                }
            }
        }

        if self.command_prefix.is_empty() {
            return None;
        }
        text.strip_prefix(self.command_prefix.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_not_a_command() {
        let parser = MessageParser::new("/");
        assert_eq!(parser.parse("hello there"), None);
        assert_eq!(parser.parse("/"), None);
    }

    #[test]
    fn test_splits_name_and_args() {
        let parser = MessageParser::new("!");
        assert_eq!(
            parser.parse("!about  version now"),
            Some(ParsedCommand {
                name: "about".to_string(),
                args: vec!["version".to_string(), "now".to_string()],
            })
        );
    }

    #[test]
    fn test_space_after_prefix_and_foreign_prefix() {
        let parser = MessageParser::new("!");
        assert_eq!(parser.parse("! ping").map(|p| p.name), Some("ping".to_string()));
        assert_eq!(parser.parse("?ping"), None);
    }

    #[test]
    fn test_mention_prefix() {
        let parser = MessageParser::new("/").with_bot_user("99");
        assert_eq!(parser.parse("<@99> ping").map(|p| p.name), Some("ping".to_string()));
        assert_eq!(parser.parse("<@!99> ping").map(|p| p.name), Some("ping".to_string()));
        assert_eq!(parser.parse("<@12> ping"), None);
    }
}
