// src/telegram/commands.rs

/// Chat commands understood by the bot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    AddUrl(Option<String>),
    RemoveUrl(Option<String>),
    ListUrls,
    Check,
    Help,
}

impl Command {
    /// Parse `/name[@bot] [arg ...]`. Anything else is `None`.
    pub fn parse(text: &str) -> Option<Self> {
        let mut parts = text.split_whitespace();
        let head = parts.next()?.strip_prefix('/')?;
        let name = head.split('@').next().unwrap_or(head).to_lowercase();
        let arg = parts.next().map(str::to_string);

        match name.as_str() {
            "start" => Some(Command::Start),
            "addurl" => Some(Command::AddUrl(arg)),
            "removeurl" => Some(Command::RemoveUrl(arg)),
            "listurls" => Some(Command::ListUrls),
            "check" => Some(Command::Check),
            "help" => Some(Command::Help),
            _ => None,
        }
    }
}

pub const USAGE: &str = "Hi. I will send you a digest of design vacancies, each with a ready cover letter.\n\n\
Commands:\n\
/addurl <link> - add a page with vacancies\n\
/removeurl <link> - remove a link\n\
/listurls - show all links\n\
/check - check now and send new vacancies\n\
/help - help";

pub const HELP: &str = "Once a day (or on /check) I look through your job-board pages, \
keep design, product design and graphic design vacancies, and send each one with a ready \
cover letter and a link to your resume.\n\n\
Add and remove pages with /addurl and /removeurl. Letters are written by Yandex GPT \
from your profile.txt.";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("/start"), Some(Command::Start));
        assert_eq!(Command::parse("/help"), Some(Command::Help));
        assert_eq!(Command::parse("/check"), Some(Command::Check));
        assert_eq!(Command::parse("  /listurls  "), Some(Command::ListUrls));
    }

    #[test]
    fn test_parse_arguments() {
        assert_eq!(
            Command::parse("/addurl https://example.com/jobs extra"),
            Some(Command::AddUrl(Some("https://example.com/jobs".to_string())))
        );
        assert_eq!(Command::parse("/removeurl"), Some(Command::RemoveUrl(None)));
    }

    #[test]
    fn test_parse_bot_suffix_and_case() {
        assert_eq!(Command::parse("/Check@DesignJobsBot"), Some(Command::Check));
    }

    #[test]
    fn test_parse_ignores_other_text() {
        assert_eq!(Command::parse("hello"), None);
        assert_eq!(Command::parse("/unknown"), None);
        assert_eq!(Command::parse(""), None);
    }
}
