use crate::notify::Notifier;
use crate::pipeline::{self, Preview};

/// A line typed during an interactive session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Show the thumbnail and make this the current link
    Link(String),
    /// Generate notes, for the given link or the current one
    Notes(Option<String>),
    Help,
    Quit,
    Empty,
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        match word.to_ascii_lowercase().as_str() {
            "" => Command::Empty,
            "notes" | "n" => Command::Notes((!rest.is_empty()).then(|| rest.to_string())),
            "help" | "h" | "?" => Command::Help,
            "quit" | "q" | "exit" => Command::Quit,
            _ => Command::Link(line.to_string()),
        }
    }
}

/// Link a `notes` command runs on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotesRequest {
    pub url: String,
    /// Set when the command named a new link, so it can be shown first
    pub preview: Option<Preview>,
}

/// Decide what `notes [link]` runs on. A bad link is warned about once and
/// leaves the remembered link untouched.
pub fn notes_request(
    given: Option<String>,
    current: &mut Option<String>,
    notifier: &impl Notifier,
) -> Option<NotesRequest> {
    if let Some(url) = given {
        let preview = pipeline::preview(&url, notifier)?;
        *current = Some(url.clone());
        return Some(NotesRequest {
            url,
            preview: Some(preview),
        });
    }

    match current {
        Some(url) => Some(NotesRequest {
            url: url.clone(),
            preview: None,
        }),
        None => {
            notifier.warn("Enter a YouTube video link first");
            None
        }
    }
}

pub const HELP: &str = "\
Commands:
  <link>          show the video thumbnail and remember the link
  notes [link]    generate detailed notes for the link (or the remembered one)
  help            show this help
  quit            end the session";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::tests::RecordingNotifier;

    #[test]
    fn test_parse_link() {
        assert_eq!(
            Command::parse("  https://www.youtube.com/watch?v=abc \n"),
            Command::Link("https://www.youtube.com/watch?v=abc".to_string())
        );
    }

    #[test]
    fn test_parse_notes() {
        assert_eq!(Command::parse("notes"), Command::Notes(None));
        assert_eq!(Command::parse("N"), Command::Notes(None));
        assert_eq!(
            Command::parse("notes https://youtube.com/watch?v=abc"),
            Command::Notes(Some("https://youtube.com/watch?v=abc".to_string()))
        );
    }

    #[test]
    fn test_parse_control_words() {
        assert_eq!(Command::parse("help"), Command::Help);
        assert_eq!(Command::parse("?"), Command::Help);
        assert_eq!(Command::parse("quit"), Command::Quit);
        assert_eq!(Command::parse("exit"), Command::Quit);
        assert_eq!(Command::parse("   "), Command::Empty);
    }

    #[test]
    fn test_notes_with_bad_link_warns_once() {
        let notifier = RecordingNotifier::default();
        let mut current = Some("https://www.youtube.com/watch?v=kept".to_string());

        let request = notes_request(Some("https://youtu.be/abc".to_string()), &mut current, &notifier);

        assert!(request.is_none());
        assert_eq!(notifier.warnings().len(), 1);
        assert_eq!(current.as_deref(), Some("https://www.youtube.com/watch?v=kept"));
    }

    #[test]
    fn test_notes_with_new_link_remembers_it() {
        let notifier = RecordingNotifier::default();
        let mut current = None;

        let request = notes_request(Some("https://www.youtube.com/watch?v=abc".to_string()), &mut current, &notifier)
            .unwrap();

        assert_eq!(request.url, "https://www.youtube.com/watch?v=abc");
        assert_eq!(request.preview.unwrap().video_id.as_str(), "abc");
        assert_eq!(current.as_deref(), Some("https://www.youtube.com/watch?v=abc"));
        assert!(notifier.warnings().is_empty());
    }

    #[test]
    fn test_notes_uses_remembered_link() {
        let notifier = RecordingNotifier::default();
        let mut current = Some("https://www.youtube.com/watch?v=abc".to_string());

        let request = notes_request(None, &mut current, &notifier).unwrap();
        assert_eq!(request.url, "https://www.youtube.com/watch?v=abc");
        assert!(request.preview.is_none());
    }

    #[test]
    fn test_notes_without_any_link() {
        let notifier = RecordingNotifier::default();
        assert!(notes_request(None, &mut None, &notifier).is_none());
        assert_eq!(notifier.warnings(), vec!["Enter a YouTube video link first"]);
    }
}
