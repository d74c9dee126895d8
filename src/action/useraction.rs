use clap::{Parser, Subcommand};
use strum::Display;

/// One line typed into the command line
#[derive(Parser, Debug)]
#[command(no_binary_name = true, disable_version_flag = true)]
pub struct CommandLine {
    #[command(subcommand)]
    pub action: UserAction,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum UserAction {
    /// Sign in with a user name or email
    Login { user_id: String, password: String },
    Logout,
    /// Show the signed in user
    Account,
    /// List recent videos
    Feed,
    /// Show a single video
    Watch { video: String },
    /// List your playlists
    Playlists,
    /// Point at a video and list your playlists from its perspective
    Pick { video: String },
    /// Add the picked video to, or remove it from, the playlist at the given position
    Toggle { index: usize },
    /// Revert the last playlist change
    Undo,
    /// Open the form for a new playlist. The picked video, if any, is added to it.
    #[command(name = "new")]
    NewPlaylist,
    /// List channels you subscribed to
    Subs,
    /// Subscribe to, or unsubscribe from, the channel at the given position
    Subscribe { index: usize },
    /// Look for videos and channels
    Search {
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
    /// Like or unlike the video being watched
    Like,
    /// List videos you liked
    Liked,
    Quit,
}

impl UserAction {
    /// Parses a command line. Blank lines give `Ok(None)`. On failure the error holds clap's
    /// rendered message.
    pub fn parse_line(line: &str) -> Result<Option<Self>, String> {
        let words: Vec<&str> = line.split_whitespace().collect();
        if words.is_empty() {
            return Ok(None);
        }
        CommandLine::try_parse_from(words)
            .map(|l| Some(l.action))
            .map_err(|e| e.render().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_commands() {
        assert_eq!(UserAction::parse_line("undo"), Ok(Some(UserAction::Undo)));
        assert_eq!(
            UserAction::parse_line("  toggle 2 "),
            Ok(Some(UserAction::Toggle { index: 2 }))
        );
        assert_eq!(
            UserAction::parse_line("new"),
            Ok(Some(UserAction::NewPlaylist))
        );
        assert_eq!(UserAction::parse_line("   "), Ok(None));
    }

    #[test]
    fn search_takes_every_word() {
        assert_eq!(
            UserAction::parse_line("search funny   cats"),
            Ok(Some(UserAction::Search {
                query: vec!["funny".to_string(), "cats".to_string()]
            }))
        );
        assert!(UserAction::parse_line("search").is_err());
    }

    #[test]
    fn rejects_unknown() {
        assert!(UserAction::parse_line("dance").is_err());
        assert!(UserAction::parse_line("toggle first").is_err());
    }
}
