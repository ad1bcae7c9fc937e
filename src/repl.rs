use crate::eval::{COMMANDS, DATE_COMMANDS};
use crate::search::{DatePicker, SearchMode};
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::FileHistory;
use rustyline::validate::{ValidationContext, ValidationResult, Validator};
use rustyline::{CompletionType, Config as RustylineConfig, Context, EditMode, Editor, Helper, Result};
use std::borrow::Cow;
use std::path::{Path, PathBuf};

pub fn default_history_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".apod.history")
}

#[derive(Default)]
pub struct ReplHelper;

impl ReplHelper {
    pub fn new() -> Self {
        ReplHelper
    }

    /// The date guard, applied before a line is accepted. Dates after today
    /// never reach the form.
    pub fn check_line(&self, line: &str, picker: &DatePicker) -> Option<String> {
        let mut parts = line.split_whitespace();
        let cmd = parts.next()?.to_lowercase();
        let arg = parts.next()?;
        if DATE_COMMANDS.contains(&cmd.as_str()) {
            if let Err(e) = picker.parse(arg) {
                return Some(e.message());
            }
        }
        None
    }
}

impl Completer for ReplHelper {
    type Candidate = Pair;

    fn complete(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Result<(usize, Vec<Pair>)> {
        let head = &line[..pos];
        let start = head.rfind(' ').map(|i| i + 1).unwrap_or(0);
        let prefix = head[start..].to_lowercase();

        let words: Vec<String> = if start == 0 {
            COMMANDS.iter().map(|c| c.to_string()).collect()
        } else if head.trim_start().to_lowercase().starts_with("mode ") {
            SearchMode::names()
        } else {
            Vec::new()
        };

        let candidates = words
            .into_iter()
            .filter(|w| w.starts_with(&prefix))
            .map(|w| Pair {
                display: w.clone(),
                replacement: w,
            })
            .collect();
        Ok((start, candidates))
    }
}

impl Highlighter for ReplHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        let Some(cmd) = line.split_whitespace().next() else {
            return Cow::Borrowed(line);
        };
        if !COMMANDS.contains(&cmd.to_lowercase().as_str()) {
            return Cow::Borrowed(line);
        }
        let at = line.find(cmd).unwrap_or(0);
        let mut highlighted = String::with_capacity(line.len() + 9);
        highlighted.push_str(&line[..at]);
        highlighted.push_str("\x1b[32m"); // Green for known commands
        highlighted.push_str(cmd);
        highlighted.push_str("\x1b[0m");
        highlighted.push_str(&line[at + cmd.len()..]);
        Cow::Owned(highlighted)
    }
}

impl Validator for ReplHelper {
    fn validate(&self, ctx: &mut ValidationContext) -> Result<ValidationResult> {
        match self.check_line(ctx.input(), &DatePicker::today()) {
            Some(message) => Ok(ValidationResult::Invalid(Some(format!("  ({})", message)))),
            None => Ok(ValidationResult::Valid(None)),
        }
    }
}

impl Hinter for ReplHelper {
    type Hint = String;

    fn hint(&self, _line: &str, _pos: usize, _ctx: &Context<'_>) -> Option<Self::Hint> {
        None
    }
}

impl Helper for ReplHelper {}

pub fn create_editor(history_path: &Path) -> Result<EditorWithHistory> {
    log::debug!("Creating rustyline editor configuration");
    let rustyline_config = RustylineConfig::builder()
        .completion_type(CompletionType::List)
        .edit_mode(EditMode::Emacs)
        .auto_add_history(false)
        .build();

    let mut rl = Editor::<ReplHelper, FileHistory>::with_config(rustyline_config)?;

    if rl.load_history(history_path).is_err() {
        log::debug!("No previous history file found at {:?}", history_path);
    } else {
        log::debug!("History loaded from {:?}", history_path);
    }

    rl.set_helper(Some(ReplHelper::new()));
    Ok(EditorWithHistory::new(rl, history_path.to_path_buf()))
}

pub struct EditorWithHistory {
    inner: Editor<ReplHelper, FileHistory>,
    history_path: PathBuf,
}

impl EditorWithHistory {
    fn new(editor: Editor<ReplHelper, FileHistory>, history_path: PathBuf) -> Self {
        EditorWithHistory {
            inner: editor,
            history_path,
        }
    }

    pub fn readline(&mut self, prompt: &str) -> Result<String> {
        let line = self.inner.readline(prompt)?;
        if !line.trim().is_empty() {
            let _ = self.inner.add_history_entry(line.trim());
        }
        Ok(line)
    }

    pub fn save_history(&mut self) -> Result<()> {
        self.inner.save_history(&self.history_path)
    }
}

impl std::ops::Deref for EditorWithHistory {
    type Target = Editor<ReplHelper, FileHistory>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl std::ops::DerefMut for EditorWithHistory {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rustyline::history::{History, DefaultHistory};

    fn picker() -> DatePicker {
        DatePicker::new(NaiveDate::from_ymd_opt(2024, 6, 30).unwrap())
    }

    fn complete(line: &str) -> (usize, Vec<String>) {
        let history = DefaultHistory::new();
        let ctx = Context::new(&history);
        let (start, pairs) = ReplHelper::new().complete(line, line.len(), &ctx).unwrap();
        (start, pairs.into_iter().map(|p| p.replacement).collect())
    }

    #[test]
    fn test_complete_command_names() {
        assert_eq!(complete("se"), (0, vec!["search".to_string()]));
        let (_, all) = complete("");
        assert_eq!(all.len(), COMMANDS.len());
    }

    #[test]
    fn test_complete_mode_names() {
        assert_eq!(complete("mode r"), (5, vec!["range".to_string(), "random".to_string()]));
        assert!(complete("date 20").1.is_empty());
    }

    #[test]
    fn test_check_line_guards_dates() {
        let helper = ReplHelper::new();
        let picker = picker();
        assert!(helper.check_line("date 2024-07-01", &picker).is_some());
        assert!(helper.check_line("END 2030-01-01", &picker).is_some());
        assert!(helper.check_line("start yesterday", &picker).is_some());
        assert!(helper.check_line("date 2024-06-30", &picker).is_none());
        assert!(helper.check_line("count 500", &picker).is_none());
        assert!(helper.check_line("date", &picker).is_none());
    }

    #[test]
    fn test_highlight_known_command() {
        let helper = ReplHelper::new();
        assert_eq!(helper.highlight("show 1", 0), "\x1b[32mshow\x1b[0m 1");
        assert_eq!(helper.highlight("launch", 0), "launch");
    }

    #[test]
    fn test_history_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history");

        let mut rl = create_editor(&path).unwrap();
        rl.add_history_entry("mode random").unwrap();
        rl.save_history().unwrap();

        let rl = create_editor(&path).unwrap();
        assert_eq!(rl.history().len(), 1);
    }
}
