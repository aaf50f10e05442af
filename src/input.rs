//! Sources of input lines for a console loop.
//!
//! The console asks a [`LineSource`] for one line at a time and passes along
//! the prompt to show and the words that completion may offer. The candidate
//! list only lives for the duration of that one request.

use crate::error::Result;
use rustyline::completion::Completer;
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::BufRead;
use std::rc::Rc;

/// Supplies raw input lines.
pub trait LineSource {
    /// Read one line without its terminator.
    ///
    /// Returns `Ok(None)` once input is exhausted.
    fn read_line(&mut self, prompt: &str, candidates: &[String]) -> Result<Option<String>>;
}

/// Interactive line editor on the controlling terminal.
///
/// Offers prefix completion of the word under the cursor and keeps a history
/// in which a line is only recorded if it differs from the entry before it.
/// Ctrl-C and Ctrl-D both end input. The editor itself is opened on the first
/// read so that constructing a console never touches the terminal.
#[derive(Default)]
pub struct Terminal {
    editor: Option<Editor<CandidateHelper, DefaultHistory>>,
    last_entry: Option<String>,
}

impl Terminal {
    pub fn new() -> Self {
        Self::default()
    }

    fn open_editor() -> Result<Editor<CandidateHelper, DefaultHistory>> {
        let mut editor = Editor::new()?;
        editor.set_helper(Some(CandidateHelper::default()));
        Ok(editor)
    }
}

impl LineSource for Terminal {
    fn read_line(&mut self, prompt: &str, candidates: &[String]) -> Result<Option<String>> {
        let editor = match self.editor.take() {
            Some(editor) => editor,
            None => Self::open_editor()?,
        };
        let editor = self.editor.insert(editor);

        if let Some(helper) = editor.helper_mut() {
            helper.candidates = candidates.to_vec();
        }
        let readline = editor.readline(prompt);
        if let Some(helper) = editor.helper_mut() {
            helper.candidates.clear();
        }

        let line = end_of_input(readline)?;
        if let Some(line) = &line {
            if should_record(self.last_entry.as_deref(), line) {
                editor.add_history_entry(line.as_str())?;
                self.last_entry = Some(line.clone());
            }
        }
        Ok(line)
    }
}

/// Whether `line` goes into history after `last`, the previously stored entry.
fn should_record(last: Option<&str>, line: &str) -> bool {
    last != Some(line)
}

/// Ctrl-C and Ctrl-D end input; other editor failures are errors.
fn end_of_input(readline: rustyline::Result<String>) -> Result<Option<String>> {
    match readline {
        Ok(line) => Ok(Some(line)),
        Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(None),
        Err(err) => Err(err.into()),
    }
}

/// Completion helper holding the candidates of the read in progress.
#[derive(Default)]
struct CandidateHelper {
    candidates: Vec<String>,
}

impl Completer for CandidateHelper {
    type Candidate = String;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<String>)> {
        Ok(complete_word(line, pos, &self.candidates))
    }
}

impl Hinter for CandidateHelper {
    type Hint = String;
}

impl Highlighter for CandidateHelper {}

impl Validator for CandidateHelper {}

impl Helper for CandidateHelper {}

/// Candidates starting with the word that ends at `pos`, with that word's start.
fn complete_word(line: &str, pos: usize, candidates: &[String]) -> (usize, Vec<String>) {
    let head = &line[..pos];
    let start = head
        .char_indices()
        .rev()
        .find(|(_, c)| c.is_whitespace())
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(0);
    let prefix = &head[start..];
    let mut matches: Vec<String> = candidates
        .iter()
        .filter(|c| c.starts_with(prefix))
        .cloned()
        .collect();
    matches.sort();
    matches.dedup();
    (start, matches)
}

/// Reads lines from any buffered reader, e.g. a piped stdin.
///
/// Prompts are not shown and completion is not offered. Bytes that are not
/// valid UTF-8 are replaced rather than ending input.
pub struct ReaderSource<R> {
    reader: R,
}

impl<R: BufRead> ReaderSource<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> LineSource for ReaderSource<R> {
    fn read_line(&mut self, _prompt: &str, _candidates: &[String]) -> Result<Option<String>> {
        let mut buf = Vec::new();
        if self.reader.read_until(b'\n', &mut buf)? == 0 {
            return Ok(None);
        }
        let mut line = String::from_utf8_lossy(&buf).into_owned();
        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        Ok(Some(line))
    }
}

/// One request made to a [`ScriptedInput`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub prompt: String,
    pub candidates: Vec<String>,
}

/// Fixed list of lines, handed out in order.
///
/// Every request is recorded so that callers can check which prompt and
/// completion candidates a console offered.
pub struct ScriptedInput {
    lines: VecDeque<String>,
    requests: Rc<RefCell<Vec<Request>>>,
}

impl ScriptedInput {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            requests: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Convenience: create the input and return (input, request_log).
    pub fn with_log<I, S>(lines: I) -> (Self, Rc<RefCell<Vec<Request>>>)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let input = Self::new(lines);
        let log = input.requests.clone();
        (input, log)
    }
}

impl LineSource for ScriptedInput {
    fn read_line(&mut self, prompt: &str, candidates: &[String]) -> Result<Option<String>> {
        let mut candidates = candidates.to_vec();
        candidates.sort();
        self.requests.borrow_mut().push(Request {
            prompt: prompt.to_string(),
            candidates,
        });
        Ok(self.lines.pop_front())
    }
}
