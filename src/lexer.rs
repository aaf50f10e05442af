//! Lexical analysis of a console input line into an argument vector.
//!
//! Arguments are separated by runs of whitespace. A double quote opens a quoted
//! run in which whitespace is kept verbatim; the quotes themselves are dropped.
//! Quoted and unquoted runs that touch each other form a single argument, so
//! `ab"c d"e` becomes `abc de`. There are no escape sequences and no nesting.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LexingState {
    /// Between arguments, no argument is open.
    Start,
    /// Inside an argument, outside of quotes.
    ReadingWord,
    /// Inside a double-quoted run.
    ReadingQuote,
}

struct LexingFSM<'a> {
    input: std::str::Chars<'a>,
    state: LexingState,
    buffer: String,
}

impl<'a> LexingFSM<'a> {
    fn new(line: &'a str) -> Self {
        LexingFSM {
            input: line.trim().chars(),
            state: LexingState::Start,
            buffer: String::new(),
        }
    }

    fn make_tokens(mut self) -> Vec<String> {
        let mut out = Vec::new();

        while let Some(ch) = self.input.next() {
            match self.state {
                LexingState::Start => self.handle_start(ch),
                LexingState::ReadingWord => self.handle_word(ch, &mut out),
                LexingState::ReadingQuote => self.handle_quote(ch),
            }
        }

        match self.state {
            LexingState::Start => {}
            LexingState::ReadingWord => out.push(self.buffer),
            LexingState::ReadingQuote => {
                // Unterminated quote: the rest of the line belongs to the argument.
                log::debug!("unterminated quote, keeping {:?} as last argument", self.buffer);
                out.push(self.buffer);
            }
        }

        out
    }

    fn handle_start(&mut self, ch: char) {
        match ch {
            c if c.is_whitespace() => {}
            '"' => self.state = LexingState::ReadingQuote,
            c => {
                self.buffer.push(c);
                self.state = LexingState::ReadingWord;
            }
        }
    }

    fn handle_word(&mut self, ch: char, out: &mut Vec<String>) {
        match ch {
            c if c.is_whitespace() => {
                out.push(std::mem::take(&mut self.buffer));
                self.state = LexingState::Start;
            }
            '"' => self.state = LexingState::ReadingQuote,
            c => self.buffer.push(c),
        }
    }

    fn handle_quote(&mut self, ch: char) {
        match ch {
            '"' => self.state = LexingState::ReadingWord,
            c => self.buffer.push(c),
        }
    }
}

/// Splits `line` into arguments.
///
/// Leading and trailing whitespace is ignored, so an empty or blank line gives
/// an empty vector. A quote left open at the end of the line is closed
/// implicitly: everything after it becomes part of the last argument.
pub fn tokenize(line: &str) -> Vec<String> {
    LexingFSM::new(line).make_tokens()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(line: &str) -> Vec<String> {
        tokenize(line)
    }

    #[test]
    fn test_single_word() {
        assert_eq!(words("Hello"), vec!["Hello"]);
    }

    #[test]
    fn test_whitespace_runs_collapse() {
        assert_eq!(words("Hello There"), vec!["Hello", "There"]);
        assert_eq!(words("Hello There People"), vec!["Hello", "There", "People"]);
        assert_eq!(words("  Hello There  "), vec!["Hello", "There"]);
        assert_eq!(words("   Hello   There   "), vec!["Hello", "There"]);
        assert_eq!(words("\tHello\t\tThere\n"), vec!["Hello", "There"]);
    }

    #[test]
    fn test_quoted_group_is_one_argument() {
        assert_eq!(words("\"Hello There\""), vec!["Hello There"]);
        assert_eq!(words("\"Hello There\" People"), vec!["Hello There", "People"]);
    }

    #[test]
    fn test_quoted_whitespace_is_preserved() {
        assert_eq!(
            words("\"   Hello   There   \"   \"   People   \"   "),
            vec!["   Hello   There   ", "   People   "]
        );
    }

    #[test]
    fn test_blank_input_gives_no_arguments() {
        assert!(words("").is_empty());
        assert!(words("   \t  ").is_empty());
    }

    #[test]
    fn test_unquoted_matches_split_whitespace() {
        let samples = [
            "a",
            "a b c",
            "  leading",
            "trailing   ",
            "mixed\t tabs \t and  spaces",
            "x",
            " x ",
        ];
        for sample in samples {
            let expected: Vec<String> = sample.split_whitespace().map(String::from).collect();
            assert_eq!(words(sample), expected, "input {:?}", sample);
        }
    }

    #[test]
    fn test_quote_adjacent_to_word_joins() {
        assert_eq!(words("ab\"c d\"e"), vec!["abc de"]);
        assert_eq!(words("say \"hi\"there now"), vec!["say", "hithere", "now"]);
    }

    #[test]
    fn test_empty_quotes_give_empty_argument() {
        assert_eq!(words("echo \"\" end"), vec!["echo", "", "end"]);
        assert_eq!(words("\"\""), vec![""]);
    }

    #[test]
    fn test_unterminated_quote_takes_rest_of_line() {
        assert_eq!(words("say \"hi   there"), vec!["say", "hi   there"]);
        assert_eq!(words("\""), vec![""]);
    }
}
