//! Line input: a reedline editor on a terminal, plain buffered lines when
//! stdin is piped.

use std::{
    borrow::Cow,
    io::{self, BufRead, IsTerminal, Lines, StdinLock},
};

use reedline::{Prompt, PromptEditMode, PromptHistorySearch, Reedline, Signal};

pub const COMMAND_PROMPT: &str = "phonebook> ";

pub(crate) struct LinePrompt<'a>(&'a str);

impl Prompt for LinePrompt<'_> {
    fn render_prompt_left(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.0)
    }

    fn render_prompt_right(&self) -> Cow<'_, str> {
        "".into()
    }

    fn render_prompt_indicator(&self, _: PromptEditMode) -> Cow<'_, str> {
        "".into()
    }

    fn render_prompt_multiline_indicator(&self) -> Cow<'_, str> {
        "... ".into()
    }

    fn render_prompt_history_search_indicator(&self, _: PromptHistorySearch) -> Cow<'_, str> {
        "".into()
    }
}

pub enum Input {
    Editor(Box<Reedline>),
    Piped(Lines<StdinLock<'static>>),
}

impl Input {
    pub fn from_stdin() -> Self {
        let stdin = io::stdin();
        if stdin.is_terminal() {
            Input::Editor(Box::new(Reedline::create()))
        } else {
            Input::Piped(stdin.lock().lines())
        }
    }

    pub fn is_interactive(&self) -> bool {
        matches!(self, Input::Editor(_))
    }

    /// Next line of input. `None` at end of input, or on Ctrl-C / Ctrl-D.
    pub fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        match self {
            Input::Editor(editor) => match editor.read_line(&LinePrompt(prompt))? {
                Signal::Success(line) => Ok(Some(line)),
                Signal::CtrlC | Signal::CtrlD => Ok(None),
            },
            Input::Piped(lines) => lines.next().transpose(),
        }
    }
}

/// `y` or `yes`, any case; everything else declines.
pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
