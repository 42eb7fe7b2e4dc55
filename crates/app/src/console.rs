//! Line-oriented terminal front end for an exam session.
//!
//! Holds no exam logic of its own: it parses a command, forwards it to the
//! session, and re-renders from the session's view.

use std::io::{self, BufRead, Write};

use exam_core::model::{AnswerMode, OptionId};
use services::{ExamSession, ExamSummary, Rejection, SessionView, Transition};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// 1-based option positions as displayed.
    Select(Vec<usize>),
    Submit,
    Next,
    /// 1-based question number.
    Jump(usize),
    Progress,
    Help,
    Quit,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("empty input")]
    Empty,
    #[error("unknown command `{0}` (type `h` for help)")]
    Unknown(String),
    #[error("`{0}` is not a number")]
    NotANumber(String),
    #[error("numbers start at 1")]
    Zero,
    #[error("`g` needs a question number, e.g. `g 3`")]
    MissingQuestion,
}

pub fn parse_command(line: &str) -> Result<Command, CommandError> {
    let line = line.trim();
    let mut parts = line.split_whitespace();
    let Some(head) = parts.next() else {
        return Err(CommandError::Empty);
    };

    if head.starts_with(|c: char| c.is_ascii_digit()) {
        let positions = line
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|s| !s.is_empty())
            .map(parse_number)
            .collect::<Result<Vec<_>, _>>()?;
        return Ok(Command::Select(positions));
    }

    match head.to_ascii_lowercase().as_str() {
        "s" | "submit" => Ok(Command::Submit),
        "n" | "next" => Ok(Command::Next),
        "g" | "goto" => {
            let raw = parts.next().ok_or(CommandError::MissingQuestion)?;
            Ok(Command::Jump(parse_number(raw)?))
        }
        "p" | "progress" => Ok(Command::Progress),
        "h" | "help" | "?" => Ok(Command::Help),
        "q" | "quit" | "exit" => Ok(Command::Quit),
        other => Err(CommandError::Unknown(other.to_owned())),
    }
}

fn parse_number(raw: &str) -> Result<usize, CommandError> {
    let n: usize = raw
        .parse()
        .map_err(|_| CommandError::NotANumber(raw.to_owned()))?;
    if n == 0 {
        return Err(CommandError::Zero);
    }
    Ok(n)
}

fn read_line(input: &mut impl BufRead) -> io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_owned()))
}

/// Ask for a name until a non-blank one is given. `None` on end of input.
pub fn prompt_name(input: &mut impl BufRead, out: &mut impl Write) -> io::Result<Option<String>> {
    loop {
        write!(out, "Please enter your name: ")?;
        out.flush()?;
        let Some(line) = read_line(input)? else {
            return Ok(None);
        };
        if !line.is_empty() {
            return Ok(Some(line));
        }
        writeln!(out, "A name is required to start the exam.")?;
    }
}

/// Drive `session` from `input` until the user quits or input ends.
pub fn run(
    session: &mut ExamSession,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> io::Result<()> {
    writeln!(out, "Welcome, {}! Type `h` for help.", session.candidate())?;
    render(session, out)?;

    loop {
        write!(out, "> ")?;
        out.flush()?;
        let Some(line) = read_line(input)? else {
            break;
        };

        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(CommandError::Empty) => continue,
            Err(err) => {
                writeln!(out, "{err}")?;
                continue;
            }
        };

        match command {
            Command::Quit => break,
            Command::Help => print_help(out)?,
            Command::Progress => {
                let progress = session.progress();
                writeln!(
                    out,
                    "Answered {} of {} ({} correct, {} incorrect), {} remaining.",
                    progress.answered,
                    progress.total,
                    progress.correct,
                    progress.incorrect,
                    progress.remaining
                )?;
            }
            Command::Select(positions) => {
                let Some(ids) = resolve_positions(session, &positions, out)? else {
                    continue;
                };
                for id in ids {
                    report(session.select_option(id), out)?;
                }
                render(session, out)?;
            }
            Command::Submit => {
                if report(session.submit(), out)? {
                    render(session, out)?;
                    if session.is_terminal() {
                        writeln!(out, "That was the last question. Type `q` to finish.")?;
                    }
                }
            }
            Command::Next => {
                if report(session.advance(), out)? {
                    render(session, out)?;
                }
            }
            Command::Jump(number) => {
                if report(session.jump_to(number - 1), out)? {
                    render(session, out)?;
                }
            }
        }
    }

    print_summary(&session.summary(), out)
}

fn resolve_positions(
    session: &ExamSession,
    positions: &[usize],
    out: &mut impl Write,
) -> io::Result<Option<Vec<OptionId>>> {
    let Some(view) = session.view() else {
        return Ok(None);
    };
    let options = view.question.options();
    let mut ids = Vec::with_capacity(positions.len());
    for &position in positions {
        match options.get(position - 1) {
            Some(option) => ids.push(option.id()),
            None => {
                writeln!(
                    out,
                    "There is no option {position}; pick 1 to {}.",
                    options.len()
                )?;
                return Ok(None);
            }
        }
    }
    Ok(Some(ids))
}

/// Print a hint for a rejected transition. Returns whether it applied.
fn report(transition: Transition, out: &mut impl Write) -> io::Result<bool> {
    let Transition::Rejected(reason) = transition else {
        return Ok(true);
    };
    let message = match reason {
        Rejection::AnswerLocked => "This answer is locked; move on with `n`.".to_owned(),
        Rejection::AlreadyScored => {
            "You already answered this question; go elsewhere with `g <N>`.".to_owned()
        }
        Rejection::EmptySelection => "Select at least one option first.".to_owned(),
        Rejection::NotRevealed => "Submit an answer with `s` before moving on.".to_owned(),
        Rejection::LastQuestion => "This is the last question.".to_owned(),
        Rejection::OutOfRange { index, len } => {
            format!("There is no question {}; pick 1 to {len}.", index + 1)
        }
        Rejection::UnknownOption(id) => format!("Option {id} is not part of this question."),
        Rejection::AlreadyStarted
        | Rejection::EmptyName
        | Rejection::NoQuestions
        | Rejection::NotStarted => "The exam is not running.".to_owned(),
    };
    writeln!(out, "{message}")?;
    Ok(false)
}

fn render(session: &ExamSession, out: &mut impl Write) -> io::Result<()> {
    let Some(view) = session.view() else {
        return Ok(());
    };
    writeln!(out)?;
    writeln!(
        out,
        "Question {} of {}    Correct: {}    Incorrect: {}",
        view.position + 1,
        view.total,
        view.correct,
        view.incorrect
    )?;
    writeln!(out, "{}", view.question.prompt())?;
    let mode = view.question.mode();
    match mode {
        AnswerMode::Single => writeln!(out, "(choose one)")?,
        AnswerMode::Multi => writeln!(out, "(choose all that apply)")?,
    }

    for (position, option) in view.question.options().iter().enumerate() {
        writeln!(
            out,
            "  {} {}. {}{}",
            marker(mode, view.is_selected(option.id())),
            position + 1,
            option.text(),
            verdict(&view, option.id())
        )?;
    }

    if let Some(outcome) = view.outcome {
        if outcome.is_correct {
            writeln!(out, "Correct!")?;
        } else {
            writeln!(out, "Incorrect.")?;
        }
        let answer: Vec<_> = view.question.correct_options().map(|o| o.text()).collect();
        writeln!(out, "Correct answer: {}", answer.join(", "))?;
    } else if let Some(earlier) = view.scored {
        let how = if earlier.is_correct { "correctly" } else { "incorrectly" };
        writeln!(out, "You already answered this question {how}.")?;
    }
    writeln!(out, "[{}]", actions(&view).join(" | "))
}

/// Commands that would currently be accepted, for the status line.
fn actions(view: &SessionView<'_>) -> Vec<&'static str> {
    let mut actions = Vec::new();
    if view.can_select() {
        actions.push("1-9 select");
    }
    if view.can_submit() {
        actions.push("s submit");
    }
    if view.can_advance() {
        actions.push("n next");
    }
    if view.total > 1 {
        actions.push("g <N> go to");
    }
    actions.push("q quit");
    actions
}

fn marker(mode: AnswerMode, selected: bool) -> &'static str {
    match (mode, selected) {
        (AnswerMode::Single, true) => "(*)",
        (AnswerMode::Single, false) => "( )",
        (AnswerMode::Multi, true) => "[x]",
        (AnswerMode::Multi, false) => "[ ]",
    }
}

fn verdict(view: &SessionView<'_>, id: OptionId) -> &'static str {
    match view.is_correct_option(id) {
        Some(true) => "  <- correct",
        _ => "",
    }
}

fn print_help(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "  1 / 1,3   select option(s) by number")?;
    writeln!(out, "  s         submit your answer")?;
    writeln!(out, "  n         next question")?;
    writeln!(out, "  g <N>     go to question N")?;
    writeln!(out, "  p         show progress")?;
    writeln!(out, "  q         finish and show your score")
}

fn print_summary(summary: &ExamSummary, out: &mut impl Write) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "Exam summary for {}", summary.candidate)?;
    writeln!(
        out,
        "  Correct:    {} / {} ({:.1}%)",
        summary.correct,
        summary.total,
        summary.score_percent()
    )?;
    writeln!(out, "  Incorrect:  {}", summary.incorrect)?;
    writeln!(out, "  Unanswered: {}", summary.unanswered)
}
