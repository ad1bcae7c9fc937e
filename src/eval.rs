use anyhow::{anyhow, Result};
use colored::*;
use std::str::FromStr;

use crate::fetch::{SearchOutcome, SearchSession};
use crate::gallery;
use crate::search::{DatePicker, SearchMode};
use crate::utils::{progress::LoadingIndicator, terminal};

pub const FETCH_FAILED: &str = "Failed to fetch APOD data. Please try again.";

/// Command words understood by the REPL, in the order `help` lists them.
pub const COMMANDS: &[&str] = &[
    "mode", "date", "start", "end", "count", "clear", "form", "search", "today", "show",
    "close", "help", "quit",
];

/// Commands whose argument is a date.
pub const DATE_COMMANDS: &[&str] = &["date", "start", "end"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Mode(SearchMode),
    Date(Option<String>),
    Start(Option<String>),
    End(Option<String>),
    Count(Option<String>),
    Clear,
    Form,
    Search,
    Today,
    Show(usize),
    Close,
    Quit,
}

impl FromStr for Command {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.split_whitespace();
        let word = parts
            .next()
            .ok_or_else(|| anyhow!("Empty command"))?
            .to_lowercase();
        let arg = parts.next().map(str::to_string);
        if parts.next().is_some() {
            return Err(anyhow!("Too many arguments for '{}'", word));
        }

        match (word.as_str(), arg) {
            ("help" | "?", None) => Ok(Command::Help),
            ("mode", Some(mode)) => SearchMode::from_str(&mode)
                .map(Command::Mode)
                .map_err(|_| anyhow!("Unknown mode '{}', expected one of: {}", mode, SearchMode::names().join(", "))),
            ("mode", None) => Err(anyhow!("Usage: mode <{}>", SearchMode::names().join("|"))),
            ("date", arg) => Ok(Command::Date(arg)),
            ("start", arg) => Ok(Command::Start(arg)),
            ("end", arg) => Ok(Command::End(arg)),
            ("count", arg) => Ok(Command::Count(arg)),
            ("clear", None) => Ok(Command::Clear),
            ("form", None) => Ok(Command::Form),
            ("search" | "go", None) => Ok(Command::Search),
            ("today", None) => Ok(Command::Today),
            ("show", Some(n)) => n
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .map(Command::Show)
                .ok_or_else(|| anyhow!("Usage: show <number>")),
            ("show", None) => Err(anyhow!("Usage: show <number>")),
            ("close", None) => Ok(Command::Close),
            ("quit" | "exit", None) => Ok(Command::Quit),
            (cmd, Some(_)) if COMMANDS.contains(&cmd) => {
                Err(anyhow!("'{}' takes no argument", cmd))
            }
            (cmd, _) => Err(anyhow!("Unknown command '{}'. Type 'help' for a list.", cmd)),
        }
    }
}

pub fn help() -> String {
    let lines = [
        ("mode <date|range|random>", "switch search mode (clears the form)"),
        ("date <YYYY-MM-DD>", "set the date (single date mode)"),
        ("start <YYYY-MM-DD>", "set the start date (range mode)"),
        ("end <YYYY-MM-DD>", "set the end date (range mode)"),
        ("count <1-100>", "set the number of random images"),
        ("clear", "clear the fields of the current mode"),
        ("form", "show the search form"),
        ("search", "run the search"),
        ("today", "show today's picture"),
        ("show <n>", "open picture n"),
        ("close", "close the open picture"),
        ("quit", "exit"),
    ];
    lines
        .iter()
        .map(|(cmd, what)| format!("  {:<26} {}", cmd.green(), what))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_form(session: &SearchSession) -> String {
    let mut out = format!("{}", session.form.to_string().cyan());
    if let Some(error) = session.form.error() {
        out.push('\n');
        out.push_str(&format!("{}", error.red()));
    }
    out
}

/// Evaluates one REPL line against the session and returns the text to print.
/// `Quit` is left to the caller.
pub async fn eval(input: &str, session: &mut SearchSession, picker: &DatePicker) -> Result<String> {
    let command = input.trim().parse::<Command>()?;
    log::debug!("Evaluating {:?}", command);

    match command {
        Command::Help => Ok(help()),
        Command::Mode(mode) => {
            session.form.on_mode_change(mode);
            Ok(render_form(session))
        }
        Command::Date(arg) => {
            let date = arg.map(|a| picker.parse(&a)).transpose()?;
            session.form.set_date(date, picker)?;
            Ok(render_form(session))
        }
        Command::Start(arg) => {
            let date = arg.map(|a| picker.parse(&a)).transpose()?;
            session.form.set_start_date(date, picker)?;
            Ok(render_form(session))
        }
        Command::End(arg) => {
            let date = arg.map(|a| picker.parse(&a)).transpose()?;
            session.form.set_end_date(date, picker)?;
            Ok(render_form(session))
        }
        Command::Count(arg) => {
            session.form.set_count(arg.as_deref())?;
            Ok(render_form(session))
        }
        Command::Clear => {
            let mode = session.form.mode();
            session.form.on_mode_change(mode);
            Ok(render_form(session))
        }
        Command::Form => Ok(render_form(session)),
        Command::Search => {
            let ticket = session.submit_form()?;
            run(session, ticket).await
        }
        Command::Today => {
            let ticket = session.begin(Default::default());
            run(session, ticket).await
        }
        Command::Show(n) => {
            let record = session
                .select(n - 1)
                .ok_or_else(|| anyhow!("No picture number {}", n))?;
            Ok(gallery::render_detail(record, terminal::text_width()))
        }
        Command::Close => {
            session.close();
            Ok(gallery::render_gallery(session.results(), terminal::text_width()))
        }
        Command::Quit => Ok(String::new()),
    }
}

async fn run(session: &mut SearchSession, ticket: crate::fetch::Ticket) -> Result<String> {
    let spinner = LoadingIndicator::start(&format!("Searching APOD ({})", ticket.params));
    let completed = session.fetcher().fetch(ticket).await;
    spinner.finish();

    match session.apply(completed) {
        Ok(SearchOutcome::Loaded(_)) => Ok(gallery::render_gallery(
            session.results(),
            terminal::text_width(),
        )),
        Ok(SearchOutcome::Superseded) => Ok(String::new()),
        Err(e) => {
            log::error!("APOD fetch failed: {}", e);
            Err(anyhow!(FETCH_FAILED))
        }
    }
}
