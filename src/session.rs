//! Interactive form session over a line-oriented input

use crate::client::PredictionClient;
use crate::dashboard::Dashboard;
use crate::profile::{FieldError, ProfileField};
use crate::render::{render_dashboard, render_notification, ANALYZING};
use std::io::Write;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

pub const HELP: &str = "\
Commands:
  show                   print the form and the last prediction
  set <field> <value>    edit a field (age, gender, income, spending_score,
                         region, purchase_frequency, avg_order_value, recency)
  predict                send the current profile for scoring
  reset                  restore default form values
  help                   show this message
  quit                   leave the session";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Show,
    Set(ProfileField, String),
    Predict,
    Reset,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CommandError {
    #[error("unknown command '{0}', type `help` for the list")]
    Unknown(String),
    #[error("usage: set <field> <value>")]
    MissingArgument,
    #[error(transparent)]
    Field(#[from] FieldError),
}

impl Command {
    /// Parse one input line. Blank lines yield `None`.
    pub fn parse(line: &str) -> Result<Option<Command>, CommandError> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Ok(None);
        };

        let command = match verb.to_ascii_lowercase().as_str() {
            "show" => Command::Show,
            "predict" => Command::Predict,
            "reset" => Command::Reset,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            "set" => {
                let field = words.next().ok_or(CommandError::MissingArgument)?;
                let value = words.collect::<Vec<_>>().join(" ");
                if value.is_empty() {
                    return Err(CommandError::MissingArgument);
                }
                Command::Set(field.parse()?, value)
            }
            other => return Err(CommandError::Unknown(other.to_string())),
        };
        Ok(Some(command))
    }
}

/// Read commands from `input` until `quit` or end of input
pub async fn run<R, W>(
    dashboard: &mut Dashboard,
    client: &PredictionClient,
    input: R,
    out: &mut W,
) -> crate::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    writeln!(out, "{}", HELP)?;
    let mut lines = input.lines();

    loop {
        write!(out, "> ")?;
        out.flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let command = match Command::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                writeln!(out, "{}", e)?;
                continue;
            }
        };

        match command {
            Command::Show => write!(out, "{}", render_dashboard(dashboard))?,
            Command::Set(field, value) => match dashboard.edit(field, &value) {
                Ok(()) => writeln!(out, "{} = {}", field, value)?,
                Err(e) => writeln!(out, "{}", e)?,
            },
            Command::Predict => predict_and_report(dashboard, client, out).await?,
            Command::Reset => {
                dashboard.reset_profile();
                writeln!(out, "Form reset to defaults")?;
            }
            Command::Help => writeln!(out, "{}", HELP)?,
            Command::Quit => break,
        }
    }

    Ok(())
}

/// Submit the current form, showing the busy marker while the call is out,
/// then print notifications and the refreshed dashboard
pub async fn predict_and_report<W: Write>(
    dashboard: &mut Dashboard,
    client: &PredictionClient,
    out: &mut W,
) -> crate::Result<()> {
    match dashboard.begin_submit() {
        Some(snapshot) => {
            writeln!(out, "{}", ANALYZING)?;
            out.flush()?;
            let outcome = client.predict(&snapshot).await;
            dashboard.finish_submit(outcome);
        }
        None => writeln!(out, "A prediction is already in progress")?,
    }

    for note in dashboard.take_notifications() {
        writeln!(out, "{}", render_notification(&note))?;
    }
    write!(out, "{}", render_dashboard(dashboard))?;
    Ok(())
}
