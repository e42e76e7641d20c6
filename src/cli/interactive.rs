use super::ui;
use crate::core::{CurrencyCode, Session};
use anyhow::{Context, Result, anyhow};
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::debug;

const HELP: &str = "\
Commands:
  c, currency <cad|usd|jpy|php>  select currency and fetch its rate
  a, amount <value>              enter a fiat amount
  s, sats <value>                enter a satoshi amount
  r, refresh                     fetch the rate again
  h, help                        show this help
  q, quit                        leave";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Currency(CurrencyCode),
    Amount(String),
    Sats(String),
    Refresh,
    Help,
    Quit,
}

pub fn parse_command(line: &str) -> Result<Command> {
    let line = line.trim();
    let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();

    match word.to_lowercase().as_str() {
        "c" | "currency" => Ok(Command::Currency(rest.parse()?)),
        // the value may be empty, which clears the other field
        "a" | "amount" => Ok(Command::Amount(rest.to_string())),
        "s" | "sats" => Ok(Command::Sats(rest.to_string())),
        "r" | "refresh" => Ok(Command::Refresh),
        "h" | "help" | "" => Ok(Command::Help),
        "q" | "quit" | "exit" => Ok(Command::Quit),
        other => Err(anyhow!("Unknown command: {}", other)),
    }
}

/// Runs the session loop over stdin/stdout.
pub async fn run(session: &mut Session) -> Result<()> {
    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();
    run_with_io(session, stdin, &mut stdout).await
}

/// Runs the session loop until `quit` or end of input.
pub async fn run_with_io<R, W>(session: &mut Session, reader: R, out: &mut W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    writeln!(out, "{}", ui::style_text("Currency to SATS Converter", ui::StyleType::Title))?;
    writeln!(out, "{}\n", ui::render_session(session))?;
    writeln!(out, "{}", ui::style_text(HELP, ui::StyleType::Subtle))?;

    let mut lines = reader.lines();
    loop {
        write!(out, "> ")?;
        out.flush()?;

        let Some(line) = lines.next_line().await.context("Failed to read input")? else {
            break;
        };

        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(e) => {
                debug!(input = %line, "Rejected command");
                writeln!(out, "{}", ui::style_text(&e.to_string(), ui::StyleType::Error))?;
                writeln!(out, "{}", ui::style_text(HELP, ui::StyleType::Subtle))?;
                continue;
            }
        };

        match command {
            Command::Currency(currency) => session.select_currency(currency).await,
            Command::Amount(text) => session.edit_amount(&text),
            Command::Sats(text) => session.edit_sats(&text),
            Command::Refresh => session.refresh_rate().await,
            Command::Help => {
                writeln!(out, "{}", ui::style_text(HELP, ui::StyleType::Subtle))?;
                continue;
            }
            Command::Quit => break,
        }

        writeln!(out, "{}", ui::render_session(session))?;
    }

    Ok(())
}
