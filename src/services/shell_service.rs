use std::io::{BufRead, Write};

use anyhow::{anyhow, Context, Result};
use colored::Colorize;
use log::info;

use crate::config::AppConfig;

use super::command_service::{execute, print_examples, print_header, Command, Flow};

/// Interactive loop. Errors are reported per command; the session ends on
/// `q`, end of input, or a failed read.
pub fn run_session<R: BufRead, W: Write>(mut input: R, out: &mut W, config: &AppConfig) -> Result<()> {
    print_header(out)?;
    if config.show_examples {
        print_examples(out)?;
    }

    let mut line = String::new();
    loop {
        write!(out, "{}", config.prompt)?;
        out.flush()?;

        line.clear();
        let read = input.read_line(&mut line).context("Failed to read command")?;
        if read == 0 {
            writeln!(out, "\n👋 Goodbye!")?;
            info!("input closed, ending session");
            return Ok(());
        }

        match run_line(&line, out) {
            Ok(Flow::Quit) => return Ok(()),
            Ok(Flow::Continue) => {}
            Err(err) => writeln!(out, "{} {}", "❌ Error:".red(), err)?,
        }
    }
}

fn run_line<W: Write>(line: &str, out: &mut W) -> Result<Flow> {
    match Command::parse(line)? {
        Some(command) => execute(&command, out),
        None => Ok(Flow::Continue),
    }
}

/// Runs a single command given on the command line.
pub fn run_once<W: Write>(line: &str, out: &mut W) -> Result<()> {
    let command = Command::parse(line)?.ok_or_else(|| anyhow!("No command given"))?;
    execute(&command, out)?;
    Ok(())
}
