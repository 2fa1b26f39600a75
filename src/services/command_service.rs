use std::io::Write;

use anyhow::Result;
use colored::Colorize;
use log::debug;

use crate::models::conversion_model::{example_rows, PriceConversion, TickConversion};
use crate::utils::core_math::Decimal;
use crate::utils::display::format_price;
use crate::utils::error::ParseError;

const RULE_WIDTH: usize = 60;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    TickToPrice(i64),
    PriceToTick(Decimal),
    Help,
    Examples,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

impl Command {
    /// Parses one input line. Blank lines yield `None`.
    pub fn parse(line: &str) -> Result<Option<Command>, ParseError> {
        let normalized = line.trim().to_lowercase();
        match normalized.as_str() {
            "" => return Ok(None),
            "q" | "quit" | "exit" => return Ok(Some(Command::Quit)),
            "h" | "help" => return Ok(Some(Command::Help)),
            "e" | "examples" => return Ok(Some(Command::Examples)),
            _ => {}
        }

        let parts: Vec<&str> = normalized.split_whitespace().collect();
        let [command, value] = parts.as_slice() else {
            return Err(ParseError::InvalidFormat(line.trim().to_string()));
        };

        match *command {
            "t" => value
                .parse::<i64>()
                .map(|tick| Some(Command::TickToPrice(tick)))
                .map_err(|_| ParseError::InvalidTick(value.to_string())),
            "p" => value
                .parse::<Decimal>()
                .map(|price| Some(Command::PriceToTick(price)))
                .map_err(|source| ParseError::InvalidPrice {
                    input: value.to_string(),
                    source,
                }),
            other => Err(ParseError::UnknownCommand(other.to_string())),
        }
    }
}

pub fn execute<W: Write>(command: &Command, out: &mut W) -> Result<Flow> {
    debug!("executing {:?}", command);
    match command {
        Command::TickToPrice(tick) => {
            let conversion = TickConversion::from_tick(*tick)?;
            print_tick_conversion(out, &conversion)?;
        }
        Command::PriceToTick(price) => {
            let conversion = PriceConversion::from_price(*price)?;
            print_price_conversion(out, &conversion)?;
        }
        Command::Help => {
            print_header(out)?;
            print_examples(out)?;
        }
        Command::Examples => print_examples(out)?,
        Command::Quit => {
            writeln!(out, "👋 Goodbye!")?;
            return Ok(Flow::Quit);
        }
    }
    Ok(Flow::Continue)
}

pub fn print_header<W: Write>(out: &mut W) -> Result<()> {
    writeln!(
        out,
        "{}",
        "🔄 Interactive Tick-Price Calculator (price = 1.0001^tick)".bold()
    )?;
    writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;
    writeln!(out, "Commands:")?;
    writeln!(out, "  t <tick>   - Convert tick to price")?;
    writeln!(out, "  p <price>  - Convert price to tick")?;
    writeln!(out, "  e          - Show examples")?;
    writeln!(out, "  h or help  - Show this help")?;
    writeln!(out, "  q or quit  - Exit")?;
    writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;
    Ok(())
}

pub fn print_examples<W: Write>(out: &mut W) -> Result<()> {
    writeln!(out, "\n💡 Examples:")?;
    writeln!(out, "{}", "-".repeat(40))?;
    for row in example_rows()? {
        writeln!(
            out,
            "  Tick {:6} = {:>15} ({})",
            row.tick,
            format_price(&row.price),
            row.description
        )?;
    }
    writeln!(out)?;
    Ok(())
}

fn print_tick_conversion<W: Write>(out: &mut W, conversion: &TickConversion) -> Result<()> {
    writeln!(out, "{}", format!("📊 Tick {}:", conversion.tick).bold())?;
    writeln!(out, "   0to1 Price: {}", format_price(&conversion.price_0to1))?;
    writeln!(out, "   1to0 Price: {}", format_price(&conversion.price_1to0))?;
    if conversion.round_trip_ok {
        writeln!(out, "   {}", "✅ Round-trip accurate".green())?;
    } else {
        writeln!(
            out,
            "   {}",
            "⚠️  Round-trip has small error (normal for extreme values)".yellow()
        )?;
    }
    Ok(())
}

fn print_price_conversion<W: Write>(out: &mut W, conversion: &PriceConversion) -> Result<()> {
    writeln!(
        out,
        "{}",
        format!("💰 Price {}:", format_price(&conversion.price)).bold()
    )?;
    writeln!(out, "   Tick: {}", conversion.tick)?;
    writeln!(
        out,
        "   Verified Price: {}",
        format_price(&conversion.verified_price)
    )?;
    writeln!(
        out,
        "   Inverse Price: {}",
        format_price(&conversion.inverse_price)
    )?;
    if conversion.is_high_accuracy() {
        let line = format!("✅ High accuracy ({:.6}% difference)", conversion.accuracy);
        writeln!(out, "   {}", line.green())?;
    } else {
        let line = format!("⚠️  Accuracy: {:.6}% difference", conversion.accuracy);
        writeln!(out, "   {}", line.yellow())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(command: Command) -> (Flow, String) {
        colored::control::set_override(false);
        let mut out = Vec::new();
        let flow = execute(&command, &mut out).unwrap();
        (flow, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("").unwrap(), None);
        assert_eq!(Command::parse("   \n").unwrap(), None);
        assert_eq!(Command::parse("q").unwrap(), Some(Command::Quit));
        assert_eq!(Command::parse("EXIT").unwrap(), Some(Command::Quit));
        assert_eq!(Command::parse("help").unwrap(), Some(Command::Help));
        assert_eq!(Command::parse("e").unwrap(), Some(Command::Examples));
        assert_eq!(
            Command::parse("t 23027").unwrap(),
            Some(Command::TickToPrice(23027))
        );
        assert_eq!(
            Command::parse("  T   -5 ").unwrap(),
            Some(Command::TickToPrice(-5))
        );
        assert_eq!(
            Command::parse("p 10.0").unwrap(),
            Some(Command::PriceToTick("10".parse().unwrap()))
        );
        assert_eq!(
            Command::parse("P 1E-3").unwrap(),
            Some(Command::PriceToTick("0.001".parse().unwrap()))
        );
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            Command::parse("t"),
            Err(ParseError::InvalidFormat("t".to_string()))
        );
        assert_eq!(
            Command::parse("t 1 2"),
            Err(ParseError::InvalidFormat("t 1 2".to_string()))
        );
        assert_eq!(
            Command::parse("x 1"),
            Err(ParseError::UnknownCommand("x".to_string()))
        );
        assert_eq!(
            Command::parse("t 1.5"),
            Err(ParseError::InvalidTick("1.5".to_string()))
        );
        assert_eq!(
            Command::parse("t 99999999999999999999999"),
            Err(ParseError::InvalidTick("99999999999999999999999".to_string()))
        );
        assert!(matches!(
            Command::parse("p ten"),
            Err(ParseError::InvalidPrice { .. })
        ));
    }

    #[test]
    fn test_execute_tick() {
        let (flow, output) = run(Command::TickToPrice(23027));
        assert_eq!(flow, Flow::Continue);
        assert!(output.contains("📊 Tick 23027:"));
        assert!(output.contains("0to1 Price: 9.9999977968"));
        assert!(output.contains("1to0 Price: 0.100000022"));
        assert!(output.contains("Round-trip accurate"));
    }

    #[test]
    fn test_execute_price() {
        let (_, output) = run(Command::PriceToTick("10".parse().unwrap()));
        assert!(output.contains("💰 Price 10:"));
        assert!(output.contains("Tick: 23027"));
        assert!(output.contains("Verified Price: 9.9999977968"));
        assert!(output.contains("Inverse Price: 0.1"));
        assert!(output.contains("High accuracy"));
    }

    #[test]
    fn test_execute_out_of_range_fails() {
        let mut out = Vec::new();
        let err = execute(&Command::TickToPrice(559_681), &mut out).unwrap_err();
        assert!(err.to_string().contains("559681"));

        let err = execute(&Command::PriceToTick("0".parse().unwrap()), &mut out).unwrap_err();
        assert_eq!(err.to_string(), "Price must be positive");
    }

    #[test]
    fn test_execute_examples_and_quit() {
        let (flow, output) = run(Command::Help);
        assert_eq!(flow, Flow::Continue);
        assert!(output.contains("Commands:"));
        assert!(output.contains("(~10:1 price ratio)"));
        assert!(output.contains("Tick  23027 ="));

        let (flow, output) = run(Command::Quit);
        assert_eq!(flow, Flow::Quit);
        assert!(output.contains("Goodbye"));
    }
}
