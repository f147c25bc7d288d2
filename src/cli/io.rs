//! Plain-text fact output
//!
//! - A single requested fact prints its bare value
//! - Otherwise one `name => value` line per fact

use std::io::{self, Write};

use super::errors::CliResult;

/// Write facts as `name => value` lines
pub fn write_facts<W, I>(writer: &mut W, facts: I) -> CliResult<()>
where
    W: Write,
    I: IntoIterator<Item = (String, String)>,
{
    for (name, value) in facts {
        writeln!(writer, "{} => {}", name, value)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write a bare value
pub fn write_value<W: Write>(writer: &mut W, value: &str) -> CliResult<()> {
    writeln!(writer, "{}", value)?;
    writer.flush()?;
    Ok(())
}

/// Standard output handle for the commands
pub fn stdout() -> io::StdoutLock<'static> {
    io::stdout().lock()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_facts() {
        let mut buffer = Vec::new();
        write_facts(
            &mut buffer,
            vec![
                ("kernel".to_string(), "Linux".to_string()),
                ("hostname".to_string(), "web01".to_string()),
            ],
        )
        .unwrap();
        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            "kernel => Linux\nhostname => web01\n"
        );
    }

    #[test]
    fn test_write_value() {
        let mut buffer = Vec::new();
        write_value(&mut buffer, "Debian").unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), "Debian\n");
    }
}
