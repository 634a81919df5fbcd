//! echo handler

use std::io::Write;

/// Write the arguments joined by single spaces
pub fn echo(_name: &str, args: &[String], out: &mut Vec<u8>) -> anyhow::Result<()> {
    writeln!(out, "{}", args.join(" "))?;
    Ok(())
}
