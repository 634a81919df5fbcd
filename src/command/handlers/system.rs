//! System identity handlers (uname, whoami)
//!
//! Answers are fixed; nothing is read from the host.

use std::io::Write;

const KERNEL: &str = "Linux";
const HOSTNAME: &str = "localhost";
const RELEASE: &str = "3.13.0-24-generic";
const VERSION: &str = "#46-Ubuntu SMP Thu Apr 10 19:11:08 UTC 2014";
const MACHINE: &str = "x86_64";
const USER: &str = "root";

/// Print the kernel name, or everything with `-a`
pub fn uname(name: &str, args: &[String], out: &mut Vec<u8>) -> anyhow::Result<()> {
    match args.first().map(String::as_str) {
        None | Some("-s") => writeln!(out, "{}", KERNEL)?,
        Some("-a") => writeln!(
            out,
            "{} {} {} {} {} {} {} GNU/Linux",
            KERNEL, HOSTNAME, RELEASE, VERSION, MACHINE, MACHINE, MACHINE
        )?,
        Some("-n") => writeln!(out, "{}", HOSTNAME)?,
        Some("-r") => writeln!(out, "{}", RELEASE)?,
        Some("-m") => writeln!(out, "{}", MACHINE)?,
        Some(other) => {
            writeln!(out, "{}: invalid option -- '{}'", name, other.trim_start_matches('-'))?;
            anyhow::bail!("unsupported option {}", other);
        }
    }
    Ok(())
}

/// Print the effective user name
pub fn whoami(_name: &str, _args: &[String], out: &mut Vec<u8>) -> anyhow::Result<()> {
    writeln!(out, "{}", USER)?;
    Ok(())
}
