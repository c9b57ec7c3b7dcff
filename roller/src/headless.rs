//! Headless mode for the dice roller.
//!
//! A line-oriented protocol on stdin/stdout for scripts and automated tests.
//! Each roll waits for its result to land before the next line is read.

use roller_core::{HeadlessRoll, HeadlessRoller, RollerConfig};
use std::io::{self, BufRead, Write};

const HELP_LINES: [&str; 7] = [
    "  roll (r)  - Roll the die",
    "  reset     - Zero the roll counter",
    "  status    - Show the die and current state",
    "  json      - Print the current state as JSON",
    "  help      - Show this help",
    "  quit      - Exit",
    "",
];

/// Run the roller in headless mode on stdin/stdout.
pub async fn run_headless(config: &RollerConfig) -> io::Result<()> {
    let mut roller = HeadlessRoller::new(config);

    println!("=== Dice Roller Headless Mode ===");
    println!("Commands:");
    for line in HELP_LINES {
        println!("{line}");
    }

    // Replies lock stdout per write, never for the whole session
    let stdin = io::stdin();
    let result = run_protocol(&mut roller, stdin.lock(), io::stdout()).await;

    roller.finish().await;
    result
}

/// Drive `roller` from `input` until EOF or `quit`, writing replies to `output`.
pub async fn run_protocol<R: BufRead, W: Write>(
    roller: &mut HeadlessRoller,
    input: R,
    mut output: W,
) -> io::Result<()> {
    for line in input.lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                eprintln!("Error reading input: {e}");
                break;
            }
        };

        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match line.to_ascii_lowercase().as_str() {
            "roll" | "r" => match roller.roll().await {
                HeadlessRoll::Landed(record) => writeln!(
                    output,
                    "[ROLL] face={} count={} color={} angle={}",
                    record.face,
                    record.roll_count,
                    record.background,
                    roller.snapshot().rotation_angle
                )?,
                HeadlessRoll::Busy => writeln!(output, "[BUSY]")?,
                HeadlessRoll::Queued => writeln!(output, "[QUEUED]")?,
            },
            "reset" => {
                roller.reset();
                writeln!(output, "[RESET] count=0")?;
            }
            "status" => {
                writeln!(output, "[STATUS]")?;
                for status_line in roller.status_lines() {
                    writeln!(output, "  {status_line}")?;
                }
            }
            "json" => match serde_json::to_string(&roller.snapshot()) {
                Ok(json) => writeln!(output, "{json}")?,
                Err(e) => writeln!(output, "[ERROR] {e}")?,
            },
            "help" => {
                writeln!(output, "[HELP]")?;
                for help_line in HELP_LINES {
                    writeln!(output, "{help_line}")?;
                }
            }
            "quit" | "exit" => {
                writeln!(output, "Goodbye!")?;
                break;
            }
            _ => writeln!(output, "[ERROR] Unknown command. Type help for help.")?,
        }
        output.flush()?;
    }

    Ok(())
}
