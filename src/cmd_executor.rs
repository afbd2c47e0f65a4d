//! # Command Executor
//!
//! Parses and runs the interactive shell commands.
//!
//! ## Available Commands
//!
//! - `help`: Show available commands
//! - `echo <text>`: Echo text back
//! - `info`: Show system information
//! - `meminfo`: Kernel heap statistics
//! - `uptime`: Seconds since the timer started ticking
//! - `clear`: Clear the screen
//! - `panic`: Deliberately take a page fault to exercise the trap path
//! - `exit`: Leave through the exit syscall
//!
//! Commands return a `CommandResult`; the shell loop decides how to show it.

use alloc::format;
use alloc::string::String;
use core::str::SplitWhitespace;

use crate::interrupts::timer;
use crate::memory;

pub enum CommandResult {
    Output(String),
    Error(String),
    Clear,
    Exit,
}

pub struct CommandExecutor;

impl CommandExecutor {
    pub fn execute(input: &str) -> CommandResult {
        let trimmed = input.trim();

        if trimmed.is_empty() {
            return CommandResult::Output(String::new());
        }

        let mut parts = trimmed.split_whitespace();
        let cmd = match parts.next() {
            Some(c) => c,
            None => return CommandResult::Output(String::new()),
        };

        match cmd {
            "help" => Self::help(),
            "echo" => Self::echo(parts),
            "info" => Self::info(),
            "meminfo" => Self::meminfo(),
            "uptime" => Self::uptime(),
            "clear" => CommandResult::Clear,
            "panic" => Self::force_panic(),
            "exit" => CommandResult::Exit,
            _ => CommandResult::Error(format!(
                "Unknown command: {}\nType 'help' for available commands.",
                cmd
            )),
        }
    }

    fn help() -> CommandResult {
        CommandResult::Output(String::from(
            "Available commands:\n  \
             help      - Show this help\n  \
             echo      - Echo arguments\n  \
             info      - Show system information\n  \
             meminfo   - Kernel heap statistics\n  \
             uptime    - Seconds since boot\n  \
             clear     - Clear screen\n  \
             panic     - Calls a kernel panic\n  \
             exit      - Halt via the exit syscall",
        ))
    }

    fn echo(args: SplitWhitespace) -> CommandResult {
        let mut output = String::new();
        for word in args {
            if !output.is_empty() {
                output.push(' ');
            }
            output.push_str(word);
        }
        CommandResult::Output(output)
    }

    fn info() -> CommandResult {
        CommandResult::Output(String::from(
            "Onyx kernel\n  \
             Architecture: x86_64\n  \
             Build: bare-metal\n  \
             Type 'help' for available commands",
        ))
    }

    fn meminfo() -> CommandResult {
        let stats = memory::heap_stats();
        CommandResult::Output(format!(
            "Heap statistics:\n  \
             Total: {} KiB\n  \
             Used : {} KiB\n  \
             Live allocations: {}",
            stats.total / 1024,
            stats.used / 1024,
            stats.allocations
        ))
    }

    fn uptime() -> CommandResult {
        CommandResult::Output(format!("Uptime: {} second(s)", timer::uptime_seconds()))
    }

    fn force_panic() -> CommandResult {
        // Touch an unmapped page on purpose: the point of this command is to
        // drive the real page-fault path end to end, so the machine goes
        // down through the same code a genuine fault would take.
        unsafe {
            core::ptr::read_volatile(0xdead_0000_0000 as *const u8);
        }
        CommandResult::Error(String::from("panic: the fault never arrived"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output_of(input: &str) -> String {
        match CommandExecutor::execute(input) {
            CommandResult::Output(text) => text,
            _ => panic!("expected output"),
        }
    }

    #[test]
    fn empty_input_produces_empty_output() {
        assert_eq!(output_of(""), "");
        assert_eq!(output_of("   "), "");
    }

    #[test]
    fn echo_joins_its_arguments() {
        assert_eq!(output_of("echo hello onyx"), "hello onyx");
        assert_eq!(output_of("  echo   spaced   out  "), "spaced out");
    }

    #[test]
    fn unknown_commands_error_with_a_hint() {
        match CommandExecutor::execute("frobnicate") {
            CommandResult::Error(text) => {
                assert!(text.contains("frobnicate"));
                assert!(text.contains("help"));
            }
            _ => panic!("expected an error"),
        }
    }

    #[test]
    fn help_lists_the_panic_command() {
        assert!(output_of("help").contains("panic"));
    }

    #[test]
    fn clear_and_exit_map_to_their_variants() {
        assert!(matches!(CommandExecutor::execute("clear"), CommandResult::Clear));
        assert!(matches!(CommandExecutor::execute("exit"), CommandResult::Exit));
    }

    #[test]
    fn uptime_reports_seconds() {
        assert!(output_of("uptime").starts_with("Uptime: "));
    }
}
