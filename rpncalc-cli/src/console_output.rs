// Console implementation of Output - colored messages on stdout, errors on stderr

use crate::logging::{self, FilterHandle};
use colored::Colorize;
use rpncalc_core::{MessageKind, Output};
use std::io::{self, Write};

pub struct ConsoleOutput {
    filter: Option<FilterHandle>,
}

impl ConsoleOutput {
    pub fn new(filter: Option<FilterHandle>) -> Self {
        ConsoleOutput { filter }
    }
}

impl Output for ConsoleOutput {
    fn message(&mut self, kind: MessageKind, text: &str) {
        match kind {
            MessageKind::Info => println!("{}", text),
            MessageKind::Result => println!("{}", text.green().bold()),
            MessageKind::Warning => println!("{}", text.yellow()),
            MessageKind::Error => eprintln!("{} {}", "Error:".red().bold(), text.red()),
            MessageKind::Header => println!("{}", text.cyan().bold().underline()),
        }
    }

    fn clear_screen(&mut self) {
        print!("\x1b[2J\x1b[H");
        let _ = io::stdout().flush();
    }

    fn set_debug(&mut self, enabled: bool) {
        if let Some(handle) = &self.filter {
            logging::set_debug(handle, enabled);
        }
    }
}
