// REPL using editline with tokio spawn_blocking

use colored::Colorize;
use editline::{LineEditor, terminals::StdioTerminal};
use rpncalc_core::Session;
use std::io::Write;
use tracing::debug;

fn print_banner() {
    println!();
    println!(" ____  ____  _   _           _");
    println!("|  _ \\|  _ \\| \\ | | ___ __ _| | ___");
    println!("| |_) | |_) |  \\| |/ __/ _` | |/ __|");
    println!("|  _ <|  __/| |\\  | (_| (_| | | (__");
    println!("|_| \\_\\_|   |_| \\_|\\___\\__,_|_|\\___| v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Type `help` for the list of commands");
    println!("Type `exit` or press Ctrl-D to save and quit");
    println!();
}

fn print_stack(session: &Session) {
    let mut lines = session.render().into_iter();
    if let Some(status) = lines.next() {
        println!("{}", status.cyan());
    }
    for line in lines {
        println!("{}", line);
    }
}

pub async fn run_repl(mut session: Session) -> anyhow::Result<()> {
    print_banner();
    print_stack(&session);

    // Create editline editor and terminal (sync)
    let mut editor = LineEditor::new(1024, 50);
    let mut terminal = StdioTerminal::new();

    loop {
        print!("\n> ");
        std::io::stdout().flush()?;

        // Read a line using editline in a blocking task
        let (ed, term, read_result) = tokio::task::spawn_blocking(move || {
            let result = editor.read_line(&mut terminal);
            (editor, terminal, result)
        })
        .await?;
        editor = ed;
        terminal = term;

        match read_result {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                debug!("input '{}'", trimmed);
                session.execute(trimmed);
                if session.quit_requested() {
                    break;
                }
                println!();
                print_stack(&session);
            }
            Err(editline::Error::Eof) | Err(editline::Error::Interrupted) => {
                println!();
                break;
            }
            Err(e) => {
                eprintln!("Input error: {}", e);
                break;
            }
        }
    }

    if let Err(e) = session.save_state() {
        session.error(&format!("Could not save the stacks: {}", e));
    }
    println!("Goodbye!");
    Ok(())
}
