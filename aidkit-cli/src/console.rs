//! Interactive console loop for the assistant.

use aidkit_agent::Coordinator;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

/// Run a read–ask–print loop until EOF, interrupt, or `exit`/`quit`.
pub async fn run(coordinator: &Coordinator) -> anyhow::Result<()> {
    println!("aidkit — describe an injury for first-aid steps, or just talk.");
    println!("Type 'exit' to quit.\n");

    let mut editor = DefaultEditor::new()?;

    loop {
        match editor.readline("you> ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
                    break;
                }
                let _ = editor.add_history_entry(line);

                let reply = coordinator.handle(line).await;
                println!("\naidkit> {}\n", reply.text);
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        }
    }

    println!("Take care.");
    Ok(())
}
