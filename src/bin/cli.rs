use apod::{
    apod::ApodClient,
    core::config::ApodConfig,
    eval::{self, Command},
    fetch::SearchSession,
    gallery,
    repl,
    search::DatePicker,
    utils::terminal,
};
use colored::*;
use rustyline::error::ReadlineError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

fn get_prompt(session: &SearchSession) -> String {
    format!(
        "{} {}",
        format!("apod:{}", session.form.mode()).blue().bold(),
        "> ".green().bold()
    )
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        println!("\nReceived Ctrl+C!");
        r.store(false, Ordering::SeqCst);
    })?;
    dotenv::dotenv().ok();
    env_logger::init();
    log::debug!("Logger initialized");

    let config = ApodConfig::from_env()?;
    let client = ApodClient::new(config)?;
    let mut session = SearchSession::new(Arc::new(client));

    let history_path = repl::default_history_path();
    let mut rl = repl::create_editor(&history_path)?;

    println!("{}", "Astronomy Picture of the Day".bold());
    println!("Type 'help' for commands, 'quit' to exit.\n");

    match session.load_today().await {
        Ok(_) => println!(
            "{}\n",
            gallery::render_gallery(session.results(), terminal::text_width())
        ),
        Err(e) => {
            log::error!("Initial load failed: {}", e);
            eprintln!("{}\n", eval::FETCH_FAILED.red());
        }
    }

    while running.load(Ordering::SeqCst) {
        let prompt = get_prompt(&session);
        match rl.readline(&prompt) {
            Ok(line) => {
                let input = line.trim();
                if input.is_empty() {
                    continue;
                }
                match input.parse::<Command>() {
                    Ok(Command::Quit) => break,
                    Ok(Command::Show(_)) | Ok(Command::Close) => terminal::clear_screen()?,
                    _ => {}
                }

                let picker = DatePicker::today();
                match eval::eval(input, &mut session, &picker).await {
                    Ok(output) if output.is_empty() => {}
                    Ok(output) => println!("{}", output),
                    Err(e) => eprintln!("{}", format!("Error: {}", e).red()),
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("Error: {:?}", err);
                break;
            }
        }
    }

    println!("\nGoodbye!");

    log::debug!("Saving REPL history to {:?}", history_path);
    if let Err(e) = rl.save_history() {
        log::error!("Failed to save history: {}", e);
    }

    terminal::restore()?;
    Ok(())
}
