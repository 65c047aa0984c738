//! A terminal chat for placing orders with the order bot.

#[macro_use]
extern crate tracing;

use std::io::Write as _;
use std::pin::pin;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use order_bot::command::Command;
use order_bot::config::AppConfig;
use order_bot::{Outcome, Session, SessionBuilder};
use order_bot_gemini_model::GeminiProvider;
use owo_colors::OwoColorize;
use tokio::io::{self, AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::select;
use tokio::sync::mpsc;
use tokio::time::sleep;

const BAR_CHAR: &str = "▎";

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            return;
        }
    };
    info!("using model {}", config.gemini.model());

    let (delta_tx, mut delta_rx) = mpsc::unbounded_channel::<String>();

    let mut session =
        SessionBuilder::with_model_provider(GeminiProvider::new(config.gemini))
            .with_catalog(config.catalog)
            .with_customer_care_number(config.customer_care_number)
            .on_reply_delta(move |delta| {
                delta_tx.send(delta.to_owned()).ok();
            })
            .build();

    let progress_style = ProgressStyle::with_template("{spinner} {wide_msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏");

    println!("{}", "Order Bot, type /help for commands.".bright_black());
    print_assistant(session.greeting());

    let mut stdin = BufReader::new(io::stdin()).lines();

    loop {
        print!("{}", prompt(&session));
        flush();

        let Some(line) = read_line(&mut stdin).await else {
            break;
        };
        let Some(command) = Command::parse(&line) else {
            continue;
        };

        let is_submit = matches!(command, Command::Submit(_));
        if let Command::Submit(text) = &command {
            println!("{}🧑 {}", BAR_CHAR.bright_green(), text);
        }

        let mut progress_bar = None;
        let mut streamed = false;

        let mut handle_fut = pin!(session.handle(command));
        let result = loop {
            if is_submit && !streamed {
                // Create a new progress bar if it has been finished.
                progress_bar
                    .get_or_insert_with(|| {
                        let progress_bar = ProgressBar::new_spinner();
                        progress_bar.set_style(progress_style.clone());
                        progress_bar.set_message("🤔 Thinking...");
                        progress_bar
                    })
                    .inc(1);
            }

            select! {
                biased;
                Some(delta) = delta_rx.recv() => {
                    // Finish the progress bar before printing anything else.
                    if let Some(progress_bar) = progress_bar.take() {
                        progress_bar.finish_and_clear();
                    }
                    print_delta(&delta, &mut streamed);
                }
                result = &mut handle_fut => break result,
                _ = sleep(Duration::from_millis(100)) => {}
            }
        };
        if let Some(progress_bar) = progress_bar.take() {
            progress_bar.finish_and_clear();
        }
        while let Ok(delta) = delta_rx.try_recv() {
            print_delta(&delta, &mut streamed);
        }

        match result {
            Ok(Outcome::Quit) => break,
            Ok(outcome) => print_outcome(outcome, streamed),
            Err(err) => {
                if streamed {
                    println!();
                }
                println!("{}❌ {}", BAR_CHAR.bright_red(), err.bright_red());
            }
        }
    }
}

fn print_outcome(outcome: Outcome, streamed: bool) {
    let bar = BAR_CHAR.bright_cyan();
    match outcome {
        Outcome::Replied(reply) => {
            if streamed {
                println!();
            } else {
                print_assistant(&reply);
            }
        }
        Outcome::Products(lines) => {
            println!("{bar}📦 Products:");
            for line in lines {
                println!("{bar}  {line}");
            }
        }
        Outcome::Selected(Some(product)) => {
            println!(
                "{bar}✅ Selected {}: {}",
                product.name.bright_white().bold(),
                product.details
            );
        }
        Outcome::Selected(None) => println!("{bar}Product selection cleared."),
        Outcome::CareMode(true) => println!("{bar}📞 Customer care mode is on."),
        Outcome::CareMode(false) => println!("{bar}Customer care mode is off."),
        Outcome::Cleared(greeting) => {
            println!(
                "{}⚠️  Conversation history cleared.",
                BAR_CHAR.bright_yellow()
            );
            print_assistant(&greeting);
        }
        Outcome::Log(lines) => {
            if lines.is_empty() {
                println!("{}", "No messages yet.".bright_black());
            }
            for line in lines {
                println!("{line}");
            }
        }
        Outcome::Help(help) => println!("{}", help.bright_black()),
        Outcome::Unknown(line) => {
            println!(
                "{}Unknown command {line}, try /help.",
                BAR_CHAR.bright_yellow()
            );
        }
        Outcome::Quit => {}
    }
}

fn print_assistant(text: &str) {
    println!("{}🤖 {}", BAR_CHAR.bright_cyan(), text.bright_white());
}

fn print_delta(delta: &str, streamed: &mut bool) {
    if !*streamed {
        print!("{}🤖 ", BAR_CHAR.bright_cyan());
        *streamed = true;
    }
    print!("{}", delta.bright_white());
    flush();
}

fn prompt(session: &Session) -> String {
    let assistant = session.assistant();
    let mut tags = Vec::new();
    if let Some(product) = assistant.state().selected_product() {
        tags.push(product.to_owned());
    }
    if assistant.customer_care_mode() {
        tags.push("care".to_owned());
    }
    if tags.is_empty() {
        "> ".to_owned()
    } else {
        format!("[{}] > ", tags.join(", "))
    }
}

#[inline]
fn flush() {
    if let Err(err) = std::io::stdout().flush() {
        warn!("error flushing stdout: {err}");
    }
}

async fn read_line(stdin: &mut Lines<BufReader<Stdin>>) -> Option<String> {
    match stdin.next_line().await {
        Ok(line) => line,
        Err(err) => {
            error!("error reading input: {}", err);
            None
        }
    }
}
