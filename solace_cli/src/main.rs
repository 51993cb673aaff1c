use clap::{Parser, Subcommand};
use solace_core::*;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "solace")]
#[command(about = "Wellness companion: mood check-ins and guided coping exercises", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override config file location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Show info-level logs on stderr
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the mood detected in a piece of text
    Classify {
        /// Text to classify
        #[arg(required = true)]
        text: Vec<String>,

        /// Print JSON instead of the bare mood
        #[arg(long)]
        json: bool,
    },

    /// Talk with the companion
    Chat {
        /// Send these messages and exit instead of reading stdin
        #[arg(long = "message", short = 'm')]
        messages: Vec<String>,

        /// Skip the typing delay
        #[arg(long)]
        no_delay: bool,

        /// Seed for picking default replies
        #[arg(long)]
        seed: Option<u64>,
    },

    /// List guided exercises
    Exercises {
        /// Only this category (breathing, mindfulness, grounding, movement, cognitive)
        #[arg(long)]
        category: Option<String>,

        /// Only favorites
        #[arg(long)]
        favorites: bool,
    },

    /// Run a guided exercise
    Run {
        /// Exercise id, e.g. box-breathing
        id: String,

        /// Tick without waiting (for testing)
        #[arg(long)]
        fast: bool,

        /// Mark the exercise complete right after starting
        #[arg(long)]
        auto_complete: bool,

        /// Only print the final result
        #[arg(long)]
        quiet: bool,

        /// Read pause/resume, reset and done commands from stdin
        #[arg(long, conflicts_with_all = ["fast", "auto_complete"])]
        interactive: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        solace_core::logging::init();
    } else {
        solace_core::logging::init_with_level("warn");
    }

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    match cli.command {
        Commands::Classify { text, json } => cmd_classify(&text.join(" "), json),
        Commands::Chat {
            messages,
            no_delay,
            seed,
        } => cmd_chat(messages, no_delay, seed, &config),
        Commands::Exercises {
            category,
            favorites,
        } => cmd_exercises(category, favorites),
        Commands::Run {
            id,
            fast,
            auto_complete,
            quiet,
            interactive,
        } => {
            let mode = if interactive {
                RunMode::Interactive
            } else if auto_complete {
                RunMode::AutoComplete
            } else if fast {
                RunMode::Fast
            } else {
                RunMode::Timed
            };
            cmd_run(&id, mode, quiet, &config)
        }
    }
}

fn cmd_classify(text: &str, json: bool) -> Result<()> {
    let mood = classify(text);

    if json {
        let out = serde_json::json!({
            "mood": mood,
            "notice": mood.notice(),
        });
        println!("{}", serde_json::to_string(&out)?);
    } else {
        println!("{}", mood);
    }

    Ok(())
}

fn cmd_chat(messages: Vec<String>, no_delay: bool, seed: Option<u64>, config: &Config) -> Result<()> {
    let delay_ms = if no_delay { 0 } else { config.chat.typing_delay_ms };
    let delay_ms = i64::try_from(delay_ms)
        .map_err(|_| Error::Config(format!("chat.typing_delay_ms out of range: {}", delay_ms)))?;
    let delay = chrono::Duration::milliseconds(delay_ms);
    let responder = match seed {
        Some(seed) => Responder::seeded(seed),
        None => Responder::new(),
    };
    let mut session = ChatSession::with_responder(&config.chat.user_name, delay, responder);

    if let Some(welcome) = session.transcript().first() {
        println!("Solace: {}\n", welcome.text);
    }

    if !messages.is_empty() {
        for message in &messages {
            println!("You: {}", message.trim());
            respond(&mut session, message);
        }
        return Ok(());
    }

    println!("(type /quit or press Ctrl-D to leave)");
    let stdin = io::stdin();
    loop {
        print!("You: ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        if line.trim() == "/quit" {
            break;
        }
        respond(&mut session, &line);
    }

    session.abandon_pending();
    println!("\nTake care of yourself. 💙");
    Ok(())
}

fn respond(session: &mut ChatSession, text: &str) {
    let Some(id) = session.submit(text) else {
        return;
    };

    if let Ok(delay) = session.typing_delay().to_std() {
        if !delay.is_zero() {
            println!("  typing...");
            std::thread::sleep(delay);
        }
    }

    if let Some(reply) = session.deliver(id) {
        println!("\nSolace: {}\n", reply.message.text);
        match reply.notice {
            Some(Notice::Urgent(text)) => println!("[!] {}\n", text),
            Some(Notice::Info(text)) => println!("[i] {}\n", text),
            None => {}
        }
    }
}

fn cmd_exercises(category: Option<String>, favorites: bool) -> Result<()> {
    let catalog = get_default_catalog();
    catalog.ensure_valid()?;

    let category = category.and_then(|c| match ExerciseCategory::parse(&c) {
        Some(parsed) => Some(parsed),
        None => {
            eprintln!("Unknown category: {}. Showing all exercises.", c);
            None
        }
    });

    let mut exercises = match category {
        Some(c) => catalog.by_category(c),
        None => catalog.all(),
    };
    if favorites {
        exercises.retain(|d| d.favorite);
    }

    if exercises.is_empty() {
        println!("No exercises match.");
        return Ok(());
    }

    for def in exercises {
        println!(
            "{} {:<16} {} ({}, {:?}, {} steps)",
            if def.favorite { "★" } else { " " },
            def.id,
            def.title,
            def.duration_label,
            def.category,
            def.steps.len()
        );
        println!("    {}", def.description);
    }

    Ok(())
}

/// Renders player cues as terminal output
struct ConsoleCues {
    steps: Vec<ExerciseStep>,
    sound: bool,
    quiet: bool,
    position: usize,
    started: bool,
}

impl ConsoleCues {
    fn new(steps: Vec<ExerciseStep>, sound: bool, quiet: bool) -> Self {
        Self {
            steps,
            sound,
            quiet,
            position: 0,
            started: false,
        }
    }

    /// Forget progress after the player was reset
    fn rewind(&mut self) {
        self.position = 0;
        self.started = false;
    }

    fn announce_step(&self, index: usize) -> Result<()> {
        let step = self
            .steps
            .get(index)
            .ok_or_else(|| Error::Cue(format!("no step at index {}", index)))?;
        println!(
            "  [{}/{}] {} ({}s)",
            index + 1,
            self.steps.len(),
            step.instruction,
            step.duration_seconds
        );
        Ok(())
    }
}

impl CueSink for ConsoleCues {
    fn cue(&mut self, cue: Cue) -> Result<()> {
        if self.quiet {
            return Ok(());
        }
        if self.sound {
            print!("\x07");
        }
        match cue {
            Cue::RunStart => {
                println!("{}", if self.started { "▶ Resuming" } else { "▶ Starting" });
                self.started = true;
                self.announce_step(self.position)?;
            }
            Cue::StepAdvance { step_index } => {
                self.position = step_index;
                self.announce_step(step_index)?;
            }
            Cue::BreathingPulse => println!("    ~ breathe ~"),
            Cue::Completion => println!("■ Finished"),
        }
        io::stdout().flush()?;
        Ok(())
    }
}

/// How `run` drives the player once started
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum RunMode {
    Timed,
    Fast,
    AutoComplete,
    Interactive,
}

fn cmd_run(id: &str, mode: RunMode, quiet: bool, config: &Config) -> Result<()> {
    let catalog = get_default_catalog();
    catalog.ensure_valid()?;
    let definition = catalog
        .get(id)
        .cloned()
        .ok_or_else(|| Error::UnknownExercise(id.to_string()))?;

    let sound = config.player.sound && mode != RunMode::Fast;
    let cues = ConsoleCues::new(definition.steps.clone(), sound, quiet);

    let mut player = ExercisePlayer::with_cues(definition, cues)?
        .with_pulse_interval(config.player.breathing_pulse_interval);

    if !quiet {
        let def = player.definition();
        println!("\n╭─────────────────────────────────────────╮");
        println!("│  {}", def.title);
        println!("╰─────────────────────────────────────────╯");
        println!("  {}", def.description);
        println!("  Duration: {} ({} steps)\n", def.duration_label, def.steps.len());
    }

    player.start();

    match mode {
        RunMode::AutoComplete => {
            player.force_complete();
        }
        RunMode::Fast => {
            drive(&mut player, &mut ImmediateMetronome::new());
        }
        RunMode::Timed => {
            drive(&mut player, &mut IntervalMetronome::from_config(&config.player));
        }
        RunMode::Interactive => {
            let interval = Duration::from_millis(config.player.tick_interval_ms);
            run_interactive(&mut player, interval, quiet);
        }
    }

    let snapshot = player.display_state();
    tracing::info!("Run ended in phase {:?}", snapshot.phase);

    if snapshot.is_complete {
        println!("\n✓ Exercise complete! Take a moment to notice how you feel.");
    } else {
        println!(
            "\nStopped at step {}/{} ({:.0}% done)",
            snapshot.step_index + 1,
            snapshot.step_count,
            snapshot.progress * 100.0
        );
    }

    Ok(())
}

/// A command typed during an interactive run
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Control {
    Toggle,
    Reset,
    Done,
    Quit,
}

impl Control {
    fn parse(line: &str) -> Option<Self> {
        match line.trim().to_lowercase().as_str() {
            "" | "p" | "pause" | "resume" => Some(Self::Toggle),
            "r" | "reset" => Some(Self::Reset),
            "d" | "done" => Some(Self::Done),
            "q" | "quit" => Some(Self::Quit),
            _ => None,
        }
    }
}

const CONTROLS_HELP: &str = "  (Enter or p = pause/resume, r = reset, d = done, q = quit)";

/// Tick the player on a timer while stdin lines steer it
///
/// Ticks armed before a command are dropped by the generation guard, so a
/// pause always wins over a tick that was already waiting.
fn run_interactive(player: &mut ExercisePlayer<ConsoleCues>, interval: Duration, quiet: bool) {
    let (tx, rx) = mpsc::channel::<String>();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });

    if !quiet {
        println!("{}", CONTROLS_HELP);
    }

    let mut input_open = true;
    while !player.is_complete() {
        let armed = player.generation();

        let line = if input_open {
            match rx.recv_timeout(interval) {
                Ok(line) => Some(line),
                Err(RecvTimeoutError::Timeout) => None,
                Err(RecvTimeoutError::Disconnected) => {
                    input_open = false;
                    continue;
                }
            }
        } else {
            // Nothing can resume a stopped run once stdin is closed
            if !player.is_running() {
                break;
            }
            thread::sleep(interval);
            None
        };

        let Some(line) = line else {
            player.tick_if_current(armed);
            continue;
        };

        match Control::parse(&line) {
            Some(Control::Toggle) if player.is_running() => {
                player.pause();
                if !quiet {
                    let state = player.state();
                    println!(
                        "⏸ Paused at step {}/{} ({}s left)",
                        state.current_step_index + 1,
                        player.definition().steps.len(),
                        state.seconds_remaining
                    );
                }
            }
            Some(Control::Toggle) => {
                player.start();
            }
            Some(Control::Reset) => {
                if player.reset() {
                    player.cues_mut().rewind();
                    if !quiet {
                        println!("↺ Back to the first step (p to start)");
                    }
                }
            }
            Some(Control::Done) => {
                player.force_complete();
            }
            Some(Control::Quit) => break,
            None => {
                if !quiet {
                    println!("{}", CONTROLS_HELP);
                }
            }
        }
    }
}
