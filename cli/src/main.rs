use std::io::Write as _;
use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::Context;
use clap::Parser;
use mineai_agent::{Autoplay, AutoplayExit, GeminiAdvisor, MoveAdvisor, stop_channel};
use mineai_core::{Actor, GameController, MoveOutcome, StatsSink};
use mineai_protocol::Move;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tracing_subscriber::EnvFilter;

use command::{Command, HELP};
use config::Settings;
use render::render;
use stats::FileStats;

mod command;
mod config;
mod render;
mod stats;

#[derive(Parser, Debug)]
#[command(version, about = "Minesweeper in the terminal, with an optional LLM auto-player", long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Configuration file
    #[arg(short, long, default_value = "mineai.toml")]
    config: PathBuf,

    /// easy, medium, hard or SIZExMINES
    #[arg(short, long)]
    difficulty: Option<String>,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    /// Gemini API key, overrides the environment and the config file
    #[arg(long)]
    api_key: Option<String>,
}

struct App {
    settings: Settings,
    controller: GameController<FileStats>,
    advisor: Option<GeminiAdvisor>,
    pacing: Duration,
}

fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or_default()
}

fn report(outcome: MoveOutcome) {
    match outcome {
        MoveOutcome::Ignored => println!("nothing to do there"),
        MoveOutcome::Continue => {}
        MoveOutcome::Lost => println!("BOOM! you hit a mine"),
        MoveOutcome::Won => println!("you cleared the board!"),
    }
}

/// Runs `autoplay` while reading `input`: a `stop` line or the end of input cancels the run.
///
/// The outer error is an input failure, the inner one the run's own result.
async fn autoplay_until_stopped<A, S, R>(
    autoplay: &Autoplay<'_, A>,
    controller: &mut GameController<S>,
    input: &mut Lines<R>,
) -> anyhow::Result<mineai_agent::Result<AutoplayExit>>
where
    A: MoveAdvisor,
    S: StatsSink,
    R: AsyncBufRead + Unpin,
{
    let (handle, stop) = stop_channel();
    let mut handle = Some(handle);
    let mut input_open = true;

    let run = autoplay.run(controller, stop, |session, mv, outcome| {
        println!("AI {:?} {} {} -> {:?}", mv.decision, mv.row, mv.col, outcome);
        print!("{}", render(session));
    });
    tokio::pin!(run);

    loop {
        tokio::select! {
            exit = &mut run => return Ok(exit),
            line = input.next_line(), if input_open => match line? {
                Some(line) if line.parse::<Command>().ok() == Some(Command::Stop) => {
                    if let Some(handle) = handle.take() {
                        handle.stop();
                    }
                }
                Some(_) => println!("AI is playing, type `stop` to cancel"),
                None => {
                    input_open = false;
                    if let Some(handle) = handle.take() {
                        handle.stop();
                    }
                }
            },
        }
    }
}

impl App {
    fn set_api_key(&mut self, api_key: String) {
        match GeminiAdvisor::new(self.settings.gemini(api_key)) {
            Ok(advisor) => {
                self.advisor = Some(advisor);
                println!("API key set");
            }
            Err(err) => println!("{err}"),
        }
    }

    async fn autoplay<R>(&mut self, input: &mut Lines<R>) -> anyhow::Result<()>
    where
        R: AsyncBufRead + Unpin,
    {
        let Some(advisor) = &self.advisor else {
            println!("no API key: use `key API_KEY`, --api-key or {}", config::API_KEY_VAR);
            return Ok(());
        };

        println!("AI is playing, type `stop` to cancel");
        let autoplay = Autoplay::new(advisor).with_pacing(self.pacing);
        match autoplay_until_stopped(&autoplay, &mut self.controller, input).await? {
            Ok(AutoplayExit::Finished(status)) => println!("AI finished: {status:?}"),
            Ok(AutoplayExit::Cancelled) => println!("AI stopped"),
            Err(err) => println!("AI stopped: {err}"),
        }
        Ok(())
    }

    /// Returns `false` once the user asked to quit.
    async fn handle<R>(&mut self, command: Command, input: &mut Lines<R>) -> anyhow::Result<bool>
    where
        R: AsyncBufRead + Unpin,
    {
        match command {
            Command::Open(row, col) => {
                report(self.controller.apply(Actor::Human, Move::open(row, col)));
                print!("{}", render(self.controller.session()));
            }
            Command::Flag(row, col) => {
                report(self.controller.apply(Actor::Human, Move::flag(row, col)));
                print!("{}", render(self.controller.session()));
            }
            Command::NewGame(difficulty) => {
                let difficulty = difficulty.unwrap_or(self.controller.session().difficulty());
                self.controller.new_game(difficulty)?;
                print!("{}", render(self.controller.session()));
            }
            Command::Autoplay => self.autoplay(input).await?,
            Command::Stop => println!("the AI is not playing"),
            Command::ApiKey(key) => self.set_api_key(key),
            Command::Stats => print!("{}", self.controller.stats().tally()),
            Command::Help => println!("{HELP}"),
            Command::Quit => return Ok(false),
        }
        Ok(true)
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let level = args.verbose.log_level_filter().as_str().to_ascii_lowercase();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(level))
        .with_writer(std::io::stderr)
        .init();

    let settings = Settings::load(&args.config)?;
    let difficulty = match &args.difficulty {
        Some(level) => level
            .parse()
            .with_context(|| format!("difficulty {level:?}"))?,
        None => settings.difficulty()?,
    };
    let seed = args.seed.unwrap_or_else(time_seed);
    log::debug!("seed: {seed}");

    let stats = FileStats::load(settings.game.stats_path.clone())?;
    let controller = GameController::new(difficulty, seed, stats)?;
    let api_key = settings.api_key(args.api_key, std::env::var(config::API_KEY_VAR).ok());
    let advisor = api_key
        .map(|key| GeminiAdvisor::new(settings.gemini(key)))
        .transpose()?;
    let pacing = Duration::from_millis(settings.ai.pacing_ms);

    let mut app = App {
        settings,
        controller,
        advisor,
        pacing,
    };

    println!("{HELP}\n");
    print!("{}", render(app.controller.session()));

    let mut input = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = input.next_line().await? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        match line.parse::<Command>() {
            Ok(command) => {
                if !app.handle(command, &mut input).await? {
                    break;
                }
            }
            Err(err) => println!("{err}"),
        }
    }

    log::debug!("bye");
    Ok(())
}
