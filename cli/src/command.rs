use std::str::FromStr;

use anyhow::{Context, anyhow, bail};
use mineai_core::Difficulty;

pub const HELP: &str = "\
commands:
  open ROW COL   (o)   open a cell
  flag ROW COL   (f)   toggle a flag
  new [LEVEL]    (n)   new game: easy, medium, hard or SIZExMINES
  ai                   let the AI play, type `stop` to cancel
  key API_KEY          set the Gemini API key for this session
  stats                show win/loss statistics
  help                 show this help
  quit           (q)   exit";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Open(i64, i64),
    Flag(i64, i64),
    NewGame(Option<Difficulty>),
    Autoplay,
    Stop,
    ApiKey(String),
    Stats,
    Help,
    Quit,
}

fn coords<'a>(mut args: impl Iterator<Item = &'a str>) -> anyhow::Result<(i64, i64)> {
    let row = args.next().context("missing row")?;
    let col = args.next().context("missing column")?;
    if args.next().is_some() {
        bail!("too many arguments");
    }
    Ok((
        row.parse().with_context(|| format!("bad row {row:?}"))?,
        col.parse().with_context(|| format!("bad column {col:?}"))?,
    ))
}

impl FromStr for Command {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> anyhow::Result<Self> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            bail!("empty command");
        };

        Ok(match verb.to_ascii_lowercase().as_str() {
            "open" | "o" => {
                let (row, col) = coords(words)?;
                Self::Open(row, col)
            }
            "flag" | "f" => {
                let (row, col) = coords(words)?;
                Self::Flag(row, col)
            }
            "new" | "n" => match words.next() {
                Some(level) => Self::NewGame(Some(
                    level.parse().map_err(|err| anyhow!("{err}: {level:?}"))?,
                )),
                None => Self::NewGame(None),
            },
            "ai" => Self::Autoplay,
            "stop" => Self::Stop,
            "key" => Self::ApiKey(words.next().context("missing API key")?.to_string()),
            "stats" => Self::Stats,
            "help" | "?" => Self::Help,
            "quit" | "q" | "exit" => Self::Quit,
            other => bail!("unknown command {other:?}, type `help`"),
        })
    }
}
