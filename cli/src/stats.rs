use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use anyhow::Context;
use mineai_core::StatsSink;
use mineai_protocol::{ActorLabel, GameRecord, Outcome};
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub wins: u32,
    pub losses: u32,
    pub best_win_ms: Option<u64>,
}

/// Win/loss counts keyed by actor, then difficulty.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatsTally(BTreeMap<ActorLabel, BTreeMap<String, Tally>>);

impl StatsTally {
    pub fn add(&mut self, record: &GameRecord) {
        let tally = self
            .0
            .entry(record.actor)
            .or_default()
            .entry(record.difficulty.clone())
            .or_default();

        match record.outcome {
            Outcome::Win => {
                tally.wins += 1;
                tally.best_win_ms = Some(
                    tally
                        .best_win_ms
                        .map_or(record.elapsed_ms, |best| best.min(record.elapsed_ms)),
                );
            }
            Outcome::Loss => tally.losses += 1,
        }
    }

    pub fn get(&self, actor: ActorLabel, difficulty: &str) -> Tally {
        self.0
            .get(&actor)
            .and_then(|by_difficulty| by_difficulty.get(difficulty))
            .copied()
            .unwrap_or_default()
    }
}

impl fmt::Display for StatsTally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "no games played yet");
        }
        writeln!(f, "{:<6} {:<10} {:>5} {:>6} {:>10}", "actor", "difficulty", "wins", "losses", "best")?;
        for (actor, by_difficulty) in &self.0 {
            let actor = match actor {
                ActorLabel::User => "user",
                ActorLabel::Ai => "ai",
            };
            for (difficulty, tally) in by_difficulty {
                let best = tally
                    .best_win_ms
                    .map(|ms| format!("{:.1}s", ms as f64 / 1000.0))
                    .unwrap_or_else(|| "-".into());
                writeln!(
                    f,
                    "{:<6} {:<10} {:>5} {:>6} {:>10}",
                    actor, difficulty, tally.wins, tally.losses, best
                )?;
            }
        }
        Ok(())
    }
}

/// Tally persisted as JSON, rewritten after every finished game.
#[derive(Debug)]
pub struct FileStats {
    path: PathBuf,
    tally: StatsTally,
}

impl FileStats {
    pub fn load(path: PathBuf) -> anyhow::Result<Self> {
        let tally = if path.exists() {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("reading stats {}", path.display()))?;
            serde_json::from_str(&text).with_context(|| format!("parsing stats {}", path.display()))?
        } else {
            StatsTally::default()
        };
        Ok(Self { path, tally })
    }

    pub fn tally(&self) -> &StatsTally {
        &self.tally
    }

    fn save(&self) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(&self.tally)?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("writing stats {}", self.path.display()))
    }
}

impl StatsSink for FileStats {
    fn record(&mut self, record: GameRecord) {
        log::debug!("recording {record:?}");
        self.tally.add(&record);
        if let Err(err) = self.save() {
            log::error!("could not save stats: {err:#}");
        }
    }
}
