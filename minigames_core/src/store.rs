use std::{
    collections::{BTreeMap, BTreeSet},
    path::Path,
};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    config::{GameConfig, GameId, TableDefaults},
    error::{CatalogueError, EngineError, EngineResult},
};

const BUILTIN_CATALOGUE: &str = include_str!("../catalogue/games.json");

/// Serialized form of the game catalogue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalogue {
    #[serde(default)]
    pub table: TableDefaults,
    pub games: Vec<GameConfig>,
}

impl Catalogue {
    pub fn from_json_str(json: &str) -> Result<Self, CatalogueError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogueError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// The four games shipped with the crate.
    pub fn builtin() -> Result<Self, CatalogueError> {
        Self::from_json_str(BUILTIN_CATALOGUE)
    }
}

/// One validation failure found while checking a whole catalogue.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogueIssue {
    pub game_id: Option<GameId>, // None for table-level problems
    pub error: EngineError,
}

/// Check every game without stopping at the first failure.
pub fn validate_catalogue(catalogue: &Catalogue) -> Vec<CatalogueIssue> {
    let mut issues = Vec::new();
    if let Err(error) = catalogue.table.validate() {
        issues.push(CatalogueIssue {
            game_id: None,
            error,
        });
    }
    let mut seen = BTreeSet::new();
    for game in &catalogue.games {
        if !seen.insert(game.id) {
            issues.push(CatalogueIssue {
                game_id: Some(game.id),
                error: duplicate(game.id),
            });
        }
        if let Err(error) = game.validate() {
            issues.push(CatalogueIssue {
                game_id: Some(game.id),
                error,
            });
        }
    }
    issues
}

fn duplicate(game_id: GameId) -> EngineError {
    EngineError::InvalidConfig {
        game_id,
        reason: "game id appears more than once".into(),
    }
}

/// Read-only map of validated game configurations.
#[derive(Debug, Clone)]
pub struct GameConfigStore {
    games: BTreeMap<GameId, GameConfig>,
    table: TableDefaults,
}

impl GameConfigStore {
    /// Validate and index a catalogue. Any invalid game rejects the whole load.
    pub fn from_catalogue(catalogue: Catalogue) -> EngineResult<Self> {
        catalogue.table.validate()?;
        let mut games = BTreeMap::new();
        for game in catalogue.games {
            game.validate()?;
            let id = game.id;
            if games.insert(id, game).is_some() {
                return Err(duplicate(id));
            }
        }
        debug!(games = games.len(), "loaded game catalogue");
        Ok(Self {
            games,
            table: catalogue.table,
        })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogueError> {
        Ok(Self::from_catalogue(Catalogue::from_path(path)?)?)
    }

    pub fn builtin() -> Result<Self, CatalogueError> {
        Ok(Self::from_catalogue(Catalogue::builtin()?)?)
    }

    pub fn get_config(&self, game_id: GameId) -> EngineResult<&GameConfig> {
        self.games
            .get(&game_id)
            .ok_or(EngineError::ConfigNotFound(game_id))
    }

    pub fn table(&self) -> TableDefaults {
        self.table
    }

    pub fn games(&self) -> impl Iterator<Item = &GameConfig> {
        self.games.values()
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }
}
