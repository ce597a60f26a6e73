//! Level catalog: hand-authored levels topped up with generated ones.
//!
//! Every language gets `max(hand_authored, LEVEL_QUOTA)` levels. Hand-authored
//! levels keep their authored order and come first; generated levels follow
//! with ids `GENERATED_ID_OFFSET + i`. That order is the "next level" order.

use std::collections::{HashMap, HashSet};

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use tracing::{error, info, instrument, warn};

use crate::config::GameConfig;
use crate::domain::{Language, Level};
use crate::generator::generate;
use crate::seeds::seed_levels;

pub const LEVEL_QUOTA: usize = 50;
/// First generated id. Hand-authored ids must stay below it.
pub const GENERATED_ID_OFFSET: u32 = 1000;

/// Levels for one language: the hand-authored ones for `language` in their
/// authored order, then freshly generated levels up to the quota.
pub fn levels_for(language: Language, hand_authored: &[Level], rng: &mut dyn RngCore) -> Vec<Level> {
    let mut out: Vec<Level> = hand_authored
        .iter()
        .filter(|l| l.language == language)
        .cloned()
        .collect();

    let needed = LEVEL_QUOTA.saturating_sub(out.len());
    for i in 0..needed {
        match generate(language, GENERATED_ID_OFFSET + i as u32, rng) {
            Some(level) => out.push(level),
            None => {
                error!(target: "catalog", %language, generated = i, "No templates to draw from; catalog left short.");
                break;
            }
        }
    }
    out
}

/// Merge a configured bank into the built-in seeds.
/// Invalid bank entries, ids in the generated range and ids already taken
/// are skipped (built-ins win).
pub fn merge_bank(seeds: Vec<Level>, bank: &[Level]) -> Vec<Level> {
    let mut ids: HashSet<u32> = seeds.iter().map(|l| l.id).collect();
    let mut out = seeds;
    for level in bank {
        if level.id >= GENERATED_ID_OFFSET {
            error!(target: "catalog", id = level.id, "Skipping bank level: id collides with generated range.");
            continue;
        }
        if let Err(e) = level.validate() {
            error!(target: "catalog", id = level.id, error = %e, "Skipping bank level: invalid.");
            continue;
        }
        if !ids.insert(level.id) {
            warn!(target: "catalog", id = level.id, "Skipping bank level: id already used.");
            continue;
        }
        out.push(level.clone());
    }
    out
}

/// Catalog for every supported language, built once per session.
#[derive(Clone, Debug)]
pub struct Catalog {
    by_lang: HashMap<Language, Vec<Level>>,
}

impl Catalog {
    /// Build the catalog from explicit hand-authored levels and random source.
    #[instrument(level = "info", skip_all, fields(hand_authored = hand_authored.len()))]
    pub fn build(hand_authored: &[Level], rng: &mut dyn RngCore) -> Self {
        let mut by_lang = HashMap::new();
        for language in Language::ALL {
            let levels = levels_for(language, hand_authored, rng);
            let authored = levels.iter().filter(|l| l.id < GENERATED_ID_OFFSET).count();
            info!(target: "catalog", %language, hand_authored = authored, generated = levels.len() - authored, "Catalog inventory");
            by_lang.insert(language, levels);
        }
        Self { by_lang }
    }

    /// Built-in seeds plus the configured bank, generated with the configured
    /// seed (or entropy).
    pub fn from_config(cfg: &GameConfig) -> Self {
        let hand_authored = merge_bank(seed_levels(), &cfg.levels);
        let mut rng = match cfg.catalog.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::build(&hand_authored, &mut rng)
    }

    pub fn levels_for(&self, language: Language) -> &[Level] {
        self.by_lang.get(&language).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn first(&self, language: Language) -> Option<&Level> {
        self.levels_for(language).first()
    }

    pub fn position(&self, language: Language, id: u32) -> Option<usize> {
        self.levels_for(language).iter().position(|l| l.id == id)
    }

    pub fn find(&self, language: Language, id: u32) -> Option<&Level> {
        self.levels_for(language).iter().find(|l| l.id == id)
    }

    /// Level after `id` in catalog order; `None` at the end (or for an unknown id).
    pub fn next_after(&self, language: Language, id: u32) -> Option<&Level> {
        let idx = self.position(language, id)?;
        self.levels_for(language).get(idx + 1)
    }
}
