//! Level generator: picks a template for a language and materializes a `Level`.

use rand::seq::SliceRandom;
use rand::RngCore;
use tracing::{debug, instrument};

use crate::domain::{Level, Language};
use crate::templates::{templates_for, BugTemplate};

/// Build one level for `language` with the given `id`.
///
/// Template choice is a single uniform draw from the language's set (or the
/// fallback set). The title carries `#id` so reused templates stay
/// distinguishable in the level list. `None` only if the language (and the
/// fallback) has no templates at all.
#[instrument(level = "debug", skip(rng))]
pub fn generate(language: Language, id: u32, rng: &mut dyn RngCore) -> Option<Level> {
  let template = pick_template(templates_for(language), rng)?;
  let snippet = (template.generate)(rng);
  debug!(target: "catalog", %language, id, template = template.title, bug_line = snippet.bug_line, "Generated level");

  Some(Level {
    id,
    language,
    difficulty: template.difficulty,
    title: format!("{} #{}", template.title, id),
    description: template.description.to_string(),
    code: snippet.code,
    bug_line: snippet.bug_line,
    solution: snippet.solution,
    explanation: snippet.explanation,
  })
}

fn pick_template<'a>(templates: &'a [BugTemplate], rng: &mut dyn RngCore) -> Option<&'a BugTemplate> {
  templates.choose(rng)
}
