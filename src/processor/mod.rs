//! The functional core: normalizes every entry and assembles the folder tree.
pub mod coffee;
pub mod icons;
pub mod lexer;
pub mod normalize;
pub mod tree;

use rayon::prelude::*;
use tracing::{debug, info};

use crate::config::DuplicatePolicy;
use crate::error::NormalizeError;
use crate::model::{Document, Entry, Packed, Warning, WarningKind};
use coffee::Translator;
use icons::IconResolver;
use normalize::{Language, Normalizer};
use tree::TreeBuilder;

/// Settings the processor needs beyond the document itself.
pub struct Options<'a> {
    pub title: String,
    pub force_sort: bool,
    pub duplicates: DuplicatePolicy,
    pub translator: &'a dyn Translator,
}

/// Runs every processing pass and returns a read-only structure for writers.
///
/// Normalization runs in parallel; the tree is assembled afterwards in
/// document order, so the result does not depend on scheduling.
pub fn run(doc: Document, icons: &mut IconResolver, options: &Options<'_>) -> Packed {
    let normalizer = Normalizer::new(options.translator);

    let uris: Vec<Result<(Language, String), NormalizeError>> = doc
        .entries
        .par_iter()
        .map(|def| -> Result<(Language, String), NormalizeError> {
            let language = Language::lookup(&def.language)?;
            let uri = normalizer.normalize(&def.body, language)?;
            Ok((language, uri))
        })
        .collect();

    let mut warnings = doc.warnings;
    let mut tree = TreeBuilder::new(options.duplicates);

    for (def, res) in doc.entries.into_iter().zip(uris) {
        let (language, uri) = match res {
            Ok(ok) => ok,
            Err(e) => {
                warnings.push(Warning::new(
                    def.line,
                    WarningKind::SkippedEntry {
                        title: def.name.clone(),
                        reason: e.to_string(),
                    },
                ));
                continue;
            }
        };

        let icon = match icons.resolve(def.icon.as_deref()) {
            Ok(icon) => icon,
            Err(e) => {
                warnings.push(Warning::new(
                    def.line,
                    WarningKind::UnresolvedIcon {
                        reference: def.icon.clone().unwrap_or_default(),
                        reason: e.to_string(),
                    },
                ));
                icons.placeholder().to_string()
            }
        };

        debug!("`{}` -> {} bytes of {language}", def.name, uri.len());
        tree.insert(Entry::new(def, language, icon, uri));
    }

    let (root, tree_warnings) = tree.finish(doc.sort || options.force_sort);
    warnings.extend(tree_warnings);
    warnings.sort_by_key(|w| w.line);
    info!(
        "packed {} bookmarklets ({} warnings)",
        root.len(),
        warnings.len()
    );

    Packed {
        title: doc.owner.unwrap_or_else(|| options.title.clone()),
        root,
        warnings,
    }
}
