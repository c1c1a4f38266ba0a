//! Engine input for one relic simulation batch.
//!
//! The generated file sets up the baseline actor (every spec trait at the
//! baseline rank, crucible cleared) followed by one profileset per variant:
//! weapon item level deltas, spec trait ranks and crucible trait amounts.
use crate::catalog::{CatalogError, RelicList, TraitDescriptor};
use crate::constants::{
    BASELINE_LABEL, BASELINE_TRAIT_RANK, PRIMARY_RANK_MAX, PRIMARY_RANK_MIN, SIMPLE_RANK_MAX,
    SIMPLE_RANK_MIN, STEPPED_CURVE_NAME,
};

/// What to generate: specialization, fight style and profile template name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchTarget<'a> {
    pub spec: &'a str,
    pub fightstyle: &'a str,
    pub template: &'a str,
}

impl BatchTarget<'_> {
    /// Batch name shared by the generated, log, report and meta files.
    #[must_use]
    pub fn batch_name(&self) -> String {
        format!("RelicSimulation_{}_{}", self.fightstyle, self.template)
    }
}

/// Build the profileset file contents for `target`.
///
/// # Errors
///
/// Returns `CatalogError::UnknownWeapon`/`UnknownTraits` when the spec is not
/// in the relic list, and `CatalogError::ZeroItemLevelStep` when the item
/// level step is 0.
pub fn build_profilesets(
    list: &RelicList,
    target: &BatchTarget<'_>,
) -> Result<String, CatalogError> {
    let weapon = list.weapon(target.spec)?;
    let catalog = list.catalog_for(target.spec)?;
    let settings = list.config;
    if settings.item_level_steps == 0 {
        return Err(CatalogError::ZeroItemLevelStep);
    }

    let mut lines = vec![
        format!("name=\"{BASELINE_LABEL}\""),
        format!("{weapon},ilevel={}", settings.base_item_level),
        "crucible=".to_string(),
    ];
    lines.extend(
        catalog
            .primary
            .iter()
            .map(|t| format!("artifact_override={}:{BASELINE_TRAIT_RANK}", t.token())),
    );
    lines.push(String::new());

    let step = usize::try_from(settings.item_level_steps).unwrap_or(usize::MAX);
    for delta in (settings.item_level_steps..=settings.maximum_level_increase).step_by(step) {
        let ilevel = settings.base_item_level.saturating_add(delta);
        lines.push(format!(
            "profileset.\"{STEPPED_CURVE_NAME}_{delta}\"+={weapon},ilevel={ilevel}"
        ));
    }
    lines.push(String::new());

    let applicable = |traits: &[TraitDescriptor]| -> Vec<TraitDescriptor> {
        traits
            .iter()
            .filter(|t| t.applies_to(target.fightstyle, target.template))
            .cloned()
            .collect()
    };

    let primary = applicable(&catalog.primary);
    for (amount, rank) in (PRIMARY_RANK_MIN..=PRIMARY_RANK_MAX).enumerate() {
        let amount = amount + 1;
        for descriptor in &primary {
            lines.push(trait_override(descriptor, amount, rank));
        }
    }
    lines.push(String::new());

    let simple = applicable(&catalog.simple);
    for amount in SIMPLE_RANK_MIN..=SIMPLE_RANK_MAX {
        for descriptor in &simple {
            lines.push(trait_override(descriptor, amount, amount));
        }
    }

    let mut contents = lines.join("\n");
    contents.push('\n');
    Ok(contents)
}

fn trait_override(
    descriptor: &TraitDescriptor,
    amount: impl std::fmt::Display,
    rank: u32,
) -> String {
    format!(
        "profileset.\"{}_{amount}\"+=artifact_override={}:{rank}",
        descriptor.name,
        descriptor.token()
    )
}
