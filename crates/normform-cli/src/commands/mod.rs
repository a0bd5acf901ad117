//! CLI command implementations.

pub mod classify;
pub mod normalize;
pub mod serve;

use normform::{Normalizer, NormalizerConfig, Relation, SourceMetadata};

use crate::cli::InputArgs;

/// Read the sample file named by `input` and build its relation.
fn load_input(
    input: &InputArgs,
    config: NormalizerConfig,
) -> Result<(Normalizer, Relation, SourceMetadata), Box<dyn std::error::Error>> {
    let keys = input.all_keys()?;
    let dependencies = input.all_dependencies()?;

    let normalizer = Normalizer::with_config(config);
    let (relation, source) = normalizer.load(&input.file, &keys, &dependencies)?;
    Ok((normalizer, relation, source))
}
