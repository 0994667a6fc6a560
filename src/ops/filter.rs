//! Project declared dependencies onto one triplet.

use std::collections::HashMap;

use crate::core::dependency::Dependency;
use crate::core::expression::{evaluate, EvaluationContext, ExpressionError};
use crate::core::triplet::{ConcreteTargetSpec, Triplet};

/// Keep the dependencies whose qualifier holds for `triplet` and `variables`.
///
/// Order is preserved and nothing is deduplicated. Features are carried over
/// verbatim; default-feature expansion is the resolver's job. A malformed
/// qualifier fails the whole call since it means the port itself is broken.
pub fn filter_dependencies(
    deps: &[Dependency],
    triplet: Triplet,
    variables: &HashMap<String, String>,
) -> Result<Vec<ConcreteTargetSpec>, ExpressionError> {
    let context = EvaluationContext::new(triplet.canonical_name(), variables);
    let mut specs = Vec::new();

    for dep in deps {
        let included = dep.is_unconditional() || evaluate(dep.qualifier(), &context)?;
        tracing::debug!(
            "{} on {}: {}",
            dep,
            triplet,
            if included { "included" } else { "skipped" }
        );
        if included {
            specs.push(ConcreteTargetSpec::new(
                dep.name(),
                triplet,
                dep.features().clone(),
            ));
        }
    }

    Ok(specs)
}
