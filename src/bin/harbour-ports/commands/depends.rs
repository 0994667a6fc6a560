//! `harbour-ports depends` command

use anyhow::{Context, Result};

use crate::cli::DependsArgs;
use harbour_ports::core::expression::{evaluate, EvaluationContext};
use harbour_ports::core::Triplet;
use harbour_ports::util::config::{global_config_path, load_config, project_config_path};
use harbour_ports::{filter_dependencies, load_port};

pub fn execute(args: DependsArgs) -> Result<()> {
    let cwd = std::env::current_dir().context("failed to get current directory")?;
    let config = load_config(global_config_path().as_deref(), &project_config_path(&cwd));

    let scf = load_port(&args.path)?;

    // Precedence: --triplet / VCPKG_DEFAULT_TRIPLET, then config, then host
    let triplet = args
        .triplet
        .as_deref()
        .map(Triplet::from_canonical_name)
        .or_else(|| config.triplet())
        .unwrap_or_else(Triplet::host);

    let mut variables = config.variable_map();
    variables.extend(args.vars);

    if let Some(ref supports) = scf.core_paragraph.supports_expression {
        let context = EvaluationContext::new(triplet.canonical_name(), &variables);
        if !evaluate(supports, &context)? {
            tracing::warn!(
                "`{}` does not support {} (supports: {})",
                scf.name(),
                triplet,
                supports
            );
        }
    }

    let deps = scf
        .find_dependencies_for_feature(&args.feature)
        .with_context(|| format!("`{}` has no feature `{}`", scf.name(), args.feature))?;

    let specs = filter_dependencies(deps, triplet, &variables)
        .with_context(|| format!("invalid qualifier in `{}`", scf.name()))?;

    tracing::debug!(
        "{} of {} dependencies apply to {}",
        specs.len(),
        deps.len(),
        triplet
    );

    for spec in specs {
        println!("{}", spec);
    }

    Ok(())
}
