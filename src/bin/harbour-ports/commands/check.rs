//! `harbour-ports check` command

use anyhow::{bail, Result};

use crate::cli::CheckArgs;
use harbour_ports::core::control::ControlFileError;
use harbour_ports::load_port;
use harbour_ports::sources::{CONTROL_FILE, MANIFEST_FILE};
use harbour_ports::util::diagnostic::{emit, render_parse_diagnostics, Diagnostic};

pub fn execute(args: CheckArgs, color: bool) -> Result<()> {
    if args.path.join(MANIFEST_FILE).is_file() && args.path.join(CONTROL_FILE).is_file() {
        let warning = Diagnostic::warning(format!(
            "both {} and {} are present; {} is ignored",
            MANIFEST_FILE, CONTROL_FILE, CONTROL_FILE
        ))
        .with_location(&args.path)
        .with_suggestion(format!("Delete the stale {}", CONTROL_FILE));
        emit(&warning, color);
    }

    let err = match load_port(&args.path) {
        Ok(scf) => {
            println!(
                "{}: ok ({} feature(s))",
                scf.core_paragraph.id.display_name(),
                scf.feature_paragraphs.len()
            );
            return Ok(());
        }
        Err(err) => err,
    };

    // Batched CONTROL diagnostics are rendered; anything else is reported as is.
    let diagnostics = match err.downcast_ref::<ControlFileError>() {
        Some(ControlFileError::Invalid { diagnostics, .. }) => diagnostics.clone(),
        _ => return Err(err),
    };

    for diag in render_parse_diagnostics(&diagnostics) {
        emit(&diag.with_location(&args.path), color);
    }

    bail!("`{}` is not a valid port", args.path.display())
}
