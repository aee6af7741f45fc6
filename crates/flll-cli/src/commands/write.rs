use crate::{Context, OutputFormat};
use color_eyre::eyre::eyre;
use flll_services::report::write_report;
use flll_services::{LabelIdentifier, WriteOutcome};
use owo_colors::OwoColorize;

pub fn run_write(ctx: &Context, reference: &str, identifiers: &[String]) -> color_eyre::Result<()> {
    // Reject the whole batch before any file is touched.
    for identifier in identifiers {
        LabelIdentifier::parse(identifier)?;
    }

    let mut writer = super::label_writer(ctx);
    let mut reports = Vec::with_capacity(identifiers.len());
    let mut malformed = false;

    for identifier in identifiers {
        let outcome = writer.write_label(reference, identifier)?;
        malformed |= matches!(outcome, WriteOutcome::Malformed { .. });
        if ctx.format == OutputFormat::Text {
            print_outcome(ctx, identifier, &outcome);
        }
        reports.push(write_report(reference, identifier, &outcome));
    }

    if ctx.format == OutputFormat::Json {
        crate::ui::print_json(&reports)?;
    }
    if malformed {
        return Err(eyre!("{reference}: label file is missing required structure"));
    }
    Ok(())
}

fn print_outcome(ctx: &Context, identifier: &str, outcome: &WriteOutcome) {
    let identifier = if ctx.use_color {
        identifier.green().to_string()
    } else {
        identifier.to_string()
    };
    match outcome {
        WriteOutcome::Unsupported { path } => {
            crate::ui_warn!("{}: not a label file, skipped", path.display());
        }
        WriteOutcome::Malformed { file } => {
            crate::ui_warn!("{}: missing required structure, nothing written", file.path.display());
        }
        WriteOutcome::AlreadyPresent { file } => {
            crate::ui_out!("{identifier} already in {}", file.path.display());
        }
        WriteOutcome::Written { file, written } => {
            if file.migrated {
                crate::ui_info!("using existing {} file {}", file.kind, file.path.display());
            }
            for path in written {
                crate::ui_ok!("{identifier} → {}", path.display());
            }
        }
    }
}
