use crate::{Context, OutputFormat};
use flll_services::report::ensure_report;
use flll_services::EnsureOutcome;

pub fn run_ensure(ctx: &Context, reference: &str) -> color_eyre::Result<()> {
    let mut writer = super::label_writer(ctx);
    let outcome = writer.ensure_file(reference)?;

    if ctx.format == OutputFormat::Json {
        return crate::ui::print_json(&ensure_report(reference, &outcome));
    }
    match &outcome {
        EnsureOutcome::Unsupported { path } => {
            crate::ui_warn!("{}: not a label file, skipped", path.display());
        }
        EnsureOutcome::Ensured { files, .. } => {
            for status in files {
                if status.ok {
                    crate::ui_ok!("{} [{}]", status.path.display(), status.language);
                } else {
                    crate::ui_warn!(
                        "{} [{}]: missing required structure",
                        status.path.display(),
                        status.language
                    );
                }
            }
        }
    }
    Ok(())
}
