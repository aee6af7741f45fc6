use crate::{Context, OutputFormat};
use flll_services::report::resolve_report;

pub fn run_resolve(ctx: &Context, reference: &str) -> color_eyre::Result<()> {
    let resolution = super::label_writer(ctx).resolve(reference)?;

    if ctx.format == OutputFormat::Json {
        return crate::ui::print_json(&resolve_report(reference, &resolution));
    }
    let Some(file) = &resolution.file else {
        crate::ui_warn!("{}: not a label file", resolution.requested.display());
        return Ok(());
    };
    crate::ui_out!("format: {}", file.kind);
    crate::ui_out!("file: {}", file.path.display());
    if file.migrated {
        crate::ui_out!("requested: {}", resolution.requested.display());
    }
    for (language, path) in &resolution.languages {
        crate::ui_out!("  {language}: {}", path.display());
    }
    Ok(())
}
