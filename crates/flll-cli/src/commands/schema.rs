use crate::Context;
use std::fs;
use std::path::PathBuf;

const DEFAULT_OUT_DIR: &str = "./docs/assets/schemas";

pub fn run_schema(ctx: &Context, out_dir: Option<PathBuf>) -> color_eyre::Result<()> {
    let out_dir = out_dir.unwrap_or_else(|| {
        PathBuf::from(
            ctx.config
                .schema
                .as_ref()
                .and_then(|s| s.out_dir.clone())
                .unwrap_or_else(|| DEFAULT_OUT_DIR.to_string()),
        )
    });
    fs::create_dir_all(&out_dir)?;
    macro_rules! dump {
        ($ty:ty, $name:literal) => {{
            let schema = schemars::schema_for!($ty);
            let path = out_dir.join($name);
            let f = std::fs::File::create(&path)?;
            serde_json::to_writer_pretty(f, &schema)?;
            tracing::debug!(event = "schema_written", path = %path.display());
        }};
    }
    dump!(flll_domain::WriteReport, "write_report.schema.json");
    dump!(flll_domain::EnsureReport, "ensure_report.schema.json");
    dump!(flll_domain::ResolveReport, "resolve_report.schema.json");
    crate::ui_ok!("schemas written to {}", out_dir.display());
    Ok(())
}
