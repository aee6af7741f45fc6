pub mod ensure;
pub mod resolve;
pub mod schema;
pub mod write;

use crate::Context;
use flll_services::{LabelWriter, StaticLanguages};

/// Writer for the site root and languages of `ctx`.
pub fn label_writer(ctx: &Context) -> LabelWriter {
    LabelWriter::new(
        ctx.site_root.clone(),
        StaticLanguages::new(ctx.languages.iter().cloned()),
    )
}
