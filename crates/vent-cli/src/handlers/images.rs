//! Images command handler.

use anyhow::Result;

use crate::bootstrap::CliContext;
use crate::presentation::{print_failures, render_table};

/// Execute the images command.
///
/// Lists vent images by default, every image with `all`.
pub async fn execute(ctx: &CliContext, all: bool) -> Result<()> {
    let mut failures = Vec::new();
    let images = ctx
        .snapshot()
        .image_listing(!all)
        .await
        .or_empty(&mut failures);

    if images.is_empty() {
        println!("No images found.");
    } else {
        let rows: Vec<Vec<String>> = images.into_iter().map(|(tag, id)| vec![tag, id]).collect();
        print!("{}", render_table(&["TAG", "IMAGE ID"], &rows));
    }
    print_failures(&failures);
    Ok(())
}
