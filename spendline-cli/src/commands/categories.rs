//! Categories command - list the fixed expense categories

use anyhow::Result;
use spendline_core::services::dashboard::CATEGORY_PALETTE;
use spendline_core::Category;

use crate::output::paint;

pub fn run(json: bool) -> Result<()> {
    if json {
        let names: Vec<_> = Category::ALL.iter().map(|c| c.as_str()).collect();
        println!("{}", serde_json::to_string_pretty(&names)?);
        return Ok(());
    }

    for (i, category) in Category::ALL.iter().enumerate() {
        let color = CATEGORY_PALETTE[i % CATEGORY_PALETTE.len()];
        println!("  {} {}", paint("●", color), category);
    }

    Ok(())
}
