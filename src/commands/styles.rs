//! BJCP style commands, SRM color lookup and dataset version.

use super::Output;
use super::utils::{heading, print_json, range, swatch, text_or_dash};
use anyhow::{Result, anyhow};
use colored::Colorize;
use openbeerdata::ObdAdapter;

pub fn categories(adapter: &ObdAdapter, out: &Output) -> Result<()> {
    let categories = adapter.list_categories()?;
    if out.json {
        return print_json(&categories);
    }

    for category in &categories {
        println!("{:>4}  {}", category.id.to_string().dimmed(), category.name);
    }
    Ok(())
}

pub fn styles(adapter: &ObdAdapter, out: &Output, category_id: i64) -> Result<()> {
    let styles = adapter.list_subcategories(category_id)?;
    if out.json {
        return print_json(&styles);
    }

    if styles.is_empty() {
        println!("{} No styles in category {}", "✗".red(), category_id);
        return Ok(());
    }

    for style in &styles {
        println!(
            "{:>4}  {:<4} {}",
            style.id.to_string().dimmed(),
            style.display_id.bold(),
            style.name
        );
    }
    Ok(())
}

pub fn style(adapter: &ObdAdapter, out: &Output, subcategory_id: i64) -> Result<()> {
    let style = adapter
        .subcategory_detail(subcategory_id)?
        .ok_or_else(|| anyhow!("No style with id {}", subcategory_id))?;
    if out.json {
        return print_json(&style);
    }

    heading(&format!("{} {}", style.display_id, style.name));

    let vitals = [
        ("OG", range(style.og_low, style.og_high)),
        ("FG", range(style.fg_low, style.fg_high)),
        ("IBU", range(style.ibu_low, style.ibu_high)),
        ("SRM", range(style.srm_low, style.srm_high)),
        ("ABV", range(style.abv_low, style.abv_high)),
    ];
    for (label, value) in vitals {
        println!("  {:<4} {}", label.bold(), value);
    }

    // Paint the SRM range endpoints when the dataset has swatches for them
    if let (Some(low), Some(high)) = (style.srm_low, style.srm_high) {
        let low_key = format!("{}", low);
        let high_key = format!("{}", high);
        let low_pair = adapter.resolve_color(&low_key)?;
        let high_pair = adapter.resolve_color(&high_key)?;
        println!(
            "       {} {}",
            swatch(&low_pair, &format!(" {} ", low_key)),
            swatch(&high_pair, &format!(" {} ", high_key))
        );
    }

    let sections = [
        ("Aroma", style.aroma.as_deref()),
        ("Appearance", style.appearance.as_deref()),
        ("Flavor", style.flavor.as_deref()),
        ("Mouthfeel", style.mouthfeel.as_deref()),
        ("Overall Impression", style.impression.as_deref()),
        ("Comments", style.comments.as_deref()),
        ("Ingredients", style.ingredients.as_deref()),
        ("Commercial Examples", style.examples.as_deref()),
    ];
    for (title, body) in sections {
        println!("\n{}", title.bold().underline());
        println!("{}", text_or_dash(body));
    }
    Ok(())
}

pub fn color(adapter: &ObdAdapter, out: &Output, srm: &str) -> Result<()> {
    let pair = adapter.resolve_color(srm)?;
    if out.json {
        return print_json(&serde_json::json!({
            "srm": srm,
            "background": pair.background.hex(),
            "text": pair.text.hex(),
        }));
    }

    println!(
        "{}  background {}  text {}",
        swatch(&pair, &format!("  SRM {}  ", srm)),
        pair.background,
        pair.text
    );
    Ok(())
}

pub fn version(adapter: &ObdAdapter, out: &Output) -> Result<()> {
    let version = adapter.dataset_version()?;
    if out.json {
        return print_json(&serde_json::json!({ "version": version }));
    }

    match version {
        Some(v) => println!("Open Beer Data {}", v.bold()),
        None => println!("{} Dataset carries no version stamp", "⚠".yellow()),
    }
    Ok(())
}
