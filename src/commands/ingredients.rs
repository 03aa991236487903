//! Fermentable and hop commands.

use super::Output;
use super::utils::{heading, print_json, range, text_or_dash};
use anyhow::{Result, anyhow};
use colored::Colorize;
use openbeerdata::ObdAdapter;

pub fn fermentable_types(adapter: &ObdAdapter, out: &Output) -> Result<()> {
    let types = adapter.list_fermentable_types()?;
    if out.json {
        return print_json(&types);
    }

    for kind in &types {
        println!("{:>4}  {}", kind.id.to_string().dimmed(), kind.kind);
    }
    Ok(())
}

pub fn fermentables(adapter: &ObdAdapter, out: &Output, type_id: i64) -> Result<()> {
    let fermentables = adapter.list_fermentables(type_id)?;
    if out.json {
        return print_json(&fermentables);
    }

    if fermentables.is_empty() {
        println!("{} No fermentables of type {}", "✗".red(), type_id);
        return Ok(());
    }

    for fermentable in &fermentables {
        println!(
            "{:>4}  {} {}",
            fermentable.id.to_string().dimmed(),
            fermentable.name.bold(),
            format!("({})", text_or_dash(fermentable.supplier.as_deref())).dimmed()
        );
    }
    Ok(())
}

pub fn fermentable(adapter: &ObdAdapter, out: &Output, fermentable_id: i64) -> Result<()> {
    let fermentable = adapter
        .fermentable_detail(fermentable_id)?
        .ok_or_else(|| anyhow!("No fermentable with id {}", fermentable_id))?;
    if out.json {
        return print_json(&fermentable);
    }

    heading(&fermentable.name);
    println!(
        "  {:<9} {}",
        "Supplier".bold(),
        text_or_dash(fermentable.supplier.as_deref())
    );
    println!(
        "  {:<9} {} °L",
        "Color".bold(),
        range(fermentable.color, None)
    );
    println!("\n{}", text_or_dash(fermentable.notes.as_deref()));
    Ok(())
}

pub fn hops(adapter: &ObdAdapter, out: &Output) -> Result<()> {
    let hops = adapter.list_hops()?;
    if out.json {
        return print_json(&hops);
    }

    for hop in &hops {
        println!(
            "{:>4}  {} {}",
            hop.id.to_string().dimmed(),
            hop.name.bold(),
            format!("({})", text_or_dash(hop.origin.as_deref())).dimmed()
        );
    }
    Ok(())
}

pub fn hop(adapter: &ObdAdapter, out: &Output, hop_id: i64) -> Result<()> {
    let hop = adapter
        .hop_detail(hop_id)?
        .ok_or_else(|| anyhow!("No hop with id {}", hop_id))?;
    let substitutes = adapter.list_hop_substitutes(hop_id)?;

    if out.json {
        return print_json(&serde_json::json!({
            "hop": hop,
            "substitutes": substitutes,
        }));
    }

    heading(&hop.name);
    println!(
        "  {:<7} {}",
        "Origin".bold(),
        text_or_dash(hop.origin.as_deref())
    );
    println!(
        "  {:<7} {}%",
        "Alpha".bold(),
        range(hop.alpha_low, hop.alpha_high)
    );
    println!("\n{}", text_or_dash(hop.notes.as_deref()));

    println!("\n{}", "Substitutes".bold().underline());
    if substitutes.is_empty() {
        println!("-");
    }
    for substitute in &substitutes {
        println!("{:>4}  {}", substitute.id.to_string().dimmed(), substitute.name);
    }
    Ok(())
}
