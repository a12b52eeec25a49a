use comfy_table::{ContentArrangement, Table};
use gl_core::ItemCategory;
use gl_mechanics::catalog::{SkillBase, builtin_items, skill_defs};

pub fn occupations() -> Result<(), String> {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Id", "Occupation", "Skill Points", "Credit", "Skills"]);
    let all = gl_mechanics::catalog::occupations();
    for occ in all {
        table.add_row(vec![
            occ.id.to_string(),
            occ.name.to_string(),
            occ.formula.to_string(),
            format!("{}-{}", occ.credit_rating.0, occ.credit_rating.1),
            occ.skills.join(", "),
        ]);
    }
    println!("{table}");
    println!();
    println!("  {} occupations", all.len());
    Ok(())
}

pub fn skills() -> Result<(), String> {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Skill", "Base", "Improves"]);
    for def in skill_defs() {
        let base = match def.base {
            SkillBase::Fixed(n) => format!("{n:02}%"),
            SkillBase::HalfDex => "half DEX".to_string(),
            SkillBase::Edu => "EDU".to_string(),
        };
        let improves = if def.improvable { "yes" } else { "no" };
        table.add_row(vec![def.name.to_string(), base, improves.to_string()]);
    }
    println!("{table}");
    Ok(())
}

pub fn items(category: Option<&str>) -> Result<(), String> {
    let filter = match category {
        Some(c) => Some(ItemCategory::parse(c).ok_or_else(|| format!("unknown category: {c}"))?),
        None => None,
    };
    let items: Vec<_> = builtin_items()
        .into_iter()
        .filter(|i| filter.is_none_or(|f| i.category == f))
        .collect();

    if items.is_empty() {
        println!("  No items found.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Id", "Item", "Category", "Stats"]);
    for item in &items {
        let stats: Vec<String> = item.stats.iter().map(|(k, v)| format!("{k}: {v}")).collect();
        table.add_row(vec![
            item.id.clone(),
            item.name.clone(),
            item.category.to_string(),
            stats.join(", "),
        ]);
    }
    println!("{table}");
    println!();
    println!("  {} items", items.len());
    Ok(())
}
