pub mod catalog;
pub mod check;
pub mod create;
pub mod demo;
pub mod derive;
pub mod roll;
pub mod show;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use gl_core::{Attribute, Character, MadnessState};
use rand::SeedableRng;
use rand::rngs::StdRng;

/// A seeded rng, or one seeded from the OS.
fn rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

/// Print an investigator sheet.
fn print_sheet(c: &Character) {
    let occupation = gl_mechanics::catalog::find_occupation(&c.occupation)
        .map(|o| o.name)
        .unwrap_or("(no occupation)");
    println!("  {} {}", c.name.bold(), format!("({occupation}, age {})", c.age).dimmed());
    println!();

    let attrs: Vec<String> = Attribute::ALL
        .iter()
        .map(|a| format!("{a} {}", c.attributes.get(*a)))
        .collect();
    println!("  {}", attrs.join("  "));
    println!(
        "  HP {}  SAN {}  MP {}  MOV {}  Build {}  DB {}",
        c.derived.hit_points,
        c.derived.sanity,
        c.derived.magic_points,
        c.derived.move_rate,
        c.derived.build,
        c.derived.damage_bonus
    );
    if c.status.major_wound {
        println!("  {}", "major wound".red());
    }
    if c.status.madness != MadnessState::Normal {
        println!("  {}", c.status.madness.to_string().red());
    }
    println!();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Skill", "Value", "Half", "Fifth"]);
    for skill in c.skills.iter().filter(|s| s.added > 0) {
        table.add_row(vec![
            skill.name.clone(),
            skill.value().to_string(),
            skill.half().to_string(),
            skill.fifth().to_string(),
        ]);
    }
    println!("{table}");

    if !c.inventory.is_empty() {
        println!();
        println!("  {}", "Inventory".bold().underline());
        for held in &c.inventory {
            println!("    {} {}", held.item.name, format!("[{}]", held.instance_id).dimmed());
        }
    }
}
