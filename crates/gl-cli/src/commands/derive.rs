use comfy_table::{ContentArrangement, Table};
use gl_core::{Attribute, Attributes};
use gl_mechanics::rules;

pub fn run(str_: u32, con: u32, siz: u32, dex: u32, pow: u32, age: u32) -> Result<(), String> {
    let attrs = Attributes::from_values([
        (Attribute::Str, str_),
        (Attribute::Con, con),
        (Attribute::Siz, siz),
        (Attribute::Dex, dex),
        (Attribute::Pow, pow),
    ]);
    let derived = rules::derive(&attrs, age);

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Stat", "Value"]);
    table.add_row(vec!["Hit Points".to_string(), derived.hit_points.to_string()]);
    table.add_row(vec!["Magic Points".to_string(), derived.magic_points.to_string()]);
    table.add_row(vec!["Sanity".to_string(), derived.starting_sanity.to_string()]);
    table.add_row(vec!["Move".to_string(), derived.move_rate.to_string()]);
    table.add_row(vec!["Build".to_string(), derived.build.to_string()]);
    table.add_row(vec!["Damage Bonus".to_string(), derived.damage_bonus]);
    table.add_row(vec![
        "Dodge".to_string(),
        rules::half(dex).to_string(),
    ]);
    println!("{table}");
    Ok(())
}
