use std::path::PathBuf;

use colored::Colorize;
use gl_core::{Attributes, Character, UserId};
use gl_mechanics::catalog::{CREDIT_RATING, builtin_items, find_skill, occupations};
use gl_mechanics::creation::points::POINT_STEP;
use gl_mechanics::creation::{Pool, PointPool};
use gl_mechanics::{CreationResult, CreationWizard};
use rand::Rng;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;

pub struct CreateArgs {
    pub name: Option<String>,
    pub occupation: Option<String>,
    pub age: Option<u32>,
    pub seed: Option<u64>,
    pub json: bool,
    pub out: Option<PathBuf>,
}

const NAMES: &[&str] = &[
    "Harvey Walters",
    "Lucy Cartwright",
    "Ezra Whateley",
    "Agnes Bellweather",
    "Tobias Marsh",
    "Margaret Eliot",
    "Silas Crane",
    "Josephine Ward",
];

/// Skills the generator puts personal interest points into.
const HOBBIES: &[&str] = &[
    "Spot Hidden",
    "Listen",
    "Dodge",
    "Library Use",
    "Psychology",
    "First Aid",
    "Stealth",
];

/// Generated skills stop growing here.
const SKILL_CAP: u32 = 75;

const STEP: u32 = POINT_STEP.unsigned_abs();

/// What the generator needs to know about the investigator.
pub struct Blueprint<'a> {
    pub name: Option<&'a str>,
    pub occupation: Option<&'a str>,
    pub age: Option<u32>,
    pub owner: Option<UserId>,
}

/// Spread a pool over `skills` five points at a time.
fn spread(
    wizard: &mut CreationWizard,
    pool: PointPool,
    skills: &[&str],
    attrs: &Attributes,
) -> CreationResult<()> {
    let mut open: Vec<&str> = skills.to_vec();
    while !open.is_empty() {
        let mut still_open = Vec::with_capacity(open.len());
        for skill in open {
            if wizard.points().remaining(pool) < STEP {
                return Ok(());
            }
            let base = find_skill(skill).map_or(0, |d| d.base_for(attrs));
            if base + wizard.points().added(skill) >= SKILL_CAP {
                continue;
            }
            if wizard.allocate(pool, skill, POINT_STEP).is_ok() {
                still_open.push(skill);
            }
        }
        open = still_open;
    }
    Ok(())
}

/// Walk the wizard from start to commit with random choices.
pub fn generate(blueprint: &Blueprint<'_>, rng: &mut StdRng) -> Result<Character, String> {
    let mut wizard = CreationWizard::new();
    let err = |e: gl_mechanics::CreationError| e.to_string();

    let name = match blueprint.name {
        Some(name) => name.to_string(),
        None => NAMES.choose(rng).copied().unwrap_or("Nameless").to_string(),
    };
    wizard.set_name(name).map_err(err)?;
    if let Some(owner) = blueprint.owner {
        wizard.set_owner(owner).map_err(err)?;
    }
    wizard.advance().map_err(err)?;

    wizard.roll_attributes(rng).map_err(err)?;
    wizard.roll_luck(rng).map_err(err)?;
    for pool in [Pool::Primary, Pool::Secondary] {
        let ids: Vec<usize> = wizard
            .pools()
            .values()
            .iter()
            .filter(|v| v.pool == pool)
            .map(|v| v.id)
            .collect();
        for (&attr, id) in pool.slots().iter().zip(ids) {
            wizard.assign(attr, id).map_err(err)?;
        }
    }
    wizard.advance().map_err(err)?;

    let occupation_id = match blueprint.occupation {
        Some(id) => id.to_string(),
        None => occupations()
            .choose(rng)
            .map(|o| o.id.to_string())
            .ok_or("the occupation catalog is empty")?,
    };
    let occupation = wizard.choose_occupation(&occupation_id).map_err(err)?;
    let attrs = wizard.pools().attributes();
    let credit = occupation.credit_rating.0.div_ceil(STEP) * STEP;
    if credit > 0 {
        wizard
            .allocate(PointPool::Occupation, CREDIT_RATING, credit as i32)
            .map_err(err)?;
    }
    spread(&mut wizard, PointPool::Occupation, occupation.skills, &attrs).map_err(err)?;
    spread(&mut wizard, PointPool::Personal, HOBBIES, &attrs).map_err(err)?;
    wizard.advance().map_err(err)?;

    for item in builtin_items().choose_multiple(rng, 2) {
        wizard.add_item(item.clone()).map_err(err)?;
    }
    wizard.advance().map_err(err)?;

    let age = blueprint.age.unwrap_or_else(|| rng.random_range(20..=60));
    wizard.set_age(age).map_err(err)?;
    wizard.advance().map_err(err)?;

    wizard.commit().map_err(err)
}

pub fn run(args: &CreateArgs) -> Result<(), String> {
    let mut rng = super::rng(args.seed);
    let blueprint = Blueprint {
        name: args.name.as_deref(),
        occupation: args.occupation.as_deref(),
        age: args.age,
        owner: None,
    };
    let character = generate(&blueprint, &mut rng)?;

    if let Some(path) = &args.out {
        let text = serde_json::to_string_pretty(&character).map_err(|e| e.to_string())?;
        std::fs::write(path, text).map_err(|e| format!("cannot write {}: {e}", path.display()))?;
        println!("  {} {}", "Saved".green().bold(), path.display());
    }

    if args.json {
        let text = serde_json::to_string_pretty(&character).map_err(|e| e.to_string())?;
        println!("{text}");
    } else {
        super::print_sheet(&character);
    }
    Ok(())
}
