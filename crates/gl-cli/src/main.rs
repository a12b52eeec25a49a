//! Command-line tools for Gaslight: dice, checks, investigators, catalogs,
//! and a scripted table session.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "gaslight",
    about = "Gaslight: tools for investigative horror at the table",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Roll a dice expression such as 3d6, 2d6+6 or d100
    Roll {
        /// Dice expression
        expr: String,

        /// RNG seed for a repeatable roll
        #[arg(short, long)]
        seed: Option<u64>,
    },

    /// Roll d100 against a target value and classify the result
    Check {
        /// Skill or attribute value to roll under
        target: u32,

        /// Skill name shown in the output
        #[arg(long, default_value = "Check")]
        skill: String,

        /// Bonus dice (0-2)
        #[arg(short, long, default_value = "0", conflicts_with = "penalty")]
        bonus: u8,

        /// Penalty dice (0-2)
        #[arg(short, long, default_value = "0")]
        penalty: u8,

        /// Luck available for a spend after a failure
        #[arg(short, long)]
        luck: Option<u32>,

        /// Keeper-only roll; no follow-up options
        #[arg(long)]
        blind: bool,

        /// RNG seed for a repeatable roll
        #[arg(short, long)]
        seed: Option<u64>,
    },

    /// Resolve an opposed check between two values
    Oppose {
        /// The initiating side's value
        attacker: u32,

        /// The resisting side's value
        defender: u32,

        /// RNG seed for repeatable rolls
        #[arg(short, long)]
        seed: Option<u64>,
    },

    /// Derive hit points, sanity, magic points, move and build
    Derive {
        /// Strength
        #[arg(long = "str")]
        str_: u32,

        /// Constitution
        #[arg(long)]
        con: u32,

        /// Size
        #[arg(long)]
        siz: u32,

        /// Dexterity
        #[arg(long)]
        dex: u32,

        /// Power
        #[arg(long)]
        pow: u32,

        /// Age in years
        #[arg(long, default_value = "25")]
        age: u32,
    },

    /// Generate a random investigator through the creation wizard
    Create {
        /// Investigator name
        #[arg(short, long)]
        name: Option<String>,

        /// Occupation id (see `gaslight occupations`)
        #[arg(short, long)]
        occupation: Option<String>,

        /// Age in years
        #[arg(long)]
        age: Option<u32>,

        /// RNG seed for a repeatable investigator
        #[arg(short, long)]
        seed: Option<u64>,

        /// Print the sheet as JSON
        #[arg(long)]
        json: bool,

        /// Write the sheet as JSON to this file
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Show an investigator sheet saved as JSON
    Show {
        /// Path to the JSON sheet
        file: PathBuf,
    },

    /// List occupations with their skill point formulas
    Occupations,

    /// List skills and their base chances
    Skills,

    /// List the built-in equipment catalog
    Items {
        /// Filter by category (weapon, tool, medical, document, clothing, occult, misc)
        #[arg(short, long)]
        category: Option<String>,
    },

    /// Play a short scripted session against the in-memory backend
    Demo {
        /// RNG seed for repeatable rolls
        #[arg(short, long, default_value = "1920")]
        seed: u64,
    },
}

fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Roll { expr, seed } => commands::roll::run(&expr, seed),
        Commands::Check {
            target,
            skill,
            bonus,
            penalty,
            luck,
            blind,
            seed,
        } => commands::check::run(&commands::check::CheckArgs {
            target,
            skill,
            bonus,
            penalty,
            luck,
            blind,
            seed,
        }),
        Commands::Oppose {
            attacker,
            defender,
            seed,
        } => commands::check::oppose(attacker, defender, seed),
        Commands::Derive {
            str_,
            con,
            siz,
            dex,
            pow,
            age,
        } => commands::derive::run(str_, con, siz, dex, pow, age),
        Commands::Create {
            name,
            occupation,
            age,
            seed,
            json,
            out,
        } => commands::create::run(&commands::create::CreateArgs {
            name,
            occupation,
            age,
            seed,
            json,
            out,
        }),
        Commands::Show { file } => commands::show::run(&file),
        Commands::Occupations => commands::catalog::occupations(),
        Commands::Skills => commands::catalog::skills(),
        Commands::Items { category } => commands::catalog::items(category.as_deref()),
        Commands::Demo { seed } => commands::demo::run(seed),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
