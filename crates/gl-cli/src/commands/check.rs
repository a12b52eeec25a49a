use colored::{ColoredString, Colorize};
use gl_mechanics::rules::{fifth, half};
use gl_mechanics::{OpposedWinner, PercentileModifier, SkillCheck, SuccessLevel, opposed};

pub struct CheckArgs {
    pub target: u32,
    pub skill: String,
    pub bonus: u8,
    pub penalty: u8,
    pub luck: Option<u32>,
    pub blind: bool,
    pub seed: Option<u64>,
}

fn paint(level: SuccessLevel) -> ColoredString {
    let text = level.to_string();
    match level {
        SuccessLevel::Critical | SuccessLevel::Extreme => text.green().bold(),
        SuccessLevel::Hard | SuccessLevel::Success => text.green(),
        SuccessLevel::Failure => text.yellow(),
        SuccessLevel::Fumble => text.red().bold(),
    }
}

pub fn run(args: &CheckArgs) -> Result<(), String> {
    if args.target == 0 {
        return Err("target must be at least 1".into());
    }
    let modifier = if args.bonus > 0 {
        PercentileModifier::bonus(args.bonus)
    } else {
        PercentileModifier::penalty(args.penalty)
    };
    let mut rng = super::rng(args.seed);
    let check = SkillCheck::roll(&args.skill, args.target, modifier, args.blind, &mut rng);

    println!(
        "  {} {} {}",
        args.skill.bold(),
        format!("({} / {} / {})", args.target, half(args.target), fifth(args.target)).dimmed(),
        if args.blind { "[blind]".dimmed() } else { "".normal() }
    );
    println!("  rolled {}: {}", check.roll, paint(check.level));

    let options = check.options(args.luck.unwrap_or(0));
    if let Some(cost) = options.spend_luck {
        println!("  spend {cost} luck to succeed");
    }
    if options.push {
        println!("  the roll can be pushed");
    }
    Ok(())
}

pub fn oppose(attacker: u32, defender: u32, seed: Option<u64>) -> Result<(), String> {
    let mut rng = super::rng(seed);
    let a = SkillCheck::roll("Attacker", attacker, PercentileModifier::None, false, &mut rng);
    let d = SkillCheck::roll("Defender", defender, PercentileModifier::None, false, &mut rng);
    println!("  attacker ({attacker}) rolled {}: {}", a.roll, paint(a.level));
    println!("  defender ({defender}) rolled {}: {}", d.roll, paint(d.level));
    let verdict = match opposed((a.level, attacker), (d.level, defender)) {
        OpposedWinner::Attacker => "attacker wins".green(),
        OpposedWinner::Defender => "defender wins".yellow(),
        OpposedWinner::Neither => "neither side succeeds".dimmed(),
    };
    println!("  {verdict}");
    Ok(())
}
