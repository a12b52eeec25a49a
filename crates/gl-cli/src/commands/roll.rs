use colored::Colorize;
use gl_mechanics::DiceNotation;

pub fn run(expr: &str, seed: Option<u64>) -> Result<(), String> {
    let notation: DiceNotation = expr.parse().map_err(|e| format!("{e}"))?;
    let mut rng = super::rng(seed);
    let result = notation.roll(&mut rng);
    println!(
        "  {} {}",
        notation.to_string().bold(),
        result.total().to_string().green().bold()
    );
    println!("  {}", result.to_string().dimmed());
    Ok(())
}
