use std::path::Path;

use gl_core::Character;

pub fn run(file: &Path) -> Result<(), String> {
    let text = std::fs::read_to_string(file)
        .map_err(|e| format!("cannot read {}: {e}", file.display()))?;
    let doc: serde_json::Value =
        serde_json::from_str(&text).map_err(|e| format!("{}: {e}", file.display()))?;
    let character =
        Character::from_document(doc).map_err(|e| format!("{}: {e}", file.display()))?;
    super::print_sheet(&character);
    Ok(())
}
