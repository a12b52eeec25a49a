//! The built-in equipment catalog.

use gl_core::{EquipmentItem, ItemCategory};

fn weapon(id: &str, name: &str, description: &str, damage: &str, range: &str) -> EquipmentItem {
    EquipmentItem::new(id, name, ItemCategory::Weapon, description)
        .with_stat("damage", damage)
        .with_stat("range", range)
}

/// Items every table starts with. Keepers add their own on top.
pub fn builtin_items() -> Vec<EquipmentItem> {
    vec![
        weapon(
            "revolver-38",
            ".38 Revolver",
            "Six-shot police revolver.",
            "1d10",
            "15 yards",
        )
        .with_stat("ammo", "6")
        .with_stat("malfunction", "100"),
        weapon(
            "pistol-45",
            ".45 Automatic",
            "Army-issue semi-automatic pistol.",
            "1d10+2",
            "15 yards",
        )
        .with_stat("ammo", "7")
        .with_stat("malfunction", "100"),
        weapon(
            "shotgun-12g",
            "12-gauge Shotgun",
            "Double-barrelled, sawn short.",
            "4d6/2d6/1d6",
            "10/20/50 yards",
        )
        .with_stat("ammo", "2")
        .with_stat("malfunction", "100"),
        weapon(
            "rifle-30-06",
            ".30-06 Bolt-action Rifle",
            "Hunting rifle with a five-round magazine.",
            "2d6+4",
            "110 yards",
        )
        .with_stat("ammo", "5")
        .with_stat("malfunction", "100"),
        weapon("knife", "Large Knife", "A kitchen or hunting knife.", "1d8", "touch"),
        weapon("club", "Club", "Cosh, cudgel or table leg.", "1d6", "touch"),
        EquipmentItem::new(
            "flashlight",
            "Flashlight",
            ItemCategory::Tool,
            "Electric torch with spare batteries.",
        ),
        EquipmentItem::new(
            "lantern",
            "Oil Lantern",
            ItemCategory::Tool,
            "Burns for about six hours on a fill.",
        ),
        EquipmentItem::new(
            "lockpicks",
            "Lockpick Set",
            ItemCategory::Tool,
            "Picks and tension wrenches in a leather roll.",
        )
        .with_stat("bonus", "Locksmith"),
        EquipmentItem::new(
            "camera",
            "Folding Camera",
            ItemCategory::Tool,
            "Kodak with a dozen plates.",
        ),
        EquipmentItem::new(
            "crowbar",
            "Crowbar",
            ItemCategory::Tool,
            "For crates, doors and coffins.",
        )
        .with_stat("damage", "1d8"),
        EquipmentItem::new(
            "first-aid-kit",
            "First Aid Kit",
            ItemCategory::Medical,
            "Bandages, iodine, smelling salts.",
        )
        .with_stat("uses", "5"),
        EquipmentItem::new(
            "laudanum",
            "Laudanum",
            ItemCategory::Medical,
            "Tincture of opium. Calms the nerves.",
        ),
        EquipmentItem::new(
            "notebook",
            "Notebook",
            ItemCategory::Document,
            "Pocket notebook and pencil.",
        ),
        EquipmentItem::new(
            "city-map",
            "City Map",
            ItemCategory::Document,
            "Street map of Arkham and environs.",
        ),
        EquipmentItem::new(
            "trench-coat",
            "Trench Coat",
            ItemCategory::Clothing,
            "Deep pockets, wide collar.",
        ),
        EquipmentItem::new(
            "elder-sign",
            "Carved Stone Star",
            ItemCategory::Occult,
            "A grey-green five-pointed stone, cold to the touch.",
        ),
    ]
}

/// Look up a built-in item by id.
pub fn find_item(id: &str) -> Option<EquipmentItem> {
    let id = id.trim();
    builtin_items().into_iter().find(|item| item.id == id)
}
