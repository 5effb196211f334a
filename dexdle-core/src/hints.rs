use dexdle_types::{HintKind, HintRow, SpeciesMetadata};

pub const HINT_PLACEHOLDER: &str = "unknown";
pub const NO_SECONDARY_TYPE: &str = "None";

const HINT_TIERS: [HintKind; 4] = [
    HintKind::PrimaryType,
    HintKind::SecondaryType,
    HintKind::EvolutionStage,
    HintKind::Generation,
];

/// Build the hint panel for a given hint level.
///
/// Tier `n` (1-based) unlocks once `level >= n`. Every tier is always present
/// in the output; locked tiers carry [`HINT_PLACEHOLDER`].
pub fn revealed_hints(level: u32, species: &SpeciesMetadata) -> Vec<HintRow> {
    HINT_TIERS
        .iter()
        .enumerate()
        .map(|(index, kind)| {
            if level > index as u32 {
                HintRow {
                    kind: *kind,
                    value: hint_value(*kind, species),
                    revealed: true,
                }
            } else {
                locked_hint(*kind)
            }
        })
        .collect()
}

/// The hint panel with every tier locked, used when species data is missing.
pub fn locked_hints() -> Vec<HintRow> {
    HINT_TIERS.iter().map(|kind| locked_hint(*kind)).collect()
}

fn locked_hint(kind: HintKind) -> HintRow {
    HintRow {
        kind,
        value: HINT_PLACEHOLDER.to_string(),
        revealed: false,
    }
}

fn hint_value(kind: HintKind, species: &SpeciesMetadata) -> String {
    match kind {
        HintKind::PrimaryType => species
            .types
            .first()
            .cloned()
            .unwrap_or_else(|| HINT_PLACEHOLDER.to_string()),
        HintKind::SecondaryType => species
            .types
            .get(1)
            .cloned()
            .unwrap_or_else(|| NO_SECONDARY_TYPE.to_string()),
        HintKind::EvolutionStage => species.evolution_stage.to_string(),
        HintKind::Generation => generation_ordinal(&species.generation)
            .map(|ordinal| ordinal.to_string())
            .unwrap_or_else(|| HINT_PLACEHOLDER.to_string()),
    }
}

/// Parse a generation identifier such as `"generation-iii"` or `"iii"`.
pub fn generation_ordinal(identifier: &str) -> Option<u32> {
    let numeral = identifier
        .rsplit('-')
        .next()
        .unwrap_or(identifier);
    decode_roman(numeral)
}

fn roman_value(symbol: char) -> Option<u32> {
    match symbol.to_ascii_uppercase() {
        'I' => Some(1),
        'V' => Some(5),
        'X' => Some(10),
        'L' => Some(50),
        'C' => Some(100),
        'D' => Some(500),
        'M' => Some(1000),
        _ => None,
    }
}

/// Decode a Roman numeral, case-insensitively. A symbol followed by a larger
/// one is subtracted, everything else is added.
pub fn decode_roman(numeral: &str) -> Option<u32> {
    let values = numeral
        .trim()
        .chars()
        .map(roman_value)
        .collect::<Option<Vec<u32>>>()?;
    if values.is_empty() {
        return None;
    }

    let mut total: i64 = 0;
    for (index, value) in values.iter().enumerate() {
        match values.get(index + 1) {
            Some(next) if value < next => total -= *value as i64,
            _ => total += *value as i64,
        }
    }
    u32::try_from(total).ok().filter(|total| *total > 0)
}

/// Encode a positive integer in standard subtractive Roman form (lowercase,
/// matching how generation identifiers are spelled). Zero encodes as "".
pub fn to_roman(mut value: u32) -> String {
    const TABLE: [(u32, &str); 13] = [
        (1000, "m"),
        (900, "cm"),
        (500, "d"),
        (400, "cd"),
        (100, "c"),
        (90, "xc"),
        (50, "l"),
        (40, "xl"),
        (10, "x"),
        (9, "ix"),
        (5, "v"),
        (4, "iv"),
        (1, "i"),
    ];

    let mut numeral = String::new();
    for (amount, symbol) in TABLE {
        while value >= amount {
            numeral.push_str(symbol);
            value -= amount;
        }
    }
    numeral
}

#[cfg(test)]
mod tests {
    use super::*;

    fn charizard() -> SpeciesMetadata {
        SpeciesMetadata {
            name: "charizard".to_string(),
            types: vec!["fire".to_string(), "flying".to_string()],
            generation: "generation-i".to_string(),
            evolution_stage: 3,
            sprite_url: None,
        }
    }

    fn values(rows: &[HintRow]) -> Vec<&str> {
        rows.iter().map(|row| row.value.as_str()).collect()
    }

    #[test]
    fn test_level_zero_is_all_placeholders() {
        let rows = revealed_hints(0, &charizard());
        assert_eq!(rows.len(), 4);
        assert!(rows.iter().all(|row| !row.revealed));
        assert_eq!(rows, locked_hints());
    }

    #[test]
    fn test_tiers_unlock_in_order() {
        let species = charizard();
        assert_eq!(
            values(&revealed_hints(1, &species)),
            vec!["fire", "unknown", "unknown", "unknown"]
        );
        assert_eq!(
            values(&revealed_hints(2, &species)),
            vec!["fire", "flying", "unknown", "unknown"]
        );
        assert_eq!(
            values(&revealed_hints(3, &species)),
            vec!["fire", "flying", "3", "unknown"]
        );
        assert_eq!(
            values(&revealed_hints(4, &species)),
            vec!["fire", "flying", "3", "1"]
        );
        assert_eq!(revealed_hints(6, &species), revealed_hints(4, &species));
    }

    #[test]
    fn test_row_layout_is_stable() {
        let species = charizard();
        for level in 0..=6 {
            let kinds: Vec<HintKind> = revealed_hints(level, &species)
                .iter()
                .map(|row| row.kind)
                .collect();
            assert_eq!(kinds, HINT_TIERS.to_vec());
        }
    }

    #[test]
    fn test_single_typed_species_shows_none() {
        let mut species = charizard();
        species.types = vec!["electric".to_string()];
        let rows = revealed_hints(2, &species);
        assert_eq!(rows[1].value, NO_SECONDARY_TYPE);
        assert!(rows[1].revealed);
    }

    #[test]
    fn test_decode_roman() {
        assert_eq!(decode_roman("iii"), Some(3));
        assert_eq!(decode_roman("IV"), Some(4));
        assert_eq!(decode_roman("ix"), Some(9));
        assert_eq!(decode_roman("MCMXCIV"), Some(1994));
        assert_eq!(decode_roman(""), None);
        assert_eq!(decode_roman("iiz"), None);
    }

    #[test]
    fn test_generation_ordinal() {
        assert_eq!(generation_ordinal("generation-iii"), Some(3));
        assert_eq!(generation_ordinal("viii"), Some(8));
        assert_eq!(generation_ordinal("generation-"), None);
    }

    #[test]
    fn test_roman_round_trip_for_generations() {
        for generation in 1..=9 {
            assert_eq!(decode_roman(&to_roman(generation)), Some(generation));
        }
        assert_eq!(to_roman(4), "iv");
        assert_eq!(to_roman(9), "ix");
    }

    #[test]
    fn test_unparseable_generation_renders_placeholder() {
        let mut species = charizard();
        species.generation = "generation-unknown".to_string();
        let rows = revealed_hints(4, &species);
        assert_eq!(rows[3].value, HINT_PLACEHOLDER);
    }
}
