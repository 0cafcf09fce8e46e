//! Caption transformation modes.
//! The registry is pure data plus pure functions: no I/O and no backend
//! dependency, so every mode works offline through its fallback.

use crate::error::EngineError;
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod fallback;

/// Closed set of mode identifiers.
/// Serialized snake_case, matching the keys used in cache entries and the
/// CLI surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModeKey {
    Original,
    JoeyDiaz,
    TheoVon,
    FactCheck,
    Trivia,
    Weed,
    Pirate,
    Shakespearean,
    Narrator,
}

impl ModeKey {
    /// Declaration order; the registry and every listing follow it.
    pub const ALL: [ModeKey; 9] = [
        ModeKey::Original,
        ModeKey::JoeyDiaz,
        ModeKey::TheoVon,
        ModeKey::FactCheck,
        ModeKey::Trivia,
        ModeKey::Weed,
        ModeKey::Pirate,
        ModeKey::Shakespearean,
        ModeKey::Narrator,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModeKey::Original => "original",
            ModeKey::JoeyDiaz => "joey_diaz",
            ModeKey::TheoVon => "theo_von",
            ModeKey::FactCheck => "fact_check",
            ModeKey::Trivia => "trivia",
            ModeKey::Weed => "weed",
            ModeKey::Pirate => "pirate",
            ModeKey::Shakespearean => "shakespearean",
            ModeKey::Narrator => "narrator",
        }
    }

    pub fn parse(name: &str) -> Option<ModeKey> {
        Self::ALL.iter().copied().find(|k| k.as_str() == name)
    }
}

impl fmt::Display for ModeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named transformation style.
#[derive(Debug, Clone, Serialize)]
pub struct Mode {
    pub key: ModeKey,
    pub display_name: &'static str,
    pub description: &'static str,
    /// Instruction handed to the generation backend; empty for `original`.
    pub instruction: &'static str,
}

/// Immutable, ordered mode table. Built once and injected into the engine.
#[derive(Debug, Clone)]
pub struct ModeRegistry {
    modes: Vec<Mode>,
}

impl ModeRegistry {
    /// The built-in nine modes, in declaration order.
    pub fn builtin() -> Self {
        let modes = ModeKey::ALL
            .iter()
            .map(|&key| Mode {
                key,
                display_name: display_name(key),
                description: description(key),
                instruction: instruction(key),
            })
            .collect();
        Self { modes }
    }

    pub fn modes(&self) -> &[Mode] {
        &self.modes
    }

    pub fn get(&self, key: ModeKey) -> &Mode {
        // ALL and the table are built from the same list.
        &self.modes[ModeKey::ALL.iter().position(|&k| k == key).unwrap_or(0)]
    }

    /// Look a mode up by its string key.
    pub fn resolve(&self, name: &str) -> Result<&Mode, EngineError> {
        ModeKey::parse(name)
            .map(|key| self.get(key))
            .ok_or_else(|| EngineError::UnknownMode {
                key: name.to_string(),
            })
    }
}

/// Offline transform for `key`. Pure, never fails, non-empty output for
/// non-empty input. `original` is the identity.
pub fn fallback(key: ModeKey, text: &str) -> String {
    match key {
        ModeKey::Original => text.to_string(),
        ModeKey::JoeyDiaz => fallback::joey_diaz(text),
        ModeKey::TheoVon => fallback::theo_von(text),
        ModeKey::FactCheck => fallback::fact_check(text),
        ModeKey::Trivia => fallback::trivia(text),
        ModeKey::Weed => fallback::weed(text),
        ModeKey::Pirate => fallback::pirate(text),
        ModeKey::Shakespearean => fallback::shakespearean(text),
        ModeKey::Narrator => fallback::narrator(text),
    }
}

fn display_name(key: ModeKey) -> &'static str {
    match key {
        ModeKey::Original => "Original",
        ModeKey::JoeyDiaz => "Joey Diaz",
        ModeKey::TheoVon => "Theo Von",
        ModeKey::FactCheck => "Fact Check",
        ModeKey::Trivia => "Trivia",
        ModeKey::Weed => "Chill/Stoner",
        ModeKey::Pirate => "Pirate",
        ModeKey::Shakespearean => "Shakespearean",
        ModeKey::Narrator => "David Attenborough",
    }
}

fn description(key: ModeKey) -> &'static str {
    match key {
        ModeKey::Original => "Keep captions unchanged",
        ModeKey::JoeyDiaz => "Explosive Bronx-style storytelling",
        ModeKey::TheoVon => "Southern metaphors and absurd storytelling",
        ModeKey::FactCheck => "Adds quick fact-checks to statements",
        ModeKey::Trivia => "Sprinkles in fun facts about people, places and topics",
        ModeKey::Weed => "Chill, slangy, stoner-friendly vibes",
        ModeKey::Pirate => "Pirate speak (Arr matey!)",
        ModeKey::Shakespearean => "Elizabethan English with thee and thou",
        ModeKey::Narrator => "Nature documentary narration",
    }
}

fn instruction(key: ModeKey) -> &'static str {
    match key {
        ModeKey::Original => "",
        ModeKey::JoeyDiaz => {
            "Transform this caption into Joey Diaz's explosive storytelling style. \
             Use high energy, phrases like \"Listen to me\" and \"Back in the day\", \
             and colorful but appropriate language. Keep the meaning of the scene."
        }
        ModeKey::TheoVon => {
            "Rewrite this caption in Theo Von's comedic style: bizarre Southern \
             metaphors, absurd analogies that somehow make sense, and random \
             Louisiana anecdotes. Keep it entertaining but still convey the scene."
        }
        ModeKey::FactCheck => {
            "Add brief fact-checks in brackets after any questionable claims in \
             this caption, like [\u{2713} Correct] or [\u{274c} Incorrect: actual fact]. Keep \
             additions short and informative; do not fact-check obvious fiction."
        }
        ModeKey::Trivia => {
            "Add interesting trivia related to anything mentioned in this caption, \
             in brackets like [Fun fact: ...] or [Did you know: ...]. Keep facts \
             relevant and concise without overwhelming the original caption."
        }
        ModeKey::Weed => {
            "Transform this caption into a chill, stoner-friendly version. Use \
             slang like \"dude\", \"man\", \"totally\". Keep the core meaning but \
             make it sound relaxed, casual and simple."
        }
        ModeKey::Pirate => {
            "Transform this caption into pirate speak. Replace \"you\" with \"ye\" \
             and \"your\" with \"yer\", add nautical phrases like \"shiver me \
             timbers\", and keep the meaning of the original line."
        }
        ModeKey::Shakespearean => {
            "Transform this caption into Shakespearean English. Use thou, thee, \
             thy, flowery poetic phrasing and words like \"prithee\" and \
             \"verily\", while keeping the meaning intact."
        }
        ModeKey::Narrator => {
            "Rewrite this caption as David Attenborough-style nature documentary \
             narration: scientific wonder, phrases like \"Here we observe\", and \
             everyday human behavior treated as fascinating animal behavior."
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_order_matches_declaration_order() {
        let registry = ModeRegistry::builtin();
        let keys: Vec<ModeKey> = registry.modes().iter().map(|m| m.key).collect();
        assert_eq!(keys, ModeKey::ALL.to_vec());
    }

    #[test]
    fn only_the_identity_mode_has_an_empty_instruction() {
        let registry = ModeRegistry::builtin();
        for mode in registry.modes() {
            if mode.key == ModeKey::Original {
                assert!(mode.instruction.is_empty());
            } else {
                assert!(!mode.instruction.is_empty(), "{} needs a prompt", mode.key);
            }
        }
    }

    #[test]
    fn resolves_known_and_unknown_keys() {
        let registry = ModeRegistry::builtin();
        assert_eq!(registry.resolve("pirate").unwrap().key, ModeKey::Pirate);
        assert!(matches!(
            registry.resolve("klingon"),
            Err(EngineError::UnknownMode { .. })
        ));
    }

    #[test]
    fn key_names_roundtrip() {
        for key in ModeKey::ALL {
            assert_eq!(ModeKey::parse(key.as_str()), Some(key));
        }
    }

    #[test]
    fn original_fallback_is_identity() {
        assert_eq!(fallback(ModeKey::Original, "Hello there"), "Hello there");
    }

    /// Non-identity fallbacks must return non-empty output for any input.
    #[test]
    fn fallbacks_are_total() {
        let samples = ["Hello", "The detective examined the evidence.", "a"];
        for key in ModeKey::ALL.iter().filter(|&&k| k != ModeKey::Original) {
            for sample in samples {
                let out = fallback(*key, sample);
                assert!(!out.is_empty(), "{key} emptied {sample:?}");
            }
        }
    }
}
