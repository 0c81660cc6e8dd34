//! Card templates - static card data.
//!
//! `CardTemplate` holds the immutable printed properties of a card: name,
//! type, level, color, DP, costs and effect lists. Runtime state (zone,
//! buffs, flags, stack) lives in `CardInstance`.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::effects::{EffectDef, EffectKind};

/// Template identifier, keyed by the integer id of the catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    /// Create a new card ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// The four card types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardType {
    Digimon,
    Tamer,
    Option,
    #[serde(rename = "Digi-Egg")]
    DigiEgg,
}

impl CardType {
    /// Parse the catalog spelling of a card type.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        match text {
            "Digimon" => Some(CardType::Digimon),
            "Tamer" => Some(CardType::Tamer),
            "Option" => Some(CardType::Option),
            "Digi-Egg" => Some(CardType::DigiEgg),
            _ => None,
        }
    }

    /// Option and Tamer security cards resolve effects instead of battling.
    #[must_use]
    pub const fn resolves_on_reveal(self) -> bool {
        matches!(self, CardType::Option | CardType::Tamer)
    }
}

/// Static card definition.
///
/// ## Example
///
/// ```
/// use digi_tcg::cards::{CardId, CardTemplate, CardType};
///
/// let greymon = CardTemplate::digimon(CardId::new(2), "Greymon", 4, "Red", 4000)
///     .with_play_cost(5)
///     .with_digivolve_cost("Red", 2);
///
/// assert_eq!(greymon.card_type, CardType::Digimon);
/// assert_eq!(greymon.digivolve_cost_from("Red"), Some(2));
/// assert_eq!(greymon.digivolve_cost_from("Blue"), None);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CardTemplate {
    /// Catalog id.
    pub id: CardId,

    /// Card name (for logs and display).
    pub name: String,

    /// Card type.
    pub card_type: CardType,

    /// Level; `None` for tamers and options.
    pub level: Option<u8>,

    /// Color, also the key into other cards' digivolve-cost tables.
    pub color: String,

    /// Form (Rookie, Champion, ...). Informational.
    pub form: String,

    /// Attribute (Vaccine, Virus, ...). Informational.
    pub attribute: String,

    /// Printed DP; `None` for cards without one.
    pub dp: Option<i32>,

    /// Memory paid when played from hand.
    pub play_cost: i32,

    /// Digivolve cost keyed by the color of the card being digivolved onto.
    pub digivolve_cost: FxHashMap<String, i32>,

    /// Effects while this card is the top of its stack.
    pub effects: Vec<EffectDef>,

    /// Effects granted to the top card while this card is buried in its stack.
    pub inherited_effects: Vec<EffectDef>,
}

impl CardTemplate {
    /// Create a template with no stats or effects.
    #[must_use]
    pub fn new(id: CardId, name: impl Into<String>, card_type: CardType) -> Self {
        Self {
            id,
            name: name.into(),
            card_type,
            level: None,
            color: String::new(),
            form: String::new(),
            attribute: String::new(),
            dp: None,
            play_cost: 0,
            digivolve_cost: FxHashMap::default(),
            effects: Vec::new(),
            inherited_effects: Vec::new(),
        }
    }

    /// A Digimon with level, color and DP.
    #[must_use]
    pub fn digimon(id: CardId, name: impl Into<String>, level: u8, color: impl Into<String>, dp: i32) -> Self {
        Self::new(id, name, CardType::Digimon)
            .with_level(level)
            .with_color(color)
            .with_dp(dp)
    }

    /// A Digi-Egg with level and color.
    #[must_use]
    pub fn egg(id: CardId, name: impl Into<String>, level: u8, color: impl Into<String>) -> Self {
        Self::new(id, name, CardType::DigiEgg)
            .with_level(level)
            .with_color(color)
    }

    /// Set the level (builder pattern).
    #[must_use]
    pub fn with_level(mut self, level: u8) -> Self {
        self.level = Some(level);
        self
    }

    /// Set the color (builder pattern).
    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    /// Set the printed DP (builder pattern).
    #[must_use]
    pub fn with_dp(mut self, dp: i32) -> Self {
        self.dp = Some(dp);
        self
    }

    /// Set the play cost (builder pattern).
    #[must_use]
    pub fn with_play_cost(mut self, cost: i32) -> Self {
        self.play_cost = cost;
        self
    }

    /// Add a digivolve-cost entry (builder pattern).
    #[must_use]
    pub fn with_digivolve_cost(mut self, from_color: impl Into<String>, cost: i32) -> Self {
        self.digivolve_cost.insert(from_color.into(), cost);
        self
    }

    /// Add a main effect (builder pattern).
    #[must_use]
    pub fn with_effect(mut self, effect: EffectDef) -> Self {
        self.effects.push(effect);
        self
    }

    /// Add an inherited effect (builder pattern).
    #[must_use]
    pub fn with_inherited(mut self, effect: EffectDef) -> Self {
        self.inherited_effects.push(effect);
        self
    }

    /// Cost to digivolve this card onto a card of `color`, if allowed.
    #[must_use]
    pub fn digivolve_cost_from(&self, color: &str) -> Option<i32> {
        self.digivolve_cost.get(color).copied()
    }

    /// Does the main effect list carry the Blocker keyword?
    #[must_use]
    pub fn has_blocker(&self) -> bool {
        self.effects.iter().any(|e| e.kind == EffectKind::Blocker)
    }
}
