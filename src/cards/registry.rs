//! Card catalog for template lookup.
//!
//! The `CardCatalog` stores every card template of a match, keyed by the
//! integer catalog id. It is populated once, either by registering templates
//! directly or by parsing a master-deck JSON file, and is read-only after.

use rustc_hash::FxHashMap;
use serde::Deserialize;

use super::definition::{CardId, CardTemplate, CardType};
use crate::core::error::CatalogError;
use crate::effects::{EffectDef, EffectKind, Trigger};

/// Catalog of card templates.
///
/// ## Example
///
/// ```
/// use digi_tcg::cards::{CardCatalog, CardId};
///
/// let catalog = CardCatalog::from_json(r#"[
///     {"id": 1, "name": "Koromon", "card_type": "Digi-Egg", "level": 2, "color": "Red"},
///     {"id": 2, "name": "Agumon", "card_type": "Digimon", "level": 3, "color": "Red",
///      "dp": 2000, "play_cost": 3, "digivolve_costs": [{"color": "Red", "cost": 0}]}
/// ]"#).unwrap();
///
/// let agumon = catalog.get(CardId::new(2)).unwrap();
/// assert_eq!(agumon.dp, Some(2000));
/// assert_eq!(agumon.digivolve_cost_from("Red"), Some(0));
/// assert_eq!(catalog.egg_ids(), vec![CardId::new(1)]);
/// ```
#[derive(Clone, Debug, Default)]
pub struct CardCatalog {
    cards: FxHashMap<CardId, CardTemplate>,
}

impl CardCatalog {
    /// Create a new empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a template.
    pub fn register(&mut self, card: CardTemplate) -> Result<(), CatalogError> {
        if self.cards.contains_key(&card.id) {
            return Err(CatalogError::DuplicateId(card.id));
        }
        self.cards.insert(card.id, card);
        Ok(())
    }

    /// Build a catalog from templates.
    pub fn from_templates(cards: impl IntoIterator<Item = CardTemplate>) -> Result<Self, CatalogError> {
        let mut catalog = Self::new();
        for card in cards {
            catalog.register(card)?;
        }
        Ok(catalog)
    }

    /// Parse a master-deck JSON array.
    pub fn from_json(text: &str) -> Result<Self, CatalogError> {
        let records: Vec<RawCard> = serde_json::from_str(text)?;
        let mut catalog = Self::new();
        for record in records {
            catalog.register(record.into_template()?)?;
        }
        tracing::debug!(cards = catalog.len(), "card catalog loaded");
        Ok(catalog)
    }

    /// Get a template by id.
    #[must_use]
    pub fn get(&self, id: CardId) -> Option<&CardTemplate> {
        self.cards.get(&id)
    }

    /// Check if a card id is registered.
    #[must_use]
    pub fn contains(&self, id: CardId) -> bool {
        self.cards.contains_key(&id)
    }

    /// Get the number of registered templates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Check if the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Iterate over all templates (unordered).
    pub fn iter(&self) -> impl Iterator<Item = &CardTemplate> {
        self.cards.values()
    }

    /// Ids of every non-egg template, ascending.
    #[must_use]
    pub fn main_deck_ids(&self) -> Vec<CardId> {
        self.sorted_ids(|c| c.card_type != CardType::DigiEgg)
    }

    /// Ids of every Digi-Egg template, ascending.
    #[must_use]
    pub fn egg_ids(&self) -> Vec<CardId> {
        self.sorted_ids(|c| c.card_type == CardType::DigiEgg)
    }

    fn sorted_ids(&self, predicate: impl Fn(&CardTemplate) -> bool) -> Vec<CardId> {
        let mut ids: Vec<CardId> = self.cards.values().filter(|c| predicate(c)).map(|c| c.id).collect();
        ids.sort_unstable();
        ids
    }
}

// === JSON records ===

#[derive(Deserialize)]
struct RawCard {
    id: u32,
    name: String,
    card_type: String,
    #[serde(default)]
    level: Option<u8>,
    #[serde(default)]
    color: String,
    #[serde(default)]
    form: String,
    #[serde(default)]
    attribute: String,
    #[serde(default)]
    dp: Option<i32>,
    #[serde(default)]
    play_cost: Option<i32>,
    #[serde(default)]
    digivolve_costs: Option<Vec<RawDigivolveCost>>,
    #[serde(default)]
    effect: Option<Vec<RawEffectEntry>>,
    #[serde(default)]
    inherited_effect: Option<RawInherited>,
}

#[derive(Deserialize)]
struct RawDigivolveCost {
    color: String,
    cost: i32,
}

#[derive(Deserialize)]
struct RawEffectEntry {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    trigger: Option<String>,
    #[serde(default)]
    phase: Option<String>,
    #[serde(default)]
    keyword: Option<String>,
    #[serde(default)]
    effect: Option<RawEffectBody>,
}

#[derive(Deserialize)]
struct RawInherited {
    #[serde(default)]
    phase: Option<String>,
    #[serde(default)]
    effect: Option<RawEffectBody>,
}

#[derive(Deserialize, Default)]
struct RawEffectBody {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    value: i32,
    #[serde(rename = "conditionValue", default)]
    condition_value: i32,
}

impl RawEffectEntry {
    fn into_effect(self) -> EffectDef {
        let trigger = match (self.kind.as_deref(), self.trigger.as_deref()) {
            (Some("passive"), None | Some("")) => self.phase.as_deref(),
            (_, trigger) => trigger,
        };
        let body = self.effect.unwrap_or_default();
        let name = body.kind.as_deref().or(self.kind.as_deref()).unwrap_or_default();

        EffectDef::new(
            Trigger::parse(trigger),
            EffectKind::parse(name, self.keyword.as_deref()),
            body.value,
        )
        .with_condition(body.condition_value)
    }
}

impl RawInherited {
    fn into_effect(self) -> EffectDef {
        let body = self.effect.unwrap_or_default();
        EffectDef::new(
            Trigger::parse(self.phase.as_deref()),
            EffectKind::parse(body.kind.as_deref().unwrap_or_default(), None),
            body.value,
        )
        .with_condition(body.condition_value)
    }
}

impl RawCard {
    fn into_template(self) -> Result<CardTemplate, CatalogError> {
        let id = CardId::new(self.id);
        let card_type = CardType::parse(&self.card_type).ok_or_else(|| CatalogError::UnknownCardType {
            id,
            card_type: self.card_type.clone(),
        })?;

        let mut template = CardTemplate::new(id, self.name, card_type).with_color(self.color);
        template.level = self.level;
        template.form = self.form;
        template.attribute = self.attribute;
        template.dp = self.dp;
        template.play_cost = self.play_cost.unwrap_or(0);
        for entry in self.digivolve_costs.unwrap_or_default() {
            template.digivolve_cost.insert(entry.color, entry.cost);
        }
        template.effects = self
            .effect
            .unwrap_or_default()
            .into_iter()
            .map(RawEffectEntry::into_effect)
            .collect();
        if let Some(inherited) = self.inherited_effect {
            template.inherited_effects.push(inherited.into_effect());
        }

        Ok(template)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"[
        {
            "id": 10, "name": "Greymon", "card_type": "Digimon", "level": 4,
            "color": "Red", "form": "Champion", "attribute": "Vaccine",
            "dp": 4000, "play_cost": 5,
            "digivolve_costs": [{"color": "Red", "cost": 2}],
            "image_path": "./img/greymon.png",
            "effect": [
                {"type": "keyword", "keyword": "Blocker"},
                {"type": "passive", "phase": "your_turn",
                 "effect": {"type": "modify_dp_child_count", "value": 1000, "conditionValue": 2}},
                {"type": "triggered", "trigger": "when_attacking",
                 "effect": {"type": "gain_memory", "value": 1}}
            ],
            "inherited_effect": {"phase": "when_attacking", "effect": {"type": "modify_dp", "value": 1000}}
        },
        {"id": 11, "name": "Hammer Spark", "card_type": "Option", "color": "Red", "play_cost": 0,
         "effect": [{"type": "security", "trigger": "security",
                     "effect": {"type": "activate_main_effect", "value": 0}}]}
    ]"#;

    #[test]
    fn test_parse_full_record() {
        let catalog = CardCatalog::from_json(SAMPLE).unwrap();
        let greymon = catalog.get(CardId::new(10)).unwrap();

        assert_eq!(greymon.form, "Champion");
        assert_eq!(greymon.play_cost, 5);
        assert!(greymon.has_blocker());
        assert_eq!(greymon.effects.len(), 3);
        assert_eq!(greymon.effects[1].trigger, Trigger::YourTurn);
        assert_eq!(greymon.effects[1].kind, EffectKind::ModifyDpChildCount);
        assert_eq!(greymon.effects[1].condition, 2);
        assert_eq!(greymon.effects[2].trigger, Trigger::WhenAttacking);
        assert_eq!(greymon.inherited_effects[0].kind, EffectKind::ModifyDp);
        assert_eq!(greymon.inherited_effects[0].value, 1000);
    }

    #[test]
    fn test_missing_optional_fields() {
        let catalog = CardCatalog::from_json(SAMPLE).unwrap();
        let option = catalog.get(CardId::new(11)).unwrap();

        assert_eq!(option.level, None);
        assert_eq!(option.dp, None);
        assert!(option.digivolve_cost.is_empty());
        assert!(option.inherited_effects.is_empty());
        assert_eq!(option.effects[0].kind, EffectKind::ActivateMainEffect);
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let json = r#"[{"id": 1, "name": "A", "card_type": "Tamer"},
                       {"id": 1, "name": "B", "card_type": "Tamer"}]"#;
        let err = CardCatalog::from_json(json).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateId(id) if id == CardId::new(1)));
    }

    #[test]
    fn test_unknown_card_type_rejected() {
        let json = r#"[{"id": 3, "name": "Field", "card_type": "Land"}]"#;
        let err = CardCatalog::from_json(json).unwrap_err();
        assert!(matches!(err, CatalogError::UnknownCardType { .. }));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(CardCatalog::from_json("[{"), Err(CatalogError::Json(_))));
    }

    #[test]
    fn test_deck_id_split() {
        let catalog = CardCatalog::from_templates([
            CardTemplate::egg(CardId::new(3), "Tsunomon", 2, "Blue"),
            CardTemplate::digimon(CardId::new(2), "Gabumon", 3, "Blue", 3000),
            CardTemplate::new(CardId::new(1), "Matt", CardType::Tamer),
        ])
        .unwrap();

        assert_eq!(catalog.main_deck_ids(), vec![CardId::new(1), CardId::new(2)]);
        assert_eq!(catalog.egg_ids(), vec![CardId::new(3)]);
    }
}
