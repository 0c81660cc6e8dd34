//! Effect definitions.
//!
//! An effect is a `(trigger, kind, value, condition)` record attached to a
//! card template, either in its main effect list or its inherited list
//! (which only applies while the card is buried in someone's stack).
//!
//! ## Security-only kinds
//!
//! `PlayCardWithoutMemory`, `ExtraSecurityAttackPartyNextTurn`,
//! `BuffSecurityNextTurn` and `ActivateMainEffect` only apply when a
//! revealed security Option/Tamer resolves its own list on
//! `Trigger::Security`. Under any other trigger they are ignored.

use serde::{Deserialize, Serialize};

/// A named game event that activates matching effects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Trigger {
    /// Never fires. Unparseable trigger strings land here.
    None,
    OnPlay,
    WhenAttacking,
    WhenDigivolving,
    YourTurn,
    OpponentTurn,
    MainPhase,
    WhenBlocked,
    Security,
}

impl Trigger {
    /// Parse a catalog trigger string.
    ///
    /// ```
    /// use digi_tcg::effects::Trigger;
    ///
    /// assert_eq!(Trigger::parse(Some("when_attacking")), Trigger::WhenAttacking);
    /// assert_eq!(Trigger::parse(Some("main")), Trigger::MainPhase);
    /// assert_eq!(Trigger::parse(Some("bogus")), Trigger::None);
    /// assert_eq!(Trigger::parse(None), Trigger::None);
    /// ```
    #[must_use]
    pub fn parse(text: Option<&str>) -> Self {
        match text {
            Some("on_play") => Trigger::OnPlay,
            Some("when_attacking") => Trigger::WhenAttacking,
            Some("when_digivolving") => Trigger::WhenDigivolving,
            Some("your_turn") => Trigger::YourTurn,
            Some("opponent_turn") => Trigger::OpponentTurn,
            Some("main") => Trigger::MainPhase,
            Some("when_blocked") => Trigger::WhenBlocked,
            Some("security") => Trigger::Security,
            _ => Trigger::None,
        }
    }
}

/// What an effect does when it fires.
///
/// `value` is called `v` and `condition` is called `c` below.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectKind {
    /// `source.dp_buff += v`.
    ModifyDp,
    /// `+v` DP to one random ally in the battle area, or to the source if none.
    ModifyAllyDp,
    /// `+v` DP to every battle-area ally and the source.
    ModifyPartyDp,
    /// `+v` DP to the source if its stack holds more than `c` cards.
    ModifyDpChildCount,
    /// Shift memory `v` toward the source's owner.
    GainMemory,
    /// Shift memory `v` away from the source's owner.
    LoseMemory,
    /// `source.security_attack_count += v`.
    ExtraSecurityAttack,
    /// `source.security_attack_count += (stack_len / c) * v`.
    IncrementSecurityBasedOnChildren,
    /// Destroy one random opposing battle-area stack.
    DeleteTargetOpponent,
    /// Destroy up to `c` opposing battle-area stacks with DP `<= v`.
    DeleteOpponentDpBelowThreshold,
    /// Owner's security buff `+= v`.
    BuffSecurityDp,
    /// Passive flag set at card setup. Never resolves through dispatch.
    Blocker,
    /// Security-only: put the revealed card into its owner's tamer area.
    PlayCardWithoutMemory,
    /// Security-only: `+v` security attacks for the owner's party next turn.
    ExtraSecurityAttackPartyNextTurn,
    /// Security-only: owner's security buff `+= v`.
    BuffSecurityNextTurn,
    /// Security-only: resolve the card's `MainPhase` effects.
    ActivateMainEffect,
    /// A kind the catalog named but the engine does not know.
    Unknown(String),
}

impl EffectKind {
    /// Parse a catalog effect type, with the optional keyword of keyword entries.
    ///
    /// ```
    /// use digi_tcg::effects::EffectKind;
    ///
    /// assert_eq!(EffectKind::parse("modify_dp", None), EffectKind::ModifyDp);
    /// assert_eq!(EffectKind::parse("keyword", Some("Blocker")), EffectKind::Blocker);
    /// assert_eq!(
    ///     EffectKind::parse("keyword", Some("Security Attack +1")),
    ///     EffectKind::ExtraSecurityAttack,
    /// );
    /// assert_eq!(EffectKind::parse("fly", None), EffectKind::Unknown("fly".into()));
    /// ```
    #[must_use]
    pub fn parse(kind: &str, keyword: Option<&str>) -> Self {
        match (kind, keyword) {
            ("keyword", Some("Blocker")) => return EffectKind::Blocker,
            ("keyword", Some("Security Attack +1")) => return EffectKind::ExtraSecurityAttack,
            _ => {}
        }

        match kind {
            "modify_dp" => EffectKind::ModifyDp,
            "modify_ally_dp" => EffectKind::ModifyAllyDp,
            "modify_party_dp" => EffectKind::ModifyPartyDp,
            "modify_dp_child_count" => EffectKind::ModifyDpChildCount,
            "gain_memory" => EffectKind::GainMemory,
            "lose_memory" => EffectKind::LoseMemory,
            "extra_security_attack" => EffectKind::ExtraSecurityAttack,
            "increment_security_based_on_children" => EffectKind::IncrementSecurityBasedOnChildren,
            "delete_target_opponent" => EffectKind::DeleteTargetOpponent,
            "delete_opponent_dp_below_threshold" => EffectKind::DeleteOpponentDpBelowThreshold,
            "buff_security_dp" => EffectKind::BuffSecurityDp,
            "play_card_without_memory" => EffectKind::PlayCardWithoutMemory,
            "extra_security_attack_party_next_turn" => EffectKind::ExtraSecurityAttackPartyNextTurn,
            "buff_security_next_turn" => EffectKind::BuffSecurityNextTurn,
            "activate_main_effect" => EffectKind::ActivateMainEffect,
            other => EffectKind::Unknown(other.to_string()),
        }
    }

    /// Whether this kind only applies on `Trigger::Security`.
    #[must_use]
    pub fn is_security_only(&self) -> bool {
        matches!(
            self,
            EffectKind::PlayCardWithoutMemory
                | EffectKind::ExtraSecurityAttackPartyNextTurn
                | EffectKind::BuffSecurityNextTurn
                | EffectKind::ActivateMainEffect
        )
    }
}

/// One effect on a card.
///
/// ```
/// use digi_tcg::effects::{EffectDef, EffectKind, Trigger};
///
/// let effect = EffectDef::new(Trigger::YourTurn, EffectKind::ModifyDpChildCount, 2000)
///     .with_condition(3);
///
/// assert!(effect.fires_on(Trigger::YourTurn));
/// assert_eq!(effect.condition, 3);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EffectDef {
    /// When the effect fires.
    pub trigger: Trigger,
    /// What it does.
    pub kind: EffectKind,
    /// Magnitude (`v`).
    pub value: i32,
    /// Kind-specific condition (`c`). Zero when unused.
    #[serde(default)]
    pub condition: i32,
}

impl EffectDef {
    /// Create an effect with no condition.
    #[must_use]
    pub fn new(trigger: Trigger, kind: EffectKind, value: i32) -> Self {
        Self {
            trigger,
            kind,
            value,
            condition: 0,
        }
    }

    /// Set the condition value (builder pattern).
    #[must_use]
    pub fn with_condition(mut self, condition: i32) -> Self {
        self.condition = condition;
        self
    }

    /// The passive blocker keyword.
    #[must_use]
    pub fn blocker() -> Self {
        Self::new(Trigger::None, EffectKind::Blocker, 0)
    }

    /// Does this effect fire on `trigger`?
    #[must_use]
    pub fn fires_on(&self, trigger: Trigger) -> bool {
        trigger != Trigger::None && self.trigger == trigger
    }
}
