//! One side's ordered roster and its active character.

use tracing::debug;

use crate::card::CardEffect;
use crate::character::Character;
use crate::types::{CharacterId, Team};

#[derive(Clone, Debug)]
pub struct Squad {
    team: Team,
    members: Vec<Character>,
    active: Option<usize>,
}

impl Squad {
    /// Creates a squad whose first member starts active.
    pub fn new(team: Team, members: Vec<Character>) -> Self {
        let active = if members.is_empty() { None } else { Some(0) };
        Self {
            team,
            members,
            active,
        }
    }

    pub fn team(&self) -> Team {
        self.team
    }

    pub fn members(&self) -> &[Character] {
        &self.members
    }

    pub(crate) fn members_mut(&mut self) -> &mut [Character] {
        &mut self.members
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub fn contains(&self, id: CharacterId) -> bool {
        self.index_of(id).is_some()
    }

    pub fn member(&self, id: CharacterId) -> Option<&Character> {
        self.members.iter().find(|member| member.id() == id)
    }

    pub fn member_mut(&mut self, id: CharacterId) -> Option<&mut Character> {
        self.members.iter_mut().find(|member| member.id() == id)
    }

    fn index_of(&self, id: CharacterId) -> Option<usize> {
        self.members.iter().position(|member| member.id() == id)
    }

    /// Living members in roster order.
    pub fn alive_members(&self) -> impl Iterator<Item = &Character> {
        self.members.iter().filter(|member| member.is_alive())
    }

    pub fn alive_count(&self) -> usize {
        self.alive_members().count()
    }

    pub fn total_health(&self) -> u32 {
        self.alive_members().map(Character::current_health).sum()
    }

    pub fn is_squad_defeated(&self) -> bool {
        self.alive_count() == 0
    }

    // ========================================================================
    // Active character
    // ========================================================================

    /// True only while the stored active member is alive.
    pub fn has_active_character(&self) -> bool {
        self.active_character().is_some()
    }

    pub fn active_character(&self) -> Option<&Character> {
        self.active
            .and_then(|index| self.members.get(index))
            .filter(|member| member.is_alive())
    }

    pub fn active_character_mut(&mut self) -> Option<&mut Character> {
        self.active
            .and_then(|index| self.members.get_mut(index))
            .filter(|member| member.is_alive())
    }

    pub fn active_id(&self) -> Option<CharacterId> {
        self.active_character().map(Character::id)
    }

    /// Makes `id` active. Silently ignored for dead members and strangers.
    pub fn set_active_character(&mut self, id: CharacterId) -> bool {
        match self.index_of(id) {
            Some(index) => self.set_active_index(index),
            None => {
                debug!(
                    target: "tactics_core::squad",
                    team = %self.team,
                    character = %id,
                    "set_active ignored: not a member"
                );
                false
            }
        }
    }

    pub fn set_active_index(&mut self, index: usize) -> bool {
        match self.members.get(index) {
            Some(member) if member.is_alive() => {
                self.active = Some(index);
                true
            }
            _ => {
                debug!(
                    target: "tactics_core::squad",
                    team = %self.team,
                    index,
                    "set_active ignored: missing or dead member"
                );
                false
            }
        }
    }

    pub fn clear_active_character(&mut self) {
        self.active = None;
    }

    /// Promotes the first living member; `None` once the squad is wiped out.
    pub fn promote_next_alive(&mut self) -> Option<CharacterId> {
        let index = self.members.iter().position(Character::is_alive);
        self.active = index;
        index.map(|index| self.members[index].id())
    }

    // ========================================================================
    // Effects and lifecycle
    // ========================================================================

    /// Squad-wide application: every living member receives the full bundle.
    pub fn apply_card_effect(&mut self, effect: &CardEffect) {
        for member in self.members.iter_mut().filter(|member| member.is_alive()) {
            effect.apply_to_member(member);
        }
    }

    /// Resets every member and makes the first one active again.
    pub fn reset_state(&mut self) {
        for member in &mut self.members {
            member.reset_state();
        }
        self.active = if self.members.is_empty() { None } else { Some(0) };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::test_support::{character, with_stats};

    fn squad() -> Squad {
        Squad::new(
            Team::Player,
            vec![
                character(1, Team::Player),
                with_stats(2, Team::Player, 80, 20, 5),
                character(3, Team::Player),
            ],
        )
    }

    #[test]
    fn first_member_starts_active() {
        let squad = squad();
        assert_eq!(squad.active_id(), Some(CharacterId(1)));
        assert_eq!(squad.total_health(), 280);
        assert_eq!(squad.member_count(), 3);
    }

    #[test]
    fn set_active_ignores_dead_and_unknown() {
        let mut squad = squad();
        squad.member_mut(CharacterId(2)).unwrap().take_damage(500);

        assert!(!squad.set_active_character(CharacterId(2)));
        assert!(!squad.set_active_character(CharacterId(99)));
        assert!(!squad.set_active_index(7));
        assert_eq!(squad.active_id(), Some(CharacterId(1)));

        assert!(squad.set_active_character(CharacterId(3)));
        assert_eq!(squad.active_id(), Some(CharacterId(3)));
    }

    #[test]
    fn dead_active_reports_no_active_character() {
        let mut squad = squad();
        squad.active_character_mut().unwrap().take_damage(500);
        assert!(!squad.has_active_character());

        assert_eq!(squad.promote_next_alive(), Some(CharacterId(2)));
        assert!(squad.has_active_character());
    }

    #[test]
    fn alive_members_keep_order_and_define_defeat() {
        let mut squad = squad();
        squad.member_mut(CharacterId(1)).unwrap().take_damage(500);
        let alive: Vec<_> = squad.alive_members().map(Character::id).collect();
        assert_eq!(alive, vec![CharacterId(2), CharacterId(3)]);

        for id in [2, 3] {
            squad.member_mut(CharacterId(id)).unwrap().take_damage(500);
        }
        assert!(squad.is_squad_defeated());
        assert_eq!(squad.promote_next_alive(), None);
    }

    #[test]
    fn squad_effect_reaches_every_living_member() {
        let mut squad = squad();
        squad.member_mut(CharacterId(3)).unwrap().take_damage(500);
        squad.member_mut(CharacterId(1)).unwrap().take_damage(50);

        squad.apply_card_effect(&CardEffect {
            health_percentage: 10.0,
            attack: 2,
            armor: 0,
            energy: 20.0,
        });

        let first = squad.member(CharacterId(1)).unwrap();
        assert_eq!(first.current_health(), 60);
        assert_eq!(first.current_energy(), 20.0);
        assert_eq!(squad.member(CharacterId(2)).unwrap().attack_power(), 32);
        assert_eq!(squad.member(CharacterId(3)).unwrap().current_energy(), 0.0);
    }

    #[test]
    fn reset_revives_everyone() {
        let mut squad = squad();
        for id in [1, 2, 3] {
            squad.member_mut(CharacterId(id)).unwrap().take_damage(500);
        }
        squad.clear_active_character();
        squad.reset_state();

        assert_eq!(squad.alive_count(), 3);
        assert_eq!(squad.active_id(), Some(CharacterId(1)));
    }
}
