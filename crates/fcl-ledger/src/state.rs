use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use fcl_types::{Amount, Identity, LedgerTime};

use crate::error::LedgerError;
use crate::records::{Challenge, Member, WorkoutSession};

/// Authoritative ledger state.
///
/// Every `apply_*` method checks its structural preconditions first and
/// only then writes, so a returned error always leaves the state untouched.
/// Role and field checks are the gate's job and are not repeated here.
#[derive(Clone, Debug, Serialize)]
pub struct LedgerState {
    pub(crate) owner: Identity,
    pub(crate) members: BTreeMap<Identity, Member>,
    pub(crate) sessions: BTreeMap<Identity, Vec<WorkoutSession>>,
    pub(crate) challenges: Vec<Challenge>,
    pub(crate) total_members: u64,
    pub(crate) escrow_balance: Amount,
    pub(crate) total_deposited: Amount,
    pub(crate) total_withdrawn: Amount,
}

impl LedgerState {
    /// Fresh state owned by `owner`.
    pub fn new(owner: Identity) -> Self {
        Self {
            owner,
            members: BTreeMap::new(),
            sessions: BTreeMap::new(),
            challenges: Vec::new(),
            total_members: 0,
            escrow_balance: Amount::ZERO,
            total_deposited: Amount::ZERO,
            total_withdrawn: Amount::ZERO,
        }
    }

    // ---- reads ----

    pub fn owner(&self) -> &Identity {
        &self.owner
    }

    pub fn member(&self, who: &Identity) -> Option<&Member> {
        self.members.get(who)
    }

    pub fn members(&self) -> impl Iterator<Item = (&Identity, &Member)> {
        self.members.iter()
    }

    pub fn sessions(&self, who: &Identity) -> &[WorkoutSession] {
        self.sessions.get(who).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn challenge(&self, id: u64) -> Option<&Challenge> {
        usize::try_from(id).ok().and_then(|i| self.challenges.get(i))
    }

    pub fn challenges(&self) -> &[Challenge] {
        &self.challenges
    }

    pub fn total_members(&self) -> u64 {
        self.total_members
    }

    pub fn challenge_count(&self) -> u64 {
        self.challenges.len() as u64
    }

    pub fn escrow_balance(&self) -> Amount {
        self.escrow_balance
    }

    pub fn total_deposited(&self) -> Amount {
        self.total_deposited
    }

    pub fn total_withdrawn(&self) -> Amount {
        self.total_withdrawn
    }

    /// BLAKE3 digest of the canonical JSON encoding of the whole state.
    ///
    /// All collections are ordered, so equal states always hash equally.
    pub fn digest(&self) -> Result<[u8; 32], LedgerError> {
        let encoded =
            serde_json::to_vec(self).map_err(|e| LedgerError::Serialization(e.to_string()))?;
        let mut hasher = blake3::Hasher::new();
        hasher.update(b"fcl-state-v1:");
        hasher.update(&encoded);
        Ok(*hasher.finalize().as_bytes())
    }

    pub fn digest_hex(&self) -> Result<String, LedgerError> {
        Ok(hex::encode(self.digest()?))
    }

    // ---- writes ----

    pub fn apply_register_member(
        &mut self,
        who: &Identity,
        membership_type: &str,
        now: LedgerTime,
    ) -> Result<(), LedgerError> {
        if self.members.contains_key(who) {
            return Err(LedgerError::DuplicateMember(who.clone()));
        }
        self.members
            .insert(who.clone(), Member::new(membership_type, now));
        self.total_members += 1;
        Ok(())
    }

    /// Append a session and return its ordinal.
    pub fn apply_record_workout(
        &mut self,
        who: &Identity,
        calories_burned: u64,
        duration_minutes: u32,
        intensity: u32,
        now: LedgerTime,
    ) -> Result<u64, LedgerError> {
        let member = self
            .members
            .get_mut(who)
            .ok_or_else(|| LedgerError::UnknownMember(who.clone()))?;

        let ordinal = member.session_count;
        self.sessions
            .entry(who.clone())
            .or_default()
            .push(WorkoutSession {
                calories_burned,
                duration_minutes,
                intensity,
                timestamp: now,
                completed: true,
            });
        member.session_count += 1;
        Ok(ordinal)
    }

    /// Create a challenge, credit its prize to escrow, and return its id.
    pub fn apply_create_challenge(
        &mut self,
        name: &str,
        target_calories: u64,
        duration_days: u32,
        prize: Amount,
        now: LedgerTime,
    ) -> Result<u64, LedgerError> {
        let escrow = self
            .escrow_balance
            .checked_add(prize)
            .ok_or(LedgerError::EscrowOverflow)?;
        let deposited = self
            .total_deposited
            .checked_add(prize)
            .ok_or(LedgerError::EscrowOverflow)?;

        let id = self.challenge_count();
        self.challenges.push(Challenge {
            id,
            name: name.to_string(),
            target_calories,
            duration_days,
            start_timestamp: now,
            end_timestamp: now.plus_days(duration_days),
            prize_amount: prize,
            is_active: true,
            participants: BTreeSet::new(),
        });
        self.escrow_balance = escrow;
        self.total_deposited = deposited;
        Ok(id)
    }

    /// Add `who` to a challenge and return the new participant count.
    pub fn apply_join_challenge(
        &mut self,
        challenge_id: u64,
        who: &Identity,
    ) -> Result<u64, LedgerError> {
        let challenge = usize::try_from(challenge_id)
            .ok()
            .and_then(|i| self.challenges.get_mut(i))
            .ok_or(LedgerError::UnknownChallenge(challenge_id))?;
        if !challenge.participants.insert(who.clone()) {
            return Err(LedgerError::DuplicateParticipant {
                challenge_id,
                who: who.clone(),
            });
        }
        Ok(challenge.participant_count())
    }

    pub fn apply_fitness_level(&mut self, who: &Identity, level: u32) -> Result<(), LedgerError> {
        let member = self
            .members
            .get_mut(who)
            .ok_or_else(|| LedgerError::UnknownMember(who.clone()))?;
        member.fitness_level = Some(level);
        Ok(())
    }

    /// Mark `who` inactive. Returns `true` if an active record was changed;
    /// an absent record is left absent.
    pub fn apply_deactivate_member(&mut self, who: &Identity) -> bool {
        match self.members.get_mut(who) {
            Some(member) if member.is_active => {
                member.is_active = false;
                true
            }
            _ => false,
        }
    }

    /// Replace the owner and return the previous one.
    pub fn apply_change_owner(&mut self, new_owner: &Identity) -> Identity {
        std::mem::replace(&mut self.owner, new_owner.clone())
    }

    /// Release the entire escrow balance and return the amount released.
    pub fn apply_withdraw_all(&mut self) -> Result<Amount, LedgerError> {
        let released = self.escrow_balance;
        let withdrawn = self
            .total_withdrawn
            .checked_add(released)
            .ok_or(LedgerError::EscrowOverflow)?;
        self.escrow_balance = Amount::ZERO;
        self.total_withdrawn = withdrawn;
        Ok(released)
    }

    /// Prize held by challenges that are still marked active.
    pub fn active_prize_commitments(&self) -> Amount {
        self.challenges
            .iter()
            .filter(|c| c.is_active)
            .fold(Amount::ZERO, |acc, c| {
                acc.checked_add(c.prize_amount).unwrap_or(Amount::from_units(u128::MAX))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(secs: u64) -> LedgerTime {
        LedgerTime::from_secs(secs)
    }

    fn coins(s: &str) -> Amount {
        Amount::parse_coins(s).unwrap()
    }

    #[test]
    fn register_sets_defaults_and_counts() {
        let mut state = LedgerState::new(Identity::derive("owner"));
        let who = Identity::derive("m1");
        state.apply_register_member(&who, "Premium", t(10)).unwrap();

        let member = state.member(&who).unwrap();
        assert!(member.is_active);
        assert_eq!(member.join_timestamp, t(10));
        assert_eq!(member.session_count, 0);
        assert_eq!(member.fitness_level, None);
        assert_eq!(state.total_members(), 1);
    }

    #[test]
    fn duplicate_register_leaves_state_alone() {
        let mut state = LedgerState::new(Identity::derive("owner"));
        let who = Identity::derive("m1");
        state.apply_register_member(&who, "Basic", t(1)).unwrap();
        let before = state.digest().unwrap();

        let err = state.apply_register_member(&who, "Elite", t(2)).unwrap_err();
        assert_eq!(err, LedgerError::DuplicateMember(who.clone()));
        assert_eq!(state.digest().unwrap(), before);
    }

    #[test]
    fn sessions_get_contiguous_ordinals() {
        let mut state = LedgerState::new(Identity::derive("owner"));
        let who = Identity::derive("m1");
        state.apply_register_member(&who, "Basic", t(1)).unwrap();

        for expected in 0..3 {
            let ordinal = state.apply_record_workout(&who, 100, 10, 5, t(5)).unwrap();
            assert_eq!(ordinal, expected);
        }
        assert_eq!(state.member(&who).unwrap().session_count, 3);
        assert_eq!(state.sessions(&who).len(), 3);
        assert!(state.sessions(&who).iter().all(|s| s.completed));
    }

    #[test]
    fn workout_for_unknown_member_fails() {
        let mut state = LedgerState::new(Identity::derive("owner"));
        let ghost = Identity::derive("ghost");
        assert!(matches!(
            state.apply_record_workout(&ghost, 1, 1, 1, t(1)),
            Err(LedgerError::UnknownMember(_))
        ));
        assert!(state.sessions(&ghost).is_empty());
    }

    #[test]
    fn challenge_credits_escrow_and_sets_window() {
        let mut state = LedgerState::new(Identity::derive("owner"));
        let id = state
            .apply_create_challenge("30-Day", 10_000, 30, coins("0.5"), t(1_000))
            .unwrap();
        assert_eq!(id, 0);

        let challenge = state.challenge(0).unwrap();
        assert_eq!(challenge.end_timestamp, t(1_000).plus_days(30));
        assert!(challenge.is_active);
        assert_eq!(challenge.participant_count(), 0);
        assert_eq!(state.escrow_balance(), coins("0.5"));
        assert_eq!(state.total_deposited(), coins("0.5"));
    }

    #[test]
    fn escrow_overflow_is_refused_without_side_effects() {
        let mut state = LedgerState::new(Identity::derive("owner"));
        state
            .apply_create_challenge("Whale", 1, 1, Amount::from_units(u128::MAX), t(1))
            .unwrap();
        let err = state
            .apply_create_challenge("Overflow", 1, 1, Amount::from_units(1), t(2))
            .unwrap_err();
        assert_eq!(err, LedgerError::EscrowOverflow);
        assert_eq!(state.challenge_count(), 1);
    }

    #[test]
    fn join_is_unique_per_challenge() {
        let mut state = LedgerState::new(Identity::derive("owner"));
        let who = Identity::derive("m1");
        state.apply_create_challenge("C", 1, 1, Amount::ZERO, t(1)).unwrap();

        assert_eq!(state.apply_join_challenge(0, &who).unwrap(), 1);
        assert!(matches!(
            state.apply_join_challenge(0, &who),
            Err(LedgerError::DuplicateParticipant { .. })
        ));
        assert_eq!(state.challenge(0).unwrap().participant_count(), 1);
        assert_eq!(
            state.apply_join_challenge(7, &who),
            Err(LedgerError::UnknownChallenge(7))
        );
    }

    #[test]
    fn deactivate_absent_member_creates_nothing() {
        let mut state = LedgerState::new(Identity::derive("owner"));
        let ghost = Identity::derive("ghost");
        assert!(!state.apply_deactivate_member(&ghost));
        assert!(state.member(&ghost).is_none());
        assert_eq!(state.total_members(), 0);
    }

    #[test]
    fn deactivate_keeps_other_fields() {
        let mut state = LedgerState::new(Identity::derive("owner"));
        let who = Identity::derive("m1");
        state.apply_register_member(&who, "Elite", t(3)).unwrap();
        state.apply_record_workout(&who, 10, 10, 1, t(4)).unwrap();

        assert!(state.apply_deactivate_member(&who));
        assert!(!state.apply_deactivate_member(&who));
        let member = state.member(&who).unwrap();
        assert!(!member.is_active);
        assert_eq!(member.membership_type, "Elite");
        assert_eq!(member.session_count, 1);
    }

    #[test]
    fn withdraw_drains_escrow() {
        let mut state = LedgerState::new(Identity::derive("owner"));
        state.apply_create_challenge("A", 1, 1, coins("1"), t(1)).unwrap();
        state.apply_create_challenge("B", 1, 1, coins("0.25"), t(1)).unwrap();

        assert_eq!(state.apply_withdraw_all().unwrap(), coins("1.25"));
        assert!(state.escrow_balance().is_zero());
        assert_eq!(state.total_withdrawn(), coins("1.25"));
        assert_eq!(state.apply_withdraw_all().unwrap(), Amount::ZERO);
        assert_eq!(state.active_prize_commitments(), coins("1.25"));
    }

    #[test]
    fn change_owner_returns_previous() {
        let mut state = LedgerState::new(Identity::derive("owner"));
        let next = Identity::derive("next");
        let previous = state.apply_change_owner(&next);
        assert_eq!(previous, Identity::derive("owner"));
        assert_eq!(state.owner(), &next);
    }

    #[test]
    fn digest_tracks_changes() {
        let mut state = LedgerState::new(Identity::derive("owner"));
        let empty = state.digest().unwrap();
        assert_eq!(empty, LedgerState::new(Identity::derive("owner")).digest().unwrap());
        state
            .apply_register_member(&Identity::derive("m1"), "Basic", t(1))
            .unwrap();
        assert_ne!(state.digest().unwrap(), empty);
        assert_eq!(state.digest_hex().unwrap().len(), 64);
    }
}
