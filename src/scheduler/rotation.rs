use super::types::{RotationCarry, SundayRotation};
use crate::model::{Employee, SundayPattern};

/// Positions simulées pour équilibrer les phases (ppcm des cycles 1x1 et 2x2).
const CYCLE: usize = 4;

impl SundayRotation {
    /// État au `phase`-ième pas d'un cycle `NxN` ; `None` pour `0x0`.
    pub fn from_phase(pattern: SundayPattern, phase: usize) -> Option<Self> {
        let block = pattern.block_len();
        if block == 0 {
            return None;
        }
        let n = usize::from(block);
        let pos = phase % (2 * n);
        let (working, remaining) = if pos < n {
            (true, n - pos)
        } else {
            (false, 2 * n - pos)
        };
        Some(Self {
            block,
            working,
            remaining: remaining as u8,
        })
    }

    pub fn is_working(&self) -> bool {
        self.working
    }

    /// Passe à l'occurrence suivante ; bascule de bloc quand le courant est épuisé.
    pub fn advance(&mut self) {
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.working = !self.working;
            self.remaining = self.block;
        }
    }

    fn matches(&self, pattern: SundayPattern) -> bool {
        self.block == pattern.block_len() && self.remaining >= 1 && self.remaining <= self.block
    }

    fn coverage(mut self) -> [bool; CYCLE] {
        let mut out = [false; CYCLE];
        for slot in out.iter_mut() {
            *slot = self.working;
            self.advance();
        }
        out
    }
}

/// États initiaux, un par collaborateur éligible (même ordre que `staff`).
///
/// Un état hérité compatible est repris tel quel ; sinon la phase est choisie
/// pour couvrir au mieux le quota sur un cycle, puis pour charger le moins
/// possible les occurrences déjà couvertes.
pub(super) fn seed(
    staff: &[&Employee],
    quota: u32,
    carry_over: &[RotationCarry],
) -> Vec<Option<SundayRotation>> {
    let mut states: Vec<Option<SundayRotation>> = vec![None; staff.len()];
    let mut covered = [0u32; CYCLE];

    for (idx, employee) in staff.iter().enumerate() {
        if !employee.eligible_for_sundays() {
            continue;
        }
        let inherited = carry_over
            .iter()
            .find(|c| c.employee == employee.id)
            .map(|c| c.rotation)
            .filter(|r| r.matches(employee.sunday_pattern));
        if let Some(rotation) = inherited {
            add(&mut covered, rotation);
            states[idx] = Some(rotation);
        }
    }

    for (idx, employee) in staff.iter().enumerate() {
        if !employee.eligible_for_sundays() || states[idx].is_some() {
            continue;
        }
        let cycle = 2 * usize::from(employee.sunday_pattern.block_len());
        let best = (0..cycle)
            .filter_map(|phase| SundayRotation::from_phase(employee.sunday_pattern, phase))
            .min_by_key(|candidate| {
                let slots = candidate.coverage();
                let deficit: u32 = (0..CYCLE)
                    .filter(|&s| slots[s])
                    .map(|s| quota.saturating_sub(covered[s]))
                    .sum();
                let load: u32 = (0..CYCLE).filter(|&s| slots[s]).map(|s| covered[s]).sum();
                (std::cmp::Reverse(deficit), load)
            });
        if let Some(rotation) = best {
            add(&mut covered, rotation);
            states[idx] = Some(rotation);
        }
    }

    states
}

fn add(covered: &mut [u32; CYCLE], rotation: SundayRotation) {
    for (slot, working) in covered.iter_mut().zip(rotation.coverage()) {
        if working {
            *slot += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Role;

    fn stocker(name: &str, pattern: SundayPattern) -> Employee {
        Employee::new(name, Role::Stocker).with_sundays(pattern)
    }

    #[test]
    fn two_by_two_alternates_in_blocks() {
        let mut r = SundayRotation::from_phase(SundayPattern::TwoByTwo, 0).unwrap();
        let mut seen = Vec::new();
        for _ in 0..8 {
            seen.push(r.is_working());
            r.advance();
        }
        assert_eq!(seen, [true, true, false, false, true, true, false, false]);
    }

    #[test]
    fn one_by_one_alternates_every_time() {
        let mut r = SundayRotation::from_phase(SundayPattern::OneByOne, 1).unwrap();
        let mut seen = Vec::new();
        for _ in 0..4 {
            seen.push(r.is_working());
            r.advance();
        }
        assert_eq!(seen, [false, true, false, true]);
    }

    #[test]
    fn never_pattern_has_no_rotation() {
        assert!(SundayRotation::from_phase(SundayPattern::Never, 0).is_none());
    }

    #[test]
    fn phases_are_staggered_to_cover_quota() {
        let team: Vec<Employee> = ["Ana", "Bia", "Caio", "Davi"]
            .into_iter()
            .map(|n| stocker(n, SundayPattern::TwoByTwo))
            .collect();
        let staff: Vec<&Employee> = team.iter().collect();
        let mut states: Vec<SundayRotation> =
            seed(&staff, 2, &[]).into_iter().map(Option::unwrap).collect();
        for _ in 0..CYCLE {
            let working = states.iter().filter(|s| s.is_working()).count();
            assert_eq!(working, 2);
            states.iter_mut().for_each(SundayRotation::advance);
        }
    }

    #[test]
    fn compatible_carry_over_is_kept() {
        let ana = stocker("Ana", SundayPattern::TwoByTwo);
        let carried = SundayRotation {
            block: 2,
            working: false,
            remaining: 1,
        };
        let carry = [RotationCarry {
            employee: ana.id.clone(),
            rotation: carried,
        }];
        let states = seed(&[&ana], 1, &carry);
        assert_eq!(states[0], Some(carried));

        let wrong = [RotationCarry {
            employee: ana.id.clone(),
            rotation: SundayRotation {
                block: 1,
                working: false,
                remaining: 1,
            },
        }];
        let states = seed(&[&ana], 1, &wrong);
        assert_eq!(states[0].map(|s| s.block), Some(2));
    }
}
