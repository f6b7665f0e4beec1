use serde::{Deserialize, Serialize};

/// Source cap on slip size.
pub const MAX_SLIP_LEGS: usize = 20;

/// One selected leg, keyed by (game id, bet label) so that several markets
/// on the same game can coexist on the slip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlipEntry {
    pub game_id: String,
    pub matchup: String,
    pub label: String,
    pub odds: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Added,
    Removed,
    Full,
}

/// The bet slip is plain state owned by the caller; all math over it is
/// done by the pure engine functions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BetSlip {
    entries: Vec<SlipEntry>,
}

impl BetSlip {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[SlipEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Select or deselect a leg. Selecting an already-present (game, label)
    /// pair removes it; a different label on the same game is a separate
    /// leg and coexists.
    pub fn toggle(&mut self, entry: SlipEntry) -> ToggleOutcome {
        if let Some(pos) = self
            .entries
            .iter()
            .position(|e| e.game_id == entry.game_id && e.label == entry.label)
        {
            self.entries.remove(pos);
            return ToggleOutcome::Removed;
        }
        if self.entries.len() >= MAX_SLIP_LEGS {
            return ToggleOutcome::Full;
        }
        self.entries.push(entry);
        ToggleOutcome::Added
    }

    pub fn remove(&mut self, game_id: &str, label: &str) -> bool {
        let before = self.entries.len();
        self.entries
            .retain(|e| !(e.game_id == game_id && e.label == label));
        self.entries.len() != before
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Mean decimal odds across the slip, 0.0 when empty.
    pub fn average_odds(&self) -> f64 {
        if self.entries.is_empty() {
            return 0.0;
        }
        let total: f64 = self.entries.iter().map(|e| e.odds).sum();
        total / self.entries.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(game_id: &str, label: &str, odds: f64) -> SlipEntry {
        SlipEntry {
            game_id: game_id.to_string(),
            matchup: "Away @ Home".to_string(),
            label: label.to_string(),
            odds,
        }
    }

    #[test]
    fn test_toggle_add_and_remove() {
        let mut slip = BetSlip::new();
        assert_eq!(slip.toggle(entry("g1", "Away ML", 2.0)), ToggleOutcome::Added);
        assert_eq!(slip.toggle(entry("g1", "Away ML", 2.0)), ToggleOutcome::Removed);
        assert!(slip.is_empty());
    }

    #[test]
    fn test_multiple_markets_on_one_game() {
        let mut slip = BetSlip::new();
        slip.toggle(entry("g1", "Away ML", 2.0));
        slip.toggle(entry("g1", "Over 48.5", 1.87));
        assert_eq!(slip.len(), 2);
    }

    #[test]
    fn test_capacity() {
        let mut slip = BetSlip::new();
        for i in 0..MAX_SLIP_LEGS {
            assert_eq!(
                slip.toggle(entry(&format!("g{}", i), "Home ML", 1.91)),
                ToggleOutcome::Added
            );
        }
        assert_eq!(
            slip.toggle(entry("extra", "Home ML", 1.91)),
            ToggleOutcome::Full
        );
        assert_eq!(slip.len(), MAX_SLIP_LEGS);
    }

    #[test]
    fn test_average_odds() {
        let mut slip = BetSlip::new();
        assert_eq!(slip.average_odds(), 0.0);
        slip.toggle(entry("g1", "Away ML", 2.0));
        slip.toggle(entry("g2", "Home ML", 1.5));
        assert!((slip.average_odds() - 1.75).abs() < 1e-9);
    }

    #[test]
    fn test_remove_by_key() {
        let mut slip = BetSlip::new();
        slip.toggle(entry("g1", "Away ML", 2.0));
        assert!(slip.remove("g1", "Away ML"));
        assert!(!slip.remove("g1", "Away ML"));
    }
}
