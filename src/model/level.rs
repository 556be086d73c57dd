use glam::Vec3;

/// One puzzle room. The list of levels is built once at startup and only
/// the `completed` flag ever changes afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Level {
    /// 1-based ordinal shown to the player.
    pub id: u32,
    pub question: String,
    /// Stored already normalized, see [`normalize_answer`].
    pub answer: String,
    pub completed: bool,
    pub theme_color: Vec3,
}

impl Level {
    pub fn new(id: u32, question: &str, answer: &str, theme_color: Vec3) -> Self {
        Self {
            id,
            question: question.to_string(),
            answer: normalize_answer(answer),
            completed: false,
            theme_color,
        }
    }

    pub fn accepts(&self, submission: &str) -> bool {
        normalize_answer(submission) == self.answer
    }

    /// Flips `completed` to true. Returns false if it already was.
    pub fn mark_completed(&mut self) -> bool {
        !std::mem::replace(&mut self.completed, true)
    }
}

/// Trim surrounding whitespace and lowercase.
pub fn normalize_answer(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// The fixed level sequence.
pub fn default_levels() -> Vec<Level> {
    vec![
        Level::new(1, "What is 5 + 7?", "12", Vec3::new(0.8, 0.8, 0.9)),
        Level::new(
            2,
            "Who lives in the sea and is loved by people?",
            "spongebob squarepants",
            Vec3::new(0.9, 0.8, 0.8),
        ),
        Level::new(3, "Who is the best doctor ever?", "hataba", Vec3::new(0.8, 0.9, 0.8)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization_trims_and_lowercases() {
        assert_eq!(normalize_answer("  SpongeBob Squarepants  "), "spongebob squarepants");
        assert_eq!(normalize_answer("\t12\n"), "12");
    }

    #[test]
    fn normalization_is_idempotent() {
        for raw in ["  SpongeBob Squarepants  ", "HATABA", " 12 ", "", "   "] {
            let once = normalize_answer(raw);
            assert_eq!(normalize_answer(&once), once);
        }
    }

    #[test]
    fn second_level_accepts_mixed_case_answer() {
        let levels = default_levels();
        assert!(levels[1].accepts("  SpongeBob Squarepants  "));
        assert!(!levels[1].accepts("patrick"));
    }

    #[test]
    fn inner_whitespace_is_significant() {
        let levels = default_levels();
        assert!(!levels[1].accepts("spongebob  squarepants"));
    }

    #[test]
    fn completion_flips_once() {
        let mut level = default_levels().remove(0);
        assert!(level.mark_completed());
        assert!(!level.mark_completed());
        assert!(level.completed);
    }

    #[test]
    fn levels_are_numbered_from_one() {
        let ids: Vec<u32> = default_levels().iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }
}
