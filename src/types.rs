//! Core vocabulary types: identifiers, words, categories and quiz direction.

use std::fmt;

use serde::{Deserialize, Serialize};

// ==================== Identifiers ====================

/// Unique identifier of a bot user (the chat peer).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier of a vocabulary word.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct WordId(pub i64);

impl fmt::Display for WordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ==================== Vocabulary ====================

/// Thematic category a word belongs to. Distractors are drawn from the same
/// category first, so options stay plausible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Family,
    Body,
    Colors,
    Food,
    Animals,
    Home,
    Objects,
    People,
    Adjectives,
    Verbs,
    Particles,
}

impl Category {
    /// All categories, in display order.
    pub const ALL: [Category; 11] = [
        Category::Family,
        Category::Body,
        Category::Colors,
        Category::Food,
        Category::Animals,
        Category::Home,
        Category::Objects,
        Category::People,
        Category::Adjectives,
        Category::Verbs,
        Category::Particles,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Family => "family",
            Category::Body => "body",
            Category::Colors => "colors",
            Category::Food => "food",
            Category::Animals => "animals",
            Category::Home => "home",
            Category::Objects => "objects",
            Category::People => "people",
            Category::Adjectives => "adjectives",
            Category::Verbs => "verbs",
            Category::Particles => "particles",
        }
    }

    /// Parse from the storage form; `None` for unknown names.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "family" => Some(Category::Family),
            "body" => Some(Category::Body),
            "colors" => Some(Category::Colors),
            "food" => Some(Category::Food),
            "animals" => Some(Category::Animals),
            "home" => Some(Category::Home),
            "objects" => Some(Category::Objects),
            "people" => Some(Category::People),
            "adjectives" => Some(Category::Adjectives),
            "verbs" => Some(Category::Verbs),
            "particles" => Some(Category::Particles),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which language a quiz asks the answer in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Prompt shows the English side, options are Dutch.
    EnglishToDutch,
    /// Prompt shows the Dutch side, options are English.
    DutchToEnglish,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::EnglishToDutch => "english_to_dutch",
            Direction::DutchToEnglish => "dutch_to_english",
        }
    }

    /// The opposite direction.
    pub fn flipped(self) -> Self {
        match self {
            Direction::EnglishToDutch => Direction::DutchToEnglish,
            Direction::DutchToEnglish => Direction::EnglishToDutch,
        }
    }
}

/// A vocabulary entry: an English/Dutch translation pair plus its category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Word {
    pub id: WordId,
    pub english: String,
    pub dutch: String,
    pub category: Category,
}

impl Word {
    pub fn new(
        id: WordId,
        english: impl Into<String>,
        dutch: impl Into<String>,
        category: Category,
    ) -> Self {
        Self {
            id,
            english: english.into(),
            dutch: dutch.into(),
            category,
        }
    }

    /// The side shown to the user as the question.
    pub fn prompt_for(&self, direction: Direction) -> &str {
        match direction {
            Direction::EnglishToDutch => &self.english,
            Direction::DutchToEnglish => &self.dutch,
        }
    }

    /// The side the user must produce, and the text quiz options are made of.
    pub fn answer_for(&self, direction: Direction) -> &str {
        match direction {
            Direction::EnglishToDutch => &self.dutch,
            Direction::DutchToEnglish => &self.english,
        }
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_round_trips_through_parse() {
        for category in Category::ALL {
            assert_eq!(Category::parse(category.as_str()), Some(category));
        }
        assert_eq!(Category::parse("FOOD"), Some(Category::Food));
        assert_eq!(Category::parse("weather"), None);
    }

    #[test]
    fn direction_sides_are_consistent() {
        let word = Word::new(WordId(1), "dog", "hond", Category::Animals);
        assert_eq!(word.prompt_for(Direction::EnglishToDutch), "dog");
        assert_eq!(word.answer_for(Direction::EnglishToDutch), "hond");
        assert_eq!(word.prompt_for(Direction::DutchToEnglish), "hond");
        assert_eq!(word.answer_for(Direction::DutchToEnglish), "dog");
        assert_eq!(
            Direction::EnglishToDutch.flipped(),
            Direction::DutchToEnglish
        );
    }

    #[test]
    fn ids_serialize_transparently() {
        let json = serde_json::to_string(&UserId(42)).unwrap();
        assert_eq!(json, "42");
        let back: UserId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, UserId(42));
    }
}
