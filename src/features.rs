//! Lightweight linguistic features of a title.
//!
//! Features are cheap surface signals: length, punctuation, capitals,
//! numbers and membership of a few French word classes. They back the
//! recommendations shown next to a title and the batch summaries; the
//! classifier does not depend on them.

use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::{Analyzer, PipelineAnalyzer};

const POWER_WORDS: &[&str] = &[
    "secret", "révélé", "incroyable", "extraordinaire", "miracle",
    "révolutionnaire", "exclusif", "urgent", "alerte", "danger",
    "gratuit", "facile", "simple", "rapide", "immédiat",
    "nouveau", "découverte", "astuce", "méthode", "technique",
];

const EMOTIONAL_WORDS: &[&str] = &[
    "adorer", "aimer", "détester", "haïr", "peur", "joie",
    "bonheur", "tristesse", "colère", "surprise", "choc",
    "incroyable", "extraordinaire", "fantastique", "horrible",
];

const ACTION_WORDS: &[&str] = &[
    "découvrir", "apprendre", "maîtriser", "réussir", "obtenir",
    "gagner", "perdre", "économiser", "investir", "acheter",
    "vendre", "créer", "fabriquer", "construire", "détruire",
];

const URGENCY_WORDS: &[&str] = &[
    "maintenant", "immédiatement", "urgent", "vite", "rapidement",
    "aujourd'hui", "dernière", "chance", "limité", "exclusif",
];

const ACTION_VERBS: &[&str] = &[
    "découvrez", "apprenez", "essayez", "testez", "profitez",
    "économisez", "gagnez", "créez", "évitez", "arrêtez",
    "commencez", "terminez", "réussissez", "obtenez", "devenez",
];

/// Words that open a question, accent-folded.
pub const QUESTION_WORDS: &[&str] = &[
    "comment", "pourquoi", "quand", "ou", "qui", "que", "quel", "quelle", "quels",
    "quelles", "combien",
];

/// Extra urgency for phrases that carry a deadline.
const URGENCY_BONUSES: &[(&str, usize)] = &[("avant qu", 2), ("dernière chance", 3)];

/// Surface features of one title.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TitleFeatures {
    // Length
    /// Length in characters.
    pub length: usize,
    /// Whitespace-separated words.
    pub word_count: usize,
    pub avg_word_length: f32,

    // Punctuation
    pub has_question: bool,
    pub has_exclamation: bool,
    pub has_ellipsis: bool,
    pub has_colon: bool,
    pub has_quotes: bool,
    pub has_parentheses: bool,

    // Capitalization
    /// An uppercase letter after the first character.
    pub has_inner_caps: bool,
    /// Words of two or more characters written in capitals.
    pub all_caps_words: usize,

    // Numbers
    pub has_numbers: bool,
    pub number_count: usize,
    pub first_number: Option<u64>,

    // Word classes
    pub power_words: usize,
    pub emotional_words: usize,
    pub action_words: usize,
    pub urgency_words: usize,

    // Structure
    pub starts_with_number: bool,
    pub starts_with_question_word: bool,
    pub starts_with_action_verb: bool,

    // Scores
    /// Emotional words per word.
    pub emotion_score: f32,
    /// Urgency words per word, deadline phrases included.
    pub urgency_score: f32,
}

impl TitleFeatures {
    /// Numeric view of the features, in declaration order.
    pub fn numeric(&self) -> Vec<(&'static str, f64)> {
        let flag = |b: bool| if b { 1.0 } else { 0.0 };
        vec![
            ("length", self.length as f64),
            ("word_count", self.word_count as f64),
            ("avg_word_length", self.avg_word_length as f64),
            ("has_question", flag(self.has_question)),
            ("has_exclamation", flag(self.has_exclamation)),
            ("has_ellipsis", flag(self.has_ellipsis)),
            ("has_colon", flag(self.has_colon)),
            ("has_quotes", flag(self.has_quotes)),
            ("has_parentheses", flag(self.has_parentheses)),
            ("has_inner_caps", flag(self.has_inner_caps)),
            ("all_caps_words", self.all_caps_words as f64),
            ("has_numbers", flag(self.has_numbers)),
            ("number_count", self.number_count as f64),
            ("first_number", self.first_number.unwrap_or(0) as f64),
            ("power_words", self.power_words as f64),
            ("emotional_words", self.emotional_words as f64),
            ("action_words", self.action_words as f64),
            ("urgency_words", self.urgency_words as f64),
            ("starts_with_number", flag(self.starts_with_number)),
            ("starts_with_question_word", flag(self.starts_with_question_word)),
            ("starts_with_action_verb", flag(self.starts_with_action_verb)),
            ("emotion_score", self.emotion_score as f64),
            ("urgency_score", self.urgency_score as f64),
        ]
    }
}

/// Extracts [`TitleFeatures`].
#[derive(Debug, Clone)]
pub struct FeatureExtractor {
    analyzer: PipelineAnalyzer,
    power: Vec<String>,
    emotional: Vec<String>,
    action: Vec<String>,
    urgency: Vec<String>,
    bonuses: Vec<(String, usize)>,
    verb_prefixes: Vec<String>,
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FeatureExtractor {
    pub fn new() -> Self {
        let analyzer = PipelineAnalyzer::title();
        let fold_all = |words: &[&str]| -> Vec<String> {
            words.iter().map(|w| fold(&analyzer, w)).collect()
        };
        let verb_prefixes = ACTION_VERBS
            .iter()
            .map(|verb| fold(&analyzer, verb).chars().take(5).collect())
            .collect();

        Self {
            power: fold_all(POWER_WORDS),
            emotional: fold_all(EMOTIONAL_WORDS),
            action: fold_all(ACTION_WORDS),
            urgency: fold_all(URGENCY_WORDS),
            bonuses: URGENCY_BONUSES
                .iter()
                .map(|(phrase, bonus)| (fold(&analyzer, phrase), *bonus))
                .collect(),
            verb_prefixes,
            analyzer,
        }
    }

    /// Extract the features of a title.
    pub fn extract(&self, title: &str) -> TitleFeatures {
        let title = title.trim();
        let words: Vec<&str> = title.split_whitespace().collect();
        let word_count = words.len();
        let folded = fold(&self.analyzer, title);
        // Padded so that entries only match on word boundaries at their ends.
        let haystack = format!(" {folded} ");

        let numbers: Vec<&str> = title
            .split(|c: char| !c.is_ascii_digit())
            .filter(|s| !s.is_empty())
            .collect();

        let urgency_words = count_present(&haystack, &self.urgency);
        let urgency_bonus: usize = self
            .bonuses
            .iter()
            .filter(|(phrase, _)| haystack.contains(phrase.as_str()))
            .map(|(_, bonus)| bonus)
            .sum();
        let emotional_words = count_present(&haystack, &self.emotional);

        let per_word = |count: usize| {
            if word_count == 0 {
                0.0
            } else {
                count as f32 / word_count as f32
            }
        };
        let first_folded = folded.split(' ').next().unwrap_or("");

        TitleFeatures {
            length: title.chars().count(),
            word_count,
            avg_word_length: if word_count == 0 {
                0.0
            } else {
                words.iter().map(|w| w.chars().count()).sum::<usize>() as f32 / word_count as f32
            },

            has_question: title.contains('?'),
            has_exclamation: title.contains('!'),
            has_ellipsis: title.contains("...") || title.contains('…'),
            has_colon: title.contains(':'),
            has_quotes: title.contains(['«', '»', '"', '“', '”']),
            has_parentheses: title.contains(['(', ')']),

            has_inner_caps: title.chars().skip(1).any(char::is_uppercase),
            all_caps_words: words.iter().filter(|w| is_all_caps(w)).count(),

            has_numbers: !numbers.is_empty(),
            number_count: numbers.len(),
            first_number: numbers.first().and_then(|n| n.parse().ok()),

            power_words: count_present(&haystack, &self.power),
            emotional_words,
            action_words: count_present(&haystack, &self.action),
            urgency_words,

            starts_with_number: title.starts_with(|c: char| c.is_ascii_digit()),
            starts_with_question_word: QUESTION_WORDS.contains(&first_folded),
            starts_with_action_verb: !first_folded.is_empty()
                && self
                    .verb_prefixes
                    .iter()
                    .any(|prefix| first_folded.starts_with(prefix.as_str())),

            emotion_score: per_word(emotional_words),
            urgency_score: per_word(urgency_words + urgency_bonus),
        }
    }

    /// Extract the features of every title, in order.
    pub fn extract_batch<S: AsRef<str>>(&self, titles: &[S]) -> Vec<TitleFeatures> {
        titles.iter().map(|t| self.extract(t.as_ref())).collect()
    }

    /// Editorial advice for a title.
    pub fn recommendations(&self, features: &TitleFeatures) -> Vec<String> {
        let mut advice = Vec::new();

        if features.length < 50 {
            advice.push("Titre trop court - visez 60-80 caractères".to_string());
        } else if features.length > 100 {
            advice.push("Titre trop long - réduisez à 80 caractères max".to_string());
        }
        if !features.has_numbers {
            advice.push("Ajoutez des chiffres pour plus d'impact".to_string());
        }
        if features.power_words == 0 {
            advice.push("Utilisez des mots puissants (secret, révélé, incroyable...)".to_string());
        }
        if !features.has_question && !features.starts_with_question_word {
            advice.push("Considérez une formulation en question".to_string());
        }
        if features.urgency_score < 0.1 {
            advice.push("Ajoutez un sentiment d'urgence ou de rareté".to_string());
        }
        if features.emotion_score < 0.1 {
            advice.push("Renforcez l'impact émotionnel".to_string());
        }

        advice
    }
}

/// Descriptive statistics of one numeric feature over a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureStats {
    pub name: String,
    pub mean: f64,
    /// Sample standard deviation; `None` below two titles.
    pub std: Option<f64>,
    pub min: f64,
    pub max: f64,
    /// Pearson correlation with `length`; `None` when either side is constant.
    pub correlation_with_length: Option<f64>,
}

/// Statistics of every numeric feature over a batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureSummary {
    pub count: usize,
    pub features: Vec<FeatureStats>,
}

impl FeatureSummary {
    /// Summarize a batch; an empty batch has no statistics.
    pub fn compute(features: &[TitleFeatures]) -> Self {
        let Some(first) = features.first() else {
            return Self::default();
        };

        let rows: Vec<Vec<(&'static str, f64)>> =
            features.iter().map(TitleFeatures::numeric).collect();
        let lengths: Vec<f64> = features.iter().map(|f| f.length as f64).collect();

        let stats = first
            .numeric()
            .iter()
            .enumerate()
            .map(|(column, (name, _))| {
                let values: Vec<f64> = rows.iter().map(|row| row[column].1).collect();
                let mean = mean(&values);
                FeatureStats {
                    name: name.to_string(),
                    mean,
                    std: sample_variance(&values, mean).map(f64::sqrt),
                    min: values.iter().copied().fold(f64::INFINITY, f64::min),
                    max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
                    correlation_with_length: pearson(&values, &lengths),
                }
            })
            .collect();

        Self {
            count: features.len(),
            features: stats,
        }
    }

    pub fn get(&self, name: &str) -> Option<&FeatureStats> {
        self.features.iter().find(|s| s.name == name)
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn sample_variance(values: &[f64], mean: f64) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let squares: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    Some(squares / (values.len() - 1) as f64)
}

fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    if x.len() < 2 || x.len() != y.len() {
        return None;
    }
    let (mx, my) = (mean(x), mean(y));
    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (a, b) in x.iter().zip(y) {
        sxy += (a - mx) * (b - my);
        sxx += (a - mx).powi(2);
        syy += (b - my).powi(2);
    }
    if sxx == 0.0 || syy == 0.0 {
        return None;
    }
    Some((sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0))
}

/// Accent-folded lowercase words joined by single spaces.
fn fold(analyzer: &PipelineAnalyzer, text: &str) -> String {
    analyzer.terms(text).unwrap_or_default().join(" ")
}

fn count_present(haystack: &str, entries: &[String]) -> usize {
    entries
        .iter()
        .filter(|entry| !entry.is_empty() && haystack.contains(entry.as_str()))
        .count()
}

pub(crate) fn is_all_caps(word: &str) -> bool {
    word.chars().count() > 1
        && word.chars().any(char::is_alphabetic)
        && !word.chars().any(char::is_lowercase)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_features() {
        let extractor = FeatureExtractor::new();
        let features = extractor.extract("5 remèdes naturels contre le mal de dos");
        assert_eq!(features.length, 39);
        assert_eq!(features.word_count, 8);
        assert!(features.has_numbers);
        assert_eq!(features.first_number, Some(5));
        assert!(features.starts_with_number);
        assert!(!features.has_question);
        assert!(!features.has_inner_caps);
    }

    #[test]
    fn test_punctuation_and_caps() {
        let extractor = FeatureExtractor::new();
        let features = extractor.extract("ALERTE : « Le secret » des chefs (enfin) révélé... !");
        assert!(features.has_colon);
        assert!(features.has_quotes);
        assert!(features.has_parentheses);
        assert!(features.has_ellipsis);
        assert!(features.has_exclamation);
        assert!(features.has_inner_caps);
        assert_eq!(features.all_caps_words, 1);
        assert_eq!(features.power_words, 3);
    }

    #[test]
    fn test_structure_flags() {
        let extractor = FeatureExtractor::new();
        assert!(extractor.extract("Pourquoi dormir ?").starts_with_question_word);
        assert!(extractor.extract("Où partir cet été").starts_with_question_word);
        assert!(extractor.extract("Découvrez nos astuces").starts_with_action_verb);
        assert!(!extractor.extract("Des astuces").starts_with_action_verb);
    }

    #[test]
    fn test_urgency_bonus() {
        let extractor = FeatureExtractor::new();
        let features = extractor.extract("Dernière chance avant qu'il soit trop tard");
        assert_eq!(features.urgency_words, 2);
        assert_eq!(features.word_count, 7);
        assert!((features.urgency_score - 7.0 / 7.0).abs() < 1e-6);
    }

    #[test]
    fn test_empty_title() {
        let extractor = FeatureExtractor::new();
        let features = extractor.extract("   ");
        assert_eq!(features, TitleFeatures::default());
    }

    #[test]
    fn test_recommendations() {
        let extractor = FeatureExtractor::new();
        let advice = extractor.recommendations(&extractor.extract("Un titre court"));
        assert_eq!(advice.len(), 6);
        assert!(advice[0].starts_with("Titre trop court"));

        let advice = extractor.recommendations(&extractor.extract(
            "Pourquoi ce secret incroyable fait peur : 3 méthodes à tester maintenant, vite",
        ));
        assert!(advice.iter().all(|a| !a.contains("chiffres")));
        assert!(advice.iter().all(|a| !a.contains("question")));
        assert!(advice.iter().all(|a| !a.contains("émotionnel")));
    }

    #[test]
    fn test_summary() {
        let extractor = FeatureExtractor::new();
        let features = extractor.extract_batch(&["1 an", "Deux mots ici"]);
        let summary = FeatureSummary::compute(&features);
        assert_eq!(summary.count, 2);
        let words = summary.get("word_count").unwrap();
        assert_eq!(words.min, 2.0);
        assert_eq!(words.max, 3.0);
        assert_eq!(words.mean, 2.5);
        assert!(FeatureSummary::compute(&[]).features.is_empty());
    }

    #[test]
    fn test_summary_spread_and_correlation() {
        let features: Vec<TitleFeatures> = [(10, 2, 5), (20, 4, 1), (30, 6, 3)]
            .into_iter()
            .map(|(length, word_count, power_words)| TitleFeatures {
                length,
                word_count,
                power_words,
                ..Default::default()
            })
            .collect();
        let summary = FeatureSummary::compute(&features);

        let length = summary.get("length").unwrap();
        assert_eq!(length.mean, 20.0);
        assert!((length.std.unwrap() - 10.0).abs() < 1e-9);
        assert!((length.correlation_with_length.unwrap() - 1.0).abs() < 1e-9);

        let words = summary.get("word_count").unwrap();
        assert!((words.std.unwrap() - 2.0).abs() < 1e-9);
        assert!((words.correlation_with_length.unwrap() - 1.0).abs() < 1e-9);

        // deviations (2, -2, 0) against (-10, 0, 10): r = -20 / sqrt(8 * 200)
        let power = summary.get("power_words").unwrap();
        assert!((power.correlation_with_length.unwrap() + 0.5).abs() < 1e-9);

        let question = summary.get("has_question").unwrap();
        assert_eq!(question.std, Some(0.0));
        assert_eq!(question.correlation_with_length, None);

        let single = FeatureSummary::compute(&features[..1]);
        assert_eq!(single.get("length").unwrap().std, None);
        assert_eq!(single.get("length").unwrap().correlation_with_length, None);
    }
}
