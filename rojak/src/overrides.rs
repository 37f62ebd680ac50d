//! Hand-written translations that bypass the MT model
//!
//! Rules are tried strictly in order and the first one that fires wins:
//!
//! 1. idioms, matched as fixed sentence prefixes
//! 2. the "what would you like to eat" question
//! 3. self-introductions (`nama saya X`, `saya bukan X`, `saya dan X`, `saya X`)
//!
//! Self-introduction rules only apply to short sentences with no real verb
//! in them, otherwise "Saya makan nasi" would be read as an introduction.

use crate::capitalize_first;
use regex::{Captures, Regex};

/// Self-introductions longer than this go to the model
pub const DEFAULT_INTRO_WORD_LIMIT: usize = 5;

/// Verbs whose presence means the sentence is not an introduction
const REAL_VERBS: &[&str] = &[
    "makan", "minum", "pergi", "datang", "balik", "suka", "tinggal", "kerja", "belajar", "main",
    "tidur", "beli", "tengok", "buat", "nak", "mahu", "cari", "jumpa", "tunggu",
];

/// Words never captured as a name
const NOT_A_NAME: &[&str] = &[
    "makan", "minum", "pergi", "balik", "suka", "nak", "mahu", "hendak", "boleh", "ada", "dah",
    "sudah", "akan", "dan", "atau", "tapi", "pun", "juga", "lagi", "tak", "tidak", "bukan",
    "belum", "jangan", "ialah", "adalah", "rasa", "kata", "tahu", "ini", "itu", "sini", "situ",
    "nama", "saya", "aku",
];

/// Result of trying a rule against a sentence
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleOutcome {
    NoMatch,
    Translated(String),
}

impl RuleOutcome {
    pub fn is_match(&self) -> bool {
        matches!(self, RuleOutcome::Translated(_))
    }

    pub fn into_option(self) -> Option<String> {
        match self {
            RuleOutcome::Translated(text) => Some(text),
            RuleOutcome::NoMatch => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleFamily {
    Idiom,
    FoodOrder,
    SelfIntroduction,
}

#[derive(Debug, Clone)]
enum Action {
    Fixed(&'static str),
    Template(fn(&Captures<'_>) -> Option<String>),
}

#[derive(Debug, Clone)]
pub struct OverrideRule {
    name: &'static str,
    family: RuleFamily,
    pattern: Regex,
    action: Action,
}

impl OverrideRule {
    fn fixed(
        name: &'static str,
        family: RuleFamily,
        pattern: &str,
        translation: &'static str,
    ) -> Self {
        Self {
            name,
            family,
            pattern: Regex::new(pattern).expect("override pattern is valid"),
            action: Action::Fixed(translation),
        }
    }

    fn template(
        name: &'static str,
        family: RuleFamily,
        pattern: &str,
        render: fn(&Captures<'_>) -> Option<String>,
    ) -> Self {
        Self {
            name,
            family,
            pattern: Regex::new(pattern).expect("override pattern is valid"),
            action: Action::Template(render),
        }
    }

    pub fn name(&self) -> &str {
        self.name
    }

    pub fn family(&self) -> RuleFamily {
        self.family
    }

    pub fn apply(&self, text: &str) -> RuleOutcome {
        let Some(caps) = self.pattern.captures(text) else {
            return RuleOutcome::NoMatch;
        };

        let rendered = match &self.action {
            Action::Fixed(translation) => Some(translation.to_string()),
            Action::Template(render) => render(&caps),
        };

        rendered.map_or(RuleOutcome::NoMatch, RuleOutcome::Translated)
    }
}

fn is_name(word: &str) -> bool {
    !NOT_A_NAME.contains(&word.to_lowercase().as_str())
}

/// A bare-pronoun introduction needs a capitalized word to count as a name
fn is_proper_name(word: &str) -> bool {
    word.chars().next().is_some_and(char::is_uppercase) && is_name(word)
}

fn render_name_is(caps: &Captures<'_>) -> Option<String> {
    let words: Vec<&str> = caps[1].split_whitespace().collect();
    if !words.iter().all(|w| is_name(w)) {
        return None;
    }
    let name = words
        .iter()
        .map(|w| capitalize_first(w))
        .collect::<Vec<_>>()
        .join(" ");
    Some(format!("My name is {}", name))
}

fn render_am_not(caps: &Captures<'_>) -> Option<String> {
    is_proper_name(&caps[1]).then(|| format!("I am not {}", &caps[1]))
}

fn render_and(caps: &Captures<'_>) -> Option<String> {
    is_proper_name(&caps[1]).then(|| format!("{} and I", &caps[1]))
}

fn render_am(caps: &Captures<'_>) -> Option<String> {
    is_proper_name(&caps[1]).then(|| format!("I am {}", &caps[1]))
}

fn render_food_order(caps: &Captures<'_>) -> Option<String> {
    let verb = match caps[1].to_lowercase().as_str() {
        "makan" => "eat",
        "minum" => "drink",
        _ => "order",
    };
    Some(format!("What would you like to {}?", verb))
}

const LEAD: &str = r"(?i)^[\s\p{P}]*";
const NAME_WORD: &str = r"\p{L}[\p{L}'-]*";
const TAIL: &str = r"\s*[.!?]*\s*$";

fn default_rules() -> Vec<OverrideRule> {
    use RuleFamily::*;

    let idioms: &[(&'static str, &str, &'static str)] = &[
        (
            "lepak-mamak",
            r"jom\s+lepak\s+(?:(?:kat|di)\s+)?kedai\s+mamak\b",
            "Let's hang out at a Mamak shop!",
        ),
        (
            "jalan-cari-makan",
            r"jalan[\s-]+jalan\s+cari\s+makan\b",
            "Let's go out and look for food!",
        ),
        ("apa-khabar", r"apa\s+khabar\b", "How are you?"),
        (
            "dah-makan",
            r"(?:dah|sudah)\s+makan\s*(?:belum\b|\?)",
            "Have you eaten yet?",
        ),
        ("terima-kasih", r"terima\s+kasih\b", "Thank you!"),
        ("selamat-pagi", r"selamat\s+pagi\b", "Good morning!"),
        ("selamat-malam", r"selamat\s+malam\b", "Good night!"),
        ("selamat-datang", r"selamat\s+datang\b", "Welcome!"),
        (
            "tak-apa",
            r"(?:tak\s+apa|takpe|tak\s+pe)\b",
            "It's okay, never mind.",
        ),
        ("boleh-tahan", r"boleh\s+tahan\b", "Not bad."),
        ("banyak-cantik", r"banyak\s+cantik\b", "Yeah right, as if!"),
        ("padan-muka", r"padan\s+muka\b", "Serves you right!"),
        ("makan-angin", r"makan\s+angin\b", "Going on a holiday."),
        (
            "cakap-serupa-bikin",
            r"cakap\s+tak\s+serupa\s+bikin\b",
            "You don't practise what you preach.",
        ),
    ];

    let mut rules: Vec<OverrideRule> = idioms
        .iter()
        .map(|&(name, pattern, translation)| {
            OverrideRule::fixed(name, Idiom, &format!("{}{}", LEAD, pattern), translation)
        })
        .collect();

    rules.push(OverrideRule::template(
        "food-order",
        FoodOrder,
        &format!(
            r"{}(?:(?:awak|kau|kamu|korang|you)\s+)?(?:nak|mahu|hendak)\s+(makan|minum|order)\s+apa\b",
            LEAD
        ),
        render_food_order,
    ));

    rules.push(OverrideRule::template(
        "name-is",
        SelfIntroduction,
        &format!(
            r"{}(?:nama\s+(?:saya|aku)|my\s+name\s+is)\s+(?:ialah\s+|adalah\s+)?({w}(?:\s+{w})*){}",
            LEAD,
            TAIL,
            w = NAME_WORD
        ),
        render_name_is,
    ));
    rules.push(OverrideRule::template(
        "am-not",
        SelfIntroduction,
        &format!(
            r"{}(?:saya|aku)\s+(?:bukan|tak|tidak)\s+({}){}",
            LEAD, NAME_WORD, TAIL
        ),
        render_am_not,
    ));
    rules.push(OverrideRule::template(
        "and",
        SelfIntroduction,
        &format!(r"{}(?:saya|aku)\s+dan\s+({}){}", LEAD, NAME_WORD, TAIL),
        render_and,
    ));
    rules.push(OverrideRule::template(
        "am",
        SelfIntroduction,
        &format!(
            r"{}(?:saya|aku)\s+(?:ialah\s+|adalah\s+)?({}){}",
            LEAD, NAME_WORD, TAIL
        ),
        render_am,
    ));

    rules
}

/// The ordered override rule list
#[derive(Debug, Clone)]
pub struct OverrideRules {
    rules: Vec<OverrideRule>,
    intro_word_limit: usize,
}

impl OverrideRules {
    pub fn new() -> Self {
        Self::with_intro_word_limit(DEFAULT_INTRO_WORD_LIMIT)
    }

    pub fn with_intro_word_limit(intro_word_limit: usize) -> Self {
        Self {
            rules: default_rules(),
            intro_word_limit,
        }
    }

    pub fn rules(&self) -> &[OverrideRule] {
        &self.rules
    }

    /// Whether a sentence is short and verb-free enough to be an introduction
    ///
    /// Words are counted on `source`, the text as typed, so shorthand such as
    /// `xde` → `tak ada` does not push it over the limit. Verbs are looked for
    /// in both `source` and its `normalized` form.
    pub fn allows_introduction(&self, source: &str, normalized: &str) -> bool {
        let source_words = intro_words(source);
        if source_words.len() > self.intro_word_limit {
            return false;
        }

        let normalized_words = intro_words(normalized);
        !source_words
            .iter()
            .chain(normalized_words.iter())
            .any(|w| REAL_VERBS.contains(&w.as_str()))
    }

    /// First rule that fires on `text`, with its translation
    pub fn first_match(&self, text: &str) -> Option<(&OverrideRule, String)> {
        self.first_match_in(text, text)
    }

    /// First rule that fires on `normalized`, gating introductions on `source`
    pub fn first_match_in(&self, source: &str, normalized: &str) -> Option<(&OverrideRule, String)> {
        let intro_allowed = self.allows_introduction(source, normalized);

        self.rules
            .iter()
            .filter(|rule| rule.family != RuleFamily::SelfIntroduction || intro_allowed)
            .find_map(|rule| rule.apply(normalized).into_option().map(|t| (rule, t)))
    }

    pub fn apply(&self, text: &str) -> RuleOutcome {
        self.apply_to(text, text)
    }

    /// Run the rules over `normalized`, the shorthand-expanded form of `source`
    pub fn apply_to(&self, source: &str, normalized: &str) -> RuleOutcome {
        self.first_match_in(source, normalized)
            .map_or(RuleOutcome::NoMatch, |(_, translation)| {
                RuleOutcome::Translated(translation)
            })
    }
}

/// Lowercase alphabetic projection of each whitespace-separated word
fn intro_words(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|w| {
            w.chars()
                .filter(|c| c.is_alphabetic())
                .flat_map(char::to_lowercase)
                .collect()
        })
        .collect()
}

impl Default for OverrideRules {
    fn default() -> Self {
        Self::new()
    }
}
