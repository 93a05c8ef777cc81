//! Name equivalence engine.
//!
//! Decides whether two free-text person names denote the same individual,
//! tolerating nickname/given-name variation, first/last order swaps, and
//! spelling drift. Combines token-sort fuzzy similarity with a phonetic
//! fallback and a controlled nickname-expansion step.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use anyhow::Result;

use crate::phonetic::phonetic_keys;

/// Token-sort similarity score (0..=100) at or above which two names are
/// considered equivalent.
pub const DEFAULT_FUZZY_THRESHOLD: u32 = 90;

/// Supplier of equivalent given-name spellings for a lowercase given name.
///
/// A name with no known variants yields an empty set. Implementations backed
/// by remote data may fail; the matcher degrades to the literal token on
/// error, so a lookup failure reduces recall, never availability.
pub trait NameVariantSource {
    fn variants(&self, given: &str) -> Result<BTreeSet<String>>;
}

/// Variant source that knows nothing. Matching falls back to fuzzy and
/// phonetic comparison only.
#[derive(Debug, Default)]
pub struct NoVariants;

impl NameVariantSource for NoVariants {
    fn variants(&self, _given: &str) -> Result<BTreeSet<String>> {
        Ok(BTreeSet::new())
    }
}

/// Common interchangeable given-name spellings. Stored one-directional here;
/// the table symmetrizes on construction.
const GIVEN_NAME_VARIANTS: &[(&str, &[&str])] = &[
    ("abigail", &["abby", "gail"]),
    ("alexander", &["alex", "sandy"]),
    ("alexandra", &["alex", "sandra"]),
    ("andrew", &["andy", "drew"]),
    ("anthony", &["tony"]),
    ("benjamin", &["ben", "benny"]),
    ("catherine", &["cathy", "kate", "katie", "katherine", "kathryn"]),
    ("charles", &["charlie", "chuck"]),
    ("christopher", &["chris"]),
    ("daniel", &["dan", "danny"]),
    ("david", &["dave"]),
    ("deborah", &["deb", "debbie"]),
    ("edward", &["ed", "eddie", "ted"]),
    ("elizabeth", &["liz", "beth", "betsy", "eliza"]),
    ("frederick", &["fred", "freddie"]),
    ("james", &["jim", "jimmy", "jamie"]),
    ("john", &["jon", "jack", "johnny"]),
    ("jonathan", &["jon"]),
    ("joseph", &["joe", "joey"]),
    ("katherine", &["kate", "katie", "kathy", "kathryn"]),
    ("margaret", &["meg", "maggie", "peggy"]),
    ("matthew", &["matt"]),
    ("michael", &["mike"]),
    ("nicholas", &["nick"]),
    ("patricia", &["pat", "patty", "tricia"]),
    ("patrick", &["pat", "paddy"]),
    ("rebecca", &["becca", "becky"]),
    ("richard", &["rich", "rick", "dick"]),
    ("robert", &["rob", "bob", "bobby"]),
    ("samuel", &["sam", "sammy"]),
    ("stephen", &["steve", "steven"]),
    ("susan", &["sue", "susie"]),
    ("theodore", &["ted", "theo"]),
    ("thomas", &["tom", "tommy"]),
    ("william", &["will", "bill", "billy", "liam"]),
];

/// In-memory variant table, either built-in or loaded from a JSON object of
/// `{"name": ["variant", ...]}`. Lookups never fail.
#[derive(Debug, Default)]
pub struct StaticVariantTable {
    table: BTreeMap<String, BTreeSet<String>>,
}

impl StaticVariantTable {
    /// The built-in table of common English given-name variants.
    pub fn builtin() -> Self {
        let mut out = Self::default();
        for (name, variants) in GIVEN_NAME_VARIANTS {
            for variant in *variants {
                out.insert_pair(name, variant);
            }
        }
        out
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: BTreeMap<String, Vec<String>> = serde_json::from_str(json)?;
        let mut out = Self::default();
        for (name, variants) in &raw {
            for variant in variants {
                out.insert_pair(name, variant);
            }
        }
        Ok(out)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    fn insert_pair(&mut self, name: &str, variant: &str) {
        let name = normalize_name(name);
        let variant = normalize_name(variant);
        if name.is_empty() || variant.is_empty() || name == variant {
            return;
        }
        self.table.entry(name.clone()).or_default().insert(variant.clone());
        self.table.entry(variant).or_default().insert(name);
    }
}

impl NameVariantSource for StaticVariantTable {
    fn variants(&self, given: &str) -> Result<BTreeSet<String>> {
        Ok(self.table.get(given).cloned().unwrap_or_default())
    }
}

/// Strip a name down to its comparable form: fold common Latin diacritics to
/// ASCII, keep ASCII letters and whitespace only, lowercase, collapse runs of
/// whitespace.
pub fn normalize_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for ch in name.chars() {
        let ch = fold_diacritic(ch).unwrap_or(ch);
        if ch.is_ascii_alphabetic() {
            out.push(ch.to_ascii_lowercase());
        } else if ch.is_whitespace() {
            out.push(' ');
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn fold_diacritic(c: char) -> Option<char> {
    let folded = match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'À' | 'Á' | 'Â' | 'Ã' | 'Ä' | 'Å' => 'a',
        'è' | 'é' | 'ê' | 'ë' | 'È' | 'É' | 'Ê' | 'Ë' => 'e',
        'ì' | 'í' | 'î' | 'ï' | 'Ì' | 'Í' | 'Î' | 'Ï' => 'i',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ö' | 'Ø' => 'o',
        'ù' | 'ú' | 'û' | 'ü' | 'Ù' | 'Ú' | 'Û' | 'Ü' => 'u',
        'ñ' | 'Ñ' => 'n',
        'ç' | 'Ç' => 'c',
        'ý' | 'ÿ' | 'Ý' => 'y',
        'š' | 'Š' => 's',
        'ž' | 'Ž' => 'z',
        _ => return None,
    };
    Some(folded)
}

/// Decides name equivalence. Owns the fuzzy threshold and the variant source.
pub struct NameMatcher<V: NameVariantSource> {
    threshold: u32,
    variants: V,
}

impl NameMatcher<StaticVariantTable> {
    /// Matcher backed by the built-in given-name variant table.
    pub fn with_builtin_table() -> Self {
        Self::new(StaticVariantTable::builtin())
    }
}

impl<V: NameVariantSource> NameMatcher<V> {
    pub fn new(variants: V) -> Self {
        Self {
            threshold: DEFAULT_FUZZY_THRESHOLD,
            variants,
        }
    }

    pub fn with_threshold(mut self, threshold: u32) -> Self {
        self.threshold = threshold;
        self
    }

    /// True when `candidate` and `query` denote the same person.
    pub fn names_equivalent(&self, candidate: &str, query: &str) -> bool {
        let candidate = normalize_name(candidate);
        let query = normalize_name(query);
        if candidate.is_empty() || query.is_empty() {
            return false;
        }
        if candidate == query {
            return true;
        }

        let tokens: Vec<&str> = candidate.split(' ').collect();
        for (idx, token) in tokens.iter().enumerate() {
            // Initials are never expanded.
            if token.len() < 2 {
                continue;
            }
            let mut forms: BTreeSet<String> = BTreeSet::new();
            forms.insert((*token).to_string());
            match self.variants.variants(token) {
                Ok(extra) => forms.extend(extra.into_iter().map(|v| normalize_name(&v))),
                Err(err) => {
                    tracing::debug!(token = %token, error = %err, "variant lookup failed; matching on literal token");
                }
            }
            for form in &forms {
                if form.is_empty() {
                    continue;
                }
                let mut substituted = tokens.clone();
                substituted[idx] = form.as_str();
                let substituted = substituted.join(" ");
                if token_sort_ratio(&substituted, &query) >= self.threshold {
                    return true;
                }
                if phonetic_equivalent(&substituted, &query) {
                    return true;
                }
            }
        }
        false
    }
}

/// Similarity (0..=100) of two strings after sorting their tokens, from the
/// Levenshtein distance normalized by the longer length.
fn token_sort_ratio(a: &str, b: &str) -> u32 {
    let a = sort_tokens(a).join(" ");
    let b = sort_tokens(b).join(" ");
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let longest = a.len().max(b.len());
    if longest == 0 {
        return 100;
    }
    let distance = levenshtein(&a, &b).min(longest);
    ((longest - distance) * 100 / longest) as u32
}

/// Phonetic comparison over sorted-and-concatenated tokens, insensitive to
/// first/last-name order swaps. Equivalent when either side's primary key
/// equals the other side's primary or secondary key.
fn phonetic_equivalent(a: &str, b: &str) -> bool {
    let a = sort_tokens(a).concat();
    let b = sort_tokens(b).concat();
    let (a_primary, a_secondary) = phonetic_keys(&a);
    let (b_primary, b_secondary) = phonetic_keys(&b);
    if a_primary.is_empty() || b_primary.is_empty() {
        return false;
    }
    a_primary == b_primary || a_primary == b_secondary || b_primary == a_secondary
}

fn sort_tokens(s: &str) -> Vec<&str> {
    let mut tokens: Vec<&str> = s.split_whitespace().collect();
    tokens.sort_unstable();
    tokens
}

/// Two-row dynamic-programming Levenshtein distance.
fn levenshtein(a: &[char], b: &[char]) -> usize {
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr: Vec<usize> = vec![0; b.len() + 1];
    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}
