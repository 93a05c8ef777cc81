//! Double-key phonetic encoding tuned for Anglicized personal names.
//!
//! Produces a (primary, secondary) key pair. The primary key applies
//! consonant canonicalization (devoicing, digraph folding, silent-letter
//! elision) while retaining vowel identity; the secondary key carries the
//! alternate reading of ambiguous consonants (CH, C, G, TH). Two names are
//! phonetically comparable when one side's primary key equals the other
//! side's primary or secondary key.

fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')
}

/// Encode `name` into its primary/secondary phonetic keys.
///
/// Non-alphabetic characters are ignored, so callers may pass concatenated
/// tokens. Empty or fully non-alphabetic input yields empty keys.
pub fn phonetic_keys(name: &str) -> (String, String) {
    let letters: Vec<char> = name
        .chars()
        .filter(char::is_ascii_alphabetic)
        .map(|c| c.to_ascii_lowercase())
        .collect();
    let n = letters.len();
    let mut primary = String::with_capacity(n);
    let mut secondary = String::with_capacity(n);

    let mut i = 0usize;
    // Silent leading pairs: KN-, GN-, PN-, WR-, PS-.
    if n >= 2 {
        match (letters[0], letters[1]) {
            ('k' | 'g' | 'p', 'n') | ('w', 'r') | ('p', 's') => i = 1,
            _ => {}
        }
    }

    while i < n {
        let c = letters[i];
        // Doubled letters encode once.
        if i > 0 && letters[i - 1] == c {
            i += 1;
            continue;
        }
        let next = letters.get(i + 1).copied();
        match c {
            'a' | 'e' | 'i' | 'o' | 'u' => {
                // Word-final E is silent.
                if c == 'e' && i > 0 && i + 1 == n {
                    i += 1;
                    continue;
                }
                let v = c.to_ascii_uppercase();
                primary.push(v);
                secondary.push(v);
                i += 1;
            }
            'y' => {
                primary.push('I');
                secondary.push('I');
                i += 1;
            }
            'b' => {
                // Final -MB: the B is silent (Lamb, Plumb).
                if i + 1 == n && i > 0 && letters[i - 1] == 'm' {
                    i += 1;
                    continue;
                }
                primary.push('P');
                secondary.push('P');
                i += 1;
            }
            'c' => {
                if next == Some('h') {
                    primary.push('X');
                    secondary.push('K');
                    i += 2;
                } else if next == Some('k') {
                    primary.push('K');
                    secondary.push('K');
                    i += 2;
                } else if matches!(next, Some('e' | 'i' | 'y')) {
                    primary.push('S');
                    secondary.push('K');
                    i += 1;
                } else {
                    primary.push('K');
                    secondary.push('K');
                    i += 1;
                }
            }
            'd' => {
                if next == Some('g') && matches!(letters.get(i + 2), Some(&('e' | 'i' | 'y'))) {
                    primary.push('J');
                    secondary.push('J');
                    i += 2;
                } else {
                    primary.push('T');
                    secondary.push('T');
                    i += 1;
                }
            }
            'f' => {
                primary.push('F');
                secondary.push('F');
                i += 1;
            }
            'g' => {
                if next == Some('h') {
                    // GH is hard at word start, hard before a vowel,
                    // otherwise silent (Vaughn, Wright).
                    if i == 0 || matches!(letters.get(i + 2), Some(v) if is_vowel(*v)) {
                        primary.push('K');
                        secondary.push('K');
                    }
                    i += 2;
                } else if matches!(next, Some('e' | 'i' | 'y')) {
                    primary.push('J');
                    secondary.push('K');
                    i += 1;
                } else {
                    primary.push('K');
                    secondary.push('K');
                    i += 1;
                }
            }
            'h' => {
                // H sounds only at word start or between vowels.
                let prev_vowel = i > 0 && is_vowel(letters[i - 1]);
                let next_vowel = matches!(next, Some(v) if is_vowel(v));
                if i == 0 || (prev_vowel && next_vowel) {
                    primary.push('H');
                    secondary.push('H');
                }
                i += 1;
            }
            'j' => {
                primary.push('J');
                secondary.push('J');
                i += 1;
            }
            'k' => {
                primary.push('K');
                secondary.push('K');
                i += 1;
            }
            'l' | 'm' | 'n' | 'r' => {
                let v = c.to_ascii_uppercase();
                primary.push(v);
                secondary.push(v);
                i += 1;
            }
            'p' => {
                if next == Some('h') {
                    primary.push('F');
                    secondary.push('F');
                    i += 2;
                } else {
                    primary.push('P');
                    secondary.push('P');
                    i += 1;
                }
            }
            'q' => {
                primary.push('K');
                secondary.push('K');
                i += 1;
            }
            's' => {
                if next == Some('h') {
                    primary.push('X');
                    secondary.push('X');
                    i += 2;
                } else {
                    primary.push('S');
                    secondary.push('S');
                    i += 1;
                }
            }
            't' => {
                if next == Some('h') {
                    primary.push('0');
                    secondary.push('T');
                    i += 2;
                } else {
                    primary.push('T');
                    secondary.push('T');
                    i += 1;
                }
            }
            'v' => {
                primary.push('F');
                secondary.push('F');
                i += 1;
            }
            'w' => {
                if next == Some('h') {
                    primary.push('W');
                    secondary.push('W');
                    i += 2;
                } else if matches!(next, Some(v) if is_vowel(v)) {
                    primary.push('W');
                    secondary.push('W');
                    i += 1;
                } else {
                    i += 1;
                }
            }
            'x' => {
                if i == 0 {
                    primary.push('S');
                    secondary.push('S');
                } else {
                    primary.push_str("KS");
                    secondary.push_str("KS");
                }
                i += 1;
            }
            'z' => {
                primary.push('S');
                secondary.push('S');
                i += 1;
            }
            _ => i += 1,
        }
    }

    (primary, secondary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_yields_empty_keys() {
        assert_eq!(phonetic_keys(""), (String::new(), String::new()));
        assert_eq!(phonetic_keys("  ,.;  "), (String::new(), String::new()));
    }

    #[test]
    fn th_splits_primary_and_secondary() {
        assert_eq!(phonetic_keys("thomas"), ("0OMAS".to_string(), "TOMAS".to_string()));
        assert_eq!(phonetic_keys("tomas"), ("TOMAS".to_string(), "TOMAS".to_string()));
    }

    #[test]
    fn spelling_variants_share_keys() {
        assert_eq!(phonetic_keys("smith").0, phonetic_keys("smyth").0);
        assert_eq!(phonetic_keys("stephen"), phonetic_keys("steven"));
        assert_eq!(phonetic_keys("carl"), phonetic_keys("karl"));
        assert_eq!(phonetic_keys("jon").0, phonetic_keys("john").0);
    }

    #[test]
    fn ch_alternate_lands_in_secondary() {
        let (p, s) = phonetic_keys("christine");
        assert_eq!(p, "XRISTIN");
        assert_eq!(s, "KRISTIN");
        assert_eq!(phonetic_keys("kristine").0, s);
    }

    #[test]
    fn silent_letters_elide() {
        assert_eq!(phonetic_keys("vaughn"), phonetic_keys("vaun"));
        assert_eq!(phonetic_keys("knox").0, "NOKS");
        assert_eq!(phonetic_keys("lamb").0, "LAM");
    }

    #[test]
    fn vowel_identity_is_retained() {
        // Jane and John devolve to different keys; vowel drift is the job of
        // the nickname table, not the phonetic layer.
        assert_ne!(phonetic_keys("doejane").0, phonetic_keys("doejohn").0);
    }

    #[test]
    fn doubled_letters_encode_once() {
        assert_eq!(phonetic_keys("aaron").0, "ARON");
        assert_eq!(phonetic_keys("harriss").0, phonetic_keys("haris").0);
    }
}
