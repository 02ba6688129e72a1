use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Composer {
    pub given_name: String,
    #[serde(default)]
    pub family_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Song {
    #[serde(default)]
    pub composer: Option<Composer>,
    pub title: String,
    #[serde(default)]
    pub lyrics: Option<String>,
    #[serde(default)]
    pub year: Option<u32>,
}

impl Song {
    pub fn titled(title: &str) -> Self {
        Self {
            composer: None,
            title: title.to_string(),
            lyrics: None,
            year: None,
        }
    }
}

/// Serialize `songs` the way a streaming endpoint sends them: one array,
/// elements separated by commas.
pub fn render_array(songs: &[Song]) -> String {
    let elements: Vec<String> = songs
        .iter()
        .map(|s| simd_json::to_string(s).unwrap())
        .collect();
    format!("[{}]", elements.join(","))
}

/// Cut `text` into random non-empty pieces, never inside a code point.
pub fn random_fragments(text: &str, seed: u64) -> Vec<String> {
    let mut rng = StdRng::seed_from_u64(seed);
    let chars: Vec<char> = text.chars().collect();
    let mut fragments = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let n = rng.gen_range(1..=chars.len() - i);
        fragments.push(chars[i..i + n].iter().collect());
        i += n;
    }
    fragments
}

pub fn char_fragments(text: &str) -> Vec<String> {
    text.chars().map(String::from).collect()
}
