//! The four masking strategies.
//!
//! Every strategy is a pure function from string to string. All of them
//! preserve the character count of the input, replace hidden characters with
//! [`FILLER`], and are idempotent: masking already-masked output changes
//! nothing, because revealed characters stay revealed and `*` masks to `*`.

use std::str::FromStr;

use serde::Deserialize;

/// Replacement character for hidden content.
pub const FILLER: char = '*';

/// Characters revealed by [`MaskStrategy::ShowLastFour`] and
/// [`MaskStrategy::ShowMiddle`].
const REVEAL: usize = 4;

/// How matched element text is rewritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MaskStrategy {
    /// Keep the trailing four characters; strings of four or fewer pass
    /// through unchanged.
    ShowLastFour,
    /// Keep a four-character window centered on the middle of the string,
    /// biased left when the split is uneven.
    ShowMiddle,
    /// Keep the first character of every whitespace-separated word.
    ShowWordStart,
    /// Hide everything.
    ShowNone,
}

impl MaskStrategy {
    pub fn apply(&self, input: &str) -> String {
        match self {
            MaskStrategy::ShowLastFour => show_last_four(input),
            MaskStrategy::ShowMiddle => show_middle(input),
            MaskStrategy::ShowWordStart => show_word_start(input),
            MaskStrategy::ShowNone => show_none(input),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            MaskStrategy::ShowLastFour => "show-last-four",
            MaskStrategy::ShowMiddle => "show-middle",
            MaskStrategy::ShowWordStart => "show-word-start",
            MaskStrategy::ShowNone => "show-none",
        }
    }
}

impl FromStr for MaskStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "show-last-four" => Ok(MaskStrategy::ShowLastFour),
            "show-middle" => Ok(MaskStrategy::ShowMiddle),
            "show-word-start" => Ok(MaskStrategy::ShowWordStart),
            "show-none" => Ok(MaskStrategy::ShowNone),
            other => Err(format!(
                "unknown masking strategy '{other}' (expected show-last-four, \
                 show-middle, show-word-start, or show-none)"
            )),
        }
    }
}

fn show_last_four(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    if chars.len() <= REVEAL {
        return input.to_string();
    }
    let hidden = chars.len() - REVEAL;
    let mut out = String::with_capacity(input.len());
    out.extend(std::iter::repeat(FILLER).take(hidden));
    out.extend(chars[hidden..].iter());
    out
}

fn show_middle(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let len = chars.len();
    if len <= REVEAL {
        return input.to_string();
    }
    let lead = (len - REVEAL) / 2;
    let mut out = String::with_capacity(input.len());
    out.extend(std::iter::repeat(FILLER).take(lead));
    out.extend(chars[lead..lead + REVEAL].iter());
    out.extend(std::iter::repeat(FILLER).take(len - lead - REVEAL));
    out
}

fn show_word_start(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut in_word = false;
    for c in input.chars() {
        if c.is_whitespace() {
            in_word = false;
            out.push(c);
        } else if in_word {
            out.push(FILLER);
        } else {
            in_word = true;
            out.push(c);
        }
    }
    out
}

fn show_none(input: &str) -> String {
    input.chars().map(|_| FILLER).collect()
}
