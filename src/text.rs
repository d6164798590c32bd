//! Reply text transforms. Every function here is total: malformed input is
//! returned as unchanged as possible, never rejected.

use crate::emotion::EmotionTag;

pub const REASONING_OPEN: &str = "<think>";
pub const REASONING_CLOSE: &str = "</think>";

/// Trailer printed by the model runner once its reasoning phase ends.
const DONE_THINKING: &str = "...done thinking.";
/// Progress noise ("Thinking...") matched case-insensitively.
const THINKING: &str = "thinking";
const PARAGRAPH_BREAK: &str = "\n\n";

/// First tag, in priority order, whose literal `[tag]` marker occurs in
/// `text`. Position in the text does not matter; no marker gives
/// [`EmotionTag::FALLBACK`].
pub fn extract_emotion(text: &str) -> EmotionTag {
    EmotionTag::by_priority()
        .find(|tag| text.contains(&tag.marker()))
        .unwrap_or(EmotionTag::FALLBACK)
}

/// Remove every `<think>…</think>` block. An opening marker with no closing
/// marker after it swallows the rest of the text.
///
/// Idempotent: removal is repeated until nothing changes, so markers that
/// only appear once an inner block is cut out are removed too.
pub fn strip_reasoning(text: &str) -> String {
    let mut current = strip_reasoning_once(text);
    loop {
        let next = strip_reasoning_once(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn strip_reasoning_once(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find(REASONING_OPEN) {
        out.push_str(&rest[..start]);
        let inside = &rest[start + REASONING_OPEN.len()..];
        match inside.find(REASONING_CLOSE) {
            Some(end) => rest = &inside[end + REASONING_CLOSE.len()..],
            None => return out,
        }
    }

    out.push_str(rest);
    out
}

/// Drop every case-insensitive `thinking` together with the dots after it.
fn strip_thinking_noise(text: &str) -> String {
    // ASCII lowercasing keeps byte offsets aligned with `text`.
    let lower = text.to_ascii_lowercase();
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;

    while let Some(found) = lower[cursor..].find(THINKING) {
        let start = cursor + found;
        out.push_str(&text[cursor..start]);
        let mut end = start + THINKING.len();
        while bytes.get(end) == Some(&b'.') {
            end += 1;
        }
        cursor = end;
    }

    out.push_str(&text[cursor..]);
    out
}

/// Reduce a raw engine reply to the user-facing answer: strip reasoning
/// blocks and runner noise, then keep only the last paragraph when there is
/// more than one.
///
/// The last-paragraph rule is a heuristic for discarding scratch text the
/// model failed to fence; unusual formatting can defeat it.
pub fn clean_reply(raw: &str) -> String {
    let stripped = strip_reasoning(raw).replace(DONE_THINKING, "");
    let cleaned = strip_thinking_noise(&stripped);

    if cleaned.contains(PARAGRAPH_BREAK) {
        let last = cleaned
            .trim()
            .rsplit(PARAGRAPH_BREAK)
            .next()
            .unwrap_or_default();
        return last.trim().to_string();
    }

    cleaned.trim().to_string()
}

/// Remove the leftmost emotion marker and the whitespace right after it.
/// Later markers are left in place.
pub fn remove_emotion_marker(text: &str) -> String {
    let first = EmotionTag::by_priority()
        .filter_map(|tag| {
            let marker = tag.marker();
            text.find(&marker).map(|pos| (pos, marker.len()))
        })
        .min_by_key(|(pos, _)| *pos);

    match first {
        Some((pos, len)) => {
            let rest = text[pos + len..].trim_start();
            format!("{}{}", &text[..pos], rest)
        }
        None => text.to_string(),
    }
}
