//! Chat title derivation.

/// Longest title we derive, in characters.
const MAX_TITLE_CHARS: usize = 80;

/// Derive a chat title from the first user message.
///
/// Whitespace is collapsed and the text truncated on a word boundary.
/// Derived once at chat creation and never recomputed.
pub fn derive_title(content: &str) -> String {
    let mut collapsed = String::new();
    for word in content.split_whitespace() {
        if !collapsed.is_empty() {
            collapsed.push(' ');
        }
        collapsed.push_str(word);
    }

    if collapsed.is_empty() {
        return "New chat".to_owned();
    }
    if collapsed.chars().count() <= MAX_TITLE_CHARS {
        return collapsed;
    }

    let mut title = String::new();
    let mut used = 0;
    for word in collapsed.split(' ') {
        let sep = usize::from(!title.is_empty());
        let len = word.chars().count();
        if used + sep + len > MAX_TITLE_CHARS {
            break;
        }
        if sep == 1 {
            title.push(' ');
        }
        title.push_str(word);
        used += sep + len;
    }

    // A single word longer than the limit: hard-truncate it.
    if title.is_empty() {
        title = collapsed.chars().take(MAX_TITLE_CHARS).collect();
    }

    title.push('…');
    title
}
