//! Prompt helpers shared by every journey.

/// Phrases that take the user out of any journey.
const LEAVE_PHRASES: [&str; 3] = ["cancel", "stop journey", "main menu"];

/// Numbered option list followed by the standard selection prompt.
///
/// ```
/// use nutribot_journeys::prompt::format_options;
///
/// let text = format_options(&["Daily", "Weekly"], "scope");
/// assert!(text.starts_with("\nHere are your scopes:\n1. Daily\n2. Weekly\n"));
/// assert!(text.ends_with("(1-2) or type your choice:"));
/// ```
pub fn format_options<S: AsRef<str>>(options: &[S], kind: &str) -> String {
    if options.is_empty() {
        return String::new();
    }
    let mut text = format!("\nHere are your {kind}s:\n");
    for (i, option) in options.iter().enumerate() {
        text.push_str(&format!("{}. {}\n", i + 1, option.as_ref()));
    }
    text.push_str(&format!(
        "\nPlease enter the number (1-{}) or type your choice:",
        options.len()
    ));
    text
}

/// Index of the option the user picked: a 1-based number, else the first
/// option containing the input case-insensitively.  Empty input never
/// matches.
pub fn parse_choice<S: AsRef<str>>(input: &str, options: &[S]) -> Option<usize> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    if let Ok(n) = input.parse::<usize>() {
        return (1..=options.len()).contains(&n).then(|| n - 1);
    }
    let needle = input.to_lowercase();
    options
        .iter()
        .position(|o| o.as_ref().to_lowercase().contains(&needle))
}

/// Whether the input asks to leave the current journey.
pub fn is_leave_request(input: &str) -> bool {
    let lower = normalized(input);
    LEAVE_PHRASES.contains(&lower.as_str())
}

/// Whether the input is one of the affirmative words.
pub fn is_yes(input: &str) -> bool {
    matches!(
        normalized(input).as_str(),
        "yes" | "y" | "generate" | "create" | "go" | "proceed" | "sure" | "ok" | "okay"
    )
}

/// Lowercased and trimmed.
pub fn normalized(input: &str) -> String {
    input.trim().to_lowercase()
}

/// Whether `text` contains any of `words`.
pub fn mentions(text: &str, words: &[&str]) -> bool {
    words.iter().any(|w| text.contains(w))
}

/// `1. a\n2. b\n` without header or footer.
pub fn numbered<S: AsRef<str>>(items: &[S], start: usize) -> String {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| format!("{}. {}\n", i + start, item.as_ref()))
        .collect()
}

/// Up to `limit` characters of `text`, with `...` when cut.
pub fn truncate(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        text.to_string()
    } else {
        let cut: String = text.chars().take(limit).collect();
        format!("{cut}...")
    }
}

/// Comma-separated selection numbers such as `"1, 3"`, 1-based and within
/// `1..=count`, returned zero-based in input order without duplicates.
pub fn parse_selection(input: &str, count: usize) -> Vec<usize> {
    let mut picked = Vec::new();
    for part in input.split([',', ' ']) {
        if let Ok(n) = part.trim().parse::<usize>() {
            if (1..=count).contains(&n) && !picked.contains(&(n - 1)) {
                picked.push(n - 1);
            }
        }
    }
    picked
}

#[cfg(test)]
mod tests {
    use super::*;

    const METHODS: [&str; 3] = ["Cuisine Type", "Available Ingredients", "Cooking Time"];

    #[test]
    fn format_options_layout() {
        let text = format_options(&METHODS, "discovery method");
        assert_eq!(
            text,
            "\nHere are your discovery methods:\n1. Cuisine Type\n2. Available Ingredients\n3. Cooking Time\n\nPlease enter the number (1-3) or type your choice:"
        );
        assert_eq!(format_options::<&str>(&[], "x"), "");
    }

    #[test]
    fn parse_choice_number_then_text() {
        assert_eq!(parse_choice("2", &METHODS), Some(1));
        assert_eq!(parse_choice(" 3 ", &METHODS), Some(2));
        assert_eq!(parse_choice("4", &METHODS), None);
        assert_eq!(parse_choice("0", &METHODS), None);
        assert_eq!(parse_choice("cooking", &METHODS), Some(2));
        assert_eq!(parse_choice("TYPE", &METHODS), Some(0));
        assert_eq!(parse_choice("", &METHODS), None);
        assert_eq!(parse_choice("   ", &METHODS), None);
        assert_eq!(parse_choice("sushi", &METHODS), None);
    }

    #[test]
    fn leave_and_yes_words() {
        assert!(is_leave_request(" Cancel "));
        assert!(is_leave_request("main menu"));
        assert!(!is_leave_request("cancel my order please"));
        assert!(is_yes("Y"));
        assert!(!is_yes("maybe"));
    }

    #[test]
    fn selection_numbers() {
        assert_eq!(parse_selection("1, 3", 3), vec![0, 2]);
        assert_eq!(parse_selection("3,3 9 2", 3), vec![2, 1]);
        assert!(parse_selection("none", 3).is_empty());
    }

    #[test]
    fn truncation() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdef", 3), "abc...");
    }
}
