/// Display form of an attribute key; the stored key is left untouched.
pub fn humanize_key(key: &str) -> String {
    key.replace('_', " ").to_uppercase()
}

pub fn truncate_label(label: &str, max_chars: usize) -> String {
    if label.chars().count() <= max_chars {
        return label.to_owned();
    }

    let mut truncated = label
        .chars()
        .take(max_chars.saturating_sub(1))
        .collect::<String>();
    truncated.push('…');
    truncated
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn humanize_key_replaces_underscores_and_uppercases() {
        assert_eq!(humanize_key("free_space_gb"), "FREE SPACE GB");
        assert_eq!(humanize_key("cpu"), "CPU");
        assert_eq!(humanize_key(""), "");
    }

    #[test]
    fn truncate_label_keeps_short_labels() {
        assert_eq!(truncate_label("esx01", 8), "esx01");
        assert_eq!(truncate_label("datastore-cluster-01", 8), "datasto…");
    }
}
