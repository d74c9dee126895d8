/// Cuts a string down to `to` characters, marking the cut with an ellipsis
pub fn trim_long_str(s: &str, to: usize) -> String {
    match s.char_indices().nth(to) {
        None => s.to_string(),
        Some((idx, _)) => format!("{}…", &s[..idx]),
    }
}
