pub const MAX_PLAYER_NAME_LENGTH: usize = 20;

/// Collapses whitespace, drops control characters and caps the length used on the leaderboard.
pub fn sanitize_player_name(name: &str, fallback: &str) -> String {
    let printable: String = name.chars().filter(|ch| !ch.is_control()).collect();
    let cleaned = printable.split_whitespace().collect::<Vec<_>>().join(" ");
    if cleaned.is_empty() {
        return fallback.to_string();
    }
    cleaned
        .chars()
        .take(MAX_PLAYER_NAME_LENGTH)
        .collect::<String>()
        .trim_end()
        .to_string()
}
