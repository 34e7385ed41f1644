use super::record::Actor;

/// True when the closing account matches one of the recognized automation
/// identities. Matching is case-insensitive and treats each configured name
/// as an exact match or substring, so "stale[bot]" also catches forks like
/// "my-stale[bot]".
pub fn is_bot_close(closed_by: Option<&Actor>, recognized_bots: &[String]) -> bool {
    let Some(username) = closed_by.and_then(|a| a.username.as_deref()) else {
        return false;
    };
    let username = username.trim().to_lowercase();
    if username.is_empty() {
        return false;
    }

    recognized_bots.iter().any(|bot| {
        let bot = bot.trim().to_lowercase();
        !bot.is_empty() && (username == bot || username.contains(&bot))
    })
}
