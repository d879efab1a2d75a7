//! Vault item display formatting
//!
//! Formats decrypted entries for terminal output in table and detail views.
//! Passwords are masked unless the caller explicitly asks to reveal them.

use crate::services::UnlockedEntry;

const MASK: &str = "********";

/// Format a list of entries as a table
pub fn format_item_list(entries: &[UnlockedEntry]) -> String {
    if entries.is_empty() {
        return "No vault items found.".to_string();
    }

    let title_width = entries
        .iter()
        .map(|e| e.record.title.chars().count())
        .max()
        .unwrap_or(5)
        .max(5);

    let user_width = entries
        .iter()
        .map(|e| e.record.username.chars().count())
        .max()
        .unwrap_or(8)
        .max(8);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<12}  {:<title_width$}  {:<user_width$}  {}\n",
        "ID",
        "Title",
        "Username",
        "URL",
        title_width = title_width,
        user_width = user_width,
    ));

    output.push_str(&format!(
        "{:-<12}  {:-<title_width$}  {:-<user_width$}  {:-<10}\n",
        "",
        "",
        "",
        "",
        title_width = title_width,
        user_width = user_width,
    ));

    for entry in entries {
        output.push_str(&format!(
            "{:<12}  {:<title_width$}  {:<user_width$}  {}\n",
            entry.item.id.to_string(),
            entry.record.title,
            entry.record.username,
            entry.record.url.as_deref().unwrap_or(""),
            title_width = title_width,
            user_width = user_width,
        ));
    }

    output.push_str(&format!("\n{} item(s)", entries.len()));
    output
}

/// Format one entry in detail
pub fn format_item_details(entry: &UnlockedEntry, reveal: bool) -> String {
    let record = &entry.record;
    let mut output = String::new();

    output.push_str(&format!("Title:    {}\n", record.title));
    output.push_str(&format!("ID:       {}\n", entry.item.id));
    output.push_str(&format!("Username: {}\n", record.username));
    output.push_str(&format!(
        "Password: {}\n",
        if reveal { record.password.as_str() } else { MASK }
    ));

    if let Some(url) = &record.url {
        output.push_str(&format!("URL:      {}\n", url));
    }

    if let Some(notes) = record.notes.as_deref().filter(|n| !n.is_empty()) {
        output.push_str("Notes:\n");
        for line in notes.lines() {
            output.push_str(&format!("  {}\n", line));
        }
    }

    output.push_str(&format!(
        "Created:  {}\n",
        entry.item.created_at.format("%Y-%m-%d %H:%M")
    ));
    output.push_str(&format!(
        "Updated:  {}",
        entry.item.updated_at.format("%Y-%m-%d %H:%M")
    ));

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::Envelope;
    use crate::models::{VaultItem, VaultRecord};

    fn entry(record: VaultRecord) -> UnlockedEntry {
        UnlockedEntry {
            item: VaultItem::new(Envelope {
                ciphertext: String::new(),
                iv: String::new(),
                salt: String::new(),
            }),
            record,
        }
    }

    #[test]
    fn test_empty_list() {
        assert_eq!(format_item_list(&[]), "No vault items found.");
    }

    #[test]
    fn test_list_never_shows_passwords() {
        let entries = vec![
            entry(VaultRecord::new("Gmail", "me@x.com", "Secr3t!").with_url("https://gmail.com")),
            entry(VaultRecord::new("Bank", "me", "1234")),
        ];

        let output = format_item_list(&entries);
        assert!(output.contains("Gmail"));
        assert!(output.contains("https://gmail.com"));
        assert!(output.contains("2 item(s)"));
        assert!(!output.contains("Secr3t!"));
    }

    #[test]
    fn test_details_masked_by_default() {
        let e = entry(VaultRecord::new("Gmail", "me", "Secr3t!").with_notes("a\nb"));

        let masked = format_item_details(&e, false);
        assert!(!masked.contains("Secr3t!"));
        assert!(masked.contains(MASK));
        assert!(masked.contains("  a\n  b\n"));

        let revealed = format_item_details(&e, true);
        assert!(revealed.contains("Password: Secr3t!"));
    }
}
