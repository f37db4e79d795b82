//! Identifier helpers
//!
//! Type names keep the table name verbatim apart from the first character.
//! No snake_case conversion happens here, unlike the usual PascalCase rules.

/// Uppercase the first character, leave the rest untouched
pub fn capitalize_first_letter(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
    }
}

/// Lowercase the first character, leave the rest untouched
pub fn lower_case_first_letter(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_lowercase().collect::<String>() + chars.as_str(),
    }
}

/// Strip a foreign key suffix: `Id`, then `_id`, then `_ID`
pub fn remove_id_suffix(s: &str) -> &str {
    ["Id", "_id", "_ID"]
        .iter()
        .fold(s, |name, suffix| name.strip_suffix(suffix).unwrap_or(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capitalize_first_letter() {
        assert_eq!(capitalize_first_letter("users"), "Users");
        assert_eq!(capitalize_first_letter("user_profile"), "User_profile");
        assert_eq!(capitalize_first_letter("Users"), "Users");
        assert_eq!(capitalize_first_letter("aBC"), "ABC");
    }

    #[test]
    fn test_capitalize_first_letter_edge_cases() {
        assert_eq!(capitalize_first_letter(""), "");
        assert_eq!(capitalize_first_letter("_users"), "_users");
        assert_eq!(capitalize_first_letter("élan"), "Élan");
    }

    #[test]
    fn test_lower_case_first_letter() {
        assert_eq!(lower_case_first_letter("Users"), "users");
        assert_eq!(lower_case_first_letter("UserProfile"), "userProfile");
        assert_eq!(lower_case_first_letter(""), "");
    }

    #[test]
    fn test_remove_id_suffix() {
        assert_eq!(remove_id_suffix("authorId"), "author");
        assert_eq!(remove_id_suffix("author_id"), "author");
        assert_eq!(remove_id_suffix("AUTHOR_ID"), "AUTHOR");
        assert_eq!(remove_id_suffix("author"), "author");
    }

    #[test]
    fn test_remove_id_suffix_only_once_per_suffix() {
        // `Id` is stripped first, exposing `_id` which is then stripped too
        assert_eq!(remove_id_suffix("owner_idId"), "owner");
        assert_eq!(remove_id_suffix("id"), "id");
    }
}
