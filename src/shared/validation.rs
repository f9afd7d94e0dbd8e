use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for validating slug fields (categories, pages)
    /// Must be lowercase alphanumeric with hyphens
    /// - Valid: "fruit-baskets", "course123", "home"
    /// - Invalid: "-slug", "slug-", "slug--name", "Slug", "slug_name"
    pub static ref SLUG_REGEX: Regex = Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").unwrap();

    /// Regex for validating promocode codes
    /// Letters, digits, dash and underscore, 3 to 32 characters
    /// - Valid: "SAVE10", "spring-2025", "VIP_ONLY"
    /// - Invalid: "AB", "save 10", "промо"
    pub static ref PROMOCODE_REGEX: Regex = Regex::new(r"^[A-Za-z0-9_-]{3,32}$").unwrap();
}

/// Normalize a promocode the way it is stored (trimmed, upper-case)
pub fn normalize_promocode(code: &str) -> String {
    code.trim().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_regex_valid() {
        assert!(SLUG_REGEX.is_match("fruit-baskets"));
        assert!(SLUG_REGEX.is_match("course123"));
        assert!(SLUG_REGEX.is_match("home"));
        assert!(SLUG_REGEX.is_match("a-b-c"));
    }

    #[test]
    fn test_slug_regex_invalid() {
        assert!(!SLUG_REGEX.is_match("-slug")); // starts with hyphen
        assert!(!SLUG_REGEX.is_match("slug-")); // ends with hyphen
        assert!(!SLUG_REGEX.is_match("slug--name")); // double hyphen
        assert!(!SLUG_REGEX.is_match("Slug")); // uppercase
        assert!(!SLUG_REGEX.is_match("slug_name")); // underscore
        assert!(!SLUG_REGEX.is_match(""));
    }

    #[test]
    fn test_promocode_regex() {
        assert!(PROMOCODE_REGEX.is_match("SAVE10"));
        assert!(PROMOCODE_REGEX.is_match("spring-2025"));
        assert!(PROMOCODE_REGEX.is_match("VIP_ONLY"));
        assert!(!PROMOCODE_REGEX.is_match("AB"));
        assert!(!PROMOCODE_REGEX.is_match("save 10"));
        assert!(!PROMOCODE_REGEX.is_match("промо"));
    }

    #[test]
    fn test_normalize_promocode() {
        assert_eq!(normalize_promocode("  save10 "), "SAVE10");
        assert_eq!(normalize_promocode("Spring-2025"), "SPRING-2025");
    }
}
