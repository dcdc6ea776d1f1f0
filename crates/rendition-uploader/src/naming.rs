//! Composite version names and filename prefixing.

pub const VERSION_NAME_SEPARATOR: &str = "_";

/// Join a name chain into a composite name; `None` for an empty chain.
pub fn composite_name(chain: &[String]) -> Option<String> {
    if chain.is_empty() {
        None
    } else {
        Some(chain.join(VERSION_NAME_SEPARATOR))
    }
}

/// `{composite}_{base}`, or `base` unchanged for the root uploader.
pub fn prefixed_filename(composite: Option<&str>, base: &str) -> String {
    match composite {
        Some(prefix) => format!("{prefix}{VERSION_NAME_SEPARATOR}{base}"),
        None => base.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_composite_name() {
        assert_eq!(composite_name(&[]), None);
        assert_eq!(composite_name(&["thumb".to_string()]).as_deref(), Some("thumb"));
        assert_eq!(
            composite_name(&["thumb".to_string(), "small".to_string()]).as_deref(),
            Some("thumb_small")
        );
    }

    #[test]
    fn test_prefixed_filename() {
        assert_eq!(prefixed_filename(None, "me.png"), "me.png");
        assert_eq!(prefixed_filename(Some("thumb_small"), "me.png"), "thumb_small_me.png");
    }
}
