use regex::Regex;

lazy_static::lazy_static! {
    static ref EMAIL: Regex = Regex::new(r"[\w.-]+@[\w.-]+\.\w+").expect("valid email regex");
}

/// First email-shaped substring of `source`
pub fn find_email(source: &str) -> Option<&str> {
    EMAIL.find(source).map(|m| m.as_str())
}
