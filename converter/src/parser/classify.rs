//! Line classification.
//!
//! Directive tokens are matched by substring containment anywhere on the
//! line, in a fixed priority order, and the payload is what remains after
//! removing every occurrence of the token and its trailing space. This is
//! deliberately as permissive as the dumps the element manager produces.

/// Start-of-export marker.
pub const START_TOKEN: &str = "..cnai";
/// End-of-export marker.
pub const END_TOKEN: &str = "..end";
/// Entity boundary.
pub const SET_TOKEN: &str = ".set ";
/// Domain directive.
pub const DOMAIN_TOKEN: &str = ".domain";
/// Capabilities directive.
pub const CAPABILITIES_TOKEN: &str = "..capabilities";
/// Subnetwork directive.
pub const SUBNETWORK_TOKEN: &str = ".subnetwork";
/// Generation timestamp directive.
pub const TIMESTAMP_TOKEN: &str = ".utctime";

/// The kind of one dump line, with its payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive<'a> {
    StartMarker,
    EndMarker,
    Set(String),
    Domain(String),
    Capabilities(String),
    Subnetwork(String),
    Timestamp(String),
    /// `name=value`, split on the first `=`.
    Parameter { name: &'a str, value: &'a str },
    /// Neither a directive nor a `name=value` pair.
    Malformed(&'a str),
    /// Blank lines and dot-directives this tool has no use for.
    Unrecognized,
}

/// Classify one line.
pub fn classify(line: &str) -> Directive<'_> {
    if line.contains(START_TOKEN) {
        return Directive::StartMarker;
    }
    if line.contains(END_TOKEN) {
        return Directive::EndMarker;
    }
    if line.contains(SET_TOKEN) {
        return Directive::Set(line.replace(SET_TOKEN, ""));
    }
    if line.contains(DOMAIN_TOKEN) {
        return Directive::Domain(strip_directive(line, DOMAIN_TOKEN));
    }
    if line.contains(CAPABILITIES_TOKEN) {
        return Directive::Capabilities(strip_directive(line, CAPABILITIES_TOKEN));
    }
    if line.contains(SUBNETWORK_TOKEN) {
        return Directive::Subnetwork(strip_directive(line, SUBNETWORK_TOKEN));
    }
    if line.contains(TIMESTAMP_TOKEN) {
        return Directive::Timestamp(strip_directive(line, TIMESTAMP_TOKEN));
    }

    match line.split_once('=') {
        Some((name, value)) => Directive::Parameter { name, value },
        None if line.trim().is_empty() || line.starts_with('.') => Directive::Unrecognized,
        None => Directive::Malformed(line),
    }
}

/// Remove every `<token> ` occurrence.
fn strip_directive(line: &str, token: &str) -> String {
    line.replace(&format!("{token} "), "")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markers() {
        assert_eq!(classify("..cnai 2"), Directive::StartMarker);
        assert_eq!(classify("..end"), Directive::EndMarker);
    }

    #[test]
    fn test_directive_payloads() {
        assert_eq!(classify(".domain UtranCell"), Directive::Domain("UtranCell".into()));
        assert_eq!(classify(".set RNC01-1"), Directive::Set("RNC01-1".into()));
        assert_eq!(
            classify("..capabilities export-full"),
            Directive::Capabilities("export-full".into())
        );
        assert_eq!(
            classify(".subnetwork ONRM_RootMo,SubNetwork=RNC01"),
            Directive::Subnetwork("ONRM_RootMo,SubNetwork=RNC01".into())
        );
        assert_eq!(
            classify(".utctime 2018-03-01 10:00:00"),
            Directive::Timestamp("2018-03-01 10:00:00".into())
        );
    }

    #[test]
    fn test_matching_is_not_anchored() {
        assert_eq!(classify("  .set E7"), Directive::Set("  E7".into()));
        assert_eq!(classify("x.domain Cell"), Directive::Domain("xCell".into()));
    }

    #[test]
    fn test_priority_order() {
        // Boundary wins over a key/value reading of the same line
        assert_eq!(classify("label=a .set b"), Directive::Set("label=a b".into()));
        // Domain checked before subnetwork
        assert_eq!(
            classify(".domain .subnetwork"),
            Directive::Domain(".subnetwork".into())
        );
    }

    #[test]
    fn test_directive_without_space_keeps_token() {
        assert_eq!(classify(".domain"), Directive::Domain(".domain".into()));
    }

    #[test]
    fn test_parameter_split_on_first_equals() {
        assert_eq!(
            classify("userLabel=a=b"),
            Directive::Parameter { name: "userLabel", value: "a=b" }
        );
        assert_eq!(
            classify("empty="),
            Directive::Parameter { name: "empty", value: "" }
        );
    }

    #[test]
    fn test_malformed_and_unrecognized() {
        assert_eq!(classify("garbage"), Directive::Malformed("garbage"));
        assert_eq!(classify(""), Directive::Unrecognized);
        assert_eq!(classify("   "), Directive::Unrecognized);
        assert_eq!(classify(".version 3"), Directive::Unrecognized);
    }
}
