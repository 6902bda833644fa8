//! Property-based tests for the input gates.
//!
//! These tests use proptest to generate random inputs and verify that
//! invariants hold for all possible inputs.

#[cfg(test)]
mod proptest_tests {
    use crate::credentials::{generate_secret, ALPHABET};
    use crate::repository::resolve;
    use crate::site::{validate_site, SiteName};
    use proptest::prelude::*;
    use url::Url;

    // ============================================================================
    // Site name validation
    // ============================================================================

    proptest! {
        /// Property: every ASCII alphanumeric name is accepted
        #[test]
        fn alphanumeric_names_are_accepted(name in "[A-Za-z0-9]{1,40}") {
            prop_assert!(SiteName::parse(&name).is_ok());
        }

        /// Property: a name with any non-alphanumeric character is rejected
        #[test]
        fn names_with_other_characters_are_rejected(
            prefix in "[A-Za-z0-9]{0,10}",
            bad in "[^A-Za-z0-9]",
            suffix in "[A-Za-z0-9]{0,10}",
        ) {
            let name = format!("{prefix}{bad}{suffix}");
            prop_assert!(SiteName::parse(&name).is_err());
        }

        /// Property: the fully-qualified name is exactly `name.domain`
        #[test]
        fn fqdn_is_name_dot_domain(name in "[A-Za-z0-9]{1,20}", domain in "[a-z]{1,10}\\.[a-z]{2,5}") {
            let (site, fqdn) = validate_site(&name, &domain).unwrap();
            prop_assert_eq!(&fqdn, &format!("{name}.{domain}"));
            prop_assert_eq!(site.fully_qualified(&domain), fqdn);
        }
    }

    // ============================================================================
    // Repository references
    // ============================================================================

    proptest! {
        /// Property: `owner/name` resolves to itself
        #[test]
        fn owner_name_resolves_to_itself(owner in "[A-Za-z0-9-]{1,20}", name in "[A-Za-z0-9._-]{1,20}") {
            let host = Url::parse("https://github.com/").unwrap();
            let reference = format!("{owner}/{name}");
            let resolved = resolve(&reference, &host, "boldgrid").unwrap();
            prop_assert_eq!(&resolved.canonical_name, &reference);
            prop_assert_eq!(resolved.dir_name, name);
        }

        /// Property: two or more slashes are always rejected
        #[test]
        fn deep_references_are_rejected(segments in prop::collection::vec("[a-z]{1,8}", 3..6)) {
            let host = Url::parse("https://github.com/").unwrap();
            prop_assert!(resolve(&segments.join("/"), &host, "boldgrid").is_err());
        }
    }

    // ============================================================================
    // Credentials
    // ============================================================================

    proptest! {
        /// Property: secrets have the requested length and stay in the alphabet
        #[test]
        fn secrets_use_alphabet(length in 0usize..64) {
            let secret = generate_secret(length);
            prop_assert_eq!(secret.len(), length);
            prop_assert!(secret.bytes().all(|b| ALPHABET.contains(&b)));
        }
    }
}
