use kb_fs::{NormalizedPath, digest};
use proptest::prelude::*;

proptest! {
    #[test]
    fn test_normalization_invariants(s in "\\PC*") {
        let path = NormalizedPath::new(&s);
        let as_str = path.as_str();

        prop_assert!(!as_str.contains('\\'));

        // A leading `//` marks a network path; nothing else may double up
        let is_network = as_str.starts_with("//") && !as_str.starts_with("///");
        if is_network {
            prop_assert!(!as_str[2..].contains("//"));
        } else {
            prop_assert!(!as_str.contains("//"));
        }

        // Normalizing is idempotent through the native form
        let roundtripped = NormalizedPath::new(path.to_native());
        prop_assert_eq!(path, roundtripped);
    }

    #[test]
    fn test_join_is_normalized(a in "[a-z./]{0,12}", b in "[a-z./\\\\]{0,12}") {
        let joined = NormalizedPath::new(&a).join(&b);
        prop_assert!(!joined.as_str().contains('\\'));
        prop_assert_eq!(joined.clone(), NormalizedPath::new(joined.as_str()));
    }

    #[test]
    fn test_digest_is_deterministic(bytes in proptest::collection::vec(any::<u8>(), 0..512)) {
        prop_assert_eq!(digest(&bytes), digest(&bytes));
        prop_assert!(digest(&bytes).is_well_formed());
    }

    #[test]
    fn test_appending_a_byte_changes_digest(
        bytes in proptest::collection::vec(any::<u8>(), 0..256),
        extra in any::<u8>(),
    ) {
        let mut changed = bytes.clone();
        changed.push(extra);
        prop_assert_ne!(digest(&bytes), digest(&changed));
    }
}
