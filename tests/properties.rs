use std::path::Path;

use bookmarklet_packer::config::load_defaults;
use bookmarklet_packer::pack_with;
use bookmarklet_packer::processor::coffee::Unavailable;
use bookmarklet_packer::processor::normalize::{Language, Normalizer, decode};
use proptest::prelude::*;

proptest! {
    #[test]
    fn normalized_uris_are_single_line_and_deterministic(body in "[ -~\t\n]{0,200}") {
        let normalizer = Normalizer::new(&Unavailable);
        let first = normalizer.normalize(&body, Language::JavaScript);
        let second = normalizer.normalize(&body, Language::JavaScript);
        prop_assert_eq!(&first, &second);

        if let Ok(uri) = first {
            prop_assert!(uri.starts_with("javascript:"));
            prop_assert!(!uri.contains('\n'));
            prop_assert!(!uri.contains('"'));
            let script = normalizer.script(&body, Language::JavaScript).unwrap();
            prop_assert_eq!(decode(&uri).unwrap(), script);
        }
    }

    #[test]
    fn string_literals_survive_comment_stripping(text in "[a-z:/*. ]{0,40}") {
        let body = format!("x = \"{text}\"; // trailing\n/* block */ y = '{text}';");
        let script = Normalizer::new(&Unavailable)
            .script(&body, Language::JavaScript)
            .unwrap();
        let double_quoted = format!("\"{text}\"");
        let single_quoted = format!("'{text}'");
        prop_assert!(script.contains(&double_quoted));
        prop_assert!(script.contains(&single_quoted));
    }

    #[test]
    fn folder_order_follows_declaration_or_sort(
        titles in proptest::collection::vec("[A-Za-z]{1,8}", 1..10),
        sort in any::<bool>(),
    ) {
        let mut src = String::new();
        if sort {
            src.push_str("SORT\n");
        }
        for title in &titles {
            src.push_str(&format!("BEGIN {title}\nFOLDER Tools\ngo();\nEND\n"));
        }

        let config = load_defaults().unwrap();
        let packed = pack_with(&src, &config, Path::new("."), &Unavailable).unwrap();
        let folder = packed.root.child("Tools").unwrap();
        let got: Vec<_> = folder.entries.iter().map(|e| e.name.clone()).collect();

        let mut expected = titles.clone();
        if sort {
            expected.sort();
        }
        prop_assert_eq!(got, expected);
        prop_assert!(packed.root.entries.is_empty());
    }
}
