//! Catalog behaviour against a real repository

use depot_core::{Error, validate_name};
use depot_test_utils::{TestRepo, md5_spec};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

#[test]
fn distinct_names_are_both_retrievable() {
    let test = TestRepo::new();
    let catalog = test.init().catalog();

    catalog.add("zlib", "https://example.com/zlib.tar.gz", "none").unwrap();
    catalog
        .add("pcre", "https://example.com/pcre.tar.bz2", &md5_spec(b"pcre"))
        .unwrap();

    let zlib = catalog.lookup("zlib").unwrap().unwrap();
    let pcre = catalog.lookup("pcre").unwrap().unwrap();
    assert_eq!(zlib.url, "https://example.com/zlib.tar.gz");
    assert_eq!(pcre.checksum.to_string(), md5_spec(b"pcre"));
}

#[test]
fn duplicate_add_fails_and_leaves_catalog_unchanged() {
    let test = TestRepo::new();
    let catalog = test.init().catalog();
    catalog.add("zlib", "https://example.com/zlib.tar.gz", "none").unwrap();
    let before = catalog.raw().unwrap();

    let err = catalog
        .add("zlib", "https://mirror.example.com/zlib.tar.gz", "none")
        .unwrap_err();

    assert!(matches!(err, Error::DuplicateEntry { ref name } if name == "zlib"));
    assert_eq!(catalog.raw().unwrap(), before);
}

#[test]
fn lookup_of_unknown_name_is_empty() {
    let test = TestRepo::new();
    let catalog = test.init().catalog();
    assert_eq!(catalog.lookup("never-added").unwrap(), None);
}

#[test]
fn entries_preserve_insertion_order() {
    let test = TestRepo::new();
    let catalog = test.init().catalog();
    for name in ["c", "a", "b"] {
        catalog.add(name, &format!("https://x/{name}.tgz"), "none").unwrap();
    }

    let names: Vec<String> = catalog.entries().unwrap().into_iter().map(|e| e.name).collect();
    assert_eq!(names, vec!["c", "a", "b"]);
}

#[test]
fn remove_then_readd_changes_entry() {
    let test = TestRepo::new();
    let catalog = test.init().catalog();
    catalog.add("zlib", "https://old/zlib.tgz", "none").unwrap();

    assert!(catalog.remove("zlib").unwrap());
    catalog.add("zlib", "https://new/zlib.tgz", "none").unwrap();

    assert_eq!(catalog.lookup("zlib").unwrap().unwrap().url, "https://new/zlib.tgz");
}

#[test]
fn remove_rejects_invalid_name() {
    let test = TestRepo::new();
    let catalog = test.init().catalog();
    assert!(matches!(
        catalog.remove("bad name"),
        Err(Error::InvalidName { .. })
    ));
}

#[test]
fn import_failure_on_third_of_five_restores_catalog() {
    let test = TestRepo::new();
    let catalog = test.init().catalog();
    catalog.add("existing", "https://x/existing.tgz", "none").unwrap();
    let before = catalog.raw().unwrap();

    let source = "\
one https://x/1.tgz none
two https://x/2.tgz none
.three https://x/3.tgz none
four https://x/4.tgz none
five https://x/5.tgz none
";
    let err = catalog.import_bulk(source).unwrap_err();

    match err {
        Error::ImportAborted { line, entry, source } => {
            assert_eq!(line, 3);
            assert_eq!(entry, ".three https://x/3.tgz none");
            assert!(matches!(*source, Error::InvalidName { .. }));
        }
        other => panic!("expected ImportAborted, got {other:?}"),
    }
    assert_eq!(catalog.raw().unwrap(), before);
    for name in ["one", "two", "four", "five"] {
        assert_eq!(catalog.lookup(name).unwrap(), None);
    }
}

#[test]
fn import_duplicate_within_source_aborts() {
    let test = TestRepo::new();
    let catalog = test.init().catalog();

    let err = catalog
        .import_bulk("a https://x/a.tgz none\na https://x/b.tgz none\n")
        .unwrap_err();

    assert!(matches!(err, Error::ImportAborted { line: 2, .. }));
    assert_eq!(catalog.raw().unwrap(), "");
}

#[test]
fn import_reports_names_in_order() {
    let test = TestRepo::new();
    let catalog = test.init().catalog();

    let names = catalog
        .import_bulk("# deps\nb https://x/b.tgz none\n\na https://x/a.tgz none\n")
        .unwrap();
    assert_eq!(names, vec!["b", "a"]);
}

#[test]
fn hand_edited_duplicate_is_reported_not_resolved() {
    let test = TestRepo::new();
    let catalog = test.init().catalog();
    catalog.add("zlib", "https://x/a.tgz", "none").unwrap();
    std::fs::write(
        catalog.path(),
        "zlib https://x/a.tgz none\nzlib https://x/b.tgz none\n",
    )
    .unwrap();

    assert!(matches!(
        catalog.lookup("zlib"),
        Err(Error::InconsistentCatalog { .. })
    ));
    assert!(matches!(
        catalog.add("zlib", "https://x/c.tgz", "none"),
        Err(Error::InconsistentCatalog { .. })
    ));
}

#[test]
fn remove_refuses_to_resolve_hand_edited_duplicate() {
    let test = TestRepo::new();
    let catalog = test.init().catalog();
    let corrupted = "zlib https://x/a.tgz none\npcre https://x/p.tgz none\nzlib https://x/b.tgz none\n";
    std::fs::write(catalog.path(), corrupted).unwrap();

    assert!(matches!(
        catalog.remove("zlib"),
        Err(Error::InconsistentCatalog { .. })
    ));
    assert_eq!(catalog.raw().unwrap(), corrupted);
}

#[test]
fn add_after_hand_edit_without_final_newline() {
    let test = TestRepo::new();
    let catalog = test.init().catalog();
    std::fs::write(catalog.path(), "zlib https://x/z.tgz none").unwrap();

    catalog.add("pcre", "https://x/p.tgz", "none").unwrap();

    assert_eq!(
        catalog.raw().unwrap(),
        "zlib https://x/z.tgz none\npcre https://x/p.tgz none\n"
    );
    assert!(catalog.lookup("pcre").unwrap().is_some());
    let names: Vec<_> = catalog.entries().unwrap().into_iter().map(|e| e.name).collect();
    assert_eq!(names, vec!["zlib", "pcre"]);
}

#[test]
fn remove_preserves_crlf_line_endings() {
    let test = TestRepo::new();
    let catalog = test.init().catalog();
    std::fs::write(
        catalog.path(),
        "a https://x/a.tgz none\r\nb https://x/b.tgz none\r\nc https://x/c.tgz none\r\n",
    )
    .unwrap();

    assert!(catalog.remove("b").unwrap());
    assert_eq!(
        catalog.raw().unwrap(),
        "a https://x/a.tgz none\r\nc https://x/c.tgz none\r\n"
    );
    assert_eq!(catalog.lookup("c").unwrap().unwrap().url, "https://x/c.tgz");
}

proptest! {
    #[test]
    fn names_with_forbidden_characters_are_rejected(
        prefix in "[a-z]{0,5}",
        bad in prop::sample::select(vec![" ", "\t", ":"]),
        suffix in "[a-z]{0,5}",
    ) {
        let name = format!("{prefix}{bad}{suffix}");
        prop_assert!(
            matches!(validate_name(&name), Err(Error::InvalidName { .. })),
            "name {:?} should be rejected",
            name
        );
    }

    #[test]
    fn dot_prefixed_names_are_rejected(rest in "[a-z0-9_-]{0,8}") {
        let name = format!(".{rest}");
        prop_assert!(matches!(validate_name(&name), Err(Error::InvalidName { .. })), "name {:?}", name);
    }

    #[test]
    fn plain_names_are_accepted(name in "[a-zA-Z0-9_-][a-zA-Z0-9_.+-]{0,16}") {
        prop_assert!(validate_name(&name).is_ok());
    }
}
