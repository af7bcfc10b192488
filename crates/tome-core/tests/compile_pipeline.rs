//! End-to-end tests for the HTML compilation pipeline.

use chrono::NaiveDate;
use tome_core::{
    Author, DocumentOptions, Error, ModuleLibrary, ModuleType, compile_html,
};

fn options() -> DocumentOptions {
    DocumentOptions {
        title: "Calculus I".to_string(),
        generated_on: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
    }
}

fn ids(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn library(modules: &[(&str, &str, ModuleType, &str)]) -> ModuleLibrary {
    let mut lib = ModuleLibrary::new();
    for (id, title, module_type, markdown) in modules {
        lib.create_module(*id, *title, *module_type, Author::new("u1", "Ada"), *markdown)
            .unwrap();
    }
    lib
}

#[test]
fn test_independent_modules_in_request_order() {
    let lib = library(&[
        ("limits", "Limits", ModuleType::Definition, "# Limits\n\n## Epsilon"),
        ("derivs", "Derivatives", ModuleType::Explanation, "# Derivatives"),
        ("ex1", "Worked Example", ModuleType::Example, "### Setup"),
    ]);
    let snapshot = lib.snapshot(&ids(&["ex1", "limits", "derivs"])).unwrap();
    let doc = compile_html(&snapshot, &options()).unwrap();

    assert_eq!(doc.html.matches("<section class=\"module\"").count(), 3);
    let ex1 = doc.html.find("id=\"module-ex1\"").unwrap();
    let limits = doc.html.find("id=\"module-limits\"").unwrap();
    let derivs = doc.html.find("id=\"module-derivs\"").unwrap();
    assert!(ex1 < limits && limits < derivs);

    for text in ["Setup", "Limits", "Epsilon", "Derivatives", "Worked Example"] {
        assert!(doc.html.contains(&format!("\">{text}</a></li>")), "missing TOC entry {text}");
    }
    assert!(!doc.html.contains("@module:"));
}

#[test]
fn test_reference_to_compiled_module_is_linked() {
    let lib = library(&[
        ("A", "Chain Rule", ModuleType::Proof, "Follows from @module:B."),
        ("B", "Limits", ModuleType::Definition, "Body"),
    ]);
    let snapshot = lib.snapshot(&ids(&["A", "B"])).unwrap();
    let doc = compile_html(&snapshot, &options()).unwrap();

    assert!(doc.html.contains(
        r##"<a href="#module-B" class="module-reference" data-module-type="definition">Limits</a>"##
    ));
    assert!(doc.html.contains("id=\"module-B\""));
}

#[test]
fn test_reference_to_uncompiled_module_uses_its_title() {
    let lib = library(&[
        ("A", "Chain Rule", ModuleType::Proof, "See @module:B."),
        ("B", "Limits", ModuleType::Definition, "Body"),
    ]);
    let snapshot = lib.snapshot(&ids(&["A"])).unwrap();
    let doc = compile_html(&snapshot, &options()).unwrap();

    assert!(doc.html.contains(r##"href="#module-B""##));
    assert!(doc.html.contains(">Limits</a>"));
}

#[test]
fn test_dangling_reference_left_unchanged() {
    let lib = library(&[("A", "Chain Rule", ModuleType::Proof, "See @module:Z for details.")]);
    let snapshot = lib.snapshot(&ids(&["A"])).unwrap();
    let doc = compile_html(&snapshot, &options()).unwrap();

    assert!(doc.html.contains("@module:Z"));
    assert!(!doc.html.contains("module-reference\""));
}

#[test]
fn test_mutual_references_fail_with_path() {
    let lib = library(&[
        ("A", "A", ModuleType::Example, "@module:B"),
        ("B", "B", ModuleType::Example, "@module:A"),
    ]);
    let snapshot = lib.snapshot(&ids(&["A", "B"])).unwrap();
    let err = compile_html(&snapshot, &options()).unwrap_err();

    match err {
        Error::CyclicDependency { path } => assert_eq!(path, ids(&["A", "B", "A"])),
        other => panic!("expected cycle, got {other:?}"),
    }
}

#[test]
fn test_cycle_outside_requested_set_is_not_checked() {
    // Only requested modules contribute adjacency.
    let lib = library(&[
        ("A", "A", ModuleType::Example, "@module:B"),
        ("B", "B", ModuleType::Example, "@module:A"),
    ]);
    let snapshot = lib.snapshot(&ids(&["A"])).unwrap();
    assert!(compile_html(&snapshot, &options()).is_ok());
}

#[test]
fn test_self_reference_fails() {
    let lib = library(&[("A", "A", ModuleType::Example, "Uses @module:A")]);
    let snapshot = lib.snapshot(&ids(&["A"])).unwrap();
    let err = compile_html(&snapshot, &options()).unwrap_err();
    assert_eq!(err.cycle_path().unwrap(), ids(&["A", "A"]).as_slice());
}

#[test]
fn test_heading_ids_are_sequential_and_linked() {
    let lib = library(&[
        ("a", "First", ModuleType::Explanation, "# One\n\n## Two\n\n### Three"),
        ("b", "Second", ModuleType::Explanation, "## Four\n\n# Five"),
    ]);
    let snapshot = lib.snapshot(&ids(&["a", "b"])).unwrap();
    let doc = compile_html(&snapshot, &options()).unwrap();

    assert_eq!(doc.heading_count, 7);
    for n in 0..doc.heading_count {
        assert_eq!(doc.html.matches(&format!("id=\"heading-{n}\"")).count(), 1);
        assert_eq!(doc.html.matches(&format!("href=\"#heading-{n}\"")).count(), 1);
    }
}

#[test]
fn test_empty_request_compiles_empty_page() {
    let doc = compile_html(&[], &options()).unwrap();
    assert_eq!(doc.module_count, 0);
    assert!(doc.html.contains("<title>Calculus I</title>"));
    assert!(doc.html.contains("Generated on September 1, 2026"));
    assert!(!doc.html.contains("<nav"));
}
