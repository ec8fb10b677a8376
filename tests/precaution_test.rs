use serde_json::json;
use tempfile::TempDir;

use dhakhtar::precautions::GENERIC_PRECAUTIONS;
use dhakhtar::{DhakhtarError, MatchKind, PrecautionBook};

#[test]
fn builtin_table_has_exact_entries() {
    let book = PrecautionBook::default();
    assert!(book.len() >= 9);

    let m = book.lookup("Diabetes");
    assert_eq!(m.kind, MatchKind::Exact);
    assert_eq!(m.somali_name(), Some("Sonkorowga"));
    assert!(m.somali_advice().is_some_and(|a| !a.is_empty()));
    assert!(!m.advice().is_empty());
}

#[test]
fn entry_without_somali_text_falls_back_to_translation() {
    let book = PrecautionBook::default();
    let m = book.lookup("Pneumonia");
    assert_eq!(m.kind, MatchKind::Exact);
    assert!(m.somali_advice().is_none());
    assert!(m.somali_name().is_none());
}

#[test]
fn case_differences_resolve_as_partial() {
    let book = PrecautionBook::default();
    let m = book.lookup("malaria");
    assert_eq!(
        m.kind,
        MatchKind::Partial {
            key: "Malaria".into()
        }
    );
    assert_eq!(m.advice(), book.lookup("Malaria").advice());
}

#[test]
fn label_containing_a_key_matches_it() {
    let book = PrecautionBook::default();
    let m = book.lookup("Chronic Bronchitis");
    assert_eq!(
        m.kind,
        MatchKind::Partial {
            key: "Bronchitis".into()
        }
    );
    assert_eq!(m.somali_name(), Some("Burunkiito"));
}

#[test]
fn unknown_label_gets_generic_advice() {
    let book = PrecautionBook::default();
    let m = book.lookup("Dengue Fever");
    assert!(m.is_generic());
    assert!(m.entry.is_none());
    assert_eq!(m.advice().len(), GENERIC_PRECAUTIONS.len());
    assert_eq!(m.advice()[0], GENERIC_PRECAUTIONS[0]);
}

#[test]
fn table_loads_from_json() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("precautions.json");
    let table = json!({
        "diseases": [
            {"disease": "Cholera", "advice": ["Drink oral rehydration solution"]},
            {
                "disease": "Measles",
                "advice": ["Isolate at home"],
                "somali_name": "Jadeeco",
                "somali_advice": ["Guriga joog"]
            }
        ],
        "generic": ["See a doctor"]
    });
    std::fs::write(&path, table.to_string()).unwrap();

    let book = PrecautionBook::load(&path).unwrap();
    assert_eq!(book.len(), 2);
    assert_eq!(book.lookup("Measles").somali_name(), Some("Jadeeco"));
    assert_eq!(
        book.lookup("Measles").somali_advice(),
        Some(&["Guriga joog".to_string()][..])
    );
    assert_eq!(book.lookup("Malaria").advice(), ["See a doctor".to_string()]);
}

#[test]
fn table_without_generic_advice_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("precautions.json");
    std::fs::write(
        &path,
        json!({"diseases": [], "generic": []}).to_string(),
    )
    .unwrap();
    assert!(matches!(
        PrecautionBook::load(&path),
        Err(DhakhtarError::Configuration(_))
    ));
}
