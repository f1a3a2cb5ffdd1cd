use yaml_surgeon::{ScanConfig, SurgeonError, YamlOperation};

const BREAKFAST: &str = "
            - spam:
                - egg: true
                - ham:
                    # Lovely
                    - spam
                - bacon: [egg, spam]
            - sausage:
                - bacon: [egg, spam]
                - beans: {spam: spam}";

#[test]
fn test_chained_duplicates() {
    let output = YamlOperation::new(BREAKFAST)
        .unwrap()
        .named("bacon")
        .with_parents("spam")
        .duplicate_as("can")
        .unwrap()
        .then()
        .unwrap()
        .named("egg")
        .with_parents("can")
        .duplicate_as("spam")
        .unwrap()
        .execute()
        .join("\n");
    let expected = "
            - spam:
                - egg: true
                - ham:
                    # Lovely
                    - spam
                - bacon: [egg, spam]
                - can: [egg, spam, spam]
            - sausage:
                - bacon: [egg, spam]
                - beans: {spam: spam}";
    assert_eq!(output, expected);
}

#[test]
fn test_next_stage_sees_new_nodes() {
    let op = YamlOperation::new("a: 1\n")
        .unwrap()
        .named("a")
        .insert_sibling("b")
        .unwrap()
        .then()
        .unwrap()
        .named("b");
    assert_eq!(op.selected_nodes().len(), 1);
    assert_eq!(op.selected_nodes()[0].start_line(), 2);
}

#[test]
fn test_stage_without_mutation_passes_text_through() {
    let mut op = YamlOperation::new(BREAKFAST)
        .unwrap()
        .named("egg")
        .then()
        .unwrap();
    assert_eq!(op.render(), BREAKFAST);
}

#[test]
fn test_one_mutation_per_stage() {
    let err = YamlOperation::new(BREAKFAST)
        .unwrap()
        .named("egg")
        .delete()
        .unwrap()
        .rename("toast")
        .unwrap_err();
    assert!(matches!(err, SurgeonError::AmbiguousMutation { .. }));
    assert_eq!(
        err.to_string(),
        "Ambiguous mutation: cannot rename after delete in the same stage"
    );
}

#[test]
fn test_permissive_stages() {
    let input = "a:\n    b: 1\n  c: 2\n";
    assert!(YamlOperation::new(input).is_err());
    let output = YamlOperation::with_config(input, ScanConfig::permissive())
        .unwrap()
        .named("c")
        .rename("d")
        .unwrap()
        .then()
        .unwrap()
        .render();
    assert_eq!(output, "a:\n    b: 1\n  d: 2\n");
}
