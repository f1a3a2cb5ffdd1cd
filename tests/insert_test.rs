use rstest::rstest;
use yaml_surgeon::YamlOperation;

fn insert(input: &str, name: &str, sibling: &str) -> String {
    YamlOperation::new(input)
        .unwrap()
        .named(name)
        .insert_sibling(sibling)
        .unwrap()
        .execute()
        .join("\n")
}

#[rstest]
#[case::sequence_entry(
    "
            - parent1:
                - srv-100",
    "srv-100",
    "srv-200",
    "
            - parent1:
                - srv-100
                - srv-200"
)]
#[case::after_entry_subtree(
    "
            - parent1:
                - srv-100:
                    fast: true",
    "srv-100",
    "srv-200",
    "
            - parent1:
                - srv-100:
                    fast: true
                - srv-200"
)]
#[case::mapping_key(
    "
            - parent1:
                - srv-100:
                    fast: true",
    "fast",
    "slow",
    "
            - parent1:
                - srv-100:
                    fast: true
                    slow:"
)]
fn test_insert_block(
    #[case] input: &str,
    #[case] name: &str,
    #[case] sibling: &str,
    #[case] expected: &str,
) {
    assert_eq!(insert(input, name, sibling), expected);
}

#[rstest]
#[case::flow_sequence(
    "- bacon: [egg, spam]",
    "spam",
    "ham",
    "- bacon: [egg, spam, ham]"
)]
#[case::flow_mapping_key(
    "- bacon: {egg: spam} # Hello",
    "egg",
    "ham",
    "- bacon: {egg: spam, ham:} # Hello"
)]
#[case::sequence_inside_mapping(
    "- bacon: {egg: [spam, ham]}",
    "ham",
    "can",
    "- bacon: {egg: [spam, ham, can]}"
)]
#[case::flow_mapping_key_with_nested_sequence(
    "- bacon: {egg: [spam, ham]}",
    "egg",
    "can",
    "- bacon: {egg: [spam, ham], can:}"
)]
#[case::scalar_value_becomes_sequence(
    "- bacon: egg",
    "egg",
    "spam",
    "- bacon: [egg, spam]"
)]
#[case::flow_mapping_value_becomes_sequence(
    "- bacon: {egg: spam}",
    "spam",
    "ham",
    "- bacon: {egg: [spam, ham]}"
)]
fn test_insert_flow(
    #[case] input: &str,
    #[case] name: &str,
    #[case] sibling: &str,
    #[case] expected: &str,
) {
    let input = format!("- sausage:\n    {input}");
    let expected = format!("- sausage:\n    {expected}");
    assert_eq!(insert(&input, name, sibling), expected);
}

#[test]
fn test_insert_after_every_match() {
    let input = "a:\n  - x\nb:\n  - x\n";
    let output = YamlOperation::new(input)
        .unwrap()
        .named("x")
        .insert_sibling("y")
        .unwrap()
        .render();
    assert_eq!(output, "a:\n  - x\n  - y\nb:\n  - x\n  - y\n");
}
