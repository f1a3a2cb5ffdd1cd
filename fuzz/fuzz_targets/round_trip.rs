#![no_main]

use libfuzzer_sys::fuzz_target;
use yaml_surgeon::{Document, ScanConfig, YamlOperation};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    // Skip extremely large inputs to avoid timeout
    if text.len() > 1_000_000 {
        return;
    }

    // Whatever scans must render back byte for byte
    if let Ok(doc) = Document::parse_with_config(text, ScanConfig::permissive()) {
        assert_eq!(doc.to_string(), text);

        // Mutations must never panic, whatever they select
        if let Some(name) = doc.descendants().next().map(|node| node.name().to_string()) {
            let op = YamlOperation::from_document(doc);
            let _ = op.clone().named(name.as_str()).delete().map(|mut op| op.render());
            let _ = op.named(name.as_str()).insert_sibling("x").map(|mut op| op.render());
        }
    }
});
