#![no_main]

use std::path::PathBuf;

use libfuzzer_sys::fuzz_target;

use semtypes::adapter::json::JsonAdapter;
use semtypes::adapter::{LanguageAdapter, flatten};
use semtypes::syntax::SourceFile;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(adapter) = JsonAdapter::new() else {
        return;
    };
    let tree = adapter.parse(SourceFile::from_string(
        PathBuf::from("fuzz.json"),
        text.to_string(),
    ));
    let rows = flatten(&tree, &adapter);
    for row in &rows {
        if let Some(parent) = row.parent_id {
            assert!(parent < row.node_id);
        }
    }
});
