#![no_main]

use libfuzzer_sys::fuzz_target;

use semtypes::def_file::parse_def_source;
use semtypes::render::render_language;
use semtypes::validate::validate;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let parsed = parse_def_source("fuzz_types.def", text);
    let _ = validate(&parsed.doc);
    let page = render_language(&parsed.doc);
    assert!(page.ends_with("*Generated from `fuzz_types.def`*\n"));
});
