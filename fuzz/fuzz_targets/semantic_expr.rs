#![no_main]

use libfuzzer_sys::fuzz_target;

use semtypes::semantic::expr::parse_semantic_expr;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(t) = parse_semantic_expr(text) {
        // Every base name round-trips through the parser.
        assert_eq!(parse_semantic_expr(t.name()).ok(), Some(t.base()));
    }
});
