//! trybuild UI tests for component_macros

#[test]
fn ui_component_macros() {
    let t = trybuild::TestCases::new();
    t.pass("tests/trybuild/component_ok.rs");
    t.pass("tests/trybuild/handler_ok.rs");
}
