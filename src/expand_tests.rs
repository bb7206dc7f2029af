use crate::{
    expand::{normalize, root_token, PathExpander, PATH_VARIABLES},
    Error,
};

#[test]
fn builtins_expand_to_root_tokens() {
    let expander = PathExpander::new();

    assert_eq!(
        expander.expand("$(PROGRAMS)\\Demo\\demo.exe").unwrap(),
        "%CE1%\\Demo\\demo.exe"
    );
    assert_eq!(expander.expand("$(startmenu)\\Demo.lnk").unwrap(), "%CE17%\\Demo.lnk");
    assert_eq!(expander.expand("\\Temp\\plain").unwrap(), "\\Temp\\plain");
}

#[test]
fn every_builtin_has_a_distinct_root() {
    let expander = PathExpander::new();
    for (index, &(name, root, _)) in PATH_VARIABLES.iter().enumerate() {
        assert_eq!(usize::from(root), index + 1);
        assert_eq!(expander.get(name), Some(root_token(root).as_str()));
    }
}

#[test]
fn user_variables_build_on_earlier_ones() {
    let mut expander = PathExpander::new();
    expander.define("INSTALLDIR", "$(PROGRAMS)/Demo").unwrap();
    expander.define("DATA", "$(INSTALLDIR)\\data").unwrap();

    assert_eq!(expander.expand("$(DATA)\\a.txt").unwrap(), "%CE1%\\Demo\\data\\a.txt");
    assert_eq!(
        expander.expand("$(INSTALLDIR)/$(INSTALLDIR)").unwrap(),
        "%CE1%\\Demo\\%CE1%\\Demo"
    );
}

#[test]
fn unknown_variable_fails() {
    let expander = PathExpander::new();

    let err = expander.expand("$(NOWHERE)\\demo.exe").unwrap_err();

    assert!(matches!(err, Error::UnknownPathVariable(name) if name == "NOWHERE"));
}

#[test]
fn slashes_become_separators() {
    assert_eq!(normalize("a/b/c"), "a\\b\\c");
    assert_eq!(normalize("a\\b"), "a\\b");
}
