//! Papyrus property declaration extraction
//!
//! Lightweight line-oriented scan for `<Type>[[]] Property <Name>` shapes.
//! This is deliberately not a Papyrus parser: unmatched lines are skipped,
//! trailing modifiers (Auto, Const, ...) are ignored, and malformed-but-
//! readable content simply yields fewer declarations.

use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::{BindError, Result};
use crate::types::PropertyDeclaration;

fn declaration_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Matches e.g.:
    //   "Keyword Property LocTypeInn Auto"
    //   "GlobalVariable Property ModEnabled Auto Const"
    //   "Keyword[] Property AllKeywords Auto"
    // The type is optional: an indented bare "Property Foo" still extracts,
    // with an empty type, and is skipped as primitive at fill time.
    RE.get_or_init(|| Regex::new(r"(?mi)^\s*(\w+(?:\[\])?)?\s+property\s+(\w+)").unwrap())
}

/// Extract property declarations from Papyrus source text, in file order.
/// Duplicates are kept; de-duplication happens at bind time via upsert.
pub fn extract_declarations(source: &str) -> Vec<PropertyDeclaration> {
    let mut declarations = Vec::new();

    for caps in declaration_re().captures_iter(source) {
        let type_str = caps.get(1).map_or("", |m| m.as_str());
        let name = &caps[2];

        let is_array = type_str.ends_with("[]");
        let type_name = type_str.trim_end_matches("[]");

        declarations.push(PropertyDeclaration {
            name: name.to_string(),
            type_name: type_name.to_string(),
            is_array,
        });
    }

    tracing::debug!("Extracted {} property declaration(s)", declarations.len());
    declarations
}

/// Extract property declarations from a Papyrus source file.
/// An unreadable file is a configuration error; malformed content is not.
pub fn extract_from_file(path: &Path) -> Result<Vec<PropertyDeclaration>> {
    if !path.exists() {
        return Err(BindError::config_with(
            format!("Script source not found: {}", path.display()),
            None,
            &[
                "Ensure the script source file exists",
                "Check the --script-dir path is correct",
            ],
        ));
    }
    let content = std::fs::read_to_string(path)?;
    Ok(extract_declarations(&content))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_scalar_declarations_in_order() {
        let source = "Keyword Property LocTypeInn Auto\nInt Property Counter Auto\n";
        let decls = extract_declarations(source);
        assert_eq!(decls.len(), 2);
        assert_eq!(decls[0].name, "LocTypeInn");
        assert_eq!(decls[0].type_name, "Keyword");
        assert!(!decls[0].is_array);
        assert_eq!(decls[1].name, "Counter");
        assert_eq!(decls[1].type_name, "Int");
    }

    #[test]
    fn test_array_suffix_is_stripped() {
        let decls = extract_declarations("GlobalVariable[] Property AllGlobals Auto\n");
        assert_eq!(decls.len(), 1);
        assert_eq!(decls[0].type_name, "GlobalVariable");
        assert!(decls[0].is_array);
    }

    #[test]
    fn test_keyword_is_case_insensitive_and_modifiers_ignored() {
        let source = "quest PROPERTY MainQuest auto const hidden\n";
        let decls = extract_declarations(source);
        assert_eq!(decls.len(), 1);
        assert_eq!(decls[0].name, "MainQuest");
        assert_eq!(decls[0].type_name, "quest");
    }

    #[test]
    fn test_unmatched_lines_are_skipped() {
        let source = "Scriptname MyScript extends Quest\n\
                      ; a comment\n\
                      Event OnInit()\n\
                      EndEvent\n\
                      Keyword Property K1 Auto\n";
        let decls = extract_declarations(source);
        assert_eq!(decls.len(), 1);
        assert_eq!(decls[0].name, "K1");
    }

    #[test]
    fn test_untyped_declaration_extracts_with_empty_type() {
        let decls = extract_declarations("  Property Mystery Auto\n");
        assert_eq!(decls.len(), 1);
        assert_eq!(decls[0].name, "Mystery");
        assert_eq!(decls[0].type_name, "");
        assert!(!decls[0].is_array);
    }

    #[test]
    fn test_duplicates_are_kept() {
        let source = "Keyword Property K1 Auto\nKeyword Property K1 Auto\n";
        assert_eq!(extract_declarations(source).len(), 2);
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = extract_from_file(&dir.path().join("Missing.psc")).unwrap_err();
        assert!(matches!(err, BindError::Config { .. }));
        assert!(!err.suggestions().is_empty());
    }

    #[test]
    fn test_readable_file_extracts() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("MyScript.psc");
        std::fs::write(&path, "Faction Property BanditFaction Auto\n").unwrap();
        let decls = extract_from_file(&path).unwrap();
        assert_eq!(decls[0].name, "BanditFaction");
    }
}
