//! Runnable examples: `func ExampleXxx()` in `_test.go` files.

use super::source::SourceFile;
use crate::model::{Example, ExampleCode};

const PREFIX: &str = "Example";

/// Collect examples from test files, sorted by name.
pub fn read_examples(files: &[SourceFile]) -> Vec<Example> {
    let mut examples = Vec::new();
    for file in files.iter().filter(|f| f.is_test()) {
        for decl in file.decls("function_declaration") {
            let Some(name) = decl.child_by_field_name("name").map(|n| file.text(n)) else {
                continue;
            };
            if !is_example_name(name) {
                continue;
            }
            // examples take no arguments and return nothing
            let takes_params = decl
                .child_by_field_name("parameters")
                .is_some_and(|p| p.named_child_count() > 0);
            if takes_params
                || decl.child_by_field_name("result").is_some()
                || decl.child_by_field_name("type_parameters").is_some()
            {
                continue;
            }
            let Some(body) = decl.child_by_field_name("body") else {
                continue;
            };
            examples.push(Example {
                name: name[PREFIX.len()..].to_string(),
                code: ExampleCode {
                    body: file.span(body.start_byte(), body.end_byte()),
                },
            });
        }
    }
    examples.sort_by(|a, b| a.name.cmp(&b.name));
    examples
}

/// `Example`, `ExampleFoo`, `Example_suffix` but not `Examples`.
fn is_example_name(name: &str) -> bool {
    let Some(rest) = name.strip_prefix(PREFIX) else {
        return false;
    };
    rest.chars().next().map_or(true, |c| !c.is_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::fileset::FileSet;
    use crate::analysis::source::new_parser;

    #[test]
    fn example_names() {
        assert!(is_example_name("Example"));
        assert!(is_example_name("ExampleStack_Push"));
        assert!(is_example_name("Example_second"));
        assert!(!is_example_name("Examples"));
        assert!(!is_example_name("TestExample"));
    }

    #[test]
    fn reads_examples_from_test_files() {
        let mut parser = new_parser().unwrap();
        let mut fset = FileSet::default();
        let src = "package x_test\n\nfunc ExampleNew() {\n\t// make one\n\tx.New()\n}\n\nfunc Example() {}\n\nfunc ExampleBad(t int) {}\n";
        let file = SourceFile::parse(&mut parser, &mut fset, "x_test.go", src.to_string()).unwrap();
        let examples = read_examples(&[file]);
        let names: Vec<_> = examples.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["", "New"]);
        assert_eq!(
            fset.text(examples[1].code.body),
            Some("{\n\t// make one\n\tx.New()\n}")
        );
    }
}
