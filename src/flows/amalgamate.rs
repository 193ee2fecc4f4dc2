//! Amalgamator - fold each implementation file into its same-named header
//!
//! For `dir/foo.cpp` with a sibling `dir/foo.hpp`:
//! - includes in foo.cpp naming `foo.hpp` are commented out
//! - foo.cpp is appended to foo.hpp inside `#ifndef FOO_CPP_INCLUDED` and
//!   `#ifdef <TOGGLE>` blocks
//! - foo.cpp is deleted
//!
//! There is no detection of earlier runs: a header that already carries a
//! merged block gets a second one if a same-named source file reappears.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::backends::walk::for_each_file;
use crate::core::config::AmalgamConfig;
use crate::core::error::{AmalgamError, Result};
use crate::core::model::{Kind, Meta, ResultItem, ResultSet};
use crate::core::paths::{absolutize, file_name_of, make_relative};
use crate::core::util::{normalize_line_endings, read_text_file, write_text_file};

/// Any include directive; the capture runs to the last delimiter on the line
static INCLUDE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"#include\s+["<]([^\r\n]*)[">]"#).expect("Invalid INCLUDE_RE regex")
});

/// An implementation file together with the header it merges into
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pair {
    pub source: PathBuf,
    pub header: PathBuf,
}

impl Pair {
    /// Pair `source` with its header if it has the source extension and the
    /// header exists right now
    pub fn find(source: &Path, config: &AmalgamConfig) -> Option<Self> {
        let header = header_for(source, config)?;
        header.is_file().then(|| Self {
            source: source.to_path_buf(),
            header,
        })
    }

    fn source_name(&self) -> String {
        file_name(&self.source)
    }

    fn header_name(&self) -> String {
        file_name(&self.header)
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// `dir/foo.cpp` -> `dir/foo.hpp`; None if the name lacks the source extension
pub fn header_for(source: &Path, config: &AmalgamConfig) -> Option<PathBuf> {
    let name = source.file_name()?.to_str()?;
    let stem = name.strip_suffix(&format!(".{}", config.source_ext))?;
    Some(source.with_file_name(format!("{}.{}", stem, config.header_ext)))
}

/// `catch_approx.hpp` -> `CATCH_APPROX_CPP_INCLUDED`
///
/// Everything from the first '.' of the file name on is dropped.
pub fn guard_identifier(header_name: &str, config: &AmalgamConfig) -> String {
    let stem = header_name.split('.').next().unwrap_or(header_name);
    format!("{}{}", stem.to_uppercase(), config.guard_suffix)
}

/// Comment out includes whose final path segment is `header_name`.
///
/// Returns the new text and how many directives were disabled.
pub fn disable_self_includes(
    text: &str,
    header_name: &str,
    config: &AmalgamConfig,
) -> (String, usize) {
    let comment = config.self_include_comment();
    let mut count = 0;
    let disabled = INCLUDE_RE.replace_all(text, |caps: &Captures| {
        if file_name_of(&caps[1]) == header_name {
            count += 1;
            format!("// {} {}", &caps[0], comment)
        } else {
            caps[0].to_string()
        }
    });
    (disabled.into_owned(), count)
}

/// Trim whitespace and byte order marks from both ends
pub fn trim_text(text: &str) -> &str {
    text.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
}

/// Header text with the wrapped implementation appended
pub fn merge_texts(
    header_text: &str,
    source_text: &str,
    source_name: &str,
    guard: &str,
    config: &AmalgamConfig,
) -> String {
    let toggle = &config.toggle_macro;
    let tag = &config.tag;
    let mut merged = String::with_capacity(header_text.len() + source_text.len() + 512);

    merged.push_str(trim_text(header_text));
    merged.push_str("\n\n\n\n");
    merged.push_str(&format!(
        "// BEGIN Amalgamated content from {} ({})\n",
        source_name, tag
    ));
    merged.push_str(&format!("#ifndef {}\n", guard));
    merged.push_str(&format!("#define {}\n", guard));
    merged.push_str(&format!("#ifdef {}\n", toggle));
    merged.push_str(trim_text(source_text));
    merged.push('\n');
    merged.push_str(&format!("#endif // {}\n", toggle));
    merged.push_str(&format!("#endif // {}\n", guard));
    merged.push_str(&format!(
        "// END Amalgamated content from {} ({})\n",
        source_name, tag
    ));
    merged
}

/// Outcome of merging one pair
#[derive(Debug, Clone)]
pub struct Merged {
    /// Header bytes as written (or as they would be on a dry run)
    pub bytes: Vec<u8>,
    pub guard: String,
    pub disabled_includes: usize,
}

/// Write the merged header, then delete the source.
///
/// A failed write leaves the source alone; a failed delete leaves both files,
/// the header already merged.
pub fn commit(pair: &Pair, merged: &str) -> Result<Vec<u8>> {
    let bytes = write_text_file(&pair.header, merged)?;
    fs::remove_file(&pair.source).map_err(|e| AmalgamError::deletion(&pair.source, e))?;
    Ok(bytes)
}

/// Merge one pair: rewrite the header, then delete the source
pub fn amalgamate_pair(pair: &Pair, config: &AmalgamConfig) -> Result<Merged> {
    let header_name = pair.header_name();
    let source_text = read_text_file(&pair.source)?;
    let header_text = read_text_file(&pair.header)?;

    let (source_text, disabled) = disable_self_includes(&source_text, &header_name, config);
    let guard = guard_identifier(&header_name, config);
    let merged = merge_texts(
        &header_text,
        &source_text,
        &pair.source_name(),
        &guard,
        config,
    );

    let bytes = if config.dry_run {
        normalize_line_endings(&merged).into_bytes()
    } else {
        commit(pair, &merged)?
    };

    Ok(Merged {
        bytes,
        guard,
        disabled_includes: disabled,
    })
}

/// Merge every implementation file under `root` into its header
pub fn amalgamate(root: &Path, config: &AmalgamConfig) -> Result<ResultSet> {
    let root = absolutize(root).map_err(|e| AmalgamError::directory(root, e))?;
    let mut results = ResultSet::new();

    for_each_file(&root, |path| {
        if header_for(path, config).is_none() {
            return Ok(());
        }
        let relative = make_relative(path, &root).unwrap_or_default();

        let Some(pair) = Pair::find(path, config) else {
            debug!(path = %relative, "no header, leaving in place");
            results.push(ResultItem::skip(relative, "no header"));
            return Ok(());
        };

        let merged = amalgamate_pair(&pair, config)?;
        let header = make_relative(&pair.header, &root).unwrap_or_default();
        debug!(source = %relative, header = %header, guard = %merged.guard, "amalgamated");
        results.push(
            ResultItem::amalgamate(header, relative, &merged.guard, merged.disabled_includes)
                .with_meta(Meta::for_bytes(&merged.bytes, config.dry_run)),
        );
        Ok(())
    })?;

    info!(
        root = %root.display(),
        merged = results.count(Kind::Amalgamate),
        skipped = results.count(Kind::Skip),
        dry_run = config.dry_run,
        "amalgamation pass complete"
    );
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn config() -> AmalgamConfig {
        AmalgamConfig::default()
    }

    fn write_file(path: &Path, content: &str) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_header_for() {
        assert_eq!(
            header_for(Path::new("/lib/a/foo.cpp"), &config()),
            Some(PathBuf::from("/lib/a/foo.hpp"))
        );
        assert_eq!(header_for(Path::new("/lib/a/foo.hpp"), &config()), None);
        assert_eq!(header_for(Path::new("/lib/a/foo.cppx"), &config()), None);
    }

    #[test]
    fn test_guard_identifier() {
        assert_eq!(guard_identifier("foo.hpp", &config()), "FOO_CPP_INCLUDED");
        assert_eq!(
            guard_identifier("catch_approx.hpp", &config()),
            "CATCH_APPROX_CPP_INCLUDED"
        );
        assert_eq!(guard_identifier("a.b.hpp", &config()), "A_CPP_INCLUDED");
    }

    #[test]
    fn test_disable_self_includes_only_touches_own_header() {
        let text = "#include \"foo.hpp\"  // Adjust to relative path (amalgamate)\n#include \"../b/bar.hpp\"\n#include <vector>\n";
        let (out, count) = disable_self_includes(text, "foo.hpp", &config());
        assert_eq!(count, 1);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(
            lines[0],
            "// #include \"foo.hpp\" // Disable self-include (amalgamate)  // Adjust to relative path (amalgamate)"
        );
        assert_eq!(lines[1], "#include \"../b/bar.hpp\"");
        assert_eq!(lines[2], "#include <vector>");
    }

    #[test]
    fn test_disable_self_include_matches_final_segment() {
        let (out, count) =
            disable_self_includes("#include <catch2/a/foo.hpp>", "foo.hpp", &config());
        assert_eq!(count, 1);
        assert!(out.starts_with("// #include <catch2/a/foo.hpp> // Disable self-include"));
    }

    #[test]
    fn test_merge_texts_layout() {
        let merged = merge_texts(
            "class Foo {};\n\n",
            "\nvoid Foo::run(){}\n",
            "foo.cpp",
            "FOO_CPP_INCLUDED",
            &config(),
        );
        let expected = "class Foo {};\n\n\n\n\
// BEGIN Amalgamated content from foo.cpp (amalgamate)\n\
#ifndef FOO_CPP_INCLUDED\n\
#define FOO_CPP_INCLUDED\n\
#ifdef CATCH2_IMPLEMENTATION\n\
void Foo::run(){}\n\
#endif // CATCH2_IMPLEMENTATION\n\
#endif // FOO_CPP_INCLUDED\n\
// END Amalgamated content from foo.cpp (amalgamate)\n";
        assert_eq!(merged, expected);
    }

    #[test]
    fn test_merge_texts_drops_byte_order_marks() {
        let merged = merge_texts(
            "\u{feff}class Foo {};\n",
            "\u{feff}void f(){}\n",
            "foo.cpp",
            "FOO_CPP_INCLUDED",
            &config(),
        );
        assert!(!merged.contains('\u{feff}'));
        assert!(merged.starts_with("class Foo {};\n"));
        assert!(merged.contains("#ifdef CATCH2_IMPLEMENTATION\nvoid f(){}\n#endif"));
    }

    #[test]
    fn test_trim_text() {
        assert_eq!(trim_text(" \u{feff}\n x \n\u{feff}"), "x");
        assert_eq!(trim_text("a \u{feff} b"), "a \u{feff} b");
    }

    #[test]
    fn test_commit_write_failure_keeps_source() {
        let temp = tempdir().unwrap();
        let source = temp.path().join("foo.cpp");
        let header = temp.path().join("foo.hpp");
        write_file(&source, "void f(){}");
        // A directory in place of the header cannot be written, even by root.
        fs::create_dir(&header).unwrap();

        let pair = Pair {
            source: source.clone(),
            header: header.clone(),
        };
        let err = commit(&pair, "merged").unwrap_err();
        assert_eq!(err.code(), "FILE_IO");
        assert!(header.is_dir());
        assert_eq!(fs::read_to_string(&source).unwrap(), "void f(){}");
    }

    #[test]
    fn test_commit_delete_failure_leaves_header_merged() {
        let temp = tempdir().unwrap();
        let source = temp.path().join("foo.cpp");
        let header = temp.path().join("foo.hpp");
        write_file(&header, "class Foo {};");
        // A non-empty directory in place of the source cannot be unlinked.
        write_file(&source.join("keep.txt"), "x");

        let pair = Pair {
            source: source.clone(),
            header: header.clone(),
        };
        let err = commit(&pair, "class Foo {};\n// merged\n").unwrap_err();
        assert_eq!(err.code(), "DELETION_FAILED");
        assert!(fs::read_to_string(&header).unwrap().contains("// merged"));
        assert!(source.join("keep.txt").exists());
    }

    #[test]
    fn test_amalgamate_pair_on_disk() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        write_file(&root.join("a/foo.hpp"), "class Foo {};");
        write_file(&root.join("a/foo.cpp"), "#include \"foo.hpp\"\nvoid Foo::run(){}");

        let results = amalgamate(root, &config()).unwrap();
        assert_eq!(results.len(), 1);
        let item = &results.items[0];
        assert_eq!(item.kind, Kind::Amalgamate);
        assert_eq!(item.path.as_deref(), Some("a/foo.hpp"));
        assert_eq!(item.data_count("disabled_includes"), Some(1));

        assert!(!root.join("a/foo.cpp").exists());
        let header = fs::read_to_string(root.join("a/foo.hpp")).unwrap();
        assert_eq!(header.matches("void Foo::run(){}").count(), 1);
        assert!(header.contains("#ifndef FOO_CPP_INCLUDED"));
        assert!(header.contains("// #include \"foo.hpp\" // Disable self-include (amalgamate)"));
        assert_eq!(item.meta.size, Some(header.len() as u64));
    }

    #[test]
    fn test_unpaired_source_left_alone() {
        let temp = tempdir().unwrap();
        let main = temp.path().join("internal/catch_main.cpp");
        write_file(&main, "int main() {}\n");

        let results = amalgamate(temp.path(), &config()).unwrap();
        assert_eq!(results.count(Kind::Skip), 1);
        assert_eq!(
            results.items[0].path.as_deref(),
            Some("internal/catch_main.cpp")
        );
        assert_eq!(fs::read_to_string(&main).unwrap(), "int main() {}\n");
    }

    #[test]
    fn test_second_run_is_noop_once_sources_are_gone() {
        let temp = tempdir().unwrap();
        write_file(&temp.path().join("foo.hpp"), "class Foo {};");
        write_file(&temp.path().join("foo.cpp"), "void f(){}");

        amalgamate(temp.path(), &config()).unwrap();
        let once = fs::read_to_string(temp.path().join("foo.hpp")).unwrap();
        let results = amalgamate(temp.path(), &config()).unwrap();
        assert!(results.is_empty());
        assert_eq!(fs::read_to_string(temp.path().join("foo.hpp")).unwrap(), once);
    }

    #[test]
    fn test_reappearing_source_is_appended_again() {
        let temp = tempdir().unwrap();
        write_file(&temp.path().join("foo.hpp"), "class Foo {};");
        write_file(&temp.path().join("foo.cpp"), "void f(){}");
        amalgamate(temp.path(), &config()).unwrap();

        write_file(&temp.path().join("foo.cpp"), "void f(){}");
        amalgamate(temp.path(), &config()).unwrap();
        let header = fs::read_to_string(temp.path().join("foo.hpp")).unwrap();
        assert_eq!(header.matches("#ifndef FOO_CPP_INCLUDED").count(), 2);
    }

    #[test]
    fn test_dry_run_keeps_tree() {
        let temp = tempdir().unwrap();
        write_file(&temp.path().join("foo.hpp"), "class Foo {};");
        write_file(&temp.path().join("foo.cpp"), "void f(){}");

        let results = amalgamate(temp.path(), &config().with_dry_run(true)).unwrap();
        assert_eq!(results.count(Kind::Amalgamate), 1);
        assert!(results.items[0].meta.dry_run);
        assert!(temp.path().join("foo.cpp").exists());
        assert_eq!(
            fs::read_to_string(temp.path().join("foo.hpp")).unwrap(),
            "class Foo {};"
        );
    }

    #[test]
    fn test_custom_extensions_and_toggle() {
        let temp = tempdir().unwrap();
        write_file(&temp.path().join("x.h"), "int x();");
        write_file(&temp.path().join("x.cc"), "#include \"x.h\"\nint x() { return 1; }");
        let config = AmalgamConfig {
            source_ext: "cc".to_string(),
            header_ext: "h".to_string(),
            toggle_macro: "LIB_IMPL".to_string(),
            ..AmalgamConfig::default()
        };

        amalgamate(temp.path(), &config).unwrap();
        let header = fs::read_to_string(temp.path().join("x.h")).unwrap();
        assert!(header.contains("#ifdef LIB_IMPL"));
        assert!(header.contains("#ifndef X_CPP_INCLUDED"));
        assert!(header.contains("// #include \"x.h\" // Disable self-include"));
        assert!(!temp.path().join("x.cc").exists());
    }
}
