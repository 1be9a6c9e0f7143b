//! Classification of a pull request's changed files.
//!
//! Everything here is a pure function over already-materialized inputs: no
//! I/O, no logging, no hidden state. The same inputs always produce the same
//! decision.
//!
//! ```text
//! Start → scope check ─fail→ OutOfScope
//!             │pass
//!             ▼
//!         classify ─none→ NoMatch
//!             │category
//!             ▼
//!     detect submission → Labeled
//! ```

use serde::Serialize;

use crate::config::Configuration;
use crate::glob::Glob;
use crate::model::{Category, ChangeStatus, ChangedFile};

/// The category chosen for a file set, and whether it starts a submission.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ClassificationResult {
    /// `None` when no category explains every file.
    pub category: Option<String>,
    pub is_new_submission: bool,
}

/// Outcome of the whole decision pipeline.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "kebab-case")]
pub enum Decision {
    /// Some files lie outside the configured root; nothing is labeled.
    OutOfScope {
        /// The offending paths.
        paths: Vec<String>,
    },
    /// No single category explains every changed file.
    NoMatch,
    /// Exactly one category was chosen.
    Labeled {
        category: String,
        new_submission: bool,
    },
}

impl From<ClassificationResult> for Decision {
    /// Lift an in-scope classification into a decision.
    fn from(result: ClassificationResult) -> Self {
        match result.category {
            Some(category) => Self::Labeled {
                category,
                new_submission: result.is_new_submission,
            },
            None => Self::NoMatch,
        }
    }
}

/// Find the first category, in declaration order, whose composed pattern
/// matches every file and whose author folder is shared by every file.
///
/// Overlapping categories are not detected: the earliest declared one wins.
/// Returns `None` for an empty file list.
#[must_use]
pub fn classify<'a>(files: &[ChangedFile], categories: &'a [Category]) -> Option<&'a Category> {
    if files.is_empty() {
        return None;
    }
    categories.iter().find(|category| {
        files
            .iter()
            .all(|file| category.file_pattern().matches(&file.path))
            && same_directory(files, category)
    })
}

/// Check that every file agrees with the first one on the leading
/// [`Category::prefix_len`] path segments.
///
/// Segments past the prefix are free, so one author may touch any number of
/// files in their own subtree. A path shorter than the prefix only agrees
/// with another path missing the same segments.
#[must_use]
pub fn same_directory(files: &[ChangedFile], category: &Category) -> bool {
    let Some((reference, rest)) = files.split_first() else {
        return true;
    };
    let len = category.prefix_len();
    let reference: Vec<&str> = reference.path.split('/').collect();

    rest.iter().all(|file| {
        let segments: Vec<&str> = file.path.split('/').collect();
        (0..len).all(|i| segments.get(i) == reference.get(i))
    })
}

/// `true` if some file was added (not merely modified) and matches the
/// category's marker pattern.
#[must_use]
pub fn is_new_submission(files: &[ChangedFile], category: &Category) -> bool {
    files.iter().any(|file| {
        file.status == ChangeStatus::Added && category.marker_pattern().matches(&file.path)
    })
}

/// `true` if every file matches the allowed root.
#[must_use]
pub fn all_in_scope(files: &[ChangedFile], allowed_root: &Glob) -> bool {
    files.iter().all(|file| allowed_root.matches(&file.path))
}

/// Paths that fall outside the allowed root.
#[must_use]
pub fn out_of_scope<'a>(files: &'a [ChangedFile], allowed_root: &Glob) -> Vec<&'a str> {
    files
        .iter()
        .filter(|file| !allowed_root.matches(&file.path))
        .map(|file| file.path.as_str())
        .collect()
}

/// Classify and, on a match, detect a new submission.
#[must_use]
pub fn evaluate(files: &[ChangedFile], categories: &[Category]) -> ClassificationResult {
    match classify(files, categories) {
        Some(category) => ClassificationResult {
            category: Some(category.name().to_owned()),
            is_new_submission: is_new_submission(files, category),
        },
        None => ClassificationResult::default(),
    }
}

/// Run the full decision: scope check, classification, submission detection.
#[must_use]
pub fn decide(files: &[ChangedFile], config: &Configuration) -> Decision {
    if !all_in_scope(files, config.scope()) {
        let paths = out_of_scope(files, config.scope())
            .into_iter()
            .map(str::to_owned)
            .collect();
        return Decision::OutOfScope { paths };
    }

    evaluate(files, config.categories()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    const AUTHOR: &str = "+([a-zA-Z])?(-+([a-zA-Z]))";

    fn categories() -> Vec<Category> {
        vec![
            Category::new("essay", "demo/contributions/essay/", AUTHOR, "**", "README.md").unwrap(),
            Category::new(
                "presentation",
                "demo/contributions/presentation/week[1-9]/",
                AUTHOR,
                "**",
                "README.md",
            )
            .unwrap(),
            Category::new("demo", "demo/contributions/demo/", AUTHOR, "*", "README.md").unwrap(),
        ]
    }

    fn category(name: &str) -> Category {
        categories()
            .into_iter()
            .find(|c| c.name() == name)
            .unwrap()
    }

    // -- same_directory --

    #[test]
    fn has_same_directory() {
        let files = [
            ChangedFile::added("demo/contributions/presentation/week2/siper/README.md"),
            ChangedFile::modified("demo/contributions/presentation/week2/siper/SAMPLE.md"),
        ];
        assert!(same_directory(&files, &category("presentation")));
    }

    #[test]
    fn has_different_directories() {
        let files = [
            ChangedFile::added("demo/contributions/presentation/week2/siper/README.md"),
            ChangedFile::modified("demo/contributions/presentation/week2/touma/SAMPLE.md"),
            ChangedFile::modified("demo/contributions/presentation/week9/touma/SAMPLE.md"),
        ];
        assert!(!same_directory(&files, &category("presentation")));
    }

    #[test]
    fn different_prefix_directory() {
        let files = [
            ChangedFile::added("demo/contributions/presentation/week2/siper/README.md"),
            ChangedFile::added("demo/contributions/presentation/week9/siper/README.md"),
        ];
        assert!(!same_directory(&files, &category("presentation")));
    }

    #[test]
    fn single_and_empty_inputs_are_consistent() {
        let one = [ChangedFile::added("anything/at/all")];
        assert!(same_directory(&one, &category("essay")));
        assert!(same_directory(&[], &category("essay")));
    }

    #[test]
    fn short_paths_compare_missing_segments() {
        let c = category("essay");
        let files = [ChangedFile::modified("demo/x"), ChangedFile::modified("demo/x")];
        assert!(same_directory(&files, &c));
        let files = [ChangedFile::modified("demo/x"), ChangedFile::modified("demo/x/y/z")];
        assert!(!same_directory(&files, &c));
    }

    // -- classify --

    #[test]
    fn multiple_directories_changed_is_no_match() {
        let files = [
            ChangedFile::added("demo/contributions/presentation/week2/siper/README.md"),
            ChangedFile::modified("demo/contributions/presentation/week9/siper/README.md"),
        ];
        assert!(classify(&files, &categories()).is_none());
    }

    #[test]
    fn same_directory_presentation() {
        let files = [
            ChangedFile::added("demo/contributions/presentation/week2/siper/README.md"),
            ChangedFile::modified("demo/contributions/presentation/week2/siper/Hello.md"),
        ];
        let cats = categories();
        assert_eq!(classify(&files, &cats).map(Category::name), Some("presentation"));
    }

    #[test]
    fn different_authors_in_one_week_is_no_match() {
        let files = [
            ChangedFile::added("demo/contributions/presentation/week2/siper/README.md"),
            ChangedFile::modified("demo/contributions/presentation/week2/touma/SAMPLE.md"),
        ];
        assert!(classify(&files, &categories()).is_none());
    }

    #[test]
    fn single_segment_suffix_rejects_subdirectories() {
        let files = [
            ChangedFile::added("demo/contributions/demo/siper/README.md"),
            ChangedFile::modified("demo/contributions/demo/siper/test/Hello.md"),
        ];
        assert!(classify(&files, &categories()).is_none());
    }

    #[test]
    fn globstar_suffix_allows_subdirectories() {
        let files = [
            ChangedFile::added("demo/contributions/essay/siper/README.md"),
            ChangedFile::modified("demo/contributions/essay/siper/test/Hello.md"),
        ];
        let cats = categories();
        assert_eq!(classify(&files, &cats).map(Category::name), Some("essay"));
    }

    #[test]
    fn empty_file_list_is_no_match() {
        assert!(classify(&[], &categories()).is_none());
    }

    #[test]
    fn overlapping_categories_first_declared_wins() {
        let broad = Category::new("anything", "demo/contributions/essay/", "*", "**", "README.md")
            .unwrap();
        let narrow = category("essay");
        let files = [ChangedFile::modified("demo/contributions/essay/siper/ESSAY.md")];

        let cats = [broad.clone(), narrow.clone()];
        assert_eq!(classify(&files, &cats).map(Category::name), Some("anything"));
        let cats = [narrow, broad];
        assert_eq!(classify(&files, &cats).map(Category::name), Some("essay"));
    }

    #[test]
    fn failing_category_falls_through_to_next() {
        // `demo` rejects the nested file, a later catch-all accepts it.
        let cats = [
            category("demo"),
            Category::new("demo-deep", "demo/contributions/demo/", AUTHOR, "**", "README.md")
                .unwrap(),
        ];
        let files = [
            ChangedFile::added("demo/contributions/demo/siper/README.md"),
            ChangedFile::modified("demo/contributions/demo/siper/test/Hello.md"),
        ];
        assert_eq!(classify(&files, &cats).map(Category::name), Some("demo-deep"));
    }

    // -- is_new_submission --

    #[test]
    fn only_modified_marker_is_not_new() {
        let files = [
            ChangedFile::modified("demo/contributions/essay/siper/README.md"),
            ChangedFile::modified("demo/contributions/essay/siper/ESSAY.md"),
        ];
        assert!(!is_new_submission(&files, &category("essay")));
    }

    #[test]
    fn added_marker_is_new() {
        let files = [
            ChangedFile::added("demo/contributions/essay/siper/README.md"),
            ChangedFile::modified("demo/contributions/essay/siper/ESSAY.md"),
        ];
        assert!(is_new_submission(&files, &category("essay")));
    }

    #[test]
    fn no_marker_file_is_not_new() {
        let files = [
            ChangedFile::added("demo/contributions/essay/siper/HELLO.md"),
            ChangedFile::modified("demo/contributions/essay/siper/ESSAY.md"),
        ];
        assert!(!is_new_submission(&files, &category("essay")));
    }

    #[test]
    fn nested_marker_is_not_the_submission_marker() {
        let files = [ChangedFile::added("demo/contributions/essay/siper/docs/README.md")];
        assert!(!is_new_submission(&files, &category("essay")));
    }

    // -- scope and evaluate --

    #[test]
    fn scope_guard_reports_offending_paths() {
        let scope = Glob::new("demo/contributions/**").unwrap();
        let files = [
            ChangedFile::modified("demo/contributions/essay/siper/ESSAY.md"),
            ChangedFile::modified(".github/workflows/ci.yml"),
        ];
        assert!(!all_in_scope(&files, &scope));
        assert_eq!(out_of_scope(&files, &scope), [".github/workflows/ci.yml"]);
        assert!(all_in_scope(&files[..1], &scope));
    }

    #[test]
    fn evaluate_combines_category_and_marker() {
        let files = [
            ChangedFile::added("demo/contributions/presentation/week2/siper/README.md"),
            ChangedFile::modified("demo/contributions/presentation/week2/siper/SAMPLE.md"),
        ];
        let result = evaluate(&files, &categories());
        assert_eq!(
            result,
            ClassificationResult {
                category: Some("presentation".to_owned()),
                is_new_submission: true,
            }
        );
        assert_eq!(evaluate(&[], &categories()), ClassificationResult::default());
    }

    #[test]
    fn classification_lifts_into_decision() {
        let labeled = Decision::from(ClassificationResult {
            category: Some("essay".to_owned()),
            is_new_submission: true,
        });
        assert_eq!(
            labeled,
            Decision::Labeled {
                category: "essay".to_owned(),
                new_submission: true,
            }
        );
        assert_eq!(Decision::from(ClassificationResult::default()), Decision::NoMatch);
    }

    #[test]
    fn in_scope_decision_follows_evaluate() {
        let config = Configuration::parse(
            r"
dir: 'demo/contributions/**'
categories:
  presentation:
    glob: demo/contributions/presentation/week[1-9]/
    folder: '+([a-zA-Z])?(-+([a-zA-Z]))'
    suffix: '**'
    proposal: README.md
",
        )
        .unwrap();
        let new_talk = [
            ChangedFile::added("demo/contributions/presentation/week2/siper/README.md"),
            ChangedFile::modified("demo/contributions/presentation/week2/siper/SAMPLE.md"),
        ];
        let two_authors = [
            ChangedFile::added("demo/contributions/presentation/week2/siper/README.md"),
            ChangedFile::added("demo/contributions/presentation/week2/touma/README.md"),
        ];
        for files in [&new_talk[..], &two_authors[..], &[]] {
            assert_eq!(
                decide(files, &config),
                Decision::from(evaluate(files, config.categories()))
            );
        }
        assert_eq!(
            decide(&new_talk, &config),
            Decision::Labeled {
                category: "presentation".to_owned(),
                new_submission: true,
            }
        );
    }

    #[test]
    fn decision_serializes_with_outcome_tag() {
        let json = serde_json::to_value(Decision::Labeled {
            category: "essay".to_owned(),
            new_submission: true,
        })
        .unwrap();
        assert_eq!(json["outcome"], "labeled");
        assert_eq!(json["category"], "essay");
        assert_eq!(json["new_submission"], true);
    }
}
