// ABOUTME: Reconciles a directory of markdown posts against the remote blog
// ABOUTME: Updates posts whose slug exists remotely, creates the rest, never stops on one bad file

use crate::{
    api::PostsApi,
    convert::{from_markdown, DecodeMode},
    storage::{discover_markdown, read_document},
    Error, Result,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Create,
    Update,
}

#[derive(Debug)]
pub struct SyncFailure {
    pub path: PathBuf,
    /// Known once the file decoded.
    pub slug: Option<String>,
    pub error: Error,
}

#[derive(Debug, Default)]
pub struct SyncReport {
    pub created: Vec<String>,
    pub updated: Vec<String>,
    pub failures: Vec<SyncFailure>,
}

impl SyncReport {
    pub fn attempted(&self) -> usize {
        self.created.len() + self.updated.len() + self.failures.len()
    }
}

pub fn classify(slug: &str, remote_slugs: &HashSet<String>) -> Action {
    if remote_slugs.contains(slug) {
        Action::Update
    } else {
        Action::Create
    }
}

/// Pushes every markdown file under `root` to the blog.
///
/// Only listing the remote posts or walking `root` can fail the whole run;
/// per-file problems end up in [`SyncReport::failures`].
pub fn sync_dir(api: &impl PostsApi, root: &Path) -> Result<SyncReport> {
    println!("Fetching post list...");
    let remote_slugs: HashSet<String> = api
        .list_posts()?
        .into_iter()
        .map(|post| post.slug)
        .collect();

    let files = discover_markdown(root)?;
    let mut report = SyncReport::default();

    if files.is_empty() {
        println!("no markdown files have been found in '{}'", root.display());
        return Ok(report);
    }

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{bar:40}] {pos}/{len} posts")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("##-"),
    );

    for path in files {
        match sync_file(api, &path, &remote_slugs) {
            Ok((action, receipt_slug, url)) => {
                let verb = match action {
                    Action::Create => "created",
                    Action::Update => "updated",
                };
                pb.println(format!(
                    "post '{}' on filename '{}' {} successfully: {}",
                    receipt_slug,
                    path.display(),
                    verb,
                    url
                ));
                match action {
                    Action::Create => report.created.push(receipt_slug),
                    Action::Update => report.updated.push(receipt_slug),
                }
            }
            Err(failure) => {
                pb.suspend(|| {
                    warn!(
                        path = %failure.path.display(),
                        slug = failure.slug.as_deref().unwrap_or("-"),
                        "{}",
                        failure.error
                    )
                });
                report.failures.push(failure);
            }
        }
        pb.inc(1);
    }

    pb.finish_with_message(format!(
        "synced {} posts ({} created, {} updated, {} failed)",
        report.attempted(),
        report.created.len(),
        report.updated.len(),
        report.failures.len()
    ));
    info!(
        created = report.created.len(),
        updated = report.updated.len(),
        failed = report.failures.len(),
        "sync finished"
    );

    Ok(report)
}

fn sync_file(
    api: &impl PostsApi,
    path: &Path,
    remote_slugs: &HashSet<String>,
) -> std::result::Result<(Action, String, String), SyncFailure> {
    let fail = |slug: Option<&str>, error: Error| SyncFailure {
        path: path.to_path_buf(),
        slug: slug.map(str::to_string),
        error,
    };

    let post = read_document(path)
        .and_then(|doc| from_markdown(&doc, DecodeMode::Strict))
        .map_err(|e| fail(None, e))?;

    let action = classify(&post.slug, remote_slugs);
    let result = match action {
        Action::Update => api.update_post(&post.slug, &post),
        Action::Create => api.create_post(&post),
    };

    let receipt = result.map_err(|e| fail(Some(&post.slug), e))?;
    let slug = if receipt.slug.is_empty() {
        post.slug
    } else {
        receipt.slug
    };
    Ok((action, slug, receipt.url))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Post, PostReceipt};
    use std::cell::RefCell;
    use std::fs;
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Call {
        List,
        Create(String),
        Update(String),
    }

    #[derive(Default)]
    struct FakeApi {
        remote: Vec<&'static str>,
        fail_list: bool,
        reject_slug: Option<&'static str>,
        calls: RefCell<Vec<Call>>,
    }

    impl FakeApi {
        fn with_remote(remote: Vec<&'static str>) -> Self {
            FakeApi {
                remote,
                ..Default::default()
            }
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.borrow().clone()
        }

        fn receipt(&self, slug: &str) -> Result<PostReceipt> {
            if self.reject_slug == Some(slug) {
                return Err(Error::Logical("rejected".into()));
            }
            Ok(PostReceipt {
                slug: slug.to_string(),
                url: format!("https://blog.example/{}/", slug),
            })
        }
    }

    impl PostsApi for FakeApi {
        fn list_posts(&self) -> Result<Vec<Post>> {
            self.calls.borrow_mut().push(Call::List);
            if self.fail_list {
                return Err(Error::Api {
                    endpoint: "posts".into(),
                    status: 503,
                    message: "unavailable".into(),
                });
            }
            Ok(self
                .remote
                .iter()
                .map(|slug| Post {
                    title: slug.to_string(),
                    slug: slug.to_string(),
                    ..Default::default()
                })
                .collect())
        }

        fn get_post(&self, slug: &str) -> Result<Post> {
            Err(Error::NotFound(slug.into()))
        }

        fn create_post(&self, post: &Post) -> Result<PostReceipt> {
            self.calls.borrow_mut().push(Call::Create(post.slug.clone()));
            self.receipt(&post.slug)
        }

        fn update_post(&self, slug: &str, _post: &Post) -> Result<PostReceipt> {
            self.calls.borrow_mut().push(Call::Update(slug.to_string()));
            self.receipt(slug)
        }

        fn delete_post(&self, slug: &str) -> Result<()> {
            Err(Error::NotFound(slug.into()))
        }
    }

    fn write_post(dir: &Path, name: &str, title: Option<&str>, slug: &str) {
        let title_line = title.map(|t| format!("title: {}\n", t)).unwrap_or_default();
        let content = format!("---\n{}slug: {}\n---\nBody of {}\n", title_line, slug, slug);
        fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn test_classify() {
        let remote: HashSet<String> = ["foo".to_string()].into_iter().collect();
        assert_eq!(classify("foo", &remote), Action::Update);
        assert_eq!(classify("bar", &remote), Action::Create);
    }

    #[test]
    fn test_sync_updates_known_and_creates_new() {
        let temp = TempDir::new().unwrap();
        write_post(temp.path(), "foo.md", Some("Foo"), "foo");
        write_post(temp.path(), "bar.md", Some("Bar"), "bar");

        let api = FakeApi::with_remote(vec!["foo"]);
        let report = sync_dir(&api, temp.path()).unwrap();

        let calls = api.calls();
        assert_eq!(calls[0], Call::List);
        assert_eq!(calls.iter().filter(|c| **c == Call::Update("foo".into())).count(), 1);
        assert_eq!(calls.iter().filter(|c| **c == Call::Create("bar".into())).count(), 1);
        assert_eq!(calls.len(), 3);

        assert_eq!(report.updated, vec!["foo".to_string()]);
        assert_eq!(report.created, vec!["bar".to_string()]);
        assert!(report.failures.is_empty());
    }

    #[test]
    fn test_sync_classification_ignores_discovery_order() {
        let temp = TempDir::new().unwrap();
        write_post(temp.path(), "a_bar.md", Some("Bar"), "bar");
        write_post(temp.path(), "z_foo.md", Some("Foo"), "foo");

        let api = FakeApi::with_remote(vec!["foo"]);
        let report = sync_dir(&api, temp.path()).unwrap();

        assert_eq!(
            api.calls(),
            vec![
                Call::List,
                Call::Create("bar".into()),
                Call::Update("foo".into())
            ]
        );
        assert_eq!(report.created, vec!["bar".to_string()]);
        assert_eq!(report.updated, vec!["foo".to_string()]);
    }

    #[test]
    fn test_sync_continues_past_undecodable_file() {
        let temp = TempDir::new().unwrap();
        write_post(temp.path(), "a_broken.md", None, "broken");
        write_post(temp.path(), "b_good.md", Some("Good"), "good");

        let api = FakeApi::with_remote(vec![]);
        let report = sync_dir(&api, temp.path()).unwrap();

        assert_eq!(api.calls(), vec![Call::List, Call::Create("good".into())]);
        assert_eq!(report.failures.len(), 1);
        let failure = &report.failures[0];
        assert!(failure.path.ends_with("a_broken.md"));
        assert!(failure.slug.is_none());
        assert!(matches!(failure.error, Error::MissingField("title")));
    }

    #[test]
    fn test_sync_requires_slug() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("noslug.md"), "---\ntitle: T\n---\n").unwrap();

        let api = FakeApi::with_remote(vec![]);
        let report = sync_dir(&api, temp.path()).unwrap();

        assert_eq!(api.calls(), vec![Call::List]);
        assert!(matches!(report.failures[0].error, Error::MissingField("slug")));
    }

    #[test]
    fn test_sync_continues_past_rejected_post() {
        let temp = TempDir::new().unwrap();
        write_post(temp.path(), "1.md", Some("One"), "one");
        write_post(temp.path(), "2.md", Some("Two"), "two");

        let api = FakeApi {
            remote: vec!["one"],
            reject_slug: Some("one"),
            ..Default::default()
        };
        let report = sync_dir(&api, temp.path()).unwrap();

        assert_eq!(
            api.calls(),
            vec![
                Call::List,
                Call::Update("one".into()),
                Call::Create("two".into())
            ]
        );
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].slug.as_deref(), Some("one"));
        assert!(matches!(report.failures[0].error, Error::Logical(_)));
        assert_eq!(report.created, vec!["two".to_string()]);
    }

    #[test]
    fn test_sync_list_failure_aborts_before_files() {
        let temp = TempDir::new().unwrap();
        write_post(temp.path(), "foo.md", Some("Foo"), "foo");

        let api = FakeApi {
            fail_list: true,
            ..Default::default()
        };
        let err = sync_dir(&api, temp.path()).unwrap_err();

        assert!(matches!(err, Error::Api { status: 503, .. }));
        assert_eq!(api.calls(), vec![Call::List]);
    }

    #[test]
    fn test_sync_missing_root_is_fatal() {
        let temp = TempDir::new().unwrap();
        let api = FakeApi::with_remote(vec![]);
        let err = sync_dir(&api, &temp.path().join("nope")).unwrap_err();
        assert!(matches!(err, Error::Filesystem(_)));
    }

    #[test]
    fn test_sync_duplicate_slugs_apply_in_order() {
        let temp = TempDir::new().unwrap();
        write_post(temp.path(), "a.md", Some("First"), "same");
        write_post(temp.path(), "b.md", Some("Second"), "same");

        let api = FakeApi::with_remote(vec!["same"]);
        let report = sync_dir(&api, temp.path()).unwrap();

        assert_eq!(
            api.calls(),
            vec![
                Call::List,
                Call::Update("same".into()),
                Call::Update("same".into())
            ]
        );
        assert_eq!(report.updated.len(), 2);
    }

    #[test]
    fn test_sync_empty_directory() {
        let temp = TempDir::new().unwrap();
        let api = FakeApi::with_remote(vec!["foo"]);
        let report = sync_dir(&api, temp.path()).unwrap();
        assert_eq!(report.attempted(), 0);
        assert_eq!(api.calls(), vec![Call::List]);
    }
}
