use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing::info;

use crate::cli::DeployArgs;
use crate::util::ensure_directory;

pub fn run(args: DeployArgs) -> Result<()> {
    let copied = copy_dir_recursive(&args.source, &args.target)?;

    info!(
        source = %args.source.display(),
        target = %args.target.display(),
        files = copied,
        "deploy copy completed"
    );
    Ok(())
}

/// Copies everything under `source` into `target`, creating directories as
/// needed and overwriting existing files. Returns the number of files copied.
pub fn copy_dir_recursive(source: &Path, target: &Path) -> Result<usize> {
    if !source.is_dir() {
        bail!("source is not a directory: {}", source.display());
    }

    ensure_directory(target)?;

    let entries =
        fs::read_dir(source).with_context(|| format!("failed to read {}", source.display()))?;

    let mut copied = 0;
    for entry in entries {
        let entry =
            entry.with_context(|| format!("failed to read entry in {}", source.display()))?;
        let source_path = entry.path();
        let target_path = target.join(entry.file_name());

        if entry
            .file_type()
            .with_context(|| format!("failed to inspect file type: {}", source_path.display()))?
            .is_dir()
        {
            copied += copy_dir_recursive(&source_path, &target_path)?;
        } else {
            fs::copy(&source_path, &target_path).with_context(|| {
                format!(
                    "failed to copy {} to {}",
                    source_path.display(),
                    target_path.display()
                )
            })?;
            copied += 1;
        }
    }

    Ok(copied)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copies_nested_tree_and_overwrites() {
        let dir = tempfile::tempdir().expect("tempdir");
        let build = dir.path().join("build");
        let docs = dir.path().join("site").join("docs");

        fs::create_dir_all(build.join("static").join("js")).expect("mkdir");
        fs::write(build.join("index.html"), "<html>v2</html>").expect("write");
        fs::write(build.join("static").join("js").join("main.js"), "v2").expect("write");

        fs::create_dir_all(&docs).expect("mkdir");
        fs::write(docs.join("index.html"), "<html>v1</html>").expect("write");
        fs::write(docs.join("CNAME"), "example.org").expect("write");

        assert_eq!(copy_dir_recursive(&build, &docs).expect("copy"), 2);
        assert_eq!(
            fs::read_to_string(docs.join("index.html")).expect("read"),
            "<html>v2</html>"
        );
        assert_eq!(
            fs::read_to_string(docs.join("static").join("js").join("main.js")).expect("read"),
            "v2"
        );
        assert!(docs.join("CNAME").exists());

        assert_eq!(copy_dir_recursive(&build, &docs).expect("second copy"), 2);
    }

    #[test]
    fn missing_source_fails() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = copy_dir_recursive(&dir.path().join("build"), &dir.path().join("docs"))
            .unwrap_err();

        assert!(err.to_string().contains("source is not a directory"));
        assert!(!dir.path().join("docs").exists());
    }
}
