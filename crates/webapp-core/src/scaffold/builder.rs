//! Creates the project directory tree

use crate::error::ScaffoldError;
use crate::integrations::{IntegrationSet, ProjectDescriptor};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

const MAIN_SCRIPT: &str = "// Application scripts\n";
const MAIN_STYLE: &str = "/* Application styles */\n";

/// Create a directory, treating "already exists" as success
async fn create_dir(path: &Path) -> Result<(), ScaffoldError> {
    match fs::create_dir(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::AlreadyExists && path.is_dir() => Ok(()),
        Err(source) => Err(ScaffoldError::CreateDir {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Recursively remove whatever exists at `path`
async fn clear(path: &Path) -> Result<(), ScaffoldError> {
    let metadata = match fs::symlink_metadata(path).await {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
        Err(source) => {
            return Err(ScaffoldError::Clear {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let removed = if metadata.is_dir() {
        fs::remove_dir_all(path).await
    } else {
        fs::remove_file(path).await
    };

    removed.map_err(|source| ScaffoldError::Clear {
        path: path.to_path_buf(),
        source,
    })
}

/// Main stylesheet name for the selected integrations
pub fn main_style_name(integrations: &IntegrationSet) -> &'static str {
    if integrations.uses_sass() {
        "main.scss"
    } else {
        "main.css"
    }
}

/// Build `<project>/{temp,scripts,styles}` plus the placeholder main script and stylesheet
///
/// An existing destination is removed first, including unrelated content.
/// Returns the created entries relative to the project root.
pub async fn build_scaffold(
    project: &ProjectDescriptor,
    integrations: &IntegrationSet,
) -> Result<Vec<PathBuf>, ScaffoldError> {
    let root = project.destination_path();

    clear(root).await?;
    create_dir(root).await?;

    let mut created = Vec::new();
    for dir in ["temp", "scripts", "styles"] {
        create_dir(&root.join(dir)).await?;
        created.push(PathBuf::from(dir));
    }

    let placeholders = [
        (Path::new("scripts").join("main.js"), MAIN_SCRIPT),
        (
            Path::new("styles").join(main_style_name(integrations)),
            MAIN_STYLE,
        ),
    ];

    for (relative, content) in placeholders {
        let path = root.join(&relative);
        fs::write(&path, content)
            .await
            .map_err(|source| ScaffoldError::Write { path, source })?;
        created.push(relative);
    }

    Ok(created)
}

/// Make sure the main stylesheet the build pipeline reads exists in a project created earlier
///
/// A Sass pipeline added to a CSS project gets `main.scss` seeded from
/// `main.css`. Returns the created file relative to the project root.
pub async fn ensure_main_style(
    project: &ProjectDescriptor,
    integrations: &IntegrationSet,
) -> Result<Option<PathBuf>, ScaffoldError> {
    let styles = project.styles_dir();
    let name = main_style_name(integrations);
    let path = styles.join(name);
    if path.is_file() {
        return Ok(None);
    }

    create_dir(&styles).await?;
    let content = if integrations.uses_sass() {
        fs::read_to_string(styles.join("main.css"))
            .await
            .unwrap_or_else(|_| MAIN_STYLE.to_string())
    } else {
        MAIN_STYLE.to_string()
    };
    fs::write(&path, content)
        .await
        .map_err(|source| ScaffoldError::Write { path, source })?;

    Ok(Some(Path::new("styles").join(name)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integrations::Integration;

    #[tokio::test]
    async fn test_fresh_scaffold_tree() {
        let temp = tempfile::tempdir().unwrap();
        let project = ProjectDescriptor::new("acme", temp.path()).unwrap();

        let created = build_scaffold(&project, &IntegrationSet::new()).await.unwrap();

        let root = project.destination_path();
        for dir in ["temp", "scripts", "styles"] {
            assert!(root.join(dir).is_dir(), "{} missing", dir);
        }
        assert!(root.join("scripts/main.js").is_file());
        assert!(root.join("styles/main.css").is_file());
        assert!(!root.join("styles/main.scss").exists());
        assert_eq!(created.len(), 5);

        let entries: Vec<_> = std::fs::read_dir(root)
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(entries.len(), 3);
    }

    #[tokio::test]
    async fn test_sass_selects_scss_exclusively() {
        let temp = tempfile::tempdir().unwrap();
        let project = ProjectDescriptor::new("demo", temp.path()).unwrap();
        let integrations: IntegrationSet = [Integration::Sass].into_iter().collect();

        build_scaffold(&project, &integrations).await.unwrap();

        let styles = project.styles_dir();
        assert!(styles.join("main.scss").is_file());
        assert!(!styles.join("main.css").exists());
    }

    #[tokio::test]
    async fn test_existing_directory_is_emptied() {
        let temp = tempfile::tempdir().unwrap();
        let project = ProjectDescriptor::new("acme", temp.path()).unwrap();
        let root = project.destination_path();
        std::fs::create_dir_all(root.join("old/nested")).unwrap();
        std::fs::write(root.join("old/nested/notes.txt"), "keep me?").unwrap();
        std::fs::write(root.join("README.md"), "stale").unwrap();

        build_scaffold(&project, &IntegrationSet::new()).await.unwrap();

        assert!(!root.join("old").exists());
        assert!(!root.join("README.md").exists());
        assert!(root.join("scripts/main.js").is_file());
    }

    #[tokio::test]
    async fn test_existing_file_at_destination_is_replaced() {
        let temp = tempfile::tempdir().unwrap();
        let project = ProjectDescriptor::new("acme", temp.path()).unwrap();
        std::fs::write(project.destination_path(), "not a directory").unwrap();

        build_scaffold(&project, &IntegrationSet::new()).await.unwrap();

        assert!(project.destination_path().is_dir());
    }

    #[tokio::test]
    async fn test_missing_parent_fails_loudly() {
        let temp = tempfile::tempdir().unwrap();
        let project = ProjectDescriptor::new("acme", &temp.path().join("does/not/exist")).unwrap();

        let err = build_scaffold(&project, &IntegrationSet::new())
            .await
            .unwrap_err();

        assert!(matches!(err, ScaffoldError::CreateDir { .. }));
    }

    #[tokio::test]
    async fn test_sass_pipeline_seeds_scss_from_css() {
        let temp = tempfile::tempdir().unwrap();
        let project = ProjectDescriptor::new("acme", temp.path()).unwrap();
        std::fs::create_dir_all(project.styles_dir()).unwrap();
        std::fs::write(project.styles_dir().join("main.css"), "body { margin: 0; }\n").unwrap();
        let sass: IntegrationSet = [Integration::Sass].into_iter().collect();

        let created = ensure_main_style(&project, &sass).await.unwrap();
        assert_eq!(created, Some(PathBuf::from("styles/main.scss")));
        assert_eq!(
            std::fs::read_to_string(project.styles_dir().join("main.scss")).unwrap(),
            "body { margin: 0; }\n"
        );
        assert!(project.styles_dir().join("main.css").is_file());

        assert_eq!(ensure_main_style(&project, &sass).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_existing_css_is_left_alone() {
        let temp = tempfile::tempdir().unwrap();
        let project = ProjectDescriptor::new("acme", temp.path()).unwrap();
        std::fs::create_dir_all(project.styles_dir()).unwrap();
        std::fs::write(project.styles_dir().join("main.css"), "a {}").unwrap();
        let plain: IntegrationSet = [Integration::Gulp].into_iter().collect();

        assert_eq!(ensure_main_style(&project, &plain).await.unwrap(), None);
        assert_eq!(
            std::fs::read_to_string(project.styles_dir().join("main.css")).unwrap(),
            "a {}"
        );
    }
}
