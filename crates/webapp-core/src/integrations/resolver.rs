//! Turns raw prompt answers into a project descriptor and an integration set

use super::catalog::Integration;
use crate::error::ScaffoldError;
use std::collections::BTreeSet;
use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::str::FromStr;

/// Project name used when the user leaves the name empty
pub const DEFAULT_PROJECT_NAME: &str = "my-html5-webapp";

/// Build pipeline flavor chosen by the user
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum BuildTool {
    /// No build pipeline
    #[default]
    #[value(alias = "no")]
    None,
    /// Gulp without pre-processor or transpiler
    #[value(alias = "yes")]
    Plain,
    /// Gulp with the Sass pre-processor
    Sass,
    /// Gulp with the Babel transpiler
    Babel,
}

impl BuildTool {
    pub fn display_name(&self) -> &'static str {
        match self {
            BuildTool::None => "No build pipeline",
            BuildTool::Plain => "Gulp",
            BuildTool::Sass => "Gulp with Sass",
            BuildTool::Babel => "Gulp with Babel",
        }
    }

    /// Integrations this flavor contributes to the set
    pub fn integrations(&self) -> &'static [Integration] {
        match self {
            BuildTool::None => &[],
            BuildTool::Plain => &[Integration::Gulp],
            BuildTool::Sass => &[Integration::Gulp, Integration::Sass],
            BuildTool::Babel => &[Integration::Gulp, Integration::Babel],
        }
    }
}

impl FromStr for BuildTool {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "no" | "none" => Ok(BuildTool::None),
            "yes" | "plain" | "gulp" => Ok(BuildTool::Plain),
            "sass" | "scss" => Ok(BuildTool::Sass),
            "babel" => Ok(BuildTool::Babel),
            other => Err(format!("Unknown build tool: {}", other)),
        }
    }
}

/// Items offered in the additional-libraries multi-select
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum Library {
    Jquery,
    Modernizr,
    #[value(alias = "slick")]
    SlickCarousel,
}

impl Library {
    pub const ALL: [Library; 3] = [Library::Jquery, Library::Modernizr, Library::SlickCarousel];

    pub fn integration(&self) -> Integration {
        match self {
            Library::Jquery => Integration::Jquery,
            Library::Modernizr => Integration::Modernizr,
            Library::SlickCarousel => Integration::SlickCarousel,
        }
    }
}

impl fmt::Display for Library {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.integration().display_name())
    }
}

/// Raw answers collected from prompts or command-line flags
#[derive(Debug, Clone, Default)]
pub struct Answers {
    pub name: Option<String>,
    pub bootstrap: bool,
    pub barbajs: bool,
    pub build_tool: BuildTool,
    pub libraries: Vec<Library>,
}

/// How library packages reach the project
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Fetched into the scratch directory and copied from there
    Direct,
    /// Forwarded to the generated package.json and fetched by the build pipeline install
    BuildPipeline,
}

/// Deduplicated set of selected integrations
///
/// Inserting Bootstrap always inserts jQuery as well.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntegrationSet {
    items: BTreeSet<Integration>,
}

impl IntegrationSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, integration: Integration) {
        self.items.insert(integration);
        if integration == Integration::Bootstrap {
            self.items.insert(Integration::Jquery);
        }
    }

    /// Set holding exactly `integrations`, without adding jQuery for Bootstrap
    ///
    /// Only for describing what actually ended up in a project.
    pub(crate) fn exact(integrations: impl IntoIterator<Item = Integration>) -> Self {
        Self {
            items: integrations.into_iter().collect(),
        }
    }

    pub fn contains(&self, integration: Integration) -> bool {
        self.items.contains(&integration)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = Integration> + '_ {
        self.items.iter().copied()
    }

    /// Integrations with copyable assets, in catalog order
    pub fn libraries(&self) -> Vec<Integration> {
        self.iter().filter(|i| i.is_library()).collect()
    }

    /// Package names to fetch for the library integrations
    pub fn packages(&self) -> Vec<String> {
        self.libraries()
            .iter()
            .map(|i| i.entry().package_name.to_string())
            .collect()
    }

    pub fn uses_sass(&self) -> bool {
        self.contains(Integration::Sass)
    }

    pub fn delivery(&self) -> Delivery {
        if self.contains(Integration::Gulp) {
            Delivery::BuildPipeline
        } else {
            Delivery::Direct
        }
    }

    /// Names for display, in catalog order
    pub fn display_names(&self) -> Vec<&'static str> {
        self.iter().map(|i| i.display_name()).collect()
    }
}

impl FromIterator<Integration> for IntegrationSet {
    fn from_iter<T: IntoIterator<Item = Integration>>(iter: T) -> Self {
        let mut set = IntegrationSet::new();
        for integration in iter {
            set.insert(integration);
        }
        set
    }
}

/// Name and location of the project being generated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDescriptor {
    name: String,
    destination_path: PathBuf,
}

impl ProjectDescriptor {
    /// The project lives in a directory named after it under `destination_root`
    ///
    /// The name must be a single plain path segment so the destination can
    /// never resolve outside `destination_root`.
    pub fn new(name: impl Into<String>, destination_root: &Path) -> Result<Self, ScaffoldError> {
        let name = name.into();
        validate_name(&name)?;
        let destination_path = destination_root.join(&name);
        Ok(Self {
            name,
            destination_path,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn destination_path(&self) -> &Path {
        &self.destination_path
    }

    pub fn scratch_dir(&self) -> PathBuf {
        self.destination_path.join("temp")
    }

    pub fn scripts_dir(&self) -> PathBuf {
        self.destination_path.join("scripts")
    }

    pub fn styles_dir(&self) -> PathBuf {
        self.destination_path.join("styles")
    }
}

fn validate_name(name: &str) -> Result<(), ScaffoldError> {
    let invalid = |reason| ScaffoldError::InvalidName {
        name: name.to_string(),
        reason,
    };

    if name.trim().is_empty() {
        return Err(invalid("the name is empty"));
    }
    if name.contains('/') || name.contains('\\') {
        return Err(invalid("the name must not contain path separators"));
    }

    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(invalid("the name must be a plain directory name")),
    }
}

/// Normalize a project name answer, falling back to the default
pub fn project_name(answer: Option<&str>) -> Result<String, ScaffoldError> {
    let name = match answer.map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => DEFAULT_PROJECT_NAME.to_string(),
    };
    validate_name(&name)?;
    Ok(name)
}

/// Resolve answers into the project descriptor and integration set
pub fn resolve(
    answers: &Answers,
    destination_root: &Path,
) -> Result<(ProjectDescriptor, IntegrationSet), ScaffoldError> {
    let name = project_name(answers.name.as_deref())?;
    let project = ProjectDescriptor::new(name, destination_root)?;

    let mut integrations = IntegrationSet::new();

    for integration in answers.build_tool.integrations() {
        integrations.insert(*integration);
    }

    if answers.bootstrap {
        integrations.insert(Integration::Bootstrap);
    }

    if answers.barbajs {
        integrations.insert(Integration::Barbajs);
    }

    for library in &answers.libraries {
        integrations.insert(library.integration());
    }

    Ok((project, integrations))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root() -> PathBuf {
        PathBuf::from("/work")
    }

    #[test]
    fn test_bootstrap_implies_jquery() {
        let answers = Answers {
            bootstrap: true,
            ..Default::default()
        };
        let (_, set) = resolve(&answers, &root()).unwrap();
        assert!(set.contains(Integration::Bootstrap));
        assert!(set.contains(Integration::Jquery));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_explicit_jquery_with_bootstrap_is_not_duplicated() {
        let answers = Answers {
            bootstrap: true,
            libraries: vec![Library::Jquery, Library::Jquery],
            ..Default::default()
        };
        let (_, set) = resolve(&answers, &root()).unwrap();
        assert_eq!(set.libraries(), vec![Integration::Jquery, Integration::Bootstrap]);
    }

    #[test]
    fn test_set_invariant_holds_for_every_construction() {
        let set: IntegrationSet = [Integration::Bootstrap, Integration::Sass].into_iter().collect();
        assert!(set.contains(Integration::Jquery));

        let mut set = IntegrationSet::new();
        set.insert(Integration::Bootstrap);
        assert!(set.contains(Integration::Jquery));
    }

    #[test]
    fn test_empty_answers_resolve_to_empty_set() {
        let (project, set) = resolve(&Answers::default(), &root()).unwrap();
        assert!(set.is_empty());
        assert_eq!(project.name(), DEFAULT_PROJECT_NAME);
        assert_eq!(project.destination_path(), Path::new("/work/my-html5-webapp"));
        assert_eq!(set.delivery(), Delivery::Direct);
    }

    #[test]
    fn test_blank_name_falls_back_to_default() {
        assert_eq!(project_name(Some("   ")).unwrap(), DEFAULT_PROJECT_NAME);
        assert_eq!(project_name(Some(" demo ")).unwrap(), "demo");
        assert_eq!(project_name(None).unwrap(), DEFAULT_PROJECT_NAME);
    }

    #[test]
    fn test_names_escaping_the_root_are_rejected() {
        for name in ["..", ".", "a/b", "../sibling", "/home/me", "a\\b", "site/"] {
            let err = project_name(Some(name)).unwrap_err();
            assert!(
                matches!(err, ScaffoldError::InvalidName { .. }),
                "{} should be rejected",
                name
            );
            assert!(ProjectDescriptor::new(name, &root()).is_err());
        }
        assert!(ProjectDescriptor::new("  ", &root()).is_err());
        assert!(ProjectDescriptor::new("my.site", &root()).is_ok());
    }

    #[test]
    fn test_parent_name_leaves_surrounding_files_alone() {
        let temp = tempfile::tempdir().unwrap();
        let work = temp.path().join("work");
        std::fs::create_dir(&work).unwrap();
        std::fs::write(temp.path().join("precious.txt"), "keep").unwrap();

        let answers = Answers {
            name: Some("..".to_string()),
            bootstrap: true,
            ..Default::default()
        };
        assert!(resolve(&answers, &work).is_err());
        assert!(temp.path().join("precious.txt").exists());
        assert!(work.is_dir());
    }

    #[test]
    fn test_acme_scenario() {
        let answers = Answers {
            name: Some("acme".to_string()),
            bootstrap: true,
            build_tool: "no".parse().unwrap(),
            barbajs: false,
            libraries: vec![],
        };
        let (project, set) = resolve(&answers, &root()).unwrap();
        assert_eq!(project.name(), "acme");
        let expected: IntegrationSet = [Integration::Jquery, Integration::Bootstrap]
            .into_iter()
            .collect();
        assert_eq!(set, expected);
        assert_eq!(project.scratch_dir(), PathBuf::from("/work/acme/temp"));
    }

    #[test]
    fn test_build_tool_flavors() {
        let answers = Answers {
            build_tool: BuildTool::Sass,
            ..Default::default()
        };
        let (_, set) = resolve(&answers, &root()).unwrap();
        assert!(set.contains(Integration::Gulp));
        assert!(set.uses_sass());
        assert_eq!(set.delivery(), Delivery::BuildPipeline);

        let answers = Answers {
            build_tool: BuildTool::Babel,
            ..Default::default()
        };
        let (_, set) = resolve(&answers, &root()).unwrap();
        assert!(set.contains(Integration::Babel));
        assert!(!set.uses_sass());
    }

    #[test]
    fn test_packages_exclude_tooling() {
        let answers = Answers {
            bootstrap: true,
            barbajs: true,
            build_tool: BuildTool::Babel,
            libraries: vec![Library::SlickCarousel, Library::Modernizr],
            ..Default::default()
        };
        let (_, set) = resolve(&answers, &root()).unwrap();
        assert_eq!(
            set.packages(),
            vec!["jquery", "bootstrap", "barba.js", "modernizr", "slick-carousel"]
        );
    }

    #[test]
    fn test_parse_build_tool() {
        assert_eq!("no".parse::<BuildTool>(), Ok(BuildTool::None));
        assert_eq!("".parse::<BuildTool>(), Ok(BuildTool::None));
        assert_eq!("Sass".parse::<BuildTool>(), Ok(BuildTool::Sass));
        assert_eq!("yes".parse::<BuildTool>(), Ok(BuildTool::Plain));
        assert!("webpack".parse::<BuildTool>().is_err());
    }
}
