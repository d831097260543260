//! Static catalog of supported integrations and where their assets live

use std::fmt;
use std::str::FromStr;

/// Optional features a generated project may include
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Integration {
    Jquery,
    Bootstrap,
    Barbajs,
    Modernizr,
    SlickCarousel,
    Gulp,
    Sass,
    Babel,
}

impl Integration {
    pub const ALL: [Integration; 8] = [
        Integration::Jquery,
        Integration::Bootstrap,
        Integration::Barbajs,
        Integration::Modernizr,
        Integration::SlickCarousel,
        Integration::Gulp,
        Integration::Sass,
        Integration::Babel,
    ];

    /// Stable identifier used on the command line
    pub fn key(&self) -> &'static str {
        match self {
            Integration::Jquery => "jquery",
            Integration::Bootstrap => "bootstrap",
            Integration::Barbajs => "barbajs",
            Integration::Modernizr => "modernizr",
            Integration::SlickCarousel => "slick-carousel",
            Integration::Gulp => "gulp",
            Integration::Sass => "sass",
            Integration::Babel => "babel",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Integration::Jquery => "jQuery",
            Integration::Bootstrap => "Bootstrap",
            Integration::Barbajs => "Barba.js",
            Integration::Modernizr => "Modernizr",
            Integration::SlickCarousel => "Slick carousel",
            Integration::Gulp => "Gulp",
            Integration::Sass => "Sass",
            Integration::Babel => "Babel",
        }
    }

    /// Catalog entry for this integration
    pub fn entry(&self) -> &'static CatalogEntry {
        CATALOG
            .iter()
            .find(|entry| entry.integration == *self)
            .unwrap_or_else(|| unreachable!("catalog covers every integration"))
    }

    /// Whether this integration ships assets that get copied into the project
    pub fn is_library(&self) -> bool {
        self.entry().kind == EntryKind::Library
    }
}

impl fmt::Display for Integration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for Integration {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "jquery" => Ok(Integration::Jquery),
            "bootstrap" => Ok(Integration::Bootstrap),
            "barbajs" | "barba.js" | "barba" => Ok(Integration::Barbajs),
            "modernizr" => Ok(Integration::Modernizr),
            "slick-carousel" | "slick" => Ok(Integration::SlickCarousel),
            "gulp" => Ok(Integration::Gulp),
            "sass" | "scss" => Ok(Integration::Sass),
            "babel" => Ok(Integration::Babel),
            other => Err(format!("Unknown integration: {}", other)),
        }
    }
}

/// Whether an entry is a copyable library or build tooling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Fetched and copied into scripts/ and styles/
    Library,
    /// Handled by the build pipeline generator, nothing to copy
    Tooling,
}

/// Where a package's script asset comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptSource {
    /// The `main` field of the package's package.json
    Main,
    /// The `main` field with a `.bundle.js` suffix
    MainBundle,
    /// Output of running the package's own build binary
    Build {
        bin: &'static str,
        config: &'static str,
    },
}

/// Where a package's stylesheet comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleSource {
    /// A package.json field, with an optional field used when Sass is selected
    Manifest {
        field: &'static str,
        sass_field: Option<&'static str>,
    },
    /// A fixed path relative to the package directory
    Fixed(&'static str),
}

#[derive(Debug, Clone, Copy)]
pub struct ScriptAsset {
    pub source: ScriptSource,
    /// File name under scripts/
    pub dest: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct StyleAsset {
    pub source: StyleSource,
    /// File name under styles/
    pub dest: &'static str,
    /// File name under styles/ when the Sass source is used
    pub sass_dest: Option<&'static str>,
}

impl StyleAsset {
    /// Destination file name, honoring the Sass variant when one exists
    pub fn dest_for(&self, sass: bool) -> &'static str {
        match (sass, self.sass_dest) {
            (true, Some(dest)) => dest,
            _ => self.dest,
        }
    }
}

/// One row of the catalog
#[derive(Debug, Clone, Copy)]
pub struct CatalogEntry {
    pub integration: Integration,
    pub package_name: &'static str,
    pub kind: EntryKind,
    pub script: Option<ScriptAsset>,
    pub style: Option<StyleAsset>,
}

impl CatalogEntry {
    /// Every destination file this entry may produce, relative to the project root
    pub fn destination_files(&self) -> Vec<String> {
        let mut files = Vec::new();
        if let Some(script) = &self.script {
            files.push(format!("scripts/{}", script.dest));
        }
        if let Some(style) = &self.style {
            files.push(format!("styles/{}", style.dest));
            if let Some(sass_dest) = style.sass_dest {
                files.push(format!("styles/{}", sass_dest));
            }
        }
        files
    }
}

pub static CATALOG: [CatalogEntry; 8] = [
    CatalogEntry {
        integration: Integration::Jquery,
        package_name: "jquery",
        kind: EntryKind::Library,
        script: Some(ScriptAsset {
            source: ScriptSource::Main,
            dest: "jquery.js",
        }),
        style: None,
    },
    CatalogEntry {
        integration: Integration::Bootstrap,
        package_name: "bootstrap",
        kind: EntryKind::Library,
        script: Some(ScriptAsset {
            source: ScriptSource::MainBundle,
            dest: "bootstrap.bundle.js",
        }),
        style: Some(StyleAsset {
            source: StyleSource::Manifest {
                field: "style",
                sass_field: Some("sass"),
            },
            dest: "bootstrap.css",
            sass_dest: Some("bootstrap.scss"),
        }),
    },
    CatalogEntry {
        integration: Integration::Barbajs,
        package_name: "barba.js",
        kind: EntryKind::Library,
        script: Some(ScriptAsset {
            source: ScriptSource::Main,
            dest: "barba.js",
        }),
        style: None,
    },
    CatalogEntry {
        integration: Integration::Modernizr,
        package_name: "modernizr",
        kind: EntryKind::Library,
        script: Some(ScriptAsset {
            source: ScriptSource::Build {
                bin: "modernizr",
                config: "lib/config-all.json",
            },
            dest: "modernizr.js",
        }),
        style: None,
    },
    CatalogEntry {
        integration: Integration::SlickCarousel,
        package_name: "slick-carousel",
        kind: EntryKind::Library,
        script: Some(ScriptAsset {
            source: ScriptSource::Main,
            dest: "slick.js",
        }),
        style: Some(StyleAsset {
            source: StyleSource::Fixed("slick/slick.css"),
            dest: "slick.css",
            sass_dest: None,
        }),
    },
    CatalogEntry {
        integration: Integration::Gulp,
        package_name: "gulp",
        kind: EntryKind::Tooling,
        script: None,
        style: None,
    },
    CatalogEntry {
        integration: Integration::Sass,
        package_name: "sass",
        kind: EntryKind::Tooling,
        script: None,
        style: None,
    },
    CatalogEntry {
        integration: Integration::Babel,
        package_name: "@babel/core",
        kind: EntryKind::Tooling,
        script: None,
        style: None,
    },
];
