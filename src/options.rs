use crate::error::Error;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Configuration for the CSS transform middleware.
///
/// Holds the absolute directory static files are served from and the
/// options forwarded to the transform engine. The source code, source
/// filename and project root are always computed per request and cannot be
/// set here.
#[derive(Debug, Clone)]
pub struct CssOptions {
    root: PathBuf,
    project_root: String,
    transform: TransformOptions,
}

impl CssOptions {
    /// Creates options rooted at `root`.
    ///
    /// The root must be a non-empty absolute path and valid UTF-8, since it
    /// is handed to the engine as the project root.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, Error> {
        let root = root.into();
        if root.as_os_str().is_empty() || !root.is_absolute() {
            return Err(Error::InvalidRoot(root));
        }
        let Some(project_root) = root.to_str().map(str::to_owned) else {
            return Err(Error::InvalidRoot(root));
        };

        Ok(Self {
            root,
            project_root,
            transform: TransformOptions::default(),
        })
    }

    /// Sets the options forwarded to the transform engine.
    pub fn transform_options(mut self, transform: TransformOptions) -> Self {
        self.transform = transform;
        self
    }

    /// Returns the root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the root directory as the engine's project root.
    pub fn project_root(&self) -> &str {
        &self.project_root
    }

    /// Returns the pass-through transform options.
    pub fn transform(&self) -> &TransformOptions {
        &self.transform
    }
}

/// Options forwarded verbatim to the transform engine.
///
/// Deserializing ignores unknown keys, so a config document that names
/// `code`, `filename` or `project_root` cannot override the values the
/// middleware computes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TransformOptions {
    /// Emit minified output.
    pub minify: bool,
    /// Browserslist queries the output should be compatible with.
    pub targets: Vec<String>,
    /// CSS modules behaviour for `*.module.css` requests.
    pub css_modules: Option<CssModules>,
    /// Recover from invalid rules and declarations instead of failing.
    pub error_recovery: bool,
    /// Class names, ids and other symbols to drop while minifying.
    pub unused_symbols: Vec<String>,
    /// Enable the draft `@custom-media` syntax.
    pub custom_media: bool,
    /// Enable the non-standard `>>>` and `/deep/` selector combinators.
    pub deep_selector_combinator: bool,
}

impl TransformOptions {
    /// Returns `true` when CSS modules are switched off regardless of filename.
    pub fn css_modules_disabled(&self) -> bool {
        matches!(self.css_modules, Some(CssModules::Enabled(false)))
    }

    /// Returns the CSS modules settings used when modules are active.
    pub fn css_modules_config(&self) -> CssModulesConfig {
        match &self.css_modules {
            Some(CssModules::Config(config)) => config.clone(),
            _ => CssModulesConfig::default(),
        }
    }
}

/// CSS modules setting: a plain switch or a full configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum CssModules {
    /// `false` disables modules even for `*.module.css`; `true` keeps the defaults.
    Enabled(bool),
    /// Enables modules with custom settings.
    Config(CssModulesConfig),
}

/// Settings for CSS modules scoping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CssModulesConfig {
    /// Naming pattern for scoped identifiers, e.g. `[hash]_[local]`.
    pub pattern: Option<String>,
    /// Also scope dashed identifiers such as custom properties.
    pub dashed_idents: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_accepts_absolute_root() {
        let options = CssOptions::new("/site").unwrap();
        assert_eq!(options.root(), Path::new("/site"));
        assert_eq!(options.project_root(), "/site");
        assert_eq!(options.transform(), &TransformOptions::default());
    }

    #[test]
    fn test_new_rejects_empty_root() {
        assert!(matches!(CssOptions::new(""), Err(Error::InvalidRoot(_))));
    }

    #[test]
    fn test_new_rejects_relative_root() {
        assert!(matches!(
            CssOptions::new("site/public"),
            Err(Error::InvalidRoot(_))
        ));
    }

    #[test]
    fn test_css_modules_disabled_only_for_false() {
        let mut options = TransformOptions::default();
        assert!(!options.css_modules_disabled());

        options.css_modules = Some(CssModules::Enabled(true));
        assert!(!options.css_modules_disabled());

        options.css_modules = Some(CssModules::Config(CssModulesConfig::default()));
        assert!(!options.css_modules_disabled());

        options.css_modules = Some(CssModules::Enabled(false));
        assert!(options.css_modules_disabled());
    }

    #[test]
    fn test_deserialize_switch() {
        let options: TransformOptions =
            serde_json::from_str(r#"{"css_modules": false, "minify": true}"#).unwrap();
        assert!(options.minify);
        assert!(options.css_modules_disabled());
    }

    #[test]
    fn test_deserialize_modules_config() {
        let options: TransformOptions = serde_json::from_str(
            r#"{"css_modules": {"pattern": "[local]_[hash]", "dashed_idents": true}}"#,
        )
        .unwrap();
        assert_eq!(
            options.css_modules_config(),
            CssModulesConfig {
                pattern: Some("[local]_[hash]".into()),
                dashed_idents: true,
            }
        );
    }

    #[test]
    fn test_deserialize_ignores_computed_fields() {
        let options: TransformOptions = serde_json::from_str(
            r#"{"code": "a{}", "filename": "/evil.css", "project_root": "/", "targets": ["chrome 100"]}"#,
        )
        .unwrap();
        assert_eq!(options.targets, vec!["chrome 100".to_string()]);
    }
}
