//! Deciding what to do with each located color.
//!
//! [`decide`] produces a [`Decision`]: whether the color's generated block is
//! skipped, generated or regenerated, and which [`ThemeMode`] its
//! theme-specific formats are rendered for.
//!
//! Theme resolution runs an ordered [`ThemeChain`] of [`ThemeResolver`]s. The
//! first resolver that answers wins:
//!
//! 1. [`MarkerResolver`]: the theme recorded in the color's own marker
//! 2. [`LuminanceResolver`]: a decisive luminance classification
//! 3. [`FallbackResolver`]: the caller-supplied theme
//!
//! ```rust
//! use constellation_core::policy::{FallbackResolver, LuminanceResolver, ThemeChain};
//!
//! // A chain that ignores existing markers
//! let chain = ThemeChain::empty()
//!     .with(LuminanceResolver)
//!     .with(FallbackResolver);
//! assert_eq!(chain.len(), 2);
//! ```

use std::fmt;

use once_cell::sync::Lazy;
use serde::Serialize;

use crate::color::{classify_decisive, normalize_formats, ThemeMode};
use crate::locate::ColorDeclaration;
use crate::transform::TransformOptions;

/// What happens to a color's generated block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// The block is current; leave it alone.
    Skip,
    /// No block yet; insert one after the declaration.
    Generate,
    /// The block is stale or forced; replace it.
    Regenerate,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Skip => "skip",
            Action::Generate => "generate",
            Action::Regenerate => "regenerate",
        }
    }

    /// Whether the action edits the stylesheet.
    pub fn is_edit(&self) -> bool {
        !matches!(self, Action::Skip)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which resolver produced a theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeSource {
    Marker,
    Luminance,
    Fallback,
}

impl ThemeSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeSource::Marker => "marker",
            ThemeSource::Luminance => "luminance",
            ThemeSource::Fallback => "fallback",
        }
    }
}

impl fmt::Display for ThemeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The outcome of [`decide`] for one declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub action: Action,
    pub theme: ThemeMode,
    pub theme_source: ThemeSource,
}

// ─── Theme resolvers ────────────────────────────────────────────────────────

/// One source of a theme for a declaration.
///
/// Returning `None` abstains and lets the next resolver in the chain answer.
pub trait ThemeResolver: Send + Sync {
    /// Reported as the [`Decision::theme_source`] when this resolver answers.
    fn source(&self) -> ThemeSource;

    fn resolve(&self, decl: &ColorDeclaration, options: &TransformOptions) -> Option<ThemeMode>;
}

/// The theme recorded in the declaration's own marker.
///
/// Abstains when forced, when there is no readable marker, or when the marker
/// was written for a different color.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkerResolver;

impl ThemeResolver for MarkerResolver {
    fn source(&self) -> ThemeSource {
        ThemeSource::Marker
    }

    fn resolve(&self, decl: &ColorDeclaration, options: &TransformOptions) -> Option<ThemeMode> {
        if options.force {
            return None;
        }
        let marker = decl.block.as_ref()?.marker.as_ref()?;
        (marker.hex == decl.color.to_hex()).then_some(marker.theme)
    }
}

/// Luminance classification, when it is decisive.
#[derive(Debug, Clone, Copy, Default)]
pub struct LuminanceResolver;

impl ThemeResolver for LuminanceResolver {
    fn source(&self) -> ThemeSource {
        ThemeSource::Luminance
    }

    fn resolve(&self, decl: &ColorDeclaration, _options: &TransformOptions) -> Option<ThemeMode> {
        classify_decisive(&decl.color)
    }
}

/// The caller-supplied theme. Always answers.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackResolver;

impl ThemeResolver for FallbackResolver {
    fn source(&self) -> ThemeSource {
        ThemeSource::Fallback
    }

    fn resolve(&self, _decl: &ColorDeclaration, options: &TransformOptions) -> Option<ThemeMode> {
        Some(options.theme)
    }
}

/// An ordered list of theme resolvers.
pub struct ThemeChain {
    resolvers: Vec<Box<dyn ThemeResolver>>,
}

impl ThemeChain {
    /// Marker, then luminance, then fallback.
    pub fn standard() -> Self {
        Self::empty()
            .with(MarkerResolver)
            .with(LuminanceResolver)
            .with(FallbackResolver)
    }

    pub fn empty() -> Self {
        Self {
            resolvers: Vec::new(),
        }
    }

    /// Appends a resolver at the lowest priority.
    pub fn with(mut self, resolver: impl ThemeResolver + 'static) -> Self {
        self.resolvers.push(Box::new(resolver));
        self
    }

    pub fn len(&self) -> usize {
        self.resolvers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolvers.is_empty()
    }

    /// Asks each resolver in order.
    ///
    /// When every resolver abstains the caller's theme is used, so a chain
    /// without a [`FallbackResolver`] still resolves.
    pub fn resolve(
        &self,
        decl: &ColorDeclaration,
        options: &TransformOptions,
    ) -> (ThemeMode, ThemeSource) {
        self.resolvers
            .iter()
            .find_map(|r| r.resolve(decl, options).map(|theme| (theme, r.source())))
            .unwrap_or((options.theme, ThemeSource::Fallback))
    }
}

impl Default for ThemeChain {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Debug for ThemeChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.resolvers.iter().map(|r| r.source()))
            .finish()
    }
}

static STANDARD_CHAIN: Lazy<ThemeChain> = Lazy::new(ThemeChain::standard);

// ─── Decisions ──────────────────────────────────────────────────────────────

/// Decides the action and theme for one declaration with the standard chain.
pub fn decide(decl: &ColorDeclaration, options: &TransformOptions) -> Decision {
    decide_with(decl, options, &STANDARD_CHAIN)
}

/// Like [`decide`], resolving the theme through `chain`.
pub fn decide_with(
    decl: &ColorDeclaration,
    options: &TransformOptions,
    chain: &ThemeChain,
) -> Decision {
    let (theme, theme_source) = chain.resolve(decl, options);
    let action = match &decl.block {
        None => Action::Generate,
        Some(_) if options.force => Action::Regenerate,
        Some(block) => match &block.marker {
            Some(marker)
                if marker.hex == decl.color.to_hex()
                    && marker.formats == normalize_formats(&options.formats) =>
            {
                Action::Skip
            }
            _ => Action::Regenerate,
        },
    };

    log::debug!(
        "{} (line {}): {} with {} theme from {}",
        decl.property,
        decl.line,
        action,
        theme,
        theme_source
    );

    Decision {
        action,
        theme,
        theme_source,
    }
}
