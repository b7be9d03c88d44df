use crate::constants::path::{DEFAULT_VARIANT, LAYOUT_DIRECTORY, LAYOUT_EXTENSION, VARIANT_QUERY_KEY};
use crate::engine::error::LayoutError;
use bevy::prelude::*;

/// Which museum variant this run shows.
#[derive(Resource, Debug, Clone, PartialEq, Eq)]
pub struct LaunchConfig {
    variant: String,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            variant: DEFAULT_VARIANT.to_string(),
        }
    }
}

impl LaunchConfig {
    pub fn with_variant(variant: &str) -> Result<Self, LayoutError> {
        if is_valid_variant(variant) {
            Ok(Self {
                variant: variant.to_string(),
            })
        } else {
            Err(LayoutError::InvalidVariant(variant.to_string()))
        }
    }

    /// Variant requested by the environment, falling back to the default on
    /// absence or an unusable name.
    pub fn from_environment() -> Self {
        let Some(requested) = requested_variant() else {
            return Self::default();
        };

        match Self::with_variant(&requested) {
            Ok(config) => config,
            Err(err) => {
                warn!("{}, using `{}`", err, DEFAULT_VARIANT);
                Self::default()
            }
        }
    }

    pub fn variant(&self) -> &str {
        &self.variant
    }

    pub fn layout_path(&self) -> String {
        format!("{}/{}.{}", LAYOUT_DIRECTORY, self.variant, LAYOUT_EXTENSION)
    }
}

/// Variant names become asset paths, so only `[a-z0-9_-]` is accepted.
fn is_valid_variant(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-')
}

/// Value of the `variant` key in a URL query string such as `?variant=museum_gallery&x=1`.
pub fn variant_from_query(search: &str) -> Option<String> {
    search
        .trim_start_matches('?')
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == VARIANT_QUERY_KEY)
        .map(|(_, value)| value.to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(target_arch = "wasm32")]
fn requested_variant() -> Option<String> {
    let search = web_sys::window()?.location().search().ok()?;
    variant_from_query(&search)
}

#[cfg(not(target_arch = "wasm32"))]
fn requested_variant() -> Option<String> {
    std::env::var(crate::constants::path::VARIANT_ENV_VAR)
        .ok()
        .filter(|value| !value.is_empty())
}
