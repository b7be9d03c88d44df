/// Directory of the variant layout manifests, relative to the asset root.
pub const LAYOUT_DIRECTORY: &str = "layouts";

/// Extension registered with the JSON asset loader for layout manifests.
pub const LAYOUT_EXTENSION: &str = "layout.json";

pub const DEFAULT_VARIANT: &str = "museum_with_roof";

/// Native builds read the variant from this environment variable.
pub const VARIANT_ENV_VAR: &str = "MUSEUM_VARIANT";

/// Web builds read the variant from this URL query parameter.
pub const VARIANT_QUERY_KEY: &str = "variant";

/// Canvas selector the web build renders into.
pub const CANVAS_SELECTOR: &str = "#bevy";
