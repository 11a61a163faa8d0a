//! Environment variable names and built-in defaults

pub const ENV_DATABASE_URL: &str = "EAVCLEAN_DATABASE_URL";
pub const ENV_TABLE_PREFIX: &str = "EAVCLEAN_TABLE_PREFIX";
pub const ENV_MEDIA_ROOT: &str = "EAVCLEAN_MEDIA_ROOT";
pub const ENV_DECLARED_PATHS: &str = "EAVCLEAN_DECLARED_PATHS";
pub const ENV_COLOR: &str = "EAVCLEAN_COLOR";

/// Product images live below this directory of the media root.
pub const PRODUCT_IMAGE_SUBDIR: &str = "catalog/product";

/// Image cache directory name; cleaned by the platform's own cache command.
pub const CACHE_DIR_NAME: &str = "cache";

pub const CONFIG_TABLE: &str = "core_config_data";
pub const GALLERY_TABLE: &str = "catalog_product_entity_media_gallery";
pub const GALLERY_VALUE_TABLE: &str = "catalog_product_entity_media_gallery_value";
